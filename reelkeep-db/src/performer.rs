//! Performer persistence and lookups.

use reelkeep_catalog::{NewPerformer, Performer, PerformerFilter, PerformerPartial};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Transaction};

use crate::criteria::{count_criterion, string_criterion};
use crate::sql::{Fragment, QueryBuilder, QueryError};
use crate::store::{
    self, now, qualified_columns, query_entities, Dependent, Entity, Filterable, UpdateSet,
};

impl Entity for Performer {
    const TABLE: &'static str = "performers";
    const ENTITY_TYPE: &'static str = "performer";
    const COLUMNS: &'static str = "id, checksum, name, url, gender, birthdate, ethnicity, \
        country, favorite, created_at, updated_at";
    const DEPENDENTS: &'static [Dependent] = &[Dependent::Delete {
        table: "performers_scenes",
        column: "performer_id",
    }];

    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Performer {
            id: row.get(0)?,
            checksum: row.get(1)?,
            name: row.get(2)?,
            url: row.get(3)?,
            gender: row.get(4)?,
            birthdate: row.get(5)?,
            ethnicity: row.get(6)?,
            country: row.get(7)?,
            favorite: row.get(8)?,
            created_at: row.get(9)?,
            updated_at: row.get(10)?,
        })
    }
}

impl Filterable for Performer {
    type Filter = PerformerFilter;

    const DEFAULT_SORT: &'static str = "name";
    const SEARCH_COLUMNS: &'static [&'static str] = &[
        "performers.name",
        "performers.checksum",
        "performers.birthdate",
        "performers.ethnicity",
    ];
    const JOINS: &'static str = "
        LEFT JOIN performers_scenes ON performers_scenes.performer_id = performers.id
        LEFT JOIN scenes ON performers_scenes.scene_id = scenes.id";

    fn apply_filter(qb: &mut QueryBuilder, filter: &PerformerFilter) -> Result<(), QueryError> {
        if let Some(favorite) = filter.favorite {
            qb.add_where(Fragment::new(
                "performers.favorite = ?",
                vec![Value::from(favorite)],
            ));
        }
        if let Some(country) = &filter.country {
            qb.add_where(string_criterion("performers.country", country)?);
        }
        if let Some(scene_count) = &filter.scene_count {
            qb.add_having(count_criterion("COUNT(DISTINCT scenes.id)", scene_count)?);
        }
        Ok(())
    }
}

pub fn create(tx: &Transaction<'_>, performer: &NewPerformer) -> Result<Performer, QueryError> {
    tx.execute(
        "INSERT INTO performers (checksum, name, url, gender, birthdate, ethnicity, country,
             favorite, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)",
        params![
            performer.checksum,
            performer.name,
            performer.url,
            performer.gender,
            performer.birthdate,
            performer.ethnicity,
            performer.country,
            performer.favorite,
            now(),
        ],
    )?;
    store::get(tx, tx.last_insert_rowid())
}

pub fn update(tx: &Transaction<'_>, partial: &PerformerPartial) -> Result<Performer, QueryError> {
    let mut set = UpdateSet::new();
    set.set("checksum", partial.checksum.clone());
    set.set_nullable("name", partial.name.clone());
    set.set_nullable("url", partial.url.clone());
    set.set_nullable("gender", partial.gender.clone());
    set.set_nullable("birthdate", partial.birthdate.clone());
    set.set_nullable("ethnicity", partial.ethnicity.clone());
    set.set_nullable("country", partial.country.clone());
    set.set("favorite", partial.favorite);
    set.execute::<Performer>(tx, partial.id)?;
    store::get(tx, partial.id)
}

/// Performers linked to a scene, by name.
pub fn find_by_scene_id(conn: &Connection, scene_id: i64) -> Result<Vec<Performer>, QueryError> {
    let sql = format!(
        "SELECT {} FROM performers
         JOIN performers_scenes ON performers_scenes.performer_id = performers.id
         WHERE performers_scenes.scene_id = ?1
         ORDER BY performers.name COLLATE NOCASE",
        qualified_columns::<Performer>()
    );
    query_entities(conn, &sql, params![scene_id])
}

/// Performers whose name is any of `names`.
pub fn find_by_names(
    conn: &Connection,
    names: &[&str],
    ignore_case: bool,
) -> Result<Vec<Performer>, QueryError> {
    if names.is_empty() {
        return Ok(Vec::new());
    }
    let collate = if ignore_case { " COLLATE NOCASE" } else { "" };
    let placeholders = vec!["?"; names.len()].join(", ");
    let sql = format!(
        "SELECT {} FROM performers WHERE name{collate} IN ({placeholders})",
        Performer::COLUMNS
    );
    query_entities(conn, &sql, params_from_iter(names.iter()))
}
