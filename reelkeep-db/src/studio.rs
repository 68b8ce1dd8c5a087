//! Studio persistence and lookups.

use reelkeep_catalog::{NewStudio, Studio, StudioFilter, StudioPartial};
use rusqlite::{params, Connection, Transaction};

use crate::criteria::count_criterion;
use crate::sql::{QueryBuilder, QueryError};
use crate::store::{
    self, now, qualified_columns, query_entity, Dependent, Entity, Filterable, UpdateSet,
};

impl Entity for Studio {
    const TABLE: &'static str = "studios";
    const ENTITY_TYPE: &'static str = "studio";
    const COLUMNS: &'static str = "id, checksum, name, url, created_at, updated_at";
    const DEPENDENTS: &'static [Dependent] = &[Dependent::Nullify {
        table: "scenes",
        column: "studio_id",
    }];

    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Studio {
            id: row.get(0)?,
            checksum: row.get(1)?,
            name: row.get(2)?,
            url: row.get(3)?,
            created_at: row.get(4)?,
            updated_at: row.get(5)?,
        })
    }
}

impl Filterable for Studio {
    type Filter = StudioFilter;

    const DEFAULT_SORT: &'static str = "name";
    const SEARCH_COLUMNS: &'static [&'static str] = &["studios.name"];
    const JOINS: &'static str = "LEFT JOIN scenes ON studios.id = scenes.studio_id";

    fn apply_filter(qb: &mut QueryBuilder, filter: &StudioFilter) -> Result<(), QueryError> {
        if let Some(scene_count) = &filter.scene_count {
            qb.add_having(count_criterion("COUNT(DISTINCT scenes.id)", scene_count)?);
        }
        Ok(())
    }
}

pub fn create(tx: &Transaction<'_>, studio: &NewStudio) -> Result<Studio, QueryError> {
    tx.execute(
        "INSERT INTO studios (checksum, name, url, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?4)",
        params![studio.checksum, studio.name, studio.url, now()],
    )?;
    store::get(tx, tx.last_insert_rowid())
}

pub fn update(tx: &Transaction<'_>, partial: &StudioPartial) -> Result<Studio, QueryError> {
    let mut set = UpdateSet::new();
    set.set("checksum", partial.checksum.clone());
    set.set_nullable("name", partial.name.clone());
    set.set_nullable("url", partial.url.clone());
    set.execute::<Studio>(tx, partial.id)?;
    store::get(tx, partial.id)
}

pub fn find_by_name(conn: &Connection, name: &str) -> Result<Option<Studio>, QueryError> {
    let sql = format!(
        "SELECT {} FROM studios WHERE name = ?1 LIMIT 1",
        Studio::COLUMNS
    );
    query_entity(conn, &sql, params![name])
}

/// The studio a scene belongs to, if any.
pub fn find_by_scene_id(conn: &Connection, scene_id: i64) -> Result<Option<Studio>, QueryError> {
    let sql = format!(
        "SELECT {} FROM studios JOIN scenes ON studios.id = scenes.studio_id
         WHERE scenes.id = ?1 LIMIT 1",
        qualified_columns::<Studio>()
    );
    query_entity(conn, &sql, params![scene_id])
}
