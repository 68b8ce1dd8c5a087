//! Tag persistence and lookups.

use reelkeep_catalog::{NewTag, Tag, TagFilter, TagPartial};
use rusqlite::{params, Connection, Transaction};

use crate::criteria::count_criterion;
use crate::sql::{QueryBuilder, QueryError};
use crate::store::{
    self, now, qualified_columns, query_entities, query_entity, Dependent, Entity, Filterable,
    UpdateSet,
};

impl Entity for Tag {
    const TABLE: &'static str = "tags";
    const ENTITY_TYPE: &'static str = "tag";
    const COLUMNS: &'static str = "id, name, created_at, updated_at";
    const DEPENDENTS: &'static [Dependent] = &[Dependent::Delete {
        table: "scenes_tags",
        column: "tag_id",
    }];

    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Tag {
            id: row.get(0)?,
            name: row.get(1)?,
            created_at: row.get(2)?,
            updated_at: row.get(3)?,
        })
    }
}

impl Filterable for Tag {
    type Filter = TagFilter;

    const DEFAULT_SORT: &'static str = "name";
    const SEARCH_COLUMNS: &'static [&'static str] = &["tags.name"];
    const JOINS: &'static str = "
        LEFT JOIN scenes_tags ON scenes_tags.tag_id = tags.id
        LEFT JOIN scenes ON scenes_tags.scene_id = scenes.id";

    fn apply_filter(qb: &mut QueryBuilder, filter: &TagFilter) -> Result<(), QueryError> {
        if let Some(scene_count) = &filter.scene_count {
            qb.add_having(count_criterion("COUNT(DISTINCT scenes.id)", scene_count)?);
        }
        Ok(())
    }
}

pub fn create(tx: &Transaction<'_>, tag: &NewTag) -> Result<Tag, QueryError> {
    tx.execute(
        "INSERT INTO tags (name, created_at, updated_at) VALUES (?1, ?2, ?2)",
        params![tag.name, now()],
    )?;
    store::get(tx, tx.last_insert_rowid())
}

pub fn update(tx: &Transaction<'_>, partial: &TagPartial) -> Result<Tag, QueryError> {
    let mut set = UpdateSet::new();
    set.set("name", partial.name.clone());
    set.execute::<Tag>(tx, partial.id)?;
    store::get(tx, partial.id)
}

pub fn find_by_name(conn: &Connection, name: &str) -> Result<Option<Tag>, QueryError> {
    let sql = format!("SELECT {} FROM tags WHERE name = ?1 LIMIT 1", Tag::COLUMNS);
    query_entity(conn, &sql, params![name])
}

/// Tags linked to a scene, by name.
pub fn find_by_scene_id(conn: &Connection, scene_id: i64) -> Result<Vec<Tag>, QueryError> {
    let sql = format!(
        "SELECT {} FROM tags JOIN scenes_tags ON scenes_tags.tag_id = tags.id
         WHERE scenes_tags.scene_id = ?1
         ORDER BY tags.name COLLATE NOCASE",
        qualified_columns::<Tag>()
    );
    query_entities(conn, &sql, params![scene_id])
}
