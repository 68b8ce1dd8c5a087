//! Scene persistence, filters, and association writes.

use reelkeep_catalog::{MissingField, NewScene, Scene, SceneFilter, ScenePartial};
use rusqlite::{params, Connection, Transaction};

use crate::criteria::{
    count_criterion, int_criterion, multi_criterion, relation_criterion, string_criterion,
};
use crate::sql::{Fragment, QueryBuilder, QueryError};
use crate::store::{self, now, query_entity, Dependent, Entity, Filterable, UpdateSet};

impl Entity for Scene {
    const TABLE: &'static str = "scenes";
    const ENTITY_TYPE: &'static str = "scene";
    const COLUMNS: &'static str = "id, checksum, path, title, details, url, date, rating, size, \
        duration, video_codec, audio_codec, width, height, framerate, bitrate, studio_id, \
        created_at, updated_at";
    const DEPENDENTS: &'static [Dependent] = &[
        Dependent::Delete {
            table: "performers_scenes",
            column: "scene_id",
        },
        Dependent::Delete {
            table: "scenes_tags",
            column: "scene_id",
        },
    ];

    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Scene {
            id: row.get(0)?,
            checksum: row.get(1)?,
            path: row.get(2)?,
            title: row.get(3)?,
            details: row.get(4)?,
            url: row.get(5)?,
            date: row.get(6)?,
            rating: row.get(7)?,
            size: row.get(8)?,
            duration: row.get(9)?,
            video_codec: row.get(10)?,
            audio_codec: row.get(11)?,
            width: row.get(12)?,
            height: row.get(13)?,
            framerate: row.get(14)?,
            bitrate: row.get(15)?,
            studio_id: row.get(16)?,
            created_at: row.get(17)?,
            updated_at: row.get(18)?,
        })
    }
}

impl Filterable for Scene {
    type Filter = SceneFilter;

    const DEFAULT_SORT: &'static str = "path";
    const SEARCH_COLUMNS: &'static [&'static str] = &[
        "scenes.title",
        "scenes.details",
        "scenes.path",
        "scenes.checksum",
    ];
    const JOINS: &'static str = "
        LEFT JOIN performers_scenes AS performers_join ON performers_join.scene_id = scenes.id
        LEFT JOIN performers ON performers_join.performer_id = performers.id
        LEFT JOIN scenes_tags AS tags_join ON tags_join.scene_id = scenes.id
        LEFT JOIN tags ON tags_join.tag_id = tags.id
        LEFT JOIN studios ON studios.id = scenes.studio_id";

    fn apply_filter(qb: &mut QueryBuilder, filter: &SceneFilter) -> Result<(), QueryError> {
        if let Some(rating) = &filter.rating {
            qb.add_where(int_criterion("scenes.rating", rating)?);
        }
        if let Some(path) = &filter.path {
            qb.add_where(string_criterion("scenes.path", path)?);
        }
        if let Some(missing) = filter.is_missing {
            qb.add_where(missing_fragment(missing));
        }
        if let Some(studios) = &filter.studios {
            qb.add_where(multi_criterion("scenes.studio_id", studios)?);
        }
        if let Some(tags) = &filter.tags {
            qb.add_where(relation_criterion(
                "scenes.id",
                "scenes_tags",
                "scene_id",
                "tag_id",
                tags,
            )?);
        }
        if let Some(performers) = &filter.performers {
            qb.add_where(relation_criterion(
                "scenes.id",
                "performers_scenes",
                "scene_id",
                "performer_id",
                performers,
            )?);
        }
        if let Some(performer_count) = &filter.performer_count {
            qb.add_having(count_criterion(
                "COUNT(DISTINCT performers_join.performer_id)",
                performer_count,
            )?);
        }
        Ok(())
    }
}

fn missing_fragment(field: MissingField) -> Fragment {
    let sql = match field {
        MissingField::Title => "(scenes.title IS NULL OR scenes.title = '')",
        MissingField::Url => "(scenes.url IS NULL OR scenes.url = '')",
        MissingField::Date => "(scenes.date IS NULL OR scenes.date = '')",
        MissingField::Studio => "scenes.studio_id IS NULL",
        MissingField::Performers => "performers_join.scene_id IS NULL",
        MissingField::Tags => "tags_join.scene_id IS NULL",
    };
    Fragment::raw(sql)
}

// ── Mutations ───────────────────────────────────────────────────────────────

pub fn create(tx: &Transaction<'_>, scene: &NewScene) -> Result<Scene, QueryError> {
    let now = now();
    tx.execute(
        "INSERT INTO scenes (checksum, path, title, details, url, date, rating, size,
             duration, video_codec, audio_codec, width, height, framerate, bitrate,
             studio_id, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?17)",
        params![
            scene.checksum,
            scene.path,
            scene.title,
            scene.details,
            scene.url,
            scene.date,
            scene.rating,
            scene.size,
            scene.duration,
            scene.video_codec,
            scene.audio_codec,
            scene.width,
            scene.height,
            scene.framerate,
            scene.bitrate,
            scene.studio_id,
            now,
        ],
    )?;
    store::get(tx, tx.last_insert_rowid())
}

pub fn update(tx: &Transaction<'_>, partial: &ScenePartial) -> Result<Scene, QueryError> {
    let mut set = UpdateSet::new();
    set.set("checksum", partial.checksum.clone());
    set.set("path", partial.path.clone());
    set.set_nullable("title", partial.title.clone());
    set.set_nullable("details", partial.details.clone());
    set.set_nullable("url", partial.url.clone());
    set.set_nullable("date", partial.date.clone());
    set.set_nullable("rating", partial.rating);
    set.set_nullable("size", partial.size.clone());
    set.set_nullable("duration", partial.duration);
    set.set_nullable("video_codec", partial.video_codec.clone());
    set.set_nullable("audio_codec", partial.audio_codec.clone());
    set.set_nullable("width", partial.width);
    set.set_nullable("height", partial.height);
    set.set_nullable("framerate", partial.framerate);
    set.set_nullable("bitrate", partial.bitrate);
    set.set_nullable("studio_id", partial.studio_id);
    set.execute::<Scene>(tx, partial.id)?;
    store::get(tx, partial.id)
}

/// Link a performer to a scene. Returns `false` if the link already existed.
pub fn add_performer(
    tx: &Transaction<'_>,
    scene_id: i64,
    performer_id: i64,
) -> Result<bool, QueryError> {
    let inserted = tx.execute(
        "INSERT OR IGNORE INTO performers_scenes (performer_id, scene_id) VALUES (?1, ?2)",
        params![performer_id, scene_id],
    )?;
    Ok(inserted > 0)
}

/// Link a tag to a scene. Returns `false` if the link already existed.
pub fn add_tag(tx: &Transaction<'_>, scene_id: i64, tag_id: i64) -> Result<bool, QueryError> {
    let inserted = tx.execute(
        "INSERT OR IGNORE INTO scenes_tags (scene_id, tag_id) VALUES (?1, ?2)",
        params![scene_id, tag_id],
    )?;
    Ok(inserted > 0)
}

/// Set a scene's studio. Returns `false` if it was already that studio.
pub fn set_studio(tx: &Transaction<'_>, scene_id: i64, studio_id: i64) -> Result<bool, QueryError> {
    let changed = tx.execute(
        "UPDATE scenes SET studio_id = ?2, updated_at = ?3
         WHERE id = ?1 AND (studio_id IS NULL OR studio_id != ?2)",
        params![scene_id, studio_id, now()],
    )?;
    Ok(changed > 0)
}

// ── Lookups ─────────────────────────────────────────────────────────────────

pub fn find_by_path(conn: &Connection, path: &str) -> Result<Option<Scene>, QueryError> {
    let sql = format!("SELECT {} FROM scenes WHERE path = ?1 LIMIT 1", Scene::COLUMNS);
    query_entity(conn, &sql, params![path])
}

pub fn find_by_checksum(conn: &Connection, checksum: &str) -> Result<Option<Scene>, QueryError> {
    let sql = format!(
        "SELECT {} FROM scenes WHERE checksum = ?1 LIMIT 1",
        Scene::COLUMNS
    );
    query_entity(conn, &sql, params![checksum])
}

/// `(id, path)` for every scene, in id order.
pub fn all_paths(conn: &Connection) -> Result<Vec<(i64, String)>, QueryError> {
    let mut stmt = conn.prepare("SELECT id, path FROM scenes ORDER BY id")?;
    let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

pub fn performer_ids(conn: &Connection, scene_id: i64) -> Result<Vec<i64>, QueryError> {
    let mut stmt = conn.prepare(
        "SELECT performer_id FROM performers_scenes WHERE scene_id = ?1 ORDER BY performer_id",
    )?;
    let rows = stmt.query_map(params![scene_id], |row| row.get(0))?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

pub fn tag_ids(conn: &Connection, scene_id: i64) -> Result<Vec<i64>, QueryError> {
    let mut stmt =
        conn.prepare("SELECT tag_id FROM scenes_tags WHERE scene_id = ?1 ORDER BY tag_id")?;
    let rows = stmt.query_map(params![scene_id], |row| row.get(0))?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}
