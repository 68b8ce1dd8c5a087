//! Generic entity store.
//!
//! Every entity type describes its table through [`Entity`] (columns, row
//! mapping, references from other tables) and its query surface through
//! [`Filterable`] (joins, search columns, criteria). The functions here
//! implement lookups, counting, paginated queries, and deletion once for all
//! of them; the per-entity modules add create/update and relation lookups.

use reelkeep_catalog::{FindFilter, FindResult, SortDirection};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Params, Transaction};

use crate::criteria::{pagination_fragment, search_fragment, sort_fragment, SortConfig};
use crate::sql::{run_count_query, QueryBuilder, QueryError};

/// A table that references an entity by id.
#[derive(Debug, Clone, Copy)]
pub enum Dependent {
    /// Set `column` to NULL on rows that reference the entity.
    Nullify {
        table: &'static str,
        column: &'static str,
    },
    /// Delete rows that reference the entity (join tables).
    Delete {
        table: &'static str,
        column: &'static str,
    },
}

/// A catalog record type backed by one table with an integer `id`.
pub trait Entity: Sized {
    const TABLE: &'static str;
    /// Singular name used in errors and logs.
    const ENTITY_TYPE: &'static str;
    /// Unqualified, comma-separated columns in `from_row` order.
    const COLUMNS: &'static str;
    /// References cleared before a row is deleted.
    const DEPENDENTS: &'static [Dependent];

    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self>;
}

/// An entity that can be searched, filtered, sorted, and paginated.
pub trait Filterable: Entity {
    type Filter;

    const DEFAULT_SORT: &'static str;
    const SEARCH_COLUMNS: &'static [&'static str];
    /// Joins appended to `SELECT DISTINCT <table>.id FROM <table>`.
    const JOINS: &'static str;

    fn apply_filter(qb: &mut QueryBuilder, filter: &Self::Filter) -> Result<(), QueryError>;
}

/// `COLUMNS` qualified with the table name, for queries that join.
pub fn qualified_columns<T: Entity>() -> String {
    T::COLUMNS
        .split(',')
        .map(|c| format!("{}.{}", T::TABLE, c.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Timestamp in the same format as SQLite's `datetime('now')`.
pub(crate) fn now() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

// ── Lookups ─────────────────────────────────────────────────────────────────

/// Run `sql` and map every row to `T`.
pub(crate) fn query_entities<T: Entity>(
    conn: &Connection,
    sql: &str,
    params: impl Params,
) -> Result<Vec<T>, QueryError> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, T::from_row)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Run `sql` and map the first row to `T`, if any.
pub(crate) fn query_entity<T: Entity>(
    conn: &Connection,
    sql: &str,
    params: impl Params,
) -> Result<Option<T>, QueryError> {
    let mut stmt = conn.prepare(sql)?;
    match stmt.query_row(params, T::from_row) {
        Ok(entity) => Ok(Some(entity)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Find an entity by id.
pub fn find<T: Entity>(conn: &Connection, id: i64) -> Result<Option<T>, QueryError> {
    let sql = format!(
        "SELECT {} FROM {} WHERE id = ?1 LIMIT 1",
        T::COLUMNS,
        T::TABLE
    );
    query_entity(conn, &sql, params![id])
}

/// Find an entity that must exist.
pub(crate) fn get<T: Entity>(conn: &Connection, id: i64) -> Result<T, QueryError> {
    find(conn, id)?.ok_or_else(|| QueryError::not_found(T::ENTITY_TYPE, id))
}

/// Hydrate ids in order. Ids with no row are skipped.
pub fn find_many<T: Entity>(conn: &Connection, ids: &[i64]) -> Result<Vec<T>, QueryError> {
    let mut items = Vec::with_capacity(ids.len());
    for &id in ids {
        if let Some(item) = find(conn, id)? {
            items.push(item);
        }
    }
    Ok(items)
}

pub fn count<T: Entity>(conn: &Connection) -> Result<i64, QueryError> {
    run_count_query(conn, &format!("SELECT COUNT(*) FROM {}", T::TABLE), &[])
}

/// Every entity in default sort order.
pub fn all<T: Filterable>(conn: &Connection, config: &SortConfig) -> Result<Vec<T>, QueryError> {
    let sort = sort_fragment(config, T::DEFAULT_SORT, SortDirection::Asc, T::TABLE)?;
    let sql = format!("SELECT {} FROM {}{sort}", qualified_columns::<T>(), T::TABLE);
    query_entities(conn, &sql, [])
}

/// Search, filter, sort, and paginate entities.
///
/// A missing `find` behaves like the default filter: first page, default
/// page size, default sort.
pub fn query<T: Filterable>(
    conn: &Connection,
    config: &SortConfig,
    filter: Option<&T::Filter>,
    find: Option<&FindFilter>,
) -> Result<FindResult<T>, QueryError> {
    let default_find = FindFilter::default();
    let find = find.unwrap_or(&default_find);

    let mut qb = QueryBuilder::new(
        T::TABLE,
        format!(
            "SELECT DISTINCT {table}.id FROM {table} {joins}",
            table = T::TABLE,
            joins = T::JOINS
        ),
    );

    if let Some(q) = find.query() {
        qb.add_where(search_fragment(T::SEARCH_COLUMNS, q, false)?);
    }
    if let Some(filter) = filter {
        T::apply_filter(&mut qb, filter)?;
    }

    let sort = sort_fragment(
        config,
        find.sort_or(T::DEFAULT_SORT),
        find.direction(),
        T::TABLE,
    )?;
    qb.set_sort_and_pagination(format!("{sort}{}", pagination_fragment(find)));

    let found = qb.execute_find(conn)?;
    let items = find_many(conn, &found.ids)?;
    Ok(FindResult {
        count: found.count,
        items,
    })
}

// ── Mutations ───────────────────────────────────────────────────────────────

/// Delete an entity after clearing every reference to it.
pub fn destroy<T: Entity>(tx: &Transaction<'_>, id: i64) -> Result<(), QueryError> {
    for dependent in T::DEPENDENTS {
        match *dependent {
            Dependent::Nullify { table, column } => {
                tx.execute(
                    &format!("UPDATE {table} SET {column} = NULL WHERE {column} = ?1"),
                    params![id],
                )?;
            }
            Dependent::Delete { table, column } => {
                tx.execute(
                    &format!("DELETE FROM {table} WHERE {column} = ?1"),
                    params![id],
                )?;
            }
        }
    }

    let deleted = tx.execute(
        &format!("DELETE FROM {} WHERE id = ?1", T::TABLE),
        params![id],
    )?;
    if deleted == 0 {
        return Err(QueryError::not_found(T::ENTITY_TYPE, id));
    }
    Ok(())
}

/// Column assignments for a partial update.
///
/// Only fields the caller set are written; `updated_at` is always bumped.
#[derive(Debug, Default)]
pub(crate) struct UpdateSet {
    columns: Vec<&'static str>,
    args: Vec<Value>,
}

impl UpdateSet {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Write a NOT NULL column if `value` is set.
    pub(crate) fn set<V: Into<Value>>(&mut self, column: &'static str, value: Option<V>) {
        if let Some(v) = value {
            self.columns.push(column);
            self.args.push(v.into());
        }
    }

    /// Write a nullable column if set; `Some(None)` clears it.
    pub(crate) fn set_nullable<V: Into<Value>>(
        &mut self,
        column: &'static str,
        value: Option<Option<V>>,
    ) {
        if let Some(v) = value {
            self.columns.push(column);
            self.args.push(v.map_or(Value::Null, Into::into));
        }
    }

    pub(crate) fn execute<T: Entity>(self, tx: &Transaction<'_>, id: i64) -> Result<(), QueryError> {
        let Self {
            mut columns,
            mut args,
        } = self;
        columns.push("updated_at");
        args.push(Value::Text(now()));

        let assignments = columns
            .iter()
            .map(|c| format!("{c} = ?"))
            .collect::<Vec<_>>()
            .join(", ");
        args.push(Value::Integer(id));

        let changed = tx.execute(
            &format!("UPDATE {} SET {assignments} WHERE id = ?", T::TABLE),
            params_from_iter(args.iter()),
        )?;
        if changed == 0 {
            return Err(QueryError::not_found(T::ENTITY_TYPE, id));
        }
        Ok(())
    }
}

// ── Statistics ──────────────────────────────────────────────────────────────

/// Row counts for each entity table.
#[derive(Debug, Default)]
pub struct LibraryStats {
    pub scenes: i64,
    pub performers: i64,
    pub studios: i64,
    pub tags: i64,
}

pub fn library_stats(conn: &Connection) -> Result<LibraryStats, QueryError> {
    use reelkeep_catalog::{Performer, Scene, Studio, Tag};

    Ok(LibraryStats {
        scenes: count::<Scene>(conn)?,
        performers: count::<Performer>(conn)?,
        studios: count::<Studio>(conn)?,
        tags: count::<Tag>(conn)?,
    })
}
