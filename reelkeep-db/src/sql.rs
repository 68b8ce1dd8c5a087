//! Query fragments and the paginated find assembler.
//!
//! A [`Fragment`] is a piece of SQL together with the positional arguments
//! its `?` placeholders bind. A [`QueryBuilder`] collects WHERE and HAVING
//! fragments around a base projection and runs them as a *find*: one count
//! query and one id query sharing the exact same filter text and arguments.

use reelkeep_catalog::UnknownModifier;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error(transparent)]
    UnknownModifier(#[from] UnknownModifier),
    #[error("Invalid criterion: {0}")]
    InvalidCriterion(String),
    #[error("Invalid sort key '{0}'")]
    InvalidSort(String),
    #[error("Search needs at least one column and a non-empty query")]
    EmptySearch,
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: &'static str, id: i64 },
}

impl QueryError {
    pub fn invalid_criterion(msg: impl Into<String>) -> Self {
        Self::InvalidCriterion(msg.into())
    }

    pub fn not_found(entity_type: &'static str, id: i64) -> Self {
        Self::NotFound { entity_type, id }
    }
}

// ── Fragment ────────────────────────────────────────────────────────────────

/// SQL text plus the arguments bound by its placeholders, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    sql: String,
    args: Vec<Value>,
}

impl Fragment {
    pub fn new(sql: impl Into<String>, args: Vec<Value>) -> Self {
        let sql = sql.into();
        debug_assert_eq!(
            sql.matches('?').count(),
            args.len(),
            "placeholder/argument mismatch in `{sql}`"
        );
        Self { sql, args }
    }

    /// A fragment that binds nothing.
    pub fn raw(sql: impl Into<String>) -> Self {
        Self::new(sql, Vec::new())
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }
}

// ── Query Builder ───────────────────────────────────────────────────────────

/// Ids for one page of a find plus the total match count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindIds {
    pub ids: Vec<i64>,
    pub count: i64,
}

/// Builds the paired count/id queries for one table.
///
/// `body` is the projection and joins, e.g.
/// `SELECT DISTINCT studios.id FROM studios LEFT JOIN scenes ON ...`.
/// The assembled statement always groups by `<table>.id` so one-to-many
/// joins cannot duplicate rows.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    table: &'static str,
    body: String,
    where_clauses: Vec<Fragment>,
    having_clauses: Vec<Fragment>,
    sort_and_pagination: String,
}

impl QueryBuilder {
    pub fn new(table: &'static str, body: impl Into<String>) -> Self {
        Self {
            table,
            body: body.into(),
            where_clauses: Vec::new(),
            having_clauses: Vec::new(),
            sort_and_pagination: String::new(),
        }
    }

    pub fn add_where(&mut self, fragment: Fragment) {
        self.where_clauses.push(fragment);
    }

    pub fn add_having(&mut self, fragment: Fragment) {
        self.having_clauses.push(fragment);
    }

    pub fn set_sort_and_pagination(&mut self, sql: impl Into<String>) {
        self.sort_and_pagination = sql.into();
    }

    /// The filtered, grouped statement and its arguments.
    ///
    /// WHERE arguments precede HAVING arguments, which is the order their
    /// placeholders appear in the text.
    fn assemble(&self) -> (String, Vec<Value>) {
        let mut sql = self.body.trim_end().to_string();
        let mut args = Vec::new();

        if !self.where_clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&join_fragments(&self.where_clauses, &mut args));
        }
        sql.push_str(&format!(" GROUP BY {}.id", self.table));
        if !self.having_clauses.is_empty() {
            sql.push_str(" HAVING ");
            sql.push_str(&join_fragments(&self.having_clauses, &mut args));
        }

        (sql, args)
    }

    pub fn count_sql(&self) -> (String, Vec<Value>) {
        let (body, args) = self.assemble();
        (format!("SELECT COUNT(*) AS count FROM ({body}) AS temp"), args)
    }

    pub fn ids_sql(&self) -> (String, Vec<Value>) {
        let (body, args) = self.assemble();
        (format!("{body}{}", self.sort_and_pagination), args)
    }

    /// Run the count and id queries.
    ///
    /// Either query failing fails the whole find; a page of ids is never
    /// returned without its count.
    pub fn execute_find(&self, conn: &Connection) -> Result<FindIds, QueryError> {
        let (count_query, args) = self.count_sql();
        log::debug!("find count: {count_query} {args:?}");
        let count = run_count_query(conn, &count_query, &args).inspect_err(|e| {
            log::error!(
                "Error executing count query with SQL: {count_query}, args: {args:?}, error: {e}"
            );
        })?;

        let (ids_query, args) = self.ids_sql();
        log::debug!("find ids: {ids_query} {args:?}");
        let ids = run_ids_query(conn, &ids_query, &args).inspect_err(|e| {
            log::error!(
                "Error executing find query with SQL: {ids_query}, args: {args:?}, error: {e}"
            );
        })?;

        Ok(FindIds { ids, count })
    }
}

fn join_fragments(fragments: &[Fragment], args: &mut Vec<Value>) -> String {
    fragments
        .iter()
        .map(|f| {
            args.extend(f.args.iter().cloned());
            f.sql.as_str()
        })
        .collect::<Vec<_>>()
        .join(" AND ")
}

/// Run a single-value `COUNT` query. No rows counts as zero.
pub(crate) fn run_count_query(
    conn: &Connection,
    sql: &str,
    args: &[Value],
) -> Result<i64, QueryError> {
    match conn.query_row(sql, params_from_iter(args.iter()), |row| row.get(0)) {
        Ok(n) => Ok(n),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
        Err(e) => Err(e.into()),
    }
}

/// Run a query whose first column is an integer id.
pub(crate) fn run_ids_query(
    conn: &Connection,
    sql: &str,
    args: &[Value],
) -> Result<Vec<i64>, QueryError> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params_from_iter(args.iter()), |row| row.get::<_, i64>(0))?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}
