//! SQLite persistence layer for the media library.
//!
//! Provides schema creation, the criteria-to-SQL query compiler, and
//! per-entity CRUD and lookup APIs backed by SQLite (via rusqlite with the
//! bundled feature).

pub mod criteria;
pub mod performer;
pub mod scene;
pub mod schema;
pub mod sql;
pub mod store;
pub mod studio;
pub mod tag;

pub use criteria::{
    count_criterion, int_criterion, multi_criterion, pagination_fragment, relation_criterion,
    search_fragment, sort_fragment, string_criterion, SortConfig,
};
pub use schema::{open_database, open_memory, SchemaError};
pub use sql::{FindIds, Fragment, QueryBuilder, QueryError};
pub use store::{
    all, count, destroy, find, find_many, library_stats, query, Dependent, Entity, Filterable,
    LibraryStats,
};
