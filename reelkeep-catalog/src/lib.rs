//! Media library data model, filter types, and filename name matching.
//!
//! This crate defines the catalog entities (scenes, performers, studios,
//! tags), the structured filter/criterion types consumed by the query
//! compiler, and the name-pattern matcher used by auto-tagging. It has no
//! database dependency; `reelkeep-db` persists and queries these types.

pub mod filter;
pub mod name_matcher;
pub mod types;

pub use filter::*;
pub use name_matcher::{path_matches_name, MatchError, NameMatcher, NamePatternSet, SEPARATORS};
pub use types::*;
