pub(crate) mod autotag;
pub(crate) mod config;
pub(crate) mod create;
pub(crate) mod destroy;
pub(crate) mod find;
pub(crate) mod stats;

use std::path::PathBuf;

use rusqlite::Connection;

use crate::CliError;
use crate::settings::resolve_database_path;

/// Resolve the database path and open it, creating the schema if needed.
pub(crate) fn open_library(db: Option<PathBuf>) -> Result<(PathBuf, Connection), CliError> {
    let db_path = resolve_database_path(db);
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let conn =
        reelkeep_db::open_database(&db_path).map_err(|e| CliError::open(&db_path, e))?;
    Ok((db_path, conn))
}

/// Truncate a string to a maximum width, appending "..." if needed.
pub(crate) fn truncate_str(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else if max > 3 {
        let head: String = s.chars().take(max - 3).collect();
        format!("{head}...")
    } else {
        s.chars().take(max).collect()
    }
}
