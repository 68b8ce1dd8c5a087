//! Settings file and database path resolution.
//!
//! The settings file is `~/.config/reelkeep/settings.toml`:
//!
//! ```toml
//! [database]
//! path = "/home/me/media/library.db"
//! ```

use std::io;
use std::path::{Path, PathBuf};

/// Canonical path to the settings file: `~/.config/reelkeep/settings.toml`.
pub(crate) fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("reelkeep").join("settings.toml")
}

/// Fallback database location: `<data_dir>/reelkeep/library.db`.
pub(crate) fn default_database_path() -> PathBuf {
    let data = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    data.join("reelkeep").join("library.db")
}

/// Resolve the database path using a priority chain:
///
/// 1. `--db` override (if `Some`)
/// 2. Saved `database.path` in `settings.toml`
/// 3. [`default_database_path`]
pub(crate) fn resolve_database_path(cli_override: Option<PathBuf>) -> PathBuf {
    if let Some(p) = cli_override {
        return p;
    }
    if let Some(p) = load_database_path(&settings_path()) {
        return p;
    }
    default_database_path()
}

/// Read `database.path` from a settings file, if set.
fn load_database_path(settings: &Path) -> Option<PathBuf> {
    let contents = std::fs::read_to_string(settings).ok()?;
    parse_database_path(&contents)
}

fn parse_database_path(contents: &str) -> Option<PathBuf> {
    let doc: toml::Value = contents.parse().ok()?;
    let path = doc.get("database")?.get("path")?.as_str()?;
    if path.is_empty() {
        None
    } else {
        Some(PathBuf::from(path))
    }
}

/// Save (or clear) the database path in `settings.toml`.
pub(crate) fn save_database_path(path: Option<&Path>) -> io::Result<()> {
    save_database_path_to(&settings_path(), path)
}

/// Update `database.path` in the given settings file.
///
/// Uses `toml::Value` for a surgical update so other tables and keys are
/// preserved. The file is replaced atomically.
fn save_database_path_to(settings: &Path, path: Option<&Path>) -> io::Result<()> {
    let mut doc: toml::Value = if let Ok(contents) = std::fs::read_to_string(settings) {
        contents
            .parse()
            .unwrap_or_else(|_| toml::Value::Table(Default::default()))
    } else {
        toml::Value::Table(Default::default())
    };

    let table = doc
        .as_table_mut()
        .ok_or_else(|| io::Error::other("settings.toml root is not a table"))?;
    let database = table
        .entry("database")
        .or_insert_with(|| toml::Value::Table(Default::default()));
    let db_table = database
        .as_table_mut()
        .ok_or_else(|| io::Error::other("[database] is not a table"))?;

    match path {
        Some(p) => {
            db_table.insert(
                "path".to_string(),
                toml::Value::String(p.to_string_lossy().into_owned()),
            );
        }
        None => {
            db_table.remove("path");
        }
    }

    if let Some(parent) = settings.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let serialized = toml::to_string_pretty(&doc).map_err(io::Error::other)?;
    let tmp = settings.with_extension("toml.tmp");
    std::fs::write(&tmp, &serialized)?;
    std::fs::rename(&tmp, settings)?;

    Ok(())
}

/// Load the full settings file as a pretty-printed TOML string for display.
pub(crate) fn load_settings_string() -> Option<String> {
    let contents = std::fs::read_to_string(settings_path()).ok()?;
    let doc: toml::Value = contents.parse().ok()?;
    toml::to_string_pretty(&doc).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_database_path() {
        let path = parse_database_path("[database]\npath = \"/srv/lib.db\"\n");
        assert_eq!(path, Some(PathBuf::from("/srv/lib.db")));
    }

    #[test]
    fn empty_or_missing_path_is_none() {
        assert_eq!(parse_database_path("[database]\npath = \"\"\n"), None);
        assert_eq!(parse_database_path("[other]\nkey = 1\n"), None);
        assert_eq!(parse_database_path("not toml ["), None);
    }

    #[test]
    fn save_preserves_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let settings = dir.path().join("nested").join("settings.toml");
        std::fs::create_dir_all(settings.parent().unwrap()).unwrap();
        std::fs::write(&settings, "[ui]\ntheme = \"dark\"\n").unwrap();

        save_database_path_to(&settings, Some(Path::new("/data/library.db"))).unwrap();

        assert_eq!(
            load_database_path(&settings),
            Some(PathBuf::from("/data/library.db"))
        );
        let contents = std::fs::read_to_string(&settings).unwrap();
        assert!(contents.contains("theme = \"dark\""));
        assert!(!settings.with_extension("toml.tmp").exists());
    }

    #[test]
    fn save_none_clears_path() {
        let dir = tempfile::tempdir().unwrap();
        let settings = dir.path().join("settings.toml");

        save_database_path_to(&settings, Some(Path::new("/a.db"))).unwrap();
        save_database_path_to(&settings, None).unwrap();
        assert_eq!(load_database_path(&settings), None);
    }
}
