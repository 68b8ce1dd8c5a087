use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;
use crate::settings;

/// Show the settings file and the database path that would be used.
pub(crate) fn run_config_show(db: Option<PathBuf>) -> Result<(), CliError> {
    let path = settings::settings_path();

    log::info!(
        "{}",
        "reelkeep Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    crate::log_blank();

    if path.exists() {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(exists)".if_supports_color(Stdout, |t| t.green()),
        );
    } else {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(not found)".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }

    let db_path = settings::resolve_database_path(db);
    log::info!(
        "  Database:      {}",
        db_path.display().if_supports_color(Stdout, |t| t.cyan()),
    );

    if let Some(contents) = settings::load_settings_string() {
        crate::log_blank();
        for line in contents.lines() {
            log::info!("    {}", line);
        }
    }
    Ok(())
}

/// Print the settings file path.
pub(crate) fn run_config_path() -> Result<(), CliError> {
    log::info!("{}", settings::settings_path().display());
    Ok(())
}

/// Save or clear the default database path.
pub(crate) fn run_config_set_db(path: Option<PathBuf>) -> Result<(), CliError> {
    let path = match path {
        Some(p) if p.is_relative() => Some(
            std::env::current_dir()
                .map_err(|e| CliError::config(format!("Failed to resolve path: {}", e)))?
                .join(p),
        ),
        other => other,
    };

    settings::save_database_path(path.as_deref())
        .map_err(|e| CliError::config(format!("Failed to write settings: {}", e)))?;

    match path {
        Some(p) => log::info!(
            "{} database path to {}",
            "Set".if_supports_color(Stdout, |t| t.green()),
            p.display().if_supports_color(Stdout, |t| t.cyan()),
        ),
        None => log::info!(
            "{} saved database path",
            "Cleared".if_supports_color(Stdout, |t| t.yellow()),
        ),
    }
    Ok(())
}
