use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;

use super::open_library;

pub(crate) fn run_stats(db: Option<PathBuf>) -> Result<(), CliError> {
    let (db_path, conn) = open_library(db)?;

    let stats = reelkeep_db::library_stats(&conn)?;

    log::info!(
        "{}",
        "Library Statistics".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("  Database: {}", db_path.display());
    crate::log_blank();
    log::info!("  Scenes:      {:>8}", stats.scenes);
    log::info!("  Performers:  {:>8}", stats.performers);
    log::info!("  Studios:     {:>8}", stats.studios);
    log::info!("  Tags:        {:>8}", stats.tags);

    Ok(())
}
