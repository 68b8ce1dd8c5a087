use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use reelkeep_autotag::{AutoTagError, AutoTagOutcome, AutoTagPool, AutoTagTask};
use reelkeep_catalog::{Performer, Studio, Tag};
use reelkeep_db::{Entity, Filterable, SortConfig};
use rusqlite::Connection;
use tokio_util::sync::CancellationToken;

use crate::CliError;

use super::open_library;

pub(crate) fn run_autotag(
    db: Option<PathBuf>,
    performers: Vec<i64>,
    studios: Vec<i64>,
    tags: Vec<i64>,
    all: bool,
    workers: usize,
) -> Result<(), CliError> {
    let (db_path, conn) = open_library(db)?;

    let tasks = if all {
        let mut tasks = all_ids::<Performer>(&conn)?
            .into_iter()
            .map(AutoTagTask::performer)
            .collect::<Vec<_>>();
        tasks.extend(all_ids::<Studio>(&conn)?.into_iter().map(AutoTagTask::studio));
        tasks.extend(all_ids::<Tag>(&conn)?.into_iter().map(AutoTagTask::tag));
        tasks
    } else {
        performers
            .into_iter()
            .map(AutoTagTask::performer)
            .chain(studios.into_iter().map(AutoTagTask::studio))
            .chain(tags.into_iter().map(AutoTagTask::tag))
            .collect()
    };
    drop(conn);

    if tasks.is_empty() {
        return Err(CliError::invalid_input(
            "Nothing to auto-tag. Pass --performers, --studios, --tags, or --all.",
        ));
    }

    log::info!(
        "{} {} tasks with {} workers",
        "Auto-tagging".if_supports_color(Stdout, |t| t.bold()),
        tasks.len(),
        workers.max(1),
    );
    crate::log_blank();

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::runtime(format!("Failed to create tokio runtime: {}", e)))?;
    let outcomes = rt.block_on(async {
        let cancel = CancellationToken::new();
        let pool = AutoTagPool::start(&db_path, tasks, workers, cancel.clone());

        let interrupt = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                log::warn!("Interrupted, cancelling auto-tag tasks");
                interrupt.cancel();
            }
        });

        pool.wait_all().await
    });

    report(&outcomes)
}

fn all_ids<T>(conn: &Connection) -> Result<Vec<i64>, CliError>
where
    T: Filterable + HasId,
{
    let entities = reelkeep_db::all::<T>(conn, &SortConfig::random())?;
    Ok(entities.iter().map(HasId::id).collect())
}

trait HasId: Entity {
    fn id(&self) -> i64;
}

impl HasId for Performer {
    fn id(&self) -> i64 {
        self.id
    }
}

impl HasId for Studio {
    fn id(&self) -> i64 {
        self.id
    }
}

impl HasId for Tag {
    fn id(&self) -> i64 {
        self.id
    }
}

fn report(outcomes: &[AutoTagOutcome]) -> Result<(), CliError> {
    let mut linked = 0;
    let mut failed = 0;
    let mut cancelled = 0;

    for outcome in outcomes {
        let target = outcome.task.target;
        match &outcome.result {
            Ok(stats) => {
                linked += stats.linked;
                log::info!(
                    "  {} {}: {} matched, {} linked",
                    "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                    target,
                    stats.matched,
                    stats.linked,
                );
            }
            Err(AutoTagError::Cancelled) => {
                cancelled += 1;
                log::info!(
                    "  {} {}: cancelled",
                    "-".if_supports_color(Stdout, |t| t.dimmed()),
                    target,
                );
            }
            Err(e) => {
                failed += 1;
                log::info!(
                    "  {} {}: {}",
                    "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                    target,
                    e,
                );
            }
        }
    }

    crate::log_blank();
    log::info!(
        "{} {} new associations ({} cancelled, {} failed)",
        "Done:".if_supports_color(Stdout, |t| t.bold()),
        linked,
        cancelled,
        failed,
    );

    if failed > 0 {
        return Err(CliError::other(format!("{} auto-tag tasks failed", failed)));
    }
    Ok(())
}
