//! The per-entity auto-tag task.

use std::fmt;

use reelkeep_catalog::{MatchError, NameMatcher, Performer, Studio, Tag};
use reelkeep_db::{scene, store, QueryError, SchemaError};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::progress::AutoTagProgress;

#[derive(Debug, Error)]
pub enum AutoTagError {
    #[error("Query error: {0}")]
    Query(#[from] QueryError),
    #[error("Database error: {0}")]
    Schema(#[from] SchemaError),
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Invalid name pattern: {0}")]
    Match(#[from] MatchError),
    #[error("Auto-tag cancelled")]
    Cancelled,
    #[error("Auto-tag worker failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// The entity whose name is looked for in scene paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AutoTagTarget {
    Performer(i64),
    Studio(i64),
    Tag(i64),
}

impl AutoTagTarget {
    pub fn id(&self) -> i64 {
        match *self {
            Self::Performer(id) | Self::Studio(id) | Self::Tag(id) => id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Performer(_) => "performer",
            Self::Studio(_) => "studio",
            Self::Tag(_) => "tag",
        }
    }

    /// The target's name. `Ok(None)` if the entity has no usable name.
    fn load_name(&self, conn: &Connection) -> Result<Option<String>, QueryError> {
        let id = self.id();
        let name = match self {
            Self::Performer(_) => store::find::<Performer>(conn, id)?
                .ok_or_else(|| QueryError::not_found("performer", id))?
                .name,
            Self::Studio(_) => store::find::<Studio>(conn, id)?
                .ok_or_else(|| QueryError::not_found("studio", id))?
                .name,
            Self::Tag(_) => Some(
                store::find::<Tag>(conn, id)?
                    .ok_or_else(|| QueryError::not_found("tag", id))?
                    .name,
            ),
        };
        Ok(name.filter(|n| !n.trim().is_empty()))
    }

    /// Create the association between a scene and this target.
    /// Returns `false` if it already existed.
    fn link(&self, tx: &Transaction<'_>, scene_id: i64) -> Result<bool, QueryError> {
        match *self {
            Self::Performer(id) => scene::add_performer(tx, scene_id, id),
            Self::Studio(id) => scene::set_studio(tx, scene_id, id),
            Self::Tag(id) => scene::add_tag(tx, scene_id, id),
        }
    }
}

impl fmt::Display for AutoTagTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.id())
    }
}

/// Counts from one task run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AutoTagStats {
    /// Scene paths checked.
    pub scanned: usize,
    /// Paths that contain the target's name.
    pub matched: usize,
    /// Associations created by this run.
    pub linked: usize,
}

/// Links one performer, studio, or tag to every scene whose path
/// contains its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoTagTask {
    pub target: AutoTagTarget,
}

impl AutoTagTask {
    pub fn new(target: AutoTagTarget) -> Self {
        Self { target }
    }

    pub fn performer(id: i64) -> Self {
        Self::new(AutoTagTarget::Performer(id))
    }

    pub fn studio(id: i64) -> Self {
        Self::new(AutoTagTarget::Studio(id))
    }

    pub fn tag(id: i64) -> Self {
        Self::new(AutoTagTarget::Tag(id))
    }

    /// Match every scene path and link the matches, in one transaction.
    ///
    /// Running a task again creates nothing new. For studios a scene that
    /// already belongs to a different studio is reassigned. If `cancel`
    /// fires mid-run the transaction is rolled back and
    /// [`AutoTagError::Cancelled`] is returned.
    pub fn run(
        &self,
        conn: &mut Connection,
        cancel: &CancellationToken,
        progress: &dyn AutoTagProgress,
    ) -> Result<AutoTagStats, AutoTagError> {
        let target = self.target;
        let Some(name) = target.load_name(conn)? else {
            log::warn!("Skipping auto-tag for {target}: it has no name");
            return Ok(AutoTagStats::default());
        };
        let matcher = NameMatcher::new(&name)?;

        let scenes = scene::all_paths(conn)?;
        let total = scenes.len();
        progress.on_start(target, &name, total);

        // Write lock taken at BEGIN; other tasks wait on busy_timeout.
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let mut stats = AutoTagStats::default();
        for (i, (scene_id, path)) in scenes.iter().enumerate() {
            if cancel.is_cancelled() {
                log::info!("Auto-tag for {target} cancelled, rolling back");
                return Err(AutoTagError::Cancelled);
            }

            stats.scanned += 1;
            if matcher.matches(path) {
                stats.matched += 1;
                if target.link(&tx, *scene_id)? {
                    log::debug!("Linked {target} to scene {scene_id} ({path})");
                    stats.linked += 1;
                }
            }
            progress.on_scene(target, i + 1, total);
        }

        if cancel.is_cancelled() {
            return Err(AutoTagError::Cancelled);
        }
        tx.commit()?;

        progress.on_complete(target, &stats);
        Ok(stats)
    }
}
