use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use reelkeep_catalog::{Performer, Scene, Studio, Tag};
use reelkeep_db::{QueryError, destroy};

use crate::{CliError, EntityKind};

use super::open_library;

pub(crate) fn run_destroy(db: Option<PathBuf>, kind: EntityKind, id: i64) -> Result<(), CliError> {
    let (_, mut conn) = open_library(db)?;
    let tx = conn.transaction().map_err(QueryError::from)?;

    let result = match kind {
        EntityKind::Scene => destroy::<Scene>(&tx, id),
        EntityKind::Performer => destroy::<Performer>(&tx, id),
        EntityKind::Studio => destroy::<Studio>(&tx, id),
        EntityKind::Tag => destroy::<Tag>(&tx, id),
    };
    match result {
        Ok(()) => {}
        Err(QueryError::NotFound { entity_type, id }) => {
            return Err(CliError::invalid_input(format!(
                "No {} with id {}",
                entity_type, id
            )));
        }
        Err(e) => return Err(e.into()),
    }

    tx.commit().map_err(QueryError::from)?;

    log::info!(
        "{} {} #{}",
        "Deleted".if_supports_color(Stdout, |t| t.red()),
        kind.as_str(),
        id,
    );
    Ok(())
}
