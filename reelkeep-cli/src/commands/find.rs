use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use reelkeep_catalog::{FindFilter, FindResult, Performer, Scene, Studio, Tag};
use reelkeep_db::{Filterable, SortConfig};
use rusqlite::Connection;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{CliError, EntityKind, FindArgs};

use super::{open_library, truncate_str};

/// One-line listing of an entity.
trait Listing {
    fn id(&self) -> i64;
    fn listing(&self) -> String;
}

impl Listing for Scene {
    fn id(&self) -> i64 {
        self.id
    }

    fn listing(&self) -> String {
        let title = self.title.as_deref().unwrap_or("-");
        let rating = self
            .rating
            .map(|r| "*".repeat(r.clamp(0, 5) as usize))
            .unwrap_or_default();
        format!(
            "{:<50} {:<30} {}",
            truncate_str(&self.path, 50),
            truncate_str(title, 30),
            rating
        )
    }
}

impl Listing for Performer {
    fn id(&self) -> i64 {
        self.id
    }

    fn listing(&self) -> String {
        let name = self.name.as_deref().unwrap_or("-");
        let favorite = if self.favorite { " (favorite)" } else { "" };
        match &self.country {
            Some(country) => format!("{name}{favorite} [{country}]"),
            None => format!("{name}{favorite}"),
        }
    }
}

impl Listing for Studio {
    fn id(&self) -> i64 {
        self.id
    }

    fn listing(&self) -> String {
        let name = self.name.as_deref().unwrap_or("-");
        match &self.url {
            Some(url) => format!("{name} <{url}>"),
            None => name.to_string(),
        }
    }
}

impl Listing for Tag {
    fn id(&self) -> i64 {
        self.id
    }

    fn listing(&self) -> String {
        self.name.clone()
    }
}

impl FindArgs {
    fn find_filter(&self) -> FindFilter {
        FindFilter {
            q: self.q.clone(),
            page: self.page,
            per_page: self.per_page,
            sort: self.sort.clone(),
            direction: self.direction.clone(),
        }
    }
}

pub(crate) fn run_find(
    db: Option<PathBuf>,
    kind: EntityKind,
    args: &FindArgs,
) -> Result<(), CliError> {
    let (_, conn) = open_library(db)?;
    let config = SortConfig::random();

    match kind {
        EntityKind::Scene => find_entities::<Scene>(&conn, &config, kind, args),
        EntityKind::Performer => find_entities::<Performer>(&conn, &config, kind, args),
        EntityKind::Studio => find_entities::<Studio>(&conn, &config, kind, args),
        EntityKind::Tag => find_entities::<Tag>(&conn, &config, kind, args),
    }
}

fn find_entities<T>(
    conn: &Connection,
    config: &SortConfig,
    kind: EntityKind,
    args: &FindArgs,
) -> Result<(), CliError>
where
    T: Filterable + Listing + Serialize,
    T::Filter: DeserializeOwned,
{
    let filter = parse_filter::<T::Filter>(args.filter.as_deref())?;
    let find = args.find_filter();

    let result = reelkeep_db::query::<T>(conn, config, filter.as_ref(), Some(&find))?;

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .map_err(|e| CliError::other(format!("Failed to serialize result: {}", e)))?;
        log::info!("{json}");
        return Ok(());
    }

    print_result(&result, &find, kind);
    Ok(())
}

fn parse_filter<F: DeserializeOwned>(json: Option<&str>) -> Result<Option<F>, CliError> {
    json.map(|s| {
        serde_json::from_str::<F>(s)
            .map_err(|e| CliError::invalid_input(format!("Invalid --filter JSON: {}", e)))
    })
    .transpose()
}

fn print_result<T: Listing>(result: &FindResult<T>, find: &FindFilter, kind: EntityKind) {
    if result.items.is_empty() {
        log::info!(
            "{}",
            format!("No {}s found ({} total)", kind.as_str(), result.count)
                .if_supports_color(Stdout, |t| t.dimmed()),
        );
        return;
    }

    for item in &result.items {
        log::info!(
            "  {:>6}  {}",
            format!("#{}", item.id()).if_supports_color(Stdout, |t| t.cyan()),
            item.listing(),
        );
    }
    crate::log_blank();

    let first = find.offset().saturating_add(1);
    let last = find.offset().saturating_add(result.items.len() as i64);
    log::info!(
        "{} {}-{} of {} (page {}, {} per page)",
        "Showing".if_supports_color(Stdout, |t| t.bold()),
        first,
        last,
        result.count,
        find.page(),
        find.per_page(),
    );
}
