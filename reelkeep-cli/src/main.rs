//! reelkeep CLI
//!
//! Command-line interface for managing a library of scenes, performers,
//! studios, and tags.

mod commands;
mod error;
mod settings;

use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub(crate) use error::CliError;

#[derive(Parser)]
#[command(name = "reelkeep")]
#[command(about = "Manage a media library of scenes, performers, studios, and tags", long_about = None)]
struct Cli {
    /// Library database path (defaults to the configured path)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a scene, performer, studio, or tag
    Create {
        #[command(subcommand)]
        entity: CreateEntity,
    },

    /// Delete an entity and clear references to it
    Destroy {
        /// Entity type
        kind: EntityKind,

        /// Entity id
        id: i64,
    },

    /// Search, filter, sort, and paginate entities
    Find {
        /// Entity type
        kind: EntityKind,

        #[command(flatten)]
        find: FindArgs,
    },

    /// Link scenes to performers, studios, and tags named in their paths
    Autotag {
        /// Performer ids to auto-tag (e.g., 1,2,3)
        #[arg(long, value_delimiter = ',')]
        performers: Vec<i64>,

        /// Studio ids to auto-tag
        #[arg(long, value_delimiter = ',')]
        studios: Vec<i64>,

        /// Tag ids to auto-tag
        #[arg(long, value_delimiter = ',')]
        tags: Vec<i64>,

        /// Auto-tag every performer, studio, and tag
        #[arg(long)]
        all: bool,

        /// Number of tasks to run concurrently
        #[arg(short, long, default_value_t = 4)]
        workers: usize,
    },

    /// Show library row counts
    Stats,

    /// Manage settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum CreateEntity {
    /// Add a scene for a media file path
    Scene {
        path: String,

        /// Checksum (defaults to the MD5 of the path)
        #[arg(long)]
        checksum: Option<String>,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        details: Option<String>,

        #[arg(long)]
        url: Option<String>,

        /// Release date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        /// Rating from 1 to 5
        #[arg(long, value_parser = clap::value_parser!(i32).range(1..=5))]
        rating: Option<i32>,

        /// Studio id
        #[arg(long)]
        studio: Option<i64>,
    },

    /// Add a performer
    Performer {
        name: String,

        #[arg(long)]
        url: Option<String>,

        #[arg(long)]
        gender: Option<String>,

        #[arg(long)]
        birthdate: Option<String>,

        #[arg(long)]
        ethnicity: Option<String>,

        #[arg(long)]
        country: Option<String>,

        #[arg(long)]
        favorite: bool,
    },

    /// Add a studio
    Studio {
        name: String,

        #[arg(long)]
        url: Option<String>,
    },

    /// Add a tag
    Tag { name: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum EntityKind {
    Scene,
    Performer,
    Studio,
    Tag,
}

impl EntityKind {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Scene => "scene",
            Self::Performer => "performer",
            Self::Studio => "studio",
            Self::Tag => "tag",
        }
    }
}

/// Search, sort, and pagination flags for `find`.
#[derive(Args, Clone, Debug)]
pub(crate) struct FindArgs {
    /// Free-text search; wrap in double quotes for an exact phrase
    #[arg(short, long)]
    q: Option<String>,

    /// Page number, starting at 1
    #[arg(long)]
    page: Option<i64>,

    /// Results per page (1-120, default 25)
    #[arg(long)]
    per_page: Option<i64>,

    /// Sort key (e.g., name, path, rating, filesize, random, scenes_count)
    #[arg(long)]
    sort: Option<String>,

    /// ASC or DESC
    #[arg(long)]
    direction: Option<String>,

    /// Entity filter as JSON, e.g. '{"rating":{"modifier":"GREATER_THAN","value":3}}'
    #[arg(long)]
    filter: Option<String>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the settings file and resolved database path
    Show,

    /// Print the settings file path
    Path,

    /// Save the default database path
    SetDb {
        /// Database path; omit to clear the saved value
        path: Option<PathBuf>,
    },
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Create { entity } => commands::create::run_create(cli.db, entity),
        Commands::Destroy { kind, id } => commands::destroy::run_destroy(cli.db, kind, id),
        Commands::Find { kind, find } => commands::find::run_find(cli.db, kind, &find),
        Commands::Autotag {
            performers,
            studios,
            tags,
            all,
            workers,
        } => commands::autotag::run_autotag(cli.db, performers, studios, tags, all, workers),
        Commands::Stats => commands::stats::run_stats(cli.db),
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::run_config_show(cli.db),
            ConfigAction::Path => commands::config::run_config_path(),
            ConfigAction::SetDb { path } => commands::config::run_config_set_db(path),
        },
    };

    if let Err(e) = result {
        log::error!("{e}");
        std::process::exit(1);
    }
}

/// Install the logger. Info lines print bare; other levels carry a prefix.
fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stdout)
        .format(|buf, record| {
            if record.level() == log::Level::Info {
                writeln!(buf, "{}", record.args())
            } else {
                writeln!(
                    buf,
                    "[{}] {}",
                    record.level().as_str().to_lowercase(),
                    record.args()
                )
            }
        })
        .init();
}

/// Print an empty line through the logger.
pub(crate) fn log_blank() {
    log::info!("");
}
