use clap::{Parser, Subcommand};
use dry::commands::{Command, DeleteArgs, InitArgs, ListArgs, NewArgs, ShowArgs};
use dry::model::EntryKind;
use std::path::PathBuf;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format: "1.0.0" for releases, "1.0.0@abc1234 2024-01-15" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "dry", bin_name = "dry", version = get_version())]
#[command(about = "DiaRY is a CLI journaling utility", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Show verbose log
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file to use instead of the usual lookup
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Init new diary
    #[command(display_order = 1)]
    Init {
        /// Name of new diary
        name: String,

        /// Storage directory (defaults to the configured one)
        path: Option<PathBuf>,
    },

    /// Add a note or a video with the current date and time
    #[command(alias = "n", display_order = 2)]
    New {
        /// What to add: note or video
        #[arg(value_name = "note|video")]
        kind: EntryKind,

        /// Diary to use instead of the default one
        name: Option<String>,
    },

    /// List entries by day
    #[command(alias = "ls", display_order = 3)]
    List {
        /// today (default), yesterday, tomorrow or a date (YYYY-MM-DD)
        filter: Option<String>,

        /// Diary to use instead of the default one
        name: Option<String>,
    },

    /// Show entries
    #[command(display_order = 4)]
    Show {
        /// Entry to show
        file: String,

        /// Diary to use instead of the default one
        name: Option<String>,
    },

    /// Explore the diary with the file browser
    #[command(display_order = 5)]
    Explore {
        /// Diary to use instead of the default one
        name: Option<String>,
    },

    /// Delete specified entry
    #[command(alias = "rm", display_order = 6)]
    Delete {
        /// Entry to delete
        id: String,

        /// Diary to use instead of the default one
        name: Option<String>,
    },
}

impl Commands {
    /// The diary named on the command line, if any. `init` names the diary it
    /// creates, not the one to open.
    pub fn diary(&self) -> Option<&str> {
        match self {
            Commands::Init { .. } => None,
            Commands::New { name, .. }
            | Commands::List { name, .. }
            | Commands::Show { name, .. }
            | Commands::Explore { name }
            | Commands::Delete { name, .. } => name.as_deref(),
        }
    }

    pub fn into_command(self) -> Command {
        match self {
            Commands::Init { name, path } => Command::Init(InitArgs {
                name,
                storage: path,
            }),
            Commands::New { kind, .. } => Command::New(NewArgs { kind }),
            Commands::List { filter, .. } => Command::List(ListArgs { filter }),
            Commands::Show { file, .. } => Command::Show(ShowArgs { file }),
            Commands::Explore { .. } => Command::Explore,
            Commands::Delete { id, .. } => Command::Delete(DeleteArgs { id }),
        }
    }
}
