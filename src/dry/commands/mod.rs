use crate::config::{DryConfig, ToolsConfig};
use crate::error::{DryError, Result};
use crate::model::{is_valid_diary_name, DiaryPaths, EntryFormat, EntryKind};
use crate::registry::Registry;
use std::path::PathBuf;

pub mod delete;
pub mod explore;
pub mod init;
pub mod list;
pub mod new;
pub mod show;

/// Immutable per-invocation context handed to every handler.
#[derive(Debug, Clone)]
pub struct Session {
    pub storage: PathBuf,
    pub diary: String,
    pub paths: DiaryPaths,
    pub format: EntryFormat,
    pub tools: ToolsConfig,
    pub registry: Registry,
}

impl Session {
    /// Resolves the diary to work on: `diary` when given, the configured
    /// default otherwise. A registered diary is found at its recorded mount
    /// path, any other under the storage root.
    pub fn new(config: DryConfig, diary: Option<String>, registry: Registry) -> Result<Self> {
        let diary = diary.unwrap_or(config.diary);
        if !is_valid_diary_name(&diary) {
            return Err(DryError::Usage(format!("invalid diary name '{}'", diary)));
        }

        let paths = match registry.lookup(&diary) {
            Some(mount) => DiaryPaths::from_mount(mount, &diary),
            None => DiaryPaths::new(&config.storage, &diary),
        };
        Ok(Self {
            storage: config.storage,
            diary,
            paths,
            format: config.format,
            tools: config.tools,
            registry,
        })
    }
}

/// The closed set of commands. Each variant carries its validated arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Init(InitArgs),
    New(NewArgs),
    List(ListArgs),
    Show(ShowArgs),
    Explore,
    Delete(DeleteArgs),
}

impl Command {
    /// Whether the diary must be mounted while the handler runs.
    pub fn needs_mount(&self) -> bool {
        !matches!(self, Command::Init(_) | Command::Delete(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitArgs {
    pub name: String,
    /// Storage root to use instead of the configured one.
    pub storage: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewArgs {
    pub kind: EntryKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListArgs {
    pub filter: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowArgs {
    pub file: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteArgs {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    /// Files created or appended to by the command.
    pub touched: Vec<PathBuf>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_message(mut self, message: CmdMessage) -> Self {
        self.messages.push(message);
        self
    }

    pub fn touch(&mut self, path: PathBuf) {
        if !self.touched.contains(&path) {
            self.touched.push(path);
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::Session;
    use crate::config::{DryConfig, ToolsConfig};
    use crate::model::EntryFormat;
    use crate::registry::{Registry, REGISTRY_FILENAME};
    use chrono::{NaiveDate, NaiveDateTime};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    pub fn config(storage: &Path) -> DryConfig {
        DryConfig {
            storage: storage.to_path_buf(),
            diary: "d".to_string(),
            format: EntryFormat::Org,
            tools: ToolsConfig::default(),
        }
    }

    /// An empty registry inside `root`.
    pub fn registry(root: &Path) -> Registry {
        Registry::load(root.join(".dry").join(REGISTRY_FILENAME), None).unwrap()
    }

    /// A session rooted in a temp dir, with the mount point present as if the
    /// overlay had mounted it.
    pub fn session() -> (TempDir, Session) {
        let temp = TempDir::new().unwrap();
        let session = Session::new(config(temp.path()), None, registry(temp.path())).unwrap();
        fs::create_dir_all(&session.paths.encrypted).unwrap();
        fs::create_dir_all(&session.paths.mount).unwrap();
        (temp, session)
    }

    pub fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }
}
