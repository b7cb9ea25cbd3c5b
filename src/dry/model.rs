//! Path and time derived data model.
//!
//! Nothing here is held in memory beyond a single command: a diary is a pair of
//! directories, an entry is a dated text file inside the mounted one, and a
//! recording is a dated video file next to that entry.
//!
//! ```text
//! {storage}/
//! ├── .{diary}/                       # encrypted backing directory
//! └── {diary}/                        # mount point (decrypted view)
//!     └── YYYY/MM/DD/
//!         ├── YYYY-MM-DD.org          # one entry per day
//!         └── YYYY-MM-DD_HH-MM.mkv    # recordings linked from the entry
//! ```

use chrono::{NaiveDate, NaiveDateTime};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const RECORDING_EXT: &str = "mkv";

/// What `new` adds to today's entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Note,
    Video,
}

impl FromStr for EntryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "note" => Ok(EntryKind::Note),
            "video" => Ok(EntryKind::Video),
            other => Err(format!("unknown entry kind '{}' (use 'note' or 'video')", other)),
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::Note => write!(f, "note"),
            EntryKind::Video => write!(f, "video"),
        }
    }
}

/// Markup used for entry files. Decides the extension and the heading style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryFormat {
    #[default]
    Org,
    Markdown,
    Text,
}

impl FromStr for EntryFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "org" => Ok(EntryFormat::Org),
            "markdown" | "md" => Ok(EntryFormat::Markdown),
            "text" | "txt" => Ok(EntryFormat::Text),
            _ => Err(format!("unknown entry format '{}' (use org, markdown or text)", s)),
        }
    }
}

impl EntryFormat {
    pub fn extension(self) -> &'static str {
        match self {
            EntryFormat::Org => "org",
            EntryFormat::Markdown => "md",
            EntryFormat::Text => "txt",
        }
    }

    /// Top-level heading written once when the day's entry is created.
    pub fn day_heading(self, date: NaiveDate) -> String {
        let day = date.format("%Y-%m-%d");
        match self {
            EntryFormat::Org => format!("* {}\n", day),
            EntryFormat::Markdown => format!("# {}\n", day),
            EntryFormat::Text => format!("{}\n", day),
        }
    }

    /// Second-level heading written for every note or recording.
    pub fn time_heading(self, at: NaiveDateTime) -> String {
        let time = at.format("%H:%M:%S");
        match self {
            EntryFormat::Org => format!("** {}\n", time),
            EntryFormat::Markdown => format!("## {}\n", time),
            EntryFormat::Text => format!("\t{}\n", time),
        }
    }

    /// Line referencing a recording stored next to the entry.
    pub fn file_link(self, file_name: &str) -> String {
        match self {
            EntryFormat::Org => format!("file:{}\n", file_name),
            EntryFormat::Markdown => format!("[{0}]({0})\n", file_name),
            EntryFormat::Text => format!("{}\n", file_name),
        }
    }
}

/// The two directories backing a diary under the storage root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiaryPaths {
    pub encrypted: PathBuf,
    pub mount: PathBuf,
}

impl DiaryPaths {
    pub fn new(storage: &Path, name: &str) -> Self {
        Self {
            encrypted: storage.join(format!(".{}", name)),
            mount: storage.join(name),
        }
    }

    /// Paths for a diary known by its mount point, as recorded in the registry.
    /// The encrypted directory sits next to it.
    pub fn from_mount(mount: &Path, name: &str) -> Self {
        let storage = mount.parent().unwrap_or(Path::new("/"));
        Self {
            encrypted: storage.join(format!(".{}", name)),
            mount: mount.to_path_buf(),
        }
    }

    pub fn day_dir(&self, date: NaiveDate) -> PathBuf {
        self.mount.join(date.format("%Y/%m/%d").to_string())
    }

    pub fn entry_path(&self, date: NaiveDate, format: EntryFormat) -> PathBuf {
        self.day_dir(date).join(format!(
            "{}.{}",
            date.format("%Y-%m-%d"),
            format.extension()
        ))
    }

    pub fn recording_path(&self, at: NaiveDateTime) -> PathBuf {
        self.day_dir(at.date()).join(recording_file_name(at))
    }
}

/// A diary name becomes a single path component in two places, so it must not
/// be empty, hidden or contain a separator.
pub fn is_valid_diary_name(name: &str) -> bool {
    !(name.is_empty() || name.starts_with('.') || name.contains(['/', '\\']))
}

pub fn recording_file_name(at: NaiveDateTime) -> String {
    format!("{}.{}", at.format("%Y-%m-%d_%H-%M"), RECORDING_EXT)
}
