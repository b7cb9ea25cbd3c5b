//! Known diaries, kept in `diaries.ref`.
//!
//! `init` appends one `name : mount path` line per diary it creates, so a
//! diary created under another storage root is still found by name later.
//! A name missing from the registry falls back to the configured storage.
//!
//! The file is looked up in `./.dry/` first, then `~/.dry/`. A missing file is
//! an empty registry; it is created on the first `init`.

use crate::config::expand_tilde;
use crate::error::Result;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

pub const REGISTRY_FILENAME: &str = "diaries.ref";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    path: PathBuf,
    entries: Vec<(String, PathBuf)>,
}

impl Registry {
    pub fn load(path: PathBuf, home: Option<&Path>) -> Result<Self> {
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e.into()),
        };
        let entries = content
            .lines()
            .filter_map(|line| parse_line(line, home))
            .collect();
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Mount path of `name`. The first line for a name wins.
    pub fn lookup(&self, name: &str) -> Option<&Path> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, mount)| mount.as_path())
    }

    /// Appends `name` to the registry file, creating it if needed.
    pub fn register(&self, name: &str, mount: &Path) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{} : {}", name, mount.display())?;
        tracing::debug!(registry = %self.path.display(), name, "registered diary");
        Ok(())
    }
}

fn parse_line(line: &str, home: Option<&Path>) -> Option<(String, PathBuf)> {
    let (name, mount) = line.split_once(':')?;
    let (name, mount) = (name.trim(), mount.trim());
    if name.is_empty() || mount.is_empty() {
        return None;
    }
    Some((name.to_string(), expand_tilde(mount, home)))
}

/// `./.dry/diaries.ref` when it exists, otherwise the one under HOME.
pub fn locate(cwd: &Path, home: Option<&Path>) -> PathBuf {
    let local = cwd.join(".dry").join(REGISTRY_FILENAME);
    match home {
        Some(home) if !local.is_file() => home.join(".dry").join(REGISTRY_FILENAME),
        _ => local,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let registry = Registry::load(temp.path().join(REGISTRY_FILENAME), None).unwrap();
        assert_eq!(registry.lookup("d"), None);
    }

    #[test]
    fn test_register_then_lookup() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".dry").join(REGISTRY_FILENAME);
        let registry = Registry::load(path.clone(), None).unwrap();

        registry.register("travel", Path::new("/mnt/usb/travel")).unwrap();
        registry.register("work", Path::new("/s/work")).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "travel : /mnt/usb/travel\nwork : /s/work\n"
        );
        let reloaded = Registry::load(path, None).unwrap();
        assert_eq!(reloaded.lookup("travel"), Some(Path::new("/mnt/usb/travel")));
        assert_eq!(reloaded.lookup("work"), Some(Path::new("/s/work")));
        assert_eq!(reloaded.lookup("home"), None);
    }

    #[test]
    fn test_parse_tolerates_spacing_and_junk() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(REGISTRY_FILENAME);
        fs::write(&path, "a:/x\n\nnot a line\nb :  ~/diaries/b \na : /ignored\n").unwrap();

        let registry = Registry::load(path, Some(Path::new("/home/me"))).unwrap();
        assert_eq!(registry.lookup("a"), Some(Path::new("/x")));
        assert_eq!(registry.lookup("b"), Some(Path::new("/home/me/diaries/b")));
    }

    #[test]
    fn test_locate_prefers_local_file() {
        let temp = TempDir::new().unwrap();
        let home = temp.path().join("home");
        let cwd = temp.path().join("work");

        assert_eq!(
            locate(&cwd, Some(&home)),
            home.join(".dry").join(REGISTRY_FILENAME)
        );

        fs::create_dir_all(cwd.join(".dry")).unwrap();
        fs::write(cwd.join(".dry").join(REGISTRY_FILENAME), "").unwrap();
        assert_eq!(
            locate(&cwd, Some(&home)),
            cwd.join(".dry").join(REGISTRY_FILENAME)
        );
    }
}
