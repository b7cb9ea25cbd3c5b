use crate::error::{DryError, Result};
use crate::model::EntryFormat;
use directories::BaseDirs;
use ini::{Ini, Properties};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "dry.conf";
pub const CONFIG_ENV: &str = "DRY_CONFIG";

const DEFAULTS_SECTION: &str = "Defaults";
const TOOLS_SECTION: &str = "Tools";

/// Resolved configuration, loaded once per invocation.
///
/// On disk this is an INI file with a mandatory `[Defaults]` section and an
/// optional `[Tools]` section. Keys are case-insensitive and values may be bare
/// or quoted:
///
/// ```ini
/// [Defaults]
/// Storage = ~/diaries
/// Diary = journal
/// Format = org
///
/// [Tools]
/// Editor = emacsclient -t
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DryConfig {
    pub storage: PathBuf,
    pub diary: String,
    pub format: EntryFormat,
    pub tools: ToolsConfig,
}

/// Command lines for the external programs. Split on whitespace; the first
/// word is the program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolsConfig {
    pub editor: String,
    pub lister: String,
    pub browser: String,
    pub video_device: String,
    pub audio_device: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            editor: "emacsclient -t".to_string(),
            lister: "exa".to_string(),
            browser: "ranger".to_string(),
            video_device: "/dev/video0".to_string(),
            audio_device: "default".to_string(),
        }
    }
}

impl ToolsConfig {
    fn from_section(section: Option<&Properties>) -> Self {
        let mut tools = Self::default();
        let Some(section) = section else {
            return tools;
        };
        let fields = [
            ("Editor", &mut tools.editor),
            ("Lister", &mut tools.lister),
            ("Browser", &mut tools.browser),
            ("VideoDevice", &mut tools.video_device),
            ("AudioDevice", &mut tools.audio_device),
        ];
        for (key, field) in fields {
            if let Some(value) = value_of(section, key) {
                *field = value.to_string();
            }
        }
        tools
    }
}

impl DryConfig {
    /// Parses config text. `home` is used to expand a leading `~` in `Storage`.
    pub fn parse(content: &str, home: Option<&Path>) -> Result<Self> {
        let ini = Ini::load_from_str(content)?;
        let defaults = ini.section(Some(DEFAULTS_SECTION)).ok_or_else(|| {
            DryError::Config(format!("missing [{}] section", DEFAULTS_SECTION))
        })?;

        let required = |key: &str| {
            value_of(defaults, key).ok_or_else(|| {
                DryError::Config(format!("missing '{}' in [{}]", key, DEFAULTS_SECTION))
            })
        };
        let storage = required("Storage")?;
        let diary = required("Diary")?;

        let format = match value_of(defaults, "Format") {
            Some(format) => format.parse().map_err(DryError::Config)?,
            None => EntryFormat::default(),
        };

        Ok(Self {
            storage: expand_tilde(storage, home),
            diary: diary.to_string(),
            format,
            tools: ToolsConfig::from_section(ini.section(Some(TOOLS_SECTION))),
        })
    }

    /// Loads the config file at `path`. A missing file is a config error.
    pub fn load<P: AsRef<Path>>(path: P, home: Option<&Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => {
                DryError::Config(format!("config file {} not found", path.display()))
            }
            _ => DryError::Io(e),
        })?;
        tracing::debug!(path = %path.display(), "loaded config");
        Self::parse(&content, home)
    }
}

/// Non-empty value of `key`, matched case-insensitively.
fn value_of<'a>(section: &'a Properties, key: &str) -> Option<&'a str> {
    section
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, v)| v.trim())
        .filter(|v| !v.is_empty())
}

/// Candidate config locations, in lookup order.
pub fn candidates(cwd: &Path, home: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = vec![
        cwd.join(CONFIG_FILENAME),
        cwd.join(".dry").join(CONFIG_FILENAME),
    ];
    if let Some(home) = home {
        paths.push(home.join(".dry").join(CONFIG_FILENAME));
    }
    paths.push(PathBuf::from("/etc/dry").join(CONFIG_FILENAME));
    paths
}

/// Finds the config file: an explicit path wins, otherwise the first existing
/// candidate.
pub fn locate(explicit: Option<PathBuf>, cwd: &Path, home: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }

    let searched = candidates(cwd, home);
    if let Some(found) = searched.iter().find(|p| p.is_file()) {
        return Ok(found.clone());
    }

    let list = searched
        .iter()
        .map(|p| format!("  {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");
    Err(DryError::Config(format!(
        "can't find config file, create one of:\n{}",
        list
    )))
}

pub fn home_dir() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
}

pub fn expand_tilde(path: &str, home: Option<&Path>) -> PathBuf {
    match (path.strip_prefix('~'), home) {
        (Some(""), Some(home)) => home.to_path_buf(),
        (Some(rest), Some(home)) if rest.starts_with('/') => home.join(&rest[1..]),
        _ => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MINIMAL: &str = "[Defaults]\nStorage = /tmp/s\nDiary = d\n";

    #[test]
    fn test_parse_minimal() {
        let config = DryConfig::parse(MINIMAL, None).unwrap();
        assert_eq!(config.storage, PathBuf::from("/tmp/s"));
        assert_eq!(config.diary, "d");
        assert_eq!(config.format, EntryFormat::Org);
        assert_eq!(config.tools, ToolsConfig::default());
    }

    #[test]
    fn test_parse_full() {
        let content = r#"
[Defaults]
Storage = ~/diaries
Diary = journal
Format = markdown

[Tools]
Editor = vim
Browser = nnn -d
"#;
        let config = DryConfig::parse(content, Some(Path::new("/home/me"))).unwrap();
        assert_eq!(config.storage, PathBuf::from("/home/me/diaries"));
        assert_eq!(config.format, EntryFormat::Markdown);
        assert_eq!(config.tools.editor, "vim");
        assert_eq!(config.tools.browser, "nnn -d");
        assert_eq!(config.tools.lister, "exa");
    }

    #[test]
    fn test_quoted_values_and_key_case() {
        let content = "[Defaults]\nstorage = \"/tmp/s\"\nDIARY = \"d\"\n\n[Tools]\nvideodevice = /dev/video2\n";
        let config = DryConfig::parse(content, None).unwrap();
        assert_eq!(config.storage, PathBuf::from("/tmp/s"));
        assert_eq!(config.diary, "d");
        assert_eq!(config.tools.video_device, "/dev/video2");
    }

    #[test]
    fn test_missing_defaults_section() {
        let err = DryConfig::parse("[Tools]\nEditor = vim\n", None).unwrap_err();
        assert!(matches!(err, DryError::Config(ref m) if m.contains("[Defaults]")));
    }

    #[test]
    fn test_missing_keys() {
        let err = DryConfig::parse("[Defaults]\nDiary = d\n", None).unwrap_err();
        assert!(matches!(err, DryError::Config(ref m) if m.contains("Storage")));

        let err = DryConfig::parse("[Defaults]\nStorage = /s\nDiary =\n", None).unwrap_err();
        assert!(matches!(err, DryError::Config(ref m) if m.contains("Diary")));
    }

    #[test]
    fn test_unknown_format() {
        let err = DryConfig::parse("[Defaults]\nStorage = /s\nDiary = d\nFormat = rst\n", None)
            .unwrap_err();
        assert!(matches!(err, DryError::Config(ref m) if m.contains("rst")));
    }

    #[test]
    fn test_malformed() {
        let err = DryConfig::parse("[Defaults\nStorage", None).unwrap_err();
        assert!(matches!(err, DryError::ConfigParse(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = DryConfig::load(temp.path().join("dry.conf"), None).unwrap_err();
        assert!(matches!(err, DryError::Config(ref m) if m.contains("not found")));
    }

    #[test]
    fn test_locate_prefers_working_directory() {
        let temp = TempDir::new().unwrap();
        let home = temp.path().join("home");
        fs::create_dir_all(home.join(".dry")).unwrap();
        fs::write(home.join(".dry").join(CONFIG_FILENAME), MINIMAL).unwrap();

        let found = locate(None, temp.path(), Some(&home)).unwrap();
        assert_eq!(found, home.join(".dry").join(CONFIG_FILENAME));

        fs::write(temp.path().join(CONFIG_FILENAME), MINIMAL).unwrap();
        let found = locate(None, temp.path(), Some(&home)).unwrap();
        assert_eq!(found, temp.path().join(CONFIG_FILENAME));
    }

    #[test]
    fn test_locate_explicit_path() {
        let explicit = PathBuf::from("/nowhere/custom.conf");
        let found = locate(Some(explicit.clone()), Path::new("/"), None).unwrap();
        assert_eq!(found, explicit);
    }

    #[test]
    fn test_expand_tilde() {
        let home = Path::new("/home/me");
        assert_eq!(expand_tilde("~", Some(home)), PathBuf::from("/home/me"));
        assert_eq!(expand_tilde("~/d", Some(home)), PathBuf::from("/home/me/d"));
        assert_eq!(expand_tilde("~other/d", Some(home)), PathBuf::from("~other/d"));
        assert_eq!(expand_tilde("/abs", Some(home)), PathBuf::from("/abs"));
        assert_eq!(expand_tilde("~/d", None), PathBuf::from("~/d"));
    }
}
