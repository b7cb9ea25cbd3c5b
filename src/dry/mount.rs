//! # Mount Lifecycle
//!
//! Every command except `init` (and the unimplemented `delete`) runs against the
//! decrypted view of the diary. [`with_mounted`] brackets a handler:
//!
//! 1. The encrypted directory must exist, otherwise nothing is attempted.
//! 2. The overlay tool mounts it. If that fails the handler never runs and no
//!    unmount is attempted.
//! 3. The handler runs.
//! 4. The overlay is unmounted whatever the handler returned. Unmount failures
//!    are logged, never returned.
//!
//! No retries anywhere: each tool is invoked exactly once.

use crate::commands::Session;
use crate::error::{DryError, Result};
use crate::process::{Outcome, Runner};
use crate::tools;
use std::env;
use std::path::Path;

pub const PASSWORD_ENV: &str = "DRY_ENCFS_PASSWORD";
pub const NO_UNMOUNT_ENV: &str = "DRY_NO_UNMOUNT";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MountOptions {
    /// Handed to the overlay tool instead of prompting.
    pub password: Option<String>,
    /// Leave the diary mounted after the command.
    pub keep_mounted: bool,
}

impl MountOptions {
    pub fn from_env() -> Self {
        Self {
            password: env::var(PASSWORD_ENV).ok().filter(|p| !p.is_empty()),
            keep_mounted: env::var(NO_UNMOUNT_ENV).is_ok_and(|v| v == "1"),
        }
    }
}

pub fn mount<R: Runner>(runner: &mut R, session: &Session, options: &MountOptions) -> Result<()> {
    let paths = &session.paths;
    if !paths.encrypted.is_dir() {
        return Err(DryError::Mount(format!(
            "encrypted directory {} does not exist, run \"dry init {}\" first",
            paths.encrypted.display(),
            session.diary
        )));
    }

    let invocation = tools::mount(&paths.encrypted, &paths.mount, options.password.as_deref());
    let outcome = runner
        .run(&invocation)
        .map_err(|e| DryError::Mount(e.to_string()))?;

    match outcome {
        Outcome::Success => {
            tracing::debug!(mount = %paths.mount.display(), "diary mounted");
            Ok(())
        }
        other => Err(DryError::Mount(format!(
            "{} {} while mounting {}",
            tools::OVERLAY,
            other,
            paths.encrypted.display()
        ))),
    }
}

/// Best-effort: the outcome is only logged.
pub fn unmount<R: Runner>(runner: &mut R, mount: &Path, options: &MountOptions) {
    if options.keep_mounted {
        tracing::debug!(mount = %mount.display(), "{} set, leaving diary mounted", NO_UNMOUNT_ENV);
        return;
    }

    match runner.run(&tools::unmount(mount)) {
        Ok(Outcome::Success) => tracing::debug!(mount = %mount.display(), "diary unmounted"),
        Ok(outcome) => {
            tracing::warn!(mount = %mount.display(), "failed to unmount: {} {}", tools::UNMOUNTER, outcome)
        }
        Err(e) => tracing::warn!(mount = %mount.display(), "failed to unmount: {}", e),
    }
}

/// Runs `handler` with the diary mounted, releasing the mount afterwards even
/// when the handler fails.
pub fn with_mounted<R, T, F>(
    runner: &mut R,
    session: &Session,
    options: &MountOptions,
    handler: F,
) -> Result<T>
where
    R: Runner,
    F: FnOnce(&mut R) -> Result<T>,
{
    mount(runner, session, options)?;
    let result = handler(runner);
    unmount(runner, &session.paths.mount, options);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures;
    use crate::test_utils::ScriptedRunner;
    use std::fs;

    #[test]
    fn test_mount_runs_handler_then_unmounts() {
        let (_temp, session) = fixtures::session();
        let mut runner = ScriptedRunner::new();

        let value = with_mounted(&mut runner, &session, &MountOptions::default(), |r| {
            assert_eq!(r.programs(), vec!["encfs"]);
            Ok(42)
        })
        .unwrap();

        assert_eq!(value, 42);
        assert_eq!(runner.programs(), vec!["encfs", "fusermount"]);
        assert_eq!(
            runner.command_lines()[1],
            format!("fusermount -u {}", session.paths.mount.display())
        );
    }

    #[test]
    fn test_failed_mount_skips_handler_and_unmount() {
        let (_temp, session) = fixtures::session();
        let mut runner = ScriptedRunner::new().script("encfs", Outcome::Failed(Some(1)));
        let mut ran = false;

        let err = with_mounted(&mut runner, &session, &MountOptions::default(), |_| {
            ran = true;
            Ok(())
        })
        .unwrap_err();

        assert!(matches!(err, DryError::Mount(_)));
        assert!(!ran);
        assert_eq!(runner.programs(), vec!["encfs"]);
    }

    #[test]
    fn test_missing_overlay_tool_is_mount_error() {
        let (_temp, session) = fixtures::session();
        let mut runner = ScriptedRunner::new().missing("encfs");

        let err = mount(&mut runner, &session, &MountOptions::default()).unwrap_err();
        assert!(matches!(err, DryError::Mount(_)));
    }

    #[test]
    fn test_missing_encrypted_dir_attempts_nothing() {
        let (_temp, session) = fixtures::session();
        fs::remove_dir(&session.paths.encrypted).unwrap();
        let mut runner = ScriptedRunner::new();

        let err = with_mounted(&mut runner, &session, &MountOptions::default(), |_| Ok(()))
            .unwrap_err();

        assert!(matches!(err, DryError::Mount(ref m) if m.contains("dry init d")));
        assert!(runner.calls.is_empty());
    }

    #[test]
    fn test_handler_error_still_unmounts() {
        let (_temp, session) = fixtures::session();
        let mut runner = ScriptedRunner::new();

        let err = with_mounted(&mut runner, &session, &MountOptions::default(), |_| {
            Err::<(), _>(DryError::Tool {
                program: "emacsclient".to_string(),
                message: "not found".to_string(),
            })
        })
        .unwrap_err();

        assert!(matches!(err, DryError::Tool { .. }));
        assert_eq!(runner.programs(), vec!["encfs", "fusermount"]);
    }

    #[test]
    fn test_unmount_failure_is_not_an_error() {
        let (_temp, session) = fixtures::session();
        let mut runner = ScriptedRunner::new().script("fusermount", Outcome::Failed(Some(1)));

        let result = with_mounted(&mut runner, &session, &MountOptions::default(), |_| Ok(()));
        assert!(result.is_ok());
    }

    #[test]
    fn test_keep_mounted_and_password() {
        let (_temp, session) = fixtures::session();
        let mut runner = ScriptedRunner::new();
        let options = MountOptions {
            password: Some("pw".to_string()),
            keep_mounted: true,
        };

        with_mounted(&mut runner, &session, &options, |_| Ok(())).unwrap();

        assert_eq!(runner.programs(), vec!["encfs"]);
        assert!(runner.command_lines()[0].starts_with("encfs --stdinpass"));
        assert_eq!(runner.calls[0].stdin.as_deref(), Some("pw"));
    }
}
