//! # API Facade
//!
//! The session controller. [`DryApi`] owns the immutable [`Session`], the
//! [`Runner`] and the mount options, and is the single entry point for every
//! command regardless of the UI driving it.
//!
//! `execute` decides whether the command needs the diary mounted and then
//! dispatches it through one exhaustive match:
//!
//! - `init` runs without a mount.
//! - `delete` is rejected before mounting.
//! - everything else runs inside [`mount::with_mounted`], which releases the
//!   mount even when the handler fails.
//!
//! Like the layers below it, the facade never prints and never exits; it
//! returns a [`CmdResult`] or a [`DryError`](crate::error::DryError).
//!
//! Generic over `Runner`: production uses `SystemRunner`, tests use
//! `ScriptedRunner` and never start a process.

use crate::commands::{self, CmdResult, Command, Session};
use crate::error::Result;
use crate::mount::{self, MountOptions};
use crate::process::Runner;
use chrono::NaiveDateTime;

pub struct DryApi<R: Runner> {
    session: Session,
    runner: R,
    options: MountOptions,
}

impl<R: Runner> DryApi<R> {
    pub fn new(session: Session, runner: R, options: MountOptions) -> Self {
        Self {
            session,
            runner,
            options,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Runs one command to completion. `now` is the local wall-clock time used
    /// for every date-derived path.
    pub fn execute(&mut self, command: &Command, now: NaiveDateTime) -> Result<CmdResult> {
        tracing::debug!(?command, diary = %self.session.diary, "executing");
        let session = &self.session;
        let options = &self.options;

        if command.needs_mount() {
            mount::with_mounted(&mut self.runner, session, options, |runner| {
                dispatch(runner, session, options, command, now)
            })
        } else {
            dispatch(&mut self.runner, session, options, command, now)
        }
    }
}

fn dispatch<R: Runner>(
    runner: &mut R,
    session: &Session,
    options: &MountOptions,
    command: &Command,
    now: NaiveDateTime,
) -> Result<CmdResult> {
    match command {
        Command::Init(args) => commands::init::run(runner, session, args, options),
        Command::New(args) => commands::new::run(runner, session, args, now),
        Command::List(args) => commands::list::run(runner, session, args, now.date()),
        Command::Show(args) => commands::show::run(runner, session, args),
        Command::Explore => commands::explore::run(runner, session),
        Command::Delete(args) => commands::delete::run(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures::{self, at};
    use crate::commands::{DeleteArgs, InitArgs, ListArgs, MessageLevel, NewArgs, ShowArgs};
    use crate::error::DryError;
    use crate::model::EntryKind;
    use crate::process::Outcome;
    use crate::test_utils::ScriptedRunner;
    use std::fs;

    fn scripted_api(runner: ScriptedRunner) -> (tempfile::TempDir, DryApi<ScriptedRunner>) {
        let (temp, session) = fixtures::session();
        (temp, DryApi::new(session, runner, MountOptions::default()))
    }

    #[test]
    fn test_new_note_end_to_end() {
        let (temp, mut api) = scripted_api(ScriptedRunner::new());
        let command = Command::New(NewArgs {
            kind: EntryKind::Note,
        });

        api.execute(&command, at(14, 22, 10)).unwrap();

        let entry = temp.path().join("d/2024/03/05/2024-03-05.org");
        assert_eq!(fs::read_to_string(&entry).unwrap(), "* 2024-03-05\n** 14:22:10\n");
        assert_eq!(api.runner().programs(), vec!["encfs", "emacsclient", "fusermount"]);
    }

    #[test]
    fn test_commands_bracketed_by_mount() {
        let commands = [
            Command::List(ListArgs::default()),
            Command::Show(ShowArgs {
                file: "x".to_string(),
            }),
            Command::Explore,
        ];
        for command in commands {
            let (_temp, mut api) = scripted_api(ScriptedRunner::new());
            api.execute(&command, at(10, 0, 0)).unwrap();

            let programs = api.runner().programs();
            assert_eq!(programs.first(), Some(&"encfs"));
            assert_eq!(programs.last(), Some(&"fusermount"));
        }
    }

    #[test]
    fn test_failed_mount_runs_no_handler() {
        let runner = ScriptedRunner::new().script("encfs", Outcome::Failed(Some(1)));
        let (temp, mut api) = scripted_api(runner);
        let command = Command::New(NewArgs {
            kind: EntryKind::Note,
        });

        let err = api.execute(&command, at(14, 22, 10)).unwrap_err();

        assert!(matches!(err, DryError::Mount(_)));
        assert_eq!(api.runner().programs(), vec!["encfs"]);
        assert!(!temp.path().join("d/2024").exists());
    }

    #[test]
    fn test_duplicate_recording_is_reported_and_unmounts() {
        let (temp, mut api) = scripted_api(ScriptedRunner::new());
        let day = temp.path().join("d/2024/03/05");
        fs::create_dir_all(&day).unwrap();
        fs::write(day.join("2024-03-05_14-22.mkv"), b"").unwrap();
        let command = Command::New(NewArgs {
            kind: EntryKind::Video,
        });

        let result = api.execute(&command, at(14, 22, 10)).unwrap();

        assert_eq!(result.messages.len(), 1);
        assert_eq!(result.messages[0].level, MessageLevel::Error);
        assert_eq!(api.runner().programs(), vec!["encfs", "fusermount"]);
    }

    #[test]
    fn test_init_holds_no_mount() {
        let (_temp, mut api) = scripted_api(ScriptedRunner::new());
        let command = Command::Init(InitArgs {
            name: "fresh".to_string(),
            storage: None,
        });

        api.execute(&command, at(10, 0, 0)).unwrap();

        let lines = api.runner().command_lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("encfs --paranoia"));
        assert!(lines[1].starts_with("fusermount -u"));
    }

    #[test]
    fn test_delete_never_mounts() {
        let (_temp, mut api) = scripted_api(ScriptedRunner::new());
        let command = Command::Delete(DeleteArgs {
            id: "2024-03-05.org".to_string(),
        });

        let err = api.execute(&command, at(10, 0, 0)).unwrap_err();

        assert!(matches!(err, DryError::Unimplemented("delete")));
        assert!(api.runner().calls.is_empty());
    }
}
