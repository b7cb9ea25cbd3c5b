use crate::commands::{CmdMessage, CmdResult, NewArgs, Session};
use crate::error::Result;
use crate::model::{recording_file_name, EntryKind};
use crate::process::{Outcome, Runner};
use crate::tools;
use chrono::{NaiveDate, NaiveDateTime};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Adds a note or a recording to today's entry. Expects the diary mounted.
pub fn run<R: Runner>(
    runner: &mut R,
    session: &Session,
    args: &NewArgs,
    now: NaiveDateTime,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let entry = prepare_entry(session, now.date(), &mut result)?;

    match args.kind {
        EntryKind::Note => note(runner, session, &entry, now, &mut result)?,
        EntryKind::Video => video(runner, session, &entry, now, &mut result)?,
    }
    Ok(result)
}

/// Makes sure the day directory and the entry file exist. A new entry is seeded
/// with the day heading; an existing one is left alone.
pub fn prepare_entry(session: &Session, date: NaiveDate, result: &mut CmdResult) -> Result<PathBuf> {
    fs::create_dir_all(session.paths.day_dir(date))?;

    let entry = session.paths.entry_path(date, session.format);
    match OpenOptions::new().write(true).create_new(true).open(&entry) {
        Ok(mut file) => {
            file.write_all(session.format.day_heading(date).as_bytes())?;
            tracing::debug!(entry = %entry.display(), "created entry");
            result.add_message(CmdMessage::info(format!("Creating file {}", entry.display())));
            result.touch(entry.clone());
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {}
        Err(e) => return Err(e.into()),
    }
    Ok(entry)
}

fn note<R: Runner>(
    runner: &mut R,
    session: &Session,
    entry: &Path,
    now: NaiveDateTime,
    result: &mut CmdResult,
) -> Result<()> {
    append(entry, &session.format.time_heading(now))?;
    result.touch(entry.to_path_buf());

    let outcome = runner.run(&tools::editor(&session.tools, entry)?)?;
    if !outcome.is_success() {
        result.add_message(CmdMessage::warning(format!("Editor {}", outcome)));
    }
    result.add_message(CmdMessage::success(format!("Written {}", entry.display())));
    Ok(())
}

fn video<R: Runner>(
    runner: &mut R,
    session: &Session,
    entry: &Path,
    now: NaiveDateTime,
    result: &mut CmdResult,
) -> Result<()> {
    let recording = session.paths.recording_path(now);
    // Only a clock set backwards can produce a name that is already taken.
    if recording.exists() {
        result.add_message(CmdMessage::error(format!(
            "Recording {} already exists, is your system time correctly set?",
            recording.display()
        )));
        return Ok(());
    }

    let link = session.format.file_link(&recording_file_name(now));
    append(entry, &format!("{}{}", session.format.time_heading(now), link))?;
    result.touch(entry.to_path_buf());

    let outcome = runner.run(&tools::capture(&session.tools, &recording))?;
    match outcome {
        Outcome::Success | Outcome::Interrupted => {
            result.touch(recording.clone());
            result.add_message(CmdMessage::success(format!(
                "Video saved in {}",
                recording.display()
            )));
        }
        Outcome::Failed(_) => {
            result.add_message(CmdMessage::warning(format!(
                "{} {}, {} may be incomplete",
                tools::CAPTURE,
                outcome,
                recording.display()
            )));
        }
    }
    Ok(())
}

fn append(path: &Path, text: &str) -> Result<()> {
    let mut file = OpenOptions::new().append(true).open(path)?;
    file.write_all(text.as_bytes())?;
    Ok(())
}
