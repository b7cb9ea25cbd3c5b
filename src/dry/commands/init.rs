use crate::commands::{CmdMessage, CmdResult, InitArgs, Session};
use crate::error::{DryError, Result};
use crate::model::{is_valid_diary_name, DiaryPaths};
use crate::mount::{self, MountOptions};
use crate::process::{Outcome, Runner};
use crate::tools;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Creates a new encrypted diary and records it in the registry. Runs without
/// a mount held; the overlay tool leaves the fresh diary mounted, so it is
/// released afterwards.
///
/// If the overlay tool fails, the directories created here are removed again
/// so that a later `init` with the same name can start over.
pub fn run<R: Runner>(
    runner: &mut R,
    session: &Session,
    args: &InitArgs,
    options: &MountOptions,
) -> Result<CmdResult> {
    if !is_valid_diary_name(&args.name) {
        return Err(DryError::Usage(format!("invalid diary name '{}'", args.name)));
    }

    let storage = args.storage.as_deref().unwrap_or(session.storage.as_path());
    let paths = DiaryPaths::new(storage, &args.name);

    let existing = session
        .registry
        .lookup(&args.name)
        .or_else(|| paths.encrypted.is_dir().then_some(paths.encrypted.as_path()));
    if let Some(existing) = existing {
        return Ok(CmdResult::default().with_message(CmdMessage::warning(format!(
            "Diary {} already exists at {}",
            args.name,
            existing.display()
        ))));
    }

    fs::create_dir_all(storage)?;
    let created_encrypted = create_private_dir(&paths.encrypted)?;
    let created_mount = create_private_dir(&paths.mount)?;

    let failure = match runner.run(&tools::init(&paths.encrypted, &paths.mount)) {
        Ok(Outcome::Success) => None,
        Ok(outcome) => Some(DryError::Tool {
            program: tools::OVERLAY.to_string(),
            message: format!("{} while creating {}", outcome, paths.encrypted.display()),
        }),
        Err(e) => Some(e),
    };
    if let Some(err) = failure {
        if created_mount {
            discard(&paths.mount, fs::remove_dir(&paths.mount));
        }
        if created_encrypted {
            discard(&paths.encrypted, fs::remove_dir_all(&paths.encrypted));
        }
        return Err(err);
    }

    mount::unmount(runner, &paths.mount, options);
    session.registry.register(&args.name, &paths.mount)?;

    let mut result = CmdResult::default();
    result.touch(paths.encrypted.clone());
    result.touch(session.registry.path().to_path_buf());
    result.add_message(CmdMessage::success(format!(
        "Created new diary {} at {}",
        args.name,
        paths.mount.display()
    )));
    Ok(result)
}

/// Creates `dir` readable by the owner only. Returns false when it was
/// already there.
fn create_private_dir(dir: &Path) -> Result<bool> {
    #[cfg_attr(not(unix), allow(unused_mut))]
    let mut builder = fs::DirBuilder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    match builder.create(dir) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(e.into()),
    }
}

fn discard(dir: &Path, removed: std::io::Result<()>) {
    if let Err(e) = removed {
        tracing::warn!(dir = %dir.display(), "could not remove after failed init: {}", e);
    }
}
