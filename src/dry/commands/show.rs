use crate::commands::{CmdMessage, CmdResult, ShowArgs, Session};
use crate::error::Result;
use crate::process::Runner;
use crate::tools;

/// Long listing of the diary's top-level directory.
///
/// The file identifier is accepted but not used yet: every `show` lists the
/// diary root.
pub fn run<R: Runner>(runner: &mut R, session: &Session, args: &ShowArgs) -> Result<CmdResult> {
    tracing::debug!(file = %args.file, "show ignores the file identifier, listing diary root");

    let mut result = CmdResult::default();
    let outcome = runner.run(&tools::list(&session.tools, &session.paths.mount, true)?)?;
    if !outcome.is_success() {
        result.add_message(CmdMessage::warning(format!("Listing {}", outcome)));
    }
    Ok(result)
}
