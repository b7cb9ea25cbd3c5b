use crate::commands::{CmdMessage, CmdResult, Session};
use crate::error::Result;
use crate::process::Runner;
use crate::tools;

/// Hands the terminal to the file browser, rooted at the mounted diary.
pub fn run<R: Runner>(runner: &mut R, session: &Session) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let outcome = runner.run(&tools::browse(&session.tools, &session.paths.mount)?)?;
    if !outcome.is_success() {
        result.add_message(CmdMessage::warning(format!("File browser {}", outcome)));
    }
    Ok(result)
}
