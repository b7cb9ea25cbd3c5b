use crate::commands::{CmdResult, DeleteArgs};
use crate::error::{DryError, Result};

/// `delete` is part of the command set but has no behavior yet. It fails
/// before anything is mounted or touched.
pub fn run(args: &DeleteArgs) -> Result<CmdResult> {
    tracing::debug!(id = %args.id, "delete requested");
    Err(DryError::Unimplemented("delete"))
}
