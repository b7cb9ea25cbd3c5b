//! # External Processes
//!
//! Every piece of real work is done by another program. This module is the
//! single seam through which they are launched: commands build an
//! [`Invocation`], hand it to a [`Runner`], and get back an [`Outcome`].
//!
//! - [`SystemRunner`]: production runner, inherits the terminal and blocks
//!   until the child exits.
//! - `test_utils::ScriptedRunner`: records invocations and returns scripted
//!   outcomes, so the mount lifecycle and handlers are testable without encfs,
//!   ffmpeg or an editor installed.

use crate::error::{DryError, Result};
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::io::Write;
use std::process::{Command, ExitStatus, Stdio};

/// A fully built external command line.
#[derive(Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<OsString>,
    /// Written to the child's stdin as one line. Never part of the command line.
    pub stdin: Option<String>,
    /// An interrupt (Ctrl-C) is the expected way to end this process.
    pub interruptible: bool,
}

impl fmt::Debug for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invocation")
            .field("program", &self.program)
            .field("args", &self.args)
            .field("stdin", &self.stdin.as_ref().map(|_| "<hidden>"))
            .field("interruptible", &self.interruptible)
            .finish()
    }
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            stdin: None,
            interruptible: false,
        }
    }

    /// Builds an invocation from a configured command string such as
    /// `"emacsclient -t"`.
    pub fn from_command_line(line: &str) -> Result<Self> {
        let mut words = line.split_whitespace();
        let program = words
            .next()
            .ok_or_else(|| DryError::Config("empty tool command".to_string()))?;
        Ok(Self::new(program).args(words))
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, A>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    pub fn stdin(mut self, input: impl Into<String>) -> Self {
        self.stdin = Some(input.into());
        self
    }

    pub fn interruptible(mut self) -> Self {
        self.interruptible = true;
        self
    }

    /// Space-joined rendering, for logs and assertions.
    pub fn command_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(&arg.to_string_lossy());
        }
        line
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failed(Option<i32>),
    Interrupted,
}

impl Outcome {
    pub fn is_success(self) -> bool {
        self == Outcome::Success
    }

    fn from_status(status: ExitStatus, interruptible: bool) -> Self {
        if status.success() {
            return Outcome::Success;
        }

        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if status.signal() == Some(libc::SIGINT) {
                return Outcome::Interrupted;
            }
        }

        // ffmpeg catches SIGINT itself, finalizes the file and exits with 255.
        if interruptible && status.code() == Some(255) {
            return Outcome::Interrupted;
        }

        Outcome::Failed(status.code())
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success => write!(f, "succeeded"),
            Outcome::Failed(Some(code)) => write!(f, "exited with status {}", code),
            Outcome::Failed(None) => write!(f, "was terminated by a signal"),
            Outcome::Interrupted => write!(f, "was interrupted"),
        }
    }
}

/// Launches external programs. Generic seam so commands can be tested with a
/// scripted runner.
pub trait Runner {
    /// Runs the invocation to completion, blocking the caller.
    ///
    /// Only a failure to launch is an error; a non-zero exit is reported
    /// through [`Outcome`] and judged by the caller.
    fn run(&mut self, invocation: &Invocation) -> Result<Outcome>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl Runner for SystemRunner {
    fn run(&mut self, invocation: &Invocation) -> Result<Outcome> {
        tracing::debug!(command = %invocation.command_line(), "running external tool");

        let launch_error = |e: std::io::Error| DryError::Tool {
            program: invocation.program.clone(),
            message: e.to_string(),
        };

        let mut command = Command::new(&invocation.program);
        command.args(&invocation.args);
        if invocation.stdin.is_some() {
            command.stdin(Stdio::piped());
        }
        if invocation.interruptible {
            restore_sigint_in_child(&mut command);
        }

        // Held from before spawn until the child is reaped.
        let _guard = invocation.interruptible.then(SigintGuard::ignore);
        let mut child = command.spawn().map_err(launch_error)?;

        if let (Some(input), Some(mut pipe)) = (&invocation.stdin, child.stdin.take()) {
            // A child that exits without reading closes the pipe; its status says why.
            if let Err(e) = writeln!(pipe, "{}", input) {
                tracing::debug!(program = %invocation.program, error = %e, "stdin not consumed");
            }
        }

        let status = child.wait().map_err(launch_error)?;

        let outcome = Outcome::from_status(status, invocation.interruptible);
        tracing::debug!(program = %invocation.program, ?outcome, "external tool finished");
        Ok(outcome)
    }
}

/// The parent ignores SIGINT while an interruptible child runs, and an ignored
/// disposition survives exec, so the child puts the default back itself.
#[cfg(unix)]
fn restore_sigint_in_child(command: &mut Command) {
    use std::os::unix::process::CommandExt;
    // SAFETY: the hook runs between fork and exec and only calls signal(2),
    // which is async-signal-safe.
    unsafe {
        command.pre_exec(|| {
            libc::signal(libc::SIGINT, libc::SIG_DFL);
            Ok(())
        });
    }
}

#[cfg(not(unix))]
fn restore_sigint_in_child(_command: &mut Command) {}

/// Keeps this process alive through Ctrl-C while a child is in the foreground.
#[cfg(unix)]
struct SigintGuard {
    previous: libc::sighandler_t,
}

#[cfg(unix)]
impl SigintGuard {
    fn ignore() -> Self {
        // SAFETY: swapping the disposition of SIGINT for SIG_IGN installs no
        // Rust code as a handler.
        let previous = unsafe { libc::signal(libc::SIGINT, libc::SIG_IGN) };
        let previous = if previous == libc::SIG_ERR {
            libc::SIG_DFL
        } else {
            previous
        };
        Self { previous }
    }
}

#[cfg(unix)]
impl Drop for SigintGuard {
    fn drop(&mut self) {
        // SAFETY: restores the disposition captured in `ignore`.
        unsafe {
            libc::signal(libc::SIGINT, self.previous);
        }
    }
}

#[cfg(not(unix))]
struct SigintGuard;

#[cfg(not(unix))]
impl SigintGuard {
    fn ignore() -> Self {
        SigintGuard
    }
}
