//! Command lines for the external collaborators.
//!
//! Building is kept apart from running so every argument vector can be checked
//! in tests without the tools installed.

use crate::config::ToolsConfig;
use crate::error::Result;
use crate::process::Invocation;
use std::path::Path;

pub const OVERLAY: &str = "encfs";
pub const UNMOUNTER: &str = "fusermount";
pub const CAPTURE: &str = "ffmpeg";

/// Mounts the encrypted directory onto the mount point. With a password the
/// prompt is skipped and the password is fed on stdin (`--stdinpass`).
pub fn mount(encrypted: &Path, mount: &Path, password: Option<&str>) -> Invocation {
    let inv = Invocation::new(OVERLAY);
    let inv = match password {
        Some(pw) => inv.arg("--stdinpass").stdin(pw),
        None => inv,
    };
    inv.arg(encrypted).arg(mount)
}

pub fn unmount(mount: &Path) -> Invocation {
    Invocation::new(UNMOUNTER).arg("-u").arg(mount)
}

/// Creates a new encrypted directory in paranoia mode.
pub fn init(encrypted: &Path, mount: &Path) -> Invocation {
    Invocation::new(OVERLAY)
        .arg("--paranoia")
        .arg(encrypted)
        .arg(mount)
}

pub fn editor(tools: &ToolsConfig, file: &Path) -> Result<Invocation> {
    Ok(Invocation::from_command_line(&tools.editor)?.arg(file))
}

/// Webcam plus microphone into a Matroska file, with a live preview window.
/// Runs until interrupted.
pub fn capture(tools: &ToolsConfig, output: &Path) -> Invocation {
    Invocation::new(CAPTURE)
        .args(["-f", "v4l2"])
        .args(["-framerate", "30"])
        .args(["-video_size", "1024x768"])
        .args(["-input_format", "mjpeg"])
        .arg("-i")
        .arg(&tools.video_device)
        .args(["-f", "pulse", "-ac", "1"])
        .arg("-i")
        .arg(&tools.audio_device)
        .args(["-c:a", "pcm_s16le"])
        .args(["-c:v", "mjpeg", "-b:v", "64000k"])
        .arg(output)
        .args(["-map", "0:v", "-vf", "format=yuv420p", "-f", "xv", "display"])
        .interruptible()
}

pub fn list(tools: &ToolsConfig, dir: &Path, long: bool) -> Result<Invocation> {
    let inv = Invocation::from_command_line(&tools.lister)?;
    let inv = if long { inv.arg("-l") } else { inv };
    Ok(inv.arg(dir))
}

pub fn browse(tools: &ToolsConfig, root: &Path) -> Result<Invocation> {
    Ok(Invocation::from_command_line(&tools.browser)?.arg(root))
}
