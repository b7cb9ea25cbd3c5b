//! # Dry Architecture
//!
//! Dry ("DiaRY") keeps dated notes and webcam recordings inside an encrypted,
//! per-diary filesystem. It does no real work itself: encryption, editing,
//! capture, listing and browsing are all external programs. What this crate
//! owns is the session around them: which diary, which paths, when the diary
//! is mounted, and that it is always released again.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, sets up logging, prints messages       │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Holds the Session, the Runner and mount options          │
//! │  - Brackets commands with mount / unmount                   │
//! │  - One exhaustive match over the Command enum               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - One handler per command                                  │
//! │  - Works on paths, a clock value and a Runner               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Process Layer (tools.rs, process.rs)                       │
//! │  - Builds external command lines                            │
//! │  - Runner trait: SystemRunner (production),                 │
//! │    ScriptedRunner (testing)                                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## No I/O Assumptions in Core
//!
//! From `api.rs` inward, code returns `Result<CmdResult>` and never prints or
//! exits. Time is passed in rather than read, so handlers are deterministic.
//! The only side effects are the entry files and the external processes, and
//! the latter go through the [`process::Runner`] seam.
//!
//! ## Module Overview
//!
//! - [`api`]: the session controller
//! - [`commands`]: handlers, the `Command` enum, `Session` and `CmdResult`
//! - [`mount`]: mount lifecycle around a handler
//! - [`tools`]: command lines for encfs, ffmpeg, the editor, lister and browser
//! - [`process`]: running external programs
//! - [`model`]: diary paths, entry formats, entry kinds
//! - [`config`]: locating and loading `dry.conf`
//! - [`registry`]: diaries created with `init`, found by name
//! - [`error`]: error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod model;
pub mod mount;
pub mod process;
pub mod registry;
pub mod tools;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
