//! # CLI Layer
//!
//! One possible UI client for the session controller. It is the only place
//! that knows about terminal output, logging setup and exit codes.
//!
//! Flow for every invocation:
//!
//! 1. clap parses the arguments into `setup::Commands`; bad or missing
//!    arguments end here with usage text and exit status 2.
//! 2. Logging is set up: `warn` by default, `debug` with `-v`, `RUST_LOG`
//!    overrides both.
//! 3. The config file is located and loaded, and a `DryApi` is built with the
//!    system runner and mount options from the environment.
//! 4. The command is executed with the current local time and its messages
//!    are printed.
//!
//! ## Module Structure
//!
//! - `commands`: `run()`, context wiring, logging
//! - `setup`: argument parsing via clap, version string
//! - `print`: colored message output

mod commands;
mod print;
pub mod setup;

pub use commands::run;
