//! The binary is intentionally thin: argument parsing, logging and output live
//! in `cli/`, this file only calls `cli::run()` and turns an error into an exit
//! status. Usage errors are reported by clap itself (exit status 2) before
//! anything else runs.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
