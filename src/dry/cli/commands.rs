use super::print::print_messages;
use super::setup::Cli;
use chrono::Local;
use clap::Parser;
use dry::api::DryApi;
use dry::commands::Session;
use dry::config::{self, DryConfig, CONFIG_ENV};
use dry::error::Result;
use dry::mount::MountOptions;
use dry::process::SystemRunner;
use dry::registry::{self, Registry};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let diary = cli.command.diary().map(str::to_string);
    let mut api = init_api(cli.config, diary)?;
    let command = cli.command.into_command();
    let result = api.execute(&command, Local::now().naive_local())?;

    for path in &result.touched {
        tracing::debug!(path = %path.display(), "written");
    }
    print_messages(&result.messages);
    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "dry=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn init_api(
    explicit_config: Option<PathBuf>,
    diary: Option<String>,
) -> Result<DryApi<SystemRunner>> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let home = config::home_dir();
    let explicit = explicit_config.or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

    let path = config::locate(explicit, &cwd, home.as_deref())?;
    let config = DryConfig::load(&path, home.as_deref())?;
    let registry = Registry::load(registry::locate(&cwd, home.as_deref()), home.as_deref())?;

    let api = DryApi::new(
        Session::new(config, diary, registry)?,
        SystemRunner,
        MountOptions::from_env(),
    );
    let session = api.session();
    tracing::debug!(
        diary = %session.diary,
        mount = %session.paths.mount.display(),
        registry = %session.registry.path().display(),
        "session"
    );
    Ok(api)
}
