mod cli;
mod error;
mod prompt;
mod ui;

use std::process::ExitCode;

use clap::Parser;
use dialoguer::theme::ColorfulTheme;
use tracing_subscriber::EnvFilter;

use wpsite_core::{MySqlProvisioner, Provisioner, SystemRunner};

use crate::cli::Cli;
use crate::error::{CliError, exit_code};

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.verbose);

    // Report the single pipeline result and map it to an exit code
    match run(cli).await {
        Ok(()) => ExitCode::from(exit_code::SUCCESS),
        Err(err) => {
            let code = err.exit_code();
            eprintln!("{:?}", miette::Report::new(err));
            ExitCode::from(code)
        }
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[allow(clippy::future_not_send)]
async fn run(cli: Cli) -> Result<(), CliError> {
    let color = ui::apply_color_mode(cli.color);

    // Configuration problems surface before any prompt is shown
    let config_path = cli.config.unwrap_or_else(wpsite_config::config_path);
    let config = wpsite_config::load_config_from(&config_path)
        .map_err(|e| CliError::config(&config_path, &e))?;
    let cwd = std::env::current_dir()?;
    let provision = wpsite_config::to_provision_config(&config, &cwd)
        .map_err(|e| CliError::config(&config_path, &e))?;
    tracing::debug!(
        config = %config_path.display(),
        workdir = %provision.workdir.display(),
        "configuration loaded"
    );

    ui::clear_screen();
    ui::intro(color);

    let theme = ColorfulTheme::default();
    let site = prompt::collect_site(&theme)?;

    let database = MySqlProvisioner::new(provision.database.clone());
    let provisioner = Provisioner::new(provision, SystemRunner, database);
    let reporter = ui::ProgressReporter::new(color, cli.quiet);

    let report = provisioner.provision(&site, &reporter).await?;
    ui::outro(&report, color);
    Ok(())
}
