use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use iq_cleanup::config::{parse_timeout, AppConfig, PresetParameters, RunConfig};
use iq_cleanup::console::{Console, TerminalConsole};
use iq_cleanup::error::AppError;
use iq_cleanup::telemetry;
use iq_cleanup::workflows::cleanup::{CleanupService, IqServerClient};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "iq-cleanup",
    about = "Delete Sonatype IQ Server applications whose latest scan predates a cutoff",
    version
)]
struct Cli {
    /// IQ Server base URL, e.g. http://localhost:8070
    #[arg(long)]
    server_url: Option<String>,
    /// Account used for basic authentication (the password is read from IQ_PASSWORD or prompted)
    #[arg(long)]
    username: Option<String>,
    /// Applications last scanned before this date (YYYY-MM-DD) are deleted
    #[arg(long)]
    cutoff_date: Option<String>,
    /// Per-request HTTP timeout in seconds
    #[arg(long, value_parser = parse_timeout_secs)]
    timeout_secs: Option<Duration>,
    /// List the applications that would be deleted without deleting anything
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    fn presets(&self) -> PresetParameters {
        PresetParameters {
            server_url: non_blank(&self.server_url),
            username: non_blank(&self.username),
            password: None,
            cutoff_date: non_blank(&self.cutoff_date),
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value.clone().filter(|value| !value.trim().is_empty())
}

fn parse_timeout_secs(raw: &str) -> Result<Duration, String> {
    parse_timeout(raw).map_err(|err| err.to_string())
}

fn main() {
    if let Err(err) = run_cli() {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let mut config = AppConfig::load()?;
    if let Some(timeout) = cli.timeout_secs {
        config.http.timeout = timeout;
    }
    telemetry::init(&config.telemetry)?;

    let mut console = TerminalConsole::new();
    console.say("--- Sonatype IQ Server Application Cleanup ---");

    let presets = config.presets.overridden_by(cli.presets());
    let run = RunConfig::resolve(presets, config.http, cli.dry_run, &mut console)?;
    info!(
        server = %run.server_url,
        cutoff = %run.cutoff,
        dry_run = run.dry_run,
        "configuration resolved"
    );

    let client = IqServerClient::connect(run.connection())?;
    CleanupService::new(Arc::new(client), run.cutoff)
        .with_dry_run(run.dry_run)
        .run(&mut console)?;

    Ok(())
}
