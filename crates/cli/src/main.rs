use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use turnip_core::domain::error::TurnipError;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "turnip_cli", version)]
struct Cli {
    /// Directory holding one CSV per week. Defaults to TURNIP_DATA_DIR or .turnip_cli.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Observation time (YYYY-MM-DD[ HH:MM]). Defaults to the local clock.
    #[arg(long, global = true)]
    at: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Log the price for the current half-day slot.
    Log(LogArgs),

    /// Print this week's recorded prices.
    Show,
}

#[derive(Debug, Args)]
struct LogArgs {
    /// Observed price. Must be an integer.
    #[arg(allow_hyphen_values = true)]
    price: String,

    /// Predict trending after logging the price.
    #[arg(short, long)]
    predict: bool,

    /// Forecast as a first-time buyer.
    #[arg(long)]
    first_buy: bool,

    /// Rows shown per ranking. Defaults to TURNIP_TOP_K or 3.
    #[arg(long)]
    top_k: Option<usize>,

    /// Print the prediction as JSON instead of the table.
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Parsed first so --help and usage errors never depend on the environment.
    let cli = Cli::parse();

    let settings = turnip_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    // Returning the error prints it; nothing else logs it.
    commands::run(cli, &settings).inspect_err(|err| {
        if should_report(err) {
            sentry_anyhow::capture_anyhow(err);
        }
    })
}

/// Bad user input is not worth an error report.
fn should_report(err: &anyhow::Error) -> bool {
    !matches!(
        err.downcast_ref::<TurnipError>(),
        Some(TurnipError::InvalidInput { .. })
    )
}

fn init_sentry(settings: &turnip_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
