//! CLI command definitions, routing, and tracing setup.

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use tracing::info;

use benchbrief_shared::{AppConfig, init_config, load_config};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// benchbrief — LLM benchmark digests, delivered to Telegram.
#[derive(Parser)]
#[command(
    name = "benchbrief",
    version,
    about = "Fetch LLM benchmark data and send a ranked category digest to Telegram.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Fetch, rank, and deliver one digest.
    Run {
        /// Render the digest to stdout instead of sending it.
        #[arg(long)]
        dry_run: bool,

        /// Source mode override: readme or models.
        #[arg(short, long)]
        mode: Option<String>,

        /// Entries per category override.
        #[arg(long)]
        top_n: Option<usize>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "benchbrief=info",
        1 => "benchbrief=debug",
        _ => "benchbrief=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt().with_env_filter(env_filter).with_target(false).init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Run {
            dry_run,
            mode,
            top_n,
        } => cmd_run(dry_run, mode.as_deref(), top_n).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

async fn cmd_run(dry_run: bool, mode: Option<&str>, top_n: Option<usize>) -> Result<()> {
    let mut config = load_config()?;

    // CLI overrides win over the config file
    if let Some(mode) = mode {
        config.source.mode = mode.to_string();
    }
    if let Some(n) = top_n {
        config.summary.top_n = n;
    }

    info!(
        mode = %config.source.mode,
        top_n = config.summary.top_n,
        dry_run,
        "starting digest run"
    );

    if dry_run {
        let report = benchbrief_core::dry_run(&config).await?;
        println!("{}", report.text);
        return Ok(());
    }

    let report = benchbrief_core::run(&config).await?;

    println!();
    println!("  Digest delivered!");
    println!("  Files scanned:  {}", report.files_scanned);
    println!("  Models seen:    {}", report.models_seen);
    println!("  Records:        {}", report.records_extracted);
    println!("  Messages sent:  {}", report.messages_sent);
    println!("  Time:           {:.1}s", report.elapsed.as_secs_f64());
    println!();

    Ok(())
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}
