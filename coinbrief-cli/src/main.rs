//! Coinbrief CLI - crypto market briefings from the command line

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use coinbrief_core::agents::{SearchAgent, WriterAgent};
use coinbrief_core::config::CoinbriefConfig;
use coinbrief_core::llm::LLMProviderFactory;
use coinbrief_core::manager::CryptoNewsManager;
use coinbrief_core::status::Printer;

#[derive(Parser)]
#[command(name = "coinbrief")]
#[command(about = "Crypto market news briefings", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file read instead of coinbrief.toml; COINBRIEF_* variables still apply
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log status changes instead of drawing live spinners
    #[arg(long, global = true)]
    plain: bool,

    /// Log at info level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Produce one report (default)
    Run(OutputArgs),
    /// Produce a report repeatedly
    Watch {
        #[command(flatten)]
        output: OutputArgs,

        /// Seconds to wait between runs
        #[arg(long)]
        interval_secs: Option<u64>,

        /// Stop after this many runs
        #[arg(long)]
        max_runs: Option<usize>,
    },
    /// Version information
    Version,
}

#[derive(Args, Default)]
struct OutputArgs {
    /// Report path; `{timestamp}` is replaced with the UTC run time
    #[arg(short, long)]
    output: Option<String>,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<CoinbriefConfig> {
    let config = match path {
        Some(path) => CoinbriefConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => CoinbriefConfig::load().context("loading configuration")?,
    };
    Ok(config)
}

fn build_manager(config: CoinbriefConfig, plain: bool) -> Result<CryptoNewsManager> {
    let search_provider =
        LLMProviderFactory::create(&config.search).context("creating search provider")?;
    let writer_provider =
        LLMProviderFactory::create(&config.writer).context("creating writer provider")?;

    let printer = if plain {
        Printer::log()
    } else {
        Printer::console()
    };

    Ok(CryptoNewsManager::new(
        config,
        Arc::new(SearchAgent::new(search_provider)),
        Arc::new(WriterAgent::new(writer_provider)),
        printer,
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose || cli.plain);

    let command = cli.command.unwrap_or(Commands::Run(OutputArgs::default()));

    match command {
        Commands::Version => {
            println!("coinbrief {}", env!("CARGO_PKG_VERSION"));
            println!("coinbrief-core {}", coinbrief_core::VERSION);
        }
        Commands::Run(args) => {
            let mut config = load_config(cli.config.as_ref())?;
            if let Some(output) = args.output {
                config.report.output_path = output;
            }
            config.validate()?;

            let mut manager = build_manager(config, cli.plain)?;
            let outcome = manager.run().await?;
            tracing::info!(
                trace_id = %outcome.trace_id,
                path = %outcome.path.display(),
                "Report saved"
            );
        }
        Commands::Watch {
            output,
            interval_secs,
            max_runs,
        } => {
            let mut config = load_config(cli.config.as_ref())?;
            if let Some(output) = output.output {
                config.report.output_path = output;
            }
            if let Some(secs) = interval_secs {
                config.monitor.interval = Duration::from_secs(secs);
            }
            config.validate()?;

            let mut manager = build_manager(config, cli.plain)?;
            let runs = manager.monitor(max_runs).await?;
            tracing::info!(runs, "Monitoring finished");
        }
    }

    Ok(())
}
