use anyhow::Result;
use clap::{Parser, Subcommand};
use fxconv::core::log::init_logging;
use rust_decimal::Decimal;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    /// Path to the exchange rates file, overriding the configured one
    #[arg(short, long, global = true)]
    rates_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for fxconv::AppCommand {
    fn from(cmd: Commands) -> fxconv::AppCommand {
        match cmd {
            Commands::Serve { bind } => fxconv::AppCommand::Serve { bind },
            Commands::Rates => fxconv::AppCommand::Rates,
            Commands::Convert {
                source,
                target,
                amount,
            } => fxconv::AppCommand::Convert {
                source,
                target,
                amount,
            },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration and sample rates
    Setup,
    /// Serve the conversion endpoint (default)
    Serve {
        /// Address to bind, e.g. 0.0.0.0:8080
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Display the effective exchange rates
    Rates,
    /// Convert an amount once and exit
    Convert {
        /// Source currency code, e.g. USD
        source: String,
        /// Target currency code, e.g. INR
        target: String,
        /// Amount in the source currency
        amount: Decimal,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => fxconv::cli::setup::setup(),
        Some(cmd) => {
            fxconv::run_command(
                cmd.into(),
                cli.config_path.as_deref(),
                cli.rates_path.as_deref(),
            )
            .await
        }
        None => {
            fxconv::run_command(
                fxconv::AppCommand::Serve { bind: None },
                cli.config_path.as_deref(),
                cli.rates_path.as_deref(),
            )
            .await
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
