pub mod cli;
pub mod core;
pub mod server;

use crate::core::config::AppConfig;
use crate::core::{ConversionRequest, RateTable};
use anyhow::Result;
use rust_decimal::Decimal;
use std::path::PathBuf;
use tracing::{debug, info};

pub enum AppCommand {
    /// Serve HTTP, optionally on an address other than the configured one
    Serve { bind: Option<String> },
    Rates,
    Convert {
        source: String,
        target: String,
        amount: Decimal,
    },
}

/// Resolves the effective configuration from an optional config file and an
/// optional rates file override.
pub fn load_config(config_path: Option<&str>, rates_path: Option<&str>) -> Result<AppConfig> {
    let mut config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    if let Some(path) = rates_path {
        config.rates_path = PathBuf::from(path);
    }
    debug!("Loaded config: {config:#?}");
    Ok(config)
}

/// Builds the rate table once. The result is read-only from here on.
pub fn build_table(config: &AppConfig) -> RateTable {
    info!(path = %config.rates_path.display(), "Loading exchange rates");
    crate::core::load_rate_table(&config.rates_path)
}

pub async fn run_command(
    command: AppCommand,
    config_path: Option<&str>,
    rates_path: Option<&str>,
) -> Result<()> {
    let config = load_config(config_path, rates_path)?;
    let table = build_table(&config);

    match command {
        AppCommand::Serve { bind } => {
            info!("Currency converter starting...");
            let bind_address = bind.unwrap_or(config.bind_address);
            let app = server::build_app(table);
            server::bind_and_serve(&bind_address, app).await
        }
        AppCommand::Rates => {
            cli::rates::run(&table);
            Ok(())
        }
        AppCommand::Convert {
            source,
            target,
            amount,
        } => {
            let request = ConversionRequest {
                source_currency: source,
                target_currency: target,
                amount,
            };
            cli::convert::run(&table, &request).map(|_| ())
        }
    }
}
