use crate::core::config::{AppConfig, DEFAULT_RATES_FILE};
use anyhow::{Context, Result};
use std::path::Path;

// Sample rates shipped in the binary
const EXAMPLE_RATES: &str = include_str!("../../docs/ExchangeRates.json");

const CONFIG_HEADER: &str = "# Configuration file for fxconv\n\
# Environment variables named like a pair key (e.g. USD_TO_INR) override that rate.\n";

/// Creates a default configuration and sample rates file in the default config directory
pub fn setup() -> Result<()> {
    let dir = AppConfig::default_config_dir()?;
    setup_at_dir(dir)
}

/// Creates `config.yaml` and a sample rates file inside `dir`
pub fn setup_at_dir<P: AsRef<Path>>(dir: P) -> Result<()> {
    let dir = dir.as_ref();
    let config_path = dir.join("config.yaml");
    let rates_path = dir.join(DEFAULT_RATES_FILE);

    for path in [&config_path, &rates_path] {
        if path.exists() {
            anyhow::bail!("File already exists at {}", path.display());
        }
    }

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    std::fs::write(&rates_path, EXAMPLE_RATES)
        .with_context(|| format!("Failed to write rates file to {}", rates_path.display()))?;

    let config = AppConfig {
        rates_path: rates_path.clone(),
        ..AppConfig::default()
    };
    let config_yaml = serde_yaml::to_string(&config).context("Failed to serialize config")?;
    std::fs::write(&config_path, format!("{CONFIG_HEADER}{config_yaml}"))
        .with_context(|| format!("Failed to write config file to {}", config_path.display()))?;

    tracing::info!("Created default configuration at {}", config_path.display());
    tracing::info!("Created sample exchange rates at {}", rates_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::load_base_rates;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_setup_creates_config_and_rates() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let dir = temp_dir.path().join("fxconv");

        setup_at_dir(&dir)?;

        let config = AppConfig::load_from_path(dir.join("config.yaml"))?;
        assert_eq!(config.rates_path, dir.join(DEFAULT_RATES_FILE));
        assert_eq!(config.bind_address, AppConfig::default().bind_address);

        let content = fs::read_to_string(dir.join("config.yaml"))?;
        assert!(content.starts_with("# Configuration file for fxconv"));

        let rates = load_base_rates(&config.rates_path)?;
        assert!(rates.contains_key("USD_TO_INR"));

        Ok(())
    }

    #[test]
    fn test_setup_fails_if_config_exists() -> Result<()> {
        let temp_dir = TempDir::new()?;
        std::fs::write(temp_dir.path().join("config.yaml"), "test")?;

        let result = setup_at_dir(temp_dir.path());
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("already exists"));
        assert!(!temp_dir.path().join(DEFAULT_RATES_FILE).exists());

        Ok(())
    }

    #[test]
    fn test_example_files_are_valid() -> Result<()> {
        let example_config = include_str!("../../docs/example_config.yaml");
        let config: AppConfig = serde_yaml::from_str(example_config)
            .context("Failed to parse example config as YAML")?;
        assert_eq!(config, AppConfig::default());

        let rates: std::collections::HashMap<String, serde_json::Number> =
            serde_json::from_str(EXAMPLE_RATES)?;
        assert!(rates.keys().all(|k| k.contains("_TO_")));

        Ok(())
    }
}
