use anyhow::{Result, ensure};
use serde::Deserialize;
use slog::{Logger, error, info};
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub diagnostics: DiagnosticsConfig,
    pub stats: StatsConfig,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DiagnosticsConfig {
    // Whether classifier events are logged (at debug level).  Aborts are always logged.
    pub enabled: bool,

    // Budget shared by classifier events and abort warnings, per one second window.
    pub max_events_per_second: u64,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_events_per_second: 100,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct StatsConfig {
    pub dump_interval_secs: u64,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            dump_interval_secs: 5,
        }
    }
}

impl Config {
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        ensure!(
            self.diagnostics.max_events_per_second > 0,
            "diagnostics.max_events_per_second must be at least 1"
        );
        ensure!(
            self.stats.dump_interval_secs > 0,
            "stats.dump_interval_secs must be at least 1"
        );
        Ok(())
    }

    pub fn stats_interval(&self) -> Duration {
        Duration::from_secs(self.stats.dump_interval_secs)
    }
}

/// Load the configuration from a TOML file.
pub fn load_config_file(filename: &Path, logger: &Logger) -> Result<Config> {
    let path = std::env::current_dir()?;
    let contents = fs::read_to_string(filename).inspect_err(|e| {
        error!(
            logger,
            "Failed to load config file {} (current directory {}) with error code {e}",
            filename.display(),
            path.display()
        )
    })?;
    let config = Config::from_toml(&contents)?;
    info!(logger, "Loaded config from {}: {:?}", filename.display(), config);
    Ok(config)
}
