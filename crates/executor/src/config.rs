use arb_solver_core::CycleExtraction;
use config::{Config as ConfigLoader, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, fmt};

use super::error::Error;

#[derive(Debug, Deserialize, Clone)]
pub struct DetectorConfig {
    pub threshold_pct: f64,
    #[serde(default)]
    pub extraction: CycleExtraction,
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

fn default_parallel() -> bool {
    true
}

#[derive(Debug, Deserialize, Clone)]
pub struct MarketConfig {
    /// Ordered currency symbols; position defines the vertex index.
    pub currencies: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SimulatorConfig {
    pub seed: Option<u64>,
    pub spread_bps: f64,
    pub inject_profit_pct: Option<f64>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ReportConfig {
    pub json_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl LoggingConfig {
    /// Initialize the tracing subscriber. `RUST_LOG` takes precedence over `level`.
    pub fn init(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        match self.format.as_str() {
            "json" => fmt().json().with_env_filter(filter).init(),
            _ => fmt().with_env_filter(filter).init(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub detector: DetectorConfig,
    pub market: MarketConfig,
    pub simulator: SimulatorConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Default location of the config file, relative to the workspace root.
fn default_config_path() -> Result<PathBuf, Error> {
    let base_path = env::current_dir().map_err(|e| {
        Error::ConfigLoadError(format!("Failed to determine current directory: {}", e))
    })?;

    Ok(base_path
        .join("crates")
        .join("executor")
        .join("Config.toml"))
}

/// Loads configuration from a file and `EXECUTOR_*` environment variables.
///
/// Nested keys are separated by `__`, e.g. `EXECUTOR_DETECTOR__THRESHOLD_PCT=0.5`.
/// `EXECUTOR_MARKET__CURRENCIES` accepts a comma-separated list.
pub fn load_config(path: Option<&Path>) -> Result<Config, Error> {
    let config_file_path = match path {
        Some(path) => path.to_path_buf(),
        None => default_config_path()?,
    };

    if !config_file_path.exists() {
        return Err(Error::ConfigLoadError(format!(
            "Configuration file not found at calculated path: {}",
            config_file_path.display()
        )));
    }

    let s = ConfigLoader::builder()
        .add_source(File::from(config_file_path.as_path()).required(true))
        .add_source(
            Environment::with_prefix("EXECUTOR")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("market.currencies"),
        )
        .build()
        .map_err(|e| Error::ConfigLoadError(e.to_string()))?;

    let app_config: Config = s
        .try_deserialize()
        .map_err(|e| Error::ConfigLoadError(format!("Failed to deserialize config: {}", e)))?;

    if !app_config.detector.threshold_pct.is_finite() {
        return Err(Error::ConfigLoadError(
            "detector.threshold_pct must be a finite number".to_string(),
        ));
    }

    Ok(app_config)
}
