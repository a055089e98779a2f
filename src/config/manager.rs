use super::{
    alerts::AlertConfig, indicators::IndicatorConfig, thresholds::SignalThresholds,
    traits::ConfigSection, view::ViewConfig, watchlist::WatchlistConfig,
};
use crate::error::SignalboardError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock};

/// Prefix for environment overrides, e.g. `SIGNALBOARD__THRESHOLDS__RSI_BUY_CEILING=70`.
pub const ENV_PREFIX: &str = "SIGNALBOARD";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub indicators: IndicatorConfig,
    pub thresholds: SignalThresholds,
    pub alerts: AlertConfig,
    pub view: ViewConfig,
    pub watchlist: WatchlistConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), SignalboardError> {
        self.indicators.validate()?;
        self.thresholds.validate()?;
        self.alerts.validate()?;
        self.view.validate()?;
        self.watchlist.validate()?;
        Ok(())
    }
}

pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(AppConfig::default())),
        }
    }

    /// Layered load: defaults, then the optional file, then `SIGNALBOARD__*`
    /// environment variables.
    pub fn load(&self, path: Option<&Path>) -> Result<(), SignalboardError> {
        let mut builder = ::config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(::config::File::from(path).required(true));
        }
        builder = builder.add_source(Self::environment());

        let config = Self::finish(builder)?;
        self.replace(config)
    }

    /// Load from an in-memory TOML document (environment overrides still apply).
    pub fn load_from_str(&self, contents: &str) -> Result<(), SignalboardError> {
        let builder = ::config::Config::builder()
            .add_source(::config::File::from_str(contents, ::config::FileFormat::Toml))
            .add_source(Self::environment());

        let config = Self::finish(builder)?;
        self.replace(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), SignalboardError> {
        let config = self.get();
        let toml_str = toml::to_string_pretty(&config)
            .map_err(|e| SignalboardError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)
            .map_err(|e| SignalboardError::Configuration(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    pub fn get(&self) -> AppConfig {
        match self.config.read() {
            Ok(config) => config.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Apply `f` to a copy and keep it only if it still validates.
    pub fn update<F>(&self, f: F) -> Result<(), SignalboardError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut candidate = self.get();
        f(&mut candidate);
        self.replace(candidate)
    }

    fn replace(&self, config: AppConfig) -> Result<(), SignalboardError> {
        config.validate()?;
        let mut guard = self
            .config
            .write()
            .map_err(|_| SignalboardError::Configuration("Config lock poisoned".to_string()))?;
        *guard = config;
        Ok(())
    }

    fn environment() -> ::config::Environment {
        ::config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
    }

    fn finish(
        builder: ::config::ConfigBuilder<::config::builder::DefaultState>,
    ) -> Result<AppConfig, SignalboardError> {
        let settings = builder.build()?;
        let config: AppConfig = settings.try_deserialize()?;
        log::debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }
}
