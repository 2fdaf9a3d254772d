use crate::core::itinerary::Trip;
use crate::core::schedule::{CityPrayerTimes, NightRest};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ExchangeRateProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct YahooProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub exchange_rate: Option<ExchangeRateProviderConfig>,
    pub yahoo: Option<YahooProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            exchange_rate: Some(ExchangeRateProviderConfig {
                base_url: "https://open.er-api.com".to_string(),
            }),
            yahoo: Some(YahooProviderConfig {
                base_url: "https://query1.finance.yahoo.com".to_string(),
            }),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct WheelConfig {
    #[serde(default)]
    pub night_rest: NightRest,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FxConfig {
    pub from: String,
    pub to: String,
    pub days: u32,
}

impl Default for FxConfig {
    fn default() -> Self {
        FxConfig {
            from: "JPY".to_string(),
            to: "MYR".to_string(),
            days: 30,
        }
    }
}

fn default_currency() -> String {
    "MYR".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    /// Reference currency for the grand total.
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub trips: Vec<Trip>,
    #[serde(default)]
    pub prayer_times: Vec<CityPrayerTimes>,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub wheel: WheelConfig,
    #[serde(default)]
    pub fx: FxConfig,
    pub data_path: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("my", "tripdash", "tripdash")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("my", "tripdash", "tripdash")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn theme_path(&self) -> Result<PathBuf> {
        Ok(self.default_data_path()?.join("theme.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn city(&self, name: &str) -> Option<&CityPrayerTimes> {
        self.prayer_times
            .iter()
            .find(|c| c.city.eq_ignore_ascii_case(name))
    }
}
