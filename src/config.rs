use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::utils::TravelError;

pub const CACHE_DIR_ENV: &str = "TOTRAVEL_CACHE_DIR";

/// Application configuration, read from a JSON file when one is given.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Passport index dataset (tidy CSV with ISO-2 codes).
    pub dataset_url: String,
    /// Flag CDN country code to name map.
    pub codes_url: String,
    /// Where the JSON caches of the dataset and country names live.
    pub cache_dir: PathBuf,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    pub passport_warning_months: u32,
    pub visa_warning_months: u32,
    pub visa_warning_days: i64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            dataset_url: "https://raw.githubusercontent.com/ilyankou/passport-index-dataset/master/passport-index-tidy-iso2.csv".to_string(),
            codes_url: "https://flagcdn.com/en/codes.json".to_string(),
            cache_dir: PathBuf::from(".totravel-cache"),
            log_level: "info".to_string(),
            passport_warning_months: 6,
            visa_warning_months: 3,
            visa_warning_days: 90,
        }
    }
}

impl Config {
    /// Load configuration from `path`, falling back to defaults when no file
    /// exists. `TOTRAVEL_CACHE_DIR` overrides the cache directory.
    pub fn load(path: Option<&Path>) -> Result<Config, TravelError> {
        let mut config = match path {
            Some(path) if path.exists() => {
                let text = fs::read_to_string(path)?;
                serde_json::from_str::<Config>(&text).map_err(|e| {
                    TravelError::Config(format!("{}: {}", path.display(), e))
                })?
            }
            _ => Config::default(),
        };

        if let Ok(dir) = std::env::var(CACHE_DIR_ENV) {
            if !dir.trim().is_empty() {
                config.cache_dir = PathBuf::from(dir);
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), TravelError> {
        if self.log_level.parse::<log::LevelFilter>().is_err() {
            return Err(TravelError::Config(format!(
                "unknown log level: {}",
                self.log_level
            )));
        }
        if self.visa_warning_days <= 0 {
            return Err(TravelError::Config(
                "visa_warning_days must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn dataset_cache_path(&self) -> PathBuf {
        self.cache_dir.join("countryAccessData.json")
    }

    pub fn codes_cache_path(&self) -> PathBuf {
        self.cache_dir.join("countryCodes.json")
    }
}
