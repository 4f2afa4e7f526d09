//! Configuration file and environment variable handling.
//!
//! Settings are read from `timeline.toml` (every section optional) and then
//! overridden by environment variables.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Locale;
use serde::{Deserialize, Serialize};

use crate::error::{TimelineError, TimelineResult};
use crate::models::{Granularity, PeriodAnchor};
use crate::services::autosave::DEFAULT_DEBOUNCE;
use crate::services::periods::parse_locale;

/// File name searched for by [`TimelineConfig::load`].
pub const CONFIG_FILE_NAME: &str = "timeline.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimelineConfig {
    #[serde(default)]
    pub timeline: TimelineSettings,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub autosave: AutoSaveSettings,
}

/// Projection defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineSettings {
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default)]
    pub default_granularity: Granularity,
    #[serde(default)]
    pub anchor: PeriodAnchor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoSaveSettings {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Draft file written by the server; drafts are disabled when unset
    #[serde(default)]
    pub path: Option<PathBuf>,
}

fn default_locale() -> String {
    "en_US".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE.as_millis() as u64
}

impl Default for TimelineSettings {
    fn default() -> Self {
        Self {
            locale: default_locale(),
            default_granularity: Granularity::default(),
            anchor: PeriodAnchor::default(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for AutoSaveSettings {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            path: None,
        }
    }
}

impl TimelineConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> TimelineResult<Self> {
        let config: TimelineConfig = toml::from_str(content).map_err(|e| {
            TimelineError::Configuration(format!("Failed to parse config file: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> TimelineResult<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            TimelineError::Configuration(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_toml(&content)
    }

    /// Locate `timeline.toml`.
    ///
    /// Searches:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    pub fn find_config_file() -> Option<PathBuf> {
        [
            PathBuf::from(CONFIG_FILE_NAME),
            Path::new("backend").join(CONFIG_FILE_NAME),
            Path::new("..").join(CONFIG_FILE_NAME),
        ]
        .into_iter()
        .find(|p| p.is_file())
    }

    /// File configuration (or defaults when no file exists) with environment
    /// overrides applied.
    pub fn load() -> TimelineResult<Self> {
        let base = match Self::find_config_file() {
            Some(path) => {
                log::debug!("Loading configuration from {}", path.display());
                Self::from_file(path)?
            }
            None => Self::default(),
        };
        base.with_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides from a variable lookup.
    ///
    /// # Variables
    /// - `TIMELINE_LOCALE`: label locale, e.g. `en_US`
    /// - `TIMELINE_GRANULARITY`: `weekly` | `monthly` | `quarterly`
    /// - `TIMELINE_ANCHOR`: `start` | `end`
    /// - `AUTOSAVE_DEBOUNCE_MS`: quiet period in milliseconds
    /// - `AUTOSAVE_PATH`: draft file, empty to disable drafts
    /// - `HOST`, `PORT`: server bind address
    pub fn with_overrides<F>(mut self, lookup: F) -> TimelineResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(locale) = lookup("TIMELINE_LOCALE") {
            self.timeline.locale = locale;
        }
        if let Some(granularity) = lookup("TIMELINE_GRANULARITY") {
            self.timeline.default_granularity = granularity.parse()?;
        }
        if let Some(anchor) = lookup("TIMELINE_ANCHOR") {
            self.timeline.anchor = anchor.parse()?;
        }
        if let Some(ms) = lookup("AUTOSAVE_DEBOUNCE_MS") {
            self.autosave.debounce_ms = ms.trim().parse().map_err(|_| {
                TimelineError::Configuration("AUTOSAVE_DEBOUNCE_MS must be a number of milliseconds".to_string())
            })?;
        }
        if let Some(path) = lookup("AUTOSAVE_PATH") {
            let path = path.trim();
            self.autosave.path = (!path.is_empty()).then(|| PathBuf::from(path));
        }
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port.trim().parse().map_err(|_| {
                TimelineError::Configuration("PORT must be a valid port number".to_string())
            })?;
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> TimelineResult<()> {
        parse_locale(&self.timeline.locale)?;
        if self.server.host.trim().is_empty() {
            return Err(TimelineError::Configuration(
                "server.host must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn locale(&self) -> TimelineResult<Locale> {
        parse_locale(&self.timeline.locale)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.autosave.debounce_ms)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[timeline]
locale = "fr_FR"
default_granularity = "quarterly"
anchor = "end"

[server]
host = "127.0.0.1"
port = 9000

[autosave]
debounce_ms = 250
path = "/var/lib/timeline/draft.json"
"#;

        let config = TimelineConfig::from_toml(toml).unwrap();
        assert_eq!(config.locale().unwrap(), Locale::fr_FR);
        assert_eq!(config.timeline.default_granularity, Granularity::Quarterly);
        assert_eq!(config.timeline.anchor, PeriodAnchor::End);
        assert_eq!(config.bind_addr(), "127.0.0.1:9000");
        assert_eq!(config.debounce(), Duration::from_millis(250));
        assert_eq!(
            config.autosave.path.as_deref(),
            Some(Path::new("/var/lib/timeline/draft.json"))
        );
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TimelineConfig::from_toml("").unwrap();
        assert_eq!(config, TimelineConfig::default());
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
        assert_eq!(config.timeline.default_granularity, Granularity::Monthly);
    }

    #[test]
    fn test_unknown_locale_rejected() {
        let toml = r#"
[timeline]
locale = "zz_ZZ"
"#;
        assert!(matches!(
            TimelineConfig::from_toml(toml),
            Err(TimelineError::UnknownLocale(_))
        ));
    }

    #[test]
    fn test_bad_granularity_is_parse_error() {
        let toml = r#"
[timeline]
default_granularity = "daily"
"#;
        assert!(matches!(
            TimelineConfig::from_toml(toml),
            Err(TimelineError::Configuration(_))
        ));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("TIMELINE_GRANULARITY", "weekly"),
            ("TIMELINE_ANCHOR", "end"),
            ("PORT", "3000"),
            ("AUTOSAVE_DEBOUNCE_MS", "1500"),
            ("AUTOSAVE_PATH", "drafts/current.json"),
        ]
        .into_iter()
        .collect();

        let config = TimelineConfig::default()
            .with_overrides(|k| vars.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.timeline.default_granularity, Granularity::Weekly);
        assert_eq!(config.timeline.anchor, PeriodAnchor::End);
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.debounce(), Duration::from_millis(1500));
        assert_eq!(config.autosave.path, Some(PathBuf::from("drafts/current.json")));

        let disabled = config
            .with_overrides(|k| (k == "AUTOSAVE_PATH").then(|| " ".to_string()))
            .unwrap();
        assert_eq!(disabled.autosave.path, None);
    }

    #[test]
    fn test_invalid_override_values() {
        let bad_port = TimelineConfig::default().with_overrides(|k| (k == "PORT").then(|| "http".to_string()));
        assert!(matches!(bad_port, Err(TimelineError::Configuration(_))));

        let bad_granularity = TimelineConfig::default()
            .with_overrides(|k| (k == "TIMELINE_GRANULARITY").then(|| "hourly".to_string()));
        assert!(matches!(bad_granularity, Err(TimelineError::UnknownGranularity(_))));
    }
}
