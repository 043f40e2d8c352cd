use std::collections::BTreeSet;
use std::error::Error;
use std::fmt;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::classifier::HighlightRules;

const BOARD_TOML: &str = include_str!("board.toml");

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeMode {
    #[default]
    Global,
    File,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    pub grid_statuses: Vec<String>,
    pub highlight: HighlightRules,
    pub override_scope: ScopeMode,
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Toml(toml::de::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "could not read config: {}", err),
            ConfigError::Toml(err) => write!(f, "invalid config TOML: {}", err),
            ConfigError::Invalid(message) => write!(f, "invalid config: {}", message),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigError::Io(err) => Some(err),
            ConfigError::Toml(err) => Some(err),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        ConfigError::Io(value)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        ConfigError::Toml(value)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawBoardFile {
    #[serde(default)]
    grid: RawGrid,
    #[serde(default)]
    highlight: RawHighlight,
    #[serde(default)]
    overrides: RawOverrides,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawGrid {
    statuses: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawHighlight {
    approved_status: Option<String>,
    flagged_destinations: Option<Vec<String>>,
    flagged_travelers: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawOverrides {
    scope: Option<ScopeMode>,
}

impl BoardConfig {
    /// Built-in layout, then the user file on top of it when given.
    pub fn load(user_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Self::embedded()?;
        if let Some(path) = user_path {
            let raw = std::fs::read_to_string(path)?;
            config.apply(toml::from_str(&raw)?);
            config.validate()?;
            debug!(path = %path.display(), "applied user board config");
        }
        Ok(config)
    }

    pub fn embedded() -> Result<Self, ConfigError> {
        Self::from_toml(BOARD_TOML)
    }

    pub(crate) fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        let mut config = Self {
            grid_statuses: Vec::new(),
            highlight: HighlightRules {
                approved_status: String::new(),
                flagged_destinations: BTreeSet::new(),
                flagged_travelers: BTreeSet::new(),
            },
            override_scope: ScopeMode::Global,
        };
        config.apply(toml::from_str(raw)?);
        config.validate()?;
        Ok(config)
    }

    fn apply(&mut self, raw: RawBoardFile) {
        if let Some(statuses) = raw.grid.statuses {
            self.grid_statuses = statuses
                .into_iter()
                .map(|status| status.trim().to_string())
                .collect();
        }
        if let Some(approved) = raw.highlight.approved_status {
            self.highlight.approved_status = approved;
        }
        if let Some(destinations) = raw.highlight.flagged_destinations {
            self.highlight.flagged_destinations = destinations.into_iter().collect();
        }
        if let Some(travelers) = raw.highlight.flagged_travelers {
            self.highlight.flagged_travelers = travelers.into_iter().collect();
        }
        if let Some(scope) = raw.overrides.scope {
            self.override_scope = scope;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_statuses.is_empty() {
            return Err(ConfigError::Invalid(
                "grid.statuses must list at least one status".to_string(),
            ));
        }
        let mut seen = BTreeSet::new();
        for status in &self.grid_statuses {
            if status.is_empty() {
                return Err(ConfigError::Invalid(
                    "grid.statuses must not contain blank entries".to_string(),
                ));
            }
            if !seen.insert(status.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "grid.statuses lists '{}' more than once",
                    status
                )));
            }
        }
        if self.highlight.approved_status.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "highlight.approved_status is required".to_string(),
            ));
        }
        Ok(())
    }

    pub fn is_grid_status(&self, status: &str) -> bool {
        self.grid_statuses.iter().any(|known| known == status)
    }
}
