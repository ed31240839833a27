//! Query settings, read from a TOML file's `[graphql]` section, with
//! defaults for everything not configured.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::{info, warn};

use crate::error::Result;

pub const DEFAULT_MAX_DEPTH: usize = 100;
pub const DEFAULT_MAX_NUMBER_OF_RESULTS: usize = 1000;
pub const DEFAULT_NUMBER_OF_RESULTS: usize = 100;

/// How requests for more than the maximum number of results are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultCountMode {
    /// Decided by the host environment: enabled in development, disabled
    /// otherwise.
    #[default]
    Default,
    /// Oversized requests are rejected.
    Enabled,
    /// Oversized requests are logged and allowed.
    Disabled,
}

impl ResultCountMode {
    /// Resolves [`ResultCountMode::Default`] for `environment`; other modes
    /// are returned unchanged.
    pub fn resolve(self, environment: HostEnvironment) -> Self {
        match self {
            Self::Default if environment.is_development() => Self::Enabled,
            Self::Default => Self::Disabled,
            other => other,
        }
    }
}

/// The environment the hosting application runs in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostEnvironment {
    Development,
    Staging,
    #[default]
    Production,
}

impl HostEnvironment {
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

impl fmt::Display for HostEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Development => "development",
            Self::Staging => "staging",
            Self::Production => "production",
        })
    }
}

impl FromStr for HostEnvironment {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "staging" => Ok(Self::Staging),
            "production" | "prod" => Ok(Self::Production),
            other => Err(format!("unknown environment '{other}'")),
        }
    }
}

/// Limits and switches consumed by the query layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct QuerySettings {
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// Upper bound on the computed query cost; unlimited when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_complexity: Option<u32>,
    /// Cost of a single field; see [`crate::DEFAULT_FIELD_IMPACT`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_impact: Option<f64>,
    #[serde(default = "default_max_number_of_results")]
    pub max_number_of_results: usize,
    #[serde(default)]
    pub max_number_of_results_validation_mode: ResultCountMode,
    #[serde(default = "default_number_of_results")]
    pub default_number_of_results: usize,
    /// Whether error details reach the caller; defaults to the development
    /// environment when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expose_exceptions: Option<bool>,
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_max_number_of_results() -> usize {
    DEFAULT_MAX_NUMBER_OF_RESULTS
}

fn default_number_of_results() -> usize {
    DEFAULT_NUMBER_OF_RESULTS
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_complexity: None,
            field_impact: None,
            max_number_of_results: DEFAULT_MAX_NUMBER_OF_RESULTS,
            max_number_of_results_validation_mode: ResultCountMode::Default,
            default_number_of_results: DEFAULT_NUMBER_OF_RESULTS,
            expose_exceptions: None,
        }
    }
}

/// Raw TOML structure of a settings file.
#[derive(Deserialize, Default)]
struct SettingsFile {
    #[serde(default)]
    graphql: QuerySettings,
}

impl QuerySettings {
    /// Parses settings from TOML text. Unknown keys are ignored; missing keys
    /// take their defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let file: SettingsFile = toml::from_str(contents)?;
        Ok(file.graphql)
    }

    /// Loads settings from `path`. A missing file yields the defaults; an
    /// unreadable or malformed file is logged and also yields the defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            info!("No query settings found at {:?}, using defaults", path);
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(contents) => match Self::from_toml_str(&contents) {
                Ok(settings) => {
                    info!("Loaded query settings from {:?}", path);
                    settings
                }
                Err(e) => {
                    warn!(
                        "Failed to parse query settings {:?}: {}. Falling back to defaults.",
                        path, e
                    );
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read query settings {:?}: {}", path, e);
                Self::default()
            }
        }
    }
}
