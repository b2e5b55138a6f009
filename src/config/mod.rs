use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::form::{DeckAction, FormValues, DEFAULT_NUMBER_OF_CARDS, DEFAULT_NUMBER_OF_JOKERS};

/// Initial values for the form fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormDefaults {
    pub number_of_cards: u32,
    pub number_of_jokers: u32,
    pub deck_action: DeckAction,
}

impl Default for FormDefaults {
    fn default() -> Self {
        Self {
            number_of_cards: DEFAULT_NUMBER_OF_CARDS,
            number_of_jokers: DEFAULT_NUMBER_OF_JOKERS,
            deck_action: DeckAction::Shuffle,
        }
    }
}

impl From<FormDefaults> for FormValues {
    fn from(d: FormDefaults) -> Self {
        FormValues {
            number_of_cards: d.number_of_cards,
            number_of_jokers: d.number_of_jokers,
            deck_action: d.deck_action,
        }
    }
}

/// Hex colour overrides, e.g. `accent = "#ffc107"`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub danger: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_dim: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inactive: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Form values on startup
    #[serde(default)]
    pub defaults: FormDefaults,

    /// Fixed RNG seed for reproducible shuffles
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    #[serde(default)]
    pub theme: ThemeOverrides,
}

impl AppConfig {
    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("deckform");
        Ok(config_dir.join("config.toml"))
    }

    /// Load config from the user config dir, falling back to defaults.
    /// Read-only: nothing is written back.
    pub fn load() -> Self {
        match Self::config_path() {
            Ok(path) => Self::load_from(&path),
            Err(e) => {
                tracing::warn!("{}", e);
                AppConfig::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return AppConfig::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match Self::parse(&content) {
                Ok(config) => return config,
                Err(e) => tracing::warn!("Failed to parse config: {}", e),
            },
            Err(e) => tracing::warn!("Failed to read config: {}", e),
        }

        AppConfig::default()
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}
