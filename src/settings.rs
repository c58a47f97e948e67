use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Knobs a front-end may tune; none of them change the rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// How long the AI "thinks" before answering. Zero answers immediately.
    pub ai_delay_ms: u64,
    pub ai_name: String,
    pub player_one_default: String,
    pub player_two_default: String,
    /// Fixes the AI's random choices, e.g. for replays.
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ai_delay_ms: 500,
            ai_name: "AI".to_string(),
            player_one_default: "Player 1".to_string(),
            player_two_default: "Player 2".to_string(),
            seed: None,
        }
    }
}

impl Settings {
    /// Replaces blank name labels with the built-in ones; a player's name is
    /// never empty.
    pub fn with_builtin_labels(mut self) -> Self {
        let builtin = Settings::default();
        for (label, fallback) in [
            (&mut self.ai_name, builtin.ai_name),
            (&mut self.player_one_default, builtin.player_one_default),
            (&mut self.player_two_default, builtin.player_two_default),
        ] {
            if label.trim().is_empty() {
                warn!(%fallback, "blank name label in settings");
                *label = fallback;
            }
        }
        self
    }

    /// Reads a RON settings file. Fields left out keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::ReadSettings {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = ron::from_str::<Settings>(&text)
            .map_err(|source| Error::ParseSettings {
                path: path.to_path_buf(),
                source,
            })?
            .with_builtin_labels();
        debug!(path = %path.display(), ?settings, "settings loaded");
        Ok(settings)
    }
}
