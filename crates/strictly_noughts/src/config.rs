//! Session configuration.

use crate::{Difficulty, Mark, ParticipantCount};
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Configuration applied when a session starts.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Number of human participants (0, 1 or 2).
    #[serde(default)]
    participants: ParticipantCount,

    /// Strength of the automated participant.
    #[serde(default)]
    difficulty: Difficulty,

    /// Cosmetic pause before an automated move lands, in milliseconds.
    #[serde(default = "default_think_delay_ms")]
    think_delay_ms: u64,

    /// Mark played by the human in one-participant games.
    #[serde(default = "default_human_mark")]
    human_mark: Mark,

    /// Seed for the random strategy.
    #[serde(default)]
    seed: Option<u64>,
}

#[instrument]
fn default_think_delay_ms() -> u64 {
    150
}

#[instrument]
fn default_human_mark() -> Mark {
    Mark::X
}

impl SessionConfig {
    /// Creates a configuration with defaults for everything but the
    /// participant count.
    #[instrument]
    pub fn new(participants: ParticipantCount) -> Self {
        Self {
            participants,
            difficulty: Difficulty::default(),
            think_delay_ms: default_think_delay_ms(),
            human_mark: default_human_mark(),
            seed: None,
        }
    }

    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        let config = Self::from_toml(&content)?;
        info!(
            participants = %config.participants,
            difficulty = %config.difficulty,
            "Config loaded successfully"
        );
        Ok(config)
    }

    /// Parses configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))
    }

    /// Think delay as a [`Duration`].
    pub fn think_delay(&self) -> Duration {
        Duration::from_millis(self.think_delay_ms)
    }

    /// Sets the participant count.
    pub fn with_participants(mut self, participants: ParticipantCount) -> Self {
        self.participants = participants;
        self
    }

    /// Sets the difficulty.
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Sets the think delay in milliseconds.
    pub fn with_think_delay_ms(mut self, think_delay_ms: u64) -> Self {
        self.think_delay_ms = think_delay_ms;
        self
    }

    /// Sets the human's mark.
    pub fn with_human_mark(mut self, human_mark: Mark) -> Self {
        self.human_mark = human_mark;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new(ParticipantCount::default())
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
