//! Difficulty modes and their tuning rows.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub const ALL: [Self; 3] = [Self::Easy, Self::Normal, Self::Hard];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Normal => "normal",
            Self::Hard => "hard",
        }
    }

    /// Built-in tuning row.
    #[must_use]
    pub const fn preset(self) -> DifficultySettings {
        match self {
            Self::Easy => DifficultySettings {
                starting_money: 600.0,
                event_multiplier: 0.5,
                health_regen_bonus: 5,
                weather_harshness: 1.0,
            },
            Self::Normal => DifficultySettings {
                starting_money: 400.0,
                event_multiplier: 1.0,
                health_regen_bonus: 0,
                weather_harshness: 1.0,
            },
            Self::Hard => DifficultySettings {
                starting_money: 300.0,
                event_multiplier: 1.5,
                health_regen_bonus: -3,
                weather_harshness: 1.5,
            },
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "normal" => Ok(Self::Normal),
            "hard" => Ok(Self::Hard),
            _ => Err(()),
        }
    }
}

/// Multiplier bundle fixed for the life of a game.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultySettings {
    pub starting_money: f64,
    /// Scales every per-day event chance.
    pub event_multiplier: f64,
    /// Added to the base heal of a rest day.
    pub health_regen_bonus: i32,
    /// Scales harmful weather health effects.
    pub weather_harshness: f64,
}

impl Default for DifficultySettings {
    fn default() -> Self {
        Difficulty::Normal.preset()
    }
}

impl DifficultySettings {
    const MAX_EVENT_MULTIPLIER: f64 = 2.5;

    /// Validate one row.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when any field leaves its documented bounds.
    pub fn validate(&self, difficulty: Difficulty) -> Result<(), ConfigError> {
        if !self.starting_money.is_finite() || self.starting_money < 0.0 {
            return Err(ConfigError::MinViolation {
                difficulty,
                field: "starting_money",
                min: 0.0,
                value: self.starting_money,
            });
        }
        if !(0.0..=Self::MAX_EVENT_MULTIPLIER).contains(&self.event_multiplier) {
            return Err(ConfigError::RangeViolation {
                difficulty,
                field: "event_multiplier",
                min: 0.0,
                max: Self::MAX_EVENT_MULTIPLIER,
                value: self.event_multiplier,
            });
        }
        if !self.weather_harshness.is_finite() || self.weather_harshness <= 0.0 {
            return Err(ConfigError::NotPositive {
                difficulty,
                field: "weather_harshness",
                value: self.weather_harshness,
            });
        }
        Ok(())
    }
}

/// Per-difficulty settings, loadable from JSON. Missing rows fall back to
/// the built-in presets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyTable {
    #[serde(default = "DifficultyTable::default_easy")]
    pub easy: DifficultySettings,
    #[serde(default = "DifficultyTable::default_normal")]
    pub normal: DifficultySettings,
    #[serde(default = "DifficultyTable::default_hard")]
    pub hard: DifficultySettings,
}

impl Default for DifficultyTable {
    fn default() -> Self {
        Self {
            easy: Self::default_easy(),
            normal: Self::default_normal(),
            hard: Self::default_hard(),
        }
    }
}

impl DifficultyTable {
    const fn default_easy() -> DifficultySettings {
        Difficulty::Easy.preset()
    }

    const fn default_normal() -> DifficultySettings {
        Difficulty::Normal.preset()
    }

    const fn default_hard() -> DifficultySettings {
        Difficulty::Hard.preset()
    }

    /// Parse and validate a table.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed JSON and a bounds error for
    /// any row that fails validation.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let table: Self = serde_json::from_str(json)?;
        table.validate()?;
        Ok(table)
    }

    /// # Errors
    ///
    /// Returns the first row's `ConfigError`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for difficulty in Difficulty::ALL {
            self.settings(difficulty).validate(difficulty)?;
        }
        Ok(())
    }

    #[must_use]
    pub const fn settings(&self, difficulty: Difficulty) -> DifficultySettings {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Normal => self.normal,
            Difficulty::Hard => self.hard,
        }
    }
}

/// Errors raised when difficulty configuration is malformed or out of bounds.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("difficulty table is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{difficulty}.{field} must be at least {min:.2} (got {value:.2})")]
    MinViolation {
        difficulty: Difficulty,
        field: &'static str,
        min: f64,
        value: f64,
    },
    #[error("{difficulty}.{field} must be between {min:.2} and {max:.2} (got {value:.2})")]
    RangeViolation {
        difficulty: Difficulty,
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
    #[error("{difficulty}.{field} must be finite and positive (got {value})")]
    NotPositive {
        difficulty: Difficulty,
        field: &'static str,
        value: f64,
    },
}
