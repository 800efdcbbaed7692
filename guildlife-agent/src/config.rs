//! Difficulty presets and agent configuration.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;

use crate::constants::DEFAULT_MAX_STEPS;

const DEFAULT_DIFFICULTY_DATA: &str = include_str!("../data/difficulty.json");

/// Errors raised when configuration invariants are violated.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be between {min:.2} and {max:.2} (got {value:.2})")]
    RangeViolation {
        field: &'static str,
        min: f32,
        max: f32,
        value: f32,
    },
    #[error("planning depth must be 1..=3 (got {0})")]
    PlanningDepth(u8),
    #[error("{field} must be positive (got {value})")]
    NonPositiveTarget { field: &'static str, value: i32 },
    #[error("max steps must be at least 1")]
    ZeroStepBudget,
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Named difficulty tiers selectable at agent creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyLevel {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl DifficultyLevel {
    pub const ALL: [Self; 3] = [Self::Easy, Self::Medium, Self::Hard];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }

    /// Preset tuning for this tier.
    #[must_use]
    pub fn settings(self) -> DifficultySettings {
        let presets = difficulty_presets();
        match self {
            Self::Easy => presets.easy,
            Self::Medium => presets.medium,
            Self::Hard => presets.hard,
        }
    }
}

impl fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Tuning knobs for one agent instance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultySettings {
    /// General eagerness to spend resources, 0..=1.
    pub aggressiveness: f32,
    /// 1 = naive, 2 = counter-strategy on, 3 = strongest counter-strategy.
    pub planning_depth: u8,
    /// Probability of swapping the two best actions.
    pub mistake_chance: f32,
    /// Advisory only; carried for presets and reports.
    pub efficiency_weight: f32,
    /// Presentation pacing between steps.
    #[serde(default)]
    pub decision_delay_ms: u64,
}

impl DifficultySettings {
    #[must_use]
    pub const fn decision_delay(&self) -> Duration {
        Duration::from_millis(self.decision_delay_ms)
    }

    /// # Errors
    ///
    /// Returns an error when a knob falls outside its documented range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_unit("difficulty.aggressiveness", self.aggressiveness)?;
        check_unit("difficulty.mistake_chance", self.mistake_chance)?;
        check_unit("difficulty.efficiency_weight", self.efficiency_weight)?;
        if !(1..=3).contains(&self.planning_depth) {
            return Err(ConfigError::PlanningDepth(self.planning_depth));
        }
        Ok(())
    }
}

impl Default for DifficultySettings {
    fn default() -> Self {
        DifficultyLevel::default().settings()
    }
}

/// The three preset tiers as stored in `difficulty.json`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyPresets {
    pub easy: DifficultySettings,
    pub medium: DifficultySettings,
    pub hard: DifficultySettings,
}

impl DifficultyPresets {
    /// Parse the bundled presets, falling back to built-in values.
    #[must_use]
    pub fn load_from_static() -> Self {
        serde_json::from_str::<Self>(DEFAULT_DIFFICULTY_DATA)
            .ok()
            .filter(|presets| {
                presets.easy.validate().is_ok()
                    && presets.medium.validate().is_ok()
                    && presets.hard.validate().is_ok()
            })
            .unwrap_or_else(Self::builtin)
    }

    #[must_use]
    pub const fn builtin() -> Self {
        Self {
            easy: DifficultySettings {
                aggressiveness: 0.3,
                planning_depth: 1,
                mistake_chance: 0.2,
                efficiency_weight: 0.3,
                decision_delay_ms: 800,
            },
            medium: DifficultySettings {
                aggressiveness: 0.5,
                planning_depth: 2,
                mistake_chance: 0.1,
                efficiency_weight: 0.6,
                decision_delay_ms: 500,
            },
            hard: DifficultySettings {
                aggressiveness: 0.8,
                planning_depth: 3,
                mistake_chance: 0.02,
                efficiency_weight: 0.9,
                decision_delay_ms: 300,
            },
        }
    }
}

fn difficulty_presets() -> &'static DifficultyPresets {
    static PRESETS: OnceLock<DifficultyPresets> = OnceLock::new();
    PRESETS.get_or_init(DifficultyPresets::load_from_static)
}

/// Everything needed to build an agent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    #[serde(default)]
    pub difficulty: DifficultySettings,
    /// Hard cap on planning steps per turn.
    #[serde(default = "AgentConfig::default_max_steps")]
    pub max_steps: u32,
    /// Seed for the agent's private random stream.
    #[serde(default)]
    pub seed: u64,
}

impl AgentConfig {
    const fn default_max_steps() -> u32 {
        DEFAULT_MAX_STEPS
    }

    #[must_use]
    pub fn for_level(level: DifficultyLevel, seed: u64) -> Self {
        Self {
            difficulty: level.settings(),
            max_steps: DEFAULT_MAX_STEPS,
            seed,
        }
    }

    #[must_use]
    pub const fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// # Errors
    ///
    /// Returns an error if any setting is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.difficulty.validate()?;
        if self.max_steps == 0 {
            return Err(ConfigError::ZeroStepBudget);
        }
        Ok(())
    }

    /// Parse and validate a JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or fails validation.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or its contents are invalid.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self::for_level(DifficultyLevel::default(), 0)
    }
}

fn check_unit(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::RangeViolation {
            field,
            min: 0.0,
            max: 1.0,
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_presets_match_builtin() {
        assert_eq!(
            DifficultyPresets::load_from_static(),
            DifficultyPresets::builtin()
        );
        let hard = DifficultyLevel::Hard.settings();
        assert_eq!(hard.planning_depth, 3);
        assert_eq!(hard.decision_delay(), Duration::from_millis(300));
        assert_eq!(DifficultyLevel::Easy.settings().planning_depth, 1);
    }

    #[test]
    fn validation_rejects_out_of_range_knobs() {
        let mut settings = DifficultyLevel::Medium.settings();
        settings.mistake_chance = 1.5;
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::RangeViolation {
                field: "difficulty.mistake_chance",
                ..
            })
        ));

        let mut settings = DifficultyLevel::Medium.settings();
        settings.planning_depth = 4;
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::PlanningDepth(4))
        ));
    }

    #[test]
    fn agent_config_parses_with_defaults() {
        let cfg = AgentConfig::from_json_str(r#"{ "seed": 99 }"#).unwrap();
        assert_eq!(cfg.seed, 99);
        assert_eq!(cfg.max_steps, 15);
        assert_eq!(cfg.difficulty, DifficultyLevel::Medium.settings());

        let err = AgentConfig::from_json_str(r#"{ "max_steps": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::ZeroStepBudget));
        assert!(matches!(
            AgentConfig::from_json_str("not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
