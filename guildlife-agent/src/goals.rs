//! Victory targets and normalized progress toward them.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::ConfigError;
use crate::constants::EDUCATION_POINTS_PER_DEGREE;
use crate::numbers::{i64_to_f32, progress_ratio, usize_to_f32};
use crate::state::Player;

/// Per-game victory targets. Fixed for the whole session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalSettings {
    pub wealth: i32,
    pub happiness: i32,
    /// Education points; every completed degree is worth 9.
    pub education: i32,
    /// Guild rank index (1..=7).
    pub career: i32,
}

impl GoalSettings {
    /// # Errors
    ///
    /// Returns an error when any target is zero or negative.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("goals.wealth", self.wealth),
            ("goals.happiness", self.happiness),
            ("goals.education", self.education),
            ("goals.career", self.career),
        ] {
            if value <= 0 {
                return Err(ConfigError::NonPositiveTarget { field, value });
            }
        }
        Ok(())
    }
}

impl Default for GoalSettings {
    fn default() -> Self {
        Self {
            wealth: 5_000,
            happiness: 75,
            education: 45,
            career: 4,
        }
    }
}

/// The four victory axes, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalAxis {
    Wealth,
    Happiness,
    Education,
    Career,
}

impl GoalAxis {
    pub const ALL: [Self; 4] = [Self::Wealth, Self::Happiness, Self::Education, Self::Career];
}

impl fmt::Display for GoalAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Wealth => "wealth",
            Self::Happiness => "happiness",
            Self::Education => "education",
            Self::Career => "career",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisProgress {
    pub current: f32,
    pub target: f32,
    /// Always within `[0, 1]`.
    pub progress: f32,
}

impl AxisProgress {
    fn measure(current: f32, target: i32) -> Self {
        let target = i64_to_f32(i64::from(target));
        Self {
            current,
            target,
            progress: progress_ratio(current, target),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalProgress {
    pub wealth: AxisProgress,
    pub happiness: AxisProgress,
    pub education: AxisProgress,
    pub career: AxisProgress,
    /// Unweighted mean of the four progress values.
    pub overall: f32,
}

impl GoalProgress {
    /// Measure a player against the session's targets.
    #[must_use]
    pub fn evaluate(player: &Player, goals: &GoalSettings) -> Self {
        let wealth = AxisProgress::measure(i64_to_f32(player.total_wealth()), goals.wealth);
        let happiness =
            AxisProgress::measure(i64_to_f32(i64::from(player.happiness)), goals.happiness);
        let education_points = usize_to_f32(player.completed_degrees.len())
            * i64_to_f32(i64::from(EDUCATION_POINTS_PER_DEGREE));
        let education = AxisProgress::measure(education_points, goals.education);
        let career = AxisProgress::measure(
            f32::from(player.guild_rank.rank_index()),
            goals.career,
        );
        let overall =
            (wealth.progress + happiness.progress + education.progress + career.progress) / 4.0;
        Self {
            wealth,
            happiness,
            education,
            career,
            overall,
        }
    }

    #[must_use]
    pub const fn axis(&self, axis: GoalAxis) -> &AxisProgress {
        match axis {
            GoalAxis::Wealth => &self.wealth,
            GoalAxis::Happiness => &self.happiness,
            GoalAxis::Education => &self.education,
            GoalAxis::Career => &self.career,
        }
    }

    /// Axis with the lowest progress; ties go to the earliest axis in
    /// [`GoalAxis::ALL`].
    #[must_use]
    pub fn weakest(&self) -> GoalAxis {
        let mut weakest = GoalAxis::Wealth;
        for axis in GoalAxis::ALL {
            if self.axis(axis).progress < self.axis(weakest).progress {
                weakest = axis;
            }
        }
        weakest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{GuildRank, PlayerId};

    fn player() -> Player {
        Player::new(PlayerId(1), "Ada")
    }

    #[test]
    fn progress_is_normalized_per_axis() {
        let mut p = player();
        p.gold = 1_000;
        p.savings = 1_000;
        p.investments = 500;
        p.happiness = 30;
        p.completed_degrees.insert("junior-academy".to_string());
        p.guild_rank = GuildRank::Apprentice;

        let progress = GoalProgress::evaluate(&p, &GoalSettings::default());
        assert!((progress.wealth.progress - 0.5).abs() < 1e-6);
        assert!((progress.happiness.progress - 0.4).abs() < 1e-6);
        assert!((progress.education.progress - 0.2).abs() < 1e-6);
        assert!((progress.education.current - 9.0).abs() < f32::EPSILON);
        assert!((progress.career.progress - 0.5).abs() < 1e-6);
        assert!((progress.overall - 0.4).abs() < 1e-6);
    }

    #[test]
    fn progress_never_exceeds_one() {
        let mut p = player();
        p.gold = 1_000_000;
        p.happiness = 100;
        p.guild_rank = GuildRank::GuildMaster;
        for id in ["a", "b", "c", "d", "e", "f", "g"] {
            p.completed_degrees.insert(id.to_string());
        }
        let progress = GoalProgress::evaluate(&p, &GoalSettings::default());
        for axis in GoalAxis::ALL {
            let value = progress.axis(axis).progress;
            assert!((0.0..=1.0).contains(&value), "{axis} out of range: {value}");
        }
        assert!((progress.overall - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn debt_clamps_to_zero() {
        let mut p = player();
        p.gold = -400;
        let progress = GoalProgress::evaluate(&p, &GoalSettings::default());
        assert!(progress.wealth.progress.abs() < f32::EPSILON);
    }

    #[test]
    fn weakest_prefers_earliest_axis_on_ties() {
        let mut p = player();
        p.gold = 0;
        p.happiness = 0;
        let progress = GoalProgress::evaluate(&p, &GoalSettings::default());
        assert_eq!(progress.weakest(), GoalAxis::Wealth);

        p.gold = 5_000;
        let progress = GoalProgress::evaluate(&p, &GoalSettings::default());
        assert_eq!(progress.weakest(), GoalAxis::Happiness);
    }

    #[test]
    fn goal_validation_rejects_zero_targets() {
        let goals = GoalSettings {
            education: 0,
            ..GoalSettings::default()
        };
        assert!(matches!(
            goals.validate(),
            Err(ConfigError::NonPositiveTarget {
                field: "goals.education",
                value: 0
            })
        ));
        assert!(GoalSettings::default().validate().is_ok());
    }
}
