//! The four strategic axes rivals are profiled on.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a player invests effort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusAxis {
    Education,
    Wealth,
    Combat,
    Happiness,
}

impl FocusAxis {
    /// Fixed enumeration order used by every scan over the axes.
    pub const ALL: [Self; 4] = [Self::Education, Self::Wealth, Self::Combat, Self::Happiness];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Education => "education",
            Self::Wealth => "wealth",
            Self::Combat => "combat",
            Self::Happiness => "happiness",
        }
    }
}

impl fmt::Display for FocusAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One non-negative value per axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FocusWeights {
    pub education: f32,
    pub wealth: f32,
    pub combat: f32,
    pub happiness: f32,
}

impl FocusWeights {
    #[must_use]
    pub const fn uniform(value: f32) -> Self {
        Self {
            education: value,
            wealth: value,
            combat: value,
            happiness: value,
        }
    }

    #[must_use]
    pub const fn get(&self, axis: FocusAxis) -> f32 {
        match axis {
            FocusAxis::Education => self.education,
            FocusAxis::Wealth => self.wealth,
            FocusAxis::Combat => self.combat,
            FocusAxis::Happiness => self.happiness,
        }
    }

    pub const fn set(&mut self, axis: FocusAxis, value: f32) {
        match axis {
            FocusAxis::Education => self.education = value,
            FocusAxis::Wealth => self.wealth = value,
            FocusAxis::Combat => self.combat = value,
            FocusAxis::Happiness => self.happiness = value,
        }
    }

    #[must_use]
    pub fn total(&self) -> f32 {
        FocusAxis::ALL.iter().map(|axis| self.get(*axis)).sum()
    }

    /// Axis holding the largest value; the first one wins ties.
    #[must_use]
    pub fn max_axis(&self) -> FocusAxis {
        let mut best = FocusAxis::Education;
        for axis in FocusAxis::ALL {
            if self.get(axis) > self.get(best) {
                best = axis;
            }
        }
        best
    }

    /// Axis holding the smallest value; the first one wins ties.
    #[must_use]
    pub fn min_axis(&self) -> FocusAxis {
        let mut worst = FocusAxis::Education;
        for axis in FocusAxis::ALL {
            if self.get(axis) < self.get(worst) {
                worst = axis;
            }
        }
        worst
    }

    /// Difference between the largest and smallest value.
    #[must_use]
    pub fn spread(&self) -> f32 {
        self.get(self.max_axis()) - self.get(self.min_axis())
    }
}

impl Default for FocusWeights {
    fn default() -> Self {
        Self::uniform(crate::constants::FOCUS_INITIAL_WEIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extremes_break_ties_toward_the_first_axis() {
        let weights = FocusWeights {
            education: 0.1,
            wealth: 0.6,
            combat: 0.2,
            happiness: 0.1,
        };
        assert_eq!(weights.min_axis(), FocusAxis::Education);
        assert_eq!(weights.max_axis(), FocusAxis::Wealth);
        assert!((weights.spread() - 0.5).abs() < 1e-6);
        assert!((weights.total() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn set_and_get_round_trip_each_axis() {
        let mut weights = FocusWeights::uniform(0.0);
        for (idx, axis) in FocusAxis::ALL.into_iter().enumerate() {
            let value = f32::from(u8::try_from(idx).unwrap());
            weights.set(axis, value);
            assert!((weights.get(axis) - value).abs() < f32::EPSILON);
        }
        assert_eq!(FocusWeights::default(), FocusWeights::uniform(0.25));
    }
}
