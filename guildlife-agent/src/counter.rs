//! Counter-strategy multipliers derived from rival profiles.
use log::debug;
use serde::{Deserialize, Serialize};

use crate::constants::{
    COMPETITIVE_BOOST_MILD, COMPETITIVE_BOOST_STRONG, COUNTER_MIN_DEPTH, COUNTER_STRONG_DEPTH,
    GAP_EXPLOIT_MILD, GAP_EXPLOIT_STRONG,
};
use crate::focus::{FocusAxis, FocusWeights};
use crate::numbers::usize_to_f32;
use crate::observer::ObserverRepository;
use crate::state::PlayerId;

/// Per-axis priority multipliers. Never below 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CounterStrategyWeights {
    pub education: f32,
    pub wealth: f32,
    pub combat: f32,
    pub happiness: f32,
}

impl CounterStrategyWeights {
    #[must_use]
    pub const fn neutral() -> Self {
        Self {
            education: 1.0,
            wealth: 1.0,
            combat: 1.0,
            happiness: 1.0,
        }
    }

    #[must_use]
    pub const fn multiplier(&self, axis: FocusAxis) -> f32 {
        match axis {
            FocusAxis::Education => self.education,
            FocusAxis::Wealth => self.wealth,
            FocusAxis::Combat => self.combat,
            FocusAxis::Happiness => self.happiness,
        }
    }

    const fn set(&mut self, axis: FocusAxis, value: f32) {
        match axis {
            FocusAxis::Education => self.education = value,
            FocusAxis::Wealth => self.wealth = value,
            FocusAxis::Combat => self.combat = value,
            FocusAxis::Happiness => self.happiness = value,
        }
    }

    #[must_use]
    pub fn is_neutral(&self) -> bool {
        *self == Self::neutral()
    }

    /// Weights against the exposed profiles of `rivals`.
    ///
    /// Shallow planners and rivals without enough history yield neutral weights.
    #[must_use]
    pub fn compute(repo: &ObserverRepository, rivals: &[PlayerId], planning_depth: u8) -> Self {
        if planning_depth < COUNTER_MIN_DEPTH {
            return Self::neutral();
        }
        let profiles: Vec<_> = rivals.iter().filter_map(|id| repo.profile(*id)).collect();
        if profiles.is_empty() {
            return Self::neutral();
        }

        let count = usize_to_f32(profiles.len());
        let mut average = FocusWeights::uniform(0.0);
        for axis in FocusAxis::ALL {
            let sum: f32 = profiles
                .iter()
                .map(|profile| profile.focus_weights.get(axis))
                .sum();
            average.set(axis, sum / count);
        }
        let weights = Self::against(&average, planning_depth);
        debug!(
            "counter weights vs {} rival(s): edu={:.2} wealth={:.2} combat={:.2} happy={:.2}",
            profiles.len(),
            weights.education,
            weights.wealth,
            weights.combat,
            weights.happiness
        );
        weights
    }

    /// Boost the axis rivals neglect most, and contest the rest in
    /// proportion to rival focus. The first axis wins ties for the gap.
    #[must_use]
    pub fn against(average: &FocusWeights, planning_depth: u8) -> Self {
        if planning_depth < COUNTER_MIN_DEPTH {
            return Self::neutral();
        }
        let strong = planning_depth >= COUNTER_STRONG_DEPTH;
        let gap_exploit = if strong {
            GAP_EXPLOIT_STRONG
        } else {
            GAP_EXPLOIT_MILD
        };
        let competitive_boost = if strong {
            COMPETITIVE_BOOST_STRONG
        } else {
            COMPETITIVE_BOOST_MILD
        };

        let gap = average.min_axis();
        let mut weights = Self::neutral();
        for axis in FocusAxis::ALL {
            let value = if axis == gap {
                1.0 + gap_exploit
            } else {
                1.0 + average.get(axis).max(0.0) * competitive_boost
            };
            weights.set(axis, value);
        }
        weights
    }
}

impl Default for CounterStrategyWeights {
    fn default() -> Self {
        Self::neutral()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::PlayerStrategyProfile;

    fn skewed() -> FocusWeights {
        FocusWeights {
            education: 0.1,
            wealth: 0.6,
            combat: 0.2,
            happiness: 0.1,
        }
    }

    #[test]
    fn strong_depth_exploits_gap_and_contests_focus() {
        let weights = CounterStrategyWeights::against(&skewed(), 3);
        assert!((weights.education - 1.3).abs() < 1e-6);
        assert!((weights.wealth - 1.36).abs() < 1e-6);
        assert!((weights.combat - 1.12).abs() < 1e-6);
        assert!((weights.happiness - 1.06).abs() < 1e-6);
    }

    #[test]
    fn mild_depth_uses_smaller_boosts() {
        let weights = CounterStrategyWeights::against(&skewed(), 2);
        assert!((weights.education - 1.15).abs() < 1e-6);
        assert!((weights.wealth - 1.24).abs() < 1e-6);
        assert!((weights.combat - 1.08).abs() < 1e-6);
    }

    #[test]
    fn shallow_or_blind_agents_stay_neutral() {
        let mut repo = ObserverRepository::new();
        assert!(CounterStrategyWeights::compute(&repo, &[PlayerId(1)], 3).is_neutral());

        let mut profile = PlayerStrategyProfile::new(PlayerId(1));
        profile.turn_count = 3;
        profile.focus_weights = skewed();
        repo.restore_profile(profile);
        assert!(CounterStrategyWeights::compute(&repo, &[PlayerId(1)], 1).is_neutral());
        assert!(CounterStrategyWeights::compute(&repo, &[PlayerId(2)], 3).is_neutral());
        let weights = CounterStrategyWeights::compute(&repo, &[PlayerId(1)], 3);
        assert!((weights.wealth - 1.36).abs() < 1e-6);
    }

    #[test]
    fn profiles_are_averaged_and_never_suppress() {
        let mut repo = ObserverRepository::new();
        for (id, weights) in [
            (1, FocusWeights::uniform(0.25)),
            (
                2,
                FocusWeights {
                    education: 0.7,
                    wealth: 0.1,
                    combat: 0.1,
                    happiness: 0.1,
                },
            ),
        ] {
            let mut profile = PlayerStrategyProfile::new(PlayerId(id));
            profile.turn_count = 4;
            profile.focus_weights = weights;
            repo.restore_profile(profile);
        }
        let weights = CounterStrategyWeights::compute(&repo, &[PlayerId(1), PlayerId(2)], 3);
        // Average is edu 0.475, others 0.175; wealth is the first minimum.
        assert!((weights.wealth - 1.3).abs() < 1e-6);
        assert!((weights.education - (1.0 + 0.475 * 0.6)).abs() < 1e-5);
        for axis in FocusAxis::ALL {
            assert!(weights.multiplier(axis) >= 1.0);
        }
    }
}
