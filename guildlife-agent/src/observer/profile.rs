use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use std::fmt;

use super::snapshot::TurnDelta;
use crate::constants::{BALANCED_SPREAD, FOCUS_EMA_ALPHA, PROFILE_HISTORY_WINDOW};
use crate::focus::{FocusAxis, FocusWeights};
use crate::numbers::i64_to_f32;
use crate::state::{Location, PlayerId};

/// Classified play style of a rival.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyLabel {
    #[default]
    Balanced,
    EducationRush,
    WealthGrind,
    CombatFocus,
    HappinessFocus,
}

impl StrategyLabel {
    #[must_use]
    pub const fn from_axis(axis: FocusAxis) -> Self {
        match axis {
            FocusAxis::Education => Self::EducationRush,
            FocusAxis::Wealth => Self::WealthGrind,
            FocusAxis::Combat => Self::CombatFocus,
            FocusAxis::Happiness => Self::HappinessFocus,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Balanced => "balanced",
            Self::EducationRush => "education-rush",
            Self::WealthGrind => "wealth-grind",
            Self::CombatFocus => "combat-focus",
            Self::HappinessFocus => "happiness-focus",
        }
    }

    /// Classify running weights: nearly flat weights read as balanced.
    #[must_use]
    pub fn classify(weights: &FocusWeights) -> Self {
        if weights.spread() < BALANCED_SPREAD {
            Self::Balanced
        } else {
            Self::from_axis(weights.max_axis())
        }
    }
}

impl fmt::Display for StrategyLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Integer evidence per axis extracted from one turn delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FocusSignals {
    pub education: u32,
    pub wealth: u32,
    pub combat: u32,
    pub happiness: u32,
}

impl FocusSignals {
    #[must_use]
    pub fn score(delta: &TurnDelta) -> Self {
        let education = 3 * u32::from(delta.degrees > 0) + u32::from(delta.dependability > 5);
        let wealth = tiered(delta.wealth, 100, 50)
            + u32::from(delta.got_new_job)
            + u32::from(delta.got_wage_increase);
        let combat = 3 * u32::from(delta.floors > 0)
            + u32::from(delta.bought_equipment)
            + u32::from(delta.quests > 0);
        let happiness = tiered(delta.happiness, 5, 0) + u32::from(delta.bought_appliances);
        Self {
            education,
            wealth,
            combat,
            happiness,
        }
    }

    #[must_use]
    pub const fn get(&self, axis: FocusAxis) -> u32 {
        match axis {
            FocusAxis::Education => self.education,
            FocusAxis::Wealth => self.wealth,
            FocusAxis::Combat => self.combat,
            FocusAxis::Happiness => self.happiness,
        }
    }

    #[must_use]
    pub const fn total(&self) -> u32 {
        self.education + self.wealth + self.combat + self.happiness
    }
}

/// 2 above `high`, 1 above `low`, else 0.
fn tiered(value: i64, high: i64, low: i64) -> u32 {
    if value > high {
        2
    } else if value > low {
        1
    } else {
        0
    }
}

/// Rolling profile of one rival.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStrategyProfile {
    pub player: PlayerId,
    /// Deltas recorded so far.
    pub turn_count: u32,
    pub focus_weights: FocusWeights,
    #[serde(default)]
    pub location_frequency: BTreeMap<Location, u32>,
    #[serde(default)]
    pub history: VecDeque<TurnDelta>,
    #[serde(default)]
    pub dominant: StrategyLabel,
}

impl PlayerStrategyProfile {
    #[must_use]
    pub fn new(player: PlayerId) -> Self {
        Self {
            player,
            turn_count: 0,
            focus_weights: FocusWeights::default(),
            location_frequency: BTreeMap::new(),
            history: VecDeque::with_capacity(PROFILE_HISTORY_WINDOW),
            dominant: StrategyLabel::Balanced,
        }
    }

    /// Fold one delta in. Weights and classification only move when the
    /// delta carries evidence.
    pub fn record(&mut self, delta: TurnDelta, location: Location) -> FocusSignals {
        self.turn_count = self.turn_count.saturating_add(1);
        let signals = FocusSignals::score(&delta);
        self.history.push_back(delta);
        while self.history.len() > PROFILE_HISTORY_WINDOW {
            self.history.pop_front();
        }
        *self.location_frequency.entry(location).or_insert(0) += 1;

        let total = signals.total();
        if total == 0 {
            return signals;
        }
        let total = i64_to_f32(i64::from(total));
        for axis in FocusAxis::ALL {
            let instant = i64_to_f32(i64::from(signals.get(axis))) / total;
            let blended =
                (1.0 - FOCUS_EMA_ALPHA) * self.focus_weights.get(axis) + FOCUS_EMA_ALPHA * instant;
            self.focus_weights.set(axis, blended);
        }
        self.dominant = StrategyLabel::classify(&self.focus_weights);
        signals
    }

    /// Most visited stop; the earliest stop in board order wins ties.
    #[must_use]
    pub fn favorite_location(&self) -> Option<Location> {
        let mut best: Option<(Location, u32)> = None;
        for (location, visits) in &self.location_frequency {
            if best.is_none_or(|(_, top)| *visits > top) {
                best = Some((*location, *visits));
            }
        }
        best.map(|(location, _)| location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_delta() -> TurnDelta {
        TurnDelta {
            from_week: 1,
            to_week: 2,
            wealth: 0,
            happiness: 0,
            degrees: 0,
            dependability: 0,
            floors: 0,
            quests: 0,
            got_new_job: false,
            got_wage_increase: false,
            upgraded_housing: false,
            bought_equipment: false,
            bought_appliances: false,
        }
    }

    #[test]
    fn signals_follow_scoring_table() {
        let delta = TurnDelta {
            wealth: 120,
            degrees: 1,
            dependability: 6,
            quests: 1,
            happiness: 3,
            got_new_job: true,
            bought_appliances: true,
            ..quiet_delta()
        };
        let signals = FocusSignals::score(&delta);
        assert_eq!(signals.education, 4);
        assert_eq!(signals.wealth, 3);
        assert_eq!(signals.combat, 1);
        assert_eq!(signals.happiness, 2);

        let modest = TurnDelta {
            wealth: 60,
            happiness: 6,
            ..quiet_delta()
        };
        let signals = FocusSignals::score(&modest);
        assert_eq!(signals.wealth, 1);
        assert_eq!(signals.happiness, 2);
        assert_eq!(FocusSignals::score(&quiet_delta()).total(), 0);
    }

    #[test]
    fn quiet_turns_count_but_leave_weights_alone() {
        let mut profile = PlayerStrategyProfile::new(PlayerId(2));
        profile.record(quiet_delta(), Location::Bank);
        assert_eq!(profile.turn_count, 1);
        assert_eq!(profile.focus_weights, FocusWeights::default());
        assert_eq!(profile.dominant, StrategyLabel::Balanced);
    }

    #[test]
    fn ema_blends_and_preserves_mass() {
        let mut profile = PlayerStrategyProfile::new(PlayerId(2));
        let grind = TurnDelta {
            wealth: 500,
            ..quiet_delta()
        };
        profile.record(grind, Location::Forge);
        let weights = profile.focus_weights;
        assert!((weights.wealth - (0.7 * 0.25 + 0.3)).abs() < 1e-6);
        assert!((weights.education - 0.7 * 0.25).abs() < 1e-6);
        assert!((weights.total() - 1.0).abs() < 1e-5);
        assert_eq!(profile.dominant, StrategyLabel::WealthGrind);
    }

    #[test]
    fn history_is_bounded() {
        let mut profile = PlayerStrategyProfile::new(PlayerId(2));
        for week in 0..15 {
            let delta = TurnDelta {
                from_week: week,
                to_week: week + 1,
                ..quiet_delta()
            };
            profile.record(delta, Location::Cave);
        }
        assert_eq!(profile.history.len(), PROFILE_HISTORY_WINDOW);
        assert_eq!(profile.history.front().map(|d| d.from_week), Some(5));
        assert_eq!(profile.location_frequency.get(&Location::Cave), Some(&15));
        assert_eq!(profile.favorite_location(), Some(Location::Cave));
    }
}
