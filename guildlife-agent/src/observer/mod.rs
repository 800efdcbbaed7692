//! Rival observation: snapshot diffing and rolling strategy profiles.
//!
//! The [`ObserverRepository`] is session state. It is fed once per AI turn
//! with the current human players and the current week; a delta is only
//! recorded when a rival's stored snapshot comes from an earlier week.
mod profile;
mod snapshot;

pub use profile::{FocusSignals, PlayerStrategyProfile, StrategyLabel};
pub use snapshot::{PlayerSnapshot, TurnDelta};

use log::{debug, info};
use std::collections::BTreeMap;

use crate::constants::PROFILE_MIN_TURNS;
use crate::state::{Location, Player, PlayerId};

/// Snapshots and profiles for every observed rival, keyed by player id.
#[derive(Debug, Clone, Default)]
pub struct ObserverRepository {
    snapshots: BTreeMap<PlayerId, PlayerSnapshot>,
    profiles: BTreeMap<PlayerId, PlayerStrategyProfile>,
}

impl ObserverRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe the rivals as they stand in `week`, returning how many deltas
    /// were recorded.
    pub fn observe(&mut self, rivals: &[Player], week: u32) -> usize {
        let mut recorded = 0;
        for rival in rivals {
            let snapshot = PlayerSnapshot::capture(rival, week);
            let delta = self
                .snapshots
                .get(&rival.id)
                .and_then(|prev| TurnDelta::between(prev, &snapshot));
            if let Some(delta) = delta {
                self.record(rival.id, rival.location, delta);
                recorded += 1;
            }
            self.snapshots.insert(rival.id, snapshot);
        }
        recorded
    }

    fn record(&mut self, id: PlayerId, location: Location, delta: TurnDelta) {
        let profile = self
            .profiles
            .entry(id)
            .or_insert_with(|| PlayerStrategyProfile::new(id));
        let before = profile.dominant;
        let signals = profile.record(delta, location);
        debug!(
            "{id} turn {} signals edu={} wealth={} combat={} happy={}",
            profile.turn_count,
            signals.education,
            signals.wealth,
            signals.combat,
            signals.happiness
        );
        if profile.dominant != before {
            info!("{id} reclassified {before} -> {}", profile.dominant);
        }
    }

    /// Profile for `id`, hidden until enough turns have been observed.
    #[must_use]
    pub fn profile(&self, id: PlayerId) -> Option<&PlayerStrategyProfile> {
        self.profiles
            .get(&id)
            .filter(|profile| profile.turn_count >= PROFILE_MIN_TURNS)
    }

    #[must_use]
    pub fn dominant_strategy(&self, id: PlayerId) -> Option<StrategyLabel> {
        self.profile(id).map(|profile| profile.dominant)
    }

    #[must_use]
    pub fn favorite_location(&self, id: PlayerId) -> Option<Location> {
        self.profile(id)
            .and_then(PlayerStrategyProfile::favorite_location)
    }

    /// Every profile past the insufficient-data guard.
    pub fn profiles(&self) -> impl Iterator<Item = &PlayerStrategyProfile> {
        self.profiles
            .values()
            .filter(|profile| profile.turn_count >= PROFILE_MIN_TURNS)
    }

    /// Deltas recorded for `id`, whether or not the profile is exposed yet.
    #[must_use]
    pub fn observed_turns(&self, id: PlayerId) -> u32 {
        self.profiles
            .get(&id)
            .map_or(0, |profile| profile.turn_count)
    }

    #[must_use]
    pub fn snapshot(&self, id: PlayerId) -> Option<&PlayerSnapshot> {
        self.snapshots.get(&id)
    }

    /// Install a profile, e.g. one carried over from a saved game.
    pub fn restore_profile(&mut self, profile: PlayerStrategyProfile) {
        self.profiles.insert(profile.player, profile);
    }

    /// Forget every snapshot and profile.
    pub fn reset(&mut self) {
        self.snapshots.clear();
        self.profiles.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty() && self.profiles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rival() -> Player {
        Player::new(PlayerId(9), "Rival")
    }

    #[test]
    fn first_sighting_only_sets_a_baseline() {
        let mut repo = ObserverRepository::new();
        assert_eq!(repo.observe(&[rival()], 1), 0);
        assert_eq!(repo.observed_turns(PlayerId(9)), 0);
        assert_eq!(repo.snapshot(PlayerId(9)).map(|s| s.week), Some(1));
    }

    #[test]
    fn profile_appears_on_third_recorded_turn() {
        let mut repo = ObserverRepository::new();
        let mut player = rival();
        repo.observe(std::slice::from_ref(&player), 1);
        for week in 2..=3 {
            player.gold += 200;
            repo.observe(std::slice::from_ref(&player), week);
            assert!(repo.profile(player.id).is_none(), "week {week}");
        }
        player.gold += 200;
        repo.observe(std::slice::from_ref(&player), 4);
        let profile = repo.profile(player.id).expect("exposed at third delta");
        assert_eq!(profile.turn_count, 3);
        assert_eq!(repo.dominant_strategy(player.id), Some(StrategyLabel::WealthGrind));
        assert_eq!(repo.favorite_location(player.id), Some(Location::Slums));
        assert_eq!(repo.profiles().count(), 1);
    }

    #[test]
    fn same_week_observation_records_nothing() {
        let mut repo = ObserverRepository::new();
        let mut player = rival();
        repo.observe(std::slice::from_ref(&player), 1);
        player.gold += 500;
        assert_eq!(repo.observe(std::slice::from_ref(&player), 2), 1);
        let before = repo.profiles.get(&player.id).cloned();

        player.gold += 500;
        assert_eq!(repo.observe(std::slice::from_ref(&player), 2), 0);
        assert_eq!(repo.profiles.get(&player.id).cloned(), before);
        assert_eq!(repo.snapshot(player.id).map(|s| s.gold), Some(1_100));
    }

    #[test]
    fn reset_forgets_everything() {
        let mut repo = ObserverRepository::new();
        let mut profile = PlayerStrategyProfile::new(PlayerId(4));
        profile.turn_count = 5;
        repo.restore_profile(profile);
        assert!(repo.profile(PlayerId(4)).is_some());
        repo.reset();
        assert!(repo.profile(PlayerId(4)).is_none());
        assert!(repo.is_empty());
    }
}
