//! Board geometry as seen by the agent.
use serde::{Deserialize, Serialize};

use crate::state::Location;

/// Shortest-path query provided by the board collaborator.
pub trait Board {
    /// Hours needed to walk from `from` to `to` along the shortest route.
    fn shortest_distance(&self, from: Location, to: Location) -> i32;
}

/// Circular street where every stop neighbours the next one in
/// [`Location::ALL`] order and walking either way is allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RingBoard {
    pub hours_per_step: i32,
}

impl RingBoard {
    #[must_use]
    pub const fn new(hours_per_step: i32) -> Self {
        Self { hours_per_step }
    }

    /// Stops walked between two locations.
    #[must_use]
    pub fn steps_between(from: Location, to: Location) -> usize {
        let len = Location::ALL.len();
        let forward = (to.index() + len - from.index()) % len;
        forward.min(len - forward)
    }
}

impl Default for RingBoard {
    fn default() -> Self {
        Self::new(2)
    }
}

impl Board for RingBoard {
    fn shortest_distance(&self, from: Location, to: Location) -> i32 {
        let steps = i32::try_from(Self::steps_between(from, to)).unwrap_or(i32::MAX);
        steps.saturating_mul(self.hours_per_step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_distance_wraps_both_ways() {
        let board = RingBoard::new(1);
        assert_eq!(board.shortest_distance(Location::Bank, Location::Bank), 0);
        assert_eq!(
            board.shortest_distance(Location::Bank, Location::GuildHall),
            2
        );
        assert_eq!(
            board.shortest_distance(Location::NobleHeights, Location::ShadowMarket),
            1
        );
        assert_eq!(
            board.shortest_distance(Location::NobleHeights, Location::Forge),
            6
        );
        assert_eq!(
            board.shortest_distance(Location::Forge, Location::ShadowMarket),
            7
        );
    }

    #[test]
    fn hours_scale_with_step_cost() {
        let board = RingBoard::default();
        assert_eq!(
            board.shortest_distance(Location::Slums, Location::GeneralStore),
            4
        );
    }
}
