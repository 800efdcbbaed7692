//! Seams to the world collaborator that owns player state.
//!
//! The agent never mutates a [`Player`] directly. It reads fresh copies
//! through [`WorldStore`] and requests changes through [`WorldMutations`];
//! the implementor validates, applies and clamps.
use thiserror::Error;

use crate::board::Board;
use crate::content::Content;
use crate::state::{HousingTier, Location, Player, PlayerId};

/// Why the world refused a mutation. Refusals are ordinary outcomes, not faults.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Rejection {
    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),
    #[error("needs {need} gold but holds {have}")]
    InsufficientGold { need: i32, have: i32 },
    #[error("needs {need} hours but has {have}")]
    InsufficientTime { need: i32, have: i32 },
    #[error("must be at {expected} (currently at {actual})")]
    WrongLocation {
        expected: Location,
        actual: Location,
    },
    #[error("not qualified for job {job}")]
    NotQualified { job: String },
    #[error("unknown content id {id}")]
    UnknownContent { id: String },
    #[error("nothing to do: {0}")]
    NothingToDo(&'static str),
    #[error("game over for {0}")]
    GameOver(PlayerId),
}

/// Read access to the live player records.
pub trait WorldStore {
    /// Fresh copy of the player's current state.
    fn player(&self, id: PlayerId) -> Option<Player>;

    /// Whether the player can no longer act.
    fn is_game_over(&self, id: PlayerId) -> bool;

    /// Current week number.
    fn current_week(&self) -> u32;

    /// Human-controlled players other than `id`.
    fn rivals_of(&self, id: PlayerId) -> Vec<Player>;
}

/// State-changing operations the agent may request.
pub trait WorldMutations {
    fn move_to(&mut self, id: PlayerId, to: Location, time_cost: i32) -> Result<(), Rejection>;

    /// Work a shift, returning gold earned.
    fn work_shift(&mut self, id: PlayerId, hours: i32, wage: i32) -> Result<i32, Rejection>;

    fn buy_food(&mut self, id: PlayerId, cost: i32) -> Result<(), Rejection>;

    fn buy_clothing(&mut self, id: PlayerId, cost: i32) -> Result<(), Rejection>;

    fn buy_appliance(
        &mut self,
        id: PlayerId,
        appliance_id: &str,
        cost: i32,
    ) -> Result<(), Rejection>;

    fn study_degree(
        &mut self,
        id: PlayerId,
        degree_id: &str,
        cost: i32,
        hours: i32,
    ) -> Result<(), Rejection>;

    fn complete_degree(&mut self, id: PlayerId, degree_id: &str) -> Result<(), Rejection>;

    /// Fails with [`Rejection::NotQualified`] when the hiring check fails.
    fn apply_for_job(&mut self, id: PlayerId, job_id: &str) -> Result<(), Rejection>;

    fn pay_rent(&mut self, id: PlayerId) -> Result<(), Rejection>;

    fn deposit_to_bank(&mut self, id: PlayerId, amount: i32) -> Result<(), Rejection>;

    fn withdraw_from_bank(&mut self, id: PlayerId, amount: i32) -> Result<(), Rejection>;

    fn upgrade_housing(
        &mut self,
        id: PlayerId,
        tier: HousingTier,
        cost: i32,
        new_rent: i32,
    ) -> Result<(), Rejection>;

    /// Rest at home, returning happiness gained.
    fn rest_at_home(&mut self, id: PlayerId, hours: i32) -> Result<i32, Rejection>;

    fn end_turn(&mut self, id: PlayerId) -> Result<(), Rejection>;
}

/// Everything a turn needs from its surroundings.
pub trait World: WorldStore + WorldMutations + Board + Content {}

impl<T: ?Sized> World for T where T: WorldStore + WorldMutations + Board + Content {}

/// Read-only view the planner consults.
pub trait PlanningEnv: Board + Content {}

impl<T: ?Sized> PlanningEnv for T where T: Board + Content {}
