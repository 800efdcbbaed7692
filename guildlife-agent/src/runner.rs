//! Turn control loop: Idle, then Stepping, then Done.
//!
//! Each step re-reads the player from the world, asks the planner for a
//! fresh ranking, and executes only the top action. Rejected mutations are
//! ordinary outcomes; they cost one unit of the safety budget and the next
//! plan is built from whatever state the world now reports.
use log::{debug, info, warn};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::action::{ActionKind, AiAction};
use crate::config::{AgentConfig, DifficultySettings};
use crate::constants::MIN_HOURS_TO_ACT;
use crate::counter::CounterStrategyWeights;
use crate::goals::{GoalAxis, GoalSettings};
use crate::observer::ObserverRepository;
use crate::planner::ActionPlanner;
use crate::rng::AgentRng;
use crate::state::PlayerId;
use crate::world::{Rejection, World};

/// Presentation pacing between steps. Never affects outcomes.
pub trait Pacer {
    fn pause(&mut self, delay: Duration);
}

/// Runs steps back to back.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl Pacer for NoDelay {
    fn pause(&mut self, _delay: Duration) {}
}

/// Blocks the current thread for the difficulty's decision delay.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleep;

impl Pacer for ThreadSleep {
    fn pause(&mut self, delay: Duration) {
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }
}

/// Shared flag that asks the agent to end its turn at the next step boundary.
#[derive(Debug, Clone, Default)]
pub struct SkipHandle(Arc<AtomicBool>);

impl SkipHandle {
    pub fn request(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn clear(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Why a turn stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TurnExit {
    /// The planner's best move was to end the turn.
    EndedTurn,
    OutOfTime,
    GameOver,
    /// The step budget ran out and the turn was force-ended.
    SafetyBudget,
    Skipped,
    PlayerMissing,
    /// The turn was cancelled from outside, e.g. by a new-game reset.
    Aborted,
}

impl TurnExit {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::EndedTurn => "ended-turn",
            Self::OutOfTime => "out-of-time",
            Self::GameOver => "game-over",
            Self::SafetyBudget => "safety-budget",
            Self::Skipped => "skipped",
            Self::PlayerMissing => "player-missing",
            Self::Aborted => "aborted",
        }
    }
}

impl fmt::Display for TurnExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One executed planning step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepRecord {
    /// 1-based within the turn.
    pub step: u32,
    pub action: AiAction,
    pub focus: GoalAxis,
    pub mistake: bool,
    pub hours_before: i32,
    pub rejection: Option<Rejection>,
}

impl StepRecord {
    #[must_use]
    pub const fn applied(&self) -> bool {
        self.rejection.is_none()
    }
}

/// Result of a single [`Agent::step`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// A mutation was attempted and the turn continues.
    Acted(StepRecord),
    /// The turn is over.
    Finished {
        exit: TurnExit,
        record: Option<StepRecord>,
    },
    /// No turn is in flight.
    Idle,
}

/// Everything that happened during one AI turn.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnReport {
    pub player: PlayerId,
    pub week: u32,
    pub steps: Vec<StepRecord>,
    pub exit: TurnExit,
}

impl TurnReport {
    #[must_use]
    pub fn rejections(&self) -> usize {
        self.steps.iter().filter(|step| !step.applied()).count()
    }

    #[must_use]
    pub fn forced(&self) -> bool {
        self.exit == TurnExit::SafetyBudget
    }
}

/// One autonomous opponent.
#[derive(Debug, Clone)]
pub struct Agent {
    id: PlayerId,
    config: AgentConfig,
    planner: ActionPlanner,
    rng: AgentRng,
    in_flight: bool,
    steps_remaining: u32,
    steps_taken: u32,
    skip: SkipHandle,
}

impl Agent {
    #[must_use]
    pub fn new(id: PlayerId, config: AgentConfig) -> Self {
        Self {
            id,
            planner: ActionPlanner::new(config.difficulty),
            rng: AgentRng::for_player(config.seed, id),
            config,
            in_flight: false,
            steps_remaining: 0,
            steps_taken: 0,
            skip: SkipHandle::default(),
        }
    }

    #[must_use]
    pub const fn id(&self) -> PlayerId {
        self.id
    }

    #[must_use]
    pub const fn config(&self) -> &AgentConfig {
        &self.config
    }

    #[must_use]
    pub const fn difficulty(&self) -> &DifficultySettings {
        &self.config.difficulty
    }

    #[must_use]
    pub const fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    #[must_use]
    pub const fn steps_remaining(&self) -> u32 {
        self.steps_remaining
    }

    /// Random draws consumed so far.
    #[must_use]
    pub const fn rng_draws(&self) -> u64 {
        self.rng.draws()
    }

    /// Handle another thread or UI can use to skip the current turn.
    #[must_use]
    pub fn skip_handle(&self) -> SkipHandle {
        self.skip.clone()
    }

    /// Enter the stepping state. Returns `false` and changes nothing when a
    /// turn is already in flight.
    pub fn begin_turn(&mut self) -> bool {
        if self.in_flight {
            debug!("{} ignored a second turn start", self.id);
            return false;
        }
        self.in_flight = true;
        self.steps_remaining = self.config.max_steps;
        self.steps_taken = 0;
        self.skip.clear();
        info!("{} begins turn ({} step budget)", self.id, self.steps_remaining);
        true
    }

    /// Drop the in-flight turn without touching the world.
    pub fn abort(&mut self) {
        if self.in_flight {
            info!("{} turn aborted", self.id);
        }
        self.in_flight = false;
        self.steps_remaining = 0;
    }

    /// Run one planning iteration against fresh world state.
    pub fn step<W>(
        &mut self,
        world: &mut W,
        repo: &ObserverRepository,
        goals: &GoalSettings,
        rivals: &[PlayerId],
    ) -> StepOutcome
    where
        W: World + ?Sized,
    {
        if !self.in_flight {
            return StepOutcome::Idle;
        }
        if self.skip.is_requested() {
            self.skip.clear();
            return self.finish(world, TurnExit::Skipped, true);
        }
        let Some(player) = world.player(self.id) else {
            warn!("{} vanished from the world mid-turn", self.id);
            return self.finish(world, TurnExit::PlayerMissing, false);
        };
        let has_time = player.time_remaining > 0;
        if world.is_game_over(self.id) {
            return self.finish(world, TurnExit::GameOver, has_time);
        }
        if self.steps_remaining == 0 {
            warn!(
                "{} exhausted its {}-step budget; forcing end of turn",
                self.id, self.config.max_steps
            );
            return self.finish(world, TurnExit::SafetyBudget, has_time);
        }
        if player.time_remaining < MIN_HOURS_TO_ACT {
            return self.finish(world, TurnExit::OutOfTime, has_time);
        }

        self.steps_remaining -= 1;
        self.steps_taken += 1;

        let weights =
            CounterStrategyWeights::compute(repo, rivals, self.config.difficulty.planning_depth);
        let plan = self
            .planner
            .plan(&player, goals, &weights, &*world, &mut self.rng);
        let action = plan.best().clone();

        let result = execute(world, self.id, &action.kind);
        if let Err(rejection) = &result {
            debug!("{} step {}: {action} rejected: {rejection}", self.id, self.steps_taken);
        } else {
            debug!("{} step {}: {action}", self.id, self.steps_taken);
        }
        let record = StepRecord {
            step: self.steps_taken,
            focus: plan.focus,
            mistake: plan.mistake,
            hours_before: player.time_remaining,
            rejection: result.err(),
            action,
        };

        if record.action.is_end_turn() {
            self.in_flight = false;
            info!("{} finished turn: {}", self.id, TurnExit::EndedTurn);
            return StepOutcome::Finished {
                exit: TurnExit::EndedTurn,
                record: Some(record),
            };
        }
        StepOutcome::Acted(record)
    }

    /// Begin a turn and step it to completion. `None` when a turn was
    /// already in flight.
    pub fn run_turn<W, P>(
        &mut self,
        world: &mut W,
        repo: &ObserverRepository,
        goals: &GoalSettings,
        pacer: &mut P,
    ) -> Option<TurnReport>
    where
        W: World + ?Sized,
        P: Pacer + ?Sized,
    {
        if !self.begin_turn() {
            return None;
        }
        let week = world.current_week();
        let rivals: Vec<PlayerId> = world
            .rivals_of(self.id)
            .iter()
            .map(|rival| rival.id)
            .collect();
        let delay = self.config.difficulty.decision_delay();

        let mut steps = Vec::new();
        let exit = loop {
            match self.step(world, repo, goals, &rivals) {
                StepOutcome::Acted(record) => {
                    steps.push(record);
                    pacer.pause(delay);
                }
                StepOutcome::Finished { exit, record } => {
                    steps.extend(record);
                    break exit;
                }
                StepOutcome::Idle => break TurnExit::Aborted,
            }
        };
        Some(TurnReport {
            player: self.id,
            week,
            steps,
            exit,
        })
    }

    fn finish<W>(&mut self, world: &mut W, exit: TurnExit, end_turn: bool) -> StepOutcome
    where
        W: World + ?Sized,
    {
        if end_turn
            && let Err(rejection) = world.end_turn(self.id)
        {
            debug!("{} end-turn rejected: {rejection}", self.id);
        }
        self.in_flight = false;
        info!("{} finished turn: {exit}", self.id);
        StepOutcome::Finished { exit, record: None }
    }
}

/// Map an action onto the world mutation that performs it.
fn execute<W>(world: &mut W, id: PlayerId, kind: &ActionKind) -> Result<(), Rejection>
where
    W: World + ?Sized,
{
    match kind {
        ActionKind::Move { to, hours } => world.move_to(id, *to, *hours),
        ActionKind::Work { hours, wage, .. } => world.work_shift(id, *hours, *wage).map(drop),
        ActionKind::BuyFood { cost } => world.buy_food(id, *cost),
        ActionKind::BuyClothing { cost } => world.buy_clothing(id, *cost),
        ActionKind::Study {
            degree_id,
            cost,
            hours,
        } => world.study_degree(id, degree_id, *cost, *hours),
        ActionKind::Graduate { degree_id } => world.complete_degree(id, degree_id),
        ActionKind::ApplyJob { job_id, .. } => world.apply_for_job(id, job_id),
        ActionKind::PayRent { .. } => world.pay_rent(id),
        ActionKind::DepositBank { amount } => world.deposit_to_bank(id, *amount),
        ActionKind::WithdrawBank { amount } => world.withdraw_from_bank(id, *amount),
        ActionKind::BuyAppliance { appliance_id, cost } => {
            world.buy_appliance(id, appliance_id, *cost)
        }
        ActionKind::MoveHousing { tier, cost, rent } => {
            world.upgrade_housing(id, *tier, *cost, *rent)
        }
        ActionKind::Rest { hours, .. } => world.rest_at_home(id, *hours).map(drop),
        ActionKind::EndTurn => world.end_turn(id),
    }
}
