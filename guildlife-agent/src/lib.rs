//! Guild Life Opponent Engine
//!
//! Platform-agnostic decision engine for the computer-controlled rival in
//! Guild Life. The crate scores goal progress and resource pressure, learns
//! how human rivals play, and turns all of it into a ranked list of actions
//! that a turn runner executes one at a time against a [`World`].

pub mod action;
pub mod board;
pub mod config;
mod constants;
pub mod content;
pub mod counter;
pub mod focus;
pub mod goals;
pub mod numbers;
pub mod observer;
pub mod planner;
pub mod rng;
pub mod runner;
pub mod sandbox;
pub mod session;
pub mod state;
pub mod urgency;
pub mod world;

// Re-export commonly used types
pub use action::{ActionKind, ActionList, AiAction};
pub use board::{Board, RingBoard};
pub use config::{AgentConfig, ConfigError, DifficultyLevel, DifficultyPresets, DifficultySettings};
pub use content::{Appliance, Catalog, Content, Degree, HousingOffer, Job, PriceList};
pub use counter::CounterStrategyWeights;
pub use focus::{FocusAxis, FocusWeights};
pub use goals::{AxisProgress, GoalAxis, GoalProgress, GoalSettings};
pub use observer::{
    FocusSignals, ObserverRepository, PlayerSnapshot, PlayerStrategyProfile, StrategyLabel,
    TurnDelta,
};
pub use planner::{ActionPlan, ActionPlanner};
pub use rng::AgentRng;
pub use runner::{
    Agent, NoDelay, Pacer, SkipHandle, StepOutcome, StepRecord, ThreadSleep, TurnExit, TurnReport,
};
pub use sandbox::SandboxWorld;
pub use session::OpponentSession;
pub use state::{ApplianceState, GuildRank, HousingTier, Location, Player, PlayerId};
pub use urgency::ResourceUrgency;
pub use world::{PlanningEnv, Rejection, World, WorldMutations, WorldStore};
