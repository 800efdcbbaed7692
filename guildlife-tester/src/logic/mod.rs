pub mod policy;
pub mod reports;
pub mod seeds;
pub mod simulation;

pub use policy::RivalStrategy;
pub use seeds::resolve_seed_inputs;
pub use simulation::{MatchConfig, MatchOutcome, run_match};
