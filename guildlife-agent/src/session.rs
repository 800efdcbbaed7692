use log::{info, warn};
use std::collections::BTreeMap;

use crate::config::{AgentConfig, ConfigError};
use crate::goals::GoalSettings;
use crate::observer::ObserverRepository;
use crate::runner::{Agent, Pacer, SkipHandle, TurnReport};
use crate::state::PlayerId;
use crate::world::World;

/// Game-session context binding the observer state, the victory targets
/// and one agent per AI-controlled player.
#[derive(Debug, Clone)]
pub struct OpponentSession {
    repository: ObserverRepository,
    goals: GoalSettings,
    agents: BTreeMap<PlayerId, Agent>,
}

impl OpponentSession {
    /// # Errors
    ///
    /// Returns an error if any goal target is not positive.
    pub fn new(goals: GoalSettings) -> Result<Self, ConfigError> {
        goals.validate()?;
        Ok(Self {
            repository: ObserverRepository::new(),
            goals,
            agents: BTreeMap::new(),
        })
    }

    /// Register an agent for `id`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation.
    pub fn add_agent(&mut self, id: PlayerId, config: AgentConfig) -> Result<&Agent, ConfigError> {
        config.validate()?;
        self.agents.insert(id, Agent::new(id, config));
        info!(
            "{id} joins as an AI opponent (depth {})",
            config.difficulty.planning_depth
        );
        Ok(&self.agents[&id])
    }

    /// Feed the observer with the current rivals, then play `id`'s turn.
    ///
    /// Returns `None` when `id` has no agent or a turn is already running.
    pub fn run_ai_turn<W, P>(
        &mut self,
        world: &mut W,
        id: PlayerId,
        pacer: &mut P,
    ) -> Option<TurnReport>
    where
        W: World + ?Sized,
        P: Pacer + ?Sized,
    {
        let Some(agent) = self.agents.get_mut(&id) else {
            warn!("no AI agent registered for {id}");
            return None;
        };
        let rivals = world.rivals_of(id);
        self.repository.observe(&rivals, world.current_week());
        agent.run_turn(world, &self.repository, &self.goals, pacer)
    }

    /// Clear every rival profile and cancel any in-flight turn.
    pub fn reset_for_new_game(&mut self) {
        self.repository.reset();
        for agent in self.agents.values_mut() {
            agent.abort();
        }
        info!("opponent session reset for a new game");
    }

    #[must_use]
    pub fn agent(&self, id: PlayerId) -> Option<&Agent> {
        self.agents.get(&id)
    }

    pub fn agent_ids(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.agents.keys().copied()
    }

    #[must_use]
    pub fn skip_handle(&self, id: PlayerId) -> Option<SkipHandle> {
        self.agents.get(&id).map(Agent::skip_handle)
    }

    #[must_use]
    pub const fn goals(&self) -> &GoalSettings {
        &self.goals
    }

    #[must_use]
    pub const fn repository(&self) -> &ObserverRepository {
        &self.repository
    }

    pub const fn repository_mut(&mut self) -> &mut ObserverRepository {
        &mut self.repository
    }
}
