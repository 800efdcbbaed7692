//! In-memory world for headless matches and tests.
//!
//! Implements every collaborator trait. All validation and clamping of
//! bounded stats happens here, so the agent never has to.
use log::debug;
use std::collections::{BTreeMap, BTreeSet};

use crate::board::{Board, RingBoard};
use crate::constants::{DEFAULT_HOURS_PER_TURN, STAT_MAX};
use crate::content::{Appliance, Catalog, Content, Degree, HousingOffer, Job, PriceList};
use crate::state::{ApplianceState, GuildRank, HousingTier, Location, Player, PlayerId};
use crate::world::{Rejection, WorldMutations, WorldStore};

const WEEKLY_FOOD_DECAY: i32 = 20;
const WEEKLY_CLOTHING_WEAR: i32 = 8;
const STARVATION_DAMAGE: i32 = 25;
const FED_RECOVERY: i32 = 5;
const EVICTION_WEEKS: u32 = 4;
const ERRAND_HOURS: i32 = 1;
const DEPENDABILITY_PER_SHIFT: i32 = 2;
const EXPERIENCE_PER_SHIFT: i32 = 3;
const EXPERIENCE_PER_RANK: i32 = 15;
const GRADUATION_HAPPINESS: i32 = 5;

#[derive(Debug, Clone)]
pub struct SandboxWorld {
    board: RingBoard,
    catalog: Catalog,
    players: BTreeMap<PlayerId, Player>,
    humans: BTreeSet<PlayerId>,
    game_over: BTreeSet<PlayerId>,
    /// Rent locked in at move-in, by player.
    leases: BTreeMap<PlayerId, i32>,
    ended_turns: BTreeMap<PlayerId, u32>,
    week: u32,
    hours_per_turn: i32,
}

impl Default for SandboxWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl SandboxWorld {
    /// Default board and catalog, starting in week 1.
    #[must_use]
    pub fn new() -> Self {
        Self::with_content(RingBoard::default(), Catalog::default_config())
    }

    #[must_use]
    pub fn with_content(board: RingBoard, catalog: Catalog) -> Self {
        Self {
            board,
            catalog,
            players: BTreeMap::new(),
            humans: BTreeSet::new(),
            game_over: BTreeSet::new(),
            leases: BTreeMap::new(),
            ended_turns: BTreeMap::new(),
            week: 1,
            hours_per_turn: DEFAULT_HOURS_PER_TURN,
        }
    }

    /// Register a participant. Humans are the rivals agents observe.
    pub fn add_player(&mut self, player: Player, human: bool) {
        if human {
            self.humans.insert(player.id);
        } else {
            self.humans.remove(&player.id);
        }
        self.players.insert(player.id, player);
    }

    #[must_use]
    pub fn player_ref(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(&id)
    }

    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    #[must_use]
    pub fn is_human(&self, id: PlayerId) -> bool {
        self.humans.contains(&id)
    }

    #[must_use]
    pub fn ended_turns(&self, id: PlayerId) -> u32 {
        self.ended_turns.get(&id).copied().unwrap_or(0)
    }

    #[must_use]
    pub const fn week(&self) -> u32 {
        self.week
    }

    pub fn set_game_over(&mut self, id: PlayerId) {
        self.game_over.insert(id);
    }

    /// Close the week: upkeep, rent clock, eviction, starvation, fresh hours.
    pub fn advance_week(&mut self) {
        self.week = self.week.saturating_add(1);
        for (id, player) in &mut self.players {
            if self.game_over.contains(id) {
                continue;
            }
            player.food_level = clamp_stat(player.food_level - WEEKLY_FOOD_DECAY);
            player.clothing_condition =
                clamp_stat(player.clothing_condition - WEEKLY_CLOTHING_WEAR);
            if player.housing.pays_rent() {
                player.weeks_since_rent = player.weeks_since_rent.saturating_add(1);
                if player.weeks_since_rent >= EVICTION_WEEKS {
                    debug!("{id} evicted after {} weeks", player.weeks_since_rent);
                    player.housing = HousingTier::Homeless;
                    player.weeks_since_rent = 0;
                    self.leases.remove(id);
                }
            }
            let health_change = if player.food_level == 0 {
                -STARVATION_DAMAGE
            } else {
                FED_RECOVERY
            };
            player.health = (player.health + health_change)
                .min(player.max_health)
                .max(0);
            player.time_remaining = self.hours_per_turn;
            if player.health == 0 {
                debug!("{id} collapsed in week {}", self.week);
                self.game_over.insert(*id);
            }
        }
    }

    fn live(&mut self, id: PlayerId) -> Result<&mut Player, Rejection> {
        if self.game_over.contains(&id) {
            return Err(Rejection::GameOver(id));
        }
        self.players.get_mut(&id).ok_or(Rejection::UnknownPlayer(id))
    }

    fn rent_for(&self, id: PlayerId, housing: HousingTier) -> i32 {
        self.leases
            .get(&id)
            .copied()
            .unwrap_or_else(|| self.catalog.housing_offer(housing).weekly_rent)
    }
}

fn clamp_stat(value: i32) -> i32 {
    value.clamp(0, STAT_MAX)
}

fn require_at(player: &Player, expected: Location) -> Result<(), Rejection> {
    if player.location == expected {
        Ok(())
    } else {
        Err(Rejection::WrongLocation {
            expected,
            actual: player.location,
        })
    }
}

fn require_hours(player: &Player, need: i32) -> Result<(), Rejection> {
    if player.time_remaining >= need {
        Ok(())
    } else {
        Err(Rejection::InsufficientTime {
            need,
            have: player.time_remaining,
        })
    }
}

fn require_gold(player: &Player, need: i32) -> Result<(), Rejection> {
    if player.gold >= need {
        Ok(())
    } else {
        Err(Rejection::InsufficientGold {
            need,
            have: player.gold,
        })
    }
}

fn rank_for_experience(experience: i32) -> GuildRank {
    let tier = usize::try_from(experience / EXPERIENCE_PER_RANK).unwrap_or(0);
    GuildRank::ALL[tier.min(GuildRank::ALL.len() - 1)]
}

impl WorldStore for SandboxWorld {
    fn player(&self, id: PlayerId) -> Option<Player> {
        self.players.get(&id).cloned()
    }

    fn is_game_over(&self, id: PlayerId) -> bool {
        self.game_over.contains(&id)
    }

    fn current_week(&self) -> u32 {
        self.week
    }

    fn rivals_of(&self, id: PlayerId) -> Vec<Player> {
        self.humans
            .iter()
            .filter(|human| **human != id)
            .filter_map(|human| self.players.get(human).cloned())
            .collect()
    }
}

impl WorldMutations for SandboxWorld {
    fn move_to(&mut self, id: PlayerId, to: Location, time_cost: i32) -> Result<(), Rejection> {
        let from = self.players.get(&id).map(|player| player.location);
        let distance = from.map_or(0, |from| self.board.shortest_distance(from, to));
        let player = self.live(id)?;
        if player.location == to {
            return Err(Rejection::NothingToDo("already there"));
        }
        let cost = time_cost.max(distance);
        require_hours(player, cost)?;
        player.location = to;
        player.time_remaining -= cost;
        Ok(())
    }

    fn work_shift(&mut self, id: PlayerId, hours: i32, wage: i32) -> Result<i32, Rejection> {
        let site = self
            .players
            .get(&id)
            .and_then(|player| player.current_job.as_deref())
            .and_then(|job_id| self.catalog.job_location(job_id));
        let player = self.live(id)?;
        let Some(site) = site else {
            return Err(Rejection::NothingToDo("no job"));
        };
        require_at(player, site)?;
        require_hours(player, hours)?;
        let earned = hours.saturating_mul(wage.max(0));
        player.gold = player.gold.saturating_add(earned);
        player.time_remaining -= hours;
        player.dependability = clamp_stat(player.dependability + DEPENDABILITY_PER_SHIFT);
        player.experience = clamp_stat(player.experience + EXPERIENCE_PER_SHIFT);
        player.guild_rank = player.guild_rank.max(rank_for_experience(player.experience));
        Ok(earned)
    }

    fn buy_food(&mut self, id: PlayerId, cost: i32) -> Result<(), Rejection> {
        let restore = self.catalog.prices.food_restore;
        let player = self.live(id)?;
        require_at(player, Location::FOOD)?;
        require_hours(player, ERRAND_HOURS)?;
        require_gold(player, cost)?;
        player.gold -= cost;
        player.time_remaining -= ERRAND_HOURS;
        player.food_level = clamp_stat(player.food_level + restore);
        Ok(())
    }

    fn buy_clothing(&mut self, id: PlayerId, cost: i32) -> Result<(), Rejection> {
        let player = self.live(id)?;
        require_at(player, Location::CLOTHING)?;
        require_hours(player, ERRAND_HOURS)?;
        require_gold(player, cost)?;
        player.gold -= cost;
        player.time_remaining -= ERRAND_HOURS;
        player.clothing_condition = STAT_MAX;
        Ok(())
    }

    fn buy_appliance(
        &mut self,
        id: PlayerId,
        appliance_id: &str,
        cost: i32,
    ) -> Result<(), Rejection> {
        let boost = self
            .catalog
            .appliance(appliance_id)
            .map(|appliance| appliance.happiness)
            .ok_or_else(|| Rejection::UnknownContent {
                id: appliance_id.to_string(),
            })?;
        let player = self.live(id)?;
        require_at(player, Location::APPLIANCES)?;
        if player.appliances.contains_key(appliance_id) {
            return Err(Rejection::NothingToDo("appliance already owned"));
        }
        require_hours(player, ERRAND_HOURS)?;
        require_gold(player, cost)?;
        player.gold -= cost;
        player.time_remaining -= ERRAND_HOURS;
        player
            .appliances
            .insert(appliance_id.to_string(), ApplianceState::Working);
        player.happiness = clamp_stat(player.happiness + boost);
        Ok(())
    }

    fn study_degree(
        &mut self,
        id: PlayerId,
        degree_id: &str,
        cost: i32,
        hours: i32,
    ) -> Result<(), Rejection> {
        let degree = self
            .catalog
            .degree(degree_id)
            .cloned()
            .ok_or_else(|| Rejection::UnknownContent {
                id: degree_id.to_string(),
            })?;
        let player = self.live(id)?;
        require_at(player, Location::STUDY)?;
        if !degree.is_unlocked_for(player) {
            return Err(Rejection::NothingToDo("degree not open"));
        }
        if degree.ready_to_graduate(player) {
            return Err(Rejection::NothingToDo("sessions complete"));
        }
        require_hours(player, hours)?;
        require_gold(player, cost)?;
        player.gold -= cost;
        player.time_remaining -= hours;
        *player.degree_progress.entry(degree.id).or_insert(0) += 1;
        Ok(())
    }

    fn complete_degree(&mut self, id: PlayerId, degree_id: &str) -> Result<(), Rejection> {
        let degree = self
            .catalog
            .degree(degree_id)
            .cloned()
            .ok_or_else(|| Rejection::UnknownContent {
                id: degree_id.to_string(),
            })?;
        let player = self.live(id)?;
        require_at(player, Location::STUDY)?;
        if player.has_degree(degree_id) {
            return Err(Rejection::NothingToDo("already graduated"));
        }
        if !degree.ready_to_graduate(player) {
            return Err(Rejection::NothingToDo("sessions outstanding"));
        }
        player.degree_progress.remove(degree_id);
        player.completed_degrees.insert(degree.id);
        player.happiness = clamp_stat(player.happiness + GRADUATION_HAPPINESS);
        Ok(())
    }

    fn apply_for_job(&mut self, id: PlayerId, job_id: &str) -> Result<(), Rejection> {
        let job = self
            .catalog
            .job(job_id)
            .cloned()
            .ok_or_else(|| Rejection::UnknownContent {
                id: job_id.to_string(),
            })?;
        let player = self.live(id)?;
        require_at(player, Location::HIRING)?;
        if player.current_job.as_deref() == Some(job_id) {
            return Err(Rejection::NothingToDo("already employed there"));
        }
        if !job.qualifies(player) {
            return Err(Rejection::NotQualified { job: job.id });
        }
        require_hours(player, ERRAND_HOURS)?;
        player.time_remaining -= ERRAND_HOURS;
        player.current_wage = job.base_wage;
        player.current_job = Some(job.id);
        Ok(())
    }

    fn pay_rent(&mut self, id: PlayerId) -> Result<(), Rejection> {
        let housing = self
            .players
            .get(&id)
            .map_or(HousingTier::Homeless, |player| player.housing);
        let rent = self.rent_for(id, housing);
        let player = self.live(id)?;
        require_at(player, Location::RENT)?;
        if !player.housing.pays_rent() {
            return Err(Rejection::NothingToDo("no lease"));
        }
        require_hours(player, ERRAND_HOURS)?;
        require_gold(player, rent)?;
        player.gold -= rent;
        player.time_remaining -= ERRAND_HOURS;
        player.weeks_since_rent = 0;
        Ok(())
    }

    fn deposit_to_bank(&mut self, id: PlayerId, amount: i32) -> Result<(), Rejection> {
        let player = self.live(id)?;
        require_at(player, Location::BANK)?;
        if amount <= 0 {
            return Err(Rejection::NothingToDo("empty deposit"));
        }
        require_hours(player, ERRAND_HOURS)?;
        require_gold(player, amount)?;
        player.gold -= amount;
        player.savings = player.savings.saturating_add(amount);
        player.time_remaining -= ERRAND_HOURS;
        Ok(())
    }

    fn withdraw_from_bank(&mut self, id: PlayerId, amount: i32) -> Result<(), Rejection> {
        let player = self.live(id)?;
        require_at(player, Location::BANK)?;
        if amount <= 0 || amount > player.savings {
            return Err(Rejection::NothingToDo("savings too low"));
        }
        require_hours(player, ERRAND_HOURS)?;
        player.savings -= amount;
        player.gold = player.gold.saturating_add(amount);
        player.time_remaining -= ERRAND_HOURS;
        Ok(())
    }

    fn upgrade_housing(
        &mut self,
        id: PlayerId,
        tier: HousingTier,
        cost: i32,
        new_rent: i32,
    ) -> Result<(), Rejection> {
        let player = self.live(id)?;
        require_at(player, Location::RENT)?;
        if tier <= player.housing {
            return Err(Rejection::NothingToDo("not an upgrade"));
        }
        require_hours(player, ERRAND_HOURS)?;
        require_gold(player, cost)?;
        player.gold -= cost;
        player.time_remaining -= ERRAND_HOURS;
        player.housing = tier;
        player.weeks_since_rent = 0;
        self.leases.insert(id, new_rent);
        Ok(())
    }

    fn rest_at_home(&mut self, id: PlayerId, hours: i32) -> Result<i32, Rejection> {
        let prices = self.catalog.prices;
        let player = self.live(id)?;
        let Some(home) = player.housing.home() else {
            return Err(Rejection::NothingToDo("no home"));
        };
        require_at(player, home)?;
        if hours <= 0 {
            return Err(Rejection::NothingToDo("no rest"));
        }
        require_hours(player, hours)?;
        let gain = prices.rest_happiness * hours / prices.rest_hours.max(1);
        let before = player.happiness;
        player.happiness = clamp_stat(player.happiness + gain);
        player.time_remaining -= hours;
        Ok(player.happiness - before)
    }

    fn end_turn(&mut self, id: PlayerId) -> Result<(), Rejection> {
        let player = self.live(id)?;
        player.time_remaining = 0;
        *self.ended_turns.entry(id).or_insert(0) += 1;
        Ok(())
    }
}

impl Board for SandboxWorld {
    fn shortest_distance(&self, from: Location, to: Location) -> i32 {
        self.board.shortest_distance(from, to)
    }
}

impl Content for SandboxWorld {
    fn jobs(&self) -> &[Job] {
        &self.catalog.jobs
    }

    fn degrees(&self) -> &[Degree] {
        &self.catalog.degrees
    }

    fn appliances(&self) -> &[Appliance] {
        &self.catalog.appliances
    }

    fn housing_offers(&self) -> &[HousingOffer] {
        &self.catalog.housing
    }

    fn prices(&self) -> PriceList {
        self.catalog.prices
    }
}
