use std::fmt;

use guildlife_agent::{
    Board, Content, Location, Player, PlayerId, Rejection, SandboxWorld, StrategyLabel,
    WorldMutations,
};
use log::trace;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

const HUNGRY_BELOW: i32 = 50;
const RENT_GRACE_WEEKS: u32 = 2;
const HEDONIST_REST_HOURS: i32 = 8;
const DELVE_HOURS: i32 = 10;
const DELVE_LOOT: i32 = 20;
const WEAPON_ID: &str = "iron-sword";
const WEAPON_COST: i32 = 60;
const MAX_ERRANDS: usize = 32;
const SCHOLAR_RESERVE: i32 = 100;

/// What a scripted rival got done in one week.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekLog {
    pub errands: u32,
    pub refusals: u32,
}

/// Scripted stand-in for a human player.
pub trait RivalPolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    /// Spend the rival's hours for the current week.
    fn play_week(&mut self, world: &mut SandboxWorld, id: PlayerId) -> WeekLog;
}

/// Built-in rival archetypes for automated matches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RivalStrategy {
    Scholar,
    Grinder,
    Adventurer,
    Hedonist,
    Random,
}

impl RivalStrategy {
    pub const ALL: [Self; 5] = [
        Self::Scholar,
        Self::Grinder,
        Self::Adventurer,
        Self::Hedonist,
        Self::Random,
    ];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Scholar => "scholar",
            Self::Grinder => "grinder",
            Self::Adventurer => "adventurer",
            Self::Hedonist => "hedonist",
            Self::Random => "random",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Scholar => "studies every open degree, working shifts to cover tuition",
            Self::Grinder => "takes the best job on offer and works every hour",
            Self::Adventurer => "delves the cave each week and gears up once",
            Self::Hedonist => "buys comforts and rests at home",
            Self::Random => "picks one of the other archetypes each week",
        }
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.key().eq_ignore_ascii_case(key))
    }

    /// Label the observer should converge on for this archetype.
    #[must_use]
    pub const fn expected_label(self) -> Option<StrategyLabel> {
        match self {
            Self::Scholar => Some(StrategyLabel::EducationRush),
            Self::Grinder => Some(StrategyLabel::WealthGrind),
            Self::Adventurer => Some(StrategyLabel::CombatFocus),
            Self::Hedonist => Some(StrategyLabel::HappinessFocus),
            Self::Random => None,
        }
    }

    #[must_use]
    pub fn create_policy(self, seed: u64) -> Box<dyn RivalPolicy + Send> {
        match self {
            Self::Scholar => Box::new(ScholarPolicy),
            Self::Grinder => Box::new(GrinderPolicy),
            Self::Adventurer => Box::new(AdventurerPolicy),
            Self::Hedonist => Box::new(HedonistPolicy),
            Self::Random => Box::new(RandomPolicy::new(seed)),
        }
    }
}

impl fmt::Display for RivalStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

struct ScholarPolicy;
struct GrinderPolicy;
struct AdventurerPolicy;
struct HedonistPolicy;

struct RandomPolicy {
    rng: ChaCha20Rng,
}

impl RandomPolicy {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

/// Errand runner over one player's week.
struct Errands<'a> {
    world: &'a mut SandboxWorld,
    id: PlayerId,
    log: WeekLog,
}

impl<'a> Errands<'a> {
    fn new(world: &'a mut SandboxWorld, id: PlayerId) -> Self {
        Self {
            world,
            id,
            log: WeekLog::default(),
        }
    }

    fn player(&self) -> Option<&Player> {
        self.world.player_ref(self.id)
    }

    fn hours(&self) -> i32 {
        self.player().map_or(0, |player| player.time_remaining)
    }

    fn attempt<T>(&mut self, result: Result<T, Rejection>) -> bool {
        match result {
            Ok(_) => {
                self.log.errands += 1;
                true
            }
            Err(rejection) => {
                trace!("{} errand refused: {rejection}", self.id);
                self.log.refusals += 1;
                false
            }
        }
    }

    fn go(&mut self, site: Location) -> bool {
        let Some(from) = self.player().map(|player| player.location) else {
            return false;
        };
        if from == site {
            return true;
        }
        let hours = self.world.shortest_distance(from, site);
        let result = self.world.move_to(self.id, site, hours);
        self.attempt(result)
    }

    fn keep_fed(&mut self) {
        let cost = self.world.prices().food_cost;
        let hungry = self
            .player()
            .is_some_and(|player| player.food_level < HUNGRY_BELOW && player.gold >= cost);
        if hungry && self.go(Location::FOOD) {
            let result = self.world.buy_food(self.id, cost);
            self.attempt(result);
        }
    }

    fn keep_lease(&mut self) {
        let overdue = self.player().is_some_and(|player| {
            player.housing.pays_rent() && player.weeks_since_rent >= RENT_GRACE_WEEKS
        });
        if overdue && self.go(Location::RENT) {
            let result = self.world.pay_rent(self.id);
            self.attempt(result);
        }
    }

    fn finish(self) -> WeekLog {
        self.log
    }
}

/// One scholar errand: graduate, attend a session, or earn tuition.
enum ScholarStep {
    Graduate(String),
    Study { degree: String, cost: i32, hours: i32 },
    Apply(String),
    Work { site: Location, hours: i32, wage: i32 },
}

impl Errands<'_> {
    fn scholar_step(&self) -> Option<ScholarStep> {
        let player = self.player()?;
        let hours = player.time_remaining;
        if let Some(degree) = self.world.available_degrees(player).into_iter().next() {
            if degree.ready_to_graduate(player) {
                return Some(ScholarStep::Graduate(degree.id.clone()));
            }
            let to_study = self.world.shortest_distance(player.location, Location::STUDY);
            if player.gold - degree.cost >= SCHOLAR_RESERVE && hours >= to_study + degree.hours {
                return Some(ScholarStep::Study {
                    degree: degree.id.clone(),
                    cost: degree.cost,
                    hours: degree.hours,
                });
            }
        }

        let upgrade = self
            .world
            .available_jobs(player)
            .into_iter()
            .filter(|job| player.current_job.is_none() || job.location == Location::STUDY)
            .max_by_key(|job| job.base_wage)
            .filter(|job| player.current_job.as_deref() != Some(job.id.as_str()))
            .filter(|job| job.base_wage > player.current_wage);
        if let Some(job) = upgrade {
            let to_hiring = self.world.shortest_distance(player.location, Location::HIRING);
            if hours > to_hiring {
                return Some(ScholarStep::Apply(job.id.clone()));
            }
        }

        let job = self.world.job(player.current_job.as_deref()?)?;
        let to_site = self.world.shortest_distance(player.location, job.location);
        (hours >= to_site + job.shift_hours).then_some(ScholarStep::Work {
            site: job.location,
            hours: job.shift_hours,
            wage: player.current_wage,
        })
    }
}

impl RivalPolicy for ScholarPolicy {
    fn name(&self) -> &'static str {
        "Scholar"
    }

    fn play_week(&mut self, world: &mut SandboxWorld, id: PlayerId) -> WeekLog {
        let mut errands = Errands::new(world, id);
        errands.keep_fed();
        errands.keep_lease();
        for _ in 0..MAX_ERRANDS {
            let Some(step) = errands.scholar_step() else {
                break;
            };
            let done = match step {
                ScholarStep::Graduate(degree) => {
                    errands.go(Location::STUDY) && {
                        let result = errands.world.complete_degree(id, &degree);
                        errands.attempt(result)
                    }
                }
                ScholarStep::Study {
                    degree,
                    cost,
                    hours,
                } => {
                    errands.go(Location::STUDY) && {
                        let result = errands.world.study_degree(id, &degree, cost, hours);
                        errands.attempt(result)
                    }
                }
                ScholarStep::Apply(job) => {
                    errands.go(Location::HIRING) && {
                        let result = errands.world.apply_for_job(id, &job);
                        errands.attempt(result)
                    }
                }
                ScholarStep::Work { site, hours, wage } => {
                    errands.go(site) && {
                        let result = errands.world.work_shift(id, hours, wage);
                        errands.attempt(result)
                    }
                }
            };
            if !done {
                break;
            }
        }
        errands.finish()
    }
}

impl RivalPolicy for GrinderPolicy {
    fn name(&self) -> &'static str {
        "Grinder"
    }

    fn play_week(&mut self, world: &mut SandboxWorld, id: PlayerId) -> WeekLog {
        let mut errands = Errands::new(world, id);
        errands.keep_fed();
        errands.keep_lease();

        let best = errands.player().and_then(|player| {
            errands
                .world
                .available_jobs(player)
                .into_iter()
                .max_by_key(|job| job.base_wage)
                .filter(|job| player.current_job.as_deref() != Some(job.id.as_str()))
                .filter(|job| job.base_wage > player.current_wage)
                .map(|job| job.id.clone())
        });
        if let Some(job_id) = best
            && errands.go(Location::HIRING)
        {
            let result = errands.world.apply_for_job(id, &job_id);
            errands.attempt(result);
        }

        let shift = errands.player().and_then(|player| {
            let job = errands.world.job(player.current_job.as_deref()?)?;
            Some((job.location, job.shift_hours, player.current_wage))
        });
        let Some((site, hours, wage)) = shift else {
            return errands.finish();
        };
        if !errands.go(site) {
            return errands.finish();
        }
        for _ in 0..MAX_ERRANDS {
            if errands.hours() < hours {
                break;
            }
            let result = errands.world.work_shift(id, hours, wage);
            if !errands.attempt(result) {
                break;
            }
        }
        errands.finish()
    }
}

impl RivalPolicy for AdventurerPolicy {
    fn name(&self) -> &'static str {
        "Adventurer"
    }

    fn play_week(&mut self, world: &mut SandboxWorld, id: PlayerId) -> WeekLog {
        let mut errands = Errands::new(world, id);
        errands.keep_fed();

        let needs_weapon = errands
            .player()
            .is_some_and(|player| player.equipped_weapon.is_none() && player.gold >= WEAPON_COST);
        if needs_weapon
            && errands.go(Location::CLOTHING)
            && let Some(player) = errands.world.player_mut(id)
        {
            player.gold -= WEAPON_COST;
            player.equipped_weapon = Some(WEAPON_ID.to_string());
            errands.log.errands += 1;
        }

        if errands.hours() >= DELVE_HOURS
            && errands.go(Location::Cave)
            && let Some(player) = errands.world.player_mut(id)
            && player.time_remaining >= DELVE_HOURS
        {
            let floor = u32::try_from(player.dungeon_floors_cleared.len()).unwrap_or(u32::MAX);
            player.dungeon_floors_cleared.insert(floor.saturating_add(1));
            player.completed_quests = player.completed_quests.saturating_add(1);
            player.time_remaining -= DELVE_HOURS;
            player.gold = player.gold.saturating_add(DELVE_LOOT);
            errands.log.errands += 1;
        }
        errands.finish()
    }
}

impl RivalPolicy for HedonistPolicy {
    fn name(&self) -> &'static str {
        "Hedonist"
    }

    fn play_week(&mut self, world: &mut SandboxWorld, id: PlayerId) -> WeekLog {
        let mut errands = Errands::new(world, id);
        errands.keep_fed();
        errands.keep_lease();

        let comfort = errands.player().and_then(|player| {
            errands
                .world
                .appliances()
                .iter()
                .filter(|appliance| !player.appliances.contains_key(&appliance.id))
                .filter(|appliance| appliance.cost <= player.gold)
                .min_by_key(|appliance| appliance.cost)
                .map(|appliance| (appliance.id.clone(), appliance.cost))
        });
        if let Some((appliance_id, cost)) = comfort
            && errands.go(Location::APPLIANCES)
        {
            let result = errands.world.buy_appliance(id, &appliance_id, cost);
            errands.attempt(result);
        }

        let home = errands.player().and_then(|player| player.housing.home());
        if let Some(home) = home
            && errands.go(home)
            && errands.hours() >= HEDONIST_REST_HOURS
        {
            let result = errands.world.rest_at_home(id, HEDONIST_REST_HOURS);
            errands.attempt(result);
        }
        errands.finish()
    }
}

impl RivalPolicy for RandomPolicy {
    fn name(&self) -> &'static str {
        "Random"
    }

    fn play_week(&mut self, world: &mut SandboxWorld, id: PlayerId) -> WeekLog {
        let mut inner: Box<dyn RivalPolicy> = match self.rng.gen_range(0..4) {
            0 => Box::new(ScholarPolicy),
            1 => Box::new(GrinderPolicy),
            2 => Box::new(AdventurerPolicy),
            _ => Box::new(HedonistPolicy),
        };
        trace!("{id} plays {} this week", inner.name());
        inner.play_week(world, id)
    }
}
