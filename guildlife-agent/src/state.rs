//! Player-facing world state read by the agent.
//!
//! Everything here is owned by the world collaborator. The agent only reads
//! these records; all clamping of bounded stats happens on the mutation side.
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::constants::{DEFAULT_HOURS_PER_TURN, STAT_MAX};

/// Stable identifier for a participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player-{}", self.0)
    }
}

/// Board stops, in ring order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Location {
    NobleHeights,
    Landlord,
    Slums,
    Fence,
    GeneralStore,
    Bank,
    Forge,
    GuildHall,
    Cave,
    Academy,
    Enchanter,
    Armory,
    RustyTankard,
    ShadowMarket,
}

impl Location {
    /// Every stop in board order.
    pub const ALL: [Self; 14] = [
        Self::NobleHeights,
        Self::Landlord,
        Self::Slums,
        Self::Fence,
        Self::GeneralStore,
        Self::Bank,
        Self::Forge,
        Self::GuildHall,
        Self::Cave,
        Self::Academy,
        Self::Enchanter,
        Self::Armory,
        Self::RustyTankard,
        Self::ShadowMarket,
    ];

    /// Where food is sold.
    pub const FOOD: Self = Self::GeneralStore;
    /// Where rent is paid and housing is changed.
    pub const RENT: Self = Self::Landlord;
    /// Where clothing is sold.
    pub const CLOTHING: Self = Self::Armory;
    /// Where degrees are studied and conferred.
    pub const STUDY: Self = Self::Academy;
    /// Where deposits and withdrawals happen.
    pub const BANK: Self = Self::Bank;
    /// Where appliances are sold.
    pub const APPLIANCES: Self = Self::Enchanter;
    /// Where job applications are filed.
    pub const HIRING: Self = Self::GuildHall;

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::NobleHeights => "noble-heights",
            Self::Landlord => "landlord",
            Self::Slums => "slums",
            Self::Fence => "fence",
            Self::GeneralStore => "general-store",
            Self::Bank => "bank",
            Self::Forge => "forge",
            Self::GuildHall => "guild-hall",
            Self::Cave => "cave",
            Self::Academy => "academy",
            Self::Enchanter => "enchanter",
            Self::Armory => "armory",
            Self::RustyTankard => "rusty-tankard",
            Self::ShadowMarket => "shadow-market",
        }
    }

    /// Position on the ring.
    #[must_use]
    pub fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|candidate| *candidate == self)
            .unwrap_or(0)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Housing tiers, cheapest first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "kebab-case")]
pub enum HousingTier {
    #[default]
    Homeless,
    Slums,
    Noble,
}

impl HousingTier {
    /// Cheapest tier that carries rent.
    pub const CHEAPEST: Self = Self::Slums;
    /// Tier that keeps valuables safe from theft.
    pub const SAFEST: Self = Self::Noble;

    /// Where a resident of this tier rests.
    #[must_use]
    pub const fn home(self) -> Option<Location> {
        match self {
            Self::Homeless => None,
            Self::Slums => Some(Location::Slums),
            Self::Noble => Some(Location::NobleHeights),
        }
    }

    #[must_use]
    pub const fn pays_rent(self) -> bool {
        !matches!(self, Self::Homeless)
    }
}

/// Guild ranks in promotion order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "kebab-case")]
pub enum GuildRank {
    #[default]
    Novice,
    Apprentice,
    Journeyman,
    Adept,
    Veteran,
    Elite,
    GuildMaster,
}

impl GuildRank {
    pub const ALL: [Self; 7] = [
        Self::Novice,
        Self::Apprentice,
        Self::Journeyman,
        Self::Adept,
        Self::Veteran,
        Self::Elite,
        Self::GuildMaster,
    ];

    /// 1-based position in the promotion ladder.
    #[must_use]
    pub fn rank_index(self) -> u8 {
        let position = Self::ALL
            .iter()
            .position(|rank| *rank == self)
            .unwrap_or(0);
        u8::try_from(position + 1).unwrap_or(u8::MAX)
    }
}

/// Wear on an owned appliance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ApplianceState {
    #[default]
    Working,
    Broken,
}

/// Full player record as exposed by the world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    #[serde(default)]
    pub name: String,
    pub location: Location,
    /// Hours left this turn.
    pub time_remaining: i32,
    pub gold: i32,
    #[serde(default)]
    pub savings: i32,
    #[serde(default)]
    pub investments: i32,
    pub happiness: i32,
    #[serde(default)]
    pub completed_degrees: BTreeSet<String>,
    /// Sessions attended per degree id.
    #[serde(default)]
    pub degree_progress: BTreeMap<String, u32>,
    #[serde(default)]
    pub current_job: Option<String>,
    #[serde(default)]
    pub current_wage: i32,
    #[serde(default)]
    pub dependability: i32,
    #[serde(default)]
    pub experience: i32,
    #[serde(default)]
    pub guild_rank: GuildRank,
    #[serde(default)]
    pub housing: HousingTier,
    #[serde(default)]
    pub weeks_since_rent: u32,
    pub clothing_condition: i32,
    pub food_level: i32,
    pub health: i32,
    pub max_health: i32,
    #[serde(default)]
    pub dungeon_floors_cleared: BTreeSet<u32>,
    #[serde(default)]
    pub completed_quests: u32,
    #[serde(default)]
    pub equipped_weapon: Option<String>,
    #[serde(default)]
    pub equipped_armor: Option<String>,
    #[serde(default)]
    pub appliances: BTreeMap<String, ApplianceState>,
    /// Durable goods by item id with owned quantity.
    #[serde(default)]
    pub durables: BTreeMap<String, u32>,
}

impl Player {
    /// A fresh participant standing in the slums with a starter purse.
    #[must_use]
    pub fn new(id: PlayerId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            location: Location::Slums,
            time_remaining: DEFAULT_HOURS_PER_TURN,
            gold: 100,
            savings: 0,
            investments: 0,
            happiness: 50,
            completed_degrees: BTreeSet::new(),
            degree_progress: BTreeMap::new(),
            current_job: None,
            current_wage: 0,
            dependability: 0,
            experience: 0,
            guild_rank: GuildRank::Novice,
            housing: HousingTier::Slums,
            weeks_since_rent: 0,
            clothing_condition: STAT_MAX,
            food_level: STAT_MAX,
            health: STAT_MAX,
            max_health: STAT_MAX,
            dungeon_floors_cleared: BTreeSet::new(),
            completed_quests: 0,
            equipped_weapon: None,
            equipped_armor: None,
            appliances: BTreeMap::new(),
            durables: BTreeMap::new(),
        }
    }

    /// Gold on hand plus savings plus investments.
    #[must_use]
    pub fn total_wealth(&self) -> i64 {
        i64::from(self.gold) + i64::from(self.savings) + i64::from(self.investments)
    }

    #[must_use]
    pub const fn is_employed(&self) -> bool {
        self.current_job.is_some()
    }

    /// Appliances plus distinct durable goods.
    #[must_use]
    pub fn valuables_count(&self) -> usize {
        self.appliances.len() + self.durables.len()
    }

    #[must_use]
    pub fn sessions_attended(&self, degree_id: &str) -> u32 {
        self.degree_progress.get(degree_id).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn has_degree(&self, degree_id: &str) -> bool {
        self.completed_degrees.contains(degree_id)
    }

    #[must_use]
    pub const fn has_equipment(&self) -> bool {
        self.equipped_weapon.is_some() || self.equipped_armor.is_some()
    }
}
