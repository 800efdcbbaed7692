//! Read-only content tables: jobs, degrees, appliances, housing and prices.
use serde::{Deserialize, Serialize};

use crate::state::{HousingTier, Location, Player};

const DEFAULT_CATALOG_DATA: &str = include_str!("../data/catalog.json");

/// A position offered at some board location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub name: String,
    pub location: Location,
    pub base_wage: i32,
    #[serde(default = "default_shift_hours")]
    pub shift_hours: i32,
    #[serde(default)]
    pub required_degrees: Vec<String>,
    #[serde(default)]
    pub min_dependability: i32,
    #[serde(default)]
    pub min_experience: i32,
}

impl Job {
    /// Whether the player meets every hiring requirement.
    #[must_use]
    pub fn qualifies(&self, player: &Player) -> bool {
        self.required_degrees
            .iter()
            .all(|degree| player.has_degree(degree))
            && player.dependability >= self.min_dependability
            && player.experience >= self.min_experience
    }

    /// Whether completing `degree_id` is the last missing degree for this job.
    #[must_use]
    pub fn unlocked_solely_by(&self, degree_id: &str, player: &Player) -> bool {
        self.required_degrees.iter().any(|degree| degree == degree_id)
            && self
                .required_degrees
                .iter()
                .filter(|degree| degree.as_str() != degree_id)
                .all(|degree| player.has_degree(degree))
    }
}

/// A course of study completed over several sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Degree {
    pub id: String,
    pub name: String,
    /// Gold per session.
    pub cost: i32,
    /// Hours per session.
    pub hours: i32,
    pub sessions_required: u32,
    #[serde(default)]
    pub prerequisites: Vec<String>,
}

impl Degree {
    #[must_use]
    pub fn is_unlocked_for(&self, player: &Player) -> bool {
        !player.has_degree(&self.id)
            && self
                .prerequisites
                .iter()
                .all(|degree| player.has_degree(degree))
    }

    #[must_use]
    pub fn ready_to_graduate(&self, player: &Player) -> bool {
        player.sessions_attended(&self.id) >= self.sessions_required
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appliance {
    pub id: String,
    pub name: String,
    pub cost: i32,
    #[serde(default)]
    pub happiness: i32,
}

/// Terms for living in a housing tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HousingOffer {
    pub tier: HousingTier,
    pub move_in_cost: i32,
    pub weekly_rent: i32,
}

/// Fixed shop prices and rest terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceList {
    pub food_cost: i32,
    pub food_restore: i32,
    pub clothing_cost: i32,
    pub rest_hours: i32,
    pub rest_happiness: i32,
}

impl Default for PriceList {
    fn default() -> Self {
        Self {
            food_cost: 25,
            food_restore: 50,
            clothing_cost: 40,
            rest_hours: 4,
            rest_happiness: 5,
        }
    }
}

/// Query surface over the content tables.
///
/// Implementors only supply the raw tables; the filtered views are derived.
pub trait Content {
    fn jobs(&self) -> &[Job];
    fn degrees(&self) -> &[Degree];
    fn appliances(&self) -> &[Appliance];
    fn housing_offers(&self) -> &[HousingOffer];
    fn prices(&self) -> PriceList;

    fn job(&self, job_id: &str) -> Option<&Job> {
        self.jobs().iter().find(|job| job.id == job_id)
    }

    fn degree(&self, degree_id: &str) -> Option<&Degree> {
        self.degrees().iter().find(|degree| degree.id == degree_id)
    }

    fn appliance(&self, appliance_id: &str) -> Option<&Appliance> {
        self.appliances()
            .iter()
            .find(|appliance| appliance.id == appliance_id)
    }

    /// Jobs the player is currently qualified for.
    fn available_jobs(&self, player: &Player) -> Vec<&Job> {
        self.jobs()
            .iter()
            .filter(|job| job.qualifies(player))
            .collect()
    }

    /// Degrees whose prerequisites are met and that are not yet completed.
    fn available_degrees(&self, player: &Player) -> Vec<&Degree> {
        self.degrees()
            .iter()
            .filter(|degree| degree.is_unlocked_for(player))
            .collect()
    }

    fn job_location(&self, job_id: &str) -> Option<Location> {
        self.job(job_id).map(|job| job.location)
    }

    fn housing_offer(&self, tier: HousingTier) -> HousingOffer {
        self.housing_offers()
            .iter()
            .find(|offer| offer.tier == tier)
            .copied()
            .unwrap_or(HousingOffer {
                tier,
                move_in_cost: 0,
                weekly_rent: 0,
            })
    }
}

/// Complete content bundle, usually loaded from the embedded JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Catalog {
    #[serde(default)]
    pub jobs: Vec<Job>,
    #[serde(default)]
    pub degrees: Vec<Degree>,
    #[serde(default)]
    pub appliances: Vec<Appliance>,
    #[serde(default)]
    pub housing: Vec<HousingOffer>,
    #[serde(default)]
    pub prices: PriceList,
}

impl Catalog {
    /// Parse the catalog bundled with the crate.
    #[must_use]
    pub fn load_from_static() -> Self {
        serde_json::from_str::<Self>(DEFAULT_CATALOG_DATA)
            .ok()
            .filter(|catalog| {
                !catalog.jobs.is_empty()
                    && !catalog.degrees.is_empty()
                    && !catalog.housing.is_empty()
            })
            .unwrap_or_else(Self::builtin)
    }

    /// Compiled-in copy of the bundled tables.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            jobs: vec![
                job("floor-sweeper", "Floor Sweeper", Location::GeneralStore, 4, 6, &[]),
                job("tavern-hand", "Tavern Hand", Location::RustyTankard, 5, 6, &[]),
                Job {
                    min_dependability: 10,
                    ..job("forge-laborer", "Forge Laborer", Location::Forge, 7, 8, &[])
                },
                job(
                    "academy-scribe",
                    "Academy Scribe",
                    Location::Academy,
                    9,
                    6,
                    &["junior-academy"],
                ),
                job("shop-clerk", "Shop Clerk", Location::GeneralStore, 11, 6, &["trade-guild"]),
                job("city-guard", "City Guard", Location::Armory, 12, 8, &["combat-training"]),
                Job {
                    min_dependability: 20,
                    ..job("bank-teller", "Bank Teller", Location::Bank, 14, 6, &["trade-guild"])
                },
                job(
                    "enchanter-apprentice",
                    "Enchanter's Apprentice",
                    Location::Enchanter,
                    16,
                    6,
                    &["arcane-studies"],
                ),
                job(
                    "sage",
                    "Sage",
                    Location::Academy,
                    22,
                    6,
                    &["arcane-studies", "loremaster"],
                ),
                Job {
                    min_experience: 40,
                    ..job(
                        "merchant-prince",
                        "Merchant Prince",
                        Location::Bank,
                        26,
                        8,
                        &["trade-guild", "master-merchant"],
                    )
                },
            ],
            degrees: vec![
                degree("junior-academy", "Junior Academy", 20, 3, &[]),
                degree("combat-training", "Combat Training", 25, 3, &[]),
                degree("trade-guild", "Trade Guild Certificate", 30, 4, &["junior-academy"]),
                degree("arcane-studies", "Arcane Studies", 40, 4, &["junior-academy"]),
                degree("master-merchant", "Master Merchant", 50, 5, &["trade-guild"]),
                degree("loremaster", "Loremaster", 60, 5, &["arcane-studies"]),
            ],
            appliances: vec![
                appliance("cooking-fire", "Cooking Fire", 90, 3),
                appliance("preservation-box", "Preservation Box", 150, 5),
                appliance("arcane-lamp", "Arcane Lamp", 220, 6),
                appliance("music-box", "Music Box", 320, 8),
            ],
            housing: vec![
                HousingOffer {
                    tier: HousingTier::Homeless,
                    move_in_cost: 0,
                    weekly_rent: 0,
                },
                HousingOffer {
                    tier: HousingTier::Slums,
                    move_in_cost: 0,
                    weekly_rent: 75,
                },
                HousingOffer {
                    tier: HousingTier::Noble,
                    move_in_cost: 400,
                    weekly_rent: 250,
                },
            ],
            prices: PriceList::default(),
        }
    }

    #[must_use]
    pub fn default_config() -> Self {
        Self::load_from_static()
    }
}

impl Content for Catalog {
    fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    fn degrees(&self) -> &[Degree] {
        &self.degrees
    }

    fn appliances(&self) -> &[Appliance] {
        &self.appliances
    }

    fn housing_offers(&self) -> &[HousingOffer] {
        &self.housing
    }

    fn prices(&self) -> PriceList {
        self.prices
    }
}

const fn default_shift_hours() -> i32 {
    6
}

fn owned(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|id| (*id).to_string()).collect()
}

fn job(
    id: &str,
    name: &str,
    location: Location,
    base_wage: i32,
    shift_hours: i32,
    required_degrees: &[&str],
) -> Job {
    Job {
        id: id.to_string(),
        name: name.to_string(),
        location,
        base_wage,
        shift_hours,
        required_degrees: owned(required_degrees),
        min_dependability: 0,
        min_experience: 0,
    }
}

fn degree(
    id: &str,
    name: &str,
    cost: i32,
    sessions_required: u32,
    prerequisites: &[&str],
) -> Degree {
    Degree {
        id: id.to_string(),
        name: name.to_string(),
        cost,
        hours: 6,
        sessions_required,
        prerequisites: owned(prerequisites),
    }
}

fn appliance(id: &str, name: &str, cost: i32, happiness: i32) -> Appliance {
    Appliance {
        id: id.to_string(),
        name: name.to_string(),
        cost,
        happiness,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::PlayerId;

    #[test]
    fn static_catalog_parses() {
        let catalog = Catalog::load_from_static();
        assert_eq!(catalog.jobs.len(), 10);
        assert_eq!(catalog.degrees.len(), 6);
        assert_eq!(catalog.appliances.len(), 4);
        assert_eq!(catalog.prices.food_cost, 25);
        assert_eq!(
            catalog.housing_offer(HousingTier::Noble).weekly_rent,
            250
        );
    }

    #[test]
    fn static_catalog_matches_builtin() {
        assert_eq!(Catalog::load_from_static(), Catalog::builtin());
        assert_ne!(Catalog::builtin(), Catalog::default());
    }

    #[test]
    fn degree_prerequisites_gate_availability() {
        let catalog = Catalog::default_config();
        let mut player = Player::new(PlayerId(1), "Ada");
        let open: Vec<&str> = catalog
            .available_degrees(&player)
            .iter()
            .map(|degree| degree.id.as_str())
            .collect();
        assert_eq!(open, vec!["junior-academy", "combat-training"]);

        player.completed_degrees.insert("junior-academy".to_string());
        let open: Vec<&str> = catalog
            .available_degrees(&player)
            .iter()
            .map(|degree| degree.id.as_str())
            .collect();
        assert!(open.contains(&"trade-guild"));
        assert!(!open.contains(&"junior-academy"));
    }

    #[test]
    fn jobs_filter_by_qualification() {
        let catalog = Catalog::default_config();
        let mut player = Player::new(PlayerId(1), "Ada");
        let ids: Vec<&str> = catalog
            .available_jobs(&player)
            .iter()
            .map(|job| job.id.as_str())
            .collect();
        assert_eq!(ids, vec!["floor-sweeper", "tavern-hand"]);

        player.dependability = 25;
        player.completed_degrees.insert("trade-guild".to_string());
        assert!(catalog.job("bank-teller").unwrap().qualifies(&player));
        assert_eq!(catalog.job_location("bank-teller"), Some(Location::Bank));
    }

    #[test]
    fn solely_unlocked_requires_every_other_degree() {
        let catalog = Catalog::default_config();
        let mut player = Player::new(PlayerId(1), "Ada");
        let sage = catalog.job("sage").unwrap();
        assert!(!sage.unlocked_solely_by("loremaster", &player));
        player.completed_degrees.insert("arcane-studies".to_string());
        assert!(sage.unlocked_solely_by("loremaster", &player));
        assert!(!sage.unlocked_solely_by("trade-guild", &player));
    }
}
