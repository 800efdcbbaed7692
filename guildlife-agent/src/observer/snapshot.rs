use serde::{Deserialize, Serialize};

use crate::state::{HousingTier, Location, Player, PlayerId};

/// Point-in-time copy of the fields strategy inference looks at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub player: PlayerId,
    pub week: u32,
    pub location: Location,
    pub gold: i32,
    pub savings: i32,
    pub investments: i32,
    pub happiness: i32,
    pub degree_count: u32,
    pub dependability: i32,
    pub health: i32,
    pub current_job: Option<String>,
    pub current_wage: i32,
    pub housing: HousingTier,
    pub completed_quests: u32,
    pub floors_cleared: u32,
    pub equipped_weapon: Option<String>,
    pub equipped_armor: Option<String>,
    pub appliance_count: u32,
    pub durable_count: u32,
}

impl PlayerSnapshot {
    #[must_use]
    pub fn capture(player: &Player, week: u32) -> Self {
        Self {
            player: player.id,
            week,
            location: player.location,
            gold: player.gold,
            savings: player.savings,
            investments: player.investments,
            happiness: player.happiness,
            degree_count: count(player.completed_degrees.len()),
            dependability: player.dependability,
            health: player.health,
            current_job: player.current_job.clone(),
            current_wage: player.current_wage,
            housing: player.housing,
            completed_quests: player.completed_quests,
            floors_cleared: count(player.dungeon_floors_cleared.len()),
            equipped_weapon: player.equipped_weapon.clone(),
            equipped_armor: player.equipped_armor.clone(),
            appliance_count: count(player.appliances.len()),
            durable_count: player.durables.values().sum(),
        }
    }

    #[must_use]
    pub fn total_wealth(&self) -> i64 {
        i64::from(self.gold) + i64::from(self.savings) + i64::from(self.investments)
    }
}

fn count(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

/// Field-wise change between two snapshots from different weeks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnDelta {
    pub from_week: u32,
    pub to_week: u32,
    pub wealth: i64,
    pub happiness: i64,
    pub degrees: i64,
    pub dependability: i64,
    pub floors: i64,
    pub quests: i64,
    pub got_new_job: bool,
    pub got_wage_increase: bool,
    pub upgraded_housing: bool,
    pub bought_equipment: bool,
    pub bought_appliances: bool,
}

impl TurnDelta {
    /// `None` when both snapshots come from the same week.
    #[must_use]
    pub fn between(prev: &PlayerSnapshot, cur: &PlayerSnapshot) -> Option<Self> {
        if prev.week == cur.week {
            return None;
        }
        let new_gear = |before: &Option<String>, after: &Option<String>| {
            after.is_some() && after != before
        };
        Some(Self {
            from_week: prev.week,
            to_week: cur.week,
            wealth: cur.total_wealth() - prev.total_wealth(),
            happiness: i64::from(cur.happiness) - i64::from(prev.happiness),
            degrees: i64::from(cur.degree_count) - i64::from(prev.degree_count),
            dependability: i64::from(cur.dependability) - i64::from(prev.dependability),
            floors: i64::from(cur.floors_cleared) - i64::from(prev.floors_cleared),
            quests: i64::from(cur.completed_quests) - i64::from(prev.completed_quests),
            got_new_job: cur.current_job.is_some() && cur.current_job != prev.current_job,
            got_wage_increase: cur.current_wage > prev.current_wage,
            upgraded_housing: prev.housing != HousingTier::SAFEST
                && cur.housing == HousingTier::SAFEST,
            bought_equipment: new_gear(&prev.equipped_weapon, &cur.equipped_weapon)
                || new_gear(&prev.equipped_armor, &cur.equipped_armor)
                || cur.durable_count > prev.durable_count,
            bought_appliances: cur.appliance_count > prev.appliance_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ApplianceState;

    #[test]
    fn same_week_snapshots_have_no_delta() {
        let player = Player::new(PlayerId(3), "Rival");
        let a = PlayerSnapshot::capture(&player, 4);
        let b = PlayerSnapshot::capture(&player, 4);
        assert!(TurnDelta::between(&a, &b).is_none());
    }

    #[test]
    fn delta_tracks_purchases_and_promotions() {
        let mut player = Player::new(PlayerId(3), "Rival");
        let before = PlayerSnapshot::capture(&player, 1);

        player.gold += 150;
        player.savings += 20;
        player.current_job = Some("tavern-hand".to_string());
        player.current_wage = 5;
        player.housing = HousingTier::Noble;
        player.equipped_weapon = Some("short-sword".to_string());
        player
            .appliances
            .insert("music-box".to_string(), ApplianceState::Working);
        player.dungeon_floors_cleared.insert(1);
        let after = PlayerSnapshot::capture(&player, 2);

        let delta = TurnDelta::between(&before, &after).unwrap();
        assert_eq!(delta.wealth, 170);
        assert_eq!(delta.floors, 1);
        assert!(delta.got_new_job);
        assert!(delta.got_wage_increase);
        assert!(delta.upgraded_housing);
        assert!(delta.bought_equipment);
        assert!(delta.bought_appliances);
        assert_eq!(delta.degrees, 0);
    }

    #[test]
    fn keeping_the_same_gear_is_not_a_purchase() {
        let mut player = Player::new(PlayerId(3), "Rival");
        player.equipped_armor = Some("leather".to_string());
        let before = PlayerSnapshot::capture(&player, 1);
        let after = PlayerSnapshot::capture(&player, 2);
        let delta = TurnDelta::between(&before, &after).unwrap();
        assert!(!delta.bought_equipment);
        assert!(!delta.got_new_job);
    }
}
