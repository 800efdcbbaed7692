//! Survival pressure scores. Coarse steps that trip the planner's interrupts.
use serde::{Deserialize, Serialize};

use crate::constants::{
    CLOTHING_RAGGED_BELOW, CLOTHING_RAGGED_URGENCY, CLOTHING_WORN_BELOW, CLOTHING_WORN_URGENCY,
    FOOD_HUNGRY_BELOW, FOOD_HUNGRY_URGENCY, FOOD_STARVING_BELOW, HEALTH_CRITICAL_BELOW,
    HEALTH_LOW_BELOW, HEALTH_LOW_URGENCY, HOUSING_RISK_GOLD, HOUSING_RISK_URGENCY,
    RENT_LATE_URGENCY, RENT_LATE_WEEKS, RENT_OVERDUE_WEEKS, URGENCY_CALM, URGENCY_CRITICAL,
};
use crate::state::{HousingTier, Player};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResourceUrgency {
    pub food: f32,
    pub rent: f32,
    pub clothing: f32,
    pub health: f32,
    pub housing: f32,
}

impl ResourceUrgency {
    #[must_use]
    pub fn evaluate(player: &Player) -> Self {
        Self {
            food: food_urgency(player.food_level),
            rent: rent_urgency(player.housing, player.weeks_since_rent),
            clothing: clothing_urgency(player.clothing_condition),
            health: health_urgency(player.health),
            housing: housing_urgency(player),
        }
    }
}

fn food_urgency(food_level: i32) -> f32 {
    if food_level < FOOD_STARVING_BELOW {
        URGENCY_CRITICAL
    } else if food_level < FOOD_HUNGRY_BELOW {
        FOOD_HUNGRY_URGENCY
    } else {
        URGENCY_CALM
    }
}

fn rent_urgency(housing: HousingTier, weeks_since_rent: u32) -> f32 {
    if !housing.pays_rent() {
        0.0
    } else if weeks_since_rent >= RENT_OVERDUE_WEEKS {
        URGENCY_CRITICAL
    } else if weeks_since_rent >= RENT_LATE_WEEKS {
        RENT_LATE_URGENCY
    } else {
        URGENCY_CALM
    }
}

fn clothing_urgency(condition: i32) -> f32 {
    if condition < CLOTHING_RAGGED_BELOW {
        CLOTHING_RAGGED_URGENCY
    } else if condition < CLOTHING_WORN_BELOW {
        CLOTHING_WORN_URGENCY
    } else {
        URGENCY_CALM
    }
}

fn health_urgency(health: i32) -> f32 {
    if health < HEALTH_CRITICAL_BELOW {
        URGENCY_CRITICAL
    } else if health < HEALTH_LOW_BELOW {
        HEALTH_LOW_URGENCY
    } else {
        URGENCY_CALM
    }
}

fn housing_urgency(player: &Player) -> f32 {
    let exposed = player.housing == HousingTier::CHEAPEST
        && player.valuables_count() >= 1
        && player.gold > HOUSING_RISK_GOLD;
    if exposed {
        HOUSING_RISK_URGENCY
    } else {
        URGENCY_CALM
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{ApplianceState, PlayerId};

    fn player() -> Player {
        Player::new(PlayerId(1), "Ada")
    }

    #[test]
    fn food_steps_are_exact_at_boundaries() {
        assert!((food_urgency(24) - 1.0).abs() < f32::EPSILON);
        assert!((food_urgency(25) - 0.6).abs() < f32::EPSILON);
        assert!((food_urgency(49) - 0.6).abs() < f32::EPSILON);
        assert!((food_urgency(50) - 0.1).abs() < f32::EPSILON);
    }

    #[test]
    fn rent_is_silent_for_the_homeless() {
        assert!(rent_urgency(HousingTier::Homeless, 9).abs() < f32::EPSILON);
        assert!((rent_urgency(HousingTier::Slums, 3) - 1.0).abs() < f32::EPSILON);
        assert!((rent_urgency(HousingTier::Noble, 2) - 0.5).abs() < f32::EPSILON);
        assert!((rent_urgency(HousingTier::Slums, 1) - 0.1).abs() < f32::EPSILON);
    }

    #[test]
    fn clothing_and_health_steps() {
        assert!((clothing_urgency(24) - 0.9).abs() < f32::EPSILON);
        assert!((clothing_urgency(25) - 0.4).abs() < f32::EPSILON);
        assert!((clothing_urgency(50) - 0.1).abs() < f32::EPSILON);
        assert!((health_urgency(29) - 1.0).abs() < f32::EPSILON);
        assert!((health_urgency(30) - 0.5).abs() < f32::EPSILON);
        assert!((health_urgency(50) - 0.1).abs() < f32::EPSILON);
    }

    #[test]
    fn middle_steps_straddle_the_planner_interrupts() {
        use crate::constants::{
            CLOTHING_URGENCY_TRIGGER, FOOD_URGENCY_TRIGGER, RENT_URGENCY_TRIGGER,
        };
        // Hungry already interrupts; late rent and worn clothes do not.
        assert!(food_urgency(FOOD_HUNGRY_BELOW - 1) > FOOD_URGENCY_TRIGGER);
        assert!(rent_urgency(HousingTier::Slums, RENT_LATE_WEEKS) <= RENT_URGENCY_TRIGGER);
        assert!(rent_urgency(HousingTier::Slums, RENT_OVERDUE_WEEKS) > RENT_URGENCY_TRIGGER);
        assert!(clothing_urgency(CLOTHING_WORN_BELOW - 1) <= CLOTHING_URGENCY_TRIGGER);
        assert!(clothing_urgency(CLOTHING_RAGGED_BELOW - 1) > CLOTHING_URGENCY_TRIGGER);
    }

    #[test]
    fn housing_flags_exposed_valuables_in_the_slums() {
        let mut p = player();
        p.gold = 250;
        assert!((ResourceUrgency::evaluate(&p).housing - 0.1).abs() < f32::EPSILON);

        p.appliances
            .insert("music-box".to_string(), ApplianceState::Working);
        assert!((ResourceUrgency::evaluate(&p).housing - 0.5).abs() < f32::EPSILON);

        p.gold = 200;
        assert!((ResourceUrgency::evaluate(&p).housing - 0.1).abs() < f32::EPSILON);

        p.gold = 250;
        p.housing = HousingTier::Noble;
        assert!((ResourceUrgency::evaluate(&p).housing - 0.1).abs() < f32::EPSILON);
    }
}
