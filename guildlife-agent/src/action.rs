//! Candidate actions produced by the planner.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

use crate::focus::FocusAxis;
use crate::state::{HousingTier, Location};

/// Inline capacity covers a typical plan without allocating.
pub type ActionList = SmallVec<[AiAction; 8]>;

/// What the action does, carrying only the parameters it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ActionKind {
    Move {
        to: Location,
        hours: i32,
    },
    Work {
        job_id: String,
        hours: i32,
        wage: i32,
    },
    BuyFood {
        cost: i32,
    },
    BuyClothing {
        cost: i32,
    },
    Study {
        degree_id: String,
        cost: i32,
        hours: i32,
    },
    Graduate {
        degree_id: String,
    },
    ApplyJob {
        job_id: String,
        wage: i32,
    },
    PayRent {
        amount: i32,
    },
    DepositBank {
        amount: i32,
    },
    WithdrawBank {
        amount: i32,
    },
    BuyAppliance {
        appliance_id: String,
        cost: i32,
    },
    MoveHousing {
        tier: HousingTier,
        cost: i32,
        rent: i32,
    },
    Rest {
        hours: i32,
        happiness: i32,
    },
    EndTurn,
}

impl ActionKind {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Move { .. } => "move",
            Self::Work { .. } => "work",
            Self::BuyFood { .. } => "buy-food",
            Self::BuyClothing { .. } => "buy-clothing",
            Self::Study { .. } => "study",
            Self::Graduate { .. } => "graduate",
            Self::ApplyJob { .. } => "apply-job",
            Self::PayRent { .. } => "pay-rent",
            Self::DepositBank { .. } => "deposit-bank",
            Self::WithdrawBank { .. } => "withdraw-bank",
            Self::BuyAppliance { .. } => "buy-appliance",
            Self::MoveHousing { .. } => "move-housing",
            Self::Rest { .. } => "rest",
            Self::EndTurn => "end-turn",
        }
    }

    /// Axis whose counter-strategy multiplier applies. Movement, survival
    /// purchases and bookkeeping stay unweighted.
    #[must_use]
    pub const fn focus(&self) -> Option<FocusAxis> {
        match self {
            Self::Study { .. } | Self::Graduate { .. } => Some(FocusAxis::Education),
            Self::Work { .. } | Self::ApplyJob { .. } | Self::DepositBank { .. } => {
                Some(FocusAxis::Wealth)
            }
            Self::BuyAppliance { .. } | Self::Rest { .. } => Some(FocusAxis::Happiness),
            Self::Move { .. }
            | Self::BuyFood { .. }
            | Self::BuyClothing { .. }
            | Self::PayRent { .. }
            | Self::WithdrawBank { .. }
            | Self::MoveHousing { .. }
            | Self::EndTurn => None,
        }
    }
}

/// A scored candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiAction {
    pub kind: ActionKind,
    pub priority: f32,
    /// Diagnostic text only.
    pub description: String,
}

impl AiAction {
    #[must_use]
    pub fn new(kind: ActionKind, priority: f32, description: impl Into<String>) -> Self {
        Self {
            kind,
            priority,
            description: description.into(),
        }
    }

    #[must_use]
    pub fn travel(to: Location, hours: i32, priority: f32, purpose: &str) -> Self {
        Self::new(
            ActionKind::Move { to, hours },
            priority,
            format!("travel to {to} to {purpose}"),
        )
    }

    #[must_use]
    pub fn end_turn() -> Self {
        Self::new(
            ActionKind::EndTurn,
            crate::constants::PRIORITY_END_TURN,
            "end turn",
        )
    }

    /// Destination of a move, if any.
    #[must_use]
    pub const fn target(&self) -> Option<Location> {
        match self.kind {
            ActionKind::Move { to, .. } => Some(to),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_end_turn(&self) -> bool {
        matches!(self.kind, ActionKind::EndTurn)
    }
}

impl fmt::Display for AiAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:.1}] {}: {}",
            self.priority,
            self.kind.label(),
            self.description
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_tags_follow_action_family() {
        let study = ActionKind::Study {
            degree_id: "junior-academy".to_string(),
            cost: 20,
            hours: 6,
        };
        assert_eq!(study.focus(), Some(FocusAxis::Education));
        assert_eq!(
            ActionKind::DepositBank { amount: 10 }.focus(),
            Some(FocusAxis::Wealth)
        );
        assert_eq!(
            ActionKind::Rest {
                hours: 4,
                happiness: 5
            }
            .focus(),
            Some(FocusAxis::Happiness)
        );
        assert_eq!(
            ActionKind::Move {
                to: Location::Bank,
                hours: 2
            }
            .focus(),
            None
        );
        assert_eq!(ActionKind::BuyFood { cost: 25 }.focus(), None);
    }

    #[test]
    fn travel_exposes_target_and_serializes_tagged() {
        let action = AiAction::travel(Location::GeneralStore, 6, 95.0, "buy food");
        assert_eq!(action.target(), Some(Location::GeneralStore));
        assert!(!action.is_end_turn());
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["kind"]["kind"], "move");
        assert_eq!(json["kind"]["to"], "general-store");
        assert!(AiAction::end_turn().is_end_turn());
        assert!(AiAction::end_turn().target().is_none());
    }
}
