//! Centralized scoring and tuning constants for the opponent agent.

// Turn budget --------------------------------------------------------------
pub(crate) const DEFAULT_HOURS_PER_TURN: i32 = 60;
pub(crate) const DEFAULT_MAX_STEPS: u32 = 15;
pub(crate) const MIN_HOURS_TO_ACT: i32 = 1;
pub(crate) const STAT_MAX: i32 = 100;

// Goal evaluation ----------------------------------------------------------
pub(crate) const EDUCATION_POINTS_PER_DEGREE: i32 = 9;

// Critical interrupts ------------------------------------------------------
pub(crate) const FOOD_URGENCY_TRIGGER: f32 = 0.5;
pub(crate) const RENT_URGENCY_TRIGGER: f32 = 0.5;
pub(crate) const CLOTHING_URGENCY_TRIGGER: f32 = 0.6;
pub(crate) const PRIORITY_BUY_FOOD: f32 = 100.0;
pub(crate) const PRIORITY_PAY_RENT: f32 = 90.0;
pub(crate) const PRIORITY_BUY_CLOTHING: f32 = 75.0;

/// Travel-toward actions rank this far below the action they lead to.
pub(crate) const TRAVEL_DISCOUNT: f32 = 5.0;

// Education focus ----------------------------------------------------------
pub(crate) const PRIORITY_GRADUATE: f32 = 88.0;
pub(crate) const PRIORITY_STUDY_BASE: f32 = 70.0;
pub(crate) const PRIORITY_STUDY_AGGRESSION: f32 = 20.0;
pub(crate) const DEGREE_WAGE_SCORE_FACTOR: i32 = 10;

// Wealth focus -------------------------------------------------------------
pub(crate) const PRIORITY_WORK_FOR_WEALTH: f32 = 80.0;
pub(crate) const PRIORITY_DEPOSIT: f32 = 60.0;
pub(crate) const BANK_SAFETY_SHALLOW: i32 = 100;
pub(crate) const BANK_SAFETY_DEEP: i32 = 200;
pub(crate) const BANK_IMMEDIATE_NEEDS: i32 = 100;

// Happiness focus ----------------------------------------------------------
pub(crate) const PRIORITY_BUY_APPLIANCE: f32 = 65.0;
pub(crate) const APPLIANCE_GOLD_FLOOR: i32 = 300;
pub(crate) const APPLIANCE_OWNERSHIP_CAP: usize = 3;
pub(crate) const PRIORITY_REST: f32 = 45.0;
pub(crate) const REST_HAPPINESS_CEILING: i32 = 40;

// Career focus -------------------------------------------------------------
pub(crate) const PRIORITY_APPLY_FOR_CAREER: f32 = 85.0;
pub(crate) const PRIORITY_WORK_FOR_CAREER: f32 = 75.0;

// General strategic layer --------------------------------------------------
pub(crate) const PRIORITY_ACQUIRE_JOB: f32 = 70.0;
pub(crate) const ACQUIRE_JOB_MIN_HOURS: i32 = 8;
pub(crate) const PRIORITY_SWITCH_JOB: f32 = 55.0;
pub(crate) const JOB_SWITCH_WAGE_RATIO: f32 = 1.2;
pub(crate) const PRIORITY_OPPORTUNISTIC_WORK: f32 = 50.0;
pub(crate) const OPPORTUNISTIC_WORK_BONUS: f32 = 20.0;
pub(crate) const OPPORTUNISTIC_WEALTH_CUTOFF: f32 = 0.5;
pub(crate) const PRIORITY_HOUSING_UPGRADE: f32 = 60.0;
pub(crate) const HOUSING_UPGRADE_URGENCY: f32 = 0.5;
pub(crate) const HOUSING_UPGRADE_AGGRESSION: f32 = 0.5;
pub(crate) const PRIORITY_WITHDRAW: f32 = 65.0;
pub(crate) const WITHDRAW_GOLD_FLOOR: i32 = 30;
pub(crate) const WITHDRAW_SAVINGS_FLOOR: i32 = 50;
pub(crate) const WITHDRAW_AMOUNT: i32 = 100;

// Fallback -----------------------------------------------------------------
pub(crate) const PRIORITY_END_TURN: f32 = 1.0;
pub(crate) const MISTAKE_MIN_ACTIONS: usize = 3;

// Urgency steps ------------------------------------------------------------
pub(crate) const URGENCY_CALM: f32 = 0.1;
pub(crate) const URGENCY_CRITICAL: f32 = 1.0;
pub(crate) const FOOD_STARVING_BELOW: i32 = 25;
pub(crate) const FOOD_HUNGRY_BELOW: i32 = 50;
pub(crate) const FOOD_HUNGRY_URGENCY: f32 = 0.6;
pub(crate) const RENT_OVERDUE_WEEKS: u32 = 3;
pub(crate) const RENT_LATE_WEEKS: u32 = 2;
pub(crate) const RENT_LATE_URGENCY: f32 = 0.5;
pub(crate) const CLOTHING_RAGGED_BELOW: i32 = 25;
pub(crate) const CLOTHING_RAGGED_URGENCY: f32 = 0.9;
pub(crate) const CLOTHING_WORN_BELOW: i32 = 50;
pub(crate) const CLOTHING_WORN_URGENCY: f32 = 0.4;
pub(crate) const HEALTH_CRITICAL_BELOW: i32 = 30;
pub(crate) const HEALTH_LOW_BELOW: i32 = 50;
pub(crate) const HEALTH_LOW_URGENCY: f32 = 0.5;
pub(crate) const HOUSING_RISK_GOLD: i32 = 200;
pub(crate) const HOUSING_RISK_URGENCY: f32 = 0.5;

// Rival observation --------------------------------------------------------
pub(crate) const PROFILE_HISTORY_WINDOW: usize = 10;
pub(crate) const PROFILE_MIN_TURNS: u32 = 3;
pub(crate) const FOCUS_EMA_ALPHA: f32 = 0.3;
pub(crate) const FOCUS_INITIAL_WEIGHT: f32 = 0.25;
pub(crate) const BALANCED_SPREAD: f32 = 0.12;

// Counter strategy ---------------------------------------------------------
pub(crate) const COUNTER_MIN_DEPTH: u8 = 2;
pub(crate) const COUNTER_STRONG_DEPTH: u8 = 3;
pub(crate) const GAP_EXPLOIT_STRONG: f32 = 0.3;
pub(crate) const GAP_EXPLOIT_MILD: f32 = 0.15;
pub(crate) const COMPETITIVE_BOOST_STRONG: f32 = 0.6;
pub(crate) const COMPETITIVE_BOOST_MILD: f32 = 0.4;
