//! Single-ply rule planner.
//!
//! Every call re-reads the player and rebuilds the candidate list from
//! scratch in four layers:
//!
//! 1. **Critical interrupts** for food, rent and clothing.
//! 2. **Weakest-goal focus** on the axis with the lowest progress.
//! 3. **General strategy** that runs regardless of focus.
//! 4. **Fallback** `end-turn`, which is always present and always last.
//!
//! Layers only append. Counter-strategy multipliers are applied to tagged
//! actions, the list is sorted by descending priority, and the difficulty's
//! mistake chance may swap the top two entries.
use log::debug;
use rand::Rng;
use serde::Serialize;

use crate::action::{ActionKind, ActionList, AiAction};
use crate::config::DifficultySettings;
use crate::constants::{
    ACQUIRE_JOB_MIN_HOURS, APPLIANCE_GOLD_FLOOR, APPLIANCE_OWNERSHIP_CAP, BANK_IMMEDIATE_NEEDS,
    BANK_SAFETY_DEEP, BANK_SAFETY_SHALLOW, CLOTHING_URGENCY_TRIGGER, COUNTER_MIN_DEPTH,
    DEGREE_WAGE_SCORE_FACTOR, EDUCATION_POINTS_PER_DEGREE, FOOD_URGENCY_TRIGGER,
    HOUSING_UPGRADE_AGGRESSION, HOUSING_UPGRADE_URGENCY, JOB_SWITCH_WAGE_RATIO,
    MISTAKE_MIN_ACTIONS, OPPORTUNISTIC_WEALTH_CUTOFF, OPPORTUNISTIC_WORK_BONUS,
    PRIORITY_ACQUIRE_JOB, PRIORITY_APPLY_FOR_CAREER, PRIORITY_BUY_APPLIANCE,
    PRIORITY_BUY_CLOTHING, PRIORITY_BUY_FOOD, PRIORITY_DEPOSIT, PRIORITY_GRADUATE,
    PRIORITY_HOUSING_UPGRADE, PRIORITY_OPPORTUNISTIC_WORK, PRIORITY_PAY_RENT, PRIORITY_REST,
    PRIORITY_STUDY_AGGRESSION, PRIORITY_STUDY_BASE, PRIORITY_SWITCH_JOB, PRIORITY_WITHDRAW,
    PRIORITY_WORK_FOR_CAREER, PRIORITY_WORK_FOR_WEALTH, RENT_URGENCY_TRIGGER,
    REST_HAPPINESS_CEILING, TRAVEL_DISCOUNT, WITHDRAW_AMOUNT, WITHDRAW_GOLD_FLOOR,
    WITHDRAW_SAVINGS_FLOOR,
};
use crate::content::{Degree, Job};
use crate::counter::CounterStrategyWeights;
use crate::goals::{GoalAxis, GoalProgress, GoalSettings};
use crate::numbers::i64_to_f32;
use crate::state::{HousingTier, Location, Player};
use crate::urgency::ResourceUrgency;
use crate::world::PlanningEnv;

/// Ranked output of one planning pass.
///
/// Only the planner builds plans, so `end-turn` is always present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionPlan {
    /// Sorted by descending priority, `end-turn` last.
    actions: ActionList,
    /// Goal axis the focus layer worked on.
    pub focus: GoalAxis,
    /// Whether the mistake roll swapped the top two entries.
    pub mistake: bool,
}

impl ActionPlan {
    /// Top-ranked action. A plan is never empty.
    #[must_use]
    pub fn best(&self) -> &AiAction {
        &self.actions[0]
    }

    /// Every candidate, best first.
    #[must_use]
    pub fn actions(&self) -> &[AiAction] {
        &self.actions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AiAction> {
        self.actions.iter()
    }
}

/// Priority-scored rule engine parameterized by difficulty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionPlanner {
    difficulty: DifficultySettings,
}

impl ActionPlanner {
    #[must_use]
    pub const fn new(difficulty: DifficultySettings) -> Self {
        Self { difficulty }
    }

    #[must_use]
    pub const fn difficulty(&self) -> &DifficultySettings {
        &self.difficulty
    }

    /// Rank every candidate action for `player`.
    pub fn plan<E, R>(
        &self,
        player: &Player,
        goals: &GoalSettings,
        weights: &CounterStrategyWeights,
        env: &E,
        rng: &mut R,
    ) -> ActionPlan
    where
        E: PlanningEnv + ?Sized,
        R: Rng + ?Sized,
    {
        let progress = GoalProgress::evaluate(player, goals);
        let urgency = ResourceUrgency::evaluate(player);
        let focus = progress.weakest();

        let mut builder = PlanBuilder {
            player,
            env,
            difficulty: &self.difficulty,
            progress: &progress,
            urgency: &urgency,
            actions: ActionList::new(),
        };
        builder.critical_interrupts();
        builder.focus_on(focus);
        builder.general_strategy();
        let mut actions = builder.finish();

        for action in &mut actions {
            if let Some(axis) = action.kind.focus() {
                action.priority *= weights.multiplier(axis);
            }
        }
        actions.sort_by(|a, b| b.priority.total_cmp(&a.priority));

        let mut mistake = false;
        if actions.len() >= MISTAKE_MIN_ACTIONS
            && rng.r#gen::<f32>() < self.difficulty.mistake_chance
        {
            actions.swap(0, 1);
            mistake = true;
        }

        debug!(
            "{} planned {} actions (focus {focus}, mistake {mistake}); best {}",
            player.id,
            actions.len(),
            actions[0]
        );

        ActionPlan {
            actions,
            focus,
            mistake,
        }
    }
}

struct PlanBuilder<'a, E: ?Sized> {
    player: &'a Player,
    env: &'a E,
    difficulty: &'a DifficultySettings,
    progress: &'a GoalProgress,
    urgency: &'a ResourceUrgency,
    actions: ActionList,
}

impl<'a, E: PlanningEnv + ?Sized> PlanBuilder<'a, E> {
    fn finish(mut self) -> ActionList {
        self.actions.push(AiAction::end_turn());
        self.actions
    }

    /// Queue `action` if the player stands at `site`, otherwise queue a
    /// walk there. Nothing is queued when the hours do not add up.
    fn act_or_travel(
        &mut self,
        site: Location,
        on_site_hours: i32,
        action: AiAction,
        purpose: &str,
    ) {
        let player = self.player;
        if player.location == site {
            if player.time_remaining >= on_site_hours {
                self.actions.push(action);
            }
            return;
        }
        let travel_hours = self.env.shortest_distance(player.location, site);
        if player.time_remaining - travel_hours - on_site_hours >= 0 {
            self.actions.push(AiAction::travel(
                site,
                travel_hours,
                action.priority - TRAVEL_DISCOUNT,
                purpose,
            ));
        }
    }

    fn critical_interrupts(&mut self) {
        let prices = self.env.prices();
        let gold = self.player.gold;

        if self.urgency.food > FOOD_URGENCY_TRIGGER && gold >= prices.food_cost {
            let buy = AiAction::new(
                ActionKind::BuyFood {
                    cost: prices.food_cost,
                },
                PRIORITY_BUY_FOOD,
                "buy food before starving",
            );
            self.act_or_travel(Location::FOOD, 0, buy, "buy food");
        }

        let rent = self.env.housing_offer(self.player.housing).weekly_rent;
        if self.urgency.rent > RENT_URGENCY_TRIGGER && gold >= rent {
            let pay = AiAction::new(
                ActionKind::PayRent { amount: rent },
                PRIORITY_PAY_RENT,
                "pay overdue rent",
            );
            self.act_or_travel(Location::RENT, 0, pay, "pay rent");
        }

        if self.urgency.clothing > CLOTHING_URGENCY_TRIGGER && gold >= prices.clothing_cost {
            let buy = AiAction::new(
                ActionKind::BuyClothing {
                    cost: prices.clothing_cost,
                },
                PRIORITY_BUY_CLOTHING,
                "replace worn clothing",
            );
            self.act_or_travel(Location::CLOTHING, 0, buy, "buy clothing");
        }
    }

    fn focus_on(&mut self, axis: GoalAxis) {
        match axis {
            GoalAxis::Education => self.focus_education(),
            GoalAxis::Wealth => self.focus_wealth(),
            GoalAxis::Happiness => self.focus_happiness(),
            GoalAxis::Career => self.focus_career(),
        }
    }

    fn focus_education(&mut self) {
        let Some(degree) = self.choose_degree() else {
            return;
        };
        let player = self.player;
        if degree.ready_to_graduate(player) && player.location == Location::STUDY {
            self.actions.push(AiAction::new(
                ActionKind::Graduate {
                    degree_id: degree.id.clone(),
                },
                PRIORITY_GRADUATE,
                format!("graduate in {}", degree.name),
            ));
            return;
        }
        // Away from the academy a finished course walks back like a study trip.
        if player.gold >= degree.cost {
            let priority =
                PRIORITY_STUDY_BASE + self.difficulty.aggressiveness * PRIORITY_STUDY_AGGRESSION;
            let study = AiAction::new(
                ActionKind::Study {
                    degree_id: degree.id.clone(),
                    cost: degree.cost,
                    hours: degree.hours,
                },
                priority,
                format!("study {}", degree.name),
            );
            self.act_or_travel(Location::STUDY, degree.hours, study, "study");
        }
    }

    /// Deeper planners weigh the wages a degree unlocks; shallow ones buy
    /// the cheapest course.
    fn choose_degree(&self) -> Option<&'a Degree> {
        let available = self.env.available_degrees(self.player);
        if self.difficulty.planning_depth >= COUNTER_MIN_DEPTH {
            let mut best: Option<(&'a Degree, i32)> = None;
            for degree in available {
                let score = self.degree_score(degree);
                if best.is_none_or(|(_, top)| score > top) {
                    best = Some((degree, score));
                }
            }
            best.map(|(degree, _)| degree)
        } else {
            let mut cheapest: Option<&'a Degree> = None;
            for degree in available {
                if cheapest.is_none_or(|current| degree.cost < current.cost) {
                    cheapest = Some(degree);
                }
            }
            cheapest
        }
    }

    fn degree_score(&self, degree: &Degree) -> i32 {
        let unlocked_wage = self
            .env
            .jobs()
            .iter()
            .filter(|job| job.unlocked_solely_by(&degree.id, self.player))
            .map(|job| job.base_wage)
            .max()
            .unwrap_or(0);
        unlocked_wage * DEGREE_WAGE_SCORE_FACTOR + EDUCATION_POINTS_PER_DEGREE
    }

    fn focus_wealth(&mut self) {
        if let Some(job) = self.current_job() {
            self.queue_work(job, PRIORITY_WORK_FOR_WEALTH, "earn wages");
        }

        let safety = if self.difficulty.planning_depth >= COUNTER_MIN_DEPTH {
            BANK_SAFETY_DEEP
        } else {
            BANK_SAFETY_SHALLOW
        };
        let keep = safety + BANK_IMMEDIATE_NEEDS;
        if self.player.gold > keep {
            let amount = self.player.gold - keep;
            let deposit = AiAction::new(
                ActionKind::DepositBank { amount },
                PRIORITY_DEPOSIT,
                format!("bank {amount} surplus gold"),
            );
            self.act_or_travel(Location::BANK, 0, deposit, "deposit gold");
        }
    }

    fn focus_happiness(&mut self) {
        let player = self.player;
        if player.gold > APPLIANCE_GOLD_FLOOR && player.appliances.len() < APPLIANCE_OWNERSHIP_CAP
        {
            let pick = self
                .env
                .appliances()
                .iter()
                .filter(|appliance| !player.appliances.contains_key(&appliance.id))
                .filter(|appliance| appliance.cost <= player.gold)
                .min_by_key(|appliance| appliance.cost);
            if let Some(appliance) = pick {
                let buy = AiAction::new(
                    ActionKind::BuyAppliance {
                        appliance_id: appliance.id.clone(),
                        cost: appliance.cost,
                    },
                    PRIORITY_BUY_APPLIANCE,
                    format!("buy a {}", appliance.name),
                );
                self.act_or_travel(Location::APPLIANCES, 0, buy, "buy an appliance");
            }
        }

        let prices = self.env.prices();
        let at_home = player.housing.home() == Some(player.location);
        if player.happiness < REST_HAPPINESS_CEILING
            && player.time_remaining >= prices.rest_hours
            && at_home
        {
            self.actions.push(AiAction::new(
                ActionKind::Rest {
                    hours: prices.rest_hours,
                    happiness: prices.rest_happiness,
                },
                PRIORITY_REST,
                "rest at home",
            ));
        }
    }

    fn focus_career(&mut self) {
        if let Some(job) = self.current_job() {
            self.queue_work(job, PRIORITY_WORK_FOR_CAREER, "build dependability");
        } else if let Some(job) = self.best_available_job() {
            self.queue_application(job, PRIORITY_APPLY_FOR_CAREER, "start a career");
        }
    }

    fn general_strategy(&mut self) {
        let player = self.player;

        if !player.is_employed()
            && player.time_remaining >= ACQUIRE_JOB_MIN_HOURS
            && let Some(job) = self.best_available_job()
        {
            self.queue_application(job, PRIORITY_ACQUIRE_JOB, "get hired");
        }

        if let Some(current) = self.current_job() {
            let threshold = i64_to_f32(i64::from(player.current_wage)) * JOB_SWITCH_WAGE_RATIO;
            let better = self
                .best_available_job()
                .filter(|job| job.id != current.id)
                .filter(|job| i64_to_f32(i64::from(job.base_wage)) > threshold);
            if let Some(job) = better {
                self.queue_application(job, PRIORITY_SWITCH_JOB, "switch to a better job");
            }

            let mut priority = PRIORITY_OPPORTUNISTIC_WORK;
            if self.progress.wealth.progress < OPPORTUNISTIC_WEALTH_CUTOFF {
                priority += OPPORTUNISTIC_WORK_BONUS;
            }
            self.queue_work(current, priority, "pick up a shift");
        }

        if self.urgency.housing >= HOUSING_UPGRADE_URGENCY
            && self.difficulty.aggressiveness > HOUSING_UPGRADE_AGGRESSION
        {
            let offer = self.env.housing_offer(HousingTier::SAFEST);
            if player.housing == HousingTier::CHEAPEST && player.gold >= offer.move_in_cost {
                let upgrade = AiAction::new(
                    ActionKind::MoveHousing {
                        tier: offer.tier,
                        cost: offer.move_in_cost,
                        rent: offer.weekly_rent,
                    },
                    PRIORITY_HOUSING_UPGRADE,
                    "move valuables somewhere safe",
                );
                self.act_or_travel(Location::RENT, 0, upgrade, "upgrade housing");
            }
        }

        if player.gold < WITHDRAW_GOLD_FLOOR && player.savings > WITHDRAW_SAVINGS_FLOOR {
            let amount = player.savings.min(WITHDRAW_AMOUNT);
            let withdraw = AiAction::new(
                ActionKind::WithdrawBank { amount },
                PRIORITY_WITHDRAW,
                format!("withdraw {amount} gold"),
            );
            self.act_or_travel(Location::BANK, 0, withdraw, "withdraw gold");
        }
    }

    fn current_job(&self) -> Option<&'a Job> {
        self.player
            .current_job
            .as_deref()
            .and_then(|job_id| self.env.job(job_id))
    }

    /// Highest base wage among jobs the player qualifies for; first listed wins ties.
    fn best_available_job(&self) -> Option<&'a Job> {
        let mut best: Option<&'a Job> = None;
        for job in self.env.available_jobs(self.player) {
            if best.is_none_or(|top| job.base_wage > top.base_wage) {
                best = Some(job);
            }
        }
        best
    }

    fn queue_work(&mut self, job: &Job, priority: f32, purpose: &str) {
        let site = self.env.job_location(&job.id).unwrap_or(job.location);
        let work = AiAction::new(
            ActionKind::Work {
                job_id: job.id.clone(),
                hours: job.shift_hours,
                wage: self.player.current_wage,
            },
            priority,
            format!("work a shift as {} to {purpose}", job.name),
        );
        self.act_or_travel(site, job.shift_hours, work, purpose);
    }

    fn queue_application(&mut self, job: &Job, priority: f32, purpose: &str) {
        let apply = AiAction::new(
            ActionKind::ApplyJob {
                job_id: job.id.clone(),
                wage: job.base_wage,
            },
            priority,
            format!("apply as {} to {purpose}", job.name),
        );
        self.act_or_travel(Location::HIRING, 0, apply, purpose);
    }
}
