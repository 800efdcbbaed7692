use anyhow::{Context, Result};
use guildlife_agent::{
    AgentConfig, CounterStrategyWeights, DifficultyLevel, FocusAxis, GoalAxis, GoalProgress,
    GoalSettings, NoDelay, OpponentSession, Pacer, Player, PlayerId, SandboxWorld, StrategyLabel,
    ThreadSleep, TurnExit, TurnReport, WorldMutations, WorldStore,
};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt::Write as _;

use crate::logic::policy::{RivalStrategy, WeekLog};

pub const BOT: PlayerId = PlayerId(1);
pub const RIVAL: PlayerId = PlayerId(2);

/// Configuration for one headless match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchConfig {
    pub seed: u64,
    pub difficulty: DifficultyLevel,
    pub rival: RivalStrategy,
    pub weeks: u32,
    /// Honour the difficulty's decision delay between steps.
    pub paced: bool,
}

impl MatchConfig {
    #[must_use]
    pub const fn new(difficulty: DifficultyLevel, rival: RivalStrategy, seed: u64) -> Self {
        Self {
            seed,
            difficulty,
            rival,
            weeks: 20,
            paced: false,
        }
    }

    #[must_use]
    pub const fn with_weeks(mut self, weeks: u32) -> Self {
        self.weeks = weeks;
        self
    }

    #[must_use]
    pub const fn paced(mut self, paced: bool) -> Self {
        self.paced = paced;
        self
    }
}

/// One week of the bot's play as seen by the harness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekSummary {
    pub week: u32,
    pub steps: usize,
    pub rejections: usize,
    pub mistakes: usize,
    pub exit: String,
    pub focus: Option<GoalAxis>,
    pub rival: WeekLog,
}

/// Result of a complete match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub seed: u64,
    pub difficulty: DifficultyLevel,
    pub rival: RivalStrategy,
    pub weeks_played: u32,
    pub bot_progress: f32,
    pub rival_progress: f32,
    pub bot_wealth: i64,
    pub rival_wealth: i64,
    pub bot_degrees: usize,
    pub detected: Option<StrategyLabel>,
    pub expected: Option<StrategyLabel>,
    pub total_steps: usize,
    pub total_rejections: usize,
    pub forced_turns: usize,
    pub violations: Vec<String>,
    /// SHA-256 over every executed step, for replay comparison.
    pub digest: String,
    pub weeks: Vec<WeekSummary>,
}

impl MatchOutcome {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }

    #[must_use]
    pub fn bot_leads(&self) -> bool {
        self.bot_progress > self.rival_progress
    }

    /// Whether the observer named the archetype correctly, when one is expected.
    #[must_use]
    pub fn detection_hit(&self) -> Option<bool> {
        self.expected.map(|expected| self.detected == Some(expected))
    }
}

/// Play `config.weeks` weeks of bot against a scripted rival.
///
/// # Errors
///
/// Returns an error if the session or agent configuration is rejected.
pub fn run_match(config: MatchConfig) -> Result<MatchOutcome> {
    let goals = GoalSettings::default();
    let mut world = SandboxWorld::new();
    world.add_player(Player::new(BOT, "Opponent"), false);
    world.add_player(Player::new(RIVAL, "Rival"), true);

    let mut session = OpponentSession::new(goals).context("invalid goal settings")?;
    let agent_config = AgentConfig::for_level(config.difficulty, config.seed);
    let max_steps = agent_config.max_steps;
    let depth = agent_config.difficulty.planning_depth;
    session
        .add_agent(BOT, agent_config)
        .context("invalid agent configuration")?;

    let mut policy = config.rival.create_policy(config.seed);
    let mut pacer: Box<dyn Pacer> = if config.paced {
        Box::new(ThreadSleep)
    } else {
        Box::new(NoDelay)
    };
    let mut hasher = Sha256::new();
    let mut violations = Vec::new();
    let mut weeks = Vec::new();

    for _ in 0..config.weeks {
        let week = world.current_week();
        let rival_log = policy.play_week(&mut world, RIVAL);
        if let Err(rejection) = world.end_turn(RIVAL) {
            debug!("rival end-turn refused: {rejection}");
        }

        let Some(report) = session.run_ai_turn(&mut world, BOT, pacer.as_mut()) else {
            violations.push(format!("week {week}: turn did not start"));
            break;
        };
        check_turn(&report, max_steps, &mut violations);
        if session.agent(BOT).is_some_and(|agent| agent.is_in_flight()) {
            violations.push(format!("week {week}: turn still in flight after report"));
        }
        let weights = CounterStrategyWeights::compute(session.repository(), &[RIVAL], depth);
        if FocusAxis::ALL
            .into_iter()
            .any(|axis| weights.multiplier(axis) < 1.0)
        {
            violations.push(format!("week {week}: counter weight below 1.0: {weights:?}"));
        }
        for step in &report.steps {
            hasher.update(format!("{week},{},{},{}\n", step.step, step.action, step.applied()));
        }
        weeks.push(summarize(&report, rival_log));

        if world.is_game_over(BOT) {
            info!("opponent is out of the game in week {week}");
            break;
        }
        world.advance_week();
    }

    let bot = world.player(BOT).context("opponent vanished from the sandbox")?;
    let rival = world.player(RIVAL).context("rival vanished from the sandbox")?;
    let bot_progress = GoalProgress::evaluate(&bot, &goals);
    let rival_progress = GoalProgress::evaluate(&rival, &goals);
    check_progress(&bot_progress, &mut violations);

    let outcome = MatchOutcome {
        seed: config.seed,
        difficulty: config.difficulty,
        rival: config.rival,
        weeks_played: u32::try_from(weeks.len()).unwrap_or(u32::MAX),
        bot_progress: bot_progress.overall,
        rival_progress: rival_progress.overall,
        bot_wealth: bot.total_wealth(),
        rival_wealth: rival.total_wealth(),
        bot_degrees: bot.completed_degrees.len(),
        detected: session.repository().dominant_strategy(RIVAL),
        expected: config.rival.expected_label(),
        total_steps: weeks.iter().map(|week| week.steps).sum(),
        total_rejections: weeks.iter().map(|week| week.rejections).sum(),
        forced_turns: weeks
            .iter()
            .filter(|week| week.exit == TurnExit::SafetyBudget.label())
            .count(),
        violations,
        digest: hex_digest(hasher),
        weeks,
    };
    info!(
        "{} vs {} seed {}: {:.2} to {:.2}",
        outcome.difficulty,
        outcome.rival,
        outcome.seed,
        outcome.bot_progress,
        outcome.rival_progress
    );
    Ok(outcome)
}

fn check_turn(report: &TurnReport, max_steps: u32, violations: &mut Vec<String>) {
    let week = report.week;
    if report.steps.len() > usize::try_from(max_steps).unwrap_or(usize::MAX) {
        violations.push(format!(
            "week {week}: {} steps exceeds budget {max_steps}",
            report.steps.len()
        ));
    }
    if matches!(report.exit, TurnExit::PlayerMissing | TurnExit::Aborted) {
        violations.push(format!("week {week}: unexpected exit {}", report.exit));
    }
}

fn check_progress(progress: &GoalProgress, violations: &mut Vec<String>) {
    for axis in GoalAxis::ALL {
        let value = progress.axis(axis).progress;
        if !(0.0..=1.0).contains(&value) {
            violations.push(format!("{axis} progress {value} outside [0, 1]"));
        }
    }
}

fn summarize(report: &TurnReport, rival: WeekLog) -> WeekSummary {
    WeekSummary {
        week: report.week,
        steps: report.steps.len(),
        rejections: report.rejections(),
        mistakes: report.steps.iter().filter(|step| step.mistake).count(),
        exit: report.exit.label().to_string(),
        focus: report.steps.first().map(|step| step.focus),
        rival,
    }
}

fn hex_digest(hasher: Sha256) -> String {
    hasher
        .finalize()
        .iter()
        .fold(String::with_capacity(64), |mut out, byte| {
            let _ = write!(out, "{byte:02x}");
            out
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_match_respects_turn_invariants() {
        let config =
            MatchConfig::new(DifficultyLevel::Hard, RivalStrategy::Grinder, 7).with_weeks(6);
        let outcome = run_match(config).unwrap();
        assert!(outcome.passed(), "violations: {:?}", outcome.violations);
        assert_eq!(outcome.weeks_played, 6);
        assert!(outcome.weeks.iter().all(|week| week.steps <= 15));
        assert_eq!(outcome.digest.len(), 64);
    }

    #[test]
    fn replay_with_same_seed_is_identical() {
        let config =
            MatchConfig::new(DifficultyLevel::Medium, RivalStrategy::Random, 99).with_weeks(5);
        let first = run_match(config).unwrap();
        let second = run_match(config).unwrap();
        assert_eq!(first.digest, second.digest);
        assert_eq!(first, second);
    }

    #[test]
    fn grinder_is_recognised_after_a_few_weeks() {
        let config =
            MatchConfig::new(DifficultyLevel::Hard, RivalStrategy::Grinder, 3).with_weeks(6);
        let outcome = run_match(config).unwrap();
        assert_eq!(outcome.detected, Some(StrategyLabel::WealthGrind));
        assert_eq!(outcome.detection_hit(), Some(true));
    }

    #[test]
    fn scholar_is_recognised_while_paying_its_way() {
        let config =
            MatchConfig::new(DifficultyLevel::Hard, RivalStrategy::Scholar, 3).with_weeks(6);
        let outcome = run_match(config).unwrap();
        assert_eq!(outcome.detected, Some(StrategyLabel::EducationRush));
        assert_eq!(outcome.detection_hit(), Some(true));
    }
}
