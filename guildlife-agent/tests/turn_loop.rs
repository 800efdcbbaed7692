use guildlife_agent::{
    AgentConfig, Appliance, Board, Content, Degree, DifficultyLevel, GoalSettings, HousingOffer,
    HousingTier, Job, Location, NoDelay, OpponentSession, Pacer, Player, PlayerId, PriceList,
    Rejection, SandboxWorld, SkipHandle, StrategyLabel, TurnExit, WorldMutations, WorldStore,
};
use std::thread;
use std::time::Duration;

const BOT: PlayerId = PlayerId(1);
const HUMAN: PlayerId = PlayerId(2);

/// Sandbox that refuses every mutation except ending the turn.
struct Stubborn(SandboxWorld);

impl WorldStore for Stubborn {
    fn player(&self, id: PlayerId) -> Option<Player> {
        self.0.player(id)
    }
    fn is_game_over(&self, id: PlayerId) -> bool {
        self.0.is_game_over(id)
    }
    fn current_week(&self) -> u32 {
        self.0.current_week()
    }
    fn rivals_of(&self, id: PlayerId) -> Vec<Player> {
        self.0.rivals_of(id)
    }
}

const REFUSED: Rejection = Rejection::NothingToDo("refused");

impl WorldMutations for Stubborn {
    fn move_to(&mut self, _: PlayerId, _: Location, _: i32) -> Result<(), Rejection> {
        Err(REFUSED)
    }
    fn work_shift(&mut self, _: PlayerId, _: i32, _: i32) -> Result<i32, Rejection> {
        Err(REFUSED)
    }
    fn buy_food(&mut self, _: PlayerId, _: i32) -> Result<(), Rejection> {
        Err(REFUSED)
    }
    fn buy_clothing(&mut self, _: PlayerId, _: i32) -> Result<(), Rejection> {
        Err(REFUSED)
    }
    fn buy_appliance(&mut self, _: PlayerId, _: &str, _: i32) -> Result<(), Rejection> {
        Err(REFUSED)
    }
    fn study_degree(&mut self, _: PlayerId, _: &str, _: i32, _: i32) -> Result<(), Rejection> {
        Err(REFUSED)
    }
    fn complete_degree(&mut self, _: PlayerId, _: &str) -> Result<(), Rejection> {
        Err(REFUSED)
    }
    fn apply_for_job(&mut self, _: PlayerId, _: &str) -> Result<(), Rejection> {
        Err(REFUSED)
    }
    fn pay_rent(&mut self, _: PlayerId) -> Result<(), Rejection> {
        Err(REFUSED)
    }
    fn deposit_to_bank(&mut self, _: PlayerId, _: i32) -> Result<(), Rejection> {
        Err(REFUSED)
    }
    fn withdraw_from_bank(&mut self, _: PlayerId, _: i32) -> Result<(), Rejection> {
        Err(REFUSED)
    }
    fn upgrade_housing(
        &mut self,
        _: PlayerId,
        _: HousingTier,
        _: i32,
        _: i32,
    ) -> Result<(), Rejection> {
        Err(REFUSED)
    }
    fn rest_at_home(&mut self, _: PlayerId, _: i32) -> Result<i32, Rejection> {
        Err(REFUSED)
    }
    fn end_turn(&mut self, id: PlayerId) -> Result<(), Rejection> {
        self.0.end_turn(id)
    }
}

impl Board for Stubborn {
    fn shortest_distance(&self, from: Location, to: Location) -> i32 {
        self.0.shortest_distance(from, to)
    }
}

impl Content for Stubborn {
    fn jobs(&self) -> &[Job] {
        self.0.jobs()
    }
    fn degrees(&self) -> &[Degree] {
        self.0.degrees()
    }
    fn appliances(&self) -> &[Appliance] {
        self.0.appliances()
    }
    fn housing_offers(&self) -> &[HousingOffer] {
        self.0.housing_offers()
    }
    fn prices(&self) -> PriceList {
        self.0.prices()
    }
}

fn calm_config(level: DifficultyLevel) -> AgentConfig {
    let mut config = AgentConfig::for_level(level, 42);
    config.difficulty.mistake_chance = 0.0;
    config
}

fn two_player_world() -> SandboxWorld {
    let mut world = SandboxWorld::new();
    world.add_player(Player::new(BOT, "Bot"), false);
    world.add_player(Player::new(HUMAN, "Human"), true);
    world
}

#[test]
fn refusing_world_trips_the_step_budget() {
    let mut world = Stubborn(two_player_world());
    let mut session = OpponentSession::new(GoalSettings::default()).unwrap();
    session
        .add_agent(BOT, calm_config(DifficultyLevel::Medium))
        .unwrap();

    let report = session.run_ai_turn(&mut world, BOT, &mut NoDelay).unwrap();
    assert_eq!(report.exit, TurnExit::SafetyBudget);
    assert_eq!(report.steps.len(), 15);
    assert_eq!(report.rejections(), 15);
    assert!(report.forced());
    assert_eq!(world.0.ended_turns(BOT), 1);
    assert!(!session.agent(BOT).unwrap().is_in_flight());
}

#[test]
fn smaller_budgets_are_honoured() {
    let mut world = Stubborn(two_player_world());
    let mut session = OpponentSession::new(GoalSettings::default()).unwrap();
    session
        .add_agent(BOT, calm_config(DifficultyLevel::Easy).with_max_steps(4))
        .unwrap();
    let report = session.run_ai_turn(&mut world, BOT, &mut NoDelay).unwrap();
    assert_eq!(report.exit, TurnExit::SafetyBudget);
    assert_eq!(report.steps.len(), 4);
}

/// Presses "skip" from another thread during the first pause.
struct SkipAfterFirstStep(SkipHandle);

impl Pacer for SkipAfterFirstStep {
    fn pause(&mut self, _: Duration) {
        let handle = self.0.clone();
        thread::spawn(move || handle.request()).join().unwrap();
    }
}

#[test]
fn skip_requested_from_another_thread_ends_the_turn() {
    let mut world = two_player_world();
    let mut session = OpponentSession::new(GoalSettings::default()).unwrap();
    session
        .add_agent(BOT, calm_config(DifficultyLevel::Hard))
        .unwrap();
    let mut pacer = SkipAfterFirstStep(session.skip_handle(BOT).unwrap());

    let report = session.run_ai_turn(&mut world, BOT, &mut pacer).unwrap();
    assert_eq!(report.exit, TurnExit::Skipped);
    assert_eq!(report.steps.len(), 1);
    assert_eq!(world.ended_turns(BOT), 1);
    assert_eq!(world.player_ref(BOT).map(|p| p.time_remaining), Some(0));
}

/// Remembers every delay it was asked to wait for, without waiting.
#[derive(Default)]
struct DelayLog(Vec<Duration>);

impl Pacer for DelayLog {
    fn pause(&mut self, delay: Duration) {
        self.0.push(delay);
    }
}

#[test]
fn pacing_never_changes_what_the_bot_does() {
    let config = AgentConfig::for_level(DifficultyLevel::Medium, 9);
    let play = |pacer: &mut dyn Pacer| {
        let mut world = two_player_world();
        let mut session = OpponentSession::new(GoalSettings::default()).unwrap();
        session.add_agent(BOT, config).unwrap();
        let mut reports = Vec::new();
        for _ in 0..3 {
            reports.push(session.run_ai_turn(&mut world, BOT, &mut *pacer).unwrap());
            world.advance_week();
        }
        (reports, world.player_ref(BOT).cloned())
    };

    let (instant, instant_bot) = play(&mut NoDelay);
    let mut log = DelayLog::default();
    let (paced, paced_bot) = play(&mut log);

    assert_eq!(instant, paced);
    assert_eq!(instant_bot, paced_bot);
    let steps: usize = paced.iter().map(|report| report.steps.len()).sum();
    assert!(!log.0.is_empty());
    assert!(log.0.len() <= steps);
    let expected = config.difficulty.decision_delay();
    assert!(!expected.is_zero());
    assert!(log.0.iter().all(|delay| *delay == expected));
}

#[test]
fn game_over_player_does_not_act() {
    let mut world = two_player_world();
    world.set_game_over(BOT);
    let mut session = OpponentSession::new(GoalSettings::default()).unwrap();
    session
        .add_agent(BOT, calm_config(DifficultyLevel::Medium))
        .unwrap();
    let report = session.run_ai_turn(&mut world, BOT, &mut NoDelay).unwrap();
    assert_eq!(report.exit, TurnExit::GameOver);
    assert!(report.steps.is_empty());
}

#[test]
fn bot_learns_a_wealth_grinder_over_several_weeks() {
    let mut world = two_player_world();
    let mut session = OpponentSession::new(GoalSettings::default()).unwrap();
    session
        .add_agent(BOT, calm_config(DifficultyLevel::Hard))
        .unwrap();

    for week in 1..=6 {
        if let Some(human) = world.player_mut(HUMAN) {
            human.gold += 150;
            human.food_level = 100;
        }
        let report = session.run_ai_turn(&mut world, BOT, &mut NoDelay).unwrap();
        assert_eq!(report.week, week);
        assert!(report.steps.len() <= 15, "week {week}: {} steps", report.steps.len());
        assert!(matches!(
            report.exit,
            TurnExit::EndedTurn | TurnExit::OutOfTime | TurnExit::SafetyBudget
        ));
        world.advance_week();
    }

    let repo = session.repository();
    assert_eq!(repo.observed_turns(HUMAN), 5);
    assert_eq!(repo.dominant_strategy(HUMAN), Some(StrategyLabel::WealthGrind));
    assert!(repo.profile(BOT).is_none());

    session.reset_for_new_game();
    assert!(session.repository().profile(HUMAN).is_none());
    assert!(session.repository().is_empty());
}
