use caravan_game::crossings::crossing_options;
use caravan_game::journey::{self, RiverOutcome, TrailSession};
use caravan_game::travel::TravelBlock;
use caravan_game::{Difficulty, DifficultySettings, GameData, GameScreen, encode_friendly, final_score};
use log::debug;
use serde::Serialize;
use twox_hash::XxHash64;

use crate::logic::policy::{DayPlan, GameplayStrategy, PlayerPolicy, Upkeep};

pub const PARTY_NAMES: [&str; 5] = ["Abigail", "Bartholomew", "Clementine", "Dorothea", "Ezekiel"];

/// Policy steps allowed per simulated day before a run counts as stalled.
const MAX_STEPS_PER_DAY: u32 = 16;

/// Configuration for a simulation run.
#[derive(Debug, Clone, Copy)]
pub struct SimulationConfig {
    pub seed: u64,
    pub difficulty: Difficulty,
    /// Tuning row the game is created with; the difficulty's preset unless
    /// a table overrides it.
    pub settings: DifficultySettings,
    pub strategy: GameplayStrategy,
    pub max_days: u32,
}

impl SimulationConfig {
    #[must_use]
    pub const fn new(difficulty: Difficulty, strategy: GameplayStrategy, seed: u64) -> Self {
        Self {
            seed,
            difficulty,
            settings: difficulty.preset(),
            strategy,
            max_days: 365,
        }
    }

    #[must_use]
    pub const fn with_settings(mut self, settings: DifficultySettings) -> Self {
        self.settings = settings;
        self
    }

    #[must_use]
    pub const fn with_max_days(mut self, max_days: u32) -> Self {
        self.max_days = max_days;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    Victory,
    Perished,
    /// The journey stopped making progress: out of days, oxen, or steps.
    Stalled,
}

impl RunOutcome {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Victory => "Victory",
            Self::Perished => "Perished",
            Self::Stalled => "Stalled",
        }
    }
}

/// Snapshot of a resolved event.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionRecord {
    pub day: u32,
    pub event: String,
    pub choice: String,
    pub policy: String,
    pub rationale: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunCounters {
    pub travel_days: u32,
    pub rest_days: u32,
    pub hunts: u32,
    pub food_hunted: u32,
    pub events: u32,
    pub crossings: u32,
    pub crossing_failures: u32,
    pub waits: u32,
    pub store_visits: u32,
    pub repairs: u32,
    pub doses_given: u32,
}

/// Everything a finished run reports.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub seed: u64,
    pub share_code: String,
    pub difficulty: Difficulty,
    pub strategy: GameplayStrategy,
    pub outcome: RunOutcome,
    pub days: u32,
    pub miles: u32,
    pub survivors: u32,
    pub score: u32,
    pub counters: RunCounters,
    pub rng_draws: u64,
    /// Hash of the final snapshot, for determinism checks.
    pub fingerprint: u64,
    pub decisions: Vec<DecisionRecord>,
    #[serde(skip)]
    pub final_state: GameData,
}

/// Hash a snapshot's JSON form.
#[must_use]
pub fn fingerprint(state: &GameData) -> u64 {
    let bytes = serde_json::to_vec(state).unwrap_or_default();
    XxHash64::oneshot(0, &bytes)
}

/// Drive one seeded journey to its end with the strategy's policy.
#[must_use]
pub fn run_journey(config: SimulationConfig) -> RunSummary {
    let game = GameData::with_settings(config.difficulty, config.settings);
    let mut session = TrailSession::from_state(game, config.seed);
    let mut policy = config.strategy.create_policy(config.seed);
    let mut counters = RunCounters::default();
    let mut decisions = Vec::new();

    session.start(&PARTY_NAMES, None);
    let (pace, rations) = policy.settings();
    session.apply(|state| journey::set_rations(&journey::set_pace(state, pace), rations));

    let mut last_store: Option<usize> = None;
    let mut stalled = false;
    let step_budget = config.max_days.saturating_mul(MAX_STEPS_PER_DAY);

    for _ in 0..step_budget {
        let state = session.state();
        if state.screen.is_terminal() {
            break;
        }
        if state.days_elapsed >= config.max_days {
            stalled = true;
            break;
        }

        match state.screen {
            GameScreen::Event => {
                resolve_event(&mut session, policy.as_mut(), &mut counters, &mut decisions);
                continue;
            }
            GameScreen::River => {
                cross_river(&mut session, policy.as_mut(), &mut counters);
                continue;
            }
            _ => {}
        }

        let index = state.location_index;
        let has_store = state.current_location().is_some_and(|l| l.has_store);
        if has_store && last_store != Some(index) {
            last_store = Some(index);
            counters.store_visits += 1;
            let list = policy.shopping_list(session.state());
            for (item, quantity) in list {
                session.apply(|state| journey::purchase(state, item, quantity));
            }
        }

        for task in policy.upkeep(session.state()) {
            match task {
                Upkeep::RepairWagon => {
                    counters.repairs += 1;
                    session.apply(journey::repair_wagon);
                }
                Upkeep::Medicine(member) => {
                    counters.doses_given += 1;
                    session.apply(|state| journey::use_medicine_on_member(state, member));
                }
            }
        }

        match policy.plan_day(session.state()) {
            DayPlan::Rest => {
                counters.rest_days += 1;
                session.rest();
            }
            DayPlan::Hunt { ammo } => {
                counters.hunts += 1;
                let result = session.hunt(ammo);
                counters.food_hunted += result.food_gained;
            }
            DayPlan::Travel => {
                let turn = session.advance_day();
                match turn.blocked {
                    None => counters.travel_days += 1,
                    Some(TravelBlock::RiverAhead) => {
                        session.apply(|state| journey::set_screen(state, GameScreen::River));
                    }
                    Some(TravelBlock::NoOxen) => {
                        stalled = true;
                        break;
                    }
                    Some(TravelBlock::PartyDead | TravelBlock::AtDestination) => {}
                }
            }
        }
    }

    let state = session.state();
    let outcome = if state.is_victory() {
        RunOutcome::Victory
    } else if state.is_game_over() {
        RunOutcome::Perished
    } else {
        if !stalled {
            debug!("seed {} ran out of steps on day {}", config.seed, state.days_elapsed);
        }
        RunOutcome::Stalled
    };

    let rng_draws = session.draws();
    let final_state = session.into_state();
    debug!(
        "{} {} seed {}: {} after {} days",
        config.difficulty,
        config.strategy,
        config.seed,
        outcome.label(),
        final_state.days_elapsed
    );

    RunSummary {
        seed: config.seed,
        share_code: encode_friendly(config.difficulty, config.seed),
        difficulty: config.difficulty,
        strategy: config.strategy,
        outcome,
        days: final_state.days_elapsed,
        miles: final_state.distance_traveled,
        survivors: u32::try_from(final_state.survivors()).unwrap_or(u32::MAX),
        score: final_score(&final_state),
        counters,
        rng_draws,
        fingerprint: fingerprint(&final_state),
        decisions,
        final_state,
    }
}

fn resolve_event(
    session: &mut TrailSession,
    policy: &mut (dyn PlayerPolicy + Send),
    counters: &mut RunCounters,
    decisions: &mut Vec<DecisionRecord>,
) {
    let state = session.state();
    let Some(event) = state.current_event.clone() else {
        session.apply(|state| journey::set_screen(state, GameScreen::Traveling));
        return;
    };
    let decision = policy.pick_choice(state, &event);
    let choice = event
        .choices
        .iter()
        .find(|c| c.id == decision.choice)
        .map_or_else(|| decision.choice.to_string(), |c| c.text.clone());
    decisions.push(DecisionRecord {
        day: state.days_elapsed,
        event: event.title.clone(),
        choice,
        policy: policy.name().to_string(),
        rationale: decision.rationale,
    });
    counters.events += 1;
    session.resolve_event(decision.choice);
}

fn cross_river(
    session: &mut TrailSession,
    policy: &mut (dyn PlayerPolicy + Send),
    counters: &mut RunCounters,
) {
    let state = session.state();
    let difficulty = state.pending_crossing.or_else(|| {
        state
            .current_location()
            .and_then(|location| location.river_difficulty)
    });
    let Some(difficulty) = difficulty else {
        session.apply(|state| journey::set_screen(state, GameScreen::Traveling));
        return;
    };
    let options = crossing_options(difficulty, &state.supplies);
    let method = policy.pick_crossing(state, difficulty, &options);
    match session.cross_river(method) {
        Some(RiverOutcome::Attempt(result)) => {
            counters.crossings += 1;
            if !result.success {
                counters.crossing_failures += 1;
            }
        }
        Some(RiverOutcome::Waited(_)) => counters.waits += 1,
        None => session.apply(|state| journey::set_screen(state, GameScreen::Traveling)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn journeys_finish() {
        for strategy in GameplayStrategy::ALL {
            let summary = run_journey(SimulationConfig::new(Difficulty::Normal, strategy, 1337));
            assert!(summary.days > 0, "{strategy} never left town");
            assert!(summary.days <= 365);
            if summary.outcome == RunOutcome::Victory {
                assert!(summary.survivors > 0);
                assert!(summary.miles >= caravan_game::route::total_distance());
            }
        }
    }

    #[test]
    fn same_seed_same_fingerprint() {
        let config = SimulationConfig::new(Difficulty::Hard, GameplayStrategy::Reckless, 42);
        let a = run_journey(config);
        let b = run_journey(config);
        assert_eq!(a.fingerprint, b.fingerprint);
        assert_eq!(a.rng_draws, b.rng_draws);
        assert_eq!(a.score, b.score);
    }

    #[test]
    fn custom_settings_reach_the_game() {
        let settings = DifficultySettings {
            starting_money: 50.0,
            ..Difficulty::Normal.preset()
        };
        let config = SimulationConfig::new(Difficulty::Normal, GameplayStrategy::Balanced, 5)
            .with_settings(settings)
            .with_max_days(1);
        let summary = run_journey(config);
        assert_eq!(summary.final_state.settings, settings);
        assert!(summary.final_state.supplies.money <= 50.0);
    }

    #[test]
    fn day_cap_stalls_the_run() {
        let config = SimulationConfig::new(Difficulty::Easy, GameplayStrategy::Cautious, 7)
            .with_max_days(3);
        let summary = run_journey(config);
        assert!(summary.days < 10);
        assert_ne!(summary.outcome, RunOutcome::Victory);
    }
}
