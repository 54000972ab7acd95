//! Seeded session wrapper: one game snapshot plus the RNG streams that
//! drive it.
use crate::crossings::RiverMethod;
use crate::difficulty::Difficulty;
use crate::events::EventResult;
use crate::hunt::HuntingResult;
use crate::journey::actions::{self, RiverOutcome};
use crate::journey::{TurnResult, advance_turn, apply_turn_result};
use crate::rng::RngBundle;
use crate::state::GameData;

/// Binds a game snapshot to its seeded RNG streams.
///
/// Every random draw the session makes comes from the bundle: daily turns
/// from `travel`, event choices from `encounter`, rivers from `crossing`,
/// and hunts from `hunt`. The same seed and the same calls always produce
/// the same journey.
#[derive(Debug, Clone)]
pub struct TrailSession {
    state: GameData,
    rngs: RngBundle,
    seed: u64,
}

impl TrailSession {
    /// Title-screen game for `difficulty`, seeded with `seed`.
    #[must_use]
    pub fn new(difficulty: Difficulty, seed: u64) -> Self {
        Self::from_state(actions::create_game_with(difficulty), seed)
    }

    /// Resume an existing snapshot with fresh streams for `seed`.
    #[must_use]
    pub fn from_state(state: GameData, seed: u64) -> Self {
        Self {
            state,
            rngs: RngBundle::from_user_seed(seed),
            seed,
        }
    }

    /// Form the party and set out on the trail.
    pub fn start<S: AsRef<str>>(&mut self, names: &[S], start_month: Option<u8>) {
        let outfitted = actions::start_game(&self.state, names, start_month);
        self.state = actions::begin_travel(&outfitted);
    }

    /// Play one day and commit it, returning what happened.
    pub fn advance_day(&mut self) -> TurnResult {
        let mut rng = self.rngs.travel();
        let result = advance_turn(&self.state, &mut *rng);
        self.state = apply_turn_result(&self.state, result.clone(), &mut *rng);
        result
    }

    /// Resolve the pending event, if any.
    pub fn resolve_event(&mut self, choice: u8) -> Option<EventResult> {
        let event = self.state.current_event.as_ref()?;
        let mut rng = self.rngs.encounter();
        let result = crate::events::apply_event_choice(
            event,
            choice,
            &self.state.party,
            &self.state.supplies,
            &mut *rng,
        );
        self.state = actions::apply_event_result(&self.state, &result);
        Some(result)
    }

    /// Attempt the current river. `None` when there is no river to cross.
    pub fn cross_river(&mut self, method: RiverMethod) -> Option<RiverOutcome> {
        let mut rng = self.rngs.crossing();
        let (next, outcome) = actions::handle_river(&self.state, method, &mut *rng);
        self.state = next;
        outcome
    }

    pub fn hunt(&mut self, ammo_to_use: u32) -> HuntingResult {
        let mut rng = self.rngs.hunt();
        let (next, result) = actions::handle_hunting(&self.state, ammo_to_use, &mut *rng);
        self.state = next;
        result
    }

    pub fn rest(&mut self) {
        self.state = actions::rest(&self.state);
    }

    /// Apply any snapshot transition, e.g. a store purchase.
    pub fn apply(&mut self, transition: impl FnOnce(&GameData) -> GameData) {
        self.state = transition(&self.state);
    }

    /// Deterministically reseed every stream.
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.rngs = RngBundle::from_user_seed(seed);
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Total RNG draws made so far.
    #[must_use]
    pub fn draws(&self) -> u64 {
        self.rngs.total_draws()
    }

    #[must_use]
    pub const fn state(&self) -> &GameData {
        &self.state
    }

    #[must_use]
    pub fn into_state(self) -> GameData {
        self.state
    }
}
