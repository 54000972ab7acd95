//! Daily turn orchestration.
//!
//! A day runs in two phases. [`advance_turn`] computes the day's outcome
//! from an immutable snapshot without committing it; [`apply_turn_result`]
//! commits that outcome, moves the calendar, and routes the screen. Effects
//! inside a day always apply in the same order: weather draw, travel gate,
//! movement, food, weather damage, weekly pace and ration effects, sickness
//! and injury progression, event roll.
use log::{debug, info};
use serde::Serialize;

use crate::constants::{DAYS_PER_WEEK, STARVATION_DAMAGE};
use crate::events::{EventIds, GameEvent, generate_event, roll_for_event};
use crate::numbers::floor_f64_to_i32;
use crate::party::{MemberId, Party};
use crate::rng::RandomSource;
use crate::route::{self, Location};
use crate::state::{GameData, GameScreen};
use crate::supplies::{Supplies, daily_food_need};
use crate::travel::{TravelBlock, TravelDayResult, can_continue, travel_one_day};
use crate::weather::{Weather, generate_weather};

pub mod actions;
pub mod session;

pub use actions::{
    RiverOutcome, add_message, apply_event_result, apply_hunting_result, apply_river_result,
    begin_travel, clear_messages, create_game, create_game_with, handle_event, handle_hunting,
    handle_river, purchase, repair_wagon, rest, sell, set_current_event, set_pace, set_rations,
    set_screen, start_game, use_medicine_on_member, visit_store,
};
pub use session::TrailSession;

/// One day's computed outcome, not yet committed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnResult {
    /// Weather the day was played under.
    pub weather: Weather,
    /// False when the travel gate refused to move; nothing else happened.
    pub day_passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked: Option<TravelBlock>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub travel: Option<TravelDayResult>,
    /// Party after starvation, weather, and daily effects.
    pub party: Party,
    /// Supplies after the day's food.
    pub supplies: Supplies,
    pub food_consumed: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<GameEvent>,
    pub event_ids: EventIds,
    pub messages: Vec<String>,
}

impl TurnResult {
    fn refused(state: &GameData, weather: Weather, reason: TravelBlock) -> Self {
        Self {
            weather,
            day_passed: false,
            blocked: Some(reason),
            travel: None,
            party: state.party.clone(),
            supplies: state.supplies.clone(),
            food_consumed: 0,
            event: None,
            event_ids: state.event_ids,
            messages: vec![reason.message().to_string()],
        }
    }

    #[must_use]
    pub fn distance_traveled(&self) -> u32 {
        self.travel.map_or(0, |travel| travel.distance_traveled)
    }

    #[must_use]
    pub fn reached_location(&self) -> Option<&'static Location> {
        self.travel.and_then(|travel| travel.reached_location)
    }
}

/// Weekly effects land on the last day of every seven elapsed trail days.
#[must_use]
pub const fn day_of_week(trail_day: u32) -> u32 {
    match trail_day % DAYS_PER_WEEK {
        0 => DAYS_PER_WEEK,
        day => day,
    }
}

/// Compute one day from `state` without committing it.
pub fn advance_turn<R: RandomSource>(state: &GameData, rng: &mut R) -> TurnResult {
    let weather = generate_weather(state.date.month, rng);

    if state.pending_crossing.is_some() {
        return TurnResult::refused(state, weather, TravelBlock::RiverAhead);
    }
    let check = can_continue(&state.party, &state.wagon, state.location_index);
    if let Some(reason) = check.reason {
        return TurnResult::refused(state, weather, reason);
    }

    let mut messages = Vec::new();
    let travel = travel_one_day(
        state.distance_traveled,
        state.location_index,
        state.pace,
        weather,
        &state.wagon,
    );
    if travel.distance_traveled > 0 {
        messages.push(format!("Traveled {} miles.", travel.distance_traveled));
    } else if weather.prevents_travel() {
        messages.push("Blizzard! Cannot travel today.".to_string());
    }

    let mut party = state.party.clone();
    let mut supplies = state.supplies.clone();

    let eaters = party.alive_count();
    let needed = daily_food_need(eaters, state.rations);
    let shortfall = supplies.feed_party(eaters, state.rations);
    if shortfall > 0 {
        messages.push("Not enough food! The party is starving.".to_string());
        let died = party.update_health_all(-STARVATION_DAMAGE);
        push_deaths(&party, &died, &mut messages);
    }

    let health_mod = weather.health_modifier();
    if health_mod != 0 {
        let scaled = if health_mod < 0 {
            floor_f64_to_i32(f64::from(health_mod) * state.settings.weather_harshness)
        } else {
            health_mod
        };
        let died = party.update_health_all(scaled);
        if scaled < 0 {
            messages.push(format!("The {weather} weather is taking a toll on the party."));
        }
        push_deaths(&party, &died, &mut messages);
    }

    let trail_day = state.days_elapsed.saturating_add(1);
    messages.extend(party.apply_daily_effects(
        state.rations,
        state.pace,
        day_of_week(trail_day),
        rng,
    ));

    // A party that died today rolls no event and draws nothing further.
    let mut event_ids = state.event_ids;
    let event = if party.is_alive() {
        roll_for_event(state.settings.event_multiplier, rng)
            .map(|kind| generate_event(kind, &party, &mut event_ids, rng))
    } else {
        messages.push("Your entire party has perished.".to_string());
        None
    };

    TurnResult {
        weather,
        day_passed: true,
        blocked: None,
        travel: Some(travel),
        party,
        supplies,
        food_consumed: needed.saturating_sub(shortfall),
        event,
        event_ids,
        messages,
    }
}

fn push_deaths(party: &Party, died: &[MemberId], messages: &mut Vec<String>) {
    for id in died {
        if let Some(member) = party.member(*id) {
            messages.push(format!("{} has died.", member.name));
        }
    }
}

/// Commit a computed day: calendar, position, resources, weather for the
/// new date, and the next screen. Food was already settled by
/// [`advance_turn`] and is not deducted again.
pub fn apply_turn_result<R: RandomSource>(
    state: &GameData,
    result: TurnResult,
    rng: &mut R,
) -> GameData {
    let mut next = state.clone();
    next.messages.extend(result.messages);

    if !result.day_passed {
        let stay = if result.blocked == Some(TravelBlock::RiverAhead) {
            GameScreen::River
        } else {
            next.screen
        };
        next.screen = terminal_screen(&next).unwrap_or(stay);
        return next;
    }

    next.date = next.date.advance_day();
    next.days_elapsed = next.days_elapsed.saturating_add(1);
    next.party = result.party;
    next.supplies = result.supplies;
    next.event_ids = result.event_ids;
    next.weather = generate_weather(next.date.month, rng);

    let reached = result.travel.and_then(|travel| {
        next.distance_traveled = travel.new_total_distance;
        next.location_index = travel.new_location_index;
        travel.reached_location
    });
    if let Some(location) = reached {
        next.messages.push(format!("You have reached {}.", location.name));
        if location.is_river() {
            next.pending_crossing = location.river_difficulty;
        }
    }
    let routed = match (&result.event, reached) {
        (Some(_), _) => GameScreen::Event,
        (None, Some(location)) if location.is_river() => GameScreen::River,
        (None, Some(_)) => GameScreen::Landmark,
        (None, None) => GameScreen::Traveling,
    };
    next.current_event = result.event;
    next.screen = terminal_screen(&next).unwrap_or(routed);

    debug!(
        "day {} committed: {} mi total, index {}, food {}, screen {}",
        next.days_elapsed,
        next.distance_traveled,
        next.location_index,
        next.supplies.food,
        next.screen
    );
    if next.screen.is_terminal() {
        info!(
            "journey ended on day {} with {}: {} survivors",
            next.days_elapsed,
            next.screen,
            next.survivors()
        );
    }
    next
}

/// GameOver when everyone is dead, Victory when standing at the destination.
pub(crate) fn terminal_screen(state: &GameData) -> Option<GameScreen> {
    if !state.party.is_alive() {
        return Some(GameScreen::GameOver);
    }
    if route::is_destination(state.location_index) {
        return Some(GameScreen::Victory);
    }
    None
}

/// Screen after an action that passes time without moving: terminal if the
/// journey is over, the river while a crossing is pending, else the trail.
pub(crate) fn idle_screen(state: &GameData) -> GameScreen {
    terminal_screen(state).unwrap_or(if state.pending_crossing.is_some() {
        GameScreen::River
    } else {
        GameScreen::Traveling
    })
}

/// Let `days` pass without travel: the calendar moves and the party eats,
/// with food floored at zero.
pub(crate) fn spend_idle_days(state: &mut GameData, days: u32) {
    for _ in 0..days {
        state.date = state.date.advance_day();
        state.days_elapsed = state.days_elapsed.saturating_add(1);
        let needed = daily_food_need(state.party.alive_count(), state.rations);
        state.supplies.food = state.supplies.food.saturating_sub(needed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::difficulty::Difficulty;
    use crate::events::EventKind;
    use crate::party::MemberStatus;
    use crate::rng::{FixedRoll, ScriptedRolls};

    fn traveling(names: &[&str]) -> GameData {
        let state = create_game_with(Difficulty::Normal);
        begin_travel(&start_game(&state, names, None))
    }

    /// Clear skies, then rolls high enough that no event fires.
    fn clear_quiet_day() -> ScriptedRolls {
        ScriptedRolls::new([0.0], 0.99)
    }

    #[test]
    fn week_boundary_falls_on_seventh_day() {
        assert_eq!(day_of_week(1), 1);
        assert_eq!(day_of_week(7), 7);
        assert_eq!(day_of_week(14), 7);
        assert_eq!(day_of_week(15), 1);
    }

    #[test]
    fn food_is_deducted_exactly_once() {
        let state = traveling(&["Ada", "Bo"]);
        let food_before = state.supplies.food;
        let result = advance_turn(&state, &mut clear_quiet_day());
        assert_eq!(result.food_consumed, 4);
        assert_eq!(result.supplies.food, food_before - 4);

        let next = apply_turn_result(&state, result, &mut FixedRoll(0.0));
        assert_eq!(next.supplies.food, food_before - 4);
        assert_eq!(next.days_elapsed, 1);
        assert_eq!(next.date.day, 2);
        assert_eq!(next.distance_traveled, 17);
        assert_eq!(next.screen, GameScreen::Traveling);
    }

    #[test]
    fn starvation_zeroes_food_and_hurts_everyone() {
        let mut state = traveling(&["Ada", "Bo"]);
        state.supplies.food = 3;
        let result = advance_turn(&state, &mut clear_quiet_day());
        assert_eq!(result.supplies.food, 0);
        assert_eq!(result.food_consumed, 3);
        assert!(result.party.alive().all(|m| m.health == 80));
        assert!(result.messages.iter().any(|m| m.contains("starving")));
    }

    #[test]
    fn harsh_weather_is_scaled_and_floored() {
        let mut state = traveling(&["Ada"]);
        state.settings = Difficulty::Hard.preset();
        // April storm: 0.5 + 0.35 <= 0.9 < 0.95. Then no event.
        let result = advance_turn(&state, &mut ScriptedRolls::new([0.9], 0.99));
        assert_eq!(result.weather, Weather::Storm);
        // -5 scaled by 1.5 floors to -8.
        assert_eq!(result.party.members[0].health, 92);
    }

    #[test]
    fn effects_apply_in_turn_order() {
        let mut state = traveling(&["Ada", "Bo"]);
        state.settings = Difficulty::Hard.preset();
        state.supplies.food = 0;
        state.days_elapsed = 6;
        state.party.set_status(0, MemberStatus::Sick, &mut FixedRoll(0.0));

        let mut rolls = ScriptedRolls::new(
            [
                0.9,  // storm
                0.1,  // Ada spreads her sickness
                0.0,  // to Bo
                0.0,  // Bo's duration
                0.99, // Bo spreads nothing
                0.0,  // illness event
                0.0,  // its target
                0.0,  // its flavor
            ],
            0.5,
        );
        let result = advance_turn(&state, &mut rolls);
        assert_eq!(rolls.remaining(), 0);
        assert_eq!(rolls.draws(), 8);

        let position = |text: &str| {
            result
                .messages
                .iter()
                .position(|m| m == text)
                .unwrap_or_else(|| panic!("missing {text:?} in {:?}", result.messages))
        };
        let starving = position("Not enough food! The party is starving.");
        let storm = position(&format!(
            "The {} weather is taking a toll on the party.",
            Weather::Storm
        ));
        let caught = position("Bo has caught the illness.");
        assert!(starving < storm && storm < caught);

        // 100 - 20 starving - 8 storm - 2 weekly meager rations - 5 sickness.
        assert!(result.party.members.iter().all(|m| m.health == 65));
        assert!(result.party.members.iter().all(|m| m.status == MemberStatus::Sick));
        assert_eq!(result.party.members[0].sickness_turns, 2);
        let event = result.event.as_ref().map(|e| (e.kind, e.target));
        assert_eq!(event, Some((EventKind::Illness, Some(0))));
    }

    #[test]
    fn dead_party_rolls_no_event() {
        let mut state = traveling(&["Ada", "Bo"]);
        state.supplies.food = 0;
        state.party.update_health_all(-90);

        let mut rolls = ScriptedRolls::new([0.0], 0.0);
        let result = advance_turn(&state, &mut rolls);
        assert_eq!(rolls.draws(), 1);
        assert!(result.event.is_none());
        assert!(!result.party.is_alive());
        assert_eq!(
            result.messages.last().map(String::as_str),
            Some("Your entire party has perished.")
        );

        let next = apply_turn_result(&state, result, &mut FixedRoll(0.0));
        assert_eq!(next.screen, GameScreen::GameOver);
        assert!(next.current_event.is_none());
    }

    #[test]
    fn gate_refusal_passes_no_day() {
        let mut state = traveling(&["Ada"]);
        state.wagon.oxen = 0;
        let result = advance_turn(&state, &mut FixedRoll(0.5));
        assert!(!result.day_passed);
        assert_eq!(result.blocked, Some(TravelBlock::NoOxen));
        let next = apply_turn_result(&state, result, &mut FixedRoll(0.5));
        assert_eq!(next.date, state.date);
        assert_eq!(next.supplies.food, state.supplies.food);
        assert_eq!(next.messages.last().map(String::as_str), Some(TravelBlock::NoOxen.message()));
    }

    #[test]
    fn arriving_at_a_river_blocks_until_crossed() {
        let mut state = traveling(&["Ada"]);
        state.distance_traveled = 95;
        let result = advance_turn(&state, &mut clear_quiet_day());
        assert_eq!(result.reached_location().map(|l| l.id), Some("kansas_river"));
        let next = apply_turn_result(&state, result, &mut FixedRoll(0.99));
        assert_eq!(next.screen, GameScreen::River);
        assert_eq!(next.pending_crossing, Some(2));

        let refused = advance_turn(&next, &mut FixedRoll(0.99));
        assert_eq!(refused.blocked, Some(TravelBlock::RiverAhead));
    }

    #[test]
    fn event_routes_to_event_screen() {
        let state = traveling(&["Ada", "Bo"]);
        // Clear weather, then an illness roll, its target, and its flavor.
        let result = advance_turn(&state, &mut FixedRoll(0.0));
        assert!(result.event.is_some());
        let next = apply_turn_result(&state, result, &mut FixedRoll(0.0));
        assert_eq!(next.screen, GameScreen::Event);
        assert_eq!(next.event_ids.peek(), 1);
    }

    #[test]
    fn destination_means_victory() {
        let mut state = traveling(&["Ada"]);
        state.location_index = 15;
        state.distance_traveled = 1990;
        let result = advance_turn(&state, &mut clear_quiet_day());
        let next = apply_turn_result(&state, result, &mut FixedRoll(0.99));
        assert_eq!(next.screen, GameScreen::Victory);
        assert!(next.is_victory());
    }

    #[test]
    fn idle_days_eat_and_advance() {
        let mut state = traveling(&["Ada", "Bo", "Cy"]);
        state.supplies.food = 10;
        spend_idle_days(&mut state, 2);
        assert_eq!(state.days_elapsed, 2);
        assert_eq!(state.supplies.food, 0);
        assert_eq!(state.date.day, 3);
    }
}
