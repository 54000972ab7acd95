//! Player actions outside the daily turn. Each takes the current snapshot
//! and returns the next one.
use log::debug;
use serde::Serialize;

use crate::calendar::DateState;
use crate::constants::{
    MAX_OXEN, MAX_WAGON_CONDITION, MIN_OXEN, REST_HEALTH_BONUS, WAIT_DEFAULT_DAYS,
};
use crate::crossings::{self, RiverMethod, RiverResult, WaitResult};
use crate::difficulty::Difficulty;
use crate::events::{EventResult, GameEvent, apply_event_choice};
use crate::hunt::{self, HuntingResult};
use crate::journey::{idle_screen, spend_idle_days, terminal_screen};
use crate::pacing::{Pace, Rations};
use crate::party::{MemberId, Party};
use crate::rng::RandomSource;
use crate::state::{GameData, GameScreen};
use crate::store::{self, StoreItem};

/// Fresh Normal-difficulty game on the title screen.
#[must_use]
pub fn create_game() -> GameData {
    GameData::default()
}

#[must_use]
pub fn create_game_with(difficulty: Difficulty) -> GameData {
    GameData::new(difficulty)
}

/// Form the party and head to the outfitting store. `start_month` replaces
/// the default April departure when it names a real month.
#[must_use]
pub fn start_game<S: AsRef<str>>(
    state: &GameData,
    names: &[S],
    start_month: Option<u8>,
) -> GameData {
    let mut next = state.clone();
    next.party = Party::from_names(names, &mut next.member_ids);
    if let Some(month) = start_month {
        next.date = DateState::start_of(month);
    }
    next.days_elapsed = 0;
    next.screen = GameScreen::Store;
    next.messages =
        vec!["Welcome to the trail! Stock up on supplies before you leave.".to_string()];
    next
}

#[must_use]
pub fn begin_travel(state: &GameData) -> GameData {
    GameData {
        screen: GameScreen::Traveling,
        messages: vec!["You set out on the trail.".to_string()],
        ..state.clone()
    }
}

/// Resolve the pending event with `choice`. Without a pending event the
/// state is returned unchanged.
pub fn handle_event<R: RandomSource>(state: &GameData, choice: u8, rng: &mut R) -> GameData {
    let Some(event) = &state.current_event else {
        return state.clone();
    };
    let result = apply_event_choice(event, choice, &state.party, &state.supplies, rng);
    apply_event_result(state, &result)
}

/// Commit a resolved event: health, supplies, and lost days.
#[must_use]
pub fn apply_event_result(state: &GameData, result: &EventResult) -> GameData {
    let mut next = state.clone();
    next.messages.push(result.message.clone());

    for (member, delta) in &result.health_changes {
        if next.party.update_health(*member, *delta)
            && let Some(dead) = next.party.member(*member)
        {
            next.messages.push(format!("{} has died.", dead.name));
        }
    }
    next.supplies.apply_delta(&result.supply_change);
    spend_idle_days(&mut next, result.days_lost);

    debug!(
        "event {:?} resolved: {} days lost",
        state.current_event.as_ref().map(|event| event.kind),
        result.days_lost
    );
    next.current_event = None;
    next.screen = idle_screen(&next);
    next
}

/// What a crossing attempt produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RiverOutcome {
    Attempt(RiverResult),
    Waited(WaitResult),
}

impl RiverOutcome {
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Attempt(result) => &result.message,
            Self::Waited(result) => &result.message,
        }
    }
}

fn river_difficulty(state: &GameData) -> Option<u8> {
    state.pending_crossing.or_else(|| {
        state
            .current_location()
            .filter(|location| location.is_river())
            .and_then(|location| location.river_difficulty)
    })
}

/// Attempt the river with `method`. Returns the unchanged state and `None`
/// away from a river.
pub fn handle_river<R: RandomSource>(
    state: &GameData,
    method: RiverMethod,
    rng: &mut R,
) -> (GameData, Option<RiverOutcome>) {
    let Some(difficulty) = river_difficulty(state) else {
        return (state.clone(), None);
    };

    let outcome = match method {
        RiverMethod::Wait => RiverOutcome::Waited(crossings::wait(difficulty, WAIT_DEFAULT_DAYS)),
        RiverMethod::Ford => RiverOutcome::Attempt(crossings::ford(
            difficulty,
            &state.supplies,
            &state.party,
            rng,
        )),
        RiverMethod::Caulk => RiverOutcome::Attempt(crossings::caulk_and_float(
            difficulty,
            &state.supplies,
            &state.party,
            rng,
        )),
        RiverMethod::Ferry => {
            RiverOutcome::Attempt(crossings::take_ferry(difficulty, state.supplies.money))
        }
    };

    let next = match &outcome {
        RiverOutcome::Attempt(result) => apply_river_result(state, result),
        RiverOutcome::Waited(result) => apply_wait_result(state, result),
    };
    (next, Some(outcome))
}

/// Commit a crossing attempt. Success clears the pending crossing; failure
/// keeps the party at the river.
#[must_use]
pub fn apply_river_result(state: &GameData, result: &RiverResult) -> GameData {
    let mut next = state.clone();
    next.messages.push(result.message.clone());
    next.supplies.apply_loss(&result.supplies_lost);

    for member in &result.members_lost {
        if next.party.mark_dead(*member)
            && let Some(drowned) = next.party.member(*member)
        {
            next.messages.push(format!("{} drowned in the crossing.", drowned.name));
        }
    }

    debug!(
        "{} crossing: success={} severity={:?} lost={}",
        result.method,
        result.success,
        result.severity,
        result.members_lost.len()
    );
    if result.success {
        next.pending_crossing = None;
    } else if next.pending_crossing.is_none() {
        next.pending_crossing = river_difficulty(state);
    }
    next.screen = terminal_screen(&next).unwrap_or(if result.success {
        GameScreen::Traveling
    } else {
        GameScreen::River
    });
    next
}

fn apply_wait_result(state: &GameData, result: &WaitResult) -> GameData {
    let mut next = state.clone();
    spend_idle_days(&mut next, u32::from(result.days_lost));
    next.pending_crossing = Some(result.new_difficulty);
    next.messages.push(result.message.clone());
    next.screen = terminal_screen(&next).unwrap_or(GameScreen::River);
    next
}

/// Spend a day hunting with `ammo_to_use` rounds.
pub fn handle_hunting<R: RandomSource>(
    state: &GameData,
    ammo_to_use: u32,
    rng: &mut R,
) -> (GameData, HuntingResult) {
    let result = hunt::hunt(ammo_to_use, state.supplies.ammunition, rng);
    (apply_hunting_result(state, &result), result)
}

/// Commit a hunt. The trip costs a day and the day's food whatever it brings
/// back. A party waiting at a river is still waiting afterwards.
#[must_use]
pub fn apply_hunting_result(state: &GameData, result: &HuntingResult) -> GameData {
    let mut next = state.clone();
    if !next.supplies.use_ammo(result.ammo_used) {
        next.supplies.ammunition = 0;
    }
    next.supplies.food = next.supplies.food.saturating_add(result.food_gained);
    spend_idle_days(&mut next, 1);
    next.messages.push(result.message.clone());
    debug!(
        "hunt {:?}: {} rounds for {} lbs",
        result.outcome, result.ammo_used, result.food_gained
    );
    next.screen = idle_screen(&next);
    next
}

/// Rest one day. Heals every living member by the base amount plus the
/// difficulty bonus.
#[must_use]
pub fn rest(state: &GameData) -> GameData {
    let mut next = state.clone();
    let heal = REST_HEALTH_BONUS + state.settings.health_regen_bonus;
    next.party.update_health_all(heal);
    spend_idle_days(&mut next, 1);
    next.messages.push("The party rests and recovers.".to_string());
    next
}

/// Spend a dose of medicine curing a sick member.
#[must_use]
pub fn use_medicine_on_member(state: &GameData, member: MemberId) -> GameData {
    if state.supplies.medicine == 0 {
        return add_message(state, "No medicine available.");
    }
    let mut next = state.clone();
    let Some(name) = next
        .party
        .member(member)
        .filter(|m| m.is_alive())
        .map(|m| m.name.clone())
    else {
        return next;
    };
    if next.party.heal_member(member) && next.supplies.use_medicine() {
        next.messages.push(format!("{name} has been treated and is recovering."));
        return next;
    }
    state.clone()
}

/// Patch the wagon with a spare part.
#[must_use]
pub fn repair_wagon(state: &GameData) -> GameData {
    if state.supplies.spare_parts == 0 {
        return add_message(state, "No spare parts available.");
    }
    if state.wagon.condition >= MAX_WAGON_CONDITION {
        return add_message(state, "Wagon is already in good condition.");
    }
    let mut next = state.clone();
    next.supplies.use_parts();
    let restored = next.wagon.repair(false);
    next.messages.push(format!("Wagon has been repaired (+{restored} condition)."));
    next
}

#[must_use]
pub fn set_pace(state: &GameData, pace: Pace) -> GameData {
    GameData {
        pace,
        ..state.clone()
    }
}

#[must_use]
pub fn set_rations(state: &GameData, rations: Rations) -> GameData {
    GameData {
        rations,
        ..state.clone()
    }
}

/// Open the store, if the current stop has one.
#[must_use]
pub fn visit_store(state: &GameData) -> GameData {
    if state.current_location().is_some_and(|location| location.has_store) {
        return set_screen(state, GameScreen::Store);
    }
    add_message(state, "There is no store here.")
}

/// Buy `quantity` of `item`. Oxen go straight onto the wagon's team.
#[must_use]
pub fn purchase(state: &GameData, item: StoreItem, quantity: u32) -> GameData {
    if item == StoreItem::Oxen && state.wagon.oxen.saturating_add(quantity) > MAX_OXEN {
        return add_message(state, &format!("Your wagon can only be pulled by {MAX_OXEN} oxen."));
    }
    let receipt = store::buy(item, quantity, state.supplies.money);
    let mut next = add_message(state, &receipt.message);
    if !receipt.success {
        return next;
    }
    next.supplies = store::apply_purchase(&state.supplies, item, quantity);
    if item == StoreItem::Oxen {
        next.wagon.oxen += quantity;
    }
    next
}

/// Sell `quantity` of `item`. At least one ox always stays with the wagon.
#[must_use]
pub fn sell(state: &GameData, item: StoreItem, quantity: u32) -> GameData {
    let on_hand = match item {
        StoreItem::Oxen => state.wagon.oxen.saturating_sub(MIN_OXEN),
        _ => store::units_on_hand(&state.supplies, item, state.wagon.oxen),
    };
    let receipt = store::sell(item, quantity, on_hand);
    let mut next = add_message(state, &receipt.message);
    if !receipt.success {
        return next;
    }
    next.supplies = store::apply_sale(&state.supplies, item, quantity);
    if item == StoreItem::Oxen {
        next.wagon.oxen -= quantity;
    }
    next
}

#[must_use]
pub fn set_screen(state: &GameData, screen: GameScreen) -> GameData {
    GameData {
        screen,
        ..state.clone()
    }
}

#[must_use]
pub fn set_current_event(state: &GameData, event: Option<GameEvent>) -> GameData {
    GameData {
        current_event: event,
        ..state.clone()
    }
}

#[must_use]
pub fn clear_messages(state: &GameData) -> GameData {
    GameData {
        messages: Vec::new(),
        ..state.clone()
    }
}

#[must_use]
pub fn add_message(state: &GameData, message: &str) -> GameData {
    let mut next = state.clone();
    next.messages.push(message.to_string());
    next
}
