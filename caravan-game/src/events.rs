//! Random trail events: selection, generation, and choice resolution.
use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};
use std::collections::BTreeMap;
use std::fmt;

use crate::constants::{
    ANIMAL_DELAY_CHANCE, ANIMAL_OX_LOSS_CHANCE, DISCOVERY_HEALTH_BOOST, EVENT_CHANCE_ANIMAL,
    EVENT_CHANCE_BREAKDOWN, EVENT_CHANCE_DISCOVERY, EVENT_CHANCE_ILLNESS, EVENT_CHANCE_INJURY,
    EVENT_CHANCE_THEFT, EVENT_CHANCE_WEATHER, ILLNESS_UNTREATED_DAMAGE, ILLNESS_UNTREATED_DAYS,
    INJURY_UNTREATED_DAMAGE, INJURY_UNTREATED_DAYS, MAKESHIFT_FIX_DAYS,
};
use crate::party::{MemberId, Party};
use crate::rng::{RandomSource, pick, uniform_u32};
use crate::supplies::{Supplies, SupplyDelta};

pub type EventId = u64;

/// Choice id for the "spend a resource" option, and for acknowledging
/// single-choice events.
pub const CHOICE_PRIMARY: u8 = 0;
/// Choice id for declining to spend a resource.
pub const CHOICE_SECONDARY: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Illness,
    Injury,
    Weather,
    Breakdown,
    Theft,
    Discovery,
    Animal,
}

impl EventKind {
    /// Roll order; the cumulative walk depends on it.
    pub const ALL: [Self; 7] = [
        Self::Illness,
        Self::Injury,
        Self::Weather,
        Self::Breakdown,
        Self::Theft,
        Self::Discovery,
        Self::Animal,
    ];

    /// Unscaled per-day probability.
    #[must_use]
    pub const fn base_chance(self) -> f64 {
        match self {
            Self::Illness => EVENT_CHANCE_ILLNESS,
            Self::Injury => EVENT_CHANCE_INJURY,
            Self::Weather => EVENT_CHANCE_WEATHER,
            Self::Breakdown => EVENT_CHANCE_BREAKDOWN,
            Self::Theft => EVENT_CHANCE_THEFT,
            Self::Discovery => EVENT_CHANCE_DISCOVERY,
            Self::Animal => EVENT_CHANCE_ANIMAL,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Illness => "illness",
            Self::Injury => "injury",
            Self::Weather => "weather",
            Self::Breakdown => "breakdown",
            Self::Theft => "theft",
            Self::Discovery => "discovery",
            Self::Animal => "animal",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Monotonic event id allocator owned by the game state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventIds {
    next: EventId,
}

impl EventIds {
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 0 }
    }

    pub const fn allocate(&mut self) -> EventId {
        let id = self.next;
        self.next += 1;
        id
    }

    #[must_use]
    pub const fn peek(&self) -> EventId {
        self.next
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventChoice {
    pub id: u8,
    pub text: String,
}

impl EventChoice {
    fn new(id: u8, text: &str) -> Self {
        Self {
            id,
            text: text.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    pub id: EventId,
    pub kind: EventKind,
    pub title: String,
    pub description: String,
    pub choices: SmallVec<[EventChoice; 2]>,
    /// Member singled out by illness and injury events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<MemberId>,
}

impl GameEvent {
    #[must_use]
    pub fn has_choice(&self, choice: u8) -> bool {
        self.choices.iter().any(|c| c.id == choice)
    }
}

/// Outcome of a resolved choice: a health delta per member, a supply change,
/// and days lost. Every field other than the message is a sparse change;
/// absent or zero means untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventResult {
    pub message: String,
    #[serde(default)]
    pub health_changes: BTreeMap<MemberId, i32>,
    #[serde(default)]
    pub supply_change: SupplyDelta,
    #[serde(default)]
    pub days_lost: u32,
}

impl EventResult {
    fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }
}

/// One weighted draw over all event kinds, each chance scaled by
/// `multiplier`. Most days return `None`.
pub fn roll_for_event(multiplier: f64, rng: &mut impl RandomSource) -> Option<EventKind> {
    let roll = rng.next_f64();
    let mut cumulative = 0.0;
    for kind in EventKind::ALL {
        cumulative += kind.base_chance() * multiplier;
        if roll < cumulative {
            return Some(kind);
        }
    }
    None
}

const ILLNESSES: [&str; 4] = ["cholera", "dysentery", "typhoid", "measles"];
const INJURIES: [&str; 4] = ["broken arm", "sprained ankle", "deep cut", "snake bite"];
const BROKEN_PARTS: [&str; 4] = ["wagon wheel", "axle", "tongue", "canvas cover"];
const WEATHER_EVENTS: [(&str, &str); 3] = [
    ("Sudden Storm", "A violent storm has damaged your supplies!"),
    ("Flash Flood", "Rising waters have swept away some of your food!"),
    ("Heavy Winds", "Strong winds have scattered some supplies!"),
];
const DISCOVERIES: [(&str, &str); 4] = [
    ("Abandoned Wagon", "You found an abandoned wagon with supplies!"),
    ("Wild Fruit", "You discovered a patch of wild berries!"),
    ("Helpful Traveler", "A friendly traveler shares some supplies!"),
    (
        "Fresh Spring",
        "You found a fresh water spring - everyone feels refreshed!",
    ),
];
const ANIMAL_EVENTS: [(&str, &str); 3] = [
    ("Buffalo Stampede", "A herd of buffalo nearly tramples the wagon!"),
    ("Wild Animals", "Wolves were spotted near camp last night!"),
    ("Ox Problem", "One of your oxen has wandered off!"),
];

/// Build a fresh event of `kind` with flavor text and its choice set.
pub fn generate_event(
    kind: EventKind,
    party: &Party,
    ids: &mut EventIds,
    rng: &mut impl RandomSource,
) -> GameEvent {
    let id = ids.allocate();
    match kind {
        EventKind::Illness => {
            let target = party.random_alive(rng);
            let illness = pick(rng, &ILLNESSES).copied().unwrap_or(ILLNESSES[0]);
            GameEvent {
                id,
                kind,
                title: "Illness Strikes".to_string(),
                description: format!("{} has come down with {illness}!", target_name(party, target)),
                choices: smallvec![
                    EventChoice::new(CHOICE_PRIMARY, "Use medicine to treat"),
                    EventChoice::new(CHOICE_SECONDARY, "Rest and hope for the best"),
                ],
                target,
            }
        }
        EventKind::Injury => {
            let target = party.random_alive(rng);
            let injury = pick(rng, &INJURIES).copied().unwrap_or(INJURIES[0]);
            GameEvent {
                id,
                kind,
                title: "Injury".to_string(),
                description: format!("{} suffered a {injury}!", target_name(party, target)),
                choices: smallvec![
                    EventChoice::new(CHOICE_PRIMARY, "Use medicine to treat"),
                    EventChoice::new(CHOICE_SECONDARY, "Bandage it and continue"),
                ],
                target,
            }
        }
        EventKind::Breakdown => {
            let part = pick(rng, &BROKEN_PARTS).copied().unwrap_or(BROKEN_PARTS[0]);
            GameEvent {
                id,
                kind,
                title: "Wagon Trouble".to_string(),
                description: format!("The {part} has broken!"),
                choices: smallvec![
                    EventChoice::new(CHOICE_PRIMARY, "Use spare parts to repair"),
                    EventChoice::new(CHOICE_SECONDARY, "Try a makeshift fix"),
                ],
                target: None,
            }
        }
        EventKind::Theft => acknowledge(
            id,
            kind,
            ("Thieves in the Night", "Someone has raided your supplies while you slept!"),
            "Accept the loss",
        ),
        EventKind::Weather => {
            let flavor = pick(rng, &WEATHER_EVENTS).copied().unwrap_or(WEATHER_EVENTS[0]);
            acknowledge(id, kind, flavor, "Salvage what you can")
        }
        EventKind::Discovery => {
            let flavor = pick(rng, &DISCOVERIES).copied().unwrap_or(DISCOVERIES[0]);
            acknowledge(id, kind, flavor, "Continue on")
        }
        EventKind::Animal => {
            let flavor = pick(rng, &ANIMAL_EVENTS).copied().unwrap_or(ANIMAL_EVENTS[0]);
            acknowledge(id, kind, flavor, "Handle the situation")
        }
    }
}

fn acknowledge(id: EventId, kind: EventKind, flavor: (&str, &str), choice: &str) -> GameEvent {
    let (title, description) = flavor;
    GameEvent {
        id,
        kind,
        title: title.to_string(),
        description: description.to_string(),
        choices: smallvec![EventChoice::new(CHOICE_PRIMARY, choice)],
        target: None,
    }
}

fn target_name(party: &Party, target: Option<MemberId>) -> String {
    target
        .and_then(|id| party.member(id))
        .map_or_else(|| "A party member".to_string(), |m| m.name.clone())
}

/// Resolve `choice` for `event` against the current party and supplies.
///
/// Treating with a resource (choice 0 with the resource on hand) costs one
/// unit and nothing else. Any other path for illness, injury, or breakdown
/// pays in health or days instead. Member status and wagon condition are
/// never touched. Weather, theft, discovery, and animal events ignore the
/// choice.
pub fn apply_event_choice(
    event: &GameEvent,
    choice: u8,
    party: &Party,
    supplies: &Supplies,
    rng: &mut impl RandomSource,
) -> EventResult {
    match event.kind {
        EventKind::Illness => {
            if choice == CHOICE_PRIMARY && supplies.medicine > 0 {
                return EventResult {
                    supply_change: SupplyDelta::default().with_medicine(-1),
                    ..EventResult::message("The medicine helped! The patient is recovering.")
                };
            }
            untreated(
                "Without medicine, the illness takes its toll.",
                ILLNESS_UNTREATED_DAMAGE,
                ILLNESS_UNTREATED_DAYS,
                party,
                rng,
            )
        }
        EventKind::Injury => {
            if choice == CHOICE_PRIMARY && supplies.medicine > 0 {
                return EventResult {
                    supply_change: SupplyDelta::default().with_medicine(-1),
                    ..EventResult::message("The wound is treated properly.")
                };
            }
            untreated(
                "The injury will slow recovery.",
                INJURY_UNTREATED_DAMAGE,
                INJURY_UNTREATED_DAYS,
                party,
                rng,
            )
        }
        EventKind::Breakdown => {
            if choice == CHOICE_PRIMARY && supplies.spare_parts > 0 {
                return EventResult {
                    supply_change: SupplyDelta::default().with_spare_parts(-1),
                    ..EventResult::message("You used spare parts to fix the wagon.")
                };
            }
            EventResult {
                days_lost: MAKESHIFT_FIX_DAYS,
                ..EventResult::message("Your makeshift fix holds, but the wagon is weakened.")
            }
        }
        EventKind::Weather => {
            let food_loss = uniform_u32(rng, 10, 30);
            EventResult {
                supply_change: SupplyDelta::food(-i64::from(food_loss)),
                ..EventResult::message(format!("You lost {food_loss} lbs of food to the weather."))
            }
        }
        EventKind::Theft => {
            let food_loss = uniform_u32(rng, 20, 40);
            let ammo_loss = uniform_u32(rng, 5, 20);
            EventResult {
                supply_change: SupplyDelta::food(-i64::from(food_loss))
                    .with_ammunition(-i64::from(ammo_loss)),
                ..EventResult::message(format!(
                    "Thieves stole {food_loss} lbs of food and {ammo_loss} rounds of ammunition."
                ))
            }
        }
        EventKind::Discovery => discovery(party, rng),
        EventKind::Animal => {
            if rng.next_f64() < ANIMAL_OX_LOSS_CHANCE {
                // Flavor only: the team is not reduced.
                return EventResult::message("You lost an ox to the wildlife.");
            }
            let days_lost = u32::from(rng.next_f64() < ANIMAL_DELAY_CHANCE);
            EventResult {
                days_lost,
                ..EventResult::message("The situation was handled without major incident.")
            }
        }
    }
}

fn untreated(
    message: &str,
    damage: i32,
    days_lost: u32,
    party: &Party,
    rng: &mut impl RandomSource,
) -> EventResult {
    let mut health_changes = BTreeMap::new();
    if let Some(victim) = party.random_alive(rng) {
        health_changes.insert(victim, damage);
    }
    EventResult {
        health_changes,
        days_lost,
        ..EventResult::message(message)
    }
}

fn discovery(party: &Party, rng: &mut impl RandomSource) -> EventResult {
    let roll = rng.next_f64();
    if roll < 0.5 {
        let food = uniform_u32(rng, 10, 30);
        return EventResult {
            supply_change: SupplyDelta::food(i64::from(food)),
            ..EventResult::message(format!("You found {food} lbs of food!"))
        };
    }
    if roll < 0.8 {
        let health_changes = party
            .alive()
            .map(|member| (member.id, DISCOVERY_HEALTH_BOOST))
            .collect();
        return EventResult {
            health_changes,
            ..EventResult::message("Everyone feels refreshed!")
        };
    }
    let money = uniform_u32(rng, 10, 30);
    EventResult {
        supply_change: SupplyDelta::money(f64::from(money)),
        ..EventResult::message(format!("You found ${money}!"))
    }
}
