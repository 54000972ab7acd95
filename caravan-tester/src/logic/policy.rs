use std::fmt;

use caravan_game::constants::MAX_OXEN;
use caravan_game::crossings::{CrossingOptions, RiverMethod};
use caravan_game::events::{CHOICE_PRIMARY, CHOICE_SECONDARY, EventKind, GameEvent};
use caravan_game::party::{MemberId, MemberStatus};
use caravan_game::store::{self, StoreItem};
use caravan_game::supplies::daily_food_need;
use caravan_game::{GameData, Pace, Rations, hunt};
use clap::ValueEnum;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::Serialize;

/// Decision returned by a [`PlayerPolicy`] for an event.
#[derive(Debug, Clone)]
pub struct PolicyDecision {
    pub choice: u8,
    pub rationale: Option<String>,
}

impl PolicyDecision {
    #[must_use]
    pub fn new(choice: u8, rationale: impl Into<String>) -> Self {
        Self {
            choice,
            rationale: Some(rationale.into()),
        }
    }
}

/// What the party does with a day on the trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayPlan {
    Travel,
    Rest,
    Hunt { ammo: u32 },
}

/// Housekeeping done before the day's plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upkeep {
    RepairWagon,
    Medicine(MemberId),
}

/// Policy interface for automated play strategies.
pub trait PlayerPolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    /// Pace and rations the party keeps for the whole journey.
    fn settings(&self) -> (Pace, Rations);

    /// Purchases to make at a store stop, in order.
    fn shopping_list(&mut self, state: &GameData) -> Vec<(StoreItem, u32)>;

    /// Select a choice for an active event.
    fn pick_choice(&mut self, state: &GameData, event: &GameEvent) -> PolicyDecision;

    /// Select how to cross the pending river.
    fn pick_crossing(
        &mut self,
        state: &GameData,
        difficulty: u8,
        options: &CrossingOptions,
    ) -> RiverMethod;

    fn upkeep(&mut self, state: &GameData) -> Vec<Upkeep>;

    fn plan_day(&mut self, state: &GameData) -> DayPlan;
}

/// Built-in gameplay strategies for automated runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum GameplayStrategy {
    Cautious,
    Balanced,
    Reckless,
}

impl GameplayStrategy {
    pub const ALL: [Self; 3] = [Self::Cautious, Self::Balanced, Self::Reckless];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Cautious => "Cautious",
            Self::Balanced => "Balanced",
            Self::Reckless => "Reckless",
        }
    }

    #[must_use]
    pub fn create_policy(self, seed: u64) -> Box<dyn PlayerPolicy + Send> {
        match self {
            Self::Cautious => Box::new(CautiousPolicy),
            Self::Balanced => Box::new(BalancedPolicy),
            Self::Reckless => Box::new(RecklessPolicy::new(seed)),
        }
    }
}

impl fmt::Display for GameplayStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-item stock targets, in store units.
#[derive(Debug, Clone, Copy)]
struct StockTargets {
    oxen: u32,
    food: u32,
    ammo_boxes: u32,
    medicine: u32,
    spare_parts: u32,
}

impl StockTargets {
    fn list(self) -> [(StoreItem, u32); 5] {
        [
            (StoreItem::Oxen, self.oxen),
            (StoreItem::Food, self.food),
            (StoreItem::Medicine, self.medicine),
            (StoreItem::SpareParts, self.spare_parts),
            (StoreItem::Ammunition, self.ammo_boxes),
        ]
    }
}

/// Top every item up to its target, in priority order, within the purse.
fn restock(state: &GameData, targets: StockTargets) -> Vec<(StoreItem, u32)> {
    let mut money = state.supplies.money;
    let mut list = Vec::new();
    for (item, target) in targets.list() {
        let on_hand = store::units_on_hand(&state.supplies, item, state.wagon.oxen);
        let wanted = target.saturating_sub(on_hand);
        let quantity = wanted.min(store::max_purchase(money, item));
        if quantity > 0 {
            money -= store::calculate_cost(item, quantity);
            list.push((item, quantity));
        }
    }
    list
}

fn days_of_food(state: &GameData) -> u32 {
    let need = daily_food_need(state.party.alive_count(), state.rations);
    if need == 0 {
        return u32::MAX;
    }
    state.supplies.food / need
}

fn lowest_health(state: &GameData) -> i32 {
    state.party.alive().map(|m| m.health).min().unwrap_or(0)
}

fn resource_for(event: &GameEvent, state: &GameData) -> bool {
    match event.kind {
        EventKind::Illness | EventKind::Injury => state.supplies.medicine > 0,
        EventKind::Breakdown => state.supplies.spare_parts > 0,
        _ => true,
    }
}

fn medicine_for_afflicted(state: &GameData, threshold: i32) -> Vec<Upkeep> {
    let mut doses = state.supplies.medicine;
    let mut care = Vec::new();
    for member in state.party.alive() {
        if doses == 0 {
            break;
        }
        let afflicted = matches!(member.status, MemberStatus::Sick | MemberStatus::Injured);
        if afflicted && member.health < threshold {
            care.push(Upkeep::Medicine(member.id));
            doses -= 1;
        }
    }
    care
}

struct CautiousPolicy;
struct BalancedPolicy;

struct RecklessPolicy {
    rng: ChaCha20Rng,
}

impl RecklessPolicy {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

impl PlayerPolicy for CautiousPolicy {
    fn name(&self) -> &'static str {
        "Cautious"
    }

    fn settings(&self) -> (Pace, Rations) {
        (Pace::Steady, Rations::Filling)
    }

    fn shopping_list(&mut self, state: &GameData) -> Vec<(StoreItem, u32)> {
        restock(
            state,
            StockTargets {
                oxen: 3,
                food: 700,
                ammo_boxes: 6,
                medicine: 8,
                spare_parts: 4,
            },
        )
    }

    fn pick_choice(&mut self, state: &GameData, event: &GameEvent) -> PolicyDecision {
        if resource_for(event, state) {
            PolicyDecision::new(CHOICE_PRIMARY, "spend supplies to stay safe")
        } else {
            PolicyDecision::new(CHOICE_SECONDARY, "nothing left to spend")
        }
    }

    fn pick_crossing(
        &mut self,
        _state: &GameData,
        difficulty: u8,
        options: &CrossingOptions,
    ) -> RiverMethod {
        if options.ferry.available {
            RiverMethod::Ferry
        } else if difficulty > 2 {
            RiverMethod::Wait
        } else if options.caulk.available {
            RiverMethod::Caulk
        } else {
            RiverMethod::Ford
        }
    }

    fn upkeep(&mut self, state: &GameData) -> Vec<Upkeep> {
        let mut care = medicine_for_afflicted(state, 70);
        if state.wagon.condition < 70 && state.supplies.spare_parts > 0 {
            care.push(Upkeep::RepairWagon);
        }
        care
    }

    fn plan_day(&mut self, state: &GameData) -> DayPlan {
        if lowest_health(state) < 40 {
            return DayPlan::Rest;
        }
        let ammo = hunt::recommended_ammo(state.supplies.ammunition);
        if days_of_food(state) < 10 && hunt::can_hunt(state.supplies.ammunition, ammo) {
            return DayPlan::Hunt { ammo };
        }
        DayPlan::Travel
    }
}

impl PlayerPolicy for BalancedPolicy {
    fn name(&self) -> &'static str {
        "Balanced"
    }

    fn settings(&self) -> (Pace, Rations) {
        (Pace::Steady, Rations::Meager)
    }

    fn shopping_list(&mut self, state: &GameData) -> Vec<(StoreItem, u32)> {
        restock(
            state,
            StockTargets {
                oxen: 3,
                food: 450,
                ammo_boxes: 4,
                medicine: 4,
                spare_parts: 2,
            },
        )
    }

    fn pick_choice(&mut self, state: &GameData, event: &GameEvent) -> PolicyDecision {
        let target_health = event
            .target
            .and_then(|id| state.party.member(id))
            .map_or(100, |m| m.health);
        match event.kind {
            EventKind::Illness | EventKind::Injury if target_health > 60 => {
                PolicyDecision::new(CHOICE_SECONDARY, "healthy enough to tough it out")
            }
            _ if resource_for(event, state) => PolicyDecision::new(CHOICE_PRIMARY, "worth it"),
            _ => PolicyDecision::new(CHOICE_SECONDARY, "out of supplies"),
        }
    }

    fn pick_crossing(
        &mut self,
        _state: &GameData,
        difficulty: u8,
        options: &CrossingOptions,
    ) -> RiverMethod {
        match difficulty {
            0..=2 => RiverMethod::Ford,
            3 if options.caulk.available => RiverMethod::Caulk,
            _ if options.ferry.available => RiverMethod::Ferry,
            _ if options.caulk.available => RiverMethod::Caulk,
            _ => RiverMethod::Wait,
        }
    }

    fn upkeep(&mut self, state: &GameData) -> Vec<Upkeep> {
        let mut care = medicine_for_afflicted(state, 45);
        if state.wagon.condition < 40 && state.supplies.spare_parts > 0 {
            care.push(Upkeep::RepairWagon);
        }
        care
    }

    fn plan_day(&mut self, state: &GameData) -> DayPlan {
        if lowest_health(state) < 25 {
            return DayPlan::Rest;
        }
        let ammo = hunt::recommended_ammo(state.supplies.ammunition);
        if days_of_food(state) < 5 && hunt::can_hunt(state.supplies.ammunition, ammo) {
            return DayPlan::Hunt { ammo };
        }
        DayPlan::Travel
    }
}

impl PlayerPolicy for RecklessPolicy {
    fn name(&self) -> &'static str {
        "Reckless"
    }

    fn settings(&self) -> (Pace, Rations) {
        (Pace::Grueling, Rations::Bare)
    }

    fn shopping_list(&mut self, state: &GameData) -> Vec<(StoreItem, u32)> {
        let food = 200 + self.rng.gen_range(0..=300);
        restock(
            state,
            StockTargets {
                oxen: MAX_OXEN,
                food,
                ammo_boxes: 2,
                medicine: 1,
                spare_parts: 1,
            },
        )
    }

    fn pick_choice(&mut self, _state: &GameData, event: &GameEvent) -> PolicyDecision {
        let index = self.rng.gen_range(0..event.choices.len().max(1));
        let choice = event.choices.get(index).map_or(CHOICE_PRIMARY, |c| c.id);
        PolicyDecision::new(choice, "coin flip")
    }

    fn pick_crossing(
        &mut self,
        _state: &GameData,
        _difficulty: u8,
        options: &CrossingOptions,
    ) -> RiverMethod {
        if options.caulk.available && self.rng.gen_bool(0.3) {
            RiverMethod::Caulk
        } else {
            RiverMethod::Ford
        }
    }

    fn upkeep(&mut self, state: &GameData) -> Vec<Upkeep> {
        if state.wagon.is_broken() && state.supplies.spare_parts > 0 {
            vec![Upkeep::RepairWagon]
        } else {
            Vec::new()
        }
    }

    fn plan_day(&mut self, state: &GameData) -> DayPlan {
        let ammo = hunt::recommended_ammo(state.supplies.ammunition);
        if state.supplies.food == 0
            && hunt::can_hunt(state.supplies.ammunition, ammo)
            && self.rng.gen_bool(0.5)
        {
            return DayPlan::Hunt { ammo };
        }
        DayPlan::Travel
    }
}
