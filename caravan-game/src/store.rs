//! General store pricing and trades.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{
    PRICE_AMMO_PER_BOX, PRICE_FOOD_PER_LB, PRICE_MEDICINE_PER_DOSE, PRICE_OX, PRICE_PARTS_PER_SET,
    ROUNDS_PER_BOX, SELL_PRICE_RATIO,
};
use crate::numbers::floor_f64_to_u32;
use crate::supplies::Supplies;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreItem {
    Food,
    Ammunition,
    Medicine,
    SpareParts,
    Oxen,
}

impl StoreItem {
    pub const ALL: [Self; 5] = [
        Self::Food,
        Self::Ammunition,
        Self::Medicine,
        Self::SpareParts,
        Self::Oxen,
    ];

    /// Price of one unit: a pound, a box of 20 rounds, a dose, a set, an ox.
    #[must_use]
    pub const fn price(self) -> f64 {
        match self {
            Self::Food => PRICE_FOOD_PER_LB,
            Self::Ammunition => PRICE_AMMO_PER_BOX,
            Self::Medicine => PRICE_MEDICINE_PER_DOSE,
            Self::SpareParts => PRICE_PARTS_PER_SET,
            Self::Oxen => PRICE_OX,
        }
    }

    #[must_use]
    pub const fn unit(self) -> &'static str {
        match self {
            Self::Food => "lb",
            Self::Ammunition => "box (20)",
            Self::Medicine => "dose",
            Self::SpareParts => "set",
            Self::Oxen => "ox",
        }
    }

    #[must_use]
    pub fn sell_price(self) -> f64 {
        self.price() * SELL_PRICE_RATIO
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Ammunition => "ammunition",
            Self::Medicine => "medicine",
            Self::SpareParts => "spare_parts",
            Self::Oxen => "oxen",
        }
    }
}

impl fmt::Display for StoreItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Purchase {
    pub success: bool,
    pub cost: f64,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub success: bool,
    pub revenue: f64,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InventoryLine {
    pub item: StoreItem,
    pub price: f64,
    pub unit: &'static str,
}

#[must_use]
pub fn calculate_cost(item: StoreItem, quantity: u32) -> f64 {
    item.price() * f64::from(quantity)
}

#[must_use]
pub fn can_afford(money: f64, item: StoreItem, quantity: u32) -> bool {
    money >= calculate_cost(item, quantity)
}

fn plural_unit(item: StoreItem, quantity: u32) -> String {
    if quantity > 1 {
        format!("{}s", item.unit())
    } else {
        item.unit().to_string()
    }
}

/// Validate a purchase. Nothing is deducted here.
#[must_use]
pub fn buy(item: StoreItem, quantity: u32, current_money: f64) -> Purchase {
    let cost = calculate_cost(item, quantity);
    if quantity == 0 {
        return Purchase {
            success: false,
            cost: 0.0,
            message: "Invalid quantity.".to_string(),
        };
    }
    if !can_afford(current_money, item, quantity) {
        return Purchase {
            success: false,
            cost: 0.0,
            message: format!("Not enough money. Need ${cost:.2}."),
        };
    }
    Purchase {
        success: true,
        cost,
        message: format!(
            "Purchased {quantity} {} for ${cost:.2}.",
            plural_unit(item, quantity)
        ),
    }
}

/// Validate a sale of `quantity` units out of `current_quantity` on hand.
#[must_use]
pub fn sell(item: StoreItem, quantity: u32, current_quantity: u32) -> Sale {
    if quantity == 0 {
        return Sale {
            success: false,
            revenue: 0.0,
            message: "Invalid quantity.".to_string(),
        };
    }
    if quantity > current_quantity {
        return Sale {
            success: false,
            revenue: 0.0,
            message: format!("You only have {current_quantity} to sell."),
        };
    }
    let revenue = item.sell_price() * f64::from(quantity);
    Sale {
        success: true,
        revenue,
        message: format!(
            "Sold {quantity} {} for ${revenue:.2}.",
            plural_unit(item, quantity)
        ),
    }
}

#[must_use]
pub fn max_purchase(money: f64, item: StoreItem) -> u32 {
    floor_f64_to_u32(money / item.price())
}

/// Units of `item` currently held, counted in store units.
#[must_use]
pub const fn units_on_hand(supplies: &Supplies, item: StoreItem, oxen: u32) -> u32 {
    match item {
        StoreItem::Food => supplies.food,
        StoreItem::Ammunition => supplies.ammunition / ROUNDS_PER_BOX,
        StoreItem::Medicine => supplies.medicine,
        StoreItem::SpareParts => supplies.spare_parts,
        StoreItem::Oxen => oxen,
    }
}

/// Charge for and stock a purchase. Oxen are only charged; the wagon owns
/// the team.
#[must_use]
pub fn apply_purchase(supplies: &Supplies, item: StoreItem, quantity: u32) -> Supplies {
    let mut updated = supplies.clone();
    updated.money = (updated.money - calculate_cost(item, quantity)).max(0.0);
    match item {
        StoreItem::Food => updated.food = updated.food.saturating_add(quantity),
        StoreItem::Ammunition => {
            updated.ammunition = updated
                .ammunition
                .saturating_add(quantity.saturating_mul(ROUNDS_PER_BOX));
        }
        StoreItem::Medicine => updated.medicine = updated.medicine.saturating_add(quantity),
        StoreItem::SpareParts => {
            updated.spare_parts = updated.spare_parts.saturating_add(quantity);
        }
        StoreItem::Oxen => {}
    }
    updated
}

/// Credit and remove a sale. Oxen are only credited.
#[must_use]
pub fn apply_sale(supplies: &Supplies, item: StoreItem, quantity: u32) -> Supplies {
    let mut updated = supplies.clone();
    updated.money += item.sell_price() * f64::from(quantity);
    match item {
        StoreItem::Food => updated.food = updated.food.saturating_sub(quantity),
        StoreItem::Ammunition => {
            updated.ammunition = updated
                .ammunition
                .saturating_sub(quantity.saturating_mul(ROUNDS_PER_BOX));
        }
        StoreItem::Medicine => updated.medicine = updated.medicine.saturating_sub(quantity),
        StoreItem::SpareParts => {
            updated.spare_parts = updated.spare_parts.saturating_sub(quantity);
        }
        StoreItem::Oxen => {}
    }
    updated
}

#[must_use]
pub fn inventory() -> Vec<InventoryLine> {
    StoreItem::ALL
        .iter()
        .map(|item| InventoryLine {
            item: *item,
            price: item.price(),
            unit: item.unit(),
        })
        .collect()
}
