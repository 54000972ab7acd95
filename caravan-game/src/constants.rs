//! Centralized balance and tuning constants for the Caravan simulation.
//!
//! These values define the deterministic math for the core simulation.
//! Keeping them together ensures that gameplay can only be adjusted via
//! code changes reviewed in version control.

// Journey ------------------------------------------------------------------
pub const STARTING_MONTH: u8 = 4;
pub const STARTING_YEAR: u16 = 1848;

// Starting resources -------------------------------------------------------
pub const STARTING_MONEY: f64 = 400.0;
pub const STARTING_FOOD: u32 = 200;
pub const STARTING_AMMO: u32 = 100;
pub const STARTING_MEDICINE: u32 = 5;
pub const STARTING_PARTS: u32 = 2;
pub const STARTING_OXEN: u32 = 2;

// Health -------------------------------------------------------------------
pub const MAX_HEALTH: i32 = 100;
pub const STARTING_HEALTH: i32 = 100;

// Wagon --------------------------------------------------------------------
pub const MAX_WAGON_CONDITION: i32 = 100;
pub const WAGON_REPAIR_AMOUNT: i32 = 25;
pub const MAX_OXEN: u32 = 4;
pub const MIN_OXEN: u32 = 1;
pub const OXEN_SPEED_MOD: f64 = 0.15;
pub(crate) const WAGON_DAMAGED_THRESHOLD: i32 = 50;
pub(crate) const WAGON_DAMAGED_SPEED_FACTOR: f64 = 0.75;
pub(crate) const WAGON_BROKEN_SPEED_FACTOR: f64 = 0.5;

// Pace (miles per day) -----------------------------------------------------
pub const PACE_SPEED_STEADY: i32 = 15;
pub const PACE_SPEED_STRENUOUS: i32 = 20;
pub const PACE_SPEED_GRUELING: i32 = 25;

// Weekly health effects ----------------------------------------------------
pub const PACE_HEALTH_STEADY: i32 = 0;
pub const PACE_HEALTH_STRENUOUS: i32 = -5;
pub const PACE_HEALTH_GRUELING: i32 = -10;
pub const RATION_HEALTH_BARE: i32 = -10;
pub const RATION_HEALTH_MEAGER: i32 = -2;
pub const RATION_HEALTH_FILLING: i32 = 5;
pub const DAYS_PER_WEEK: u32 = 7;

// Rations (lbs per person per day) -----------------------------------------
pub const RATION_LBS_BARE: u32 = 1;
pub const RATION_LBS_MEAGER: u32 = 2;
pub const RATION_LBS_FILLING: u32 = 3;

// Daily damage -------------------------------------------------------------
pub const STARVATION_DAMAGE: i32 = 20;
pub const SICKNESS_DAMAGE: i32 = 5;
pub const INJURY_DAMAGE: i32 = 3;

// Sickness -----------------------------------------------------------------
pub const SICKNESS_MIN_DAYS: u32 = 3;
pub const SICKNESS_MAX_DAYS: u32 = 7;
pub const SICKNESS_SPREAD_CHANCE: f64 = 0.2;

// Rest ---------------------------------------------------------------------
pub const REST_HEALTH_BONUS: i32 = 10;

// Weather modifiers --------------------------------------------------------
/// Sentinel travel modifier meaning "no travel today".
pub const WEATHER_TRAVEL_BLOCKED: i32 = -999;

// Store prices -------------------------------------------------------------
pub const PRICE_FOOD_PER_LB: f64 = 0.2;
pub const PRICE_AMMO_PER_BOX: f64 = 2.0;
pub const PRICE_MEDICINE_PER_DOSE: f64 = 5.0;
pub const PRICE_PARTS_PER_SET: f64 = 10.0;
pub const PRICE_OX: f64 = 40.0;
pub const ROUNDS_PER_BOX: u32 = 20;
pub const SELL_PRICE_RATIO: f64 = 0.5;

// Supply valuation ---------------------------------------------------------
pub(crate) const VALUE_FOOD_PER_LB: f64 = 0.2;
pub(crate) const VALUE_AMMO_PER_ROUND: f64 = 0.1;
pub(crate) const VALUE_MEDICINE_PER_DOSE: f64 = 5.0;
pub(crate) const VALUE_PARTS_PER_SET: f64 = 10.0;

// Hunting ------------------------------------------------------------------
pub const HUNTING_BASE_SUCCESS: f64 = 0.3;
pub const HUNTING_AMMO_BONUS: f64 = 0.02;
pub const HUNTING_AMMO_BONUS_CAP: u32 = 20;
/// Absolute success ceiling. The ammo bonus cap keeps the chance at 0.7.
pub const HUNTING_MAX_SUCCESS: f64 = 0.9;
pub const HUNTING_MIN_FOOD: u32 = 10;
pub const HUNTING_MAX_FOOD: u32 = 100;
pub(crate) const HUNTING_EXCELLENT_FOOD: u32 = 80;
pub(crate) const HUNTING_GOOD_FOOD: u32 = 50;
pub(crate) const HUNTING_RECOMMENDED_MIN: u32 = 5;
pub(crate) const HUNTING_RECOMMENDED_MAX: u32 = 20;

// River crossing -----------------------------------------------------------
pub const FORD_BASE_RISK: f64 = 0.1;
pub const CAULK_BASE_RISK: f64 = 0.05;
pub const FERRY_COST_PER_DIFFICULTY: u32 = 5;
pub const FERRY_MAX_COST: u32 = 20;
pub const WAIT_DIFFICULTY_REDUCTION: u8 = 1;
pub const WAIT_DEFAULT_DAYS: u8 = 3;
pub const MIN_RIVER_DIFFICULTY: u8 = 1;
pub const MAX_RIVER_DIFFICULTY: u8 = 5;
pub(crate) const LOSS_FRACTION_MINOR: f64 = 0.1;
pub(crate) const LOSS_FRACTION_MAJOR: f64 = 0.25;
pub(crate) const LOSS_FRACTION_CATASTROPHIC: f64 = 0.5;
pub(crate) const DROWNING_CHANCE: f64 = 0.5;

// Events -------------------------------------------------------------------
pub const EVENT_CHANCE_ILLNESS: f64 = 0.05;
pub const EVENT_CHANCE_INJURY: f64 = 0.03;
pub const EVENT_CHANCE_WEATHER: f64 = 0.10;
pub const EVENT_CHANCE_BREAKDOWN: f64 = 0.05;
pub const EVENT_CHANCE_THEFT: f64 = 0.02;
pub const EVENT_CHANCE_DISCOVERY: f64 = 0.03;
pub const EVENT_CHANCE_ANIMAL: f64 = 0.05;
pub(crate) const ILLNESS_UNTREATED_DAMAGE: i32 = -20;
pub(crate) const ILLNESS_UNTREATED_DAYS: u32 = 2;
pub(crate) const INJURY_UNTREATED_DAMAGE: i32 = -15;
pub(crate) const INJURY_UNTREATED_DAYS: u32 = 1;
pub(crate) const MAKESHIFT_FIX_DAYS: u32 = 1;
pub(crate) const DISCOVERY_HEALTH_BOOST: i32 = 10;
pub(crate) const ANIMAL_OX_LOSS_CHANCE: f64 = 0.3;
pub(crate) const ANIMAL_DELAY_CHANCE: f64 = 0.5;

// Scoring ------------------------------------------------------------------
pub const SCORE_ARRIVAL_BONUS: u32 = 1000;
pub const SCORE_PER_SURVIVOR: u32 = 200;
pub const SCORE_TIME_TARGET_DAYS: u32 = 180;
pub const SCORE_PER_DAY_SAVED: u32 = 5;
pub const LEADERBOARD_MAX_ENTRIES: usize = 10;

// Calendar -----------------------------------------------------------------
pub const DAYS_PER_MONTH: [u8; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];
