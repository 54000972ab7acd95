//! Random sources threaded through every probabilistic rule.
//!
//! Lower-level systems never reach for a global RNG: each probabilistic
//! function takes an explicit [`RandomSource`]. Sessions own an
//! [`RngBundle`] of deterministic, domain-separated streams and decide which
//! stream feeds which entry point.
use hmac::{Hmac, Mac};
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
use sha2::Sha256;
use std::cell::{RefCell, RefMut};
use std::collections::VecDeque;

use crate::numbers::{floor_f64_to_u32, usize_to_f64};

/// Uniform `[0, 1)` draw provider.
pub trait RandomSource {
    /// Next uniform value in `[0, 1)`.
    fn next_f64(&mut self) -> f64;
}

impl<R: RngCore> RandomSource for R {
    fn next_f64(&mut self) -> f64 {
        self.r#gen::<f64>()
    }
}

/// Source that always returns the same roll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedRoll(pub f64);

impl RandomSource for FixedRoll {
    fn next_f64(&mut self) -> f64 {
        self.0
    }
}

/// Source that replays a script of rolls, then repeats a fallback value.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptedRolls {
    rolls: VecDeque<f64>,
    fallback: f64,
    draws: u64,
}

impl ScriptedRolls {
    #[must_use]
    pub fn new(rolls: impl IntoIterator<Item = f64>, fallback: f64) -> Self {
        Self {
            rolls: rolls.into_iter().collect(),
            fallback,
            draws: 0,
        }
    }

    /// Number of values handed out so far.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }

    /// Scripted values not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.rolls.len()
    }
}

impl RandomSource for ScriptedRolls {
    fn next_f64(&mut self) -> f64 {
        self.draws = self.draws.saturating_add(1);
        self.rolls.pop_front().unwrap_or(self.fallback)
    }
}

/// Pick a uniform index in `0..len`, or `None` for an empty slice.
pub fn pick_index(rng: &mut impl RandomSource, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let scaled = floor_f64_to_u32(rng.next_f64() * usize_to_f64(len));
    let index = usize::try_from(scaled).unwrap_or(usize::MAX);
    Some(index.min(len - 1))
}

/// Pick a uniform element from a slice.
pub fn pick<'a, T>(rng: &mut impl RandomSource, items: &'a [T]) -> Option<&'a T> {
    pick_index(rng, items.len()).and_then(|index| items.get(index))
}

/// `min + floor(roll * span)`, the uniform integer draw in `[min, min + span)`.
pub fn uniform_u32(rng: &mut impl RandomSource, min: u32, span: u32) -> u32 {
    min.saturating_add(floor_f64_to_u32(rng.next_f64() * f64::from(span)))
}

/// Deterministic bundle of RNG streams segregated by simulation domain.
#[derive(Debug, Clone)]
pub struct RngBundle {
    travel: RefCell<CountingRng<SmallRng>>,
    encounter: RefCell<CountingRng<SmallRng>>,
    crossing: RefCell<CountingRng<SmallRng>>,
    hunt: RefCell<CountingRng<SmallRng>>,
}

impl RngBundle {
    /// Construct the bundle from a user-visible seed.
    #[must_use]
    pub fn from_user_seed(seed: u64) -> Self {
        Self {
            travel: RefCell::new(CountingRng::new(derive_stream_seed(seed, b"travel"))),
            encounter: RefCell::new(CountingRng::new(derive_stream_seed(seed, b"encounter"))),
            crossing: RefCell::new(CountingRng::new(derive_stream_seed(seed, b"crossing"))),
            hunt: RefCell::new(CountingRng::new(derive_stream_seed(seed, b"hunt"))),
        }
    }

    /// Stream for daily turns: weather, health progression, event rolls.
    #[must_use]
    pub fn travel(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.travel.borrow_mut()
    }

    /// Stream for resolving event choices.
    #[must_use]
    pub fn encounter(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.encounter.borrow_mut()
    }

    /// Stream for river crossings.
    #[must_use]
    pub fn crossing(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.crossing.borrow_mut()
    }

    /// Stream for hunting trips.
    #[must_use]
    pub fn hunt(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.hunt.borrow_mut()
    }

    /// Total draws across every stream.
    #[must_use]
    pub fn total_draws(&self) -> u64 {
        [
            self.travel.borrow().draws(),
            self.encounter.borrow().draws(),
            self.crossing.borrow().draws(),
            self.hunt.borrow().draws(),
        ]
        .iter()
        .fold(0_u64, |acc, draws| acc.saturating_add(*draws))
    }
}

/// Counting wrapper for RNG streams providing instrumentation.
#[derive(Debug, Clone)]
pub struct CountingRng<R> {
    rng: R,
    draws: u64,
}

impl CountingRng<SmallRng> {
    fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            draws: 0,
        }
    }
}

impl<R: RngCore> CountingRng<R> {
    /// Number of draw calls performed against this stream.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }
}

impl<R: RngCore> RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws = self.draws.saturating_add(1);
        self.rng.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.draws = self.draws.saturating_add(1);
        self.rng.try_fill_bytes(dest)
    }
}

fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()) else {
        return user_seed;
    };
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let mut seed_bytes = [0_u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed_bytes)
}
