//! Party members, their health, and their ailments.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{
    DAYS_PER_WEEK, INJURY_DAMAGE, MAX_HEALTH, SICKNESS_DAMAGE, SICKNESS_MAX_DAYS,
    SICKNESS_MIN_DAYS, SICKNESS_SPREAD_CHANCE, STARTING_HEALTH,
};
use crate::numbers::{round_f64_to_u32, usize_to_f64};
use crate::pacing::{Pace, Rations};
use crate::rng::{RandomSource, pick, uniform_u32};

pub type MemberId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MemberStatus {
    #[default]
    Healthy,
    Sick,
    Injured,
    Dead,
}

impl MemberStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Sick => "sick",
            Self::Injured => "injured",
            Self::Dead => "dead",
        }
    }

    #[must_use]
    pub const fn is_alive(self) -> bool {
        !matches!(self, Self::Dead)
    }
}

impl fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyMember {
    pub id: MemberId,
    pub name: String,
    /// Health in `[0, 100]`; zero exactly when the member is dead.
    pub health: i32,
    #[serde(default)]
    pub status: MemberStatus,
    /// Days left before a sick member recovers on their own.
    #[serde(default)]
    pub sickness_turns: u32,
}

impl PartyMember {
    #[must_use]
    pub fn new(id: MemberId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            health: STARTING_HEALTH,
            status: MemberStatus::Healthy,
            sickness_turns: 0,
        }
    }

    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.status.is_alive()
    }
}

/// Sequential member id allocator owned by the game state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberIds {
    next: MemberId,
}

impl MemberIds {
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 0 }
    }

    pub const fn allocate(&mut self) -> MemberId {
        let id = self.next;
        self.next += 1;
        id
    }

    #[must_use]
    pub const fn peek(&self) -> MemberId {
        self.next
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    pub members: Vec<PartyMember>,
}

impl Party {
    /// Form a party, assigning ids in name order.
    #[must_use]
    pub fn from_names<S: AsRef<str>>(names: &[S], ids: &mut MemberIds) -> Self {
        let members = names
            .iter()
            .map(|name| PartyMember::new(ids.allocate(), name.as_ref()))
            .collect();
        Self { members }
    }

    #[must_use]
    pub fn member(&self, id: MemberId) -> Option<&PartyMember> {
        self.members.iter().find(|member| member.id == id)
    }

    pub fn member_mut(&mut self, id: MemberId) -> Option<&mut PartyMember> {
        self.members.iter_mut().find(|member| member.id == id)
    }

    pub fn alive(&self) -> impl Iterator<Item = &PartyMember> {
        self.members.iter().filter(|member| member.is_alive())
    }

    #[must_use]
    pub fn alive_ids(&self) -> Vec<MemberId> {
        self.alive().map(|member| member.id).collect()
    }

    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.alive().count()
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.members.iter().any(PartyMember::is_alive)
    }

    /// Apply a health delta, clamped to `[0, 100]`. Returns `true` when the
    /// change killed the member. Dead or unknown members are untouched.
    pub fn update_health(&mut self, id: MemberId, delta: i32) -> bool {
        let Some(member) = self.member_mut(id) else {
            return false;
        };
        if !member.is_alive() {
            return false;
        }
        member.health = member.health.saturating_add(delta).clamp(0, MAX_HEALTH);
        if member.health == 0 {
            member.status = MemberStatus::Dead;
            member.sickness_turns = 0;
            return true;
        }
        false
    }

    /// Apply the same delta to every living member, returning ids that died.
    pub fn update_health_all(&mut self, delta: i32) -> Vec<MemberId> {
        self.alive_ids()
            .into_iter()
            .filter(|id| self.update_health(*id, delta))
            .collect()
    }

    /// Assign a status. Entering sickness draws a duration unless one is
    /// already running; returning to health clears it.
    pub fn set_status<R>(&mut self, id: MemberId, status: MemberStatus, rng: &mut R)
    where
        R: RandomSource,
    {
        let Some(member) = self.member_mut(id) else {
            return;
        };
        if !member.is_alive() {
            return;
        }
        member.status = status;
        match status {
            MemberStatus::Sick if member.sickness_turns == 0 => {
                member.sickness_turns = sickness_duration(rng);
            }
            MemberStatus::Healthy => member.sickness_turns = 0,
            MemberStatus::Dead => {
                member.health = 0;
                member.sickness_turns = 0;
            }
            _ => {}
        }
    }

    /// Cure sickness with medicine. Only sick members respond.
    pub fn heal_member(&mut self, id: MemberId) -> bool {
        let Some(member) = self.member_mut(id) else {
            return false;
        };
        if member.status != MemberStatus::Sick {
            return false;
        }
        member.status = MemberStatus::Healthy;
        member.sickness_turns = 0;
        true
    }

    /// Drown, or otherwise kill outright.
    pub fn mark_dead(&mut self, id: MemberId) -> bool {
        let Some(member) = self.member_mut(id) else {
            return false;
        };
        if !member.is_alive() {
            return false;
        }
        member.health = 0;
        member.status = MemberStatus::Dead;
        member.sickness_turns = 0;
        true
    }

    /// Uniform choice among living members.
    pub fn random_alive<R>(&self, rng: &mut R) -> Option<MemberId>
    where
        R: RandomSource,
    {
        let alive = self.alive_ids();
        pick(rng, &alive).copied()
    }

    /// Afflict a random healthy member with sickness.
    pub fn make_random_member_sick<R>(&mut self, rng: &mut R) -> Option<MemberId>
    where
        R: RandomSource,
    {
        let eligible: Vec<MemberId> = self
            .members
            .iter()
            .filter(|member| can_become_sick(member))
            .map(|member| member.id)
            .collect();
        let victim = pick(rng, &eligible).copied()?;
        self.set_status(victim, MemberStatus::Sick, rng);
        Some(victim)
    }

    /// Injure a random healthy or sick member.
    pub fn make_random_member_injured<R>(&mut self, rng: &mut R) -> Option<MemberId>
    where
        R: RandomSource,
    {
        let eligible: Vec<MemberId> = self
            .members
            .iter()
            .filter(|member| can_become_injured(member))
            .map(|member| member.id)
            .collect();
        let victim = pick(rng, &eligible).copied()?;
        self.set_status(victim, MemberStatus::Injured, rng);
        Some(victim)
    }

    /// One day of weekly pace/ration effects (when `day_of_week` is the last
    /// day of the week), sickness progression with contagion, and injury
    /// damage. Returns narrative messages.
    pub fn apply_daily_effects<R>(
        &mut self,
        rations: Rations,
        pace: Pace,
        day_of_week: u32,
        rng: &mut R,
    ) -> Vec<String>
    where
        R: RandomSource,
    {
        let mut messages = Vec::new();
        let weekly = if day_of_week == DAYS_PER_WEEK {
            pace.weekly_health_effect() + rations.weekly_health_effect()
        } else {
            0
        };

        for index in 0..self.members.len() {
            let (id, name) = {
                let member = &self.members[index];
                if !member.is_alive() {
                    continue;
                }
                (member.id, member.name.clone())
            };
            let mut died = false;

            if weekly != 0 {
                died |= self.update_health(id, weekly);
            }

            if self.members[index].status == MemberStatus::Sick {
                died |= self.update_health(id, -SICKNESS_DAMAGE);
                let member = &mut self.members[index];
                if member.status == MemberStatus::Sick {
                    member.sickness_turns = member.sickness_turns.saturating_sub(1);
                    if member.sickness_turns == 0 {
                        member.status = MemberStatus::Healthy;
                        messages.push(format!("{name} has recovered from illness."));
                    }
                }
                if rng.next_f64() < SICKNESS_SPREAD_CHANCE
                    && let Some(caught) = self.spread_sickness(id, rng)
                {
                    messages.push(caught);
                }
            }

            if self.members[index].status == MemberStatus::Injured {
                died |= self.update_health(id, -INJURY_DAMAGE);
            }

            if died {
                messages.push(format!("{name} has died."));
            }
        }
        messages
    }

    fn spread_sickness<R>(&mut self, carrier: MemberId, rng: &mut R) -> Option<String>
    where
        R: RandomSource,
    {
        let exposed: Vec<MemberId> = self
            .members
            .iter()
            .filter(|member| member.id != carrier && member.status == MemberStatus::Healthy)
            .map(|member| member.id)
            .collect();
        let victim = pick(rng, &exposed).copied()?;
        self.set_status(victim, MemberStatus::Sick, rng);
        self.member(victim)
            .map(|member| format!("{} has caught the illness.", member.name))
    }

    /// Average health of living members as a whole percentage.
    #[must_use]
    pub fn health_percent(&self) -> u32 {
        let alive = self.alive_count();
        if alive == 0 {
            return 0;
        }
        let total: f64 = self.alive().map(|member| f64::from(member.health)).sum();
        let capacity = usize_to_f64(alive) * f64::from(MAX_HEALTH);
        round_f64_to_u32(total / capacity * 100.0)
    }
}

const fn can_become_sick(member: &PartyMember) -> bool {
    matches!(member.status, MemberStatus::Healthy)
}

const fn can_become_injured(member: &PartyMember) -> bool {
    matches!(member.status, MemberStatus::Healthy | MemberStatus::Sick)
}

fn sickness_duration<R>(rng: &mut R) -> u32
where
    R: RandomSource,
{
    uniform_u32(rng, SICKNESS_MIN_DAYS, SICKNESS_MAX_DAYS - SICKNESS_MIN_DAYS + 1)
}
