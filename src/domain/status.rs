//! Status-effect clock: flamed, poisoned, petrified, confused.
//!
//! Each timer is a non-negative countdown in ticks. Timers decay
//! independently; only the display tint picks a single winner.
//!
//! ## Application table
//! ┌────────────┬──────────────────────────────────────────┐
//! │ Kind       │ Effect                                   │
//! ├────────────┼──────────────────────────────────────────┤
//! │ Flame      │ flamed = 10 (reset)                      │
//! │ Poison     │ poisoned += 8 while below 140            │
//! │ Petrify    │ petrified = 95 only if not petrified     │
//! │ Confuse    │ confused = 700 (reset)                   │
//! │ others     │ none                                     │
//! └────────────┴──────────────────────────────────────────┘
//! Immune actors and actors at health <= 0 are skipped.

use super::actor::Actor;
use super::damage;

pub const FLAMED_COUNT: i32 = 10;
pub const POISONED_COUNT: i32 = 8;
pub const MAX_POISONED_COUNT: i32 = 140;
pub const PETRIFIED_COUNT: i32 = 95;
pub const CONFUSED_COUNT: i32 = 700;

/// Poison injures whenever the timer is a multiple of this + 1.
const POISON_CADENCE_MASK: i32 = 7;

/// Kind of damage carried by a hit.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum SpecialDamage {
    None,
    Knife,
    Explosion,
    Flame,
    Poison,
    Petrify,
    Confuse,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct StatusEffects {
    pub flamed: i32,
    pub poisoned: i32,
    pub petrified: i32,
    pub confused: i32,
}

/// The one tint an actor is drawn with.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Tint {
    None,
    Flamed,
    Poisoned,
    Petrified,
    Confused,
    Transparent,
}

impl StatusEffects {
    pub fn is_petrified(&self) -> bool { self.petrified > 0 }
    pub fn is_confused(&self) -> bool { self.confused > 0 }

    /// Fixed priority: flamed > poisoned > petrified > confused > transparency.
    pub fn tint(&self, seethrough: bool) -> Tint {
        if self.flamed > 0 { Tint::Flamed }
        else if self.poisoned > 0 { Tint::Poisoned }
        else if self.petrified > 0 { Tint::Petrified }
        else if self.confused > 0 { Tint::Confused }
        else if seethrough { Tint::Transparent }
        else { Tint::None }
    }

    /// Set or extend the timer for `kind`. No immunity checks here.
    pub fn apply(&mut self, kind: SpecialDamage) {
        match kind {
            SpecialDamage::Flame => self.flamed = FLAMED_COUNT,
            SpecialDamage::Poison => {
                if self.poisoned < MAX_POISONED_COUNT {
                    self.poisoned = (self.poisoned + POISONED_COUNT).min(MAX_POISONED_COUNT);
                }
            }
            SpecialDamage::Petrify => {
                if self.petrified == 0 {
                    self.petrified = PETRIFIED_COUNT;
                }
            }
            SpecialDamage::Confuse => self.confused = CONFUSED_COUNT,
            SpecialDamage::None | SpecialDamage::Knife | SpecialDamage::Explosion => {}
        }
    }

    /// Decay every timer by `ticks`, floored at 0.
    /// Returns the poison injury owed, judged on the timer before decay.
    pub fn decay(&mut self, ticks: i32) -> i32 {
        let mut injury = 0;
        self.flamed = (self.flamed - ticks).max(0);
        if self.poisoned > 0 {
            if self.poisoned & POISON_CADENCE_MASK == 0 {
                injury = 1;
            }
            self.poisoned = (self.poisoned - ticks).max(0);
        }
        self.petrified = (self.petrified - ticks).max(0);
        self.confused = (self.confused - ticks).max(0);
        injury
    }
}

/// Apply a new instance of special damage to `actor`, honouring immunity.
pub fn apply_special(actor: &mut Actor, kind: SpecialDamage) {
    if damage::is_immune(actor, kind) { return; }
    actor.status.apply(kind);
}

/// Advance the clock. Timers freeze once health is gone.
/// Returns the poison injury the caller must route through the damage model.
pub fn advance(actor: &mut Actor, ticks: i32) -> i32 {
    if actor.health <= 0 { return 0; }
    actor.status.decay(ticks)
}
