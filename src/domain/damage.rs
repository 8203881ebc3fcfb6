//! Damage rules, truth-table driven.
//!
//! Pure functions: "may this hit land, and how hard does it push".
//! Applying the result to the world lives in `sim::damage`.
//!
//! ## Immunity (hit is a no-op)
//! ┌────────────────────────────┬─────────┐
//! │ Condition                  │ Immune? │
//! ├────────────────────────────┼─────────┤
//! │ Flame   + ASBESTOS         │ YES     │
//! │ Poison  + IMMUNITY         │ YES     │
//! │ Confuse + IMMUNITY         │ YES     │
//! │ health <= 0                │ YES     │  (no double kills)
//! │ Otherwise                  │ NO      │
//! └────────────────────────────┴─────────┘
//!
//! ## Invulnerability (health untouched)
//! ┌──────────────────────────────────────────────┬──────────┐
//! │ Condition (in order)                         │ Result   │
//! ├──────────────────────────────────────────────┼──────────┤
//! │ target INVULNERABLE                          │ YES      │
//! │ attacker HURTALWAYS or target VICTIM         │ NO       │
//! │ same player                                  │ YES      │
//! │ !dogfight, !friendly fire, good vs good      │ YES      │
//! │ bad vs bad                                   │ YES      │
//! │ Otherwise                                    │ NO       │
//! └──────────────────────────────────────────────┴──────────┘
//! "Good" = player-controlled or GOOD_GUY.

use super::actor::{Actor, PlayerUid};
use super::flags::ActorFlags;
use super::geom::Vec2i;
use super::sound::SoundId;
use super::status::SpecialDamage;

/// Knockback impulse = power * hit vector / this.
pub const KNOCKBACK_DIVISOR: i32 = 25;
/// Power of a melee strike made by moving into a target.
pub const MELEE_POWER: i32 = 2;

/// Who dealt a hit.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Attacker {
    pub flags: ActorFlags,
    pub player: Option<PlayerUid>,
}

impl Attacker {
    pub fn of(actor: &Actor) -> Self {
        Attacker { flags: actor.flags, player: actor.player }
    }

    /// Environmental damage: no owner, no flags.
    pub fn world() -> Self {
        Attacker::default()
    }

    pub fn is_good(&self) -> bool {
        self.player.is_some() || self.flags.contains(ActorFlags::GOOD_GUY)
    }
}

pub fn is_immune(actor: &Actor, kind: SpecialDamage) -> bool {
    match kind {
        SpecialDamage::Flame if actor.flags.contains(ActorFlags::ASBESTOS) => return true,
        SpecialDamage::Poison | SpecialDamage::Confuse if actor.flags.contains(ActorFlags::IMMUNITY) => return true,
        _ => {}
    }
    actor.health <= 0
}

pub fn is_invulnerable(actor: &Actor, attacker: &Attacker, dogfight: bool, friendly_fire: bool) -> bool {
    if actor.flags.contains(ActorFlags::INVULNERABLE) {
        return true;
    }
    if attacker.flags.contains(ActorFlags::HURTALWAYS) || actor.flags.contains(ActorFlags::VICTIM) {
        return false;
    }
    // Same player
    if attacker.player.is_some() && attacker.player == actor.player {
        return true;
    }
    // Friendly fire
    if !dogfight && !friendly_fire && attacker.is_good() && actor.is_good() {
        return true;
    }
    // Enemies don't hurt each other
    if !attacker.is_good() && !actor.is_good() {
        return true;
    }
    false
}

pub fn knockback(hit_vector: Vec2i, power: i32) -> Vec2i {
    Vec2i::new(
        power * hit_vector.x / KNOCKBACK_DIVISOR,
        power * hit_vector.y / KNOCKBACK_DIVISOR,
    )
}

/// Sound for a hit landing on an actor.
pub fn hit_sound(kind: SpecialDamage) -> SoundId {
    match kind {
        SpecialDamage::Knife => SoundId::KnifeFlesh,
        SpecialDamage::Flame => SoundId::HitFire,
        SpecialDamage::Explosion => SoundId::HitHard,
        SpecialDamage::Poison | SpecialDamage::Petrify | SpecialDamage::Confuse => SoundId::HitGas,
        SpecialDamage::None => SoundId::HitFlesh,
    }
}

/// A knife striking an invulnerable target would sound like a wound; skip it.
pub fn should_play_hit_sound(kind: SpecialDamage, invulnerable: bool) -> bool {
    !invulnerable || hit_sound(kind) != SoundId::KnifeFlesh
}
