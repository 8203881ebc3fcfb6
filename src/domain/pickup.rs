//! Pickup rules: may this actor take this pickup, and what does it get.
//!
//! ## Acceptance table
//! ┌───────────┬──────────────────────────────────────────────┐
//! │ Kind      │ Taken when                                   │
//! ├───────────┼──────────────────────────────────────────────┤
//! │ Jewel     │ always                                       │
//! │ Health    │ health < character max                       │
//! │ Ammo      │ held ammo < ammo max                         │
//! │ Gun       │ manual only, and gun missing or ammo short   │
//! │ Keycard   │ always                                       │
//! └───────────┴──────────────────────────────────────────────┘
//! Ammo for which the actor holds no gun, and whose descriptor names a
//! default gun, is handled like a pickup of that gun.

use super::actor::{Actor, AmmoId, Descriptors, GunId};
use super::flags::KeyFlags;
use super::geom::Vec2i;
use super::sound::SoundId;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PickupKind {
    Jewel { score: i32 },
    Health { amount: i32 },
    Ammo { ammo: AmmoId, amount: i32 },
    Gun { gun: GunId },
    Keycard { keys: KeyFlags },
}

#[derive(Clone, Debug)]
pub struct Pickup {
    pub id: usize,
    pub kind: PickupKind,
    /// Real units.
    pub pos: Vec2i,
    pub picked_up: bool,
    pub is_random_spawned: bool,
    /// Collect objective this pickup counts toward, if any.
    pub objective: Option<usize>,
}

/// What taking a pickup grants.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PickupEffect {
    Score(i32),
    Heal(i32),
    AddAmmo { ammo: AmmoId, amount: i32 },
    /// Gun granted, plus ammo to top up to twice the default amount.
    ReplaceGun { gun: GunId, top_up: Option<(AmmoId, i32)> },
    AddKeys(KeyFlags),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PickupOutcome {
    pub effect: PickupEffect,
    pub sound: Option<SoundId>,
    pub collects_objective: bool,
}

fn has_gun_using_ammo(actor: &Actor, ammo: AmmoId, d: &Descriptors) -> bool {
    actor.guns.iter().any(|&g| d.gun(g).ammo == Some(ammo))
}

/// The gun this pickup grants when it behaves as a gun pickup.
pub fn treat_as_gun(kind: PickupKind, actor: &Actor, d: &Descriptors) -> Option<GunId> {
    match kind {
        PickupKind::Ammo { ammo, .. } => {
            if has_gun_using_ammo(actor, ammo, d) { return None; }
            d.ammo(ammo).default_gun
        }
        PickupKind::Gun { gun } => {
            let desc = d.gun(gun);
            match desc.ammo {
                Some(ammo) if desc.is_grenade && has_gun_using_ammo(actor, ammo, d) => None,
                _ => Some(gun),
            }
        }
        _ => None,
    }
}

/// Needs an explicit pickup command rather than walking over it.
pub fn is_manual(p: &Pickup, d: &Descriptors) -> bool {
    if p.picked_up { return false; }
    match p.kind {
        PickupKind::Gun { .. } => true,
        PickupKind::Ammo { ammo, .. } => d.ammo(ammo).default_gun.is_some(),
        _ => false,
    }
}

fn try_gun(actor: &Actor, gun: GunId, pickup_all: bool, d: &Descriptors) -> Option<PickupOutcome> {
    if !pickup_all { return None; }
    let top_up = d.gun(gun).ammo.and_then(|ammo| {
        let deficit = d.ammo(ammo).amount * 2 - actor.ammo_of(ammo);
        (deficit > 0).then_some((ammo, deficit))
    });
    if actor.has_gun(gun) && top_up.is_none() { return None; }
    Some(PickupOutcome {
        effect: PickupEffect::ReplaceGun { gun, top_up },
        sound: top_up.map(|_| SoundId::AmmoPickup),
        collects_objective: false,
    })
}

/// Decide whether `actor` takes `pickup`. `None` leaves it on the floor.
pub fn evaluate(actor: &Actor, pickup: &Pickup, pickup_all: bool, d: &Descriptors) -> Option<PickupOutcome> {
    if pickup.picked_up { return None; }
    match pickup.kind {
        PickupKind::Jewel { score } => Some(PickupOutcome {
            effect: PickupEffect::Score(score),
            sound: Some(SoundId::Pickup),
            collects_objective: true,
        }),
        PickupKind::Health { amount } => {
            if actor.health >= d.character(actor.character).max_health { return None; }
            Some(PickupOutcome { effect: PickupEffect::Heal(amount), sound: None, collects_objective: false })
        }
        PickupKind::Ammo { ammo, amount } => {
            if let Some(gun) = treat_as_gun(pickup.kind, actor, d) {
                return try_gun(actor, gun, pickup_all, d);
            }
            if actor.ammo_of(ammo) >= d.ammo(ammo).max { return None; }
            Some(PickupOutcome {
                effect: PickupEffect::AddAmmo { ammo, amount },
                sound: Some(SoundId::AmmoPickup),
                collects_objective: false,
            })
        }
        PickupKind::Gun { .. } => {
            let gun = treat_as_gun(pickup.kind, actor, d)?;
            try_gun(actor, gun, pickup_all, d)
        }
        PickupKind::Keycard { keys } => Some(PickupOutcome {
            effect: PickupEffect::AddKeys(keys),
            sound: Some(SoundId::Key),
            collects_objective: false,
        }),
    }
}
