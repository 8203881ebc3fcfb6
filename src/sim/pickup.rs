//! Applying pickups that an actor walks over or grabs.

use crate::domain::actor::{ActorId, AmmoId, Weapon};
use crate::domain::collision::{CollisionMap, ThingId};
use crate::domain::pickup::{self, PickupEffect};
use super::event::{GameEvent, ObjectiveKind};
use super::world::World;

impl<M: CollisionMap> World<M> {
    /// Try to take pickup `index` with actor `id`. Only player actors pick
    /// things up. `pickup_all` also takes manual pickups (guns).
    /// Returns true when the pickup was consumed.
    pub fn pickup_pickup(&mut self, id: ActorId, index: usize, pickup_all: bool, events: &mut Vec<GameEvent>) -> bool {
        let Some(actor) = self.actors.get(id) else { return false };
        let Some(uid) = actor.player else { return false };
        let Some(p) = self.pickups.get(index) else { return false };
        let Some(outcome) = pickup::evaluate(actor, p, pickup_all, &self.descriptors) else { return false };
        let pos = actor.real_pos();
        let (is_random_spawned, objective) = (p.is_random_spawned, p.objective);

        match outcome.effect {
            PickupEffect::Score(points) => {
                self.score(uid, points);
                events.push(GameEvent::Score { player: uid, points });
            }
            PickupEffect::Heal(amount) => {
                self.heal(id, amount);
                events.push(GameEvent::ActorHeal { actor: id, player: Some(uid), amount, is_random_spawned });
            }
            PickupEffect::AddAmmo { ammo, amount } => {
                self.add_ammo(id, ammo, amount);
                events.push(GameEvent::AddAmmo { actor: id, ammo, amount });
            }
            PickupEffect::ReplaceGun { gun, top_up } => {
                if let Some(a) = self.actors.get_mut(id) {
                    if !a.has_gun(gun) { a.guns.push(gun); }
                    a.weapon = Weapon::new(gun);
                }
                events.push(GameEvent::ReplaceGun { actor: id, gun });
                if let Some((ammo, amount)) = top_up {
                    self.add_ammo(id, ammo, amount);
                    events.push(GameEvent::AddAmmo { actor: id, ammo, amount });
                }
            }
            PickupEffect::AddKeys(keys) => {
                self.mission_keys |= keys;
                events.push(GameEvent::AddKeys { keys, pos });
            }
        }
        if let Some(sound) = outcome.sound {
            events.push(GameEvent::sound(sound, pos));
        }
        if outcome.collects_objective {
            events.push(GameEvent::MissionObjective { kind: ObjectiveKind::Collect, objective, player: Some(uid), pos });
        }

        if let Some(p) = self.pickups.get_mut(index) {
            p.picked_up = true;
        }
        self.map.remove_item(ThingId::Pickup(index));
        events.push(GameEvent::RemovePickup { pickup: index });
        true
    }

    /// Add ammo, never beyond the descriptor's max.
    pub fn add_ammo(&mut self, id: ActorId, ammo: AmmoId, amount: i32) {
        let max = self.descriptors.ammo(ammo).max;
        if let Some(a) = self.actors.get_mut(id) {
            let held = a.ammo.entry(ammo).or_insert(0);
            *held = (*held + amount).min(max);
        }
    }
}
