//! Damage application: hits, injuries, heals.
//!
//! Rules (immunity, invulnerability, knockback) come from
//! `domain::damage`; this module applies them to the world and emits
//! the resulting events.
//!
//! Hit pipeline for an actor:
//!   1. immune?            → nothing happens
//!   2. take_hit           → status effect, knockback, hit sound
//!   3. invulnerable?      → stop, health untouched
//!   4. injure(power)      → health, death notifications
//!   5. player attacker    → score

use tracing::debug;

use crate::domain::actor::ActorId;
use crate::domain::collision::{CollisionMap, ThingId};
use crate::domain::damage::{self, Attacker};
use crate::domain::flags::ItemFlags;
use crate::domain::geom::Vec2i;
use crate::domain::status::{self, SpecialDamage};
use super::event::{GameEvent, ObjectiveKind, SoundId};
use super::world::{PendingHit, World};

/// Health cap for healing, as a multiple of `game.player_hp` percent.
pub const HEAL_CAP_BASE: i32 = 200;

impl<M: CollisionMap> World<M> {
    /// Subtract `amount` from health. Crossing to <= 0 restarts the state
    /// countdown so the death counter starts on the next update, and fires
    /// the scream, taunt and kill notifications exactly once.
    pub fn injure(&mut self, id: ActorId, amount: i32, events: &mut Vec<GameEvent>) {
        let Some(actor) = self.actors.get_mut(id) else { return };
        let was_alive = actor.health > 0;
        actor.health -= amount;
        if !was_alive || actor.health > 0 { return; }

        actor.state_counter = 0;
        let pos = actor.real_pos();
        let player = actor.player;
        let objective = actor.objective;

        let scream = self.next_scream();
        events.push(GameEvent::sound(SoundId::Kill(scream), pos));
        if player.is_some() {
            events.push(GameEvent::sound(SoundId::Hahaha, pos));
        }
        events.push(GameEvent::MissionObjective { kind: ObjectiveKind::Kill, objective, player: None, pos });
        events.push(GameEvent::ActorKilled { actor: id, player });
        debug!(?id, ?player, "actor killed");
    }

    /// Add health, capped at `200 * game.player_hp / 100`.
    pub fn heal(&mut self, id: ActorId, amount: i32) {
        let cap = HEAL_CAP_BASE * self.config.game.player_hp / 100;
        if let Some(actor) = self.actors.get_mut(id) {
            actor.health = (actor.health + amount).min(cap);
        }
    }

    /// Apply the non-lethal side of a hit: status effect, knockback and
    /// hit sound. `invulnerable` only affects which sound plays.
    #[allow(clippy::too_many_arguments)]
    pub fn take_hit(
        &mut self,
        id: ActorId,
        hit_vector: Vec2i,
        power: i32,
        kind: SpecialDamage,
        hit_sound: bool,
        invulnerable: bool,
        location: Vec2i,
        events: &mut Vec<GameEvent>,
    ) {
        let pushback = self.config.game.shots_pushback;
        let Some(actor) = self.actors.get_mut(id) else { return };
        // Several hits in one tick may overkill; ignore the extras.
        if damage::is_immune(actor, kind) { return; }
        status::apply_special(actor, kind);

        if pushback {
            let kb = damage::knockback(hit_vector, power);
            actor.dx += kb.x;
            actor.dy += kb.y;
        }

        if hit_sound && damage::should_play_hit_sound(kind, invulnerable) {
            events.push(GameEvent::sound(damage::hit_sound(kind), location));
        }
    }

    /// Full hit on an actor. Returns true when health was reduced.
    #[allow(clippy::too_many_arguments)]
    pub fn damage_actor(
        &mut self,
        id: ActorId,
        attacker: Attacker,
        hit_vector: Vec2i,
        power: i32,
        kind: SpecialDamage,
        hit_sound: bool,
        location: Vec2i,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        let dogfight = self.is_dogfight();
        let friendly_fire = self.config.game.friendly_fire;
        let Some(actor) = self.actors.get(id) else { return false };
        if damage::is_immune(actor, kind) { return false; }
        let invulnerable = damage::is_invulnerable(actor, &attacker, dogfight, friendly_fire);
        let target_good = actor.is_good();

        self.take_hit(id, hit_vector, power, kind, hit_sound, invulnerable, location, events);
        if invulnerable { return false; }

        self.injure(id, power, events);

        if let Some(uid) = attacker.player {
            if power != 0 {
                let points = if target_good { -power } else { power };
                self.score(uid, points);
                events.push(GameEvent::Score { player: uid, points });
            }
        }
        true
    }

    /// Hit a destructible map object. Wrecks it when health runs out.
    pub fn damage_object(&mut self, object: usize, power: i32, events: &mut Vec<GameEvent>) -> bool {
        let Some(o) = self.objects.get_mut(object) else { return false };
        if o.wrecked || !o.item_flags.contains(ItemFlags::CAN_BE_SHOT) { return false; }
        o.health -= power;
        if o.health > 0 { return true; }

        o.wrecked = true;
        o.item_flags = ItemFlags::IS_WRECK;
        let (pos, objective) = (o.pos, o.objective);
        self.map.set_item_flags(ThingId::Object(object), ItemFlags::IS_WRECK);
        events.push(GameEvent::ObjectDestroyed { object });
        if objective.is_some() {
            events.push(GameEvent::MissionObjective { kind: ObjectiveKind::Destroy, objective, player: None, pos });
        }
        debug!(object, "object destroyed");
        true
    }

    /// Route a hit to whatever `target` is.
    #[allow(clippy::too_many_arguments)]
    pub fn damage_something(
        &mut self,
        target: ThingId,
        attacker: Attacker,
        hit_vector: Vec2i,
        power: i32,
        kind: SpecialDamage,
        hit_sound: bool,
        location: Vec2i,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        match target {
            ThingId::Actor(id) => self.damage_actor(id, attacker, hit_vector, power, kind, hit_sound, location, events),
            ThingId::Object(o) => self.damage_object(o, power, events),
            ThingId::Pickup(_) => false,
        }
    }

    pub(crate) fn apply_pending_hit(&mut self, hit: PendingHit, events: &mut Vec<GameEvent>) {
        self.damage_something(
            hit.target, hit.attacker, hit.hit_vector, hit.power,
            hit.kind, hit.hit_sound, hit.pos, events,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CampaignMode, SimConfig};
    use crate::domain::actor::{CharacterId, Descriptors, PlayerUid};
    use crate::domain::flags::{ActorFlags, ObjectFlags};
    use crate::sim::map::TileMap;
    use crate::sim::player::{InputDevice, PlayerData};
    use crate::sim::world::MapObject;

    fn world() -> World {
        let map = TileMap::from_rows(&["......", "......"]);
        let mut w = World::new(map, Descriptors::standard(), SimConfig::default());
        w.add_player(PlayerData::new(PlayerUid(0), "Jones", CharacterId(0), InputDevice::Human));
        w
    }

    fn grunt(w: &mut World) -> ActorId {
        w.spawn_actor(CharacterId(1), None, TileMap::tile_center(2, 0).real_to_full())
    }

    fn player_attacker() -> Attacker {
        Attacker { flags: ActorFlags::empty(), player: Some(PlayerUid(0)) }
    }

    fn kills(ev: &[GameEvent]) -> usize {
        ev.iter().filter(|e| matches!(e, GameEvent::ActorKilled { .. })).count()
    }

    #[test]
    fn death_notifications_fire_once() {
        let mut w = world();
        let id = grunt(&mut w);
        if let Some(a) = w.actors.get_mut(id) { a.health = 10; }
        let mut ev = vec![];
        let mut seen = vec![];
        for _ in 0..3 {
            w.damage_actor(id, player_attacker(), Vec2i::ZERO, 4, SpecialDamage::None, true, Vec2i::ZERO, &mut ev);
            seen.push(w.actors.get(id).map(|a| a.health).unwrap_or(i32::MIN));
        }
        assert_eq!(seen, vec![6, 2, -2]);
        assert_eq!(kills(&ev), 1);
        let objectives = ev.iter().filter(|e| matches!(e, GameEvent::MissionObjective { kind: ObjectiveKind::Kill, .. })).count();
        assert_eq!(objectives, 1);
        assert_eq!(w.actors.get(id).map(|a| a.state_counter), Some(0));

        // Further hits on the corpse are ignored.
        assert!(!w.damage_actor(id, player_attacker(), Vec2i::ZERO, 4, SpecialDamage::None, true, Vec2i::ZERO, &mut ev));
        assert_eq!(w.actors.get(id).map(|a| a.health), Some(-2));
        assert_eq!(kills(&ev), 1);
        assert_eq!(w.players[0].score, 12);
    }

    #[test]
    fn player_death_adds_taunt() {
        let mut w = world();
        let id = w.spawn_actor(CharacterId(0), Some(PlayerUid(0)), Vec2i::ZERO);
        let mut ev = vec![];
        w.injure(id, 1000, &mut ev);
        assert!(ev.contains(&GameEvent::sound(SoundId::Hahaha, Vec2i::ZERO)));
        assert!(ev.contains(&GameEvent::sound(SoundId::Kill(0), Vec2i::ZERO)));
    }

    #[test]
    fn invulnerable_target_keeps_health_but_takes_effects() {
        let mut w = world();
        let id = grunt(&mut w);
        let before = w.actors.get(id).map(|a| a.health);
        let mut ev = vec![];
        // Enemy vs enemy: exempt.
        let landed = w.damage_actor(id, Attacker::world(), Vec2i::new(256, 0), 10, SpecialDamage::Flame, true, Vec2i::ZERO, &mut ev);
        assert!(!landed);
        let a = w.actors.get(id).expect("alive");
        assert_eq!(Some(a.health), before);
        assert_eq!(a.status.flamed, 10);
        assert_eq!(a.dx, 102);
    }

    #[test]
    fn knife_on_invulnerable_is_silent() {
        let mut w = world();
        let id = grunt(&mut w);
        if let Some(a) = w.actors.get_mut(id) { a.flags |= ActorFlags::INVULNERABLE; }
        let mut ev = vec![];
        w.damage_actor(id, player_attacker(), Vec2i::ZERO, 2, SpecialDamage::Knife, true, Vec2i::ZERO, &mut ev);
        assert!(ev.is_empty());
        if let Some(a) = w.actors.get_mut(id) { a.flags.remove(ActorFlags::INVULNERABLE); }
        w.damage_actor(id, player_attacker(), Vec2i::ZERO, 2, SpecialDamage::Knife, true, Vec2i::ZERO, &mut ev);
        assert!(ev.contains(&GameEvent::sound(SoundId::KnifeFlesh, Vec2i::ZERO)));
    }

    #[test]
    fn pushback_follows_config() {
        let mut w = world();
        w.config.game.shots_pushback = false;
        let id = grunt(&mut w);
        let mut ev = vec![];
        w.damage_actor(id, player_attacker(), Vec2i::new(256, 256), 5, SpecialDamage::None, false, Vec2i::ZERO, &mut ev);
        assert_eq!(w.actors.get(id).map(|a| (a.dx, a.dy)), Some((0, 0)));
        assert!(ev.iter().all(|e| !matches!(e, GameEvent::SoundAt { .. })));
    }

    #[test]
    fn friendly_fire_and_dogfight() {
        let mut w = world();
        w.add_player(PlayerData::new(PlayerUid(1), "Ice", CharacterId(0), InputDevice::Human));
        let other = w.spawn_actor(CharacterId(0), Some(PlayerUid(1)), Vec2i::ZERO);
        let mut ev = vec![];
        assert!(!w.damage_actor(other, player_attacker(), Vec2i::ZERO, 5, SpecialDamage::None, false, Vec2i::ZERO, &mut ev));
        w.config.sim.mode = CampaignMode::Dogfight;
        assert!(w.damage_actor(other, player_attacker(), Vec2i::ZERO, 5, SpecialDamage::None, false, Vec2i::ZERO, &mut ev));
        // Hurting a good actor costs score.
        assert_eq!(w.players[0].score, -5);
    }

    #[test]
    fn heal_is_capped() {
        let mut w = world();
        let id = grunt(&mut w);
        w.heal(id, 1000);
        assert_eq!(w.actors.get(id).map(|a| a.health), Some(200));
        w.config.game.player_hp = 50;
        w.heal(id, 1);
        assert_eq!(w.actors.get(id).map(|a| a.health), Some(100));
    }

    #[test]
    fn objects_wreck() {
        let mut w = world();
        let o = w.add_object(MapObject {
            id: 0,
            pos: TileMap::tile_center(4, 1),
            size: Vec2i::new(8, 8),
            flags: ObjectFlags::empty(),
            item_flags: ItemFlags::IMPASSABLE | ItemFlags::CAN_BE_SHOT,
            health: 5,
            wrecked: false,
            frame: 0,
            objective: Some(2),
        });
        let mut ev = vec![];
        assert!(w.damage_something(ThingId::Object(o), player_attacker(), Vec2i::ZERO, 3, SpecialDamage::None, true, Vec2i::ZERO, &mut ev));
        assert!(!w.objects[o].wrecked);
        w.damage_object(o, 3, &mut ev);
        assert!(w.objects[o].wrecked);
        assert_eq!(w.map.item(ThingId::Object(o)).map(|i| i.flags), Some(ItemFlags::IS_WRECK));
        assert!(ev.contains(&GameEvent::ObjectDestroyed { object: o }));
        assert!(!w.damage_object(o, 3, &mut ev));
    }
}
