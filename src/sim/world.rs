//! World: the complete state the actor core mutates each tick.
//!
//! ## Ownership
//!
//!   - `actors`: the registry owns every actor outright.
//!   - `players`: player records hold a weak `Option<ActorId>`.
//!   - `map`: the spatial index holds `ThingId`s, never actors.
//!
//! Every cross-reference is an id resolved through the registry, so a
//! removed actor simply stops resolving.
//!
//! All mutation entry points take `events: &mut Vec<GameEvent>` and push
//! what the host needs to hear about.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::config::SimConfig;
use crate::domain::actor::{Actor, ActorId, CharacterId, Descriptors, PlayerUid};
use crate::domain::collision::{CollisionMap, CollisionTeam, ThingId, TileItem};
use crate::domain::damage::Attacker;
use crate::domain::direction::{Direction, DIRECTION_COUNT};
use crate::domain::flags::{ActorFlags, ItemFlags, KeyFlags, ObjectFlags};
use crate::domain::geom::Vec2i;
use crate::domain::pickup::Pickup;
use crate::domain::status::SpecialDamage;
use super::event::GameEvent;
use super::map::TileMap;
use super::player::PlayerData;
use super::registry::Registry;

/// Number of blood splat frames a corpse may leave behind.
pub const BLOOD_MAX: u32 = 12;

/// Static or destructible map furniture, including corpse debris.
#[derive(Clone, Debug)]
pub struct MapObject {
    pub id: usize,
    /// Real units.
    pub pos: Vec2i,
    pub size: Vec2i,
    pub flags: ObjectFlags,
    pub item_flags: ItemFlags,
    pub health: i32,
    pub wrecked: bool,
    /// Blood frame for debris.
    pub frame: u32,
    pub objective: Option<usize>,
}

/// A hit produced outside the actor core (bullets, explosions), applied
/// during the next step.
#[derive(Clone, Copy, Debug)]
pub struct PendingHit {
    pub target: ThingId,
    pub attacker: Attacker,
    pub hit_vector: Vec2i,
    pub power: i32,
    pub kind: SpecialDamage,
    pub hit_sound: bool,
    /// Real units.
    pub pos: Vec2i,
}

pub struct World<M: CollisionMap = TileMap> {
    // ── Map ──
    pub map: M,

    // ── Entities ──
    pub actors: Registry,
    pub players: Vec<PlayerData>,
    pub pickups: Vec<Pickup>,
    pub objects: Vec<MapObject>,

    // ── Read-only data ──
    pub descriptors: Descriptors,
    pub config: SimConfig,

    // ── Mission ──
    pub mission_keys: KeyFlags,

    // ── Meta ──
    pub rng: ChaCha8Rng,
    pub tick: u64,
    pub(crate) scream_index: u8,
    pub(crate) pending_hits: Vec<PendingHit>,
}

// ── Construction ──

impl<M: CollisionMap> World<M> {
    pub fn new(map: M, descriptors: Descriptors, config: SimConfig) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.sim.seed);
        World {
            map,
            actors: Registry::new(),
            players: vec![],
            pickups: vec![],
            objects: vec![],
            descriptors,
            config,
            mission_keys: KeyFlags::empty(),
            rng,
            tick: 0,
            scream_index: 0,
            pending_hits: vec![],
        }
    }

    pub fn is_dogfight(&self) -> bool {
        self.config.is_dogfight()
    }
}

// ── Actor lifecycle ──

impl<M: CollisionMap> World<M> {
    /// Create an actor at `pos` (full units), register it and place it in
    /// the spatial index.
    ///
    /// NPCs get a random facing and health scaled by `game.non_player_hp`
    /// (minimum 1). A player actor uses its record's max health and is
    /// linked back to the record.
    pub fn spawn_actor(&mut self, character: CharacterId, player: Option<PlayerUid>, pos: Vec2i) -> ActorId {
        let desc = self.descriptors.character(character).clone();
        let player_max = player.and_then(|uid| self.player(uid)).map(|p| p.max_health);
        let non_player_hp = self.config.game.non_player_hp;
        let facing = Direction::from_index(self.rng.random_range(0..DIRECTION_COUNT));

        let id = self.actors.insert_with(|id| {
            let mut a = Actor::new(id, character, &desc, player);
            a.pos = pos;
            a.last_pos = pos;
            match player_max {
                Some(max) => a.health = max,
                None if player.is_none() => {
                    a.direction = facing;
                    a.health = (a.health * non_player_hp / 100).max(1);
                }
                None => {}
            }
            if a.flags.contains(ActorFlags::AWAKEALWAYS) {
                a.flags.remove(ActorFlags::SLEEPING);
            }
            a
        });

        if let Some(a) = self.actors.get(id) {
            self.map.add_item(TileItem {
                thing: ThingId::Actor(id),
                pos: a.real_pos(),
                size: a.size,
                flags: ItemFlags::IMPASSABLE | ItemFlags::CAN_BE_SHOT,
                team: a.collision_team(),
            });
        }
        if let Some(uid) = player {
            if let Some(p) = self.player_mut(uid) {
                p.actor = Some(id);
            }
        }
        debug!(?id, character = %desc.name, ?player, "actor spawned");
        id
    }

    /// Re-read actor `id`'s collision team into its index item. Call after
    /// changing `GOOD_GUY` or the player link on a live actor.
    pub fn sync_collision_team(&mut self, id: ActorId) {
        let Some(team) = self.actors.get(id).map(|a| a.collision_team()) else { return };
        let Some(mut item) = self.map.item(ThingId::Actor(id)).copied() else { return };
        if item.team == team { return; }
        item.team = team;
        self.map.add_item(item);
        debug!(?id, ?team, "collision team changed");
    }

    /// Unlink an actor: registry, spatial index, AI context, player link.
    pub fn remove_actor(&mut self, id: ActorId, events: &mut Vec<GameEvent>) -> Option<Actor> {
        let actor = self.actors.remove(id)?;
        self.map.remove_item(ThingId::Actor(id));
        for p in &mut self.players {
            if p.actor == Some(id) { p.actor = None; }
        }
        events.push(GameEvent::ActorRemoved { actor: id });
        debug!(?id, dead = actor.dead, "actor removed");
        Some(actor)
    }

    /// Remove every actor, e.g. at mission end.
    pub fn kill_all_actors(&mut self, events: &mut Vec<GameEvent>) {
        for id in self.actors.ids() {
            self.remove_actor(id, events);
        }
    }

    pub fn attacker_of(&self, id: ActorId) -> Attacker {
        self.actors.get(id).map(Attacker::of).unwrap_or_default()
    }

    /// Queue a hit to be applied at the next step.
    pub fn queue_hit(&mut self, hit: PendingHit) {
        self.pending_hits.push(hit);
    }

    pub(crate) fn next_scream(&mut self) -> u8 {
        let i = self.scream_index;
        self.scream_index = (self.scream_index + 1) % super::event::SCREAM_COUNT;
        i
    }
}

// ── Pickups / objects ──

impl<M: CollisionMap> World<M> {
    pub fn add_pickup(&mut self, mut pickup: Pickup) -> usize {
        let id = self.pickups.len();
        pickup.id = id;
        self.map.add_item(TileItem {
            thing: ThingId::Pickup(id),
            pos: pickup.pos,
            size: Vec2i::new(8, 8),
            flags: ItemFlags::CAN_BE_TAKEN,
            team: CollisionTeam::None,
        });
        self.pickups.push(pickup);
        id
    }

    pub fn add_object(&mut self, mut object: MapObject) -> usize {
        let id = self.objects.len();
        object.id = id;
        if !object.item_flags.is_empty() {
            self.map.add_item(TileItem {
                thing: ThingId::Object(id),
                pos: object.pos,
                size: object.size,
                flags: object.item_flags,
                team: CollisionTeam::None,
            });
        }
        self.objects.push(object);
        id
    }

    /// Leave a random blood splat where a corpse was. Debris never blocks.
    pub(crate) fn add_debris(&mut self, pos: Vec2i) -> usize {
        let frame = self.rng.random_range(0..BLOOD_MAX);
        self.add_object(MapObject {
            id: 0,
            pos,
            size: Vec2i::ZERO,
            flags: ObjectFlags::DEBRIS,
            item_flags: ItemFlags::empty(),
            health: 0,
            wrecked: true,
            frame,
            objective: None,
        })
    }
}

// ── Players ──

impl<M: CollisionMap> World<M> {
    pub fn add_player(&mut self, player: PlayerData) {
        debug!(uid = ?player.uid, local = player.is_local, "player added");
        self.players.push(player);
    }

    pub fn player(&self, uid: PlayerUid) -> Option<&PlayerData> {
        self.players.iter().find(|p| p.uid == uid)
    }

    pub fn player_mut(&mut self, uid: PlayerUid) -> Option<&mut PlayerData> {
        self.players.iter_mut().find(|p| p.uid == uid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::player::InputDevice;

    fn world() -> World {
        let map = TileMap::from_rows(&[
            "......",
            "......",
        ]);
        World::new(map, Descriptors::standard(), SimConfig::default())
    }

    #[test]
    fn npc_spawn_scales_health_and_indexes() {
        let mut w = world();
        w.config.game.non_player_hp = 50;
        let id = w.spawn_actor(CharacterId(1), None, TileMap::tile_center(1, 0).real_to_full());
        let a = w.actors.get(id).expect("spawned");
        assert_eq!(a.health, 20);
        assert!(w.map.item(ThingId::Actor(id)).is_some());
        assert_eq!(w.map.item(ThingId::Actor(id)).map(|i| i.team), Some(CollisionTeam::Bad));
    }

    #[test]
    fn turned_npc_changes_index_team_on_sync() {
        let mut w = world();
        let id = w.spawn_actor(CharacterId(1), None, TileMap::tile_center(1, 0).real_to_full());
        if let Some(a) = w.actors.get_mut(id) { a.flags.insert(ActorFlags::GOOD_GUY); }
        assert_eq!(w.map.item(ThingId::Actor(id)).map(|i| i.team), Some(CollisionTeam::Bad));

        w.sync_collision_team(id);
        let item = w.map.item(ThingId::Actor(id)).copied().expect("indexed");
        assert_eq!(item.team, CollisionTeam::Good);
        assert_eq!(item.flags, ItemFlags::IMPASSABLE | ItemFlags::CAN_BE_SHOT);
        assert_eq!(item.pos, TileMap::tile_center(1, 0));
    }

    #[test]
    fn npc_health_floor_is_one() {
        let mut w = world();
        w.config.game.non_player_hp = 1;
        let id = w.spawn_actor(CharacterId(2), None, Vec2i::ZERO);
        assert_eq!(w.actors.get(id).map(|a| a.health), Some(1));
    }

    #[test]
    fn awake_always_clears_sleeping() {
        let mut w = world();
        w.descriptors.characters[1].flags = ActorFlags::AWAKEALWAYS;
        let id = w.spawn_actor(CharacterId(1), None, Vec2i::ZERO);
        let flags = w.actors.get(id).map(|a| a.flags).unwrap_or_default();
        assert!(!flags.contains(ActorFlags::SLEEPING));
        assert!(flags.contains(ActorFlags::AWAKEALWAYS));
    }

    #[test]
    fn player_spawn_links_record_and_removal_clears_it() {
        let mut w = world();
        w.add_player(PlayerData::new(PlayerUid(0), "Jones", CharacterId(0), InputDevice::Human));
        w.players[0].max_health = 150;
        let id = w.spawn_actor(CharacterId(0), Some(PlayerUid(0)), Vec2i::ZERO);
        assert_eq!(w.players[0].actor, Some(id));
        assert_eq!(w.actors.get(id).map(|a| a.health), Some(150));

        let mut ev = vec![];
        assert!(w.remove_actor(id, &mut ev).is_some());
        assert_eq!(w.players[0].actor, None);
        assert!(w.map.item(ThingId::Actor(id)).is_none());
        assert_eq!(ev, vec![GameEvent::ActorRemoved { actor: id }]);
        assert!(w.remove_actor(id, &mut ev).is_none());
    }

    #[test]
    fn kill_all_empties_registry() {
        let mut w = world();
        for _ in 0..3 { w.spawn_actor(CharacterId(1), None, Vec2i::ZERO); }
        let mut ev = vec![];
        w.kill_all_actors(&mut ev);
        assert!(w.actors.is_empty());
        assert_eq!(ev.len(), 3);
        assert!(w.map.items().is_empty());
    }

    #[test]
    fn screams_rotate() {
        let mut w = world();
        let s: Vec<u8> = (0..6).map(|_| w.next_scream()).collect();
        assert_eq!(s, vec![0, 1, 2, 3, 0, 1]);
    }
}
