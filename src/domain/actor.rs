//! Actors and the read-only descriptors they are built from.
//!
//! An `Actor` is owned by the registry. Everything else (player records,
//! the spatial index, AI targets) refers to it by `ActorId` and must treat a
//! failed lookup as "absent".

use std::collections::HashMap;

use super::anim::AnimState;
use super::collision::CollisionTeam;
use super::direction::{Cmd, Direction};
use super::flags::ActorFlags;
use super::geom::Vec2i;
use super::status::{StatusEffects, Tint};

/// Collision footprint of every actor, in real units.
pub const ACTOR_SIZE: Vec2i = Vec2i::new(7, 5);

/// Stable arena key. The generation changes when a slot is reused, so a
/// stale id never resolves to a newer actor.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub struct ActorId {
    pub index: u32,
    pub generation: u32,
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub struct PlayerUid(pub u32);

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct CharacterId(pub usize);

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct GunId(pub usize);

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct AmmoId(pub usize);

// ══════════════════════════════════════════════════════════════
// Descriptors (read-only, looked up by id)
// ══════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct Character {
    pub name: String,
    /// Full units moved per tick.
    pub speed: i32,
    pub max_health: i32,
    pub flags: ActorFlags,
    pub gun: GunId,
}

#[derive(Clone, Debug)]
pub struct GunDescriptor {
    pub name: String,
    /// Melee guns strike whatever blocks the holder's move.
    pub is_melee: bool,
    pub is_grenade: bool,
    /// Ticks between shots.
    pub lock: i32,
    /// Ticks between hit sounds.
    pub sound_lock: i32,
    pub ammo: Option<AmmoId>,
    /// Score charged per shot.
    pub cost: i32,
}

#[derive(Clone, Debug)]
pub struct AmmoDescriptor {
    pub name: String,
    /// Amount a default pickup carries.
    pub amount: i32,
    pub max: i32,
    /// Picking this ammo up without owning a gun that uses it gives this gun.
    pub default_gun: Option<GunId>,
}

#[derive(Clone, Debug, Default)]
pub struct Descriptors {
    pub characters: Vec<Character>,
    pub guns: Vec<GunDescriptor>,
    pub ammo: Vec<AmmoDescriptor>,
}

impl Descriptors {
    pub fn character(&self, id: CharacterId) -> &Character {
        &self.characters[id.0]
    }

    pub fn gun(&self, id: GunId) -> &GunDescriptor {
        &self.guns[id.0]
    }

    pub fn ammo(&self, id: AmmoId) -> &AmmoDescriptor {
        &self.ammo[id.0]
    }

    /// A small built-in roster: knife, pistol, flamer plus a player,
    /// a grunt and a prisoner.
    pub fn standard() -> Self {
        let guns = vec![
            GunDescriptor {
                name: "Knife".into(), is_melee: true, is_grenade: false,
                lock: 0, sound_lock: 10, ammo: None, cost: 0,
            },
            GunDescriptor {
                name: "Pistol".into(), is_melee: false, is_grenade: false,
                lock: 20, sound_lock: 0, ammo: Some(AmmoId(0)), cost: 0,
            },
            GunDescriptor {
                name: "Flamer".into(), is_melee: false, is_grenade: false,
                lock: 6, sound_lock: 0, ammo: Some(AmmoId(1)), cost: 1,
            },
        ];
        let ammo = vec![
            AmmoDescriptor { name: "Bullets".into(), amount: 20, max: 100, default_gun: None },
            AmmoDescriptor { name: "Fuel".into(), amount: 50, max: 200, default_gun: Some(GunId(2)) },
        ];
        let characters = vec![
            Character {
                name: "Jones".into(), speed: 256, max_health: 200,
                flags: ActorFlags::empty(), gun: GunId(1),
            },
            Character {
                name: "Grunt".into(), speed: 192, max_health: 40,
                flags: ActorFlags::empty(), gun: GunId(0),
            },
            Character {
                name: "Prisoner".into(), speed: 192, max_health: 20,
                flags: ActorFlags::PRISONER | ActorFlags::GOOD_GUY, gun: GunId(0),
            },
        ];
        Descriptors { characters, guns, ammo }
    }
}

// ══════════════════════════════════════════════════════════════
// Weapon
// ══════════════════════════════════════════════════════════════

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GunState {
    Ready,
    Firing,
    Recoil,
}

#[derive(Clone, Debug)]
pub struct Weapon {
    pub gun: GunId,
    pub state: GunState,
    pub lock: i32,
    pub sound_lock: i32,
}

impl Weapon {
    pub fn new(gun: GunId) -> Self {
        Weapon { gun, state: GunState::Ready, lock: 0, sound_lock: 0 }
    }

    pub fn update(&mut self, ticks: i32) {
        self.lock = (self.lock - ticks).max(0);
        self.sound_lock = (self.sound_lock - ticks).max(0);
        if self.state == GunState::Recoil && self.lock == 0 {
            self.state = GunState::Ready;
        }
    }

    pub fn can_fire(&self) -> bool {
        self.lock <= 0
    }

    pub fn fire(&mut self, desc: &GunDescriptor) {
        self.lock = desc.lock;
        self.state = if desc.lock > 0 { GunState::Recoil } else { GunState::Firing };
    }

    pub fn hold_fire(&mut self) {
        if self.state == GunState::Firing {
            self.state = GunState::Ready;
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Actor
// ══════════════════════════════════════════════════════════════

/// Coarse action flag consumed by mission logic.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ActorAction {
    Moving,
    Exiting,
}

/// Scratch state owned by whatever AI drives this actor.
/// Dropped together with the actor.
#[derive(Clone, Debug, Default)]
pub struct AiContext {
    pub target: Option<ActorId>,
    pub delay: i32,
    pub last_cmd: Cmd,
}

#[derive(Clone, Debug)]
pub struct Actor {
    pub id: ActorId,
    pub player: Option<PlayerUid>,
    pub character: CharacterId,

    pub pos: Vec2i,       // full units
    pub last_pos: Vec2i,  // full units, before the last accepted move
    pub size: Vec2i,      // real units

    pub health: i32,
    /// Death counter. 0 while alive, then grows monotonically.
    pub dead: u32,

    pub status: StatusEffects,
    pub state: AnimState,
    pub state_counter: i32,
    pub direction: Direction,

    /// Velocity bias in full units per tick (slide, knockback, repel).
    pub dx: i32,
    pub dy: i32,

    pub flags: ActorFlags,
    pub slide_lock: i32,
    pub sound_lock: i32,

    pub weapon: Weapon,
    pub guns: Vec<GunId>,
    pub ammo: HashMap<AmmoId, i32>,

    pub action: ActorAction,
    pub last_cmd: Cmd,
    /// Mission objective this actor counts toward, if any.
    pub objective: Option<usize>,
    pub ai: Option<AiContext>,
}

impl Actor {
    pub fn new(id: ActorId, character_id: CharacterId, character: &Character, player: Option<PlayerUid>) -> Self {
        Actor {
            id,
            player,
            character: character_id,
            pos: Vec2i::ZERO,
            last_pos: Vec2i::ZERO,
            size: ACTOR_SIZE,
            health: character.max_health,
            dead: 0,
            status: StatusEffects::default(),
            state: AnimState::Idle,
            state_counter: AnimState::Idle.duration(),
            direction: Direction::Down,
            dx: 0,
            dy: 0,
            flags: ActorFlags::SLEEPING | character.flags,
            slide_lock: 0,
            sound_lock: 0,
            weapon: Weapon::new(character.gun),
            guns: vec![character.gun],
            ammo: HashMap::new(),
            action: ActorAction::Moving,
            last_cmd: Cmd::empty(),
            objective: None,
            ai: None,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Health as shown to players; negative internal values read as 0.
    pub fn display_health(&self) -> i32 {
        self.health.max(0)
    }

    pub fn is_player(&self) -> bool {
        self.player.is_some()
    }

    /// The one tint a renderer should draw this actor with.
    pub fn display_tint(&self) -> Tint {
        self.status.tint(self.flags.contains(ActorFlags::SEETHROUGH))
    }

    /// Player-controlled or flagged good guy.
    pub fn is_good(&self) -> bool {
        self.player.is_some() || self.flags.contains(ActorFlags::GOOD_GUY)
    }

    pub fn collision_team(&self) -> CollisionTeam {
        if self.is_good() { CollisionTeam::Good } else { CollisionTeam::Bad }
    }

    pub fn real_pos(&self) -> Vec2i {
        self.pos.full_to_real()
    }

    pub fn has_gun(&self, gun: GunId) -> bool {
        self.guns.contains(&gun)
    }

    pub fn ammo_of(&self, ammo: AmmoId) -> i32 {
        self.ammo.get(&ammo).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grunt() -> Actor {
        let d = Descriptors::standard();
        Actor::new(ActorId { index: 0, generation: 0 }, CharacterId(1), d.character(CharacterId(1)), None)
    }

    #[test]
    fn new_actor_starts_idle_sleeping_facing_down() {
        let a = grunt();
        assert_eq!(a.state, AnimState::Idle);
        assert_eq!(a.direction, Direction::Down);
        assert!(a.flags.contains(ActorFlags::SLEEPING));
        assert_eq!(a.health, 40);
        assert_eq!(a.size, ACTOR_SIZE);
        assert_eq!(a.action, ActorAction::Moving);
    }

    #[test]
    fn display_health_clamps() {
        let mut a = grunt();
        a.health = -7;
        assert_eq!(a.display_health(), 0);
        assert!(!a.is_alive());
    }

    #[test]
    fn tint_prefers_status_over_seethrough() {
        let mut a = grunt();
        a.flags |= ActorFlags::SEETHROUGH;
        assert_eq!(a.display_tint(), Tint::Transparent);
        a.status.petrified = 3;
        a.status.poisoned = 3;
        assert_eq!(a.display_tint(), Tint::Poisoned);
    }

    #[test]
    fn team_follows_player_or_good_guy() {
        let mut a = grunt();
        assert_eq!(a.collision_team(), CollisionTeam::Bad);
        a.flags |= ActorFlags::GOOD_GUY;
        assert_eq!(a.collision_team(), CollisionTeam::Good);
        a.flags = ActorFlags::empty();
        a.player = Some(PlayerUid(0));
        assert_eq!(a.collision_team(), CollisionTeam::Good);
    }

    #[test]
    fn weapon_lock_cycle() {
        let d = Descriptors::standard();
        let mut w = Weapon::new(GunId(1));
        assert!(w.can_fire());
        w.fire(d.gun(GunId(1)));
        assert!(!w.can_fire());
        assert_eq!(w.state, GunState::Recoil);
        w.update(19);
        assert!(!w.can_fire());
        w.update(5);
        assert!(w.can_fire());
        assert_eq!(w.state, GunState::Ready);
    }
}
