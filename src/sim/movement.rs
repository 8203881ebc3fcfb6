//! Movement: commands, the three-phase move resolver, slides and repel.
//!
//! ## try_move phases
//!
//!   1. **Walls.** Target rectangle hits a wall or the map edge → keep the
//!      free axis (X wins on a corner); nothing free → reject.
//!   2. **Entities.** Target overlaps an impassable item of another team →
//!      a player frees a prisoner it bumps into; a melee wielder strikes the
//!      item and stops; otherwise keep the free axis, then re-check walls.
//!   3. **Commit.** Fire triggers under the new position, let player actors
//!      collect pickups, update `last_pos`/`pos`, move the index item and
//!      set the exiting flag.
//!
//! A rejected move leaves position untouched. Velocity decay already
//! applied by `command_actor` is not rolled back.

use tracing::trace;

use crate::config::{AllyCollision, SwitchMove};
use crate::domain::actor::{ActorAction, ActorId, PlayerUid};
use crate::domain::anim::{self, AnimState};
use crate::domain::collision::{reduce_axes, CollisionMap, CollisionQuery, CollisionTeam, ThingId};
use crate::domain::damage::{Attacker, MELEE_POWER};
use crate::domain::direction::{Cmd, Direction};
use crate::domain::flags::{ActorFlags, ItemFlags, ObjectFlags};
use crate::domain::geom::Vec2i;
use crate::domain::status::SpecialDamage;
use super::event::{GameEvent, ObjectiveKind, SoundId};
use super::world::World;

/// Velocity bias lost per tick, per axis, in full units.
pub const VELOCITY_DECAY: i32 = 32;
pub const SLIDE_LOCK: i32 = 50;
pub const SLIDE_IMPULSE_X: i32 = 5 * 256;
pub const SLIDE_IMPULSE_Y: i32 = 4 * 256;
pub const REPEL_STRENGTH: i32 = 18;

/// Move `v` toward zero by `VELOCITY_DECAY` per tick without crossing it.
pub fn decay_velocity(v: i32, ticks: i32) -> i32 {
    let step = VELOCITY_DECAY * ticks.max(0);
    if v > 0 { (v - step).max(0) } else { (v + step).min(0) }
}

impl<M: CollisionMap> World<M> {
    fn move_query(&self, id: ActorId, full: Vec2i, size: Vec2i, mask: ItemFlags, team: CollisionTeam) -> CollisionQuery {
        CollisionQuery {
            exclude: Some(ThingId::Actor(id)),
            pos: full.full_to_real(),
            size,
            mask,
            team,
            dogfight: self.is_dogfight(),
            allies_pass: self.config.game.ally_collision != AllyCollision::Normal,
        }
    }

    fn wall_at(&self, full: Vec2i, size: Vec2i) -> bool {
        self.map.is_collision_wall_or_edge(full.full_to_real(), size)
    }

    /// Resolve a move of actor `id` to `target` (full units).
    /// Returns true when the actor's position changed.
    pub fn try_move(&mut self, id: ActorId, target: Vec2i, events: &mut Vec<GameEvent>) -> bool {
        let Some(actor) = self.actors.get(id) else { return false };
        let from = actor.pos;
        let size = actor.size;
        let team = actor.collision_team();
        let player = actor.player;
        let attacker = Attacker::of(actor);
        let melee = actor.health > 0 && self.descriptors.gun(actor.weapon.gun).is_melee;
        let mut target = target;

        // ── Phase 1: walls ──
        if self.wall_at(target, size) {
            target = reduce_axes(from, target, |p| self.wall_at(p, size));
            if target == from {
                trace!(?id, "move blocked by wall");
                return false;
            }
        }

        // ── Phase 2: entities ──
        let query = self.move_query(id, target, size, ItemFlags::IMPASSABLE, team);
        if let Some(hit) = self.map.item_in_collision(&query) {
            if let (Some(uid), ThingId::Actor(other)) = (player, hit) {
                self.rescue_prisoner(other, uid, from.full_to_real(), events);
            }

            if melee {
                let dangerous = match hit {
                    ThingId::Object(o) => self.objects.get(o).is_some_and(|o| o.flags.contains(ObjectFlags::DANGEROUS)),
                    _ => false,
                };
                if !dangerous {
                    self.melee_strike(id, hit, attacker, events);
                    return false;
                }
            }

            target = reduce_axes(from, target, |p| {
                let q = self.move_query(id, p, size, ItemFlags::IMPASSABLE, team);
                self.map.item_in_collision(&q).is_some()
            });
            if target == from || self.wall_at(target, size) {
                trace!(?id, ?hit, "move blocked by item");
                return false;
            }
        }

        // ── Phase 3: commit ──
        let real = target.full_to_real();
        for trigger in self.map.activate_triggers(real, self.mission_keys) {
            events.push(GameEvent::TriggerActivated { trigger });
        }

        if player.is_some() {
            let q = self.move_query(id, target, size, ItemFlags::CAN_BE_TAKEN, team);
            if let Some(ThingId::Pickup(p)) = self.map.item_in_collision(&q) {
                self.pickup_pickup(id, p, false, events);
            }
        }

        let in_exit = self.map.is_in_exit(real, size);
        self.map.move_item(ThingId::Actor(id), real);
        let Some(actor) = self.actors.get_mut(id) else { return false };
        actor.last_pos = actor.pos;
        actor.pos = target;
        let was_exiting = actor.action == ActorAction::Exiting;
        actor.action = if in_exit { ActorAction::Exiting } else { ActorAction::Moving };
        if in_exit && !was_exiting {
            events.push(GameEvent::ActorExiting { actor: id });
        }
        true
    }

    fn rescue_prisoner(&mut self, other: ActorId, rescuer: PlayerUid, pos: Vec2i, events: &mut Vec<GameEvent>) {
        let Some(o) = self.actors.get_mut(other) else { return };
        if !o.flags.contains(ActorFlags::PRISONER) { return; }
        o.flags.remove(ActorFlags::PRISONER);
        let objective = o.objective;
        events.push(GameEvent::MissionObjective { kind: ObjectiveKind::Rescue, objective, player: Some(rescuer), pos });
        trace!(?other, ?rescuer, "prisoner rescued");
    }

    /// Knife-style strike on whatever blocked the move. The hit sound obeys
    /// the weapon's sound lock.
    fn melee_strike(&mut self, id: ActorId, hit: ThingId, attacker: Attacker, events: &mut Vec<GameEvent>) {
        let Some(actor) = self.actors.get(id) else { return };
        let sound_ok = actor.weapon.sound_lock <= 0;
        let lock = self.descriptors.gun(actor.weapon.gun).sound_lock;
        let location = self.map.item(hit).map(|i| i.pos).unwrap_or_else(|| actor.real_pos());
        self.damage_something(hit, attacker, Vec2i::ZERO, MELEE_POWER, SpecialDamage::Knife, sound_ok, location, events);
        if sound_ok {
            if let Some(a) = self.actors.get_mut(id) {
                a.weapon.sound_lock += lock;
            }
        }
    }

    /// Drive actor `id` with one tick's command.
    ///
    /// Velocity bias is applied (and decayed) first, then the raw command is
    /// recorded and remapped if confused. Living actors may turn, shoot and
    /// walk; an actor that does none of these drops back to Idle. The
    /// combined displacement goes through `try_move`.
    pub fn command_actor(&mut self, id: ActorId, cmd: Cmd, ticks: i32, events: &mut Vec<GameEvent>) {
        let strafe = self.config.game.switch_move == SwitchMove::Strafe;
        let move_when_shooting = self.config.game.move_when_shooting;
        let Some(actor) = self.actors.get_mut(id) else { return };

        let mut move_pos = actor.pos;
        let mut shall_move = false;
        if actor.dx != 0 || actor.dy != 0 {
            shall_move = true;
            move_pos += Vec2i::new(actor.dx * ticks, actor.dy * ticks);
            actor.dx = decay_velocity(actor.dx, ticks);
            actor.dy = decay_velocity(actor.dy, ticks);
        }

        actor.last_cmd = cmd;
        let cmd = if actor.status.is_confused() { cmd.confused() } else { cmd };

        if actor.health > 0 {
            let petrified = actor.status.is_petrified();

            // Direction
            let changed_direction = !petrified
                && cmd.has_movement()
                && (!cmd.contains(Cmd::BUTTON2) || !strafe);
            if changed_direction {
                if let Some(d) = Direction::from_cmd(cmd) { actor.direction = d; }
            }

            // Shooting
            let shot = !petrified && cmd.contains(Cmd::BUTTON1);
            if !shot { actor.weapon.hold_fire(); }

            // Walking
            let can_move_when_shooting = move_when_shooting
                || !shot
                || (strafe && actor.flags.contains(ActorFlags::SPECIAL_USED));
            let moved = !petrified && cmd.has_movement() && can_move_when_shooting;
            if moved {
                let speed = self.descriptors.character(actor.character).speed * ticks;
                if cmd.contains(Cmd::LEFT) { move_pos.x -= speed; }
                else if cmd.contains(Cmd::RIGHT) { move_pos.x += speed; }
                if cmd.contains(Cmd::UP) { move_pos.y -= speed; }
                else if cmd.contains(Cmd::DOWN) { move_pos.y += speed; }
                if !actor.state.is_walking() { anim::set_state(actor, AnimState::Walking1); }
            } else if actor.state.is_walking() {
                anim::set_state(actor, AnimState::Idle);
            }

            if !changed_direction && !shot && !moved && !actor.state.is_idle() {
                anim::set_state(actor, AnimState::Idle);
            }
            if moved { shall_move = true; }
            if shot { self.shoot(id, events); }
        }

        if shall_move {
            self.try_move(id, move_pos, events);
        }
    }

    /// Fire the current gun if its lock allows. Guns with a cost charge
    /// the owning player.
    pub fn shoot(&mut self, id: ActorId, events: &mut Vec<GameEvent>) {
        let Some(actor) = self.actors.get_mut(id) else { return };
        if !actor.weapon.can_fire() { return; }
        let desc = self.descriptors.gun(actor.weapon.gun);
        actor.weapon.fire(desc);
        let (gun, pos, player, cost, melee) = (actor.weapon.gun, actor.real_pos(), actor.player, desc.cost, desc.is_melee);
        if !melee {
            events.push(GameEvent::ActorFire { actor: id, gun, pos });
        }
        if let Some(uid) = player {
            if cost != 0 {
                self.score(uid, -cost);
                events.push(GameEvent::Score { player: uid, points: -cost });
            }
        }
    }

    /// Dash in the commanded direction. Ignored while the slide lock runs
    /// or the actor is petrified.
    pub fn slide(&mut self, id: ActorId, cmd: Cmd, events: &mut Vec<GameEvent>) {
        let footsteps = self.config.sound.footsteps;
        let Some(actor) = self.actors.get_mut(id) else { return };
        if actor.slide_lock > 0 { return; }
        if actor.status.is_petrified() { return; }
        let cmd = if actor.status.is_confused() { cmd.confused() } else { cmd };

        actor.dx = if cmd.contains(Cmd::LEFT) { -SLIDE_IMPULSE_X }
            else if cmd.contains(Cmd::RIGHT) { SLIDE_IMPULSE_X }
            else { 0 };
        actor.dy = if cmd.contains(Cmd::UP) { -SLIDE_IMPULSE_Y }
            else if cmd.contains(Cmd::DOWN) { SLIDE_IMPULSE_Y }
            else { 0 };

        if footsteps {
            events.push(GameEvent::sound(SoundId::Slide, actor.real_pos()));
        }
        actor.slide_lock = SLIDE_LOCK;
    }

    /// Push actor `id` and the first same-team actor overlapping it apart.
    pub fn repel(&mut self, id: ActorId) {
        if self.config.game.ally_collision != AllyCollision::Repel { return; }
        let Some(actor) = self.actors.get(id) else { return };
        let q = self.move_query(id, actor.pos, actor.size, ItemFlags::IMPASSABLE, CollisionTeam::None);
        let Some(ThingId::Actor(other)) = self.map.item_in_collision(&q) else { return };
        let Some((a, b)) = self.actors.pair_mut(id, other) else { return };
        if a.collision_team() != b.collision_team() { return; }

        let mut v = a.pos - b.pos;
        if v.is_zero() { v = Vec2i::new(1, 0); }
        let v = v.with_length(REPEL_STRENGTH);
        a.dx += v.x;
        a.dy += v.y;
        b.dx -= v.x;
        b.dy -= v.y;
    }
}
