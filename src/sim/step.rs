//! The step function: advances the world by `ticks`.
//!
//! Processing order:
//!   1. Commands    (every live actor: slide, velocity bias, turn, shoot, walk)
//!   2. Queued hits (bullets and explosions reported by the host)
//!   3. Actor update, newest actor first:
//!        status decay (poison injury) → weapon cooldowns → slide lock
//!        → state machine → death sweep → ally repel
//!
//! Effects apply immediately: an actor updated later in the same step
//! sees everything earlier actors did to it.

use std::collections::HashMap;

use tracing::debug;

use crate::config::SwitchMove;
use crate::domain::actor::ActorId;
use crate::domain::anim::{self, AnimStep, DEATH_MAX, FOOTSTEP_DISTANCE_PLUS};
use crate::domain::collision::{CollisionMap, ThingId};
use crate::domain::direction::Cmd;
use crate::domain::flags::ItemFlags;
use crate::domain::status;
use super::event::{GameEvent, SoundId};
use super::world::World;

/// Input for one actor this step. Actors without a command get an empty one.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ActorCommand {
    pub actor: ActorId,
    pub cmd: Cmd,
}

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn step<M: CollisionMap>(world: &mut World<M>, commands: &[ActorCommand], ticks: i32) -> Vec<GameEvent> {
    let mut events: Vec<GameEvent> = Vec::new();
    if ticks <= 0 { return events; }
    world.tick += ticks as u64;

    resolve_commands(world, commands, ticks, &mut events);
    resolve_pending_hits(world, &mut events);
    update_all_actors(world, ticks, &mut events);

    events
}

// ══════════════════════════════════════════════════════════════
// Commands
// ══════════════════════════════════════════════════════════════

fn resolve_commands<M: CollisionMap>(world: &mut World<M>, commands: &[ActorCommand], ticks: i32, events: &mut Vec<GameEvent>) {
    let by_actor: HashMap<ActorId, Cmd> = commands.iter().map(|c| (c.actor, c.cmd)).collect();
    let slide_on_button2 = world.config.game.switch_move == SwitchMove::Slide;

    for id in world.actors.ids() {
        let cmd = by_actor.get(&id).copied().unwrap_or_default();
        if slide_on_button2 && cmd.contains(Cmd::BUTTON2) && cmd.has_movement() {
            world.slide(id, cmd, events);
        }
        world.command_actor(id, cmd, ticks, events);
    }
}

// ══════════════════════════════════════════════════════════════
// Queued hits
// ══════════════════════════════════════════════════════════════

fn resolve_pending_hits<M: CollisionMap>(world: &mut World<M>, events: &mut Vec<GameEvent>) {
    let hits = std::mem::take(&mut world.pending_hits);
    for hit in hits {
        world.apply_pending_hit(hit, events);
    }
}

// ══════════════════════════════════════════════════════════════
// Per-actor update
// ══════════════════════════════════════════════════════════════

fn update_all_actors<M: CollisionMap>(world: &mut World<M>, ticks: i32, events: &mut Vec<GameEvent>) {
    for id in world.actors.ids() {
        update_actor_state(world, id, ticks, events);

        let Some(actor) = world.actors.get(id) else { continue };
        if actor.dead > DEATH_MAX {
            let pos = actor.real_pos();
            world.add_debris(pos);
            world.remove_actor(id, events);
            debug!(?id, "corpse swept");
        } else {
            world.repel(id);
        }
    }
}

fn update_actor_state<M: CollisionMap>(world: &mut World<M>, id: ActorId, ticks: i32, events: &mut Vec<GameEvent>) {
    let Some(actor) = world.actors.get_mut(id) else { return };
    let poison = status::advance(actor, ticks);
    if poison > 0 {
        world.injure(id, poison, events);
    }

    let footsteps = world.config.sound.footsteps;
    let Some(actor) = world.actors.get_mut(id) else { return };
    actor.weapon.update(ticks);
    actor.slide_lock = (actor.slide_lock - ticks).max(0);

    match anim::advance(actor, ticks, footsteps, &mut world.rng) {
        AnimStep::Waiting => {}
        AnimStep::Dying => {
            // Corpses stop blocking and can no longer be shot.
            world.map.set_item_flags(ThingId::Actor(id), ItemFlags::empty());
        }
        AnimStep::Transitioned { footstep } => {
            if footstep {
                events.push(GameEvent::SoundAt {
                    sound: SoundId::Footstep,
                    pos: actor.real_pos(),
                    distance_plus: FOOTSTEP_DISTANCE_PLUS,
                });
            }
        }
    }
}
