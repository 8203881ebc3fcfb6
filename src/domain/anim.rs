//! Actor animation/action state machine.
//!
//! ## Transition table
//! ┌────────────┬────────────┬──────────┐
//! │ State      │ Next       │ Duration │
//! ├────────────┼────────────┼──────────┤
//! │ Idle       │ IdleL/IdleR│ 90       │  (random 50/50, unless petrified)
//! │ IdleLeft   │ Idle       │ 60       │
//! │ IdleRight  │ Idle       │ 60       │
//! │ Walking1   │ Walking2   │ 4        │
//! │ Walking2   │ Walking3   │ 4        │
//! │ Walking3   │ Walking4   │ 4        │
//! │ Walking4   │ Walking1   │ 4        │
//! └────────────┴────────────┴──────────┘
//!
//! Dying is not a table state: once health <= 0 the death counter
//! (`Actor::dead`) takes over and grows by one every `DEATH_FRAME_TICKS`.

use rand::RngCore;

use super::actor::Actor;
use super::direction::Direction;

/// Last death-animation frame; the registry removes the corpse after it.
pub const DEATH_MAX: u32 = 9;
pub const DEATH_FRAME_TICKS: i32 = 4;
pub const SOUND_LOCK_FOOTSTEP: i32 = 4;
pub const FOOTSTEP_DISTANCE_PLUS: i32 = 380;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum AnimState {
    Idle,
    IdleLeft,
    IdleRight,
    Walking1,
    Walking2,
    Walking3,
    Walking4,
}

impl AnimState {
    /// Minimum display time in ticks.
    pub fn duration(self) -> i32 {
        match self {
            AnimState::Idle => 90,
            AnimState::IdleLeft | AnimState::IdleRight => 60,
            AnimState::Walking1 | AnimState::Walking2
            | AnimState::Walking3 | AnimState::Walking4 => 4,
        }
    }

    /// Fixed successor. Idle maps to itself; the random head turn is
    /// decided in `advance`.
    pub fn next(self) -> AnimState {
        match self {
            AnimState::Idle => AnimState::Idle,
            AnimState::IdleLeft | AnimState::IdleRight => AnimState::Idle,
            AnimState::Walking1 => AnimState::Walking2,
            AnimState::Walking2 => AnimState::Walking3,
            AnimState::Walking3 => AnimState::Walking4,
            AnimState::Walking4 => AnimState::Walking1,
        }
    }

    pub fn is_walking(self) -> bool {
        matches!(self, AnimState::Walking1 | AnimState::Walking2 | AnimState::Walking3 | AnimState::Walking4)
    }

    pub fn is_idle(self) -> bool {
        matches!(self, AnimState::Idle | AnimState::IdleLeft | AnimState::IdleRight)
    }
}

/// Outcome of one `advance` call.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AnimStep {
    /// Countdown still running.
    Waiting,
    /// Death counter advanced; the caller must make the footprint inert.
    Dying,
    /// Moved to the next state; `footstep` asks for a footstep sound.
    Transitioned { footstep: bool },
}

pub fn set_state(actor: &mut Actor, state: AnimState) {
    actor.state = state;
    actor.state_counter = state.duration();
}

pub fn advance(actor: &mut Actor, ticks: i32, footsteps: bool, rng: &mut impl RngCore) -> AnimStep {
    actor.state_counter = (actor.state_counter - ticks).max(0);
    if actor.state_counter > 0 {
        return AnimStep::Waiting;
    }

    if actor.health <= 0 {
        actor.dead += 1;
        actor.state_counter = DEATH_FRAME_TICKS;
        return AnimStep::Dying;
    }

    let mut footstep = false;
    if footsteps && actor.state.is_walking() && actor.sound_lock <= 0 {
        footstep = true;
        actor.sound_lock = SOUND_LOCK_FOOTSTEP;
    }

    if actor.state == AnimState::Idle && !actor.status.is_petrified() {
        let turn = if rng.next_u32() & 1 != 0 { AnimState::IdleLeft } else { AnimState::IdleRight };
        set_state(actor, turn);
    } else {
        set_state(actor, actor.state.next());
    }

    actor.sound_lock = (actor.sound_lock - ticks).max(0);
    AnimStep::Transitioned { footstep }
}

/// Where the head looks: idle head turns rotate it one step off the body.
pub fn head_direction(actor: &Actor) -> Direction {
    match actor.state {
        AnimState::IdleLeft => actor.direction.rotate(-1),
        AnimState::IdleRight => actor.direction.rotate(1),
        _ => actor.direction,
    }
}

/// Zero-based death-animation frame while the corpse is still animating.
pub fn death_frame(actor: &Actor) -> Option<u32> {
    if actor.dead >= 1 && actor.dead <= DEATH_MAX { Some(actor.dead - 1) } else { None }
}
