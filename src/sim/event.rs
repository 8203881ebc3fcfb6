//! Events emitted during a simulation step.
//! The host drains them once per step for sound, HUD and mission logic.

use crate::domain::actor::{ActorId, AmmoId, GunId, PlayerUid};
use crate::domain::flags::KeyFlags;
use crate::domain::geom::Vec2i;

pub use crate::domain::sound::{SoundId, SCREAM_COUNT};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum ObjectiveKind {
    Kill,
    Collect,
    Rescue,
    Destroy,
}

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    Score { player: PlayerUid, points: i32 },
    /// `pos` is in real units; `distance_plus` widens the audible range.
    SoundAt { sound: SoundId, pos: Vec2i, distance_plus: i32 },
    MissionObjective { kind: ObjectiveKind, objective: Option<usize>, player: Option<PlayerUid>, pos: Vec2i },
    ActorHeal { actor: ActorId, player: Option<PlayerUid>, amount: i32, is_random_spawned: bool },
    ActorKilled { actor: ActorId, player: Option<PlayerUid> },
    ActorRemoved { actor: ActorId },
    AddKeys { keys: KeyFlags, pos: Vec2i },
    AddAmmo { actor: ActorId, ammo: AmmoId, amount: i32 },
    ReplaceGun { actor: ActorId, gun: GunId },
    RemovePickup { pickup: usize },
    TriggerActivated { trigger: u32 },
    ActorFire { actor: ActorId, gun: GunId, pos: Vec2i },
    ObjectDestroyed { object: usize },
    ActorExiting { actor: ActorId },
}

impl GameEvent {
    pub fn sound(sound: SoundId, pos: Vec2i) -> Self {
        GameEvent::SoundAt { sound, pos, distance_plus: 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sound;

    #[test]
    fn domain_cues_become_positional_events() {
        let at = Vec2i::new(40, 6);
        assert_eq!(
            GameEvent::sound(sound::SoundId::Key, at),
            GameEvent::SoundAt { sound: SoundId::Key, pos: at, distance_plus: 0 },
        );
        assert_eq!(SCREAM_COUNT, sound::SCREAM_COUNT);
    }
}
