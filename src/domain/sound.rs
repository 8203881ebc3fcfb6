//! Sound cues the core asks the host to play. Playback lives with the host.

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum SoundId {
    Footstep,
    Slide,
    Pickup,
    AmmoPickup,
    Key,
    /// One of the four death screams, rotated in order.
    Kill(u8),
    Hahaha,
    HitFlesh,
    HitHard,
    HitFire,
    HitGas,
    KnifeFlesh,
}

pub const SCREAM_COUNT: u8 = 4;
