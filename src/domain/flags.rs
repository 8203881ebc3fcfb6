//! Bit-flag sets for actors, spatial-index items, map objects and mission keys.

use bitflags::bitflags;

bitflags! {
    /// Boolean traits of an actor. Character descriptors seed these on spawn.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ActorFlags: u32 {
        const ASBESTOS     = 1 << 0;   // immune to flame
        const IMMUNITY     = 1 << 1;   // immune to poison and confusion
        const SEETHROUGH   = 1 << 2;
        const GOOD_GUY     = 1 << 3;
        const INVULNERABLE = 1 << 4;
        const SLEEPING     = 1 << 5;
        const AWAKEALWAYS  = 1 << 6;
        const PRISONER     = 1 << 7;
        const VICTIM       = 1 << 8;   // anyone may hurt it
        const HURTALWAYS   = 1 << 9;   // its shots hurt anyone
        const VISIBLE      = 1 << 10;
        const SPECIAL_USED = 1 << 11;
    }
}

bitflags! {
    /// What a spatial-index item takes part in.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ItemFlags: u32 {
        const IMPASSABLE   = 1 << 0;
        const CAN_BE_SHOT  = 1 << 1;
        const CAN_BE_TAKEN = 1 << 2;
        const IS_WRECK     = 1 << 3;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ObjectFlags: u32 {
        const DANGEROUS = 1 << 0;   // melee attackers avoid striking it
        const DEBRIS    = 1 << 1;   // corpse left by the death sweep
    }
}

bitflags! {
    /// Mission keycards. Triggers require a subset of these.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct KeyFlags: u32 {
        const YELLOW = 1 << 0;
        const GREEN  = 1 << 1;
        const BLUE   = 1 << 2;
        const RED    = 1 << 3;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actor_flag_membership() {
        let f = ActorFlags::SLEEPING | ActorFlags::GOOD_GUY;
        assert!(f.contains(ActorFlags::GOOD_GUY));
        assert!(!f.contains(ActorFlags::INVULNERABLE));
        assert!(f.intersects(ActorFlags::SLEEPING | ActorFlags::VICTIM));
    }

    #[test]
    fn key_subset() {
        let held = KeyFlags::RED | KeyFlags::BLUE;
        assert!(held.contains(KeyFlags::RED));
        assert!(!held.contains(KeyFlags::RED | KeyFlags::GREEN));
        assert!(held.contains(KeyFlags::empty()));
    }
}
