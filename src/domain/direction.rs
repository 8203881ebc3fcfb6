//! Compass directions and the per-tick command bits.

use bitflags::bitflags;

use super::geom::Vec2i;

/// Eight compass directions, clockwise from Up.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Direction {
    Up,
    UpRight,
    Right,
    DownRight,
    Down,
    DownLeft,
    Left,
    UpLeft,
}

pub const DIRECTION_COUNT: usize = 8;

impl Direction {
    pub const ALL: [Direction; DIRECTION_COUNT] = [
        Direction::Up,
        Direction::UpRight,
        Direction::Right,
        Direction::DownRight,
        Direction::Down,
        Direction::DownLeft,
        Direction::Left,
        Direction::UpLeft,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(i: usize) -> Direction {
        debug_assert!(i < DIRECTION_COUNT, "direction index {i} out of range");
        Direction::ALL[i % DIRECTION_COUNT]
    }

    /// Rotate by `steps` eighths of a turn (positive = clockwise).
    pub fn rotate(self, steps: i32) -> Direction {
        let i = (self.index() as i32 + steps).rem_euclid(DIRECTION_COUNT as i32);
        Direction::from_index(i as usize)
    }

    /// Direction implied by the movement bits. Horizontal bits decide the
    /// diagonal; `None` when no movement bit is set.
    pub fn from_cmd(cmd: Cmd) -> Option<Direction> {
        if cmd.contains(Cmd::LEFT) {
            if cmd.contains(Cmd::UP) { Some(Direction::UpLeft) }
            else if cmd.contains(Cmd::DOWN) { Some(Direction::DownLeft) }
            else { Some(Direction::Left) }
        } else if cmd.contains(Cmd::RIGHT) {
            if cmd.contains(Cmd::UP) { Some(Direction::UpRight) }
            else if cmd.contains(Cmd::DOWN) { Some(Direction::DownRight) }
            else { Some(Direction::Right) }
        } else if cmd.contains(Cmd::UP) {
            Some(Direction::Up)
        } else if cmd.contains(Cmd::DOWN) {
            Some(Direction::Down)
        } else {
            None
        }
    }

    /// Unit step in screen space (y grows downward).
    pub fn to_vec(self) -> Vec2i {
        match self {
            Direction::Up        => Vec2i::new(0, -1),
            Direction::UpRight   => Vec2i::new(1, -1),
            Direction::Right     => Vec2i::new(1, 0),
            Direction::DownRight => Vec2i::new(1, 1),
            Direction::Down      => Vec2i::new(0, 1),
            Direction::DownLeft  => Vec2i::new(-1, 1),
            Direction::Left      => Vec2i::new(-1, 0),
            Direction::UpLeft    => Vec2i::new(-1, -1),
        }
    }
}

bitflags! {
    /// Input for one tick. Bit positions matter: `confused` relies on
    /// LEFT/RIGHT and UP/DOWN being adjacent pairs.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Cmd: u32 {
        const LEFT    = 1;
        const RIGHT   = 2;
        const UP      = 4;
        const DOWN    = 8;
        const BUTTON1 = 16;
        const BUTTON2 = 32;
    }
}

impl Cmd {
    pub const MOVEMENT: Cmd = Cmd::LEFT.union(Cmd::RIGHT).union(Cmd::UP).union(Cmd::DOWN);

    pub fn has_movement(self) -> bool {
        self.intersects(Cmd::MOVEMENT)
    }

    /// Swap left/right and up/down, keep every other bit.
    pub fn confused(self) -> Cmd {
        let b = self.bits();
        Cmd::from_bits_retain(((b & 5) << 1) | ((b & 10) >> 1) | (b & 0xF0))
    }
}
