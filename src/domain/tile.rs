//! Tile classes and their properties.
//! Properties are queried via methods, not stored as flags,
//! so tile semantics are centralized here.

/// Tile size in real (pixel) units.
pub const TILE_WIDTH: i32 = 16;
pub const TILE_HEIGHT: i32 = 12;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TileClass {
    Nothing,  // outside the playable area
    Floor,
    Room,     // floor inside a room
    Wall,
    Door,     // closed door: blocks until a trigger opens it
    Exit,     // floor that ends the mission when stood on
}

impl TileClass {
    /// Can an actor stand on this tile?
    pub fn can_walk(self) -> bool {
        matches!(self, TileClass::Floor | TileClass::Room | TileClass::Exit)
    }

    /// Does this tile block line of sight?
    pub fn is_opaque(self) -> bool {
        matches!(self, TileClass::Wall | TileClass::Door)
    }

    /// Do bullets stop on this tile?
    pub fn is_shootable(self) -> bool {
        matches!(self, TileClass::Wall | TileClass::Door)
    }

    pub fn is_room(self) -> bool {
        matches!(self, TileClass::Room | TileClass::Door)
    }

    pub fn is_exit(self) -> bool {
        matches!(self, TileClass::Exit)
    }

    /// Legend used by map diagrams:
    ///   '.'=Floor  ','=Room  '#'=Wall  'D'=Door  'X'=Exit  ' '=Nothing
    pub fn from_char(ch: char) -> TileClass {
        match ch {
            '.' => TileClass::Floor,
            ',' => TileClass::Room,
            '#' => TileClass::Wall,
            'D' => TileClass::Door,
            'X' => TileClass::Exit,
            _   => TileClass::Nothing,
        }
    }
}

impl Default for TileClass {
    fn default() -> Self {
        TileClass::Nothing
    }
}
