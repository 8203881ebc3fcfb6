//! TileMap: the stock grid implementation of `CollisionMap`.
//!
//! ## Tile layers
//!
//! Two tile layers, as with any runtime-mutable level:
//!   - `base_tiles`: the map as built. Never mutated afterwards.
//!   - `tiles`     : effective terrain (base + opened doors).
//!
//! All tile mutations go through `set_tile()`; `reset()` restores the base.
//!
//! ## Spatial index
//!
//! A flat list of `TileItem`s in insertion order. Lookups are linear
//! AABB scans, so "first blocking item" is well defined and stable.
//! Out-of-bounds cells count as walls.

use tracing::trace;

use crate::domain::collision::{item_blocks, CollisionMap, CollisionQuery, ThingId, TileItem};
use crate::domain::flags::{ItemFlags, KeyFlags};
use crate::domain::geom::Vec2i;
use crate::domain::tile::{TileClass, TILE_HEIGHT, TILE_WIDTH};

/// A pressure plate: stepping on `tile` with the `required` keys opens
/// every door in `opens`.
#[derive(Clone, Debug)]
pub struct Trigger {
    pub id: u32,
    pub tile: Vec2i,
    pub required: KeyFlags,
    pub opens: Vec<Vec2i>,
    pub repeatable: bool,
    pub fired: bool,
}

#[derive(Clone, Debug, Default)]
pub struct TileMap {
    // ── Tile layers ──
    base_tiles: Vec<Vec<TileClass>>,
    tiles: Vec<Vec<TileClass>>,
    pub width: i32,
    pub height: i32,

    // ── Spatial index ──
    items: Vec<TileItem>,

    // ── Triggers ──
    pub triggers: Vec<Trigger>,
}

impl TileMap {
    pub fn new(width: i32, height: i32, fill: TileClass) -> Self {
        let tiles = vec![vec![fill; width.max(0) as usize]; height.max(0) as usize];
        TileMap { base_tiles: tiles.clone(), tiles, width, height, items: vec![], triggers: vec![] }
    }

    /// Build from a diagram, one string per row (see `TileClass::from_char`).
    /// Short rows are padded with `Nothing`.
    pub fn from_rows(rows: &[&str]) -> Self {
        let height = rows.len() as i32;
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as i32;
        let mut map = TileMap::new(width, height, TileClass::Nothing);
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                map.base_tiles[y][x] = TileClass::from_char(ch);
            }
        }
        map.tiles = map.base_tiles.clone();
        map
    }

    /// Effective tile at a tile coordinate. Out of bounds reads as Wall.
    #[inline]
    pub fn tile_at(&self, x: i32, y: i32) -> TileClass {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return TileClass::Wall;
        }
        self.tiles[y as usize][x as usize]
    }

    #[inline]
    pub fn set_tile(&mut self, x: i32, y: i32, tile: TileClass) {
        if x < 0 || y < 0 || x >= self.width || y >= self.height { return; }
        self.tiles[y as usize][x as usize] = tile;
    }

    /// Restore the as-built terrain and forget every trigger firing.
    pub fn reset(&mut self) {
        self.tiles = self.base_tiles.clone();
        for t in &mut self.triggers { t.fired = false; }
    }

    pub fn add_trigger(&mut self, trigger: Trigger) {
        self.triggers.push(trigger);
    }

    /// Real-unit centre of a tile, handy for placing things in tests and hosts.
    pub fn tile_center(x: i32, y: i32) -> Vec2i {
        Vec2i::new(x * TILE_WIDTH + TILE_WIDTH / 2, y * TILE_HEIGHT + TILE_HEIGHT / 2)
    }

    pub fn items(&self) -> &[TileItem] {
        &self.items
    }

    fn index_of(&self, thing: ThingId) -> Option<usize> {
        self.items.iter().position(|i| i.thing == thing)
    }
}

/// Inclusive tile range covered by a centred rectangle.
fn tile_span(pos: Vec2i, size: Vec2i) -> (Vec2i, Vec2i) {
    let x0 = pos.x - size.x / 2;
    let y0 = pos.y - size.y / 2;
    let lo = Vec2i::new(x0, y0).real_to_tile();
    let hi = Vec2i::new(x0 + size.x - 1, y0 + size.y - 1).real_to_tile();
    (lo, hi)
}

impl CollisionMap for TileMap {
    fn is_collision_wall_or_edge(&self, pos: Vec2i, size: Vec2i) -> bool {
        let (lo, hi) = tile_span(pos, size);
        for ty in lo.y..=hi.y {
            for tx in lo.x..=hi.x {
                if !self.tile_at(tx, ty).can_walk() { return true; }
            }
        }
        false
    }

    fn item_in_collision(&self, query: &CollisionQuery) -> Option<ThingId> {
        self.items.iter().find(|i| item_blocks(i, query)).map(|i| i.thing)
    }

    fn add_item(&mut self, item: TileItem) {
        if let Some(i) = self.index_of(item.thing) {
            self.items[i] = item;
        } else {
            self.items.push(item);
        }
    }

    fn move_item(&mut self, thing: ThingId, pos: Vec2i) {
        if let Some(i) = self.index_of(thing) {
            self.items[i].pos = pos;
        }
    }

    fn remove_item(&mut self, thing: ThingId) {
        if let Some(i) = self.index_of(thing) {
            self.items.remove(i);
        }
    }

    fn set_item_flags(&mut self, thing: ThingId, flags: ItemFlags) {
        if let Some(i) = self.index_of(thing) {
            self.items[i].flags = flags;
        }
    }

    fn item(&self, thing: ThingId) -> Option<&TileItem> {
        self.items.iter().find(|i| i.thing == thing)
    }

    fn is_in_exit(&self, pos: Vec2i, _size: Vec2i) -> bool {
        let t = pos.real_to_tile();
        self.tile_at(t.x, t.y).is_exit()
    }

    fn activate_triggers(&mut self, pos: Vec2i, keys: KeyFlags) -> Vec<u32> {
        let tile = pos.real_to_tile();
        let mut fired = vec![];
        let mut doors = vec![];
        for t in &mut self.triggers {
            if t.tile != tile { continue; }
            if t.fired && !t.repeatable { continue; }
            if !keys.contains(t.required) { continue; }
            t.fired = true;
            fired.push(t.id);
            doors.extend(t.opens.iter().copied());
        }
        for d in doors {
            if self.tile_at(d.x, d.y) == TileClass::Door {
                self.set_tile(d.x, d.y, TileClass::Floor);
            }
        }
        if !fired.is_empty() { trace!(?tile, ?fired, "triggers fired"); }
        fired
    }
}
