//! Collision predicates and the map-oracle seam.
//!
//! Everything here is pure. `sim::movement` drives the three-phase
//! resolver on top of these pieces; `sim::map::TileMap` is the stock
//! `CollisionMap` implementation.
//!
//! ## Pass-through table (IMPASSABLE items only)
//! ┌──────────────┬──────────┬──────────────────┬──────────────┐
//! │ Query team   │ Dogfight │ Allies pass      │ Same team?   │
//! ├──────────────┼──────────┼──────────────────┼──────────────┤
//! │ None         │ any      │ any              │ blocks       │
//! │ Good / Bad   │ yes      │ any              │ blocks       │
//! │ Good / Bad   │ no       │ no               │ blocks       │
//! │ Good / Bad   │ no       │ yes              │ passes       │
//! └──────────────┴──────────┴──────────────────┴──────────────┘
//! Items of a different team always block.

use super::actor::ActorId;
use super::flags::{ItemFlags, KeyFlags};
use super::geom::Vec2i;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum CollisionTeam {
    /// Collides with everything.
    None,
    Good,
    Bad,
}

/// What a spatial-index item stands for.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum ThingId {
    Actor(ActorId),
    Object(usize),
    Pickup(usize),
}

/// One rectangle in the spatial index. `pos` is the centre, in real units.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TileItem {
    pub thing: ThingId,
    pub pos: Vec2i,
    pub size: Vec2i,
    pub flags: ItemFlags,
    /// Fixed when the item is added. `World::sync_collision_team` refreshes
    /// it after the owner changes sides.
    pub team: CollisionTeam,
}

/// Parameters of an item-overlap lookup.
#[derive(Clone, Copy, Debug)]
pub struct CollisionQuery {
    /// The querying item itself; never reported.
    pub exclude: Option<ThingId>,
    pub pos: Vec2i,
    pub size: Vec2i,
    /// Only items carrying one of these flags are considered.
    pub mask: ItemFlags,
    pub team: CollisionTeam,
    pub dogfight: bool,
    /// Same-team movers overlap instead of blocking.
    pub allies_pass: bool,
}

/// Does an item of `item_team` let a `query_team` mover through?
pub fn passes_through(query_team: CollisionTeam, item_team: CollisionTeam, dogfight: bool, allies_pass: bool) -> bool {
    if query_team == CollisionTeam::None || dogfight { return false; }
    if !allies_pass { return false; }
    query_team == item_team
}

/// Centre/size rectangles overlap (touching edges do not count).
pub fn overlaps(a_pos: Vec2i, a_size: Vec2i, b_pos: Vec2i, b_size: Vec2i) -> bool {
    2 * (a_pos.x - b_pos.x).abs() < a_size.x + b_size.x
        && 2 * (a_pos.y - b_pos.y).abs() < a_size.y + b_size.y
}

/// Does `item` stop a mover described by `q`?
pub fn item_blocks(item: &TileItem, q: &CollisionQuery) -> bool {
    if Some(item.thing) == q.exclude { return false; }
    if !item.flags.intersects(q.mask) { return false; }
    if !overlaps(q.pos, q.size, item.pos, item.size) { return false; }
    if q.mask.contains(ItemFlags::IMPASSABLE)
        && passes_through(q.team, item.team, q.dogfight, q.allies_pass)
    {
        return false;
    }
    true
}

/// Shrink a blocked move `from -> to` to a single axis.
///
/// The Y-only and X-only moves are each tested with `blocked`. A blocked
/// axis is reverted. When both single-axis moves are free (a corner hit)
/// the X-only move wins. Returns `from` when nothing survives.
pub fn reduce_axes(from: Vec2i, to: Vec2i, blocked: impl Fn(Vec2i) -> bool) -> Vec2i {
    let mut pos = to;
    if blocked(Vec2i::new(from.x, to.y)) {
        pos.y = from.y;
    }
    if blocked(Vec2i::new(to.x, from.y)) {
        pos.x = from.x;
    }
    if pos.x != from.x && pos.y != from.y {
        pos.y = from.y;
    }
    pos
}

// ══════════════════════════════════════════════════════════════
// Map oracle
// ══════════════════════════════════════════════════════════════

/// Queries and spatial-index maintenance the actor core needs from a map.
/// Positions are real units; rectangles are centred on `pos`.
pub trait CollisionMap {
    /// True when the rectangle touches a non-walkable tile or leaves the map.
    fn is_collision_wall_or_edge(&self, pos: Vec2i, size: Vec2i) -> bool;

    /// First item blocking the query, in index order.
    fn item_in_collision(&self, query: &CollisionQuery) -> Option<ThingId>;

    fn add_item(&mut self, item: TileItem);
    fn move_item(&mut self, thing: ThingId, pos: Vec2i);
    fn remove_item(&mut self, thing: ThingId);
    fn set_item_flags(&mut self, thing: ThingId, flags: ItemFlags);
    fn item(&self, thing: ThingId) -> Option<&TileItem>;

    /// True when the rectangle's centre lies on an exit tile.
    fn is_in_exit(&self, pos: Vec2i, size: Vec2i) -> bool;

    /// Fire the triggers under `pos` that `keys` unlock. Returns their ids.
    fn activate_triggers(&mut self, pos: Vec2i, keys: KeyFlags) -> Vec<u32>;
}
