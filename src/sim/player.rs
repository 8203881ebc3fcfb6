//! Player records and the queries built on them.
//!
//! A record points at its actor through a weak `Option<ActorId>`; every
//! query resolves it through the registry and treats a miss as "no actor".

use crate::domain::actor::{ActorId, CharacterId, PlayerUid};
use crate::domain::anim::DEATH_MAX;
use crate::domain::collision::CollisionMap;
use crate::domain::geom::Vec2i;
use super::event::GameEvent;
use super::world::World;

pub const DEFAULT_MAX_HEALTH: i32 = 200;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum InputDevice {
    Human,
    Ai,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AliveFilter {
    Any,
    Alive,
    AliveOrDying,
}

#[derive(Clone, Debug)]
pub struct PlayerData {
    pub uid: PlayerUid,
    pub name: String,
    pub character: CharacterId,
    pub actor: Option<ActorId>,
    pub lives: i32,
    pub score: i32,
    pub total_score: i32,
    pub is_local: bool,
    pub input: InputDevice,
    pub max_health: i32,
}

impl PlayerData {
    pub fn new(uid: PlayerUid, name: &str, character: CharacterId, input: InputDevice) -> Self {
        PlayerData {
            uid,
            name: name.to_string(),
            character,
            actor: None,
            lives: 1,
            score: 0,
            total_score: 0,
            is_local: true,
            input,
            max_health: DEFAULT_MAX_HEALTH,
        }
    }

    pub fn is_human(&self) -> bool {
        self.input == InputDevice::Human
    }
}

impl<M: CollisionMap> World<M> {
    /// Has an actor whose death counter has not started.
    pub fn is_player_alive(&self, p: &PlayerData) -> bool {
        p.actor.and_then(|id| self.actors.get(id)).is_some_and(|a| a.dead == 0)
    }

    /// Has an actor that is alive or still playing its death animation.
    pub fn is_player_alive_or_dying(&self, p: &PlayerData) -> bool {
        p.actor.and_then(|id| self.actors.get(id)).is_some_and(|a| a.dead <= DEATH_MAX)
    }

    fn player_matches(&self, p: &PlayerData, alive: AliveFilter, human: bool, local: bool) -> bool {
        let life = match alive {
            AliveFilter::Any => true,
            AliveFilter::Alive => self.is_player_alive(p),
            AliveFilter::AliveOrDying => self.is_player_alive_or_dying(p),
        };
        life && (!human || p.is_human()) && (!local || p.is_local)
    }

    pub fn num_players(&self, alive: AliveFilter, human: bool, local: bool) -> usize {
        self.players.iter().filter(|p| self.player_matches(p, alive, human, local)).count()
    }

    /// First matching record; `alive` accepts dying players too.
    pub fn first_player(&self, alive: bool, human: bool, local: bool) -> Option<&PlayerData> {
        let filter = if alive { AliveFilter::AliveOrDying } else { AliveFilter::Any };
        self.players.iter().find(|p| self.player_matches(p, filter, human, local))
    }

    /// Bounding box (real units) of the local living players. Only humans
    /// count while any human is alive or dying. `(ZERO, ZERO)` when empty.
    pub fn players_bounding_rectangle(&self) -> (Vec2i, Vec2i) {
        let humans_only = self.num_players(AliveFilter::AliveOrDying, true, false) > 0;
        let mut bounds: Option<(Vec2i, Vec2i)> = None;
        for p in self.players.iter().filter(|p| p.is_local) {
            let counts = if humans_only { p.is_human() && self.is_player_alive(p) } else { self.is_player_alive(p) };
            if !counts { continue; }
            let Some(a) = p.actor.and_then(|id| self.actors.get(id)) else { continue };
            let pos = a.real_pos();
            bounds = Some(match bounds {
                None => (pos, pos),
                Some((lo, hi)) => (
                    Vec2i::new(lo.x.min(pos.x), lo.y.min(pos.y)),
                    Vec2i::new(hi.x.max(pos.x), hi.y.max(pos.y)),
                ),
            });
        }
        bounds.unwrap_or((Vec2i::ZERO, Vec2i::ZERO))
    }

    pub fn players_midpoint(&self) -> Vec2i {
        let (lo, hi) = self.players_bounding_rectangle();
        (lo + hi).scale_div(2)
    }

    /// Credit `points` to a player's mission and campaign totals.
    pub fn score(&mut self, uid: PlayerUid, points: i32) {
        if let Some(p) = self.player_mut(uid) {
            p.score += points;
            p.total_score += points;
        }
    }

    /// Drop a player record and destroy its actor.
    pub fn remove_player(&mut self, uid: PlayerUid, events: &mut Vec<GameEvent>) {
        let Some(i) = self.players.iter().position(|p| p.uid == uid) else { return };
        if let Some(id) = self.players[i].actor {
            self.remove_actor(id, events);
        }
        self.players.remove(i);
        tracing::debug!(?uid, "player removed");
    }

    pub fn all_players_dead_and_no_lives(&self) -> bool {
        self.players.iter().all(|p| !self.is_player_alive(p) && p.lives <= 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::domain::actor::Descriptors;
    use crate::sim::map::TileMap;

    fn world_with(players: &[(u32, InputDevice)]) -> World {
        let map = TileMap::from_rows(&["........", "........"]);
        let mut w = World::new(map, Descriptors::standard(), SimConfig::default());
        for &(uid, input) in players {
            w.add_player(PlayerData::new(PlayerUid(uid), "p", CharacterId(0), input));
        }
        w
    }

    fn spawn_for(w: &mut World, uid: u32, tile_x: i32) -> ActorId {
        w.spawn_actor(CharacterId(0), Some(PlayerUid(uid)), TileMap::tile_center(tile_x, 0).real_to_full())
    }

    #[test]
    fn alive_and_dying_states() {
        let mut w = world_with(&[(0, InputDevice::Human)]);
        assert!(!w.is_player_alive(&w.players[0]));
        let id = spawn_for(&mut w, 0, 1);
        assert!(w.is_player_alive(&w.players[0]));
        if let Some(a) = w.actors.get_mut(id) { a.dead = 3; }
        assert!(!w.is_player_alive(&w.players[0]));
        assert!(w.is_player_alive_or_dying(&w.players[0]));
        if let Some(a) = w.actors.get_mut(id) { a.dead = DEATH_MAX + 1; }
        assert!(!w.is_player_alive_or_dying(&w.players[0]));
    }

    #[test]
    fn counting_filters() {
        let mut w = world_with(&[(0, InputDevice::Human), (1, InputDevice::Ai), (2, InputDevice::Human)]);
        w.players[2].is_local = false;
        spawn_for(&mut w, 0, 0);
        spawn_for(&mut w, 1, 1);
        assert_eq!(w.num_players(AliveFilter::Any, false, false), 3);
        assert_eq!(w.num_players(AliveFilter::Alive, false, false), 2);
        assert_eq!(w.num_players(AliveFilter::Alive, true, false), 1);
        assert_eq!(w.num_players(AliveFilter::Any, false, true), 2);
        assert_eq!(w.first_player(true, false, false).map(|p| p.uid), Some(PlayerUid(0)));
        assert_eq!(w.first_player(false, true, false).map(|p| p.uid), Some(PlayerUid(0)));
    }

    #[test]
    fn bounding_box_prefers_humans() {
        let mut w = world_with(&[(0, InputDevice::Human), (1, InputDevice::Ai)]);
        spawn_for(&mut w, 0, 1);
        spawn_for(&mut w, 1, 5);
        let c1 = TileMap::tile_center(1, 0);
        assert_eq!(w.players_bounding_rectangle(), (c1, c1));
        assert_eq!(w.players_midpoint(), c1);

        // Human gone: the AI now counts.
        let mut ev = vec![];
        w.remove_player(PlayerUid(0), &mut ev);
        let c5 = TileMap::tile_center(5, 0);
        assert_eq!(w.players_bounding_rectangle(), (c5, c5));
    }

    #[test]
    fn empty_bounds_are_zero() {
        let w = world_with(&[]);
        assert_eq!(w.players_bounding_rectangle(), (Vec2i::ZERO, Vec2i::ZERO));
        assert!(w.all_players_dead_and_no_lives());
    }

    #[test]
    fn score_and_game_over() {
        let mut w = world_with(&[(0, InputDevice::Human)]);
        w.score(PlayerUid(0), 30);
        w.score(PlayerUid(0), -5);
        assert_eq!(w.players[0].score, 25);
        assert_eq!(w.players[0].total_score, 25);

        assert!(!w.all_players_dead_and_no_lives());
        w.players[0].lives = 0;
        assert!(w.all_players_dead_and_no_lives());
        spawn_for(&mut w, 0, 0);
        assert!(!w.all_players_dead_and_no_lives());
    }

    #[test]
    fn remove_player_destroys_actor() {
        let mut w = world_with(&[(0, InputDevice::Human)]);
        let id = spawn_for(&mut w, 0, 0);
        let mut ev = vec![];
        w.remove_player(PlayerUid(0), &mut ev);
        assert!(w.players.is_empty());
        assert!(!w.actors.contains(id));
        // Unknown uid is a no-op.
        w.remove_player(PlayerUid(9), &mut ev);
    }
}
