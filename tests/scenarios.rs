//! End-to-end scenarios driven through the public world API and `step`.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use actorcore::config::SimConfig;
use actorcore::domain::actor::{ActorId, CharacterId, Descriptors, PlayerUid};
use actorcore::domain::anim::{self, AnimState, AnimStep};
use actorcore::domain::damage::Attacker;
use actorcore::domain::direction::Cmd;
use actorcore::domain::geom::Vec2i;
use actorcore::domain::status::{SpecialDamage, MAX_POISONED_COUNT};
use actorcore::sim::event::{GameEvent, ObjectiveKind, SoundId};
use actorcore::sim::map::TileMap;
use actorcore::sim::player::{InputDevice, PlayerData};
use actorcore::sim::step::{step, ActorCommand};
use actorcore::sim::world::World;

// ── Helpers ──

fn arena() -> World {
    let map = TileMap::from_rows(&[
        "##########",
        "#........#",
        "#........#",
        "##########",
    ]);
    let mut w = World::new(map, Descriptors::standard(), SimConfig::default());
    w.add_player(PlayerData::new(PlayerUid(0), "Jones", CharacterId(0), InputDevice::Human));
    w
}

fn at(tx: i32, ty: i32) -> Vec2i {
    TileMap::tile_center(tx, ty).real_to_full()
}

fn player(w: &mut World) -> ActorId {
    w.spawn_actor(CharacterId(0), Some(PlayerUid(0)), at(1, 1))
}

fn grunt(w: &mut World, tx: i32) -> ActorId {
    w.spawn_actor(CharacterId(1), None, at(tx, 2))
}

fn health(w: &World, id: ActorId) -> i32 {
    w.actors.get(id).map(|a| a.health).unwrap_or(i32::MIN)
}

fn hit(w: &mut World, target: ActorId, attacker: Attacker, power: i32, kind: SpecialDamage, ev: &mut Vec<GameEvent>) -> bool {
    let pos = w.actors.get(target).map(|a| a.real_pos()).unwrap_or_default();
    w.damage_actor(target, attacker, Vec2i::ZERO, power, kind, true, pos, ev)
}

// ── Damage and death ──

#[test]
fn three_hits_of_four_kill_once() {
    let mut w = arena();
    let p = player(&mut w);
    let g = grunt(&mut w, 5);
    if let Some(a) = w.actors.get_mut(g) { a.health = 10; }
    let attacker = w.attacker_of(p);

    let mut ev = vec![];
    let mut seen = vec![];
    for _ in 0..3 {
        assert!(hit(&mut w, g, attacker, 4, SpecialDamage::None, &mut ev));
        seen.push(health(&w, g));
    }
    assert_eq!(seen, vec![6, 2, -2]);
    assert_eq!(w.actors.get(g).map(|a| a.dead), Some(0));

    // Further hits on the corpse are ignored.
    assert!(!hit(&mut w, g, attacker, 4, SpecialDamage::None, &mut ev));
    ev.extend(step(&mut w, &[], 1));
    assert_eq!(w.actors.get(g).map(|a| a.dead), Some(1));

    let screams = ev.iter().filter(|e| matches!(e, GameEvent::SoundAt { sound: SoundId::Kill(_), .. })).count();
    let objectives = ev.iter().filter(|e| matches!(e, GameEvent::MissionObjective { kind: ObjectiveKind::Kill, .. })).count();
    assert_eq!(screams, 1);
    assert_eq!(objectives, 1);
    assert_eq!(w.players[0].score, 12);
}

#[test]
fn dead_actors_never_walk_again() {
    let mut w = arena();
    let p = player(&mut w);
    let mut ev = vec![];
    w.injure(p, 1000, &mut ev);
    let state = w.actors.get(p).map(|a| a.state);
    let pos = w.actors.get(p).map(|a| a.pos);

    let cmd = [ActorCommand { actor: p, cmd: Cmd::RIGHT | Cmd::BUTTON1 }];
    let mut last_dead = 0;
    for _ in 0..30 {
        step(&mut w, &cmd, 1);
        let Some(a) = w.actors.get(p) else { break };
        assert_eq!(Some(a.state), state);
        assert_eq!(Some(a.pos), pos);
        assert!(a.dead >= last_dead);
        last_dead = a.dead;
    }
    assert!(last_dead > 0);
}

#[test]
fn protected_combinations_take_no_damage() {
    let mut w = arena();
    let p = player(&mut w);
    let prisoner = w.spawn_actor(CharacterId(2), None, at(8, 1));
    let g1 = grunt(&mut w, 3);
    let g2 = grunt(&mut w, 6);
    let mut ev = vec![];

    let cases = [
        (p, w.attacker_of(p)),
        (prisoner, w.attacker_of(p)),
        (g1, w.attacker_of(g2)),
    ];
    for (target, attacker) in cases {
        let before = health(&w, target);
        assert!(!hit(&mut w, target, attacker, 1000, SpecialDamage::None, &mut ev));
        assert_eq!(health(&w, target), before);
    }
    assert!(!ev.iter().any(|e| matches!(e, GameEvent::ActorKilled { .. })));
}

// ── Status effects ──

#[test]
fn poison_stacks_then_caps() {
    let mut w = arena();
    let p = player(&mut w);
    let g = grunt(&mut w, 5);
    let attacker = w.attacker_of(p);
    let mut ev = vec![];

    hit(&mut w, g, attacker, 0, SpecialDamage::Poison, &mut ev);
    hit(&mut w, g, attacker, 0, SpecialDamage::Poison, &mut ev);
    assert_eq!(w.actors.get(g).map(|a| a.status.poisoned), Some(16));

    if let Some(a) = w.actors.get_mut(g) { a.status.poisoned = 136; }
    hit(&mut w, g, attacker, 0, SpecialDamage::Poison, &mut ev);
    assert_eq!(w.actors.get(g).map(|a| a.status.poisoned), Some(MAX_POISONED_COUNT));

    for _ in 0..50 {
        hit(&mut w, g, attacker, 0, SpecialDamage::Poison, &mut ev);
    }
    assert_eq!(w.actors.get(g).map(|a| a.status.poisoned), Some(140));
}

// ── Animation ──

#[test]
fn walking_overshoot_restarts_the_next_frame() {
    let mut w = arena();
    let p = player(&mut w);
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let Some(a) = w.actors.get_mut(p) else { panic!("player missing") };
    anim::set_state(a, AnimState::Walking1);

    let outcome = anim::advance(a, 5, false, &mut rng);
    assert_eq!(outcome, AnimStep::Transitioned { footstep: false });
    assert_eq!(a.state, AnimState::Walking2);
    assert_eq!(a.state_counter, 4);
}

// ── Movement ──

#[test]
fn rejected_moves_stay_rejected() {
    let mut w = arena();
    let p = player(&mut w);
    let into_wall = at(0, 1);
    let mut ev = vec![];

    let first = w.try_move(p, into_wall, &mut ev);
    let pos = w.actors.get(p).map(|a| a.pos);
    let second = w.try_move(p, into_wall, &mut ev);
    assert!(!first);
    assert_eq!(first, second);
    assert_eq!(w.actors.get(p).map(|a| a.pos), pos);
    assert!(ev.is_empty());
}

#[test]
fn confused_player_walks_backwards() {
    let mut w = arena();
    let p = w.spawn_actor(CharacterId(0), Some(PlayerUid(0)), at(4, 1));
    if let Some(a) = w.actors.get_mut(p) { a.status.confused = 100; }
    let x0 = w.actors.get(p).map(|a| a.pos.x).unwrap_or(0);

    step(&mut w, &[ActorCommand { actor: p, cmd: Cmd::RIGHT }], 1);
    let a = w.actors.get(p).expect("alive");
    assert!(a.pos.x < x0);
    assert_eq!(a.last_cmd, Cmd::RIGHT);
}
