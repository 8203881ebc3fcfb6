/// Headless harness: runs a small skirmish through the step loop and logs
/// what the host would have rendered or played.

use std::time::{Duration, Instant};

use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use actorcore::config::SimConfig;
use actorcore::domain::actor::{AmmoId, CharacterId, Descriptors, PlayerUid};
use actorcore::domain::direction::Cmd;
use actorcore::domain::flags::KeyFlags;
use actorcore::domain::geom::Vec2i;
use actorcore::domain::pickup::{Pickup, PickupKind};
use actorcore::sim::event::{GameEvent, SoundId};
use actorcore::sim::map::{TileMap, Trigger};
use actorcore::sim::player::{AliveFilter, InputDevice, PlayerData};
use actorcore::sim::step::{self, ActorCommand};
use actorcore::sim::world::World;

const TICKS_PER_STEP: i32 = 1;
const MAX_STEPS: u32 = 600;

const ARENA: [&str; 8] = [
    "################",
    "#..............#",
    "#..,,,,...,,,..#",
    "#..,,,,...,,,..#",
    "#.......#......D",
    "#..............#",
    "#.............X#",
    "################",
];

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = SimConfig::load();
    info!(seed = config.sim.seed, mode = ?config.sim.mode, "starting harness");

    let mut world = build_world(config);
    let started = Instant::now();
    let mut tally = Tally::default();

    for _ in 0..MAX_STEPS {
        let commands = plan_commands(&world);
        let events = step::step(&mut world, &commands, TICKS_PER_STEP);
        tally.record(&events);
        if world.all_players_dead_and_no_lives() || tally.exited { break; }
    }

    report(&world, &tally, started.elapsed());
}

fn build_world(config: SimConfig) -> World {
    let mut map = TileMap::from_rows(&ARENA);
    map.add_trigger(Trigger {
        id: 1,
        tile: Vec2i::new(14, 4),
        required: KeyFlags::RED,
        opens: vec![Vec2i::new(15, 4)],
        repeatable: false,
        fired: false,
    });

    let mut world = World::new(map, Descriptors::standard(), config);
    world.add_player(PlayerData::new(PlayerUid(0), "Jones", CharacterId(0), InputDevice::Human));
    world.spawn_actor(CharacterId(0), Some(PlayerUid(0)), tile(2, 5));

    for (tx, ty) in [(6, 1), (11, 5), (12, 1)] {
        world.spawn_actor(CharacterId(1), None, tile(tx, ty));
    }
    world.spawn_actor(CharacterId(2), None, tile(9, 6));

    world.add_pickup(pickup(PickupKind::Jewel { score: 50 }, 4, 5));
    world.add_pickup(pickup(PickupKind::Ammo { ammo: AmmoId(0), amount: 20 }, 8, 5));
    world.add_pickup(pickup(PickupKind::Keycard { keys: KeyFlags::RED }, 13, 5));
    world
}

fn tile(tx: i32, ty: i32) -> Vec2i {
    TileMap::tile_center(tx, ty).real_to_full()
}

fn pickup(kind: PickupKind, tx: i32, ty: i32) -> Pickup {
    Pickup {
        id: 0,
        kind,
        pos: TileMap::tile_center(tx, ty),
        picked_up: false,
        is_random_spawned: false,
        objective: None,
    }
}

// ── Scripted input ──

/// The player walks the bottom corridor toward the exit, firing whenever a
/// living enemy shares its row. NPCs stand still.
fn plan_commands(world: &World) -> Vec<ActorCommand> {
    let mut commands = vec![];
    for p in &world.players {
        let Some(actor) = p.actor.and_then(|id| world.actors.get(id)) else { continue };
        if !actor.is_alive() { continue; }
        let pos = actor.real_pos();
        let exit = TileMap::tile_center(14, 6);

        let mut cmd = Cmd::empty();
        if pos.x < exit.x - 2 { cmd |= Cmd::RIGHT; }
        if pos.y < exit.y - 2 { cmd |= Cmd::DOWN; }
        let in_line = world.actors.iter().any(|a| {
            !a.is_player() && !a.is_good() && a.is_alive() && (a.real_pos().y - pos.y).abs() < 6
        });
        if in_line { cmd |= Cmd::BUTTON1; }
        commands.push(ActorCommand { actor: actor.id, cmd });
    }
    commands
}

// ── Reporting ──

#[derive(Default)]
struct Tally {
    steps: u32,
    kills: u32,
    shots: u32,
    footsteps: u32,
    pickups: u32,
    points: i32,
    exited: bool,
}

impl Tally {
    fn record(&mut self, events: &[GameEvent]) {
        self.steps += 1;
        for event in events {
            match event {
                GameEvent::ActorKilled { actor, .. } => {
                    self.kills += 1;
                    debug!(?actor, "killed");
                }
                GameEvent::ActorFire { .. } => self.shots += 1,
                GameEvent::SoundAt { sound: SoundId::Footstep, .. } => self.footsteps += 1,
                GameEvent::RemovePickup { .. } => self.pickups += 1,
                GameEvent::Score { points, .. } => self.points += points,
                GameEvent::ActorExiting { .. } => self.exited = true,
                GameEvent::TriggerActivated { trigger } => debug!(trigger, "trigger fired"),
                _ => {}
            }
        }
    }
}

fn report(world: &World, tally: &Tally, elapsed: Duration) {
    info!(
        steps = tally.steps,
        kills = tally.kills,
        shots = tally.shots,
        footsteps = tally.footsteps,
        pickups = tally.pickups,
        points = tally.points,
        exited = tally.exited,
        alive = world.num_players(AliveFilter::Alive, false, false),
        actors = world.actors.len(),
        debris = world.objects.len(),
        elapsed_ms = elapsed.as_millis() as u64,
        "harness finished"
    );
    for p in &world.players {
        info!(player = %p.name, score = p.score, total = p.total_score, "final score");
    }
}
