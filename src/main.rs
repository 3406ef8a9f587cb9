//! Dungeon Remains - demo driver
//!
//! Builds a small dungeon with a graveyard, kills a handful of creatures,
//! runs the tick driver and prints what happened to the bodies. Optionally
//! saves a screenshot of a synthetic frame of the map.

use std::path::PathBuf;

use clap::Parser;

use dungeon_remains::capture::{MemorySurface, ScreenCapture, ScreenshotFormat};
use dungeon_remains::core::error::Result;
use dungeon_remains::core::types::{Coord3d, PlayerId, RoomId, COORD_PER_STL};
use dungeon_remains::core::GameConfig;
use dungeon_remains::corpse::{kill_creature, place_body_in_graveyard, ArrivalMode};
use dungeon_remains::ecs::World;
use dungeon_remains::simulation::{run_game_tick, SimulationEvent};
use dungeon_remains::things::{CorpseState, ThingClass};
use dungeon_remains::world::{CubeKind, RoomKind};

/// Corpse lifecycle demo
#[derive(Parser, Debug)]
#[command(name = "dungeon-remains")]
#[command(about = "Run the corpse lifecycle on a demo dungeon")]
struct Args {
    /// Game configuration file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Game turns to simulate
    #[arg(long, default_value_t = 2000)]
    ticks: u64,

    /// Save a screenshot of the final map
    #[arg(long)]
    screenshot: bool,

    /// Screenshot format: raw or bmp
    #[arg(long)]
    format: Option<ScreenshotFormat>,

    /// Screenshot directory
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Debug, Default)]
struct Tally {
    corpses: usize,
    rotted: usize,
    ended: usize,
    vampires: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dungeon_remains=info".into()),
        )
        .init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(format) = args.format {
        config.capture.format = format;
    }
    if let Some(out) = &args.out {
        config.capture.directory = out.clone();
    }

    let mut world = World::new(config);
    let me = world.config.my_player;
    let graveyard = build_demo_dungeon(&mut world, me);
    spawn_and_kill(&mut world, me)?;

    let mut tally = Tally::default();
    for _ in 0..args.ticks {
        for event in run_game_tick(&mut world) {
            match event {
                SimulationEvent::CorpseCreated { .. } => tally.corpses += 1,
                SimulationEvent::BodyRotted { .. } => tally.rotted += 1,
                SimulationEvent::CorpseDestroyed { .. } => tally.ended += 1,
                SimulationEvent::VampireCreated { .. } => tally.vampires += 1,
                _ => {}
            }
        }
        bury_resting_bodies(&mut world);
    }

    println!("\n=== DUNGEON REMAINS ===");
    println!("Turns simulated:    {}", world.current_turn);
    println!("Corpses created:    {}", tally.corpses);
    println!("Corpses ended:      {}", tally.ended);
    println!("Bodies rotted:      {}", tally.rotted);
    println!("Vampires raised:    {}", tally.vampires);
    if let Some(dungeon) = world.dungeon(me) {
        println!("Graveyard bodies:   {}", dungeon.lvstats.graveyard_bodys);
        println!("Rot towards next:   {}", dungeon.bodies_rotten_for_vampire);
        println!("Recently dead:      {}", dungeon.dead_creatures.len());
        println!("Creature score:     {}", dungeon.creature_score);
    }
    if let Some(room) = world.room(graveyard) {
        println!(
            "Graveyard capacity: {}/{}",
            room.used_capacity, room.total_capacity
        );
    }

    if args.screenshot {
        let mut capture = ScreenCapture::new(&world.config.capture);
        let mut surface = render_map(&world);
        capture.request_screenshot();
        capture.perform_any_screen_capturing(&mut surface);
        if let Some(text) = capture.message().text() {
            println!("{}", text);
        }
    }
    Ok(())
}

/// Walls around the edge, a lava pool and a graveyard
fn build_demo_dungeon(world: &mut World, owner: PlayerId) -> RoomId {
    let (width, height) = (world.map.width(), world.map.height());
    for x in 0..width {
        world.map.set_wall(x, 0);
        world.map.set_wall(x, height - 1);
    }
    for y in 0..height {
        world.map.set_wall(0, y);
        world.map.set_wall(width - 1, y);
    }
    for y in 20..24 {
        for x in 30..34 {
            world.map.set_top_cube(x, y, CubeKind::Lava);
        }
    }
    world.add_room(RoomKind::Graveyard, owner, (10, 10), (15, 15), 16)
}

fn spawn_and_kill(world: &mut World, owner: PlayerId) -> Result<()> {
    let names = ["IMP", "TROLL", "DRAGON", "SKELETON"];
    let mut victims = Vec::new();
    for i in 0..24 {
        let Some(model) = world.config.model_by_name(names[i % names.len()]) else {
            continue;
        };
        let (x, y) = (10 + (i as i32 % 6), 10 + (i as i32 / 6));
        let id = world.create_creature(Coord3d::at_subtile(x, y), model, owner)?;
        world.set_creature_level(id, (i % 10) as u8)?;
        victims.push(id);
    }
    if let Some(imp) = world.config.model_by_name("IMP") {
        for x in 30..33 {
            victims.push(world.create_creature(Coord3d::at_subtile(x, 21), imp, owner)?);
        }
    }
    for id in victims {
        if let Err(err) = kill_creature(world, id, ArrivalMode::Collapse) {
            tracing::warn!("Could not kill {:?}: {}", id, err);
        }
    }
    Ok(())
}

/// Put every body that finished collapsing on a graveyard into it
fn bury_resting_bodies(world: &mut World) {
    for id in world.things.ids_of_class(ThingClass::DeadCreature) {
        let ready = world
            .things
            .get(id)
            .and_then(|thing| thing.corpse())
            .is_some_and(|corpse| corpse.state == CorpseState::Resting && !corpse.graveyard_slot);
        let on_graveyard = world
            .room_thing_is_on(id)
            .and_then(|room| world.room(room))
            .is_some_and(|room| room.kind == RoomKind::Graveyard && room.has_free_capacity());
        if ready && on_graveyard {
            if let Err(err) = place_body_in_graveyard(world, id) {
                tracing::warn!("Could not bury {:?}: {}", id, err);
            }
        }
    }
}

/// Synthetic frame of the map, eight pixels per subtile
fn render_map(world: &World) -> MemorySurface {
    const SCALE: i32 = COORD_PER_STL / 8;
    let width = (world.map.coord_width() / SCALE) as usize;
    let height = (world.map.coord_height() / SCALE) as usize;
    let mut surface = MemorySurface::new(width.min(640), height.min(400));
    for y in 0..height.min(400) {
        for x in 0..width.min(640) {
            let stl_x = x as i32 * SCALE / COORD_PER_STL;
            let stl_y = y as i32 * SCALE / COORD_PER_STL;
            let colour = match world.map.top_cube_at(stl_x, stl_y) {
                Some(CubeKind::Rock) => 200,
                Some(CubeKind::Lava) => 250,
                Some(CubeKind::Water) => 120,
                _ if world.map.room_at(&Coord3d::at_subtile(stl_x, stl_y)).is_some() => 60,
                _ => 30,
            };
            surface.set_pixel(x, y, colour);
        }
    }
    for thing in world.things.iter() {
        let (x, y) = (thing.mappos.x / SCALE, thing.mappos.y / SCALE);
        if x >= 0 && y >= 0 {
            surface.set_pixel(x as usize, y as usize, 5);
        }
    }
    surface
}
