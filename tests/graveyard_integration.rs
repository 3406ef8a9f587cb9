//! Integration tests for graveyards
//!
//! Bodies laid in a graveyard rot for a fixed time, free their slot and
//! count towards the owner's next vampire. These tests run the whole loop
//! through the tick driver.

use dungeon_remains::core::types::{Coord3d, PlayerId, RoomId};
use dungeon_remains::core::GameConfig;
use dungeon_remains::corpse::{
    create_dead_creature, place_body_in_graveyard, remove_body_from_graveyard, ArrivalMode,
};
use dungeon_remains::ecs::World;
use dungeon_remains::simulation::{run_game_ticks, CorpseEnd, SimulationEvent};
use dungeon_remains::things::{ThingClass, ThingId};
use dungeon_remains::world::RoomKind;

fn graveyard_world(bodies_for_vampire: u32, convert_time: i32) -> World {
    World::new(GameConfig {
        map_width: 24,
        map_height: 24,
        thing_pool_capacity: 128,
        bodies_for_vampire,
        graveyard_convert_time: convert_time,
        body_remains_for: 10,
        ..GameConfig::default()
    })
}

fn add_graveyard(world: &mut World, owner: PlayerId, capacity: u32) -> RoomId {
    world.add_room(RoomKind::Graveyard, owner, (2, 2), (6, 6), capacity)
}

/// Drag an imp body onto the graveyard and bury it
fn bury_body(world: &mut World, owner: PlayerId, n: i32) -> ThingId {
    let imp = world.config.model_by_name("IMP").unwrap();
    let corpse = create_dead_creature(
        world,
        Coord3d::at_subtile(2 + n % 5, 2 + (n / 5) % 5),
        imp,
        ArrivalMode::Dragged,
        owner,
        0,
    )
    .unwrap();
    place_body_in_graveyard(world, corpse).unwrap();
    corpse
}

// ============================================================================
// Vampire Threshold
// ============================================================================

/// Integration test: every fifth rotted body raises a vampire
///
/// 1. Threshold is 5 bodies
/// 2. Release ten bodies one after another
/// 3. Vampires appear exactly on the 5th and the 10th release
#[test]
fn test_vampire_on_every_fifth_release() {
    let mut world = graveyard_world(5, 300);
    let me = world.config.my_player;
    let room = add_graveyard(&mut world, me, 16);

    for n in 1..=10 {
        let corpse = bury_body(&mut world, me, n);
        remove_body_from_graveyard(&mut world, corpse).unwrap();
        let dungeon = world.dungeon(me).unwrap();
        assert_eq!(dungeon.lvstats.vamps_created, (n / 5) as u32, "release {}", n);
        assert_eq!(dungeon.bodies_rotten_for_vampire, (n % 5) as u32);
        assert_eq!(dungeon.lvstats.graveyard_bodys, n as u32);
    }
    assert_eq!(world.room(room).unwrap().used_capacity, 0);
    assert_eq!(world.things.count_of_class(ThingClass::Creature), 2);
}

/// Integration test: bodies rot away through the tick driver
///
/// 1. Bury ten bodies with a three turn rot time
/// 2. Run three turns
/// 3. Every body is gone, its slot released, and two vampires stand in
///    the graveyard
#[test]
fn test_full_graveyard_rots_into_vampires() {
    let mut world = graveyard_world(5, 3);
    let me = world.config.my_player;
    let room = add_graveyard(&mut world, me, 10);
    let bodies: Vec<ThingId> = (0..10).map(|n| bury_body(&mut world, me, n)).collect();
    assert_eq!(world.room(room).unwrap().used_capacity, 10);
    world.drain_events();

    let events = run_game_ticks(&mut world, 2);
    assert!(bodies.iter().all(|&id| world.things.contains(id)));
    assert!(events.is_empty());

    let events = run_game_ticks(&mut world, 1);
    assert!(bodies.iter().all(|&id| !world.things.contains(id)));
    assert_eq!(world.room(room).unwrap().used_capacity, 0);

    let mut rotted = 0;
    let mut vampires_at = Vec::new();
    for event in &events {
        match event {
            SimulationEvent::BodyRotted { room: r, .. } => {
                assert_eq!(*r, room);
                rotted += 1;
            }
            SimulationEvent::VampireCreated { creature, .. } => {
                vampires_at.push(rotted);
                let pos = world.things.get(*creature).unwrap().mappos;
                assert_eq!(world.map.room_at(&pos), Some(room));
            }
            _ => {}
        }
    }
    assert_eq!(rotted, 10);
    assert_eq!(vampires_at, vec![5, 10]);

    let ended = events
        .iter()
        .filter(|e| matches!(e, SimulationEvent::CorpseDestroyed { cause: CorpseEnd::Rotted, .. }))
        .count();
    assert_eq!(ended, 10);
    let messages = events
        .iter()
        .filter(|e| matches!(e, SimulationEvent::Message { player, .. } if *player == me))
        .count();
    assert_eq!(messages, 2);
}

#[test]
fn test_rot_count_carries_between_batches() {
    let mut world = graveyard_world(5, 2);
    let me = world.config.my_player;
    add_graveyard(&mut world, me, 10);

    for n in 0..3 {
        bury_body(&mut world, me, n);
    }
    run_game_ticks(&mut world, 2);
    assert_eq!(world.dungeon(me).unwrap().bodies_rotten_for_vampire, 3);
    assert_eq!(world.dungeon(me).unwrap().lvstats.vamps_created, 0);

    for n in 3..6 {
        bury_body(&mut world, me, n);
    }
    run_game_ticks(&mut world, 2);
    let dungeon = world.dungeon(me).unwrap();
    assert_eq!(dungeon.lvstats.vamps_created, 1);
    assert_eq!(dungeon.bodies_rotten_for_vampire, 1);
}

#[test]
fn test_rival_vampire_raises_no_message() {
    let mut world = graveyard_world(1, 1);
    let rival = PlayerId(1);
    add_graveyard(&mut world, rival, 4);
    bury_body(&mut world, rival, 0);

    let events = run_game_ticks(&mut world, 1);
    assert!(events
        .iter()
        .any(|e| matches!(e, SimulationEvent::VampireCreated { owner, .. } if *owner == rival)));
    assert!(!events
        .iter()
        .any(|e| matches!(e, SimulationEvent::Message { .. })));
}

// ============================================================================
// Rot Timing
// ============================================================================

/// A buried body rots on the graveyard clock, not the open-floor one
#[test]
fn test_buried_body_outlasts_open_floor_decay() {
    let mut world = graveyard_world(10, 40);
    let me = world.config.my_player;
    add_graveyard(&mut world, me, 4);
    let corpse = bury_body(&mut world, me, 0);

    run_game_ticks(&mut world, 39);
    assert!(world.things.contains(corpse));
    assert_eq!(world.things.get(corpse).unwrap().health, 1);

    run_game_ticks(&mut world, 1);
    assert!(!world.things.contains(corpse));
}

#[test]
fn test_possessed_body_does_not_rot() {
    let mut world = graveyard_world(5, 2);
    let me = world.config.my_player;
    let room = add_graveyard(&mut world, me, 4);
    let corpse = bury_body(&mut world, me, 0);
    world.player_mut(me).controlled_thing = Some(corpse);

    run_game_ticks(&mut world, 20);
    assert!(world.things.contains(corpse));
    assert_eq!(world.room(room).unwrap().used_capacity, 1);
    let rotted = world.dungeon(me).map_or(0, |d| d.lvstats.graveyard_bodys);
    assert_eq!(rotted, 0);
}
