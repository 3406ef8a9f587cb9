//! Graveyard intake, rot release and the vampire trigger

use rand::Rng;

use crate::core::error::{KeeperError, Result};
use crate::core::types::{Coord3d, RoomId};
use crate::ecs::world::World;
use crate::simulation::events::{SimulationEvent, SpeechMessage};
use crate::things::{EffectKind, MapBlockFlags, ThingId};
use crate::world::RoomKind;

fn invalid_room_state(message: String) -> KeeperError {
    tracing::error!("{}", message);
    KeeperError::InvalidRoomState(message)
}

/// Graveyard the corpse lies on, checked for consistency with the corpse.
fn graveyard_under(world: &World, id: ThingId) -> Result<RoomId> {
    let thing = world.things.get(id).ok_or(KeeperError::ThingNotFound(id))?;
    let name = world.config.model_name(thing.model);
    let room_id = world
        .map
        .room_at(&thing.mappos)
        .ok_or_else(|| invalid_room_state(format!("The {} is not in room", name)))?;
    let room = world
        .room(room_id)
        .ok_or_else(|| invalid_room_state(format!("The {} is not in room", name)))?;
    if room.kind != RoomKind::Graveyard {
        return Err(invalid_room_state(format!(
            "The {} is in {} instead of graveyard",
            name,
            room.kind.code_name()
        )));
    }
    Ok(room_id)
}

/// Lay a corpse to rot in the graveyard it lies on. It takes one unit of
/// capacity and rots for `graveyard_convert_time` turns.
pub fn place_body_in_graveyard(world: &mut World, id: ThingId) -> Result<RoomId> {
    let room_id = graveyard_under(world, id)?;
    let thing = world.things.get(id).ok_or(KeeperError::ThingNotFound(id))?;
    let corpse = thing.corpse().ok_or(KeeperError::ThingNotFound(id))?;
    if corpse.graveyard_slot {
        return Err(invalid_room_state(format!(
            "The {} is already in graveyard",
            world.config.model_name(thing.model)
        )));
    }
    let full = world
        .room(room_id)
        .map(|room| !room.has_free_capacity())
        .unwrap_or(true);
    if full {
        return Err(invalid_room_state(
            "Graveyard has no free capacity for another body".to_string(),
        ));
    }

    let convert_time = world.config.graveyard_convert_time;
    if let Some(room) = world.room_mut(room_id) {
        room.used_capacity += 1;
    }
    if let Some(thing) = world.things.get_mut(id) {
        thing.health = convert_time;
        if let Some(corpse) = thing.corpse_mut() {
            corpse.graveyard_slot = true;
        }
    }
    tracing::debug!("Corpse {:?} placed in graveyard {:?}", id, room_id);
    Ok(room_id)
}

/// Release the graveyard slot of a fully rotted body and count it towards
/// the owner's next vampire.
///
/// Inconsistent room state is logged and leaves everything unchanged.
pub fn remove_body_from_graveyard(world: &mut World, id: ThingId) -> Result<()> {
    let room_id = graveyard_under(world, id)?;
    let (owner, used) = match world.room(room_id) {
        Some(room) => (room.owner, room.used_capacity),
        None => return Err(invalid_room_state(format!("Room {:?} vanished", room_id))),
    };
    if used == 0 {
        return Err(invalid_room_state(
            "Graveyard had no allocated capacity to remove body from".to_string(),
        ));
    }
    let thing = world.things.get(id).ok_or(KeeperError::ThingNotFound(id))?;
    let in_graveyard = thing.corpse().map(|c| c.graveyard_slot).unwrap_or(false);
    if !in_graveyard {
        return Err(invalid_room_state(format!(
            "The {} is not in graveyard",
            world.config.model_name(thing.model)
        )));
    }

    if let Some(room) = world.room_mut(room_id) {
        room.used_capacity -= 1;
    }
    if let Some(corpse) = world.things.get_mut(id).and_then(|t| t.corpse_mut()) {
        corpse.graveyard_slot = false;
    }

    let threshold = world.config.bodies_for_vampire;
    let dungeon = world.dungeon_mut(owner);
    dungeon.bodies_rotten_for_vampire += 1;
    dungeon.lvstats.graveyard_bodys += 1;
    let vampire_due = dungeon.bodies_rotten_for_vampire >= threshold;
    if vampire_due {
        dungeon.bodies_rotten_for_vampire -= threshold;
    }
    world.push_event(SimulationEvent::BodyRotted {
        room: room_id,
        owner,
    });

    if vampire_due {
        create_vampire_in_room(world, room_id);
    }
    Ok(())
}

fn subtile_is_free(world: &World, stl_x: i32, stl_y: i32) -> bool {
    !world
        .map
        .block_flags(stl_x, stl_y)
        .contains(MapBlockFlags::SOLID)
}

/// Raise the creature a room breeds (a vampire, for graveyards) on a random
/// free subtile of the room. Returns false if nothing was created.
pub fn create_vampire_in_room(world: &mut World, room_id: RoomId) -> bool {
    let Some(room) = world.room(room_id) else {
        tracing::error!("Room {:?} does not exist", room_id);
        return false;
    };
    let (kind, owner) = (room.kind, room.owner);
    let subtiles = room.subtiles.clone();

    let Some(model) = world.config.room_creature_model(kind) else {
        tracing::error!("Room kind {} creates no creature", kind.code_name());
        return false;
    };
    let creature = match world.create_creature(Coord3d::ZERO, model, owner) {
        Ok(id) => id,
        Err(err) => {
            tracing::error!("Could not create creature model {}: {}", model.0, err);
            return false;
        }
    };

    let spot = if subtiles.is_empty() {
        None
    } else {
        let start = world.rng_mut().gen_range(0..subtiles.len());
        (0..subtiles.len())
            .map(|n| subtiles[(start + n) % subtiles.len()])
            .find(|&(stl_x, stl_y)| subtile_is_free(world, stl_x, stl_y))
    };
    let Some((stl_x, stl_y)) = spot else {
        tracing::error!("Could not find valid position in room");
        if let Err(err) = world.remove_creature_score_from_owner(creature) {
            tracing::error!("Could not remove score of {:?}: {}", creature, err);
        }
        world.things.delete(creature);
        return false;
    };

    let ground = Coord3d::at_subtile(stl_x, stl_y);
    let pos = Coord3d {
        z: world.map.ground_height_at(&ground),
        ..ground
    };
    world.move_thing_in_map(creature, pos);
    world.dungeon_mut(owner).lvstats.vamps_created += 1;
    world.create_effect(pos, EffectKind::VampireRise, owner);
    world.push_event(SimulationEvent::VampireCreated {
        creature,
        room: room_id,
        owner,
    });
    if owner == world.config.my_player {
        world.push_event(SimulationEvent::Message {
            player: owner,
            message: SpeechMessage::GraveyardMadeVampire,
        });
    }
    tracing::info!(
        "{} rose in room {:?} of player {}",
        world.config.model_name(model),
        room_id,
        owner.0
    );
    true
}
