//! Velocity-driven movement of corpses with wall sliding
//!
//! A corpse only moves when something pushed it. The candidate position is
//! the current one plus velocity, clamped to the map. If the straight path
//! is obstructed, each axis is probed on its own to find which ones are
//! blocked; the position slides along the wall and the blocked velocity
//! components are dropped.

use crate::core::types::{Coord3d, COORD_PER_STL};
use crate::ecs::world::World;
use crate::things::{BlockedAxes, Thing, ThingId};
use crate::world::GameMap;

/// Work out which axes of the move `current -> target` are obstructed.
///
/// `cannot_move` answers whether the straight path from `current` to a
/// probe position is blocked. Each axis is probed alone first; a single
/// blocked axis is then confirmed by probing the diagonal of the other two
/// axes, and X or Y blocked together with Z always counts as a full block.
pub fn blocked_axes_with<F>(current: &Coord3d, target: &Coord3d, mut cannot_move: F) -> BlockedAxes
where
    F: FnMut(&Coord3d) -> bool,
{
    let mut blocked = BlockedAxes::empty();
    if cannot_move(&Coord3d { x: target.x, ..*current }) {
        blocked.insert(BlockedAxes::X);
    }
    if cannot_move(&Coord3d { y: target.y, ..*current }) {
        blocked.insert(BlockedAxes::Y);
    }
    if cannot_move(&Coord3d { z: target.z, ..*current }) {
        blocked.insert(BlockedAxes::Z);
    }

    match blocked.bits() {
        0x00 => {
            if cannot_move(target) {
                BlockedAxes::ALL
            } else {
                blocked
            }
        }
        0x01 => {
            if cannot_move(&Coord3d { x: current.x, ..*target }) {
                BlockedAxes::ALL
            } else {
                BlockedAxes::X
            }
        }
        0x02 => {
            if cannot_move(&Coord3d { y: current.y, ..*target }) {
                BlockedAxes::ALL
            } else {
                BlockedAxes::Y
            }
        }
        0x04 => {
            if cannot_move(&Coord3d { z: current.z, ..*target }) {
                BlockedAxes::ALL
            } else {
                BlockedAxes::Z
            }
        }
        0x05 | 0x06 => BlockedAxes::ALL,
        _ => blocked,
    }
}

/// Blocked axes for a move on the real map
pub fn creature_blocked_flags_at(map: &GameMap, current: &Coord3d, target: &Coord3d) -> BlockedAxes {
    blocked_axes_with(current, target, |probe| {
        map.cannot_move_directly_to(current, probe)
    })
}

/// Last coordinate inside the current subtile in the direction of travel
fn edge_towards(current: i32, target: i32) -> i32 {
    let start = current.div_euclid(COORD_PER_STL) * COORD_PER_STL;
    if target > current {
        start + COORD_PER_STL - 1
    } else if target < current {
        start
    } else {
        current
    }
}

/// Pull the blocked components of `pos` back against the wall of the
/// subtile the thing is in.
pub fn slide_thing_against_wall_at(current: &Coord3d, pos: &mut Coord3d, blocked: BlockedAxes) {
    if blocked.contains(BlockedAxes::X) {
        pos.x = edge_towards(current.x, pos.x);
    }
    if blocked.contains(BlockedAxes::Y) {
        pos.y = edge_towards(current.y, pos.y);
    }
    if blocked.contains(BlockedAxes::Z) {
        pos.z = current.z;
    }
}

/// Drop the velocity components that pushed into the wall
pub fn remove_relevant_forces_from_thing_after_slide(thing: &mut Thing, blocked: BlockedAxes) {
    if blocked.contains(BlockedAxes::X) {
        thing.velocity.x = 0;
    }
    if blocked.contains(BlockedAxes::Y) {
        thing.velocity.y = 0;
    }
    if blocked.contains(BlockedAxes::Z) {
        thing.velocity.z = 0;
    }
}

/// Integrate one turn of corpse velocity. Corpses at rest only refresh the
/// ground height below them.
pub fn move_dead_creature(world: &mut World, id: ThingId) {
    let Some(thing) = world.things.get(id) else {
        return;
    };
    let mappos = thing.mappos;
    let velocity = thing.velocity;

    if velocity.is_zero() {
        let floor = world.map.ground_height_at(&mappos);
        if let Some(thing) = world.things.get_mut(id) {
            thing.floor_height = floor;
        }
        return;
    }

    let mut pos = world.map.clamp_to_map(mappos + velocity);
    if pos != mappos && world.map.cannot_move_directly_to(&mappos, &pos) {
        let blocked = creature_blocked_flags_at(&world.map, &mappos, &pos);
        tracing::trace!("Corpse {:?} blocked {:?} moving to {}", id, blocked, pos);
        slide_thing_against_wall_at(&mappos, &mut pos, blocked);
        if let Some(thing) = world.things.get_mut(id) {
            remove_relevant_forces_from_thing_after_slide(thing, blocked);
        }
    }
    world.move_thing_in_map(id, pos);
}
