//! Tick system - advances every corpse and effect once per game turn
//!
//! Corpses are processed from a snapshot of handles taken at the start of
//! the turn. A corpse may delete or create other things while it updates
//! (a rotted body can raise a vampire, a body on forbidden ground is
//! recreated), so deleted slots are only handed back to the pool after the
//! update that freed them has returned.

use crate::corpse::lifecycle::{update_dead_creature, AdvanceOutcome};
use crate::ecs::world::World;
use crate::simulation::events::SimulationEvent;
use crate::things::{ThingClass, ThingData};

/// Run a single game turn
///
/// 1. Advance every corpse that existed when the turn began
/// 2. Age effects and delete the expired ones
/// 3. Advance the turn counter
///
/// Returns the events that occurred during this turn.
pub fn run_game_tick(world: &mut World) -> Vec<SimulationEvent> {
    let corpses = world.things.ids_of_class(ThingClass::DeadCreature);
    let mut destroyed = 0usize;
    for id in corpses {
        // Things created this turn are not in the snapshot; things deleted
        // by an earlier update no longer resolve.
        if !world.things.contains(id) {
            continue;
        }
        if update_dead_creature(world, id) == AdvanceOutcome::Destroyed {
            destroyed += 1;
        }
        world.things.reclaim();
    }

    age_effects(world);
    world.things.reclaim();
    world.tick();

    let events = world.drain_events();
    if destroyed > 0 || !events.is_empty() {
        tracing::debug!(
            "Turn {}: {} corpses ended, {} events",
            world.current_turn,
            destroyed,
            events.len()
        );
    }
    events
}

/// Run `turns` game turns and collect their events
pub fn run_game_ticks(world: &mut World, turns: u64) -> Vec<SimulationEvent> {
    let mut events = Vec::new();
    for _ in 0..turns {
        events.extend(run_game_tick(world));
    }
    events
}

fn age_effects(world: &mut World) {
    for id in world.things.ids_of_class(ThingClass::Effect) {
        let expired = match world.things.get_mut(id).map(|t| &mut t.data) {
            Some(ThingData::Effect(effect)) => effect.age(),
            _ => false,
        };
        if expired {
            world.things.delete(id);
        }
    }
}
