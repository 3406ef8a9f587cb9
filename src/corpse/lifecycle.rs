//! Corpse creation, per-turn advance and death of living creatures
//!
//! A corpse is created either collapsing on the spot (it bleeds for a while
//! and then rests in the death pose) or as a body being dragged in. Every
//! turn `update_dead_creature` runs decay first and then the terrain rules;
//! the first rule that applies decides the outcome of the turn.

use crate::core::error::{KeeperError, Result};
use crate::core::types::{Coord3d, CreatureModel, PlayerId};
use crate::corpse::graveyard::remove_body_from_graveyard;
use crate::corpse::movement::move_dead_creature;
use crate::creature::{lifespan_of_animation, CreatureAnim};
use crate::ecs::world::World;
use crate::simulation::events::{CorpseEnd, CreatureSound, SimulationEvent};
use crate::things::{
    AllocFlags, CorpseData, CorpseState, DrawFlags, DrawInfo, EffectKind, MapBlockFlags,
    MovementFlags, Thing, ThingData, ThingFlags, ThingFlags1, ThingId,
};

/// How a corpse comes into existence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrivalMode {
    /// The creature just died here and collapses
    Collapse,
    /// The body is being dragged in; it skips the collapse
    Dragged,
}

impl From<u16> for ArrivalMode {
    fn from(value: u16) -> Self {
        match value {
            2 => ArrivalMode::Dragged,
            _ => ArrivalMode::Collapse,
        }
    }
}

/// Result of advancing a corpse by one turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    Continue,
    Destroyed,
}

/// Turns a corpse takes to fully decay, by experience level
pub fn decay_horizon(exp_level: u8) -> i32 {
    300 * exp_level as i32 / 20 + 300
}

/// Create a corpse at `pos`, resting on the ground there.
pub fn create_dead_creature(
    world: &mut World,
    pos: Coord3d,
    model: CreatureModel,
    mode: ArrivalMode,
    owner: PlayerId,
    exp_level: u8,
) -> Result<ThingId> {
    if !world.things.can_allocate(AllocFlags::FREE_EFFECT_IF_NO_SLOTS) {
        tracing::error!(
            "Cannot create dead creature model {} for player {}. There are too many things allocated.",
            model.0,
            owner.0
        );
        return Err(KeeperError::PoolExhausted { model, owner });
    }

    let (bleeds, body_height, anim_frames) = match world.model_config(model) {
        Some(cfg) => {
            let anim = match mode {
                ArrivalMode::Dragged => CreatureAnim::CorpseDragged,
                ArrivalMode::Collapse => CreatureAnim::CorpseDying,
            };
            (cfg.bleeds, cfg.body_height, anim.frames(cfg))
        }
        None => {
            return Err(KeeperError::Config(format!(
                "unknown creature model {}",
                model.0
            )))
        }
    };

    let turn = world.current_turn;
    let ground = world.map.ground_height_at(&pos);
    let id = world
        .things
        .allocate(AllocFlags::FREE_EFFECT_IF_NO_SLOTS, |id| {
            let (state, draw, health) = match mode {
                ArrivalMode::Dragged => (
                    CorpseState::ArrivingAtWork,
                    DrawInfo {
                        anim: CreatureAnim::CorpseDragged,
                        speed: 256,
                        ..DrawInfo::default()
                    },
                    0,
                ),
                ArrivalMode::Collapse => (
                    CorpseState::DecayingStanding,
                    DrawInfo {
                        anim: CreatureAnim::CorpseDying,
                        speed: 128,
                        ..DrawInfo::default()
                    },
                    3 * lifespan_of_animation(anim_frames, 128),
                ),
            };

            let mut thing = Thing::new(
                id,
                model,
                owner,
                ThingData::DeadCreature(CorpseData {
                    exp_level,
                    state,
                    graveyard_slot: false,
                    decay_horizon: decay_horizon(exp_level),
                }),
            );
            thing.mappos = Coord3d { z: ground, ..pos };
            thing.floor_height = ground;
            thing.body_height = body_height;
            thing.creation_turn = turn;
            thing.health = health;
            thing.draw = draw;
            thing.movement_flags.insert(MovementFlags::GROUNDED);
            if bleeds {
                thing.draw.flags.insert(DrawFlags::BLEEDING);
            }
            thing
        })
        .ok_or_else(|| {
            tracing::error!(
                "Should be able to allocate dead creature {} for player {}, but failed.",
                model.0,
                owner.0
            );
            KeeperError::PoolExhausted { model, owner }
        })?;

    let state = match mode {
        ArrivalMode::Dragged => CorpseState::ArrivingAtWork,
        ArrivalMode::Collapse => CorpseState::DecayingStanding,
    };
    if mode == ArrivalMode::Collapse {
        world.push_event(SimulationEvent::SoundPlayed {
            thing: id,
            sound: CreatureSound::Die,
        });
    }
    world.push_event(SimulationEvent::CorpseCreated {
        corpse: id,
        model,
        owner,
        state,
    });
    tracing::debug!(
        "Created {} corpse {:?} at {} ({:?})",
        world.config.model_name(model),
        id,
        pos,
        state
    );
    Ok(id)
}

/// Whether the corpse can rot away: its model allows rotting and no player
/// is possessing it.
pub fn corpse_is_rottable(world: &World, id: ThingId) -> bool {
    let Some(thing) = world.things.get(id) else {
        return false;
    };
    if thing.corpse().is_none() {
        return false;
    }
    let exempt = world
        .model_config(thing.model)
        .map(|cfg| cfg.no_corpse_rotting)
        .unwrap_or(false);
    !exempt && world.player_controlling(id).is_none()
}

fn delete_corpse(world: &mut World, id: ThingId, cause: CorpseEnd) -> AdvanceOutcome {
    let thing = world.things.delete(id);
    report_corpse_end(world, id, thing, cause)
}

fn report_corpse_end(
    world: &mut World,
    id: ThingId,
    thing: Option<Thing>,
    cause: CorpseEnd,
) -> AdvanceOutcome {
    if let Some(thing) = thing {
        tracing::debug!("Corpse {:?} gone: {:?}", id, cause);
        world.push_event(SimulationEvent::CorpseDestroyed {
            corpse: id,
            model: thing.model,
            cause,
        });
    }
    AdvanceOutcome::Destroyed
}

/// Decay step; returns `Some` when the corpse ended this turn.
fn decay_dead_creature(world: &mut World, id: ThingId) -> Option<AdvanceOutcome> {
    let thing = world.things.get(id)?;
    let corpse = thing.corpse()?;

    if corpse.state == CorpseState::DecayingStanding {
        let bleeds = world
            .model_config(thing.model)
            .map(|cfg| cfg.bleeds)
            .unwrap_or(false);
        let blood_pos = Coord3d {
            z: thing.mappos.z + 3 * thing.body_height / 4,
            ..thing.mappos
        };
        let owner = thing.owner;
        if bleeds {
            world.create_effect(blood_pos, EffectKind::Blood, owner);
        }
        let thing = world.things.get_mut(id)?;
        if thing.health > 0 {
            thing.health -= 1;
        }
        if thing.health <= 0 {
            if let Some(corpse) = thing.corpse_mut() {
                corpse.state = CorpseState::Resting;
            }
            thing.draw.anim = CreatureAnim::CorpseDead;
            thing.draw.speed = 64;
            tracing::trace!("Corpse {:?} came to rest", id);
        }
        return None;
    }

    if !corpse_is_rottable(world, id) {
        return None;
    }

    let in_graveyard = corpse.graveyard_slot;
    let creation_turn = thing.creation_turn;
    if in_graveyard {
        let thing = world.things.get_mut(id)?;
        if thing.health > 0 {
            thing.health -= 1;
        }
        if thing.health <= 0 {
            // Failure is logged inside; the body is gone either way
            let _ = remove_body_from_graveyard(world, id);
            return Some(delete_corpse(world, id, CorpseEnd::Rotted));
        }
    } else if world.current_turn.saturating_sub(creation_turn) > world.config.body_remains_for {
        return Some(delete_corpse(world, id, CorpseEnd::DecayedAway));
    }
    None
}

/// Advance a corpse by one turn.
///
/// Stale handles are treated as already destroyed, so calling this again
/// for a corpse that ended earlier does nothing.
pub fn update_dead_creature(world: &mut World, id: ThingId) -> AdvanceOutcome {
    let Some(thing) = world.things.get(id) else {
        return AdvanceOutcome::Destroyed;
    };
    if thing.corpse().is_none() {
        tracing::warn!("Thing {:?} is not a corpse", id);
        return AdvanceOutcome::Continue;
    }

    if !thing.flags.contains(ThingFlags::SUPPRESSED) {
        if let Some(outcome) = decay_dead_creature(world, id) {
            return outcome;
        }
    }

    let Some(thing) = world.things.get(id) else {
        return AdvanceOutcome::Destroyed;
    };
    let pos = thing.mappos;
    let (stl_x, stl_y) = (pos.stl_x(), pos.stl_y());
    let flags = thing.flags;
    let dead_by_lava = thing.flags1.contains(ThingFlags1::DEAD_BY_LAVA);
    let (model, owner, exp_level) = (thing.model, thing.owner, thing.exp_level());

    if world.map.cube_is_water(stl_x, stl_y) {
        if let Some(thing) = world.things.get_mut(id) {
            thing.movement_flags.insert(MovementFlags::WET);
        }
    }

    if flags.contains(ThingFlags::FORCED_MOVE) {
        move_dead_creature(world, id);
        return AdvanceOutcome::Continue;
    }

    if world.map.map_pos_is_lava(stl_x, stl_y)
        && !dead_by_lava
        && !flags.contains(ThingFlags::SUPPRESSED)
    {
        return delete_corpse(world, id, CorpseEnd::Lava);
    }

    if world
        .map
        .block_flags(stl_x, stl_y)
        .contains(MapBlockFlags::DEAD_BODY_FORBIDDEN)
    {
        // The recreated body takes over the slot, so it survives a full pool
        let thing = world.things.delete_for_reuse(id);
        report_corpse_end(world, id, thing, CorpseEnd::DeadBodyBlock);
        if let Err(err) =
            create_dead_creature(world, pos, model, ArrivalMode::Dragged, owner, exp_level)
        {
            tracing::warn!("Corpse {:?} not recreated: {}", id, err);
        }
        return AdvanceOutcome::Destroyed;
    }

    move_dead_creature(world, id);
    AdvanceOutcome::Continue
}

/// Replace a living creature with its corpse.
///
/// The creature is deleted before the corpse is created and the corpse
/// takes over its slot. If the corpse cannot be created anyway the creature
/// stays gone.
pub fn destroy_creature_and_create_corpse(
    world: &mut World,
    id: ThingId,
    mode: ArrivalMode,
) -> Result<ThingId> {
    let thing = world.things.get(id).ok_or(KeeperError::ThingNotFound(id))?;
    let cctrl = thing.creature().ok_or(KeeperError::ThingNotFound(id))?;
    let model = thing.model;
    let forced_move = thing.flags.contains(ThingFlags::FORCED_MOVE);
    let pos = thing.mappos;
    let owner = thing.owner;
    let exp_level = cctrl.exp_level;

    world.remove_creature_score_from_owner(id)?;
    world.things.delete_for_reuse(id);

    let corpse = create_dead_creature(world, pos, model, mode, owner, exp_level).map_err(|err| {
        tracing::error!("Could not create dead thing: {}", err);
        KeeperError::CorpseCreationFailed
    })?;

    let Some(dead) = world.things.get_mut(corpse) else {
        return Err(KeeperError::CorpseCreationFailed);
    };
    dead.flags.set(ThingFlags::FORCED_MOVE, forced_move);
    let creation_turn = dead.creation_turn;

    if !world.is_neutral(owner) {
        let player = world.player_mut(owner);
        if player.controls(id) {
            player.controlled_thing = Some(corpse);
            player.controlled_since = creation_turn;
        }
    }
    Ok(corpse)
}

/// Kill a living creature: remember its kind in the owner's dead creature
/// list and leave a corpse behind.
pub fn kill_creature(world: &mut World, id: ThingId, mode: ArrivalMode) -> Result<ThingId> {
    let thing = world.things.get(id).ok_or(KeeperError::ThingNotFound(id))?;
    let Some(cctrl) = thing.creature() else {
        tracing::warn!("Invalid victim {:?}", id);
        return Err(KeeperError::ThingNotFound(id));
    };
    let (model, owner, exp_level) = (thing.model, thing.owner, cctrl.exp_level);

    if world.dungeon_mut(owner).dead_creatures.register(model, exp_level) {
        tracing::debug!(
            "Player {} lost a level {} {}",
            owner.0,
            exp_level,
            world.config.model_name(model)
        );
    }
    destroy_creature_and_create_corpse(world, id, mode)
}
