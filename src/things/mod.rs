//! Things: every simulated object on the map (creatures, corpses, effects)
//!
//! Things live in a fixed-capacity `ThingPool` and are addressed by
//! generational `ThingId` handles, so a handle to a deleted thing never
//! resolves to whatever reuses its slot.

pub mod effect;
pub mod flags;
pub mod pool;

use serde::{Deserialize, Serialize};

use crate::core::types::{Coord3d, CreatureModel, PlayerId, Tick};
use crate::creature::CreatureAnim;

pub use effect::{EffectData, EffectKind};
pub use flags::{
    AllocFlags, BlockedAxes, DrawFlags, MapBlockFlags, MovementFlags, ThingFlags, ThingFlags1,
};
pub use pool::ThingPool;

/// Generational handle to a pool slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ThingId {
    pub index: u32,
    pub generation: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThingClass {
    Creature,
    DeadCreature,
    Effect,
}

/// What a corpse is currently doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CorpseState {
    /// Dropped by an imp at its destination
    ArrivingAtWork,
    /// Collapsing right after death; `health` counts down the animation
    DecayingStanding,
    /// Lying still in the death pose
    Resting,
}

/// Living creature bookkeeping
#[derive(Debug, Clone, Default)]
pub struct CreatureControl {
    pub exp_level: u8,
}

/// Corpse-specific fields
#[derive(Debug, Clone)]
pub struct CorpseData {
    pub exp_level: u8,
    pub state: CorpseState,
    /// Occupies one unit of a graveyard's capacity
    pub graveyard_slot: bool,
    /// Grows with the experience of the dead creature
    pub decay_horizon: i32,
}

#[derive(Debug, Clone)]
pub enum ThingData {
    Creature(CreatureControl),
    DeadCreature(CorpseData),
    Effect(EffectData),
}

/// Sprite selection for a thing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawInfo {
    pub anim: CreatureAnim,
    pub speed: i32,
    pub scale: i32,
    pub flags: DrawFlags,
}

impl Default for DrawInfo {
    fn default() -> Self {
        Self {
            anim: CreatureAnim::Stand,
            speed: 256,
            scale: 300,
            flags: DrawFlags::empty(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Thing {
    pub id: ThingId,
    pub model: CreatureModel,
    pub owner: PlayerId,
    pub mappos: Coord3d,
    pub velocity: Coord3d,
    /// Countdown shared by the collapse animation and graveyard rotting
    pub health: i32,
    pub creation_turn: Tick,
    pub flags: ThingFlags,
    pub flags1: ThingFlags1,
    pub movement_flags: MovementFlags,
    pub draw: DrawInfo,
    /// Ground height under the thing, refreshed when it stays put
    pub floor_height: i32,
    pub body_height: i32,
    pub data: ThingData,
}

impl Thing {
    pub fn new(id: ThingId, model: CreatureModel, owner: PlayerId, data: ThingData) -> Self {
        Self {
            id,
            model,
            owner,
            mappos: Coord3d::ZERO,
            velocity: Coord3d::ZERO,
            health: 0,
            creation_turn: 0,
            flags: ThingFlags::empty(),
            flags1: ThingFlags1::empty(),
            movement_flags: MovementFlags::empty(),
            draw: DrawInfo::default(),
            floor_height: 0,
            body_height: 0,
            data,
        }
    }

    pub fn class(&self) -> ThingClass {
        match self.data {
            ThingData::Creature(_) => ThingClass::Creature,
            ThingData::DeadCreature(_) => ThingClass::DeadCreature,
            ThingData::Effect(_) => ThingClass::Effect,
        }
    }

    pub fn corpse(&self) -> Option<&CorpseData> {
        match &self.data {
            ThingData::DeadCreature(corpse) => Some(corpse),
            _ => None,
        }
    }

    pub fn corpse_mut(&mut self) -> Option<&mut CorpseData> {
        match &mut self.data {
            ThingData::DeadCreature(corpse) => Some(corpse),
            _ => None,
        }
    }

    pub fn creature(&self) -> Option<&CreatureControl> {
        match &self.data {
            ThingData::Creature(cctrl) => Some(cctrl),
            _ => None,
        }
    }

    pub fn effect(&self) -> Option<&EffectData> {
        match &self.data {
            ThingData::Effect(effect) => Some(effect),
            _ => None,
        }
    }

    /// Experience level of a creature or of the creature a corpse came from
    pub fn exp_level(&self) -> u8 {
        match &self.data {
            ThingData::Creature(cctrl) => cctrl.exp_level,
            ThingData::DeadCreature(corpse) => corpse.exp_level,
            ThingData::Effect(_) => 0,
        }
    }
}
