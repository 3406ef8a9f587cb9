//! Per-player dungeon record: counters the corpse code mutates

use crate::core::types::PlayerId;
use crate::corpse::registry::DeadCreatureRegistry;

/// Lifetime statistics shown on the level summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelStats {
    /// Bodies that finished rotting in a graveyard
    pub graveyard_bodys: u32,
    pub vamps_created: u32,
}

#[derive(Debug, Clone)]
pub struct Dungeon {
    pub owner: PlayerId,
    /// Recently dead (model, level) pairs, for resurrection effects
    pub dead_creatures: DeadCreatureRegistry,
    /// Rotted bodies not yet converted into a vampire
    pub bodies_rotten_for_vampire: u32,
    pub lvstats: LevelStats,
    /// Sum of the scores of the owner's living creatures
    pub creature_score: i64,
}

impl Dungeon {
    pub fn new(owner: PlayerId) -> Self {
        Self {
            owner,
            dead_creatures: DeadCreatureRegistry::new(),
            bodies_rotten_for_vampire: 0,
            lvstats: LevelStats::default(),
            creature_score: 0,
        }
    }
}
