//! Bounded record of recently dead creature kinds per dungeon
//!
//! Keeps distinct (model, experience level) pairs. Once full, each new pair
//! overwrites the slot under the ring cursor, so the oldest insertion is the
//! one evicted.

use crate::core::types::CreatureModel;

pub const DEAD_CREATURES_MAX_COUNT: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeadCreatureEntry {
    pub model: CreatureModel,
    pub exp_level: u8,
}

#[derive(Debug, Clone, Default)]
pub struct DeadCreatureRegistry {
    entries: Vec<DeadCreatureEntry>,
    cursor: usize,
}

impl DeadCreatureRegistry {
    pub fn new() -> Self {
        Self {
            entries: Vec::with_capacity(DEAD_CREATURES_MAX_COUNT),
            cursor: 0,
        }
    }

    /// Record a death. Returns false if the pair is already tracked.
    pub fn register(&mut self, model: CreatureModel, exp_level: u8) -> bool {
        if self.contains(model, exp_level) {
            tracing::trace!("Model {} level {} already in list", model.0, exp_level);
            return false;
        }
        let entry = DeadCreatureEntry { model, exp_level };
        if self.entries.len() < DEAD_CREATURES_MAX_COUNT {
            self.entries.push(entry);
        } else {
            self.entries[self.cursor] = entry;
            self.cursor = (self.cursor + 1) % DEAD_CREATURES_MAX_COUNT;
        }
        true
    }

    pub fn contains(&self, model: CreatureModel, exp_level: u8) -> bool {
        self.entries
            .iter()
            .rev()
            .any(|e| e.model == model && e.exp_level == exp_level)
    }

    /// Entries in slot order
    pub fn entries(&self) -> &[DeadCreatureEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Slot the next insertion overwrites once the ring is full
    pub fn cursor(&self) -> usize {
        self.cursor
    }
}
