//! Short-lived visual effect things

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    /// Blood drip from a collapsing body
    Blood,
    /// Flash where a graveyard raises a vampire
    VampireRise,
}

impl EffectKind {
    /// Turns the effect stays on the map
    pub fn lifespan(&self) -> u32 {
        match self {
            EffectKind::Blood => 8,
            EffectKind::VampireRise => 40,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EffectData {
    pub kind: EffectKind,
    pub turns_left: u32,
}

impl EffectData {
    pub fn new(kind: EffectKind) -> Self {
        Self {
            kind,
            turns_left: kind.lifespan(),
        }
    }

    /// Age by one turn; true once the effect has run out
    pub fn age(&mut self) -> bool {
        self.turns_left = self.turns_left.saturating_sub(1);
        self.turns_left == 0
    }
}
