//! Creature model helpers: animation lookup and score

use crate::core::config::CreatureModelConfig;

/// Animations the corpse code switches between
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CreatureAnim {
    Stand,
    /// Collapsing right after death
    CorpseDying,
    /// Lying still
    CorpseDead,
    /// Being dragged by an imp
    CorpseDragged,
}

impl CreatureAnim {
    pub fn frames(&self, model: &CreatureModelConfig) -> u32 {
        match self {
            CreatureAnim::Stand => 1,
            CreatureAnim::CorpseDying => model.dying_frames,
            CreatureAnim::CorpseDead => model.dead_frames,
            CreatureAnim::CorpseDragged => model.dragged_frames,
        }
    }
}

/// Turns an animation takes to play once at the given speed
/// (256 = one frame per turn).
pub fn lifespan_of_animation(frames: u32, speed: i32) -> i32 {
    if speed <= 0 {
        return 0;
    }
    ((frames as i32) << 8) / speed
}

/// Score a living creature adds to its owner
pub fn creature_score(model: &CreatureModelConfig, exp_level: u8) -> i64 {
    model.score * (exp_level as i64 + 1)
}
