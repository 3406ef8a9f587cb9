//! Dungeon Remains - corpse lifecycle and screen capture for a dungeon simulation

pub mod capture;
pub mod core;
pub mod corpse;
pub mod creature;
pub mod ecs;
pub mod simulation;
pub mod things;
pub mod world;
