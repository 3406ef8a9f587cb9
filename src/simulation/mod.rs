pub mod events;
pub mod tick;

pub use events::{CorpseEnd, CreatureSound, SimulationEvent, SpeechMessage};
pub use tick::{run_game_tick, run_game_ticks};
