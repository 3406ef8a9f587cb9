pub mod config;
pub mod error;
pub mod types;

pub use config::GameConfig;
pub use error::{KeeperError, Result};
pub use types::{Coord3d, CreatureModel, PlayerId, RoomId, Tick, COORD_PER_STL};
