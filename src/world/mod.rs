//! Dungeon state outside the thing pool: terrain, rooms, dungeons, players

pub mod dungeon;
pub mod map;
pub mod player;
pub mod room;

pub use dungeon::{Dungeon, LevelStats};
pub use map::{CubeKind, GameMap, MapBlock, FLOOR_HEIGHT, WALL_HEIGHT};
pub use player::PlayerInfo;
pub use room::{Room, RoomKind};
