//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Game turn counter (simulation time unit)
pub type Tick = u64;

/// Map coordinate units per subtile.
pub const COORD_PER_STL: i32 = 256;

/// Player (keeper) index. Heroes, neutrals and keepers all own things.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

/// Index into the creature model table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CreatureModel(pub u16);

/// Unique identifier for rooms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomId(pub u32);

/// Fixed-point map position; 256 units per subtile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord3d {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Coord3d {
    pub const ZERO: Coord3d = Coord3d { x: 0, y: 0, z: 0 };

    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Position in the middle of the given subtile, at height zero
    pub fn at_subtile(stl_x: i32, stl_y: i32) -> Self {
        Self {
            x: stl_x * COORD_PER_STL + COORD_PER_STL / 2,
            y: stl_y * COORD_PER_STL + COORD_PER_STL / 2,
            z: 0,
        }
    }

    pub fn stl_x(&self) -> i32 {
        self.x.div_euclid(COORD_PER_STL)
    }

    pub fn stl_y(&self) -> i32 {
        self.y.div_euclid(COORD_PER_STL)
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0 && self.y == 0 && self.z == 0
    }
}

impl std::ops::Add for Coord3d {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self { x: self.x + rhs.x, y: self.y + rhs.y, z: self.z + rhs.z }
    }
}

impl std::fmt::Display for Coord3d {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subtile_of_coord() {
        let pos = Coord3d::new(3 * COORD_PER_STL + 17, 255, 0);
        assert_eq!(pos.stl_x(), 3);
        assert_eq!(pos.stl_y(), 0);
    }

    #[test]
    fn test_at_subtile_is_centered() {
        let pos = Coord3d::at_subtile(2, 5);
        assert_eq!(pos.stl_x(), 2);
        assert_eq!(pos.stl_y(), 5);
        assert_eq!(pos.x % COORD_PER_STL, COORD_PER_STL / 2);
    }

    #[test]
    fn test_player_id_equality() {
        assert_eq!(PlayerId(1), PlayerId(1));
        assert_ne!(PlayerId(1), PlayerId(2));
    }
}
