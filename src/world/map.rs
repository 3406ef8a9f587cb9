//! Subtile map: terrain kind, block flags and column heights
//!
//! Provides the terrain queries the corpse code needs (water, lava,
//! body-forbidden blocks, ground height) and the straight-line movement
//! probe used for wall collision.

use serde::{Deserialize, Serialize};

use crate::core::types::{Coord3d, RoomId, COORD_PER_STL};
use crate::things::MapBlockFlags;

/// Height of the floor surface
pub const FLOOR_HEIGHT: i32 = COORD_PER_STL;
/// Height of a full wall column
pub const WALL_HEIGHT: i32 = 5 * COORD_PER_STL;

/// Material of the topmost cube of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CubeKind {
    Earth,
    Water,
    Lava,
    Rock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapBlock {
    pub top_cube: CubeKind,
    pub flags: MapBlockFlags,
    /// Top of the filled part of the column; things stand on it
    pub column_height: i32,
    pub room: Option<RoomId>,
}

impl Default for MapBlock {
    fn default() -> Self {
        Self {
            top_cube: CubeKind::Earth,
            flags: MapBlockFlags::empty(),
            column_height: FLOOR_HEIGHT,
            room: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GameMap {
    width: i32,
    height: i32,
    blocks: Vec<MapBlock>,
}

impl GameMap {
    /// Flat earth floor, `width` x `height` subtiles
    pub fn new(width: i32, height: i32) -> Self {
        let count = (width.max(0) * height.max(0)) as usize;
        Self {
            width,
            height,
            blocks: vec![MapBlock::default(); count],
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Map extent in coordinate units
    pub fn coord_width(&self) -> i32 {
        self.width * COORD_PER_STL
    }

    pub fn coord_height(&self) -> i32 {
        self.height * COORD_PER_STL
    }

    pub fn in_bounds(&self, stl_x: i32, stl_y: i32) -> bool {
        stl_x >= 0 && stl_x < self.width && stl_y >= 0 && stl_y < self.height
    }

    fn idx(&self, stl_x: i32, stl_y: i32) -> Option<usize> {
        if self.in_bounds(stl_x, stl_y) {
            Some((stl_y * self.width + stl_x) as usize)
        } else {
            None
        }
    }

    pub fn block(&self, stl_x: i32, stl_y: i32) -> Option<&MapBlock> {
        self.idx(stl_x, stl_y).map(|i| &self.blocks[i])
    }

    pub fn block_mut(&mut self, stl_x: i32, stl_y: i32) -> Option<&mut MapBlock> {
        self.idx(stl_x, stl_y).map(move |i| &mut self.blocks[i])
    }

    pub fn block_at(&self, pos: &Coord3d) -> Option<&MapBlock> {
        self.block(pos.stl_x(), pos.stl_y())
    }

    pub fn set_wall(&mut self, stl_x: i32, stl_y: i32) {
        if let Some(block) = self.block_mut(stl_x, stl_y) {
            block.top_cube = CubeKind::Rock;
            block.flags.insert(MapBlockFlags::SOLID);
            block.column_height = WALL_HEIGHT;
        }
    }

    pub fn set_top_cube(&mut self, stl_x: i32, stl_y: i32, cube: CubeKind) {
        if let Some(block) = self.block_mut(stl_x, stl_y) {
            block.top_cube = cube;
        }
    }

    pub fn insert_flags(&mut self, stl_x: i32, stl_y: i32, flags: MapBlockFlags) {
        if let Some(block) = self.block_mut(stl_x, stl_y) {
            block.flags.insert(flags);
        }
    }

    pub fn top_cube_at(&self, stl_x: i32, stl_y: i32) -> Option<CubeKind> {
        self.block(stl_x, stl_y).map(|b| b.top_cube)
    }

    pub fn cube_is_water(&self, stl_x: i32, stl_y: i32) -> bool {
        self.top_cube_at(stl_x, stl_y) == Some(CubeKind::Water)
    }

    pub fn map_pos_is_lava(&self, stl_x: i32, stl_y: i32) -> bool {
        self.top_cube_at(stl_x, stl_y) == Some(CubeKind::Lava)
    }

    pub fn block_flags(&self, stl_x: i32, stl_y: i32) -> MapBlockFlags {
        self.block(stl_x, stl_y)
            .map(|b| b.flags)
            .unwrap_or(MapBlockFlags::SOLID)
    }

    pub fn room_at(&self, pos: &Coord3d) -> Option<RoomId> {
        self.block_at(pos).and_then(|b| b.room)
    }

    /// Height a thing rests at on this position
    pub fn ground_height_at(&self, pos: &Coord3d) -> i32 {
        self.block_at(pos)
            .map(|b| b.column_height)
            .unwrap_or(WALL_HEIGHT)
    }

    /// Whether the position lies inside solid terrain (or off the map)
    pub fn in_wall_at(&self, pos: &Coord3d) -> bool {
        match self.block_at(pos) {
            Some(block) => pos.z < block.column_height,
            None => true,
        }
    }

    /// Whether the straight path from `from` to `to` passes through solid
    /// terrain. The start point itself is not tested.
    pub fn cannot_move_directly_to(&self, from: &Coord3d, to: &Coord3d) -> bool {
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        let dz = to.z - from.z;
        let longest = dx.abs().max(dy.abs()).max(dz.abs());
        let steps = longest / (COORD_PER_STL / 2) + 1;
        (1..=steps).any(|i| {
            let sample = Coord3d::new(
                from.x + dx * i / steps,
                from.y + dy * i / steps,
                from.z + dz * i / steps,
            );
            self.in_wall_at(&sample)
        })
    }

    /// Clamp a candidate position to the map: x/y inside the map, z not
    /// below zero.
    pub fn clamp_to_map(&self, pos: Coord3d) -> Coord3d {
        Coord3d {
            x: pos.x.clamp(0, self.coord_width() - 1),
            y: pos.y.clamp(0, self.coord_height() - 1),
            z: pos.z.max(0),
        }
    }
}
