//! Rooms: owned areas of the dungeon with a finite capacity

use serde::{Deserialize, Serialize};

use crate::core::types::{PlayerId, RoomId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomKind {
    Entrance,
    Treasury,
    Lair,
    Hatchery,
    Prison,
    Graveyard,
}

impl RoomKind {
    pub fn code_name(&self) -> &'static str {
        match self {
            RoomKind::Entrance => "ENTRANCE",
            RoomKind::Treasury => "TREASURE",
            RoomKind::Lair => "LAIR",
            RoomKind::Hatchery => "GARDEN",
            RoomKind::Prison => "PRISON",
            RoomKind::Graveyard => "GRAVEYARD",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Room {
    pub id: RoomId,
    pub kind: RoomKind,
    pub owner: PlayerId,
    /// Subtiles covered by the room
    pub subtiles: Vec<(i32, i32)>,
    pub total_capacity: u32,
    pub used_capacity: u32,
}

impl Room {
    pub fn new(id: RoomId, kind: RoomKind, owner: PlayerId, total_capacity: u32) -> Self {
        Self {
            id,
            kind,
            owner,
            subtiles: Vec::new(),
            total_capacity,
            used_capacity: 0,
        }
    }

    pub fn has_free_capacity(&self) -> bool {
        self.used_capacity < self.total_capacity
    }
}
