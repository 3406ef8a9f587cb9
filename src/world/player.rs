//! Player records: who is possessing which thing

use crate::core::types::{PlayerId, Tick};
use crate::things::ThingId;

#[derive(Debug, Clone)]
pub struct PlayerInfo {
    pub id: PlayerId,
    /// Thing the player currently controls directly (possession)
    pub controlled_thing: Option<ThingId>,
    /// Creation turn of the controlled thing when control was taken
    pub controlled_since: Tick,
}

impl PlayerInfo {
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            controlled_thing: None,
            controlled_since: 0,
        }
    }

    pub fn controls(&self, thing: ThingId) -> bool {
        self.controlled_thing == Some(thing)
    }
}
