//! Events produced while the simulation runs
//!
//! Sound, effects and UI notifications are external to the simulation; it
//! reports them here and the frontend plays or shows them.

use crate::core::types::{Coord3d, CreatureModel, PlayerId, RoomId};
use crate::things::{CorpseState, EffectKind, ThingId};

/// Why a corpse left the map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorpseEnd {
    /// Finished rotting inside a graveyard
    Rotted,
    /// Lay outside a graveyard for too long
    DecayedAway,
    /// Swallowed by lava
    Lava,
    /// Standing on a body-forbidden block; replaced by a fresh corpse
    DeadBodyBlock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreatureSound {
    Die,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechMessage {
    GraveyardMadeVampire,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SimulationEvent {
    CorpseCreated {
        corpse: ThingId,
        model: CreatureModel,
        owner: PlayerId,
        state: CorpseState,
    },
    CorpseDestroyed {
        corpse: ThingId,
        model: CreatureModel,
        cause: CorpseEnd,
    },
    /// A body finished rotting and freed its graveyard slot
    BodyRotted {
        room: RoomId,
        owner: PlayerId,
    },
    VampireCreated {
        creature: ThingId,
        room: RoomId,
        owner: PlayerId,
    },
    EffectCreated {
        kind: EffectKind,
        pos: Coord3d,
        owner: PlayerId,
    },
    SoundPlayed {
        thing: ThingId,
        sound: CreatureSound,
    },
    /// Spoken message for the human player
    Message {
        player: PlayerId,
        message: SpeechMessage,
    },
}
