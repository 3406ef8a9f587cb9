use thiserror::Error;

use crate::core::types::{CreatureModel, PlayerId};
use crate::things::ThingId;

#[derive(Error, Debug)]
pub enum KeeperError {
    #[error("Cannot create thing of model {model:?} for player {owner:?}: too many things allocated")]
    PoolExhausted { model: CreatureModel, owner: PlayerId },

    #[error("Could not create dead thing")]
    CorpseCreationFailed,

    #[error("Thing not found: {0:?}")]
    ThingNotFound(ThingId),

    #[error("Invalid room state: {0}")]
    InvalidRoomState(String),

    #[error("Can't lock canvas")]
    LockAcquisitionFailed,

    #[error("No free filename for screenshot")]
    NoFreeFilename,

    #[error("Encode or write failed: {0}")]
    EncodeOrWriteFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid TOML: {0}")]
    TomlParse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, KeeperError>;
