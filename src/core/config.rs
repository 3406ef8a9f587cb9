//! Game configuration with documented constants
//!
//! Everything the corpse and capture systems read from "the level" lives
//! here: timers, thresholds, the creature model table and room kinds.
//! Values load from TOML; every field falls back to its default.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::capture::ScreenshotFormat;
use crate::core::error::{KeeperError, Result};
use crate::core::types::{CreatureModel, PlayerId};
use crate::world::room::RoomKind;

/// Per-model creature settings consulted by the corpse lifecycle
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CreatureModelConfig {
    /// Model code name, e.g. "TROLL"
    pub name: String,
    /// Corpses of this model leave blood while collapsing
    pub bleeds: bool,
    /// Corpses of this model never rot away (skeletons, undead)
    pub no_corpse_rotting: bool,
    /// Score a living creature of this model adds to its owner, per level
    pub score: i64,
    /// Body height in map coordinate units
    pub body_height: i32,
    /// Frame count of the collapsing animation
    pub dying_frames: u32,
    /// Frame count of the resting death pose
    pub dead_frames: u32,
    /// Frame count of the being-dragged pose
    pub dragged_frames: u32,
}

impl Default for CreatureModelConfig {
    fn default() -> Self {
        Self {
            name: String::from("UNNAMED"),
            bleeds: true,
            no_corpse_rotting: false,
            score: 10,
            body_height: 0,
            dying_frames: 12,
            dead_frames: 1,
            dragged_frames: 1,
        }
    }
}

impl CreatureModelConfig {
    fn named(
        name: &str,
        bleeds: bool,
        no_corpse_rotting: bool,
        score: i64,
        body_height: i32,
    ) -> Self {
        Self {
            name: name.to_string(),
            bleeds,
            no_corpse_rotting,
            score,
            body_height,
            ..Self::default()
        }
    }
}

/// Which creature a room kind breeds, if any
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomKindConfig {
    pub kind: RoomKind,
    /// Creature model name created by the room (graveyard → vampire)
    pub creature: Option<String>,
}

/// Screen capture settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Screenshot file format
    pub format: ScreenshotFormat,
    /// Directory screenshots are written into
    pub directory: PathBuf,
    /// Frames an on-screen message stays visible
    pub message_frames: u32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            format: ScreenshotFormat::Raw,
            directory: PathBuf::from("scrshots"),
            message_frames: 40,
        }
    }
}

/// Configuration for the dungeon simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Turns a corpse lying outside a graveyard survives before vanishing
    pub body_remains_for: u64,

    /// Rotted bodies needed for a graveyard to raise one vampire
    pub bodies_for_vampire: u32,

    /// Rot countdown a body gets when placed in a graveyard
    pub graveyard_convert_time: i32,

    /// Player index used for unowned things
    pub neutral_player: PlayerId,

    /// The human-controlled player; only they get UI notifications
    pub my_player: PlayerId,

    /// Number of slots in the thing pool
    pub thing_pool_capacity: usize,

    /// Map size in subtiles
    pub map_width: i32,
    pub map_height: i32,

    /// Seed for the simulation RNG; equal seeds replay equal games
    pub rng_seed: u64,

    /// Creature model table, indexed by `CreatureModel`
    pub creatures: Vec<CreatureModelConfig>,

    /// Room kinds that create creatures
    pub rooms: Vec<RoomKindConfig>,

    pub capture: CaptureConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            body_remains_for: 1000,
            bodies_for_vampire: 10,
            graveyard_convert_time: 300,
            neutral_player: PlayerId(5),
            my_player: PlayerId(0),
            thing_pool_capacity: 2048,
            map_width: 85,
            map_height: 85,
            rng_seed: 0x5eed,
            creatures: vec![
                CreatureModelConfig::named("IMP", true, false, 10, 128),
                CreatureModelConfig::named("TROLL", true, false, 60, 384),
                CreatureModelConfig::named("SKELETON", false, true, 80, 320),
                CreatureModelConfig::named("VAMPIRE", false, true, 300, 352),
                CreatureModelConfig::named("DRAGON", true, false, 250, 512),
            ],
            rooms: vec![RoomKindConfig {
                kind: RoomKind::Graveyard,
                creature: Some("VAMPIRE".to_string()),
            }],
            capture: CaptureConfig::default(),
        }
    }
}

impl GameConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: GameConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.bodies_for_vampire == 0 {
            return Err(KeeperError::Config(
                "bodies_for_vampire must be positive".into(),
            ));
        }
        if self.graveyard_convert_time < 0 {
            return Err(KeeperError::Config(format!(
                "graveyard_convert_time {} is negative",
                self.graveyard_convert_time
            )));
        }
        if self.creatures.is_empty() {
            return Err(KeeperError::Config("creature model table is empty".into()));
        }
        if self.map_width <= 0 || self.map_height <= 0 {
            return Err(KeeperError::Config(format!(
                "map size {}x{} is not positive",
                self.map_width, self.map_height
            )));
        }
        if self.thing_pool_capacity == 0 {
            return Err(KeeperError::Config("thing_pool_capacity must be positive".into()));
        }
        for room in &self.rooms {
            if let Some(name) = &room.creature {
                if self.model_by_name(name).is_none() {
                    return Err(KeeperError::Config(format!(
                        "room {:?} creates unknown creature {}",
                        room.kind, name
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn creature_model(&self, model: CreatureModel) -> Option<&CreatureModelConfig> {
        self.creatures.get(model.0 as usize)
    }

    pub fn model_by_name(&self, name: &str) -> Option<CreatureModel> {
        self.creatures
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(name))
            .map(|idx| CreatureModel(idx as u16))
    }

    /// Name for log lines; unknown models print their index
    pub fn model_name(&self, model: CreatureModel) -> String {
        self.creature_model(model)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| format!("model#{}", model.0))
    }

    /// Creature model a room of this kind creates
    pub fn room_creature_model(&self, kind: RoomKind) -> Option<CreatureModel> {
        self.rooms
            .iter()
            .find(|r| r.kind == kind)
            .and_then(|r| r.creature.as_deref())
            .and_then(|name| self.model_by_name(name))
    }
}
