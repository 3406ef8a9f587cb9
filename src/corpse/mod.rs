//! Dead creatures: corpse lifecycle, graveyards and the dead creature list

pub mod graveyard;
pub mod lifecycle;
pub mod movement;
pub mod registry;

pub use graveyard::{create_vampire_in_room, place_body_in_graveyard, remove_body_from_graveyard};
pub use lifecycle::{
    corpse_is_rottable, create_dead_creature, destroy_creature_and_create_corpse, kill_creature,
    update_dead_creature, AdvanceOutcome, ArrivalMode,
};
pub use movement::{creature_blocked_flags_at, move_dead_creature};
pub use registry::{DeadCreatureEntry, DeadCreatureRegistry, DEAD_CREATURES_MAX_COUNT};
