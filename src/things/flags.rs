//! Named flag sets stored on things and map blocks
//!
//! Each set keeps its raw bit values so flags copied between things keep
//! their independence.

macro_rules! flag_set {
    (
        $(#[$meta:meta])*
        pub struct $name:ident($repr:ty) {
            $( $(#[$fmeta:meta])* const $flag:ident = $value:expr; )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub struct $name($repr);

        impl $name {
            $( $(#[$fmeta])* pub const $flag: $name = $name($value); )*

            pub const fn empty() -> Self {
                Self(0)
            }

            pub const fn from_bits(bits: $repr) -> Self {
                Self(bits)
            }

            pub const fn bits(&self) -> $repr {
                self.0
            }

            pub const fn contains(&self, other: Self) -> bool {
                (self.0 & other.0) == other.0
            }

            pub const fn intersects(&self, other: Self) -> bool {
                (self.0 & other.0) != 0
            }

            pub const fn is_empty(&self) -> bool {
                self.0 == 0
            }

            pub fn insert(&mut self, other: Self) {
                self.0 |= other.0;
            }

            pub fn remove(&mut self, other: Self) {
                self.0 &= !other.0;
            }

            pub fn set(&mut self, other: Self, value: bool) {
                if value {
                    self.insert(other);
                } else {
                    self.remove(other);
                }
            }
        }

        impl std::ops::BitOr for $name {
            type Output = Self;
            fn bitor(self, rhs: Self) -> Self {
                Self(self.0 | rhs.0)
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({:#04x})", stringify!($name), self.0)
            }
        }
    };
}

flag_set! {
    /// State flags shared by every thing class
    pub struct ThingFlags(u8) {
        /// Pushed around by an outside force; the corpse only integrates velocity
        const FORCED_MOVE = 0x20;
        /// Held by something (being carried); decay is suspended
        const SUPPRESSED = 0x80;
    }
}

flag_set! {
    /// Flags kept apart from `ThingFlags` in the thing record
    pub struct ThingFlags1(u8) {
        /// Already died in lava; lava terrain does not delete it again
        const DEAD_BY_LAVA = 0x01;
    }
}

flag_set! {
    pub struct MovementFlags(u8) {
        /// Standing in water
        const WET = 0x01;
        /// Resting on the ground, not subject to falling
        const GROUNDED = 0x08;
    }
}

flag_set! {
    pub struct DrawFlags(u8) {
        /// Sprite is drawn with a blood trail
        const BLEEDING = 0x30;
    }
}

flag_set! {
    /// Options for thing pool allocation
    pub struct AllocFlags(u8) {
        /// Delete the oldest effect if no slot is free
        const FREE_EFFECT_IF_NO_SLOTS = 0x01;
    }
}

flag_set! {
    /// Per-subtile map block flags
    pub struct MapBlockFlags(u8) {
        const SOLID = 0x10;
        /// Terrain that does not hold bodies
        const DEAD_BODY_FORBIDDEN = 0x40;
    }
}

flag_set! {
    /// Axes along which a move is obstructed
    pub struct BlockedAxes(u8) {
        const X = 0x01;
        const Y = 0x02;
        const Z = 0x04;
        const ALL = 0x07;
    }
}
