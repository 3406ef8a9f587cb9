//! 256-colour display palette with 6-bit channels

/// Bytes in a packed RGB palette
pub const PALETTE_SIZE: usize = 768;

/// Display palette. Channels are 6-bit (0..=63) as the video hardware
/// stores them; encoders scale them by 4.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colours: [[u8; 3]; 256],
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colours: [[0; 3]; 256],
        }
    }
}

impl Palette {
    pub fn new(colours: [[u8; 3]; 256]) -> Self {
        Self { colours }
    }

    /// Read a packed RGB palette; `None` unless exactly 768 bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != PALETTE_SIZE {
            return None;
        }
        let mut palette = Self::default();
        bytemuck::cast_slice_mut::<[u8; 3], u8>(palette.colours.as_mut_slice()).copy_from_slice(bytes);
        Some(palette)
    }

    /// Grey ramp spread over the 6-bit range
    pub fn greyscale() -> Self {
        let mut palette = Self::default();
        for (index, colour) in palette.colours.iter_mut().enumerate() {
            let level = (index / 4) as u8;
            *colour = [level; 3];
        }
        palette
    }

    /// Packed RGB bytes, 768 long
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.colours.as_slice())
    }

    pub fn colour(&self, index: u8) -> [u8; 3] {
        self.colours[index as usize]
    }

    pub fn set_colour(&mut self, index: u8, rgb: [u8; 3]) {
        self.colours[index as usize] = rgb;
    }

    pub fn colours(&self) -> &[[u8; 3]; 256] {
        &self.colours
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packed_layout() {
        let mut palette = Palette::default();
        palette.set_colour(1, [10, 20, 30]);
        let bytes = palette.as_bytes();
        assert_eq!(bytes.len(), PALETTE_SIZE);
        assert_eq!(&bytes[3..6], &[10, 20, 30]);

        let parsed = Palette::from_bytes(bytes).unwrap();
        assert_eq!(parsed, palette);
        assert!(Palette::from_bytes(&bytes[..767]).is_none());
    }

    #[test]
    fn test_greyscale_stays_six_bit() {
        let palette = Palette::greyscale();
        assert_eq!(palette.colour(0), [0, 0, 0]);
        assert_eq!(palette.colour(255), [63, 63, 63]);
    }
}
