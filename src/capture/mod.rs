//! Screen capture: screenshots to disk and movie frame recording

pub mod encoder;
pub mod message;
pub mod movie;
pub mod orchestrator;
pub mod palette;
pub mod surface;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use encoder::{encode_bmp, encode_raw};
pub use message::OnscreenMessage;
pub use movie::{FrameSequence, FrameView, MovieEncoder, MovieFrame};
pub use orchestrator::{ScreenCapture, MAX_SCREENSHOTS};
pub use palette::Palette;
pub use surface::{DisplaySurface, MemorySurface, ScreenLock};

/// On-disk screenshot format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenshotFormat {
    /// HSI raw: "mhwanh" header, palette, unpadded rows
    #[default]
    Raw,
    /// 8-bit indexed Windows bitmap
    Bmp,
}

impl ScreenshotFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ScreenshotFormat::Raw => "raw",
            ScreenshotFormat::Bmp => "bmp",
        }
    }
}

impl fmt::Display for ScreenshotFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ScreenshotFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "raw" => Ok(ScreenshotFormat::Raw),
            "bmp" => Ok(ScreenshotFormat::Bmp),
            other => Err(format!("unknown screenshot format '{}'", other)),
        }
    }
}
