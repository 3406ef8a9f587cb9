//! Movie recording collaborator

use crate::capture::palette::Palette;
use crate::core::error::{KeeperError, Result};

/// One frame handed to a movie encoder, borrowed from the locked screen
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub pixels: &'a [u8],
    pub width: usize,
    pub height: usize,
    pub stride: usize,
}

/// Receives frames while movie recording is on
pub trait MovieEncoder {
    /// Begin a recording
    fn start(&mut self) -> Result<()>;

    fn record_frame(&mut self, frame: FrameView<'_>, palette: &Palette) -> Result<()>;

    fn stop(&mut self);
}

/// A recorded movie frame with tightly packed rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieFrame {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u8>,
    pub palette: Palette,
}

/// Movie encoder that keeps every frame in memory
#[derive(Debug, Default)]
pub struct FrameSequence {
    frames: Vec<MovieFrame>,
    active: bool,
    max_frames: Option<usize>,
}

impl FrameSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse frames beyond `max_frames` per recording
    pub fn with_limit(max_frames: usize) -> Self {
        Self {
            max_frames: Some(max_frames),
            ..Self::default()
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn frames(&self) -> &[MovieFrame] {
        &self.frames
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

impl MovieEncoder for FrameSequence {
    fn start(&mut self) -> Result<()> {
        if self.active {
            return Err(KeeperError::EncodeOrWriteFailed(
                "movie recording already running".into(),
            ));
        }
        self.frames.clear();
        self.active = true;
        tracing::info!("Movie recording started");
        Ok(())
    }

    fn record_frame(&mut self, frame: FrameView<'_>, palette: &Palette) -> Result<()> {
        if !self.active {
            return Err(KeeperError::EncodeOrWriteFailed(
                "movie recording not started".into(),
            ));
        }
        if self.max_frames.is_some_and(|max| self.frames.len() >= max) {
            return Err(KeeperError::EncodeOrWriteFailed(format!(
                "movie frame limit of {} reached",
                self.frames.len()
            )));
        }

        let mut pixels = Vec::with_capacity(frame.width * frame.height);
        for y in 0..frame.height {
            let start = y * frame.stride;
            let row = frame.pixels.get(start..start + frame.width).ok_or_else(|| {
                KeeperError::EncodeOrWriteFailed(format!("frame buffer has no row {}", y))
            })?;
            pixels.extend_from_slice(row);
        }
        self.frames.push(MovieFrame {
            width: frame.width,
            height: frame.height,
            pixels,
            palette: palette.clone(),
        });
        Ok(())
    }

    fn stop(&mut self) {
        if self.active {
            tracing::info!("Movie recording stopped after {} frames", self.frames.len());
        }
        self.active = false;
    }
}
