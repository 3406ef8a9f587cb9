//! Per-frame screenshot and movie capture
//!
//! The capture state that used to be process-wide (next screenshot number,
//! requested and recording flags) lives on `ScreenCapture`, which the
//! renderer calls once per drawn frame.

use std::fs;
use std::path::{Path, PathBuf};

use crate::capture::encoder::{encode_bmp, encode_raw};
use crate::capture::message::OnscreenMessage;
use crate::capture::movie::{FrameSequence, FrameView, MovieEncoder};
use crate::capture::surface::{DisplaySurface, ScreenLock};
use crate::capture::ScreenshotFormat;
use crate::core::config::CaptureConfig;
use crate::core::error::{KeeperError, Result};

/// Screenshot numbers run from 0 up to this bound, exclusive
pub const MAX_SCREENSHOTS: u32 = 10000;

/// Where the "REC" marker is drawn, in screen pixels
const REC_MARKER_POS: (i32, i32) = (600, 4);

pub struct ScreenCapture<M: MovieEncoder = FrameSequence> {
    format: ScreenshotFormat,
    directory: PathBuf,
    message_frames: u32,
    /// First screenshot number worth probing for a free filename
    frame_number: u32,
    screenshot_requested: bool,
    recording: bool,
    movie: M,
    message: OnscreenMessage,
}

impl ScreenCapture<FrameSequence> {
    pub fn new(config: &CaptureConfig) -> Self {
        Self::with_movie_encoder(config, FrameSequence::new())
    }
}

impl<M: MovieEncoder> ScreenCapture<M> {
    pub fn with_movie_encoder(config: &CaptureConfig, movie: M) -> Self {
        Self {
            format: config.format,
            directory: config.directory.clone(),
            message_frames: config.message_frames,
            frame_number: 0,
            screenshot_requested: false,
            recording: false,
            movie,
            message: OnscreenMessage::new(),
        }
    }

    pub fn format(&self) -> ScreenshotFormat {
        self.format
    }

    pub fn set_format(&mut self, format: ScreenshotFormat) {
        self.format = format;
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn frame_number(&self) -> u32 {
        self.frame_number
    }

    /// Take a screenshot on the next captured frame
    pub fn request_screenshot(&mut self) {
        self.screenshot_requested = true;
    }

    pub fn screenshot_requested(&self) -> bool {
        self.screenshot_requested
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn movie(&self) -> &M {
        &self.movie
    }

    pub fn message(&self) -> &OnscreenMessage {
        &self.message
    }

    /// `<directory>/scrNNNNN.<ext>` for screenshot number `number`
    pub fn screenshot_path(&self, number: u32) -> PathBuf {
        self.directory
            .join(format!("scr{:05}.{}", number, self.format.extension()))
    }

    /// Write a screenshot of the surface to the first free filename.
    ///
    /// The outcome is also shown as an on-screen message.
    pub fn cumulative_screen_shot<S>(&mut self, surface: &mut S) -> Result<PathBuf>
    where
        S: DisplaySurface + ?Sized,
    {
        let free = (self.frame_number..MAX_SCREENSHOTS)
            .find(|&number| !self.screenshot_path(number).exists());
        let Some(number) = free else {
            self.frame_number = MAX_SCREENSHOTS;
            self.message
                .show("No free filename for screenshot.", self.message_frames);
            return Err(KeeperError::NoFreeFilename);
        };
        self.frame_number = number;
        let path = self.screenshot_path(number);

        let (width, height) = (surface.width(), surface.height());
        let mut buf = Vec::with_capacity((width + 3) * height + 2048);
        let palette = surface.palette().clone();
        let encoded = match self.format {
            ScreenshotFormat::Raw => encode_raw(surface, &palette, &mut buf),
            ScreenshotFormat::Bmp => encode_bmp(surface, &palette, &mut buf),
        };
        let result = encoded.and_then(|len| {
            if len == 0 {
                return Err(KeeperError::EncodeOrWriteFailed("empty screenshot".into()));
            }
            fs::create_dir_all(&self.directory)
                .and_then(|()| fs::write(&path, &buf))
                .map_err(|err| {
                    KeeperError::EncodeOrWriteFailed(format!("{}: {}", path.display(), err))
                })
        });
        drop(buf);

        match &result {
            Ok(()) => {
                tracing::info!("Screenshot saved to {}", path.display());
                self.message.show(
                    format!("File \"{}\" saved.", path.display()),
                    self.message_frames,
                );
            }
            Err(err) => {
                tracing::warn!("Screenshot {} failed: {}", path.display(), err);
                self.message.show(
                    format!("Cannot save \"{}\".", path.display()),
                    self.message_frames,
                );
            }
        }
        self.frame_number += 1;
        result.map(|()| path)
    }

    /// Start movie recording; the recording flag is only set if the encoder
    /// accepted the start.
    pub fn movie_record_start(&mut self) -> bool {
        match self.movie.start() {
            Ok(()) => {
                self.recording = true;
                true
            }
            Err(err) => {
                tracing::warn!("Movie recording not started: {}", err);
                false
            }
        }
    }

    pub fn movie_record_stop(&mut self) {
        self.recording = false;
        self.movie.stop();
    }

    /// Hand the current frame to the movie encoder
    pub fn movie_record_frame<S>(&mut self, surface: &mut S) -> bool
    where
        S: DisplaySurface + ?Sized,
    {
        let Ok(screen) = ScreenLock::acquire(surface) else {
            return false;
        };
        let palette = screen.palette().clone();
        let frame = FrameView {
            pixels: screen.pixels(),
            width: screen.width(),
            height: screen.height(),
            stride: screen.stride(),
        };
        match self.movie.record_frame(frame, &palette) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!("Movie frame dropped: {}", err);
                false
            }
        }
    }

    /// Run the captures due this frame; draws "REC" if anything was
    /// captured and returns whether it was.
    pub fn perform_any_screen_capturing<S>(&mut self, surface: &mut S) -> bool
    where
        S: DisplaySurface + ?Sized,
    {
        self.message.tick();
        let mut captured = false;
        if self.screenshot_requested {
            captured |= self.cumulative_screen_shot(surface).is_ok();
            self.screenshot_requested = false;
        }
        if self.recording {
            captured |= self.movie_record_frame(surface);
        }
        if captured {
            let scale = surface.pixel_size().max(1) as i32;
            surface.draw_text(REC_MARKER_POS.0 / scale, REC_MARKER_POS.1 / scale, "REC");
        }
        captured
    }
}
