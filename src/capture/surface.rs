//! Frame buffer access and the screen lock discipline
//!
//! Whoever needs the pixels takes a `ScreenLock`. If the surface is already
//! locked by an outer caller the guard borrows that lock and leaves it held
//! on drop; otherwise it locks the surface itself and unlocks it again.

use std::ops::{Deref, DerefMut};

use crate::capture::palette::Palette;
use crate::core::error::{KeeperError, Result};

/// An 8-bit indexed display surface
pub trait DisplaySurface {
    fn is_locked(&self) -> bool;

    /// Try to lock the surface; false if it cannot be locked right now
    fn lock(&mut self) -> bool;

    fn unlock(&mut self);

    /// Logical width in pixels (screen width divided by pixel size)
    fn width(&self) -> usize;

    /// Logical height in pixels
    fn height(&self) -> usize;

    /// Bytes between the starts of consecutive rows
    fn stride(&self) -> usize;

    /// Screen pixels are drawn this many times larger than logical ones
    fn pixel_size(&self) -> u32;

    /// Raw pixel rows; only meaningful while the surface is locked
    fn pixels(&self) -> &[u8];

    fn palette(&self) -> &Palette;

    fn draw_text(&mut self, x: i32, y: i32, text: &str);
}

/// Scoped surface lock that releases only what it acquired
pub struct ScreenLock<'a, S: DisplaySurface + ?Sized> {
    surface: &'a mut S,
    acquired: bool,
}

impl<'a, S: DisplaySurface + ?Sized> ScreenLock<'a, S> {
    pub fn acquire(surface: &'a mut S) -> Result<Self> {
        if surface.is_locked() {
            return Ok(Self {
                surface,
                acquired: false,
            });
        }
        if !surface.lock() {
            tracing::error!("Can't lock canvas");
            return Err(KeeperError::LockAcquisitionFailed);
        }
        Ok(Self {
            surface,
            acquired: true,
        })
    }

    /// Whether this guard took the lock itself
    pub fn acquired(&self) -> bool {
        self.acquired
    }

    /// Pixel row `y`, `width` bytes long, or `None` past the buffer end
    pub fn row(&self, y: usize, width: usize) -> Option<&[u8]> {
        let start = y * self.surface.stride();
        self.surface.pixels().get(start..start + width)
    }
}

impl<S: DisplaySurface + ?Sized> Deref for ScreenLock<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.surface
    }
}

impl<S: DisplaySurface + ?Sized> DerefMut for ScreenLock<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.surface
    }
}

impl<S: DisplaySurface + ?Sized> Drop for ScreenLock<'_, S> {
    fn drop(&mut self) {
        if self.acquired {
            self.surface.unlock();
        }
    }
}

/// Text drawn onto a `MemorySurface`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawnText {
    pub x: i32,
    pub y: i32,
    pub text: String,
}

/// Frame buffer kept in memory
#[derive(Debug, Clone)]
pub struct MemorySurface {
    width: usize,
    height: usize,
    stride: usize,
    pixel_size: u32,
    pixels: Vec<u8>,
    palette: Palette,
    locked: bool,
    refuse_lock: bool,
    lock_count: usize,
    texts: Vec<DrawnText>,
}

impl MemorySurface {
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_stride(width, height, width)
    }

    /// Surface whose rows are `stride` bytes apart (`stride >= width`)
    pub fn with_stride(width: usize, height: usize, stride: usize) -> Self {
        let stride = stride.max(width);
        Self {
            width,
            height,
            stride,
            pixel_size: 1,
            pixels: vec![0; stride * height],
            palette: Palette::greyscale(),
            locked: false,
            refuse_lock: false,
            lock_count: 0,
            texts: Vec::new(),
        }
    }

    pub fn set_pixel_size(&mut self, pixel_size: u32) {
        self.pixel_size = pixel_size.max(1);
    }

    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, colour: u8) {
        if x < self.width && y < self.height {
            self.pixels[y * self.stride + x] = colour;
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> u8 {
        self.pixels[y * self.stride + x]
    }

    pub fn fill(&mut self, colour: u8) {
        self.pixels.fill(colour);
    }

    /// Make every later `lock()` fail, as a lost video device does
    pub fn refuse_locks(&mut self, refuse: bool) {
        self.refuse_lock = refuse;
    }

    /// Successful `lock()` calls so far
    pub fn lock_count(&self) -> usize {
        self.lock_count
    }

    pub fn drawn_text(&self) -> &[DrawnText] {
        &self.texts
    }
}

impl DisplaySurface for MemorySurface {
    fn is_locked(&self) -> bool {
        self.locked
    }

    fn lock(&mut self) -> bool {
        if self.refuse_lock || self.locked {
            return false;
        }
        self.locked = true;
        self.lock_count += 1;
        true
    }

    fn unlock(&mut self) {
        self.locked = false;
    }

    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn stride(&self) -> usize {
        self.stride
    }

    fn pixel_size(&self) -> u32 {
        self.pixel_size
    }

    fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    fn palette(&self) -> &Palette {
        &self.palette
    }

    fn draw_text(&mut self, x: i32, y: i32, text: &str) {
        self.texts.push(DrawnText {
            x,
            y,
            text: text.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_locks_and_unlocks() {
        let mut surface = MemorySurface::new(4, 4);
        {
            let guard = ScreenLock::acquire(&mut surface).unwrap();
            assert!(guard.acquired());
            assert!(guard.is_locked());
        }
        assert!(!surface.is_locked());
        assert_eq!(surface.lock_count(), 1);
    }

    #[test]
    fn test_guard_keeps_outer_lock() {
        let mut surface = MemorySurface::new(4, 4);
        assert!(surface.lock());
        {
            let guard = ScreenLock::acquire(&mut surface).unwrap();
            assert!(!guard.acquired());
        }
        assert!(surface.is_locked());
        assert_eq!(surface.lock_count(), 1);
    }

    #[test]
    fn test_refused_lock_is_error() {
        let mut surface = MemorySurface::new(4, 4);
        surface.refuse_locks(true);
        assert!(matches!(
            ScreenLock::acquire(&mut surface),
            Err(KeeperError::LockAcquisitionFailed)
        ));
        assert!(!surface.is_locked());
    }

    #[test]
    fn test_rows_follow_stride() {
        let mut surface = MemorySurface::with_stride(3, 2, 8);
        surface.set_pixel(0, 1, 7);
        surface.set_pixel(2, 1, 9);
        let guard = ScreenLock::acquire(&mut surface).unwrap();
        assert_eq!(guard.row(1, 3), Some(&[7, 0, 9][..]));
        assert_eq!(guard.row(2, 3), None);
    }
}
