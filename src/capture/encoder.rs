//! Screenshot encoders: RAW (HSI "mhwanh") and 8-bit Windows BMP
//!
//! Headers and the palette are written before the screen is locked; the
//! lock is held only while pixel rows are copied.

use crate::capture::palette::Palette;
use crate::capture::surface::{DisplaySurface, ScreenLock};
use crate::core::error::{KeeperError, Result};

pub const RAW_MAGIC: &[u8; 6] = b"mhwanh";
pub const RAW_VERSION: u16 = 4;
/// Magic, seven 16-bit header fields and six reserved ones
pub const RAW_HEADER_SIZE: usize = 6 + 2 * 7 + 2 * 6;

pub const BMP_FILE_HEADER_SIZE: u32 = 14;
pub const BMP_INFO_HEADER_SIZE: u32 = 40;
/// Both BMP headers; pixel data starts after the palette that follows
pub const BMP_HEADERS_SIZE: u32 = BMP_FILE_HEADER_SIZE + BMP_INFO_HEADER_SIZE;
pub const BMP_PALETTE_SIZE: u32 = 256 * 4;

/// Zero bytes appended to each BMP row to reach a multiple of four
pub fn bmp_row_padding(width: usize) -> usize {
    (4 - (width & 3)) & 3
}

fn copy_rows<S, I>(
    surface: &mut S,
    width: usize,
    rows: I,
    padding: usize,
    out: &mut Vec<u8>,
) -> Result<()>
where
    S: DisplaySurface + ?Sized,
    I: Iterator<Item = usize>,
{
    let screen = ScreenLock::acquire(surface)?;
    for y in rows {
        let row = screen.row(y, width).ok_or_else(|| {
            KeeperError::EncodeOrWriteFailed(format!("frame buffer has no row {}", y))
        })?;
        out.extend_from_slice(row);
        out.resize(out.len() + padding, 0);
    }
    Ok(())
}

/// Append a RAW screenshot of the surface to `out`; returns bytes written.
pub fn encode_raw<S>(surface: &mut S, palette: &Palette, out: &mut Vec<u8>) -> Result<usize>
where
    S: DisplaySurface + ?Sized,
{
    let start = out.len();
    let width = surface.width();
    let height = surface.height();

    out.extend_from_slice(RAW_MAGIC);
    for field in [RAW_VERSION, width as u16, height as u16, 256, 256, 256, 256] {
        out.extend_from_slice(&field.to_be_bytes());
    }
    for _ in 0..6 {
        out.extend_from_slice(&0u16.to_be_bytes());
    }
    out.extend(palette.as_bytes().iter().map(|c| c.wrapping_mul(4)));

    copy_rows(surface, width, 0..height, 0, out)?;
    Ok(out.len() - start)
}

/// Append an 8-bit bottom-up BMP of the surface to `out`; returns bytes
/// written.
pub fn encode_bmp<S>(surface: &mut S, palette: &Palette, out: &mut Vec<u8>) -> Result<usize>
where
    S: DisplaySurface + ?Sized,
{
    let start = out.len();
    let width = surface.width();
    let height = surface.height();
    let padding = bmp_row_padding(width);
    let data_len = ((width + padding) * height) as u32;

    out.extend_from_slice(b"BM");
    out.extend_from_slice(&(data_len + BMP_PALETTE_SIZE + BMP_HEADERS_SIZE).to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&(BMP_PALETTE_SIZE + BMP_HEADERS_SIZE).to_le_bytes());

    out.extend_from_slice(&BMP_INFO_HEADER_SIZE.to_le_bytes());
    out.extend_from_slice(&(width as i32).to_le_bytes());
    out.extend_from_slice(&(height as i32).to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&8u16.to_le_bytes());
    // compression, image size, resolution, colours used, colours important
    for _ in 0..6 {
        out.extend_from_slice(&0u32.to_le_bytes());
    }

    for &[r, g, b] in palette.colours() {
        let scale = |c: u8| (c as u32 * 4).min(255) as u8;
        out.extend_from_slice(&[scale(b), scale(g), scale(r), 0]);
    }

    copy_rows(surface, width, (0..height).rev(), padding, out)?;
    Ok(out.len() - start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::surface::MemorySurface;

    #[test]
    fn test_raw_layout() {
        let mut surface = MemorySurface::new(4, 2);
        for (i, x) in (0..8).zip((0..4).cycle()) {
            surface.set_pixel(x, i / 4, 10 + i as u8);
        }
        let mut out = Vec::new();
        let len = encode_raw(&mut surface, &Palette::default(), &mut out).unwrap();

        assert_eq!(len, RAW_HEADER_SIZE + 768 + 8);
        assert_eq!(RAW_HEADER_SIZE, 32);
        assert_eq!(len, out.len());
        assert_eq!(&out[..6], b"mhwanh");
        assert_eq!(&out[6..8], &[0, 4]);
        assert_eq!(&out[8..10], &[0, 4]);
        assert_eq!(&out[10..12], &[0, 2]);
        assert_eq!(&out[12..14], &[1, 0]);
        assert!(out[20..32].iter().all(|&b| b == 0));
        assert_eq!(&out[len - 8..], &[10, 11, 12, 13, 14, 15, 16, 17]);
        assert!(!surface.is_locked());
    }

    #[test]
    fn test_raw_palette_is_not_clamped() {
        let mut palette = Palette::default();
        palette.set_colour(0, [63, 64, 1]);
        let mut surface = MemorySurface::new(1, 1);
        let mut out = Vec::new();
        encode_raw(&mut surface, &palette, &mut out).unwrap();
        assert_eq!(&out[RAW_HEADER_SIZE..RAW_HEADER_SIZE + 3], &[252, 0, 4]);
    }

    #[test]
    fn test_raw_copies_logical_width_only() {
        let mut surface = MemorySurface::with_stride(2, 2, 6);
        surface.set_pixel(0, 0, 1);
        surface.set_pixel(1, 0, 2);
        surface.set_pixel(0, 1, 3);
        surface.set_pixel(1, 1, 4);
        let mut out = Vec::new();
        let len = encode_raw(&mut surface, &Palette::default(), &mut out).unwrap();
        assert_eq!(&out[len - 4..], &[1, 2, 3, 4]);
    }

    #[test]
    fn test_bmp_header_and_padding() {
        let mut surface = MemorySurface::new(5, 1);
        for x in 0..5 {
            surface.set_pixel(x, 0, x as u8 + 1);
        }
        let mut out = Vec::new();
        let len = encode_bmp(&mut surface, &Palette::default(), &mut out).unwrap();

        assert_eq!(bmp_row_padding(5), 3);
        assert_eq!(len, 0x36 + 1024 + 8);
        assert_eq!(&out[..2], b"BM");
        assert_eq!(u32::from_le_bytes(out[2..6].try_into().unwrap()), len as u32);
        assert_eq!(out[10], 0x36);
        assert_eq!(u32::from_le_bytes(out[10..14].try_into().unwrap()), 0x36 + 1024);
        assert_eq!(u32::from_le_bytes(out[14..18].try_into().unwrap()), 40);
        assert_eq!(u16::from_le_bytes(out[28..30].try_into().unwrap()), 8);
        assert_eq!(&out[len - 8..], &[1, 2, 3, 4, 5, 0, 0, 0]);
    }

    #[test]
    fn test_bmp_palette_is_bgr_and_clamped() {
        let mut palette = Palette::default();
        palette.set_colour(2, [1, 2, 70]);
        let mut surface = MemorySurface::new(4, 1);
        let mut out = Vec::new();
        encode_bmp(&mut surface, &palette, &mut out).unwrap();
        let entry = 0x36 + 2 * 4;
        assert_eq!(&out[entry..entry + 4], &[255, 8, 4, 0]);
    }

    #[test]
    fn test_bmp_rows_bottom_up_without_padding_for_width_four() {
        let mut surface = MemorySurface::new(4, 2);
        surface.fill(0);
        for x in 0..4 {
            surface.set_pixel(x, 0, 1);
            surface.set_pixel(x, 1, 2);
        }
        let mut out = Vec::new();
        let len = encode_bmp(&mut surface, &Palette::default(), &mut out).unwrap();
        assert_eq!(len, 0x436 + 8);
        assert_eq!(&out[0x436..], &[2, 2, 2, 2, 1, 1, 1, 1]);
    }

    #[test]
    fn test_outer_lock_is_kept() {
        let mut surface = MemorySurface::new(2, 2);
        assert!(surface.lock());
        let mut out = Vec::new();
        encode_bmp(&mut surface, &Palette::default(), &mut out).unwrap();
        assert!(surface.is_locked());
        assert_eq!(surface.lock_count(), 1);
    }

    #[test]
    fn test_lock_failure_aborts_encoding() {
        let mut surface = MemorySurface::new(2, 2);
        surface.refuse_locks(true);
        let mut out = Vec::new();
        let result = encode_raw(&mut surface, &Palette::default(), &mut out);
        assert!(matches!(result, Err(KeeperError::LockAcquisitionFailed)));
    }
}
