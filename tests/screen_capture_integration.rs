//! Integration tests for screen capture
//!
//! Screenshots are written into a temporary directory and read back:
//! - RAW files are checked byte by byte against the header layout
//! - BMP files are decoded with the `image` crate
//! - Movie frames and the "REC" marker are checked per captured frame

use std::fs;

use dungeon_remains::capture::encoder::{RAW_HEADER_SIZE, RAW_MAGIC};
use dungeon_remains::capture::{
    DisplaySurface, MemorySurface, Palette, ScreenCapture, ScreenshotFormat, MAX_SCREENSHOTS,
};
use dungeon_remains::core::config::CaptureConfig;
use dungeon_remains::core::KeeperError;
use image::ImageFormat;

fn capture_into(dir: &std::path::Path, format: ScreenshotFormat) -> ScreenCapture {
    ScreenCapture::new(&CaptureConfig {
        format,
        directory: dir.join("scrshots"),
        message_frames: 3,
    })
}

fn vivid_palette() -> Palette {
    let mut palette = Palette::greyscale();
    palette.set_colour(7, [70, 10, 20]);
    palette.set_colour(9, [0, 63, 1]);
    palette
}

// ============================================================================
// Screenshots
// ============================================================================

/// Integration test: a RAW screenshot lands on disk with its header
///
/// 1. Request a screenshot of a 4x2 frame
/// 2. Capture one frame
/// 3. The file holds header, palette and unpadded rows
#[test]
fn test_raw_screenshot_written_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let mut capture = capture_into(dir.path(), ScreenshotFormat::Raw);
    let mut surface = MemorySurface::new(4, 2);
    surface.set_pixel(3, 1, 200);

    capture.request_screenshot();
    assert!(capture.perform_any_screen_capturing(&mut surface));
    assert!(!capture.screenshot_requested());

    let bytes = fs::read(capture.screenshot_path(0)).unwrap();
    assert_eq!(bytes.len(), RAW_HEADER_SIZE + 768 + 8);
    assert_eq!(&bytes[0..6], RAW_MAGIC);
    assert_eq!(&bytes[8..10], &[0, 4]);
    assert_eq!(&bytes[10..12], &[0, 2]);
    assert_eq!(bytes[bytes.len() - 1], 200);
    assert!(!surface.is_locked());
}

/// Integration test: a BMP screenshot decodes to the frame it was taken of
///
/// 1. Draw two marked pixels on a 5x3 frame (rows need padding)
/// 2. Save it as BMP
/// 3. Decode it and compare the colours, scaled from the 6-bit palette
#[test]
fn test_bmp_screenshot_decodes() {
    let dir = tempfile::tempdir().unwrap();
    let mut capture = capture_into(dir.path(), ScreenshotFormat::Bmp);
    let mut surface = MemorySurface::new(5, 3);
    surface.set_palette(vivid_palette());
    surface.set_pixel(0, 0, 7);
    surface.set_pixel(4, 2, 9);

    let path = capture.cumulative_screen_shot(&mut surface).unwrap();
    assert_eq!(path.file_name().unwrap(), "scr00000.bmp");

    let bytes = fs::read(&path).unwrap();
    assert_eq!(bytes.len(), 0x436 + 8 * 3);
    let img = image::load_from_memory_with_format(&bytes, ImageFormat::Bmp)
        .unwrap()
        .to_rgb8();
    assert_eq!(img.dimensions(), (5, 3));
    assert_eq!(img.get_pixel(0, 0).0, [255, 40, 80]);
    assert_eq!(img.get_pixel(4, 2).0, [0, 252, 4]);
    assert_eq!(img.get_pixel(2, 1).0, [0, 0, 0]);
}

#[test]
fn test_screenshots_take_consecutive_names() {
    let dir = tempfile::tempdir().unwrap();
    let mut capture = capture_into(dir.path(), ScreenshotFormat::Bmp);
    let mut surface = MemorySurface::new(8, 8);

    for expected in ["scr00000.bmp", "scr00001.bmp", "scr00002.bmp"] {
        capture.request_screenshot();
        capture.perform_any_screen_capturing(&mut surface);
        assert!(capture.directory().join(expected).exists());
    }
    assert_eq!(capture.frame_number(), 3);
    assert_eq!(
        capture.message().text(),
        Some(format!("File \"{}\" saved.", capture.screenshot_path(2).display()).as_str())
    );

    // A fresh session starts from zero and skips what is on disk
    let mut later = capture_into(dir.path(), ScreenshotFormat::Bmp);
    let path = later.cumulative_screen_shot(&mut surface).unwrap();
    assert_eq!(path.file_name().unwrap(), "scr00003.bmp");
}

#[test]
fn test_exhausted_numbers_give_no_filename() {
    let dir = tempfile::tempdir().unwrap();
    let mut capture = capture_into(dir.path(), ScreenshotFormat::Raw);
    let mut surface = MemorySurface::new(4, 4);
    fs::create_dir_all(capture.directory()).unwrap();
    for n in 0..MAX_SCREENSHOTS {
        fs::write(capture.screenshot_path(n), b"").unwrap();
    }

    let result = capture.cumulative_screen_shot(&mut surface);
    assert!(matches!(result, Err(KeeperError::NoFreeFilename)));
    assert_eq!(capture.frame_number(), MAX_SCREENSHOTS);
    assert_eq!(
        capture.message().text(),
        Some("No free filename for screenshot.")
    );
}

#[test]
fn test_locked_out_screen_saves_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let mut capture = capture_into(dir.path(), ScreenshotFormat::Bmp);
    let mut surface = MemorySurface::new(4, 4);
    surface.refuse_locks(true);

    capture.request_screenshot();
    assert!(!capture.perform_any_screen_capturing(&mut surface));
    assert!(!capture.screenshot_path(0).exists());
    assert!(surface.drawn_text().is_empty());
    assert_eq!(
        capture.message().text(),
        Some(format!("Cannot save \"{}\".", capture.screenshot_path(0).display()).as_str())
    );
}

// ============================================================================
// Movie Recording
// ============================================================================

/// Integration test: recording captures one frame per rendered frame
///
/// 1. Start recording
/// 2. Render three frames, changing a pixel each time
/// 3. Stop; the recording holds the three frames and "REC" was drawn on each
#[test]
fn test_movie_records_each_frame() {
    let dir = tempfile::tempdir().unwrap();
    let mut capture = capture_into(dir.path(), ScreenshotFormat::Raw);
    let mut surface = MemorySurface::with_stride(6, 2, 8);
    surface.set_pixel_size(2);

    assert!(capture.movie_record_start());
    assert!(capture.is_recording());
    for frame in 0..3u8 {
        surface.set_pixel(5, 1, frame + 1);
        assert!(capture.perform_any_screen_capturing(&mut surface));
    }
    capture.movie_record_stop();
    assert!(!capture.is_recording());
    assert!(!capture.perform_any_screen_capturing(&mut surface));

    let frames = capture.movie().frames();
    assert_eq!(frames.len(), 3);
    for (n, frame) in frames.iter().enumerate() {
        assert_eq!(frame.pixels.len(), 12);
        assert_eq!(frame.pixels[11], n as u8 + 1);
    }

    let marks = surface.drawn_text();
    assert_eq!(marks.len(), 3);
    assert!(marks
        .iter()
        .all(|mark| mark.text == "REC" && (mark.x, mark.y) == (300, 2)));
}

#[test]
fn test_screenshot_and_movie_in_same_frame() {
    let dir = tempfile::tempdir().unwrap();
    let mut capture = capture_into(dir.path(), ScreenshotFormat::Raw);
    let mut surface = MemorySurface::new(4, 4);

    capture.movie_record_start();
    capture.request_screenshot();
    assert!(capture.perform_any_screen_capturing(&mut surface));

    assert!(capture.screenshot_path(0).exists());
    assert_eq!(capture.movie().frame_count(), 1);
    assert_eq!(surface.drawn_text().len(), 1);
    assert_eq!(surface.lock_count(), 2);
}

/// The saved-file message lasts for the configured number of frames
#[test]
fn test_message_expires() {
    let dir = tempfile::tempdir().unwrap();
    let mut capture = capture_into(dir.path(), ScreenshotFormat::Raw);
    let mut surface = MemorySurface::new(4, 4);

    capture.request_screenshot();
    capture.perform_any_screen_capturing(&mut surface);
    for _ in 0..2 {
        capture.perform_any_screen_capturing(&mut surface);
        assert!(capture.message().text().is_some());
    }
    capture.perform_any_screen_capturing(&mut surface);
    assert!(capture.message().text().is_none());
}
