//! Image processing module - static image metadata.
//!
//! Includes:
//! - Width/height from the image header (no full decode)
//! - EXIF `Orientation` tag lookup

use anyhow::{Context, Result};
use image::ImageReader;
use std::{fs::File, io::BufReader, path::Path};

// ────────────────────────────────────────────────────────────────
// Width/Height Calculation
// ────────────────────────────────────────────────────────────────

/// Return the stored `(width, height)` of an image, before any EXIF rotation.
pub fn generate_image_width_height(path: &Path) -> Result<(u32, u32)> {
    let reader = ImageReader::open(path)
        .context(format!("failed to open image: {:?}", path))?
        .with_guessed_format()
        .context(format!("failed to guess image format: {:?}", path))?;

    reader
        .into_dimensions()
        .context(format!("failed to read image dimensions: {:?}", path))
}

// ────────────────────────────────────────────────────────────────
// EXIF
// ────────────────────────────────────────────────────────────────

/// EXIF orientation code (1-8) of an image, if it carries one.
///
/// Missing or unreadable EXIF is not an error: the image is simply treated as
/// having no orientation tag.
pub fn generate_exif_orientation(path: &Path) -> Option<u32> {
    let file = File::open(path).ok()?;
    let mut reader = BufReader::new(file);
    let exif = exif::Reader::new().read_from_container(&mut reader).ok()?;

    exif.get_field(exif::Tag::Orientation, exif::In::PRIMARY)?
        .value
        .get_uint(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    #[test]
    fn reads_dimensions_from_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        ImageBuffer::from_pixel(40, 30, Rgb([255u8, 0, 0]))
            .save(&path)
            .unwrap();

        assert_eq!(generate_image_width_height(&path).unwrap(), (40, 30));
        assert_eq!(generate_exif_orientation(&path), None);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = generate_image_width_height(&dir.path().join("nope.jpg")).unwrap_err();
        assert!(format!("{err:#}").contains("failed to open image"));
    }
}
