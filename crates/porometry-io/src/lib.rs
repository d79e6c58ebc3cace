//! Image file reading and writing
//!
//! Thin adapters between files on disk and the raster types in
//! porometry-core. Decoding is delegated to the `image` crate, so every
//! format it understands (PNG, JPEG, TIFF, BMP, ...) works here.

use std::path::Path;

use porometry_core::{Gray8, Mask, Rgb8};

pub mod error;

pub use error::{IoError, IoResult};

/// Read an image file and convert it to 8-bit grayscale.
///
/// Color inputs are reduced with the decoder's luma conversion.
///
/// # Errors
///
/// Returns [`IoError::Read`] when the file is missing or cannot be
/// decoded.
pub fn read_grayscale<P: AsRef<Path>>(path: P) -> IoResult<Gray8> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|source| IoError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let luma = img.to_luma8();
    let (w, h) = luma.dimensions();
    Ok(Gray8::from_vec(w, h, luma.into_raw())?)
}

/// Read an image file as interleaved 8-bit RGB.
///
/// # Errors
///
/// Returns [`IoError::Read`] when the file is missing or cannot be
/// decoded.
pub fn read_rgb<P: AsRef<Path>>(path: P) -> IoResult<Rgb8> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|source| IoError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let rgb = img.to_rgb8();
    let (w, h) = rgb.dimensions();
    Ok(Rgb8::from_vec(w, h, rgb.into_raw())?)
}

/// Write a grayscale raster to a file; format follows the extension.
///
/// # Errors
///
/// Returns [`IoError::Write`] on encoding or filesystem failure.
pub fn write_grayscale<P: AsRef<Path>>(path: P, gray: &Gray8) -> IoResult<()> {
    let path = path.as_ref();
    save_luma(path, gray.width(), gray.height(), gray.data().to_vec())
}

/// Write a binary mask as a white-on-black grayscale file.
///
/// # Errors
///
/// Returns [`IoError::Write`] on encoding or filesystem failure.
pub fn write_mask<P: AsRef<Path>>(path: P, mask: &Mask) -> IoResult<()> {
    let path = path.as_ref();
    save_luma(path, mask.width(), mask.height(), mask.data().to_vec())
}

fn save_luma(path: &Path, width: u32, height: u32, data: Vec<u8>) -> IoResult<()> {
    let buf = image::GrayImage::from_raw(width, height, data)
        .ok_or_else(|| IoError::Write {
            path: path.to_path_buf(),
            source: image::ImageError::Parameter(image::error::ParameterError::from_kind(
                image::error::ParameterErrorKind::DimensionMismatch,
            )),
        })?;
    buf.save(path).map_err(|source| IoError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use porometry_core::{Gray8Mut, MaskMut};
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        let mut p = std::env::temp_dir();
        p.push(format!("porometry-io-{}-{}", std::process::id(), name));
        p
    }

    #[test]
    fn test_grayscale_round_trip() {
        let mut m = Gray8Mut::new(5, 3).unwrap();
        for y in 0..3 {
            for x in 0..5 {
                m.set_unchecked(x, y, (x * 40 + y * 10) as u8);
            }
        }
        let g: Gray8 = m.into();

        let path = temp_path("gray.png");
        write_grayscale(&path, &g).unwrap();
        let back = read_grayscale(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(back.width(), 5);
        assert_eq!(back.height(), 3);
        assert_eq!(back.data(), g.data());
    }

    #[test]
    fn test_mask_round_trip() {
        let mut m = MaskMut::new(4, 4).unwrap();
        m.set_on(1, 1);
        m.set_on(2, 3);
        let mask: Mask = m.into();

        let path = temp_path("mask.png");
        write_mask(&path, &mask).unwrap();
        let back = read_grayscale(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(back.get(1, 1), Some(255));
        assert_eq!(back.get(0, 0), Some(0));
    }

    #[test]
    fn test_read_rgb_converts_to_luma() {
        let mut img = image::RgbImage::new(2, 1);
        img.put_pixel(0, 0, image::Rgb([255, 0, 0]));
        img.put_pixel(1, 0, image::Rgb([255, 255, 255]));
        let path = temp_path("rgb.png");
        img.save(&path).unwrap();

        let rgb = read_rgb(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(rgb.get(0, 0), Some((255, 0, 0)));
        assert_eq!(rgb.to_luma().get_unchecked(1, 0), 255);
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = read_grayscale("/nonexistent/porometry.png").unwrap_err();
        assert!(matches!(err, IoError::Read { .. }));
    }
}
