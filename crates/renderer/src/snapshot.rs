//! Snapshot capture for lead submissions: one forced render, bounded
//! downsample, JPEG encode.

use anyhow::Result;
use base64::Engine as _;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::RgbaImage;
use std::io::Cursor;

/// Snapshots wider than this are downsampled before encoding.
pub const MAX_SNAPSHOT_WIDTH: u32 = 1024;

/// JPEG quality for encoded snapshots.
const JPEG_QUALITY: u8 = 82;

/// Anything that can produce one frame of the composited scene.
/// The preview raster implements this in the configurator; tests use
/// synthetic surfaces.
pub trait RenderSurface {
    fn render_frame(&mut self) -> Result<RgbaImage>;
}

impl<F: FnMut() -> Result<RgbaImage>> RenderSurface for F {
    fn render_frame(&mut self) -> Result<RgbaImage> {
        self()
    }
}

/// An encoded still frame of the scene.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl Snapshot {
    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    /// `data:image/jpeg;base64,…` form for the JSON wire contract.
    pub fn to_data_uri(&self) -> String {
        format!(
            "data:image/jpeg;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

/// Force one render of `surface`, downsample to at most
/// [`MAX_SNAPSHOT_WIDTH`] preserving aspect, and encode as JPEG.
///
/// Callers treat failure as "submit without an image"; this function
/// never blocks beyond the single render it forces.
pub fn capture(surface: &mut dyn RenderSurface) -> Result<Snapshot> {
    let frame = surface.render_frame()?;
    let frame = bound_width(frame, MAX_SNAPSHOT_WIDTH);
    let (width, height) = frame.dimensions();

    // JPEG has no alpha channel; flatten before encoding.
    let rgb = image::DynamicImage::ImageRgba8(frame).to_rgb8();
    let mut bytes = Vec::new();
    let encoder = JpegEncoder::new_with_quality(Cursor::new(&mut bytes), JPEG_QUALITY);
    image::DynamicImage::ImageRgb8(rgb).write_with_encoder(encoder)?;
    log::debug!("captured snapshot {width}x{height}, {} bytes", bytes.len());
    Ok(Snapshot { bytes, width, height })
}

fn bound_width(img: RgbaImage, max_width: u32) -> RgbaImage {
    let (w, h) = img.dimensions();
    if w <= max_width {
        return img;
    }
    let scaled_h = ((h as u64 * max_width as u64) / w as u64).max(1) as u32;
    image::imageops::resize(&img, max_width, scaled_h, FilterType::Triangle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn capture_encodes_jpeg_with_bounded_width() {
        let mut surface = || Ok(RgbaImage::from_pixel(2048, 1024, image::Rgba([40, 80, 160, 255])));
        let snap = capture(&mut surface).unwrap();
        assert_eq!(snap.width, MAX_SNAPSHOT_WIDTH);
        assert_eq!(snap.height, 512);
        // JPEG SOI marker.
        assert_eq!(&snap.bytes[..2], &[0xff, 0xd8]);
    }

    #[test]
    fn small_frames_are_not_upscaled() {
        let mut surface = || Ok(RgbaImage::from_pixel(320, 200, image::Rgba([0, 0, 0, 255])));
        let snap = capture(&mut surface).unwrap();
        assert_eq!((snap.width, snap.height), (320, 200));
    }

    #[test]
    fn surface_error_propagates() {
        let mut surface = || Err(anyhow!("context lost"));
        assert!(capture(&mut surface).is_err());
    }

    #[test]
    fn data_uri_has_expected_prefix() {
        let snap = Snapshot { bytes: vec![1, 2, 3], width: 1, height: 1 };
        assert!(snap.to_data_uri().starts_with("data:image/jpeg;base64,"));
    }
}
