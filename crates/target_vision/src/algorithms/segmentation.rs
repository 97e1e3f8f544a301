use image::{GrayImage, RgbaImage};
use crate::{error::Result, traits::Segmenter, types::ColorRange};

pub const FOREGROUND: u8 = 255;
pub const BACKGROUND: u8 = 0;

/// Converts an RGB triple to HSV with every channel scaled to a byte.
///
/// Hue spans the full 0-255 range (degrees * 255 / 360), saturation is
/// 255 * (max - min) / max and value is the largest channel.
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    if max == min {
        return (0, 0, max);
    }

    let delta = (max - min) as f32;
    let (rf, gf, bf) = (r as f32, g as f32, b as f32);
    let hue = if max == r {
        60.0 * (((gf - bf) / delta) % 6.0)
    } else if max == g {
        60.0 * (((bf - rf) / delta) + 2.0)
    } else {
        60.0 * (((rf - gf) / delta) + 4.0)
    };
    let hue = if hue < 0.0 { hue + 360.0 } else { hue };

    let h = (hue * 255.0 / 360.0).round().min(255.0) as u8;
    let s = (255.0 * delta / max as f32).round() as u8;
    (h, s, max)
}

/// Thresholds an RGBA frame in HSV space; alpha is ignored
#[derive(Debug, Clone, Default)]
pub struct HsvSegmenter;

impl Segmenter for HsvSegmenter {
    fn segment_into(&self, frame: &RgbaImage, range: &ColorRange, mask: &mut GrayImage) -> Result<()> {
        if mask.dimensions() != frame.dimensions() {
            *mask = GrayImage::new(frame.width(), frame.height());
        }

        for (pixel, out) in frame.as_raw().chunks_exact(4).zip(mask.iter_mut()) {
            let (h, s, v) = rgb_to_hsv(pixel[0], pixel[1], pixel[2]);
            *out = if range.contains(h, s, v) { FOREGROUND } else { BACKGROUND };
        }

        Ok(())
    }
}
