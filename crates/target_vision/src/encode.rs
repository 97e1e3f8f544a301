use image::{codecs::jpeg::JpegEncoder, imageops, DynamicImage, RgbImage, RgbaImage};
use tracing::debug;

use crate::error::{Result, VisionError};

/// Bytes reserved for the length trailer
pub const TRAILER_LEN: usize = 4;

/// Size of the raw RGBA region that precedes the trailer
pub fn payload_capacity(width: u32, height: u32) -> usize {
    width as usize * height as usize * 4
}

/// Output buffer size a caller must provide for a `width` x `height` frame
pub fn required_buffer_len(width: u32, height: u32) -> usize {
    payload_capacity(width, height) + TRAILER_LEN
}

/// Read the big-endian encoded length stored after the payload region
pub fn read_trailer(buffer: &[u8], width: u32, height: u32) -> Option<u32> {
    let offset = payload_capacity(width, height);
    let bytes: [u8; TRAILER_LEN] = buffer.get(offset..offset + TRAILER_LEN)?.try_into().ok()?;
    Some(u32::from_be_bytes(bytes))
}

/// JPEG-encodes preview frames into a fixed-layout byte buffer:
/// `[jpeg bytes .. | unused .. | len: u32 BE at W*H*4]`
#[derive(Debug, Clone)]
pub struct FrameEncoder {
    pub quality: u8,
}

impl Default for FrameEncoder {
    fn default() -> Self {
        Self { quality: 95 }
    }
}

impl FrameEncoder {
    pub fn new(quality: u8) -> Self {
        Self { quality: quality.clamp(1, 100) }
    }

    /// Rows flipped (GL read-back is bottom-up) and alpha dropped, in the
    /// channel order the JPEG encoder expects
    pub fn prepare(&self, frame: &RgbaImage) -> RgbImage {
        DynamicImage::ImageRgba8(imageops::flip_vertical(frame)).to_rgb8()
    }

    pub fn encode(&self, frame: &RgbaImage) -> Result<Vec<u8>> {
        let prepared = self.prepare(frame);
        let mut bytes = Vec::new();
        JpegEncoder::new_with_quality(&mut bytes, self.quality).encode_image(&prepared)?;
        Ok(bytes)
    }

    /// Encode `frame` into the head of `out` and stamp the length trailer.
    /// Returns the number of encoded bytes.
    pub fn write_into(&self, frame: &RgbaImage, out: &mut [u8]) -> Result<usize> {
        let (width, height) = frame.dimensions();
        let needed = required_buffer_len(width, height);
        if out.len() < needed {
            return Err(VisionError::BufferTooSmall {
                needed,
                actual: out.len(),
            });
        }

        let bytes = self.encode(frame)?;
        let limit = payload_capacity(width, height);
        if bytes.len() > limit {
            return Err(VisionError::EncodedTooLarge {
                size: bytes.len(),
                limit,
            });
        }

        debug!("Copying {} encoded bytes", bytes.len());
        out[..bytes.len()].copy_from_slice(&bytes);
        out[limit..limit + TRAILER_LEN].copy_from_slice(&(bytes.len() as u32).to_be_bytes());

        Ok(bytes.len())
    }
}
