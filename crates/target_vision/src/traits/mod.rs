use image::{GrayImage, RgbaImage};
use crate::{
    error::Result,
    types::{Candidate, ColorRange, Target},
};

/// Trait for color segmentation algorithms
pub trait Segmenter: Send + Sync {
    /// Threshold `frame` into `mask`, resizing the mask if its dimensions differ.
    /// Every mask pixel is written.
    fn segment_into(&self, frame: &RgbaImage, range: &ColorRange, mask: &mut GrayImage) -> Result<()>;

    /// Threshold `frame` into a freshly allocated mask
    fn segment(&self, frame: &RgbaImage, range: &ColorRange) -> Result<GrayImage> {
        let mut mask = GrayImage::new(frame.width(), frame.height());
        self.segment_into(frame, range, &mut mask)?;
        Ok(mask)
    }
}

/// Trait for contour extraction algorithms
pub trait ContourExtractor: Send + Sync {
    /// Extract the outer boundaries of the foreground regions of a binary mask
    fn extract_contours(&self, mask: &GrayImage) -> Result<Vec<Vec<[i32; 2]>>>;
}

/// Trait for picking the final targets out of the accepted candidates
pub trait TargetSelector: Send + Sync {
    fn select(&self, accepted: &[Candidate]) -> Result<Vec<Target>>;

    fn name(&self) -> &'static str;
}

/// Identifies where the visualization frame should be uploaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextureHandle(pub u32);

/// Supplies camera frames, e.g. a GPU texture read-back
pub trait FrameSource {
    /// Fill `frame` with the current camera image. `frame` already has the
    /// requested dimensions.
    fn read_frame(&mut self, frame: &mut RgbaImage) -> Result<()>;
}

/// Receives the visualization frame, e.g. a GPU texture upload
pub trait TextureSink {
    fn upload(&mut self, texture: TextureHandle, frame: &RgbaImage) -> Result<()>;
}

/// Host-side receiver of target geometry
pub trait TargetReceiver {
    /// One-time lookup of whatever the host needs before fields can be set.
    /// Called once per processor by `FrameProcessor::initialize`.
    fn register(&mut self) -> Result<()> {
        Ok(())
    }

    /// Total number of selected targets, not clamped to the slot count
    fn set_count(&mut self, count: usize);

    fn set_target(&mut self, index: usize, centroid_x: f64, centroid_y: f64, width: f64, height: f64);
}
