//! In-process implementations of the host-side collaborators.
//!
//! Production hosts provide their own `FrameSource`, `TextureSink` and
//! `TargetReceiver`; these back the CLI and the tests.

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, VisionError},
    traits::{FrameSource, TargetReceiver, TextureHandle, TextureSink},
};

/// Number of target slots the host exposes
pub const REPORTED_TARGET_SLOTS: usize = 3;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct TargetRecord {
    pub centroid_x: f64,
    pub centroid_y: f64,
    pub width: f64,
    pub height: f64,
}

/// Mirror of the host's target structure: a count plus three fixed slots
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TargetsInfo {
    pub num_targets: usize,
    pub targets: [TargetRecord; REPORTED_TARGET_SLOTS],
    #[serde(skip)]
    registered: bool,
}

impl TargetsInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_registered(&self) -> bool {
        self.registered
    }

    /// Slots holding geometry from the last frame
    pub fn reported(&self) -> &[TargetRecord] {
        &self.targets[..self.num_targets.min(REPORTED_TARGET_SLOTS)]
    }
}

impl TargetReceiver for TargetsInfo {
    fn register(&mut self) -> Result<()> {
        self.registered = true;
        Ok(())
    }

    fn set_count(&mut self, count: usize) {
        self.num_targets = count;
    }

    fn set_target(&mut self, index: usize, centroid_x: f64, centroid_y: f64, width: f64, height: f64) {
        if let Some(slot) = self.targets.get_mut(index) {
            *slot = TargetRecord {
                centroid_x,
                centroid_y,
                width,
                height,
            };
        }
    }
}

/// Serves a still image as the camera frame
#[derive(Debug, Clone)]
pub struct ImageFrameSource {
    image: RgbaImage,
}

impl ImageFrameSource {
    pub fn new(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

impl FrameSource for ImageFrameSource {
    fn read_frame(&mut self, frame: &mut RgbaImage) -> Result<()> {
        if frame.dimensions() != self.image.dimensions() {
            return Err(VisionError::DimensionMismatch {
                expected: frame.dimensions(),
                actual: self.image.dimensions(),
            });
        }
        frame.copy_from_slice(self.image.as_raw());
        Ok(())
    }
}

/// Keeps the most recent upload in memory
#[derive(Debug, Clone, Default)]
pub struct CapturedTexture {
    pub uploads: usize,
    last: Option<(TextureHandle, RgbaImage)>,
}

impl CapturedTexture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_upload(&self) -> Option<(TextureHandle, &RgbaImage)> {
        self.last.as_ref().map(|(handle, image)| (*handle, image))
    }

    pub fn into_last_frame(self) -> Option<RgbaImage> {
        self.last.map(|(_, image)| image)
    }
}

impl TextureSink for CapturedTexture {
    fn upload(&mut self, texture: TextureHandle, frame: &RgbaImage) -> Result<()> {
        match self.last.as_mut() {
            Some((handle, image)) if image.dimensions() == frame.dimensions() => {
                *handle = texture;
                image.copy_from_slice(frame.as_raw());
            }
            _ => self.last = Some((texture, frame.clone())),
        }
        self.uploads += 1;
        Ok(())
    }
}
