use std::time::Instant;

use image::{GrayImage, RgbaImage};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    config::{DisplayMode, VisionConfig},
    encode::FrameEncoder,
    error::{Result, VisionError},
    host::REPORTED_TARGET_SLOTS,
    pipeline::Pipeline,
    traits::{FrameSource, TargetReceiver, TextureHandle, TextureSink},
    types::{ColorRange, Detection, Target},
    visualize::Visualizer,
};

/// Per-invocation inputs supplied by the host
#[derive(Debug, Clone, Copy)]
pub struct FrameParams {
    pub width: u32,
    pub height: u32,
    pub texture: TextureHandle,
    pub mode: DisplayMode,
    pub color_range: ColorRange,
}

impl FrameParams {
    /// Parameters taken from a config's display mode and color range
    pub fn from_config(width: u32, height: u32, texture: TextureHandle, config: &VisionConfig) -> Self {
        Self {
            width,
            height,
            texture,
            mode: config.display_mode,
            color_range: config.color_range,
        }
    }
}

/// What one invocation produced
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FrameReport {
    /// True number of selected targets
    pub num_targets: usize,
    pub targets: Vec<Target>,
    pub accepted: usize,
    pub rejected: usize,
    /// Encoded preview size, for the image-returning entry point
    pub encoded_len: Option<usize>,
}

impl FrameReport {
    fn new(detection: &Detection, encoded_len: Option<usize>) -> Self {
        Self {
            num_targets: detection.targets.len(),
            targets: detection.targets.clone(),
            accepted: detection.accepted.len(),
            rejected: detection.rejected.len(),
            encoded_len,
        }
    }
}

/// Pipeline context for one render thread.
///
/// Owns the input, mask and visualization buffers reused between frames.
/// All entry points take `&mut self`; use one processor per thread.
pub struct FrameProcessor {
    pipeline: Pipeline,
    visualizer: Visualizer,
    encoder: FrameEncoder,
    initialized: bool,
    input: RgbaImage,
    mask: GrayImage,
    vis: RgbaImage,
}

impl FrameProcessor {
    pub fn new(pipeline: Pipeline, visualizer: Visualizer, encoder: FrameEncoder) -> Self {
        Self {
            pipeline,
            visualizer,
            encoder,
            initialized: false,
            input: RgbaImage::new(0, 0),
            mask: GrayImage::new(0, 0),
            vis: RgbaImage::new(0, 0),
        }
    }

    pub fn from_config(config: &VisionConfig) -> Self {
        Self::new(
            Pipeline::from_config(config),
            Visualizer::new(config.overlay),
            FrameEncoder::new(config.jpeg_quality),
        )
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// One-time host bridge registration. Later calls are no-ops; a failed
    /// registration leaves the processor unusable until retried.
    pub fn initialize(&mut self, receiver: &mut dyn TargetReceiver) -> Result<()> {
        if self.initialized {
            return Ok(());
        }
        receiver.register()?;
        self.initialized = true;
        info!("Frame processor initialized ({})", self.pipeline.info());
        Ok(())
    }

    /// Detect, render and upload one frame, then report targets
    pub fn process_frame(
        &mut self,
        source: &mut dyn FrameSource,
        params: &FrameParams,
        texture: &mut dyn TextureSink,
        receiver: &mut dyn TargetReceiver,
    ) -> Result<FrameReport> {
        let detection = self.run(source, params, texture)?;
        report_targets(&detection, receiver);
        Ok(FrameReport::new(&detection, None))
    }

    /// As [`FrameProcessor::process_frame`], also encoding the preview into
    /// `out` (see [`crate::encode`] for the layout)
    pub fn process_frame_and_set_image(
        &mut self,
        source: &mut dyn FrameSource,
        params: &FrameParams,
        texture: &mut dyn TextureSink,
        out: &mut [u8],
        receiver: &mut dyn TargetReceiver,
    ) -> Result<FrameReport> {
        let detection = self.run(source, params, texture)?;
        // Preview is already uploaded; report before encoding can fail
        report_targets(&detection, receiver);

        let started = Instant::now();
        let encoded = self.encoder.write_into(&self.vis, out)?;
        debug!("Encoding costs {:?}", started.elapsed());

        Ok(FrameReport::new(&detection, Some(encoded)))
    }

    /// Latest visualization frame
    pub fn visualization(&self) -> &RgbaImage {
        &self.vis
    }

    pub fn mask(&self) -> &GrayImage {
        &self.mask
    }

    fn run(
        &mut self,
        source: &mut dyn FrameSource,
        params: &FrameParams,
        texture: &mut dyn TextureSink,
    ) -> Result<Detection> {
        if !self.initialized {
            return Err(VisionError::NotInitialized);
        }
        if params.width == 0 || params.height == 0 {
            return Err(VisionError::InvalidDimensions {
                width: params.width,
                height: params.height,
            });
        }

        if self.input.dimensions() != (params.width, params.height) {
            self.input = RgbaImage::new(params.width, params.height);
        }
        let started = Instant::now();
        source.read_frame(&mut self.input)?;
        debug!("Frame read costs {:?}", started.elapsed());

        let detection = self
            .pipeline
            .detect_into(&self.input, &params.color_range, &mut self.mask)?;

        let started = Instant::now();
        self.visualizer
            .render_into(&self.input, &self.mask, &detection, params.mode, &mut self.vis)?;
        debug!("Creating vis costs {:?}", started.elapsed());

        let started = Instant::now();
        texture.upload(params.texture, &self.vis)?;
        debug!("Texture upload costs {:?}", started.elapsed());

        Ok(detection)
    }
}

/// Count first, then geometry for the first three targets
fn report_targets(detection: &Detection, receiver: &mut dyn TargetReceiver) {
    receiver.set_count(detection.targets.len());
    for (index, target) in detection.targets.iter().take(REPORTED_TARGET_SLOTS).enumerate() {
        receiver.set_target(index, target.centroid_x, target.centroid_y, target.width, target.height);
    }
}
