pub mod builder;

use std::time::Instant;

use image::{GrayImage, RgbaImage};
use tracing::debug;

use crate::{
    algorithms::{CandidateBuilder, CandidateFilter, HsvSegmenter, ImageprocContourExtractor},
    config::{FilterProfile, VisionConfig},
    error::Result,
    traits::{ContourExtractor, Segmenter, TargetSelector},
    types::{ColorRange, Detection},
};

/// Segmentation, contour analysis, filtering and selection for one frame.
///
/// Holds no per-frame state: identical inputs always produce identical
/// detections.
pub struct Pipeline {
    segmenter: Box<dyn Segmenter>,
    contour_extractor: Box<dyn ContourExtractor>,
    candidate_builder: CandidateBuilder,
    filter: CandidateFilter,
    selector: Box<dyn TargetSelector>,
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder() -> builder::PipelineBuilder {
        builder::PipelineBuilder::new()
    }

    /// Create a new pipeline with the given components
    pub fn new(
        segmenter: Box<dyn Segmenter>,
        contour_extractor: Box<dyn ContourExtractor>,
        profile: FilterProfile,
        selector: Box<dyn TargetSelector>,
    ) -> Self {
        Self {
            segmenter,
            contour_extractor,
            candidate_builder: CandidateBuilder,
            filter: CandidateFilter::new(profile),
            selector,
        }
    }

    /// Pipeline with the default segmenter and extractor and the profile and
    /// strategy named in `config`
    pub fn from_config(config: &VisionConfig) -> Self {
        Self::new(
            Box::new(HsvSegmenter),
            Box::new(ImageprocContourExtractor),
            config.profile.resolve(),
            config.strategy.selector(),
        )
    }

    pub fn profile(&self) -> &FilterProfile {
        &self.filter.profile
    }

    /// Run the full detection on `frame`, returning the mask alongside
    pub fn detect(&self, frame: &RgbaImage, range: &ColorRange) -> Result<(GrayImage, Detection)> {
        let mut mask = GrayImage::new(frame.width(), frame.height());
        let detection = self.detect_into(frame, range, &mut mask)?;
        Ok((mask, detection))
    }

    /// Run the full detection, thresholding into a caller-owned mask buffer
    pub fn detect_into(&self, frame: &RgbaImage, range: &ColorRange, mask: &mut GrayImage) -> Result<Detection> {
        debug!("Image is {} x {}", frame.width(), frame.height());
        debug!(
            "H {}-{} S {}-{} V {}-{}",
            range.h_min, range.h_max, range.s_min, range.s_max, range.v_min, range.v_max
        );

        // Step 1: Color threshold
        let started = Instant::now();
        self.segmenter.segment_into(frame, range, mask)?;
        debug!("Segmentation costs {:?}", started.elapsed());

        // Step 2: Contours and hull candidates
        let started = Instant::now();
        let contours = self.contour_extractor.extract_contours(mask)?;
        let candidates = self.candidate_builder.build_all(&contours);

        // Step 3: Size, shape and fullness gates
        let outcome = self.filter.partition(candidates);
        debug!(
            "Contour analysis costs {:?} ({} contours, {} accepted, {} rejected)",
            started.elapsed(),
            contours.len(),
            outcome.accepted.len(),
            outcome.rejected.len()
        );

        // Step 4: Final target selection
        let targets = self.selector.select(&outcome.accepted)?;
        debug!("{} selected {} targets", self.selector.name(), targets.len());

        Ok(Detection {
            accepted: outcome.accepted,
            rejected: outcome.rejected,
            targets,
        })
    }

    /// Get information about the pipeline configuration
    pub fn info(&self) -> String {
        format!("Pipeline: HSV threshold, outer contours, {} selection", self.selector.name())
    }
}
