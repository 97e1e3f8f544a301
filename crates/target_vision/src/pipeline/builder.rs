use crate::{
    algorithms::{HsvSegmenter, ImageprocContourExtractor, PairMatch, RankTopN},
    config::{FilterProfile, SelectionStrategy},
    error::{Result, VisionError},
    pipeline::Pipeline,
    traits::{ContourExtractor, Segmenter, TargetSelector},
};

/// Builder for creating detection pipelines with a fluent API.
///
/// Segmenter and contour extractor fall back to the HSV / imageproc
/// defaults; the filter profile and the target selector must be set.
pub struct PipelineBuilder {
    segmenter: Option<Box<dyn Segmenter>>,
    contour_extractor: Option<Box<dyn ContourExtractor>>,
    profile: Option<FilterProfile>,
    selector: Option<Box<dyn TargetSelector>>,
}

impl PipelineBuilder {
    /// Create a new pipeline builder
    pub fn new() -> Self {
        Self {
            segmenter: None,
            contour_extractor: None,
            profile: None,
            selector: None,
        }
    }

    /// Set the color segmenter (replaces any existing one)
    pub fn set_segmenter<S>(mut self, segmenter: S) -> Self
    where
        S: Segmenter + 'static,
    {
        self.segmenter = Some(Box::new(segmenter));
        self
    }

    /// Set the contour extractor (replaces any existing one)
    pub fn set_contour_extractor<E>(mut self, extractor: E) -> Self
    where
        E: ContourExtractor + 'static,
    {
        self.contour_extractor = Some(Box::new(extractor));
        self
    }

    pub fn with_profile(mut self, profile: FilterProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    /// Set the target selector (replaces any existing one)
    pub fn set_selector<T>(mut self, selector: T) -> Self
    where
        T: TargetSelector + 'static,
    {
        self.selector = Some(Box::new(selector));
        self
    }

    pub fn with_strategy(mut self, strategy: SelectionStrategy) -> Self {
        self.selector = Some(strategy.selector());
        self
    }

    pub fn build(self) -> Result<Pipeline> {
        let profile = self.profile.ok_or(VisionError::IncompletePipeline("filter profile"))?;
        let selector = self.selector.ok_or(VisionError::IncompletePipeline("target selector"))?;

        let segmenter = self.segmenter
            .unwrap_or_else(|| Box::new(HsvSegmenter));
        let contour_extractor = self.contour_extractor
            .unwrap_or_else(|| Box::new(ImageprocContourExtractor));

        Ok(Pipeline::new(segmenter, contour_extractor, profile, selector))
    }

    /// GENERAL thresholds, largest six targets
    pub fn build_general() -> Pipeline {
        Pipeline::new(
            Box::new(HsvSegmenter),
            Box::new(ImageprocContourExtractor),
            FilterProfile::GENERAL,
            Box::new(RankTopN::default()),
        )
    }

    /// PAIRED thresholds, stacked-pair matching
    pub fn build_paired() -> Pipeline {
        Pipeline::new(
            Box::new(HsvSegmenter),
            Box::new(ImageprocContourExtractor),
            FilterProfile::PAIRED,
            Box::new(PairMatch::default()),
        )
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
