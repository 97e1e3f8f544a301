use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr, VariantNames};

use crate::{
    error::{Result, VisionError},
    types::ColorRange,
};

/// Closed interval used by the candidate filter
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct InclusiveRange {
    pub min: f64,
    pub max: f64,
}

impl InclusiveRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Size, shape and fullness acceptance thresholds
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct FilterProfile {
    pub width: InclusiveRange,
    pub height: InclusiveRange,
    /// Bounds on width / height
    pub wideness: InclusiveRange,
    /// Bounds on contour area / bounding box area. Both built-in profiles cap
    /// this below 1.0, so solid blobs never pass: the markers are hollow.
    pub fullness: InclusiveRange,
}

impl FilterProfile {
    /// Single targets of arbitrary orientation
    pub const GENERAL: Self = Self {
        width: InclusiveRange::new(10.0, 300.0),
        height: InclusiveRange::new(10.0, 300.0),
        wideness: InclusiveRange::new(0.25, 3.0),
        fullness: InclusiveRange::new(0.45, 0.95),
    };

    /// Wide, short strips that come in vertically stacked pairs
    pub const PAIRED: Self = Self {
        width: InclusiveRange::new(20.0, 300.0),
        height: InclusiveRange::new(10.0, 100.0),
        wideness: InclusiveRange::new(1.5, 7.0),
        fullness: InclusiveRange::new(0.45, 0.95),
    };
}

/// Profile selection as it appears in configuration files
#[derive(
    Debug, Clone,
    Serialize, Deserialize, JsonSchema,
    Display, IntoStaticStr,
    PartialEq
)]
#[serde(tag = "type", content = "params", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProfileConfig {
    /// Built-in GENERAL thresholds
    General,
    /// Built-in PAIRED thresholds
    Paired,
    /// Hand-tuned thresholds
    Custom(FilterProfile),
}

impl ProfileConfig {
    pub fn resolve(&self) -> FilterProfile {
        match self {
            Self::General => FilterProfile::GENERAL,
            Self::Paired => FilterProfile::PAIRED,
            Self::Custom(profile) => *profile,
        }
    }
}

/// How the final targets are picked from the accepted candidates
#[derive(
    Debug, Clone, Copy,
    Serialize, Deserialize, JsonSchema,
    Display, IntoStaticStr,
    PartialEq
)]
#[serde(tag = "type", content = "params", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SelectionStrategy {
    /// Keep the largest candidates by bounding box area
    RankTopN {
        #[schemars(range(min = 1))]
        max_targets: usize,
    },
    /// Report the taller member of a vertically stacked pair
    PairMatch {
        /// Maximum horizontal centroid offset (exclusive)
        max_offset_x: f64,
    },
}

impl SelectionStrategy {
    pub const DEFAULT_MAX_TARGETS: usize = 6;
    pub const DEFAULT_MAX_OFFSET_X: f64 = 10.0;

    pub fn rank_top_n() -> Self {
        Self::RankTopN {
            max_targets: Self::DEFAULT_MAX_TARGETS,
        }
    }

    pub fn pair_match() -> Self {
        Self::PairMatch {
            max_offset_x: Self::DEFAULT_MAX_OFFSET_X,
        }
    }

    /// `max_targets` must be in `1..=6`; `max_offset_x` must be positive
    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::RankTopN { max_targets } if !(1..=Self::DEFAULT_MAX_TARGETS).contains(&max_targets) => {
                Err(VisionError::InvalidConfig(format!(
                    "max_targets must be between 1 and {}, got {}",
                    Self::DEFAULT_MAX_TARGETS,
                    max_targets
                )))
            }
            Self::PairMatch { max_offset_x } if max_offset_x.is_nan() || max_offset_x <= 0.0 => {
                Err(VisionError::InvalidConfig(format!(
                    "max_offset_x must be positive, got {max_offset_x}"
                )))
            }
            _ => Ok(()),
        }
    }
}

/// What the visualization frame shows
#[derive(
    Debug, Clone, Copy, Default,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, EnumIter, VariantNames, IntoStaticStr,
    PartialEq, Eq, Hash
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DisplayMode {
    /// Camera frame untouched
    Raw,
    /// Binary mask, foreground white
    Thresh,
    /// Camera frame with target outlines
    Targets,
    /// Targets plus rejected candidate outlines
    #[default]
    TargetsPlus,
}

impl DisplayMode {
    /// Numeric code used by the host bridge
    pub fn code(self) -> i32 {
        match self {
            Self::Raw => 0,
            Self::Thresh => 1,
            Self::Targets => 2,
            Self::TargetsPlus => 3,
        }
    }
}

impl TryFrom<i32> for DisplayMode {
    type Error = VisionError;

    fn try_from(code: i32) -> std::result::Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Raw),
            1 => Ok(Self::Thresh),
            2 => Ok(Self::Targets),
            3 => Ok(Self::TargetsPlus),
            other => Err(VisionError::InvalidDisplayMode(other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct CentroidMarker {
    pub radius: i32,
    pub color: [u8; 4],
}

impl Default for CentroidMarker {
    fn default() -> Self {
        Self {
            radius: 5,
            color: [0, 255, 0, 255],
        }
    }
}

/// Overlay colors are RGBA
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct OverlayStyle {
    pub target_color: [u8; 4],
    pub rejected_color: [u8; 4],
    #[schemars(range(min = 1, max = 32))]
    pub stroke_width: u32,
    pub centroid_marker: Option<CentroidMarker>,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            target_color: [0, 112, 255, 255],
            rejected_color: [255, 0, 0, 255],
            stroke_width: 3,
            centroid_marker: None,
        }
    }
}

fn default_jpeg_quality() -> u8 {
    95
}

/// Complete pipeline configuration.
///
/// `profile` and `strategy` have no defaults. Start from
/// [`VisionConfig::general`] or [`VisionConfig::paired`] for the built-in
/// pairings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct VisionConfig {
    pub profile: ProfileConfig,
    pub strategy: SelectionStrategy,
    #[serde(default)]
    pub color_range: ColorRange,
    #[serde(default)]
    pub display_mode: DisplayMode,
    #[serde(default)]
    pub overlay: OverlayStyle,
    #[serde(default = "default_jpeg_quality")]
    #[schemars(range(min = 1, max = 100))]
    pub jpeg_quality: u8,
}

impl VisionConfig {
    pub fn new(profile: ProfileConfig, strategy: SelectionStrategy) -> Self {
        Self {
            profile,
            strategy,
            color_range: ColorRange::default(),
            display_mode: DisplayMode::default(),
            overlay: OverlayStyle::default(),
            jpeg_quality: default_jpeg_quality(),
        }
    }

    /// GENERAL thresholds ranked by size
    pub fn general() -> Self {
        Self::new(ProfileConfig::General, SelectionStrategy::rank_top_n())
    }

    /// PAIRED thresholds with stacked-pair matching
    pub fn paired() -> Self {
        Self::new(ProfileConfig::Paired, SelectionStrategy::pair_match())
    }

    pub fn with_color_range(mut self, color_range: ColorRange) -> Self {
        self.color_range = color_range;
        self
    }

    pub fn with_display_mode(mut self, display_mode: DisplayMode) -> Self {
        self.display_mode = display_mode;
        self
    }

    /// Check the bounds the schema declares but serde does not enforce
    pub fn validate(&self) -> Result<()> {
        self.strategy.validate()?;
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(VisionError::InvalidConfig(format!(
                "jpeg_quality must be between 1 and 100, got {}",
                self.jpeg_quality
            )));
        }
        Ok(())
    }

    /// Get the JSON schema for configuration files
    pub fn schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(VisionConfig)
    }
}
