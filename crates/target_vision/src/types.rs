use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, IntoStaticStr};

/// Inclusive HSV bounds, hue scaled to 0-255.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
pub struct ColorRange {
    pub h_min: u8,
    pub h_max: u8,
    pub s_min: u8,
    pub s_max: u8,
    pub v_min: u8,
    pub v_max: u8,
}

impl ColorRange {
    pub const fn new(h_min: u8, h_max: u8, s_min: u8, s_max: u8, v_min: u8, v_max: u8) -> Self {
        Self {
            h_min,
            h_max,
            s_min,
            s_max,
            v_min,
            v_max,
        }
    }

    /// Check an HSV triple against all three closed intervals
    #[inline]
    pub fn contains(&self, h: u8, s: u8, v: u8) -> bool {
        h >= self.h_min
            && h <= self.h_max
            && s >= self.s_min
            && s <= self.s_max
            && v >= self.v_min
            && v <= self.v_max
    }

    /// Swap any bound pair given as (max, min).
    ///
    /// Preference sliders can cross each other, so hosts feed the pipeline
    /// the ordered pair rather than trusting the stored order.
    pub fn normalized(self) -> Self {
        Self {
            h_min: self.h_min.min(self.h_max),
            h_max: self.h_min.max(self.h_max),
            s_min: self.s_min.min(self.s_max),
            s_max: self.s_min.max(self.s_max),
            v_min: self.v_min.min(self.v_max),
            v_max: self.v_min.max(self.v_max),
        }
    }
}

impl Default for ColorRange {
    fn default() -> Self {
        Self::new(0, 255, 0, 255, 0, 255)
    }
}

/// A convex hull extracted from one thresholded region
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Candidate {
    /// Horizontal center of the bounding rectangle
    pub centroid_x: f64,
    /// Bottom edge of the bounding rectangle (y + height). The bottom edge
    /// stays put while the visible shape of the target changes with
    /// vertical position in frame.
    pub centroid_y: f64,
    pub width: f64,
    pub height: f64,
    /// Convex hull points
    pub points: Vec<[i32; 2]>,
    /// Enclosed area of the source contour, before hulling
    pub contour_area: f64,
    /// contour_area / (width * height)
    pub fullness: f64,
}

/// A candidate that survived filtering and selection
pub type Target = Candidate;

impl Candidate {
    /// Bounding rectangle area used for ranking
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Width-to-height ratio of the bounding rectangle
    pub fn wideness(&self) -> f64 {
        self.width / self.height
    }
}

/// Which filter stage turned a candidate away
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, Display, IntoStaticStr, PartialEq, Eq, Hash,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RejectReason {
    Size,
    Shape,
    Fullness,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RejectedCandidate {
    pub candidate: Candidate,
    pub reason: RejectReason,
}

/// Filter output, both halves in discovery order
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FilterOutcome {
    pub accepted: Vec<Candidate>,
    pub rejected: Vec<RejectedCandidate>,
}

/// Everything the pipeline learned about one frame
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Detection {
    pub accepted: Vec<Candidate>,
    pub rejected: Vec<RejectedCandidate>,
    pub targets: Vec<Target>,
}

impl Detection {
    /// Number of convex candidates that reached the filter
    pub fn candidate_count(&self) -> usize {
        self.accepted.len() + self.rejected.len()
    }

    pub fn has_targets(&self) -> bool {
        !self.targets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_range_bounds_are_inclusive() {
        let range = ColorRange::new(10, 20, 30, 40, 50, 60);
        assert!(range.contains(10, 30, 50));
        assert!(range.contains(20, 40, 60));
        assert!(!range.contains(9, 30, 50));
        assert!(!range.contains(10, 41, 50));
        assert!(!range.contains(10, 30, 61));
    }

    #[test]
    fn test_normalized_swaps_crossed_bounds() {
        let range = ColorRange::new(90, 40, 0, 255, 200, 100).normalized();
        assert_eq!(range, ColorRange::new(40, 90, 0, 255, 100, 200));
    }

    #[test]
    fn test_default_range_accepts_everything() {
        let range = ColorRange::default();
        assert!(range.contains(0, 0, 0));
        assert!(range.contains(255, 255, 255));
    }

    #[test]
    fn test_candidate_metrics() {
        let candidate = Candidate {
            centroid_x: 15.0,
            centroid_y: 30.0,
            width: 40.0,
            height: 10.0,
            points: vec![[0, 20], [40, 20], [40, 30], [0, 30]],
            contour_area: 300.0,
            fullness: 0.75,
        };
        assert_eq!(candidate.area(), 400.0);
        assert_eq!(candidate.wideness(), 4.0);
    }
}
