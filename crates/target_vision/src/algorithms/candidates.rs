use geo::{Area, BoundingRect};
use geo_types::{LineString, Polygon};
use imageproc::{geometry::convex_hull, point::Point};
use tracing::trace;

use crate::types::Candidate;

/// Enclosed area of a closed integer contour
pub fn contour_area(points: &[[i32; 2]]) -> f64 {
    let ring: LineString<f64> = points
        .iter()
        .map(|&[x, y]| (x as f64, y as f64))
        .collect::<Vec<_>>()
        .into();
    Polygon::new(ring, vec![]).unsigned_area()
}

/// True when every turn of the closed polygon goes the same way.
///
/// Collinear runs are allowed; fewer than three points or a fully collinear
/// sequence is not a polygon and fails.
pub fn is_convex(points: &[[i32; 2]]) -> bool {
    let n = points.len();
    if n < 3 {
        return false;
    }

    let mut positive = false;
    let mut negative = false;
    for i in 0..n {
        let [ax, ay] = points[i];
        let [bx, by] = points[(i + 1) % n];
        let [cx, cy] = points[(i + 2) % n];
        let cross = (bx - ax) as i64 * (cy - by) as i64 - (by - ay) as i64 * (cx - bx) as i64;
        positive |= cross > 0;
        negative |= cross < 0;
        if positive && negative {
            return false;
        }
    }

    positive || negative
}

/// Turns raw contours into hull-based candidates
#[derive(Debug, Clone, Default)]
pub struct CandidateBuilder;

impl CandidateBuilder {
    /// Build a candidate from one contour, or `None` when its hull is not a
    /// proper convex polygon
    pub fn build(&self, contour: &[[i32; 2]]) -> Option<Candidate> {
        let contour_points: Vec<Point<i32>> = contour.iter().map(|&[x, y]| Point::new(x, y)).collect();
        let hull: Vec<[i32; 2]> = convex_hull(contour_points.as_slice())
            .into_iter()
            .map(|p| [p.x, p.y])
            .collect();

        if !is_convex(&hull) {
            trace!("Dropping contour with degenerate hull ({} points)", hull.len());
            return None;
        }

        let hull_line: LineString<f64> = hull
            .iter()
            .map(|&[x, y]| (x as f64, y as f64))
            .collect::<Vec<_>>()
            .into();
        let rect = hull_line.bounding_rect()?;

        let width = rect.width();
        let height = rect.height();
        let contour_area = contour_area(contour);
        let box_area = width * height;
        let fullness = if box_area > 0.0 { contour_area / box_area } else { 0.0 };

        Some(Candidate {
            centroid_x: rect.min().x + width / 2.0,
            centroid_y: rect.min().y + height,
            width,
            height,
            points: hull,
            contour_area,
            fullness,
        })
    }

    /// Build candidates for every contour, preserving contour order
    pub fn build_all(&self, contours: &[Vec<[i32; 2]>]) -> Vec<Candidate> {
        contours
            .iter()
            .filter_map(|contour| self.build(contour))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{algorithms::ImageprocContourExtractor, traits::ContourExtractor};
    use image::{GrayImage, Luma};

    fn u_shape() -> Vec<[i32; 2]> {
        vec![
            [0, 0], [10, 0], [10, 20], [30, 20], [30, 0],
            [40, 0], [40, 30], [0, 30],
        ]
    }

    #[test]
    fn test_contour_area_uses_source_shape() {
        assert_eq!(contour_area(&u_shape()), 800.0);
    }

    #[test]
    fn test_convexity() {
        assert!(is_convex(&[[0, 0], [10, 0], [10, 10], [0, 10]]));
        assert!(is_convex(&[[0, 0], [0, 10], [10, 10], [10, 0]]));
        assert!(!is_convex(&u_shape()));
        assert!(!is_convex(&[[0, 0], [5, 0], [10, 0]]));
        assert!(!is_convex(&[[0, 0], [5, 5]]));
    }

    #[test]
    fn test_u_shape_candidate() {
        let candidate = CandidateBuilder.build(&u_shape()).expect("convex hull");

        assert_eq!(candidate.width, 40.0);
        assert_eq!(candidate.height, 30.0);
        assert_eq!(candidate.centroid_x, 20.0);
        // Bottom edge, not the vertical midpoint
        assert_eq!(candidate.centroid_y, 30.0);
        assert_eq!(candidate.contour_area, 800.0);
        assert!((candidate.fullness - 800.0 / 1200.0).abs() < 1e-12);

        for corner in [[0, 0], [40, 0], [40, 30], [0, 30]] {
            assert!(candidate.points.contains(&corner), "hull misses {corner:?}");
        }
        assert!(is_convex(&candidate.points));
    }

    #[test]
    fn test_degenerate_contours_are_dropped() {
        assert!(CandidateBuilder.build(&[[3, 3]]).is_none());
        assert!(CandidateBuilder.build(&[[0, 4], [1, 4], [2, 4], [3, 4]]).is_none());
    }

    #[test]
    fn test_solid_block_from_mask_is_completely_full() {
        let mut mask = GrayImage::new(60, 60);
        for y in 30..50 {
            for x in 20..40 {
                mask.put_pixel(x, y, Luma([255]));
            }
        }

        let contours = ImageprocContourExtractor.extract_contours(&mask).unwrap();
        let candidates = CandidateBuilder.build_all(&contours);

        assert_eq!(candidates.len(), 1);
        let block = &candidates[0];
        assert_eq!(block.width, 19.0);
        assert_eq!(block.height, 19.0);
        assert_eq!(block.centroid_x, 29.5);
        assert_eq!(block.centroid_y, 49.0);
        assert_eq!(block.fullness, 1.0);
    }
}
