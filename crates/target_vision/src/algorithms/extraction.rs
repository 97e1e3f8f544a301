use image::GrayImage;
use imageproc::contours::{find_contours, BorderType};
use crate::{error::Result, traits::ContourExtractor};

/// Imageproc-based contour extractor.
///
/// Keeps only top-level outer borders: holes and anything nested inside a
/// hole are dropped, so one contour comes back per foreground region.
#[derive(Debug, Clone, Default)]
pub struct ImageprocContourExtractor;

impl ContourExtractor for ImageprocContourExtractor {
    fn extract_contours(&self, mask: &GrayImage) -> Result<Vec<Vec<[i32; 2]>>> {
        let contours = find_contours::<i32>(mask);

        let result = contours
            .into_iter()
            .filter(|contour| matches!(contour.border_type, BorderType::Outer) && contour.parent.is_none())
            .map(|contour| {
                contour.points
                    .iter()
                    .map(|p| [p.x, p.y])
                    .collect()
            })
            .collect();

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn fill(mask: &mut GrayImage, xs: std::ops::Range<u32>, ys: std::ops::Range<u32>, value: u8) {
        for y in ys {
            for x in xs.clone() {
                mask.put_pixel(x, y, Luma([value]));
            }
        }
    }

    #[test]
    fn test_empty_mask_has_no_contours() {
        let mask = GrayImage::new(50, 50);
        let contours = ImageprocContourExtractor.extract_contours(&mask).unwrap();
        assert!(contours.is_empty());
    }

    #[test]
    fn test_one_contour_per_region() {
        let mut mask = GrayImage::new(100, 60);
        fill(&mut mask, 5..25, 5..25, 255);
        fill(&mut mask, 50..90, 10..50, 255);

        let contours = ImageprocContourExtractor.extract_contours(&mask).unwrap();
        assert_eq!(contours.len(), 2);
    }

    #[test]
    fn test_holes_and_islands_are_skipped() {
        let mut mask = GrayImage::new(80, 80);
        // Ring with a separate island inside the hole
        fill(&mut mask, 10..70, 10..70, 255);
        fill(&mut mask, 20..60, 20..60, 0);
        fill(&mut mask, 35..45, 35..45, 255);

        let contours = ImageprocContourExtractor.extract_contours(&mask).unwrap();
        assert_eq!(contours.len(), 1);

        let xs: Vec<i32> = contours[0].iter().map(|p| p[0]).collect();
        assert_eq!(xs.iter().min(), Some(&10));
        assert_eq!(xs.iter().max(), Some(&69));
    }
}
