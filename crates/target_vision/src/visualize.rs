use image::{GrayImage, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut};

use crate::{
    config::{DisplayMode, OverlayStyle},
    error::{Result, VisionError},
    types::Detection,
};

/// Renders the preview frame for a display mode
#[derive(Debug, Clone, Default)]
pub struct Visualizer {
    pub style: OverlayStyle,
}

impl Visualizer {
    pub fn new(style: OverlayStyle) -> Self {
        Self { style }
    }

    /// Render into a freshly allocated frame
    pub fn render(
        &self,
        frame: &RgbaImage,
        mask: &GrayImage,
        detection: &Detection,
        mode: DisplayMode,
    ) -> Result<RgbaImage> {
        let mut out = RgbaImage::new(frame.width(), frame.height());
        self.render_into(frame, mask, detection, mode, &mut out)?;
        Ok(out)
    }

    /// Render into `out`, resizing it if needed. Every pixel is rewritten.
    pub fn render_into(
        &self,
        frame: &RgbaImage,
        mask: &GrayImage,
        detection: &Detection,
        mode: DisplayMode,
        out: &mut RgbaImage,
    ) -> Result<()> {
        if out.dimensions() != frame.dimensions() {
            *out = RgbaImage::new(frame.width(), frame.height());
        }

        match mode {
            DisplayMode::Raw => out.copy_from_slice(frame.as_raw()),
            DisplayMode::Thresh => {
                if mask.dimensions() != frame.dimensions() {
                    return Err(VisionError::DimensionMismatch {
                        expected: frame.dimensions(),
                        actual: mask.dimensions(),
                    });
                }
                for (pixel, &value) in out.chunks_exact_mut(4).zip(mask.iter()) {
                    pixel.copy_from_slice(&[value, value, value, 255]);
                }
            }
            DisplayMode::Targets | DisplayMode::TargetsPlus => {
                out.copy_from_slice(frame.as_raw());

                for target in &detection.targets {
                    self.draw_outline(out, &target.points, self.style.target_color);
                    if let Some(marker) = self.style.centroid_marker {
                        draw_filled_circle_mut(
                            out,
                            (target.centroid_x.round() as i32, target.centroid_y.round() as i32),
                            marker.radius,
                            Rgba(marker.color),
                        );
                    }
                }

                if mode == DisplayMode::TargetsPlus {
                    for rejected in &detection.rejected {
                        self.draw_outline(out, &rejected.candidate.points, self.style.rejected_color);
                    }
                }
            }
        }

        Ok(())
    }

    /// Closed polyline, `stroke_width` pixels thick
    fn draw_outline(&self, canvas: &mut RgbaImage, points: &[[i32; 2]], color: [u8; 4]) {
        if points.len() < 2 {
            return;
        }

        let width = self.style.stroke_width.max(1) as i32;
        let low = -(width - 1) / 2;
        let high = width / 2;
        let color = Rgba(color);

        for (i, &[x0, y0]) in points.iter().enumerate() {
            let [x1, y1] = points[(i + 1) % points.len()];
            for dy in low..=high {
                for dx in low..=high {
                    draw_line_segment_mut(
                        canvas,
                        ((x0 + dx) as f32, (y0 + dy) as f32),
                        ((x1 + dx) as f32, (y1 + dy) as f32),
                        color,
                    );
                }
            }
        }
    }
}
