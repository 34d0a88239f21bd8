use std::path::Path;

use image::{DynamicImage, RgbImage, RgbaImage};

use crate::errors::{PixeltapError, PixeltapResult};

/// Best template match within a frame. `center` is the template center in
/// frame pixel coordinates; `score` is the correlation coefficient in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchResult {
    pub center: (i32, i32),
    pub score: f32,
}

/// Finds the best placement of a template inside a frame via normalized
/// cross-correlation, gated by a confidence threshold.
pub struct TemplateLocator {
    default_threshold: f32,
}

/// Below this, a centered pixel sum is treated as zero variance.
const FLAT_EPS: f64 = 1e-6;

impl TemplateLocator {
    pub fn new(default_threshold: f32) -> Self {
        Self { default_threshold }
    }

    /// Decodes a template image from disk.
    pub fn load_template(path: &Path) -> PixeltapResult<RgbaImage> {
        let img = image::open(path)
            .map_err(|e| PixeltapError::TemplateLoad(format!("{}: {e}", path.display())))?;
        Ok(img.to_rgba8())
    }

    /// Slides `template` over `frame` and returns the highest-scoring offset,
    /// or `None` when the best coefficient falls below the threshold. Absence
    /// is a normal outcome, not an error; there is no internal retry.
    pub fn locate(
        &self,
        frame: &RgbaImage,
        template: &RgbaImage,
        threshold: Option<f32>,
    ) -> Option<MatchResult> {
        let threshold = threshold.unwrap_or(self.default_threshold);

        // Unify color space before correlating (alpha dropped on both sides).
        let frame_rgb = DynamicImage::ImageRgba8(frame.clone()).to_rgb8();
        let template_rgb = DynamicImage::ImageRgba8(template.clone()).to_rgb8();

        let (x, y, score) = best_correlation(&frame_rgb, &template_rgb)?;
        if score < threshold as f64 {
            tracing::debug!(score, threshold, "best match below threshold");
            return None;
        }

        let center = (
            x as i32 + (template.width() / 2) as i32,
            y as i32 + (template.height() / 2) as i32,
        );
        tracing::debug!(x = center.0, y = center.1, score, "template located");
        Some(MatchResult {
            center,
            score: score.clamp(0.0, 1.0) as f32,
        })
    }
}

/// Exhaustive scan over every integer offset. Uses the zero-mean normalized
/// coefficient; a zero-variance (solid color) template degenerates that
/// formula, so such templates fall back to plain normalized correlation.
fn best_correlation(frame: &RgbImage, template: &RgbImage) -> Option<(u32, u32, f64)> {
    let (fw, fh) = frame.dimensions();
    let (tw, th) = template.dimensions();
    if tw == 0 || th == 0 || tw > fw || th > fh {
        return None;
    }

    let n = (tw * th * 3) as f64;
    let tpl: Vec<f64> = template.as_raw().iter().map(|&v| v as f64).collect();
    let tpl_mean = tpl.iter().sum::<f64>() / n;
    let tpl_centered: Vec<f64> = tpl.iter().map(|v| v - tpl_mean).collect();
    let tpl_centered_sq: f64 = tpl_centered.iter().map(|v| v * v).sum();
    let tpl_raw_sq: f64 = tpl.iter().map(|v| v * v).sum();
    let flat_template = tpl_centered_sq < FLAT_EPS;

    let frame_raw = frame.as_raw();
    let frame_stride = (fw * 3) as usize;
    let row_len = (tw * 3) as usize;
    let tpl_vals: &[f64] = if flat_template { &tpl } else { &tpl_centered };

    let mut best: Option<(u32, u32, f64)> = None;
    for y in 0..=(fh - th) {
        for x in 0..=(fw - tw) {
            let mut sum_f = 0.0;
            let mut sum_f_sq = 0.0;
            let mut cross = 0.0;
            for ty in 0..th {
                let row_start = (y + ty) as usize * frame_stride + (x * 3) as usize;
                let frame_row = &frame_raw[row_start..row_start + row_len];
                let tpl_off = (ty * tw * 3) as usize;
                for (i, &fv) in frame_row.iter().enumerate() {
                    let f = fv as f64;
                    sum_f += f;
                    sum_f_sq += f * f;
                    cross += f * tpl_vals[tpl_off + i];
                }
            }

            let score = if flat_template {
                // Plain normalized cross-correlation.
                let denom = (sum_f_sq * tpl_raw_sq).sqrt();
                if denom < FLAT_EPS {
                    0.0
                } else {
                    cross / denom
                }
            } else {
                // Zero-mean: cross already equals Σ(F−mF)(T−mT) because the
                // centered template sums to zero.
                let window_var = (sum_f_sq - sum_f * sum_f / n).max(0.0);
                let denom = (window_var * tpl_centered_sq).sqrt();
                if denom < FLAT_EPS {
                    0.0
                } else {
                    cross / denom
                }
            };

            if best.map_or(true, |(_, _, s)| score > s) {
                best = Some((x, y, score));
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn frame_with_red_square() -> RgbaImage {
        let mut frame = RgbaImage::from_pixel(100, 100, Rgba([255, 255, 255, 255]));
        for y in 40..50 {
            for x in 40..50 {
                frame.put_pixel(x, y, Rgba([255, 0, 0, 255]));
            }
        }
        frame
    }

    fn solid(w: u32, h: u32, rgb: [u8; 3]) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba([rgb[0], rgb[1], rgb[2], 255]))
    }

    #[test]
    fn exact_crop_matches_with_max_score() {
        let frame = frame_with_red_square();
        let template = solid(10, 10, [255, 0, 0]);
        let locator = TemplateLocator::new(0.9);

        let result = locator.locate(&frame, &template, None).unwrap();
        assert_eq!(result.center, (45, 45));
        assert!(result.score > 0.99);
    }

    #[test]
    fn textured_crop_matches_at_known_offset() {
        let mut frame = RgbaImage::new(60, 60);
        for y in 0..60u32 {
            for x in 0..60u32 {
                // Non-affine texture so the crop matches at exactly one offset.
                let r = ((x * 37 + y * 11) % 256) as u8;
                let g = ((x * x + y * 3) % 256) as u8;
                let b = ((x * y) % 256) as u8;
                frame.put_pixel(x, y, Rgba([r, g, b, 255]));
            }
        }
        let mut template = RgbaImage::new(8, 8);
        for y in 0..8 {
            for x in 0..8 {
                template.put_pixel(x, y, *frame.get_pixel(20 + x, 30 + y));
            }
        }
        let locator = TemplateLocator::new(0.95);

        let result = locator.locate(&frame, &template, None).unwrap();
        assert_eq!(result.center, (24, 34));
        assert!(result.score > 0.99);
    }

    #[test]
    fn absent_color_returns_no_match() {
        let frame = frame_with_red_square();
        let template = solid(10, 10, [0, 0, 255]);
        let locator = TemplateLocator::new(0.9);

        assert!(locator.locate(&frame, &template, None).is_none());
    }

    #[test]
    fn per_call_threshold_overrides_default() {
        let frame = frame_with_red_square();
        let template = solid(10, 10, [255, 0, 0]);
        let locator = TemplateLocator::new(0.9);

        // An impossible per-call threshold suppresses an otherwise-perfect hit.
        assert!(locator.locate(&frame, &template, Some(1.1)).is_none());
    }

    #[test]
    fn template_larger_than_frame_is_no_match() {
        let frame = solid(10, 10, [255, 0, 0]);
        let template = solid(20, 20, [255, 0, 0]);
        let locator = TemplateLocator::new(0.5);

        assert!(locator.locate(&frame, &template, None).is_none());
    }

    #[test]
    fn load_template_missing_file_errors() {
        let err = TemplateLocator::load_template(Path::new("/nonexistent/button.png"));
        assert!(matches!(err, Err(PixeltapError::TemplateLoad(_))));
    }
}
