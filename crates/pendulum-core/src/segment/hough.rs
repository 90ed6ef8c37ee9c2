//! Gradient circle transform.
//!
//! Every edge pixel votes for centers along its gradient line, on both sides,
//! for each radius in range. Accumulator peaks above the vote threshold become
//! candidate centers (strongest first); each accepted center then takes the
//! radius with the most edge support.

use ndarray::Array2;

use crate::filters::sobel::sobel;
use crate::frame::Mask;

use super::config::HoughParams;
use super::edges::canny_from_gradients;

/// A detected circle in pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    /// Accumulator votes at the center.
    pub votes: u32,
}

/// Detect circles in a blurred grayscale image (8-bit scale).
/// Results are ordered by accumulator votes, strongest first.
pub fn hough_circles(blurred: &Array2<f32>, params: &HoughParams) -> Vec<Circle> {
    let (h, w) = blurred.dim();
    if h < 3 || w < 3 || params.max_radius < params.min_radius {
        return Vec::new();
    }

    let (gx, gy) = sobel(blurred);
    let edges = canny_from_gradients(&gx, &gy, params.edge_threshold / 2.0, params.edge_threshold);

    let mut edge_points = Vec::new();
    let mut acc = Array2::<u32>::zeros((h, w));

    for row in 0..h {
        for col in 0..w {
            if !edges[[row, col]] {
                continue;
            }
            edge_points.push((row as f64, col as f64));

            let (dx, dy) = (gx[[row, col]] as f64, gy[[row, col]] as f64);
            let norm = dx.hypot(dy);
            if norm == 0.0 {
                continue;
            }
            let (ux, uy) = (dx / norm, dy / norm);

            for r in params.min_radius..=params.max_radius {
                for sign in [-1.0, 1.0] {
                    let cx = (col as f64 + sign * r as f64 * ux).round();
                    let cy = (row as f64 + sign * r as f64 * uy).round();
                    if cx >= 0.0 && cx < w as f64 && cy >= 0.0 && cy < h as f64 {
                        acc[[cy as usize, cx as usize]] += 1;
                    }
                }
            }
        }
    }

    let centers = peak_centers(&acc, params.accumulator_threshold);

    let mut circles: Vec<Circle> = Vec::new();
    let min_dist_sq = params.min_dist * params.min_dist;

    for (votes, row, col) in centers {
        let (cy, cx) = (row as f64, col as f64);
        let too_close = circles
            .iter()
            .any(|c| (c.x - cx).powi(2) + (c.y - cy).powi(2) < min_dist_sq);
        if too_close {
            continue;
        }

        if let Some(radius) = estimate_radius(&edge_points, cx, cy, params) {
            circles.push(Circle {
                x: cx,
                y: cy,
                radius,
                votes,
            });
        }
    }

    circles
}

/// The circle with the largest radius; ties go to the earliest in the list.
pub fn best_circle(circles: &[Circle]) -> Option<&Circle> {
    circles.iter().fold(None, |best: Option<&Circle>, c| match best {
        Some(b) if b.radius >= c.radius => Some(b),
        _ => Some(c),
    })
}

/// Rasterize filled circles (rounded to whole pixels) into a mask.
pub fn circles_mask<'a, I>(height: usize, width: usize, circles: I) -> Mask
where
    I: IntoIterator<Item = &'a Circle>,
{
    let mut mask = Array2::from_elem((height, width), false);

    for circle in circles {
        let (cx, cy, r) = (circle.x.round(), circle.y.round(), circle.radius.round());
        let r_sq = r * r;
        let row_lo = (cy - r).max(0.0) as usize;
        let row_hi = ((cy + r) as isize).min(height as isize - 1);
        let col_lo = (cx - r).max(0.0) as usize;
        let col_hi = ((cx + r) as isize).min(width as isize - 1);
        if row_hi < 0 || col_hi < 0 {
            continue;
        }

        for row in row_lo..=row_hi as usize {
            for col in col_lo..=col_hi as usize {
                if (col as f64 - cx).powi(2) + (row as f64 - cy).powi(2) <= r_sq {
                    mask[[row, col]] = true;
                }
            }
        }
    }

    mask
}

/// Local accumulator maxima above `threshold`, sorted by votes descending
/// (raster order among equals).
fn peak_centers(acc: &Array2<u32>, threshold: u32) -> Vec<(u32, usize, usize)> {
    let (h, w) = acc.dim();
    let mut peaks = Vec::new();

    for row in 1..h - 1 {
        for col in 1..w - 1 {
            let v = acc[[row, col]];
            if v > threshold
                && v > acc[[row, col - 1]]
                && v >= acc[[row, col + 1]]
                && v > acc[[row - 1, col]]
                && v >= acc[[row + 1, col]]
            {
                peaks.push((v, row, col));
            }
        }
    }

    peaks.sort_by(|a, b| b.0.cmp(&a.0));
    peaks
}

/// Radius with the most edge support around a center, refined to the mean
/// distance of the supporting edge pixels.
fn estimate_radius(
    edge_points: &[(f64, f64)],
    cx: f64,
    cy: f64,
    params: &HoughParams,
) -> Option<f64> {
    let bins = params.max_radius + 2;
    let mut histogram = vec![0u32; bins + 1];
    let mut distances = Vec::with_capacity(edge_points.len());

    for &(row, col) in edge_points {
        let d = (col - cx).hypot(row - cy);
        let bin = d.round() as usize;
        if bin + 1 >= params.min_radius && bin <= params.max_radius + 1 {
            histogram[bin] += 1;
            distances.push(d);
        }
    }

    let mut best: Option<(usize, u32)> = None;
    for r in params.min_radius..=params.max_radius {
        let support = histogram[r.saturating_sub(1)] + histogram[r] + histogram[r + 1];
        if best.map_or(true, |(_, s)| support > s) {
            best = Some((r, support));
        }
    }

    let (r, support) = best?;
    if support < params.accumulator_threshold {
        return None;
    }

    let lo = r as f64 - 1.5;
    let hi = r as f64 + 1.5;
    let (sum, n) = distances
        .iter()
        .filter(|&&d| d >= lo && d <= hi)
        .fold((0.0, 0usize), |(s, n), &d| (s + d, n + 1));

    if n == 0 {
        Some(r as f64)
    } else {
        Some(sum / n as f64)
    }
}
