//! Canny edge detection on a pre-blurred 8-bit-scale grayscale image.

use ndarray::Array2;

use crate::filters::sobel::sobel;
use crate::frame::Mask;

/// tan(22.5 deg), boundary between axis-aligned and diagonal gradient sectors.
const TAN_22_5: f32 = 0.414_213_56;

/// Gradient direction sector.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Sector {
    Horizontal,
    Diagonal,
    Vertical,
    AntiDiagonal,
}

/// Canny edges: Sobel gradients, non-maximum suppression, hysteresis.
pub fn canny(data: &Array2<f32>, low: f32, high: f32) -> Mask {
    let (gx, gy) = sobel(data);
    canny_from_gradients(&gx, &gy, low, high)
}

/// Canny on precomputed gradients, so callers that also need the gradient field
/// compute it only once.
pub fn canny_from_gradients(gx: &Array2<f32>, gy: &Array2<f32>, low: f32, high: f32) -> Mask {
    let (h, w) = gx.dim();
    let high = high.max(low);

    let magnitude = Array2::from_shape_fn((h, w), |(r, c)| gx[[r, c]].hypot(gy[[r, c]]));
    let sectors = Array2::from_shape_fn((h, w), |(r, c)| sector(gx[[r, c]], gy[[r, c]]));

    let thin = non_max_suppression(&magnitude, &sectors);
    hysteresis(&thin, low, high)
}

fn sector(gx: f32, gy: f32) -> Sector {
    let (ax, ay) = (gx.abs(), gy.abs());
    if ay <= ax * TAN_22_5 {
        Sector::Horizontal
    } else if ax <= ay * TAN_22_5 {
        Sector::Vertical
    } else if gx * gy > 0.0 {
        Sector::Diagonal
    } else {
        Sector::AntiDiagonal
    }
}

fn non_max_suppression(mag: &Array2<f32>, sectors: &Array2<Sector>) -> Array2<f32> {
    let (h, w) = mag.dim();
    let mut out = Array2::<f32>::zeros((h, w));
    if h < 3 || w < 3 {
        return out;
    }

    for r in 1..h - 1 {
        for c in 1..w - 1 {
            let m = mag[[r, c]];
            if m == 0.0 {
                continue;
            }
            // y grows downward, so a positive gx*gy gradient points down-right.
            let (m1, m2) = match sectors[[r, c]] {
                Sector::Horizontal => (mag[[r, c - 1]], mag[[r, c + 1]]),
                Sector::Vertical => (mag[[r - 1, c]], mag[[r + 1, c]]),
                Sector::Diagonal => (mag[[r - 1, c - 1]], mag[[r + 1, c + 1]]),
                Sector::AntiDiagonal => (mag[[r - 1, c + 1]], mag[[r + 1, c - 1]]),
            };
            if m >= m1 && m >= m2 {
                out[[r, c]] = m;
            }
        }
    }

    out
}

fn hysteresis(thin: &Array2<f32>, low: f32, high: f32) -> Mask {
    let (h, w) = thin.dim();
    let mut edges = Array2::from_elem((h, w), false);
    let mut stack = Vec::new();

    for r in 0..h {
        for c in 0..w {
            if thin[[r, c]] >= high {
                edges[[r, c]] = true;
                stack.push((r, c));
            }
        }
    }

    while let Some((r, c)) = stack.pop() {
        for nr in r.saturating_sub(1)..=(r + 1).min(h - 1) {
            for nc in c.saturating_sub(1)..=(c + 1).min(w - 1) {
                if !edges[[nr, nc]] && thin[[nr, nc]] >= low {
                    edges[[nr, nc]] = true;
                    stack.push((nr, nc));
                }
            }
        }
    }

    edges
}
