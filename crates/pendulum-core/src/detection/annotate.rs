use crate::fit::circle::CircleFit;
use crate::frame::{Detection, Frame, Point};

const BOX_COLOR: [u8; 3] = [255, 0, 255];
const MARKER_COLOR: [u8; 3] = [0, 0, 0];
const MARKER_HALF_SIZE: isize = 4;

/// Copy of `frame` with the detection's bounding box and a center cross drawn on it.
pub fn annotate(frame: &Frame, detection: &Detection) -> Frame {
    let mut out = frame.clone();
    let (h, w) = (out.height(), out.width());
    if h == 0 || w == 0 {
        return out;
    }

    let bbox = detection.bbox;
    let right = (bbox.x + bbox.width - 1).min(w - 1);
    let bottom = (bbox.y + bbox.height - 1).min(h - 1);

    for col in bbox.x.min(w - 1)..=right {
        out.set_pixel(bbox.y.min(h - 1), col, BOX_COLOR);
        out.set_pixel(bottom, col, BOX_COLOR);
    }
    for row in bbox.y.min(h - 1)..=bottom {
        out.set_pixel(row, bbox.x.min(w - 1), BOX_COLOR);
        out.set_pixel(row, right, BOX_COLOR);
    }

    let cx = detection.center.x.round() as isize;
    let cy = detection.center.y.round() as isize;
    for d in -MARKER_HALF_SIZE..=MARKER_HALF_SIZE {
        put(&mut out, cy, cx + d, MARKER_COLOR);
        put(&mut out, cy + d, cx, MARKER_COLOR);
    }

    out
}

fn put(frame: &mut Frame, row: isize, col: isize, rgb: [u8; 3]) {
    if row >= 0 && col >= 0 && (row as usize) < frame.height() && (col as usize) < frame.width() {
        frame.set_pixel(row as usize, col as usize, rgb);
    }
}

const PIVOT_COLOR: [u8; 3] = [255, 0, 0];
const ARM_COLOR: [u8; 3] = [0, 255, 0];
const CIRCLE_COLOR: [u8; 3] = [0, 255, 255];

/// Draw the fitted pivot, the swing circle and the arm to the bob onto `frame`.
pub fn draw_geometry(frame: &mut Frame, circle: &CircleFit, detection: &Detection) {
    let pivot = circle.center();

    let steps = (std::f64::consts::TAU * circle.radius).ceil().clamp(16.0, 4096.0) as usize;
    for i in 0..steps {
        let angle = std::f64::consts::TAU * i as f64 / steps as f64;
        let x = pivot.x + circle.radius * angle.cos();
        let y = pivot.y + circle.radius * angle.sin();
        put(frame, y.round() as isize, x.round() as isize, CIRCLE_COLOR);
    }

    draw_line(frame, pivot, detection.center, ARM_COLOR);

    let (px, py) = (pivot.x.round() as isize, pivot.y.round() as isize);
    for dr in -2..=2 {
        for dc in -2..=2 {
            put(frame, py + dr, px + dc, PIVOT_COLOR);
        }
    }
}

fn draw_line(frame: &mut Frame, from: Point, to: Point, rgb: [u8; 3]) {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let steps = dx.abs().max(dy.abs()).ceil().min(8192.0) as usize;
    for i in 0..=steps {
        let t = if steps == 0 { 0.0 } else { i as f64 / steps as f64 };
        let x = from.x + t * dx;
        let y = from.y + t * dy;
        put(frame, y.round() as isize, x.round() as isize, rgb);
    }
}
