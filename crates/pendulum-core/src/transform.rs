//! Image coordinates to the pivot-centred, rotation-corrected frame.
//!
//! The point and pivot are flipped to a y-up frame, the point is rotated about
//! the pivot by `-theta`, and the result is flipped back to image (y-down)
//! coordinates. The output stays in absolute image units; its `x` is the
//! along-swing coordinate fed to the oscillator fit.

use crate::consts::ROTATION_IDENTITY_EPSILON;
use crate::fit::circle::CircleFit;
use crate::frame::Point;

/// `(cos θ, sin θ)`, exact identity for negligible angles.
pub(crate) fn rotation(theta: f64) -> (f64, f64) {
    if theta.abs() < ROTATION_IDENTITY_EPSILON {
        (1.0, 0.0)
    } else {
        (theta.cos(), theta.sin())
    }
}

pub fn to_pivot_frame(point: Point, pivot: Point, theta: f64, frame_height: f64) -> Point {
    let point_up = frame_height - point.y;
    let pivot_up = frame_height - pivot.y;

    let dx = point.x - pivot.x;
    let dy = point_up - pivot_up;
    let (cos, sin) = rotation(-theta);
    let rx = dx * cos - dy * sin;
    let ry = dx * sin + dy * cos;

    Point::new(pivot.x + rx, frame_height - (pivot_up + ry))
}

/// Inverse of [`to_pivot_frame`].
pub fn from_pivot_frame(point: Point, pivot: Point, theta: f64, frame_height: f64) -> Point {
    to_pivot_frame(point, pivot, -theta, frame_height)
}

/// [`to_pivot_frame`] using the center and angle of a circle fit.
pub fn to_circle_frame(point: Point, fit: &CircleFit, frame_height: f64) -> Point {
    to_pivot_frame(point, fit.center(), fit.rotation_angle, frame_height)
}
