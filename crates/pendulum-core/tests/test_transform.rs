use approx::assert_abs_diff_eq;
use pendulum_core::fit::circle::CircleFit;
use pendulum_core::frame::Point;
use pendulum_core::transform::{from_pivot_frame, to_circle_frame, to_pivot_frame};

const HEIGHT: f64 = 480.0;

#[test]
fn test_zero_angle_is_identity() {
    let pivot = Point::new(320.0, 40.0);
    let p = Point::new(250.0, 300.0);
    let out = to_pivot_frame(p, pivot, 0.0, HEIGHT);
    assert_abs_diff_eq!(out.x, p.x, epsilon = 1e-12);
    assert_abs_diff_eq!(out.y, p.y, epsilon = 1e-12);

    let tiny = to_pivot_frame(p, pivot, 1e-9, HEIGHT);
    assert_eq!(tiny, out);
}

#[test]
fn test_quarter_turn() {
    let pivot = Point::new(100.0, 100.0);
    // 50 px straight below the pivot in the image.
    let p = Point::new(100.0, 150.0);
    let out = to_pivot_frame(p, pivot, std::f64::consts::FRAC_PI_2, HEIGHT);
    assert_abs_diff_eq!(out.x, 50.0, epsilon = 1e-9);
    assert_abs_diff_eq!(out.y, 100.0, epsilon = 1e-9);
}

#[test]
fn test_distance_to_pivot_preserved() {
    let pivot = Point::new(10.0, 20.0);
    let p = Point::new(73.0, 181.0);
    let out = to_pivot_frame(p, pivot, 0.7, HEIGHT);
    let before = (p.x - pivot.x).hypot(p.y - pivot.y);
    let after = (out.x - pivot.x).hypot(out.y - pivot.y);
    assert_abs_diff_eq!(before, after, epsilon = 1e-9);
}

#[test]
fn test_round_trip() {
    let pivot = Point::new(321.5, 12.25);
    for (i, theta) in [-2.5, -0.3, 0.0, 0.4, 1.2, 3.0].iter().enumerate() {
        let p = Point::new(50.0 + 37.0 * i as f64, 400.0 - 55.0 * i as f64);
        let there = to_pivot_frame(p, pivot, *theta, HEIGHT);
        let back = from_pivot_frame(there, pivot, *theta, HEIGHT);
        assert_abs_diff_eq!(back.x, p.x, epsilon = 1e-9);
        assert_abs_diff_eq!(back.y, p.y, epsilon = 1e-9);
    }
}

#[test]
fn test_circle_frame_uses_fit_center_and_angle() {
    let fit = CircleFit {
        center_x: 200.0,
        center_y: 30.0,
        radius: 150.0,
        rotation_angle: 0.25,
    };
    let p = Point::new(240.0, 170.0);
    assert_eq!(
        to_circle_frame(p, &fit, HEIGHT),
        to_pivot_frame(p, fit.center(), 0.25, HEIGHT)
    );
}
