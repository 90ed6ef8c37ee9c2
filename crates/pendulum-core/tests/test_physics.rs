use approx::assert_abs_diff_eq;
use pendulum_core::fit::oscillator::OscillatorParams;
use pendulum_core::physics::{
    length_for, pendulum_length, pendulum_length_from_frequency, surface_length,
    FrequencyConvention,
};

#[test]
fn test_length_from_angular_frequency() {
    let pi = std::f64::consts::PI;
    assert_abs_diff_eq!(pendulum_length(pi), 9.8 / (pi * pi), epsilon = 1e-12);
    assert_abs_diff_eq!(pendulum_length(1.0), 9.8, epsilon = 1e-12);
}

#[test]
fn test_length_decreases_with_frequency() {
    let mut last = f64::INFINITY;
    for i in 1..50 {
        let l = pendulum_length(i as f64 * 0.2);
        assert!(l < last);
        assert!(l > 0.0);
        last = l;
    }
}

#[test]
fn test_hertz_form_matches_angular_form() {
    assert_abs_diff_eq!(
        pendulum_length_from_frequency(0.5),
        pendulum_length(std::f64::consts::PI),
        epsilon = 1e-12
    );
}

#[test]
fn test_conventions_agree_on_fitted_params() {
    let params = OscillatorParams {
        amplitude: 1.0,
        damping: 0.0,
        angular_frequency: 2.5,
        phase: 0.0,
        offset: 0.0,
    };
    assert_abs_diff_eq!(
        length_for(&params, FrequencyConvention::AngularFrequency),
        length_for(&params, FrequencyConvention::Hertz),
        epsilon = 1e-12
    );
    assert_abs_diff_eq!(
        FrequencyConvention::Hertz.frequency(&params),
        2.5 / std::f64::consts::TAU,
        epsilon = 1e-12
    );
    assert_eq!(FrequencyConvention::AngularFrequency.column(), "omega");
    assert_eq!(FrequencyConvention::Hertz.column(), "f");
}

#[test]
fn test_surface_length() {
    // ratio = 100 / 10 = 10
    assert_abs_diff_eq!(surface_length(1.0, 100.0, 10.0).unwrap(), 0.9, epsilon = 1e-12);
}

#[test]
fn test_surface_length_undefined() {
    assert!(surface_length(1.0, 100.0, 0.0).is_none());
    assert!(surface_length(1.0, 0.0, 10.0).is_none());
    assert!(surface_length(f64::NAN, 100.0, 10.0).is_none());
    assert!(surface_length(1.0, f64::INFINITY, 10.0).is_none());
}
