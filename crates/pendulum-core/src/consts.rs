/// Minimum pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// ITU-R BT.601 luminance coefficient for the red channel.
pub const LUMINANCE_R: f32 = 0.299;

/// ITU-R BT.601 luminance coefficient for the green channel.
pub const LUMINANCE_G: f32 = 0.587;

/// ITU-R BT.601 luminance coefficient for the blue channel.
pub const LUMINANCE_B: f32 = 0.114;

/// Number of channels in a color frame (R, G, B).
pub const COLOR_CHANNEL_COUNT: usize = 3;

/// Side length of the square Gaussian kernel applied before edge and circle detection.
pub const DEFAULT_BLUR_KERNEL_SIZE: usize = 17;

/// Canny hysteresis thresholds on the 8-bit intensity scale.
pub const DEFAULT_CANNY_LOW: f32 = 50.0;
pub const DEFAULT_CANNY_HIGH: f32 = 150.0;

/// Minimum distance between detected circle centers (pixels).
pub const DEFAULT_HOUGH_MIN_DIST: f64 = 20.0;

/// Upper Canny threshold used inside the circle transform; the lower one is half of it.
pub const DEFAULT_HOUGH_EDGE_THRESHOLD: f32 = 50.0;

/// Accumulator votes needed for a circle center.
pub const DEFAULT_HOUGH_ACCUMULATOR_THRESHOLD: u32 = 30;

/// Radius search range for the circle transform (pixels).
pub const DEFAULT_HOUGH_MIN_RADIUS: usize = 5;
pub const DEFAULT_HOUGH_MAX_RADIUS: usize = 50;

/// Minimum connected-region area (pixels) for a detection.
pub const DEFAULT_MIN_AREA: usize = 200;

/// A sample is taken every Nth frame.
pub const DEFAULT_SAMPLE_CADENCE: usize = 5;

/// Circle refits stop once this many samples have been collected.
pub const DEFAULT_MAX_SAMPLES: usize = 1000;

/// Rotation angles below this magnitude are treated as exactly zero.
pub const ROTATION_IDENTITY_EPSILON: f64 = 1e-6;

/// Fewest samples the rotated-circle fit is attempted with.
pub const MIN_CIRCLE_SAMPLES: usize = 4;

/// Standard gravity used by the pendulum-length relation (m/s^2).
pub const STANDARD_GRAVITY: f64 = 9.8;

/// Frame rate assumed when a source carries no timing information.
pub const DEFAULT_FRAME_RATE: f64 = 30.0;

/// Levenberg-Marquardt defaults.
pub const LM_MAX_ITERATIONS: usize = 500;
pub const LM_INITIAL_LAMBDA: f64 = 1e-3;
pub const LM_FTOL: f64 = 1e-12;
pub const LM_XTOL: f64 = 1e-12;
pub const LM_GTOL: f64 = 1e-14;

/// Ratio of smallest to largest singular value below which a Jacobian is singular.
pub const LM_SINGULAR_RATIO: f64 = 1e-12;

/// Zero-padding factor for the spectral frequency estimate.
pub const SPECTRAL_PADDING_FACTOR: usize = 8;

/// Default HSV window (OpenCV 8-bit convention), a magenta-red band.
pub const DEFAULT_HSV_HMIN: u8 = 146;
pub const DEFAULT_HSV_HMAX: u8 = 179;
pub const DEFAULT_HSV_SMIN: u8 = 40;
pub const DEFAULT_HSV_SMAX: u8 = 255;
pub const DEFAULT_HSV_VMIN: u8 = 0;
pub const DEFAULT_HSV_VMAX: u8 = 255;
