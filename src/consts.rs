// Floating point comparisons
pub const FEQ_EPSILON: f64 = 0.0001;

// Values this close to zero are treated as zero by `is_zero`/`align_zero`.
pub const ZERO_EPSILON: f64 = 1e-10;

// How far a secondary ray origin is pushed off its surface.
pub const DELTA: f64 = 0.1;

// Recursion limits for global effects
pub const MAX_CALC_COLOR_LEVEL: usize = 10;
pub const MIN_CALC_COLOR_K: f64 = 0.001;
pub const INITIAL_K: f64 = 1.0;

// Runtime defaults
pub const DEFAULT_PRINT_INTERVAL: f64 = 1.0;
pub const DEFAULT_OUT_FILE: &str = "./out.ppm";
