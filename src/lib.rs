pub mod consts;
pub mod error;

pub mod tuple;
pub mod ray;
pub mod color;

pub mod material;
pub mod geometry;
pub mod shape;
pub mod intersect;

pub mod light;
pub mod scene;
pub mod tracer;

pub mod canvas;
pub mod camera;
pub mod parallel;

pub use error::{ Error, Result };

use consts::{ FEQ_EPSILON, ZERO_EPSILON };

/// Loose equality used by every `PartialEq` on points, vectors and colors.
pub fn feq(left: f64, right: f64) -> bool {
    (left - right).abs() < FEQ_EPSILON
}

/// Checks whether a value is close enough to zero to be treated as zero.
pub fn is_zero(value: f64) -> bool {
    value.abs() < ZERO_EPSILON
}

/// Snaps values that are practically zero to exactly zero.
pub fn align_zero(value: f64) -> f64 {
    if is_zero(value) { 0.0 } else { value }
}

#[test]
fn align_zero_snaps_tiny_values() {
    assert_eq!(align_zero(1e-12), 0.0);
    assert_eq!(align_zero(-1e-12), 0.0);
    assert_eq!(align_zero(0.5), 0.5);
}
