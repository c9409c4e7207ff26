use std::ops::{ Add, Mul, Neg };

use crate::error::{ Error, Result };
use crate::{ feq, is_zero };

/// A raw triple of doubles.
///
/// Used wherever a quantity has one value per color channel: material
/// coefficients, ambient attenuation, and the running attenuation `k` of the
/// recursive shading.
#[derive(Debug, Default, Copy, Clone, PartialOrd)]
pub struct Double3 {
    pub d1: f64,
    pub d2: f64,
    pub d3: f64,
}

impl PartialEq for Double3 {
    fn eq(&self, other: &Double3) -> bool {
        feq(self.d1, other.d1) &&
            feq(self.d2, other.d2) &&
            feq(self.d3, other.d3)
    }
}

impl Double3 {
    pub const ZERO: Double3 = Double3 { d1: 0.0, d2: 0.0, d3: 0.0 };
    pub const ONE: Double3 = Double3 { d1: 1.0, d2: 1.0, d3: 1.0 };

    pub fn new(d1: f64, d2: f64, d3: f64) -> Double3 {
        Double3 { d1, d2, d3 }
    }

    /// A triple with the same value in every component.
    pub fn uniform(value: f64) -> Double3 {
        Double3 { d1: value, d2: value, d3: value }
    }

    /// Divides every component by `divisor`.
    pub fn reduce(&self, divisor: f64) -> Double3 {
        Double3 {
            d1: self.d1 / divisor,
            d2: self.d2 / divisor,
            d3: self.d3 / divisor,
        }
    }

    /// True when every component is strictly below `k`.
    pub fn lower_than(&self, k: f64) -> bool {
        self.d1 < k && self.d2 < k && self.d3 < k
    }
}

impl From<f64> for Double3 {
    fn from(value: f64) -> Double3 {
        Double3::uniform(value)
    }
}

impl From<[f64; 3]> for Double3 {
    fn from(v: [f64; 3]) -> Double3 {
        Double3 { d1: v[0], d2: v[1], d3: v[2] }
    }
}

impl Add for Double3 {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            d1: self.d1 + other.d1,
            d2: self.d2 + other.d2,
            d3: self.d3 + other.d3,
        }
    }
}

/// Component-wise product.
impl Mul<Double3> for Double3 {
    type Output = Self;

    fn mul(self, other: Double3) -> Self {
        Self {
            d1: self.d1 * other.d1,
            d2: self.d2 * other.d2,
            d3: self.d3 * other.d3,
        }
    }
}

impl Mul<f64> for Double3 {
    type Output = Self;

    fn mul(self, other: f64) -> Self {
        Self {
            d1: self.d1 * other,
            d2: self.d2 * other,
            d3: self.d3 * other,
        }
    }
}

/// A location in world space.
#[derive(Debug, Default, Copy, Clone, PartialOrd)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl PartialEq for Point {
    fn eq(&self, other: &Point) -> bool {
        feq(self.x, other.x) &&
            feq(self.y, other.y) &&
            feq(self.z, other.z)
    }
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f64, y: f64, z: f64) -> Point {
        Point { x, y, z }
    }

    /// Moves the point along a vector.
    pub fn add(&self, v: &Vector) -> Point {
        Point {
            x: self.x + v.x,
            y: self.y + v.y,
            z: self.z + v.z,
        }
    }

    /// The vector leading from `other` to `self`.
    ///
    /// Fails with `Error::ZeroVector` when both points coincide.
    pub fn subtract(&self, other: &Point) -> Result<Vector> {
        Vector::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    pub fn distance_squared(&self, other: &Point) -> f64 {
        (self.x - other.x).powi(2)
            + (self.y - other.y).powi(2)
            + (self.z - other.z).powi(2)
    }

    pub fn distance(&self, other: &Point) -> f64 {
        self.distance_squared(other).sqrt()
    }
}

impl From<[f64; 3]> for Point {
    fn from(v: [f64; 3]) -> Point {
        Point { x: v[0], y: v[1], z: v[2] }
    }
}

/// A direction with magnitude. Never the zero vector.
///
/// Every operation that could produce a zero vector is fallible and reports
/// `Error::ZeroVector` instead.
#[derive(Debug, Copy, Clone, PartialOrd)]
pub struct Vector {
    x: f64,
    y: f64,
    z: f64,
}

impl PartialEq for Vector {
    fn eq(&self, other: &Vector) -> bool {
        feq(self.x, other.x) &&
            feq(self.y, other.y) &&
            feq(self.z, other.z)
    }
}

impl Vector {
    pub const X: Vector = Vector { x: 1.0, y: 0.0, z: 0.0 };
    pub const Y: Vector = Vector { x: 0.0, y: 1.0, z: 0.0 };
    pub const Z: Vector = Vector { x: 0.0, y: 0.0, z: 1.0 };

    pub fn new(x: f64, y: f64, z: f64) -> Result<Vector> {
        if is_zero(x) && is_zero(y) && is_zero(z) {
            return Err(Error::ZeroVector);
        }

        Ok(Vector { x, y, z })
    }

    // Only for results that are non-zero by construction.
    fn unchecked(x: f64, y: f64, z: f64) -> Vector {
        Vector { x, y, z }
    }

    pub fn x(&self) -> f64 { self.x }
    pub fn y(&self) -> f64 { self.y }
    pub fn z(&self) -> f64 { self.z }

    pub fn add(&self, other: &Vector) -> Result<Vector> {
        Vector::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }

    pub fn subtract(&self, other: &Vector) -> Result<Vector> {
        Vector::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    pub fn scale(&self, factor: f64) -> Result<Vector> {
        Vector::new(self.x * factor, self.y * factor, self.z * factor)
    }

    pub fn dot(&self, other: &Vector) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Fails for parallel vectors.
    pub fn cross(&self, other: &Vector) -> Result<Vector> {
        Vector::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn length_squared(&self) -> f64 {
        self.dot(self)
    }

    pub fn length(&self) -> f64 {
        self.length_squared().sqrt()
    }

    pub fn normalize(&self) -> Vector {
        let len = self.length();
        Vector::unchecked(self.x / len, self.y / len, self.z / len)
    }
}

impl Neg for Vector {
    type Output = Self;

    fn neg(self) -> Self {
        Vector::unchecked(-self.x, -self.y, -self.z)
    }
}

/* Tests */

#[test]
fn zero_vector_is_rejected() {
    assert!(matches!(Vector::new(0.0, 0.0, 0.0), Err(Error::ZeroVector)));

    let v = Vector::new(1.0, 2.0, 3.0).unwrap();
    assert!(v.scale(0.0).is_err());
    assert!(v.add(&-v).is_err());
    assert!(v.cross(&v.scale(-2.0).unwrap()).is_err());
}

#[test]
fn subtracting_points() {
    let p1 = Point::new(1.0, 2.0, 3.0);
    let p2 = Point::new(2.0, 3.0, 4.0);

    assert_eq!(p2.subtract(&p1).unwrap(), Vector::new(1.0, 1.0, 1.0).unwrap());
    assert!(p1.subtract(&p1).is_err());
}

#[test]
fn adding_a_vector_to_a_point() {
    let p = Point::new(1.0, 2.0, 3.0);
    let v = Vector::new(-1.0, -2.0, -3.0).unwrap();

    assert_eq!(p.add(&v), Point::ORIGIN);
}

#[test]
fn dot_and_cross_products() {
    let v1 = Vector::new(1.0, 2.0, 3.0).unwrap();
    let v2 = Vector::new(-2.0, -4.0, -6.0).unwrap();
    let v3 = Vector::new(0.0, 3.0, -2.0).unwrap();

    assert!(crate::is_zero(v1.dot(&v3)));
    assert_eq!(v1.dot(&v2), -28.0);

    let cross = v1.cross(&v3).unwrap();
    assert!((cross.length() - v1.length() * v3.length()).abs() < 1e-9);
    assert!(crate::is_zero(cross.dot(&v1)));
    assert!(crate::is_zero(cross.dot(&v3)));
}

#[test]
fn normalizing_a_vector() {
    let v = Vector::new(1.0, 2.0, 3.0).unwrap();
    let u = v.normalize();

    assert!((u.length() - 1.0).abs() < 1e-12);
    assert_eq!(u, Vector::new(0.26726, 0.53452, 0.80178).unwrap());
}

#[test]
fn point_distances() {
    let p1 = Point::new(1.0, 2.0, 3.0);
    let p2 = Point::new(1.0, 2.0, 7.0);

    assert_eq!(p1.distance_squared(&p2), 16.0);
    assert_eq!(p1.distance(&p2), 4.0);
}

#[test]
fn double3_lower_than() {
    assert!(Double3::uniform(0.0005).lower_than(0.001));
    assert!(!Double3::new(0.0005, 0.5, 0.0).lower_than(0.001));
}
