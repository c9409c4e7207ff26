use std::ops::{ Add, Mul };

use crate::feq;
use crate::tuple::Double3;

/// A color.
///
/// Represented conventionally with red-green-blue (RGB) values. Each value
/// nominally ranges from 0.0 to 1.0, but intermediate shading results may
/// exceed 1.0; values are only clamped when an image is encoded.
///
/// # Examples
///
/// Attenuate a color per channel:
///
/// ```
/// # use whitted_tracer::color::Color;
/// # use whitted_tracer::tuple::Double3;
/// let white = Color::white();
/// let dimmed = white.scale(Double3::new(0.5, 0.25, 0.0));
/// assert_eq!(dimmed, Color::rgb(0.5, 0.25, 0.0));
/// ```
#[derive(Copy, Clone, Debug, Default, PartialOrd)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// Partial equality on two colors.
///
/// Colors are compared component-wise, accounting for possible floating point
/// error in comparisons.
impl PartialEq for Color {
    fn eq(&self, other: &Color) -> bool {
        feq(self.r, other.r) &&
            feq(self.g, other.g) &&
            feq(self.b, other.b)
    }
}

impl From<[f64; 3]> for Color {
    fn from(v: [f64; 3]) -> Color {
        Color { r: v[0], g: v[1], b: v[2] }
    }
}

impl Color {
    /// Creates a color with red, green and blue values.
    pub fn rgb(r: f64, g: f64, b: f64) -> Color {
        Color { r, g, b }
    }

    /// The color black.
    pub fn black() -> Color {
        Color {
            r: 0.0,
            g: 0.0,
            b: 0.0
        }
    }

    /// The color white.
    pub fn white() -> Color {
        Color {
            r: 1.0,
            g: 1.0,
            b: 1.0
        }
    }

    /// Multiplies each channel by the matching coefficient.
    pub fn scale(&self, k: Double3) -> Color {
        Color {
            r: self.r * k.d1,
            g: self.g * k.d2,
            b: self.b * k.d3,
        }
    }

    /// Divides each channel by `divisor`.
    pub fn reduce(&self, divisor: f64) -> Color {
        Color {
            r: self.r / divisor,
            g: self.g / divisor,
            b: self.b / divisor,
        }
    }

    /// Averages any number of colors.
    ///
    /// Each channel is the arithmetic mean of the matching channel of every
    /// color. An empty slice averages to black.
    pub fn average(colors: &[Color]) -> Color {
        if colors.is_empty() {
            return Color::black();
        }

        let sum = colors.iter().fold(Color::black(), |acc, c| acc + *c);
        sum.reduce(colors.len() as f64)
    }
}

/// Adds two colors together.
///
/// Components are added together individually.
impl Add<Color> for Color {
    type Output = Color;

    fn add(self, other: Color) -> Self::Output {
        Color {
            r: self.r + other.r,
            g: self.g + other.g,
            b: self.b + other.b,
        }
    }
}

/// Multiplies a color by a scalar.
///
/// Each component is multiplied by the scalar.
impl Mul<f64> for Color {
    type Output = Color;

    fn mul(self, other: f64) -> Self::Output {
        Color {
            r: self.r * other,
            g: self.g * other,
            b: self.b * other,
        }
    }
}

#[test]
fn add_colors() {
    let c1 = Color::rgb(0.9, 0.6, 0.75);
    let c2 = Color::rgb(0.7, 0.1, 0.25);
    let c3 = Color { r: 1.6, g: 0.7, b: 1.0 };

    assert_eq!(c1 + c2, c3);
}

#[test]
fn multiply_colors() {
    let c1 = Color::rgb(0.2, 0.3, 0.4);
    let c2 = Color { r: 0.4, g: 0.6, b: 0.8 };

    assert_eq!(c1 * 2.0, c2);
}

#[test]
fn average_many_colors() {
    let colors = [
        Color::rgb(1.0, 0.0, 0.0),
        Color::rgb(0.0, 1.0, 0.0),
        Color::rgb(0.0, 0.0, 1.0),
        Color::rgb(1.0, 1.0, 1.0),
    ];

    assert_eq!(Color::average(&colors), Color::rgb(0.5, 0.5, 0.5));
    assert_eq!(Color::average(&[]), Color::black());
}

#[test]
fn reduce_and_scale() {
    let c = Color::rgb(0.8, 0.4, 0.2);

    assert_eq!(c.reduce(2.0), Color::rgb(0.4, 0.2, 0.1));
    assert_eq!(c.scale(Double3::new(0.5, 1.0, 0.0)), Color::rgb(0.4, 0.4, 0.0));
}
