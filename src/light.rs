use std::fmt::Debug;

use crate::color::Color;
use crate::tuple::{ Double3, Point, Vector };

/// Light present everywhere in a scene, regardless of geometry.
///
/// The effective intensity is the light color scaled by the attenuation `ka`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AmbientLight {
    intensity: Color,
}

impl AmbientLight {
    /// No ambient light at all.
    pub const NONE: AmbientLight = AmbientLight {
        intensity: Color { r: 0.0, g: 0.0, b: 0.0 },
    };

    pub fn new(color: Color, ka: Double3) -> AmbientLight {
        AmbientLight { intensity: color.scale(ka) }
    }

    pub fn uniform(color: Color, ka: f64) -> AmbientLight {
        AmbientLight::new(color, Double3::uniform(ka))
    }

    pub fn intensity(&self) -> Color {
        self.intensity
    }
}

impl Default for AmbientLight {
    fn default() -> AmbientLight {
        AmbientLight::NONE
    }
}

/// A light source that illuminates points from some direction.
///
/// `direction_at` is the unit vector along which light travels *from the
/// light to* `point`. It is `None` only when the point sits exactly on a
/// positional light. `distance_to` is infinite for lights without a position.
pub trait LightSource: Debug + Send + Sync {
    fn intensity_at(&self, point: &Point) -> Color;
    fn direction_at(&self, point: &Point) -> Option<Vector>;
    fn distance_to(&self, point: &Point) -> f64;
}

/// A light infinitely far away, shining along one direction.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DirectionalLight {
    intensity: Color,
    direction: Vector,
}

impl DirectionalLight {
    pub fn new(intensity: Color, direction: Vector) -> DirectionalLight {
        DirectionalLight { intensity, direction: direction.normalize() }
    }
}

impl LightSource for DirectionalLight {
    fn intensity_at(&self, _point: &Point) -> Color {
        self.intensity
    }

    fn direction_at(&self, _point: &Point) -> Option<Vector> {
        Some(self.direction)
    }

    fn distance_to(&self, _point: &Point) -> f64 {
        f64::INFINITY
    }
}

/// A point light.
///
/// Light is produced at `position` and fades with distance `d` by
/// `1 / (kc + kl·d + kq·d²)`. The defaults `kc = 1, kl = kq = 0` mean no
/// attenuation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointLight {
    intensity: Color,
    position: Point,
    kc: f64,
    kl: f64,
    kq: f64,
}

impl PointLight {
    pub fn new(intensity: Color, position: Point) -> PointLight {
        PointLight { intensity, position, kc: 1.0, kl: 0.0, kq: 0.0 }
    }

    pub fn with_kc(mut self, kc: f64) -> PointLight {
        self.kc = kc;
        self
    }

    pub fn with_kl(mut self, kl: f64) -> PointLight {
        self.kl = kl;
        self
    }

    pub fn with_kq(mut self, kq: f64) -> PointLight {
        self.kq = kq;
        self
    }

    pub fn position(&self) -> Point {
        self.position
    }
}

impl LightSource for PointLight {
    fn intensity_at(&self, point: &Point) -> Color {
        let d = point.distance(&self.position);
        self.intensity.reduce(self.kc + self.kl * d + self.kq * d * d)
    }

    fn direction_at(&self, point: &Point) -> Option<Vector> {
        point.subtract(&self.position).ok().map(|v| v.normalize())
    }

    fn distance_to(&self, point: &Point) -> f64 {
        point.distance(&self.position)
    }
}

/// A point light emitting mostly along one direction.
///
/// The point light intensity is scaled by `max(0, dir·l)^exponent`, where `l`
/// is the direction from the light to the lit point. Raising the exponent
/// narrows the beam.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpotLight {
    light: PointLight,
    direction: Vector,
    exponent: f64,
}

impl SpotLight {
    pub fn new(intensity: Color, position: Point, direction: Vector) -> SpotLight {
        SpotLight {
            light: PointLight::new(intensity, position),
            direction: direction.normalize(),
            exponent: 1.0,
        }
    }

    pub fn with_kc(mut self, kc: f64) -> SpotLight {
        self.light = self.light.with_kc(kc);
        self
    }

    pub fn with_kl(mut self, kl: f64) -> SpotLight {
        self.light = self.light.with_kl(kl);
        self
    }

    pub fn with_kq(mut self, kq: f64) -> SpotLight {
        self.light = self.light.with_kq(kq);
        self
    }

    pub fn with_narrow_beam(mut self, exponent: f64) -> SpotLight {
        self.exponent = exponent;
        self
    }
}

impl LightSource for SpotLight {
    fn intensity_at(&self, point: &Point) -> Color {
        let factor = match self.light.direction_at(point) {
            Some(l) => self.direction.dot(&l).max(0.0).powf(self.exponent),
            None => 0.0,
        };

        self.light.intensity_at(point) * factor
    }

    fn direction_at(&self, point: &Point) -> Option<Vector> {
        self.light.direction_at(point)
    }

    fn distance_to(&self, point: &Point) -> f64 {
        self.light.distance_to(point)
    }
}

#[test]
fn ambient_light_is_attenuated() {
    let a = AmbientLight::new(Color::rgb(1.0, 0.5, 0.2), Double3::new(0.5, 0.5, 1.0));

    assert_eq!(a.intensity(), Color::rgb(0.5, 0.25, 0.2));
    assert_eq!(AmbientLight::uniform(Color::white(), 0.1).intensity(),
        Color::rgb(0.1, 0.1, 0.1));
    assert_eq!(AmbientLight::NONE.intensity(), Color::black());
}

#[test]
fn directional_light_is_uniform() {
    let l = DirectionalLight::new(Color::white(), Vector::new(0.0, -2.0, 0.0).unwrap());
    let p = Point::new(3.0, 4.0, 5.0);

    assert_eq!(l.intensity_at(&p), Color::white());
    assert_eq!(l.direction_at(&p), Some(Vector::new(0.0, -1.0, 0.0).unwrap()));
    assert!(l.distance_to(&p).is_infinite());
}

#[test]
fn point_light_fades_with_distance() {
    let l = PointLight::new(Color::white(), Point::ORIGIN)
        .with_kl(0.5)
        .with_kq(0.25);
    let p = Point::new(0.0, 2.0, 0.0);

    // 1 / (1 + 0.5·2 + 0.25·4)
    assert_eq!(l.intensity_at(&p), Color::rgb(1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0));
    assert_eq!(l.direction_at(&p), Some(Vector::Y));
    assert_eq!(l.distance_to(&p), 2.0);
    assert_eq!(l.direction_at(&Point::ORIGIN), None);
}

#[test]
fn spot_light_follows_its_direction() {
    let l = SpotLight::new(Color::white(), Point::ORIGIN, Vector::Y);

    assert_eq!(l.intensity_at(&Point::new(0.0, 2.0, 0.0)), Color::white());
    assert_eq!(l.intensity_at(&Point::new(0.0, -2.0, 0.0)), Color::black());
    assert_eq!(l.intensity_at(&Point::new(2.0, 0.0, 0.0)), Color::black());

    let k = 0.5f64.sqrt();
    let p = Point::new(1.0, 1.0, 0.0);
    assert_eq!(l.intensity_at(&p), Color::rgb(k, k, k));

    let narrow = l.with_narrow_beam(2.0);
    assert_eq!(narrow.intensity_at(&p), Color::rgb(0.5, 0.5, 0.5));
}

#[test]
fn spot_light_fades_with_distance() {
    let l = SpotLight::new(Color::white(), Point::ORIGIN, Vector::Y)
        .with_kl(0.5)
        .with_kq(0.25);

    // On the beam axis only the distance counts: 1 / (1 + 0.5·2 + 0.25·4).
    let on_axis = Point::new(0.0, 2.0, 0.0);
    assert_eq!(l.intensity_at(&on_axis), Color::rgb(1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0));
    assert_eq!(l.distance_to(&on_axis), 2.0);

    // Off axis the beam factor applies on top.
    let d = 2.0f64.sqrt();
    let k = 0.5f64.sqrt() / (1.0 + 0.5 * d + 0.25 * d * d);
    assert_eq!(l.intensity_at(&Point::new(1.0, 1.0, 0.0)), Color::rgb(k, k, k));
}
