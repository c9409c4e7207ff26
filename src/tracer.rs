use std::fmt::Debug;
use std::sync::Arc;

use log::debug;

use crate::align_zero;
use crate::color::Color;
use crate::consts::{ INITIAL_K, MAX_CALC_COLOR_LEVEL, MIN_CALC_COLOR_K };
use crate::intersect::{ Hit, Intersectable };
use crate::light::LightSource;
use crate::ray::Ray;
use crate::scene::Scene;
use crate::tuple::{ Double3, Vector };

/// Computes the color seen along a ray.
pub trait RayTracer: Debug + Send + Sync {
    fn trace_ray(&self, ray: &Ray) -> Color;
}

/// A Whitted-style recursive ray tracer.
///
/// Local effects are Phong diffuse and specular terms from every light,
/// attenuated by the transparency of whatever lies between the point and the
/// light. Global effects follow one reflected and one straight transmitted
/// ray per hit until the recursion level runs out or the accumulated
/// attenuation `k` drops below `MIN_CALC_COLOR_K`.
#[derive(Debug, Clone)]
pub struct BasicRayTracer {
    scene: Arc<Scene>,
}

impl BasicRayTracer {
    pub fn new(scene: Arc<Scene>) -> BasicRayTracer {
        debug!("ray tracer for scene '{}'", scene.name);
        BasicRayTracer { scene }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    fn closest_hit(&self, ray: &Ray) -> Option<Hit> {
        let hits = self.scene.geometries.find_hits_unbounded(ray)?;
        ray.find_closest_hit(&hits)
    }

    fn calc_color(&self, hit: &Hit, ray: &Ray, level: usize, k: Double3) -> Color {
        let color = self.local_effects(hit, ray, k);
        if level > 1 {
            color + self.global_effects(hit, ray, level, k)
        } else {
            color
        }
    }

    fn local_effects(&self, hit: &Hit, ray: &Ray, k: Double3) -> Color {
        let mut color = hit.shape.emission;
        let v = ray.direction();
        let n = hit.shape.normal_at(&hit.point);

        // Grazing: the surface is seen edge-on.
        let nv = align_zero(n.dot(&v));
        if nv == 0.0 {
            return color;
        }

        let material = &hit.shape.material;
        for light in self.scene.lights.iter() {
            let l = match light.direction_at(&hit.point) {
                Some(l) => l,
                None => continue,
            };

            // The light has to be on the same side of the surface as the
            // viewer.
            let nl = align_zero(n.dot(&l));
            if nl * nv <= 0.0 {
                continue;
            }

            let ktr = self.transparency(light.as_ref(), &l, &n, hit);
            if (ktr * k).lower_than(MIN_CALC_COLOR_K) {
                continue;
            }

            let intensity = light.intensity_at(&hit.point).scale(ktr);
            let diffuse = material.kd * nl.abs();
            let specular = material.ks * specular_factor(&n, &l, nl, &v, material.shininess);
            color = color + intensity.scale(diffuse + specular);
        }

        color
    }

    /// How much of a light reaches the hit point.
    ///
    /// Every surface crossed between the point and the light multiplies the
    /// result by its transparency. Surfaces beyond the light don't count.
    fn transparency(&self, light: &dyn LightSource, l: &Vector, n: &Vector, hit: &Hit)
        -> Double3
    {
        let to_light = -*l;
        let shadow_ray = Ray::offset(hit.point, to_light, n);
        let max_distance = light.distance_to(&shadow_ray.origin());

        let blockers = match self.scene.geometries.find_hits(&shadow_ray, max_distance) {
            Some(blockers) => blockers,
            None => return Double3::ONE,
        };

        let mut ktr = Double3::ONE;
        for blocker in blockers.iter() {
            ktr = ktr * blocker.shape.material.kt;
            if ktr.lower_than(MIN_CALC_COLOR_K) {
                return Double3::ZERO;
            }
        }

        ktr
    }

    fn global_effects(&self, hit: &Hit, ray: &Ray, level: usize, k: Double3) -> Color {
        let v = ray.direction();
        let n = hit.shape.normal_at(&hit.point);
        let material = &hit.shape.material;

        let reflected = Ray::offset(hit.point, reflect(&v, &n), &n);
        let refracted = Ray::offset(hit.point, v, &n);

        self.global_effect(&reflected, level, k, material.kr)
            + self.global_effect(&refracted, level, k, material.kt)
    }

    fn global_effect(&self, ray: &Ray, level: usize, k: Double3, kx: Double3) -> Color {
        let kkx = k * kx;
        if kkx.lower_than(MIN_CALC_COLOR_K) {
            return Color::black();
        }

        let hit = match self.closest_hit(ray) {
            Some(hit) => hit,
            None => return self.scene.background.scale(kx),
        };

        let n = hit.shape.normal_at(&hit.point);
        if align_zero(n.dot(&ray.direction())) == 0.0 {
            return Color::black();
        }

        self.calc_color(&hit, ray, level - 1, kkx).scale(kx)
    }
}

impl RayTracer for BasicRayTracer {
    fn trace_ray(&self, ray: &Ray) -> Color {
        match self.closest_hit(ray) {
            Some(hit) => {
                self.scene.ambient_light.intensity()
                    + self.calc_color(&hit, ray, MAX_CALC_COLOR_LEVEL, Double3::uniform(INITIAL_K))
            },
            None => self.scene.background,
        }
    }
}

/// `max(0, -v·r)^shininess` with `r` the mirror image of `l` about `n`.
fn specular_factor(n: &Vector, l: &Vector, nl: f64, v: &Vector, shininess: f64) -> f64 {
    let r = match n.scale(2.0 * nl) {
        Ok(n2) => l.subtract(&n2),
        Err(_) => Ok(*l),
    };

    match r {
        Ok(r) => (-v.dot(&r)).max(0.0).powf(shininess),
        Err(_) => 0.0,
    }
}

/// Mirrors `v` about the surface with normal `n`.
fn reflect(v: &Vector, n: &Vector) -> Vector {
    let vn = align_zero(v.dot(n));
    match n.scale(2.0 * vn) {
        Ok(n2) => v.subtract(&n2).unwrap_or(*v),
        Err(_) => *v,
    }
}

/* Tests */

#[cfg(test)]
use crate::{
    light::{ AmbientLight, DirectionalLight, PointLight },
    material::Material,
    scene::SceneBuilder,
    shape::Shape,
    tuple::Point,
};

#[cfg(test)]
fn floor() -> Shape {
    Shape::plane(Point::ORIGIN, Vector::Z)
        .with_material(Material::new().with_kd(0.5))
}

#[cfg(test)]
fn view_ray() -> Ray {
    Ray::new(Point::new(0.0, -10.0, 10.0), Vector::new(0.0, 1.0, -1.0).unwrap())
}

#[cfg(test)]
fn light_above() -> PointLight {
    PointLight::new(Color::white(), Point::new(0.0, 0.0, 5.0))
}

#[test]
fn missed_ray_sees_background() {
    let scene = SceneBuilder::new("empty")
        .background(Color::rgb(0.1, 0.2, 0.3))
        .ambient_light(AmbientLight::uniform(Color::white(), 0.5))
        .build();
    let tracer = BasicRayTracer::new(Arc::new(scene));

    assert_eq!(tracer.trace_ray(&view_ray()), Color::rgb(0.1, 0.2, 0.3));
}

#[test]
fn unlit_opaque_sphere_shows_emission_and_ambient() {
    let scene = SceneBuilder::new("unlit")
        .background(Color::rgb(0.5, 0.5, 0.5))
        .ambient_light(AmbientLight::uniform(Color::rgb(1.0, 0.5, 0.0), 0.2))
        .add_shape(Shape::sphere(Point::new(0.0, 0.0, -5.0), 1.0).unwrap()
            .with_emission(Color::rgb(0.0, 0.3, 0.6))
            .with_material(Material::new().with_kd(0.7).with_ks(0.3)))
        .build();
    let tracer = BasicRayTracer::new(Arc::new(scene));
    let r = Ray::new(Point::ORIGIN, -Vector::Z);

    assert_eq!(tracer.trace_ray(&r), Color::rgb(0.2, 0.4, 0.6));
}

#[test]
fn diffuse_light_on_floor() {
    let scene = SceneBuilder::new("lit")
        .add_shape(floor())
        .add_light(light_above())
        .build();
    let tracer = BasicRayTracer::new(Arc::new(scene));

    assert_eq!(tracer.trace_ray(&view_ray()), Color::rgb(0.5, 0.5, 0.5));
}

#[test]
fn opaque_occluder_before_light_casts_shadow() {
    let scene = SceneBuilder::new("shadow")
        .add_shape(floor())
        .add_shape(Shape::sphere(Point::new(0.0, 0.0, 2.5), 1.0).unwrap())
        .add_light(light_above())
        .build();
    let tracer = BasicRayTracer::new(Arc::new(scene));

    assert_eq!(tracer.trace_ray(&view_ray()), Color::black());
}

#[test]
fn opaque_occluder_beyond_light_casts_no_shadow() {
    let scene = SceneBuilder::new("no shadow")
        .add_shape(floor())
        .add_shape(Shape::sphere(Point::new(0.0, 0.0, 8.0), 1.0).unwrap())
        .add_light(light_above())
        .build();
    let tracer = BasicRayTracer::new(Arc::new(scene));

    assert_eq!(tracer.trace_ray(&view_ray()), Color::rgb(0.5, 0.5, 0.5));
}

#[test]
fn transparent_occluder_dims_light() {
    // The shadow ray crosses the sphere surface twice.
    let scene = SceneBuilder::new("glass")
        .add_shape(floor())
        .add_shape(Shape::sphere(Point::new(0.0, 0.0, 2.5), 1.0).unwrap()
            .with_material(Material::new().with_kt(0.5)))
        .add_light(light_above())
        .build();
    let tracer = BasicRayTracer::new(Arc::new(scene));

    assert_eq!(tracer.trace_ray(&view_ray()), Color::rgb(0.125, 0.125, 0.125));
}

#[test]
fn light_behind_surface_does_not_contribute() {
    let scene = SceneBuilder::new("backlit")
        .add_shape(floor())
        .add_light(PointLight::new(Color::white(), Point::new(0.0, 0.0, -5.0)))
        .build();
    let tracer = BasicRayTracer::new(Arc::new(scene));

    assert_eq!(tracer.trace_ray(&view_ray()), Color::black());
}

#[test]
fn mirror_reflects_background() {
    let scene = SceneBuilder::new("mirror")
        .background(Color::rgb(0.2, 0.3, 0.4))
        .add_shape(Shape::plane(Point::ORIGIN, Vector::Z)
            .with_material(Material::new().with_kr(1.0)))
        .build();
    let tracer = BasicRayTracer::new(Arc::new(scene));

    assert_eq!(tracer.trace_ray(&view_ray()), Color::rgb(0.2, 0.3, 0.4));
}

#[test]
fn directional_light_is_blocked_at_any_distance() {
    let sun = DirectionalLight::new(Color::white(), -Vector::Z);

    let scene = SceneBuilder::new("sunlit")
        .add_shape(floor())
        .add_light(sun)
        .build();
    let tracer = BasicRayTracer::new(Arc::new(scene));
    assert_eq!(tracer.trace_ray(&view_ray()), Color::rgb(0.5, 0.5, 0.5));

    let scene = SceneBuilder::new("eclipse")
        .add_shape(floor())
        .add_shape(Shape::sphere(Point::new(0.0, 0.0, 50.0), 1.0).unwrap())
        .add_light(sun)
        .build();
    let tracer = BasicRayTracer::new(Arc::new(scene));
    assert_eq!(tracer.trace_ray(&view_ray()), Color::black());
}

#[test]
fn facing_mirrors_stop_at_recursion_limit() {
    let mirror = Material::new().with_kr(0.9);
    let emission = Color::rgb(0.01, 0.01, 0.01);
    let scene = SceneBuilder::new("hall of mirrors")
        .background(Color::white())
        .add_shape(Shape::plane(Point::ORIGIN, Vector::Z)
            .with_emission(emission)
            .with_material(mirror))
        .add_shape(Shape::plane(Point::new(0.0, 0.0, 10.0), -Vector::Z)
            .with_emission(emission)
            .with_material(mirror))
        .build();
    let tracer = BasicRayTracer::new(Arc::new(scene));
    let r = Ray::new(Point::new(0.0, 0.0, 5.0), -Vector::Z);

    // One emission term per level, each bounce scaled by kr. The background
    // is never reached.
    let bounces = |levels: usize| {
        (0..levels).fold(Color::black(), |acc, i| acc + emission * 0.9f64.powi(i as i32))
    };

    assert_eq!(tracer.trace_ray(&r), bounces(MAX_CALC_COLOR_LEVEL));
    assert_ne!(tracer.trace_ray(&r), bounces(MAX_CALC_COLOR_LEVEL - 1));
    assert_ne!(tracer.trace_ray(&r), bounces(MAX_CALC_COLOR_LEVEL + 1));
}

#[test]
fn faint_reflection_is_cut_off() {
    let emission = Color::rgb(0.01, 0.02, 0.03);
    let scene = SceneBuilder::new("dull mirror")
        .background(Color::white())
        .add_shape(Shape::plane(Point::ORIGIN, Vector::Z)
            .with_emission(emission)
            .with_material(Material::new().with_kr(0.0005)))
        .build();
    let tracer = BasicRayTracer::new(Arc::new(scene));

    assert_eq!(tracer.trace_ray(&view_ray()), emission);
    assert_ne!(tracer.trace_ray(&view_ray()), emission + Color::white() * 0.0005);
}

#[test]
fn specular_highlight_along_mirror_direction() {
    let n = Vector::Z;
    let l = Vector::new(1.0, 0.0, -1.0).unwrap().normalize();
    let v = Vector::new(-1.0, 0.0, -1.0).unwrap().normalize();
    let nl = n.dot(&l);

    // Looking straight down the reflected light.
    assert!((specular_factor(&n, &l, nl, &v, 10.0) - 1.0).abs() < 1e-9);

    let away = Vector::new(1.0, 0.0, -1.0).unwrap().normalize();
    assert_eq!(specular_factor(&n, &l, nl, &away, 10.0), 0.0);
}
