use crate::color::Color;
use crate::error::Result;
use crate::geometry::{ Cylinder, Plane, Polygon, Sphere, Surface, Tube };
use crate::intersect::{ Hit, Intersectable };
use crate::material::Material;
use crate::ray::Ray;
use crate::tuple::{ Point, Vector };

#[derive(Debug, Clone, PartialEq)]
pub enum ShapeType {
    /// An infinite plane.
    Plane(Plane),

    /// A sphere with a center and a radius.
    Sphere(Sphere),

    /// An infinite cylinder around an axis ray.
    Tube(Tube),

    /// A tube with a height, closed by two caps.
    Cylinder(Cylinder),

    /// A convex planar polygon.
    Polygon(Polygon),

    /// A polygon with exactly three vertices.
    Triangle(Polygon),
}

impl ShapeType {
    fn surface(&self) -> &dyn Surface {
        match self {
            ShapeType::Plane(ref p) => p,
            ShapeType::Sphere(ref s) => s,
            ShapeType::Tube(ref t) => t,
            ShapeType::Cylinder(ref c) => c,
            ShapeType::Polygon(ref p) | ShapeType::Triangle(ref p) => p,
        }
    }
}

/// A shape placed in a scene.
///
/// Besides its geometry a shape carries the light it emits and the material
/// describing how it responds to light. Both default to black/zero and are set
/// while the scene is assembled; a scene never mutates its shapes afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub ty: ShapeType,
    pub emission: Color,
    pub material: Material,
}

impl Shape {
    pub fn new(ty: ShapeType) -> Shape {
        Shape {
            ty,
            emission: Color::black(),
            material: Material::default(),
        }
    }

    pub fn plane(q0: Point, normal: Vector) -> Shape {
        Shape::new(ShapeType::Plane(Plane::new(q0, normal)))
    }

    pub fn plane_from_points(p1: Point, p2: Point, p3: Point) -> Result<Shape> {
        Ok(Shape::new(ShapeType::Plane(Plane::from_points(p1, p2, p3)?)))
    }

    pub fn sphere(center: Point, radius: f64) -> Result<Shape> {
        Ok(Shape::new(ShapeType::Sphere(Sphere::new(center, radius)?)))
    }

    pub fn tube(axis: Ray, radius: f64) -> Result<Shape> {
        Ok(Shape::new(ShapeType::Tube(Tube::new(axis, radius)?)))
    }

    pub fn cylinder(axis: Ray, radius: f64, height: f64) -> Result<Shape> {
        Ok(Shape::new(ShapeType::Cylinder(Cylinder::new(axis, radius, height)?)))
    }

    pub fn polygon(vertices: Vec<Point>) -> Result<Shape> {
        Ok(Shape::new(ShapeType::Polygon(Polygon::new(vertices)?)))
    }

    pub fn triangle(p1: Point, p2: Point, p3: Point) -> Result<Shape> {
        Ok(Shape::new(ShapeType::Triangle(Polygon::new(vec![p1, p2, p3])?)))
    }

    /// Sets the emission color.
    pub fn with_emission(mut self, emission: Color) -> Shape {
        self.emission = emission;
        self
    }

    /// Sets the material.
    pub fn with_material(mut self, material: Material) -> Shape {
        self.material = material;
        self
    }

    /// The unit normal at `point`, which is assumed to lie on the surface.
    pub fn normal_at(&self, point: &Point) -> Vector {
        self.ty.surface().normal_at(point)
    }
}

impl Intersectable for Shape {
    fn find_hits(&self, ray: &Ray, max_distance: f64) -> Option<Vec<Hit>> {
        let hits: Vec<Hit> = self.ty.surface()
            .intersect_points(ray, max_distance)
            .into_iter()
            .map(|point| Hit { shape: self, point })
            .collect();

        if hits.is_empty() { None } else { Some(hits) }
    }
}

/* Tests */

#[cfg(test)]
use crate::tuple::Double3;

#[test]
fn shape_hits_reference_the_shape() {
    let s = Shape::sphere(Point::new(0.0, 0.0, 5.0), 1.0).unwrap();
    let r = Ray::new(Point::ORIGIN, Vector::Z);
    let hits = s.find_hits_unbounded(&r).unwrap();

    assert_eq!(hits.len(), 2);
    assert!(hits.iter().all(|h| std::ptr::eq(h.shape, &s)));
    assert!(s.find_hits(&r, 3.0).is_none());
}

#[test]
fn shape_builders_set_emission_and_material() {
    let material = Material::new().with_kd(0.5).with_shininess(30.0);
    let s = Shape::plane(Point::ORIGIN, Vector::Y)
        .with_emission(Color::rgb(0.2, 0.0, 0.0))
        .with_material(material);

    assert_eq!(s.emission, Color::rgb(0.2, 0.0, 0.0));
    assert_eq!(s.material.kd, Double3::uniform(0.5));
    assert_eq!(s.normal_at(&Point::new(4.0, 0.0, 2.0)), Vector::Y);
}

#[test]
fn triangle_normal_and_hit() {
    let t = Shape::triangle(
        Point::new(0.0, 0.0, 1.0),
        Point::new(1.0, 0.0, 0.0),
        Point::new(0.0, 1.0, 0.0),
    ).unwrap();
    let k = 3f64.sqrt() / 3.0;
    let n = t.normal_at(&Point::new(0.0, 0.0, 1.0));

    assert!(n == Vector::new(k, k, k).unwrap() || n == -Vector::new(k, k, k).unwrap());

    let r = Ray::new(Point::new(1.0, 1.0, 1.0), Vector::new(-1.0, -1.0, -1.0).unwrap());
    let hits = t.find_points(&r).unwrap();
    assert_eq!(hits, vec![Point::new(1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0)]);
}
