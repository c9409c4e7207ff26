use crate::ray::Ray;
use crate::shape::Shape;
use crate::tuple::Point;

/// An intersection.
///
/// This structure assumes that some ray produced an intersection. `point` is
/// where the ray met the surface and `shape` is a reference to the shape that
/// was hit, so shading can look up its normal, emission and material.
#[derive(Copy, Clone, Debug)]
pub struct Hit<'a> {
    pub shape: &'a Shape,
    pub point: Point,
}

/// Implements partial equality on a Hit.
///
/// Two hits are equal if their points are equal and the underlying *pointers*
/// of their shapes are equal. Two identical shapes at different addresses are
/// different shapes.
impl<'a> PartialEq for Hit<'a> {
    fn eq(&self, other: &Hit<'a>) -> bool {
        self.point == other.point && std::ptr::eq(self.shape, other.shape)
    }
}

/// Anything a ray can be tested against.
///
/// `find_hits` returns `None` rather than an empty vector when nothing was
/// hit. Only hits at a distance `t` with `0 < t <= max_distance` are returned.
pub trait Intersectable {
    fn find_hits(&self, ray: &Ray, max_distance: f64) -> Option<Vec<Hit>>;

    fn find_hits_unbounded(&self, ray: &Ray) -> Option<Vec<Hit>> {
        self.find_hits(ray, f64::INFINITY)
    }

    /// The hit points without the shapes they belong to.
    fn find_points(&self, ray: &Ray) -> Option<Vec<Point>> {
        self.find_hits_unbounded(ray)
            .map(|hits| hits.into_iter().map(|h| h.point).collect())
    }
}

/// A flat, insertion-ordered collection of shapes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Geometries {
    shapes: Vec<Shape>,
}

impl Geometries {
    pub fn new() -> Geometries {
        Geometries { shapes: Vec::new() }
    }

    pub fn add(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    pub fn extend<I: IntoIterator<Item = Shape>>(&mut self, shapes: I) {
        self.shapes.extend(shapes);
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<Shape> {
        self.shapes.iter()
    }
}

impl From<Vec<Shape>> for Geometries {
    fn from(shapes: Vec<Shape>) -> Geometries {
        Geometries { shapes }
    }
}

impl Intersectable for Geometries {
    fn find_hits(&self, ray: &Ray, max_distance: f64) -> Option<Vec<Hit>> {
        let hits: Vec<Hit> = self.shapes.iter()
            .filter_map(|s| s.find_hits(ray, max_distance))
            .flatten()
            .collect();

        if hits.is_empty() { None } else { Some(hits) }
    }
}

/* Tests */

#[cfg(test)]
use crate::tuple::Vector;

#[cfg(test)]
fn composite() -> Geometries {
    Geometries::from(vec![
        Shape::sphere(Point::new(1.0, 0.0, 0.0), 1.0).unwrap(),
        Shape::triangle(
            Point::new(0.0, 2.0, 0.0),
            Point::new(2.0, 0.0, 0.0),
            Point::new(-2.0, 0.0, 0.0),
        ).unwrap(),
        Shape::plane_from_points(
            Point::new(2.0, 0.0, 0.0),
            Point::new(0.0, 2.0, 0.0),
            Point::new(0.0, 0.0, 2.0),
        ).unwrap(),
    ])
}

#[cfg(test)]
fn ray(origin: [f64; 3], direction: [f64; 3]) -> Ray {
    Ray::new(
        Point::from(origin),
        Vector::new(direction[0], direction[1], direction[2]).unwrap(),
    )
}

#[test]
fn hits_in_composite() {
    let g = composite();

    // Only some of the shapes are hit.
    let hits = g.find_points(&ray([1.0, -2.0, 0.5], [0.0, 7.0, 1.5])).unwrap();
    assert_eq!(hits.len(), 3);

    // Exactly one shape is hit.
    let hits = g.find_points(&ray([1.0, -2.0, 0.5], [-1.0, -1.0, 5.5])).unwrap();
    assert_eq!(hits.len(), 1);

    // Every shape is hit.
    let hits = g.find_points(&ray([-2.0, 0.0, -3.0], [6.0, 1.0, 6.0])).unwrap();
    assert_eq!(hits.len(), 4);
}

#[test]
fn no_hits_in_composite() {
    assert!(Geometries::new()
        .find_hits_unbounded(&ray([1.0, 0.0, 0.0], [2.0, 0.0, 0.0]))
        .is_none());
    assert!(composite()
        .find_hits_unbounded(&ray([1.0, -2.0, 0.5], [-5.0, 0.0, -0.5]))
        .is_none());
}

#[test]
fn hits_compare_by_shape_identity() {
    let a = Shape::sphere(Point::ORIGIN, 1.0).unwrap();
    let b = a.clone();
    let p = Point::new(0.0, 0.0, 1.0);

    assert_eq!(Hit { shape: &a, point: p }, Hit { shape: &a, point: p });
    assert_ne!(Hit { shape: &a, point: p }, Hit { shape: &b, point: p });
}

#[test]
fn closest_hit_from_composite() {
    let g = composite();
    let r = ray([-2.0, 0.0, -3.0], [6.0, 1.0, 6.0]);
    let hits = g.find_hits_unbounded(&r).unwrap();
    let closest = r.find_closest_hit(&hits).unwrap();

    for shift in 0..hits.len() {
        let mut rotated = hits.clone();
        rotated.rotate_left(shift);
        assert_eq!(r.find_closest_hit(&rotated), Some(closest));

        rotated.reverse();
        assert_eq!(r.find_closest_hit(&rotated), Some(closest));
    }
    assert!(hits.iter().all(|h| {
        r.origin().distance_squared(&h.point) >= r.origin().distance_squared(&closest.point)
    }));
}
