use std::cmp::Ordering;

use crate::consts::DELTA;
use crate::intersect::Hit;
use crate::shape::Shape;
use crate::tuple::{ Point, Vector };
use crate::{ align_zero, is_zero };

/// A half-line starting at `origin` and heading along a unit `direction`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ray {
    origin: Point,
    direction: Vector,
}

impl Ray {
    /// Creates a ray. The direction is normalized.
    pub fn new(origin: Point, direction: Vector) -> Ray {
        Ray { origin, direction: direction.normalize() }
    }

    /// Creates a secondary ray leaving a surface.
    ///
    /// The origin is pushed `DELTA` along `normal`, towards the side of the
    /// surface `direction` points to, so the ray does not immediately hit the
    /// surface it starts on. A direction tangent to the surface leaves the
    /// origin untouched.
    pub fn offset(head: Point, direction: Vector, normal: &Vector) -> Ray {
        let nv = align_zero(normal.dot(&direction));
        let origin = if nv == 0.0 {
            head
        } else {
            let delta = if nv > 0.0 { DELTA } else { -DELTA };
            match normal.scale(delta) {
                Ok(shift) => head.add(&shift),
                Err(_) => head,
            }
        };

        Ray::new(origin, direction)
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn direction(&self) -> Vector {
        self.direction
    }

    /// The point at distance `t` along the ray.
    pub fn point_at(&self, t: f64) -> Point {
        if is_zero(t) {
            return self.origin;
        }

        // t is non-zero and direction is a unit vector.
        match self.direction.scale(t) {
            Ok(v) => self.origin.add(&v),
            Err(_) => self.origin,
        }
    }

    /// Picks the hit nearest to the ray origin.
    ///
    /// Ties are broken on the point coordinates and then on the shape address,
    /// so the choice does not depend on the order of `hits`.
    pub fn find_closest_hit<'a>(&self, hits: &[Hit<'a>]) -> Option<Hit<'a>> {
        hits.iter()
            .min_by(|a, b| self.compare_hits(a, b))
            .copied()
    }

    /// Picks the point nearest to the ray origin.
    pub fn find_closest_point(&self, points: &[Point]) -> Option<Point> {
        points.iter()
            .min_by(|a, b| self.compare_points(a, b))
            .copied()
    }

    fn compare_hits(&self, a: &Hit, b: &Hit) -> Ordering {
        self.compare_points(&a.point, &b.point).then_with(|| {
            let pa = a.shape as *const Shape as usize;
            let pb = b.shape as *const Shape as usize;
            pa.cmp(&pb)
        })
    }

    fn compare_points(&self, a: &Point, b: &Point) -> Ordering {
        let da = self.origin.distance_squared(a);
        let db = self.origin.distance_squared(b);

        da.partial_cmp(&db)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal))
            .then_with(|| a.y.partial_cmp(&b.y).unwrap_or(Ordering::Equal))
            .then_with(|| a.z.partial_cmp(&b.z).unwrap_or(Ordering::Equal))
    }
}

#[test]
fn ray_position() {
    let r = Ray::new(
        Point::new(2.0, 3.0, 4.0),
        Vector::new(2.0, 0.0, 0.0).unwrap(),
    );

    assert_eq!(r.point_at(0.0), Point::new(2.0, 3.0, 4.0));
    assert_eq!(r.point_at(1.0), Point::new(3.0, 3.0, 4.0));
    assert_eq!(r.point_at(-1.0), Point::new(1.0, 3.0, 4.0));
    assert_eq!(r.point_at(2.5), Point::new(4.5, 3.0, 4.0));
}

#[test]
fn ray_direction_is_normalized() {
    let r = Ray::new(Point::ORIGIN, Vector::new(0.0, 3.0, 4.0).unwrap());

    assert_eq!(r.direction(), Vector::new(0.0, 0.6, 0.8).unwrap());
    assert_eq!(r.point_at(5.0), Point::new(0.0, 3.0, 4.0));
}

#[test]
fn offset_ray_moves_along_normal() {
    let n = Vector::new(0.0, 0.0, 1.0).unwrap();
    let head = Point::new(1.0, 1.0, 0.0);

    let out = Ray::offset(head, Vector::new(1.0, 0.0, 1.0).unwrap(), &n);
    assert_eq!(out.origin(), Point::new(1.0, 1.0, DELTA));

    let inward = Ray::offset(head, Vector::new(1.0, 0.0, -1.0).unwrap(), &n);
    assert_eq!(inward.origin(), Point::new(1.0, 1.0, -DELTA));

    let tangent = Ray::offset(head, Vector::new(1.0, 0.0, 0.0).unwrap(), &n);
    assert_eq!(tangent.origin(), head);
}

#[test]
fn closest_point_is_order_independent() {
    let r = Ray::new(Point::ORIGIN, Vector::new(0.0, 0.0, 1.0).unwrap());
    // The first two are equally far from the origin.
    let points = vec![
        Point::new(0.0, 1.0, 0.0),
        Point::new(0.0, 0.0, 1.0),
        Point::new(0.0, 0.0, 3.0),
        Point::new(0.0, 0.0, 2.0),
    ];

    for shift in 0..points.len() {
        let mut rotated = points.clone();
        rotated.rotate_left(shift);
        assert_eq!(r.find_closest_point(&rotated), Some(Point::new(0.0, 0.0, 1.0)));

        rotated.reverse();
        assert_eq!(r.find_closest_point(&rotated), Some(Point::new(0.0, 0.0, 1.0)));
    }

    assert_eq!(r.find_closest_point(&[]), None);
}
