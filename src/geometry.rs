use crate::consts::FEQ_EPSILON;
use crate::error::{ Error, Result };
use crate::ray::Ray;
use crate::tuple::{ Point, Vector };
use crate::{ align_zero, is_zero };

/// The geometric capabilities every shape variant provides.
///
/// `intersect_points` returns the points where `ray` meets the surface at a
/// distance `t` with `0 < t <= max_distance`. Points behind the ray origin or
/// exactly at it are never returned. An empty vector means no hit.
pub trait Surface {
    fn normal_at(&self, point: &Point) -> Vector;
    fn intersect_points(&self, ray: &Ray, max_distance: f64) -> Vec<Point>;
}

/// Whether a hit at distance `t` is in front of the origin and within range.
fn in_range(t: f64, max_distance: f64) -> bool {
    align_zero(t) > 0.0 && align_zero(t - max_distance) <= 0.0
}

// Raw component arithmetic for quantities that may legitimately be zero
// (offsets from an axis, projections), where `Vector` would refuse to exist.
type Raw = [f64; 3];

fn raw(v: &Vector) -> Raw {
    [v.x(), v.y(), v.z()]
}

fn raw_between(to: &Point, from: &Point) -> Raw {
    [to.x - from.x, to.y - from.y, to.z - from.z]
}

fn raw_dot(a: &Raw, b: &Raw) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// The part of `a` orthogonal to the unit vector `axis`.
fn raw_reject(a: &Raw, axis: &Raw) -> Raw {
    let s = raw_dot(a, axis);
    [a[0] - s * axis[0], a[1] - s * axis[1], a[2] - s * axis[2]]
}

/// Some unit vector orthogonal to `v`.
fn any_orthogonal(v: &Vector) -> Vector {
    let helper = if v.x().abs() < 0.9 {
        [1.0, 0.0, 0.0]
    } else {
        [0.0, 1.0, 0.0]
    };
    let r = raw_reject(&helper, &raw(&v.normalize()));

    match Vector::new(r[0], r[1], r[2]) {
        Ok(n) => n.normalize(),
        Err(_) => v.normalize(),
    }
}

/// An infinite plane through `q0` with unit `normal`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Plane {
    q0: Point,
    normal: Vector,
}

impl Plane {
    pub fn new(q0: Point, normal: Vector) -> Plane {
        Plane { q0, normal: normal.normalize() }
    }

    /// Creates the plane through three points.
    ///
    /// The points must be distinct and must not lie on one line.
    pub fn from_points(p1: Point, p2: Point, p3: Point) -> Result<Plane> {
        if p1 == p2 || p2 == p3 || p3 == p1 {
            return Err(Error::DuplicatePoints);
        }

        let v1 = p1.subtract(&p2).map_err(|_| Error::DuplicatePoints)?;
        let v2 = p2.subtract(&p3).map_err(|_| Error::DuplicatePoints)?;
        let normal = v1.cross(&v2).map_err(|_| Error::CollinearPoints)?;

        Ok(Plane { q0: p1, normal: normal.normalize() })
    }

    pub fn q0(&self) -> Point {
        self.q0
    }

    pub fn normal(&self) -> Vector {
        self.normal
    }
}

impl Surface for Plane {
    fn normal_at(&self, _point: &Point) -> Vector {
        self.normal
    }

    fn intersect_points(&self, ray: &Ray, max_distance: f64) -> Vec<Point> {
        // A ray starting at the reference point is on the plane already.
        let u = match self.q0.subtract(&ray.origin()) {
            Ok(u) => u,
            Err(_) => return Vec::new(),
        };

        // Parallel to the plane.
        let nv = align_zero(self.normal.dot(&ray.direction()));
        if nv == 0.0 {
            return Vec::new();
        }

        let t = align_zero(self.normal.dot(&u) / nv);
        if !in_range(t, max_distance) {
            return Vec::new();
        }

        vec![ray.point_at(t)]
    }
}

/// A sphere with a center and a positive radius.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Sphere {
    center: Point,
    radius: f64,
}

impl Sphere {
    pub fn new(center: Point, radius: f64) -> Result<Sphere> {
        if !(radius > 0.0) {
            return Err(Error::InvalidRadius(radius));
        }

        Ok(Sphere { center, radius })
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl Surface for Sphere {
    /// Points on the surface never coincide with the center, so the fallback
    /// only covers callers passing the center itself.
    fn normal_at(&self, point: &Point) -> Vector {
        match point.subtract(&self.center) {
            Ok(v) => v.normalize(),
            Err(_) => Vector::Z,
        }
    }

    fn intersect_points(&self, ray: &Ray, max_distance: f64) -> Vec<Point> {
        let p0 = ray.origin();
        let dir = ray.direction();

        // Starting at the center, the ray leaves the sphere after one radius.
        let u = match self.center.subtract(&p0) {
            Ok(u) => u,
            Err(_) => {
                return if in_range(self.radius, max_distance) {
                    vec![ray.point_at(self.radius)]
                } else {
                    Vec::new()
                };
            }
        };

        let tm = dir.dot(&u);
        let d = (u.length_squared() - tm * tm).max(0.0).sqrt();

        // Missing the sphere or only touching it.
        if align_zero(d - self.radius) >= 0.0 {
            return Vec::new();
        }

        let th = (self.radius * self.radius - d * d).sqrt();
        let t1 = tm + th;
        let t2 = tm - th;

        [t1, t2].iter()
            .filter(|t| in_range(**t, max_distance))
            .map(|t| ray.point_at(*t))
            .collect()
    }
}

/// An infinite cylinder around an axis.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Tube {
    axis: Ray,
    radius: f64,
}

impl Tube {
    pub fn new(axis: Ray, radius: f64) -> Result<Tube> {
        if !(radius > 0.0) {
            return Err(Error::InvalidRadius(radius));
        }

        Ok(Tube { axis, radius })
    }

    pub fn axis(&self) -> Ray {
        self.axis
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Signed distance along the axis from the axis origin to the projection
    /// of `point`.
    fn axial_offset(&self, point: &Point) -> f64 {
        let op = raw_between(point, &self.axis.origin());
        raw_dot(&op, &raw(&self.axis.direction()))
    }

    /// Distances along `ray` where it crosses the infinite side surface.
    fn side_distances(&self, ray: &Ray) -> Vec<f64> {
        let v = raw(&self.axis.direction());
        let d = raw_reject(&raw(&ray.direction()), &v);
        let dp = raw_reject(&raw_between(&ray.origin(), &self.axis.origin()), &v);

        let a = raw_dot(&d, &d);

        // Parallel to the axis: either always inside or always outside.
        if is_zero(a) {
            return Vec::new();
        }

        let b = 2.0 * raw_dot(&d, &dp);
        let c = raw_dot(&dp, &dp) - self.radius * self.radius;
        let disc = align_zero(b * b - 4.0 * a * c);

        // No crossing, or tangent to the surface.
        if disc <= 0.0 {
            return Vec::new();
        }

        let root = disc.sqrt();
        vec![(-b + root) / (2.0 * a), (-b - root) / (2.0 * a)]
    }
}

impl Surface for Tube {
    fn normal_at(&self, point: &Point) -> Vector {
        let t = self.axial_offset(point);
        let on_axis = self.axis.point_at(t);

        match point.subtract(&on_axis) {
            Ok(n) => n.normalize(),
            Err(_) => any_orthogonal(&self.axis.direction()),
        }
    }

    fn intersect_points(&self, ray: &Ray, max_distance: f64) -> Vec<Point> {
        self.side_distances(ray).into_iter()
            .filter(|t| in_range(*t, max_distance))
            .map(|t| ray.point_at(t))
            .collect()
    }
}

/// A tube cut to `height` and closed with two flat caps.
///
/// The axis origin is the center of the bottom cap; the top cap sits `height`
/// further along the axis direction.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Cylinder {
    tube: Tube,
    height: f64,
}

impl Cylinder {
    pub fn new(axis: Ray, radius: f64, height: f64) -> Result<Cylinder> {
        if !(height > 0.0) {
            return Err(Error::InvalidHeight(height));
        }

        Ok(Cylinder { tube: Tube::new(axis, radius)?, height })
    }

    pub fn axis(&self) -> Ray {
        self.tube.axis
    }

    pub fn radius(&self) -> f64 {
        self.tube.radius
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    fn cap_centers(&self) -> [Point; 2] {
        let axis = self.tube.axis;
        [axis.origin(), axis.point_at(self.height)]
    }

    /// Distance along `ray` to the cap plane through `center`, if the ray
    /// crosses it strictly inside the cap disc.
    fn cap_distance(&self, ray: &Ray, center: &Point) -> Option<f64> {
        let v = self.tube.axis.direction();
        let denom = align_zero(v.dot(&ray.direction()));
        if denom == 0.0 {
            return None;
        }

        let to_center = raw_between(center, &ray.origin());
        let t = raw_dot(&raw(&v), &to_center) / denom;
        let hit = ray.point_at(t);

        let r2 = self.tube.radius * self.tube.radius;
        if align_zero(hit.distance_squared(center) - r2) < 0.0 {
            Some(t)
        } else {
            None
        }
    }
}

impl Surface for Cylinder {
    fn normal_at(&self, point: &Point) -> Vector {
        let v = self.tube.axis.direction();
        let s = self.tube.axial_offset(point);

        if s.abs() < FEQ_EPSILON {
            -v
        } else if (s - self.height).abs() < FEQ_EPSILON {
            v
        } else {
            self.tube.normal_at(point)
        }
    }

    fn intersect_points(&self, ray: &Ray, max_distance: f64) -> Vec<Point> {
        let mut distances: Vec<f64> = self.tube.side_distances(ray)
            .into_iter()
            .filter(|t| {
                let s = align_zero(self.tube.axial_offset(&ray.point_at(*t)));
                s > 0.0 && align_zero(s - self.height) < 0.0
            })
            .collect();

        for center in self.cap_centers().iter() {
            if let Some(t) = self.cap_distance(ray, center) {
                distances.push(t);
            }
        }

        distances.into_iter()
            .filter(|t| in_range(*t, max_distance))
            .map(|t| ray.point_at(t))
            .collect()
    }
}

/// A convex, planar polygon with vertices in consistent winding order.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    vertices: Vec<Point>,
    plane: Plane,
}

impl Polygon {
    /// Creates a polygon, validating the vertex list.
    ///
    /// Fails when there are fewer than three vertices, when consecutive
    /// vertices coincide, when a vertex leaves the plane of the first three,
    /// or when the polygon is concave or its vertices are out of order.
    pub fn new(vertices: Vec<Point>) -> Result<Polygon> {
        if vertices.len() < 3 {
            return Err(Error::TooFewVertices(vertices.len()));
        }

        let plane = Plane::from_points(vertices[0], vertices[1], vertices[2])?;
        if vertices.len() == 3 {
            return Ok(Polygon { vertices, plane });
        }

        let n = plane.normal();
        let last = vertices.len() - 1;

        for v in vertices.iter().skip(3) {
            let offset = v.subtract(&vertices[0])
                .map_err(|_| Error::DuplicatePoints)?;
            if !is_zero(offset.dot(&n)) {
                return Err(Error::NonCoplanar);
            }
        }

        let edge = |to: usize, from: usize| {
            vertices[to].subtract(&vertices[from])
                .map_err(|_| Error::DuplicatePoints)
        };

        // The turn between the last and the first edge fixes the winding;
        // every other turn has to agree with it.
        let mut edge1 = edge(last, last - 1)?;
        let mut edge2 = edge(0, last)?;
        let turn = |e1: &Vector, e2: &Vector| -> Result<bool> {
            let cross = e1.cross(e2).map_err(|_| Error::NonConvex)?;
            Ok(cross.dot(&n) > 0.0)
        };

        let positive = turn(&edge1, &edge2)?;
        for i in 1..vertices.len() {
            edge1 = edge2;
            edge2 = edge(i, i - 1)?;
            if turn(&edge1, &edge2)? != positive {
                return Err(Error::NonConvex);
            }
        }

        Ok(Polygon { vertices, plane })
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    pub fn plane(&self) -> &Plane {
        &self.plane
    }

    /// Whether the ray passes strictly inside every edge.
    ///
    /// Each edge spans a triangle with the ray origin; the ray is inside when
    /// it lies on the same side of all of them. Touching an edge or a vertex
    /// counts as outside.
    fn crosses_inside(&self, ray: &Ray) -> bool {
        let p0 = ray.origin();
        let v = ray.direction();
        let count = self.vertices.len();

        let mut sign = 0.0;
        for i in 0..count {
            let vi = match self.vertices[i].subtract(&p0) {
                Ok(vi) => vi,
                Err(_) => return false,
            };
            let vj = match self.vertices[(i + 1) % count].subtract(&p0) {
                Ok(vj) => vj,
                Err(_) => return false,
            };
            let ni = match vi.cross(&vj) {
                Ok(ni) => ni,
                Err(_) => return false,
            };

            let s = align_zero(v.dot(&ni));
            if s == 0.0 || s * sign < 0.0 {
                return false;
            }
            sign = s;
        }

        true
    }
}

impl Surface for Polygon {
    fn normal_at(&self, _point: &Point) -> Vector {
        self.plane.normal()
    }

    fn intersect_points(&self, ray: &Ray, max_distance: f64) -> Vec<Point> {
        if !self.crosses_inside(ray) {
            return Vec::new();
        }

        self.plane.intersect_points(ray, max_distance)
    }
}

/* Tests */

#[cfg(test)]
fn vector(x: f64, y: f64, z: f64) -> Vector {
    Vector::new(x, y, z).unwrap()
}

#[test]
fn plane_normal_from_points() {
    let p1 = Point::new(1.0, 0.0, 0.0);
    let p2 = Point::new(0.0, 1.0, 0.0);
    let p3 = Point::new(0.0, 0.0, 0.0);
    let plane = Plane::from_points(p1, p2, p3).unwrap();
    let n = plane.normal_at(&Point::new(1.0, 1.0, 0.0));

    assert!((n.length() - 1.0).abs() < 1e-8);
    assert!(is_zero(n.dot(&p1.subtract(&p2).unwrap())));
    assert!(is_zero(n.dot(&p2.subtract(&p3).unwrap())));
    assert!(is_zero(n.dot(&p3.subtract(&p1).unwrap())));
}

#[test]
fn degenerate_planes_are_rejected() {
    assert!(matches!(
        Plane::from_points(Point::new(1.0, 1.0, 0.0), Point::new(1.0, 1.0, 0.0),
            Point::ORIGIN),
        Err(Error::DuplicatePoints)
    ));
    assert!(matches!(
        Plane::from_points(Point::new(1.0, 0.0, 0.0), Point::new(2.0, 0.0, 0.0),
            Point::new(5.0, 0.0, 0.0)),
        Err(Error::CollinearPoints)
    ));
}

#[test]
fn ray_intersecting_plane() {
    let plane = Plane::new(Point::new(-2.0, 0.0, 0.0), vector(0.0, 0.0, 2.0));
    let p1 = Point::new(-1.0, 0.0, -2.0);
    let p2 = Point::new(-1.0, 0.0, 0.0);
    let far = f64::INFINITY;

    let hit = plane.intersect_points(&Ray::new(p1, vector(0.0, 9.0, 8.0)), far);
    assert_eq!(hit, vec![Point::new(-1.0, 2.25, 0.0)]);

    // Pointing away from the plane.
    let r = Ray::new(Point::new(-1.0, 0.0, 2.0), vector(0.0, 9.0, 4.0));
    assert!(plane.intersect_points(&r, far).is_empty());

    // Parallel, inside the plane and above it.
    let r = Ray::new(p2, vector(3.0, 0.0, 0.0));
    assert!(plane.intersect_points(&r, far).is_empty());
    let r = Ray::new(Point::new(-1.0, 0.0, 1.0), vector(3.0, 0.0, 0.0));
    assert!(plane.intersect_points(&r, far).is_empty());

    // Orthogonal, starting before, at and after the plane.
    let hit = plane.intersect_points(&Ray::new(p1, vector(0.0, 0.0, 4.0)), far);
    assert_eq!(hit, vec![p2]);
    assert!(plane.intersect_points(&Ray::new(p2, vector(0.0, 0.0, 2.0)), far)
        .is_empty());
    assert!(plane.intersect_points(
        &Ray::new(Point::new(-1.0, 0.0, 1.0), vector(0.0, 0.0, 1.0)), far)
        .is_empty());

    // Starting on the plane, and at its reference point.
    assert!(plane.intersect_points(&Ray::new(p2, vector(0.0, 5.0, 2.0)), far)
        .is_empty());
    assert!(plane.intersect_points(
        &Ray::new(plane.q0(), vector(0.0, 5.0, 2.0)), far).is_empty());
}

#[test]
fn plane_hit_beyond_max_distance_is_dropped() {
    let plane = Plane::new(Point::new(0.0, 0.0, 5.0), vector(0.0, 0.0, 1.0));
    let r = Ray::new(Point::ORIGIN, vector(0.0, 0.0, 1.0));

    assert_eq!(plane.intersect_points(&r, 5.0).len(), 1);
    assert!(plane.intersect_points(&r, 4.9).is_empty());
}

#[test]
fn normal_on_sphere() {
    let s = Sphere::new(Point::new(1.0, 0.0, 0.0), 1.0).unwrap();
    let p = Point::new(1.0, 0.0, 1.0);

    assert_eq!(s.normal_at(&p), vector(0.0, 0.0, 1.0));

    let k = 3f64.sqrt() / 3.0;
    let p = Point::new(1.0 + k, k, k);
    let n = s.normal_at(&p);
    assert_eq!(n, vector(k, k, k));
    assert!((n.length() - 1.0).abs() < 1e-12);
}

#[test]
fn ray_crosses_sphere_twice() {
    let s = Sphere::new(Point::new(1.0, 0.0, 0.0), 1.0).unwrap();
    let r = Ray::new(Point::new(-1.0, 0.0, 0.0), vector(3.0, 1.0, 0.0));
    let hits = s.intersect_points(&r, f64::INFINITY);

    assert_eq!(hits.len(), 2);
    let near = Point::new(0.0651530771650466, 0.355051025721682, 0.0);
    let far = Point::new(1.53484692283495, 0.844948974278318, 0.0);
    assert!(hits.contains(&near));
    assert!(hits.contains(&far));
}

#[test]
fn ray_misses_or_touches_sphere() {
    let s = Sphere::new(Point::new(1.0, 0.0, 0.0), 1.0).unwrap();
    let far = f64::INFINITY;

    let r = Ray::new(Point::new(-1.0, 0.0, 0.0), vector(1.0, 1.0, 0.0));
    assert!(s.intersect_points(&r, far).is_empty());

    // Tangent at (0, 0, 0).
    let r = Ray::new(Point::new(0.0, -1.0, 0.0), vector(0.0, 1.0, 0.0));
    assert!(s.intersect_points(&r, far).is_empty());

    // Sphere behind the ray.
    let r = Ray::new(Point::new(3.0, 0.0, 0.0), vector(1.0, 0.0, 0.0));
    assert!(s.intersect_points(&r, far).is_empty());
}

#[test]
fn ray_starts_inside_sphere() {
    let s = Sphere::new(Point::new(1.0, 0.0, 0.0), 1.0).unwrap();
    let far = f64::INFINITY;

    let r = Ray::new(Point::new(0.5, 0.5, 0.0), vector(3.0, 1.0, 0.0));
    assert_eq!(s.intersect_points(&r, far).len(), 1);

    let r = Ray::new(Point::new(1.0, 0.0, 0.0), vector(0.0, 1.0, 0.0));
    assert_eq!(s.intersect_points(&r, far), vec![Point::new(1.0, 1.0, 0.0)]);
}

#[test]
fn invalid_radius_is_rejected() {
    assert!(matches!(Sphere::new(Point::ORIGIN, 0.0), Err(Error::InvalidRadius(_))));
    let axis = Ray::new(Point::ORIGIN, vector(0.0, 1.0, 0.0));
    assert!(Tube::new(axis, -1.0).is_err());
    assert!(matches!(Cylinder::new(axis, 1.0, 0.0), Err(Error::InvalidHeight(_))));
}

#[test]
fn normal_on_tube() {
    let tube = Tube::new(Ray::new(Point::ORIGIN, vector(0.0, 0.0, 1.0)), 1.0)
        .unwrap();

    assert_eq!(tube.normal_at(&Point::new(0.0, 1.0, 2.0)), vector(0.0, 1.0, 0.0));
    assert_eq!(tube.normal_at(&Point::new(1.0, 0.0, 0.0)), vector(1.0, 0.0, 0.0));
}

#[test]
fn ray_crosses_tube() {
    let tube = Tube::new(Ray::new(Point::ORIGIN, vector(0.0, 1.0, 0.0)), 1.0)
        .unwrap();
    let far = f64::INFINITY;

    let r = Ray::new(Point::new(-5.0, 3.0, 0.0), vector(1.0, 0.0, 0.0));
    let hits = tube.intersect_points(&r, far);
    assert_eq!(hits.len(), 2);
    assert!(hits.contains(&Point::new(-1.0, 3.0, 0.0)));
    assert!(hits.contains(&Point::new(1.0, 3.0, 0.0)));

    // Parallel to the axis.
    let r = Ray::new(Point::new(0.5, 0.0, 0.0), vector(0.0, 1.0, 0.0));
    assert!(tube.intersect_points(&r, far).is_empty());

    // Tangent.
    let r = Ray::new(Point::new(-5.0, 0.0, 1.0), vector(1.0, 0.0, 0.0));
    assert!(tube.intersect_points(&r, far).is_empty());

    // From inside only the exit counts.
    let r = Ray::new(Point::ORIGIN, vector(1.0, 0.0, 0.0));
    assert_eq!(tube.intersect_points(&r, far), vec![Point::new(1.0, 0.0, 0.0)]);
}

#[test]
fn ray_crosses_cylinder_side_and_caps() {
    let axis = Ray::new(Point::ORIGIN, vector(0.0, 1.0, 0.0));
    let cylinder = Cylinder::new(axis, 1.0, 2.0).unwrap();
    let far = f64::INFINITY;

    // Through both sides, between the caps.
    let r = Ray::new(Point::new(-5.0, 1.0, 0.0), vector(1.0, 0.0, 0.0));
    assert_eq!(cylinder.intersect_points(&r, far).len(), 2);

    // Above the top cap.
    let r = Ray::new(Point::new(-5.0, 3.0, 0.0), vector(1.0, 0.0, 0.0));
    assert!(cylinder.intersect_points(&r, far).is_empty());

    // Straight down the axis through both caps.
    let r = Ray::new(Point::new(0.0, 5.0, 0.0), vector(0.0, -1.0, 0.0));
    let hits = cylinder.intersect_points(&r, far);
    assert_eq!(hits.len(), 2);
    assert!(hits.contains(&Point::new(0.0, 2.0, 0.0)));
    assert!(hits.contains(&Point::ORIGIN));

    // In through the top cap, out through the side.
    let r = Ray::new(Point::new(0.0, 3.0, 0.0), vector(0.5, -1.0, 0.0));
    let hits = cylinder.intersect_points(&r, far);
    assert_eq!(hits.len(), 2);
    assert!(hits.contains(&Point::new(0.5, 2.0, 0.0)));
    assert!(hits.contains(&Point::new(1.0, 1.0, 0.0)));

    // Grazing the rim of the top cap.
    let r = Ray::new(Point::new(0.0, 3.0, 0.0), vector(1.0, -1.0, 0.0));
    assert!(cylinder.intersect_points(&r, far).is_empty());
}

#[test]
fn normal_on_cylinder() {
    let axis = Ray::new(Point::ORIGIN, vector(0.0, 1.0, 0.0));
    let cylinder = Cylinder::new(axis, 1.0, 2.0).unwrap();

    assert_eq!(cylinder.normal_at(&Point::new(0.5, 0.0, 0.0)), vector(0.0, -1.0, 0.0));
    assert_eq!(cylinder.normal_at(&Point::new(0.0, 2.0, 0.5)), vector(0.0, 1.0, 0.0));
    assert_eq!(cylinder.normal_at(&Point::new(0.0, 1.0, 1.0)), vector(0.0, 0.0, 1.0));
}

#[cfg(test)]
fn quad() -> Vec<Point> {
    vec![
        Point::new(0.0, 0.0, 1.0),
        Point::new(1.0, 0.0, 0.0),
        Point::new(0.0, 1.0, 0.0),
        Point::new(-1.0, 1.0, 1.0),
    ]
}

#[test]
fn constructing_polygons() {
    assert!(Polygon::new(quad()).is_ok());

    // Wrong vertex order.
    assert!(matches!(
        Polygon::new(vec![
            Point::new(0.0, 0.0, 1.0), Point::new(0.0, 1.0, 0.0),
            Point::new(1.0, 0.0, 0.0), Point::new(-1.0, 1.0, 1.0),
        ]),
        Err(Error::NonConvex)
    ));

    // Out of plane.
    assert!(matches!(
        Polygon::new(vec![
            Point::new(0.0, 0.0, 1.0), Point::new(1.0, 0.0, 0.0),
            Point::new(0.0, 1.0, 0.0), Point::new(0.0, 2.0, 2.0),
        ]),
        Err(Error::NonCoplanar)
    ));

    // Vertex lying on a side.
    assert!(Polygon::new(vec![
        Point::new(0.0, 0.0, 1.0), Point::new(1.0, 0.0, 0.0),
        Point::new(0.0, 1.0, 0.0), Point::new(0.0, 0.5, 0.5),
    ]).is_err());

    // Last point equals the first, and co-located points.
    assert!(Polygon::new(vec![
        Point::new(0.0, 0.0, 1.0), Point::new(1.0, 0.0, 0.0),
        Point::new(0.0, 1.0, 0.0), Point::new(0.0, 0.0, 1.0),
    ]).is_err());
    assert!(Polygon::new(vec![
        Point::new(0.0, 0.0, 1.0), Point::new(1.0, 0.0, 0.0),
        Point::new(0.0, 1.0, 0.0), Point::new(0.0, 1.0, 0.0),
    ]).is_err());

    assert!(matches!(
        Polygon::new(vec![Point::ORIGIN, Point::new(1.0, 0.0, 0.0)]),
        Err(Error::TooFewVertices(2))
    ));
}

#[test]
fn polygon_normal_is_orthogonal_to_edges() {
    let pts = quad();
    let polygon = Polygon::new(pts.clone()).unwrap();
    let n = polygon.normal_at(&pts[0]);

    assert!((n.length() - 1.0).abs() < 1e-8);
    for i in 0..3 {
        let prev = if i == 0 { 3 } else { i - 1 };
        assert!(is_zero(n.dot(&pts[i].subtract(&pts[prev]).unwrap())));
    }
}

#[test]
fn ray_crossing_polygon() {
    let polygon = Polygon::new(vec![
        Point::new(-1.0, 1.0, 0.0), Point::new(1.0, 3.0, 0.0),
        Point::new(3.0, 2.0, 0.0), Point::new(-1.0, -1.0, 0.0),
    ]).unwrap();
    let p0 = Point::new(0.0, 0.0, -4.0);
    let far = f64::INFINITY;

    let hits = polygon.intersect_points(&Ray::new(p0, vector(0.0, 1.0, 4.0)), far);
    assert_eq!(hits, vec![Point::new(0.0, 1.0, 0.0)]);

    // Outside, and outside between the continuations of two sides.
    assert!(polygon.intersect_points(&Ray::new(p0, vector(0.0, 3.0, 4.0)), far)
        .is_empty());
    assert!(polygon.intersect_points(&Ray::new(p0, vector(1.0, 3.5, 4.0)), far)
        .is_empty());

    // Through a vertex, an edge, and the continuation of an edge.
    assert!(polygon.intersect_points(&Ray::new(p0, vector(1.0, 3.0, 4.0)), far)
        .is_empty());
    assert!(polygon.intersect_points(&Ray::new(p0, vector(0.0, 2.0, 4.0)), far)
        .is_empty());
    assert!(polygon.intersect_points(&Ray::new(p0, vector(5.0, 1.0, 4.0)), far)
        .is_empty());
}

#[test]
fn polygon_hit_beyond_max_distance_is_dropped() {
    let polygon = Polygon::new(quad()).unwrap();
    let r = Ray::new(Point::new(0.0, 0.0, 110.0), vector(0.0, 1.0, -111.0));

    assert!(polygon.intersect_points(&r, 100.0).is_empty());
}
