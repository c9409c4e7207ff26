use log::{ debug, info };

use crate::canvas::ImageWriter;
use crate::color::Color;
use crate::consts::DEFAULT_PRINT_INTERVAL;
use crate::error::{ Error, Result };
use crate::is_zero;
use crate::parallel;
use crate::ray::Ray;
use crate::scene::CameraJson;
use crate::tracer::RayTracer;
use crate::tuple::{ Point, Vector };

/// Collects camera parameters and builds a `Camera`.
///
/// Position, orientation, view plane size and view plane distance are
/// required. The image writer and ray tracer may be given later, but a camera
/// without them cannot render.
#[derive(Debug)]
pub struct CameraBuilder {
    location: Option<Point>,
    orientation: Option<(Vector, Vector)>,
    vp_size: Option<(f64, f64)>,
    vp_distance: Option<f64>,

    image_writer: Option<ImageWriter>,
    ray_tracer: Option<Box<dyn RayTracer>>,

    supersampling: usize,
    adaptive: bool,
    threads: usize,
    print_interval: f64,
}

impl Default for CameraBuilder {
    fn default() -> CameraBuilder {
        CameraBuilder {
            location: None,
            orientation: None,
            vp_size: None,
            vp_distance: None,
            image_writer: None,
            ray_tracer: None,
            supersampling: 1,
            adaptive: false,
            threads: 0,
            print_interval: DEFAULT_PRINT_INTERVAL,
        }
    }
}

impl CameraBuilder {
    pub fn new() -> CameraBuilder {
        Default::default()
    }

    /// Starts a builder from the camera block of a scene file.
    pub fn from_json(json: &CameraJson) -> Result<CameraBuilder> {
        let vector = |v: [f64; 3]| Vector::new(v[0], v[1], v[2]);

        Ok(CameraBuilder::new()
            .location(json.position.into())
            .direction(vector(json.to)?, vector(json.up)?)?
            .vp_size(json.vp_width, json.vp_height)
            .vp_distance(json.vp_distance)?
            .supersampling(json.supersampling)
            .adaptive(json.adaptive)
            .threads(json.threads))
    }

    pub fn location(mut self, location: Point) -> CameraBuilder {
        self.location = Some(location);
        self
    }

    /// Sets the forward and up directions, which have to be orthogonal.
    pub fn direction(mut self, to: Vector, up: Vector) -> Result<CameraBuilder> {
        if !is_zero(to.dot(&up)) {
            return Err(Error::NotOrthogonal);
        }

        self.orientation = Some((to.normalize(), up.normalize()));
        Ok(self)
    }

    pub fn vp_size(mut self, width: f64, height: f64) -> CameraBuilder {
        self.vp_size = Some((width, height));
        self
    }

    pub fn vp_distance(mut self, distance: f64) -> Result<CameraBuilder> {
        if is_zero(distance) {
            return Err(Error::ZeroDistance);
        }

        self.vp_distance = Some(distance);
        Ok(self)
    }

    pub fn image_writer(mut self, image_writer: ImageWriter) -> CameraBuilder {
        self.image_writer = Some(image_writer);
        self
    }

    pub fn ray_tracer<T: RayTracer + 'static>(mut self, ray_tracer: T) -> CameraBuilder {
        self.ray_tracer = Some(Box::new(ray_tracer));
        self
    }

    /// Rays per pixel side. 0 and 1 both mean one ray per pixel.
    pub fn supersampling(mut self, n: usize) -> CameraBuilder {
        self.supersampling = n;
        self
    }

    pub fn adaptive(mut self, adaptive: bool) -> CameraBuilder {
        self.adaptive = adaptive;
        self
    }

    /// Worker threads. 0 renders on the calling thread.
    pub fn threads(mut self, threads: usize) -> CameraBuilder {
        self.threads = threads;
        self
    }

    /// Seconds between progress reports. 0 disables them.
    pub fn print_interval(mut self, seconds: f64) -> CameraBuilder {
        self.print_interval = seconds;
        self
    }

    pub fn build(self) -> Result<Camera> {
        let p0 = self.location.ok_or(Error::MissingResource("camera location"))?;
        let (to, up) = self.orientation
            .ok_or(Error::MissingResource("camera orientation"))?;
        let (width, height) = self.vp_size
            .ok_or(Error::MissingResource("view plane size"))?;
        let distance = self.vp_distance
            .ok_or(Error::MissingResource("view plane distance"))?;

        if is_zero(width) || is_zero(height) {
            return Err(Error::MissingResource("view plane size"));
        }

        // Orthogonal unit vectors, so the cross product is a unit vector too.
        let right = to.cross(&up)?.normalize();

        Ok(Camera {
            p0,
            to,
            up,
            right,
            width,
            height,
            distance,
            image_writer: self.image_writer,
            ray_tracer: self.ray_tracer,
            supersampling: self.supersampling,
            adaptive: self.adaptive,
            threads: self.threads,
            print_interval: self.print_interval,
        })
    }
}

/// A pinhole camera looking at a view plane.
///
/// The view plane is centered `distance` in front of the camera along `to`,
/// spans `width` along `right` and `height` along `up`, and is divided into
/// the pixels of the image writer.
#[derive(Debug)]
pub struct Camera {
    p0: Point,
    to: Vector,
    up: Vector,
    right: Vector,

    width: f64,
    height: f64,
    distance: f64,

    image_writer: Option<ImageWriter>,
    ray_tracer: Option<Box<dyn RayTracer>>,

    supersampling: usize,
    adaptive: bool,
    threads: usize,
    print_interval: f64,
}

impl Camera {
    pub fn builder() -> CameraBuilder {
        CameraBuilder::new()
    }

    pub fn location(&self) -> Point {
        self.p0
    }

    pub fn image_writer(&self) -> Option<&ImageWriter> {
        self.image_writer.as_ref()
    }

    /// Moves `point` by `x` along the right vector and `y` along the up
    /// vector.
    fn shift(&self, point: Point, x: f64, y: f64) -> Point {
        let mut p = point;
        if let Ok(v) = self.right.scale(x) {
            p = p.add(&v);
        }
        if let Ok(v) = self.up.scale(y) {
            p = p.add(&v);
        }
        p
    }

    /// The center of pixel `(j, i)` on the view plane, for an `nx` by `ny`
    /// image. Columns run right and rows run down.
    pub fn pixel_center(&self, nx: usize, ny: usize, j: usize, i: usize) -> Point {
        let pc = self.p0.add(&self.to.scale(self.distance).unwrap_or(self.to));

        let rx = self.width / nx as f64;
        let ry = self.height / ny as f64;
        let xj = (j as f64 - (nx as f64 - 1.0) / 2.0) * rx;
        let yi = -(i as f64 - (ny as f64 - 1.0) / 2.0) * ry;

        self.shift(pc, xj, yi)
    }

    /// A ray from the camera through `point`.
    pub fn construct_ray_through(&self, point: &Point) -> Ray {
        match point.subtract(&self.p0) {
            Ok(dir) => Ray::new(self.p0, dir),
            Err(_) => Ray::new(self.p0, self.to),
        }
    }

    /// A ray from the camera through the center of pixel `(j, i)`.
    pub fn construct_ray(&self, nx: usize, ny: usize, j: usize, i: usize) -> Ray {
        self.construct_ray_through(&self.pixel_center(nx, ny, j, i))
    }

    /// Renders every pixel into the image writer.
    ///
    /// Fails before any pixel is traced when the image writer or the ray
    /// tracer is missing.
    pub fn render_image(&mut self) -> Result<&mut Self> {
        let (nx, ny) = match self.image_writer {
            Some(ref writer) => (writer.nx(), writer.ny()),
            None => return Err(Error::MissingResource("image writer")),
        };
        let tracer = match self.ray_tracer {
            Some(ref tracer) => tracer.as_ref(),
            None => return Err(Error::MissingResource("ray tracer")),
        };

        info!("rendering {}x{} pixels, supersampling {}{}, {} threads",
            nx, ny, self.supersampling,
            if self.adaptive { " (adaptive)" } else { "" },
            self.threads);

        let camera: &Camera = self;
        let pixels = parallel::render_pixels(nx, ny, self.threads, self.print_interval,
            |j, i| camera.cast_pixel(tracer, nx, ny, j, i));

        if let Some(ref mut writer) = self.image_writer {
            for (j, i, color) in pixels {
                writer.write_pixel(j, i, &color);
            }
        }

        Ok(self)
    }

    fn cast_pixel(&self, tracer: &dyn RayTracer, nx: usize, ny: usize, j: usize, i: usize)
        -> Color
    {
        let n = self.supersampling;
        if n <= 1 {
            return tracer.trace_ray(&self.construct_ray(nx, ny, j, i));
        }

        let center = self.pixel_center(nx, ny, j, i);
        let rx = self.width / nx as f64;
        let ry = self.height / ny as f64;

        if self.adaptive {
            let depth = (n as f64).log2().ceil() as usize;
            self.adaptive_sample(tracer, center, rx / 2.0, ry / 2.0, depth)
        } else {
            self.beam_sample(tracer, center, rx, ry, n)
        }
    }

    /// Averages an `n` by `n` grid of rays spread evenly over the pixel.
    fn beam_sample(&self, tracer: &dyn RayTracer, center: Point, rx: f64, ry: f64, n: usize)
        -> Color
    {
        let sx = rx / n as f64;
        let sy = ry / n as f64;
        let half = (n as f64 - 1.0) / 2.0;

        let mut colors = Vec::with_capacity(n * n);
        for row in 0..n {
            for col in 0..n {
                let x = (col as f64 - half) * sx;
                let y = -(row as f64 - half) * sy;
                let ray = self.construct_ray_through(&self.shift(center, x, y));
                colors.push(tracer.trace_ray(&ray));
            }
        }

        Color::average(&colors)
    }

    /// Samples the four corners of a rectangle around `center`. When they
    /// disagree and `depth` allows, each quadrant is sampled the same way.
    fn adaptive_sample(&self, tracer: &dyn RayTracer, center: Point, hw: f64, hh: f64,
        depth: usize) -> Color
    {
        let corners = [(-hw, hh), (hw, hh), (-hw, -hh), (hw, -hh)];
        let colors: Vec<Color> = corners.iter()
            .map(|(x, y)| {
                let ray = self.construct_ray_through(&self.shift(center, *x, *y));
                tracer.trace_ray(&ray)
            })
            .collect();

        if depth == 0 || colors.iter().all(|c| *c == colors[0]) {
            return Color::average(&colors);
        }

        let quadrants: Vec<Color> = corners.iter()
            .map(|(x, y)| {
                let quadrant = self.shift(center, x / 2.0, y / 2.0);
                self.adaptive_sample(tracer, quadrant, hw / 2.0, hh / 2.0, depth - 1)
            })
            .collect();

        Color::average(&quadrants)
    }

    /// Draws grid lines every `interval` pixels over the image.
    pub fn print_grid(&mut self, interval: usize, color: Color) -> Result<&mut Self> {
        let writer = self.image_writer.as_mut()
            .ok_or(Error::MissingResource("image writer"))?;
        let (nx, ny) = (writer.nx(), writer.ny());
        let step = interval.max(1);

        for row in (0..ny).step_by(step) {
            for col in 0..nx {
                writer.write_pixel(col, row, &color);
            }
        }
        for col in (0..nx).step_by(step) {
            for row in 0..ny {
                writer.write_pixel(col, row, &color);
            }
        }

        debug!("grid every {} pixels", step);
        Ok(self)
    }

    pub fn write_to_image(&self) -> Result<()> {
        self.image_writer.as_ref()
            .ok_or(Error::MissingResource("image writer"))?
            .write_to_image()
    }
}

/* Tests */

#[cfg(test)]
use crate::{
    intersect::Intersectable,
    shape::Shape,
};

#[cfg(test)]
fn camera_at(location: Point, vp: f64) -> Camera {
    Camera::builder()
        .location(location)
        .direction(-Vector::Z, Vector::Y).unwrap()
        .vp_size(vp, vp)
        .vp_distance(1.0).unwrap()
        .build()
        .unwrap()
}

#[cfg(test)]
fn count_hits(camera: &Camera, shape: &Shape) -> usize {
    let mut count = 0;
    for i in 0..3 {
        for j in 0..3 {
            let ray = camera.construct_ray(3, 3, j, i);
            count += shape.find_points(&ray).map_or(0, |p| p.len());
        }
    }
    count
}

/// Returns white for rays heading right of the forward axis, black otherwise.
#[cfg(test)]
#[derive(Debug)]
struct SplitTracer;

#[cfg(test)]
impl RayTracer for SplitTracer {
    fn trace_ray(&self, ray: &Ray) -> Color {
        if ray.direction().x() > 1e-9 { Color::white() } else { Color::black() }
    }
}

#[cfg(test)]
#[derive(Debug)]
struct FlatTracer(Color);

#[cfg(test)]
impl RayTracer for FlatTracer {
    fn trace_ray(&self, _ray: &Ray) -> Color {
        self.0
    }
}

#[test]
fn ray_through_view_plane_center() {
    let camera = camera_at(Point::ORIGIN, 3.0);
    let ray = camera.construct_ray(3, 3, 1, 1);

    assert_eq!(ray.origin(), Point::ORIGIN);
    assert_eq!(ray.direction(), -Vector::Z);
    assert_eq!(ray.point_at(1.0), Point::new(0.0, 0.0, -1.0));
}

#[test]
fn rays_through_pixels() {
    let camera = camera_at(Point::ORIGIN, 8.0);

    // 4x4 grid, corner pixel.
    let ray = camera.construct_ray(4, 4, 0, 0);
    assert_eq!(ray.direction(), Vector::new(-3.0, 3.0, -1.0).unwrap().normalize());

    // 3x3 grid, side pixel.
    let camera = camera_at(Point::ORIGIN, 6.0);
    let ray = camera.construct_ray(3, 3, 1, 0);
    assert_eq!(ray.direction(), Vector::new(0.0, 2.0, -1.0).unwrap().normalize());
}

#[test]
fn camera_sphere_hits() {
    let cam0 = camera_at(Point::ORIGIN, 3.0);
    let cam5 = camera_at(Point::new(0.0, 0.0, 0.5), 3.0);
    let sphere = |x: f64, y: f64, z: f64, r: f64| Shape::sphere(Point::new(x, y, z), r).unwrap();

    assert_eq!(count_hits(&cam0, &sphere(0.0, 0.0, -3.0, 1.0)), 2);
    assert_eq!(count_hits(&cam5, &sphere(0.0, 0.0, -2.5, 2.5)), 18);
    assert_eq!(count_hits(&cam5, &sphere(0.0, 0.0, -2.0, 2.0)), 10);
    assert_eq!(count_hits(&cam5, &sphere(0.0, 0.0, 0.0, 4.0)), 9);
    assert_eq!(count_hits(&cam0, &sphere(0.0, 0.0, 1.0, 0.5)), 0);
}

#[test]
fn camera_plane_hits() {
    let cam = camera_at(Point::ORIGIN, 9.0);
    let plane = |nx: f64, ny: f64, nz: f64| {
        Shape::plane(Point::new(0.0, 0.0, -5.0), Vector::new(nx, ny, nz).unwrap())
    };

    assert_eq!(count_hits(&cam, &plane(0.0, 0.0, 1.0)), 9);
    assert_eq!(count_hits(&cam, &plane(0.0, 1.0, 7.0)), 9);
    assert_eq!(count_hits(&cam, &plane(0.0, 1.0, 1.0)), 6);
}

#[test]
fn camera_triangle_hits() {
    let cam = camera_at(Point::ORIGIN, 3.0);
    let triangle = |top: f64| Shape::triangle(
        Point::new(0.0, top, -2.0),
        Point::new(1.0, -1.0, -2.0),
        Point::new(-1.0, -1.0, -2.0),
    ).unwrap();

    assert_eq!(count_hits(&cam, &triangle(1.0)), 1);
    assert_eq!(count_hits(&cam, &triangle(20.0)), 2);
}

#[test]
fn invalid_camera_configuration() {
    assert!(matches!(
        Camera::builder().direction(Vector::new(0.0, 1.0, -1.0).unwrap(), Vector::Y),
        Err(Error::NotOrthogonal)
    ));
    assert!(matches!(Camera::builder().vp_distance(0.0), Err(Error::ZeroDistance)));
    assert!(matches!(
        Camera::builder().location(Point::ORIGIN).vp_size(1.0, 1.0).build(),
        Err(Error::MissingResource(_))
    ));
}

#[test]
fn render_requires_writer_and_tracer() {
    let mut camera = camera_at(Point::ORIGIN, 3.0);
    assert!(matches!(camera.render_image(), Err(Error::MissingResource("image writer"))));
    assert!(matches!(camera.write_to_image(), Err(Error::MissingResource(_))));

    let mut camera = Camera::builder()
        .location(Point::ORIGIN)
        .direction(-Vector::Z, Vector::Y).unwrap()
        .vp_size(3.0, 3.0)
        .vp_distance(1.0).unwrap()
        .image_writer(ImageWriter::new("unused.ppm", 3, 3))
        .build()
        .unwrap();
    assert!(matches!(camera.render_image(), Err(Error::MissingResource("ray tracer"))));
}

#[cfg(test)]
fn split_camera(supersampling: usize, adaptive: bool) -> Camera {
    Camera::builder()
        .location(Point::ORIGIN)
        .direction(-Vector::Z, Vector::Y).unwrap()
        .vp_size(2.0, 2.0)
        .vp_distance(1.0).unwrap()
        .image_writer(ImageWriter::new("unused.ppm", 1, 1))
        .ray_tracer(SplitTracer)
        .supersampling(supersampling)
        .adaptive(adaptive)
        .print_interval(0.0)
        .build()
        .unwrap()
}

#[test]
fn beam_averages_sub_pixels() {
    let mut camera = split_camera(2, false);
    camera.render_image().unwrap();
    let pixel = camera.image_writer().unwrap().canvas().read_pixel(0, 0).unwrap();

    assert_eq!(pixel, Color::rgb(0.5, 0.5, 0.5));

    // A single ray goes straight ahead.
    let mut camera = split_camera(1, false);
    camera.render_image().unwrap();
    let pixel = camera.image_writer().unwrap().canvas().read_pixel(0, 0).unwrap();
    assert_eq!(pixel, Color::black());
}

#[test]
fn adaptive_sampling_refines_edges() {
    let mut camera = split_camera(4, true);
    camera.render_image().unwrap();
    let pixel = camera.image_writer().unwrap().canvas().read_pixel(0, 0).unwrap();

    assert!(pixel.r > 0.0 && pixel.r < 1.0);
}

#[test]
fn uniform_region_matches_every_sampling_mode() {
    let color = Color::rgb(0.2, 0.4, 0.6);
    for (n, adaptive) in [(1, false), (3, false), (4, true)] {
        let mut camera = Camera::builder()
            .location(Point::ORIGIN)
            .direction(-Vector::Z, Vector::Y).unwrap()
            .vp_size(4.0, 4.0)
            .vp_distance(1.0).unwrap()
            .image_writer(ImageWriter::new("unused.ppm", 4, 4))
            .ray_tracer(FlatTracer(color))
            .supersampling(n)
            .adaptive(adaptive)
            .print_interval(0.0)
            .build()
            .unwrap();
        camera.render_image().unwrap();

        let canvas = camera.image_writer().unwrap().canvas();
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(canvas.read_pixel(x, y), Some(color));
            }
        }
    }
}

#[test]
fn grid_lines() {
    let mut camera = Camera::builder()
        .location(Point::ORIGIN)
        .direction(-Vector::Z, Vector::Y).unwrap()
        .vp_size(1.0, 1.0)
        .vp_distance(1.0).unwrap()
        .image_writer(ImageWriter::new("unused.ppm", 6, 4))
        .build()
        .unwrap();
    camera.print_grid(3, Color::white()).unwrap();
    let canvas = camera.image_writer().unwrap().canvas();

    assert_eq!(canvas.read_pixel(5, 0), Some(Color::white()));
    assert_eq!(canvas.read_pixel(3, 2), Some(Color::white()));
    assert_eq!(canvas.read_pixel(1, 3), Some(Color::white()));
    assert_eq!(canvas.read_pixel(1, 1), Some(Color::black()));
}
