use std::sync::Arc;

use whitted_tracer::camera::{ Camera, CameraBuilder };
use whitted_tracer::canvas::ImageWriter;
use whitted_tracer::color::Color;
use whitted_tracer::intersect::{ Geometries, Intersectable };
use whitted_tracer::light::{ AmbientLight, DirectionalLight, PointLight };
use whitted_tracer::material::Material;
use whitted_tracer::ray::Ray;
use whitted_tracer::scene::{ Scene, SceneBuilder, SceneJson };
use whitted_tracer::shape::Shape;
use whitted_tracer::tracer::{ BasicRayTracer, RayTracer };
use whitted_tracer::tuple::{ Point, Vector };

fn vector(x: f64, y: f64, z: f64) -> Vector {
    Vector::new(x, y, z).unwrap()
}

#[test]
fn ray_crossing_a_sphere() {
    let sphere = Shape::sphere(Point::new(1.0, 0.0, 0.0), 1.0).unwrap();
    let ray = Ray::new(Point::new(-1.0, 0.0, 0.0), vector(3.0, 1.0, 0.0));
    let points = sphere.find_points(&ray).unwrap();

    assert_eq!(points.len(), 2);
    assert!(points.contains(&Point::new(0.0651530771650466, 0.355051025721682, 0.0)));
    assert!(points.contains(&Point::new(1.53484692283495, 0.844948974278318, 0.0)));
    assert_eq!(ray.find_closest_point(&points),
        Some(Point::new(0.0651530771650466, 0.355051025721682, 0.0)));
}

#[test]
fn ray_crossing_every_shape_of_a_composite() {
    let geometries = Geometries::from(vec![
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
    ]);
    let ray = Ray::new(Point::new(-2.0, 0.0, -3.0), vector(6.0, 1.0, 6.0));

    assert_eq!(geometries.find_points(&ray).unwrap().len(), 4);
}

#[test]
fn empty_composite_is_never_hit() {
    let geometries = Geometries::new();

    for direction in [vector(1.0, 0.0, 0.0), vector(0.0, -1.0, 0.0), vector(1.0, 1.0, 1.0)] {
        assert!(geometries.find_hits_unbounded(&Ray::new(Point::ORIGIN, direction)).is_none());
    }
}

#[test]
fn opaque_unlit_sphere_shading_ignores_recursion() {
    let emission = Color::rgb(0.1, 0.2, 0.3);
    let scene = SceneBuilder::new("opaque")
        .background(Color::rgb(0.9, 0.9, 0.9))
        .ambient_light(AmbientLight::uniform(Color::rgb(0.5, 0.5, 0.5), 0.2))
        .add_shape(Shape::sphere(Point::new(0.0, 0.0, -50.0), 10.0).unwrap()
            .with_emission(emission)
            .with_material(Material::new().with_kd(0.5).with_ks(0.5).with_shininess(30.0)))
        .add_shape(Shape::plane(Point::new(0.0, -20.0, 0.0), Vector::Y)
            .with_emission(Color::rgb(1.0, 0.0, 0.0)))
        .build();
    let tracer = BasicRayTracer::new(Arc::new(scene));

    let expected = emission + Color::rgb(0.1, 0.1, 0.1);
    for direction in [vector(0.0, 0.0, -1.0), vector(0.05, 0.05, -1.0), vector(-0.1, 0.0, -1.0)] {
        assert_eq!(tracer.trace_ray(&Ray::new(Point::ORIGIN, direction)), expected);
    }
}

#[test]
fn center_pixel_ray_hits_view_plane_center() {
    let camera = Camera::builder()
        .location(Point::ORIGIN)
        .direction(vector(0.0, 0.0, -1.0), vector(0.0, 1.0, 0.0)).unwrap()
        .vp_size(3.0, 3.0)
        .vp_distance(1.0).unwrap()
        .build()
        .unwrap();
    let ray = camera.construct_ray(3, 3, 1, 1);

    assert_eq!(ray.point_at(1.0), Point::new(0.0, 0.0, -1.0));
    assert_eq!(camera.pixel_center(3, 3, 1, 1), Point::new(0.0, 0.0, -1.0));
}

fn lit_scene() -> Arc<Scene> {
    let scene = SceneBuilder::new("lit")
        .background(Color::rgb(0.05, 0.05, 0.1))
        .ambient_light(AmbientLight::uniform(Color::white(), 0.1))
        .add_shape(Shape::sphere(Point::new(0.0, 0.0, -100.0), 40.0).unwrap()
            .with_emission(Color::rgb(0.2, 0.0, 0.0))
            .with_material(Material::new().with_kd(0.5).with_ks(0.5).with_shininess(50.0)
                .with_kt(0.4)))
        .add_shape(Shape::sphere(Point::new(0.0, 0.0, -100.0), 20.0).unwrap()
            .with_emission(Color::rgb(0.0, 0.2, 0.0))
            .with_material(Material::new().with_kd(0.6)))
        .add_shape(Shape::plane(Point::new(0.0, -50.0, 0.0), Vector::Y)
            .with_material(Material::new().with_kd(0.3).with_kr(0.5)))
        .add_light(PointLight::new(Color::white(), Point::new(50.0, 80.0, 0.0))
            .with_kl(0.001))
        .add_light(DirectionalLight::new(Color::rgb(0.3, 0.3, 0.3), vector(-1.0, -1.0, -1.0)))
        .build();

    Arc::new(scene)
}

fn lit_camera(scene: &Arc<Scene>, threads: usize, supersampling: usize, adaptive: bool)
    -> Camera
{
    CameraBuilder::new()
        .location(Point::new(0.0, 0.0, 100.0))
        .direction(vector(0.0, 0.0, -1.0), vector(0.0, 1.0, 0.0)).unwrap()
        .vp_size(150.0, 150.0)
        .vp_distance(100.0).unwrap()
        .image_writer(ImageWriter::new("unused.ppm", 24, 24))
        .ray_tracer(BasicRayTracer::new(Arc::clone(scene)))
        .threads(threads)
        .supersampling(supersampling)
        .adaptive(adaptive)
        .print_interval(0.0)
        .build()
        .unwrap()
}

#[test]
fn threaded_render_matches_sequential_render() {
    let scene = lit_scene();

    for (supersampling, adaptive) in [(1, false), (3, false), (4, true)] {
        let mut sequential = lit_camera(&scene, 0, supersampling, adaptive);
        sequential.render_image().unwrap();

        let mut threaded = lit_camera(&scene, 4, supersampling, adaptive);
        threaded.render_image().unwrap();

        assert_eq!(
            sequential.image_writer().unwrap().canvas(),
            threaded.image_writer().unwrap().canvas()
        );
    }
}

#[test]
fn demo_scene_renders() {
    let mut json = SceneJson::parse(include_str!("../scenes/demo.json")).unwrap();
    json.camera.resolution = [8, 8];
    json.camera.supersampling = 1;

    let camera_json = json.camera.clone();
    let scene = Arc::new(Scene::try_from(json).unwrap());
    assert_eq!(scene.geometries.len(), 6);
    assert_eq!(scene.lights.len(), 3);

    let mut camera = CameraBuilder::from_json(&camera_json).unwrap()
        .image_writer(ImageWriter::new("unused.ppm", 8, 8))
        .ray_tracer(BasicRayTracer::new(Arc::clone(&scene)))
        .print_interval(0.0)
        .build()
        .unwrap();
    camera.render_image().unwrap();

    // The plane fills the bottom row, so it isn't background.
    let canvas = camera.image_writer().unwrap().canvas();
    assert_ne!(canvas.read_pixel(0, 7), Some(scene.background));
}
