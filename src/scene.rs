use std::convert::TryFrom;
use std::fs;
use std::path::Path;

use log::debug;
use serde::{ Serialize, Deserialize };

use crate::color::Color;
use crate::error::{ Error, Result };
use crate::intersect::Geometries;
use crate::light::{ AmbientLight, DirectionalLight, LightSource, PointLight, SpotLight };
use crate::material::Material;
use crate::ray::Ray;
use crate::shape::Shape;
use crate::tuple::{ Double3, Point, Vector };

/// Everything a ray tracer needs to know about the world.
///
/// A scene is assembled once with `SceneBuilder` and is only read afterwards,
/// so it can be shared between rendering threads.
#[derive(Debug)]
pub struct Scene {
    pub name: String,
    pub background: Color,
    pub ambient_light: AmbientLight,
    pub geometries: Geometries,
    pub lights: Vec<Box<dyn LightSource>>,
}

impl Scene {
    pub fn builder<S: Into<String>>(name: S) -> SceneBuilder {
        SceneBuilder::new(name)
    }
}

/// Builds a `Scene`.
///
/// Unset parts default to a black background, no ambient light, no shapes
/// and no lights.
#[derive(Debug)]
pub struct SceneBuilder {
    scene: Scene,
}

impl SceneBuilder {
    pub fn new<S: Into<String>>(name: S) -> SceneBuilder {
        SceneBuilder {
            scene: Scene {
                name: name.into(),
                background: Color::black(),
                ambient_light: AmbientLight::NONE,
                geometries: Geometries::new(),
                lights: Vec::new(),
            },
        }
    }

    pub fn background(mut self, background: Color) -> SceneBuilder {
        self.scene.background = background;
        self
    }

    pub fn ambient_light(mut self, ambient_light: AmbientLight) -> SceneBuilder {
        self.scene.ambient_light = ambient_light;
        self
    }

    /// Replaces all shapes.
    pub fn geometries(mut self, geometries: Geometries) -> SceneBuilder {
        self.scene.geometries = geometries;
        self
    }

    pub fn add_shape(mut self, shape: Shape) -> SceneBuilder {
        self.scene.geometries.add(shape);
        self
    }

    pub fn add_light<L: LightSource + 'static>(mut self, light: L) -> SceneBuilder {
        self.scene.lights.push(Box::new(light));
        self
    }

    /// Replaces all lights.
    pub fn lights(mut self, lights: Vec<Box<dyn LightSource>>) -> SceneBuilder {
        self.scene.lights = lights;
        self
    }

    pub fn build(self) -> Scene {
        debug!("built scene '{}' with {} shapes and {} lights",
            self.scene.name, self.scene.geometries.len(), self.scene.lights.len());
        self.scene
    }
}

/* JSON scene description */

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SceneJson {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub background: [f64; 3],

    pub ambient: Option<AmbientJson>,

    pub camera: CameraJson,

    #[serde(default)]
    pub lights: Vec<LightJson>,

    #[serde(default)]
    pub shapes: Vec<ShapeJson>,
}

impl SceneJson {
    /// Reads a scene description from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<SceneJson> {
        let text = fs::read_to_string(path)?;
        SceneJson::parse(&text)
    }

    pub fn parse(text: &str) -> Result<SceneJson> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Camera and rendering settings of a scene file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CameraJson {
    pub position: [f64; 3],
    pub to: [f64; 3],
    pub up: [f64; 3],

    pub vp_width: f64,
    pub vp_height: f64,
    pub vp_distance: f64,

    /// Image width and height in pixels.
    pub resolution: [usize; 2],

    #[serde(default = "default_supersampling")]
    pub supersampling: usize,

    #[serde(default)]
    pub adaptive: bool,

    #[serde(default)]
    pub threads: usize,
}

fn default_supersampling() -> usize {
    1
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AmbientJson {
    pub color: [f64; 3],
    pub ka: Coefficient,
}

/// A per-channel coefficient, written either as one number or as three.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Coefficient {
    Uniform(f64),
    Channels([f64; 3]),
}

impl Default for Coefficient {
    fn default() -> Coefficient {
        Coefficient::Uniform(0.0)
    }
}

impl From<Coefficient> for Double3 {
    fn from(c: Coefficient) -> Double3 {
        match c {
            Coefficient::Uniform(v) => Double3::uniform(v),
            Coefficient::Channels(v) => Double3::from(v),
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialJson {
    pub kd: Coefficient,
    pub ks: Coefficient,
    pub shininess: f64,
    pub kr: Coefficient,
    pub kt: Coefficient,
}

impl From<MaterialJson> for Material {
    fn from(m: MaterialJson) -> Material {
        Material::new()
            .with_kd(m.kd)
            .with_ks(m.ks)
            .with_shininess(m.shininess)
            .with_kr(m.kr)
            .with_kt(m.kt)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LightJson {
    Directional {
        intensity: [f64; 3],
        direction: [f64; 3],
    },
    Point {
        intensity: [f64; 3],
        position: [f64; 3],
        #[serde(default = "default_kc")]
        kc: f64,
        #[serde(default)]
        kl: f64,
        #[serde(default)]
        kq: f64,
    },
    Spot {
        intensity: [f64; 3],
        position: [f64; 3],
        direction: [f64; 3],
        #[serde(default = "default_kc")]
        kc: f64,
        #[serde(default)]
        kl: f64,
        #[serde(default)]
        kq: f64,
        #[serde(default = "default_narrow_beam")]
        narrow_beam: f64,
    },
}

fn default_kc() -> f64 {
    1.0
}

fn default_narrow_beam() -> f64 {
    1.0
}

impl TryFrom<LightJson> for Box<dyn LightSource> {
    type Error = Error;

    fn try_from(light_json: LightJson) -> Result<Box<dyn LightSource>> {
        let light: Box<dyn LightSource> = match light_json {
            LightJson::Directional { intensity, direction } => Box::new(
                DirectionalLight::new(intensity.into(), vector(direction)?)
            ),
            LightJson::Point { intensity, position, kc, kl, kq } => Box::new(
                PointLight::new(intensity.into(), position.into())
                    .with_kc(kc)
                    .with_kl(kl)
                    .with_kq(kq)
            ),
            LightJson::Spot { intensity, position, direction, kc, kl, kq, narrow_beam } => {
                Box::new(
                    SpotLight::new(intensity.into(), position.into(), vector(direction)?)
                        .with_kc(kc)
                        .with_kl(kl)
                        .with_kq(kq)
                        .with_narrow_beam(narrow_beam)
                )
            },
        };

        Ok(light)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ShapeJson {
    #[serde(flatten)]
    pub geometry: GeometryJson,

    #[serde(default)]
    pub emission: [f64; 3],

    #[serde(default)]
    pub material: MaterialJson,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GeometryJson {
    Plane {
        point: [f64; 3],
        normal: [f64; 3],
    },
    Sphere {
        center: [f64; 3],
        radius: f64,
    },
    Tube {
        origin: [f64; 3],
        direction: [f64; 3],
        radius: f64,
    },
    Cylinder {
        origin: [f64; 3],
        direction: [f64; 3],
        radius: f64,
        height: f64,
    },
    Polygon {
        vertices: Vec<[f64; 3]>,
    },
    Triangle {
        vertices: [[f64; 3]; 3],
    },
}

impl TryFrom<ShapeJson> for Shape {
    type Error = Error;

    fn try_from(shape_json: ShapeJson) -> Result<Shape> {
        let shape = match shape_json.geometry {
            GeometryJson::Plane { point, normal } => {
                Shape::plane(point.into(), vector(normal)?)
            },
            GeometryJson::Sphere { center, radius } => {
                Shape::sphere(center.into(), radius)?
            },
            GeometryJson::Tube { origin, direction, radius } => {
                Shape::tube(Ray::new(origin.into(), vector(direction)?), radius)?
            },
            GeometryJson::Cylinder { origin, direction, radius, height } => {
                let axis = Ray::new(origin.into(), vector(direction)?);
                Shape::cylinder(axis, radius, height)?
            },
            GeometryJson::Polygon { vertices } => {
                Shape::polygon(vertices.into_iter().map(Point::from).collect())?
            },
            GeometryJson::Triangle { vertices: [a, b, c] } => {
                Shape::triangle(a.into(), b.into(), c.into())?
            },
        };

        Ok(shape
            .with_emission(shape_json.emission.into())
            .with_material(shape_json.material.into()))
    }
}

impl TryFrom<SceneJson> for Scene {
    type Error = Error;

    fn try_from(scene_json: SceneJson) -> Result<Scene> {
        let mut builder = SceneBuilder::new(scene_json.name)
            .background(scene_json.background.into());

        if let Some(ambient) = scene_json.ambient {
            builder = builder.ambient_light(
                AmbientLight::new(ambient.color.into(), ambient.ka.into())
            );
        }

        // Errors name the offending entry; construction errors alone don't.
        for (i, shape_json) in scene_json.shapes.into_iter().enumerate() {
            let shape = Shape::try_from(shape_json)
                .map_err(|e| Error::Scene(format!("shape #{}: {}", i, e)))?;
            builder = builder.add_shape(shape);
        }

        let mut lights = Vec::new();
        for (i, light_json) in scene_json.lights.into_iter().enumerate() {
            let light = Box::<dyn LightSource>::try_from(light_json)
                .map_err(|e| Error::Scene(format!("light #{}: {}", i, e)))?;
            lights.push(light);
        }

        Ok(builder.lights(lights).build())
    }
}

fn vector(v: [f64; 3]) -> Result<Vector> {
    Vector::new(v[0], v[1], v[2])
}

/* Tests */

#[cfg(test)]
const SCENE: &str = r#"{
    "name": "test",
    "background": [0.1, 0.1, 0.1],
    "ambient": { "color": [1, 1, 1], "ka": 0.15 },
    "camera": {
        "position": [0, 0, 1000], "to": [0, 0, -1], "up": [0, 1, 0],
        "vp_width": 150, "vp_height": 150, "vp_distance": 1000,
        "resolution": [50, 50],
        "supersampling": 4
    },
    "lights": [
        { "type": "directional", "intensity": [1, 1, 1], "direction": [0, 0, -1] },
        { "type": "spot", "intensity": [1, 0.5, 0.5], "position": [-100, -100, 500],
          "direction": [-1, -1, -2], "kl": 0.0004, "kq": 0.0000006 }
    ],
    "shapes": [
        { "type": "sphere", "center": [0, 0, -100], "radius": 50,
          "emission": [0, 0, 1],
          "material": { "kd": 0.5, "ks": [0.5, 0.5, 0.5], "shininess": 100, "kt": 0.3 } },
        { "type": "triangle", "vertices": [[-150, -150, -115], [150, -150, -135], [75, 75, -150]] },
        { "type": "cylinder", "origin": [0, 0, 0], "direction": [0, 1, 0],
          "radius": 1, "height": 2 }
    ]
}"#;

#[test]
fn scene_from_json() {
    let json = SceneJson::parse(SCENE).unwrap();
    assert_eq!(json.camera.resolution, [50, 50]);
    assert_eq!(json.camera.supersampling, 4);
    assert!(!json.camera.adaptive);

    let scene = Scene::try_from(json).unwrap();
    assert_eq!(scene.name, "test");
    assert_eq!(scene.background, Color::rgb(0.1, 0.1, 0.1));
    assert_eq!(scene.ambient_light.intensity(), Color::rgb(0.15, 0.15, 0.15));
    assert_eq!(scene.geometries.len(), 3);
    assert_eq!(scene.lights.len(), 2);

    let sphere = scene.geometries.iter().next().unwrap();
    assert_eq!(sphere.emission, Color::rgb(0.0, 0.0, 1.0));
    assert_eq!(sphere.material.kd, Double3::uniform(0.5));
    assert_eq!(sphere.material.kt, Double3::uniform(0.3));
    assert_eq!(sphere.material.shininess, 100.0);
}

#[test]
fn invalid_shapes_are_reported() {
    let mut json = SceneJson::parse(SCENE).unwrap();
    json.shapes.push(ShapeJson {
        geometry: GeometryJson::Sphere { center: [0.0; 3], radius: -1.0 },
        emission: [0.0; 3],
        material: MaterialJson::default(),
    });

    assert!(matches!(Scene::try_from(json), Err(Error::Scene(_))));
    assert!(matches!(SceneJson::parse("{"), Err(Error::Json(_))));
}

#[test]
fn scene_builder_defaults() {
    let scene = SceneBuilder::new("empty").build();

    assert_eq!(scene.background, Color::black());
    assert_eq!(scene.ambient_light, AmbientLight::NONE);
    assert!(scene.geometries.is_empty());
    assert!(scene.lights.is_empty());
}
