use crate::tuple::Double3;

/// A material record.
///
/// Coefficients follow the Phong reflection model (diffuse, specular,
/// shininess) extended with reflectivity and transparency for the recursive
/// global effects. Every coefficient carries one value per color channel and
/// is expected to lie in `[0, 1]`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Material {
    pub kd: Double3,
    pub ks: Double3,
    pub shininess: f64,

    /// Reflectivity.
    pub kr: Double3,

    /// Transparency.
    pub kt: Double3,
}

/// The default material is black in every coefficient: an object with the
/// default material shows nothing but its emission.
impl Default for Material {
    fn default() -> Material {
        Material {
            kd: Double3::ZERO,
            ks: Double3::ZERO,
            shininess: 0.0,
            kr: Double3::ZERO,
            kt: Double3::ZERO,
        }
    }
}

impl Material {
    pub fn new() -> Material {
        Default::default()
    }

    pub fn with_kd(mut self, kd: impl Into<Double3>) -> Material {
        self.kd = kd.into();
        self
    }

    pub fn with_ks(mut self, ks: impl Into<Double3>) -> Material {
        self.ks = ks.into();
        self
    }

    pub fn with_shininess(mut self, shininess: f64) -> Material {
        self.shininess = shininess;
        self
    }

    pub fn with_kr(mut self, kr: impl Into<Double3>) -> Material {
        self.kr = kr.into();
        self
    }

    pub fn with_kt(mut self, kt: impl Into<Double3>) -> Material {
        self.kt = kt.into();
        self
    }
}

#[test]
fn material_setters_chain() {
    let m = Material::new()
        .with_kd(0.5)
        .with_ks([0.1, 0.2, 0.3])
        .with_shininess(100.0)
        .with_kt(0.25);

    assert_eq!(m.kd, Double3::uniform(0.5));
    assert_eq!(m.ks, Double3::new(0.1, 0.2, 0.3));
    assert_eq!(m.shininess, 100.0);
    assert_eq!(m.kr, Double3::ZERO);
    assert_eq!(m.kt, Double3::uniform(0.25));
}
