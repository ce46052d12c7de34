//! Surface materials and the local lighting model.

use crate::error::{Result, SceneError};
use whitted_ir::{CheckerDef, MaterialDef, RefractionDef};
use whitted_math::{colors, reflect, Color, Dir3, Point3};

/// Fraction of the base colour every lit surface receives.
pub const AMBIENT: f64 = 0.2;

/// Refraction parameters of a transmissive material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Refraction {
    /// Weight of the refracted contribution.
    pub coeff: f64,
    /// Refractive index of the medium (must be positive).
    pub index: f64,
}

impl Default for Refraction {
    fn default() -> Self {
        Self {
            coeff: 0.8,
            index: 1.0,
        }
    }
}

impl From<&RefractionDef> for Refraction {
    fn from(def: &RefractionDef) -> Self {
        Self {
            coeff: def.coeff,
            index: def.index,
        }
    }
}

/// World-space checkerboard on the `xz` plane.
///
/// Tiles are `tile` units wide, counted from `-offset` so the parity does
/// not flip at the origin for scenes that stay within the offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Checker {
    /// Tile edge length.
    pub tile: f64,
    /// Offset added to `x` and `z` before tiling.
    pub offset: f64,
    /// Colour where the `x` and `z` tile parities match.
    pub even: Color,
    /// Colour where they differ.
    pub odd: Color,
}

impl Default for Checker {
    fn default() -> Self {
        Self {
            tile: 5.0,
            offset: 100.0,
            even: Color::new(1.0, 1.0, 0.5),
            odd: Color::new(0.0, 1.0, 0.0),
        }
    }
}

impl Checker {
    /// Colour of the tile containing `p`.
    pub fn color_at(&self, p: &Point3) -> Color {
        let ix = ((p.x + self.offset) / self.tile).floor() as i64;
        let iz = ((p.z + self.offset) / self.tile).floor() as i64;
        if (ix + iz).rem_euclid(2) == 0 {
            self.even
        } else {
            self.odd
        }
    }
}

impl From<&CheckerDef> for Checker {
    fn from(def: &CheckerDef) -> Self {
        Self {
            tile: def.tile,
            offset: def.offset,
            even: Color::from(def.even),
            odd: Color::from(def.odd),
        }
    }
}

/// Optical attributes of a scene object.
///
/// Optional coefficients are `None` when the effect is off. Apart from the
/// refractive index nothing is range checked.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Base colour.
    pub color: Color,
    /// Reflection coefficient.
    pub reflection: Option<f64>,
    /// Refraction parameters.
    pub refraction: Option<Refraction>,
    /// Transparency coefficient.
    pub transparency: Option<f64>,
    /// Add a white Phong highlight.
    pub specular: bool,
    /// Phong exponent.
    pub shininess: f64,
    /// Fraction of the base colour kept in shadow.
    pub shadow_factor: f64,
    /// Procedural pattern replacing `color`.
    pub pattern: Option<Checker>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: colors::WHITE,
            reflection: None,
            refraction: None,
            transparency: None,
            specular: true,
            shininess: 50.0,
            shadow_factor: 0.2,
            pattern: None,
        }
    }
}

impl Material {
    /// A default material with the given colour.
    pub fn new(color: Color) -> Self {
        Self {
            color,
            ..Self::default()
        }
    }

    /// Make the surface a mirror with the given weight.
    pub fn with_reflection(mut self, coeff: f64) -> Self {
        self.reflection = Some(coeff);
        self
    }

    /// Make the surface refract.
    pub fn with_refraction(mut self, coeff: f64, index: f64) -> Self {
        self.refraction = Some(Refraction { coeff, index });
        self
    }

    /// Dim the local colour by `1 - coeff`.
    pub fn with_transparency(mut self, coeff: f64) -> Self {
        self.transparency = Some(coeff);
        self
    }

    /// Turn the Phong highlight on or off.
    pub fn with_specular(mut self, specular: bool) -> Self {
        self.specular = specular;
        self
    }

    /// Set the shadow factor.
    pub fn with_shadow_factor(mut self, factor: f64) -> Self {
        self.shadow_factor = factor;
        self
    }

    /// Replace the base colour with a checkerboard.
    pub fn with_checker(mut self, checker: Checker) -> Self {
        self.pattern = Some(checker);
        self
    }

    /// Base colour at a surface point.
    pub fn base_color(&self, p: &Point3) -> Color {
        match &self.pattern {
            Some(checker) => checker.color_at(p),
            None => self.color,
        }
    }

    /// Ambient, Lambert and Phong terms for one light.
    ///
    /// All directions are unit vectors pointing away from the surface. The
    /// highlight is not masked by the diffuse term.
    pub fn lighting(&self, base: &Color, normal: &Dir3, to_light: &Dir3, view: &Dir3) -> Color {
        let diffuse = to_light.dot(normal.as_ref()).max(0.0);
        let mut color = base * (AMBIENT + diffuse);

        if self.specular {
            let r = reflect(&-to_light.into_inner(), normal);
            let highlight = r.dot(view.as_ref()).max(0.0).powf(self.shininess);
            color += colors::WHITE * highlight;
        }

        color
    }

    /// Reject attributes that would make the shader produce NaNs.
    pub fn validate(&self) -> Result<()> {
        match self.refraction {
            Some(r) if !(r.index.is_finite() && r.index > 0.0) => {
                Err(SceneError::InvalidRefractiveIndex(r.index))
            }
            _ => Ok(()),
        }
    }
}

impl From<&MaterialDef> for Material {
    fn from(def: &MaterialDef) -> Self {
        Self {
            color: Color::from(def.color),
            reflection: def.reflection,
            refraction: def.refraction.as_ref().map(Refraction::from),
            transparency: def.transparency,
            specular: def.specular,
            shininess: def.shininess,
            shadow_factor: def.shadow_factor,
            pattern: def.checker.as_ref().map(Checker::from),
        }
    }
}
