//! Scene description format for the whitted ray tracer.
//!
//! A [`SceneDocument`] is a purely declarative description of a scene:
//! camera, light, render settings, optional fog, and an ordered list of
//! objects with their materials. It is read from and written to TOML or
//! JSON. Turning a document into something traceable is done by
//! `whitted-trace`.
//!
//! Every field has a default that matches the classic reference scene, so
//! a minimal document only needs its objects:
//!
//! ```toml
//! [[objects]]
//! type = "sphere"
//! center = [0.0, 0.0, -60.0]
//! radius = 10.0
//! material = { color = [1.0, 0.0, 0.0], reflection = 0.8 }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors raised while reading or writing a scene document.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The file could not be read or written.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The TOML text is not a valid scene.
    #[error("invalid TOML scene: {0}")]
    TomlDe(#[from] toml::de::Error),
    /// The document could not be rendered as TOML.
    #[error("cannot write TOML scene: {0}")]
    TomlSer(#[from] toml::ser::Error),
    /// The JSON text is not a valid scene, or could not be written.
    #[error("invalid JSON scene: {0}")]
    Json(#[from] serde_json::Error),
    /// The file extension is neither `.toml` nor `.json`.
    #[error("unsupported scene format: {0:?} (expected .toml or .json)")]
    UnsupportedFormat(String),
}

/// Result type for document operations.
pub type Result<T> = std::result::Result<T, DocumentError>;

/// On-disk encoding of a scene document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// TOML (`.toml`).
    Toml,
    /// JSON (`.json`).
    Json,
}

impl Format {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        match ext.as_str() {
            "toml" => Ok(Format::Toml),
            "json" => Ok(Format::Json),
            _ => Err(DocumentError::UnsupportedFormat(ext)),
        }
    }
}

/// RGB triple or XYZ coordinate.
pub type Triple = [f64; 3];

/// Pinhole camera and image-plane grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraDef {
    /// Eye position.
    pub eye: Triple,
    /// Image-plane width in world units.
    pub width: f64,
    /// Image-plane height in world units.
    pub height: f64,
    /// Distance from the eye to the image plane along `-z`.
    pub distance: f64,
    /// Number of cells along each side of the image plane.
    pub resolution: u32,
}

impl Default for CameraDef {
    fn default() -> Self {
        Self {
            eye: [0.0, 0.0, 0.0],
            width: 20.0,
            height: 20.0,
            distance: 40.0,
            resolution: 500,
        }
    }
}

/// The single point light.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightDef {
    /// Light position.
    pub position: Triple,
}

impl Default for LightDef {
    fn default() -> Self {
        Self {
            position: [10.0, 40.0, -3.0],
        }
    }
}

/// Settings that control tracing rather than scene content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderDef {
    /// Maximum recursion depth for secondary rays.
    pub max_depth: u32,
    /// Average four samples per cell.
    pub antialias: bool,
    /// Colour returned by rays that hit nothing.
    pub background: Triple,
}

impl Default for RenderDef {
    fn default() -> Self {
        Self {
            max_depth: 5,
            antialias: false,
            background: [0.0, 0.0, 0.0],
        }
    }
}

/// Linear depth fog between two `z` planes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FogDef {
    /// Depth where fog starts.
    pub near: f64,
    /// Depth where fog is total.
    pub far: f64,
    /// Clamp the blend factor to `[0, 1]` instead of extrapolating.
    pub clamp: bool,
}

impl Default for FogDef {
    fn default() -> Self {
        Self {
            near: -70.0,
            far: -150.0,
            clamp: false,
        }
    }
}

/// Refraction parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefractionDef {
    /// Weight of the refracted contribution.
    pub coeff: f64,
    /// Refractive index of the medium.
    pub index: f64,
}

impl Default for RefractionDef {
    fn default() -> Self {
        Self {
            coeff: 0.8,
            index: 1.0,
        }
    }
}

/// World-space checkerboard on the `xz` plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckerDef {
    /// Tile edge length.
    pub tile: f64,
    /// Offset added to `x` and `z` before tiling.
    pub offset: f64,
    /// Colour where the tile parities match.
    pub even: Triple,
    /// Colour where they differ.
    pub odd: Triple,
}

impl Default for CheckerDef {
    fn default() -> Self {
        Self {
            tile: 5.0,
            offset: 100.0,
            even: [1.0, 1.0, 0.5],
            odd: [0.0, 1.0, 0.0],
        }
    }
}

/// Optical attributes of an object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialDef {
    /// Base colour as `[r, g, b]` in 0.0..1.0.
    pub color: Triple,
    /// Reflection coefficient; absent means not reflective.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reflection: Option<f64>,
    /// Refraction parameters; absent means not refractive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refraction: Option<RefractionDef>,
    /// Transparency coefficient; absent means opaque.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transparency: Option<f64>,
    /// Add a Phong highlight.
    pub specular: bool,
    /// Phong exponent.
    pub shininess: f64,
    /// Fraction of the base colour kept when the object is in shadow.
    pub shadow_factor: f64,
    /// Procedural checkerboard replacing the base colour.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checker: Option<CheckerDef>,
}

impl Default for MaterialDef {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            reflection: None,
            refraction: None,
            transparency: None,
            specular: true,
            shininess: 50.0,
            shadow_factor: 0.2,
            checker: None,
        }
    }
}

/// Geometry of an object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ShapeDef {
    /// Sphere.
    Sphere {
        /// Center point.
        center: Triple,
        /// Radius.
        radius: f64,
    },
    /// Bounded quadrilateral given by four corners in winding order.
    Plane {
        /// Corners `a, b, c, d`.
        corners: [Triple; 4],
    },
    /// Open cylinder standing on `center`.
    Cylinder {
        /// Center of the base circle.
        center: Triple,
        /// Radius.
        radius: f64,
        /// Height along `+y`.
        height: f64,
    },
    /// Open cone standing on `center`.
    Cone {
        /// Center of the base circle.
        center: Triple,
        /// Base radius.
        radius: f64,
        /// Apex height along `+y`.
        height: f64,
    },
    /// Axis-aligned cube expanded into six planes.
    Cube {
        /// Front-bottom-left corner; the cube extends `+x`, `+y`, `-z`.
        origin: Triple,
        /// Edge length.
        size: f64,
    },
}

/// One entry of the object list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectDef {
    /// Optional human-readable name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Geometry.
    #[serde(flatten)]
    pub shape: ShapeDef,
    /// Material.
    #[serde(default)]
    pub material: MaterialDef,
}

impl ObjectDef {
    /// An unnamed object.
    pub fn new(shape: ShapeDef, material: MaterialDef) -> Self {
        Self {
            name: None,
            shape,
            material,
        }
    }

    /// Attach a name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// A whole scene description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    /// Camera and image grid.
    #[serde(default)]
    pub camera: CameraDef,
    /// Point light.
    #[serde(default)]
    pub light: LightDef,
    /// Tracing settings.
    #[serde(default)]
    pub render: RenderDef,
    /// Depth fog; absent means none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fog: Option<FogDef>,
    /// Objects in scene order. Earlier objects win exact distance ties.
    #[serde(default)]
    pub objects: Vec<ObjectDef>,
}

impl SceneDocument {
    /// Create an empty document with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Deserialize from a TOML string.
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Deserialize from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to a pretty JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse text in the given format.
    pub fn parse(text: &str, format: Format) -> Result<Self> {
        match format {
            Format::Toml => Self::from_toml(text),
            Format::Json => Self::from_json(text),
        }
    }

    /// Render to text in the given format.
    pub fn render(&self, format: Format) -> Result<String> {
        match format {
            Format::Toml => self.to_toml(),
            Format::Json => self.to_json(),
        }
    }

    /// Read a `.toml` or `.json` scene file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = Format::from_path(path)?;
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text, format)
    }

    /// Write a `.toml` or `.json` scene file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let text = self.render(Format::from_path(path)?)?;
        std::fs::write(path, text)?;
        Ok(())
    }

    /// The classic reference scene: a checkered floor, a mirrored red
    /// sphere, two glassy blue spheres, a white sphere, a cylinder, two
    /// cones, a back wall and a pink cube, lit from above and fogged.
    pub fn reference() -> Self {
        let blue_glass = MaterialDef {
            color: [0.0, 0.0, 1.0],
            transparency: Some(0.3),
            refraction: Some(RefractionDef {
                coeff: 0.8,
                index: 1.01,
            }),
            ..MaterialDef::default()
        };

        let objects = vec![
            ObjectDef::new(
                ShapeDef::Plane {
                    corners: [
                        [-50.0, -15.0, -40.0],
                        [50.0, -15.0, -40.0],
                        [50.0, -15.0, -200.0],
                        [-50.0, -15.0, -200.0],
                    ],
                },
                MaterialDef {
                    color: [0.8, 0.8, 0.0],
                    specular: false,
                    checker: Some(CheckerDef::default()),
                    ..MaterialDef::default()
                },
            )
            .named("floor"),
            ObjectDef::new(
                ShapeDef::Sphere {
                    center: [-12.0, 0.0, -110.0],
                    radius: 15.0,
                },
                MaterialDef {
                    color: [1.0, 0.0, 0.0],
                    reflection: Some(0.8),
                    shadow_factor: 0.6,
                    ..MaterialDef::default()
                },
            )
            .named("mirror ball"),
            ObjectDef::new(
                ShapeDef::Sphere {
                    center: [8.0, 8.0, -70.0],
                    radius: 3.0,
                },
                blue_glass.clone(),
            ),
            ObjectDef::new(
                ShapeDef::Sphere {
                    center: [13.0, -2.0, -70.0],
                    radius: 4.0,
                },
                MaterialDef {
                    shadow_factor: 0.6,
                    ..MaterialDef::default()
                },
            ),
            ObjectDef::new(
                ShapeDef::Sphere {
                    center: [-8.0, 5.0, -70.0],
                    radius: 3.0,
                },
                blue_glass,
            ),
            ObjectDef::new(
                ShapeDef::Cylinder {
                    center: [13.0, -15.0, -70.0],
                    radius: 3.0,
                    height: 10.0,
                },
                MaterialDef {
                    color: [1.0, 0.0, 0.0],
                    ..MaterialDef::default()
                },
            ),
            ObjectDef::new(
                ShapeDef::Cone {
                    center: [-8.0, -15.0, -70.0],
                    radius: 4.0,
                    height: 12.0,
                },
                MaterialDef {
                    color: [0.62, 0.12, 0.94],
                    ..MaterialDef::default()
                },
            ),
            ObjectDef::new(
                ShapeDef::Cone {
                    center: [8.0, -10.0, -100.0],
                    radius: 6.0,
                    height: 16.0,
                },
                MaterialDef {
                    color: [0.0, 1.0, 0.0],
                    ..MaterialDef::default()
                },
            ),
            ObjectDef::new(
                ShapeDef::Plane {
                    corners: [
                        [-50.0, -15.0, -200.0],
                        [50.0, -15.0, -200.0],
                        [50.0, 50.0, -200.0],
                        [-50.0, 50.0, -200.0],
                    ],
                },
                MaterialDef {
                    color: [0.95, 0.95, 0.95],
                    specular: false,
                    ..MaterialDef::default()
                },
            )
            .named("wall"),
            ObjectDef::new(
                ShapeDef::Cube {
                    origin: [-1.0, -15.0, -70.0],
                    size: 8.0,
                },
                MaterialDef {
                    color: [1.0, 0.45, 1.0],
                    ..MaterialDef::default()
                },
            ),
        ];

        Self {
            fog: Some(FogDef::default()),
            objects,
            ..Self::default()
        }
    }
}
