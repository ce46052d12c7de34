//! Scene arena: objects, light and global settings.

use crate::error::{Result, SceneError};
use crate::material::Material;
use crate::shade::MAX_STEPS;
use whitted_geom::{cube_faces, Cone, Cylinder, Quad, Shape, Sphere};
use whitted_ir::{FogDef, ObjectDef, SceneDocument, ShapeDef};
use whitted_math::{colors, Color, Point3};

/// Index of an object in its [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub usize);

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A shape with its material.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    /// Optional label, used for reporting only.
    pub name: Option<String>,
    /// Geometry.
    pub shape: Shape,
    /// Optical attributes.
    pub material: Material,
}

/// The single point light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    /// Light position.
    pub position: Point3,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            position: Point3::new(10.0, 40.0, -3.0),
        }
    }
}

/// Linear depth fog towards white between two `z` planes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fog {
    /// Depth where the blend factor is 0.
    pub near: f64,
    /// Depth where the blend factor is 1.
    pub far: f64,
    /// Clamp the blend factor to `[0, 1]`. When off, points nearer than
    /// `near` are pushed away from white and points beyond `far` past it.
    pub clamp: bool,
}

impl Default for Fog {
    fn default() -> Self {
        Self {
            near: -70.0,
            far: -150.0,
            clamp: false,
        }
    }
}

impl Fog {
    /// Blend `color` towards white by the depth `z` of the shaded point.
    pub fn apply(&self, color: &Color, z: f64) -> Color {
        let mut f = (z - self.near) / (self.far - self.near);
        if self.clamp {
            f = f.clamp(0.0, 1.0);
        }
        color * (1.0 - f) + colors::WHITE * f
    }
}

impl From<&FogDef> for Fog {
    fn from(def: &FogDef) -> Self {
        Self {
            near: def.near,
            far: def.far,
            clamp: def.clamp,
        }
    }
}

/// Everything the shader needs to know about the world.
///
/// Objects are stored in insertion order; earlier objects win exact
/// distance ties. A scene is immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    objects: Vec<SceneObject>,
    /// The light.
    pub light: Light,
    /// Colour of rays that hit nothing.
    pub background: Color,
    /// Optional depth fog.
    pub fog: Option<Fog>,
    /// Highest recursion step that still spawns secondary rays.
    pub max_depth: u32,
}

impl Scene {
    /// Start an empty scene with the default light, no fog, a black
    /// background and the standard recursion bound.
    pub fn builder() -> SceneBuilder {
        SceneBuilder::new()
    }

    /// Iterate objects with their ids, in scene order.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &SceneObject)> {
        self.objects
            .iter()
            .enumerate()
            .map(|(i, object)| (ObjectId(i), object))
    }

    /// Look up an object.
    pub fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(id.0)
    }

    /// Number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the scene has no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Build a scene from a document. Cubes expand to six quads.
    pub fn from_document(doc: &SceneDocument) -> Result<Self> {
        let mut builder = Self::builder()
            .with_light(Light {
                position: Point3::from(doc.light.position),
            })
            .with_background(Color::from(doc.render.background))
            .with_max_depth(doc.render.max_depth);
        if let Some(fog) = &doc.fog {
            builder = builder.with_fog(Fog::from(fog));
        }

        for (index, def) in doc.objects.iter().enumerate() {
            add_def(&mut builder, def).map_err(|e| SceneError::Object {
                index,
                reason: Box::new(e),
            })?;
        }

        Ok(builder.build())
    }

    /// The classic reference scene.
    pub fn reference() -> Result<Self> {
        Self::from_document(&SceneDocument::reference())
    }
}

fn add_def(builder: &mut SceneBuilder, def: &ObjectDef) -> Result<()> {
    let material = Material::from(&def.material);
    let name = def.name.clone();
    let shape: Shape = match &def.shape {
        ShapeDef::Sphere { center, radius } => Sphere::new(Point3::from(*center), *radius)?.into(),
        ShapeDef::Plane { corners } => {
            let [a, b, c, d] = corners.map(Point3::from);
            Quad::new(a, b, c, d)?.into()
        }
        ShapeDef::Cylinder {
            center,
            radius,
            height,
        } => Cylinder::new(Point3::from(*center), *radius, *height)?.into(),
        ShapeDef::Cone {
            center,
            radius,
            height,
        } => Cone::new(Point3::from(*center), *radius, *height)?.into(),
        ShapeDef::Cube { origin, size } => {
            for face in cube_faces(Point3::from(*origin), *size)? {
                builder.push(name.clone(), face.into(), material.clone())?;
            }
            return Ok(());
        }
    };
    builder.push(name, shape, material)?;
    Ok(())
}

/// Incremental construction of a [`Scene`].
#[derive(Debug, Clone)]
pub struct SceneBuilder {
    scene: Scene,
}

impl Default for SceneBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self {
            scene: Scene {
                objects: Vec::new(),
                light: Light::default(),
                background: colors::BLACK,
                fog: None,
                max_depth: MAX_STEPS,
            },
        }
    }

    /// Set the light.
    pub fn with_light(mut self, light: Light) -> Self {
        self.scene.light = light;
        self
    }

    /// Set the background colour.
    pub fn with_background(mut self, background: Color) -> Self {
        self.scene.background = background;
        self
    }

    /// Enable depth fog.
    pub fn with_fog(mut self, fog: Fog) -> Self {
        self.scene.fog = Some(fog);
        self
    }

    /// Set the recursion bound.
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.scene.max_depth = max_depth;
        self
    }

    /// Add an object.
    pub fn add(&mut self, shape: impl Into<Shape>, material: Material) -> Result<ObjectId> {
        self.push(None, shape.into(), material)
    }

    /// Add a labelled object.
    pub fn add_named(
        &mut self,
        name: impl Into<String>,
        shape: impl Into<Shape>,
        material: Material,
    ) -> Result<ObjectId> {
        self.push(Some(name.into()), shape.into(), material)
    }

    /// Add the six faces of an axis-aligned cube sharing one material.
    ///
    /// The cube spans `origin` to `origin + (size, size, -size)`; faces are
    /// added front, right, back, left, top, bottom.
    pub fn add_cube(&mut self, origin: Point3, size: f64, material: Material) -> Result<[ObjectId; 6]> {
        material.validate()?;
        let faces = cube_faces(origin, size)?;
        let first = self.scene.objects.len();
        for face in faces {
            self.push(None, face.into(), material.clone())?;
        }
        Ok(std::array::from_fn(|i| ObjectId(first + i)))
    }

    fn push(&mut self, name: Option<String>, shape: Shape, material: Material) -> Result<ObjectId> {
        material.validate()?;
        let id = ObjectId(self.scene.objects.len());
        log::debug!(
            "adding {} {}{}",
            shape.kind(),
            id,
            name.as_deref().map(|n| format!(" ({n})")).unwrap_or_default()
        );
        self.scene.objects.push(SceneObject {
            name,
            shape,
            material,
        });
        Ok(id)
    }

    /// Finish the scene.
    pub fn build(self) -> Scene {
        log::debug!("scene built with {} objects", self.scene.objects.len());
        self.scene
    }
}
