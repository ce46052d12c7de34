//! Pinhole camera over a square grid of image-plane cells.

use crate::error::{Result, SceneError};
use crate::ray::Ray;
use crate::scene::Scene;
use crate::shade::trace;
use whitted_ir::SceneDocument;
use whitted_math::{Color, Point3, Vec3};

/// Sub-cell offsets of the four supersamples.
const SAMPLE_OFFSETS: [(f64, f64); 4] = [(0.25, 0.25), (0.25, 0.75), (0.75, 0.25), (0.75, 0.75)];

/// Eye looking down `-z` at an image plane `distance` away.
///
/// The plane is `width x height` world units, centred on the view axis and
/// divided into `resolution x resolution` cells. Cell `(0, 0)` is the
/// bottom-left one.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Eye position.
    pub eye: Point3,
    /// Image-plane width.
    pub width: f64,
    /// Image-plane height.
    pub height: f64,
    /// Eye to image-plane distance.
    pub distance: f64,
    /// Cells per side.
    pub resolution: u32,
    /// Average four rays per cell.
    pub antialias: bool,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Point3::origin(),
            width: 20.0,
            height: 20.0,
            distance: 40.0,
            resolution: 500,
            antialias: false,
        }
    }
}

impl Camera {
    /// Camera described by a scene document.
    pub fn from_document(doc: &SceneDocument) -> Result<Self> {
        let def = &doc.camera;
        let camera = Self {
            eye: Point3::from(def.eye),
            width: def.width,
            height: def.height,
            distance: def.distance,
            resolution: def.resolution,
            antialias: doc.render.antialias,
        };
        camera.validate()?;
        Ok(camera)
    }

    /// Check that the camera can produce an image.
    pub fn validate(&self) -> Result<()> {
        if self.resolution == 0 {
            return Err(SceneError::InvalidCamera("resolution must be at least 1".into()));
        }
        for (name, value) in [
            ("width", self.width),
            ("height", self.height),
            ("distance", self.distance),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(SceneError::InvalidCamera(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// World size of one cell.
    pub fn cell_size(&self) -> (f64, f64) {
        let n = f64::from(self.resolution);
        (self.width / n, self.height / n)
    }

    /// Ray through image-plane offset `(u, v)` of cell `(i, j)`, both in
    /// `[0, 1]`.
    fn ray_through(&self, i: u32, j: u32, u: f64, v: f64) -> Ray {
        let (cw, ch) = self.cell_size();
        let xp = -self.width / 2.0 + f64::from(i) * cw;
        let yp = -self.height / 2.0 + f64::from(j) * ch;
        Ray::new(self.eye, Vec3::new(xp + u * cw, yp + v * ch, -self.distance))
    }

    /// Ray through the centre of cell `(i, j)`.
    pub fn primary_ray(&self, i: u32, j: u32) -> Ray {
        self.ray_through(i, j, 0.5, 0.5)
    }

    /// The four supersample rays of cell `(i, j)`.
    pub fn sample_rays(&self, i: u32, j: u32) -> [Ray; 4] {
        SAMPLE_OFFSETS.map(|(u, v)| self.ray_through(i, j, u, v))
    }

    /// Colour of cell `(i, j)`.
    pub fn shade_cell(&self, scene: &Scene, i: u32, j: u32) -> Color {
        if self.antialias {
            let sum: Color = self
                .sample_rays(i, j)
                .iter()
                .map(|ray| trace(scene, ray, 1))
                .sum();
            sum / SAMPLE_OFFSETS.len() as f64
        } else {
            trace(scene, &self.primary_ray(i, j), 1)
        }
    }
}
