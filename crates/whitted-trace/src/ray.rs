//! Ray representation and the nearest-hit query.

use crate::intersect::intersect_shape;
use crate::scene::{ObjectId, Scene};
use whitted_math::{Point3, Vec3};

/// A ray in 3D space defined by origin and direction.
///
/// The direction is not normalized; every distance reported for this ray
/// is the parameter `t` of `origin + t * direction`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Origin point of the ray.
    pub origin: Point3,
    /// Direction of the ray (any non-zero length).
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray from origin and direction.
    pub fn new(origin: Point3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Evaluate the ray at parameter `t`: `origin + t * direction`.
    #[inline]
    pub fn at(&self, t: f64) -> Point3 {
        self.origin + t * self.direction
    }

    /// Find the nearest object hit by this ray.
    ///
    /// Objects are scanned in scene order and a hit replaces the current
    /// best only if it is strictly closer, so the lower index wins exact
    /// ties. Returns `None` when nothing lies in front of the origin.
    pub fn closest_hit(&self, scene: &Scene) -> Option<RayHit> {
        let mut best: Option<RayHit> = None;
        let mut t_min = f64::INFINITY;

        for (id, object) in scene.iter() {
            let Some(t) = intersect_shape(self, &object.shape) else {
                continue;
            };
            if t > 0.0 && t < t_min {
                t_min = t;
                best = Some(RayHit {
                    t,
                    point: self.at(t),
                    object: id,
                });
            }
        }

        best
    }
}

/// Result of the nearest-hit query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Parameter along the ray where the hit occurs.
    pub t: f64,
    /// 3D intersection point.
    pub point: Point3,
    /// Object that was hit.
    pub object: ObjectId,
}
