//! Ray-quad intersection (closed-form plane hit plus inside test).

use super::TOLERANCE;
use crate::Ray;
use whitted_geom::Quad;

/// Intersect a ray with a bounded quadrilateral.
///
/// Returns `None` if the ray is parallel to the supporting plane, meets it
/// at or behind the origin, or meets it outside the four corners.
pub fn intersect_plane(ray: &Ray, quad: &Quad) -> Option<f64> {
    let normal = quad.normal();
    let denom = ray.direction.dot(normal.as_ref());

    // Ray is parallel to plane
    if denom.abs() < TOLERANCE.parallel {
        return None;
    }

    let t = (quad.corners[0] - ray.origin).dot(normal.as_ref()) / denom;

    // Intersection is behind (or on) the ray origin
    if t < TOLERANCE.surface {
        return None;
    }

    quad.contains(&ray.at(t)).then_some(t)
}
