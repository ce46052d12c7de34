//! Ray-sphere intersection (quadratic equation).

use super::TOLERANCE;
use crate::Ray;
use whitted_geom::Sphere;
use whitted_math::solve_quadratic;

/// Intersect a ray with a sphere.
///
/// Solves `|o + t*d - c|^2 = r^2`. Grazing hits are misses, and roots
/// within the surface tolerance of the origin are discarded so a ray
/// leaving the surface does not hit it again at `t ≈ 0`. Returns the
/// smaller remaining positive root.
pub fn intersect_sphere(ray: &Ray, sphere: &Sphere) -> Option<f64> {
    let oc = ray.origin - sphere.center;
    let d = &ray.direction;

    // Quadratic: |oc + t*d|^2 = r^2
    let a = d.dot(d);
    let b = 2.0 * oc.dot(d);
    let c = oc.dot(&oc) - sphere.radius * sphere.radius;

    let (t1, t2) = solve_quadratic(a, b, c, &TOLERANCE)?;

    [t1, t2]
        .into_iter()
        .find(|&t| t > 0.0 && t.abs() >= TOLERANCE.surface)
}
