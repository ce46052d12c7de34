//! Ray-cylinder intersection (quadratic equation).

use super::{first_root_within, TOLERANCE};
use crate::Ray;
use whitted_geom::Cylinder;
use whitted_math::solve_quadratic;

/// Intersect a ray with an open, y-aligned cylinder.
///
/// The infinite lateral surface is solved in the xz-plane; the height
/// range `[center.y, center.y + height]` is applied afterwards to the
/// sorted roots. A ray parallel to the axis never hits.
pub fn intersect_cylinder(ray: &Ray, cylinder: &Cylinder) -> Option<f64> {
    let d = &ray.direction;
    let s = ray.origin - cylinder.center;

    // |s_xz + t*d_xz|^2 = r^2
    let a = d.x * d.x + d.z * d.z;
    let b = 2.0 * (d.x * s.x + d.z * s.z);
    let c = s.x * s.x + s.z * s.z - cylinder.radius * cylinder.radius;

    let roots = solve_quadratic(a, b, c, &TOLERANCE)?;
    first_root_within(ray, roots, |y| cylinder.spans(y))
}
