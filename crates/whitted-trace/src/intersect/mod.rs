//! Ray-shape intersection algorithms.
//!
//! Each primitive has a dedicated intersector returning the distance `t`
//! to the hit it reports, or `None` for a miss. Grazing hits (near-zero
//! discriminant) are misses for every quadratic shape.

mod cone;
mod cylinder;
mod plane;
mod sphere;

pub use cone::intersect_cone;
pub use cylinder::intersect_cylinder;
pub use plane::intersect_plane;
pub use sphere::intersect_sphere;

use crate::Ray;
use whitted_geom::Shape;
use whitted_math::Tolerance;

/// Tolerances shared by all intersectors.
pub const TOLERANCE: Tolerance = Tolerance::DEFAULT;

/// Intersect a ray with any shape.
///
/// This dispatches to the appropriate intersector based on shape type.
pub fn intersect_shape(ray: &Ray, shape: &Shape) -> Option<f64> {
    match shape {
        Shape::Sphere(s) => intersect_sphere(ray, s),
        Shape::Quad(q) => intersect_plane(ray, q),
        Shape::Cylinder(c) => intersect_cylinder(ray, c),
        Shape::Cone(c) => intersect_cone(ray, c),
    }
}

/// Pick between the sorted roots of a y-clipped quadric.
///
/// Roots behind the origin or within the surface tolerance of it are
/// skipped, so a ray leaving the surface finds the far wall. Of the rest,
/// the nearer root whose height is inside the extent wins.
fn first_root_within(ray: &Ray, (t1, t2): (f64, f64), spans: impl Fn(f64) -> bool) -> Option<f64> {
    [t1, t2]
        .into_iter()
        .filter(|&t| t >= TOLERANCE.surface)
        .find(|&t| spans(ray.origin.y + ray.direction.y * t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use whitted_geom::{Cone, Cylinder, Quad, Sphere};
    use whitted_math::{Point3, Vec3};

    #[test]
    fn test_dispatch_matches_direct_calls() {
        let ray = Ray::new(Point3::origin(), Vec3::new(0.0, 0.0, -1.0));

        let sphere = Sphere::new(Point3::new(0.0, 0.0, -10.0), 5.0).unwrap();
        assert_eq!(
            intersect_shape(&ray, &Shape::Sphere(sphere.clone())),
            intersect_sphere(&ray, &sphere)
        );

        let quad = Quad::new(
            Point3::new(-1.0, -1.0, -3.0),
            Point3::new(1.0, -1.0, -3.0),
            Point3::new(1.0, 1.0, -3.0),
            Point3::new(-1.0, 1.0, -3.0),
        )
        .unwrap();
        assert_eq!(intersect_shape(&ray, &quad.clone().into()), intersect_plane(&ray, &quad));

        let cyl = Cylinder::new(Point3::new(0.0, -1.0, -10.0), 2.0, 2.0).unwrap();
        assert_eq!(intersect_shape(&ray, &cyl.clone().into()), intersect_cylinder(&ray, &cyl));

        let cone = Cone::new(Point3::new(0.0, -1.0, -10.0), 2.0, 4.0).unwrap();
        assert_eq!(intersect_shape(&ray, &cone.clone().into()), intersect_cone(&ray, &cone));
    }

    #[test]
    fn test_first_root_within_prefers_near_root() {
        let ray = Ray::new(Point3::origin(), Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(first_root_within(&ray, (2.0, 5.0), |y| y <= 10.0), Some(2.0));
        assert_eq!(first_root_within(&ray, (2.0, 5.0), |y| y >= 4.0), Some(5.0));
        assert_eq!(first_root_within(&ray, (2.0, 5.0), |y| y > 10.0), None);
        // Near root behind the origin or at it: the far root is used
        assert_eq!(first_root_within(&ray, (-2.0, 5.0), |_| true), Some(5.0));
        assert_eq!(first_root_within(&ray, (1e-9, 5.0), |_| true), Some(5.0));
        assert_eq!(first_root_within(&ray, (-5.0, -2.0), |_| true), None);
    }
}
