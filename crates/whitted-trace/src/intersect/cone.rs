//! Ray-cone intersection (quadratic equation).

use super::{first_root_within, TOLERANCE};
use crate::Ray;
use whitted_geom::Cone;
use whitted_math::solve_quadratic;

/// Intersect a ray with an open, y-aligned cone.
///
/// The lateral surface satisfies `(x - cx)² + (z - cz)² = k·(h - (y - cy))²`
/// with `k = (radius / height)²`. That equation also describes the mirrored
/// nappe above the apex, which the height clip removes.
pub fn intersect_cone(ray: &Ray, cone: &Cone) -> Option<f64> {
    let d = &ray.direction;
    let s = ray.origin - cone.center;
    let k = cone.slope() * cone.slope();

    // Height left to the apex, measured from the ray origin
    let ycoord = cone.height - s.y;

    let a = d.x * d.x + d.z * d.z - k * d.y * d.y;
    let b = 2.0 * (s.x * d.x + s.z * d.z + k * ycoord * d.y);
    let c = s.x * s.x + s.z * s.z - k * ycoord * ycoord;

    let roots = solve_quadratic(a, b, c, &TOLERANCE)?;
    first_root_within(ray, roots, |y| cone.spans(y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use whitted_math::{Point3, Vec3};

    fn spire() -> Cone {
        // Slope 0.5: radius 2.5 at y = 0
        Cone::new(Point3::new(0.0, -5.0, -10.0), 5.0, 10.0).unwrap()
    }

    #[test]
    fn test_ray_cone_side() {
        let ray = Ray::new(Point3::origin(), Vec3::new(0.0, 0.0, -1.0));
        let t = intersect_cone(&ray, &spire()).unwrap();
        assert!((t - 7.5).abs() < 1e-10);

        let p = ray.at(t);
        let n = spire().normal(&p);
        assert!(n.z > 0.0);
        assert!(n.y > 0.0);
        assert!(n.x.abs() < 1e-10);
    }

    #[test]
    fn test_ray_cone_above_apex_is_miss() {
        // Meets the mirrored nappe only
        let ray = Ray::new(Point3::new(0.0, 8.0, 0.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(intersect_cone(&ray, &spire()).is_none());
    }

    #[test]
    fn test_ray_cone_below_base_is_miss() {
        let ray = Ray::new(Point3::new(0.0, -6.0, 0.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(intersect_cone(&ray, &spire()).is_none());
    }

    #[test]
    fn test_ray_cone_down_axis_is_grazing() {
        let ray = Ray::new(Point3::new(0.0, 20.0, -10.0), Vec3::new(0.0, -1.0, 0.0));
        assert!(intersect_cone(&ray, &spire()).is_none());
    }

    #[test]
    fn test_ray_cone_from_surface_finds_far_side() {
        let ray = Ray::new(Point3::new(0.0, 0.0, -7.5), Vec3::new(0.0, 0.0, -1.0));
        let t = intersect_cone(&ray, &spire()).unwrap();
        assert!((t - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_ray_cone_behind() {
        let ray = Ray::new(Point3::origin(), Vec3::new(0.0, 0.0, 1.0));
        assert!(intersect_cone(&ray, &spire()).is_none());
    }

    #[test]
    fn test_hits_lie_on_lateral_surface() {
        let cone = spire();
        for i in 0..30 {
            let dx = i as f64 * 0.02 - 0.3;
            let ray = Ray::new(Point3::new(0.0, -2.0, 0.0), Vec3::new(dx, 0.1, -1.0));
            if let Some(t) = intersect_cone(&ray, &cone) {
                let p = ray.at(t);
                assert!(cone.spans(p.y));
                let r = ((p.x - cone.center.x).powi(2) + (p.z - cone.center.z).powi(2)).sqrt();
                let expected = cone.slope() * (cone.height - (p.y - cone.center.y));
                assert!((r - expected).abs() < 1e-6);
            }
        }
    }
}
