//! The recursive Whitted shader.

use crate::ray::{Ray, RayHit};
use crate::scene::{Scene, SceneObject};
use whitted_math::{reflect, refract, Color, Dir3, Point3};

/// Default recursion bound. Primary rays are traced at step 1 and
/// secondary rays are only spawned while `step < max_depth`.
pub const MAX_STEPS: u32 = 5;

/// Offset of the shadow-ray origin towards the light.
pub const SHADOW_EPSILON: f64 = 1e-3;

/// Colour seen along `ray`.
///
/// Shades the closest hit with the local lighting model and depth fog,
/// replaces the result by the dimmed base colour if the light is blocked,
/// then adds the reflected contribution, scales by the transparency and
/// adds the contribution refracted through the object. Rays that hit
/// nothing return the scene background.
pub fn trace(scene: &Scene, ray: &Ray, step: u32) -> Color {
    let Some(hit) = ray.closest_hit(scene) else {
        return scene.background;
    };
    let Some(object) = scene.object(hit.object) else {
        return scene.background;
    };
    let Some(dir) = Dir3::try_new(ray.direction, 1e-12) else {
        return scene.background;
    };

    let material = &object.material;
    let normal = object.shape.normal(&hit.point);
    let base = material.base_color(&hit.point);

    let mut color = match light_direction(scene, &hit.point) {
        Some((to_light, distance)) => {
            if in_shadow(scene, &hit.point, &to_light, distance) {
                base * material.shadow_factor
            } else {
                let view = Dir3::new_unchecked(-dir.into_inner());
                let lit = material.lighting(&base, &normal, &to_light, &view);
                match &scene.fog {
                    Some(fog) => fog.apply(&lit, hit.point.z),
                    None => lit,
                }
            }
        }
        // Light sits on the surface
        None => base * crate::AMBIENT,
    };

    if step >= scene.max_depth {
        return color;
    }

    if let Some(coeff) = material.reflection {
        let bounce = Ray::new(hit.point, reflect(dir.as_ref(), &normal));
        color += trace(scene, &bounce, step + 1) * coeff;
    }

    if let Some(coeff) = material.transparency {
        color *= 1.0 - coeff;
    }

    if let Some(refraction) = material.refraction {
        if let Some(through) = refract_through(scene, object, &hit, &dir, &normal, refraction.index, step) {
            color += through * refraction.coeff;
        }
    }

    color
}

/// Unit direction and distance from `p` to the light.
fn light_direction(scene: &Scene, p: &Point3) -> Option<(Dir3, f64)> {
    let (to_light, distance) = Dir3::try_new_and_get(scene.light.position - p, 1e-12)?;
    Some((to_light, distance))
}

/// Whether anything lies between `p` and the light.
fn in_shadow(scene: &Scene, p: &Point3, to_light: &Dir3, distance: f64) -> bool {
    let origin = p + to_light.as_ref() * SHADOW_EPSILON;
    let shadow = Ray::new(origin, to_light.into_inner());
    shadow
        .closest_hit(scene)
        .is_some_and(|h| h.t + SHADOW_EPSILON < distance)
}

/// Colour seen through `object`: bend into it at `hit`, find where the
/// internal ray leaves, bend back out and keep tracing.
///
/// Returns `None` on total internal reflection at either surface or when
/// the internal ray hits nothing.
fn refract_through(
    scene: &Scene,
    object: &SceneObject,
    hit: &RayHit,
    dir: &Dir3,
    normal: &Dir3,
    index: f64,
    step: u32,
) -> Option<Color> {
    let inside = refract(dir, normal, 1.0 / index)?;
    let internal = Ray::new(hit.point, inside.into_inner());
    let exit = internal.closest_hit(scene)?;

    // Normal of the entry object, flipped to face the inside
    let outward = object.shape.normal(&exit.point);
    let inward = Dir3::new_unchecked(-outward.into_inner());
    let out = refract(&inside, &inward, index)?;

    log::trace!("refracted ray leaves at {:?}", exit.point);
    Some(trace(scene, &Ray::new(exit.point, out.into_inner()), step + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Checker, Fog, Light, Material};
    use approx::assert_relative_eq;
    use whitted_geom::{Cone, Cylinder, Quad, Shape, Sphere};
    use whitted_math::Vec3;

    fn quad(corners: [[f64; 3]; 4]) -> Quad {
        let [a, b, c, d] = corners.map(Point3::from);
        Quad::new(a, b, c, d).unwrap()
    }

    #[test]
    fn test_miss_is_exact_black() {
        let scene = Scene::builder().build();
        let ray = Ray::new(Point3::origin(), Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(trace(&scene, &ray, 1), Color::zeros());

        let mut builder = Scene::builder();
        builder
            .add(Sphere::new(Point3::new(0.0, 0.0, 50.0), 5.0).unwrap(), Material::default())
            .unwrap();
        let scene = builder.build();
        assert_eq!(trace(&scene, &ray, 1), Color::zeros());
    }

    #[test]
    fn test_shadowed_floor_keeps_ambient_fraction() {
        let color = Color::new(0.5, 0.7, 0.9);
        let mut builder = Scene::builder().with_light(Light {
            position: Point3::new(0.0, 20.0, 0.0),
        });
        builder
            .add(
                quad([
                    [-50.0, -5.0, 50.0],
                    [50.0, -5.0, 50.0],
                    [50.0, -5.0, -50.0],
                    [-50.0, -5.0, -50.0],
                ]),
                Material::new(color).with_specular(false),
            )
            .unwrap();
        builder
            .add(Sphere::new(Point3::new(0.0, 5.0, 0.0), 2.0).unwrap(), Material::default())
            .unwrap();
        let scene = builder.build();

        // Hits the floor at (0, -5, 0), straight below the occluder
        let ray = Ray::new(Point3::new(0.0, 0.0, 20.0), Vec3::new(0.0, -5.0, -20.0));
        assert_eq!(trace(&scene, &ray, 1), color * 0.2);
    }

    fn floor_under_ball(floor: Material) -> Scene {
        let mut builder = Scene::builder().with_light(Light {
            position: Point3::new(0.0, 20.0, 0.0),
        });
        builder
            .add(
                quad([
                    [-50.0, -5.0, 50.0],
                    [50.0, -5.0, 50.0],
                    [50.0, -5.0, -50.0],
                    [-50.0, -5.0, -50.0],
                ]),
                floor,
            )
            .unwrap();
        builder
            .add(Sphere::new(Point3::new(0.0, 5.0, 0.0), 2.0).unwrap(), Material::default())
            .unwrap();
        builder.build()
    }

    #[test]
    fn test_shadow_factor_comes_from_receiver() {
        let ray = Ray::new(Point3::new(0.0, 0.0, 20.0), Vec3::new(0.0, -5.0, -20.0));

        let color = Color::new(0.5, 0.7, 0.9);
        let dim = floor_under_ball(Material::new(color).with_shadow_factor(0.6));
        assert_eq!(trace(&dim, &ray, 1), color * 0.6);

        // (0, -5, 0) lies on a tile with matching parities
        let checker = Checker::default();
        let checkered = floor_under_ball(Material::default().with_checker(checker));
        assert_eq!(trace(&checkered, &ray, 1), checker.even * 0.2);
    }

    #[test]
    fn test_unoccluded_floor_is_lit() {
        let color = Color::new(0.5, 0.5, 0.5);
        let mut builder = Scene::builder().with_light(Light {
            position: Point3::new(0.0, 20.0, 0.0),
        });
        builder
            .add(
                quad([
                    [-50.0, -5.0, 50.0],
                    [50.0, -5.0, 50.0],
                    [50.0, -5.0, -50.0],
                    [-50.0, -5.0, -50.0],
                ]),
                Material::new(color).with_specular(false),
            )
            .unwrap();
        let scene = builder.build();

        let ray = Ray::new(Point3::new(0.0, 0.0, 20.0), Vec3::new(0.0, -5.0, -20.0));
        assert_relative_eq!(trace(&scene, &ray, 1), color * 1.2, epsilon = 1e-12);
    }

    fn facing_mirrors(max_depth: u32) -> Scene {
        let mirror = Material::new(Color::new(0.1, 0.1, 0.1))
            .with_specular(false)
            .with_reflection(0.5);
        let mut builder = Scene::builder()
            .with_light(Light {
                position: Point3::origin(),
            })
            .with_max_depth(max_depth);
        // Both faces point at the light between them
        builder
            .add(
                quad([
                    [-5.0, -5.0, -10.0],
                    [5.0, -5.0, -10.0],
                    [5.0, 5.0, -10.0],
                    [-5.0, 5.0, -10.0],
                ]),
                mirror.clone(),
            )
            .unwrap();
        builder
            .add(
                quad([
                    [-5.0, -5.0, 10.0],
                    [-5.0, 5.0, 10.0],
                    [5.0, 5.0, 10.0],
                    [5.0, -5.0, 10.0],
                ]),
                mirror,
            )
            .unwrap();
        builder.build()
    }

    #[test]
    fn test_recursion_stops_at_max_depth() {
        let ray = Ray::new(Point3::origin(), Vec3::new(0.0, 0.0, -1.0));

        // Each level adds 0.1 * 1.2 scaled by 0.5 per bounce
        let five = trace(&facing_mirrors(MAX_STEPS), &ray, 1);
        assert_relative_eq!(five.x, 0.12 * 1.9375, epsilon = 1e-12);

        let two = trace(&facing_mirrors(2), &ray, 1);
        assert_relative_eq!(two.x, 0.18, epsilon = 1e-12);

        let one = trace(&facing_mirrors(1), &ray, 1);
        assert_relative_eq!(one.x, 0.12, epsilon = 1e-12);

        // Starting at the last step only shades locally
        let last = trace(&facing_mirrors(MAX_STEPS), &ray, MAX_STEPS);
        assert_relative_eq!(last.x, 0.12, epsilon = 1e-12);
    }

    fn ball_in_front_of_wall(material: Material) -> Scene {
        in_front_of_wall(Sphere::new(Point3::new(0.0, 0.0, -20.0), 5.0).unwrap(), material)
    }

    fn in_front_of_wall(shape: impl Into<Shape>, material: Material) -> Scene {
        let mut builder = Scene::builder().with_light(Light {
            position: Point3::new(0.0, 50.0, 0.0),
        });
        builder.add(shape, material).unwrap();
        builder
            .add(
                quad([
                    [-50.0, -50.0, -50.0],
                    [50.0, -50.0, -50.0],
                    [50.0, 50.0, -50.0],
                    [-50.0, 50.0, -50.0],
                ]),
                Material::new(Color::new(0.9, 0.9, 0.9)).with_specular(false),
            )
            .unwrap();
        builder.build()
    }

    #[test]
    fn test_transparency_scales_local_color() {
        let ray = Ray::new(Point3::origin(), Vec3::new(0.0, 0.0, -1.0));
        let base = Material::new(Color::new(0.2, 0.4, 1.0));

        let opaque = trace(&ball_in_front_of_wall(base.clone()), &ray, 1);
        let clear = trace(&ball_in_front_of_wall(base.with_transparency(0.3)), &ray, 1);
        assert_relative_eq!(clear, opaque * 0.7, epsilon = 1e-12);
    }

    #[test]
    fn test_unit_index_refraction_sees_straight_through() {
        let ray = Ray::new(Point3::origin(), Vec3::new(0.0, 0.0, -1.0));
        let base = Material::new(Color::new(0.0, 0.0, 1.0)).with_specular(false);

        let plain = trace(&ball_in_front_of_wall(base.clone()), &ray, 1);
        let glass_scene = ball_in_front_of_wall(base.with_refraction(0.8, 1.0));
        let glass = trace(&glass_scene, &ray, 1);

        // Exits at the back pole and continues to the wall
        let behind = Ray::new(Point3::new(0.0, 0.0, -25.0), Vec3::new(0.0, 0.0, -1.0));
        let wall = trace(&glass_scene, &behind, 2);
        assert!(wall.x > 0.0);
        assert_relative_eq!(glass, plain + wall * 0.8, epsilon = 1e-9);
    }

    #[test]
    fn test_unit_index_refraction_through_cylinder_and_cone() {
        let ray = Ray::new(Point3::origin(), Vec3::new(0.0, 0.0, -1.0));
        let base = Material::new(Color::new(1.0, 0.0, 0.0)).with_specular(false);

        // Both stand on y = -5 around the z = -20 axis; the ray crosses the
        // cylinder between z = -15 and -25 and the cone between -17.5 and -22.5
        let cylinder = Cylinder::new(Point3::new(0.0, -5.0, -20.0), 5.0, 10.0).unwrap();
        let cone = Cone::new(Point3::new(0.0, -5.0, -20.0), 5.0, 10.0).unwrap();

        for (shape, exit_z) in [(Shape::from(cylinder), -25.0), (Shape::from(cone), -22.5)] {
            let plain = trace(&in_front_of_wall(shape.clone(), base.clone()), &ray, 1);
            let glass_scene = in_front_of_wall(shape, base.clone().with_refraction(0.8, 1.0));
            let glass = trace(&glass_scene, &ray, 1);

            let behind = Ray::new(Point3::new(0.0, 0.0, exit_z), Vec3::new(0.0, 0.0, -1.0));
            let wall = trace(&glass_scene, &behind, 2);
            assert!(wall.y > 0.0);
            assert!(glass.y > plain.y);
            assert_relative_eq!(glass, plain + wall * 0.8, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_refraction_with_no_exit_adds_nothing() {
        let mut builder = Scene::builder();
        builder
            .add(
                quad([
                    [-5.0, -5.0, -10.0],
                    [5.0, -5.0, -10.0],
                    [5.0, 5.0, -10.0],
                    [-5.0, 5.0, -10.0],
                ]),
                Material::new(Color::new(0.3, 0.3, 0.3)).with_refraction(0.8, 1.5),
            )
            .unwrap();
        let glass = builder.build();

        let mut builder = Scene::builder();
        builder
            .add(
                quad([
                    [-5.0, -5.0, -10.0],
                    [5.0, -5.0, -10.0],
                    [5.0, 5.0, -10.0],
                    [-5.0, 5.0, -10.0],
                ]),
                Material::new(Color::new(0.3, 0.3, 0.3)),
            )
            .unwrap();
        let plain = builder.build();

        let ray = Ray::new(Point3::origin(), Vec3::new(0.1, 0.0, -1.0));
        assert_eq!(trace(&glass, &ray, 1), trace(&plain, &ray, 1));
    }

    #[test]
    fn test_fog_applies_to_lit_surfaces() {
        let color = Color::new(0.5, 0.5, 0.5);
        let mut builder = Scene::builder()
            .with_light(Light {
                position: Point3::origin(),
            })
            .with_fog(Fog::default());
        builder
            .add(
                quad([
                    [-50.0, -50.0, -110.0],
                    [50.0, -50.0, -110.0],
                    [50.0, 50.0, -110.0],
                    [-50.0, 50.0, -110.0],
                ]),
                Material::new(color).with_specular(false),
            )
            .unwrap();
        let scene = builder.build();

        // Halfway into the fog: 0.5 * 0.6 + 0.5 * 1.0
        let ray = Ray::new(Point3::origin(), Vec3::new(0.0, 0.0, -1.0));
        assert_relative_eq!(trace(&scene, &ray, 1), Color::new(0.8, 0.8, 0.8), epsilon = 1e-12);
    }

    #[test]
    fn test_trace_is_repeatable_and_leaves_scene_untouched() {
        let scene = crate::Scene::reference().unwrap();
        let before = scene.clone();
        let ray = Ray::new(Point3::origin(), Vec3::new(0.5, -7.5, -40.0));

        let first = trace(&scene, &ray, 1);
        let second = trace(&scene, &ray, 1);
        assert_eq!(first, second);
        assert_eq!(scene, before);
    }
}
