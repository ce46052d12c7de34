#![warn(missing_docs)]

//! Math types for the whitted ray tracer.
//!
//! Thin wrappers around nalgebra providing the vector, point and colour
//! types used by the tracer, mirror/refraction helpers, and the
//! tolerance constants shared by every intersector.

use nalgebra::{Unit, Vector3};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A unit (normalized) direction vector in 3D space.
pub type Dir3 = Unit<Vector3<f64>>;

/// Linear RGB colour. Components are nominally in `[0, 1]` but are never
/// clamped until the framebuffer converts to 8-bit.
pub type Color = Vector3<f64>;

/// Common colours.
pub mod colors {
    use super::Color;

    /// `(0, 0, 0)`
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);
    /// `(1, 1, 1)`
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);
}

/// Mirror `incident` about `normal`.
///
/// `normal` must be unit length; `incident` may have any length and the
/// result keeps it.
#[inline]
pub fn reflect(incident: &Vec3, normal: &Dir3) -> Vec3 {
    let n = normal.as_ref();
    incident - 2.0 * n.dot(incident) * n
}

/// Bend `incident` through a surface with the given `normal` and ratio of
/// refractive indices `eta = n1 / n2`.
///
/// Both vectors are expected to be unit length. Returns `None` on total
/// internal reflection.
#[inline]
pub fn refract(incident: &Dir3, normal: &Dir3, eta: f64) -> Option<Dir3> {
    let i = incident.as_ref();
    let n = normal.as_ref();
    let cos_i = n.dot(i);
    let k = 1.0 - eta * eta * (1.0 - cos_i * cos_i);
    if k < 0.0 {
        return None;
    }
    let t = eta * i - (eta * cos_i + k.sqrt()) * n;
    Unit::try_new(t, 1e-12)
}

/// Tolerance constants for intersection tests.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Quadratic discriminants closer to zero than this are grazing hits
    /// and count as misses.
    pub discriminant: f64,
    /// Roots closer to the ray origin than this are treated as the surface
    /// the ray started on.
    pub surface: f64,
    /// `|direction · normal|` below this means the ray runs parallel to a quad.
    pub parallel: f64,
    /// Quadratic leading coefficients below this are degenerate.
    pub degenerate: f64,
}

impl Tolerance {
    /// Default tracer tolerances.
    pub const DEFAULT: Self = Self {
        discriminant: 1e-3,
        surface: 1e-3,
        parallel: 1e-4,
        degenerate: 1e-12,
    };

    /// Check if a discriminant is negative or too close to zero to trust.
    pub fn is_grazing(&self, discriminant: f64) -> bool {
        discriminant < 0.0 || discriminant.abs() < self.discriminant
    }

    /// Check if a quadratic leading coefficient is effectively zero.
    pub fn is_degenerate(&self, a: f64) -> bool {
        a.abs() < self.degenerate
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Real roots of `a·t² + b·t + c = 0`, sorted ascending.
///
/// Returns `None` for a degenerate leading coefficient or a grazing /
/// negative discriminant.
pub fn solve_quadratic(a: f64, b: f64, c: f64, tol: &Tolerance) -> Option<(f64, f64)> {
    if tol.is_degenerate(a) {
        return None;
    }
    let discriminant = b * b - 4.0 * a * c;
    if tol.is_grazing(discriminant) {
        return None;
    }
    let sqrt_disc = discriminant.sqrt();
    let t1 = (-b - sqrt_disc) / (2.0 * a);
    let t2 = (-b + sqrt_disc) / (2.0 * a);
    Some(if t1 <= t2 { (t1, t2) } else { (t2, t1) })
}
