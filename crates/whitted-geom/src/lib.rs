#![warn(missing_docs)]

//! Implicit primitive shapes for the whitted ray tracer.
//!
//! Four closed shapes are supported: spheres, bounded quadrilaterals,
//! and open y-aligned cylinders and cones. Each exposes its defining
//! parameters and an outward normal; the ray intersection routines live
//! in `whitted-trace`.

use thiserror::Error;
use whitted_math::{Dir3, Point3, Vec3};

/// Errors raised when constructing a shape from invalid parameters.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeomError {
    /// Radius was zero, negative, or not finite.
    #[error("radius must be positive, got {0}")]
    InvalidRadius(f64),
    /// Height was zero, negative, or not finite.
    #[error("height must be positive, got {0}")]
    InvalidHeight(f64),
    /// Edge length was zero, negative, or not finite.
    #[error("size must be positive, got {0}")]
    InvalidSize(f64),
    /// The quad corners do not span a plane.
    #[error("quad corners are collinear or coincident")]
    DegenerateQuad,
}

/// Result type for shape construction.
pub type Result<T> = std::result::Result<T, GeomError>;

fn check_radius(radius: f64) -> Result<f64> {
    if radius.is_finite() && radius > 0.0 {
        Ok(radius)
    } else {
        Err(GeomError::InvalidRadius(radius))
    }
}

fn check_height(height: f64) -> Result<f64> {
    if height.is_finite() && height > 0.0 {
        Ok(height)
    } else {
        Err(GeomError::InvalidHeight(height))
    }
}

/// Validate a cube edge length.
pub fn check_size(size: f64) -> Result<f64> {
    if size.is_finite() && size > 0.0 {
        Ok(size)
    } else {
        Err(GeomError::InvalidSize(size))
    }
}

/// The kind of a shape (for reporting and match-based dispatch).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    /// Sphere.
    Sphere,
    /// Bounded planar quadrilateral.
    Quad,
    /// Open cylinder.
    Cylinder,
    /// Open cone.
    Cone,
}

impl std::fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ShapeKind::Sphere => "sphere",
            ShapeKind::Quad => "plane",
            ShapeKind::Cylinder => "cylinder",
            ShapeKind::Cone => "cone",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Sphere
// =============================================================================

/// A sphere defined by center and radius.
#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    /// Center of the sphere.
    pub center: Point3,
    /// Radius of the sphere.
    pub radius: f64,
}

impl Sphere {
    /// Create a sphere. The radius must be positive.
    pub fn new(center: Point3, radius: f64) -> Result<Self> {
        Ok(Self {
            center,
            radius: check_radius(radius)?,
        })
    }

    /// Outward unit normal at `p`.
    pub fn normal(&self, p: &Point3) -> Dir3 {
        unit_or_up(p - self.center)
    }
}

// =============================================================================
// Quad
// =============================================================================

/// A bounded planar quadrilateral with corners `a, b, c, d` in order.
///
/// The face normal is `(c - b) × (a - b)`, so the winding of the corners
/// decides which side faces outward.
#[derive(Debug, Clone, PartialEq)]
pub struct Quad {
    /// Corners in winding order.
    pub corners: [Point3; 4],
    normal: Dir3,
}

impl Quad {
    /// Create a quad from four coplanar corners.
    ///
    /// Fails if `a`, `b`, `c` do not span a plane.
    pub fn new(a: Point3, b: Point3, c: Point3, d: Point3) -> Result<Self> {
        let n = (c - b).cross(&(a - b));
        let normal = Dir3::try_new(n, 1e-12).ok_or(GeomError::DegenerateQuad)?;
        Ok(Self {
            corners: [a, b, c, d],
            normal,
        })
    }

    /// The constant face normal.
    pub fn normal(&self) -> Dir3 {
        self.normal
    }

    /// Test whether a point on the supporting plane lies strictly inside
    /// the quad.
    ///
    /// Every edge cross product `(next - corner) × (p - corner)` projected on
    /// the normal must share one strict sign. Points on an edge are outside.
    pub fn contains(&self, p: &Point3) -> bool {
        let n = self.normal.as_ref();
        let mut positive = 0;
        let mut negative = 0;
        for i in 0..4 {
            let corner = self.corners[i];
            let next = self.corners[(i + 1) % 4];
            let k = (next - corner).cross(&(p - corner)).dot(n);
            if k > 0.0 {
                positive += 1;
            } else if k < 0.0 {
                negative += 1;
            }
        }
        positive == 4 || negative == 4
    }
}

/// The six outward-facing quads of an axis-aligned cube.
///
/// `origin` is the front-bottom-left corner; the cube extends along `+x`,
/// `+y` and `-z`. Faces come back as front, right, back, left, top, bottom.
pub fn cube_faces(origin: Point3, size: f64) -> Result<[Quad; 6]> {
    let l = check_size(size)?;
    let (x, y, z) = (origin.x, origin.y, origin.z);

    let a = Point3::new(x, y, z);
    let b = Point3::new(x + l, y, z);
    let c = Point3::new(x + l, y + l, z);
    let d = Point3::new(x, y + l, z);
    let e = Point3::new(x + l, y, z - l);
    let f = Point3::new(x + l, y + l, z - l);
    let g = Point3::new(x, y + l, z - l);
    let h = Point3::new(x, y, z - l);

    Ok([
        Quad::new(a, b, c, d)?,
        Quad::new(b, e, f, c)?,
        Quad::new(e, h, g, f)?,
        Quad::new(d, g, h, a)?,
        Quad::new(d, c, f, g)?,
        Quad::new(h, e, b, a)?,
    ])
}

// =============================================================================
// Cylinder
// =============================================================================

/// An open cylinder with a vertical axis through `center`, spanning
/// `y ∈ [center.y, center.y + height]`. No end caps.
#[derive(Debug, Clone, PartialEq)]
pub struct Cylinder {
    /// Center of the base circle.
    pub center: Point3,
    /// Radius of the cylinder.
    pub radius: f64,
    /// Height above the base.
    pub height: f64,
}

impl Cylinder {
    /// Create a cylinder. Radius and height must be positive.
    pub fn new(center: Point3, radius: f64, height: f64) -> Result<Self> {
        Ok(Self {
            center,
            radius: check_radius(radius)?,
            height: check_height(height)?,
        })
    }

    /// Whether `y` lies within the finite extent (inclusive).
    pub fn spans(&self, y: f64) -> bool {
        y >= self.center.y && y <= self.center.y + self.height
    }

    /// Horizontal outward normal at `p`.
    pub fn normal(&self, p: &Point3) -> Dir3 {
        let d = p - self.center;
        unit_or_up(Vec3::new(d.x, 0.0, d.z))
    }
}

// =============================================================================
// Cone
// =============================================================================

/// An open cone with base circle at `center`, apex at
/// `center + (0, height, 0)`. No base cap.
#[derive(Debug, Clone, PartialEq)]
pub struct Cone {
    /// Center of the base circle.
    pub center: Point3,
    /// Radius of the base circle.
    pub radius: f64,
    /// Height of the apex above the base.
    pub height: f64,
}

impl Cone {
    /// Create a cone. Radius and height must be positive.
    pub fn new(center: Point3, radius: f64, height: f64) -> Result<Self> {
        Ok(Self {
            center,
            radius: check_radius(radius)?,
            height: check_height(height)?,
        })
    }

    /// Ratio `radius / height`, the slope of the lateral surface.
    pub fn slope(&self) -> f64 {
        self.radius / self.height
    }

    /// Whether `y` lies within the finite extent (inclusive).
    pub fn spans(&self, y: f64) -> bool {
        y >= self.center.y && y <= self.center.y + self.height
    }

    /// Outward normal at `p`, tilted upward by the slope of the side.
    pub fn normal(&self, p: &Point3) -> Dir3 {
        let d = p - self.center;
        let r = (d.x * d.x + d.z * d.z).sqrt();
        unit_or_up(Vec3::new(d.x, r * self.slope(), d.z))
    }
}

// =============================================================================
// Shape
// =============================================================================

/// Any primitive the tracer can intersect.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Sphere.
    Sphere(Sphere),
    /// Bounded quadrilateral.
    Quad(Quad),
    /// Open cylinder.
    Cylinder(Cylinder),
    /// Open cone.
    Cone(Cone),
}

impl Shape {
    /// The kind of this shape.
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Sphere(_) => ShapeKind::Sphere,
            Shape::Quad(_) => ShapeKind::Quad,
            Shape::Cylinder(_) => ShapeKind::Cylinder,
            Shape::Cone(_) => ShapeKind::Cone,
        }
    }

    /// Unit normal at `p`. `p` is assumed to lie on the surface.
    pub fn normal(&self, p: &Point3) -> Dir3 {
        match self {
            Shape::Sphere(s) => s.normal(p),
            Shape::Quad(q) => q.normal(),
            Shape::Cylinder(c) => c.normal(p),
            Shape::Cone(c) => c.normal(p),
        }
    }
}

impl From<Sphere> for Shape {
    fn from(s: Sphere) -> Self {
        Shape::Sphere(s)
    }
}

impl From<Quad> for Shape {
    fn from(q: Quad) -> Self {
        Shape::Quad(q)
    }
}

impl From<Cylinder> for Shape {
    fn from(c: Cylinder) -> Self {
        Shape::Cylinder(c)
    }
}

impl From<Cone> for Shape {
    fn from(c: Cone) -> Self {
        Shape::Cone(c)
    }
}

/// Normalize `v`, falling back to +Y for a zero vector (a point on an axis).
fn unit_or_up(v: Vec3) -> Dir3 {
    Dir3::try_new(v, 1e-12).unwrap_or_else(Vec3::y_axis)
}
