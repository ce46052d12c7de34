#![warn(missing_docs)]

//! Recursive Whitted-style ray tracing over implicit primitives.
//!
//! A [`Scene`] is an arena of objects (a [`Shape`] plus a [`Material`]),
//! one point light, and a few global settings. [`trace`] follows a ray
//! into the scene, shades the closest hit with ambient, diffuse and
//! specular terms, tests a shadow ray, and recurses for reflection and
//! refraction up to a fixed depth.
//!
//! # Architecture
//!
//! - [`Ray`] - Ray representation and the nearest-hit query
//! - [`intersect`] - Ray-shape intersection for each primitive
//! - [`Material`] - Optical attributes and the local lighting model
//! - [`Scene`] / [`SceneBuilder`] - Object arena addressed by [`ObjectId`]
//! - [`trace`] - The recursive shader
//! - [`Camera`] / [`render`] - Pixel-grid walk into a [`Framebuffer`]
//!
//! # Example
//!
//! ```ignore
//! use whitted_trace::{trace, Material, Ray, Scene, MAX_STEPS};
//! use whitted_geom::Sphere;
//! use whitted_math::{Point3, Vec3};
//!
//! let mut builder = Scene::builder();
//! builder.add(Sphere::new(Point3::new(0.0, 0.0, -10.0), 5.0)?, Material::default())?;
//! let scene = builder.build();
//!
//! let ray = Ray::new(Point3::origin(), Vec3::new(0.0, 0.0, -1.0));
//! let color = trace(&scene, &ray, 1);
//! ```

mod camera;
mod error;
pub mod intersect;
mod material;
mod ray;
mod render;
mod scene;
mod shade;

pub use camera::Camera;
pub use error::{Result, SceneError};
pub use material::{Checker, Material, Refraction, AMBIENT};
pub use ray::{Ray, RayHit};
pub use render::{render, Framebuffer};
pub use scene::{Fog, Light, ObjectId, Scene, SceneBuilder, SceneObject};
pub use shade::{trace, MAX_STEPS, SHADOW_EPSILON};

pub use whitted_geom::{Cone, Cylinder, Quad, Shape, ShapeKind, Sphere};
