//! # Mesh Kit
//!
//! Procedural construction and processing of indexed triangle meshes.
//!
//! ## Architecture
//!
//! ```text
//! shape parameters → MeshBuilder ─┬→ MeshGeometry3D → simplify / helpers
//!                                 └→ triangulate (polygon faces)
//! ```
//!
//! ## Modules
//!
//! - **builder**: [`MeshBuilder`] and its shape generators
//! - **triangulate**: sweep-line monotone decomposition and ear clipping
//! - **simplify**: quadric-error edge collapse
//! - **helpers**: normals, tangents, edges, borders, validation, plane cuts
//! - **vector**: small vector utilities over [`glam`] types
//!
//! ## Usage
//!
//! ```rust
//! use mesh_kit::{BoxFaces, MeshBuilder, Point3};
//!
//! let mut builder = MeshBuilder::new(true, true, false);
//! builder.add_box(Point3::ZERO, 1.0, 2.0, 3.0, BoxFaces::ALL);
//! builder.add_sphere(Point3::new(0.0, 0.0, 3.0), 0.5, 16, 8);
//!
//! let mesh = builder.to_mesh();
//! assert_eq!(mesh.normals.len(), mesh.positions.len());
//! assert!(mesh_kit::helpers::validate(&mesh).is_ok());
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod helpers;
pub mod mesh;
pub mod polygon;
pub mod simplify;
pub mod triangulate;
pub mod vector;

pub use crate::builder::{BoxFaces, MeshBuilder, TubeOptions};
pub use crate::config::BuilderConfig;
pub use crate::error::{MeshError, MeshResult};
pub use crate::mesh::{BoundingBox, MeshGeometry3D};
pub use crate::polygon::{Polygon, Polygon3D, PolygonWithHoles};
pub use crate::simplify::{simplify, MeshSimplifier, SimplifyOptions, SimplifyStats};
pub use crate::vector::{Point2, Point3, Vector3};
