//! voxel_synth - Procedural labeled volumes for imaging-pipeline tests
//!
//! This crate synthesizes co-registered density, class and instance grids
//! from a blue-noise arrangement of spheres and ellipsoids, perturbs the
//! arrangement reproducibly, and cuts oblique slices out of the result.
//!
//! ```text
//! ┌──────────────┐     ┌───────────┐     ┌──────────────┐     ┌─────────────┐
//! │ Poisson disk ├────►│ Instances ├────►│ Rasterize +  ├────►│ GridTriple  │
//! │   sampling   │     │  (Scene)  │     │  composite   │     │ vol/cls/ins │
//! └──────────────┘     └─────▲─────┘     └──────────────┘     └──────┬──────┘
//!                            │                                       │
//!                     shake/cut/erase                         PlaneSlicer
//!                         reset                               (2D images)
//! ```
//!
//! # Features
//!
//! - **Blue-noise placement**: Bridson Poisson-disk sampling with border
//!   rejection
//! - **Deterministic compositing**: last-writer-wins foreground, then a
//!   fill-only-if-empty matrix pass
//! - **Perturbation with rollback**: displacement and dropout overlays that
//!   never touch instance identity
//! - **Oblique slicing**: plane resampling with multilinear interpolation
//!
//! # Example
//!
//! ```ignore
//! use voxel_synth::{Scene, SceneConfig, PlaneSlicer};
//! use glam::DVec3;
//!
//! let config = SceneConfig::default().with_size(32).with_border(5.0);
//! let scene = Scene::from_seed(config, Some(42))?;
//! let grids = scene.fill()?;
//!
//! let slicer = PlaneSlicer::new(32, 1.0);
//! let image = slicer.slice(DVec3::X, DVec3::splat(16.0), &grids.instance_map)?;
//! println!("{}", voxel_synth::ascii::render(&image));
//! ```

pub mod ascii;
pub mod error;
pub mod grid;
pub mod sampling;
pub mod shape;
pub mod types;

pub mod scene;
pub mod slicer;

// Re-export commonly used items
pub use error::{Result, SynthError};
pub use grid::{coord_to_index, index_to_coord, Grid2, Grid3};
pub use sampling::{poisson_disk, sample_positions};
pub use shape::{random_rotation, Shape, ShapeKind, VoxelMask};
pub use types::{ClassLabel, GridTriple, SceneConfig, FIRST_INSTANCE_LABEL, MATRIX_INSTANCE_LABEL};

pub use scene::{Cut, Instance, Perturbation, Scene};
pub use slicer::{Interpolation, Plane, PlaneSlicer};
