//! voxel_modalities - Turning synthetic label grids into imaging modalities
//!
//! These are the collaborators around `voxel_synth`: they take a class map
//! and produce what an instrument would record.
//!
//! ```text
//! ClassMap ──► blur_it ──► ProbabilityVolume ──► weighted_map ──► channels
//!                                 (C × N³)        (× CompositeActions)
//!                                                          │
//!                                           add_noise ◄────┘
//!                                               │
//!                                            pyramid ──► levels
//! ```
//!
//! # Example
//!
//! ```ignore
//! use voxel_modalities::{blur_it, composite_actions, weighted_map};
//!
//! let probs = blur_it(&grids.class_map, 0.5);
//! let actions = composite_actions("VEQF", &["Si", "Al", "K"])?;
//! let tomography = weighted_map(&probs, &actions.tomography)?;
//! ```

pub mod blur;
pub mod error;
pub mod materials;
pub mod noise;
pub mod pyramid;
pub mod stack;
pub mod weighted;

pub use blur::{blur_classes, blur_it, gaussian_filter, one_hot, renormalize};
pub use error::{ModalityError, Result};
pub use materials::{composite_actions, find_composite, find_material, Composite, CompositeActions, Material};
pub use noise::{add_noise, noise};
pub use pyramid::{downsample, pyramid, DEFAULT_FACTOR};
pub use stack::{ChannelStack, ProbabilityVolume};
pub use weighted::{weighted_map, ActionMatrix};
