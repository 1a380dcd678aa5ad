//! Precondition failures surfaced by the synthesis core.
//!
//! Everything here is a configuration or programming error: nothing is
//! transient and nothing is retried.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SynthError {
  /// Sphere radius must span more than one voxel.
  #[error("sphere radius must be greater than 1 voxel, got {radius}")]
  RadiusTooSmall { radius: f64 },

  /// Ellipsoid semi-axes must be positive and finite.
  #[error("ellipsoid axes must be positive and finite, got major={major}, minor={minor}")]
  InvalidAxes { major: f64, minor: f64 },

  /// Plane normal that is zero or not finite.
  #[error("degenerate plane: normal {normal:?} does not define a plane")]
  DegeneratePlane { normal: [f64; 3] },

  /// Channels of a multi-channel stack disagree on shape.
  #[error("channel {channel} has shape {found:?}, expected {expected:?}")]
  ChannelShapeMismatch {
    channel: usize,
    expected: [usize; 3],
    found: [usize; 3],
  },

  /// A channel stack with no channels has no shape to slice.
  #[error("channel stack is empty")]
  EmptyChannelStack,

  /// Scene configuration rejected by `SceneConfig::validate`.
  #[error("invalid scene config: {field} = {value}")]
  InvalidConfig { field: &'static str, value: f64 },
}

pub type Result<T> = std::result::Result<T, SynthError>;
