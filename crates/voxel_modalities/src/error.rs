//! Errors for the modality collaborators.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModalityError {
  #[error("composite material {name:?} not found")]
  UnknownComposite { name: String },

  #[error("material {name:?} not found")]
  UnknownMaterial { name: String },

  /// Probability volume and action matrix disagree on the class axis.
  #[error("action matrix has {found} classes, probability volume has {expected}")]
  ClassCountMismatch { expected: usize, found: usize },

  #[error("channel {channel} has shape {found:?}, expected {expected:?}")]
  ShapeMismatch {
    channel: usize,
    expected: [usize; 3],
    found: [usize; 3],
  },

  #[error("channel stack is empty")]
  EmptyStack,

  #[error("downsampling factor must be at least 1")]
  ZeroFactor,

  /// Row-major data does not fill a `rows × cols` matrix.
  #[error("action data has {len} values, expected {rows}x{cols}")]
  ActionShape { rows: usize, cols: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, ModalityError>;
