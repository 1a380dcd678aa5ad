//! Channel stacks: `C` co-registered grids of one shape.
//!
//! ```text
//! channel 0  ┌──────┐
//! channel 1  │┌──────┐      every channel has dims [nx, ny, nz]
//!    ...     └│┌──────┐
//!             └│ N×N×N│
//!              └──────┘
//! ```

use voxel_synth::Grid3;

use crate::error::{ModalityError, Result};

/// Leading-channel stack of equally shaped volumes.
#[derive(Clone, Debug, PartialEq)]
pub struct ChannelStack {
  dims: [usize; 3],
  channels: Vec<Grid3<f64>>,
}

/// Per-class probabilities; channels sum to 1 at every voxel.
pub type ProbabilityVolume = ChannelStack;

impl ChannelStack {
  /// Wrap `channels`, checking that they share one shape.
  pub fn from_channels(channels: Vec<Grid3<f64>>) -> Result<Self> {
    let dims = channels.first().ok_or(ModalityError::EmptyStack)?.dims();
    if let Some((channel, grid)) = channels.iter().enumerate().find(|(_, g)| g.dims() != dims) {
      return Err(ModalityError::ShapeMismatch {
        channel,
        expected: dims,
        found: grid.dims(),
      });
    }
    Ok(Self { dims, channels })
  }

  /// Stack built from grids already known to have `dims`; may be empty.
  pub(crate) fn from_uniform(dims: [usize; 3], channels: Vec<Grid3<f64>>) -> Self {
    debug_assert!(channels.iter().all(|g| g.dims() == dims));
    Self { dims, channels }
  }

  /// Single-channel stack.
  pub fn single(grid: Grid3<f64>) -> Self {
    Self {
      dims: grid.dims(),
      channels: vec![grid],
    }
  }

  pub fn dims(&self) -> [usize; 3] {
    self.dims
  }

  /// `[C, nx, ny, nz]`
  pub fn shape(&self) -> [usize; 4] {
    [self.channels.len(), self.dims[0], self.dims[1], self.dims[2]]
  }

  pub fn len(&self) -> usize {
    self.channels.len()
  }

  pub fn is_empty(&self) -> bool {
    self.channels.is_empty()
  }

  pub fn channel(&self, index: usize) -> Option<&Grid3<f64>> {
    self.channels.get(index)
  }

  pub fn channels(&self) -> &[Grid3<f64>] {
    &self.channels
  }

  pub fn channels_mut(&mut self) -> &mut [Grid3<f64>] {
    &mut self.channels
  }

  pub fn into_channels(self) -> Vec<Grid3<f64>> {
    self.channels
  }

  /// Voxelwise sum across channels.
  pub fn channel_sum(&self) -> Grid3<f64> {
    let mut sum = Grid3::zeros(self.dims);
    for grid in &self.channels {
      for (acc, &v) in sum.as_mut_slice().iter_mut().zip(grid.as_slice()) {
        *acc += v;
      }
    }
    sum
  }

  /// Sum of every value in every channel.
  pub fn total(&self) -> f64 {
    self.channels.iter().flat_map(|g| g.as_slice()).sum()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn from_channels_checks_shapes() {
    assert_eq!(ChannelStack::from_channels(Vec::new()).unwrap_err(), ModalityError::EmptyStack);

    let err = ChannelStack::from_channels(vec![Grid3::cube(2, 0.0), Grid3::filled([2, 2, 3], 0.0)]).unwrap_err();
    assert_eq!(
      err,
      ModalityError::ShapeMismatch {
        channel: 1,
        expected: [2, 2, 2],
        found: [2, 2, 3],
      }
    );
  }

  #[test]
  fn sums() {
    let stack = ChannelStack::from_channels(vec![Grid3::cube(2, 0.25), Grid3::cube(2, 0.5)]).unwrap();
    assert_eq!(stack.shape(), [2, 2, 2, 2]);
    assert_eq!(stack.channel_sum().as_slice(), &[0.75; 8]);
    assert_eq!(stack.total(), 6.0);
  }
}
