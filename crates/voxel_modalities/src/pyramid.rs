//! Multiscale pyramids by block-mean downsampling.
//!
//! ```text
//! level 0   N³          (input)
//! level 1   ⌈N/f⌉³      mean of each f×f×f block
//! level 2   ⌈N/f²⌉³
//!   ...
//! ```
//!
//! Blocks that run past the edge average only the voxels they contain.

use rayon::prelude::*;
use voxel_synth::Grid3;

use crate::error::{ModalityError, Result};
use crate::stack::ChannelStack;

/// Downscale factor used between pyramid levels by default.
pub const DEFAULT_FACTOR: usize = 4;

/// Block-mean downsample by `factor` on every axis.
pub fn downsample(grid: &Grid3<f64>, factor: usize) -> Result<Grid3<f64>> {
  if factor == 0 {
    return Err(ModalityError::ZeroFactor);
  }
  let dims = grid.dims();
  let out_dims = dims.map(|n| n.div_ceil(factor));

  Ok(Grid3::from_fn(out_dims, |ox, oy, oz| {
    let lo = [ox * factor, oy * factor, oz * factor];
    let hi = [0, 1, 2].map(|a| (lo[a] + factor).min(dims[a]));

    let mut sum = 0.0;
    for x in lo[0]..hi[0] {
      for y in lo[1]..hi[1] {
        for z in lo[2]..hi[2] {
          sum += grid.get(x, y, z);
        }
      }
    }
    let count = (hi[0] - lo[0]) * (hi[1] - lo[1]) * (hi[2] - lo[2]);
    sum / count as f64
  }))
}

/// `levels + 1` stacks: the input followed by `levels` successive
/// downsamplings. Channels are reduced in parallel.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "pyramid::pyramid"))]
pub fn pyramid(stack: &ChannelStack, levels: usize, factor: usize) -> Result<Vec<ChannelStack>> {
  if factor == 0 {
    return Err(ModalityError::ZeroFactor);
  }

  let mut out = Vec::with_capacity(levels + 1);
  out.push(stack.clone());
  for level in 1..=levels {
    let previous = &out[level - 1];
    let channels = previous
      .channels()
      .par_iter()
      .map(|grid| downsample(grid, factor))
      .collect::<Result<Vec<_>>>()?;
    let next = ChannelStack::from_channels(channels)?;
    #[cfg(feature = "tracing")]
    tracing::debug!(level, dims = ?next.dims(), "pyramid level");
    out.push(next);
  }
  Ok(out)
}

#[cfg(test)]
#[path = "pyramid_test.rs"]
mod pyramid_test;
