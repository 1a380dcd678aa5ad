//! Label softening: one-hot encode a class map, blur each class, renormalize.
//!
//! The Gaussian is separable and applied along x, y, z in turn. Boundaries
//! mirror about the edge, including the edge sample (`d c b a | a b c d`).
//! The kernel is truncated at `⌊4σ + 0.5⌋` samples and normalized.

use rayon::prelude::*;
use voxel_synth::Grid3;

use crate::stack::{ChannelStack, ProbabilityVolume};

/// Kernel half-width in standard deviations.
const TRUNCATE: f64 = 4.0;

/// `C` indicator volumes, one per class code `0..num_classes`.
///
/// Voxels whose code is out of range are zero in every channel.
pub fn one_hot(class_map: &Grid3<u8>, num_classes: usize) -> ChannelStack {
  let channels = (0..num_classes)
    .map(|class| class_map.map(|c| if c as usize == class { 1.0 } else { 0.0 }))
    .collect();
  ChannelStack::from_uniform(class_map.dims(), channels)
}

/// Normalized 1D Gaussian weights for offsets `-r..=r`.
pub fn gaussian_kernel(sigma: f64) -> Vec<f64> {
  let radius = (TRUNCATE * sigma + 0.5) as usize;
  let weights: Vec<f64> = (-(radius as i64)..=radius as i64)
    .map(|k| (-0.5 * (k * k) as f64 / (sigma * sigma)).exp())
    .collect();
  let sum: f64 = weights.iter().sum();
  weights.into_iter().map(|w| w / sum).collect()
}

/// Mirror an out-of-range index back into `0..n`.
#[inline]
fn reflect(i: i64, n: usize) -> usize {
  let period = 2 * n as i64;
  let m = i.rem_euclid(period);
  if m >= n as i64 {
    (period - 1 - m) as usize
  } else {
    m as usize
  }
}

/// Separable Gaussian blur. `sigma <= 0` returns the input unchanged.
pub fn gaussian_filter(grid: &Grid3<f64>, sigma: f64) -> Grid3<f64> {
  if !(sigma > 0.0) || grid.is_empty() {
    return grid.clone();
  }
  let kernel = gaussian_kernel(sigma);
  let mut out = grid.clone();
  for axis in 0..3 {
    out = filter_axis(&out, &kernel, axis);
  }
  out
}

fn filter_axis(grid: &Grid3<f64>, kernel: &[f64], axis: usize) -> Grid3<f64> {
  let dims = grid.dims();
  let n = dims[axis];
  let radius = (kernel.len() / 2) as i64;
  let stride = match axis {
    0 => dims[1] * dims[2],
    1 => dims[2],
    _ => 1,
  };

  let src = grid.as_slice();
  let mut out = Grid3::zeros(dims);
  let dst = out.as_mut_slice();

  let mut line = vec![0.0; n];
  for base in 0..src.len() {
    // Visit each line once, from its first sample
    if (base / stride) % n != 0 {
      continue;
    }
    for (i, slot) in line.iter_mut().enumerate() {
      *slot = src[base + i * stride];
    }
    for i in 0..n {
      let mut acc = 0.0;
      for (k, &w) in kernel.iter().enumerate() {
        let j = reflect(i as i64 + k as i64 - radius, n);
        acc += w * line[j];
      }
      dst[base + i * stride] = acc;
    }
  }
  out
}

/// Rescale channels so they sum to 1 at every voxel; all-zero sums are
/// treated as 1.
pub fn renormalize(stack: &mut ChannelStack) {
  let mut sum = stack.channel_sum();
  for s in sum.as_mut_slice() {
    if *s == 0.0 {
      *s = 1.0;
    }
  }
  stack.channels_mut().par_iter_mut().for_each(|grid| {
    for (v, &s) in grid.as_mut_slice().iter_mut().zip(sum.as_slice()) {
      *v /= s;
    }
  });
}

/// Soft class probabilities for a fixed class count.
pub fn blur_classes(class_map: &Grid3<u8>, sigma: f64, num_classes: usize) -> ProbabilityVolume {
  let mut stack = one_hot(class_map, num_classes);
  stack
    .channels_mut()
    .par_iter_mut()
    .for_each(|grid| *grid = gaussian_filter(grid, sigma));
  renormalize(&mut stack);
  stack
}

/// Soft class probabilities with `max(class) + 1` classes.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "blur::blur_it"))]
pub fn blur_it(class_map: &Grid3<u8>, sigma: f64) -> ProbabilityVolume {
  let num_classes = class_map.as_slice().iter().copied().max().map_or(1, |m| m as usize + 1);
  #[cfg(feature = "tracing")]
  tracing::debug!(num_classes, sigma, "blurring class map");
  blur_classes(class_map, sigma, num_classes)
}

#[cfg(test)]
#[path = "blur_test.rs"]
mod blur_test;
