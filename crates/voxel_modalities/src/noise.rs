//! Rician-style detector noise.
//!
//! ```text
//! noise = |(a, b)| * data * factor  +  |(c, d)| * dark
//!         a, b, c, d ~ N(0, 1), independent per voxel
//! ```
//!
//! The result is an additive field; callers add it to the clean signal.

use rand::Rng;
use rand_distr::StandardNormal;
use voxel_synth::Grid3;

use crate::stack::ChannelStack;

/// Norm of two independent standard normals (Rayleigh distributed).
#[inline]
fn rayleigh<R: Rng + ?Sized>(rng: &mut R) -> f64 {
  let a: f64 = rng.sample(StandardNormal);
  let b: f64 = rng.sample(StandardNormal);
  a.hypot(b)
}

/// Additive noise field for `data`, same shape.
pub fn noise<R: Rng + ?Sized>(data: &Grid3<f64>, factor: f64, dark: f64, rng: &mut R) -> Grid3<f64> {
  let mut out = data.clone();
  for v in out.as_mut_slice() {
    let signal = rayleigh(rng) * *v * factor;
    *v = signal + rayleigh(rng) * dark;
  }
  out
}

/// Add noise to every channel in place, channel by channel.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "noise::add_noise"))]
pub fn add_noise<R: Rng + ?Sized>(stack: &mut ChannelStack, factor: f64, dark: f64, rng: &mut R) {
  for grid in stack.channels_mut() {
    let field = noise(grid, factor, dark, rng);
    for (v, n) in grid.as_mut_slice().iter_mut().zip(field.as_slice()) {
      *v += n;
    }
  }
  #[cfg(feature = "tracing")]
  tracing::debug!(channels = stack.len(), factor, dark, "noise added");
}

#[cfg(test)]
#[path = "noise_test.rs"]
mod noise_test;
