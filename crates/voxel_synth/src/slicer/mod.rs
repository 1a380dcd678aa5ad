//! Oblique plane slicing of voxel grids.
//!
//! ```text
//! normal + point ──► Plane (A, B, C, D)
//!                      │ solve for z if C≠0, else y if B≠0, else x
//!                      ▼
//!               size × size sample points ──► interpolate ──► Grid2<f64>
//! ```
//!
//! With a unit axis normal through the domain centre and unit step, the
//! slice is the axis-aligned section of the source: `(1,0,0)` gives
//! `section(0, ·)`, `(0,1,0)` gives `section(1, ·)`, `(0,0,1)` gives
//! `section(2, ·)`.

mod interpolate;
mod plane;

use glam::DVec3;

pub use interpolate::{sample, Interpolation};
pub use plane::{Parametrization, Plane};

use crate::error::{Result, SynthError};
use crate::grid::{Grid2, Grid3};

/// Square resampling window on an arbitrary plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaneSlicer {
  /// Output edge length `N_out`.
  size: usize,
  /// Distance between neighbouring samples, in voxels.
  step: f64,
  method: Interpolation,
}

impl PlaneSlicer {
  pub fn new(size: usize, step: f64) -> Self {
    Self {
      size,
      step,
      method: Interpolation::Linear,
    }
  }

  pub fn with_method(mut self, method: Interpolation) -> Self {
    self.method = method;
    self
  }

  pub fn size(&self) -> usize {
    self.size
  }

  pub fn step(&self) -> f64 {
    self.step
  }

  pub fn method(&self) -> Interpolation {
    self.method
  }

  /// World-space sample positions for the plane, row-major.
  pub fn sample_points(&self, normal: DVec3, point: DVec3) -> Result<Vec<DVec3>> {
    let plane = Plane::from_normal_point(normal, point)?;
    Ok(plane.sample_grid(point, self.size, self.step))
  }

  /// Resample one grid on the plane through `point` with `normal`.
  ///
  /// Returns a `size × size` image; samples outside the grid are NaN.
  ///
  /// # Errors
  /// `DegeneratePlane` for a zero or non-finite normal.
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "slicer::slice"))]
  pub fn slice<T: Copy + Into<f64>>(&self, normal: DVec3, point: DVec3, source: &Grid3<T>) -> Result<Grid2<f64>> {
    let points = self.sample_points(normal, point)?;
    Ok(self.resample(&points, source))
  }

  /// Resample every channel of a stack on the same plane.
  ///
  /// Returns one image per channel, in channel order.
  ///
  /// # Errors
  /// `DegeneratePlane` for a bad normal, `EmptyChannelStack` for no
  /// channels, `ChannelShapeMismatch` if channels differ in shape.
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "slicer::slice_channels"))]
  pub fn slice_channels<T: Copy + Into<f64>>(
    &self,
    normal: DVec3,
    point: DVec3,
    channels: &[Grid3<T>],
  ) -> Result<Vec<Grid2<f64>>> {
    let expected = channels.first().ok_or(SynthError::EmptyChannelStack)?.dims();
    for (channel, grid) in channels.iter().enumerate() {
      if grid.dims() != expected {
        return Err(SynthError::ChannelShapeMismatch {
          channel,
          expected,
          found: grid.dims(),
        });
      }
    }

    let points = self.sample_points(normal, point)?;
    #[cfg(feature = "tracing")]
    tracing::debug!(channels = channels.len(), size = self.size, "slicing channel stack");
    Ok(channels.iter().map(|grid| self.resample(&points, grid)).collect())
  }

  fn resample<T: Copy + Into<f64>>(&self, points: &[DVec3], source: &Grid3<T>) -> Grid2<f64> {
    let n = self.size;
    Grid2::from_fn(n, n, |row, col| sample(source, points[row * n + col], self.method))
  }
}
