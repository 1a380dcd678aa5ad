//! Label compositing: instances first, matrix last.
//!
//! ```text
//! phase 1  foreground     for each active instance in creation order:
//!                           grids[mask] = (density, class 2|3, label)
//!                         later instances overwrite earlier ones
//!
//! phase 2  matrix         scratch = sphere(N/2, factor * N) as (density, 1, 1)
//!                         grids[v] = scratch[v]
//!                           where class[v] < 2 and scratch.class[v] != 0
//! ```
//!
//! A foreground voxel therefore never loses to the matrix, whatever the
//! processing order.

use glam::DVec3;

use crate::error::Result;
use crate::grid::Grid3;
use crate::shape::{Shape, ShapeKind, VoxelMask};
use crate::types::{ClassLabel, GridTriple, MATRIX_INSTANCE_LABEL};

use super::Scene;

impl Scene {
  /// Rasterize the current instance state into a fresh grid triple.
  ///
  /// Deterministic for a given instance state; the scene is not modified.
  ///
  /// # Errors
  /// Propagates rasterization preconditions (`RadiusTooSmall`,
  /// `InvalidAxes`) from any active instance or the matrix sphere.
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "scene::fill"))]
  pub fn fill(&self) -> Result<GridTriple> {
    let n = self.size();
    let mut grids = GridTriple::empty(n);

    for instance in self.instances.iter().filter(|i| i.active) {
      let mask = instance.shape.rasterize(instance.center(), grids.dims())?;
      let density = self.density_of(instance.kind());
      paint(&mut grids, &mask, density, instance.kind().class_label(), instance.label);
    }

    let center = DVec3::splat(n as f64 / 2.0);
    let radius = self.config.matrix_radius_factor * n as f64;
    matrix_fill(&mut grids, center, radius, self.config.matrix_density)?;

    #[cfg(feature = "tracing")]
    tracing::debug!(
      painted = self.active_count(),
      skipped = self.instances.len() - self.active_count(),
      "fill complete"
    );
    Ok(grids)
  }

  fn density_of(&self, kind: ShapeKind) -> f64 {
    match kind {
      ShapeKind::Sphere => self.config.sphere_density,
      ShapeKind::Ellipsoid => self.config.ellipsoid_density,
    }
  }
}

/// Unconditionally write `(density, class, label)` at every masked voxel.
pub fn paint(grids: &mut GridTriple, mask: &VoxelMask, density: f64, class: ClassLabel, label: u32) {
  let volume = grids.volume.as_mut_slice();
  let class_map = grids.class_map.as_mut_slice();
  let instance_map = grids.instance_map.as_mut_slice();

  for &idx in mask.indices() {
    volume[idx] = density;
    class_map[idx] = class.code();
    instance_map[idx] = label;
  }
}

/// Composite the background matrix into voxels not claimed by a foreground
/// object.
///
/// The matrix sphere is rasterized into private scratch grids; the main
/// grids are only touched by the final copy. Returns the number of voxels
/// written.
pub fn matrix_fill(grids: &mut GridTriple, center: DVec3, radius: f64, density: f64) -> Result<usize> {
  let dims = grids.dims();
  let mask = Shape::sphere(radius).rasterize(center, dims)?;

  let mut scratch = GridTriple {
    volume: Grid3::zeros(dims),
    class_map: Grid3::zeros(dims),
    instance_map: Grid3::zeros(dims),
  };
  paint(&mut scratch, &mask, density, ClassLabel::Matrix, MATRIX_INSTANCE_LABEL);

  let scratch_class = scratch.class_map.as_slice();
  let scratch_volume = scratch.volume.as_slice();
  let scratch_instance = scratch.instance_map.as_slice();

  let volume = grids.volume.as_mut_slice();
  let class_map = grids.class_map.as_mut_slice();
  let instance_map = grids.instance_map.as_mut_slice();

  let mut written = 0;
  for idx in 0..class_map.len() {
    if class_map[idx] < ClassLabel::FOREGROUND_THRESHOLD && scratch_class[idx] != 0 {
      volume[idx] = scratch_volume[idx];
      class_map[idx] = scratch_class[idx];
      instance_map[idx] = scratch_instance[idx];
      written += 1;
    }
  }
  #[cfg(feature = "tracing")]
  tracing::debug!(written, radius, "matrix fill");
  Ok(written)
}

#[cfg(test)]
#[path = "compositing_test.rs"]
mod compositing_test;
