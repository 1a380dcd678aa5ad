//! Implicit shapes and binary voxel rasterization.
//!
//! Each shape is an inside test evaluated at voxel centres. There is no
//! partial coverage: a voxel is either in the mask or not.
//!
//! - Sphere: `|v - c|² < r²`
//! - Ellipsoid: `v' = R (v - c)`, `(x'/a)² + (y'/b)² + (z'/b)² < 1`
//!
//! Scans are restricted to the shape's bounding cube. Both shapes lie inside
//! a ball of their largest semi-axis, so no voxel outside it can pass.

use glam::{DMat3, DQuat, DVec3};
use rand::Rng;
use rand_distr::StandardNormal;

use crate::error::{Result, SynthError};
use crate::grid::coord_to_index;
use crate::types::ClassLabel;

/// Discriminant of `Shape`, for statistics and class lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeKind {
  Sphere,
  Ellipsoid,
}

impl ShapeKind {
  pub fn class_label(self) -> ClassLabel {
    match self {
      ShapeKind::Sphere => ClassLabel::Sphere,
      ShapeKind::Ellipsoid => ClassLabel::Ellipsoid,
    }
  }
}

/// Foreground object geometry, in voxels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
  Sphere {
    radius: f64,
  },
  /// Spheroid symmetric about its major axis; `rotation` maps world offsets
  /// into the body frame where the major axis is x.
  Ellipsoid {
    major: f64,
    minor: f64,
    rotation: DMat3,
  },
}

impl Shape {
  pub fn sphere(radius: f64) -> Self {
    Shape::Sphere { radius }
  }

  pub fn ellipsoid(major: f64, minor: f64, rotation: DMat3) -> Self {
    Shape::Ellipsoid {
      major,
      minor,
      rotation,
    }
  }

  /// Ellipsoid with a freshly drawn uniform rotation.
  pub fn ellipsoid_with_random_rotation<R: Rng + ?Sized>(major: f64, minor: f64, rng: &mut R) -> Self {
    Self::ellipsoid(major, minor, random_rotation(rng))
  }

  pub fn kind(&self) -> ShapeKind {
    match self {
      Shape::Sphere { .. } => ShapeKind::Sphere,
      Shape::Ellipsoid { .. } => ShapeKind::Ellipsoid,
    }
  }

  /// Radius of a ball around the centre that contains the whole shape.
  pub fn bounding_radius(&self) -> f64 {
    match *self {
      Shape::Sphere { radius } => radius,
      Shape::Ellipsoid { major, minor, .. } => major.max(minor),
    }
  }

  /// Check rasterization preconditions.
  pub fn validate(&self) -> Result<()> {
    match *self {
      Shape::Sphere { radius } if !(radius > 1.0) => Err(SynthError::RadiusTooSmall { radius }),
      Shape::Ellipsoid { major, minor, .. }
        if !(major.is_finite() && minor.is_finite() && major > 0.0 && minor > 0.0) =>
      {
        Err(SynthError::InvalidAxes { major, minor })
      }
      _ => Ok(()),
    }
  }

  /// Inside test for an offset from the shape's centre.
  #[inline]
  pub fn contains(&self, offset: DVec3) -> bool {
    match *self {
      Shape::Sphere { radius } => offset.length_squared() < radius * radius,
      Shape::Ellipsoid {
        major,
        minor,
        rotation,
      } => {
        let p = rotation * offset;
        let scaled = DVec3::new(p.x / major, p.y / minor, p.z / minor);
        scaled.length_squared() < 1.0
      }
    }
  }

  /// Rasterize the shape centred at `center` into a grid of `dims`.
  ///
  /// # Errors
  /// `RadiusTooSmall` for spheres with `radius <= 1`, `InvalidAxes` for
  /// non-positive ellipsoid axes.
  pub fn rasterize(&self, center: DVec3, dims: [usize; 3]) -> Result<VoxelMask> {
    self.validate()?;

    let reach = self.bounding_radius();
    let mut indices = Vec::new();

    let Some([rx, ry, rz]) = scan_ranges(center, reach, dims) else {
      return Ok(VoxelMask { dims, indices });
    };

    for x in rx.0..=rx.1 {
      for y in ry.0..=ry.1 {
        for z in rz.0..=rz.1 {
          let offset = DVec3::new(x as f64, y as f64, z as f64) - center;
          if self.contains(offset) {
            indices.push(coord_to_index(dims, x, y, z));
          }
        }
      }
    }

    Ok(VoxelMask { dims, indices })
  }
}

/// Inclusive per-axis voxel ranges covering `center ± reach`, clipped to the
/// grid. `None` when the box misses the grid entirely.
fn scan_ranges(center: DVec3, reach: f64, dims: [usize; 3]) -> Option<[(usize, usize); 3]> {
  let mut ranges = [(0, 0); 3];
  for axis in 0..3 {
    let n = dims[axis];
    if n == 0 {
      return None;
    }
    let lo = (center[axis] - reach).floor().max(0.0);
    let hi = (center[axis] + reach).ceil().min((n - 1) as f64);
    // NaN centres fail here as well
    if !(lo <= hi) {
      return None;
    }
    ranges[axis] = (lo as usize, hi as usize);
  }
  Some(ranges)
}

/// Uniformly distributed rotation matrix.
///
/// Four standard normals form a quaternion `(q0, q1, q2, q3)` with `q0` the
/// scalar part; normalizing it gives a uniform sample on SO(3). The matrix is
/// the standard quaternion-to-rotation conversion.
pub fn random_rotation<R: Rng + ?Sized>(rng: &mut R) -> DMat3 {
  let q0: f64 = rng.sample(StandardNormal);
  let q1: f64 = rng.sample(StandardNormal);
  let q2: f64 = rng.sample(StandardNormal);
  let q3: f64 = rng.sample(StandardNormal);

  let quat = DQuat::from_xyzw(q1, q2, q3, q0);
  let length = quat.length();
  if !(length > 0.0) {
    return DMat3::IDENTITY;
  }
  DMat3::from_quat(quat / length)
}

// =============================================================================
// VoxelMask
// =============================================================================

/// Set of voxels inside a rasterized shape.
///
/// Stored as ascending linear indices into a grid of `dims`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VoxelMask {
  dims: [usize; 3],
  indices: Vec<usize>,
}

impl VoxelMask {
  pub fn dims(&self) -> [usize; 3] {
    self.dims
  }

  /// Number of voxels inside.
  pub fn len(&self) -> usize {
    self.indices.len()
  }

  pub fn is_empty(&self) -> bool {
    self.indices.is_empty()
  }

  /// Linear indices of the voxels inside, ascending.
  pub fn indices(&self) -> &[usize] {
    &self.indices
  }

  pub fn contains(&self, x: usize, y: usize, z: usize) -> bool {
    x < self.dims[0]
      && y < self.dims[1]
      && z < self.dims[2]
      && self
        .indices
        .binary_search(&coord_to_index(self.dims, x, y, z))
        .is_ok()
  }
}

#[cfg(test)]
#[path = "shape_test.rs"]
mod shape_test;
