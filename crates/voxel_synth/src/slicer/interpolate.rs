//! Point sampling of a voxel grid at fractional index coordinates.
//!
//! Coordinates are voxel indices: voxel `[i, j, k]` sits at `(i, j, k)`.
//! Anything outside `[0, n - 1]` on an axis is NaN. There is no
//! extrapolation and no clamping.

use glam::DVec3;

use crate::grid::Grid3;

/// Resampling method for plane slices.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Interpolation {
  /// Trilinear blend of the 8 surrounding voxels.
  #[default]
  Linear,
  /// Closest voxel; exact halves go to the lower index.
  Nearest,
}

/// Lower corner index and fractional offset along one axis.
#[inline]
fn locate(coord: f64, n: usize) -> Option<(usize, f64)> {
  if n == 0 || !(coord >= 0.0 && coord <= (n - 1) as f64) {
    return None;
  }
  // The last voxel is addressed as (n - 2) + 1.0 so i0 + 1 stays in bounds
  let i0 = (coord.floor() as usize).min(n.saturating_sub(2));
  Some((i0, coord - i0 as f64))
}

/// Sample `grid` at `p` with `method`.
pub fn sample<T: Copy + Into<f64>>(grid: &Grid3<T>, p: DVec3, method: Interpolation) -> f64 {
  let dims = grid.dims();
  let (Some((x0, tx)), Some((y0, ty)), Some((z0, tz))) = (
    locate(p.x, dims[0]),
    locate(p.y, dims[1]),
    locate(p.z, dims[2]),
  ) else {
    return f64::NAN;
  };

  match method {
    Interpolation::Nearest => {
      let pick = |i0: usize, t: f64| if t <= 0.5 { i0 } else { i0 + 1 };
      grid.get(pick(x0, tx), pick(y0, ty), pick(z0, tz)).into()
    }
    Interpolation::Linear => {
      let mut acc = 0.0;
      for (dx, wx) in [(0, 1.0 - tx), (1, tx)] {
        if wx == 0.0 {
          continue;
        }
        for (dy, wy) in [(0, 1.0 - ty), (1, ty)] {
          if wy == 0.0 {
            continue;
          }
          for (dz, wz) in [(0, 1.0 - tz), (1, tz)] {
            if wz == 0.0 {
              continue;
            }
            let value: f64 = grid.get(x0 + dx, y0 + dy, z0 + dz).into();
            acc += wx * wy * wz * value;
          }
        }
      }
      acc
    }
  }
}
