//! Implicit plane `A·x + B·y + C·z + D = 0` and its sampling grid.

use glam::DVec3;

use crate::error::{Result, SynthError};

/// Plane in implicit form; `(a, b, c)` is the normal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
  pub a: f64,
  pub b: f64,
  pub c: f64,
  pub d: f64,
}

/// Which world axis the plane equation is solved for, and which two are
/// swept. Swept axes are in increasing axis order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Parametrization {
  pub solved: usize,
  pub swept: [usize; 2],
}

impl Plane {
  /// Plane through `point` with normal `normal`.
  ///
  /// # Errors
  /// `DegeneratePlane` when the normal is zero or not finite.
  pub fn from_normal_point(normal: DVec3, point: DVec3) -> Result<Self> {
    if !normal.is_finite() || normal == DVec3::ZERO {
      return Err(SynthError::DegeneratePlane {
        normal: normal.to_array(),
      });
    }
    Ok(Self {
      a: normal.x,
      b: normal.y,
      c: normal.z,
      d: -normal.dot(point),
    })
  }

  pub fn normal(&self) -> DVec3 {
    DVec3::new(self.a, self.b, self.c)
  }

  /// Signed residual of the plane equation at `p`.
  pub fn evaluate(&self, p: DVec3) -> f64 {
    self.normal().dot(p) + self.d
  }

  /// Solve for z when `C != 0`, else y when `B != 0`, else x.
  pub fn parametrization(&self) -> Parametrization {
    if self.c != 0.0 {
      Parametrization { solved: 2, swept: [0, 1] }
    } else if self.b != 0.0 {
      Parametrization { solved: 1, swept: [0, 2] }
    } else {
      Parametrization { solved: 0, swept: [1, 2] }
    }
  }

  /// World-space points of an `size × size` grid on the plane, centred on
  /// `point`, row-major with the first swept axis along rows.
  ///
  /// ```text
  /// sweep[k] = point[axis] - size * step / 2 + k * step
  ///
  ///            col: second swept axis ──►
  ///   row  ┌───────────────────────┐
  ///    │   │ p(0,0)  p(0,1)  ...   │
  ///    ▼   │ p(1,0)  ...           │   solved axis from the plane equation
  ///        └───────────────────────┘
  /// ```
  pub fn sample_grid(&self, point: DVec3, size: usize, step: f64) -> Vec<DVec3> {
    let Parametrization { solved, swept: [u, v] } = self.parametrization();
    let normal = self.normal().to_array();
    let origin = point.to_array();
    let half = size as f64 * step / 2.0;
    let sweep = |axis: usize, k: usize| origin[axis] - half + k as f64 * step;

    let mut points = Vec::with_capacity(size * size);
    for row in 0..size {
      let pu = sweep(u, row);
      for col in 0..size {
        let pv = sweep(v, col);
        let mut p = [0.0; 3];
        p[u] = pu;
        p[v] = pv;
        p[solved] = -(normal[u] * pu + normal[v] * pv + self.d) / normal[solved];
        points.push(DVec3::from_array(p));
      }
    }
    points
  }
}
