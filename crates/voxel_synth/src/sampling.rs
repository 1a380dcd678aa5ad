//! Blue-noise point placement.
//!
//! Bridson's Poisson-disk algorithm in the unit cube, followed by scaling to
//! the voxel domain and rejection of points inside the border margin.
//!
//! ```text
//!  ┌───────────────────────────┐
//!  │ border (rejected)         │
//!  │   ┌───────────────────┐   │
//!  │   │  •     •      •   │   │   every pair of points ≥ radius apart
//!  │   │     •      •      │   │   every kept coordinate in
//!  │   │  •     •     •    │   │   (border, N - border)
//!  │   └───────────────────┘   │
//!  └───────────────────────────┘
//! ```

use glam::DVec3;
use rand::Rng;
use rand_distr::{Distribution, UnitSphere};

/// Poisson-disk sample of the unit cube `[0, 1)³`.
///
/// Points are returned in emission order. No two points are closer than
/// `radius`. For every active point, `candidates` trial points are drawn
/// uniformly by volume from the shell `[radius, 2·radius]`. Each trial that
/// clears its neighbours is accepted. A point retires once none of its trials
/// survive.
///
/// A non-positive or non-finite `radius` yields no points.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "sampling::poisson_disk"))]
pub fn poisson_disk<R: Rng + ?Sized>(radius: f64, candidates: usize, rng: &mut R) -> Vec<DVec3> {
  if !(radius.is_finite() && radius > 0.0) {
    return Vec::new();
  }

  let mut grid = BackgroundGrid::new(radius);
  let mut points: Vec<DVec3> = Vec::new();
  let mut active: Vec<usize> = Vec::new();

  let first = DVec3::new(rng.random(), rng.random(), rng.random());
  grid.insert(first, 0);
  points.push(first);
  active.push(0);

  while !active.is_empty() {
    let slot = rng.random_range(0..active.len());
    let origin = points[active[slot]];
    let mut accepted_any = false;

    for _ in 0..candidates {
      let candidate = origin + shell_offset(radius, rng);
      if !in_unit_cube(candidate) || grid.has_neighbor(candidate, &points) {
        continue;
      }
      let idx = points.len();
      grid.insert(candidate, idx);
      points.push(candidate);
      active.push(idx);
      accepted_any = true;
    }

    if !accepted_any {
      active.swap_remove(slot);
    }
  }

  #[cfg(feature = "tracing")]
  tracing::debug!(count = points.len(), radius, "poisson disk sampling done");
  points
}

/// Blue-noise centres for a domain of edge `size`, trimmed to the border.
///
/// `radius` and `border` are in voxels. Kept points satisfy
/// `border < p[i] < size - border` on every axis; ordering is the sampler's
/// emission order.
pub fn sample_positions<R: Rng + ?Sized>(
  size: usize,
  radius: f64,
  border: f64,
  candidates: usize,
  rng: &mut R,
) -> Vec<DVec3> {
  let scale = size as f64;
  let upper = scale - border;

  let points: Vec<DVec3> = poisson_disk(radius / scale, candidates, rng)
    .into_iter()
    .map(|p| p * scale)
    .filter(|p| p.to_array().iter().all(|&c| c > border && c < upper))
    .collect();

  #[cfg(feature = "tracing")]
  tracing::debug!(kept = points.len(), border, "border filter applied");
  points
}

/// Offset uniform by volume in the shell between `r` and `2r`.
fn shell_offset<R: Rng + ?Sized>(r: f64, rng: &mut R) -> DVec3 {
  let direction = DVec3::from_array(UnitSphere.sample(rng));
  // inverse CDF of r³ over [r³, 8r³]
  let u: f64 = rng.random();
  let distance = r * (1.0 + 7.0 * u).cbrt();
  direction * distance
}

#[inline]
fn in_unit_cube(p: DVec3) -> bool {
  p.cmpge(DVec3::ZERO).all() && p.cmplt(DVec3::ONE).all()
}

// =============================================================================
// BackgroundGrid - acceleration structure for neighbour rejection
// =============================================================================

/// Uniform grid with cell edge `r / √3`, so each cell holds at most one point.
struct BackgroundGrid {
  cell: f64,
  cells_per_axis: usize,
  radius_sq: f64,
  slots: Vec<Option<usize>>,
}

impl BackgroundGrid {
  fn new(radius: f64) -> Self {
    let cell = radius / 3f64.sqrt();
    let cells_per_axis = ((1.0 / cell).ceil() as usize).max(1);
    Self {
      cell,
      cells_per_axis,
      radius_sq: radius * radius,
      slots: vec![None; cells_per_axis.pow(3)],
    }
  }

  fn cell_of(&self, p: DVec3) -> [usize; 3] {
    let max = self.cells_per_axis - 1;
    let c = |v: f64| ((v / self.cell) as usize).min(max);
    [c(p.x), c(p.y), c(p.z)]
  }

  fn slot(&self, [x, y, z]: [usize; 3]) -> usize {
    (x * self.cells_per_axis + y) * self.cells_per_axis + z
  }

  fn insert(&mut self, p: DVec3, idx: usize) {
    let slot = self.slot(self.cell_of(p));
    self.slots[slot] = Some(idx);
  }

  /// True if any stored point lies closer than the radius to `p`.
  fn has_neighbor(&self, p: DVec3, points: &[DVec3]) -> bool {
    // r spans √3 cells, so two cells either way cover the search ball
    const REACH: usize = 2;
    let [cx, cy, cz] = self.cell_of(p);
    let hi = |c: usize| (c + REACH).min(self.cells_per_axis - 1);

    for x in cx.saturating_sub(REACH)..=hi(cx) {
      for y in cy.saturating_sub(REACH)..=hi(cy) {
        for z in cz.saturating_sub(REACH)..=hi(cz) {
          if let Some(idx) = self.slots[self.slot([x, y, z])] {
            if points[idx].distance_squared(p) < self.radius_sq {
              return true;
            }
          }
        }
      }
    }
    false
  }
}

#[cfg(test)]
#[path = "sampling_test.rs"]
mod sampling_test;
