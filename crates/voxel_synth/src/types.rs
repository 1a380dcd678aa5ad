//! Core data types: scene configuration, class codes and the grid triple.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, SynthError};
use crate::grid::Grid3;

/// Instance label reserved for the background matrix.
pub const MATRIX_INSTANCE_LABEL: u32 = 1;

/// Label given to the first sampled instance; later ones count up from here.
pub const FIRST_INSTANCE_LABEL: u32 = 2;

/// Semantic class codes written to the class map.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClassLabel {
  Empty = 0,
  Matrix = 1,
  Sphere = 2,
  Ellipsoid = 3,
}

impl ClassLabel {
  /// Class codes at or above this value belong to foreground objects.
  pub const FOREGROUND_THRESHOLD: u8 = 2;

  #[inline]
  pub const fn code(self) -> u8 {
    self as u8
  }

  pub const fn from_code(code: u8) -> Option<Self> {
    match code {
      0 => Some(Self::Empty),
      1 => Some(Self::Matrix),
      2 => Some(Self::Sphere),
      3 => Some(Self::Ellipsoid),
      _ => None,
    }
  }

  /// Number of distinct class codes.
  pub const COUNT: usize = 4;
}

// =============================================================================
// SceneConfig
// =============================================================================

/// Parameters for building a scene.
///
/// Lengths are in voxels. Defaults reproduce the reference generator
/// (128³ domain, separation 10, border 20, half ellipsoids).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct SceneConfig {
  /// Edge length `N` of the cubic domain.
  pub size: usize,
  /// Minimum separation between sampled centres.
  pub radius: f64,
  /// Interior margin; centres closer than this to a face are discarded.
  pub border: f64,
  /// Probability that an instance is an ellipsoid.
  pub fraction: f64,
  /// Sphere diameter as a fraction of `radius`.
  pub k0: f64,
  /// Ellipsoid elongation (major axis / sphere radius).
  pub k1: f64,
  /// Width of the size-multiplier jitter.
  pub delta: f64,
  /// Mean size multiplier.
  pub mean_scale: f64,
  /// Matrix sphere radius as a multiple of `size`.
  pub matrix_radius_factor: f64,
  pub matrix_density: f64,
  pub sphere_density: f64,
  pub ellipsoid_density: f64,
  /// Candidates tried per active point during Poisson-disk sampling.
  pub candidates: usize,
}

impl Default for SceneConfig {
  fn default() -> Self {
    Self {
      size: 128,
      radius: 10.0,
      border: 20.0,
      fraction: 0.5,
      k0: 0.85,
      k1: 1.5,
      delta: 0.01,
      mean_scale: 0.95,
      matrix_radius_factor: 1.0,
      matrix_density: 0.5,
      sphere_density: 1.0,
      ellipsoid_density: 1.0,
      candidates: 30,
    }
  }
}

impl SceneConfig {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_size(mut self, size: usize) -> Self {
    self.size = size;
    self
  }

  pub fn with_radius(mut self, radius: f64) -> Self {
    self.radius = radius;
    self
  }

  pub fn with_border(mut self, border: f64) -> Self {
    self.border = border;
    self
  }

  pub fn with_fraction(mut self, fraction: f64) -> Self {
    self.fraction = fraction;
    self
  }

  pub fn with_shape_factors(mut self, k0: f64, k1: f64) -> Self {
    self.k0 = k0;
    self.k1 = k1;
    self
  }

  pub fn with_size_jitter(mut self, mean_scale: f64, delta: f64) -> Self {
    self.mean_scale = mean_scale;
    self.delta = delta;
    self
  }

  pub fn with_densities(mut self, matrix: f64, sphere: f64, ellipsoid: f64) -> Self {
    self.matrix_density = matrix;
    self.sphere_density = sphere;
    self.ellipsoid_density = ellipsoid;
    self
  }

  pub fn with_matrix_radius_factor(mut self, factor: f64) -> Self {
    self.matrix_radius_factor = factor;
    self
  }

  /// Base sphere radius before size jitter: `radius * k0 / 2`.
  #[inline]
  pub fn sphere_radius(&self) -> f64 {
    self.radius * self.k0 / 2.0
  }

  /// Minor-axis factor `1 / sqrt(k1)`.
  #[inline]
  pub fn k2(&self) -> f64 {
    1.0 / self.k1.sqrt()
  }

  #[inline]
  pub fn major_axis(&self) -> f64 {
    self.sphere_radius() * self.k1
  }

  #[inline]
  pub fn minor_axis(&self) -> f64 {
    self.sphere_radius() * self.k2()
  }

  /// Smallest size multiplier the jitter can draw.
  #[inline]
  pub fn min_scale(&self) -> f64 {
    self.mean_scale - self.delta.abs() / 2.0
  }

  /// Reject values that cannot produce a meaningful scene.
  ///
  /// Besides range checks this rejects every config whose `fill` could hit
  /// a rasterization precondition: a matrix sphere of radius `<= 1`, a
  /// smallest drawable sphere of radius `<= 1` when spheres can occur, and
  /// non-positive ellipsoid axes when ellipsoids can occur.
  pub fn validate(&self) -> Result<()> {
    let invalid = |field, value| Err(SynthError::InvalidConfig { field, value });

    if self.size == 0 {
      return invalid("size", 0.0);
    }
    if !(self.radius.is_finite() && self.radius > 0.0) {
      return invalid("radius", self.radius);
    }
    if !(self.border.is_finite() && self.border >= 0.0) {
      return invalid("border", self.border);
    }
    if !(0.0..=1.0).contains(&self.fraction) {
      return invalid("fraction", self.fraction);
    }
    if !(self.k1.is_finite() && self.k1 > 0.0) {
      return invalid("k1", self.k1);
    }
    let finite = [
      ("k0", self.k0),
      ("delta", self.delta),
      ("mean_scale", self.mean_scale),
      ("matrix_radius_factor", self.matrix_radius_factor),
      ("matrix_density", self.matrix_density),
      ("sphere_density", self.sphere_density),
      ("ellipsoid_density", self.ellipsoid_density),
    ];
    for (field, value) in finite {
      if !value.is_finite() {
        return invalid(field, value);
      }
    }
    if self.candidates == 0 {
      return invalid("candidates", 0.0);
    }

    let matrix_radius = self.matrix_radius_factor * self.size as f64;
    if !(matrix_radius > 1.0) {
      return invalid("matrix_radius", matrix_radius);
    }
    if self.fraction < 1.0 {
      let smallest = self.sphere_radius() * self.min_scale();
      if !(smallest > 1.0) {
        return invalid("sphere_radius", smallest);
      }
    }
    if self.fraction > 0.0 {
      let smallest = self.major_axis().min(self.minor_axis()) * self.min_scale();
      if !(smallest > 0.0) {
        return invalid("ellipsoid_axis", smallest);
      }
    }
    Ok(())
  }
}

// =============================================================================
// GridTriple
// =============================================================================

/// Co-registered output of one `Scene::fill` call.
#[derive(Clone, Debug, PartialEq)]
pub struct GridTriple {
  /// Real-valued density.
  pub volume: Grid3<f64>,
  /// `ClassLabel` codes.
  pub class_map: Grid3<u8>,
  /// Owning instance label, 0 where unlabeled.
  pub instance_map: Grid3<u32>,
}

impl GridTriple {
  /// All-zero triple of edge length `n`.
  pub fn empty(n: usize) -> Self {
    Self {
      volume: Grid3::cube(n, 0.0),
      class_map: Grid3::cube(n, 0),
      instance_map: Grid3::cube(n, 0),
    }
  }

  pub fn dims(&self) -> [usize; 3] {
    self.volume.dims()
  }

  /// `InstanceMap[v] > 0 ⇔ ClassMap[v] > 0` for every voxel.
  pub fn labels_consistent(&self) -> bool {
    self
      .class_map
      .as_slice()
      .iter()
      .zip(self.instance_map.as_slice())
      .all(|(&c, &i)| (c > 0) == (i > 0))
  }

  /// Number of voxels carrying each class code.
  pub fn class_histogram(&self) -> [usize; ClassLabel::COUNT] {
    let mut counts = [0; ClassLabel::COUNT];
    for &c in self.class_map.as_slice() {
      if let Some(slot) = counts.get_mut(c as usize) {
        *slot += 1;
      }
    }
    counts
  }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
