//! Perturbation overlay: displacement and dropout with exact rollback.
//!
//! Only `Instance::displacement` and `Instance::active` change here.
//! Positions, shapes, sizes and labels are fixed at construction, so a
//! perturbed fill keeps every instance identity of the original one.

use rand::seq::index;
use rand::Rng;
use rand_distr::{Distribution, Normal};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, SynthError};

use super::Scene;

/// Offset fault: instances whose original last coordinate exceeds `z` move
/// by `dz` along that axis.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct Cut {
  pub z: f64,
  pub dz: f64,
}

/// One combined perturbation step; present parts run as shake, cut, erase.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct Perturbation {
  pub shake: Option<f64>,
  pub cut: Option<Cut>,
  pub erase: Option<f64>,
}

impl Perturbation {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_shake(mut self, rmsd: f64) -> Self {
    self.shake = Some(rmsd);
    self
  }

  pub fn with_cut(mut self, z: f64, dz: f64) -> Self {
    self.cut = Some(Cut { z, dz });
    self
  }

  pub fn with_erase(mut self, fraction: f64) -> Self {
    self.erase = Some(fraction);
    self
  }

  pub fn is_empty(&self) -> bool {
    self.shake.is_none() && self.cut.is_none() && self.erase.is_none()
  }
}

impl Scene {
  /// Add an independent Gaussian offset to every instance's displacement.
  ///
  /// The per-axis standard deviation is `rmsd² / 3`. Calls accumulate.
  pub fn shake<R: Rng + ?Sized>(&mut self, rmsd: f64, rng: &mut R) -> Result<()> {
    let sigma = rmsd * rmsd / 3.0;
    let normal = Normal::new(0.0, sigma).map_err(|_| SynthError::InvalidConfig {
      field: "shake",
      value: rmsd,
    })?;

    for instance in &mut self.instances {
      let x = normal.sample(rng);
      let y = normal.sample(rng);
      let z = normal.sample(rng);
      instance.displacement += glam::DVec3::new(x, y, z);
    }
    #[cfg(feature = "tracing")]
    tracing::debug!(rmsd, sigma, instances = self.instances.len(), "shake");
    Ok(())
  }

  /// Shift instances whose original `position.z > z` by `dz` along z.
  ///
  /// Selection uses the base position, not the displaced centre, so
  /// repeated shakes never change which instances are cut. Returns the
  /// number of instances moved.
  pub fn cut(&mut self, z: f64, dz: f64) -> usize {
    let mut moved = 0;
    for instance in self.instances.iter_mut().filter(|i| i.position.z > z) {
      instance.displacement.z += dz;
      moved += 1;
    }
    #[cfg(feature = "tracing")]
    tracing::debug!(z, dz, moved, "cut");
    moved
  }

  /// Deactivate `max(1, round(fraction * n))` instances drawn uniformly
  /// without replacement. The count is capped at `n`.
  ///
  /// Already inactive instances may be drawn again with no further effect.
  /// Returns the labels drawn, in draw order. An empty scene is left as is.
  pub fn erase<R: Rng + ?Sized>(&mut self, fraction: f64, rng: &mut R) -> Vec<u32> {
    let n = self.instances.len();
    if n == 0 {
      return Vec::new();
    }

    let wanted = (fraction * n as f64).round();
    let count = if wanted >= 1.0 { (wanted as usize).min(n) } else { 1 };

    let labels: Vec<u32> = index::sample(rng, n, count)
      .into_iter()
      .map(|idx| {
        let instance = &mut self.instances[idx];
        instance.active = false;
        instance.label
      })
      .collect();

    #[cfg(feature = "tracing")]
    tracing::debug!(fraction, erased = labels.len(), active = self.active_count(), "erase");
    labels
  }

  /// Apply the present parts of `perturbation` in the order shake, cut,
  /// erase. Returns the labels drawn by `erase`, if it ran.
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "scene::perturb"))]
  pub fn perturb<R: Rng + ?Sized>(&mut self, perturbation: &Perturbation, rng: &mut R) -> Result<Vec<u32>> {
    if let Some(rmsd) = perturbation.shake {
      self.shake(rmsd, rng)?;
    }
    if let Some(Cut { z, dz }) = perturbation.cut {
      self.cut(z, dz);
    }
    Ok(match perturbation.erase {
      Some(fraction) => self.erase(fraction, rng),
      None => Vec::new(),
    })
  }

  /// Zero every displacement and reactivate every instance.
  pub fn reset(&mut self) {
    for instance in &mut self.instances {
      instance.displacement = glam::DVec3::ZERO;
      instance.active = true;
    }
  }
}

#[cfg(test)]
#[path = "perturb_test.rs"]
mod perturb_test;
