//! Contraction of class probabilities against per-class actions.
//!
//! ```text
//! out[m][v] = Σ_c  actions[c][m] · prob[c][v]
//!
//! prob: C × N³,  actions: C × M  ──►  out: M × N³
//! ```

use rayon::prelude::*;
use voxel_synth::Grid3;

use crate::error::{ModalityError, Result};
use crate::stack::ChannelStack;

/// Row-major `classes × outputs` matrix of per-class responses.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionMatrix {
  classes: usize,
  outputs: usize,
  data: Vec<f64>,
}

impl ActionMatrix {
  pub fn new(classes: usize, outputs: usize, data: Vec<f64>) -> Result<Self> {
    if data.len() != classes * outputs {
      return Err(ModalityError::ActionShape {
        rows: classes,
        cols: outputs,
        len: data.len(),
      });
    }
    Ok(Self { classes, outputs, data })
  }

  /// Build from one row per class; every row must have `outputs` entries.
  pub fn from_rows(rows: &[Vec<f64>], outputs: usize) -> Result<Self> {
    let data: Vec<f64> = rows.iter().flatten().copied().collect();
    if rows.iter().any(|r| r.len() != outputs) {
      return Err(ModalityError::ActionShape {
        rows: rows.len(),
        cols: outputs,
        len: data.len(),
      });
    }
    Self::new(rows.len(), outputs, data)
  }

  pub fn classes(&self) -> usize {
    self.classes
  }

  pub fn outputs(&self) -> usize {
    self.outputs
  }

  #[inline]
  pub fn get(&self, class: usize, output: usize) -> f64 {
    self.data[class * self.outputs + output]
  }

  /// Responses of one class across all outputs.
  pub fn row(&self, class: usize) -> &[f64] {
    &self.data[class * self.outputs..(class + 1) * self.outputs]
  }

  /// Responses of every class for one output.
  pub fn column(&self, output: usize) -> Vec<f64> {
    (0..self.classes).map(|c| self.get(c, output)).collect()
  }
}

/// Weighted sum of actions over the class axis, one output channel per
/// action column.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "weighted::weighted_map"))]
pub fn weighted_map(probabilities: &ChannelStack, actions: &ActionMatrix) -> Result<ChannelStack> {
  if probabilities.len() != actions.classes() {
    return Err(ModalityError::ClassCountMismatch {
      expected: probabilities.len(),
      found: actions.classes(),
    });
  }

  let dims = probabilities.dims();
  let channels: Vec<Grid3<f64>> = (0..actions.outputs())
    .into_par_iter()
    .map(|m| {
      let mut out = Grid3::zeros(dims);
      for (c, prob) in probabilities.channels().iter().enumerate() {
        let weight = actions.get(c, m);
        if weight == 0.0 {
          continue;
        }
        for (acc, &p) in out.as_mut_slice().iter_mut().zip(prob.as_slice()) {
          *acc += weight * p;
        }
      }
      out
    })
    .collect();

  #[cfg(feature = "tracing")]
  tracing::debug!(classes = actions.classes(), outputs = actions.outputs(), "weighted map");
  Ok(ChannelStack::from_uniform(dims, channels))
}

#[cfg(test)]
#[path = "weighted_test.rs"]
mod weighted_test;
