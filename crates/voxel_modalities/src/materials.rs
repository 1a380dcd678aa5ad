//! Static material table and composite class assignments.
//!
//! A composite maps class codes `0..4` to materials. From it come two
//! action matrices:
//!
//! ```text
//! tomography  C × 1   electron density per class (electrons/nm³)
//! elemental   C × E   atom density per class for each requested element
//! ```

use crate::error::{ModalityError, Result};
use crate::weighted::ActionMatrix;

/// Elements tracked per material, in table column order.
pub const ELEMENTS: [&str; 6] = ["Ca", "O", "Si", "Al", "K", "Fe"];

/// Element order of the reference elemental table. `Al` appears twice; only
/// its first column receives counts.
pub const DEFAULT_ELEMENTS: [&str; 6] = ["Si", "Al", "Fe", "Ca", "Al", "K"];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
  pub name: &'static str,
  /// g/cm³
  pub density: f64,
  /// electrons/nm³
  pub electron_density: f64,
  /// atoms/nm³, indexed like `ELEMENTS`
  pub atoms: [f64; 6],
}

impl Material {
  /// Atom density for `element`, matched with whitespace trimmed.
  pub fn atoms_of(&self, element: &str) -> Option<f64> {
    let element = element.trim();
    ELEMENTS
      .iter()
      .position(|&e| e == element)
      .map(|i| self.atoms[i])
  }
}

const fn material(name: &'static str, density: f64, electron_density: f64, atoms: [f64; 6]) -> Material {
  Material {
    name,
    density,
    electron_density,
    atoms,
  }
}

pub static MATERIALS: [Material; 8] = [
  material("Quartz", 2.65, 0.797, [0.0, 88.2, 44.1, 0.0, 0.0, 0.0]),
  material("Feldspar", 2.56, 0.637, [0.0, 73.6, 27.6, 9.2, 9.2, 0.0]),
  material("Calcite", 2.71, 0.815, [27.1, 81.2, 0.0, 0.0, 0.0, 0.0]),
  material("Iron Oxide", 5.24, 1.383, [0.0, 98.4, 0.0, 0.0, 0.0, 65.6]),
  material("Vaterite", 2.4, 0.722, [24.0, 71.9, 0.0, 0.0, 0.0, 0.0]),
  material("Calcite/Vaterite Mix", 0.0, 0.797, [26.46, 79.39, 0.0, 0.0, 0.0, 0.0]),
  material("Epon 812 Epoxy", 1.2, 0.386, [0.0, 14.1, 0.0, 0.0, 0.0, 0.0]),
  material("Vacuum", 0.0, 0.0, [0.0; 6]),
];

/// Four-class material assignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Composite {
  pub name: &'static str,
  /// Material name for each class code.
  pub classes: [&'static str; 4],
  pub comment: &'static str,
}

pub static COMPOSITES: [Composite; 3] = [
  Composite {
    name: "VEQF",
    classes: ["Vacuum", "Epon 812 Epoxy", "Quartz", "Feldspar"],
    comment: "Minimal contrast between Quartz (0.797) and Feldspar (0.637)",
  },
  Composite {
    name: "VEQI",
    classes: ["Vacuum", "Epon 812 Epoxy", "Quartz", "Iron Oxide"],
    comment: "Large contrast between Quartz (0.797) and Iron Oxide (1.383)",
  },
  Composite {
    name: "VEQM",
    classes: ["Vacuum", "Epon 812 Epoxy", "Quartz", "Calcite/Vaterite Mix"],
    comment: "No contrast between Quartz (0.797) and Calcite/Vaterite (0.797)",
  },
];

pub fn find_material(name: &str) -> Option<&'static Material> {
  MATERIALS.iter().find(|m| m.name == name)
}

pub fn find_composite(name: &str) -> Option<&'static Composite> {
  COMPOSITES.iter().find(|c| c.name == name)
}

/// Tomographic and elemental actions of a composite.
#[derive(Clone, Debug, PartialEq)]
pub struct CompositeActions {
  /// `C × 1` electron densities.
  pub tomography: ActionMatrix,
  /// `C × E` atom densities, columns in requested element order.
  pub elemental: ActionMatrix,
  /// Requested element names, trimmed.
  pub elements: Vec<String>,
}

/// Build the action matrices for composite `name`.
///
/// Each table element is credited to the first requested column with the
/// same trimmed name; later duplicates stay zero. Unknown elements give a
/// zero column.
pub fn composite_actions<S: AsRef<str>>(name: &str, elements: &[S]) -> Result<CompositeActions> {
  let composite = find_composite(name).ok_or_else(|| ModalityError::UnknownComposite { name: name.to_string() })?;
  let elements: Vec<String> = elements.iter().map(|e| e.as_ref().trim().to_string()).collect();

  let mut tomography = Vec::with_capacity(composite.classes.len());
  let mut elemental = Vec::with_capacity(composite.classes.len());

  for material_name in composite.classes {
    let material = find_material(material_name).ok_or_else(|| ModalityError::UnknownMaterial {
      name: material_name.to_string(),
    })?;
    tomography.push(vec![material.electron_density]);

    let mut counts = vec![0.0; elements.len()];
    for (element, &atoms) in ELEMENTS.iter().zip(&material.atoms) {
      if let Some(column) = elements.iter().position(|e| e == element) {
        counts[column] += atoms;
      }
    }
    elemental.push(counts);
  }

  Ok(CompositeActions {
    tomography: ActionMatrix::from_rows(&tomography, 1)?,
    elemental: ActionMatrix::from_rows(&elemental, elements.len())?,
    elements,
  })
}

#[cfg(test)]
#[path = "materials_test.rs"]
mod materials_test;
