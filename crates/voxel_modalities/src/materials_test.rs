use super::*;

#[test]
fn test_veqf_actions() {
  let actions = composite_actions("VEQF", &["Si", "Al", " K"]).unwrap();

  assert_eq!(actions.tomography.classes(), 4);
  assert_eq!(actions.tomography.outputs(), 1);
  assert_eq!(actions.tomography.column(0), vec![0.0, 0.386, 0.797, 0.637]);

  assert_eq!(actions.elements, vec!["Si", "Al", "K"]);
  assert_eq!(actions.elemental.row(0), &[0.0, 0.0, 0.0]);
  assert_eq!(actions.elemental.row(1), &[0.0, 0.0, 0.0]);
  assert_eq!(actions.elemental.row(2), &[44.1, 0.0, 0.0]);
  assert_eq!(actions.elemental.row(3), &[27.6, 9.2, 9.2]);
}

#[test]
fn test_duplicate_element_credits_first_column() {
  let actions = composite_actions("VEQF", &DEFAULT_ELEMENTS).unwrap();
  // Si, Al, Fe, Ca, Al, K
  assert_eq!(actions.elemental.row(3), &[27.6, 9.2, 0.0, 0.0, 0.0, 9.2]);
}

#[test]
fn test_veqi_and_veqm() {
  let veqi = composite_actions("VEQI", &["Fe", "O"]).unwrap();
  assert_eq!(veqi.tomography.get(3, 0), 1.383);
  assert_eq!(veqi.elemental.row(3), &[65.6, 98.4]);

  let veqm = composite_actions("VEQM", &["Ca"]).unwrap();
  assert_eq!(veqm.tomography.get(2, 0), veqm.tomography.get(3, 0));
  assert_eq!(veqm.elemental.column(0), vec![0.0, 0.0, 0.0, 26.46]);
}

#[test]
fn test_unknown_names() {
  assert_eq!(
    composite_actions("XYZ", &["Si"]).unwrap_err(),
    ModalityError::UnknownComposite { name: "XYZ".into() }
  );

  // Unlisted elements simply produce a zero column
  let actions = composite_actions("VEQF", &["Xe"]).unwrap();
  assert_eq!(actions.elemental.column(0), vec![0.0; 4]);
}

#[test]
fn test_every_composite_resolves() {
  for composite in &COMPOSITES {
    for name in composite.classes {
      assert!(find_material(name).is_some(), "{name}");
    }
  }
  assert_eq!(find_material("Quartz").and_then(|m| m.atoms_of(" Si ")), Some(44.1));
  assert_eq!(find_material("Vacuum").map(|m| m.density), Some(0.0));
}
