//! The 32³ reference scenario carried through every modality stage.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use voxel_modalities::{add_noise, blur_classes, blur_it, composite_actions, pyramid, weighted_map, DEFAULT_FACTOR};
use voxel_synth::{ClassLabel, Scene, SceneConfig};

fn scene() -> Scene {
  let config = SceneConfig::default().with_size(32).with_border(5.0).with_radius(10.0);
  Scene::from_seed(config, Some(42)).unwrap()
}

#[test]
fn blurred_probabilities_sum_to_volume() {
  let grids = scene().fill().unwrap();
  let probs = blur_it(&grids.class_map, 0.5);

  let n = 32usize.pow(3) as f64;
  assert!((probs.total() - n).abs() < 1e-6, "total {}", probs.total());
  assert_eq!(probs.dims(), [32; 3]);
}

#[test]
fn modality_chain_shapes() {
  let grids = scene().fill().unwrap();
  let probs = blur_classes(&grids.class_map, 0.5, ClassLabel::COUNT);
  let actions = composite_actions("VEQF", &["Si", "Al", "K"]).unwrap();

  let tomography = weighted_map(&probs, &actions.tomography).unwrap();
  let mut elemental = weighted_map(&probs, &actions.elemental).unwrap();
  assert_eq!(tomography.shape(), [1, 32, 32, 32]);
  assert_eq!(elemental.shape(), [3, 32, 32, 32]);

  // Electron density is a convex blend of the table values
  for &v in tomography.channel(0).unwrap().as_slice() {
    assert!((-1e-12..=0.797 + 1e-12).contains(&v));
  }

  let mut rng = ChaCha8Rng::seed_from_u64(1);
  add_noise(&mut elemental, 0.05, 0.01, &mut rng);

  let levels = pyramid(&elemental, 2, DEFAULT_FACTOR).unwrap();
  assert_eq!(levels.len(), 3);
  assert_eq!(levels[2].shape(), [3, 2, 2, 2]);
}
