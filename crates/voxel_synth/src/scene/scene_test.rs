use glam::DVec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::*;
use crate::error::SynthError;

fn config() -> SceneConfig {
  SceneConfig::default().with_size(48).with_border(4.0).with_radius(9.0)
}

#[test]
fn test_same_seed_same_scene() {
  let a = Scene::from_seed(config(), Some(42)).unwrap();
  let b = Scene::from_seed(config(), Some(42)).unwrap();
  assert_eq!(a.instances(), b.instances());
  assert!(!a.is_empty());

  let c = Scene::from_seed(config(), Some(43)).unwrap();
  assert_ne!(a.instances(), c.instances());
}

#[test]
fn test_labels_are_sequential_from_two() {
  let scene = Scene::from_seed(config(), Some(1)).unwrap();
  for (i, instance) in scene.instances().iter().enumerate() {
    assert_eq!(instance.label, FIRST_INSTANCE_LABEL + i as u32);
    assert_eq!(scene.instance(instance.label), Some(instance));
    assert!(instance.active);
    assert_eq!(instance.displacement, DVec3::ZERO);
  }
  assert_eq!(scene.instance(0), None);
  assert_eq!(scene.instance(1), None);
  assert_eq!(scene.instance(FIRST_INSTANCE_LABEL + scene.len() as u32), None);
  assert_eq!(scene.active_count(), scene.len());
}

#[test]
fn test_size_multiplier_range_and_geometry() {
  let config = config().with_size_jitter(0.9, 0.2);
  let scene = Scene::from_seed(config.clone(), Some(6)).unwrap();

  for instance in scene.instances() {
    assert!((0.8..=1.0).contains(&instance.size), "size {}", instance.size);
    match instance.shape {
      Shape::Sphere { radius } => {
        assert!((radius - config.sphere_radius() * instance.size).abs() < 1e-12);
      }
      Shape::Ellipsoid { major, minor, .. } => {
        assert!((major - config.major_axis() * instance.size).abs() < 1e-12);
        assert!((minor - config.minor_axis() * instance.size).abs() < 1e-12);
      }
    }
  }
}

#[test]
fn test_fraction_controls_shape_kind() {
  let spheres = Scene::from_seed(config().with_fraction(0.0), Some(2)).unwrap();
  assert!(spheres.instances().iter().all(|i| i.kind() == ShapeKind::Sphere));

  let ellipsoids = Scene::from_seed(config().with_fraction(1.0), Some(2)).unwrap();
  assert!(ellipsoids.instances().iter().all(|i| i.kind() == ShapeKind::Ellipsoid));

  // Same centres either way: the sampler runs before any shape draw
  let a: Vec<DVec3> = spheres.instances().iter().map(|i| i.position).collect();
  let b: Vec<DVec3> = ellipsoids.instances().iter().map(|i| i.position).collect();
  assert_eq!(a, b);
}

#[test]
fn test_positions_respect_border() {
  let config = config();
  let scene = Scene::from_seed(config.clone(), Some(11)).unwrap();
  let hi = config.size as f64 - config.border;
  for instance in scene.instances() {
    assert!(instance.position.cmpgt(DVec3::splat(config.border)).all());
    assert!(instance.position.cmplt(DVec3::splat(hi)).all());
  }
}

#[test]
fn test_from_points_keeps_order() {
  let points = [DVec3::new(20.0, 10.0, 10.0), DVec3::new(10.0, 20.0, 30.0)];
  let mut rng = ChaCha8Rng::seed_from_u64(0);
  let scene = Scene::from_points(config(), &points, &mut rng).unwrap();
  assert_eq!(scene.len(), 2);
  assert_eq!(scene.instances()[0].position, points[0]);
  assert_eq!(scene.instances()[1].position, points[1]);
  assert_eq!(scene.instances()[1].label, 3);
}

#[test]
fn test_invalid_config_is_rejected() {
  let err = Scene::from_seed(config().with_fraction(1.5), Some(0)).unwrap_err();
  assert_eq!(
    err,
    SynthError::InvalidConfig {
      field: "fraction",
      value: 1.5
    }
  );
  assert!(Scene::from_seed(config().with_size(0), Some(0)).is_err());
}

#[test]
fn test_border_swallowing_domain_gives_empty_scene() {
  let scene = Scene::from_seed(config().with_border(30.0), Some(0)).unwrap();
  assert!(scene.is_empty());
  let grids = scene.fill().unwrap();
  assert!(grids.labels_consistent());
  assert_eq!(grids.class_histogram()[2] + grids.class_histogram()[3], 0);
}

#[test]
fn test_entropy_seed_builds() {
  let scene = Scene::from_seed(config(), None).unwrap();
  assert!(!scene.is_empty());
  assert_eq!(scene.size(), 48);
  assert_eq!(scene.config(), &config());
}
