//! Scene - the instance arena and its derived grids.
//!
//! A scene is built once from blue-noise centres. Its instance list never
//! grows or shrinks afterwards. Perturbation only edits each instance's
//! displacement and active flag.
//!
//! ```text
//! instances[i].label == FIRST_INSTANCE_LABEL + i
//!
//!   position ──┐
//!              ├──► center() ──► rasterize ──► fill()
//! displacement ┘
//!     active ───────────────────► skip when false
//! ```

pub mod compositing;
pub mod perturb;

use glam::DVec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::Result;
use crate::sampling::sample_positions;
use crate::shape::{Shape, ShapeKind};
use crate::types::{SceneConfig, FIRST_INSTANCE_LABEL};

pub use perturb::{Cut, Perturbation};

// =============================================================================
// Instance
// =============================================================================

/// One placed foreground object.
#[derive(Clone, Debug, PartialEq)]
pub struct Instance {
  /// Sampled centre in voxel coordinates. Never changes after construction.
  pub position: DVec3,
  /// Geometry with the size multiplier already applied.
  pub shape: Shape,
  /// Size multiplier drawn at construction.
  pub size: f64,
  /// Unique label, `>= FIRST_INSTANCE_LABEL`.
  pub label: u32,
  /// Accumulated perturbation offset.
  pub displacement: DVec3,
  /// Cleared by `erase`, restored by `reset`.
  pub active: bool,
}

impl Instance {
  /// Effective centre: base position plus displacement.
  #[inline]
  pub fn center(&self) -> DVec3 {
    self.position + self.displacement
  }

  #[inline]
  pub fn kind(&self) -> ShapeKind {
    self.shape.kind()
  }
}

// =============================================================================
// Scene
// =============================================================================

/// Ordered collection of instances in a cubic domain.
#[derive(Clone, Debug)]
pub struct Scene {
  config: SceneConfig,
  instances: Vec<Instance>,
}

impl Scene {
  /// Sample centres and draw instance attributes from `rng`.
  ///
  /// Randomness is consumed in a fixed order: the Poisson-disk walk first,
  /// then per instance (in emission order) the shape trial, the rotation for
  /// ellipsoids, and the size multiplier.
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "scene::generate"))]
  pub fn generate<R: Rng + ?Sized>(config: SceneConfig, rng: &mut R) -> Result<Self> {
    config.validate()?;
    let points = sample_positions(config.size, config.radius, config.border, config.candidates, rng);
    Self::from_points(config, &points, rng)
  }

  /// Seeded construction with a ChaCha8 stream; `None` draws the seed from
  /// OS entropy.
  pub fn from_seed(config: SceneConfig, seed: Option<u64>) -> Result<Self> {
    let mut rng = match seed {
      Some(seed) => ChaCha8Rng::seed_from_u64(seed),
      None => ChaCha8Rng::from_os_rng(),
    };
    Self::generate(config, &mut rng)
  }

  /// Build instances at caller-supplied centres, in the given order.
  pub fn from_points<R: Rng + ?Sized>(config: SceneConfig, points: &[DVec3], rng: &mut R) -> Result<Self> {
    config.validate()?;

    let sphere_radius = config.sphere_radius();
    let major = config.major_axis();
    let minor = config.minor_axis();

    let instances: Vec<Instance> = points
      .iter()
      .zip(FIRST_INSTANCE_LABEL..)
      .map(|(&position, label)| {
        let ellipsoid = rng.random::<f64>() < config.fraction;
        let rotation = ellipsoid.then(|| crate::shape::random_rotation(rng));
        let size = rng.random::<f64>() * config.delta - config.delta / 2.0 + config.mean_scale;
        let shape = match rotation {
          Some(rotation) => Shape::ellipsoid(major * size, minor * size, rotation),
          None => Shape::sphere(sphere_radius * size),
        };
        Instance {
          position,
          shape,
          size,
          label,
          displacement: DVec3::ZERO,
          active: true,
        }
      })
      .collect();

    #[cfg(feature = "tracing")]
    tracing::debug!(
      instances = instances.len(),
      ellipsoids = instances.iter().filter(|i| i.kind() == ShapeKind::Ellipsoid).count(),
      size = config.size,
      "scene constructed"
    );

    Ok(Self { config, instances })
  }

  pub fn config(&self) -> &SceneConfig {
    &self.config
  }

  /// Domain edge length `N`.
  pub fn size(&self) -> usize {
    self.config.size
  }

  pub fn instances(&self) -> &[Instance] {
    &self.instances
  }

  pub fn len(&self) -> usize {
    self.instances.len()
  }

  pub fn is_empty(&self) -> bool {
    self.instances.is_empty()
  }

  /// Look up an instance by label.
  pub fn instance(&self, label: u32) -> Option<&Instance> {
    let idx = label.checked_sub(FIRST_INSTANCE_LABEL)? as usize;
    self.instances.get(idx)
  }

  pub fn active_count(&self) -> usize {
    self.instances.iter().filter(|i| i.active).count()
  }

  /// Labels of the currently active instances, in creation order.
  pub fn active_labels(&self) -> Vec<u32> {
    self.instances.iter().filter(|i| i.active).map(|i| i.label).collect()
  }
}

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;
