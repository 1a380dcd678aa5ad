//! Benchmarks for scene construction and label compositing.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use voxel_synth::{Perturbation, Scene, SceneConfig};

fn config(size: usize) -> SceneConfig {
  SceneConfig::default()
    .with_size(size)
    .with_border(size as f64 / 8.0)
}

/// Poisson-disk sampling plus instance draws.
fn bench_generate(c: &mut Criterion) {
  let mut group = c.benchmark_group("scene_generate");

  for size in [32usize, 64, 128] {
    group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
      b.iter(|| {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        black_box(Scene::generate(config(size), &mut rng))
      })
    });
  }

  group.finish();
}

/// Full fill: every instance plus the matrix pass.
fn bench_fill(c: &mut Criterion) {
  let mut group = c.benchmark_group("scene_fill");

  for size in [32usize, 64, 128] {
    let Ok(scene) = Scene::from_seed(config(size), Some(42)) else {
      continue;
    };
    group.throughput(Throughput::Elements((size * size * size) as u64));
    group.bench_with_input(BenchmarkId::from_parameter(size), &scene, |b, scene| {
      b.iter(|| black_box(scene.fill()))
    });
  }

  group.finish();
}

/// Perturb, fill, reset: one before/after pair per iteration.
fn bench_perturb_cycle(c: &mut Criterion) {
  let Ok(mut scene) = Scene::from_seed(config(64), Some(7)) else {
    return;
  };
  let perturbation = Perturbation::new().with_shake(2.0).with_cut(32.0, 3.0).with_erase(0.1);
  let mut rng = ChaCha8Rng::seed_from_u64(1);

  c.bench_function("scene_perturb_fill_reset (64³)", |b| {
    b.iter(|| {
      let _ = scene.perturb(&perturbation, &mut rng);
      let grids = scene.fill();
      scene.reset();
      black_box(grids)
    })
  });
}

criterion_group!(benches, bench_generate, bench_fill, bench_perturb_cycle);
criterion_main!(benches);
