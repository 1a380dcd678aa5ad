//! Benchmarks for label softening and the modality chain.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use voxel_modalities::{blur_classes, composite_actions, gaussian_filter, weighted_map};
use voxel_synth::{Grid3, Scene, SceneConfig};

fn class_map(size: usize) -> Grid3<u8> {
  let config = SceneConfig::default().with_size(size).with_border(size as f64 / 8.0);
  match Scene::from_seed(config, Some(42)).and_then(|scene| scene.fill()) {
    Ok(grids) => grids.class_map,
    Err(_) => Grid3::cube(size, 0),
  }
}

/// Single-channel Gaussian over a 64³ volume at several widths.
fn bench_gaussian(c: &mut Criterion) {
  let grid = class_map(64).map(f64::from);
  let mut group = c.benchmark_group("gaussian_filter_64");
  group.throughput(Throughput::Elements(grid.len() as u64));

  for sigma in [0.5, 1.0, 2.0] {
    group.bench_with_input(BenchmarkId::from_parameter(sigma), &sigma, |b, &sigma| {
      b.iter(|| black_box(gaussian_filter(&grid, sigma)))
    });
  }
  group.finish();
}

/// Blur plus contraction: the per-volume cost of one modality channel set.
fn bench_modality_chain(c: &mut Criterion) {
  let classes = class_map(64);
  let Ok(actions) = composite_actions("VEQF", &["Si", "Al", "K"]) else {
    return;
  };

  c.bench_function("blur_and_weight (64³, VEQF)", |b| {
    b.iter(|| {
      let probs = blur_classes(&classes, 0.5, 4);
      black_box(weighted_map(&probs, &actions.elemental))
    })
  });
}

criterion_group!(benches, bench_gaussian, bench_modality_chain);
criterion_main!(benches);
