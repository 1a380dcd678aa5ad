use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::*;

fn mean(grid: &Grid3<f64>) -> f64 {
  grid.as_slice().iter().sum::<f64>() / grid.len() as f64
}

#[test]
fn test_multiplicative_mean_is_sqrt_half_pi() {
  let data = Grid3::cube(40, 1.0);
  let mut rng = ChaCha8Rng::seed_from_u64(12);
  let field = noise(&data, 1.0, 0.0, &mut rng);

  let expected = (std::f64::consts::PI / 2.0).sqrt();
  assert!((mean(&field) - expected).abs() < 0.015, "mean {}", mean(&field));
  assert!(field.as_slice().iter().all(|&v| v >= 0.0));
}

#[test]
fn test_noise_scales_with_data_and_factor() {
  let mut rng = ChaCha8Rng::seed_from_u64(3);
  let zeros = Grid3::cube(8, 0.0);
  let field = noise(&zeros, 5.0, 0.0, &mut rng);
  assert!(field.as_slice().iter().all(|&v| v == 0.0));

  // Same stream, doubled factor: exactly doubled field
  let data = Grid3::from_fn([6, 5, 4], |x, y, z| (x + y + z) as f64);
  let a = noise(&data, 1.0, 0.0, &mut ChaCha8Rng::seed_from_u64(9));
  let b = noise(&data, 2.0, 0.0, &mut ChaCha8Rng::seed_from_u64(9));
  for (&x, &y) in a.as_slice().iter().zip(b.as_slice()) {
    assert!((2.0 * x - y).abs() < 1e-12);
  }
}

#[test]
fn test_dark_noise_is_signal_independent() {
  let data = Grid3::cube(40, 0.0);
  let mut rng = ChaCha8Rng::seed_from_u64(4);
  let field = noise(&data, 1.0, 2.0, &mut rng);
  let expected = 2.0 * (std::f64::consts::PI / 2.0).sqrt();
  assert!((mean(&field) - expected).abs() < 0.03);
}

#[test]
fn test_add_noise_touches_every_channel() {
  let clean = vec![Grid3::cube(4, 1.0), Grid3::cube(4, 3.0)];
  let mut stack = ChannelStack::from_channels(clean.clone()).unwrap();
  let mut rng = ChaCha8Rng::seed_from_u64(5);
  add_noise(&mut stack, 0.1, 0.05, &mut rng);

  for (noisy, clean) in stack.channels().iter().zip(&clean) {
    assert_ne!(noisy, clean);
    for (&n, &c) in noisy.as_slice().iter().zip(clean.as_slice()) {
      assert!(n >= c);
    }
  }
}
