//! ASCII rendering of 2D fields for regression baselines and terminal output.

use crate::grid::Grid2;

/// Default ramp, lowest to highest intensity.
pub const DEFAULT_RAMP: &str = ".*:-=+#%@";

/// Render `image` with `DEFAULT_RAMP`.
pub fn render<T: Copy + Into<f64>>(image: &Grid2<T>) -> String {
  render_with(image, DEFAULT_RAMP)
}

/// Render `image` one character per sample, one line per row.
///
/// Values are normalized as `(v - min) / (max - min + 1e-8)` and mapped to
/// `ramp[floor(n * (len - 1))]`, so the maximum lands on the second-to-last
/// character. NaN samples are excluded from the range and drawn as a space.
pub fn render_with<T: Copy + Into<f64>>(image: &Grid2<T>, ramp: &str) -> String {
  let chars: Vec<char> = ramp.chars().collect();
  let mut out = String::with_capacity(image.rows() * (image.cols() + 1));
  if chars.is_empty() {
    return out;
  }

  let (min, max) = image
    .as_slice()
    .iter()
    .map(|&v| -> f64 { v.into() })
    .filter(|v| !v.is_nan())
    .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
  let span = max - min + 1e-8;
  let top = (chars.len() - 1) as f64;

  for row in image.row_iter() {
    for &value in row {
      let value: f64 = value.into();
      if value.is_nan() {
        out.push(' ');
        continue;
      }
      let level = ((value - min) / span * top) as usize;
      out.push(chars[level.min(chars.len() - 1)]);
    }
    out.push('\n');
  }
  out
}
