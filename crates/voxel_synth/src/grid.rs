//! Dense grid storage for volumes and images.
//!
//! # Memory Layout
//!
//! ```text
//! Volume memory layout (row-major, Z innermost):
//!
//! Address:  0       1       ...  nz-1       nz      ...
//! Content: [0,0,0] [0,0,1]  ... [0,0,nz-1] [0,1,0] ...
//!          └────────── Z ──────────────┘   └── Z ...
//!
//! index = x * (ny * nz) + y * nz + z
//! ```
//!
//! Voxel `[x, y, z]` has its centre at world coordinate `(x, y, z)`, so a
//! point `p` and a voxel index are directly comparable.
//!
//! Images (`Grid2`) are row-major with `index = row * cols + col`.

/// Convert 3D coordinates to a linear index for a grid of `dims`.
#[inline(always)]
pub const fn coord_to_index(dims: [usize; 3], x: usize, y: usize, z: usize) -> usize {
  (x * dims[1] + y) * dims[2] + z
}

/// Convert a linear index back to 3D coordinates.
#[inline(always)]
pub const fn index_to_coord(dims: [usize; 3], idx: usize) -> (usize, usize, usize) {
  let z = idx % dims[2];
  let xy = idx / dims[2];
  (xy / dims[1], xy % dims[1], z)
}

// =============================================================================
// Grid3 - dense 3D array
// =============================================================================

/// Dense 3D array with x-major layout.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid3<T> {
  dims: [usize; 3],
  data: Vec<T>,
}

impl<T: Copy> Grid3<T> {
  /// Create a grid with every voxel set to `value`.
  pub fn filled(dims: [usize; 3], value: T) -> Self {
    Self {
      dims,
      data: vec![value; dims[0] * dims[1] * dims[2]],
    }
  }

  /// Create an `n×n×n` grid with every voxel set to `value`.
  pub fn cube(n: usize, value: T) -> Self {
    Self::filled([n, n, n], value)
  }

  /// Wrap existing data. Returns `None` if the length does not match `dims`.
  pub fn from_vec(dims: [usize; 3], data: Vec<T>) -> Option<Self> {
    (data.len() == dims[0] * dims[1] * dims[2]).then_some(Self { dims, data })
  }

  /// Build a grid by evaluating `f` at every voxel.
  pub fn from_fn(dims: [usize; 3], mut f: impl FnMut(usize, usize, usize) -> T) -> Self {
    let mut data = Vec::with_capacity(dims[0] * dims[1] * dims[2]);
    for x in 0..dims[0] {
      for y in 0..dims[1] {
        for z in 0..dims[2] {
          data.push(f(x, y, z));
        }
      }
    }
    Self { dims, data }
  }

  #[inline]
  pub fn dims(&self) -> [usize; 3] {
    self.dims
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.data.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.data.is_empty()
  }

  #[inline]
  pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
    coord_to_index(self.dims, x, y, z)
  }

  #[inline]
  pub fn get(&self, x: usize, y: usize, z: usize) -> T {
    self.data[self.index(x, y, z)]
  }

  #[inline]
  pub fn set(&mut self, x: usize, y: usize, z: usize, value: T) {
    let idx = self.index(x, y, z);
    self.data[idx] = value;
  }

  pub fn as_slice(&self) -> &[T] {
    &self.data
  }

  pub fn as_mut_slice(&mut self) -> &mut [T] {
    &mut self.data
  }

  pub fn into_vec(self) -> Vec<T> {
    self.data
  }

  /// Map every voxel through `f`, keeping the shape.
  pub fn map<U: Copy>(&self, f: impl Fn(T) -> U) -> Grid3<U> {
    Grid3 {
      dims: self.dims,
      data: self.data.iter().map(|&v| f(v)).collect(),
    }
  }

  /// Axis-aligned cross-section at `index` along `axis`.
  ///
  /// The remaining two axes keep their order: axis 0 gives a `(y, z)`
  /// image, axis 1 gives `(x, z)`, axis 2 gives `(x, y)`.
  pub fn section(&self, axis: usize, index: usize) -> Grid2<T> {
    let [nx, ny, nz] = self.dims;
    match axis {
      0 => Grid2::from_fn(ny, nz, |r, c| self.get(index, r, c)),
      1 => Grid2::from_fn(nx, nz, |r, c| self.get(r, index, c)),
      _ => Grid2::from_fn(nx, ny, |r, c| self.get(r, c, index)),
    }
  }
}

impl<T: Copy + Default> Grid3<T> {
  /// Create a grid filled with `T::default()`.
  pub fn zeros(dims: [usize; 3]) -> Self {
    Self::filled(dims, T::default())
  }
}

// =============================================================================
// Grid2 - dense 2D image
// =============================================================================

/// Dense row-major 2D array.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid2<T> {
  rows: usize,
  cols: usize,
  data: Vec<T>,
}

impl<T: Copy> Grid2<T> {
  pub fn filled(rows: usize, cols: usize, value: T) -> Self {
    Self {
      rows,
      cols,
      data: vec![value; rows * cols],
    }
  }

  /// Wrap existing row-major data. Returns `None` on a length mismatch.
  pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Option<Self> {
    (data.len() == rows * cols).then_some(Self { rows, cols, data })
  }

  pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
    let mut data = Vec::with_capacity(rows * cols);
    for r in 0..rows {
      for c in 0..cols {
        data.push(f(r, c));
      }
    }
    Self { rows, cols, data }
  }

  #[inline]
  pub fn rows(&self) -> usize {
    self.rows
  }

  #[inline]
  pub fn cols(&self) -> usize {
    self.cols
  }

  /// `[rows, cols]`
  #[inline]
  pub fn shape(&self) -> [usize; 2] {
    [self.rows, self.cols]
  }

  #[inline]
  pub fn get(&self, row: usize, col: usize) -> T {
    self.data[row * self.cols + col]
  }

  pub fn as_slice(&self) -> &[T] {
    &self.data
  }

  pub fn as_mut_slice(&mut self) -> &mut [T] {
    &mut self.data
  }

  /// Iterate rows as slices, top to bottom.
  pub fn row_iter(&self) -> impl Iterator<Item = &[T]> {
    // chunks(0) panics; an empty image has no rows to yield anyway
    self.data.chunks(self.cols.max(1)).take(self.rows)
  }

  pub fn map<U: Copy>(&self, f: impl Fn(T) -> U) -> Grid2<U> {
    Grid2 {
      rows: self.rows,
      cols: self.cols,
      data: self.data.iter().map(|&v| f(v)).collect(),
    }
  }
}

#[cfg(test)]
#[path = "grid_test.rs"]
mod grid_test;
