use super::*;

#[test]
fn test_coord_to_index_roundtrip() {
  let dims = [3, 4, 5];
  for x in 0..dims[0] {
    for y in 0..dims[1] {
      for z in 0..dims[2] {
        let idx = coord_to_index(dims, x, y, z);
        assert_eq!(index_to_coord(dims, idx), (x, y, z));
      }
    }
  }
}

#[test]
fn test_z_is_innermost() {
  let dims = [4, 4, 4];
  assert_eq!(coord_to_index(dims, 0, 0, 1), 1);
  assert_eq!(coord_to_index(dims, 0, 1, 0), 4);
  assert_eq!(coord_to_index(dims, 1, 0, 0), 16);
}

#[test]
fn test_from_vec_rejects_wrong_length() {
  assert!(Grid3::from_vec([2, 2, 2], vec![0u8; 7]).is_none());
  assert!(Grid3::from_vec([2, 2, 2], vec![0u8; 8]).is_some());
  assert!(Grid2::from_vec(2, 3, vec![0.0; 5]).is_none());
}

#[test]
fn test_from_fn_matches_get() {
  let grid = Grid3::from_fn([2, 3, 4], |x, y, z| (x * 100 + y * 10 + z) as u32);
  assert_eq!(grid.get(1, 2, 3), 123);
  assert_eq!(grid.get(0, 1, 0), 10);
  assert_eq!(grid.len(), 24);
}

#[test]
fn test_sections_follow_numpy_indexing() {
  let grid = Grid3::from_fn([3, 4, 5], |x, y, z| (x * 100 + y * 10 + z) as u32);

  // grid[1, :, :]
  let sx = grid.section(0, 1);
  assert_eq!(sx.shape(), [4, 5]);
  assert_eq!(sx.get(2, 3), 123);

  // grid[:, 2, :]
  let sy = grid.section(1, 2);
  assert_eq!(sy.shape(), [3, 5]);
  assert_eq!(sy.get(1, 4), 124);

  // grid[:, :, 3]
  let sz = grid.section(2, 3);
  assert_eq!(sz.shape(), [3, 4]);
  assert_eq!(sz.get(2, 1), 213);
}

#[test]
fn test_row_iter() {
  let image = Grid2::from_fn(2, 3, |r, c| r * 3 + c);
  let rows: Vec<&[usize]> = image.row_iter().collect();
  assert_eq!(rows, vec![&[0, 1, 2][..], &[3, 4, 5][..]]);
}

#[test]
fn test_map_keeps_shape() {
  let grid = Grid3::cube(2, 3u8);
  let mapped = grid.map(f64::from);
  assert_eq!(mapped.dims(), [2, 2, 2]);
  assert!(mapped.as_slice().iter().all(|&v| v == 3.0));
}
