//! Raw little-endian volume export with a JSON manifest.
//!
//! Each pyramid level is written whole, one flat file per channel. There is
//! no chunking or compression; `manifest.json` records the format so a
//! reader can tell it apart from a chunked multiscale store.
//!
//! Output layout:
//! - `manifest.json`
//! - `level_{k}/channel_{c}.f32`: x-major, z fastest
//! - `labels/class_map.u8`, `labels/instance_map.u32`

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use voxel_modalities::ChannelStack;
use voxel_synth::{Grid3, GridTriple, Perturbation, SceneConfig};

use crate::config::{ExportConfig, ModalityConfig};

/// Value of `Manifest::format`.
pub const FORMAT: &str = "raw-le-x-major";

/// Everything a reader needs to interpret the raw files.
#[derive(Debug, Serialize)]
pub struct Manifest {
	/// Always `FORMAT`: unchunked little-endian, x-major, z fastest.
	pub format: &'static str,
	pub seed: Option<u64>,
	pub instances: usize,
	pub active_instances: usize,
	pub channels: Vec<String>,
	pub levels: Vec<LevelEntry>,
	pub labels: Vec<String>,
	pub scene: SceneConfig,
	pub perturbation: Option<Perturbation>,
	pub modality: ModalityConfig,
	pub export: ExportConfig,
}

#[derive(Debug, Serialize)]
pub struct LevelEntry {
	pub level: usize,
	/// `[nx, ny, nz]`
	pub dims: [usize; 3],
	pub files: Vec<String>,
}

/// Write a value stream to `path` through a buffered writer.
fn write_raw<T: Copy, const N: usize>(path: &Path, values: &[T], encode: impl Fn(T) -> [u8; N]) -> Result<()> {
	let file = File::create(path).with_context(|| format!("Failed to create: {}", path.display()))?;
	let mut writer = BufWriter::new(file);
	for &v in values {
		writer
			.write_all(&encode(v))
			.with_context(|| format!("Failed to write: {}", path.display()))?;
	}
	writer
		.flush()
		.with_context(|| format!("Failed to flush: {}", path.display()))?;
	Ok(())
}

/// Volume as little-endian `f32`.
pub fn write_f32(path: &Path, grid: &Grid3<f64>) -> Result<()> {
	write_raw(path, grid.as_slice(), |v| (v as f32).to_le_bytes())
}

pub fn write_u8(path: &Path, grid: &Grid3<u8>) -> Result<()> {
	fs::write(path, grid.as_slice()).with_context(|| format!("Failed to write: {}", path.display()))
}

pub fn write_u32(path: &Path, grid: &Grid3<u32>) -> Result<()> {
	write_raw(path, grid.as_slice(), |v| v.to_le_bytes())
}

/// Write every pyramid level; returns one manifest entry per level.
pub fn write_levels(output_dir: &Path, levels: &[ChannelStack]) -> Result<Vec<LevelEntry>> {
	let mut entries = Vec::with_capacity(levels.len());
	for (level, stack) in levels.iter().enumerate() {
		let dir = output_dir.join(format!("level_{}", level));
		fs::create_dir_all(&dir).with_context(|| format!("Failed to create output dir: {}", dir.display()))?;

		let mut files = Vec::with_capacity(stack.len());
		for (c, grid) in stack.channels().iter().enumerate() {
			let name = format!("level_{}/channel_{}.f32", level, c);
			write_f32(&output_dir.join(&name), grid)?;
			files.push(name);
		}
		log::debug!("wrote level {} ({:?}, {} channels)", level, stack.dims(), stack.len());
		entries.push(LevelEntry {
			level,
			dims: stack.dims(),
			files,
		});
	}
	Ok(entries)
}

/// Write the class and instance maps under `labels/`.
pub fn write_labels(output_dir: &Path, grids: &GridTriple) -> Result<Vec<String>> {
	let dir = output_dir.join("labels");
	fs::create_dir_all(&dir).with_context(|| format!("Failed to create output dir: {}", dir.display()))?;

	let class_map = "labels/class_map.u8".to_string();
	let instance_map = "labels/instance_map.u32".to_string();
	write_u8(&output_dir.join(&class_map), &grids.class_map)?;
	write_u32(&output_dir.join(&instance_map), &grids.instance_map)?;
	Ok(vec![class_map, instance_map])
}

pub fn write_manifest(output_dir: &Path, manifest: &Manifest) -> Result<PathBuf> {
	let path = output_dir.join("manifest.json");
	let json = serde_json::to_string_pretty(manifest).context("Failed to serialize manifest")?;
	fs::write(&path, json).with_context(|| format!("Failed to write: {}", path.display()))?;
	Ok(path)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn scratch_dir(name: &str) -> PathBuf {
		let dir = std::env::temp_dir().join(format!("voxel_synth_cli_{}_{}", name, std::process::id()));
		let _ = fs::remove_dir_all(&dir);
		fs::create_dir_all(&dir).unwrap();
		dir
	}

	#[test]
	fn raw_files_are_little_endian_x_major() {
		let dir = scratch_dir("raw");
		let grid = Grid3::from_fn([2, 1, 2], |x, _, z| (10 * x + z) as f64);
		write_f32(&dir.join("v.f32"), &grid).unwrap();

		let bytes = fs::read(dir.join("v.f32")).unwrap();
		let values: Vec<f32> = bytes
			.chunks_exact(4)
			.map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
			.collect();
		assert_eq!(values, vec![0.0, 1.0, 10.0, 11.0]);

		let labels = Grid3::from_vec([1, 1, 2], vec![1u32, 258]).unwrap();
		write_u32(&dir.join("l.u32"), &labels).unwrap();
		assert_eq!(fs::read(dir.join("l.u32")).unwrap(), vec![1, 0, 0, 0, 2, 1, 0, 0]);

		fs::remove_dir_all(&dir).unwrap();
	}

	#[test]
	fn levels_and_labels_layout() {
		let dir = scratch_dir("layout");
		let stack = ChannelStack::from_channels(vec![Grid3::cube(4, 1.0), Grid3::cube(4, 2.0)]).unwrap();
		let small = ChannelStack::from_channels(vec![Grid3::cube(1, 1.0), Grid3::cube(1, 2.0)]).unwrap();

		let entries = write_levels(&dir, &[stack, small]).unwrap();
		assert_eq!(entries.len(), 2);
		assert_eq!(entries[1].dims, [1, 1, 1]);
		assert_eq!(entries[1].files, vec!["level_1/channel_0.f32", "level_1/channel_1.f32"]);
		assert_eq!(fs::read(dir.join("level_0/channel_1.f32")).unwrap().len(), 64 * 4);

		let grids = GridTriple::empty(3);
		let files = write_labels(&dir, &grids).unwrap();
		assert_eq!(fs::read(dir.join(&files[0])).unwrap().len(), 27);
		assert_eq!(fs::read(dir.join(&files[1])).unwrap().len(), 27 * 4);

		fs::remove_dir_all(&dir).unwrap();
	}

	#[test]
	fn manifest_records_format() {
		let dir = scratch_dir("manifest");
		let manifest = Manifest {
			format: FORMAT,
			seed: Some(42),
			instances: 7,
			active_instances: 6,
			channels: vec!["electron_density".to_string()],
			levels: Vec::new(),
			labels: Vec::new(),
			scene: SceneConfig::default(),
			perturbation: None,
			modality: ModalityConfig::default(),
			export: ExportConfig::default(),
		};
		let path = write_manifest(&dir, &manifest).unwrap();

		let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
		assert_eq!(json["format"], "raw-le-x-major");
		assert_eq!(json["seed"], 42);
		assert_eq!(json["scene"]["size"], 128);

		fs::remove_dir_all(&dir).unwrap();
	}
}
