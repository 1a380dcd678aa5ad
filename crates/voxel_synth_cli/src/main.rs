//! Synthetic labeled volume generator.
//!
//! `generate` runs the whole chain and writes raw volumes:
//! scene → fill → (perturb → fill) → blur → material actions → (noise) → pyramid.
//!
//! `slice` prints an oblique cross-section of a generated scene as ASCII art.

mod config;
mod export;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use glam::DVec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::{Path, PathBuf};
use voxel_modalities::{add_noise, blur_classes, composite_actions, pyramid, weighted_map, ChannelStack};
use voxel_synth::{ascii, ClassLabel, GridTriple, Interpolation, PlaneSlicer, Scene};

use config::Config;
use export::Manifest;

/// Synthetic labeled volume generator.
#[derive(Parser, Debug)]
#[command(name = "synth")]
#[command(about = "Generates labeled 3D test volumes and oblique slices")]
struct Cli {
	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Build a scene, derive modality channels and write them to disk
	Generate {
		/// Path to configuration TOML file.
		#[arg(short, long, value_name = "PATH")]
		config: PathBuf,
		/// Output directory.
		#[arg(short, long, value_name = "DIR")]
		output: PathBuf,
		/// Override the seed from the config.
		#[arg(long)]
		seed: Option<u64>,
	},
	/// Print an oblique slice of a scene grid as ASCII art
	Slice {
		/// Path to configuration TOML file.
		#[arg(short, long, value_name = "PATH")]
		config: PathBuf,
		/// Plane normal as `a,b,c`.
		#[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
		normal: DVec3,
		/// Point on the plane as `x,y,z` (default: domain centre).
		#[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
		point: Option<DVec3>,
		/// Output edge length in samples (default: domain size).
		#[arg(long)]
		size: Option<usize>,
		/// Sample spacing in voxels.
		#[arg(long, default_value_t = 1.0)]
		step: f64,
		/// Grid to slice.
		#[arg(long, value_enum, default_value_t = Field::Instance)]
		field: Field,
		/// Nearest-neighbour instead of linear sampling.
		#[arg(long)]
		nearest: bool,
		/// Slice the perturbed state instead of the unperturbed one.
		#[arg(long)]
		perturbed: bool,
		/// Override the seed from the config.
		#[arg(long)]
		seed: Option<u64>,
	},
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Field {
	Volume,
	Class,
	Instance,
}

fn parse_vec3(s: &str) -> Result<DVec3, String> {
	let parts: Vec<f64> = s
		.split(',')
		.map(|p| p.trim().parse::<f64>().map_err(|e| format!("'{}': {}", p.trim(), e)))
		.collect::<Result<_, _>>()?;
	match parts.as_slice() {
		&[x, y, z] => Ok(DVec3::new(x, y, z)),
		_ => Err(format!("expected three comma-separated numbers, got '{}'", s)),
	}
}

fn main() -> Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	match Cli::parse().command {
		Command::Generate { config, output, seed } => generate(&config, &output, seed),
		Command::Slice {
			config,
			normal,
			point,
			size,
			step,
			field,
			nearest,
			perturbed,
			seed,
		} => {
			let config = load_config(&config, seed)?;
			let mut rng = seeded_rng(config.scene.seed);
			let (_, grids) = build(&config, perturbed, &mut rng)?;
			let n = config.scene.params.size;
			let method = if nearest { Interpolation::Nearest } else { Interpolation::Linear };
			let slicer = PlaneSlicer::new(size.unwrap_or(n), step).with_method(method);
			let point = point.unwrap_or(DVec3::splat(n as f64 / 2.0));

			let image = match field {
				Field::Volume => slicer.slice(normal, point, &grids.volume),
				Field::Class => slicer.slice(normal, point, &grids.class_map),
				Field::Instance => slicer.slice(normal, point, &grids.instance_map),
			}
			.context("Slicing failed")?;
			print!("{}", ascii::render(&image));
			Ok(())
		}
	}
}

fn load_config(path: &Path, seed: Option<u64>) -> Result<Config> {
	log::info!("Loading config from: {}", path.display());
	let mut config = Config::load(path)?;
	if seed.is_some() {
		config.scene.seed = seed;
	}
	Ok(config)
}

/// One stream for every draw of a run: sampling, perturbation, noise.
fn seeded_rng(seed: Option<u64>) -> ChaCha8Rng {
	match seed {
		Some(seed) => ChaCha8Rng::seed_from_u64(seed),
		None => ChaCha8Rng::from_os_rng(),
	}
}

/// Build the scene and fill it; with `perturbed`, apply the configured
/// perturbation and fill again.
fn build(config: &Config, perturbed: bool, rng: &mut ChaCha8Rng) -> Result<(Scene, GridTriple)> {
	let mut scene = Scene::generate(config.scene.params.clone(), rng).context("Scene construction failed")?;
	log::info!(
		"Scene: {}³ voxels, {} instances",
		scene.size(),
		scene.len()
	);
	let mut grids = scene.fill().context("Fill failed")?;

	if let (true, Some(perturbation)) = (perturbed, config.perturb.as_ref()) {
		let erased = scene.perturb(perturbation, rng).context("Perturbation failed")?;
		log::info!(
			"Perturbed: {} erased, {} active",
			erased.len(),
			scene.active_count()
		);
		grids = scene.fill().context("Fill failed")?;
	}

	let [empty, matrix, spheres, ellipsoids] = grids.class_histogram();
	log::info!(
		"Classes: empty={} matrix={} sphere={} ellipsoid={}",
		empty,
		matrix,
		spheres,
		ellipsoids
	);
	Ok((scene, grids))
}

/// Blur the class map and contract it into electron density plus one
/// channel per element.
fn modality_channels(config: &Config, grids: &GridTriple) -> Result<(ChannelStack, Vec<String>)> {
	let modality = &config.modality;
	let probs = blur_classes(&grids.class_map, modality.sigma, ClassLabel::COUNT);
	let actions = composite_actions(&modality.composite, &modality.elements)?;

	let tomography = weighted_map(&probs, &actions.tomography)?;
	let elemental = weighted_map(&probs, &actions.elemental)?;

	let mut names = vec!["electron_density".to_string()];
	names.extend(actions.elements.iter().cloned());

	let mut channels = tomography.into_channels();
	channels.extend(elemental.into_channels());
	Ok((ChannelStack::from_channels(channels)?, names))
}

fn generate(config_path: &Path, output_dir: &Path, seed: Option<u64>) -> Result<()> {
	let config = load_config(config_path, seed)?;
	let mut rng = seeded_rng(config.scene.seed);
	let (scene, grids) = build(&config, true, &mut rng)?;

	let (mut channels, names) = modality_channels(&config, &grids)?;
	log::info!(
		"Modality: {} ({}), {} channels",
		config.modality.composite,
		names.join(", "),
		channels.len()
	);

	if let Some(noise) = config.modality.noise {
		add_noise(&mut channels, noise.factor, noise.dark, &mut rng);
		log::info!("Noise: factor={} dark={}", noise.factor, noise.dark);
	}

	let levels = pyramid(&channels, config.export.levels, config.export.factor)?;

	std::fs::create_dir_all(output_dir)
		.with_context(|| format!("Failed to create output dir: {}", output_dir.display()))?;

	let level_entries = export::write_levels(output_dir, &levels)?;
	let labels = if config.export.labels {
		export::write_labels(output_dir, &grids)?
	} else {
		Vec::new()
	};

	let manifest = Manifest {
		format: export::FORMAT,
		seed: config.scene.seed,
		instances: scene.len(),
		active_instances: scene.active_count(),
		channels: names,
		levels: level_entries,
		labels,
		scene: config.scene.params.clone(),
		perturbation: config.perturb,
		modality: config.modality.clone(),
		export: config.export.clone(),
	};
	let manifest_path = export::write_manifest(output_dir, &manifest)?;

	log::info!(
		"Done! {} levels written to: {} (manifest: {})",
		levels.len(),
		output_dir.display(),
		manifest_path.display()
	);
	Ok(())
}
