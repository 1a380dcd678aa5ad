//! Configuration parsing for volume synthesis runs.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use voxel_modalities::{find_composite, DEFAULT_FACTOR};
use voxel_synth::{Perturbation, SceneConfig};

/// Root configuration for a synthesis run.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
	/// Domain and instance parameters.
	pub scene: SceneSection,
	/// Optional perturbation applied after the first fill.
	pub perturb: Option<Perturbation>,
	/// Modality synthesis.
	pub modality: ModalityConfig,
	/// Output layout.
	pub export: ExportConfig,
}

/// `[scene]`: the scene parameters plus the random seed.
///
/// Parsed through a table so that unknown keys are rejected; serde's
/// `flatten` would silently drop them.
#[derive(Debug, Default, Deserialize)]
#[serde(try_from = "toml::Table")]
pub struct SceneSection {
	/// Seed for every random draw of the run; entropy when absent.
	pub seed: Option<u64>,
	pub params: SceneConfig,
}

impl TryFrom<toml::Table> for SceneSection {
	type Error = toml::de::Error;

	fn try_from(mut table: toml::Table) -> std::result::Result<Self, Self::Error> {
		let seed = table.remove("seed").map(|value| value.try_into()).transpose()?;
		let params = toml::Value::Table(table).try_into()?;
		Ok(Self { seed, params })
	}
}

/// `[modality]`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ModalityConfig {
	/// Label blur width in voxels.
	pub sigma: f64,
	/// Composite material name (VEQF, VEQI, VEQM).
	pub composite: String,
	/// Elements for the elemental channels.
	pub elements: Vec<String>,
	/// Detector noise; no noise when absent.
	pub noise: Option<NoiseConfig>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct NoiseConfig {
	/// Multiplicative noise factor.
	pub factor: f64,
	/// Dark-current level.
	#[serde(default)]
	pub dark: f64,
}

/// `[export]`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExportConfig {
	/// Downsampled levels after the full-resolution one.
	pub levels: usize,
	/// Downscale factor between levels.
	pub factor: usize,
	/// Write class and instance maps next to the channels.
	pub labels: bool,
}

impl Default for ModalityConfig {
	fn default() -> Self {
		Self {
			sigma: 0.5,
			composite: "VEQF".to_string(),
			elements: ["Si", "Al", "K"].map(String::from).to_vec(),
			noise: None,
		}
	}
}

impl Default for ExportConfig {
	fn default() -> Self {
		Self {
			levels: 3,
			factor: DEFAULT_FACTOR,
			labels: true,
		}
	}
}

impl Config {
	/// Load configuration from a TOML file.
	pub fn load(path: &Path) -> Result<Self> {
		let content = std::fs::read_to_string(path)
			.with_context(|| format!("Failed to read config file: {}", path.display()))?;
		Self::parse(&content)
	}

	/// Parse and validate configuration text.
	pub fn parse(content: &str) -> Result<Self> {
		let config: Config = toml::from_str(content).context("Failed to parse config TOML")?;
		config.validate()?;
		Ok(config)
	}

	fn validate(&self) -> Result<()> {
		self.scene
			.params
			.validate()
			.context("Invalid [scene] section")?;

		if let Some(perturb) = &self.perturb {
			if let Some(rmsd) = perturb.shake {
				if !rmsd.is_finite() {
					anyhow::bail!("perturb.shake must be finite, got {}", rmsd);
				}
			}
			if let Some(cut) = perturb.cut {
				if !(cut.z.is_finite() && cut.dz.is_finite()) {
					anyhow::bail!("perturb.cut must be finite, got z={} dz={}", cut.z, cut.dz);
				}
			}
			if let Some(fraction) = perturb.erase {
				if !(0.0..=1.0).contains(&fraction) {
					anyhow::bail!("perturb.erase must be in [0, 1], got {}", fraction);
				}
			}
		}

		let modality = &self.modality;
		if !(modality.sigma.is_finite() && modality.sigma >= 0.0) {
			anyhow::bail!("modality.sigma must be non-negative, got {}", modality.sigma);
		}
		if find_composite(&modality.composite).is_none() {
			anyhow::bail!("Unknown composite material: {}", modality.composite);
		}
		if let Some(noise) = modality.noise {
			if !(noise.factor >= 0.0 && noise.dark >= 0.0 && noise.factor.is_finite() && noise.dark.is_finite()) {
				anyhow::bail!(
					"modality.noise factor and dark must be non-negative, got {} and {}",
					noise.factor,
					noise.dark
				);
			}
		}

		if self.export.factor < 2 && self.export.levels > 0 {
			anyhow::bail!("export.factor must be at least 2, got {}", self.export.factor);
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_config_uses_defaults() {
		let config = Config::parse("").unwrap();
		assert_eq!(config.scene.params, SceneConfig::default());
		assert_eq!(config.scene.seed, None);
		assert!(config.perturb.is_none());
		assert_eq!(config.modality.composite, "VEQF");
		assert_eq!(config.export.levels, 3);
		assert_eq!(config.export.factor, 4);
	}

	#[test]
	fn full_config() {
		let config = Config::parse(
			r#"
			[scene]
			seed = 42
			size = 32
			border = 5.0
			radius = 10.0

			[perturb]
			shake = 2.0
			cut = { z = 16.0, dz = 3.0 }
			erase = 0.1

			[modality]
			sigma = 1.0
			composite = "VEQI"
			elements = ["Fe", "O"]
			noise = { factor = 0.05, dark = 0.01 }

			[export]
			levels = 1
			labels = false
			"#,
		)
		.unwrap();

		assert_eq!(config.scene.seed, Some(42));
		assert_eq!(config.scene.params.size, 32);
		assert_eq!(config.scene.params.k1, 1.5);
		let perturb = config.perturb.unwrap();
		assert_eq!(perturb.shake, Some(2.0));
		assert_eq!(perturb.cut.map(|c| (c.z, c.dz)), Some((16.0, 3.0)));
		assert_eq!(config.modality.elements, vec!["Fe", "O"]);
		assert_eq!(config.modality.noise.map(|n| n.dark), Some(0.01));
		assert!(!config.export.labels);
	}

	#[test]
	fn rejects_bad_values() {
		assert!(Config::parse("[scene]\nfraction = 2.0").is_err());
		assert!(Config::parse("[modality]\ncomposite = \"XYZ\"").is_err());
		assert!(Config::parse("[modality]\nsigma = -1.0").is_err());
		assert!(Config::parse("[perturb]\nerase = 1.5").is_err());
		assert!(Config::parse("[export]\nfactor = 1").is_err());
		assert!(Config::parse("[unknown]\nx = 1").is_err());
	}

	#[test]
	fn rejects_unknown_keys_in_sections() {
		let err = Config::parse("[scene]\nradis = 4.0").unwrap_err();
		assert!(format!("{:#}", err).contains("radis"));
		assert!(Config::parse("[perturb]\nshak = 2.0").is_err());
		assert!(Config::parse("[perturb]\ncut = { z = 1.0, dz = 1.0, dy = 1.0 }").is_err());

		let config = Config::parse("[scene]\nseed = 7\nradius = 4.0").unwrap();
		assert_eq!(config.scene.seed, Some(7));
		assert_eq!(config.scene.params.radius, 4.0);
	}
}
