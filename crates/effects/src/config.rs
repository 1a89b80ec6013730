//! Scheduler tuning knobs.
//!
//! Defaults reproduce the reference behaviour: five concurrent animations per
//! anchor, 200 ms between admissions and one-second telemetry debounce.

use std::path::Path;
use std::time::Duration;

use glint_primitives::Point;
use serde::Deserialize;
use thiserror::Error;

/// Errors from loading an [`EffectConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("failed to read {path}: {source}")]
	Io {
		path: String,
		#[source]
		source: std::io::Error,
	},
	#[error("invalid effect config: {0}")]
	Parse(#[from] toml::de::Error),
	#[error("invalid effect config: {0}")]
	Invalid(String),
}

/// Scheduler configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EffectConfig {
	/// Maximum live animations per anchor.
	pub max_per_anchor: usize,
	/// Minimum time between two admissions for one anchor.
	pub min_interval_ms: u64,
	/// Delay between the first outbound enqueue for an anchor and its batch report.
	pub outbound_debounce_ms: u64,
	/// Delay between the first inbound enqueue and the "seen" flush.
	pub inbound_debounce_ms: u64,
	/// Premium overlays are the source frame scaled by this factor.
	pub premium_scale: f32,
	/// Offset of effect overlay centres from their source centre.
	pub effect_offset: Point,
	/// Offset of reaction overlay centres from their source centre.
	pub reaction_offset: Point,
}

impl Default for EffectConfig {
	fn default() -> Self {
		Self {
			max_per_anchor: 5,
			min_interval_ms: 200,
			outbound_debounce_ms: 1000,
			inbound_debounce_ms: 1000,
			premium_scale: 1.5,
			effect_offset: Point::new(-60.0, 0.0),
			reaction_offset: Point::new(0.0, -12.0),
		}
	}
}

impl EffectConfig {
	/// Parses and validates a TOML document. Missing keys keep their defaults.
	pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
		let config: Self = toml::from_str(input)?;
		config.validate()?;
		Ok(config)
	}

	/// Reads and parses a TOML file.
	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
			path: path.display().to_string(),
			source,
		})?;
		Self::from_toml_str(&content)
	}

	/// Checks value ranges.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.max_per_anchor == 0 {
			return Err(ConfigError::Invalid("max_per_anchor must be at least 1".into()));
		}
		if !(self.premium_scale.is_finite() && self.premium_scale > 0.0) {
			return Err(ConfigError::Invalid(format!("premium_scale must be positive, got {}", self.premium_scale)));
		}
		Ok(())
	}

	pub const fn min_interval(&self) -> Duration {
		Duration::from_millis(self.min_interval_ms)
	}

	pub const fn outbound_debounce(&self) -> Duration {
		Duration::from_millis(self.outbound_debounce_ms)
	}

	pub const fn inbound_debounce(&self) -> Duration {
		Duration::from_millis(self.inbound_debounce_ms)
	}
}
