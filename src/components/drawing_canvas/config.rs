//! Page-supplied configuration for the drawing canvas.

use serde::Deserialize;

use super::theme::Compositing;
use super::types::EffectKind;

/// Every field is optional in the JSON; missing ones take the defaults below.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
	/// Canvas size in CSS pixels.
	pub width: f64,
	/// Canvas height in CSS pixels.
	pub height: f64,
	/// Effect selected when the component mounts.
	pub initial_effect: EffectKind,
	/// How the particle layer is prepared each frame.
	pub compositing: Compositing,
	/// Gain applied to every synthesized cue.
	pub master_volume: f64,
	/// Volume of the ambient track, applied unless muted.
	pub music_volume: f64,
	/// Repeat the current track instead of advancing when it ends.
	pub loop_tracks: bool,
	/// Endpoint returning a JSON array of file names.
	pub listing_url: String,
	/// Prefix prepended to every track name; keep the trailing slash.
	pub track_base_path: String,
	/// How long cursor motion lingers after the pointer is released.
	pub cursor_decay_ms: f64,
}

impl Default for CanvasConfig {
	fn default() -> Self {
		Self {
			width: 800.0,
			height: 600.0,
			initial_effect: EffectKind::Fire,
			compositing: Compositing::FullClear,
			master_volume: 0.3,
			music_volume: 0.15,
			loop_tracks: true,
			listing_url: "/api/audio-files".to_string(),
			track_base_path: "/audio/ambient/".to_string(),
			cursor_decay_ms: 500.0,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	#[test]
	fn empty_object_yields_defaults() {
		let config: CanvasConfig = serde_json::from_str("{}").unwrap();
		assert_eq!(config, CanvasConfig::default());
		assert_eq!(config.master_volume, 0.3);
		assert_eq!(config.track_base_path, "/audio/ambient/");
	}

	#[test]
	fn partial_override() {
		let config: CanvasConfig = serde_json::from_str(
			r#"{
				"initial_effect": "bubbles",
				"compositing": { "mode": "trail_fade", "alpha": 0.03 },
				"loop_tracks": false,
				"width": 1024
			}"#,
		)
		.unwrap();
		assert_eq!(config.initial_effect, EffectKind::Bubbles);
		assert_eq!(config.compositing, Compositing::TrailFade { alpha: 0.03 });
		assert!(!config.loop_tracks);
		assert_eq!(config.width, 1024.0);
		assert_eq!(config.height, 600.0);
	}

	#[test]
	fn unknown_effect_is_rejected() {
		assert!(serde_json::from_str::<CanvasConfig>(r#"{"initial_effect":"water"}"#).is_err());
	}
}
