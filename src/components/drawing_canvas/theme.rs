//! Colors, per-effect gradient ramps and compositing policy.

use serde::Deserialize;

use super::types::EffectKind;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Star tints for the background layer.
pub const STAR_PALETTE: [Color; 8] = [
	Color::rgb(0x60, 0xa5, 0xfa), // Sky
	Color::rgb(0x34, 0xd3, 0x99), // Emerald
	Color::rgb(0xfb, 0xbf, 0x24), // Amber
	Color::rgb(0xf8, 0x71, 0x71), // Rose
	Color::rgb(0xa7, 0x8b, 0xfa), // Violet
	Color::rgb(0xff, 0xff, 0xff), // White
	Color::rgb(0xff, 0x6b, 0x6b), // Coral
	Color::rgb(0x4e, 0xcd, 0xc4), // Teal
];

/// A color in HSLA space, rendered as a CSS `hsla()` string.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsla {
	/// Hue in degrees.
	pub h: f64,
	/// Saturation in percent.
	pub s: f64,
	/// Lightness in percent.
	pub l: f64,
	pub a: f64,
}

impl Hsla {
	pub fn to_css(self) -> String {
		format!("hsla({}, {}%, {}%, {})", self.h, self.s, self.l, self.a)
	}
}

/// One gradient stop, relative to the particle's hue and fade factor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RampStop {
	/// Position along the gradient, 0.0 (center) to 1.0 (edge).
	pub offset: f64,
	/// Added to the particle's base hue.
	pub hue_shift: f64,
	pub saturation: f64,
	pub lightness: f64,
	/// Multiplied by the fade factor. The outermost stop is always transparent.
	pub alpha: f64,
}

const fn stop(offset: f64, hue_shift: f64, saturation: f64, lightness: f64, alpha: f64) -> RampStop {
	RampStop {
		offset,
		hue_shift,
		saturation,
		lightness,
		alpha,
	}
}

const BUBBLES_RAMP: [RampStop; 4] = [
	stop(0.0, 0.0, 30.0, 95.0, 0.3),
	stop(0.7, 0.0, 50.0, 85.0, 0.5),
	stop(0.9, 30.0, 70.0, 75.0, 0.7),
	stop(1.0, 60.0, 80.0, 65.0, 0.0),
];

const GOD_RAMP: [RampStop; 5] = [
	stop(0.0, 0.0, 80.0, 95.0, 1.0),
	stop(0.2, 0.0, 70.0, 85.0, 0.9),
	stop(0.5, 10.0, 60.0, 75.0, 0.7),
	stop(0.8, 20.0, 50.0, 65.0, 0.4),
	stop(1.0, 30.0, 40.0, 55.0, 0.0),
];

const LIGHTNING_RAMP: [RampStop; 4] = [
	stop(0.0, 0.0, 60.0, 95.0, 1.0),
	stop(0.2, 0.0, 70.0, 85.0, 0.9),
	stop(0.6, 10.0, 80.0, 75.0, 0.5),
	stop(1.0, 20.0, 90.0, 65.0, 0.0),
];

const FIREFLIES_RAMP: [RampStop; 4] = [
	stop(0.0, 0.0, 100.0, 80.0, 0.9),
	stop(0.4, 0.0, 90.0, 70.0, 0.8),
	stop(0.8, 5.0, 80.0, 60.0, 0.4),
	stop(1.0, 10.0, 70.0, 50.0, 0.0),
];

const ICE_RAMP: [RampStop; 4] = [
	stop(0.0, 0.0, 100.0, 90.0, 1.0),
	stop(0.3, 0.0, 80.0, 70.0, 0.8),
	stop(0.7, 20.0, 60.0, 60.0, 0.4),
	stop(1.0, 30.0, 40.0, 50.0, 0.0),
];

const FIRE_RAMP: [RampStop; 4] = [
	stop(0.0, 0.0, 100.0, 80.0, 1.0),
	stop(0.4, 0.0, 100.0, 60.0, 0.7),
	stop(0.8, -10.0, 100.0, 50.0, 0.3),
	stop(1.0, -20.0, 100.0, 40.0, 0.0),
];

/// Gradient stops for an effect, center first.
pub fn color_ramp(kind: EffectKind) -> &'static [RampStop] {
	match kind {
		EffectKind::Bubbles => &BUBBLES_RAMP,
		EffectKind::God => &GOD_RAMP,
		EffectKind::Lightning => &LIGHTNING_RAMP,
		EffectKind::Fireflies => &FIREFLIES_RAMP,
		EffectKind::Ice => &ICE_RAMP,
		EffectKind::Fire => &FIRE_RAMP,
	}
}

/// Resolves a ramp for a particle's hue and fade factor.
pub fn resolve_ramp(kind: EffectKind, hue: f64, fade: f64) -> Vec<(f64, Hsla)> {
	color_ramp(kind)
		.iter()
		.map(|s| {
			(
				s.offset,
				Hsla {
					h: hue + s.hue_shift,
					s: s.saturation,
					l: s.lightness,
					a: fade * s.alpha,
				},
			)
		})
		.collect()
}

/// How the particle surface is prepared at the start of each frame.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum Compositing {
	/// Erase everything; particles leave no trail.
	FullClear,
	/// Erase a fraction of the previous frame so particles leave a glowing trail.
	TrailFade {
		/// Fraction of the previous frame erased each frame.
		alpha: f64,
	},
}

impl Default for Compositing {
	fn default() -> Self {
		Compositing::FullClear
	}
}
