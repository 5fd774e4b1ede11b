//! Per-effect constant tables.
//!
//! Every tunable that shapes an effect lives here, keyed by [`EffectKind`]:
//! how many particles an emission produces and with what kinematics, how the
//! pointer feels while drawing, and how large the rendered disc is. Tables are
//! resolved per call and never mutated.

use std::ops::Range;

use super::types::EffectKind;

/// Emission parameters for one effect.
///
/// Ranges are `start..end` where a uniform sample is drawn as
/// `start + r * (end - start)`.
#[derive(Clone, Debug, PartialEq)]
pub struct EmissionProfile {
	/// Particles per unit of intensity, floored with a minimum of one.
	pub ratio: f64,
	pub speed: Range<f64>,
	/// Lifetime in frames.
	pub life: Range<f64>,
	/// Hue in degrees.
	pub hue: Range<f64>,
	pub size: Range<f64>,
	/// Full width of the square spawn area around the emission point.
	pub spawn_jitter: f64,
}

/// How the pointer trajectory responds while drawing with an effect.
#[derive(Clone, Debug, PartialEq)]
pub struct DragProfile {
	/// Kept for parity with the feel table; the tracker smooths via `resistance`.
	pub smoothing: f64,
	/// Weight of the raw sample when computing the smoothing target.
	pub resistance: f64,
	/// Full width of the random offset applied to reported points.
	pub jitter: f64,
	pub momentum: f64,
	pub friction: f64,
	/// Short human-readable feel, shown in the status line.
	pub description: &'static str,
}

impl EmissionProfile {
	pub fn for_effect(kind: EffectKind) -> Self {
		match kind {
			EffectKind::Bubbles => Self {
				ratio: 0.3,
				speed: 0.3..1.1,
				life: 80.0..180.0,
				hue: 200.0..260.0,
				size: 2.0..6.0,
				spawn_jitter: 25.0,
			},
			EffectKind::God => Self {
				ratio: 0.5,
				speed: 0.5..2.0,
				life: 50.0..120.0,
				hue: 45.0..60.0,
				size: 1.5..4.5,
				spawn_jitter: 20.0,
			},
			EffectKind::Lightning => Self {
				ratio: 0.6,
				speed: 2.0..6.0,
				life: 8.0..20.0,
				hue: 200.0..220.0,
				size: 0.5..2.0,
				spawn_jitter: 8.0,
			},
			EffectKind::Fireflies => Self {
				ratio: 0.2,
				speed: 0.1..0.4,
				life: 60.0..140.0,
				hue: 110.0..125.0,
				size: 0.3..1.8,
				spawn_jitter: 15.0,
			},
			EffectKind::Ice => Self {
				ratio: 0.4,
				speed: 0.5..2.5,
				life: 25.0..60.0,
				hue: 180.0..220.0,
				size: 1.5..4.0,
				spawn_jitter: 15.0,
			},
			EffectKind::Fire => Self {
				ratio: 0.4,
				speed: 1.0..4.0,
				life: 25.0..60.0,
				hue: 45.0..60.0,
				size: 1.0..4.0,
				spawn_jitter: 15.0,
			},
		}
	}

	/// Number of particles for one emission at `intensity`.
	pub fn count(&self, intensity: f64) -> usize {
		((self.ratio * intensity).floor() as usize).max(1)
	}
}

impl DragProfile {
	pub fn for_effect(kind: EffectKind) -> Self {
		match kind {
			EffectKind::Fire => Self {
				smoothing: 0.8,
				resistance: 0.3,
				jitter: 0.0,
				momentum: 0.9,
				friction: 0.94,
				description: "Surfing fire flow",
			},
			EffectKind::Ice => Self {
				smoothing: 0.85,
				resistance: 0.2,
				jitter: 0.0,
				momentum: 0.9,
				friction: 0.88,
				description: "Extremely heavy rolling ice",
			},
			EffectKind::Lightning => Self {
				smoothing: 0.7,
				resistance: 0.4,
				jitter: 15.0,
				momentum: 0.8,
				friction: 0.85,
				description: "Chaotic rolling electricity",
			},
			EffectKind::God => Self {
				smoothing: 0.7,
				resistance: 0.4,
				jitter: 0.0,
				momentum: 0.88,
				friction: 0.9,
				description: "Divine rolling energy",
			},
			EffectKind::Bubbles => Self {
				smoothing: 0.7,
				resistance: 0.4,
				jitter: 1.0,
				momentum: 0.82,
				friction: 0.94,
				description: "Buoyant rolling bubbles",
			},
			EffectKind::Fireflies => Self {
				smoothing: 0.7,
				resistance: 0.4,
				jitter: 0.5,
				momentum: 0.86,
				friction: 0.93,
				description: "Gentle rolling dust",
			},
		}
	}
}

/// Disc radius multiplier applied to `size * fade` when drawing.
pub fn radius_multiplier(kind: EffectKind) -> f64 {
	match kind {
		EffectKind::Bubbles => 4.0,
		EffectKind::God => 6.0,
		EffectKind::Lightning => 5.0,
		EffectKind::Fireflies => 3.0,
		EffectKind::Fire | EffectKind::Ice => 4.0,
	}
}

/// Samples `range` with a unit random `r` in `[0, 1)`.
pub fn sample(range: &Range<f64>, r: f64) -> f64 {
	range.start + r * (range.end - range.start)
}
