//! Effect kinds and the particle records they produce.

use serde::Deserialize;

/// A 2D point in canvas pixel coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	pub fn distance_to(self, other: Point) -> f64 {
		let (dx, dy) = (other.x - self.x, other.y - self.y);
		(dx * dx + dy * dy).sqrt()
	}
}

/// The elemental effect selected for drawing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectKind {
	/// Rising embers that surf along with the cursor.
	#[default]
	Fire,
	/// Slow crystalline shards.
	Ice,
	/// Long-lived wandering glows.
	Fireflies,
	/// Short jagged sparks.
	Lightning,
	/// Spiralling golden particles.
	God,
	/// Buoyant bobbing bubbles.
	Bubbles,
}

impl EffectKind {
	/// Every kind, in toolbar order.
	pub const ALL: [EffectKind; 6] = [
		EffectKind::Fire,
		EffectKind::Ice,
		EffectKind::Fireflies,
		EffectKind::Lightning,
		EffectKind::God,
		EffectKind::Bubbles,
	];

	/// Button caption.
	pub fn label(self) -> &'static str {
		match self {
			EffectKind::Fire => "Fire",
			EffectKind::Ice => "Ice",
			EffectKind::Fireflies => "Fireflies",
			EffectKind::Lightning => "Lightning",
			EffectKind::God => "God Particles",
			EffectKind::Bubbles => "Bubbles",
		}
	}

	/// Icon shown beside the label.
	pub fn emoji(self) -> &'static str {
		match self {
			EffectKind::Fire => "🔥",
			EffectKind::Ice => "❄️",
			EffectKind::Fireflies => "✨",
			EffectKind::Lightning => "⚡",
			EffectKind::God => "👑",
			EffectKind::Bubbles => "🫧",
		}
	}

	/// Lowercase identifier, also used as a CSS modifier class.
	pub fn name(self) -> &'static str {
		match self {
			EffectKind::Fire => "fire",
			EffectKind::Ice => "ice",
			EffectKind::Fireflies => "fireflies",
			EffectKind::Lightning => "lightning",
			EffectKind::God => "god",
			EffectKind::Bubbles => "bubbles",
		}
	}
}

/// Kind-specific motion state. Each variant carries only the phase its force
/// model reads.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Motion {
	Fire,
	Ice,
	Fireflies {
		/// Glow phase, seeded at spawn.
		#[allow(dead_code, reason = "seeded for twinkle styling, not read by the force model")]
		pulse: f64,
	},
	Lightning {
		/// Ticks since spawn; every third tick kicks the velocity.
		zigzag: u32,
	},
	God {
		/// Spiral angle in radians.
		spiral: f64,
	},
	Bubbles {
		/// Vertical bob phase in radians.
		bob: f64,
	},
}

impl Motion {
	pub fn kind(&self) -> EffectKind {
		match self {
			Motion::Fire => EffectKind::Fire,
			Motion::Ice => EffectKind::Ice,
			Motion::Fireflies { .. } => EffectKind::Fireflies,
			Motion::Lightning { .. } => EffectKind::Lightning,
			Motion::God { .. } => EffectKind::God,
			Motion::Bubbles { .. } => EffectKind::Bubbles,
		}
	}
}

/// A single live particle.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	/// Frames left to live. Removed once this reaches zero.
	pub life: i32,
	/// Lifetime at spawn; only used for the fade factor.
	pub max_life: i32,
	pub size: f64,
	/// Base hue in degrees.
	pub hue: f64,
	pub motion: Motion,
}

impl Particle {
	pub fn kind(&self) -> EffectKind {
		self.motion.kind()
	}

	/// Remaining over initial lifetime, in (0, 1] while alive.
	pub fn fade(&self) -> f64 {
		self.life as f64 / self.max_life as f64
	}

	pub fn is_expired(&self) -> bool {
		self.life <= 0
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn effect_kind_deserializes_from_lowercase() {
		let kind: EffectKind = serde_json::from_str("\"lightning\"").unwrap();
		assert_eq!(kind, EffectKind::Lightning);
		assert!(serde_json::from_str::<EffectKind>("\"Lightning\"").is_err());
	}

	#[test]
	fn motion_maps_back_to_kind() {
		for kind in EffectKind::ALL {
			let motion = match kind {
				EffectKind::Fire => Motion::Fire,
				EffectKind::Ice => Motion::Ice,
				EffectKind::Fireflies => Motion::Fireflies { pulse: 0.0 },
				EffectKind::Lightning => Motion::Lightning { zigzag: 0 },
				EffectKind::God => Motion::God { spiral: 0.0 },
				EffectKind::Bubbles => Motion::Bubbles { bob: 0.0 },
			};
			assert_eq!(motion.kind(), kind);
		}
	}

	#[test]
	fn distance_is_euclidean() {
		assert_eq!(Point::new(0.0, 0.0).distance_to(Point::new(3.0, 4.0)), 5.0);
	}
}
