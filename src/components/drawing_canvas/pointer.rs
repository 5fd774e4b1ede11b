//! Pointer-to-motion physics.
//!
//! Raw pointer samples are not used directly as emission points. Each sample
//! pulls a smoothed cursor along with momentum and friction, like a ball being
//! rolled behind the finger, and the travel of that cursor is resampled into
//! evenly spaced emission points. The cursor's direction and speed are also
//! published for the fire "surfing" coupling.

use rand::Rng;

use super::effects::DragProfile;
use super::types::Point;

/// Intensity used for the burst emitted when a stroke begins.
pub const START_INTENSITY: f64 = 1.5;

/// Reported travel below this many pixels is accumulated silently.
const MIN_EMIT_DISTANCE: f64 = 2.0;

/// Spacing, in pixels, between resampled emission points.
const RESAMPLE_SPACING: f64 = 2.0;

/// Direction and speed of the cursor, fed into fire particles.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CursorMotion {
	/// Unit vector, or zero when at rest.
	pub direction: Point,
	/// Clamped to `0.0..=3.0`.
	pub speed: f64,
}

impl CursorMotion {
	pub const REST: CursorMotion = CursorMotion {
		direction: Point::ZERO,
		speed: 0.0,
	};
}

/// A point at which the factory should emit, with its intensity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Emission {
	pub at: Point,
	pub intensity: f64,
}

/// Tracks the smoothed cursor for the active stroke.
#[derive(Clone, Debug)]
pub struct PointerTracker {
	drawing: bool,
	/// Last reported (possibly jittered) point that produced emissions.
	last: Point,
	/// Internally smoothed position; never jittered.
	smoothed: Point,
	velocity: Point,
	motion: CursorMotion,
	/// Host time (ms) at which `motion` falls back to rest.
	decay_at: Option<f64>,
	decay_delay_ms: f64,
}

impl PointerTracker {
	pub fn new(decay_delay_ms: f64) -> Self {
		Self {
			drawing: false,
			last: Point::ZERO,
			smoothed: Point::ZERO,
			velocity: Point::ZERO,
			motion: CursorMotion::REST,
			decay_at: None,
			decay_delay_ms,
		}
	}

	pub fn motion(&self) -> CursorMotion {
		self.motion
	}

	/// Begins a stroke at `pos` and returns the opening emission.
	///
	/// A decay armed by the previous release stays armed.
	pub fn start(&mut self, pos: Point) -> Emission {
		self.drawing = true;
		self.last = pos;
		self.smoothed = pos;
		self.velocity = Point::ZERO;
		Emission {
			at: pos,
			intensity: START_INTENSITY,
		}
	}

	/// Feeds a raw sample and returns the emissions it produced, if any.
	pub fn move_to<R: Rng>(
		&mut self,
		raw: Point,
		profile: &DragProfile,
		rng: &mut R,
	) -> Vec<Emission> {
		if !self.drawing {
			return Vec::new();
		}

		let res = profile.resistance;
		let target = Point::new(
			raw.x * res + self.smoothed.x * (1.0 - res),
			raw.y * res + self.smoothed.y * (1.0 - res),
		);
		let accel = Point::new(
			(target.x - self.smoothed.x) * 0.1,
			(target.y - self.smoothed.y) * 0.1,
		);
		let damping = profile.momentum * profile.friction;
		self.velocity = Point::new(
			(self.velocity.x + accel.x) * damping,
			(self.velocity.y + accel.y) * damping,
		);
		self.smoothed = Point::new(
			self.smoothed.x + self.velocity.x,
			self.smoothed.y + self.velocity.y,
		);

		// Jitter only the reported point so the tracked cursor stays smooth.
		let reported = if profile.jitter > 0.0 {
			Point::new(
				self.smoothed.x + (rng.random::<f64>() - 0.5) * profile.jitter,
				self.smoothed.y + (rng.random::<f64>() - 0.5) * profile.jitter,
			)
		} else {
			self.smoothed
		};

		let distance = self.last.distance_to(reported);
		if distance > 0.0 {
			self.motion = CursorMotion {
				direction: Point::new(
					(reported.x - self.last.x) / distance,
					(reported.y - self.last.y) / distance,
				),
				speed: (distance * 0.1).min(3.0),
			};
		}

		if distance > MIN_EMIT_DISTANCE {
			let emissions = resample(self.last, reported);
			self.last = reported;
			emissions
		} else {
			Vec::new()
		}
	}

	/// Ends the stroke. Cursor motion holds until the decay delay elapses.
	pub fn end(&mut self, now_ms: f64) {
		if self.drawing {
			self.drawing = false;
			self.decay_at = Some(now_ms + self.decay_delay_ms);
		}
	}

	/// Applies a pending decay once the host clock reaches it.
	pub fn settle(&mut self, now_ms: f64) {
		if let Some(at) = self.decay_at {
			if now_ms >= at {
				self.motion = CursorMotion::REST;
				self.decay_at = None;
			}
		}
	}
}

/// Splits the segment `from -> to` into emission points every two pixels,
/// both endpoints included.
pub fn resample(from: Point, to: Point) -> Vec<Emission> {
	let distance = from.distance_to(to);
	let steps = ((distance / RESAMPLE_SPACING).floor() as usize).max(1);
	let intensity = (distance / 10.0).min(2.0);
	let (dx, dy) = (to.x - from.x, to.y - from.y);

	(0..=steps)
		.map(|i| {
			let t = i as f64 / steps as f64;
			Emission {
				at: Point::new(from.x + dx * t, from.y + dy * t),
				intensity,
			}
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::drawing_canvas::types::EffectKind;
	use pretty_assertions::assert_eq;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	fn fire() -> DragProfile {
		DragProfile::for_effect(EffectKind::Fire)
	}

	#[test]
	fn resample_counts_and_intensity() {
		let points = resample(Point::new(0.0, 0.0), Point::new(9.0, 0.0));
		// floor(9 / 2) + 1
		assert_eq!(points.len(), 5);
		assert!(points.iter().all(|e| (e.intensity - 0.9).abs() < 1e-12));
		assert_eq!(points[0].at, Point::new(0.0, 0.0));
		assert_eq!(points[4].at, Point::new(9.0, 0.0));
	}

	#[test]
	fn resample_caps_intensity() {
		let points = resample(Point::new(0.0, 0.0), Point::new(0.0, 50.0));
		assert_eq!(points.len(), 26);
		assert!(points.iter().all(|e| e.intensity == 2.0));
	}

	#[test]
	fn moves_without_a_stroke_are_ignored() {
		let mut rng = StdRng::seed_from_u64(1);
		let mut tracker = PointerTracker::new(500.0);
		assert!(tracker.move_to(Point::new(100.0, 100.0), &fire(), &mut rng).is_empty());
		assert_eq!(tracker.motion(), CursorMotion::REST);
	}

	#[test]
	fn small_motion_accumulates_silently() {
		let mut rng = StdRng::seed_from_u64(2);
		let mut tracker = PointerTracker::new(500.0);
		tracker.start(Point::new(0.0, 0.0));
		// First step: target 3.0, accel 0.3, velocity 0.3 * 0.846 ~ 0.25px.
		let emitted = tracker.move_to(Point::new(10.0, 0.0), &fire(), &mut rng);
		assert!(emitted.is_empty());
		let motion = tracker.motion();
		assert!((motion.direction.x - 1.0).abs() < 1e-12);
		assert!(motion.speed > 0.0 && motion.speed < 0.1);
	}

	#[test]
	fn sustained_motion_emits_along_the_segment() {
		let mut rng = StdRng::seed_from_u64(3);
		let mut tracker = PointerTracker::new(500.0);
		tracker.start(Point::new(0.0, 0.0));

		// The rolling cursor overshoots later on; stay in the approach phase.
		let mut total = Vec::new();
		for _ in 0..15 {
			total.extend(tracker.move_to(Point::new(400.0, 0.0), &fire(), &mut rng));
		}
		assert!(!total.is_empty());
		// Points march forward along x and stay on the line.
		assert!(total.iter().all(|e| e.at.y == 0.0));
		assert!(total.windows(2).all(|w| w[1].at.x >= w[0].at.x - 1e-9));
		assert!(tracker.motion().speed <= 3.0);
	}

	#[test]
	fn emissions_match_reported_travel() {
		let mut rng = StdRng::seed_from_u64(4);
		let mut tracker = PointerTracker::new(500.0);
		tracker.start(Point::new(0.0, 0.0));
		let before = tracker.last;
		let mut emitted = Vec::new();
		while emitted.is_empty() {
			emitted = tracker.move_to(Point::new(1000.0, 0.0), &fire(), &mut rng);
		}
		let d = before.distance_to(tracker.last);
		assert!(d > 2.0);
		assert_eq!(emitted.len(), (d / 2.0).floor() as usize + 1);
		let expected = (d / 10.0).min(2.0);
		assert!(emitted.iter().all(|e| e.intensity == expected));
	}

	#[test]
	fn jitter_leaves_smoothed_position_untouched() {
		let lightning = DragProfile::for_effect(EffectKind::Lightning);
		let mut rng = StdRng::seed_from_u64(5);
		let mut jittered = PointerTracker::new(500.0);
		let mut rng_free = StdRng::seed_from_u64(5);
		let mut plain = PointerTracker::new(500.0);
		let calm = DragProfile {
			jitter: 0.0,
			..lightning.clone()
		};

		jittered.start(Point::ZERO);
		plain.start(Point::ZERO);
		for _ in 0..10 {
			jittered.move_to(Point::new(50.0, 20.0), &lightning, &mut rng);
			plain.move_to(Point::new(50.0, 20.0), &calm, &mut rng_free);
		}
		assert_eq!(jittered.smoothed, plain.smoothed);
	}

	#[test]
	fn release_holds_motion_until_decay_delay() {
		let mut rng = StdRng::seed_from_u64(6);
		let mut tracker = PointerTracker::new(500.0);
		tracker.start(Point::ZERO);
		for _ in 0..20 {
			tracker.move_to(Point::new(300.0, 300.0), &fire(), &mut rng);
		}
		let held = tracker.motion();
		assert!(held.speed > 0.0);

		tracker.end(1_000.0);
		tracker.settle(1_000.0);
		tracker.settle(1_499.9);
		assert_eq!(tracker.motion(), held);

		tracker.settle(1_500.0);
		assert_eq!(tracker.motion(), CursorMotion::REST);
	}

	#[test]
	fn decay_survives_a_new_stroke() {
		let mut rng = StdRng::seed_from_u64(7);
		let mut tracker = PointerTracker::new(500.0);
		tracker.start(Point::ZERO);
		for _ in 0..20 {
			tracker.move_to(Point::new(300.0, 0.0), &fire(), &mut rng);
		}
		let held = tracker.motion();
		assert!(held.speed > 0.0);
		tracker.end(1_000.0);

		// Pressing again and holding still must not keep the old motion alive.
		tracker.start(Point::new(10.0, 10.0));
		tracker.settle(1_200.0);
		assert_eq!(tracker.motion(), held);
		tracker.settle(10_000.0);
		assert_eq!(tracker.motion(), CursorMotion::REST);
		assert_eq!(tracker.decay_at, None);
	}

	#[test]
	fn end_without_stroke_arms_nothing() {
		let mut tracker = PointerTracker::new(500.0);
		tracker.end(0.0);
		assert_eq!(tracker.decay_at, None);
	}
}
