//! Particle store and the per-canvas simulation state.
//!
//! `CanvasState` is created once when the component mounts, mutated by the
//! pointer handlers between frames, and advanced by the animation loop once
//! per frame. Everything here is host-independent so it runs under tests.

use rand::rngs::StdRng;

use super::audio::SoundCue;
use super::effects::DragProfile;
use super::emitter;
use super::physics;
use super::pointer::{CursorMotion, PointerTracker};
use super::types::{EffectKind, Particle, Point};

/// Owns every live particle.
#[derive(Clone, Debug, Default)]
pub struct ParticleStore {
	particles: Vec<Particle>,
}

impl ParticleStore {
	pub fn push(&mut self, particle: Particle) {
		self.particles.push(particle);
	}

	pub fn len(&self) -> usize {
		self.particles.len()
	}

	#[cfg(test)]
	pub fn is_empty(&self) -> bool {
		self.particles.is_empty()
	}

	pub fn clear(&mut self) {
		self.particles.clear();
	}

	#[cfg(test)]
	pub fn iter(&self) -> impl Iterator<Item = &Particle> {
		self.particles.iter()
	}

	/// Steps every particle and hands survivors to `visit` in the same pass.
	///
	/// A particle that expires this frame is dropped before `visit` can see it.
	pub fn advance<F>(&mut self, cursor: CursorMotion, rng: &mut StdRng, mut visit: F)
	where
		F: FnMut(&Particle),
	{
		self.particles.retain_mut(|p| {
			if !physics::step(p, cursor, rng) {
				return false;
			}
			visit(p);
			true
		});
	}
}

/// Simulation state for one drawing surface.
pub struct CanvasState {
	pub store: ParticleStore,
	pub tracker: PointerTracker,
	effect: EffectKind,
	rng: StdRng,
	/// Set by [`CanvasState::clear`]; the next frame erases the surface outright.
	wipe_pending: bool,
}

impl CanvasState {
	pub fn new(effect: EffectKind, decay_delay_ms: f64, rng: StdRng) -> Self {
		Self {
			store: ParticleStore::default(),
			tracker: PointerTracker::new(decay_delay_ms),
			effect,
			rng,
			wipe_pending: false,
		}
	}

	pub fn set_effect(&mut self, effect: EffectKind) {
		self.effect = effect;
	}

	/// Starts a stroke and emits its opening burst.
	pub fn pointer_down(&mut self, pos: Point, sound: &mut dyn SoundCue) {
		let opening = self.tracker.start(pos);
		self.emit_at(opening.at, opening.intensity, sound);
	}

	/// Feeds a pointer sample; returns how many emissions it caused.
	pub fn pointer_move(&mut self, raw: Point, sound: &mut dyn SoundCue) -> usize {
		let profile = DragProfile::for_effect(self.effect);
		let emissions = self.tracker.move_to(raw, &profile, &mut self.rng);
		for emission in &emissions {
			self.emit_at(emission.at, emission.intensity, sound);
		}
		emissions.len()
	}

	pub fn pointer_up(&mut self, now_ms: f64) {
		self.tracker.end(now_ms);
	}

	/// Advances one frame at host time `now_ms`, visiting each surviving particle.
	pub fn frame<F>(&mut self, now_ms: f64, visit: F)
	where
		F: FnMut(&Particle),
	{
		self.tracker.settle(now_ms);
		let cursor = self.tracker.motion();
		self.store.advance(cursor, &mut self.rng, visit);
	}

	/// Drops every particle and asks the next frame for a full wipe, so no
	/// trail survives a clear. Returns how many particles were dropped.
	pub fn clear(&mut self) -> usize {
		let dropped = self.store.len();
		self.store.clear();
		self.wipe_pending = true;
		dropped
	}

	/// Consumes a pending wipe request.
	pub fn take_wipe(&mut self) -> bool {
		std::mem::take(&mut self.wipe_pending)
	}

	fn emit_at(&mut self, at: Point, intensity: f64, sound: &mut dyn SoundCue) {
		let cursor = self.tracker.motion();
		emitter::emit(
			&mut self.store,
			at,
			intensity,
			self.effect,
			cursor,
			&mut self.rng,
			sound,
		);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::drawing_canvas::audio::tests::RecordingCue;
	use crate::components::drawing_canvas::types::Motion;
	use pretty_assertions::assert_eq;
	use rand::SeedableRng;

	fn state(effect: EffectKind) -> CanvasState {
		CanvasState::new(effect, 500.0, StdRng::seed_from_u64(42))
	}

	fn short_lived(life: i32) -> Particle {
		Particle {
			x: 0.0,
			y: 0.0,
			vx: 0.0,
			vy: 0.0,
			life,
			max_life: life,
			size: 1.0,
			hue: 0.0,
			motion: Motion::Ice,
		}
	}

	#[test]
	fn expired_particles_are_never_visited() {
		let mut store = ParticleStore::default();
		store.push(short_lived(1));
		store.push(short_lived(3));
		let mut rng = StdRng::seed_from_u64(1);

		let mut visited = Vec::new();
		store.advance(CursorMotion::REST, &mut rng, |p| visited.push(p.life));
		assert_eq!(visited, vec![2]);
		assert_eq!(store.len(), 1);

		let mut seen = 0;
		store.advance(CursorMotion::REST, &mut rng, |_| seen += 1);
		store.advance(CursorMotion::REST, &mut rng, |_| seen += 1);
		assert_eq!(seen, 1);
		assert!(store.is_empty());
	}

	#[test]
	fn visited_particles_are_alive_and_fading() {
		let mut s = state(EffectKind::Fireflies);
		let mut cue = RecordingCue::default();
		s.pointer_down(Point::new(50.0, 50.0), &mut cue);
		for frame in 0..200 {
			s.frame(frame as f64 * 16.0, |p| {
				let fade = p.fade();
				assert!(fade > 0.0 && fade <= 1.0);
			});
		}
		assert!(s.store.is_empty());
	}

	#[test]
	fn pointer_down_emits_opening_burst() {
		let mut s = state(EffectKind::God);
		let mut cue = RecordingCue::default();
		s.pointer_down(Point::new(10.0, 10.0), &mut cue);
		// floor(0.5 * 1.5) = 0, clamped to one.
		assert_eq!(s.store.len(), 1);
		assert_eq!(cue.cues, vec![(EffectKind::God, 1.0)]);
	}

	#[test]
	fn stationary_pointer_emits_nothing() {
		let mut s = state(EffectKind::Fire);
		let mut cue = RecordingCue::default();
		s.pointer_down(Point::new(10.0, 10.0), &mut cue);
		let before = s.store.len();
		for _ in 0..30 {
			assert_eq!(s.pointer_move(Point::new(10.0, 10.0), &mut cue), 0);
		}
		assert_eq!(s.store.len(), before);
		assert_eq!(cue.cues.len(), 1);
	}

	#[test]
	fn each_emission_cues_once() {
		let mut s = state(EffectKind::Ice);
		let mut cue = RecordingCue::default();
		s.pointer_down(Point::ZERO, &mut cue);
		let mut emissions = 0;
		for _ in 0..15 {
			emissions += s.pointer_move(Point::new(300.0, 0.0), &mut cue);
		}
		assert!(emissions > 0);
		assert_eq!(cue.cues.len(), emissions + 1);
	}

	#[test]
	fn effect_switch_applies_to_new_particles() {
		let mut s = state(EffectKind::Fire);
		let mut cue = RecordingCue::default();
		s.set_effect(EffectKind::Bubbles);
		s.pointer_down(Point::ZERO, &mut cue);
		assert!(s.store.iter().all(|p| p.kind() == EffectKind::Bubbles));
	}

	#[test]
	fn clear_drops_everything() {
		let mut s = state(EffectKind::Lightning);
		let mut cue = RecordingCue::default();
		s.pointer_down(Point::ZERO, &mut cue);
		let live = s.store.len();
		assert!(live > 0);
		assert_eq!(s.clear(), live);
		assert!(s.store.is_empty());
	}

	#[test]
	fn clear_requests_a_single_wipe() {
		let mut s = state(EffectKind::Fire);
		assert!(!s.take_wipe());
		s.clear();
		assert!(s.take_wipe());
		assert!(!s.take_wipe());
	}

	#[test]
	fn holding_still_after_a_repress_lets_motion_decay() {
		let mut s = state(EffectKind::Fire);
		let mut cue = RecordingCue::default();
		s.pointer_down(Point::ZERO, &mut cue);
		for _ in 0..20 {
			s.pointer_move(Point::new(300.0, 0.0), &mut cue);
		}
		assert!(s.tracker.motion().speed > 0.0);
		s.pointer_up(1_000.0);

		s.pointer_down(Point::new(50.0, 50.0), &mut cue);
		s.clear();
		s.store.push(Particle {
			motion: Motion::Fire,
			..short_lived(400)
		});
		for frame in 0..300 {
			s.frame(1_000.0 + frame as f64 * 16.0, |_| {});
		}
		assert_eq!(s.tracker.motion(), CursorMotion::REST);
		// The surfing push stopped 500ms in and damping has since eaten it.
		let vx = s.store.iter().map(|p| p.vx).next().unwrap_or(f64::NAN);
		assert!(vx.abs() < 0.01, "vx = {}", vx);
	}
}
