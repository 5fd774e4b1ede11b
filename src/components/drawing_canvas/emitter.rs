//! Particle factory: turns an emission point into freshly spawned particles.

use std::f64::consts::TAU;

use rand::Rng;

use super::audio::SoundCue;
use super::effects::{EmissionProfile, sample};
use super::pointer::CursorMotion;
use super::state::ParticleStore;
use super::types::{EffectKind, Motion, Particle, Point};

/// Spawns one burst of `kind` particles around `at` and cues its sound.
///
/// Returns the number of particles added to the store.
pub fn emit<R: Rng>(
	store: &mut ParticleStore,
	at: Point,
	intensity: f64,
	kind: EffectKind,
	cursor: CursorMotion,
	rng: &mut R,
	sound: &mut dyn SoundCue,
) -> usize {
	let profile = EmissionProfile::for_effect(kind);
	let count = profile.count(intensity);

	sound.cue(kind, intensity.min(1.0));

	for i in 0..count {
		let angle = TAU * i as f64 / count as f64 + rng.random::<f64>();
		store.push(spawn(&profile, kind, at, angle, cursor, rng));
	}
	count
}

fn spawn<R: Rng>(
	profile: &EmissionProfile,
	kind: EffectKind,
	at: Point,
	angle: f64,
	cursor: CursorMotion,
	rng: &mut R,
) -> Particle {
	let speed = sample(&profile.speed, rng.random());
	// Lifetimes are whole frames; the tables never go below eight.
	let life = (sample(&profile.life, rng.random()).round() as i32).max(1);
	let hue = sample(&profile.hue, rng.random());

	let x = at.x + (rng.random::<f64>() - 0.5) * profile.spawn_jitter;
	let y = at.y + (rng.random::<f64>() - 0.5) * profile.spawn_jitter;

	let (vx, vy) = match kind {
		EffectKind::Bubbles => (
			(rng.random::<f64>() - 0.5) * 0.4,
			-0.5 - rng.random::<f64>() * 0.8,
		),
		EffectKind::God => (
			angle.cos() * speed * 0.3,
			angle.sin() * speed * 0.3 - 0.2,
		),
		EffectKind::Lightning => (
			(rng.random::<f64>() - 0.5) * 6.0,
			(rng.random::<f64>() - 0.5) * 6.0,
		),
		// Fire inherits the cursor's momentum so strokes "surf".
		EffectKind::Fire => (
			(rng.random::<f64>() - 0.5) * 0.4 + cursor.direction.x * cursor.speed * 0.5,
			(rng.random::<f64>() - 0.5) * 0.4 + cursor.direction.y * cursor.speed * 0.5,
		),
		EffectKind::Ice | EffectKind::Fireflies => (
			(rng.random::<f64>() - 0.5) * 0.4,
			(rng.random::<f64>() - 0.5) * 0.4,
		),
	};

	let size = sample(&profile.size, rng.random());

	let motion = match kind {
		EffectKind::Fire => Motion::Fire,
		EffectKind::Ice => Motion::Ice,
		EffectKind::Fireflies => Motion::Fireflies {
			pulse: rng.random::<f64>() * TAU,
		},
		EffectKind::Lightning => Motion::Lightning { zigzag: 0 },
		EffectKind::God => Motion::God {
			spiral: rng.random::<f64>() * TAU,
		},
		EffectKind::Bubbles => Motion::Bubbles {
			bob: rng.random::<f64>() * TAU,
		},
	};

	Particle {
		x,
		y,
		vx,
		vy,
		life,
		max_life: life,
		size,
		hue,
		motion,
	}
}
