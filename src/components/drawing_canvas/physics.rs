//! Per-kind force models, advanced once per frame.
//!
//! Position always moves by the velocity the particle entered the frame with;
//! the force model then adjusts velocity for the next frame.

use rand::Rng;

use super::pointer::CursorMotion;
use super::types::{Motion, Particle};

/// Cursor speed below which fire ignores the surfing force.
const SURF_THRESHOLD: f64 = 0.1;

/// Advances `p` by one frame. Returns `false` once the particle has expired.
pub fn step<R: Rng>(p: &mut Particle, cursor: CursorMotion, rng: &mut R) -> bool {
	p.x += p.vx;
	p.y += p.vy;

	match &mut p.motion {
		Motion::Fire => {
			p.vy += 0.05;
			if cursor.speed > SURF_THRESHOLD {
				let surf = cursor.speed * 0.3;
				p.vx += cursor.direction.x * surf;
				p.vy += cursor.direction.y * surf;
			}
			damp(p, 0.96);
		}
		Motion::Ice => {
			p.vy += (rng.random::<f64>() - 0.5) * 0.02;
			damp(p, 0.995);
		}
		Motion::Lightning { zigzag } => {
			*zigzag += 1;
			if *zigzag % 3 == 0 {
				p.vx += (rng.random::<f64>() - 0.5) * 8.0;
				p.vy += (rng.random::<f64>() - 0.5) * 8.0;
			}
			damp(p, 0.92);
		}
		Motion::Fireflies { .. } => {
			p.vx += (rng.random::<f64>() - 0.5) * 0.008;
			p.vy += (rng.random::<f64>() - 0.5) * 0.008;
			damp(p, 0.995);
		}
		Motion::God { spiral } => {
			*spiral += 0.05;
			let angle = *spiral;
			p.vx += angle.cos() * 0.02;
			p.vy += angle.sin() * 0.02;
			p.vy -= 0.015;
			damp(p, 0.99);
		}
		Motion::Bubbles { bob } => {
			*bob += 0.03;
			let phase = *bob;
			p.vx += phase.sin() * 0.01;
			p.vy -= 0.005;
			damp(p, 0.998);
		}
	}

	p.life -= 1;
	!p.is_expired()
}

fn damp(p: &mut Particle, factor: f64) {
	p.vx *= factor;
	p.vy *= factor;
}
