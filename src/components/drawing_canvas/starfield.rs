//! Two-layer parallax starfield drawn behind the particles.

use std::f64::consts::TAU;

use rand::Rng;
use rand::rngs::StdRng;

use super::theme::{Color, STAR_PALETTE};

const NEAR_COUNT: usize = 150;
const FAR_COUNT: usize = 100;

/// Stars leaving the canvas by more than this wrap to the opposite edge.
const WRAP_MARGIN: f64 = 10.0;

const NEAR_LIFT: f64 = 0.2;
const FAR_LIFT: f64 = 0.1;
const TWINKLE_DEPTH: f64 = 0.05;
const TWINKLE_RATE: f64 = 0.02;

/// A foreground star drifting steadily left.
#[derive(Clone, Debug)]
pub struct NearStar {
	pub x: f64,
	pub y: f64,
	pub size: f64,
	pub speed: f64,
	pub base_opacity: f64,
	pub color: Color,
	pub phase: f64,
}

/// A background star wandering slowly in any direction.
#[derive(Clone, Debug)]
pub struct FarStar {
	pub x: f64,
	pub y: f64,
	pub size: f64,
	pub vx: f64,
	pub vy: f64,
	pub base_opacity: f64,
	pub color: Color,
	pub phase: f64,
	/// Ticks until the next small course change.
	pub redirect_in: u32,
}

impl NearStar {
	pub fn opacity(&self) -> f64 {
		twinkle(self.base_opacity, NEAR_LIFT, self.phase)
	}
}

impl FarStar {
	pub fn opacity(&self) -> f64 {
		twinkle(self.base_opacity, FAR_LIFT, self.phase)
	}
}

fn twinkle(base: f64, lift: f64, phase: f64) -> f64 {
	(base + lift + TWINKLE_DEPTH * phase.sin()).clamp(0.0, 1.0)
}

pub struct Starfield {
	pub near: Vec<NearStar>,
	pub far: Vec<FarStar>,
	width: f64,
	height: f64,
	rng: StdRng,
}

impl Starfield {
	pub fn new(width: f64, height: f64, rng: StdRng) -> Self {
		let mut field = Self {
			near: Vec::new(),
			far: Vec::new(),
			width,
			height,
			rng,
		};
		field.resize(width, height);
		field
	}

	/// Discards every star and scatters a fresh field over the new bounds.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.near.clear();
		self.far.clear();
		if width <= 0.0 || height <= 0.0 {
			return;
		}

		let rng = &mut self.rng;
		self.near = (0..NEAR_COUNT)
			.map(|_| NearStar {
				x: rng.random::<f64>() * width,
				y: rng.random::<f64>() * height,
				size: rng.random::<f64>() * 2.0 + 0.3,
				speed: rng.random::<f64>() * 0.5 + 0.1,
				base_opacity: rng.random::<f64>() * 0.3 + 0.1,
				color: pick_color(rng),
				phase: rng.random::<f64>() * TAU,
			})
			.collect();
		self.far = (0..FAR_COUNT)
			.map(|_| FarStar {
				x: rng.random::<f64>() * width,
				y: rng.random::<f64>() * height,
				size: rng.random::<f64>() * 1.5 + 0.2,
				vx: (rng.random::<f64>() - 0.5) * 0.02,
				vy: (rng.random::<f64>() - 0.5) * 0.02,
				base_opacity: rng.random::<f64>() * 0.15 + 0.05,
				color: pick_color(rng),
				phase: rng.random::<f64>() * TAU,
				redirect_in: rng.random_range(10_000..20_000),
			})
			.collect();
	}

	/// Advances every star by one tick.
	pub fn update(&mut self) {
		let (width, height) = (self.width, self.height);

		for star in &mut self.far {
			star.x += star.vx;
			star.y += star.vy;
			star.phase += TWINKLE_RATE;

			if star.x < -WRAP_MARGIN {
				star.x = width + WRAP_MARGIN;
			} else if star.x > width + WRAP_MARGIN {
				star.x = -WRAP_MARGIN;
			}
			if star.y < -WRAP_MARGIN {
				star.y = height + WRAP_MARGIN;
			} else if star.y > height + WRAP_MARGIN {
				star.y = -WRAP_MARGIN;
			}

			star.redirect_in = star.redirect_in.saturating_sub(1);
			if star.redirect_in == 0 {
				star.vx = (star.vx + (self.rng.random::<f64>() - 0.5) * 0.005).clamp(-0.03, 0.03);
				star.vy = (star.vy + (self.rng.random::<f64>() - 0.5) * 0.005).clamp(-0.03, 0.03);
				star.redirect_in = self.rng.random_range(10_000..30_000);
			}
		}

		for star in &mut self.near {
			star.x -= star.speed;
			star.phase += TWINKLE_RATE;
			if star.x < -WRAP_MARGIN {
				star.x = width + WRAP_MARGIN;
				star.y = self.rng.random::<f64>() * height;
			}
		}
	}
}

fn pick_color(rng: &mut StdRng) -> Color {
	STAR_PALETTE[rng.random_range(0..STAR_PALETTE.len())]
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;
	use rand::SeedableRng;

	fn field(width: f64, height: f64) -> Starfield {
		Starfield::new(width, height, StdRng::seed_from_u64(3))
	}

	#[test]
	fn populates_both_layers_within_bounds() {
		let f = field(800.0, 600.0);
		assert_eq!((f.near.len(), f.far.len()), (150, 100));
		for s in &f.near {
			assert!((0.0..800.0).contains(&s.x) && (0.0..600.0).contains(&s.y));
			assert!((0.3..2.3).contains(&s.size));
			assert!((0.1..0.6).contains(&s.speed));
			assert!((0.1..0.4).contains(&s.base_opacity));
			assert!(STAR_PALETTE.contains(&s.color));
		}
		for s in &f.far {
			assert!((0.2..1.7).contains(&s.size));
			assert!(s.vx.abs() <= 0.01 && s.vy.abs() <= 0.01);
			assert!((0.05..0.2).contains(&s.base_opacity));
			assert!((10_000..20_000).contains(&s.redirect_in));
		}
	}

	#[test]
	fn degenerate_bounds_yield_no_stars() {
		assert!(field(0.0, 600.0).near.is_empty());
		let f = field(800.0, -1.0);
		assert!(f.near.is_empty() && f.far.is_empty());
	}

	#[test]
	fn resize_regenerates_everything() {
		let mut f = field(800.0, 600.0);
		f.resize(100.0, 50.0);
		assert_eq!((f.near.len(), f.far.len()), (150, 100));
		assert!(f.near.iter().all(|s| s.x < 100.0 && s.y < 50.0));
		assert!(f.far.iter().all(|s| s.x < 100.0 && s.y < 50.0));
	}

	#[test]
	fn near_stars_wrap_to_the_right_edge() {
		let mut f = field(200.0, 100.0);
		f.near[0].x = -9.95;
		f.near[0].speed = 0.5;
		f.update();
		assert_eq!(f.near[0].x, 210.0);
		assert!((0.0..100.0).contains(&f.near[0].y));
	}

	#[test]
	fn far_stars_wrap_on_every_edge() {
		let mut f = field(200.0, 100.0);
		f.far[0].x = 210.5;
		f.far[0].y = -10.5;
		f.far[0].vx = 0.0;
		f.far[0].vy = 0.0;
		f.update();
		assert_eq!((f.far[0].x, f.far[0].y), (-10.0, 110.0));
	}

	#[test]
	fn expired_timer_redirects_within_clamp() {
		let mut f = field(200.0, 100.0);
		f.far[0].vx = 0.03;
		f.far[0].redirect_in = 1;
		f.update();
		assert!(f.far[0].vx.abs() <= 0.03);
		assert!((10_000..30_000).contains(&f.far[0].redirect_in));
	}

	#[test]
	fn opacity_twinkles_within_unit_range() {
		let mut f = field(800.0, 600.0);
		for _ in 0..400 {
			f.update();
			for s in &f.near {
				assert!((s.opacity() - (s.base_opacity + 0.2)).abs() <= 0.05 + 1e-12);
			}
			assert!(f.far.iter().all(|s| (0.0..=1.0).contains(&s.opacity())));
		}
	}
}
