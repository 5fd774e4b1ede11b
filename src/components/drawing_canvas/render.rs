//! Canvas rendering for both layers.
//!
//! The particle layer is prepared once per frame according to the configured
//! [`Compositing`] policy and then receives each surviving particle with
//! additive blending, so overlapping glows brighten instead of occluding.
//! The starfield layer is cleared and redrawn from scratch every frame.

use std::f64::consts::TAU;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::effects::radius_multiplier;
use super::starfield::Starfield;
use super::theme::{Color, Compositing, resolve_ramp};
use super::types::Particle;

/// Gradient reach relative to the faded particle size.
const GRADIENT_SPREAD: f64 = 4.0;

const FAR_GLOW: f64 = 1.5;
const NEAR_GLOW: f64 = 2.0;

/// Radius of the filled disc.
pub fn draw_radius(p: &Particle) -> f64 {
	p.size * p.fade() * radius_multiplier(p.kind())
}

/// Outer radius of the radial gradient painted into the disc.
pub fn gradient_radius(p: &Particle) -> f64 {
	p.size * p.fade() * GRADIENT_SPREAD
}

/// Readies the particle layer for a new frame.
pub fn begin_particle_frame(
	ctx: &CanvasRenderingContext2d,
	width: f64,
	height: f64,
	compositing: Compositing,
) -> Result<(), JsValue> {
	match compositing {
		Compositing::FullClear => ctx.clear_rect(0.0, 0.0, width, height),
		Compositing::TrailFade { alpha } => {
			ctx.set_global_composite_operation("destination-out")?;
			ctx.set_fill_style_str(&Color::rgb(0, 0, 0).with_alpha(alpha).to_css());
			ctx.fill_rect(0.0, 0.0, width, height);
		}
	}
	ctx.set_global_composite_operation("lighter")
}

/// Paints one particle as a glowing disc.
pub fn draw_particle(ctx: &CanvasRenderingContext2d, p: &Particle) -> Result<(), JsValue> {
	let gradient = ctx.create_radial_gradient(p.x, p.y, 0.0, p.x, p.y, gradient_radius(p))?;
	for (offset, color) in resolve_ramp(p.kind(), p.hue, p.fade()) {
		gradient.add_color_stop(offset as f32, &color.to_css())?;
	}

	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	ctx.begin_path();
	ctx.arc(p.x, p.y, draw_radius(p), 0.0, TAU)?;
	ctx.fill();
	Ok(())
}

/// Clears the background layer and draws the far stars, then the near stars.
pub fn draw_starfield(
	ctx: &CanvasRenderingContext2d,
	field: &Starfield,
	width: f64,
	height: f64,
) -> Result<(), JsValue> {
	ctx.clear_rect(0.0, 0.0, width, height);

	for star in &field.far {
		draw_star(ctx, star.x, star.y, star.size, star.opacity(), star.color, FAR_GLOW)?;
	}
	for star in &field.near {
		draw_star(ctx, star.x, star.y, star.size, star.opacity(), star.color, NEAR_GLOW)?;
	}
	Ok(())
}

fn draw_star(
	ctx: &CanvasRenderingContext2d,
	x: f64,
	y: f64,
	size: f64,
	opacity: f64,
	color: Color,
	glow: f64,
) -> Result<(), JsValue> {
	let css = color.to_css();
	ctx.save();
	ctx.set_global_alpha(opacity);
	ctx.set_fill_style_str(&css);
	ctx.begin_path();
	let drawn = ctx.arc(x, y, size, 0.0, TAU);
	if drawn.is_ok() {
		ctx.fill();
		ctx.set_shadow_blur(size * glow);
		ctx.set_shadow_color(&css);
		ctx.fill();
	}
	ctx.restore();
	drawn
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::drawing_canvas::types::Motion;

	fn particle(motion: Motion, life: i32) -> Particle {
		Particle {
			x: 0.0,
			y: 0.0,
			vx: 0.0,
			vy: 0.0,
			life,
			max_life: 10,
			size: 2.0,
			hue: 200.0,
			motion,
		}
	}

	#[test]
	fn disc_radius_follows_kind_multiplier() {
		let god = particle(Motion::God { spiral: 0.0 }, 10);
		assert_eq!(draw_radius(&god), 12.0);
		let ice = particle(Motion::Ice, 5);
		assert_eq!(draw_radius(&ice), 4.0);
	}

	#[test]
	fn gradient_radius_ignores_kind() {
		let god = particle(Motion::God { spiral: 0.0 }, 5);
		let zap = particle(Motion::Lightning { zigzag: 0 }, 5);
		assert_eq!(gradient_radius(&god), 4.0);
		assert_eq!(gradient_radius(&god), gradient_radius(&zap));
	}

	#[test]
	fn radii_shrink_with_age() {
		let young = particle(Motion::Fire, 9);
		let old = particle(Motion::Fire, 3);
		assert!(draw_radius(&old) < draw_radius(&young));
		assert!(gradient_radius(&old) < gradient_radius(&young));
	}
}
