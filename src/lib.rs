//! elemental-canvas: pointer-driven particle drawing with elemental effects.
//!
//! This crate provides a WASM drawing surface where strokes emit fire, ice,
//! fireflies, lightning, god-particle and bubble effects, each with its own
//! motion, glow and synthesized sound, over a drifting starfield.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;
pub mod error;

pub use components::drawing_canvas::{CanvasConfig, Compositing, DrawingCanvas, EffectKind};
pub use error::CanvasError;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("elemental-canvas: logging initialized");
}

fn config_script() -> Result<HtmlScriptElement, CanvasError> {
	let window: Window = web_sys::window().ok_or(CanvasError::MissingElement("window"))?;
	let document = window
		.document()
		.ok_or(CanvasError::MissingElement("document"))?;
	document
		.get_element_by_id("canvas-config")
		.ok_or(CanvasError::MissingElement("#canvas-config"))?
		.dyn_into()
		.map_err(|_| CanvasError::MissingElement("#canvas-config"))
}

/// Load canvas configuration from a script element with id="canvas-config".
/// Missing or malformed configuration falls back to the defaults.
fn load_config() -> CanvasConfig {
	let json_text = match config_script().map(|script| script.text()) {
		Ok(Ok(text)) => text,
		_ => {
			info!("elemental-canvas: no page configuration, using defaults");
			return CanvasConfig::default();
		}
	};

	match serde_json::from_str::<CanvasConfig>(&json_text) {
		Ok(config) => {
			info!(
				"elemental-canvas: loaded config ({}x{}, starting with {})",
				config.width,
				config.height,
				config.initial_effect.name()
			);
			config
		}
		Err(e) => {
			warn!("elemental-canvas: failed to parse canvas config: {}", e);
			CanvasConfig::default()
		}
	}
}

/// Main application component.
/// Loads configuration from the DOM and renders the drawing canvas.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = load_config();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Elemental Canvas" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<main class="elemental-canvas">
			<h1>"Elemental Canvas"</h1>
			<p class="subtitle">"Pick an element and drag across the canvas to paint with it."</p>
			<DrawingCanvas config=config />
		</main>
	}
}
