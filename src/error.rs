//! Error types for the browser-facing parts of the canvas.
//!
//! None of these are fatal: callers log them and degrade the affected feature
//! (no sound, no tracks, no frame) while the render loop keeps running.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failures raised while talking to the host page.
#[derive(Debug, Error)]
pub enum CanvasError {
	/// A DOM element the component expects is not present.
	#[error("missing element: {0}")]
	MissingElement(&'static str),

	/// The canvas refused to hand out a 2D rendering context.
	#[error("2d rendering context unavailable")]
	MissingContext,

	/// The Web Audio context (or one of its nodes) could not be created.
	#[error("audio unavailable: {0}")]
	AudioUnavailable(String),

	/// A single playback request failed.
	#[error("playback failed: {0}")]
	Playback(String),

	/// The track listing endpoint was unreachable or returned garbage.
	#[error("track listing failed: {0}")]
	Listing(String),
}

/// Renders a thrown JS value for inclusion in an error message.
pub(crate) fn describe(value: &JsValue) -> String {
	value
		.as_string()
		.unwrap_or_else(|| format!("{:?}", value))
}
