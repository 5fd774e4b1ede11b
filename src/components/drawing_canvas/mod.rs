//! Pointer-driven particle drawing surface.
//!
//! Dragging across the canvas emits particles of the selected elemental
//! effect. Each effect has its own emission table, force model, gradient ramp,
//! pointer feel and synthesized sound cue. A two-layer starfield drifts behind
//! the particles, and an optional ambient playlist plays underneath.
//!
//! # Example
//!
//! ```ignore
//! use elemental_canvas::{CanvasConfig, DrawingCanvas, EffectKind};
//!
//! let config = CanvasConfig {
//!     initial_effect: EffectKind::Ice,
//!     ..Default::default()
//! };
//!
//! view! { <DrawingCanvas config=config /> }
//! ```

mod audio;
mod component;
mod config;
mod effects;
mod emitter;
mod frame;
mod physics;
mod playlist;
mod pointer;
mod render;
mod starfield;
mod state;
mod theme;
mod types;

pub use component::DrawingCanvas;
pub use config::CanvasConfig;
pub use theme::Compositing;
pub use types::EffectKind;
