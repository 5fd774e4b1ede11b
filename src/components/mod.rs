//! UI components.

pub mod drawing_canvas;
