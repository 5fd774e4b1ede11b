//! `requestAnimationFrame` driver.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use log::warn;
use wasm_bindgen::prelude::*;

use crate::error::{CanvasError, describe};

/// Returned by a frame callback to keep or end the loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopControl {
	Continue,
	Stop,
}

/// Lets through only the first failure of a long-running loop, so a broken
/// context is reported once instead of sixty times a second.
#[derive(Debug, Default)]
pub struct FaultLatch {
	tripped: bool,
}

impl FaultLatch {
	/// Returns the error of `result` if no earlier call has returned one.
	pub fn first<E>(&mut self, result: Result<(), E>) -> Option<E> {
		let err = result.err()?;
		if std::mem::replace(&mut self.tripped, true) {
			None
		} else {
			Some(err)
		}
	}
}

type FrameCallback = Closure<dyn FnMut(f64)>;

/// A self-rescheduling animation loop.
///
/// The callback receives the host's high-resolution frame timestamp. Dropping
/// the loop cancels any pending frame and frees the callback.
pub struct FrameLoop {
	pending: Rc<Cell<Option<i32>>>,
	callback: Rc<RefCell<Option<FrameCallback>>>,
}

impl FrameLoop {
	pub fn start(mut tick: impl FnMut(f64) -> LoopControl + 'static) -> Result<Self, CanvasError> {
		let window = web_sys::window().ok_or(CanvasError::MissingElement("window"))?;

		let pending = Rc::new(Cell::new(None));
		let callback: Rc<RefCell<Option<FrameCallback>>> = Rc::new(RefCell::new(None));
		let (pending_inner, callback_inner) = (pending.clone(), Rc::downgrade(&callback));

		*callback.borrow_mut() = Some(Closure::new(move |now: f64| {
			pending_inner.set(None);
			if tick(now) == LoopControl::Stop {
				return;
			}
			pending_inner.set(reschedule(&callback_inner));
		}));

		if let Some(ref cb) = *callback.borrow() {
			match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
				Ok(id) => pending.set(Some(id)),
				Err(e) => warn!("elemental-canvas: cannot request frame: {}", describe(&e)),
			}
		}

		Ok(Self { pending, callback })
	}
}

fn reschedule(callback: &Weak<RefCell<Option<FrameCallback>>>) -> Option<i32> {
	let callback = callback.upgrade()?;
	let window = web_sys::window()?;
	let cb = callback.borrow();
	let cb = cb.as_ref()?;
	window
		.request_animation_frame(cb.as_ref().unchecked_ref())
		.map_err(|e| warn!("elemental-canvas: cannot request frame: {}", describe(&e)))
		.ok()
}

impl Drop for FrameLoop {
	fn drop(&mut self) {
		if let (Some(id), Some(window)) = (self.pending.take(), web_sys::window()) {
			let _ = window.cancel_animation_frame(id);
		}
		self.callback.borrow_mut().take();
	}
}
