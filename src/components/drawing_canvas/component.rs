//! Leptos component wrapping the drawing surface.
//!
//! Two canvases are stacked: the starfield behind and the particle layer in
//! front. Mouse and touch handlers feed the shared [`CanvasState`]; two
//! `requestAnimationFrame` loops advance and paint each layer. Audio devices
//! are created on the first gesture because browsers refuse to start an audio
//! context before one.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{debug, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, TouchEvent};

use super::audio::{AmbientPlayer, Synth};
use super::config::CanvasConfig;
use super::effects::DragProfile;
use super::frame::{FaultLatch, FrameLoop, LoopControl};
use super::playlist::{Playlist, display_name, fetch_track_list};
use super::render;
use super::starfield::Starfield;
use super::state::CanvasState;
use super::theme::Compositing;
use super::types::{EffectKind, Point};
use crate::error::{CanvasError, describe};

/// Audio devices, created lazily after the first user gesture.
#[derive(Default)]
struct AudioRack {
	synth: RefCell<Option<Synth>>,
	player: RefCell<Option<AmbientPlayer>>,
}

impl AudioRack {
	fn unlock(&self, config: &CanvasConfig, muted: bool) {
		let mut synth = self.synth.borrow_mut();
		if synth.is_some() {
			return;
		}
		match Synth::new(config.master_volume, muted, StdRng::seed_from_u64(entropy_seed())) {
			Ok(s) => *synth = Some(s),
			Err(e) => warn!("elemental-canvas: {}", e),
		}
	}

	fn set_muted(&self, muted: bool, config: &CanvasConfig) {
		if let Some(synth) = self.synth.borrow_mut().as_mut() {
			synth.set_muted(muted);
		}
		if let Some(player) = self.player.borrow().as_ref() {
			player
				.deck()
				.set_volume(if muted { 0.0 } else { config.music_volume });
		}
	}

	fn play(&self, track: &str, config: &CanvasConfig, muted: bool, playlist: RwSignal<Playlist>) {
		let mut slot = self.player.borrow_mut();
		if slot.is_none() {
			let volume = if muted { 0.0 } else { config.music_volume };
			match AmbientPlayer::new(&config.track_base_path, volume, config.loop_tracks) {
				Ok(mut player) => {
					let deck = player.deck();
					player.set_on_ended(move || {
						let next = playlist
							.try_update(|p| p.advance().map(str::to_string))
							.flatten();
						if let Some(next) = next {
							deck.play(&next);
						}
					});
					*slot = Some(player);
				}
				Err(e) => {
					warn!("elemental-canvas: {}", e);
					return;
				}
			}
		}
		if let Some(player) = slot.as_ref() {
			player.deck().play(track);
		}
	}

	fn stop_music(&self) {
		self.player.borrow_mut().take();
	}

	fn shutdown(&self) {
		self.stop_music();
		self.synth.borrow_mut().take();
	}
}

/// Seed drawn from the wall clock and `Math.random`.
fn entropy_seed() -> u64 {
	let clock = js_sys::Date::now() as u64;
	let noise = (js_sys::Math::random() * u32::MAX as f64) as u64;
	clock ^ (noise << 32) ^ noise
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, CanvasError> {
	canvas
		.get_context("2d")
		.ok()
		.flatten()
		.ok_or(CanvasError::MissingContext)?
		.dyn_into()
		.map_err(|_| CanvasError::MissingContext)
}

/// Pointer position relative to the canvas' bounding box.
fn local_point(canvas: NodeRef<leptos::html::Canvas>, client_x: f64, client_y: f64) -> Option<Point> {
	let canvas: HtmlCanvasElement = canvas.get_untracked()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some(Point::new(client_x - rect.left(), client_y - rect.top()))
}

fn mouse_point(canvas: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<Point> {
	local_point(canvas, ev.client_x() as f64, ev.client_y() as f64)
}

fn touch_point(canvas: NodeRef<leptos::html::Canvas>, ev: &TouchEvent) -> Option<Point> {
	let touch = ev.touches().get(0)?;
	local_point(canvas, touch.client_x() as f64, touch.client_y() as f64)
}

/// Pointer-driven particle canvas with effect, sound and music controls.
///
/// Configuration is fixed for the component's lifetime; see [`CanvasConfig`].
/// That includes the canvas size, so both layers are sized once at mount and
/// the starfield is scattered over those bounds a single time.
#[component]
pub fn DrawingCanvas(#[prop(optional)] config: CanvasConfig) -> impl IntoView {
	let effect = RwSignal::new(config.initial_effect);
	let muted = RwSignal::new(false);
	let music_on = RwSignal::new(false);
	let drawing = RwSignal::new(false);
	let playlist = RwSignal::new(Playlist::default());

	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let backdrop_ref = NodeRef::<leptos::html::Canvas>::new();

	let config = Rc::new(config);
	let sim = Rc::new(RefCell::new(CanvasState::new(
		config.initial_effect,
		config.cursor_decay_ms,
		StdRng::seed_from_u64(entropy_seed()),
	)));
	let rack = Rc::new(AudioRack::default());
	let loops: Rc<RefCell<Vec<FrameLoop>>> = Rc::new(RefCell::new(Vec::new()));

	{
		let config = config.clone();
		spawn_local(async move {
			let tracks = fetch_track_list(&config.listing_url, &config.track_base_path).await;
			let _ = playlist.try_set(Playlist::new(tracks));
		});
	}

	let (sim_init, rack_init, config_init) = (sim.clone(), rack.clone(), config.clone());
	Effect::new(move |_| {
		let (Some(canvas), Some(backdrop)) = (canvas_ref.get(), backdrop_ref.get()) else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let backdrop: HtmlCanvasElement = backdrop.into();
		let (w, h) = (config_init.width, config_init.height);
		for c in [&canvas, &backdrop] {
			c.set_width(w as u32);
			c.set_height(h as u32);
		}
		debug!("elemental-canvas: canvas sized {}x{}", w, h);

		let (ctx, backdrop_ctx) = match (context_2d(&canvas), context_2d(&backdrop)) {
			(Ok(a), Ok(b)) => (a, b),
			(Err(e), _) | (_, Err(e)) => {
				warn!("elemental-canvas: {}", e);
				return;
			}
		};

		let mut loops = loops.borrow_mut();
		loops.clear();

		let (sim, rack) = (sim_init.clone(), rack_init.clone());
		let compositing = config_init.compositing;
		let mut particle_faults = FaultLatch::default();
		let particles = FrameLoop::start(move |now| {
			if !canvas.is_connected() {
				rack.shutdown();
				return LoopControl::Stop;
			}
			let mut sim = sim.borrow_mut();
			let mode = if sim.take_wipe() { Compositing::FullClear } else { compositing };
			let mut failure = render::begin_particle_frame(&ctx, w, h, mode).err();
			sim.frame(now, |p| {
				if let Err(e) = render::draw_particle(&ctx, p) {
					failure.get_or_insert(e);
				}
			});
			if let Some(e) = particle_faults.first(failure.map_or(Ok(()), Err)) {
				warn!("elemental-canvas: particle layer: {}", describe(&e));
			}
			LoopControl::Continue
		});

		let mut field = Starfield::new(w, h, StdRng::seed_from_u64(entropy_seed()));
		let mut star_faults = FaultLatch::default();
		let stars = FrameLoop::start(move |_| {
			if !backdrop.is_connected() {
				return LoopControl::Stop;
			}
			if let Some(e) = star_faults.first(render::draw_starfield(&backdrop_ctx, &field, w, h)) {
				warn!("elemental-canvas: starfield layer: {}", describe(&e));
			}
			field.update();
			LoopControl::Continue
		});

		for started in [particles, stars] {
			match started {
				Ok(frame_loop) => loops.push(frame_loop),
				Err(e) => warn!("elemental-canvas: {}", e),
			}
		}
	});

	let (sim_down, rack_down, config_down) = (sim.clone(), rack.clone(), config.clone());
	let begin_stroke = move |pos: Point| {
		rack_down.unlock(&config_down, muted.get_untracked());
		let mut synth = rack_down.synth.borrow_mut();
		sim_down.borrow_mut().pointer_down(pos, &mut *synth);
		drawing.set(true);
	};

	let (sim_move, rack_move) = (sim.clone(), rack.clone());
	let continue_stroke = move |pos: Point| {
		let mut synth = rack_move.synth.borrow_mut();
		sim_move.borrow_mut().pointer_move(pos, &mut *synth);
	};

	let sim_up = sim.clone();
	let end_stroke = move |now_ms: f64| {
		sim_up.borrow_mut().pointer_up(now_ms);
		drawing.set(false);
	};

	let on_mousedown = {
		let begin_stroke = begin_stroke.clone();
		move |ev: MouseEvent| {
			ev.prevent_default();
			if let Some(pos) = mouse_point(canvas_ref, &ev) {
				begin_stroke(pos);
			}
		}
	};
	let on_touchstart = move |ev: TouchEvent| {
		ev.prevent_default();
		if let Some(pos) = touch_point(canvas_ref, &ev) {
			begin_stroke(pos);
		}
	};
	let on_mousemove = {
		let continue_stroke = continue_stroke.clone();
		move |ev: MouseEvent| {
			ev.prevent_default();
			if let Some(pos) = mouse_point(canvas_ref, &ev) {
				continue_stroke(pos);
			}
		}
	};
	let on_touchmove = move |ev: TouchEvent| {
		ev.prevent_default();
		if let Some(pos) = touch_point(canvas_ref, &ev) {
			continue_stroke(pos);
		}
	};
	let on_mouse_end = {
		let end_stroke = end_stroke.clone();
		move |ev: MouseEvent| {
			ev.prevent_default();
			end_stroke(ev.time_stamp());
		}
	};
	let on_touch_end = move |ev: TouchEvent| {
		ev.prevent_default();
		end_stroke(ev.time_stamp());
	};
	let on_mouseleave = on_mouse_end.clone();
	let on_touchcancel = on_touch_end.clone();

	let (rack_mute, config_mute) = (rack.clone(), config.clone());
	let on_mute = move |_: MouseEvent| {
		let now_muted = !muted.get_untracked();
		muted.set(now_muted);
		rack_mute.set_muted(now_muted, &config_mute);
	};

	let (rack_music, config_music) = (rack.clone(), config.clone());
	let on_music = move |_: MouseEvent| {
		if music_on.get_untracked() {
			music_on.set(false);
			rack_music.stop_music();
			info!("elemental-canvas: background music stopped");
			return;
		}
		rack_music.unlock(&config_music, muted.get_untracked());
		music_on.set(true);

		let (rack, config) = (rack_music.clone(), config_music.clone());
		spawn_local(async move {
			if playlist.try_with_untracked(Playlist::is_empty).unwrap_or(false) {
				let tracks = fetch_track_list(&config.listing_url, &config.track_base_path).await;
				let _ = playlist.try_set(Playlist::new(tracks));
			}
			if music_on.try_get_untracked() != Some(true) {
				return;
			}
			let track = playlist
				.try_with_untracked(|p| p.current().map(str::to_string))
				.flatten();
			match track {
				Some(track) => {
					let muted = muted.try_get_untracked().unwrap_or(false);
					rack.play(&track, &config, muted, playlist);
					info!("elemental-canvas: background music started");
				}
				None => info!("elemental-canvas: no ambient tracks available"),
			}
		});
	};

	let skip = {
		let (rack, config) = (rack.clone(), config.clone());
		move |forward: bool| {
			let track = playlist
				.try_update(|p| {
					let track = if forward { p.advance() } else { p.retreat() };
					track.map(str::to_string)
				})
				.flatten();
			if let (Some(track), true) = (track, music_on.get_untracked()) {
				rack.play(&track, &config, muted.get_untracked(), playlist);
			}
		}
	};
	let on_previous = {
		let skip = skip.clone();
		move |_: MouseEvent| skip(false)
	};
	let on_next = move |_: MouseEvent| skip(true);

	let sim_clear = sim.clone();
	let on_clear = move |_: MouseEvent| {
		let dropped = sim_clear.borrow_mut().clear();
		debug!("elemental-canvas: cleared {} particles", dropped);
	};

	let effect_buttons = EffectKind::ALL
		.into_iter()
		.map(|kind| {
			let sim = sim.clone();
			view! {
				<button
					class="effect-button"
					class:active=move || effect.get() == kind
					on:click=move |_| {
						effect.set(kind);
						sim.borrow_mut().set_effect(kind);
					}
				>
					{kind.emoji()}" "{kind.label()}
				</button>
			}
		})
		.collect_view();

	let track_nav_display = move || {
		if music_on.get() && !playlist.with(Playlist::is_empty) { "inline-flex" } else { "none" }
	};

	view! {
		<div class="drawing-canvas">
			<div class="toolbar">
				<button on:click=on_mute>
					{move || if muted.get() { "Unmute" } else { "Mute" }}
				</button>
				<span class="track-nav" style:display=track_nav_display>
					<button on:click=on_previous>"⏮"</button>
					<button on:click=on_next>"⏭"</button>
				</span>
				<button on:click=on_music class:playing=move || music_on.get()>
					{move || if music_on.get() { "Stop Music" } else { "Play Music" }}
				</button>
				<button on:click=on_clear>"Clear"</button>
			</div>
			<div class="effects">{effect_buttons}</div>
			<div class="stage">
				<canvas node_ref=backdrop_ref class="starfield" style="pointer-events: none; z-index: 1;" />
				<canvas
					node_ref=canvas_ref
					class="particles"
					style="cursor: crosshair; touch-action: none; z-index: 2;"
					on:mousedown=on_mousedown
					on:mousemove=on_mousemove
					on:mouseup=on_mouse_end
					on:mouseleave=on_mouseleave
					on:touchstart=on_touchstart
					on:touchmove=on_touchmove
					on:touchend=on_touch_end
					on:touchcancel=on_touchcancel
				/>
			</div>
			<div class="status">
				<p>
					"Draw on the canvas to create "{move || effect.get().name()}" effects with sound! "
					{move || effect.get().emoji()}
				</p>
				<p class="status-line">
					<strong>"Feel: "</strong>
					{move || DragProfile::for_effect(effect.get()).description}
					" | "
					<strong>"Sound: "</strong>
					{move || if muted.get() { "Muted" } else { "Enabled" }}
					" | "
					<strong>"Music: "</strong>
					{move || if music_on.get() { "Playing" } else { "Stopped" }}
					{move || {
						music_on
							.get()
							.then(|| playlist.with(|p| p.current().map(display_name)))
							.flatten()
							.map(|name| view! { " | " <strong>"Track: "</strong> {name} })
					}}
				</p>
				{move || {
					drawing
						.get()
						.then(|| {
							let kind = effect.get();
							view! {
								<p class=format!("drawing-indicator {}", kind.name())>
									{format!("{} Drawing {}...", kind.emoji(), kind.label().to_lowercase())}
								</p>
							}
						})
				}}
			</div>
		</div>
	}
}
