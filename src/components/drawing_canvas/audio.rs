//! Synthesized sound cues and ambient music playback.
//!
//! Sound is strictly best-effort: every failure is logged and swallowed so the
//! drawing loop never notices that audio is missing.

use log::{info, warn};
use rand::Rng;
use rand::rngs::StdRng;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
	AudioContext, AudioContextState, BiquadFilterType, GainNode, HtmlAudioElement, OscillatorType,
};

use super::types::EffectKind;
use crate::error::{CanvasError, describe};

/// Something that can play a short cue for an emission.
pub trait SoundCue {
	/// `intensity` is in `0.0..=1.0`.
	fn cue(&mut self, kind: EffectKind, intensity: f64);
}

/// `None` is silent; used before audio has been unlocked by a gesture.
impl<S: SoundCue> SoundCue for Option<S> {
	fn cue(&mut self, kind: EffectKind, intensity: f64) {
		if let Some(inner) = self {
			inner.cue(kind, intensity);
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Waveform {
	Sine,
	Square,
	Sawtooth,
	Triangle,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Ramp {
	Linear,
	Exponential,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FilterKind {
	Lowpass,
	Highpass,
	Bandpass,
}

/// Frequency glide from the voice's start frequency.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sweep {
	pub shape: Ramp,
	pub to: f64,
	/// Seconds after the cue starts.
	pub at: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Voice {
	pub waveform: Waveform,
	pub frequency: f64,
	pub sweep: Option<Sweep>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Filter {
	pub kind: FilterKind,
	pub frequency: f64,
	pub q: Option<f64>,
}

/// Everything needed to schedule one cue on an audio graph.
///
/// The gain envelope rises linearly from silence to `peak` over `attack`
/// seconds, then falls with `release` until `length`, when the voices stop.
#[derive(Clone, Debug, PartialEq)]
pub struct ToneRecipe {
	pub voices: Vec<Voice>,
	pub filter: Option<Filter>,
	pub peak: f64,
	pub attack: f64,
	pub release: Ramp,
	pub length: f64,
}

impl ToneRecipe {
	pub fn for_effect<R: Rng>(kind: EffectKind, intensity: f64, rng: &mut R) -> Self {
		let duration = 0.1 + intensity * 0.1;
		let mut r = || rng.random::<f64>();

		match kind {
			EffectKind::Fire => Self {
				voices: vec![Voice {
					waveform: Waveform::Sawtooth,
					frequency: 80.0 + r() * 40.0,
					sweep: Some(Sweep {
						shape: Ramp::Exponential,
						to: 40.0 + r() * 20.0,
						at: duration,
					}),
				}],
				filter: Some(Filter {
					kind: FilterKind::Lowpass,
					frequency: 800.0 + r() * 400.0,
					q: Some(2.0),
				}),
				peak: 0.1 * intensity,
				attack: 0.01,
				release: Ramp::Exponential,
				length: duration,
			},
			EffectKind::Ice => Self {
				voices: vec![
					Voice {
						waveform: Waveform::Sine,
						frequency: 800.0 + r() * 600.0,
						sweep: None,
					},
					Voice {
						waveform: Waveform::Sine,
						frequency: 1200.0 + r() * 800.0,
						sweep: None,
					},
				],
				filter: None,
				peak: 0.08 * intensity,
				attack: 0.01,
				release: Ramp::Exponential,
				length: duration * 2.0,
			},
			EffectKind::Lightning => Self {
				voices: vec![Voice {
					waveform: Waveform::Square,
					frequency: 200.0 + r() * 300.0,
					sweep: Some(Sweep {
						shape: Ramp::Linear,
						to: 100.0 + r() * 200.0,
						at: duration * 0.5,
					}),
				}],
				filter: Some(Filter {
					kind: FilterKind::Highpass,
					frequency: 300.0,
					q: None,
				}),
				peak: 0.15 * intensity,
				attack: 0.005,
				release: Ramp::Linear,
				length: duration * 0.3,
			},
			EffectKind::God => {
				let base = 220.0 + r() * 110.0;
				Self {
					voices: [1.0, 1.5, 2.0]
						.into_iter()
						.map(|ratio| Voice {
							waveform: Waveform::Sine,
							frequency: base * ratio,
							sweep: None,
						})
						.collect(),
					filter: None,
					peak: 0.06 * intensity,
					attack: 0.02,
					release: Ramp::Exponential,
					length: duration * 3.0,
				}
			}
			EffectKind::Bubbles => Self {
				voices: vec![Voice {
					waveform: Waveform::Sine,
					frequency: 400.0 + r() * 200.0,
					sweep: Some(Sweep {
						shape: Ramp::Exponential,
						to: 200.0 + r() * 100.0,
						at: duration,
					}),
				}],
				filter: Some(Filter {
					kind: FilterKind::Bandpass,
					frequency: 500.0,
					q: Some(5.0),
				}),
				peak: 0.1 * intensity,
				attack: 0.01,
				release: Ramp::Exponential,
				length: duration,
			},
			EffectKind::Fireflies => Self {
				voices: vec![Voice {
					waveform: Waveform::Triangle,
					frequency: 600.0 + r() * 400.0,
					sweep: None,
				}],
				filter: None,
				peak: 0.04 * intensity,
				attack: 0.02,
				release: Ramp::Exponential,
				length: duration * 2.0,
			},
		}
	}
}

/// Floor for exponential ramps, which cannot reach zero.
const SILENCE: f32 = 0.001;

/// Web Audio synthesizer for emission cues.
pub struct Synth {
	ctx: AudioContext,
	master: GainNode,
	volume: f64,
	muted: bool,
	rng: StdRng,
}

impl Synth {
	/// Opens an audio context. Must be called from a user gesture to be audible.
	pub fn new(volume: f64, muted: bool, rng: StdRng) -> Result<Self, CanvasError> {
		let unavailable = |e: JsValue| CanvasError::AudioUnavailable(describe(&e));
		let ctx = AudioContext::new().map_err(unavailable)?;

		if ctx.state() == AudioContextState::Suspended {
			match ctx.resume() {
				Ok(promise) => leptos::task::spawn_local(async move {
					if let Err(e) = JsFuture::from(promise).await {
						warn!("elemental-canvas: audio resume failed: {}", describe(&e));
					}
				}),
				Err(e) => warn!("elemental-canvas: audio resume failed: {}", describe(&e)),
			}
		}

		let master = ctx.create_gain().map_err(unavailable)?;
		master
			.connect_with_audio_node(&ctx.destination())
			.map_err(unavailable)?;
		master.gain().set_value(if muted { 0.0 } else { volume as f32 });

		info!("elemental-canvas: audio context initialized");
		Ok(Self {
			ctx,
			master,
			volume,
			muted,
			rng,
		})
	}

	pub fn set_muted(&mut self, muted: bool) {
		self.muted = muted;
		self.master
			.gain()
			.set_value(if muted { 0.0 } else { self.volume as f32 });
	}

	fn schedule(&self, recipe: &ToneRecipe) -> Result<(), JsValue> {
		let now = self.ctx.current_time();
		let end = now + recipe.length;

		let gain = self.ctx.create_gain()?;
		let envelope = gain.gain();
		envelope.set_value_at_time(0.0, now)?;
		envelope.linear_ramp_to_value_at_time(recipe.peak as f32, now + recipe.attack)?;
		match recipe.release {
			Ramp::Exponential => envelope.exponential_ramp_to_value_at_time(SILENCE, end)?,
			Ramp::Linear => envelope.linear_ramp_to_value_at_time(0.0, end)?,
		};
		gain.connect_with_audio_node(&self.master)?;

		let sink: web_sys::AudioNode = match recipe.filter {
			Some(wanted) => {
				let filter = self.ctx.create_biquad_filter()?;
				filter.set_type(match wanted.kind {
					FilterKind::Lowpass => BiquadFilterType::Lowpass,
					FilterKind::Highpass => BiquadFilterType::Highpass,
					FilterKind::Bandpass => BiquadFilterType::Bandpass,
				});
				filter.frequency().set_value(wanted.frequency as f32);
				if let Some(q) = wanted.q {
					filter.q().set_value(q as f32);
				}
				filter.connect_with_audio_node(&gain)?;
				filter.into()
			}
			None => gain.into(),
		};

		for voice in &recipe.voices {
			let osc = self.ctx.create_oscillator()?;
			osc.set_type(match voice.waveform {
				Waveform::Sine => OscillatorType::Sine,
				Waveform::Square => OscillatorType::Square,
				Waveform::Sawtooth => OscillatorType::Sawtooth,
				Waveform::Triangle => OscillatorType::Triangle,
			});
			let freq = osc.frequency();
			freq.set_value_at_time(voice.frequency as f32, now)?;
			if let Some(sweep) = voice.sweep {
				match sweep.shape {
					Ramp::Exponential => {
						freq.exponential_ramp_to_value_at_time(sweep.to as f32, now + sweep.at)?
					}
					Ramp::Linear => freq.linear_ramp_to_value_at_time(sweep.to as f32, now + sweep.at)?,
				};
			}
			osc.connect_with_audio_node(&sink)?;
			osc.start_with_when(now)?;
			osc.stop_with_when(end)?;
		}
		Ok(())
	}
}

impl SoundCue for Synth {
	fn cue(&mut self, kind: EffectKind, intensity: f64) {
		if self.muted {
			return;
		}
		let recipe = ToneRecipe::for_effect(kind, intensity, &mut self.rng);
		if let Err(e) = self.schedule(&recipe) {
			warn!("elemental-canvas: {}", CanvasError::Playback(describe(&e)));
		}
	}
}

impl Drop for Synth {
	fn drop(&mut self) {
		let _ = self.ctx.close();
	}
}

/// Cheap handle to the ambient `<audio>` element.
#[derive(Clone)]
pub struct Deck {
	audio: HtmlAudioElement,
	base_path: String,
}

impl Deck {
	/// Loads `track` from the ambient directory and starts playback.
	pub fn play(&self, track: &str) {
		self.audio.set_src(&format!("{}{}", self.base_path, track));
		match self.audio.play() {
			Ok(promise) => {
				leptos::task::spawn_local(async move {
					if let Err(e) = JsFuture::from(promise).await {
						warn!("elemental-canvas: {}", CanvasError::Playback(describe(&e)));
					}
				});
				info!("elemental-canvas: playing ambient track: {}", track);
			}
			Err(e) => warn!("elemental-canvas: {}", CanvasError::Playback(describe(&e))),
		}
	}

	pub fn stop(&self) {
		let _ = self.audio.pause();
		self.audio.set_current_time(0.0);
	}

	pub fn set_volume(&self, volume: f64) {
		self.audio.set_volume(volume);
	}
}

/// Ambient music player. Dropping it stops playback.
pub struct AmbientPlayer {
	deck: Deck,
	on_ended: Option<Closure<dyn FnMut()>>,
}

impl AmbientPlayer {
	pub fn new(base_path: &str, volume: f64, looping: bool) -> Result<Self, CanvasError> {
		let audio = HtmlAudioElement::new()
			.map_err(|e| CanvasError::AudioUnavailable(describe(&e)))?;
		audio.set_loop(looping);
		audio.set_volume(volume);
		Ok(Self {
			deck: Deck {
				audio,
				base_path: base_path.to_string(),
			},
			on_ended: None,
		})
	}

	pub fn deck(&self) -> Deck {
		self.deck.clone()
	}

	/// Called when a non-looping track finishes.
	pub fn set_on_ended(&mut self, f: impl FnMut() + 'static) {
		self.clear_on_ended();
		let closure = Closure::<dyn FnMut()>::new(f);
		if let Err(e) = self
			.deck
			.audio
			.add_event_listener_with_callback("ended", closure.as_ref().unchecked_ref())
		{
			warn!("elemental-canvas: cannot watch track end: {}", describe(&e));
		}
		self.on_ended = Some(closure);
	}

	fn clear_on_ended(&mut self) {
		if let Some(closure) = self.on_ended.take() {
			let _ = self
				.deck
				.audio
				.remove_event_listener_with_callback("ended", closure.as_ref().unchecked_ref());
		}
	}
}

impl Drop for AmbientPlayer {
	fn drop(&mut self) {
		self.deck.stop();
		self.clear_on_ended();
	}
}

#[cfg(test)]
pub(crate) mod tests {
	use super::*;
	use pretty_assertions::assert_eq;
	use rand::SeedableRng;

	/// Records every cue instead of playing it.
	#[derive(Debug, Default)]
	pub(crate) struct RecordingCue {
		pub cues: Vec<(EffectKind, f64)>,
	}

	impl SoundCue for RecordingCue {
		fn cue(&mut self, kind: EffectKind, intensity: f64) {
			self.cues.push((kind, intensity));
		}
	}

	fn recipe(kind: EffectKind, intensity: f64) -> ToneRecipe {
		ToneRecipe::for_effect(kind, intensity, &mut StdRng::seed_from_u64(9))
	}

	#[test]
	fn none_is_silent_and_some_forwards() {
		let mut silent: Option<RecordingCue> = None;
		silent.cue(EffectKind::Fire, 1.0);

		let mut some = Some(RecordingCue::default());
		some.cue(EffectKind::Ice, 0.5);
		assert_eq!(some.unwrap().cues, vec![(EffectKind::Ice, 0.5)]);
	}

	#[test]
	fn fire_is_a_filtered_falling_sawtooth() {
		let fire = recipe(EffectKind::Fire, 1.0);
		assert_eq!(fire.voices.len(), 1);
		let voice = fire.voices[0];
		assert_eq!(voice.waveform, Waveform::Sawtooth);
		assert!((80.0..120.0).contains(&voice.frequency));
		let sweep = voice.sweep.unwrap();
		assert_eq!(sweep.shape, Ramp::Exponential);
		assert!((40.0..60.0).contains(&sweep.to));
		assert!((fire.length - 0.2).abs() < 1e-12);
		assert!((fire.peak - 0.1).abs() < 1e-12);
		let filter = fire.filter.unwrap();
		assert_eq!((filter.kind, filter.q), (FilterKind::Lowpass, Some(2.0)));
	}

	#[test]
	fn god_is_a_three_voice_chord() {
		let god = recipe(EffectKind::God, 0.5);
		let base = god.voices[0].frequency;
		assert_eq!(god.voices.len(), 3);
		for (voice, ratio) in god.voices.iter().zip([1.0, 1.5, 2.0]) {
			assert!((voice.frequency - base * ratio).abs() < 1e-9);
		}
		assert!((god.length - 0.45).abs() < 1e-12);
	}

	#[test]
	fn lightning_cuts_off_linearly() {
		let zap = recipe(EffectKind::Lightning, 1.0);
		assert_eq!(zap.release, Ramp::Linear);
		assert!((zap.length - 0.06).abs() < 1e-12);
		assert_eq!(zap.filter.unwrap().kind, FilterKind::Highpass);
	}

	#[test]
	fn peaks_scale_with_intensity() {
		for kind in EffectKind::ALL {
			let quiet = recipe(kind, 0.25);
			let loud = recipe(kind, 1.0);
			assert!((loud.peak - quiet.peak * 4.0).abs() < 1e-12, "{:?}", kind);
			assert!(loud.attack < loud.length, "{:?}", kind);
		}
	}
}
