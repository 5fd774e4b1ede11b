//! Ambient track discovery and navigation.

use log::{info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

use crate::error::{CanvasError, describe};

const AUDIO_EXTENSIONS: [&str; 5] = [".mp3", ".wav", ".ogg", ".m4a", ".flac"];

/// Names tried when no listing endpoint is available.
const PROBE_NAMES: [&str; 20] = [
	"ambient-1",
	"ambient-2",
	"ambient-3",
	"ambient",
	"background",
	"forest-ambient",
	"space-atmosphere",
	"underwater-calm",
	"mystical-drone",
	"track1",
	"track2",
	"track3",
	"music1",
	"music2",
	"music3",
	"calm",
	"peaceful",
	"meditative",
	"atmospheric",
	"drone",
];

const PROBE_EXTENSIONS: [&str; 4] = [".mp3", ".wav", ".ogg", ".m4a"];

/// Keeps audio files only, without duplicates, in lexicographic order.
pub fn normalize_listing<I, S>(names: I) -> Vec<String>
where
	I: IntoIterator<Item = S>,
	S: Into<String>,
{
	let mut tracks: Vec<String> = names
		.into_iter()
		.map(Into::into)
		.filter(|name| {
			let lower = name.to_lowercase();
			AUDIO_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
		})
		.collect();
	tracks.sort();
	tracks.dedup();
	tracks
}

/// Human-readable track title: extension dropped, separators turned into spaces.
pub fn display_name(track: &str) -> String {
	let lower = track.to_lowercase();
	let stem = [".mp3", ".wav", ".ogg"]
		.iter()
		.find(|ext| lower.ends_with(*ext))
		.and_then(|ext| track.get(..track.len() - ext.len()))
		.unwrap_or(track);
	stem.replace(['-', '_'], " ")
}

/// The known tracks and which one is selected.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Playlist {
	tracks: Vec<String>,
	index: usize,
}

impl Playlist {
	pub fn new(tracks: Vec<String>) -> Self {
		Self { tracks, index: 0 }
	}

	pub fn is_empty(&self) -> bool {
		self.tracks.is_empty()
	}

	pub fn current(&self) -> Option<&str> {
		self.tracks.get(self.index).map(String::as_str)
	}

	/// Selects the next track, wrapping to the first.
	pub fn advance(&mut self) -> Option<&str> {
		if !self.tracks.is_empty() {
			self.index = (self.index + 1) % self.tracks.len();
		}
		self.current()
	}

	/// Selects the previous track, wrapping to the last.
	pub fn retreat(&mut self) -> Option<&str> {
		if !self.tracks.is_empty() {
			self.index = self
				.index
				.checked_sub(1)
				.unwrap_or(self.tracks.len() - 1);
		}
		self.current()
	}
}

/// Discovers the available ambient tracks.
///
/// Asks the listing endpoint first and falls back to probing well-known file
/// names under `base_path`. Never fails; an empty list means no music.
pub async fn fetch_track_list(listing_url: &str, base_path: &str) -> Vec<String> {
	let names = match fetch_listing(listing_url).await {
		Ok(names) => names,
		Err(e) => {
			warn!("elemental-canvas: {}, probing common names", e);
			probe_common_names(base_path).await
		}
	};
	let tracks = normalize_listing(names);
	info!("elemental-canvas: found {} ambient tracks", tracks.len());
	tracks
}

async fn fetch_listing(url: &str) -> Result<Vec<String>, CanvasError> {
	let response = send(url, "GET").await?;
	if !response.ok() {
		return Err(CanvasError::Listing(format!("HTTP {}", response.status())));
	}
	let text = response
		.text()
		.map_err(|e| CanvasError::Listing(describe(&e)))?;
	let text = JsFuture::from(text)
		.await
		.map_err(|e| CanvasError::Listing(describe(&e)))?
		.as_string()
		.unwrap_or_default();
	serde_json::from_str(&text).map_err(|e| CanvasError::Listing(e.to_string()))
}

async fn probe_common_names(base_path: &str) -> Vec<String> {
	let mut found = Vec::new();
	for name in PROBE_NAMES {
		for ext in PROBE_EXTENSIONS {
			let file = format!("{}{}", name, ext);
			let exists = send(&format!("{}{}", base_path, file), "HEAD")
				.await
				.is_ok_and(|r| r.ok());
			if exists {
				found.push(file);
				break;
			}
		}
	}
	found
}

async fn send(url: &str, method: &str) -> Result<Response, CanvasError> {
	let failed = |e: wasm_bindgen::JsValue| CanvasError::Listing(describe(&e));
	let window = web_sys::window().ok_or(CanvasError::MissingElement("window"))?;

	let init = RequestInit::new();
	init.set_method(method);
	let request = Request::new_with_str_and_init(url, &init).map_err(failed)?;

	let response = JsFuture::from(window.fetch_with_request(&request))
		.await
		.map_err(failed)?;
	response.dyn_into::<Response>().map_err(failed)
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	fn playlist(names: &[&str]) -> Playlist {
		Playlist::new(names.iter().map(|s| s.to_string()).collect())
	}

	#[test]
	fn listing_keeps_sorted_unique_audio() {
		let tracks = normalize_listing([
			"rain.ogg",
			"notes.txt",
			"Drone.FLAC",
			"rain.ogg",
			"calm.mp3",
			"cover.jpg",
			"loop.M4A",
			"deep.wav",
		]);
		assert_eq!(
			tracks,
			vec!["Drone.FLAC", "calm.mp3", "deep.wav", "loop.M4A", "rain.ogg"]
		);
	}

	#[test]
	fn empty_listing_stays_empty() {
		assert!(normalize_listing(Vec::<String>::new()).is_empty());
		assert!(normalize_listing(["readme.md"]).is_empty());
	}

	#[test]
	fn display_names() {
		assert_eq!(display_name("forest-ambient.mp3"), "forest ambient");
		assert_eq!(display_name("deep_space_drone.OGG"), "deep space drone");
		assert_eq!(display_name("rain.wav"), "rain");
		// Only the three common extensions are stripped.
		assert_eq!(display_name("calm_loop.m4a"), "calm loop.m4a");
	}

	#[test]
	fn navigation_wraps_both_ways() {
		let mut p = playlist(&["a.mp3", "b.mp3", "c.mp3"]);
		assert_eq!(p.current(), Some("a.mp3"));
		assert_eq!(p.retreat(), Some("c.mp3"));
		assert_eq!(p.advance(), Some("a.mp3"));
		assert_eq!(p.advance(), Some("b.mp3"));
		assert_eq!(p.advance(), Some("c.mp3"));
		assert_eq!(p.advance(), Some("a.mp3"));
		assert_eq!(p.tracks.len(), 3);
	}

	#[test]
	fn empty_playlist_has_no_current() {
		let mut p = Playlist::default();
		assert!(p.is_empty());
		assert_eq!(p.current(), None);
		assert_eq!(p.advance(), None);
		assert_eq!(p.retreat(), None);
	}

	#[test]
	fn single_track_wraps_onto_itself() {
		let mut p = playlist(&["only.wav"]);
		assert_eq!(p.advance(), Some("only.wav"));
		assert_eq!(p.retreat(), Some("only.wav"));
	}
}
