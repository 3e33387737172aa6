//! Derived, display-only properties of a frame
//!
//! Everything here is recomputed from the current frame on every read.

use super::{Frame, MAX_BUTTONS};
use reqwest::Url;
use serde::Serialize;

const FALLBACK_IMAGE_ALT: &str = "Farcaster frame";

/// Display bindings derived from the current frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameView {
    pub has_intents: bool,
    pub button_count: usize,
    /// Grid column count, `None` outside 1..=4
    pub columns: Option<usize>,
    pub image_alt: String,
    /// CSS form of the aspect ratio ("1.91/1")
    pub image_aspect_ratio: String,
    /// Host of the context URL the frame came from
    pub source_host: Option<String>,
}

impl FrameView {
    pub fn derive(frame: &Frame, context_url: &str) -> Self {
        Self {
            has_intents: frame.has_intents(),
            button_count: frame.button_count(),
            columns: column_count(frame.button_count()),
            image_alt: image_alt(frame),
            image_aspect_ratio: css_aspect_ratio(&frame.image_aspect_ratio),
            source_host: url_host(context_url),
        }
    }
}

/// Layout columns for a button row. Out-of-range counts get no layout.
pub fn column_count(buttons: usize) -> Option<usize> {
    (1..=MAX_BUTTONS).contains(&buttons).then_some(buttons)
}

pub fn image_alt(frame: &Frame) -> String {
    frame
        .title
        .clone()
        .unwrap_or_else(|| FALLBACK_IMAGE_ALT.to_string())
}

/// "W:H" -> "W/H"
pub fn css_aspect_ratio(ratio: &str) -> String {
    ratio.replacen(':', "/", 1)
}

/// Host with port, as a browser's `URL.host` reports it
pub fn url_host(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    Some(match parsed.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}
