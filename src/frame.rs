//! Frame documents
//!
//! The server-described card: image, optional input, up to four buttons.

mod types;
pub mod view;

#[allow(unused_imports)] // Public API re-exports
pub use types::{Button, ButtonKind, Frame, FrameInput, DEFAULT_ASPECT_RATIO, MAX_BUTTONS};
