//! Frame card state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions.

mod effect;
pub mod event;
pub mod history;
pub mod state;
pub(crate) mod transition;


pub use effect::Effect;
pub use event::{DismissReason, Event, RequestKind};
pub use history::HistoryEntry;
#[allow(unused_imports)] // Public API re-exports
pub use state::{ActionFailure, CardContext, CardState, CardView, FailureKind};
pub use transition::{transition, TransitionError};
