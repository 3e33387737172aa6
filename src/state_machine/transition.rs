//! Pure state transition function
//!
//! Button dispatch, history commits, and the outbound link guard.

use super::state::ActionFailure;
use super::{CardContext, CardState, Effect, Event, HistoryEntry, RequestKind};
use crate::client::{FrameActionBody, FrameActionResponse, RedirectResponse};
use crate::frame::{Button, ButtonKind};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: CardState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: CardState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    /// Keep the state as it is, no effects
    fn unchanged(state: &CardState) -> Self {
        Self::new(state.clone())
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Frame has no button {0}")]
    UnknownButton(u8),
    #[error("Button {0} already has a request in flight")]
    RequestInFlight(u8),
    #[error("No {0} history")]
    NoHistory(&'static str),
    #[error("Button {0} has no open link prompt")]
    PromptNotOpen(u8),
    #[error("Frame has no input field")]
    InputUnavailable,
}

/// Pure transition function
///
/// Given the same inputs it always produces the same outputs, with no I/O.
pub fn transition(
    state: &CardState,
    _context: &CardContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match event {
        // ============================================================
        // Button dispatch
        // ============================================================
        Event::ButtonPressed { index } => press_button(state, index),

        Event::InputChanged { text } => {
            if state.session.current_frame().input.is_none() {
                return Err(TransitionError::InputUnavailable);
            }
            let mut next = state.clone();
            next.session.set_input_text(text);
            Ok(settle(state, next))
        }

        // ============================================================
        // Request outcomes
        // ============================================================
        Event::ActionResolved {
            body, response, ..
        } => Ok(commit_action(state, body, response)),

        Event::RedirectResolved {
            button_index,
            generation,
            response,
        } => {
            // Button unmounted while the request was in flight
            if generation != state.generation || state.prompts.get(button_index).is_none() {
                return Ok(TransitionResult::unchanged(state));
            }
            Ok(resolve_redirect(state, button_index, response))
        }

        Event::RequestFailed {
            button_index,
            generation,
            request,
            failure,
        } => {
            let current = generation == state.generation;
            if !current && request == RequestKind::Redirect {
                return Ok(TransitionResult::unchanged(state));
            }
            let mut next = state.clone();
            if current {
                next.in_flight.remove(&button_index);
            }
            let message = failure.message.clone();
            next.last_error = Some(failure);
            Ok(settle(state, next).with_effect(Effect::NotifyError { message }))
        }

        Event::DismissError => {
            let mut next = state.clone();
            next.last_error = None;
            Ok(settle(state, next))
        }

        // ============================================================
        // History navigation
        // ============================================================
        Event::NavigateBack => {
            let mut next = state.clone();
            if !next.session.back() {
                return Err(TransitionError::NoHistory("back"));
            }
            next.remount();
            next.last_error = None;
            Ok(settle(state, next))
        }

        Event::NavigateForward => {
            let mut next = state.clone();
            if !next.session.forward() {
                return Err(TransitionError::NoHistory("forward"));
            }
            next.remount();
            next.last_error = None;
            Ok(settle(state, next))
        }

        // ============================================================
        // Outbound link guard
        // ============================================================
        Event::PromptContinue { index } => {
            let prompt = state
                .prompts
                .get(index)
                .filter(|p| p.open)
                .ok_or(TransitionError::PromptNotOpen(index))?;
            let url = prompt.url.clone();

            let mut next = state.clone();
            next.prompts.close(index);
            Ok(settle(state, next).with_effects(url.map(|url| Effect::OpenUrl { url })))
        }

        Event::PromptDismiss { index, .. } => {
            let mut next = state.clone();
            next.prompts.close(index);
            Ok(settle(state, next))
        }
    }
}

/// Wrap `next`, announcing it only if something changed
fn settle(previous: &CardState, next: CardState) -> TransitionResult {
    let changed = next != *previous;
    let result = TransitionResult::new(next);
    if changed {
        result.with_effect(Effect::NotifyView)
    } else {
        result
    }
}

fn press_button(state: &CardState, index: u8) -> Result<TransitionResult, TransitionError> {
    let frame = state.session.current_frame();
    let button = frame
        .button(index)
        .ok_or(TransitionError::UnknownButton(index))?;

    match button.kind {
        // Renders the mint affordance only
        ButtonKind::Mint => Ok(TransitionResult::unchanged(state)),

        ButtonKind::Link => {
            let mut next = state.clone();
            next.prompts.open(index, button.initial_link_url());
            Ok(settle(state, next))
        }

        ButtonKind::PostRedirect => {
            if state.prompts.is_open(index) {
                return Ok(TransitionResult::unchanged(state));
            }
            if state.in_flight.contains(&index) {
                return Err(TransitionError::RequestInFlight(index));
            }
            let body = action_body(state, button);
            let mut next = state.clone();
            next.in_flight.insert(index);
            next.last_error = None;
            Ok(settle(state, next).with_effect(Effect::post_redirect(
                index,
                state.generation,
                body,
            )))
        }

        ButtonKind::Post => {
            if state.in_flight.contains(&index) {
                return Err(TransitionError::RequestInFlight(index));
            }
            let body = action_body(state, button);
            let mut next = state.clone();
            next.in_flight.insert(index);
            next.last_error = None;
            Ok(settle(state, next).with_effect(Effect::post_action(
                index,
                state.generation,
                body,
            )))
        }
    }
}

/// Input text is read now, at dispatch; the state token is copied verbatim.
fn action_body(state: &CardState, button: &Button) -> FrameActionBody {
    let frame = state.session.current_frame();
    FrameActionBody {
        button_index: button.index,
        input_text: state.session.input_text().to_string(),
        post_url: frame.resolve_post_url(button),
        state: frame.state.clone(),
    }
}

/// Commits at the live cursor, even if the dispatching button has since unmounted.
fn commit_action(
    state: &CardState,
    body: FrameActionBody,
    response: FrameActionResponse,
) -> TransitionResult {
    let FrameActionResponse {
        state: frame_state,
        frame,
    } = response;

    let mut next = state.clone();
    next.session.commit(HistoryEntry {
        body,
        url: frame_state.context.url,
        frame,
    });
    next.remount();
    next.last_error = None;
    settle(state, next)
}

fn resolve_redirect(
    state: &CardState,
    button_index: u8,
    response: RedirectResponse,
) -> TransitionResult {
    let mut next = state.clone();
    next.in_flight.remove(&button_index);

    let failure = match (response.is_found(), response.location) {
        (true, Some(location)) => {
            next.prompts.open(button_index, Some(location));
            next.last_error = None;
            return settle(state, next);
        }
        (true, None) => ActionFailure::malformed(
            button_index,
            "Redirect response is missing a location",
        ),
        (false, _) => ActionFailure::unexpected_status(button_index, response.status),
    };

    let message = failure.message.clone();
    next.last_error = Some(failure);
    settle(state, next).with_effect(Effect::NotifyError { message })
}
