//! Server-Sent Events support

use crate::runtime::CardEvent;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use serde_json::json;
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

/// Convert broadcast stream to SSE stream
pub fn sse_stream(
    init_event: CardEvent,
    broadcast_rx: tokio::sync::broadcast::Receiver<CardEvent>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    // Create stream that starts with init event then broadcasts
    let init = futures::stream::once(async move { Ok(card_event_to_axum(init_event)) });

    let broadcasts = BroadcastStream::new(broadcast_rx).filter_map(|result| match result {
        Ok(event) => Some(Ok(card_event_to_axum(event))),
        Err(_) => None, // Skip lagged messages
    });

    let combined = init.chain(broadcasts);

    Sse::new(combined).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}

fn card_event_to_axum(event: CardEvent) -> Event {
    let (event_type, data) = card_event_payload(event);
    Event::default().event(event_type).data(data.to_string())
}

fn card_event_payload(event: CardEvent) -> (&'static str, serde_json::Value) {
    match event {
        CardEvent::Init { view } => (
            "init",
            json!({
                "type": "init",
                "view": view
            }),
        ),
        CardEvent::View { view } => (
            "view",
            json!({
                "type": "view",
                "view": view
            }),
        ),
        CardEvent::OpenUrl { url } => (
            "open_url",
            json!({
                "type": "open_url",
                "url": url
            }),
        ),
        CardEvent::Error { message } => (
            "error",
            json!({
                "type": "error",
                "message": message
            }),
        ),
    }
}
