//! Server-sent stream of page lifecycle events.
//!
//! Open to unauthenticated listeners: browsers' `EventSource` cannot attach
//! an `Authorization` header. Payloads are reduced to page ids, slugs and
//! counts; the acting user is dropped before an event leaves the process.

use std::convert::Infallible;
use std::time::Duration;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::{self, Stream, StreamExt};
use page_builder_core::events::PageEvent;
use serde_json::Value;
use tokio::sync::broadcast::error::RecvError;

use crate::state::AppState;

fn public_payload(event: &PageEvent) -> serde_json::Result<Value> {
    let mut payload = serde_json::to_value(event)?;
    if let Some(fields) = payload.as_object_mut() {
        fields.remove("actor");
    }
    Ok(payload)
}

fn to_sse(event: &PageEvent) -> Option<Event> {
    let encoded = match public_payload(event) {
        Ok(payload) => Event::default().event(event.name()).json_data(payload),
        Err(err) => Err(axum::Error::new(err)),
    };
    match encoded {
        Ok(sse) => Some(sse),
        Err(err) => {
            tracing::warn!(error = %err, event = event.name(), "Failed to encode page event");
            None
        }
    }
}

pub async fn stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let receiver = state.event_bus().subscribe();
    tracing::debug!(
        subscribers = state.event_bus().subscriber_count(),
        "Event listener connected"
    );

    let welcome = stream::iter(to_sse(&PageEvent::Welcome).map(Ok::<_, Infallible>));
    let updates = stream::unfold(receiver, |mut receiver| async move {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if let Some(sse) = to_sse(&event) {
                        return Some((Ok::<_, Infallible>(sse), receiver));
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Event listener lagged");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(welcome.chain(updates))
        .keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}
