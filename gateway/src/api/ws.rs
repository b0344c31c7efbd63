use axum::{
    extract::{ws::Message, ws::WebSocket, ws::WebSocketUpgrade, State as AxumState},
    http::{header::ORIGIN, HeaderMap, StatusCode},
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tokio::time::{timeout, Duration};

use casedrop_types::events::OutboundEvent;

use crate::Gateway;

fn ws_send_timeout() -> Duration {
    let raw = std::env::var("WS_SEND_TIMEOUT_MS").ok();
    let parsed = raw
        .as_deref()
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|value| *value > 0);
    Duration::from_millis(parsed.unwrap_or(2_000))
}

/// Validates the WebSocket Origin header against allowed origins.
///
/// Default behavior (neither env var set): Allow all connections.
/// With `ALLOWED_WS_ORIGINS` set: Only those origins are allowed.
/// With `ALLOW_WS_NO_ORIGIN=0/false`: Require an Origin header.
fn validate_origin(headers: &HeaderMap) -> bool {
    let allowed = std::env::var("ALLOWED_WS_ORIGINS").ok();
    let deny_no_origin = matches!(
        std::env::var("ALLOW_WS_NO_ORIGIN").as_deref(),
        Ok("0") | Ok("false") | Ok("FALSE") | Ok("no") | Ok("NO")
    );

    let origin = match headers.get(ORIGIN) {
        Some(o) => match o.to_str() {
            Ok(s) => s,
            Err(_) => {
                tracing::warn!("Invalid Origin header encoding");
                return false;
            }
        },
        None => {
            if deny_no_origin {
                tracing::warn!(
                    "WebSocket connection rejected: no Origin header and ALLOW_WS_NO_ORIGIN=false"
                );
                return false;
            }
            return true;
        }
    };

    let Some(allowed) = allowed else {
        return true;
    };

    let allowed_list: Vec<&str> = allowed
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if allowed_list.is_empty() || allowed_list.contains(&"*") || allowed_list.contains(&origin) {
        return true;
    }

    tracing::warn!("WebSocket origin rejected: {} (allowed: {})", origin, allowed);
    false
}

/// `GET /feed`: every case opening across the service.
pub(super) async fn feed_ws(
    AxumState(gateway): AxumState<Arc<Gateway>>,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    if !validate_origin(&headers) {
        return (StatusCode::FORBIDDEN, "Origin not allowed").into_response();
    }
    let events = gateway.broadcaster().subscribe_global();
    ws.on_upgrade(move |socket| stream_events(socket, gateway, events, "feed"))
        .into_response()
}

/// `GET /updates/:user_id`: the balance/progress stream for one user.
pub(super) async fn user_updates_ws(
    AxumState(gateway): AxumState<Arc<Gateway>>,
    axum::extract::Path(user_id): axum::extract::Path<String>,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    if !validate_origin(&headers) {
        return (StatusCode::FORBIDDEN, "Origin not allowed").into_response();
    }
    let events = gateway.broadcaster().subscribe_user(&user_id);
    ws.on_upgrade(move |socket| stream_events(socket, gateway, events, "updates"))
        .into_response()
}

/// Pumps broadcast events to one socket until either side goes away.
///
/// Writes go through a bounded queue drained by a dedicated writer task, so a
/// stalled client never blocks the select loop. A lagged subscriber skips the
/// missed events and keeps going.
async fn stream_events(
    socket: WebSocket,
    gateway: Arc<Gateway>,
    mut events: broadcast::Receiver<OutboundEvent>,
    stream: &'static str,
) {
    tracing::info!(stream = stream, "WebSocket connected");
    let (mut sender, mut receiver) = socket.split();

    let (out_tx, mut out_rx) = mpsc::channel::<Message>(gateway.config.ws_outbound_capacity);
    let writer_handle = tokio::spawn(async move {
        while let Some(msg) = out_rx.recv().await {
            match timeout(ws_send_timeout(), sender.send(msg)).await {
                Ok(Ok(())) => {}
                Ok(Err(_)) => {
                    tracing::warn!("Failed to send event, client disconnected");
                    break;
                }
                Err(_) => {
                    tracing::warn!("WebSocket send timed out, closing connection");
                    break;
                }
            }
        }
        let _ = sender.close().await;
    });

    loop {
        tokio::select! {
            // Handle incoming WebSocket messages (ping/pong/close)
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Close(_))) => {
                        tracing::info!(stream = stream, "Client closed WebSocket connection");
                        break;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if out_tx.try_send(Message::Pong(data)).is_err() {
                            tracing::warn!("Failed to enqueue pong, closing connection");
                            break;
                        }
                    }
                    Some(Err(e)) => {
                        tracing::warn!("WebSocket error: {:?}", e);
                        break;
                    }
                    None => {
                        break;
                    }
                    _ => {} // Ignore other message types
                }
            }
            event = events.recv() => {
                match event {
                    Ok(event) => {
                        let text = match serde_json::to_string(&event) {
                            Ok(text) => text,
                            Err(e) => {
                                tracing::error!("Failed to serialize event: {:?}", e);
                                continue;
                            }
                        };
                        if out_tx.try_send(Message::Text(text)).is_err() {
                            gateway.http_metrics().inc_dropped_events();
                            tracing::warn!("Writer queue full, closing connection");
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(
                            stream = stream,
                            skipped = skipped,
                            "WebSocket client lagged behind"
                        );
                        // Keep receiving; the client may catch up.
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        break;
                    }
                }
            }
        }
    }
    tracing::info!(stream = stream, "WebSocket handler exiting");
    drop(out_tx);
    let _ = writer_handle.await;
}
