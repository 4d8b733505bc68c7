/**
 * WebSocket Endpoint
 *
 * `GET /?token=<jwt>[&userId=<id>]` upgrades to a WebSocket and registers
 * the connection under the token's subject.
 *
 * # Handshake
 *
 * The identity comes from the signed token, never from the query alone.
 * When `userId` is also given it must equal the token subject. Any failure
 * answers 401 before the upgrade and nothing is registered.
 *
 * # Protocol
 *
 * - Server → client: WebSocket pings from the heartbeat, and JSON text
 *   frames `{"type":"message","message":{...}}` for messages addressed to
 *   the user
 * - Client → server: pongs; any other frame also counts as a sign of life
 *   and is only logged
 */

use axum::{
    body::Bytes,
    extract::{
        ws::{Message as WsMessage, WebSocket, WebSocketUpgrade},
        Path, Query, State,
    },
    response::Response,
    Json,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;

use super::registry::{ConnectionRegistry, Outbound};
use crate::backend::auth::sessions::verify_token;
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;
use crate::shared::messaging::PresenceResponse;

/// Query string of the WebSocket handshake
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectParams {
    pub token: Option<String>,
    pub user_id: Option<String>,
}

/// Resolve the user a handshake is allowed to register as
pub fn authorize_connection(params: &ConnectParams, secret: &str) -> Result<String, BackendError> {
    let token = params
        .token
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| BackendError::unauthorized("Missing token"))?;

    let claims = verify_token(secret, token).map_err(|e| {
        tracing::warn!("Rejected WebSocket token: {:?}", e);
        BackendError::unauthorized("Invalid token")
    })?;

    match params.user_id.as_deref() {
        Some(claimed) if claimed != claims.sub => {
            tracing::warn!(
                "WebSocket userId {} does not match token subject {}",
                claimed,
                claims.sub
            );
            Err(BackendError::unauthorized("Token does not match userId"))
        }
        _ => Ok(claims.sub),
    }
}

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<ConnectParams>,
    State(state): State<AppState>,
) -> Result<Response, BackendError> {
    let user_id = authorize_connection(&params, &state.config.jwt_secret)?;
    let registry = state.connections.clone();
    Ok(ws.on_upgrade(move |socket| run_connection(socket, user_id, registry)))
}

/// Drive one connection until it closes, is superseded or is evicted
async fn run_connection(socket: WebSocket, user_id: String, registry: ConnectionRegistry) {
    let (handle, mut outbound) = registry.register(&user_id);
    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            instruction = outbound.recv() => {
                let frame = match instruction {
                    Some(Outbound::Ping) => WsMessage::Ping(Bytes::new()),
                    Some(Outbound::Event(event)) => match serde_json::to_string(&event) {
                        Ok(text) => WsMessage::Text(text.into()),
                        Err(e) => {
                            tracing::error!("Failed to serialize live event: {}", e);
                            continue;
                        }
                    },
                    Some(Outbound::Close) | None => {
                        let _ = sink.send(WsMessage::Close(None)).await;
                        break;
                    }
                };
                if sink.send(frame).await.is_err() {
                    break;
                }
            }
            inbound = stream.next() => match inbound {
                Some(Ok(WsMessage::Close(_))) | None => break,
                Some(Err(e)) => {
                    tracing::debug!("WebSocket error for {}: {}", user_id, e);
                    break;
                }
                Some(Ok(WsMessage::Text(text))) => {
                    registry.acknowledge(&handle);
                    tracing::debug!("Received from {}: {}", user_id, text.as_str());
                }
                Some(Ok(_)) => registry.acknowledge(&handle),
            },
        }
    }

    registry.unregister(&handle);
}

/// `GET /api/presence/{userId}`
pub async fn get_presence(
    State(registry): State<ConnectionRegistry>,
    Path(user_id): Path<String>,
) -> Json<PresenceResponse> {
    let online = registry.is_online(&user_id);
    Json(PresenceResponse { user_id, online })
}
