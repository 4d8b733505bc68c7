//! Messaging HTTP Handlers
//!
//! Routes under `/api/messages`. Request bodies are camelCase JSON; a body
//! that fails to parse is a 400 with the parser's message.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

use super::MessagingService;
use crate::backend::error::ApiResult;
use crate::backend::server::state::AppState;
use crate::shared::messaging::{
    LiveEvent, MarkReadRequest, MarkReadResponse, Message, MessageThread, SendMessageRequest,
    ThreadMessageRequest, ThreadRequest,
};

/// Push a new message to its receiver if they hold a live connection
fn push_to_receiver(state: &AppState, message: &Message) {
    let delivered = state.connections.notify(
        message.receiver_id(),
        LiveEvent::Message {
            message: message.clone(),
        },
    );
    tracing::debug!(
        "Live push of {} to {}: {}",
        message.id,
        message.receiver_id(),
        if delivered { "sent" } else { "offline" }
    );
}

/// `GET /api/messages/threads/{userId}`
pub async fn list_threads(
    State(messaging): State<MessagingService>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<Vec<MessageThread>>> {
    let threads = messaging.list_threads(&user_id).await?;
    Ok(Json(threads))
}

/// `POST /api/messages/thread`
pub async fn open_thread(
    State(messaging): State<MessagingService>,
    body: Result<Json<ThreadRequest>, JsonRejection>,
) -> ApiResult<Json<MessageThread>> {
    let Json(request) = body?;
    let thread = messaging
        .open_thread(&request.sender_id, &request.receiver_id)
        .await?;
    Ok(Json(thread))
}

/// `POST /api/messages/thread/{threadId}/messages`
pub async fn send_in_thread(
    State(state): State<AppState>,
    Path(thread_id): Path<String>,
    body: Result<Json<ThreadMessageRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Message>)> {
    let Json(request) = body?;
    let message = state
        .messaging
        .send_in_thread(&thread_id, &request.sender_id, &request.content)
        .await?;
    push_to_receiver(&state, &message);
    Ok((StatusCode::CREATED, Json(message)))
}

/// `PATCH /api/messages/thread/{threadId}/read`
pub async fn mark_read(
    State(messaging): State<MessagingService>,
    Path(thread_id): Path<String>,
    body: Result<Json<MarkReadRequest>, JsonRejection>,
) -> ApiResult<Json<MarkReadResponse>> {
    let Json(request) = body?;
    let updated = messaging.mark_read(&thread_id, &request.user_id).await?;
    Ok(Json(MarkReadResponse { thread_id, updated }))
}

/// `GET /api/messages/conversation/{userId1}/{userId2}`
pub async fn get_conversation(
    State(messaging): State<MessagingService>,
    Path((first, second)): Path<(String, String)>,
) -> ApiResult<Json<Vec<Message>>> {
    let messages = messaging.get_conversation(&first, &second).await?;
    Ok(Json(messages))
}

/// `POST /api/messages`
pub async fn send_message(
    State(state): State<AppState>,
    body: Result<Json<SendMessageRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Message>)> {
    let Json(request) = body?;
    let message = state
        .messaging
        .send_message(
            &request.sender_id,
            request.sender_role,
            &request.receiver_id,
            &request.content,
        )
        .await?;
    push_to_receiver(&state, &message);
    Ok((StatusCode::CREATED, Json(message)))
}

/// `GET /api/messages/recent/{userId}`
pub async fn recent_messages(
    State(messaging): State<MessagingService>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<Vec<Message>>> {
    let messages = messaging.recent_messages(&user_id).await?;
    Ok(Json(messages))
}
