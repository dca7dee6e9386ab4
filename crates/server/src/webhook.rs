use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use invoicey_backend::stores::{CatalogStore, InvoiceStore};
use invoicey_chat::{ChatEngine, ChatReply};
use invoicey_core::domain::tenant::TenantId;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

#[derive(Clone, Debug, Deserialize)]
pub struct MessageRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub tenant: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MessageError {
    pub error: String,
}

pub fn router<B>(engine: Arc<ChatEngine<B>>) -> Router
where
    B: CatalogStore + InvoiceStore + 'static,
{
    Router::new().route("/message", post(handle_message::<B>)).with_state(engine)
}

pub async fn handle_message<B>(
    State(engine): State<Arc<ChatEngine<B>>>,
    Json(request): Json<MessageRequest>,
) -> Result<Json<ChatReply>, (StatusCode, Json<MessageError>)>
where
    B: CatalogStore + InvoiceStore + 'static,
{
    if request.text.trim().is_empty() {
        return Err(bad_request("text is required"));
    }
    let tenant = request.tenant.trim();
    if tenant.is_empty() {
        return Err(bad_request("tenant is required"));
    }
    let tenant = TenantId::new(tenant);

    let correlation_id = Uuid::new_v4().to_string();
    info!(
        event_name = "system.webhook.message_received",
        correlation_id = %correlation_id,
        tenant = %tenant,
        "inbound chat message accepted"
    );

    // The engine classifies against the raw text; the newline check that
    // routes freeform invoice details must see it untrimmed.
    let reply = engine.handle_message(&request.text, &tenant).await;

    info!(
        event_name = "system.webhook.message_replied",
        correlation_id = %correlation_id,
        tenant = %tenant,
        "chat reply rendered"
    );
    Ok(Json(reply))
}

fn bad_request(message: &str) -> (StatusCode, Json<MessageError>) {
    (StatusCode::BAD_REQUEST, Json(MessageError { error: message.to_string() }))
}
