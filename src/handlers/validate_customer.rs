//! Customer ID validation endpoint.
//!
//! The dialogue's opening turn: the platform collects a customer ID and
//! asks this webhook whether it exists before routing the conversation any
//! further.

use axum::{Json, extract::State};

use crate::{
    dialogflow::{VALIDATED_GREETING, WebhookRequest, WebhookResponse},
    error::AppError,
    services::customer_service,
    state::AppState,
};

/// Validate the customer ID carried in the session parameters.
///
/// # Endpoint
///
/// `POST /webhooks/validate-customer`
///
/// # Response
///
/// Always 200 with a fulfillment envelope: a greeting when the ID is
/// known, the fixed apology otherwise. The dialogue decides what to do
/// next based on the message.
pub async fn validate_customer(
    State(state): State<AppState>,
    Json(request): Json<WebhookRequest>,
) -> Result<Json<WebhookResponse>, AppError> {
    let customer_id = request.customer_id()?;

    if !customer_service::exists(&state.pool, customer_id).await? {
        tracing::info!(customer_id, "unknown customer id");
        return Ok(Json(WebhookResponse::invalid_customer()));
    }

    tracing::info!(customer_id, "customer id validated");
    Ok(Json(WebhookResponse::with_text(VALIDATED_GREETING)))
}
