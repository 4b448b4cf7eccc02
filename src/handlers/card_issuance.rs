//! Credit card issuance endpoint.

use axum::{Json, extract::State};

use crate::{
    dialogflow::{WebhookRequest, WebhookResponse},
    error::AppError,
    genai::prompts,
    services::{card_service, customer_service},
    state::AppState,
};

/// Record the customer's acceptance of the recommended credit card.
///
/// # Endpoint
///
/// `POST /webhooks/card-issuance`
///
/// # Session Parameters
///
/// - `cust_id`: the validated customer ID
/// - `credit_card`: the card name chosen on the previous turn
///
/// # Process
///
/// 1. Short-circuit with the apology envelope for an unknown customer ID
/// 2. Upsert the card row (fresh random number, fixed expiry)
/// 3. Ask the model for a short confirmation message
pub async fn card_issuance(
    State(state): State<AppState>,
    Json(request): Json<WebhookRequest>,
) -> Result<Json<WebhookResponse>, AppError> {
    let customer_id = request.customer_id()?;
    let credit_card = request.string_parameter("credit_card")?;

    if !customer_service::exists(&state.pool, customer_id).await? {
        tracing::info!(customer_id, "unknown customer id");
        return Ok(Json(WebhookResponse::invalid_customer()));
    }

    card_service::issue_card(&state.pool, customer_id, &credit_card).await?;

    let reply = state.genai.generate(prompts::card_recorded()).await?;
    Ok(Json(WebhookResponse::with_text(reply)))
}
