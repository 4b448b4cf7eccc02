//! Account health summarisation endpoint.

use axum::{Json, extract::State};
use serde_json::json;

use crate::{
    dialogflow::{WebhookRequest, WebhookResponse},
    error::AppError,
    genai::prompts,
    services::{customer_service, finance_service},
    state::AppState,
};

/// Summarise the health of the customer's accounts.
///
/// # Endpoint
///
/// `POST /webhooks/account-health`
///
/// # Process
///
/// 1. Short-circuit with the apology envelope for an unknown customer ID
/// 2. Run the financial snapshot battery (all statements concurrent)
/// 3. Classify the account status from the threshold ratios
/// 4. Ask the model for a pointer-style second-person summary
/// 5. Carry `account_status` forward as a session parameter
pub async fn account_health(
    State(state): State<AppState>,
    Json(request): Json<WebhookRequest>,
) -> Result<Json<WebhookResponse>, AppError> {
    let customer_id = request.customer_id()?;

    if !customer_service::exists(&state.pool, customer_id).await? {
        tracing::info!(customer_id, "unknown customer id");
        return Ok(Json(WebhookResponse::invalid_customer()));
    }

    let snapshot = finance_service::financial_snapshot(&state.pool, customer_id).await?;
    let status = snapshot.account_status();
    tracing::info!(customer_id, status = %status, "financial snapshot classified");

    let reply = state
        .genai
        .generate(&prompts::account_health(&snapshot, status))
        .await?;

    Ok(Json(
        WebhookResponse::with_text(reply)
            .with_parameter("account_status", json!(status.as_str())),
    ))
}
