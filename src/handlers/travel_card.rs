//! Travel card recommendation endpoint.

use axum::{Json, extract::State};
use serde_json::json;

use crate::{
    dialogflow::{WebhookRequest, WebhookResponse},
    error::AppError,
    genai::prompts,
    services::{customer_service, finance_service},
    state::AppState,
};

/// Customers must have been on the book at least this long to be offered
/// a credit card.
const MIN_TENURE_DAYS: i32 = 365;

/// Follow-up question sent after the recommendation.
const APPLY_QUESTION: &str = "Would you like to apply for this card?";

/// Recommend a credit card matched to the customer's account health.
///
/// # Endpoint
///
/// `POST /webhooks/travel-card`
///
/// # Process
///
/// 1. Short-circuit with the apology envelope for an unknown customer ID
/// 2. Customers on the book under a year get a model-phrased
///    ineligibility message and are redirected to the card selection page
/// 3. Otherwise run the snapshot battery, classify the account status,
///    map it to a card tier, and ask the model for a recommendation
/// 4. Answer with the recommendation plus a fixed follow-up question, and
///    carry `credit_card` forward as a session parameter
pub async fn travel_card(
    State(state): State<AppState>,
    Json(request): Json<WebhookRequest>,
) -> Result<Json<WebhookResponse>, AppError> {
    let customer_id = request.customer_id()?;

    if !customer_service::exists(&state.pool, customer_id).await? {
        tracing::info!(customer_id, "unknown customer id");
        return Ok(Json(WebhookResponse::invalid_customer()));
    }

    let tenure_days = customer_service::tenure_days(&state.pool, customer_id).await?;
    if tenure_days < MIN_TENURE_DAYS {
        tracing::info!(customer_id, tenure_days, "customer too new for a card");
        let reply = state
            .genai
            .generate(prompts::new_customer_ineligible())
            .await?;

        let mut response = WebhookResponse::with_text(reply);
        if let Some(page) = state.card_selection_page.as_deref() {
            response = response.with_target_page(page);
        }
        return Ok(Json(response));
    }

    let snapshot = finance_service::financial_snapshot(&state.pool, customer_id).await?;
    let status = snapshot.account_status();
    let credit_card = status.recommended_card();
    tracing::info!(customer_id, status = %status, credit_card, "card tier selected");

    let reply = state
        .genai
        .generate(&prompts::card_recommendation(credit_card))
        .await?;

    Ok(Json(
        WebhookResponse::with_texts(vec![reply, APPLY_QUESTION.to_string()])
            .with_parameter("credit_card", json!(credit_card)),
    ))
}
