//! Nearest partner car dealer endpoint.

use axum::{Json, extract::State};
use serde_json::json;

use crate::{
    dialogflow::{WebhookRequest, WebhookResponse},
    error::AppError,
    genai::prompts,
    services::{customer_service, dealer_service, finance_service},
    state::AppState,
};

/// Recommend nearby partner car dealers to a customer saving for a car.
///
/// # Endpoint
///
/// `POST /webhooks/dealer-locator`
///
/// # Process
///
/// 1. Short-circuit with the apology envelope for an unknown customer ID
/// 2. Segment the customer (Standard/Premium) by deposit assets
/// 3. Load the segment's partner dealers and rank them by road distance
///    from the customer's postal address (lookups fan out concurrently)
/// 4. Ask the model to present the nearest showrooms with offers
/// 5. Carry `vehicle_type` and the reply forward as session parameters
pub async fn dealer_locator(
    State(state): State<AppState>,
    Json(request): Json<WebhookRequest>,
) -> Result<Json<WebhookResponse>, AppError> {
    let customer_id = request.customer_id()?;

    if !customer_service::exists(&state.pool, customer_id).await? {
        tracing::info!(customer_id, "unknown customer id");
        return Ok(Json(WebhookResponse::invalid_customer()));
    }

    let deposit_assets = finance_service::deposit_assets(&state.pool, customer_id).await?;
    let category = dealer_service::dealer_category(deposit_assets);

    let dealers = dealer_service::dealers_in_category(&state.pool, category).await?;
    let origin = customer_service::postal_address(&state.pool, customer_id)
        .await?
        .map(|address| address.formatted())
        .unwrap_or_default();

    tracing::info!(customer_id, category, dealer_count = dealers.len(), "ranking dealers");
    let shortlist = dealer_service::nearest_dealers(&state.maps, &origin, dealers).await?;

    let reply = state
        .genai
        .generate(&prompts::dealer_recommendation(&shortlist))
        .await?;

    Ok(Json(
        WebhookResponse::with_text(reply.clone())
            .with_parameter("vehicle_type", json!("Car"))
            .with_parameter("showrooms", json!(reply)),
    ))
}
