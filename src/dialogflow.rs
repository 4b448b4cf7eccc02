//! Dialogflow CX webhook request and response envelopes.
//!
//! Every endpoint receives the platform's webhook payload (we only consume
//! `sessionInfo.parameters`) and answers with a fulfillment envelope:
//! `fulfillment_response.messages[].text.text[]`, optionally carrying
//! session parameters forward to the next dialogue turn and optionally
//! redirecting the conversation with `target_page`.
//!
//! Field spelling on the wire matters: the platform accepts
//! `fulfillment_response` in snake_case but `sessionInfo` in camelCase,
//! so the serde renames below are deliberate.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppError;

/// Apology returned whenever a webhook is invoked with an unknown customer ID.
pub const INVALID_CUSTOMER_MESSAGE: &str =
    "It seems you have entered an incorrect Customer ID. Please try again.";

/// Greeting returned once a customer ID has been validated.
pub const VALIDATED_GREETING: &str = "That's great! What can I help you with today?";

/// Incoming webhook request.
///
/// The platform sends far more than this (fulfillment info, intent match,
/// page info); the fulfillment layer only reads the session parameters, so
/// everything else is left undeclared and ignored by serde.
#[derive(Debug, Default, Deserialize)]
pub struct WebhookRequest {
    #[serde(rename = "sessionInfo", default)]
    pub session_info: SessionInfo,
}

/// Session state carried across dialogue turns by the platform.
#[derive(Debug, Default, Deserialize)]
pub struct SessionInfo {
    #[serde(default)]
    pub parameters: HashMap<String, Value>,
}

impl WebhookRequest {
    /// Extract the customer ID from the session parameters.
    ///
    /// The dialogue manager captures the ID from speech or text input, so it
    /// may arrive either as a JSON number or as a numeric string; both are
    /// accepted. A missing, non-numeric, or fractional `cust_id` is a request
    /// error.
    pub fn customer_id(&self) -> Result<i64, AppError> {
        let value = self
            .session_info
            .parameters
            .get("cust_id")
            .ok_or_else(|| AppError::MissingParameter("cust_id".to_string()))?;

        match value {
            Value::Number(n) => n
                .as_i64()
                .ok_or_else(|| AppError::MissingParameter("cust_id".to_string())),
            Value::String(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| AppError::MissingParameter("cust_id".to_string())),
            _ => Err(AppError::MissingParameter("cust_id".to_string())),
        }
    }

    /// Extract a required string parameter (e.g. the chosen credit card).
    pub fn string_parameter(&self, name: &str) -> Result<String, AppError> {
        match self.session_info.parameters.get(name) {
            Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.trim().to_string()),
            _ => Err(AppError::MissingParameter(name.to_string())),
        }
    }
}

/// Outgoing fulfillment envelope.
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub fulfillment_response: FulfillmentResponse,

    #[serde(rename = "sessionInfo", skip_serializing_if = "Option::is_none")]
    pub session_info: Option<ResponseSessionInfo>,

    /// Page the dialogue should jump to after this response (rarely used).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_page: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FulfillmentResponse {
    pub messages: Vec<ResponseMessage>,
}

#[derive(Debug, Serialize)]
pub struct ResponseMessage {
    pub text: TextMessage,
}

#[derive(Debug, Serialize)]
pub struct TextMessage {
    pub text: Vec<String>,
}

/// Session parameters being written back for the next turn.
#[derive(Debug, Default, Serialize)]
pub struct ResponseSessionInfo {
    pub parameters: HashMap<String, Value>,
}

impl WebhookResponse {
    /// Build an envelope with a single text message.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self::with_texts(vec![text.into()])
    }

    /// Build an envelope with one message per entry, in order.
    pub fn with_texts(texts: Vec<String>) -> Self {
        Self {
            fulfillment_response: FulfillmentResponse {
                messages: texts
                    .into_iter()
                    .map(|text| ResponseMessage {
                        text: TextMessage { text: vec![text] },
                    })
                    .collect(),
            },
            session_info: None,
            target_page: None,
        }
    }

    /// The fixed apology for an unknown customer ID.
    pub fn invalid_customer() -> Self {
        Self::with_text(INVALID_CUSTOMER_MESSAGE)
    }

    /// Attach a session parameter for the next dialogue turn.
    pub fn with_parameter(mut self, name: impl Into<String>, value: Value) -> Self {
        self.session_info
            .get_or_insert_with(ResponseSessionInfo::default)
            .parameters
            .insert(name.into(), value);
        self
    }

    /// Redirect the dialogue to the given page after this response.
    pub fn with_target_page(mut self, page: impl Into<String>) -> Self {
        self.target_page = Some(page.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request_with_parameters(parameters: Value) -> WebhookRequest {
        serde_json::from_value(json!({
            "sessionInfo": { "parameters": parameters }
        }))
        .expect("valid webhook payload")
    }

    #[test]
    fn customer_id_accepts_numbers_and_numeric_strings() {
        let as_number = request_with_parameters(json!({ "cust_id": 235813 }));
        assert_eq!(as_number.customer_id().unwrap(), 235813);

        let as_string = request_with_parameters(json!({ "cust_id": " 592783 " }));
        assert_eq!(as_string.customer_id().unwrap(), 592783);
    }

    #[test]
    fn customer_id_rejects_missing_and_malformed_values() {
        let missing = request_with_parameters(json!({}));
        assert!(matches!(
            missing.customer_id(),
            Err(AppError::MissingParameter(p)) if p == "cust_id"
        ));

        let fractional = request_with_parameters(json!({ "cust_id": 12.5 }));
        assert!(fractional.customer_id().is_err());

        let word = request_with_parameters(json!({ "cust_id": "not-a-number" }));
        assert!(word.customer_id().is_err());
    }

    #[test]
    fn request_tolerates_unknown_payload_fields() {
        let request: WebhookRequest = serde_json::from_value(json!({
            "detectIntentResponseId": "abc",
            "pageInfo": { "displayName": "Card Selection" },
            "sessionInfo": { "parameters": { "cust_id": 42 } }
        }))
        .unwrap();
        assert_eq!(request.customer_id().unwrap(), 42);
    }

    #[test]
    fn envelope_matches_platform_shape() {
        let response = WebhookResponse::with_text("Hello")
            .with_parameter("account_status", json!("Healthy"));
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(
            value["fulfillment_response"]["messages"][0]["text"]["text"][0],
            "Hello"
        );
        assert_eq!(
            value["sessionInfo"]["parameters"]["account_status"],
            "Healthy"
        );
        // No redirect requested, so the key must be absent entirely.
        assert!(value.get("target_page").is_none());
    }

    #[test]
    fn multi_message_envelope_keeps_order() {
        let response = WebhookResponse::with_texts(vec![
            "First".to_string(),
            "Would you like to apply for this card?".to_string(),
        ]);
        let value = serde_json::to_value(&response).unwrap();
        let messages = value["fulfillment_response"]["messages"]
            .as_array()
            .unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1]["text"]["text"][0], "Would you like to apply for this card?");
        assert!(value.get("sessionInfo").is_none());
    }

    #[test]
    fn target_page_serializes_when_set() {
        let response = WebhookResponse::with_text("Not eligible yet")
            .with_target_page("projects/p/locations/l/agents/a/flows/f/pages/card-selection");
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(
            value["target_page"],
            "projects/p/locations/l/agents/a/flows/f/pages/card-selection"
        );
    }
}
