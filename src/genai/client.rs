//! Streaming client for the hosted generative language model.

use std::time::Duration;

use futures::StreamExt;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::{debug, info};

use super::sse::SseParser;
use crate::{config::Config, error::AppError};

/// Generation parameters used by every webhook prompt.
const MAX_OUTPUT_TOKENS: u32 = 2048;
const TEMPERATURE: f32 = 1.0;
const TOP_P: f32 = 1.0;

/// Replies are short; the timeout mostly guards against a stalled stream.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Harm categories pinned to `BLOCK_MEDIUM_AND_ABOVE` on every request.
const HARM_CATEGORIES: &[&str] = &[
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_HARASSMENT",
];

/// Client for the model's streaming REST endpoint.
///
/// Cheap to clone; the inner reqwest client is reference-counted and shared
/// across requests.
#[derive(Debug, Clone)]
pub struct GenAiClient {
    http: Client,
    api_base: String,
    api_key: String,
    model: String,
}

impl GenAiClient {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            http,
            api_base: config.genai_api_base.trim_end_matches('/').to_string(),
            api_key: config.genai_api_key.clone(),
            model: config.genai_model.clone(),
        })
    }

    /// Send a prompt and collect the streamed reply into a single string.
    ///
    /// # Process
    ///
    /// 1. POST the prompt to `models/{model}:streamGenerateContent?alt=sse`
    /// 2. Parse the SSE body frame by frame as chunks arrive
    /// 3. Concatenate the candidate text of every chunk
    ///
    /// # Errors
    ///
    /// - `Http`: transport failure (connect, timeout, mid-stream disconnect)
    /// - `Model`: non-success HTTP status, unparseable chunk, or a stream
    ///   that produced no text at all (e.g. the prompt was blocked)
    pub async fn generate(&self, prompt: &str) -> Result<String, AppError> {
        let url = format!(
            "{}/models/{}:streamGenerateContent?alt=sse",
            self.api_base, self.model
        );

        info!(model = %self.model, prompt_chars = prompt.len(), "requesting model reply");

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body(prompt))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Model(format!(
                "model endpoint returned {status}: {body}"
            )));
        }

        let mut stream = response.bytes_stream();
        let mut parser = SseParser::new();
        // Carries bytes of a UTF-8 sequence split across network chunks
        let mut carry: Vec<u8> = Vec::new();
        let mut reply = String::new();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            let text = decode_utf8_chunk(&mut carry, &chunk);
            for payload in parser.feed(&text) {
                reply.push_str(&chunk_text(&payload)?);
            }
        }
        if let Some(payload) = parser.finish() {
            reply.push_str(&chunk_text(&payload)?);
        }

        if reply.is_empty() {
            return Err(AppError::Model(
                "model stream completed without any candidate text".to_string(),
            ));
        }

        debug!(reply_chars = reply.len(), "model reply collected");
        Ok(reply)
    }
}

/// Build the JSON request body for one prompt.
fn request_body(prompt: &str) -> Value {
    let safety_settings: Vec<Value> = HARM_CATEGORIES
        .iter()
        .map(|category| {
            json!({
                "category": category,
                "threshold": "BLOCK_MEDIUM_AND_ABOVE",
            })
        })
        .collect();

    json!({
        "contents": [{
            "role": "user",
            "parts": [{ "text": prompt }],
        }],
        "generationConfig": {
            "maxOutputTokens": MAX_OUTPUT_TOKENS,
            "temperature": TEMPERATURE,
            "topP": TOP_P,
        },
        "safetySettings": safety_settings,
    })
}

/// Extract the generated text from one streamed chunk payload.
///
/// Chunks carry `candidates[0].content.parts[].text`; chunks without any
/// candidate text (e.g. the final usage-metadata chunk) contribute nothing.
fn chunk_text(payload: &str) -> Result<String, AppError> {
    let value: Value = serde_json::from_str(payload)
        .map_err(|e| AppError::Model(format!("unparseable stream chunk: {e}")))?;

    let mut text = String::new();
    if let Some(parts) = value
        .pointer("/candidates/0/content/parts")
        .and_then(Value::as_array)
    {
        for part in parts {
            if let Some(fragment) = part.get("text").and_then(Value::as_str) {
                text.push_str(fragment);
            }
        }
    }
    Ok(text)
}

/// Decode a network chunk as UTF-8, holding back a trailing truncated
/// multi-byte sequence until the next chunk arrives. Genuinely invalid
/// bytes become replacement characters rather than stalling the carry
/// buffer.
fn decode_utf8_chunk(carry: &mut Vec<u8>, chunk: &[u8]) -> String {
    carry.extend_from_slice(chunk);
    let mut text = String::new();

    loop {
        match std::str::from_utf8(carry) {
            Ok(valid) => {
                text.push_str(valid);
                carry.clear();
                return text;
            }
            Err(e) => {
                let valid = e.valid_up_to();
                // Lossless: the prefix up to valid_up_to is valid UTF-8
                text.push_str(&String::from_utf8_lossy(&carry[..valid]));
                match e.error_len() {
                    // Truncated sequence at the end of the buffer
                    None => {
                        carry.drain(..valid);
                        return text;
                    }
                    Some(invalid) => {
                        text.push('\u{FFFD}');
                        carry.drain(..valid + invalid);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_text_concatenates_parts() {
        let payload = r#"{
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{ "text": "Your account " }, { "text": "status is Healthy." }]
                }
            }]
        }"#;
        assert_eq!(chunk_text(payload).unwrap(), "Your account status is Healthy.");
    }

    #[test]
    fn chunk_without_candidates_contributes_nothing() {
        let payload = r#"{ "usageMetadata": { "totalTokenCount": 42 } }"#;
        assert_eq!(chunk_text(payload).unwrap(), "");
    }

    #[test]
    fn malformed_chunk_is_an_error() {
        assert!(matches!(
            chunk_text("{not json"),
            Err(AppError::Model(_))
        ));
    }

    #[test]
    fn decode_utf8_chunk_reassembles_split_rupee_sign() {
        // "₹" is three bytes: E2 82 B9
        let mut carry = Vec::new();
        let first = decode_utf8_chunk(&mut carry, &[b'a', 0xE2, 0x82]);
        assert_eq!(first, "a");
        let second = decode_utf8_chunk(&mut carry, &[0xB9, b'b']);
        assert_eq!(second, "\u{20B9}b");
        assert!(carry.is_empty());
    }

    #[test]
    fn decode_utf8_chunk_replaces_invalid_bytes() {
        let mut carry = Vec::new();
        let text = decode_utf8_chunk(&mut carry, &[b'a', 0xFF, b'b']);
        assert_eq!(text, "a\u{FFFD}b");
        assert!(carry.is_empty());
    }

    #[test]
    fn request_body_pins_generation_config_and_safety() {
        let body = request_body("hello");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 2048);
        assert_eq!(body["safetySettings"].as_array().unwrap().len(), 4);
        assert_eq!(
            body["safetySettings"][0]["threshold"],
            "BLOCK_MEDIUM_AND_ABOVE"
        );
    }
}
