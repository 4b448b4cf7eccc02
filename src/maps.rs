//! Distance matrix API client.
//!
//! Used by the dealer locator to rank partner showrooms by road distance
//! from the customer's postal address. Each lookup is one origin against
//! one destination; the dealer service fans the lookups out concurrently.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::{config::Config, error::AppError};

/// Per-lookup timeout (prevents one slow dealer from hanging the batch).
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Client for the distance matrix REST endpoint.
#[derive(Debug, Clone)]
pub struct DistanceMatrixClient {
    http: Client,
    api_base: String,
    api_key: String,
}

/// Top-level distance matrix response.
///
/// The API reports errors in-band: the HTTP status is 200 even when the
/// request is denied or an address cannot be resolved, so both the
/// top-level and the element status must be checked.
#[derive(Debug, Deserialize)]
struct DistanceMatrixResponse {
    status: String,
    #[serde(default)]
    rows: Vec<DistanceRow>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DistanceRow {
    #[serde(default)]
    elements: Vec<DistanceElement>,
}

#[derive(Debug, Deserialize)]
struct DistanceElement {
    status: String,
    distance: Option<DistanceValue>,
}

#[derive(Debug, Deserialize)]
struct DistanceValue {
    /// Road distance in meters
    value: i64,
}

impl DistanceMatrixClient {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            http,
            api_base: config.maps_api_base.clone(),
            api_key: config.maps_api_key.clone(),
        })
    }

    /// Road distance in meters from `origin` to `destination`.
    ///
    /// # Errors
    ///
    /// - `Http`: transport failure or non-success HTTP status
    /// - `DistanceMatrix`: the API answered but rejected the request or
    ///   could not resolve the origin/destination pair
    pub async fn road_distance_meters(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<i64, AppError> {
        let response = self
            .http
            .get(&self.api_base)
            .query(&[
                ("origins", origin),
                ("destinations", destination),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body: DistanceMatrixResponse = response.json().await?;
        extract_distance(&body)
    }
}

/// Pull the single requested distance out of a response, validating both
/// status levels.
fn extract_distance(body: &DistanceMatrixResponse) -> Result<i64, AppError> {
    if body.status != "OK" {
        let detail = body.error_message.as_deref().unwrap_or("");
        return Err(AppError::DistanceMatrix(format!(
            "request rejected with status {}: {detail}",
            body.status
        )));
    }

    let element = body
        .rows
        .first()
        .and_then(|row| row.elements.first())
        .ok_or_else(|| AppError::DistanceMatrix("response carried no elements".to_string()))?;

    if element.status != "OK" {
        return Err(AppError::DistanceMatrix(format!(
            "element status {}",
            element.status
        )));
    }

    element
        .distance
        .as_ref()
        .map(|distance| distance.value)
        .ok_or_else(|| AppError::DistanceMatrix("element carried no distance".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> DistanceMatrixResponse {
        serde_json::from_str(json).expect("valid response JSON")
    }

    #[test]
    fn extracts_distance_from_ok_response() {
        let body = parse(
            r#"{
                "status": "OK",
                "rows": [{
                    "elements": [{
                        "status": "OK",
                        "distance": { "text": "7.2 km", "value": 7200 },
                        "duration": { "text": "19 mins", "value": 1140 }
                    }]
                }]
            }"#,
        );
        assert_eq!(extract_distance(&body).unwrap(), 7200);
    }

    #[test]
    fn rejects_top_level_failure() {
        let body = parse(
            r#"{ "status": "REQUEST_DENIED", "error_message": "The provided API key is invalid." }"#,
        );
        assert!(matches!(
            extract_distance(&body),
            Err(AppError::DistanceMatrix(_))
        ));
    }

    #[test]
    fn rejects_unresolvable_destination() {
        let body = parse(
            r#"{
                "status": "OK",
                "rows": [{ "elements": [{ "status": "NOT_FOUND", "distance": null }] }]
            }"#,
        );
        assert!(matches!(
            extract_distance(&body),
            Err(AppError::DistanceMatrix(_))
        ));
    }

    #[test]
    fn rejects_empty_rows() {
        let body = parse(r#"{ "status": "OK", "rows": [] }"#);
        assert!(extract_distance(&body).is_err());
    }
}
