//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to automatically deserialize environment variables into a type-safe struct.

use serde::Deserialize;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DATABASE_URL` (required): PostgreSQL connection string
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 8080
/// - `GENAI_API_KEY` (required): API key for the hosted generative model
/// - `GENAI_MODEL` (optional): model name, defaults to gemini-1.0-pro-002
/// - `GENAI_API_BASE` (optional): model endpoint base URL (overridable for tests)
/// - `MAPS_API_KEY` (required): API key for the distance matrix API
/// - `MAPS_API_BASE` (optional): distance matrix endpoint URL (overridable for tests)
/// - `CARD_SELECTION_PAGE` (optional): Dialogflow page path that ineligible
///   card applicants are redirected to; the redirect is omitted when unset
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,

    #[serde(default = "default_port")]
    pub server_port: u16,

    pub genai_api_key: String,

    #[serde(default = "default_genai_model")]
    pub genai_model: String,

    #[serde(default = "default_genai_api_base")]
    pub genai_api_base: String,

    pub maps_api_key: String,

    #[serde(default = "default_maps_api_base")]
    pub maps_api_base: String,

    #[serde(default)]
    pub card_selection_page: Option<String>,
}

/// Default port if SERVER_PORT environment variable is not set.
fn default_port() -> u16 {
    8080
}

/// Default generative model name.
fn default_genai_model() -> String {
    "gemini-1.0-pro-002".to_string()
}

/// Default generative language API base URL.
fn default_genai_api_base() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

/// Default distance matrix API endpoint.
fn default_maps_api_base() -> String {
    "https://maps.googleapis.com/maps/api/distancematrix/json".to_string()
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing (e.g., DATABASE_URL)
    /// - Environment variable values cannot be parsed into expected types
    pub fn from_env() -> Result<Self, envy::Error> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        // Parse environment variables into Config struct
        // Field names are automatically converted: database_url -> DATABASE_URL
        envy::from_env::<Config>()
    }
}
