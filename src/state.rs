//! Shared application state handed to every handler.

use crate::{config::Config, db::DbPool, genai::GenAiClient, maps::DistanceMatrixClient};

/// Everything a webhook handler needs: the database pool and the two
/// outbound API clients. Cloned per request by axum; all members are
/// cheaply cloneable handles.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub genai: GenAiClient,
    pub maps: DistanceMatrixClient,

    /// Dialogflow page ineligible card applicants are redirected to,
    /// when configured.
    pub card_selection_page: Option<String>,
}

impl AppState {
    pub fn new(pool: DbPool, config: &Config) -> Result<Self, reqwest::Error> {
        Ok(Self {
            pool,
            genai: GenAiClient::new(config)?,
            maps: DistanceMatrixClient::new(config)?,
            card_selection_page: config.card_selection_page.clone(),
        })
    }
}
