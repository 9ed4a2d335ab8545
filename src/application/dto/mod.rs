// src/application/dto/mod.rs
// Wire envelopes and use-case errors

pub mod parser;

use serde::Deserialize;
use thiserror::Error;

use crate::application::state::StateError;
use crate::domain::errors::{AppError, BackendError};
use crate::domain::models::PlacedOrder;
use crate::domain::validation::ValidationErrors;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Item not on the menu: {0}")]
    UnknownItem(String),

    #[error("An order is already being placed")]
    SubmitInFlight,

    #[error("An order history lookup is already running")]
    HistoryInFlight,

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("State error: {0}")]
    State(#[from] StateError),
}

impl From<ApplicationError> for AppError {
    fn from(error: ApplicationError) -> Self {
        AppError::Application(Box::new(error))
    }
}

/// `POST /orders` answers with the order nested under `data`
#[derive(Debug, Deserialize)]
pub struct PlaceOrderResponse {
    pub data: PlacedOrder,
}

/// Structured failure body: `{"errors": [{"msg": "..."}, ...]}`
#[derive(Debug, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub errors: Vec<ApiErrorEntry>,
}

/// One entry of the list. Validators name the text `msg`, hand-written
/// handlers `message`; some bodies carry both.
#[derive(Debug, Deserialize)]
pub struct ApiErrorEntry {
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiErrorEntry {
    /// First non-blank text, `msg` before `message`
    pub fn into_text(self) -> Option<String> {
        [self.msg, self.message]
            .into_iter()
            .flatten()
            .find(|text| !text.trim().is_empty())
    }
}

/// Picks the message shown to the customer for a failed request:
/// the backend's own field message, then the transport description,
/// then `fallback`.
pub fn failure_message(error: &BackendError, fallback: &str) -> String {
    if let Some(message) = error.field_message() {
        return message.to_string();
    }

    error
        .transport_message()
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string())
}
