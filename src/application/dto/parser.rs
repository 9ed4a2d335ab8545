// src/application/dto/parser.rs
// Parsers for backend response bodies

use serde::de::DeserializeOwned;

use super::{ApiErrorBody, ApiErrorEntry};
use crate::domain::errors::{BackendError, BackendResult};

/// Decode a successful response body
pub fn parse_json<T: DeserializeOwned>(body: &[u8]) -> BackendResult<T> {
    serde_json::from_slice(body).map_err(|e| BackendError::Decode(e.to_string()))
}

/// Messages of a structured error list, in order. Any other body shape
/// yields nothing and the caller falls back to the transport message.
pub fn parse_error_messages(body: &[u8]) -> Vec<String> {
    match serde_json::from_slice::<ApiErrorBody>(body) {
        Ok(parsed) => parsed
            .errors
            .into_iter()
            .filter_map(ApiErrorEntry::into_text)
            .collect(),
        Err(e) => {
            log::debug!("Failure body is not a structured error list: {}", e);
            Vec::new()
        }
    }
}
