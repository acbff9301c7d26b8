//! HTTP response handling.

use crate::FetchError;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;

/// An HTTP response.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// The HTTP status code.
    pub status: u16,
    /// The response headers.
    pub headers: HashMap<String, String>,
    /// The response body.
    pub body: Vec<u8>,
}

impl Response {
    /// Create a new response.
    pub fn new(status: u16, headers: HashMap<String, String>, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// A JSON response with the given status.
    pub fn json_body<T: Serialize>(status: u16, value: &T) -> Result<Self, FetchError> {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        Ok(Self::new(status, headers, serde_json::to_vec(value)?))
    }

    /// An empty response with the given status.
    pub fn empty(status: u16) -> Self {
        Self::new(status, HashMap::new(), Vec::new())
    }

    /// Check if the response was successful (2xx status).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get the response body as text.
    pub fn text(&self) -> Result<String, FetchError> {
        String::from_utf8(self.body.clone())
            .map_err(|e| FetchError::ParseError(format!("Invalid UTF-8: {}", e)))
    }

    /// Parse the response body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, FetchError> {
        serde_json::from_slice(&self.body).map_err(|e| FetchError::ParseError(e.to_string()))
    }

    /// Get the raw response body.
    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    /// Get a header value (case-insensitive).
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Whether the server sent no body at all.
    pub fn is_empty(&self) -> bool {
        self.body.iter().all(u8::is_ascii_whitespace)
    }

    /// The human-readable reason in an error reply.
    ///
    /// The backend answers failures with `{"message": "..."}`; proxies in
    /// front of it answer with plain text. JSON bodies without a usable
    /// `message` and empty bodies yield `None`.
    pub fn message(&self) -> Option<String> {
        let text = self.text().ok()?;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        match serde_json::from_str::<serde_json::Value>(trimmed) {
            Ok(serde_json::Value::Object(map)) => map
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(str::to_string),
            _ if trimmed.starts_with('{') => None,
            _ => Some(trimmed.to_string()),
        }
    }

    /// Convert a non-2xx reply into [`FetchError::HttpError`].
    pub fn error_for_status(self) -> Result<Self, FetchError> {
        if self.is_success() {
            return Ok(self);
        }
        let message = self
            .message()
            .unwrap_or_else(|| format!("Request failed with status {}", self.status));
        Err(FetchError::HttpError {
            status: self.status,
            message,
        })
    }
}
