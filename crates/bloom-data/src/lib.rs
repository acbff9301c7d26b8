//! HTTP client for the Bouquet Bar REST API.
//!
//! A small builder API over a pluggable [`Transport`]: Spin outbound HTTP on
//! `wasm32`, [`MemoryTransport`] for tests and offline use.
//!
//! # Example
//!
//! ```rust
//! use bloom_data::{FetchClient, MemoryTransport, Method};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Placed {
//!     id: String,
//! }
//!
//! let transport = MemoryTransport::new();
//! transport
//!     .respond_json(Method::Post, "/api/orders", 201, &serde_json::json!({"id": "42"}))
//!     .unwrap();
//!
//! let client = FetchClient::new(transport).with_base_url("https://bouquetbar.example");
//! let placed: Placed = client
//!     .post("/api/orders")
//!     .json(&serde_json::json!({"total": "0.00"}))
//!     .unwrap()
//!     .send_json()
//!     .unwrap();
//! assert_eq!(placed.id, "42");
//! ```

mod error;
mod request;
mod response;
mod transport;

pub use error::FetchError;
pub use request::{encode_component, Method, Request, RequestBuilder};
pub use response::Response;
#[cfg(target_arch = "wasm32")]
pub use transport::SpinTransport;
pub use transport::{MemoryTransport, Transport};

use serde::de::DeserializeOwned;
use std::collections::HashMap;

/// HTTP client for making outbound requests.
#[derive(Debug, Clone)]
pub struct FetchClient<T> {
    transport: T,
    base_url: Option<String>,
    default_headers: HashMap<String, String>,
}

#[cfg(target_arch = "wasm32")]
impl Default for FetchClient<SpinTransport> {
    fn default() -> Self {
        Self::new(SpinTransport)
    }
}

impl<T: Transport> FetchClient<T> {
    /// Create a new HTTP client over `transport`.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            base_url: None,
            default_headers: HashMap::new(),
        }
    }

    /// Create a client with a base URL that will be prepended to relative paths.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Add a default header that will be included in all requests.
    pub fn with_default_header(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Create a GET request.
    pub fn get(&self, url: impl Into<String>) -> ClientRequestBuilder<'_, T> {
        self.request(Method::Get, url)
    }

    /// Create a POST request.
    pub fn post(&self, url: impl Into<String>) -> ClientRequestBuilder<'_, T> {
        self.request(Method::Post, url)
    }

    /// Create a PUT request.
    pub fn put(&self, url: impl Into<String>) -> ClientRequestBuilder<'_, T> {
        self.request(Method::Put, url)
    }

    /// Create a PATCH request.
    pub fn patch(&self, url: impl Into<String>) -> ClientRequestBuilder<'_, T> {
        self.request(Method::Patch, url)
    }

    /// Create a DELETE request.
    pub fn delete(&self, url: impl Into<String>) -> ClientRequestBuilder<'_, T> {
        self.request(Method::Delete, url)
    }

    /// Create a request with a custom method.
    pub fn request(&self, method: Method, url: impl Into<String>) -> ClientRequestBuilder<'_, T> {
        let url = url.into();
        let full_url = match &self.base_url {
            Some(base) if !(url.starts_with("http://") || url.starts_with("https://")) => {
                format!("{}{}", base.trim_end_matches('/'), url)
            }
            _ => url,
        };

        let mut builder = RequestBuilder::new(method, full_url);
        for (key, value) in &self.default_headers {
            builder = builder.header(key.clone(), value.clone());
        }

        ClientRequestBuilder {
            client: self,
            builder,
        }
    }
}

/// A request builder bound to a client.
pub struct ClientRequestBuilder<'a, T> {
    client: &'a FetchClient<T>,
    builder: RequestBuilder,
}

impl<'a, T: Transport> ClientRequestBuilder<'a, T> {
    /// Add a header to the request.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.builder = self.builder.header(key, value);
        self
    }

    /// Append a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.builder = self.builder.query(key, value);
        self
    }

    /// Set the request body as raw bytes.
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.builder = self.builder.body(body);
        self
    }

    /// Set the request body as JSON.
    pub fn json<B: serde::Serialize>(mut self, value: &B) -> Result<Self, FetchError> {
        self.builder = self.builder.json(value)?;
        Ok(self)
    }

    /// Add a bearer token authorization header.
    pub fn bearer_auth(mut self, token: impl AsRef<str>) -> Self {
        self.builder = self.builder.bearer_auth(token);
        self
    }

    /// Add the bearer header only when a token is present.
    pub fn maybe_bearer_auth(self, token: Option<&str>) -> Self {
        match token {
            Some(token) => self.bearer_auth(token),
            None => self,
        }
    }

    /// Set the Accept header.
    pub fn accept(mut self, content_type: impl Into<String>) -> Self {
        self.builder = self.builder.accept(content_type);
        self
    }

    /// Send the request and return the response, whatever its status.
    pub fn send(self) -> Result<Response, FetchError> {
        let request = self.builder.build()?;
        tracing::debug!(method = %request.method, url = %request.url, "sending request");

        let response = self.client.transport.send(&request).map_err(|e| {
            tracing::warn!(method = %request.method, url = %request.url, error = %e, "request failed");
            e
        })?;

        tracing::debug!(
            method = %request.method,
            url = %request.url,
            status = response.status,
            "received response"
        );
        Ok(response)
    }

    /// Send, fail on non-2xx, and parse the body as JSON.
    pub fn send_json<R: DeserializeOwned>(self) -> Result<R, FetchError> {
        self.send()?.error_for_status()?.json()
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{FetchClient, FetchError, MemoryTransport, Method, Response, Transport};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_joined_for_relative_paths() {
        let transport = MemoryTransport::new();
        let client = FetchClient::new(&transport).with_base_url("https://shop.example/");
        client.get("/api/products").send().unwrap();
        client.get("https://other.example/x").send().unwrap();

        let urls: Vec<String> = transport.requests().into_iter().map(|r| r.url).collect();
        assert_eq!(
            urls,
            vec!["https://shop.example/api/products", "https://other.example/x"]
        );
    }

    #[test]
    fn test_default_headers_and_bearer() {
        let transport = MemoryTransport::new();
        let client =
            FetchClient::new(&transport).with_default_header("Accept", "application/json");
        client
            .get("/api/auth/user")
            .maybe_bearer_auth(Some("tok"))
            .send()
            .unwrap();
        client.get("/api/auth/user").maybe_bearer_auth(None).send().unwrap();

        let requests = transport.requests();
        assert_eq!(requests[0].header("accept"), Some("application/json"));
        assert_eq!(requests[0].header("authorization"), Some("Bearer tok"));
        assert_eq!(requests[1].header("authorization"), None);
    }

    #[test]
    fn test_send_json_maps_http_errors() {
        let transport = MemoryTransport::new();
        transport
            .respond_json(
                Method::Post,
                "/api/orders",
                500,
                &serde_json::json!({"message": "down"}),
            )
            .unwrap();
        let client = FetchClient::new(&transport);
        let result: Result<serde_json::Value, _> = client.post("/api/orders").send_json();
        assert_eq!(result.unwrap_err().status(), Some(500));
    }
}
