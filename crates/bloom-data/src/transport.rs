//! Transports that actually move requests.

use crate::{FetchError, Method, Request, Response};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Sends a finished request and returns the raw response.
///
/// Non-2xx answers are still `Ok`; status handling belongs to the caller.
pub trait Transport {
    fn send(&self, request: &Request) -> Result<Response, FetchError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: &Request) -> Result<Response, FetchError> {
        (**self).send(request)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(&self, request: &Request) -> Result<Response, FetchError> {
        (**self).send(request)
    }
}

/// Outbound HTTP through Spin.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct SpinTransport;

#[cfg(target_arch = "wasm32")]
impl Transport for SpinTransport {
    fn send(&self, request: &Request) -> Result<Response, FetchError> {
        use spin_sdk::http::{Method as SpinMethod, Request as SpinRequest};

        let method = match request.method {
            Method::Get => SpinMethod::Get,
            Method::Post => SpinMethod::Post,
            Method::Put => SpinMethod::Put,
            Method::Patch => SpinMethod::Patch,
            Method::Delete => SpinMethod::Delete,
            Method::Head => SpinMethod::Head,
            Method::Options => SpinMethod::Options,
        };

        let mut builder = SpinRequest::builder();
        builder.method(method).uri(request.url.as_str());
        for (key, value) in &request.headers {
            builder.header(key.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder.body(body.clone());
        }

        let response: spin_sdk::http::Response =
            spin_sdk::http::run(spin_sdk::http::send(builder.build()))
                .map_err(|e| FetchError::RequestError(e.to_string()))?;

        let status = *response.status();
        let headers = response
            .headers()
            .map(|(k, v)| (k.to_string(), v.as_str().unwrap_or("").to_string()))
            .collect();
        Ok(Response::new(status, headers, response.into_body()))
    }
}

/// Canned reply for [`MemoryTransport`].
#[derive(Debug, Clone)]
enum Reply {
    Respond(Response),
    Fail(FetchError),
}

#[derive(Debug)]
struct Route {
    method: Method,
    path: String,
    replies: VecDeque<Reply>,
}

#[derive(Debug, Default)]
struct MemoryState {
    routes: Vec<Route>,
    requests: Vec<Request>,
}

/// In-memory transport with canned responses.
///
/// Replies are queued per method and path and consumed in order; the last
/// one repeats. Unrouted requests get a 404. Every request is recorded.
/// Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MemoryTransport {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for `method path`.
    pub fn respond(&self, method: Method, path: &str, response: Response) -> &Self {
        self.push(method, path, Reply::Respond(response));
        self
    }

    /// Queue a JSON response for `method path`.
    pub fn respond_json<T: serde::Serialize>(
        &self,
        method: Method,
        path: &str,
        status: u16,
        value: &T,
    ) -> Result<&Self, FetchError> {
        let response = Response::json_body(status, value)?;
        Ok(self.respond(method, path, response))
    }

    /// Queue a transport failure for `method path`.
    pub fn fail(&self, method: Method, path: &str, error: FetchError) -> &Self {
        self.push(method, path, Reply::Fail(error));
        self
    }

    /// Every request sent so far.
    pub fn requests(&self) -> Vec<Request> {
        self.state
            .lock()
            .map(|s| s.requests.clone())
            .unwrap_or_default()
    }

    /// Requests sent to `path`.
    pub fn requests_to(&self, method: Method, path: &str) -> Vec<Request> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path() == path)
            .collect()
    }

    /// Forget routes and recorded requests.
    pub fn reset(&self) {
        if let Ok(mut state) = self.state.lock() {
            *state = MemoryState::default();
        }
    }

    fn push(&self, method: Method, path: &str, reply: Reply) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        match state
            .routes
            .iter_mut()
            .find(|r| r.method == method && r.path == path)
        {
            Some(route) => route.replies.push_back(reply),
            None => state.routes.push(Route {
                method,
                path: path.to_string(),
                replies: VecDeque::from([reply]),
            }),
        }
    }
}

impl Transport for MemoryTransport {
    fn send(&self, request: &Request) -> Result<Response, FetchError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| FetchError::RequestError("memory transport poisoned".to_string()))?;
        state.requests.push(request.clone());

        let path = request.path().to_string();
        let reply = state
            .routes
            .iter_mut()
            .find(|r| r.method == request.method && r.path == path)
            .and_then(|route| {
                if route.replies.len() > 1 {
                    route.replies.pop_front()
                } else {
                    route.replies.front().cloned()
                }
            });

        match reply {
            Some(Reply::Respond(response)) => Ok(response),
            Some(Reply::Fail(error)) => Err(error),
            None => Response::json_body(404, &serde_json::json!({ "message": "Not Found" })),
        }
    }
}
