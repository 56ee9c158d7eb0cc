//! Request and response values exchanged with a [`super::Transport`].

use reqwest::Method;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::RestError;

/// One HTTP call against a logical service.
///
/// Built fresh per call; retries clone it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestRequest {
    /// HTTP method.
    pub method: Method,
    /// Path relative to the service base URL.
    pub path: String,
    /// Query parameters in order; keys may repeat.
    pub query: Vec<(String, String)>,
    /// Extra request headers.
    pub headers: Vec<(String, String)>,
    /// Request body, if any.
    pub body: Option<String>,
}

impl RestRequest {
    /// Creates a request with no query, headers or body.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Creates a `GET` request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Creates a `POST` request.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Creates a `PUT` request.
    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// Creates a `DELETE` request.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Appends a query parameter.
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Appends a request header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets a JSON body and the matching content type.
    #[must_use]
    pub fn json(self, body: &Value) -> Self {
        let mut request = self.header("Content-Type", "application/json");
        request.body = Some(body.to_string());
        request
    }

    /// Returns a copy with `key` set to `value`, replacing earlier values
    /// of the same key.
    #[must_use]
    pub fn with_query_replaced(&self, key: &str, value: &str) -> Self {
        let mut request = self.clone();
        request.query.retain(|(existing, _)| existing != key);
        request.query.push((key.to_owned(), value.to_owned()));
        request
    }
}

/// A response as seen by callers of the transport.
#[derive(Debug, Clone, Default)]
pub struct RestResponse {
    /// HTTP status code.
    pub status: u16,
    /// Body text; pretty-printed when it was valid JSON.
    pub body: String,
    /// Response headers (case-insensitive).
    pub headers: HeaderMap,
}

impl RestResponse {
    /// Creates a response with no headers.
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            headers: HeaderMap::new(),
        }
    }

    /// Returns the response with an extra header; invalid names or values
    /// are ignored.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(header_name), Ok(header_value)) = (
            reqwest::header::HeaderName::from_bytes(name.as_bytes()),
            reqwest::header::HeaderValue::from_str(value),
        ) {
            self.headers.append(header_name, header_value);
        }
        self
    }

    /// Whether the status is in the 2xx range.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Returns the first value of a header as text.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .and_then(|value| value.to_str().ok())
    }

    /// Converts a status of 400 or above into [`RestError::HttpStatus`].
    ///
    /// # Errors
    ///
    /// Returns [`RestError::HttpStatus`] carrying the code and body.
    pub fn error_for_status(self) -> Result<Self, RestError> {
        if self.status >= 400 {
            return Err(RestError::HttpStatus {
                code: self.status,
                body: self.body,
            });
        }
        Ok(self)
    }

    /// Decodes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::Decode`] if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, RestError> {
        serde_json::from_str(&self.body).map_err(|error| RestError::Decode {
            message: error.to_string(),
        })
    }
}

/// Pretty-prints `raw` when it is JSON; returns it verbatim otherwise.
#[must_use]
pub fn prettify_body(raw: &str) -> String {
    serde_json::from_str::<Value>(raw)
        .ok()
        .and_then(|value| serde_json::to_string_pretty(&value).ok())
        .unwrap_or_else(|| raw.to_owned())
}
