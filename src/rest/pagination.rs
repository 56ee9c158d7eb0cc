//! Header-driven page accumulation for list endpoints.

use serde_json::Value;

use super::request::RestResponse;
use super::service::ServiceName;
use crate::config::PaginationConfig;
use crate::error::RestError;

/// Names of the total-pages header per service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationSettings {
    automation_pages_header: String,
    arc_pages_header: String,
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self::from_config(&PaginationConfig::default())
    }
}

impl PaginationSettings {
    /// Creates settings from the `[pagination]` configuration section.
    #[must_use]
    pub fn from_config(config: &PaginationConfig) -> Self {
        Self {
            automation_pages_header: config.automation_pages_header.clone(),
            arc_pages_header: config.arc_pages_header.clone(),
        }
    }

    /// Header carrying the page count for `service`.
    #[must_use]
    pub fn pages_header(&self, service: ServiceName) -> &str {
        match service {
            ServiceName::Automation => &self.automation_pages_header,
            ServiceName::Arc => &self.arc_pages_header,
        }
    }
}

/// Progress of one list call.
///
/// The page count is read from the first response only; items are appended
/// in page order.
#[derive(Debug)]
pub(crate) struct PaginationState {
    current_page: u64,
    total_pages: u64,
    items: Vec<Value>,
}

impl PaginationState {
    /// Starts from the already fetched first page.
    pub(crate) fn from_first_page(
        response: &RestResponse,
        pages_header: &str,
    ) -> Result<Self, RestError> {
        let mut state = Self {
            current_page: 1,
            total_pages: total_pages(response, pages_header),
            items: Vec::new(),
        };
        state.append(response)?;
        Ok(state)
    }

    /// Returns the next page number to fetch, if any.
    pub(crate) fn next_page(&mut self) -> Option<u64> {
        if self.current_page >= self.total_pages {
            return None;
        }
        self.current_page += 1;
        Some(self.current_page)
    }

    /// Appends the elements of one page.
    pub(crate) fn append(&mut self, response: &RestResponse) -> Result<(), RestError> {
        match response.json::<Value>()? {
            Value::Array(elements) => {
                self.items.extend(elements);
                Ok(())
            }
            other => Err(RestError::Decode {
                message: format!(
                    "expected a JSON array on page {}, got {}",
                    self.current_page,
                    kind_of(&other)
                ),
            }),
        }
    }

    pub(crate) const fn total_pages_hint(&self) -> u64 {
        self.total_pages
    }

    pub(crate) fn into_items(self) -> Vec<Value> {
        self.items
    }
}

/// Reads the page count; absent, unparseable or zero means a single page.
pub(crate) fn total_pages(response: &RestResponse, pages_header: &str) -> u64 {
    response
        .header(pages_header)
        .and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|pages| *pages >= 1)
        .unwrap_or(1)
}

const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
