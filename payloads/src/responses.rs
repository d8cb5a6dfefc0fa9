use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{AuthenticatedUser, ClientError, Pagination};

/// Body of a successful `POST /api/back-office/auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(flatten)]
    pub user: AuthenticatedUser,
    pub access_token: String,
}

/// One page of a list endpoint.
///
/// Fields are private so the navigation flags can't disagree with the page
/// counters: `has_next == page + 1 < total_pages`, `has_previous == page > 0`
/// and `content.len() <= size` always hold.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResult<T> {
    content: Vec<T>,
    total_elements: u64,
    total_pages: u32,
    page: u32,
    size: u32,
    has_next: bool,
    has_previous: bool,
}

impl<T> PaginatedResult<T> {
    /// Build a page, deriving the page count from `total_elements`.
    pub fn new(content: Vec<T>, total_elements: u64, page: u32, size: u32) -> Self {
        let size = size.max(1);
        let total_pages = total_elements.div_ceil(u64::from(size));
        let total_pages = u32::try_from(total_pages).unwrap_or(u32::MAX);
        Self::with_total_pages(content, total_elements, total_pages, page, size)
    }

    fn with_total_pages(
        mut content: Vec<T>,
        total_elements: u64,
        total_pages: u32,
        page: u32,
        size: u32,
    ) -> Self {
        let size = size.max(1);
        content.truncate(size as usize);
        Self {
            content,
            total_elements,
            total_pages,
            page,
            size,
            has_next: u64::from(page) + 1 < u64::from(total_pages),
            has_previous: page > 0,
        }
    }

    /// A page with nothing in it, used before the first fetch completes.
    pub fn empty(page: u32, size: u32) -> Self {
        Self::new(Vec::new(), 0, page, size)
    }

    pub fn content(&self) -> &[T] {
        &self.content
    }

    pub fn into_content(self) -> Vec<T> {
        self.content
    }

    pub fn total_elements(&self) -> u64 {
        self.total_elements
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn has_next(&self) -> bool {
        self.has_next
    }

    pub fn has_previous(&self) -> bool {
        self.has_previous
    }

    /// True when the requested page lies beyond the last page, which happens
    /// when rows were deleted while the user sat on the last page.
    pub fn is_past_end(&self) -> bool {
        self.page > 0 && self.content.is_empty() && self.page >= self.total_pages
    }

    /// The closest page that still exists.
    pub fn last_valid_page(&self) -> u32 {
        self.total_pages.saturating_sub(1)
    }
}

impl<T: DeserializeOwned> PaginatedResult<T> {
    /// Interpret the payload of a list endpoint.
    ///
    /// Backends disagree on the page shape, so this accepts:
    /// - a page object `{content, totalElements, totalPages, page|number, size}`
    /// - a bare array with page counters in the envelope's `pagination`
    /// - a bare array on its own, treated as the only page
    pub fn from_envelope(
        data: Value,
        pagination: Option<Pagination>,
    ) -> Result<Self, ClientError> {
        let meta = pagination.unwrap_or_default();
        let is_page_object =
            matches!(&data, Value::Object(map) if map.contains_key("content"));
        match data {
            Value::Object(_) if is_page_object => {
                let wire: WirePage<T> = serde_json::from_value(data)
                    .map_err(|e| ClientError::Decode(e.to_string()))?;
                let len = wire.content.len() as u64;
                let size = wire
                    .size
                    .or(meta.size)
                    .unwrap_or_else(|| u32::try_from(len.max(1)).unwrap_or(u32::MAX));
                let total_elements =
                    wire.total_elements.or(meta.total_elements).unwrap_or(len);
                let page = wire.page.or(meta.page).unwrap_or(0);
                Ok(match wire.total_pages.or(meta.total_pages) {
                    Some(total_pages) => Self::with_total_pages(
                        wire.content,
                        total_elements,
                        total_pages,
                        page,
                        size,
                    ),
                    None => Self::new(wire.content, total_elements, page, size),
                })
            }
            Value::Array(_) => {
                let content: Vec<T> = serde_json::from_value(data)
                    .map_err(|e| ClientError::Decode(e.to_string()))?;
                let len = content.len() as u64;
                let size = meta
                    .size
                    .unwrap_or_else(|| u32::try_from(len.max(1)).unwrap_or(u32::MAX));
                let total_elements = meta.total_elements.unwrap_or(len);
                let page = meta.page.unwrap_or(0);
                Ok(match meta.total_pages {
                    Some(total_pages) => Self::with_total_pages(
                        content,
                        total_elements,
                        total_pages,
                        page,
                        size,
                    ),
                    None => Self::new(content, total_elements, page, size),
                })
            }
            other => Err(ClientError::Decode(format!(
                "expected a page of results, got {}",
                json_kind(&other)
            ))),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePage<T> {
    content: Vec<T>,
    #[serde(default, alias = "totalItems")]
    total_elements: Option<u64>,
    #[serde(default)]
    total_pages: Option<u32>,
    #[serde(default, alias = "number")]
    page: Option<u32>,
    #[serde(default)]
    size: Option<u32>,
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
