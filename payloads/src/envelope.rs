//! The normalized result of every transport call.
//!
//! The backend is inconsistent about its response shape: some endpoints wrap
//! the payload as `{success, data, pagination}`, some return the payload bare,
//! and error bodies carry their message under `message`, `error` or `detail`.
//! [`normalize`] is the one place that knows about those variations.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ClientError;

/// Page counters some endpoints return next to `data` instead of inside it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default, alias = "currentPage", alias = "number")]
    pub page: Option<u32>,
    #[serde(default, alias = "pageSize", alias = "limit")]
    pub size: Option<u32>,
    #[serde(default, alias = "totalItems", alias = "total")]
    pub total_elements: Option<u64>,
    #[serde(default)]
    pub total_pages: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Envelope<T> {
    Ok {
        data: T,
        pagination: Option<Pagination>,
    },
    Err(ClientError),
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self::Ok {
            data,
            pagination: None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Ok { data, .. } => Some(data),
            Self::Err(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ClientError> {
        match self {
            Self::Ok { .. } => None,
            Self::Err(e) => Some(e),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Envelope<U> {
        match self {
            Self::Ok { data, pagination } => Envelope::Ok {
                data: f(data),
                pagination,
            },
            Self::Err(e) => Envelope::Err(e),
        }
    }

    /// Like [`Envelope::map`] for conversions that can fail, with access to
    /// the pagination block.
    pub fn and_then<U>(
        self,
        f: impl FnOnce(T, Option<Pagination>) -> Result<U, ClientError>,
    ) -> Envelope<U> {
        match self {
            Self::Ok { data, pagination } => match f(data, pagination.clone()) {
                Ok(data) => Envelope::Ok { data, pagination },
                Err(e) => Envelope::Err(e),
            },
            Self::Err(e) => Envelope::Err(e),
        }
    }

    pub fn into_result(self) -> Result<T, ClientError> {
        match self {
            Self::Ok { data, .. } => Ok(data),
            Self::Err(e) => Err(e),
        }
    }
}

impl Envelope<Value> {
    /// Deserialize the payload into a concrete type.
    pub fn decode<T: DeserializeOwned>(self) -> Envelope<T> {
        self.and_then(|data, _| {
            serde_json::from_value(data)
                .map_err(|e| ClientError::Decode(e.to_string()))
        })
    }

    /// Deserialize the payload, ignoring its contents. For endpoints whose
    /// only interesting outcome is success or failure.
    pub fn discard(self) -> Envelope<()> {
        self.map(|_| ())
    }
}

impl<T> From<ClientError> for Envelope<T> {
    fn from(e: ClientError) -> Self {
        Self::Err(e)
    }
}

/// Turn a raw HTTP status and body into an envelope.
///
/// Error statuses take their message from the body's `message`, `error` or
/// `detail` field, falling back to `HTTP {code}: {reason}`. Successful
/// statuses are treated as success unless the body says `success: false`,
/// and the payload is `body.data` when present, otherwise the whole body.
pub fn normalize(status: StatusCode, body: &str) -> Envelope<Value> {
    let parsed = if body.trim().is_empty() {
        Ok(Value::Null)
    } else {
        serde_json::from_str::<Value>(body)
    };

    if !status.is_success() {
        let message = parsed
            .ok()
            .as_ref()
            .and_then(extract_message)
            .unwrap_or_else(|| {
                format!(
                    "HTTP {}: {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown Status")
                )
            });
        return Envelope::Err(ClientError::Api { status, message });
    }

    let mut body = match parsed {
        Ok(body) => body,
        Err(e) => return Envelope::Err(ClientError::Decode(e.to_string())),
    };

    if body.get("success").and_then(Value::as_bool) == Some(false) {
        let message = extract_message(&body)
            .unwrap_or_else(|| "Request failed".to_string());
        return Envelope::Err(ClientError::Rejected(message));
    }

    let pagination = body
        .get("pagination")
        .cloned()
        .and_then(|p| serde_json::from_value::<Pagination>(p).ok());

    let data = match body.get_mut("data") {
        Some(data) if !data.is_null() => data.take(),
        _ => body,
    };

    Envelope::Ok { data, pagination }
}

fn extract_message(body: &Value) -> Option<String> {
    ["message", "error", "detail"].iter().find_map(|key| {
        body.get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
    })
}
