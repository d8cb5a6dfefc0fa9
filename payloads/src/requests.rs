use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{OrderStatus, ProductStatus, Role, StoreStatus};

pub const PAGE_SIZE_MAX: u32 = 100;
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const DEFAULT_SORT_BY: &str = "createdAt";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStore {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProduct {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<rust_decimal::Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
}

/// Body of the `.../{id}/status` endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatus<S> {
    pub status: S,
}

pub type UpdateStoreStatus = UpdateStatus<StoreStatus>;
pub type UpdateProductStatus = UpdateStatus<ProductStatus>;
pub type UpdateOrderStatus = UpdateStatus<OrderStatus>;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

/// Filter criteria keyed by query parameter name.
///
/// The same type holds both the user's unsubmitted draft and the applied
/// set that is sent to the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filters(BTreeMap<String, String>);

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Filters::set`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The filters that actually narrow a query: blank values and values
    /// equal to their default are dropped.
    pub fn effective(&self, defaults: &Filters) -> Filters {
        self.iter()
            .filter(|(key, value)| {
                !value.trim().is_empty() && defaults.get(key) != Some(*value)
            })
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Filters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    /// Parse a direction leniently; anything but `desc` sorts ascending.
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("desc") {
            Self::Desc
        } else {
            Self::Asc
        }
    }
}

/// Page, page size and sort order of a list request. Pages are 0-indexed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDescriptor {
    pub page: u32,
    pub size: u32,
    pub sort_by: String,
    pub sort_direction: SortDirection,
}

impl PageDescriptor {
    /// First page of `size` items. A zero size is bumped to one and sizes are
    /// capped at [`PAGE_SIZE_MAX`].
    pub fn new(size: u32) -> Self {
        Self {
            page: 0,
            size: size.clamp(1, PAGE_SIZE_MAX),
            sort_by: DEFAULT_SORT_BY.to_string(),
            sort_direction: SortDirection::Desc,
        }
    }

    pub fn with_sort(
        mut self,
        sort_by: impl Into<String>,
        sort_direction: SortDirection,
    ) -> Self {
        self.sort_by = sort_by.into();
        self.sort_direction = sort_direction;
        self
    }
}

impl Default for PageDescriptor {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

/// The canonical request for one page of a list: applied filters plus page
/// descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    pub filters: Filters,
    pub page: PageDescriptor,
}

impl ListQuery {
    pub fn new(filters: Filters, page: PageDescriptor) -> Self {
        Self { filters, page }
    }

    /// Query parameters in the order they are sent. Blank filter values are
    /// left out entirely rather than sent as `key=`.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = self
            .filters
            .iter()
            .filter(|(_, value)| !value.trim().is_empty())
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        pairs.push(("page".into(), self.page.page.to_string()));
        pairs.push(("size".into(), self.page.size.to_string()));
        if !self.page.sort_by.is_empty() {
            pairs.push(("sortBy".into(), self.page.sort_by.clone()));
            pairs.push((
                "sortDirection".into(),
                self.page.sort_direction.as_str().into(),
            ));
        }
        pairs
    }

    /// `key=value&...` with form-style percent encoding.
    pub fn to_query_string(&self) -> Result<String, serde_urlencoded::ser::Error> {
        serde_urlencoded::to_string(self.to_pairs())
    }
}
