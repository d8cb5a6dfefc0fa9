use std::cmp::Ordering;

use payloads::requests::{DEFAULT_PAGE_SIZE, PAGE_SIZE_MAX};
use payloads::{Order, Product, SortDirection, Store, StoreId, User};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Query parameters accepted by every list route.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub search: Option<String>,
    pub status: Option<String>,
    pub role: Option<String>,
    pub store_id: Option<i64>,
    pub sort_by: Option<String>,
    pub sort_direction: Option<String>,
}

/// A Spring-style page, the shape the real backend returns.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u32,
    pub number: u32,
    pub size: u32,
    pub first: bool,
    pub last: bool,
}

/// Row filtering for a list route.
pub trait Listed {
    fn status(&self) -> &'static str;

    /// Case-insensitive match of the free-text `search` parameter.
    fn matches(&self, needle: &str) -> bool;

    fn store_id(&self) -> Option<StoreId> {
        None
    }
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

impl Listed for Store {
    fn status(&self) -> &'static str {
        self.status.as_str()
    }

    fn matches(&self, needle: &str) -> bool {
        contains(&self.name, needle)
            || self.address.as_deref().is_some_and(|a| contains(a, needle))
    }

    fn store_id(&self) -> Option<StoreId> {
        Some(self.id)
    }
}

impl Listed for Product {
    fn status(&self) -> &'static str {
        self.status.as_str()
    }

    fn matches(&self, needle: &str) -> bool {
        contains(&self.name, needle)
            || self.category.as_deref().is_some_and(|c| contains(c, needle))
            || self.store_name.as_deref().is_some_and(|s| contains(s, needle))
    }

    fn store_id(&self) -> Option<StoreId> {
        self.store_id
    }
}

impl Listed for Order {
    fn status(&self) -> &'static str {
        self.status.as_str()
    }

    fn matches(&self, needle: &str) -> bool {
        self.order_code.as_deref().is_some_and(|c| contains(c, needle))
            || self.customer_name.as_deref().is_some_and(|c| contains(c, needle))
    }

    fn store_id(&self) -> Option<StoreId> {
        self.store_id
    }
}

impl Listed for User {
    fn status(&self) -> &'static str {
        if self.active { "ACTIVE" } else { "INACTIVE" }
    }

    fn matches(&self, needle: &str) -> bool {
        contains(&self.name, needle) || contains(&self.email, needle)
    }
}

/// Filter, sort and slice `rows` the way the backend's list routes do.
///
/// Blank parameters are ignored. A page beyond the last one comes back with
/// empty content and the real totals.
pub fn paginate<T: Listed + Serialize>(rows: Vec<T>, params: &ListParams) -> Page<T> {
    let needle = non_blank(&params.search).map(str::to_lowercase);
    let status = non_blank(&params.status);
    let role = non_blank(&params.role);

    let mut rows: Vec<(Value, T)> = rows
        .into_iter()
        .filter(|row| needle.as_deref().is_none_or(|n| row.matches(n)))
        .filter(|row| status.is_none_or(|s| row.status().eq_ignore_ascii_case(s)))
        .filter(|row| {
            params.store_id.is_none_or(|id| row.store_id() == Some(StoreId(id)))
        })
        .map(|row| (serde_json::to_value(&row).unwrap_or(Value::Null), row))
        .filter(|(value, _)| {
            role.is_none_or(|r| {
                value.get("role").and_then(Value::as_str) == Some(r)
            })
        })
        .collect();

    if let Some(field) = non_blank(&params.sort_by) {
        let direction = params
            .sort_direction
            .as_deref()
            .map(SortDirection::parse)
            .unwrap_or_default();
        rows.sort_by(|(a, _), (b, _)| {
            let ordering = compare_field(a.get(field), b.get(field));
            match direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
    }

    let size = params.size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, PAGE_SIZE_MAX);
    let number = params.page.unwrap_or(0);
    let total_elements = rows.len() as u64;
    let total_pages = total_elements.div_ceil(u64::from(size)) as u32;
    let content = rows
        .into_iter()
        .skip(number as usize * size as usize)
        .take(size as usize)
        .map(|(_, row)| row)
        .collect();
    Page {
        content,
        total_elements,
        total_pages,
        number,
        size,
        first: number == 0,
        last: u64::from(number) + 1 >= u64::from(total_pages),
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Numbers compare numerically, decimal strings (prices) as decimals, other
/// strings case-insensitively. Missing values sort first.
fn compare_field(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => {
            match (x.parse::<Decimal>(), y.parse::<Decimal>()) {
                (Ok(x), Ok(y)) => x.cmp(&y),
                _ => x.to_lowercase().cmp(&y.to_lowercase()),
            }
        }
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        (None | Some(Value::Null), _) => Ordering::Less,
        (_, None | Some(Value::Null)) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use payloads::{ProductId, ProductStatus};
    use rust_decimal::dec;

    fn product(id: i64, name: &str, price: Decimal, status: ProductStatus) -> Product {
        Product {
            id: ProductId(id),
            name: name.into(),
            description: None,
            price,
            original_price: None,
            quantity: 1,
            status,
            store_id: Some(StoreId(1)),
            store_name: Some("Bếp Nhà Lan".into()),
            category: None,
            image_urls: Vec::new(),
            expires_at: None,
            created_at: None,
            extra: Default::default(),
        }
    }

    fn menu() -> Vec<Product> {
        vec![
            product(1, "Pizza slice", dec!(45000), ProductStatus::Active),
            product(2, "Phở bò", dec!(9000), ProductStatus::Active),
            product(3, "Pizza box", dec!(120000), ProductStatus::OutOfStock),
            product(4, "Bánh mì", dec!(15000), ProductStatus::Inactive),
        ]
    }

    #[test]
    fn filters_search_and_status() {
        let params = ListParams {
            search: Some("PIZZA".into()),
            status: Some("active".into()),
            ..Default::default()
        };
        let page = paginate(menu(), &params);
        assert_eq!(page.total_elements, 1);
        assert_eq!(page.content[0].id, ProductId(1));
    }

    #[test]
    fn sorts_prices_as_decimals() {
        let params = ListParams {
            sort_by: Some("price".into()),
            sort_direction: Some("desc".into()),
            ..Default::default()
        };
        let ids: Vec<i64> = paginate(menu(), &params)
            .content
            .iter()
            .map(|p| p.id.0)
            .collect();
        assert_eq!(ids, vec![3, 1, 4, 2]);
    }

    #[test]
    fn page_past_the_end_is_empty_with_real_totals() {
        let params = ListParams {
            page: Some(5),
            size: Some(3),
            ..Default::default()
        };
        let page = paginate(menu(), &params);
        assert!(page.content.is_empty());
        assert_eq!(page.total_elements, 4);
        assert_eq!(page.total_pages, 2);
        assert!(page.last);
    }

    #[test]
    fn blank_parameters_are_ignored() {
        let params = ListParams {
            search: Some("  ".into()),
            status: Some(String::new()),
            size: Some(0),
            ..Default::default()
        };
        let page = paginate(menu(), &params);
        assert_eq!(page.total_elements, 4);
        assert_eq!(page.size, 1);
        assert_eq!(page.total_pages, 4);
    }
}
