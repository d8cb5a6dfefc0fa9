use jiff::Timestamp;
use payloads::{Order, OrderId, OrderItem, OrderStatus, ProductId, StoreId};
use rust_decimal::Decimal;

use super::listing::{self, ListParams, Page};
use super::{Backend, StoreError, non_empty};

/// Seed input for an order. Unit prices are taken from the products.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_name: String,
    pub store_id: StoreId,
    pub items: Vec<(ProductId, i64)>,
    pub status: OrderStatus,
}

impl Backend {
    pub fn add_order(&self, details: NewOrder) -> Result<Order, StoreError> {
        let customer_name = non_empty("customerName", &details.customer_name)?.to_string();
        let mut data = self.lock();
        let store_name = data
            .stores
            .get(&details.store_id)
            .map(|s| s.name.clone())
            .ok_or(StoreError::StoreNotFound)?;
        let items = details
            .items
            .iter()
            .map(|(product_id, quantity)| {
                let product = data
                    .products
                    .get(product_id)
                    .ok_or(StoreError::ProductNotFound)?;
                if *quantity < 0 {
                    return Err(StoreError::NegativeQuantity);
                }
                Ok(OrderItem {
                    product_id: *product_id,
                    product_name: Some(product.name.clone()),
                    quantity: *quantity,
                    unit_price: product.price,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let total_amount = items
            .iter()
            .map(|item| item.unit_price * Decimal::from(item.quantity))
            .sum();
        let id = OrderId(data.next_id());
        let order = Order {
            id,
            order_code: Some(format!("FS{:06}", id.0)),
            customer_name: Some(customer_name),
            store_id: Some(details.store_id),
            store_name: Some(store_name),
            items,
            total_amount,
            status: details.status,
            created_at: Some(Timestamp::now()),
            extra: Default::default(),
        };
        data.orders.insert(id, order.clone());
        Ok(order)
    }

    pub fn list_orders(&self, params: &ListParams) -> Page<Order> {
        let rows = self.lock().orders.values().cloned().collect();
        listing::paginate(rows, params)
    }

    pub fn get_order(&self, order_id: OrderId) -> Result<Order, StoreError> {
        self.lock()
            .orders
            .get(&order_id)
            .cloned()
            .ok_or(StoreError::OrderNotFound)
    }

    /// Completed and cancelled orders are final.
    pub fn update_order_status(
        &self,
        order_id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, StoreError> {
        if status == OrderStatus::Unknown {
            return Err(StoreError::UnknownStatus);
        }
        let mut data = self.lock();
        let order = data.orders.get_mut(&order_id).ok_or(StoreError::OrderNotFound)?;
        if order.status.is_terminal() {
            return Err(StoreError::OrderClosed(order.status.as_str()));
        }
        order.status = status;
        Ok(order.clone())
    }
}
