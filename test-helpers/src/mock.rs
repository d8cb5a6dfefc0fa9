//! Development data for the FoodShare dashboards
//!
//! Used by the dev-server crate and by integration tests that need more
//! than a handful of rows:
//! - three stores in different lifecycle states
//! - enough surplus-food products to page through (two pages at the
//!   default size), with a mix of statuses and discounts
//! - orders in every status, including final ones
//! - a seller account next to the admin

use anyhow::Result;
use mock_api::store::{NewOrder, NewProduct, NewStore};
use payloads::requests::CreateUser;
use payloads::{
    Order, OrderStatus, Product, ProductStatus, Role, Store, StoreStatus, User,
};
use rust_decimal::Decimal;

use crate::TestApp;

pub struct DevDataset {
    pub stores: Vec<Store>,
    pub products: Vec<Product>,
    pub orders: Vec<Order>,
    pub seller: User,
}

/// (name, category, price, original price, status)
const MENU: &[(&str, &str, i64, i64, ProductStatus)] = &[
    ("Bánh mì thịt", "Bakery", 12_000, 25_000, ProductStatus::Active),
    ("Bánh bao", "Bakery", 8_000, 15_000, ProductStatus::Active),
    ("Croissant bơ", "Bakery", 15_000, 35_000, ProductStatus::Active),
    ("Phở bò", "Noodles", 30_000, 55_000, ProductStatus::Active),
    ("Bún chả", "Noodles", 28_000, 50_000, ProductStatus::OutOfStock),
    ("Mì Quảng", "Noodles", 25_000, 45_000, ProductStatus::Active),
    ("Cơm tấm sườn", "Rice", 27_000, 45_000, ProductStatus::Active),
    ("Cơm gà Hội An", "Rice", 26_000, 45_000, ProductStatus::Inactive),
    ("Xôi gà", "Rice", 12_000, 20_000, ProductStatus::Active),
    ("Gỏi cuốn", "Snacks", 10_000, 18_000, ProductStatus::Active),
    ("Chè ba màu", "Desserts", 9_000, 18_000, ProductStatus::Active),
    ("Bánh flan", "Desserts", 7_000, 12_000, ProductStatus::OutOfStock),
    ("Sữa chua nếp cẩm", "Desserts", 8_000, 15_000, ProductStatus::Active),
    ("Pizza hải sản", "Western", 60_000, 150_000, ProductStatus::Active),
    ("Pizza phô mai", "Western", 55_000, 130_000, ProductStatus::Active),
    ("Salad gà", "Western", 35_000, 70_000, ProductStatus::Inactive),
];

impl DevDataset {
    pub async fn create(app: &TestApp) -> Result<Self> {
        tracing::info!("🏪 Creating stores");
        let store_details = [
            ("Bếp Nhà Lan", "45 Hàng Bạc, Hà Nội", StoreStatus::Active),
            ("Tiệm Bánh Mai", "102 Lê Lợi, TP.HCM", StoreStatus::Active),
            ("Pizza Góc Phố", "8 Trần Phú, Đà Nẵng", StoreStatus::Pending),
        ];
        let stores = store_details
            .into_iter()
            .map(|(name, address, status)| {
                app.backend.add_store(NewStore {
                    name: name.into(),
                    address: Some(address.into()),
                    phone: None,
                    owner_id: None,
                    status,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        tracing::info!("🍜 Creating {} products", MENU.len());
        let products = MENU
            .iter()
            .enumerate()
            .map(|(i, (name, category, price, original, status))| {
                app.backend.add_product(NewProduct {
                    name: name.to_string(),
                    price: Decimal::from(*price),
                    original_price: Some(Decimal::from(*original)),
                    quantity: if *status == ProductStatus::OutOfStock { 0 } else { 4 },
                    status: *status,
                    store_id: stores[i % stores.len()].id,
                    category: Some(category.to_string()),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        tracing::info!("🧾 Creating orders");
        let customers = ["Minh", "Hương", "Tuấn", "Linh", "Quang", "Thảo"];
        let orders = OrderStatus::ALL
            .iter()
            .zip(customers)
            .enumerate()
            .map(|(i, (status, customer))| {
                let product = &products[i % products.len()];
                app.backend.add_order(NewOrder {
                    customer_name: customer.into(),
                    store_id: product.store_id.unwrap_or(stores[0].id),
                    items: vec![(product.id, 1 + i as i64 % 3)],
                    status: *status,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        tracing::info!("👤 Creating seller account");
        let seller = app.backend.create_user(&CreateUser {
            name: "Nguyễn Thị Lan".into(),
            email: "lan@foodshare.vn".into(),
            password: "seller123".into(),
            role: Role::Seller,
            phone: Some("0912345678".into()),
        })?;

        Ok(Self {
            stores,
            products,
            orders,
            seller,
        })
    }

    pub fn print_summary(&self) {
        tracing::info!("📋 Available test data:");
        for store in &self.stores {
            let count = self
                .products
                .iter()
                .filter(|p| p.store_id == Some(store.id))
                .count();
            tracing::info!(
                "   🏪 {} ({}) {:?}: {count} products",
                store.name,
                store.id,
                store.status
            );
        }
        tracing::info!("   🧾 {} orders, one per status", self.orders.len());
        tracing::info!(
            "   👤 Seller: {} (password: seller123)",
            self.seller.email
        );
    }
}
