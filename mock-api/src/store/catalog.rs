use jiff::Timestamp;
use payloads::requests::{UpdateProduct, UpdateStore};
use payloads::{Product, ProductId, ProductStatus, Store, StoreId, StoreStatus, UserId};
use rust_decimal::Decimal;

use super::listing::{self, ListParams, Page};
use super::{Backend, StoreError, non_empty};

/// Seed input for a store.
#[derive(Debug, Clone)]
pub struct NewStore {
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub owner_id: Option<UserId>,
    pub status: StoreStatus,
}

/// Seed input for a product. The store name is copied from `store_id`.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub price: Decimal,
    pub original_price: Option<Decimal>,
    pub quantity: i64,
    pub status: ProductStatus,
    pub store_id: StoreId,
    pub category: Option<String>,
}

impl Backend {
    pub fn add_store(&self, details: NewStore) -> Result<Store, StoreError> {
        let name = non_empty("name", &details.name)?.to_string();
        let mut data = self.lock();
        let now = Timestamp::now();
        let store = Store {
            id: StoreId(data.next_id()),
            name,
            description: None,
            address: details.address,
            phone: details.phone,
            owner_id: details.owner_id,
            status: details.status,
            created_at: Some(now),
            updated_at: Some(now),
            extra: Default::default(),
        };
        data.stores.insert(store.id, store.clone());
        Ok(store)
    }

    pub fn list_stores(&self, params: &ListParams) -> Page<Store> {
        let rows = self.lock().stores.values().cloned().collect();
        listing::paginate(rows, params)
    }

    pub fn get_store(&self, store_id: StoreId) -> Result<Store, StoreError> {
        self.lock()
            .stores
            .get(&store_id)
            .cloned()
            .ok_or(StoreError::StoreNotFound)
    }

    pub fn update_store(
        &self,
        store_id: StoreId,
        details: &UpdateStore,
    ) -> Result<Store, StoreError> {
        let mut data = self.lock();
        let store = data.stores.get_mut(&store_id).ok_or(StoreError::StoreNotFound)?;
        if let Some(name) = &details.name {
            store.name = non_empty("name", name)?.to_string();
        }
        if let Some(description) = &details.description {
            store.description = Some(description.clone());
        }
        if let Some(address) = &details.address {
            store.address = Some(address.clone());
        }
        if let Some(phone) = &details.phone {
            store.phone = Some(phone.clone());
        }
        store.updated_at = Some(Timestamp::now());
        let store = store.clone();
        // keep the denormalised name on products in step
        for product in data.products.values_mut() {
            if product.store_id == Some(store_id) {
                product.store_name = Some(store.name.clone());
            }
        }
        Ok(store)
    }

    pub fn update_store_status(
        &self,
        store_id: StoreId,
        status: StoreStatus,
    ) -> Result<Store, StoreError> {
        if status == StoreStatus::Unknown {
            return Err(StoreError::UnknownStatus);
        }
        let mut data = self.lock();
        let store = data.stores.get_mut(&store_id).ok_or(StoreError::StoreNotFound)?;
        store.status = status;
        store.updated_at = Some(Timestamp::now());
        Ok(store.clone())
    }

    /// Remove a store together with its products.
    pub fn delete_store(&self, store_id: StoreId) -> Result<(), StoreError> {
        let mut data = self.lock();
        data.stores.remove(&store_id).ok_or(StoreError::StoreNotFound)?;
        data.products.retain(|_, p| p.store_id != Some(store_id));
        Ok(())
    }

    pub fn add_product(&self, details: NewProduct) -> Result<Product, StoreError> {
        let name = non_empty("name", &details.name)?.to_string();
        if details.price.is_sign_negative() {
            return Err(StoreError::NegativePrice);
        }
        let mut data = self.lock();
        let store_name = data
            .stores
            .get(&details.store_id)
            .map(|s| s.name.clone())
            .ok_or(StoreError::StoreNotFound)?;
        let product = Product {
            id: ProductId(data.next_id()),
            name,
            description: None,
            price: details.price,
            original_price: details.original_price,
            quantity: details.quantity,
            status: details.status,
            store_id: Some(details.store_id),
            store_name: Some(store_name),
            category: details.category,
            image_urls: Vec::new(),
            expires_at: None,
            created_at: Some(Timestamp::now()),
            extra: Default::default(),
        };
        data.products.insert(product.id, product.clone());
        Ok(product)
    }

    pub fn list_products(&self, params: &ListParams) -> Page<Product> {
        let rows = self.lock().products.values().cloned().collect();
        listing::paginate(rows, params)
    }

    pub fn get_product(&self, product_id: ProductId) -> Result<Product, StoreError> {
        self.lock()
            .products
            .get(&product_id)
            .cloned()
            .ok_or(StoreError::ProductNotFound)
    }

    pub fn update_product(
        &self,
        product_id: ProductId,
        details: &UpdateProduct,
    ) -> Result<Product, StoreError> {
        if details.price.is_some_and(|p| p.is_sign_negative()) {
            return Err(StoreError::NegativePrice);
        }
        if details.quantity.is_some_and(|q| q < 0) {
            return Err(StoreError::NegativeQuantity);
        }
        let mut data = self.lock();
        let product = data
            .products
            .get_mut(&product_id)
            .ok_or(StoreError::ProductNotFound)?;
        if let Some(name) = &details.name {
            product.name = non_empty("name", name)?.to_string();
        }
        if let Some(description) = &details.description {
            product.description = Some(description.clone());
        }
        if let Some(price) = details.price {
            product.price = price;
        }
        if let Some(quantity) = details.quantity {
            product.quantity = quantity;
            if quantity == 0 && product.status == ProductStatus::Active {
                product.status = ProductStatus::OutOfStock;
            }
        }
        Ok(product.clone())
    }

    pub fn update_product_status(
        &self,
        product_id: ProductId,
        status: ProductStatus,
    ) -> Result<Product, StoreError> {
        if status == ProductStatus::Unknown {
            return Err(StoreError::UnknownStatus);
        }
        let mut data = self.lock();
        let product = data
            .products
            .get_mut(&product_id)
            .ok_or(StoreError::ProductNotFound)?;
        product.status = status;
        Ok(product.clone())
    }

    pub fn delete_product(&self, product_id: ProductId) -> Result<(), StoreError> {
        self.lock()
            .products
            .remove(&product_id)
            .map(|_| ())
            .ok_or(StoreError::ProductNotFound)
    }
}
