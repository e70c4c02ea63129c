use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::service_order_repository::{now, ServiceOrderRepository, CART_EXISTS};
use crate::core::{AppError, Result};
use crate::modules::service_orders::models::{
    ServiceOrder, ServiceOrderChanges, ServiceOrderState,
};

/// Process-local store with the same ownership and cart rules as the MySQL one
#[derive(Debug, Default)]
pub struct InMemoryServiceOrderRepository {
    inner: RwLock<Store>,
}

#[derive(Debug, Default)]
struct Store {
    last_id: i64,
    orders: BTreeMap<i64, ServiceOrder>,
}

impl Store {
    fn has_other_cart(&self, owner_id: i64, except: Option<i64>) -> bool {
        self.orders
            .values()
            .any(|o| o.user_id == owner_id && o.is_cart() && Some(o.id) != except)
    }
}

impl InMemoryServiceOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ServiceOrderRepository for InMemoryServiceOrderRepository {
    async fn create(
        &self,
        owner_id: i64,
        name: &str,
        state: ServiceOrderState,
    ) -> Result<ServiceOrder> {
        let mut store = self.inner.write().await;

        if state == ServiceOrderState::Cart && store.has_other_cart(owner_id, None) {
            return Err(AppError::validation(CART_EXISTS));
        }

        store.last_id += 1;
        let created_at = now();
        let order = ServiceOrder {
            id: store.last_id,
            name: name.to_string(),
            state,
            user_id: owner_id,
            placed_at: None,
            created_at,
            updated_at: created_at,
        };
        store.orders.insert(order.id, order.clone());

        Ok(order)
    }

    async fn find_by_id(&self, owner_id: i64, id: i64) -> Result<Option<ServiceOrder>> {
        let store = self.inner.read().await;
        Ok(store
            .orders
            .get(&id)
            .filter(|o| o.user_id == owner_id)
            .cloned())
    }

    async fn find_cart(&self, owner_id: i64) -> Result<Option<ServiceOrder>> {
        let store = self.inner.read().await;
        Ok(store
            .orders
            .values()
            .find(|o| o.user_id == owner_id && o.is_cart())
            .cloned())
    }

    async fn list(&self, owner_id: i64, limit: i64, offset: i64) -> Result<Vec<ServiceOrder>> {
        let store = self.inner.read().await;
        Ok(store
            .orders
            .values()
            .filter(|o| o.user_id == owner_id)
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn count_all(&self) -> Result<i64> {
        Ok(self.inner.read().await.orders.len() as i64)
    }

    async fn update(
        &self,
        owner_id: i64,
        id: i64,
        changes: &ServiceOrderChanges,
    ) -> Result<Option<ServiceOrder>> {
        let mut store = self.inner.write().await;

        if changes.state == Some(ServiceOrderState::Cart) && store.has_other_cart(owner_id, Some(id))
        {
            return Err(AppError::validation(CART_EXISTS));
        }

        let Some(order) = store
            .orders
            .get_mut(&id)
            .filter(|o| o.user_id == owner_id)
        else {
            return Ok(None);
        };

        let updated_at = now();
        if let Some(name) = &changes.name {
            order.name = name.clone();
        }
        if let Some(state) = changes.state {
            if state == ServiceOrderState::Ordered && !order.is_ordered() {
                order.placed_at = Some(updated_at);
            }
            order.state = state;
        }
        order.updated_at = updated_at;

        Ok(Some(order.clone()))
    }

    async fn delete(&self, owner_id: i64, id: i64) -> Result<bool> {
        let mut store = self.inner.write().await;

        let owned = store
            .orders
            .get(&id)
            .is_some_and(|o| o.user_id == owner_id);
        if owned {
            store.orders.remove(&id);
        }

        Ok(owned)
    }
}
