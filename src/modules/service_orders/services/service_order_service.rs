use std::sync::Arc;

use crate::config::AppConfig;
use crate::core::{AppError, Result};
use crate::modules::authorization::{Action, Authorizer, Granularity, Principal, ResourceType};
use crate::modules::service_orders::models::{
    name_problem, not_found, NewServiceOrder, OrderLookup, ResourceReference, ServiceOrder,
    ServiceOrderChanges, ServiceOrderEdit, ServiceOrderState,
};
use crate::modules::service_orders::repositories::{ServiceOrderRepository, CART_EXISTS};

/// A page of the caller's service orders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceOrderPage {
    /// Every service order in the store
    pub count: i64,
    /// The caller's orders on this page
    pub orders: Vec<ServiceOrder>,
}

/// Business rules for service orders
///
/// Each operation checks the caller's permission before touching the store and
/// passes the caller's user id to every store call. Bulk operations run item
/// by item; each entry of the returned vector is that item's own outcome.
pub struct ServiceOrderService {
    repository: Arc<dyn ServiceOrderRepository>,
    authorizer: Arc<dyn Authorizer>,
    settings: AppConfig,
}

impl ServiceOrderService {
    pub fn new(
        repository: Arc<dyn ServiceOrderRepository>,
        authorizer: Arc<dyn Authorizer>,
    ) -> Self {
        Self {
            repository,
            authorizer,
            settings: AppConfig::default(),
        }
    }

    pub fn with_settings(mut self, settings: AppConfig) -> Self {
        self.settings = settings;
        self
    }

    /// List the caller's orders alongside the store-wide count
    pub async fn list(
        &self,
        principal: &Principal,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<ServiceOrderPage> {
        self.authorize(principal, Action::Read, Granularity::Collection)?;

        let limit = self.settings.page_limit(limit);
        let offset = offset.unwrap_or(0).max(0);

        let count = self.repository.count_all().await?;
        let orders = self
            .repository
            .list(principal.user_id, limit, offset)
            .await?;

        Ok(ServiceOrderPage { count, orders })
    }

    /// Create a single order
    pub async fn create(&self, principal: &Principal, order: NewServiceOrder) -> Result<ServiceOrder> {
        self.authorize(principal, Action::Create, Granularity::Collection)?;
        self.create_for(principal.user_id, &order).await
    }

    /// Create several orders; an invalid item does not stop the others
    pub async fn create_many(
        &self,
        principal: &Principal,
        orders: Vec<NewServiceOrder>,
    ) -> Result<Vec<Result<ServiceOrder>>> {
        self.authorize(principal, Action::Create, Granularity::Collection)?;
        require_resources(&orders, "create")?;

        let mut results = Vec::with_capacity(orders.len());
        for order in &orders {
            results.push(self.create_for(principal.user_id, order).await);
        }
        Ok(results)
    }

    /// Read one order by id or through the cart alias
    ///
    /// `segment` is the raw path segment; it is only parsed once the caller
    /// is authorized.
    pub async fn get(&self, principal: &Principal, segment: &str) -> Result<ServiceOrder> {
        self.authorize(principal, Action::Read, Granularity::Resource)?;
        self.find(principal.user_id, segment.parse()?).await
    }

    pub async fn update(
        &self,
        principal: &Principal,
        segment: &str,
        changes: ServiceOrderChanges,
    ) -> Result<ServiceOrder> {
        self.authorize(principal, Action::Edit, Granularity::Resource)?;
        let current = self.find(principal.user_id, segment.parse()?).await?;
        self.update_for(principal.user_id, current, changes).await
    }

    pub async fn update_many(
        &self,
        principal: &Principal,
        edits: Vec<ServiceOrderEdit>,
    ) -> Result<Vec<Result<ServiceOrder>>> {
        self.authorize(principal, Action::Edit, Granularity::Collection)?;
        require_resources(&edits, "edit")?;

        let mut results = Vec::with_capacity(edits.len());
        for edit in &edits {
            let result = match edit.reference().resolve_id() {
                Ok(id) => match self.find(principal.user_id, OrderLookup::Id(id)).await {
                    Ok(current) => {
                        self.update_for(principal.user_id, current, edit.changes())
                            .await
                    }
                    Err(e) => Err(e),
                },
                Err(e) => Err(e),
            };
            results.push(result);
        }
        Ok(results)
    }

    /// Delete one order, returning its id
    pub async fn delete(&self, principal: &Principal, segment: &str) -> Result<i64> {
        self.authorize(principal, Action::Delete, Granularity::Resource)?;
        let lookup: OrderLookup = segment.parse()?;
        let id = match lookup {
            OrderLookup::Id(id) => id,
            OrderLookup::Cart => self.find(principal.user_id, lookup).await?.id,
        };
        self.delete_for(principal.user_id, id).await
    }

    pub async fn delete_many(
        &self,
        principal: &Principal,
        references: Vec<ResourceReference>,
    ) -> Result<Vec<Result<i64>>> {
        self.authorize(principal, Action::Delete, Granularity::Collection)?;
        require_resources(&references, "delete")?;

        let mut results = Vec::with_capacity(references.len());
        for reference in &references {
            let result = match reference.resolve_id() {
                Ok(id) => self.delete_for(principal.user_id, id).await,
                Err(e) => Err(e),
            };
            results.push(result);
        }
        Ok(results)
    }

    fn authorize(
        &self,
        principal: &Principal,
        action: Action,
        granularity: Granularity,
    ) -> Result<()> {
        self.authorizer
            .authorize(principal, ResourceType::ServiceOrders, action, granularity)
    }

    async fn find(&self, owner_id: i64, lookup: OrderLookup) -> Result<ServiceOrder> {
        let found = match lookup {
            OrderLookup::Id(id) => self.repository.find_by_id(owner_id, id).await?,
            OrderLookup::Cart => self.repository.find_cart(owner_id).await?,
        };
        found.ok_or_else(|| not_found(lookup))
    }

    async fn create_for(&self, owner_id: i64, order: &NewServiceOrder) -> Result<ServiceOrder> {
        let (name, state) = order.validate().inspect_err(|e| {
            tracing::warn!(user_id = owner_id, "Rejected service order: {}", e);
        })?;

        if state == ServiceOrderState::Cart && self.repository.find_cart(owner_id).await?.is_some()
        {
            tracing::warn!(user_id = owner_id, "Rejected second shopping cart");
            return Err(AppError::validation(format!(
                "Could not create the new service order - {}",
                CART_EXISTS
            )));
        }

        // the store enforces cart uniqueness too, for concurrent creates
        let created = self
            .repository
            .create(owner_id, &name, state)
            .await
            .map_err(|e| match e {
                AppError::Validation(reason) => AppError::validation(format!(
                    "Could not create the new service order - {}",
                    reason
                )),
                other => other,
            })?;

        tracing::info!(
            user_id = owner_id,
            order_id = created.id,
            state = %created.state,
            "Service order created"
        );

        Ok(created)
    }

    async fn update_for(
        &self,
        owner_id: i64,
        current: ServiceOrder,
        changes: ServiceOrderChanges,
    ) -> Result<ServiceOrder> {
        self.validate_changes(owner_id, &current, &changes).await?;

        if changes.is_empty() {
            return Ok(current);
        }

        let updated = self
            .repository
            .update(owner_id, current.id, &changes)
            .await
            .map_err(|e| match e {
                AppError::Validation(reason) => AppError::validation(format!(
                    "Could not update service order {} - {}",
                    current.id, reason
                )),
                other => other,
            })?
            .ok_or_else(|| not_found(current.id))?;

        tracing::info!(
            user_id = owner_id,
            order_id = updated.id,
            state = %updated.state,
            "Service order updated"
        );

        Ok(updated)
    }

    async fn validate_changes(
        &self,
        owner_id: i64,
        current: &ServiceOrder,
        changes: &ServiceOrderChanges,
    ) -> Result<()> {
        let failed = |reason: &str| {
            AppError::validation(format!(
                "Could not update service order {} - {}",
                current.id, reason
            ))
        };

        if let Some(reason) = changes.name.as_deref().and_then(name_problem) {
            return Err(failed(reason));
        }

        match changes.state {
            Some(state) if current.is_ordered() && state != ServiceOrderState::Ordered => {
                Err(failed("can't change the state of an ordered service order"))
            }
            Some(ServiceOrderState::Cart) if !current.is_cart() => {
                match self.repository.find_cart(owner_id).await? {
                    Some(cart) if cart.id != current.id => Err(failed(CART_EXISTS)),
                    _ => Ok(()),
                }
            }
            _ => Ok(()),
        }
    }

    async fn delete_for(&self, owner_id: i64, id: i64) -> Result<i64> {
        if !self.repository.delete(owner_id, id).await? {
            return Err(not_found(id));
        }

        tracing::info!(user_id = owner_id, order_id = id, "Service order deleted");
        Ok(id)
    }
}

fn require_resources<T>(items: &[T], action: &str) -> Result<()> {
    if items.is_empty() {
        return Err(AppError::validation(format!(
            "No resources specified for the {} action",
            action
        )));
    }
    Ok(())
}
