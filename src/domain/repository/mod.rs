// src/domain/repository/mod.rs
// Repository interfaces for the ordering backend

use async_trait::async_trait;

use crate::domain::errors::BackendResult;
use crate::domain::models::{Catalog, OrderDraft, PlacedOrder};

/// Read access to the menu catalog service
#[async_trait]
pub trait MenuRepository: Send + Sync {
    async fn fetch_catalog(&self) -> BackendResult<Catalog>;
}

/// Order placement and lookup
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn place_order(&self, draft: &OrderDraft) -> BackendResult<PlacedOrder>;

    /// `phone_number` is passed through exactly as the customer typed it.
    async fn orders_for_phone(&self, phone_number: &str) -> BackendResult<Vec<PlacedOrder>>;
}
