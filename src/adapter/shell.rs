// src/adapter/shell.rs
// Ordering shell: owns the three containers and tells the outer UI where to go

use std::sync::Arc;

use crate::application::dto::ApplicationError;
use crate::application::usecase::{CartLedger, MenuCatalog, OrderLifecycle};
use crate::config::ApiConfig;
use crate::domain::errors::AppResult;
use crate::domain::repository::{MenuRepository, OrderRepository};
use crate::infrastructure::HttpBackend;

/// Navigation targets handed back to whatever renders the screens
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Cart,
    OrderHistory,
    Confirmation(String),
}

pub struct OrderingShell {
    catalog: MenuCatalog,
    cart: CartLedger,
    orders: OrderLifecycle,
}

impl OrderingShell {
    pub fn new(menu: Arc<dyn MenuRepository>, orders: Arc<dyn OrderRepository>) -> Self {
        let cart = CartLedger::new();
        Self {
            catalog: MenuCatalog::new(menu),
            orders: OrderLifecycle::new(orders, cart.clone()),
            cart,
        }
    }

    /// Wires every container to the REST backend at `config.base_url`
    pub fn connect(config: &ApiConfig) -> AppResult<Self> {
        let backend = Arc::new(HttpBackend::new(config)?);
        log::info!("Using backend at {}", backend.base_url());
        Ok(Self::new(backend.clone(), backend))
    }

    pub fn catalog(&self) -> &MenuCatalog {
        &self.catalog
    }

    pub fn cart(&self) -> &CartLedger {
        &self.cart
    }

    pub fn orders(&self) -> &OrderLifecycle {
        &self.orders
    }

    /// Entering the menu triggers the one catalog fetch.
    pub async fn open_menu(&self) -> Result<Screen, ApplicationError> {
        self.catalog.load_if_idle().await?;
        Ok(Screen::Menu)
    }

    /// Adds one unit of a catalog item and returns the acknowledgement text.
    pub async fn add_to_cart(&self, item_id: &str) -> Result<String, ApplicationError> {
        let item = self
            .catalog
            .catalog()
            .await
            .and_then(|catalog| catalog.find_item(item_id).cloned())
            .ok_or_else(|| ApplicationError::UnknownItem(item_id.to_string()))?;

        self.cart.add_item(&item).await;
        Ok(format!("You Grabbed {}", item.name))
    }

    /// Submits the checkout form. On success the UI moves to the
    /// confirmation keyed by the new order; on error it stays on the cart.
    pub async fn checkout(&self) -> Result<Screen, ApplicationError> {
        let order = self.orders.submit().await?;
        Ok(Screen::Confirmation(order.id))
    }

    pub async fn find_orders(&self, phone_number: &str) -> Result<Screen, ApplicationError> {
        self.orders.query_history(phone_number).await?;
        Ok(Screen::OrderHistory)
    }
}
