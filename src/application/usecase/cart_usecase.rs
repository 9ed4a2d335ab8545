// src/application/usecase/cart_usecase.rs
// Shared handle over the customer's cart

use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::cart::Cart;
use crate::domain::models::{CartLine, MenuItem};

/// Cheap to clone; every clone sees the same cart.
#[derive(Debug, Clone, Default)]
pub struct CartLedger {
    cart: Arc<RwLock<Cart>>,
}

impl CartLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_item(&self, item: &MenuItem) -> CartLine {
        let mut cart = self.cart.write().await;
        let line = cart.add_item(item).clone();
        log::debug!(
            "Cart: {} x{} (total {})",
            line.id,
            line.quantity,
            cart.total()
        );
        line
    }

    pub async fn update_quantity(&self, id: &str, quantity: i64) {
        let mut cart = self.cart.write().await;
        if cart.line(id).is_none() {
            log::debug!("Cart: ignoring quantity change for missing line {}", id);
            return;
        }
        cart.update_quantity(id, quantity);
        log::debug!("Cart: {} set to {} (total {})", id, quantity, cart.total());
    }

    pub async fn remove_item(&self, id: &str) {
        let mut cart = self.cart.write().await;
        cart.remove_item(id);
        log::debug!("Cart: removed {} (total {})", id, cart.total());
    }

    pub async fn clear(&self) {
        self.cart.write().await.clear();
        log::debug!("Cart: cleared");
    }

    /// Takes a placed order's lines out of the cart
    pub async fn settle(&self, submitted: &[CartLine]) {
        let mut cart = self.cart.write().await;
        cart.settle(submitted);
        if !cart.is_empty() {
            log::info!(
                "Cart changed while the order was placed; {} line(s) kept",
                cart.lines().len()
            );
        }
    }

    pub async fn snapshot(&self) -> Cart {
        self.cart.read().await.clone()
    }

    pub async fn lines(&self) -> Vec<CartLine> {
        self.cart.read().await.lines().to_vec()
    }

    pub async fn total(&self) -> Decimal {
        self.cart.read().await.total()
    }

    pub async fn item_count(&self) -> u32 {
        self.cart.read().await.item_count()
    }

    pub async fn is_empty(&self) -> bool {
        self.cart.read().await.is_empty()
    }
}
