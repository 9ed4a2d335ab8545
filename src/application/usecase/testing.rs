// src/application/usecase/testing.rs
// In-memory backend for use-case tests

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use crate::domain::errors::{BackendError, BackendResult};
use crate::domain::models::{
    Catalog, MenuCategory, MenuItem, OrderDraft, OrderStatus, PlacedOrder,
};
use crate::domain::repository::{MenuRepository, OrderRepository};

pub fn menu_item(id: &str, name: &str, price: Decimal) -> MenuItem {
    MenuItem {
        id: id.to_string(),
        name: name.to_string(),
        price,
        description: None,
        image_url: None,
        nutrition: None,
    }
}

pub fn sample_catalog() -> Catalog {
    use rust_decimal_macros::dec;

    Catalog::new(vec![
        MenuCategory {
            name: "Breakfast".into(),
            items: vec![
                menu_item("x", "Masala Dosa", dec!(100)),
                menu_item("y", "Idli", dec!(60)),
            ],
        },
        MenuCategory {
            name: "Drinks".into(),
            items: vec![menu_item("z", "Filter Coffee", dec!(30))],
        },
    ])
}

pub fn placed_from(id: &str, draft: &OrderDraft) -> PlacedOrder {
    PlacedOrder {
        id: id.to_string(),
        customer_name: draft.customer_name.clone(),
        phone_number: draft.phone_number.clone(),
        notes: draft.notes.clone(),
        items: draft.items.clone(),
        total_amount: draft.total_amount,
        status: OrderStatus::Pending,
        created_at: None,
    }
}

/// Scripted backend. Responses are consumed in order; when a script runs
/// dry the backend answers with a default success.
#[derive(Default)]
pub struct FakeBackend {
    catalog: Mutex<VecDeque<BackendResult<Catalog>>>,
    placements: Mutex<VecDeque<BackendResult<()>>>,
    histories: Mutex<VecDeque<BackendResult<Vec<PlacedOrder>>>>,
    drafts: Mutex<Vec<OrderDraft>>,
    phones: Mutex<Vec<String>>,
    catalog_calls: AtomicUsize,
    catalog_gate: Mutex<Option<Arc<Notify>>>,
    placement_gate: Mutex<Option<Arc<Notify>>>,
    history_gate: Mutex<Option<Arc<Notify>>>,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_catalog(&self, result: BackendResult<Catalog>) {
        self.catalog.lock().unwrap().push_back(result);
    }

    pub fn push_placement(&self, result: BackendResult<()>) {
        self.placements.lock().unwrap().push_back(result);
    }

    pub fn push_history(&self, result: BackendResult<Vec<PlacedOrder>>) {
        self.histories.lock().unwrap().push_back(result);
    }

    /// Holds every following catalog fetch until the returned notify fires
    pub fn hold_catalog(&self) -> Arc<Notify> {
        hold(&self.catalog_gate)
    }

    /// Holds every following order placement until the returned notify fires
    pub fn hold_placements(&self) -> Arc<Notify> {
        hold(&self.placement_gate)
    }

    /// Holds every following history lookup until the returned notify fires
    pub fn hold_histories(&self) -> Arc<Notify> {
        hold(&self.history_gate)
    }

    pub fn catalog_calls(&self) -> usize {
        self.catalog_calls.load(Ordering::SeqCst)
    }

    pub fn drafts(&self) -> Vec<OrderDraft> {
        self.drafts.lock().unwrap().clone()
    }

    pub fn phones(&self) -> Vec<String> {
        self.phones.lock().unwrap().clone()
    }
}

#[async_trait]
impl MenuRepository for FakeBackend {
    async fn fetch_catalog(&self) -> BackendResult<Catalog> {
        self.catalog_calls.fetch_add(1, Ordering::SeqCst);
        pass(&self.catalog_gate).await;
        let scripted = self.catalog.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| Ok(sample_catalog()))
    }
}

#[async_trait]
impl OrderRepository for FakeBackend {
    async fn place_order(&self, draft: &OrderDraft) -> BackendResult<PlacedOrder> {
        let number = {
            let mut drafts = self.drafts.lock().unwrap();
            drafts.push(draft.clone());
            drafts.len()
        };

        pass(&self.placement_gate).await;

        let scripted = self.placements.lock().unwrap().pop_front();
        match scripted {
            Some(Err(e)) => Err(e),
            _ => Ok(placed_from(&format!("order-{}", number), draft)),
        }
    }

    async fn orders_for_phone(&self, phone_number: &str) -> BackendResult<Vec<PlacedOrder>> {
        self.phones.lock().unwrap().push(phone_number.to_string());
        pass(&self.history_gate).await;
        let scripted = self.histories.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| Ok(Vec::new()))
    }
}

fn hold(gate: &Mutex<Option<Arc<Notify>>>) -> Arc<Notify> {
    let notify = Arc::new(Notify::new());
    *gate.lock().unwrap() = Some(notify.clone());
    notify
}

async fn pass(gate: &Mutex<Option<Arc<Notify>>>) {
    let notify = gate.lock().unwrap().clone();
    if let Some(notify) = notify {
        notify.notified().await;
    }
}

pub fn unreachable_backend() -> BackendError {
    BackendError::Connection("connection refused".into())
}
