// src/application/usecase/order_usecase.rs
// Checkout validation, order submission and order history lookup

use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::application::dto::{failure_message, ApplicationError};
use crate::application::state::{RequestSlot, RequestState, RequestStatus};
use crate::application::usecase::cart_usecase::CartLedger;
use crate::domain::models::{CartLine, OrderDraft, OrderItem, PlacedOrder};
use crate::domain::repository::OrderRepository;
use crate::domain::validation::{CheckoutForm, FormField, ValidatedCheckout, ValidationErrors};

pub const DEFAULT_SUBMIT_ERROR: &str = "Failed to place order. Please try again.";
pub const DEFAULT_HISTORY_ERROR: &str = "Failed to fetch order history. Please try again.";

/// What the history view should show
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryOutcome {
    NotQueried,
    Loading,
    Failed(String),
    NoOrders,
    Orders(Vec<PlacedOrder>),
}

#[derive(Debug, Default)]
struct CheckoutDesk {
    form: CheckoutForm,
    errors: ValidationErrors,
}

/// Owns the checkout form, the submit request and the history request.
///
/// Submit and history are tracked separately so a failed lookup never
/// shows up as a failed order, and vice versa.
pub struct OrderLifecycle {
    orders: Arc<dyn OrderRepository>,
    cart: CartLedger,
    desk: RwLock<CheckoutDesk>,
    submit: RequestSlot<String>,
    current_order: RwLock<Option<PlacedOrder>>,
    history: RequestSlot<Vec<PlacedOrder>>,
}

impl OrderLifecycle {
    pub fn new(orders: Arc<dyn OrderRepository>, cart: CartLedger) -> Self {
        Self {
            orders,
            cart,
            desk: RwLock::new(CheckoutDesk::default()),
            submit: RequestSlot::new(),
            current_order: RwLock::new(None),
            history: RequestSlot::new(),
        }
    }

    /// Updates one form field and clears only that field's errors
    pub async fn edit_field(&self, field: FormField, value: &str) {
        let mut desk = self.desk.write().await;
        desk.form.set(field, value);
        desk.errors.clear_field(field);
    }

    pub async fn set_notes(&self, notes: &str) {
        self.desk.write().await.form.notes = notes.to_string();
    }

    pub async fn form(&self) -> CheckoutForm {
        self.desk.read().await.form.clone()
    }

    pub async fn field_errors(&self) -> ValidationErrors {
        self.desk.read().await.errors.clone()
    }

    /// Validates the form and, if it passes, places an order for the
    /// current cart contents.
    ///
    /// The cart is read once, before the request; that snapshot is what
    /// gets ordered. On success exactly the snapshot is taken out of the
    /// cart. On failure the cart is left alone.
    pub async fn submit(&self) -> Result<PlacedOrder, ApplicationError> {
        let checkout = self.validate_form().await?;

        let snapshot = self.cart.snapshot().await;
        if snapshot.is_empty() {
            log::warn!("Refusing to submit an empty cart");
            return Err(ApplicationError::EmptyCart);
        }

        let request = match self.submit.begin() {
            Ok(request) => request,
            Err(_) => {
                log::warn!("Order submission already in flight; ignoring second submit");
                return Err(ApplicationError::SubmitInFlight);
            }
        };

        let draft = build_draft(checkout, snapshot.lines(), snapshot.total());
        log::info!(
            "Placing order: {} item(s), total {}",
            draft.items.len(),
            draft.total_amount
        );

        match self.orders.place_order(&draft).await {
            Ok(order) => {
                self.cart.settle(snapshot.lines()).await;
                *self.current_order.write().await = Some(order.clone());
                request.succeed(order.id.clone())?;
                log::info!("Order {} placed", order.id);
                Ok(order)
            }
            Err(e) => {
                let message = failure_message(&e, DEFAULT_SUBMIT_ERROR);
                log::error!("Failed to place order: {}", e);
                request.fail(message)?;
                Err(ApplicationError::Backend(e))
            }
        }
    }

    /// Looks up past orders. The phone number is sent exactly as given.
    pub async fn query_history(&self, phone_number: &str) -> Result<usize, ApplicationError> {
        let request = match self.history.begin() {
            Ok(request) => request,
            Err(_) => {
                log::warn!("Order history lookup already in flight");
                return Err(ApplicationError::HistoryInFlight);
            }
        };

        log::info!("Fetching order history");
        match self.orders.orders_for_phone(phone_number).await {
            Ok(orders) => {
                let count = orders.len();
                log::info!("Order history: {} order(s)", count);
                request.succeed(orders)?;
                Ok(count)
            }
            Err(e) => {
                let message = failure_message(&e, DEFAULT_HISTORY_ERROR);
                log::error!("Failed to fetch order history: {}", e);
                request.fail(message)?;
                Err(ApplicationError::Backend(e))
            }
        }
    }

    pub async fn submit_state(&self) -> RequestState<String> {
        self.submit.snapshot()
    }

    pub async fn submit_status(&self) -> RequestStatus {
        self.submit.status()
    }

    pub async fn submit_error(&self) -> Option<String> {
        self.submit.error()
    }

    pub async fn current_order(&self) -> Option<PlacedOrder> {
        self.current_order.read().await.clone()
    }

    /// The current order, if it is the one the confirmation view is keyed by
    pub async fn confirmation(&self, order_id: &str) -> Option<PlacedOrder> {
        self.current_order
            .read()
            .await
            .as_ref()
            .filter(|order| order.id == order_id)
            .cloned()
    }

    pub async fn clear_current_order(&self) {
        *self.current_order.write().await = None;
    }

    pub async fn history_state(&self) -> RequestState<Vec<PlacedOrder>> {
        self.history.snapshot()
    }

    pub async fn history_outcome(&self) -> HistoryOutcome {
        self.history.inspect(|state| match state {
            RequestState::Idle => HistoryOutcome::NotQueried,
            RequestState::Loading => HistoryOutcome::Loading,
            RequestState::Failed(message) => HistoryOutcome::Failed(message.clone()),
            RequestState::Succeeded(orders) if orders.is_empty() => HistoryOutcome::NoOrders,
            RequestState::Succeeded(orders) => HistoryOutcome::Orders(orders.clone()),
        })
    }

    async fn validate_form(&self) -> Result<ValidatedCheckout, ApplicationError> {
        let mut desk = self.desk.write().await;
        match desk.form.validate() {
            Ok(checkout) => {
                desk.errors = ValidationErrors::new();
                Ok(checkout)
            }
            Err(errors) => {
                log::debug!("Checkout form rejected: {}", errors);
                desk.errors = errors.clone();
                Err(ApplicationError::Validation(errors))
            }
        }
    }
}

fn build_draft(
    checkout: ValidatedCheckout,
    lines: &[CartLine],
    total: Decimal,
) -> OrderDraft {
    OrderDraft {
        customer_name: checkout.customer_name,
        phone_number: checkout.phone_number,
        notes: checkout.notes,
        items: lines.iter().map(OrderItem::from).collect(),
        total_amount: total,
    }
}
