// src/domain/mod.rs
pub mod cart;
pub mod errors;
pub mod models;
pub mod repository;
pub mod validation;

// Re-export common types for convenience
pub use cart::Cart;
pub use errors::{AppError, AppResult, BackendError, BackendResult};
pub use models::{
    CartLine, Catalog, MenuCategory, MenuItem, NutritionInfo, OrderDraft, OrderItem, OrderStatus,
    PlacedOrder, StatusTone,
};
pub use validation::{CheckoutForm, FieldError, FormField, ValidatedCheckout, ValidationErrors};
