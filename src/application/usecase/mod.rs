pub mod cart_usecase;
pub mod menu_usecase;
pub mod order_usecase;

#[cfg(test)]
pub(crate) mod testing;

// Re-export public API
pub use cart_usecase::CartLedger;
pub use menu_usecase::MenuCatalog;
pub use order_usecase::{HistoryOutcome, OrderLifecycle};
