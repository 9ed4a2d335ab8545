// src/application/usecase/menu_usecase.rs
// Menu catalog cache

use std::sync::Arc;

use crate::application::dto::{failure_message, ApplicationError};
use crate::application::state::{RequestSlot, RequestState, RequestStatus};
use crate::domain::models::Catalog;
use crate::domain::repository::MenuRepository;

pub const DEFAULT_MENU_ERROR: &str = "Failed to load menu. Please try again.";

/// Holds the fetched catalog and the state of its single fetch.
///
/// A fetch is only ever issued from `idle`. Once the catalog has loaded or
/// failed it stays that way until `refresh` puts it back to `idle`.
#[derive(Clone)]
pub struct MenuCatalog {
    repository: Arc<dyn MenuRepository>,
    state: RequestSlot<Catalog>,
}

impl MenuCatalog {
    pub fn new(repository: Arc<dyn MenuRepository>) -> Self {
        Self {
            repository,
            state: RequestSlot::new(),
        }
    }

    /// Fetches the catalog if nothing has been attempted yet.
    /// Returns whether a request was issued.
    pub async fn load_if_idle(&self) -> Result<bool, ApplicationError> {
        let request = match self.state.begin_if_idle() {
            Some(request) => request,
            None => return Ok(false),
        };

        log::info!("Fetching menu catalog");
        match self.repository.fetch_catalog().await {
            Ok(catalog) => {
                log::info!("Menu loaded: {} categories", catalog.categories().len());
                request.succeed(catalog)?;
            }
            Err(e) => {
                log::error!("Failed to fetch menu: {}", e);
                request.fail(failure_message(&e, DEFAULT_MENU_ERROR))?;
            }
        }

        Ok(true)
    }

    /// Drops the current catalog (or failure) and fetches again.
    pub async fn refresh(&self) -> Result<bool, ApplicationError> {
        self.state.reset()?;
        self.load_if_idle().await
    }

    pub async fn state(&self) -> RequestState<Catalog> {
        self.state.snapshot()
    }

    pub async fn status(&self) -> RequestStatus {
        self.state.status()
    }

    pub async fn catalog(&self) -> Option<Catalog> {
        self.state.value()
    }

    pub async fn error(&self) -> Option<String> {
        self.state.error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::state::StateError;
    use crate::application::usecase::testing::{sample_catalog, unreachable_backend, FakeBackend};
    use crate::domain::errors::BackendError;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn test_fetches_once_from_idle() {
        let backend = FakeBackend::new();
        let menu = MenuCatalog::new(backend.clone());
        assert_eq!(menu.status().await, RequestStatus::Idle);

        assert!(menu.load_if_idle().await.unwrap());
        assert_eq!(menu.status().await, RequestStatus::Succeeded);
        assert_eq!(menu.catalog().await, Some(sample_catalog()));

        assert!(!menu.load_if_idle().await.unwrap());
        assert_eq!(backend.catalog_calls(), 1);
    }

    #[tokio::test]
    async fn test_failure_sticks_until_refresh() {
        let backend = FakeBackend::new();
        backend.push_catalog(Err(unreachable_backend()));
        let menu = MenuCatalog::new(backend.clone());

        menu.load_if_idle().await.unwrap();
        assert_eq!(menu.status().await, RequestStatus::Failed);
        assert_eq!(
            menu.error().await.as_deref(),
            Some("Connection error: connection refused")
        );
        assert!(menu.catalog().await.is_none());

        // no automatic retry
        assert!(!menu.load_if_idle().await.unwrap());
        assert_eq!(backend.catalog_calls(), 1);

        assert!(menu.refresh().await.unwrap());
        assert_eq!(menu.status().await, RequestStatus::Succeeded);
        assert_eq!(backend.catalog_calls(), 2);
    }

    #[tokio::test]
    async fn test_failure_without_detail_uses_default_message() {
        let backend = FakeBackend::new();
        backend.push_catalog(Err(BackendError::Unknown));
        let menu = MenuCatalog::new(backend);

        menu.load_if_idle().await.unwrap();
        assert_eq!(menu.error().await.as_deref(), Some(DEFAULT_MENU_ERROR));
    }

    #[tokio::test]
    async fn test_refresh_refused_while_loading() {
        let backend = FakeBackend::new();
        let menu = MenuCatalog::new(backend);
        let _request = menu.state.begin().unwrap();

        let err = menu.refresh().await.unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::State(StateError::InvalidTransition { .. })
        ));
    }

    #[tokio::test]
    async fn test_abandoned_load_can_be_retried() {
        let backend = FakeBackend::new();
        let release = backend.hold_catalog();
        let menu = MenuCatalog::new(backend.clone());

        let timed_out = timeout(Duration::from_millis(20), menu.load_if_idle()).await;
        assert!(timed_out.is_err());
        assert_eq!(menu.status().await, RequestStatus::Idle);

        release.notify_one();
        assert!(menu.load_if_idle().await.unwrap());
        assert_eq!(menu.status().await, RequestStatus::Succeeded);
        assert_eq!(backend.catalog_calls(), 2);
    }

    #[tokio::test]
    async fn test_abandoned_refresh_can_be_retried() {
        let backend = FakeBackend::new();
        let menu = MenuCatalog::new(backend.clone());
        menu.load_if_idle().await.unwrap();

        let release = backend.hold_catalog();
        let timed_out = timeout(Duration::from_millis(20), menu.refresh()).await;
        assert!(timed_out.is_err());
        assert_eq!(menu.status().await, RequestStatus::Idle);

        release.notify_one();
        assert!(menu.refresh().await.unwrap());
        assert_eq!(menu.status().await, RequestStatus::Succeeded);
        assert_eq!(menu.catalog().await, Some(sample_catalog()));
    }
}
