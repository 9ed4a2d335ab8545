// src/application/state.rs
//! Request lifecycle shared by the catalog fetch, order submission and
//! history lookup.
//!
//! ```text
//! idle ──start──▶ loading ──ok──▶ succeeded
//!                   │
//!                   └──fail──▶ failed
//! succeeded / failed ──start──▶ loading
//! loading ──abandon──▶ idle
//! ```
//!
//! The payload of a finished request lives inside the state itself, so a
//! `failed` state can never be read together with a stale result.
//!
//! Containers keep their state in a [`RequestSlot`]. Entering `loading`
//! hands out an [`InFlight`] guard; if the guard is dropped before the
//! request settles (the caller's future was cancelled) the slot goes back
//! to `idle` and the action can simply be retried.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    Idle,
    Loading,
    Succeeded,
    Failed,
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RequestStatus::Idle => write!(f, "idle"),
            RequestStatus::Loading => write!(f, "loading"),
            RequestStatus::Succeeded => write!(f, "succeeded"),
            RequestStatus::Failed => write!(f, "failed"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition {
        from: RequestStatus,
        to: RequestStatus,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestState<T> {
    Idle,
    Loading,
    Succeeded(T),
    Failed(String),
}

impl<T> Default for RequestState<T> {
    fn default() -> Self {
        RequestState::Idle
    }
}

impl<T> RequestState<T> {
    pub fn status(&self) -> RequestStatus {
        match self {
            RequestState::Idle => RequestStatus::Idle,
            RequestState::Loading => RequestStatus::Loading,
            RequestState::Succeeded(_) => RequestStatus::Succeeded,
            RequestState::Failed(_) => RequestStatus::Failed,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            RequestState::Succeeded(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            RequestState::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Enters `loading`. Refused while a request is already outstanding.
    pub fn start(&mut self) -> Result<(), StateError> {
        self.expect_not_loading(RequestStatus::Loading)?;
        *self = RequestState::Loading;
        Ok(())
    }

    pub fn succeed(&mut self, value: T) -> Result<(), StateError> {
        self.expect_loading(RequestStatus::Succeeded)?;
        *self = RequestState::Succeeded(value);
        Ok(())
    }

    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), StateError> {
        self.expect_loading(RequestStatus::Failed)?;
        *self = RequestState::Failed(message.into());
        Ok(())
    }

    /// Drops an outstanding request without a result.
    pub fn abandon(&mut self) -> Result<(), StateError> {
        self.expect_loading(RequestStatus::Idle)?;
        *self = RequestState::Idle;
        Ok(())
    }

    /// Back to `idle`, dropping any result. Not allowed mid-request.
    pub fn reset(&mut self) -> Result<(), StateError> {
        self.expect_not_loading(RequestStatus::Idle)?;
        *self = RequestState::Idle;
        Ok(())
    }

    fn expect_loading(&self, to: RequestStatus) -> Result<(), StateError> {
        if self.is_loading() {
            Ok(())
        } else {
            Err(StateError::InvalidTransition {
                from: self.status(),
                to,
            })
        }
    }

    fn expect_not_loading(&self, to: RequestStatus) -> Result<(), StateError> {
        if self.is_loading() {
            Err(StateError::InvalidTransition {
                from: RequestStatus::Loading,
                to,
            })
        } else {
            Ok(())
        }
    }
}

/// Shared, cloneable home of one request state.
///
/// The lock is only taken for a single transition or read and is never
/// held across an `.await`.
#[derive(Debug)]
pub struct RequestSlot<T> {
    state: Arc<Mutex<RequestState<T>>>,
}

impl<T> Clone for RequestSlot<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T> Default for RequestSlot<T> {
    fn default() -> Self {
        Self {
            state: Arc::new(Mutex::new(RequestState::Idle)),
        }
    }
}

impl<T> RequestSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> RequestStatus {
        self.lock().status()
    }

    pub fn error(&self) -> Option<String> {
        self.lock().error().map(str::to_string)
    }

    /// Enters `loading`. Refused while another request is outstanding.
    pub fn begin(&self) -> Result<InFlight<T>, StateError> {
        self.lock().start()?;
        Ok(InFlight {
            slot: self.clone(),
            settled: false,
        })
    }

    /// Enters `loading` only from `idle`.
    pub fn begin_if_idle(&self) -> Option<InFlight<T>> {
        let mut state = self.lock();
        if state.status() != RequestStatus::Idle {
            return None;
        }
        state.start().ok()?;
        Some(InFlight {
            slot: self.clone(),
            settled: false,
        })
    }

    pub fn reset(&self) -> Result<(), StateError> {
        self.lock().reset()
    }

    /// Reads the state in place
    pub fn inspect<R>(&self, f: impl FnOnce(&RequestState<T>) -> R) -> R {
        f(&self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, RequestState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Clone> RequestSlot<T> {
    pub fn snapshot(&self) -> RequestState<T> {
        self.lock().clone()
    }

    pub fn value(&self) -> Option<T> {
        self.lock().value().cloned()
    }
}

/// Outstanding request on a [`RequestSlot`].
///
/// Settle it with `succeed` or `fail`. Dropping it unsettled abandons the
/// request and returns the slot to `idle`.
#[must_use = "dropping the guard abandons the request"]
#[derive(Debug)]
pub struct InFlight<T> {
    slot: RequestSlot<T>,
    settled: bool,
}

impl<T> InFlight<T> {
    pub fn succeed(mut self, value: T) -> Result<(), StateError> {
        self.settled = true;
        self.slot.lock().succeed(value)?;
        Ok(())
    }

    pub fn fail(mut self, message: impl Into<String>) -> Result<(), StateError> {
        self.settled = true;
        self.slot.lock().fail(message)?;
        Ok(())
    }
}

impl<T> Drop for InFlight<T> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut state = self.slot.lock();
        if state.abandon().is_ok() {
            log::warn!("Request abandoned before it settled; back to idle");
        }
    }
}
