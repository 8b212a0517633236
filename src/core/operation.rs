//! One-shot fetch operations with success and failure handlers.
//!
//! An operation is built in the `Created` state and does nothing until
//! [`FetchOperation::start`] consumes it, so it can only be started once.
//! Dropping an operation before it starts discards it without any I/O.
//! Exactly one of the two handlers runs once the fetch completes.

use super::currency::{CurrencyList, CurrencyService, FetchError, Quotes};
use futures::future::BoxFuture;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationState {
    Created,
    Started,
    Succeeded,
    Failed,
}

impl OperationState {
    pub fn is_finished(&self) -> bool {
        matches!(self, OperationState::Succeeded | OperationState::Failed)
    }
}

pub struct FetchOperation<T> {
    name: &'static str,
    task: BoxFuture<'static, Result<T, FetchError>>,
}

impl<T: Send + 'static> FetchOperation<T> {
    pub fn new<F>(name: &'static str, task: F) -> Self
    where
        F: Future<Output = Result<T, FetchError>> + Send + 'static,
    {
        Self {
            name,
            task: Box::pin(task),
        }
    }

    pub fn state(&self) -> OperationState {
        OperationState::Created
    }

    /// Spawns the fetch on the current tokio runtime.
    pub fn start<S, E>(self, on_success: S, on_failure: E) -> OperationHandle
    where
        S: FnOnce(T) + Send + 'static,
        E: FnOnce(FetchError) + Send + 'static,
    {
        let (state_tx, state_rx) = watch::channel(OperationState::Started);
        let name = self.name;
        debug!(operation = name, "Operation started");

        tokio::spawn(async move {
            match self.task.await {
                Ok(value) => {
                    debug!(operation = name, "Operation succeeded");
                    on_success(value);
                    state_tx.send_replace(OperationState::Succeeded);
                }
                Err(e) => {
                    debug!(operation = name, error = %e, "Operation failed");
                    on_failure(e);
                    state_tx.send_replace(OperationState::Failed);
                }
            }
        });

        OperationHandle { state: state_rx }
    }
}

impl FetchOperation<CurrencyList> {
    pub fn fetch_currencies(service: Arc<dyn CurrencyService>) -> Self {
        Self::new("FetchCurrencies", async move {
            service.fetch_currency_list().await
        })
    }
}

impl FetchOperation<Quotes> {
    pub fn fetch_realtime_rates(service: Arc<dyn CurrencyService>, codes: Vec<String>) -> Self {
        Self::new("FetchRealtimeRates", async move {
            let codes: Vec<&str> = codes.iter().map(String::as_str).collect();
            service.fetch_realtime_rates(&codes).await
        })
    }
}

/// Observes a started operation.
#[derive(Debug, Clone)]
pub struct OperationHandle {
    state: watch::Receiver<OperationState>,
}

impl OperationHandle {
    /// Current state. An operation whose task ended without reaching a
    /// terminal state, e.g. because a handler panicked, reports `Failed`.
    pub fn state(&self) -> OperationState {
        let state = *self.state.borrow();
        if !state.is_finished() && self.state.has_changed().is_err() {
            return OperationState::Failed;
        }
        state
    }

    /// Waits until the operation finishes and its handler has returned.
    pub async fn wait(mut self) -> OperationState {
        match self.state.wait_for(OperationState::is_finished).await {
            Ok(state) => *state,
            Err(_) => {
                debug!("Operation task ended before finishing");
                OperationState::Failed
            }
        }
    }
}
