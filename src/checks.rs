//! Debounced, cancelable asynchronous uniqueness checks
//!
//! Every qualifying value change restarts a per-field debounce timer; when
//! it elapses the remote oracle is consulted and the outcome comes back as
//! an event carrying the check's token. Only an event whose token is still
//! current may touch field state, so a slow stale check can never overwrite
//! the result of a newer one.

use crate::config::FormConfig;
use crate::errors::{ErrorKind, ValidationError};
use crate::remote::AvailabilityOracle;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

/// Fields backed by a remote uniqueness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniqueField {
    Email,
    Username,
    Nif,
}

impl UniqueField {
    /// The error inserted when the remote authority reports the value taken.
    pub const fn taken_error(&self) -> ValidationError {
        match self {
            Self::Email => ValidationError::EmailTaken,
            Self::Username => ValidationError::UsernameTaken,
            Self::Nif => ValidationError::NifTaken,
        }
    }

    pub const fn taken_kind(&self) -> ErrorKind {
        match self {
            Self::Email => ErrorKind::EmailTaken,
            Self::Username => ErrorKind::UsernameTaken,
            Self::Nif => ErrorKind::NifTaken,
        }
    }

    /// Normalization applied before consulting the oracle.
    pub fn normalize(&self, value: &str) -> String {
        match self {
            Self::Email | Self::Username => value.trim().to_lowercase(),
            Self::Nif => value.trim().to_uppercase(),
        }
    }

    /// Whether a value is worth checking at all.
    pub fn qualifies(&self, value: &str) -> bool {
        match self {
            Self::Email => !value.is_empty(),
            Self::Username => value.chars().count() >= 3,
            Self::Nif => value.chars().count() == 9,
        }
    }
}

/// Opaque marker identifying the most recently issued check for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AsyncToken(pub(crate) u64);

/// What the oracle said, or failed to say.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    Available,
    Taken,
    /// Transport failure: availability unknown, treated as available so a
    /// flaky oracle never locks a user out.
    Indeterminate,
}

/// Event emitted by an in-flight check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AsyncEvent {
    /// The debounce window elapsed and the remote check was issued.
    Started {
        field: UniqueField,
        token: AsyncToken,
    },
    /// The remote check resolved.
    Resolved {
        field: UniqueField,
        token: AsyncToken,
        outcome: CheckOutcome,
    },
}

struct PendingCheck {
    token: AsyncToken,
    handle: JoinHandle<()>,
}

/// Schedules debounced availability checks and tracks which token is
/// current per field.
///
/// Cancellation is explicit: rescheduling a field aborts its previous
/// timer task and supersedes its token, and dropping the engine aborts
/// everything outstanding.
pub struct AsyncCheckEngine {
    oracle: Arc<dyn AvailabilityOracle>,
    config: FormConfig,
    tx: UnboundedSender<AsyncEvent>,
    pending: HashMap<UniqueField, PendingCheck>,
    next_token: u64,
}

impl AsyncCheckEngine {
    /// Create an engine plus the receiver its events arrive on.
    pub fn new(
        oracle: Arc<dyn AvailabilityOracle>,
        config: FormConfig,
    ) -> (Self, UnboundedReceiver<AsyncEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                oracle,
                config,
                tx,
                pending: HashMap::new(),
                next_token: 0,
            },
            rx,
        )
    }

    /// (Re)schedule a check for the field, canceling any pending one.
    ///
    /// Returns the new token, or `None` when the value does not qualify
    /// (in which case nothing is outstanding for the field anymore).
    pub fn schedule(&mut self, field: UniqueField, value: &str) -> Option<AsyncToken> {
        self.cancel(field);

        let value = field.normalize(value);
        if !field.qualifies(&value) {
            return None;
        }

        self.next_token += 1;
        let token = AsyncToken(self.next_token);
        let debounce = self.config.debounce(field);
        let oracle = Arc::clone(&self.oracle);
        let tx = self.tx.clone();

        let handle = tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            let _ = tx.send(AsyncEvent::Started { field, token });

            let outcome = match oracle.is_available(field, &value).await {
                Ok(true) => CheckOutcome::Available,
                Ok(false) => CheckOutcome::Taken,
                Err(error) => {
                    tracing::warn!(?field, %error, "availability check failed, not blocking");
                    CheckOutcome::Indeterminate
                }
            };
            let _ = tx.send(AsyncEvent::Resolved {
                field,
                token,
                outcome,
            });
        });

        tracing::debug!(?field, token = token.0, debounce_ms = debounce.as_millis() as u64, "scheduled availability check");
        self.pending.insert(field, PendingCheck { token, handle });
        Some(token)
    }

    /// Abort any pending check for the field; its token becomes stale.
    pub fn cancel(&mut self, field: UniqueField) {
        if let Some(pending) = self.pending.remove(&field) {
            pending.handle.abort();
            tracing::debug!(?field, token = pending.token.0, "canceled availability check");
        }
    }

    /// Abort every pending check.
    pub fn cancel_all(&mut self) {
        for (_, pending) in self.pending.drain() {
            pending.handle.abort();
        }
    }

    /// Whether `token` is still the field's current check.
    pub fn is_current(&self, field: UniqueField, token: AsyncToken) -> bool {
        self.pending
            .get(&field)
            .is_some_and(|pending| pending.token == token)
    }

    /// Mark the field's current check as applied; a stale token is ignored.
    pub fn complete(&mut self, field: UniqueField, token: AsyncToken) {
        if self.is_current(field, token) {
            self.pending.remove(&field);
        }
    }

    /// Whether any check is scheduled or in flight.
    pub fn has_outstanding(&self) -> bool {
        !self.pending.is_empty()
    }
}

impl Drop for AsyncCheckEngine {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
