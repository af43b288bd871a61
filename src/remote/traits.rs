//! Trait abstraction for remote capabilities to enable mocking in tests

use crate::checks::UniqueField;
use crate::state::RegistrationData;
use anyhow::Result;
use async_trait::async_trait;

/// Remote availability oracle for uniqueness checks.
///
/// Latency-bearing and fallible; a transport error means "availability
/// unknown" and callers treat it as non-blocking.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AvailabilityOracle: Send + Sync {
    /// Whether `value` is still free for the given field kind.
    async fn is_available(&self, field: UniqueField, value: &str) -> Result<bool>;
}

/// External submit capability invoked once per accepted submission.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmitCapability: Send + Sync {
    /// Submit the fully resolved record. Failure carries no contract
    /// beyond "submission failed".
    async fn submit(&self, record: &RegistrationData) -> Result<()>;
}
