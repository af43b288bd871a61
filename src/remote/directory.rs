//! Simulated remote directory of already-registered identifiers
//!
//! Stands in for the network service during development and tests: a fixed
//! in-memory set per field kind, plus a configurable artificial latency.

use crate::checks::UniqueField;
use crate::remote::AvailabilityOracle;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashSet;
use std::time::Duration;

/// In-memory availability oracle with simulated latency.
#[derive(Debug, Clone)]
pub struct SimulatedDirectory {
    emails: HashSet<String>,
    usernames: HashSet<String>,
    nifs: HashSet<String>,
    latency: Duration,
}

impl Default for SimulatedDirectory {
    fn default() -> Self {
        let collect = |items: &[&str]| items.iter().map(|s| (*s).to_string()).collect();
        Self {
            emails: collect(&[
                "admin@tecnomayores.com",
                "usuario@test.com",
                "ejemplo@gmail.com",
                "test@test.com",
            ]),
            usernames: collect(&["admin", "usuario", "test", "pepe", "maria"]),
            nifs: collect(&["12345678Z", "87654321X"]),
            latency: Duration::from_millis(300),
        }
    }
}

impl SimulatedDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Register a value so later checks report it as taken.
    pub fn register(&mut self, field: UniqueField, value: &str) {
        let set = match field {
            UniqueField::Email => &mut self.emails,
            UniqueField::Username => &mut self.usernames,
            UniqueField::Nif => &mut self.nifs,
        };
        set.insert(value.to_string());
    }
}

#[async_trait]
impl AvailabilityOracle for SimulatedDirectory {
    async fn is_available(&self, field: UniqueField, value: &str) -> Result<bool> {
        tokio::time::sleep(self.latency).await;
        let available = match field {
            UniqueField::Email => !self.emails.contains(value),
            UniqueField::Username => !self.usernames.contains(value),
            UniqueField::Nif => !self.nifs.contains(value),
        };
        tracing::debug!(?field, value, available, "availability check");
        Ok(available)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_registered_values_are_taken() {
        let directory = SimulatedDirectory::new();
        assert!(!directory
            .is_available(UniqueField::Email, "test@test.com")
            .await
            .unwrap());
        assert!(!directory
            .is_available(UniqueField::Username, "maria")
            .await
            .unwrap());
        assert!(!directory
            .is_available(UniqueField::Nif, "87654321X")
            .await
            .unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unregistered_values_are_available() {
        let directory = SimulatedDirectory::new();
        assert!(directory
            .is_available(UniqueField::Email, "fresh@example.com")
            .await
            .unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_register_makes_value_taken() {
        let mut directory = SimulatedDirectory::new().with_latency(Duration::ZERO);
        directory.register(UniqueField::Username, "anagarcia");
        assert!(!directory
            .is_available(UniqueField::Username, "anagarcia")
            .await
            .unwrap());
    }
}
