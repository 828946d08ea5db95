//! Outgoing notification interface.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifierError {
    #[error("notifier rejected credentials: {0}")]
    Auth(String),
    #[error("notification delivery failed: {0}")]
    Delivery(String),
}

/// Fire-and-forget message sink. Callers log failures; nothing retries.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: &str) -> Result<(), NotifierError>;
}
