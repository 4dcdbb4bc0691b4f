//! User-facing notice channel.
//!
//! A one-way, fire-and-forget sink for the messages shown when an operation
//! is rejected or fails. The store itself never publishes: it returns tagged
//! [`CartError`] values, and the consumer edge translates them here. Callers
//! that need to branch programmatically use the error tags; the notice text
//! is display-only.

use crate::error::CartError;

/// Message severity, mirroring the levels a notification UI exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// A user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

/// The cart operation a failure occurred in, selecting the generic message
/// for faults that carry no user-meaningful detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartOp {
    Add,
    Remove,
    Update,
}

/// Stock-bound rejections share one message regardless of the operation.
const MSG_OUT_OF_STOCK: &str = "Requested quantity is out of stock";
const MSG_ADD_FAILED: &str = "Could not add the product to the cart";
const MSG_REMOVE_FAILED: &str = "Could not remove the product from the cart";
const MSG_UPDATE_FAILED: &str = "Could not change the product quantity";

impl Notice {
    /// Create an error-severity notice.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    /// Translate a tagged failure into the user-facing notice for the
    /// operation it occurred in.
    ///
    /// Failure causes are deliberately not distinguishable from the text:
    /// not-found, gateway, and storage faults all render the operation's
    /// generic message.
    #[must_use]
    pub fn for_error(err: &CartError, op: CartOp) -> Self {
        let message = match err {
            CartError::StockExceeded { .. } => MSG_OUT_OF_STOCK,
            CartError::NotFound(_) | CartError::Gateway(_) | CartError::Storage(_) => match op {
                CartOp::Add => MSG_ADD_FAILED,
                CartOp::Remove => MSG_REMOVE_FAILED,
                CartOp::Update => MSG_UPDATE_FAILED,
            },
        };
        Self::error(message)
    }
}

/// One-way sink for user-facing notices. No return value, no acknowledgment.
pub trait NoticeSink: Send + Sync {
    fn publish(&self, notice: Notice);
}

/// Sink that forwards notices to the `tracing` pipeline, for embedders
/// without a notification UI.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNoticeSink;

impl NoticeSink for TracingNoticeSink {
    fn publish(&self, notice: Notice) {
        match notice.severity {
            Severity::Error => tracing::error!(message = %notice.message, "User notice"),
            Severity::Warning => tracing::warn!(message = %notice.message, "User notice"),
            Severity::Info => tracing::info!(message = %notice.message, "User notice"),
        }
    }
}
