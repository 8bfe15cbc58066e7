//! Execution seam between the vault and the chain.

use alloy::primitives::{Address, Bytes};
use thiserror::Error;

/// Errors from executing an authorized call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    #[error("call to {target} reverted: {reason}")]
    Reverted { target: Address, reason: String },
    #[error("executor unavailable: {0}")]
    Unavailable(String),
}

/// Performs a call from the account. Only reached after the guard allows it.
pub trait CallExecutor {
    fn execute(&mut self, target: Address, data: &Bytes) -> Result<Bytes, ExecutionError>;
}

/// Executor that records calls instead of performing them.
#[derive(Debug, Clone, Default)]
pub struct RecordingExecutor {
    calls: Vec<(Address, Bytes)>,
    revert_reason: Option<String>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Executor whose every call reverts with `reason` (nothing is recorded).
    pub fn reverting(reason: impl Into<String>) -> Self {
        Self {
            calls: Vec::new(),
            revert_reason: Some(reason.into()),
        }
    }

    /// Calls executed so far, oldest first.
    pub fn calls(&self) -> &[(Address, Bytes)] {
        &self.calls
    }
}

impl CallExecutor for RecordingExecutor {
    fn execute(&mut self, target: Address, data: &Bytes) -> Result<Bytes, ExecutionError> {
        if let Some(reason) = &self.revert_reason {
            return Err(ExecutionError::Reverted {
                target,
                reason: reason.clone(),
            });
        }
        self.calls.push((target, data.clone()));
        Ok(Bytes::new())
    }
}
