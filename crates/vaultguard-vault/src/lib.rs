//! # vaultguard-vault
//!
//! The custody account shell. Asset-manager calls and owner withdrawals are
//! routed through the active [`CallGuard`](vaultguard_evm::CallGuard) and only
//! reach the [`CallExecutor`] when allowed.
//!
//! ## Modules
//!
//! - [`account`] — the [`Vault`] and its owner-only administration
//! - [`executor`] — the execution seam
//! - [`manager`] — asset manager lifecycle

pub mod account;
pub mod executor;
pub mod manager;

pub use account::{CallOutcome, Vault, VaultError};
pub use executor::{CallExecutor, ExecutionError, RecordingExecutor};
pub use manager::ManagerState;
