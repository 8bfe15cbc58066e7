//! # vaultguard
//!
//! Action-authorization guard for custody accounts. An asset manager proposes
//! calls from the account; each call is decoded into an intent and checked
//! against owner-managed whitelists before it may execute.
//!
//! This facade re-exports the workspace crates:
//!
//! - [`vaultguard_core`] — whitelist store, shared types, config and audit trail
//! - [`vaultguard_evm`] — calldata decoders and the policy validator
//! - [`vaultguard_vault`] — the account shell

pub use vaultguard_core;
pub use vaultguard_evm;
pub use vaultguard_vault;

pub use vaultguard_core::{DenyReason, ProtocolFamily, ReasonCode, WhitelistStore};
pub use vaultguard_evm::{CallGuard, CallIntent, Decision, PolicyValidator};
pub use vaultguard_vault::{Vault, VaultError};

/// Returns the library version string.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
