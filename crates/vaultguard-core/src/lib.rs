//! # vaultguard-core
//!
//! Core types, whitelist store, audit trail and configuration for vaultguard.

pub mod audit;
pub mod config;
pub mod types;
pub mod whitelist;

pub use types::{DenyReason, ProtocolFamily, ReasonCode};
pub use whitelist::{WhitelistChange, WhitelistError, WhitelistStore};
