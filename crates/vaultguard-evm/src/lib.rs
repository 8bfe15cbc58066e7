//! # vaultguard-evm
//!
//! Calldata decoding and the policy validator for vault-originated calls.
//!
//! ## Modules
//!
//! - [`abi`] — `sol!` definitions for every recognized call shape
//! - [`decoder`] — the [`CallDecoder`] trait and the selector-keyed registry
//! - [`decoders`] — one decoder per protocol family
//! - [`intent`] — the decoded [`CallIntent`]
//! - [`path`] — Uniswap V3 packed path parsing
//! - [`validator`] — ordered authorization rules behind [`CallGuard`]

pub mod abi;
pub mod decoder;
pub mod decoders;
pub mod intent;
pub mod path;
pub mod validator;

// Re-export key types for convenience.
pub use decoder::{CallDecoder, DecodeFailure, DecoderRegistry, DuplicateSelector, KnownFunction};
pub use intent::{CallIntent, IntentMetadata, RebalanceAction};
pub use validator::{Authorization, CallContext, CallGuard, Decision, Gate, PolicyValidator};

// Re-export alloy primitives used in the public API.
pub use alloy::primitives::{Address, Bytes, Selector, U256};
