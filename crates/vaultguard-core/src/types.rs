//! Common types shared across vaultguard crates.

use std::fmt;

use alloy::primitives::{Address, Selector};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Protocol family a router or decoded call belongs to.
///
/// The family picks the decoding rule for a call and, for router-only
/// targets, the set of actions the router may perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtocolFamily {
    /// ERC-20 transfer / transferFrom / approve.
    Erc20,
    /// Uniswap V2-style router with an `address[]` path.
    PairSwap,
    /// Uniswap V3 SwapRouter02 with single-pool params or a packed path.
    PathSwap,
    /// Aave V3-style lending pool supply / withdraw.
    Lending,
    /// ERC-4626 and ERC-7540 tokenized vaults.
    TokenizedVault,
    /// Cross-chain rebalance message relay.
    RebalanceRelay,
    /// Exchange account contract (delegate signer, deposit, withdraw).
    ExchangeAccount,
}

impl ProtocolFamily {
    /// All known families.
    pub const ALL: [ProtocolFamily; 7] = [
        Self::Erc20,
        Self::PairSwap,
        Self::PathSwap,
        Self::Lending,
        Self::TokenizedVault,
        Self::RebalanceRelay,
        Self::ExchangeAccount,
    ];

    /// Stable snake_case name, identical to the serde representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Erc20 => "erc20",
            Self::PairSwap => "pair_swap",
            Self::PathSwap => "path_swap",
            Self::Lending => "lending",
            Self::TokenizedVault => "tokenized_vault",
            Self::RebalanceRelay => "rebalance_relay",
            Self::ExchangeAccount => "exchange_account",
        }
    }
}

impl fmt::Display for ProtocolFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable reason code attached to every decision in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    Allowed,
    Unauthorized,
    TargetNotWhitelisted,
    UndecodableCall,
    TokenNotWhitelisted,
    RecipientNotOwner,
    SpenderNotWhitelisted,
    UnsupportedRouterAction,
}

impl ReasonCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Allowed => "allowed",
            Self::Unauthorized => "unauthorized",
            Self::TargetNotWhitelisted => "target_not_whitelisted",
            Self::UndecodableCall => "undecodable_call",
            Self::TokenNotWhitelisted => "token_not_whitelisted",
            Self::RecipientNotOwner => "recipient_not_owner",
            Self::SpenderNotWhitelisted => "spender_not_whitelisted",
            Self::UnsupportedRouterAction => "unsupported_router_action",
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a proposed call was denied. Every variant is terminal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DenyReason {
    #[error("caller {caller} lacks the role required for this action")]
    Unauthorized { caller: Address },
    #[error("target {target} with selector {} is not whitelisted", display_selector(.selector))]
    TargetNotWhitelisted {
        target: Address,
        selector: Option<Selector>,
    },
    #[error("undecodable call (selector {}): {reason}", display_selector(.selector))]
    UndecodableCall {
        selector: Option<Selector>,
        reason: String,
    },
    #[error("token {token} is not whitelisted")]
    TokenNotWhitelisted { token: Address },
    #[error("recipient {recipient} is not the owner")]
    RecipientNotOwner { recipient: Address },
    #[error("spender {spender} is neither a whitelisted router nor a whitelisted target")]
    SpenderNotWhitelisted { spender: Address },
    #[error("selector {} is not a supported {family} action on router {router}", display_selector(.selector))]
    UnsupportedRouterAction {
        router: Address,
        family: ProtocolFamily,
        selector: Option<Selector>,
    },
}

impl DenyReason {
    /// The audit code for this reason.
    pub fn code(&self) -> ReasonCode {
        match self {
            Self::Unauthorized { .. } => ReasonCode::Unauthorized,
            Self::TargetNotWhitelisted { .. } => ReasonCode::TargetNotWhitelisted,
            Self::UndecodableCall { .. } => ReasonCode::UndecodableCall,
            Self::TokenNotWhitelisted { .. } => ReasonCode::TokenNotWhitelisted,
            Self::RecipientNotOwner { .. } => ReasonCode::RecipientNotOwner,
            Self::SpenderNotWhitelisted { .. } => ReasonCode::SpenderNotWhitelisted,
            Self::UnsupportedRouterAction { .. } => ReasonCode::UnsupportedRouterAction,
        }
    }
}

fn display_selector(selector: &Option<Selector>) -> String {
    match selector {
        Some(s) => s.to_string(),
        None => "<none>".to_string(),
    }
}
