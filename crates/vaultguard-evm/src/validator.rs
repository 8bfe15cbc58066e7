//! Policy validator — decides whether a proposed call may execute.
//!
//! Rules are evaluated in a fixed order and the first failing rule wins:
//!
//! 1. the caller holds the role for the path (asset manager for
//!    [`CallGuard::check_call`], owner for [`CallGuard::check_owner_withdraw`]);
//! 2. the target passes the gate: an explicit `(target, selector)` pair, or a
//!    whitelisted router;
//! 3. the calldata decodes;
//! 4. every token in the intent is whitelisted;
//! 5. manager calls only pay out to the owner, credit the owner or the
//!    account, and grant allowances to whitelisted counterparties;
//! 6. a router reached only through the router list runs its own family's
//!    functions.
//!
//! The validator reads the [`WhitelistStore`] it was built with and keeps no
//! other state.

use std::fmt;

use alloy::primitives::{Address, Selector, U256};
use alloy::sol_types::SolCall;
use serde_json::json;
use tracing::{debug, warn};
use vaultguard_core::{DenyReason, ProtocolFamily, ReasonCode, WhitelistStore};

use crate::abi::IERC20;
use crate::decoder::{selector_of, CallDecoder, DecoderRegistry};
use crate::decoders::Erc20Decoder;
use crate::intent::CallIntent;

/// Who is asking, and on behalf of which account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    pub caller: Address,
    pub owner: Address,
    /// The asset manager, only while enabled.
    pub asset_manager: Option<Address>,
    /// The custody account the call originates from.
    pub account: Address,
}

/// Which whitelist let the target through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Explicit `(target, selector)` pair.
    TargetSelector,
    /// Router whitelisted for a protocol family.
    Router(ProtocolFamily),
    /// Owner withdrawal of a token with no explicit transfer pair.
    OwnerToken,
}

impl Gate {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Gate::TargetSelector => "target_selector",
            Gate::Router(_) => "router",
            Gate::OwnerToken => "owner_token",
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gate::Router(family) => write!(f, "router({family})"),
            other => f.write_str(other.as_str()),
        }
    }
}

/// An allowed call: the decoded intent and the gate it passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authorization {
    pub intent: CallIntent,
    pub gate: Gate,
}

/// Outcome of one validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allowed(Authorization),
    Denied(DenyReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed(_))
    }

    pub fn reason_code(&self) -> ReasonCode {
        match self {
            Decision::Allowed(_) => ReasonCode::Allowed,
            Decision::Denied(reason) => reason.code(),
        }
    }

    pub fn deny_reason(&self) -> Option<&DenyReason> {
        match self {
            Decision::Allowed(_) => None,
            Decision::Denied(reason) => Some(reason),
        }
    }

    pub fn intent(&self) -> Option<&CallIntent> {
        match self {
            Decision::Allowed(auth) => Some(&auth.intent),
            Decision::Denied(_) => None,
        }
    }

    /// Structured form for the audit trail and the CLI.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Decision::Allowed(auth) => {
                let router_family = match auth.gate {
                    Gate::Router(family) => Some(family.as_str()),
                    _ => None,
                };
                json!({
                    "decision": "allowed",
                    "code": ReasonCode::Allowed.as_str(),
                    "gate": auth.gate.as_str(),
                    "router_family": router_family,
                    "intent": auth.intent.to_json(),
                })
            }
            Decision::Denied(reason) => json!({
                "decision": "denied",
                "code": reason.code().as_str(),
                "reason": reason.to_string(),
            }),
        }
    }
}

/// Authorization check consulted by the vault before every execution.
pub trait CallGuard: Send + Sync {
    /// Validate a call proposed by the asset manager.
    fn check_call(&self, ctx: &CallContext, target: Address, data: &[u8]) -> Decision;

    /// Validate an owner withdrawal of `amount` of `token` to the owner.
    fn check_owner_withdraw(&self, ctx: &CallContext, token: Address, amount: U256) -> Decision;
}

/// Whitelist-driven [`CallGuard`].
pub struct PolicyValidator {
    store: WhitelistStore,
    registry: DecoderRegistry,
}

impl PolicyValidator {
    /// Validator over `store` with every built-in decoder.
    pub fn new(store: WhitelistStore) -> Self {
        Self::with_registry(store, DecoderRegistry::standard())
    }

    pub fn with_registry(store: WhitelistStore, registry: DecoderRegistry) -> Self {
        Self { store, registry }
    }

    pub fn store(&self) -> &WhitelistStore {
        &self.store
    }

    pub fn registry(&self) -> &DecoderRegistry {
        &self.registry
    }

    fn gate(&self, target: Address, selector: Option<Selector>) -> Result<Gate, DenyReason> {
        if let Some(selector) = selector {
            if self.store.is_target_selector_allowed(target, selector) {
                return Ok(Gate::TargetSelector);
            }
        }
        match self.store.router_family(target) {
            Some(family) => Ok(Gate::Router(family)),
            None => Err(DenyReason::TargetNotWhitelisted { target, selector }),
        }
    }

    fn check_tokens(&self, intent: &CallIntent) -> Result<(), DenyReason> {
        match intent.tokens.iter().find(|t| !self.store.is_token_allowed(**t)) {
            Some(&token) => Err(DenyReason::TokenNotWhitelisted { token }),
            None => Ok(()),
        }
    }

    fn check_counterparties(&self, ctx: &CallContext, intent: &CallIntent) -> Result<(), DenyReason> {
        if let Some(recipient) = intent.recipient {
            if recipient != ctx.owner {
                return Err(DenyReason::RecipientNotOwner { recipient });
            }
        }
        if let Some(beneficiary) = intent.beneficiary {
            if beneficiary != ctx.owner && beneficiary != ctx.account {
                return Err(DenyReason::RecipientNotOwner {
                    recipient: beneficiary,
                });
            }
        }
        if let Some(spender) = intent.spender {
            let known = spender == ctx.owner
                || self.store.is_router_allowed(spender)
                || self.store.is_target_listed(spender);
            if !known {
                return Err(DenyReason::SpenderNotWhitelisted { spender });
            }
        }
        Ok(())
    }

    fn evaluate_call(
        &self,
        ctx: &CallContext,
        target: Address,
        data: &[u8],
    ) -> Result<Authorization, DenyReason> {
        if ctx.asset_manager != Some(ctx.caller) {
            return Err(DenyReason::Unauthorized { caller: ctx.caller });
        }

        let selector = selector_of(data);
        let gate = self.gate(target, selector)?;

        let intent = self
            .registry
            .decode(target, data)
            .map_err(|err| DenyReason::UndecodableCall {
                selector,
                reason: err.to_string(),
            })?;

        self.check_tokens(&intent)?;
        self.check_counterparties(ctx, &intent)?;

        if let Gate::Router(family) = gate {
            if intent.family != Some(family) {
                return Err(DenyReason::UnsupportedRouterAction {
                    router: target,
                    family,
                    selector: Some(intent.selector),
                });
            }
        }

        if !intent.is_recognized() {
            warn!(
                %target,
                selector = %intent.selector,
                "unrecognized selector passed by explicit whitelist entry"
            );
        }

        Ok(Authorization { intent, gate })
    }

    fn evaluate_owner_withdraw(
        &self,
        ctx: &CallContext,
        token: Address,
        amount: U256,
    ) -> Result<Authorization, DenyReason> {
        if ctx.caller != ctx.owner {
            return Err(DenyReason::Unauthorized { caller: ctx.caller });
        }

        let data = IERC20::transferCall {
            to: ctx.owner,
            amount,
        }
        .abi_encode();
        let selector = Selector::new(IERC20::transferCall::SELECTOR);
        let gate = if self.store.is_target_selector_allowed(token, selector) {
            Gate::TargetSelector
        } else {
            Gate::OwnerToken
        };

        let intent = Erc20Decoder
            .decode(token, &data)
            .map_err(|err| DenyReason::UndecodableCall {
                selector: Some(selector),
                reason: err.to_string(),
            })?;

        self.check_tokens(&intent)?;

        Ok(Authorization { intent, gate })
    }
}

fn finish(result: Result<Authorization, DenyReason>) -> Decision {
    match result {
        Ok(auth) => Decision::Allowed(auth),
        Err(reason) => {
            debug!(code = %reason.code(), "{reason}");
            Decision::Denied(reason)
        }
    }
}

impl CallGuard for PolicyValidator {
    fn check_call(&self, ctx: &CallContext, target: Address, data: &[u8]) -> Decision {
        finish(self.evaluate_call(ctx, target, data))
    }

    fn check_owner_withdraw(&self, ctx: &CallContext, token: Address, amount: U256) -> Decision {
        finish(self.evaluate_owner_withdraw(ctx, token, amount))
    }
}
