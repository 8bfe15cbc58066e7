//! The custody account.
//!
//! A [`Vault`] holds the whitelists, the asset manager slot and the active
//! guard. Every proposed call is evaluated by a snapshot of the guard and
//! executed only when allowed; every decision and every administrative change
//! is sent to the audit sink.

use std::path::Path;
use std::sync::Arc;

use alloy::primitives::{Address, Bytes, Selector, U256};
use alloy::sol_types::SolCall;
use serde_json::json;
use thiserror::Error;
use tracing::{info, warn};

use vaultguard_core::audit::{AuditError, AuditEvent, AuditSink, JsonlAuditLog};
use vaultguard_core::config::{ConfigError, GuardConfig, ResolvedConfig};
use vaultguard_core::{DenyReason, ProtocolFamily, WhitelistChange, WhitelistError, WhitelistStore};
use vaultguard_evm::abi::IERC20;
use vaultguard_evm::{CallContext, CallGuard, CallIntent, Decision, Gate, PolicyValidator};

use crate::executor::{CallExecutor, ExecutionError};
use crate::manager::ManagerState;

/// Errors from vault operations.
#[derive(Debug, Error)]
pub enum VaultError {
    #[error("caller {caller} is not the owner")]
    Unauthorized { caller: Address },
    #[error("call denied: {0}")]
    Denied(DenyReason),
    #[error("execution failed: {0}")]
    Execution(#[from] ExecutionError),
    #[error("whitelist error: {0}")]
    Whitelist(#[from] WhitelistError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("audit error: {0}")]
    Audit(#[from] AuditError),
}

impl VaultError {
    /// The guard's reason, for denied calls.
    pub fn deny_reason(&self) -> Option<&DenyReason> {
        match self {
            VaultError::Denied(reason) => Some(reason),
            _ => None,
        }
    }
}

/// Result of an executed call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallOutcome {
    pub intent: CallIntent,
    pub gate: Gate,
    /// Return data from the executor.
    pub output: Bytes,
}

/// Custody account guarded by a [`CallGuard`].
pub struct Vault<E: CallExecutor> {
    address: Address,
    store: WhitelistStore,
    manager: ManagerState,
    guard: Arc<dyn CallGuard>,
    executor: E,
    audit: Option<Box<dyn AuditSink>>,
}

impl<E: CallExecutor> Vault<E> {
    /// Vault at `address` owned by `owner`, with empty whitelists and the
    /// standard policy validator.
    pub fn new(address: Address, owner: Address, executor: E) -> Self {
        Self::with_store(address, WhitelistStore::new(owner), executor)
    }

    /// Vault over an existing store. The default guard reads the same store.
    pub fn with_store(address: Address, store: WhitelistStore, executor: E) -> Self {
        let guard = Arc::new(PolicyValidator::new(store.clone()));
        Self {
            address,
            store,
            manager: ManagerState::Unset,
            guard,
            executor,
            audit: None,
        }
    }

    /// Build a vault from validated configuration. Opens the audit log when
    /// one is configured.
    pub fn from_config(config: &ResolvedConfig, executor: E) -> Result<Self, VaultError> {
        let store = config.build_store()?;
        let mut vault = Self::with_store(config.account, store, executor);
        vault.manager.set(config.asset_manager);
        if let Some(path) = &config.audit_log {
            vault.audit = Some(Box::new(JsonlAuditLog::open(path)?));
        }
        info!(
            account = %config.account,
            owner = %config.owner,
            manager = vault.manager.as_str(),
            "vault loaded from config"
        );
        Ok(vault)
    }

    /// Load a YAML config file and build the vault from it.
    pub fn load(path: &Path, executor: E) -> Result<Self, VaultError> {
        let config = GuardConfig::from_file(path)?.resolve()?;
        Self::from_config(&config, executor)
    }

    pub fn with_guard(mut self, guard: Arc<dyn CallGuard>) -> Self {
        self.guard = guard;
        self
    }

    pub fn with_audit(mut self, sink: impl AuditSink + 'static) -> Self {
        self.audit = Some(Box::new(sink));
        self
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn owner(&self) -> Address {
        self.store.owner()
    }

    pub fn store(&self) -> &WhitelistStore {
        &self.store
    }

    pub fn manager(&self) -> ManagerState {
        self.manager
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Context the guard sees for `caller`.
    pub fn context(&self, caller: Address) -> CallContext {
        CallContext {
            caller,
            owner: self.store.owner(),
            asset_manager: self.manager.active(),
            account: self.address,
        }
    }

    // ---- guarded calls ----

    /// Run a call proposed by the asset manager.
    pub fn propose_call(
        &mut self,
        caller: Address,
        target: Address,
        data: &[u8],
    ) -> Result<CallOutcome, VaultError> {
        let ctx = self.context(caller);
        let decision = if ctx.asset_manager == Some(caller) {
            let guard = Arc::clone(&self.guard);
            guard.check_call(&ctx, target, data)
        } else {
            Decision::Denied(DenyReason::Unauthorized { caller })
        };

        let mut details = decision.to_json();
        details["caller"] = json!(caller.to_string());
        details["target"] = json!(target.to_string());
        details["selector"] = json!(data.get(..4).map(|s| Selector::from_slice(s).to_string()));
        self.record("call_decision", details, decision.reason_code().as_str());

        let auth = match decision {
            Decision::Allowed(auth) => auth,
            Decision::Denied(reason) => {
                warn!(%caller, %target, code = %reason.code(), "call denied: {reason}");
                return Err(VaultError::Denied(reason));
            }
        };

        info!(
            %caller,
            %target,
            gate = %auth.gate,
            function = auth.intent.function.unwrap_or("<unrecognized>"),
            "call allowed"
        );
        let output = self
            .executor
            .execute(target, &Bytes::copy_from_slice(data))?;
        Ok(CallOutcome {
            intent: auth.intent,
            gate: auth.gate,
            output,
        })
    }

    /// Withdraw `amount` of `token` to the owner.
    pub fn owner_withdraw(
        &mut self,
        caller: Address,
        token: Address,
        amount: U256,
    ) -> Result<CallOutcome, VaultError> {
        let ctx = self.context(caller);
        let guard = Arc::clone(&self.guard);
        let decision = guard.check_owner_withdraw(&ctx, token, amount);

        let mut details = decision.to_json();
        details["caller"] = json!(caller.to_string());
        details["token"] = json!(token.to_string());
        details["amount"] = json!(amount.to_string());
        self.record("owner_withdraw", details, decision.reason_code().as_str());

        let auth = match decision {
            Decision::Allowed(auth) => auth,
            Decision::Denied(reason) => {
                warn!(%caller, %token, code = %reason.code(), "owner withdrawal denied: {reason}");
                return Err(VaultError::Denied(reason));
            }
        };

        let data = IERC20::transferCall {
            to: ctx.owner,
            amount,
        }
        .abi_encode();
        info!(%token, %amount, owner = %ctx.owner, "owner withdrawal allowed");
        let output = self.executor.execute(token, &Bytes::from(data))?;
        Ok(CallOutcome {
            intent: auth.intent,
            gate: auth.gate,
            output,
        })
    }

    // ---- administration ----

    /// Enable `manager`, or clear the slot with `None`.
    pub fn set_asset_manager(
        &mut self,
        caller: Address,
        manager: Option<Address>,
    ) -> Result<(), VaultError> {
        self.require_owner(caller, "manager_change")?;
        let previous = self.manager.set(manager);
        info!(from = previous.as_str(), to = self.manager.as_str(), "asset manager set");
        self.record(
            "manager_change",
            json!({
                "action": "set",
                "previous": previous.to_json(),
                "current": self.manager.to_json(),
            }),
            "changed",
        );
        Ok(())
    }

    /// Disable the asset manager, keeping its address. Returns whether it was enabled.
    pub fn pause_asset_manager(&mut self, caller: Address) -> Result<bool, VaultError> {
        self.require_owner(caller, "manager_change")?;
        let changed = self.manager.pause();
        self.record_manager_toggle("pause", changed);
        Ok(changed)
    }

    /// Re-enable a paused asset manager. Returns whether it was paused.
    pub fn resume_asset_manager(&mut self, caller: Address) -> Result<bool, VaultError> {
        self.require_owner(caller, "manager_change")?;
        let changed = self.manager.resume();
        self.record_manager_toggle("resume", changed);
        Ok(changed)
    }

    /// Swap the guard. Takes effect from the next call.
    pub fn replace_guard(
        &mut self,
        caller: Address,
        guard: Arc<dyn CallGuard>,
    ) -> Result<(), VaultError> {
        self.require_owner(caller, "guard_change")?;
        self.guard = guard;
        info!("guard replaced");
        self.record("guard_change", json!({ "action": "replace" }), "changed");
        Ok(())
    }

    /// Hand the account and its whitelists to `new_owner`.
    pub fn transfer_ownership(
        &mut self,
        caller: Address,
        new_owner: Address,
    ) -> Result<(), VaultError> {
        self.require_owner(caller, "ownership_change")?;
        let previous = self.store.set_owner(caller, new_owner)?;
        info!(from = %previous, to = %new_owner, "ownership transferred");
        self.record(
            "ownership_change",
            json!({
                "previous": previous.to_string(),
                "current": new_owner.to_string(),
            }),
            "changed",
        );
        Ok(())
    }

    pub fn add_target_selector(
        &mut self,
        caller: Address,
        target: Address,
        selector: Selector,
    ) -> Result<WhitelistChange, VaultError> {
        let result = self.store.add_target_selector(caller, target, selector);
        self.forward_change(caller, result)
    }

    pub fn remove_target_selector(
        &mut self,
        caller: Address,
        target: Address,
        selector: Selector,
    ) -> Result<WhitelistChange, VaultError> {
        let result = self.store.remove_target_selector(caller, target, selector);
        self.forward_change(caller, result)
    }

    pub fn add_token(&mut self, caller: Address, token: Address) -> Result<WhitelistChange, VaultError> {
        let result = self.store.add_token(caller, token);
        self.forward_change(caller, result)
    }

    pub fn remove_token(
        &mut self,
        caller: Address,
        token: Address,
    ) -> Result<WhitelistChange, VaultError> {
        let result = self.store.remove_token(caller, token);
        self.forward_change(caller, result)
    }

    pub fn add_router(
        &mut self,
        caller: Address,
        router: Address,
        family: ProtocolFamily,
    ) -> Result<WhitelistChange, VaultError> {
        let result = self.store.add_router(caller, router, family);
        self.forward_change(caller, result)
    }

    pub fn remove_router(
        &mut self,
        caller: Address,
        router: Address,
    ) -> Result<WhitelistChange, VaultError> {
        let result = self.store.remove_router(caller, router);
        self.forward_change(caller, result)
    }

    // ---- helpers ----

    fn require_owner(&mut self, caller: Address, event_type: &str) -> Result<(), VaultError> {
        if caller == self.store.owner() {
            return Ok(());
        }
        warn!(%caller, event_type, "owner-only action rejected");
        self.record(
            event_type,
            json!({ "caller": caller.to_string() }),
            "unauthorized",
        );
        Err(VaultError::Unauthorized { caller })
    }

    fn record_manager_toggle(&mut self, action: &str, changed: bool) {
        info!(action, changed, state = self.manager.as_str(), "asset manager toggled");
        let outcome = if changed { "changed" } else { "unchanged" };
        self.record(
            "manager_change",
            json!({ "action": action, "current": self.manager.to_json() }),
            outcome,
        );
    }

    fn forward_change(
        &mut self,
        caller: Address,
        result: Result<WhitelistChange, WhitelistError>,
    ) -> Result<WhitelistChange, VaultError> {
        match result {
            Ok(change) => {
                let outcome = if change.changed() { "changed" } else { "unchanged" };
                info!(list = change.entry.list(), outcome, "whitelist updated");
                self.record("whitelist_change", change.to_json(), outcome);
                Ok(change)
            }
            Err(err) => {
                warn!(%caller, "whitelist change rejected: {err}");
                self.record(
                    "whitelist_change",
                    json!({ "caller": caller.to_string() }),
                    "unauthorized",
                );
                Err(err.into())
            }
        }
    }

    fn record(&mut self, event_type: &str, details: serde_json::Value, outcome: &str) {
        let Some(sink) = self.audit.as_mut() else {
            return;
        };
        if let Err(err) = sink.record(AuditEvent::new(event_type, details, outcome)) {
            warn!(event_type, "failed to write audit event: {err}");
        }
    }
}
