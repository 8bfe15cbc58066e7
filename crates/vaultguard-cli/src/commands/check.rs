//! `vaultguard check` — evaluate a manager call or an owner withdrawal
//! against a guard configuration.

use std::path::PathBuf;

use alloy::primitives::{Address, Bytes, U256};
use tracing::debug;
use vaultguard_core::config::{GuardConfig, ResolvedConfig};
use vaultguard_evm::{CallContext, CallGuard, Decision, PolicyValidator};

/// What `check` is asked to evaluate.
#[derive(Debug, Clone)]
pub enum Proposal {
    /// A call proposed by the asset manager.
    Call { target: Address, data: Bytes },
    /// An owner withdrawal of `amount` of `token`.
    OwnerWithdraw { token: Address, amount: U256 },
}

impl Proposal {
    pub fn from_args(
        target: Option<Address>,
        data: Option<Bytes>,
        owner_withdraw: Option<Address>,
        amount: Option<U256>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        match (target, data, owner_withdraw, amount) {
            (Some(target), Some(data), None, None) => Ok(Self::Call { target, data }),
            (None, None, Some(token), Some(amount)) => Ok(Self::OwnerWithdraw { token, amount }),
            _ => Err("pass --target with --data, or --owner-withdraw with --amount".into()),
        }
    }
}

/// Run the `check` subcommand. Returns whether the proposal is allowed.
pub fn run(
    config: Option<PathBuf>,
    caller: Option<Address>,
    proposal: Proposal,
) -> Result<bool, Box<dyn std::error::Error>> {
    let path = super::resolve_config_path(config)?;
    let config = GuardConfig::from_file(&path)
        .map_err(|e| format!("failed to load {}: {e}", path.display()))?
        .resolve()?;
    debug!(config = %path.display(), account = %config.account, "loaded guard config");

    let decision = match proposal {
        Proposal::Call { target, data } => {
            let caller = caller
                .or(config.asset_manager)
                .ok_or("no --caller given and no asset_manager configured")?;
            evaluate(&config, caller, target, &data)?
        }
        Proposal::OwnerWithdraw { token, amount } => {
            evaluate_owner_withdraw(&config, caller.unwrap_or(config.owner), token, amount)?
        }
    };
    println!("{}", serde_json::to_string_pretty(&decision.to_json())?);
    Ok(decision.is_allowed())
}

fn validator_and_context(
    config: &ResolvedConfig,
    caller: Address,
) -> Result<(PolicyValidator, CallContext), Box<dyn std::error::Error>> {
    let ctx = CallContext {
        caller,
        owner: config.owner,
        asset_manager: config.asset_manager,
        account: config.account,
    };
    Ok((PolicyValidator::new(config.build_store()?), ctx))
}

/// Evaluate one call as the configured vault's guard would.
pub(crate) fn evaluate(
    config: &ResolvedConfig,
    caller: Address,
    target: Address,
    data: &[u8],
) -> Result<Decision, Box<dyn std::error::Error>> {
    let (validator, ctx) = validator_and_context(config, caller)?;
    Ok(validator.check_call(&ctx, target, data))
}

/// Evaluate an owner withdrawal as the configured vault's guard would.
pub(crate) fn evaluate_owner_withdraw(
    config: &ResolvedConfig,
    caller: Address,
    token: Address,
    amount: U256,
) -> Result<Decision, Box<dyn std::error::Error>> {
    let (validator, ctx) = validator_and_context(config, caller)?;
    Ok(validator.check_owner_withdraw(&ctx, token, amount))
}
