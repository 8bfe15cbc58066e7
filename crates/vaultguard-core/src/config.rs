//! Guard YAML configuration parser.
//!
//! Loads the owner, account, asset manager and initial whitelists from a
//! `guard.yaml` file. Addresses and selectors are kept as strings in the
//! file and validated by [`GuardConfig::resolve`].

use std::path::{Path, PathBuf};
use std::str::FromStr;

use alloy::primitives::{Address, Selector};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::types::ProtocolFamily;
use crate::whitelist::{WhitelistError, WhitelistStore};

/// Errors from configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse guard YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("invalid address for {field}: {value:?}")]
    InvalidAddress { field: &'static str, value: String },
    #[error("invalid selector for target {target}: {value:?} (expected 4 hex bytes)")]
    InvalidSelector { target: String, value: String },
    #[error("whitelist error: {0}")]
    Whitelist(#[from] WhitelistError),
}

/// A `(target, selector)` pair as written in the file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetEntry {
    pub target: String,
    pub selector: String,
}

/// A router and the protocol family it serves.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouterEntry {
    pub address: String,
    pub family: ProtocolFamily,
}

/// Raw guard configuration as parsed from YAML.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GuardConfig {
    /// Owner identity (configuration authority and withdrawal recipient).
    pub owner: String,
    /// Address of the custody account the guard protects.
    pub account: String,
    /// Asset manager enabled at startup, if any.
    #[serde(default)]
    pub asset_manager: Option<String>,
    /// Whitelisted token addresses.
    #[serde(default)]
    pub tokens: Vec<String>,
    /// Whitelisted `(target, selector)` pairs.
    #[serde(default)]
    pub targets: Vec<TargetEntry>,
    /// Whitelisted routers with their protocol family.
    #[serde(default)]
    pub routers: Vec<RouterEntry>,
    /// JSONL audit log path (audit goes to `tracing` only when unset).
    #[serde(default)]
    pub audit_log: Option<PathBuf>,
}

/// Validated configuration with parsed addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub owner: Address,
    pub account: Address,
    pub asset_manager: Option<Address>,
    pub tokens: Vec<Address>,
    pub targets: Vec<(Address, Selector)>,
    pub routers: Vec<(Address, ProtocolFamily)>,
    pub audit_log: Option<PathBuf>,
}

impl GuardConfig {
    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load configuration from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Validate every address and selector.
    pub fn resolve(&self) -> Result<ResolvedConfig, ConfigError> {
        let tokens = self
            .tokens
            .iter()
            .map(|t| parse_address("tokens", t))
            .collect::<Result<Vec<_>, _>>()?;

        let targets = self
            .targets
            .iter()
            .map(|entry| {
                let target = parse_address("targets.target", &entry.target)?;
                let selector = Selector::from_str(entry.selector.trim()).map_err(|_| {
                    ConfigError::InvalidSelector {
                        target: entry.target.clone(),
                        value: entry.selector.clone(),
                    }
                })?;
                Ok((target, selector))
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        let routers = self
            .routers
            .iter()
            .map(|entry| Ok((parse_address("routers.address", &entry.address)?, entry.family)))
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(ResolvedConfig {
            owner: parse_address("owner", &self.owner)?,
            account: parse_address("account", &self.account)?,
            asset_manager: self
                .asset_manager
                .as_deref()
                .map(|m| parse_address("asset_manager", m))
                .transpose()?,
            tokens,
            targets,
            routers,
            audit_log: self.audit_log.clone(),
        })
    }
}

impl ResolvedConfig {
    /// Build a whitelist store populated with the configured lists.
    pub fn build_store(&self) -> Result<WhitelistStore, WhitelistError> {
        let store = WhitelistStore::new(self.owner);
        for token in &self.tokens {
            store.add_token(self.owner, *token)?;
        }
        for (target, selector) in &self.targets {
            store.add_target_selector(self.owner, *target, *selector)?;
        }
        for (router, family) in &self.routers {
            store.add_router(self.owner, *router, *family)?;
        }
        debug!(
            owner = %self.owner,
            tokens = self.tokens.len(),
            targets = self.targets.len(),
            routers = self.routers.len(),
            "whitelist store built from config"
        );
        Ok(store)
    }
}

fn parse_address(field: &'static str, value: &str) -> Result<Address, ConfigError> {
    Address::from_str(value.trim()).map_err(|_| ConfigError::InvalidAddress {
        field,
        value: value.to_string(),
    })
}
