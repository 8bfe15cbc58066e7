//! Whitelist store — the owner-managed allow-sets consulted by the policy
//! validator.
//!
//! Three independent lists are kept:
//!
//! - `(target, selector)` pairs that may be called directly,
//! - token addresses that may appear anywhere in a decoded call,
//! - router addresses, each tagged with the [`ProtocolFamily`] whose actions
//!   it may perform.
//!
//! The store is a cheap handle: clones share the same lists, so the vault
//! that mutates them and the validator that reads them always agree.
//! Mutators are owner-only and idempotent.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use alloy::primitives::{Address, Selector};
use serde_json::json;
use thiserror::Error;
use tracing::warn;

use crate::types::ProtocolFamily;

/// Errors from whitelist mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WhitelistError {
    #[error("caller {caller} is not the owner")]
    Unauthorized { caller: Address },
}

/// A single whitelist entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhitelistEntry {
    TargetSelector { target: Address, selector: Selector },
    Token(Address),
    Router {
        router: Address,
        family: Option<ProtocolFamily>,
    },
}

impl WhitelistEntry {
    /// Name of the list this entry belongs to.
    pub fn list(&self) -> &'static str {
        match self {
            Self::TargetSelector { .. } => "target_selector",
            Self::Token(_) => "token",
            Self::Router { .. } => "router",
        }
    }
}

/// Change record produced by every mutation, no-ops included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhitelistChange {
    pub entry: WhitelistEntry,
    /// Membership before the mutation.
    pub was_member: bool,
    /// Membership after the mutation.
    pub is_member: bool,
    /// Family a router carried before it was re-tagged or removed.
    pub previous_family: Option<ProtocolFamily>,
}

impl WhitelistChange {
    /// Whether the mutation altered the store.
    pub fn changed(&self) -> bool {
        if self.was_member != self.is_member {
            return true;
        }
        match self.entry {
            WhitelistEntry::Router { family, .. } => self.is_member && family != self.previous_family,
            _ => false,
        }
    }

    /// Structured form for the audit trail.
    pub fn to_json(&self) -> serde_json::Value {
        let entry = match self.entry {
            WhitelistEntry::TargetSelector { target, selector } => {
                json!({ "target": target.to_string(), "selector": selector.to_string() })
            }
            WhitelistEntry::Token(token) => json!({ "token": token.to_string() }),
            WhitelistEntry::Router { router, family } => json!({
                "router": router.to_string(),
                "family": family.map(|f| f.as_str()),
            }),
        };
        json!({
            "list": self.entry.list(),
            "entry": entry,
            "was_member": self.was_member,
            "is_member": self.is_member,
            "previous_family": self.previous_family.map(|f| f.as_str()),
            "changed": self.changed(),
        })
    }
}

/// Point-in-time copy of all lists, sorted by address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhitelistSnapshot {
    pub owner: Address,
    pub target_selectors: Vec<(Address, Selector)>,
    pub tokens: Vec<Address>,
    pub routers: Vec<(Address, ProtocolFamily)>,
}

#[derive(Debug)]
struct Lists {
    owner: Address,
    target_selectors: BTreeSet<(Address, Selector)>,
    tokens: BTreeSet<Address>,
    routers: BTreeMap<Address, ProtocolFamily>,
}

/// Shared handle to the whitelists of one account.
#[derive(Debug, Clone)]
pub struct WhitelistStore {
    inner: Arc<RwLock<Lists>>,
}

impl WhitelistStore {
    /// Create an empty store administered by `owner`.
    pub fn new(owner: Address) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Lists {
                owner,
                target_selectors: BTreeSet::new(),
                tokens: BTreeSet::new(),
                routers: BTreeMap::new(),
            })),
        }
    }

    // Every mutation is a single set operation, so a poisoned lock still
    // holds consistent lists.
    fn read(&self) -> RwLockReadGuard<'_, Lists> {
        self.inner.read().unwrap_or_else(|poisoned| {
            warn!("whitelist lock poisoned; recovering for read");
            poisoned.into_inner()
        })
    }

    fn write_as(&self, caller: Address) -> Result<RwLockWriteGuard<'_, Lists>, WhitelistError> {
        let lists = self.inner.write().unwrap_or_else(|poisoned| {
            warn!("whitelist lock poisoned; recovering for write");
            poisoned.into_inner()
        });
        if lists.owner != caller {
            return Err(WhitelistError::Unauthorized { caller });
        }
        Ok(lists)
    }

    /// The identity allowed to mutate the store.
    pub fn owner(&self) -> Address {
        self.read().owner
    }

    /// Hand administration to `new_owner`. Returns the previous owner.
    pub fn set_owner(&self, caller: Address, new_owner: Address) -> Result<Address, WhitelistError> {
        let mut lists = self.write_as(caller)?;
        Ok(std::mem::replace(&mut lists.owner, new_owner))
    }

    // ---- target / selector pairs ----

    pub fn add_target_selector(
        &self,
        caller: Address,
        target: Address,
        selector: Selector,
    ) -> Result<WhitelistChange, WhitelistError> {
        let mut lists = self.write_as(caller)?;
        let inserted = lists.target_selectors.insert((target, selector));
        Ok(WhitelistChange {
            entry: WhitelistEntry::TargetSelector { target, selector },
            was_member: !inserted,
            is_member: true,
            previous_family: None,
        })
    }

    pub fn remove_target_selector(
        &self,
        caller: Address,
        target: Address,
        selector: Selector,
    ) -> Result<WhitelistChange, WhitelistError> {
        let mut lists = self.write_as(caller)?;
        let removed = lists.target_selectors.remove(&(target, selector));
        Ok(WhitelistChange {
            entry: WhitelistEntry::TargetSelector { target, selector },
            was_member: removed,
            is_member: false,
            previous_family: None,
        })
    }

    pub fn is_target_selector_allowed(&self, target: Address, selector: Selector) -> bool {
        self.read().target_selectors.contains(&(target, selector))
    }

    /// Whether `target` appears in at least one whitelisted pair.
    pub fn is_target_listed(&self, target: Address) -> bool {
        self.read()
            .target_selectors
            .range((target, Selector::ZERO)..=(target, Selector::repeat_byte(0xff)))
            .next()
            .is_some()
    }

    // ---- tokens ----

    pub fn add_token(&self, caller: Address, token: Address) -> Result<WhitelistChange, WhitelistError> {
        let mut lists = self.write_as(caller)?;
        let inserted = lists.tokens.insert(token);
        Ok(WhitelistChange {
            entry: WhitelistEntry::Token(token),
            was_member: !inserted,
            is_member: true,
            previous_family: None,
        })
    }

    pub fn remove_token(&self, caller: Address, token: Address) -> Result<WhitelistChange, WhitelistError> {
        let mut lists = self.write_as(caller)?;
        let removed = lists.tokens.remove(&token);
        Ok(WhitelistChange {
            entry: WhitelistEntry::Token(token),
            was_member: removed,
            is_member: false,
            previous_family: None,
        })
    }

    pub fn is_token_allowed(&self, token: Address) -> bool {
        self.read().tokens.contains(&token)
    }

    // ---- routers ----

    /// Whitelist `router` for `family`. Re-adding with another family re-tags it.
    pub fn add_router(
        &self,
        caller: Address,
        router: Address,
        family: ProtocolFamily,
    ) -> Result<WhitelistChange, WhitelistError> {
        let mut lists = self.write_as(caller)?;
        let previous = lists.routers.insert(router, family);
        Ok(WhitelistChange {
            entry: WhitelistEntry::Router {
                router,
                family: Some(family),
            },
            was_member: previous.is_some(),
            is_member: true,
            previous_family: previous,
        })
    }

    pub fn remove_router(&self, caller: Address, router: Address) -> Result<WhitelistChange, WhitelistError> {
        let mut lists = self.write_as(caller)?;
        let previous = lists.routers.remove(&router);
        Ok(WhitelistChange {
            entry: WhitelistEntry::Router { router, family: None },
            was_member: previous.is_some(),
            is_member: false,
            previous_family: previous,
        })
    }

    pub fn is_router_allowed(&self, router: Address) -> bool {
        self.read().routers.contains_key(&router)
    }

    /// Family the router was whitelisted for, if any.
    pub fn router_family(&self, router: Address) -> Option<ProtocolFamily> {
        self.read().routers.get(&router).copied()
    }

    /// Copy of every list.
    pub fn snapshot(&self) -> WhitelistSnapshot {
        let lists = self.read();
        WhitelistSnapshot {
            owner: lists.owner,
            target_selectors: lists.target_selectors.iter().copied().collect(),
            tokens: lists.tokens.iter().copied().collect(),
            routers: lists.routers.iter().map(|(r, f)| (*r, *f)).collect(),
        }
    }
}
