//! Asset manager lifecycle: `Unset → Enabled → Disabled → Enabled`.

use alloy::primitives::Address;
use serde_json::json;

/// The single operator allowed to propose calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ManagerState {
    #[default]
    Unset,
    Enabled(Address),
    /// Paused; the address is kept so the owner can resume it.
    Disabled(Address),
}

impl ManagerState {
    /// The manager, only while enabled.
    pub fn active(&self) -> Option<Address> {
        match self {
            ManagerState::Enabled(addr) => Some(*addr),
            _ => None,
        }
    }

    /// The configured manager, enabled or not.
    pub fn address(&self) -> Option<Address> {
        match self {
            ManagerState::Unset => None,
            ManagerState::Enabled(addr) | ManagerState::Disabled(addr) => Some(*addr),
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            ManagerState::Unset => "unset",
            ManagerState::Enabled(_) => "enabled",
            ManagerState::Disabled(_) => "disabled",
        }
    }

    /// Enable `manager`, or clear the slot with `None`. Returns the previous state.
    pub fn set(&mut self, manager: Option<Address>) -> ManagerState {
        let next = match manager {
            Some(addr) => ManagerState::Enabled(addr),
            None => ManagerState::Unset,
        };
        std::mem::replace(self, next)
    }

    /// Disable an enabled manager. Returns whether the state changed.
    pub fn pause(&mut self) -> bool {
        match *self {
            ManagerState::Enabled(addr) => {
                *self = ManagerState::Disabled(addr);
                true
            }
            _ => false,
        }
    }

    /// Re-enable a paused manager. Returns whether the state changed.
    pub fn resume(&mut self) -> bool {
        match *self {
            ManagerState::Disabled(addr) => {
                *self = ManagerState::Enabled(addr);
                true
            }
            _ => false,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "state": self.as_str(),
            "address": self.address().map(|a| a.to_string()),
        })
    }
}
