//! Decoded, authorization-relevant summary of one proposed call.

use alloy::primitives::{Address, Selector, B256, U256};
use serde_json::json;
use vaultguard_core::ProtocolFamily;

/// Direction of a cross-chain rebalance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebalanceAction {
    Burn,
    Mint,
}

impl RebalanceAction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Burn => "burn",
            Self::Mint => "mint",
        }
    }
}

impl TryFrom<u8> for RebalanceAction {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Burn),
            1 => Ok(Self::Mint),
            other => Err(other),
        }
    }
}

/// Family-specific fields kept for the audit trail only.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum IntentMetadata {
    #[default]
    None,
    Rebalance {
        rebalance_id: U256,
        action: RebalanceAction,
        source_chain: U256,
        destination_chain: U256,
    },
    ExchangeAccount {
        account_id: Option<B256>,
        broker_hash: B256,
        token_hash: Option<B256>,
        delegate_signer: Option<Address>,
    },
}

/// Ephemeral decoded view of a call. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallIntent {
    /// Contract the call is sent to.
    pub target: Address,
    pub selector: Selector,
    /// `None` when the selector is not in the decoder table.
    pub family: Option<ProtocolFamily>,
    /// Function name for recognized selectors.
    pub function: Option<&'static str>,
    /// Every token the call touches, in call order (multi-hop paths in full).
    pub tokens: Vec<Address>,
    /// Address that receives output funds (transfers, swaps, withdrawals).
    pub recipient: Option<Address>,
    /// Address credited with shares or positions (deposits, supplies, requests).
    pub beneficiary: Option<Address>,
    /// Address granted an allowance.
    pub spender: Option<Address>,
    /// Amount arguments in call order. Not authorization-relevant.
    pub amounts: Vec<U256>,
    pub metadata: IntentMetadata,
}

impl CallIntent {
    /// Intent for a selector no decoder recognizes: nothing is extracted.
    pub fn bare(target: Address, selector: Selector) -> Self {
        Self {
            target,
            selector,
            family: None,
            function: None,
            tokens: Vec::new(),
            recipient: None,
            beneficiary: None,
            spender: None,
            amounts: Vec::new(),
            metadata: IntentMetadata::None,
        }
    }

    /// Empty intent for a recognized function; decoders fill in the rest.
    pub fn recognized(
        target: Address,
        selector: Selector,
        family: ProtocolFamily,
        function: &'static str,
    ) -> Self {
        Self {
            family: Some(family),
            function: Some(function),
            ..Self::bare(target, selector)
        }
    }

    pub fn with_tokens(mut self, tokens: impl IntoIterator<Item = Address>) -> Self {
        self.tokens.extend(tokens);
        self
    }

    pub fn with_recipient(mut self, recipient: Address) -> Self {
        self.recipient = Some(recipient);
        self
    }

    pub fn with_beneficiary(mut self, beneficiary: Address) -> Self {
        self.beneficiary = Some(beneficiary);
        self
    }

    pub fn with_spender(mut self, spender: Address) -> Self {
        self.spender = Some(spender);
        self
    }

    pub fn with_amounts(mut self, amounts: impl IntoIterator<Item = U256>) -> Self {
        self.amounts.extend(amounts);
        self
    }

    pub fn with_metadata(mut self, metadata: IntentMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Whether a decoder recognized the selector.
    pub fn is_recognized(&self) -> bool {
        self.family.is_some()
    }

    /// Structured form for the audit trail and the CLI.
    pub fn to_json(&self) -> serde_json::Value {
        let metadata = match &self.metadata {
            IntentMetadata::None => serde_json::Value::Null,
            IntentMetadata::Rebalance {
                rebalance_id,
                action,
                source_chain,
                destination_chain,
            } => json!({
                "rebalance_id": rebalance_id.to_string(),
                "action": action.as_str(),
                "source_chain": source_chain.to_string(),
                "destination_chain": destination_chain.to_string(),
            }),
            IntentMetadata::ExchangeAccount {
                account_id,
                broker_hash,
                token_hash,
                delegate_signer,
            } => json!({
                "account_id": account_id.map(|h| h.to_string()),
                "broker_hash": broker_hash.to_string(),
                "token_hash": token_hash.map(|h| h.to_string()),
                "delegate_signer": delegate_signer.map(|a| a.to_string()),
            }),
        };

        json!({
            "target": self.target.to_string(),
            "selector": self.selector.to_string(),
            "family": self.family.map(|f| f.as_str()),
            "function": self.function,
            "tokens": self.tokens.iter().map(|t| t.to_string()).collect::<Vec<_>>(),
            "recipient": self.recipient.map(|a| a.to_string()),
            "beneficiary": self.beneficiary.map(|a| a.to_string()),
            "spender": self.spender.map(|a| a.to_string()),
            "amounts": self.amounts.iter().map(|a| a.to_string()).collect::<Vec<_>>(),
            "metadata": metadata,
        })
    }
}
