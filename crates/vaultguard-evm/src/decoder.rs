//! Selector-keyed call decoding.
//!
//! Each protocol family implements [`CallDecoder`]. A [`DecoderRegistry`]
//! maps every known selector to the decoder for its family; it is built once
//! and shared read-only by the validator.

use std::collections::HashMap;
use std::fmt;

use alloy::primitives::{Address, Selector};
use alloy::sol_types::SolCall;
use thiserror::Error;
use tracing::{debug, error};
use vaultguard_core::ProtocolFamily;

use crate::decoders;
use crate::intent::CallIntent;
use crate::path::PathError;

/// Why calldata could not be turned into an intent. Always fails closed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeFailure {
    #[error("calldata is shorter than a 4-byte selector")]
    NoSelector,
    #[error("selector {selector} is not a {family} function")]
    UnknownSelector {
        selector: Selector,
        family: ProtocolFamily,
    },
    #[error("{function}: malformed arguments: {reason}")]
    MalformedArgs {
        function: &'static str,
        reason: String,
    },
    #[error("{function}: invalid swap path: {reason}")]
    InvalidPath {
        function: &'static str,
        reason: String,
    },
    #[error("{function}: {field} value {value} is out of range")]
    OutOfRange {
        function: &'static str,
        field: &'static str,
        value: u64,
    },
}

impl From<(&'static str, PathError)> for DecodeFailure {
    fn from((function, err): (&'static str, PathError)) -> Self {
        DecodeFailure::InvalidPath {
            function,
            reason: err.to_string(),
        }
    }
}

/// A function a decoder recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownFunction {
    pub selector: Selector,
    /// Canonical signature, e.g. `transfer(address,uint256)`.
    pub signature: &'static str,
}

impl KnownFunction {
    pub const fn of<C: SolCall>() -> Self {
        Self {
            selector: Selector::new(C::SELECTOR),
            signature: C::SIGNATURE,
        }
    }

    /// Function name without the argument list.
    pub fn name(&self) -> &'static str {
        match self.signature.find('(') {
            Some(end) => &self.signature[..end],
            None => self.signature,
        }
    }
}

impl fmt::Display for KnownFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.selector, self.signature)
    }
}

/// Decoding rule for one protocol family.
pub trait CallDecoder: Send + Sync {
    fn family(&self) -> ProtocolFamily;

    /// Every function this decoder extracts an intent from.
    fn functions(&self) -> &'static [KnownFunction];

    /// Decode `data` (selector included) sent to `target`.
    fn decode(&self, target: Address, data: &[u8]) -> Result<CallIntent, DecodeFailure>;
}

/// First four bytes of calldata.
pub fn selector_of(data: &[u8]) -> Option<Selector> {
    data.get(..4).map(Selector::from_slice)
}

/// Map an ABI decoding error to a failure naming the function, falling back
/// to `UnknownSelector` when the selector is foreign to the decoder.
pub(crate) fn abi_failure(
    family: ProtocolFamily,
    functions: &[KnownFunction],
    data: &[u8],
    err: impl fmt::Display,
) -> DecodeFailure {
    let Some(selector) = selector_of(data) else {
        return DecodeFailure::NoSelector;
    };
    match functions.iter().find(|f| f.selector == selector) {
        Some(function) => DecodeFailure::MalformedArgs {
            function: function.name(),
            reason: err.to_string(),
        },
        None => DecodeFailure::UnknownSelector { selector, family },
    }
}

/// Error when two decoders claim the same selector.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("selector {selector} already registered for {existing}, cannot register for {family}")]
pub struct DuplicateSelector {
    pub selector: Selector,
    pub existing: ProtocolFamily,
    pub family: ProtocolFamily,
}

/// Selector → decoder table.
pub struct DecoderRegistry {
    decoders: Vec<Box<dyn CallDecoder>>,
    by_selector: HashMap<Selector, usize>,
}

impl DecoderRegistry {
    /// Registry with no decoders: every call decodes to a bare intent.
    pub fn empty() -> Self {
        Self {
            decoders: Vec::new(),
            by_selector: HashMap::new(),
        }
    }

    /// Registry with every built-in family.
    pub fn standard() -> Self {
        Self::seeded(decoders::standard())
    }

    fn seeded(built_in: Vec<Box<dyn CallDecoder>>) -> Self {
        let mut registry = Self::empty();
        for decoder in built_in {
            // Release builds keep the first registration on a collision.
            if let Err(err) = registry.register(decoder) {
                error!("built-in decoder collision: {err}");
                debug_assert!(false, "built-in decoder collision: {err}");
            }
        }
        registry
    }

    /// Add a decoder. Fails without registering anything if any of its
    /// selectors is already claimed.
    pub fn register(&mut self, decoder: Box<dyn CallDecoder>) -> Result<(), DuplicateSelector> {
        for function in decoder.functions() {
            if let Some(&idx) = self.by_selector.get(&function.selector) {
                return Err(DuplicateSelector {
                    selector: function.selector,
                    existing: self.decoders[idx].family(),
                    family: decoder.family(),
                });
            }
        }
        let idx = self.decoders.len();
        for function in decoder.functions() {
            self.by_selector.insert(function.selector, idx);
        }
        self.decoders.push(decoder);
        Ok(())
    }

    pub fn decoder_for(&self, selector: Selector) -> Option<&dyn CallDecoder> {
        self.by_selector
            .get(&selector)
            .map(|&idx| self.decoders[idx].as_ref())
    }

    /// Family a selector belongs to, if recognized.
    pub fn family_of(&self, selector: Selector) -> Option<ProtocolFamily> {
        self.decoder_for(selector).map(|d| d.family())
    }

    pub fn decoders(&self) -> impl Iterator<Item = &dyn CallDecoder> {
        self.decoders.iter().map(|d| d.as_ref())
    }

    /// Decode a call. Unknown selectors yield a bare intent.
    pub fn decode(&self, target: Address, data: &[u8]) -> Result<CallIntent, DecodeFailure> {
        let selector = selector_of(data).ok_or(DecodeFailure::NoSelector)?;
        match self.decoder_for(selector) {
            Some(decoder) => {
                let intent = decoder.decode(target, data)?;
                debug!(
                    %target,
                    family = %decoder.family(),
                    function = intent.function.unwrap_or_default(),
                    tokens = intent.tokens.len(),
                    "decoded call"
                );
                Ok(intent)
            }
            None => Ok(CallIntent::bare(target, selector)),
        }
    }
}

impl Default for DecoderRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
