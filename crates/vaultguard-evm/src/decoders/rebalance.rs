//! Cross-chain rebalance messages. The destination is fixed by the relay,
//! so only the token and the chain pair are extracted.

use alloy::primitives::{Address, U256};
use alloy::sol_types::SolInterface;
use vaultguard_core::ProtocolFamily;

use crate::abi::IRebalanceRelay;
use crate::decoder::{abi_failure, selector_of, CallDecoder, DecodeFailure, KnownFunction};
use crate::intent::{CallIntent, IntentMetadata, RebalanceAction};

const FUNCTIONS: &[KnownFunction] = &[KnownFunction::of::<IRebalanceRelay::rebalanceCall>()];

#[derive(Debug, Clone, Copy, Default)]
pub struct RebalanceRelayDecoder;

impl CallDecoder for RebalanceRelayDecoder {
    fn family(&self) -> ProtocolFamily {
        ProtocolFamily::RebalanceRelay
    }

    fn functions(&self) -> &'static [KnownFunction] {
        FUNCTIONS
    }

    fn decode(&self, target: Address, data: &[u8]) -> Result<CallIntent, DecodeFailure> {
        let selector = selector_of(data).ok_or(DecodeFailure::NoSelector)?;
        let call = IRebalanceRelay::IRebalanceRelayCalls::abi_decode_validate(data)
            .map_err(|err| abi_failure(self.family(), FUNCTIONS, data, err))?;

        let IRebalanceRelay::IRebalanceRelayCalls::rebalance(c) = call;
        let message = c.message;
        let action =
            RebalanceAction::try_from(message.action).map_err(|value| DecodeFailure::OutOfRange {
                function: "rebalance",
                field: "action",
                value: value.into(),
            })?;

        Ok(
            CallIntent::recognized(target, selector, self.family(), "rebalance")
                .with_tokens([message.token])
                .with_amounts([U256::from(message.amount)])
                .with_metadata(IntentMetadata::Rebalance {
                    rebalance_id: message.rebalanceId,
                    action,
                    source_chain: message.srcChainId,
                    destination_chain: message.dstChainId,
                }),
        )
    }
}
