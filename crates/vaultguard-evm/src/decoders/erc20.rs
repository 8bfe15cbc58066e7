//! ERC-20 transfer, transferFrom and approve. The token is the call target.

use alloy::primitives::Address;
use alloy::sol_types::SolInterface;
use vaultguard_core::ProtocolFamily;

use crate::abi::IERC20;
use crate::decoder::{abi_failure, selector_of, CallDecoder, DecodeFailure, KnownFunction};
use crate::intent::CallIntent;

const FUNCTIONS: &[KnownFunction] = &[
    KnownFunction::of::<IERC20::transferCall>(),
    KnownFunction::of::<IERC20::transferFromCall>(),
    KnownFunction::of::<IERC20::approveCall>(),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct Erc20Decoder;

impl CallDecoder for Erc20Decoder {
    fn family(&self) -> ProtocolFamily {
        ProtocolFamily::Erc20
    }

    fn functions(&self) -> &'static [KnownFunction] {
        FUNCTIONS
    }

    fn decode(&self, target: Address, data: &[u8]) -> Result<CallIntent, DecodeFailure> {
        let selector = selector_of(data).ok_or(DecodeFailure::NoSelector)?;
        let call = IERC20::IERC20Calls::abi_decode_validate(data)
            .map_err(|err| abi_failure(self.family(), FUNCTIONS, data, err))?;

        let intent = match call {
            IERC20::IERC20Calls::transfer(c) => {
                CallIntent::recognized(target, selector, self.family(), "transfer")
                    .with_recipient(c.to)
                    .with_amounts([c.amount])
            }
            IERC20::IERC20Calls::transferFrom(c) => {
                CallIntent::recognized(target, selector, self.family(), "transferFrom")
                    .with_recipient(c.to)
                    .with_amounts([c.amount])
            }
            IERC20::IERC20Calls::approve(c) => {
                CallIntent::recognized(target, selector, self.family(), "approve")
                    .with_spender(c.spender)
                    .with_amounts([c.amount])
            }
        };
        Ok(intent.with_tokens([target]))
    }
}
