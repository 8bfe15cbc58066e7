//! Uniswap V3 SwapRouter02. Single-pool calls carry both tokens explicitly;
//! multi-hop calls carry a packed path whose every token is extracted.

use alloy::primitives::Address;
use alloy::sol_types::SolInterface;
use vaultguard_core::ProtocolFamily;

use crate::abi::IV3SwapRouter;
use crate::decoder::{abi_failure, selector_of, CallDecoder, DecodeFailure, KnownFunction};
use crate::intent::CallIntent;
use crate::path::path_tokens;

const FUNCTIONS: &[KnownFunction] = &[
    KnownFunction::of::<IV3SwapRouter::exactInputSingleCall>(),
    KnownFunction::of::<IV3SwapRouter::exactInputCall>(),
    KnownFunction::of::<IV3SwapRouter::exactOutputSingleCall>(),
    KnownFunction::of::<IV3SwapRouter::exactOutputCall>(),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct PathSwapDecoder;

impl CallDecoder for PathSwapDecoder {
    fn family(&self) -> ProtocolFamily {
        ProtocolFamily::PathSwap
    }

    fn functions(&self) -> &'static [KnownFunction] {
        FUNCTIONS
    }

    fn decode(&self, target: Address, data: &[u8]) -> Result<CallIntent, DecodeFailure> {
        use IV3SwapRouter::IV3SwapRouterCalls as Calls;

        let selector = selector_of(data).ok_or(DecodeFailure::NoSelector)?;
        let call = Calls::abi_decode_validate(data)
            .map_err(|err| abi_failure(self.family(), FUNCTIONS, data, err))?;
        let family = self.family();

        let intent = match call {
            Calls::exactInputSingle(c) => {
                let p = c.params;
                CallIntent::recognized(target, selector, family, "exactInputSingle")
                    .with_tokens([p.tokenIn, p.tokenOut])
                    .with_recipient(p.recipient)
                    .with_amounts([p.amountIn, p.amountOutMinimum])
            }
            Calls::exactOutputSingle(c) => {
                let p = c.params;
                CallIntent::recognized(target, selector, family, "exactOutputSingle")
                    .with_tokens([p.tokenIn, p.tokenOut])
                    .with_recipient(p.recipient)
                    .with_amounts([p.amountOut, p.amountInMaximum])
            }
            Calls::exactInput(c) => {
                let p = c.params;
                let tokens = path_tokens(&p.path).map_err(|e| ("exactInput", e))?;
                CallIntent::recognized(target, selector, family, "exactInput")
                    .with_tokens(tokens)
                    .with_recipient(p.recipient)
                    .with_amounts([p.amountIn, p.amountOutMinimum])
            }
            // exactOutput paths are encoded tokenOut first.
            Calls::exactOutput(c) => {
                let p = c.params;
                let tokens = path_tokens(&p.path).map_err(|e| ("exactOutput", e))?;
                CallIntent::recognized(target, selector, family, "exactOutput")
                    .with_tokens(tokens)
                    .with_recipient(p.recipient)
                    .with_amounts([p.amountOut, p.amountInMaximum])
            }
        };
        Ok(intent)
    }
}
