//! Uniswap V2-style routers: every token of the `address[]` path must be
//! checked, not only its endpoints.

use alloy::primitives::{Address, U256};
use alloy::sol_types::SolInterface;
use vaultguard_core::ProtocolFamily;

use crate::abi::IUniswapV2Router;
use crate::decoder::{abi_failure, selector_of, CallDecoder, DecodeFailure, KnownFunction};
use crate::intent::CallIntent;

const FUNCTIONS: &[KnownFunction] = &[
    KnownFunction::of::<IUniswapV2Router::swapExactTokensForTokensCall>(),
    KnownFunction::of::<IUniswapV2Router::swapTokensForExactTokensCall>(),
    KnownFunction::of::<IUniswapV2Router::swapExactTokensForTokensSupportingFeeOnTransferTokensCall>(),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct PairSwapDecoder;

impl CallDecoder for PairSwapDecoder {
    fn family(&self) -> ProtocolFamily {
        ProtocolFamily::PairSwap
    }

    fn functions(&self) -> &'static [KnownFunction] {
        FUNCTIONS
    }

    fn decode(&self, target: Address, data: &[u8]) -> Result<CallIntent, DecodeFailure> {
        use IUniswapV2Router::IUniswapV2RouterCalls as Calls;

        let selector = selector_of(data).ok_or(DecodeFailure::NoSelector)?;
        let call = Calls::abi_decode_validate(data)
            .map_err(|err| abi_failure(self.family(), FUNCTIONS, data, err))?;

        let (function, path, to, amounts): (&'static str, Vec<Address>, Address, [U256; 2]) =
            match call {
                Calls::swapExactTokensForTokens(c) => (
                    "swapExactTokensForTokens",
                    c.path,
                    c.to,
                    [c.amountIn, c.amountOutMin],
                ),
                Calls::swapTokensForExactTokens(c) => (
                    "swapTokensForExactTokens",
                    c.path,
                    c.to,
                    [c.amountOut, c.amountInMax],
                ),
                Calls::swapExactTokensForTokensSupportingFeeOnTransferTokens(c) => (
                    "swapExactTokensForTokensSupportingFeeOnTransferTokens",
                    c.path,
                    c.to,
                    [c.amountIn, c.amountOutMin],
                ),
            };

        if path.len() < 2 {
            return Err(DecodeFailure::InvalidPath {
                function,
                reason: format!("path must contain at least 2 tokens, got {}", path.len()),
            });
        }

        Ok(
            CallIntent::recognized(target, selector, self.family(), function)
                .with_tokens(path)
                .with_recipient(to)
                .with_amounts(amounts),
        )
    }
}
