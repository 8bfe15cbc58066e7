//! Aave V3-style lending pool: supply credits `onBehalfOf`, withdraw pays `to`.

use alloy::primitives::{Address, U256};
use alloy::sol_types::SolInterface;
use vaultguard_core::ProtocolFamily;

use crate::abi::ILendingPool;
use crate::decoder::{abi_failure, selector_of, CallDecoder, DecodeFailure, KnownFunction};
use crate::intent::CallIntent;

const FUNCTIONS: &[KnownFunction] = &[
    KnownFunction::of::<ILendingPool::supplyCall>(),
    KnownFunction::of::<ILendingPool::withdrawCall>(),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct LendingDecoder;

impl CallDecoder for LendingDecoder {
    fn family(&self) -> ProtocolFamily {
        ProtocolFamily::Lending
    }

    fn functions(&self) -> &'static [KnownFunction] {
        FUNCTIONS
    }

    fn decode(&self, target: Address, data: &[u8]) -> Result<CallIntent, DecodeFailure> {
        let selector = selector_of(data).ok_or(DecodeFailure::NoSelector)?;
        let call = ILendingPool::ILendingPoolCalls::abi_decode_validate(data)
            .map_err(|err| abi_failure(self.family(), FUNCTIONS, data, err))?;

        let intent = match call {
            ILendingPool::ILendingPoolCalls::supply(c) => {
                CallIntent::recognized(target, selector, self.family(), "supply")
                    .with_tokens([c.asset])
                    .with_beneficiary(c.onBehalfOf)
                    .with_amounts([c.amount, U256::from(c.referralCode)])
            }
            ILendingPool::ILendingPoolCalls::withdraw(c) => {
                CallIntent::recognized(target, selector, self.family(), "withdraw")
                    .with_tokens([c.asset])
                    .with_recipient(c.to)
                    .with_amounts([c.amount])
            }
        };
        Ok(intent)
    }
}
