//! ERC-4626 and ERC-7540 vaults. The vault share token is the call target.
//!
//! Deposits, mints and async requests credit a beneficiary (receiver or
//! controller); withdrawals and redemptions pay out to a recipient. The
//! ERC-7540 claim overloads take `(amount, receiver, controller)`.

use alloy::primitives::Address;
use alloy::sol_types::SolInterface;
use vaultguard_core::ProtocolFamily;

use crate::abi::{IERC4626, IERC7540};
use crate::decoder::{abi_failure, selector_of, CallDecoder, DecodeFailure, KnownFunction};
use crate::intent::CallIntent;

const FUNCTIONS: &[KnownFunction] = &[
    KnownFunction::of::<IERC4626::depositCall>(),
    KnownFunction::of::<IERC4626::mintCall>(),
    KnownFunction::of::<IERC4626::withdrawCall>(),
    KnownFunction::of::<IERC4626::redeemCall>(),
    KnownFunction::of::<IERC7540::requestDepositCall>(),
    KnownFunction::of::<IERC7540::requestRedeemCall>(),
    KnownFunction::of::<IERC7540::depositCall>(),
    KnownFunction::of::<IERC7540::mintCall>(),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct TokenizedVaultDecoder;

impl TokenizedVaultDecoder {
    fn decode_4626(
        &self,
        target: Address,
        data: &[u8],
    ) -> Result<CallIntent, DecodeFailure> {
        use IERC4626::IERC4626Calls as Calls;

        let selector = selector_of(data).ok_or(DecodeFailure::NoSelector)?;
        let call = Calls::abi_decode_validate(data)
            .map_err(|err| abi_failure(self.family(), FUNCTIONS, data, err))?;
        let family = self.family();

        let intent = match call {
            Calls::deposit(c) => CallIntent::recognized(target, selector, family, "deposit")
                .with_beneficiary(c.receiver)
                .with_amounts([c.assets]),
            Calls::mint(c) => CallIntent::recognized(target, selector, family, "mint")
                .with_beneficiary(c.receiver)
                .with_amounts([c.shares]),
            Calls::withdraw(c) => CallIntent::recognized(target, selector, family, "withdraw")
                .with_recipient(c.receiver)
                .with_amounts([c.assets]),
            Calls::redeem(c) => CallIntent::recognized(target, selector, family, "redeem")
                .with_recipient(c.receiver)
                .with_amounts([c.shares]),
        };
        Ok(intent.with_tokens([target]))
    }

    fn decode_7540(
        &self,
        target: Address,
        data: &[u8],
    ) -> Result<CallIntent, DecodeFailure> {
        use IERC7540::IERC7540Calls as Calls;

        let selector = selector_of(data).ok_or(DecodeFailure::NoSelector)?;
        let call = Calls::abi_decode_validate(data)
            .map_err(|err| abi_failure(self.family(), FUNCTIONS, data, err))?;
        let family = self.family();

        let intent = match call {
            Calls::requestDeposit(c) => {
                CallIntent::recognized(target, selector, family, "requestDeposit")
                    .with_beneficiary(c.controller)
                    .with_amounts([c.assets])
            }
            Calls::requestRedeem(c) => {
                CallIntent::recognized(target, selector, family, "requestRedeem")
                    .with_beneficiary(c.controller)
                    .with_amounts([c.shares])
            }
            Calls::deposit(c) => CallIntent::recognized(target, selector, family, "deposit")
                .with_beneficiary(c.receiver)
                .with_amounts([c.assets]),
            Calls::mint(c) => CallIntent::recognized(target, selector, family, "mint")
                .with_beneficiary(c.receiver)
                .with_amounts([c.shares]),
        };
        Ok(intent.with_tokens([target]))
    }
}

impl CallDecoder for TokenizedVaultDecoder {
    fn family(&self) -> ProtocolFamily {
        ProtocolFamily::TokenizedVault
    }

    fn functions(&self) -> &'static [KnownFunction] {
        FUNCTIONS
    }

    fn decode(&self, target: Address, data: &[u8]) -> Result<CallIntent, DecodeFailure> {
        let selector = selector_of(data).ok_or(DecodeFailure::NoSelector)?;
        if IERC4626::IERC4626Calls::valid_selector(selector.0) {
            self.decode_4626(target, data)
        } else if IERC7540::IERC7540Calls::valid_selector(selector.0) {
            self.decode_7540(target, data)
        } else {
            Err(DecodeFailure::UnknownSelector {
                selector,
                family: self.family(),
            })
        }
    }
}
