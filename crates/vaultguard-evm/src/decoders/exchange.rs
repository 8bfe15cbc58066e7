//! Exchange account actions. Funds move on the exchange's internal ledger,
//! so no token or recipient is extracted; the identifiers are kept for the
//! audit trail.

use alloy::primitives::{Address, U256};
use alloy::sol_types::SolInterface;
use vaultguard_core::ProtocolFamily;

use crate::abi::IExchangeAccount;
use crate::decoder::{abi_failure, selector_of, CallDecoder, DecodeFailure, KnownFunction};
use crate::intent::{CallIntent, IntentMetadata};

const FUNCTIONS: &[KnownFunction] = &[
    KnownFunction::of::<IExchangeAccount::delegateSignerCall>(),
    KnownFunction::of::<IExchangeAccount::depositCall>(),
    KnownFunction::of::<IExchangeAccount::withdrawCall>(),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct ExchangeAccountDecoder;

impl CallDecoder for ExchangeAccountDecoder {
    fn family(&self) -> ProtocolFamily {
        ProtocolFamily::ExchangeAccount
    }

    fn functions(&self) -> &'static [KnownFunction] {
        FUNCTIONS
    }

    fn decode(&self, target: Address, data: &[u8]) -> Result<CallIntent, DecodeFailure> {
        use IExchangeAccount::IExchangeAccountCalls as Calls;

        let selector = selector_of(data).ok_or(DecodeFailure::NoSelector)?;
        let call = Calls::abi_decode_validate(data)
            .map_err(|err| abi_failure(self.family(), FUNCTIONS, data, err))?;
        let family = self.family();

        let intent = match call {
            Calls::delegateSigner(c) => {
                CallIntent::recognized(target, selector, family, "delegateSigner").with_metadata(
                    IntentMetadata::ExchangeAccount {
                        account_id: None,
                        broker_hash: c.data.brokerHash,
                        token_hash: None,
                        delegate_signer: Some(c.data.delegateSigner),
                    },
                )
            }
            Calls::deposit(c) => CallIntent::recognized(target, selector, family, "deposit")
                .with_amounts([U256::from(c.data.amount)])
                .with_metadata(IntentMetadata::ExchangeAccount {
                    account_id: Some(c.data.accountId),
                    broker_hash: c.data.brokerHash,
                    token_hash: Some(c.data.tokenHash),
                    delegate_signer: None,
                }),
            Calls::withdraw(c) => CallIntent::recognized(target, selector, family, "withdraw")
                .with_amounts([U256::from(c.data.amount)])
                .with_metadata(IntentMetadata::ExchangeAccount {
                    account_id: Some(c.data.accountId),
                    broker_hash: c.data.brokerHash,
                    token_hash: Some(c.data.tokenHash),
                    delegate_signer: None,
                }),
        };
        Ok(intent)
    }
}
