//! One [`CallDecoder`](crate::decoder::CallDecoder) per protocol family.

mod erc20;
mod exchange;
mod lending;
mod pair_swap;
mod path_swap;
mod rebalance;
mod tokenized_vault;

pub use erc20::Erc20Decoder;
pub use exchange::ExchangeAccountDecoder;
pub use lending::LendingDecoder;
pub use pair_swap::PairSwapDecoder;
pub use path_swap::PathSwapDecoder;
pub use rebalance::RebalanceRelayDecoder;
pub use tokenized_vault::TokenizedVaultDecoder;

use crate::decoder::CallDecoder;

/// Every built-in decoder.
pub fn standard() -> Vec<Box<dyn CallDecoder>> {
    vec![
        Box::new(Erc20Decoder),
        Box::new(PairSwapDecoder),
        Box::new(PathSwapDecoder),
        Box::new(LendingDecoder),
        Box::new(TokenizedVaultDecoder),
        Box::new(RebalanceRelayDecoder),
        Box::new(ExchangeAccountDecoder),
    ]
}
