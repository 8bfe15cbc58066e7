//! Uniswap V3 packed path decoding.
//!
//! Path encoding: `token(20) | fee(3) | token(20) [| fee(3) | token(20) ]*`

use alloy::primitives::Address;
use thiserror::Error;

const ADDR_LEN: usize = 20;
const FEE_LEN: usize = 3;
const HOP_LEN: usize = ADDR_LEN + FEE_LEN;

/// Why a packed path could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("path length {0} is shorter than one hop (43 bytes)")]
    TooShort(usize),
    #[error("path length {0} is not 20 + 23*n")]
    BadLength(usize),
}

/// A decoded hop in a Uniswap V3 multi-hop path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathHop {
    pub token_in: Address,
    pub fee: u32,
    pub token_out: Address,
}

/// Decode a packed path into its hops.
pub fn decode_packed_path(path: &[u8]) -> Result<Vec<PathHop>, PathError> {
    if path.len() < ADDR_LEN + HOP_LEN {
        return Err(PathError::TooShort(path.len()));
    }
    if (path.len() - ADDR_LEN) % HOP_LEN != 0 {
        return Err(PathError::BadLength(path.len()));
    }

    let num_hops = (path.len() - ADDR_LEN) / HOP_LEN;
    let mut hops = Vec::with_capacity(num_hops);
    let mut offset = 0;

    for _ in 0..num_hops {
        let token_in = Address::from_slice(&path[offset..offset + ADDR_LEN]);
        offset += ADDR_LEN;
        let fee = ((path[offset] as u32) << 16)
            | ((path[offset + 1] as u32) << 8)
            | (path[offset + 2] as u32);
        offset += FEE_LEN;
        let token_out = Address::from_slice(&path[offset..offset + ADDR_LEN]);
        // token_out is the next hop's token_in; offset stays on it

        hops.push(PathHop {
            token_in,
            fee,
            token_out,
        });
    }

    Ok(hops)
}

/// Every token in a packed path, in path order (hop endpoints are not repeated).
pub fn path_tokens(path: &[u8]) -> Result<Vec<Address>, PathError> {
    let hops = decode_packed_path(path)?;
    let mut tokens = Vec::with_capacity(hops.len() + 1);
    if let Some(first) = hops.first() {
        tokens.push(first.token_in);
    }
    tokens.extend(hops.iter().map(|hop| hop.token_out));
    Ok(tokens)
}

/// Build a packed path from tokens and per-hop fees. `fees.len()` must be
/// `tokens.len() - 1`; extra entries on either side are ignored.
pub fn encode_packed_path(tokens: &[Address], fees: &[u32]) -> Vec<u8> {
    let mut path = Vec::with_capacity(tokens.len() * HOP_LEN);
    for (i, token) in tokens.iter().enumerate() {
        path.extend_from_slice(token.as_slice());
        if i + 1 < tokens.len() {
            let fee = fees.get(i).copied().unwrap_or_default();
            path.push((fee >> 16) as u8);
            path.push((fee >> 8) as u8);
            path.push(fee as u8);
        }
    }
    path
}
