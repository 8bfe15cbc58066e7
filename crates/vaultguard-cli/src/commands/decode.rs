//! `vaultguard decode` — show the intent extracted from calldata.

use alloy::primitives::{Address, Bytes};
use vaultguard_evm::DecoderRegistry;

/// Run the `decode` subcommand.
pub fn run(target: Address, data: Bytes) -> Result<(), Box<dyn std::error::Error>> {
    let registry = DecoderRegistry::standard();
    let intent = registry.decode(target, &data)?;
    if !intent.is_recognized() {
        eprintln!("note: selector {} is not recognized by any decoder", intent.selector);
    }
    println!("{}", serde_json::to_string_pretty(&intent.to_json())?);
    Ok(())
}
