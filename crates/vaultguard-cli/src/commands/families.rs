//! `vaultguard families` — list recognized functions per protocol family.

use vaultguard_evm::{CallDecoder, DecoderRegistry};

/// Run the `families` subcommand.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let registry = DecoderRegistry::standard();
    for decoder in registry.decoders() {
        println!("{}", decoder.family());
        for function in decoder.functions() {
            println!("  {function}");
        }
    }
    Ok(())
}
