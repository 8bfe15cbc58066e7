//! # vaultguard CLI
//!
//! Entry point for the `vaultguard` binary.
//!
//! Subcommands:
//! - `vaultguard check`    — Evaluate a proposed call or owner withdrawal
//!   against a guard config
//! - `vaultguard decode`   — Show the intent extracted from calldata
//! - `vaultguard families` — List every recognized function per protocol family

use std::path::PathBuf;

use alloy::primitives::{Address, Bytes, U256};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::check::Proposal;

/// Exit status for a denied call.
const EXIT_DENIED: i32 = 2;

/// vaultguard — offline authorization checks for vault calls.
#[derive(Parser)]
#[command(name = "vaultguard", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a manager call, or an owner withdrawal with
    /// `--owner-withdraw`, as the guard would. Exits 2 when denied.
    Check {
        /// Path to guard.yaml (default: ~/.vaultguard/guard.yaml).
        #[arg(long, short, env = "VAULTGUARD_CONFIG")]
        config: Option<PathBuf>,

        /// Address proposing the action (defaults to the configured asset
        /// manager for calls, the owner for withdrawals).
        #[arg(long)]
        caller: Option<Address>,

        /// Contract the call is sent to.
        #[arg(long, required_unless_present = "owner_withdraw", requires = "data")]
        target: Option<Address>,

        /// Hex-encoded calldata (with or without 0x prefix).
        #[arg(long, requires = "target")]
        data: Option<Bytes>,

        /// Check an owner withdrawal of this token instead of a call.
        #[arg(
            long,
            value_name = "TOKEN",
            requires = "amount",
            conflicts_with_all = ["target", "data"]
        )]
        owner_withdraw: Option<Address>,

        /// Amount to withdraw, in the token's base units.
        #[arg(long, requires = "owner_withdraw")]
        amount: Option<U256>,
    },

    /// Decode calldata into the intent the guard evaluates.
    Decode {
        /// Contract the call is sent to.
        #[arg(long)]
        target: Address,

        /// Hex-encoded calldata (with or without 0x prefix).
        #[arg(long)]
        data: Bytes,
    },

    /// List recognized functions per protocol family.
    Families,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check {
            config,
            caller,
            target,
            data,
            owner_withdraw,
            amount,
        } => Proposal::from_args(target, data, owner_withdraw, amount)
            .and_then(|proposal| commands::check::run(config, caller, proposal)),
        Commands::Decode { target, data } => commands::decode::run(target, data).map(|()| true),
        Commands::Families => commands::families::run().map(|()| true),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(EXIT_DENIED),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
