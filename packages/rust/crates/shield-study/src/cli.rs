use std::path::PathBuf;

use clap::{Parser, Subcommand};

use shield_study::DEFAULT_PRECISION_BITS;

#[derive(Parser)]
#[command(name = "shield-study")]
#[command(about = "Deterministic variation assignment for shield studies.")]
pub(crate) struct Cli {
    /// Enable debug logging (RUST_LOG still wins).
    #[arg(long, global = true)]
    pub(crate) verbose: bool,

    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Assign a client to a variation and print the result as JSON.
    Assign {
        /// Path to the study settings YAML.
        #[arg(long)]
        config: PathBuf,

        /// Durable client identifier.
        #[arg(long)]
        client_id: String,

        /// Persist the enrollment here and reuse it on later runs.
        #[arg(long)]
        state_dir: Option<PathBuf>,
    },
    /// Print the hash fraction of a key.
    Fraction {
        /// Key to hash (study name + client id).
        #[arg(long)]
        key: String,

        /// Precision in bits.
        #[arg(long, default_value_t = DEFAULT_PRECISION_BITS)]
        bits: u32,
    },
}
