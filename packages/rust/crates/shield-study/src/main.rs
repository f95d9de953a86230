//! shield-study CLI: assign a client or inspect a hash fraction.
//!
//! Logging: set `RUST_LOG=shield_study=debug` to see assignment decisions on stderr.

mod cli;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use shield_study::{
    AssignmentService, LocalStudyStateStore, StaticClientIdProvider, StudyEnroller, fraction,
    load_study_config,
};

use crate::cli::{Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose {
            "shield_study=debug"
        } else {
            "shield_study=info"
        })
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    match cli.command {
        Command::Assign {
            config,
            client_id,
            state_dir,
        } => {
            let study = load_study_config(&config)
                .with_context(|| format!("invalid study settings {}", config.display()))?;
            let client_ids = Arc::new(StaticClientIdProvider::new(client_id));
            let service = AssignmentService::new(study, client_ids);
            let assignment = match state_dir {
                Some(dir) => {
                    let store = Arc::new(LocalStudyStateStore::new(dir));
                    StudyEnroller::new(service, store).enroll().await?
                }
                None => service.assign().await?,
            };
            println!("{}", serde_json::to_string(&assignment)?);
        }
        Command::Fraction { key, bits } => {
            println!("{}", fraction(&key, bits)?);
        }
    }
    Ok(())
}
