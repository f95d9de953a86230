//! Shared test doubles for shield-study integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Result, bail};
use async_trait::async_trait;

use shield_study::{ClientIdProvider, StudyConfig, VariationSpec, WeightedVariationTable};

/// How the scripted provider answers.
#[derive(Debug, Clone)]
pub enum Reply {
    Id(String),
    Missing,
    Fail,
    Hang,
}

/// Client id provider that counts calls and answers from a script.
#[derive(Debug)]
pub struct ScriptedProvider {
    reply: Reply,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new(reply: Reply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn id(id: &str) -> Self {
        Self::new(Reply::Id(id.to_string()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClientIdProvider for ScriptedProvider {
    async fn client_id(&self) -> Result<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Reply::Id(id) => Ok(Some(id.clone())),
            Reply::Missing => Ok(None),
            Reply::Fail => bail!("telemetry not ready"),
            Reply::Hang => std::future::pending().await,
        }
    }
}

pub fn three_arm_config(variation_override: Option<&str>) -> StudyConfig {
    let table = WeightedVariationTable::new(vec![
        VariationSpec::new("kittens", 1.0),
        VariationSpec::new("puppers", 1.0),
        VariationSpec::new("lizards", 2.0),
    ])
    .expect("valid table");
    StudyConfig::new(
        "shield-button-study",
        12,
        variation_override.map(String::from),
        table,
    )
    .expect("valid config")
}
