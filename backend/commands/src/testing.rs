//! In-memory fakes shared by this crate's tests.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
pub use cyborg_core::testing::RecordingTransport;
use cyborg_core::{CommandHandler, Context, InboundMessage};
use cyborg_plugins::{LoadedSource, ModuleExports, ModuleLoader};
use tokio::sync::Mutex;

pub const OPERATOR: u64 = 1000;

/// A loader over an editable in-memory set of sources.
#[derive(Default)]
pub struct ScriptedLoader {
    sources: std::sync::Mutex<BTreeMap<String, Option<fn() -> ModuleExports>>>,
}

impl ScriptedLoader {
    pub fn with(self, name: &str, bundle: fn() -> ModuleExports) -> Self {
        self.sources
            .lock()
            .unwrap()
            .insert(name.to_string(), Some(bundle));
        self
    }

    /// A source that exists but fails to execute.
    pub fn with_broken(self, name: &str) -> Self {
        self.sources.lock().unwrap().insert(name.to_string(), None);
        self
    }

    pub fn delete(&self, name: &str) {
        self.sources.lock().unwrap().remove(name);
    }

    /// Keep the source but make it fail to execute.
    pub fn corrupt(&self, name: &str) {
        self.sources.lock().unwrap().insert(name.to_string(), None);
    }
}

#[async_trait]
impl ModuleLoader for ScriptedLoader {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn source_exists(&self, name: &str) -> bool {
        self.sources.lock().unwrap().contains_key(name)
    }

    async fn discover(&self) -> Result<Vec<String>> {
        Ok(self.sources.lock().unwrap().keys().cloned().collect())
    }

    async fn load(&self, name: &str) -> Result<LoadedSource> {
        let bundle = self
            .sources
            .lock()
            .unwrap()
            .get(name)
            .copied()
            .ok_or_else(|| anyhow!("cannot read {name}.yaml: No such file or directory"))?;
        let Some(bundle) = bundle else {
            bail!("syntax error in {name}.yaml");
        };
        Ok(LoadedSource {
            locator: format!("mem:{name}"),
            exports: bundle(),
        })
    }
}

/// Records the args of each call; optionally fails.
pub struct Spy {
    pub accepts_args: bool,
    pub fail_with: Option<&'static str>,
    pub calls: Mutex<Vec<Vec<String>>>,
}

impl Spy {
    pub fn new(accepts_args: bool) -> Arc<Self> {
        Arc::new(Self {
            accepts_args,
            fail_with: None,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(message: &'static str) -> Arc<Self> {
        Arc::new(Self {
            accepts_args: false,
            fail_with: Some(message),
            calls: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl CommandHandler for Spy {
    fn accepts_args(&self) -> bool {
        self.accepts_args
    }

    async fn call(&self, _ctx: &Context, _msg: &InboundMessage, args: &[String]) -> Result<()> {
        self.calls.lock().await.push(args.to_vec());
        match self.fail_with {
            Some(message) => bail!("{message}"),
            None => Ok(()),
        }
    }
}

pub fn noop_bundle() -> ModuleExports {
    ModuleExports::new()
        .command("ping", cyborg_plugins::handler(|_, _, _| async { Ok(()) }))
        .export("helper", cyborg_plugins::handler(|_, _, _| async { Ok(()) }))
}

pub fn message(content: &str) -> InboundMessage {
    InboundMessage::new("m1", "chan", OPERATOR, "operator", content)
}
