//! Keyed configuration sources and ordered resolution across them.
//!
//! Request handlers never read the process environment directly; they are
//! given a [`SourceChain`] built from these providers so tests can swap in
//! fixed values.

use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::schema::RelayConfig;

/// A read-only source of string settings.
pub trait ConfigProvider: Send + Sync {
    /// Short label used in diagnostics (never the value itself).
    fn name(&self) -> &str;

    /// Look up `key`, returning `None` when the source has no value for it.
    fn get(&self, key: &str) -> Option<String>;
}

/// Process environment variables.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSource;

impl ConfigProvider for EnvSource {
    fn name(&self) -> &str {
        "env"
    }

    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Fixed in-memory values.
#[derive(Debug, Clone, Default)]
pub struct MapSource {
    values: HashMap<String, String>,
}

impl MapSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self {
            values: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }
}

impl ConfigProvider for MapSource {
    fn name(&self) -> &str {
        "map"
    }

    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// The `settings` tree of the config file, addressed by `Section:Key` paths.
///
/// Segment matching is case-insensitive.
#[derive(Debug, Clone, Default)]
pub struct SettingsSource {
    settings: Map<String, Value>,
}

impl SettingsSource {
    pub fn new(settings: Map<String, Value>) -> Self {
        Self { settings }
    }
}

impl ConfigProvider for SettingsSource {
    fn name(&self) -> &str {
        "settings"
    }

    fn get(&self, key: &str) -> Option<String> {
        let mut segments = key.split(':');
        let first = segments.next()?;
        let mut node = lookup(&self.settings, first)?;
        for segment in segments {
            node = match node {
                Value::Object(map) => lookup(map, segment)?,
                _ => return None,
            };
        }
        match node {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

fn lookup<'a>(map: &'a Map<String, Value>, segment: &str) -> Option<&'a Value> {
    map.get(segment).or_else(|| {
        map.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(segment))
            .map(|(_, v)| v)
    })
}

/// One step of a [`SourceChain`]: which provider, under which key.
#[derive(Clone)]
pub struct KeyLookup {
    pub provider: Arc<dyn ConfigProvider>,
    pub key: String,
}

/// Ordered list of lookups; the first non-blank value wins.
#[derive(Clone, Default)]
pub struct SourceChain {
    lookups: Vec<KeyLookup>,
}

impl SourceChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, provider: Arc<dyn ConfigProvider>, key: impl Into<String>) -> Self {
        self.lookups.push(KeyLookup {
            provider,
            key: key.into(),
        });
        self
    }

    pub fn lookups(&self) -> &[KeyLookup] {
        &self.lookups
    }

    /// Walk the lookups in order and return the first value that is not blank.
    pub fn resolve(&self) -> Option<String> {
        self.lookups.iter().find_map(|lookup| {
            let value = lookup.provider.get(&lookup.key)?;
            if value.trim().is_empty() {
                debug!(source = lookup.provider.name(), key = %lookup.key, "Ignoring blank value");
                return None;
            }
            debug!(source = lookup.provider.name(), key = %lookup.key, "Resolved value");
            Some(value)
        })
    }
}

impl std::fmt::Debug for SourceChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(
                self.lookups
                    .iter()
                    .map(|l| format!("{}:{}", l.provider.name(), l.key)),
            )
            .finish()
    }
}

/// API key lookup order: environment variable, then the `settings` path.
pub fn api_key_chain(config: &RelayConfig, env: Arc<dyn ConfigProvider>) -> SourceChain {
    SourceChain::new()
        .with(env, config.gemini.api_key_env.clone())
        .with(
            Arc::new(SettingsSource::new(config.settings.clone())),
            config.gemini.api_key_config_key.clone(),
        )
}
