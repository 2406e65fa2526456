//! Command implementations behind the `intered` binary.
//!
//! Each entity-scoped command is generic over [`Entity`] and dispatched from
//! the CLI with `with_entity!`.

use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::cache::{CollectionSource, QueryCache};
use crate::cli::OutputOptions;
use crate::config::Config;
use crate::entity::Entity;
use crate::error::{InterEdError, Result};
use crate::events::EventLog;
use crate::mutation::MutationDispatcher;
use crate::remote::{CollectionBackend, HttpBackend, MemoryBackend};

mod config;
mod events;
mod ls;
mod mutate;
mod show;
mod stats;

pub use config::{cmd_config_get, cmd_config_set, cmd_config_show};
pub use events::{cmd_events, cmd_events_prune};
pub use ls::{LsOptions, cmd_ls};
pub use mutate::{cmd_create, cmd_delete, cmd_update};
pub use show::{cmd_show, resolve_reference};
pub use stats::cmd_stats;

/// Everything a command needs to reach the API
#[derive(Clone)]
pub struct AppContext {
    pub backend: Arc<dyn CollectionBackend>,
    pub cache: QueryCache,
    pub events: EventLog,
    pub page_size: usize,
}

impl AppContext {
    /// Build from the on-disk config.
    ///
    /// With a fixtures file the collections are served from memory and
    /// mutations last only for the run.
    pub fn load(fixtures: Option<&Path>) -> Result<Self> {
        let config = Config::load()?;
        let backend: Arc<dyn CollectionBackend> = match fixtures {
            Some(path) => {
                debug!(path = %path.display(), "serving collections from fixtures");
                Arc::new(MemoryBackend::from_file(path).map_err(|e| {
                    InterEdError::Config(format!(
                        "failed to load fixtures from {}: {e}",
                        path.display()
                    ))
                })?)
            }
            None => Arc::new(HttpBackend::from_config(&config)?),
        };
        Ok(Self::new(backend, config.page_size()))
    }

    pub fn new(backend: Arc<dyn CollectionBackend>, page_size: usize) -> Self {
        Self {
            backend,
            cache: QueryCache::new(),
            events: EventLog::default_location(),
            page_size,
        }
    }

    pub fn with_event_log(mut self, events: EventLog) -> Self {
        self.events = events;
        self
    }

    pub fn source<E: Entity>(&self) -> CollectionSource<E> {
        CollectionSource::new(Arc::clone(&self.backend), self.cache.clone())
    }

    pub fn dispatcher<E: Entity>(&self) -> MutationDispatcher<E> {
        MutationDispatcher::new(Arc::clone(&self.backend), self.cache.clone())
            .with_event_log(self.events.clone())
    }
}

/// JSON and human renderings of a command's result
pub struct CommandOutput {
    json: Value,
    text: Option<String>,
}

impl CommandOutput {
    pub fn new(json: Value) -> Self {
        Self { json, text: None }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn print(self, output: OutputOptions) -> Result<()> {
        if output.json {
            return print_json(&self.json);
        }
        match self.text {
            Some(text) => println!("{text}"),
            None => print_json(&self.json)?,
        }
        Ok(())
    }
}

pub fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Split `field=value` arguments. The value may itself contain `=`.
pub fn parse_assignments(raw: &[String]) -> Result<Vec<(String, String)>> {
    raw.iter()
        .map(|assignment| match assignment.split_once('=') {
            Some((field, value)) if !field.trim().is_empty() => {
                Ok((field.trim().to_string(), value.to_string()))
            }
            _ => Err(InterEdError::InvalidAssignment(assignment.clone())),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_assignments() {
        let parsed = parse_assignments(&args(&["name=Ana Silva", "notes=a=b", "phone="])).unwrap();
        assert_eq!(
            parsed,
            vec![
                ("name".to_string(), "Ana Silva".to_string()),
                ("notes".to_string(), "a=b".to_string()),
                ("phone".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn test_parse_assignments_rejects_missing_field() {
        assert!(matches!(
            parse_assignments(&args(&["=value"])),
            Err(InterEdError::InvalidAssignment(_))
        ));
        assert!(parse_assignments(&args(&["novalue"])).is_err());
    }

    #[test]
    fn test_context_wires_source_and_dispatcher_to_one_cache() {
        let ctx = AppContext::new(Arc::new(MemoryBackend::new()), 10);
        let source = ctx.source::<crate::entity::Student>();
        assert!(source.cache().is_empty());
        let _dispatcher = ctx.dispatcher::<crate::entity::Student>();
    }
}
