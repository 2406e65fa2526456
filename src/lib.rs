#[macro_use]
pub mod macros;

pub mod cache;
pub mod cli;
pub mod commands;
pub mod config;
pub mod display;
pub mod entity;
pub mod error;
pub mod events;
pub mod form;
pub mod list;
pub mod mutation;
pub mod paths;
pub mod remote;
pub mod screen;
pub mod types;

pub use cache::{CollectionSource, InvalidationBus, QueryCache, QueryKey};
pub use config::Config;
pub use entity::{Entity, EntityKind, Reference};
pub use error::{FieldErrors, InterEdError, Result};
pub use form::{FormOutcome, FormPhase, FormState};
pub use list::{ListAction, ListController, ListQuery, ListView, ViewMode};
pub use mutation::MutationDispatcher;
pub use remote::{CollectionBackend, HttpBackend, MemoryBackend};
pub use screen::ListScreen;
pub use types::{EntityId, TabFilter, Vocabulary};
