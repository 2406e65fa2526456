//! Managed business objects.
//!
//! Every entity is a flat record with a server-assigned [`EntityId`], a set of
//! scalar fields, one status/stage vocabulary used for tab filtering and
//! badges, and optional weak references to sibling entities by id.

use std::fmt;

use clap::ValueEnum;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{InterEdError, Result};
use crate::form::FormSchema;
use crate::types::{EntityId, Vocabulary};

mod agent;
mod application;
mod document;
mod event;
mod program;
mod staff;
mod student;
mod university;

pub use agent::{Agent, AgentStatus};
pub use application::{Application, ApplicationStatus};
pub use document::{Document, DocumentStatus};
pub use event::{Event, EventKind};
pub use program::{Program, ProgramLevel};
pub use staff::{StaffMember, StaffRole};
pub use student::{Student, StudentStage};
pub use university::{Partnership, University};

/// A by-id link from one entity to a record of another collection.
///
/// Lookup-only: nothing enforces that the target exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference {
    /// Field on the owning record, e.g. `agent_id`
    pub field: &'static str,
    /// Target collection, e.g. `agents`
    pub collection: &'static str,
    pub id: EntityId,
}

impl Reference {
    pub fn new(field: &'static str, collection: &'static str, id: EntityId) -> Self {
        Self {
            field,
            collection,
            id,
        }
    }
}

/// Common interface for every managed entity type
pub trait Entity:
    Clone + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Collection segment of the REST path (`/api/{collection}`)
    const COLLECTION: &'static str;

    /// Singular noun for messages ("student")
    const SINGULAR: &'static str;

    /// Vocabulary of the field used for tab filtering
    type Tab: Vocabulary;

    fn id(&self) -> EntityId;

    /// Primary label (name or title)
    fn display_name(&self) -> &str;

    /// Text fields matched by free-text search
    fn search_fields(&self) -> Vec<&str>;

    /// Value of the tab/category field
    fn tab(&self) -> &Self::Tab;

    /// Secondary columns for table and card views, in display order
    fn summary(&self) -> Vec<(&'static str, String)>;

    /// Weak references to sibling entities
    fn references(&self) -> Vec<Reference> {
        Vec::new()
    }

    /// Form schema for create/edit dialogs
    fn schema() -> FormSchema;
}

/// Find a record by id by scanning its collection
pub fn lookup_by_id<E: Entity>(records: &[E], id: EntityId) -> Option<&E> {
    records.iter().find(|r| r.id() == id)
}

/// Render an optional value for summaries
pub(crate) fn or_dash(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => "-".to_string(),
    }
}

/// Entity collections selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EntityKind {
    #[value(alias = "student")]
    Students,
    #[value(alias = "agent")]
    Agents,
    #[value(alias = "university")]
    Universities,
    #[value(alias = "program")]
    Programs,
    #[value(alias = "application")]
    Applications,
    #[value(alias = "event")]
    Events,
    #[value(alias = "document", alias = "docs")]
    Documents,
    #[value(alias = "staff-member")]
    Staff,
}

impl EntityKind {
    pub const ALL: [EntityKind; 8] = [
        EntityKind::Students,
        EntityKind::Agents,
        EntityKind::Universities,
        EntityKind::Programs,
        EntityKind::Applications,
        EntityKind::Events,
        EntityKind::Documents,
        EntityKind::Staff,
    ];

    pub fn collection(self) -> &'static str {
        match self {
            EntityKind::Students => Student::COLLECTION,
            EntityKind::Agents => Agent::COLLECTION,
            EntityKind::Universities => University::COLLECTION,
            EntityKind::Programs => Program::COLLECTION,
            EntityKind::Applications => Application::COLLECTION,
            EntityKind::Events => Event::COLLECTION,
            EntityKind::Documents => Document::COLLECTION,
            EntityKind::Staff => StaffMember::COLLECTION,
        }
    }

    pub fn from_collection(collection: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.collection() == collection)
            .ok_or_else(|| InterEdError::UnknownEntity(collection.to_string()))
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.collection())
    }
}

/// Run a block with `$E` bound to the entity type selected by an [`EntityKind`].
///
/// ```rust,ignore
/// with_entity!(kind, E => cmd_ls::<E>(&ctx, &args, output).await)
/// ```
#[macro_export]
macro_rules! with_entity {
    ($kind:expr, $E:ident => $body:expr) => {
        match $kind {
            $crate::entity::EntityKind::Students => {
                type $E = $crate::entity::Student;
                $body
            }
            $crate::entity::EntityKind::Agents => {
                type $E = $crate::entity::Agent;
                $body
            }
            $crate::entity::EntityKind::Universities => {
                type $E = $crate::entity::University;
                $body
            }
            $crate::entity::EntityKind::Programs => {
                type $E = $crate::entity::Program;
                $body
            }
            $crate::entity::EntityKind::Applications => {
                type $E = $crate::entity::Application;
                $body
            }
            $crate::entity::EntityKind::Events => {
                type $E = $crate::entity::Event;
                $body
            }
            $crate::entity::EntityKind::Documents => {
                type $E = $crate::entity::Document;
                $body
            }
            $crate::entity::EntityKind::Staff => {
                type $E = $crate::entity::StaffMember;
                $body
            }
        }
    };
}
