use serde::{Deserialize, Serialize};

use super::{Entity, or_dash};
use crate::form::{FieldSpec, FormSchema};
use crate::types::{EntityId, Vocabulary};

crate::vocabulary!(
    /// Kind of recruitment event
    EventKind, "event kind", {
        Fair => ("fair", "Fair", Purple),
        Webinar => ("webinar", "Webinar", Blue),
        Workshop => ("workshop", "Workshop", Teal),
        Seminar => ("seminar", "Seminar", Yellow),
        OpenDay => ("open_day", "Open Day", Green),
    }
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EntityId,
    pub title: String,
    pub kind: EventKind,
    /// ISO date, `YYYY-MM-DD`
    pub date: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub capacity: Option<u32>,
}

impl Entity for Event {
    const COLLECTION: &'static str = "events";
    const SINGULAR: &'static str = "event";
    type Tab = EventKind;

    fn id(&self) -> EntityId {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.title
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str()];
        fields.extend(self.location.as_deref());
        fields.extend(self.description.as_deref());
        fields
    }

    fn tab(&self) -> &EventKind {
        &self.kind
    }

    fn summary(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Date", self.date.clone()),
            ("Location", or_dash(self.location.as_deref())),
            (
                "Capacity",
                self.capacity
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ),
        ]
    }

    fn schema() -> FormSchema {
        FormSchema::new(Self::SINGULAR)
            .field(FieldSpec::text("title", "Title").required())
            .field(
                FieldSpec::choice("kind", "Kind", EventKind::values())
                    .required()
                    .default_value("webinar"),
            )
            .field(FieldSpec::date("date", "Date").required())
            .field(FieldSpec::text("location", "Location"))
            .field(FieldSpec::text("description", "Description"))
            .field(FieldSpec::integer("capacity", "Capacity").range(1, 100_000))
    }
}
