use serde::{Deserialize, Serialize};

use super::{Entity, Reference, University, or_dash};
use crate::form::{FieldSpec, FormSchema};
use crate::types::{EntityId, Vocabulary};

crate::vocabulary!(
    /// Degree level of a study program
    ProgramLevel, "program level", {
        Bachelor => ("bachelor", "Bachelor", Blue),
        Master => ("master", "Master", Purple),
        Phd => ("phd", "PhD", Teal),
        Diploma => ("diploma", "Diploma", Yellow),
        Certificate => ("certificate", "Certificate", Orange),
    }
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub id: EntityId,
    pub name: String,
    pub level: ProgramLevel,
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub university_id: Option<EntityId>,
    #[serde(default)]
    pub duration_months: Option<u32>,
    #[serde(default)]
    pub tuition: Option<f64>,
}

impl Entity for Program {
    const COLLECTION: &'static str = "programs";
    const SINGULAR: &'static str = "program";
    type Tab = ProgramLevel;

    fn id(&self) -> EntityId {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.level.as_str()];
        fields.extend(self.field.as_deref());
        fields
    }

    fn tab(&self) -> &ProgramLevel {
        &self.level
    }

    fn summary(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Field", or_dash(self.field.as_deref())),
            (
                "Duration",
                self.duration_months
                    .map(|m| format!("{m} months"))
                    .unwrap_or_else(|| "-".to_string()),
            ),
            (
                "Tuition",
                self.tuition
                    .map(|t| format!("{t:.0}"))
                    .unwrap_or_else(|| "-".to_string()),
            ),
        ]
    }

    fn references(&self) -> Vec<Reference> {
        self.university_id
            .map(|id| Reference::new("university_id", University::COLLECTION, id))
            .into_iter()
            .collect()
    }

    fn schema() -> FormSchema {
        FormSchema::new(Self::SINGULAR)
            .field(FieldSpec::text("name", "Program name").required())
            .field(
                FieldSpec::choice("level", "Level", ProgramLevel::values())
                    .required()
                    .default_value("bachelor"),
            )
            .field(FieldSpec::text("field", "Field of study"))
            .field(FieldSpec::reference("university_id", "University").required())
            .field(FieldSpec::integer("duration_months", "Duration (months)").range(1, 120))
            .field(FieldSpec::number("tuition", "Tuition").range(0.0, 1_000_000.0))
    }
}
