use serde::{Deserialize, Serialize};

use super::{Agent, Entity, Reference, University, or_dash};
use crate::form::{FieldSpec, FormSchema};
use crate::types::{EntityId, Vocabulary};

crate::vocabulary!(
    /// Recruitment pipeline stage of a student
    StudentStage, "student stage", {
        Inquiry => ("inquiry", "Inquiry", Blue),
        Application => ("application", "Application", Purple),
        Offer => ("offer", "Offer", Green),
        Visa => ("visa", "Visa", Yellow),
        Enrollment => ("enrollment", "Enrollment", Teal),
        Alumni => ("alumni", "Alumni", Gray),
    }
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: EntityId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub nationality: Option<String>,
    pub stage: StudentStage,
    #[serde(default)]
    pub agent_id: Option<EntityId>,
    #[serde(default)]
    pub university_id: Option<EntityId>,
    #[serde(default)]
    pub gpa: Option<f64>,
}

impl Entity for Student {
    const COLLECTION: &'static str = "students";
    const SINGULAR: &'static str = "student";
    type Tab = StudentStage;

    fn id(&self) -> EntityId {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.email.as_str()];
        fields.extend(self.nationality.as_deref());
        fields
    }

    fn tab(&self) -> &StudentStage {
        &self.stage
    }

    fn summary(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Email", self.email.clone()),
            ("Nationality", or_dash(self.nationality.as_deref())),
            (
                "GPA",
                self.gpa.map(|g| format!("{g:.2}")).unwrap_or_else(|| "-".to_string()),
            ),
        ]
    }

    fn references(&self) -> Vec<Reference> {
        let mut refs = Vec::new();
        if let Some(id) = self.agent_id {
            refs.push(Reference::new("agent_id", Agent::COLLECTION, id));
        }
        if let Some(id) = self.university_id {
            refs.push(Reference::new("university_id", University::COLLECTION, id));
        }
        refs
    }

    fn schema() -> FormSchema {
        FormSchema::new(Self::SINGULAR)
            .field(FieldSpec::text("name", "Full name").required())
            .field(FieldSpec::email("email", "Email").required())
            .field(FieldSpec::text("phone", "Phone"))
            .field(FieldSpec::text("nationality", "Nationality"))
            .field(
                FieldSpec::choice("stage", "Stage", StudentStage::values())
                    .required()
                    .default_value("inquiry"),
            )
            .field(FieldSpec::reference("agent_id", "Agent"))
            .field(FieldSpec::reference("university_id", "University"))
            .field(FieldSpec::number("gpa", "GPA").range(0.0, 4.0))
    }
}
