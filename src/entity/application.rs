use serde::{Deserialize, Serialize};

use super::{Entity, Program, Reference, Student, or_dash};
use crate::form::{FieldSpec, FormSchema};
use crate::types::{EntityId, Vocabulary};

crate::vocabulary!(
    /// Processing status of a university application
    ApplicationStatus, "application status", {
        Draft => ("draft", "Draft", Gray),
        Submitted => ("submitted", "Submitted", Blue),
        UnderReview => ("under_review", "Under Review", Yellow),
        Accepted => ("accepted", "Accepted", Green),
        Rejected => ("rejected", "Rejected", Red),
        Withdrawn => ("withdrawn", "Withdrawn", Orange),
    }
);

/// An application of a student to a program.
///
/// `student_name` and `program_name` are denormalized by the server so lists
/// can be searched without resolving references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: EntityId,
    pub student_id: EntityId,
    pub program_id: EntityId,
    #[serde(default)]
    pub student_name: String,
    #[serde(default)]
    pub program_name: String,
    pub status: ApplicationStatus,
    #[serde(default)]
    pub intake: Option<String>,
    #[serde(default)]
    pub submitted_on: Option<String>,
}

impl Entity for Application {
    const COLLECTION: &'static str = "applications";
    const SINGULAR: &'static str = "application";
    type Tab = ApplicationStatus;

    fn id(&self) -> EntityId {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.student_name
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.student_name.as_str(), self.program_name.as_str()];
        fields.extend(self.intake.as_deref());
        fields
    }

    fn tab(&self) -> &ApplicationStatus {
        &self.status
    }

    fn summary(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Program", self.program_name.clone()),
            ("Intake", or_dash(self.intake.as_deref())),
            ("Submitted", or_dash(self.submitted_on.as_deref())),
        ]
    }

    fn references(&self) -> Vec<Reference> {
        vec![
            Reference::new("student_id", Student::COLLECTION, self.student_id),
            Reference::new("program_id", Program::COLLECTION, self.program_id),
        ]
    }

    fn schema() -> FormSchema {
        FormSchema::new(Self::SINGULAR)
            .field(FieldSpec::reference("student_id", "Student").required())
            .field(FieldSpec::reference("program_id", "Program").required())
            .field(
                FieldSpec::choice("status", "Status", ApplicationStatus::values())
                    .required()
                    .default_value("draft"),
            )
            .field(FieldSpec::text("intake", "Intake"))
            .field(FieldSpec::date("submitted_on", "Submitted on"))
    }
}
