use serde::{Deserialize, Serialize};

use super::{Entity, Reference, Student, or_dash};
use crate::form::{FieldSpec, FormSchema};
use crate::types::{EntityId, Vocabulary};

crate::vocabulary!(
    /// Verification status of an uploaded document
    DocumentStatus, "document status", {
        Pending => ("pending", "Pending", Yellow),
        Verified => ("verified", "Verified", Green),
        Rejected => ("rejected", "Rejected", Red),
        Expired => ("expired", "Expired", Orange),
    }
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: EntityId,
    pub name: String,
    pub doc_type: String,
    pub status: DocumentStatus,
    #[serde(default)]
    pub owner_name: Option<String>,
    #[serde(default)]
    pub student_id: Option<EntityId>,
    #[serde(default)]
    pub expires_on: Option<String>,
}

impl Entity for Document {
    const COLLECTION: &'static str = "documents";
    const SINGULAR: &'static str = "document";
    type Tab = DocumentStatus;

    fn id(&self) -> EntityId {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.doc_type.as_str()];
        fields.extend(self.owner_name.as_deref());
        fields
    }

    fn tab(&self) -> &DocumentStatus {
        &self.status
    }

    fn summary(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Type", self.doc_type.clone()),
            ("Owner", or_dash(self.owner_name.as_deref())),
            ("Expires", or_dash(self.expires_on.as_deref())),
        ]
    }

    fn references(&self) -> Vec<Reference> {
        self.student_id
            .map(|id| Reference::new("student_id", Student::COLLECTION, id))
            .into_iter()
            .collect()
    }

    fn schema() -> FormSchema {
        FormSchema::new(Self::SINGULAR)
            .field(FieldSpec::text("name", "Document name").required())
            .field(FieldSpec::text("doc_type", "Type").required())
            .field(
                FieldSpec::choice("status", "Status", DocumentStatus::values())
                    .required()
                    .default_value("pending"),
            )
            .field(FieldSpec::text("owner_name", "Owner"))
            .field(FieldSpec::reference("student_id", "Student"))
            .field(FieldSpec::date("expires_on", "Expires on"))
    }
}
