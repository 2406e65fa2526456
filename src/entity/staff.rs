use serde::{Deserialize, Serialize};

use super::{Entity, or_dash};
use crate::form::{FieldSpec, FormSchema};
use crate::types::{EntityId, Vocabulary};

crate::vocabulary!(
    /// Role of an internal staff member
    StaffRole, "staff role", {
        Admin => ("admin", "Admin", Red),
        Counselor => ("counselor", "Counselor", Blue),
        Manager => ("manager", "Manager", Purple),
        Support => ("support", "Support", Teal),
        Finance => ("finance", "Finance", Green),
    }
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: EntityId,
    pub name: String,
    pub email: String,
    pub role: StaffRole,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Entity for StaffMember {
    const COLLECTION: &'static str = "staff";
    const SINGULAR: &'static str = "staff member";
    type Tab = StaffRole;

    fn id(&self) -> EntityId {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.email.as_str()];
        fields.extend(self.department.as_deref());
        fields
    }

    fn tab(&self) -> &StaffRole {
        &self.role
    }

    fn summary(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Email", self.email.clone()),
            ("Department", or_dash(self.department.as_deref())),
            ("Active", if self.active { "yes" } else { "no" }.to_string()),
        ]
    }

    fn schema() -> FormSchema {
        FormSchema::new(Self::SINGULAR)
            .field(FieldSpec::text("name", "Full name").required())
            .field(FieldSpec::email("email", "Email").required())
            .field(
                FieldSpec::choice("role", "Role", StaffRole::values())
                    .required()
                    .default_value("counselor"),
            )
            .field(FieldSpec::text("department", "Department"))
            .field(FieldSpec::boolean("active", "Active").default_value("true"))
    }
}
