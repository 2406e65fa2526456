use serde::{Deserialize, Serialize};

use super::{Entity, or_dash};
use crate::form::{FieldSpec, FormSchema};
use crate::types::{EntityId, Vocabulary};

crate::vocabulary!(
    /// Contract status of a recruitment agent
    AgentStatus, "agent status", {
        Active => ("active", "Active", Green),
        Inactive => ("inactive", "Inactive", Gray),
        Pending => ("pending", "Pending", Yellow),
    }
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: EntityId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub status: AgentStatus,
    #[serde(default)]
    pub commission_rate: Option<f64>,
    #[serde(default)]
    pub students_count: u32,
}

impl Entity for Agent {
    const COLLECTION: &'static str = "agents";
    const SINGULAR: &'static str = "agent";
    type Tab = AgentStatus;

    fn id(&self) -> EntityId {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.email.as_str()];
        fields.extend(self.company.as_deref());
        fields.extend(self.country.as_deref());
        fields
    }

    fn tab(&self) -> &AgentStatus {
        &self.status
    }

    fn summary(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Company", or_dash(self.company.as_deref())),
            ("Country", or_dash(self.country.as_deref())),
            ("Students", self.students_count.to_string()),
        ]
    }

    fn schema() -> FormSchema {
        FormSchema::new(Self::SINGULAR)
            .field(FieldSpec::text("name", "Agent name").required())
            .field(FieldSpec::email("email", "Email").required())
            .field(FieldSpec::text("company", "Company"))
            .field(FieldSpec::text("country", "Country"))
            .field(FieldSpec::text("phone", "Phone"))
            .field(
                FieldSpec::choice("status", "Status", AgentStatus::values())
                    .required()
                    .default_value("pending"),
            )
            .field(FieldSpec::number("commission_rate", "Commission %").range(0.0, 100.0))
    }
}
