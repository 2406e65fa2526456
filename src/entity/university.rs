use serde::{Deserialize, Serialize};

use super::{Entity, or_dash};
use crate::form::{FieldSpec, FormSchema};
use crate::types::{EntityId, Vocabulary};

crate::vocabulary!(
    /// Partnership tier with a university
    Partnership, "partnership tier", {
        Premium => ("premium", "Premium", Purple),
        Standard => ("standard", "Standard", Blue),
        Basic => ("basic", "Basic", Gray),
    }
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct University {
    pub id: EntityId,
    pub name: String,
    pub country: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    pub partnership: Partnership,
    #[serde(default)]
    pub ranking: Option<u32>,
}

impl Entity for University {
    const COLLECTION: &'static str = "universities";
    const SINGULAR: &'static str = "university";
    type Tab = Partnership;

    fn id(&self) -> EntityId {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.country.as_str()];
        fields.extend(self.city.as_deref());
        fields
    }

    fn tab(&self) -> &Partnership {
        &self.partnership
    }

    fn summary(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Country", self.country.clone()),
            ("City", or_dash(self.city.as_deref())),
            (
                "Ranking",
                self.ranking
                    .map(|r| format!("#{r}"))
                    .unwrap_or_else(|| "-".to_string()),
            ),
        ]
    }

    fn schema() -> FormSchema {
        FormSchema::new(Self::SINGULAR)
            .field(FieldSpec::text("name", "University name").required())
            .field(FieldSpec::text("country", "Country").required())
            .field(FieldSpec::text("city", "City"))
            .field(FieldSpec::text("website", "Website"))
            .field(
                FieldSpec::choice("partnership", "Partnership", Partnership::values())
                    .required()
                    .default_value("standard"),
            )
            .field(FieldSpec::integer("ranking", "World ranking").range(1, 5000))
    }
}
