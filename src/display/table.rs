use std::collections::BTreeSet;

use tabled::builder::Builder;
use tabled::settings::Style;

use crate::entity::Entity;
use crate::types::{EntityId, Vocabulary};

/// Column heading for an entity's tab field ("student stage" -> "Stage")
pub fn tab_heading<V: Vocabulary>() -> String {
    let word = V::KIND.rsplit(' ').next().unwrap_or(V::KIND);
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Render rows as a table: ID, name, tab badge, then the entity's summary
/// columns. Selected rows are marked with `*`.
pub fn render_table<E: Entity>(rows: &[&E], selected: &BTreeSet<EntityId>) -> String {
    let mut builder = Builder::default();

    let mut header = vec![
        String::new(),
        "ID".to_string(),
        "Name".to_string(),
        tab_heading::<E::Tab>(),
    ];
    if let Some(first) = rows.first() {
        header.extend(first.summary().into_iter().map(|(label, _)| label.to_string()));
    }
    builder.push_record(header);

    for row in rows {
        let mut record = vec![
            if selected.contains(&row.id()) { "*" } else { "" }.to_string(),
            row.id().to_string(),
            row.display_name().to_string(),
            format!("[{}]", row.tab().label()),
        ];
        record.extend(row.summary().into_iter().map(|(_, value)| value));
        builder.push_record(record);
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}
