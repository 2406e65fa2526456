use std::collections::BTreeSet;

use owo_colors::OwoColorize;

use super::format_badge;
use crate::entity::Entity;
use crate::types::EntityId;

/// Render rows as stacked cards: a title line with the badge, then one
/// line per summary field.
pub fn render_cards<E: Entity>(rows: &[&E], selected: &BTreeSet<EntityId>) -> String {
    rows.iter()
        .map(|row| render_card(*row, selected.contains(&row.id())))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_card<E: Entity>(row: &E, selected: bool) -> String {
    let marker = if selected { "*" } else { " " };
    let mut out = format!(
        "{marker} {} {}  {}\n",
        format!("#{}", row.id()).dimmed(),
        row.display_name().bold(),
        format_badge(row.tab())
    );
    for (label, value) in row.summary() {
        out.push_str(&format!("    {}: {value}\n", label.dimmed()));
    }
    out
}
