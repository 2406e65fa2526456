use futures::future::try_join_all;
use owo_colors::OwoColorize;
use serde_json::{Value, json};

use super::{AppContext, CommandOutput};
use crate::cli::OutputOptions;
use crate::display::format_badge;
use crate::entity::{Entity, EntityKind, Reference, lookup_by_id};
use crate::error::Result;
use crate::types::EntityId;
use crate::with_entity;

/// Label shown for a reference whose target is missing
pub const UNKNOWN_REFERENCE: &str = "unknown";

/// Display name of a reference target.
///
/// The target collection is fetched through the shared cache, so resolving
/// many references to one collection costs a single request. Returns `None`
/// when the target does not exist.
pub async fn resolve_reference(ctx: &AppContext, reference: &Reference) -> Result<Option<String>> {
    let kind = EntityKind::from_collection(reference.collection)?;
    with_entity!(kind, T => {
        let records = ctx.source::<T>().fetch().await?;
        Ok(lookup_by_id(&records, reference.id).map(|r| r.display_name().to_string()))
    })
}

/// Show one record with its references resolved
pub async fn cmd_show<E: Entity>(ctx: &AppContext, id: EntityId, output: OutputOptions) -> Result<()> {
    let record = ctx.source::<E>().fetch_one(id).await?;

    let references = record.references();
    let names = try_join_all(references.iter().map(|r| resolve_reference(ctx, r))).await?;
    let resolved: Vec<(Reference, Option<String>)> = references.into_iter().zip(names).collect();

    let fields = match serde_json::to_value(&record)? {
        Value::Object(map) => map,
        _ => serde_json::Map::new(),
    };

    let references_json: Vec<Value> = resolved
        .iter()
        .map(|(reference, name)| {
            json!({
                "field": reference.field,
                "collection": reference.collection,
                "id": reference.id,
                "name": name,
            })
        })
        .collect();

    let json_output = json!({
        "collection": E::COLLECTION,
        "record": fields,
        "references": references_json,
    });

    let mut text = format!(
        "{} {}  {}\n",
        record.display_name().bold(),
        format_badge(record.tab()),
        format!("#{}", record.id()).dimmed()
    );

    let schema = E::schema();
    let mut shown: Vec<&str> = vec!["id"];
    for spec in schema.fields() {
        shown.push(spec.name);
        let value = fields.get(spec.name).cloned().unwrap_or(Value::Null);
        let mut rendered = render_value(&value);
        if let Some((_, name)) = resolved.iter().find(|(r, _)| r.field == spec.name) {
            let name = name.as_deref().unwrap_or(UNKNOWN_REFERENCE);
            rendered = format!("{rendered} ({name})");
        }
        text.push_str(&format!("\n  {:<16} {rendered}", format!("{}:", spec.label).cyan()));
    }

    // Read-only fields the server adds (counts, denormalized names)
    for (key, value) in &fields {
        if !shown.contains(&key.as_str()) {
            text.push_str(&format!(
                "\n  {:<16} {}",
                format!("{key}:").dimmed(),
                render_value(value)
            ));
        }
    }

    CommandOutput::new(json_output)
        .with_text(text)
        .print(output)
}

fn render_value(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(s) if s.is_empty() => "-".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
