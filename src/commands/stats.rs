use serde_json::json;
use tabled::builder::Builder;
use tabled::settings::Style;

use super::{AppContext, CommandOutput};
use crate::cli::OutputOptions;
use crate::display::table::tab_heading;
use crate::entity::Entity;
use crate::error::Result;

/// Record counts per tab value
pub async fn cmd_stats<E: Entity>(ctx: &AppContext, output: OutputOptions) -> Result<()> {
    let counts = ctx.source::<E>().tab_counts().await?;
    let total: usize = counts.iter().map(|(_, n)| n).sum();

    let json_output = json!({
        "collection": E::COLLECTION,
        "total": total,
        "counts": counts
            .iter()
            .map(|(value, count)| json!({ "value": value, "count": count }))
            .collect::<Vec<_>>(),
    });

    let mut builder = Builder::default();
    builder.push_record([tab_heading::<E::Tab>(), "Count".to_string()]);
    for (value, count) in &counts {
        builder.push_record([value.clone(), count.to_string()]);
    }
    builder.push_record(["total".to_string(), total.to_string()]);
    let mut table = builder.build();
    table.with(Style::rounded());

    CommandOutput::new(json_output)
        .with_text(table.to_string())
        .print(output)
}
