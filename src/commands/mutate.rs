use owo_colors::OwoColorize;
use serde_json::json;

use super::{AppContext, CommandOutput};
use crate::cli::OutputOptions;
use crate::display::Toast;
use crate::entity::Entity;
use crate::error::{InterEdError, Result};
use crate::form::{FormOutcome, FormState};
use crate::list::{ListAction, ListController};
use crate::screen::ListScreen;
use crate::types::EntityId;

/// Create a record from `field=value` assignments.
///
/// Values go through the entity's form, so invalid input fails before any
/// request is made.
pub async fn cmd_create<E: Entity>(
    ctx: &AppContext,
    assignments: &[(String, String)],
    output: OutputOptions,
) -> Result<()> {
    let mut form = FormState::<E>::new();
    form.open_create();
    apply_assignments(&mut form, assignments)?;

    let record = finish(&mut form, ctx).await?;
    print_mutation("create", &record, form.take_toast(), output)
}

/// Update a record. Unassigned fields keep their current values.
pub async fn cmd_update<E: Entity>(
    ctx: &AppContext,
    id: EntityId,
    assignments: &[(String, String)],
    output: OutputOptions,
) -> Result<()> {
    let mut form = FormState::<E>::new();
    form.open_edit(id);
    let current = ctx.source::<E>().fetch_one(id).await?;
    form.prefill(&current)?;
    apply_assignments(&mut form, assignments)?;

    let record = finish(&mut form, ctx).await?;
    print_mutation("update", &record, form.take_toast(), output)
}

/// Delete records by id, one request each.
///
/// Every id is attempted. A single failure is returned as is; several are
/// reported together.
pub async fn cmd_delete<E: Entity>(ctx: &AppContext, ids: &[EntityId], output: OutputOptions) -> Result<()> {
    let mut screen = ListScreen::open(ctx.source::<E>(), ListController::new(ctx.page_size)).await?;
    screen.dispatch(ListAction::SelectAll(ids.to_vec()));

    let dispatcher = ctx.dispatcher::<E>();
    let mut failures = screen.delete_selected(&dispatcher).await;
    let toast = screen.take_toast();

    if failures.len() == 1 && ids.len() == 1 {
        let (_, err) = failures.remove(0);
        return Err(err);
    }

    let deleted: Vec<EntityId> = ids
        .iter()
        .copied()
        .filter(|id| !failures.iter().any(|(failed, _)| failed == id))
        .collect();

    if !failures.is_empty() {
        for (id, err) in &failures {
            eprintln!("{} #{id}: {err}", E::SINGULAR.red());
        }
        if let Some(toast) = &toast {
            eprintln!("{}", toast.render());
        }
        return Err(InterEdError::Other(format!(
            "{} of {} deletes failed",
            failures.len(),
            ids.len()
        )));
    }

    let json_output = json!({
        "action": "delete",
        "collection": E::COLLECTION,
        "deleted": deleted,
        "success": true,
    });
    let text = toast
        .map(|t| t.render())
        .unwrap_or_else(|| format!("Deleted {} {}", deleted.len(), E::COLLECTION));

    CommandOutput::new(json_output).with_text(text).print(output)
}

fn apply_assignments<E: Entity>(form: &mut FormState<E>, assignments: &[(String, String)]) -> Result<()> {
    for (field, value) in assignments {
        form.set_value(field, value.clone())?;
    }
    Ok(())
}

async fn finish<E: Entity>(form: &mut FormState<E>, ctx: &AppContext) -> Result<E> {
    match form.submit(&ctx.dispatcher::<E>()).await {
        FormOutcome::Submitted(record) => Ok(record),
        FormOutcome::Invalid(errors) => Err(InterEdError::Validation(errors)),
        FormOutcome::Failed(err) => Err(err),
        FormOutcome::Busy => Err(InterEdError::FormBusy),
    }
}

fn print_mutation<E: Entity>(
    action: &str,
    record: &E,
    toast: Option<Toast>,
    output: OutputOptions,
) -> Result<()> {
    let json_output = json!({
        "action": action,
        "collection": E::COLLECTION,
        "id": record.id(),
        "record": record,
        "success": true,
    });
    let text = toast
        .map(|t| t.render())
        .unwrap_or_else(|| format!("{} #{}", E::SINGULAR, record.id()));

    CommandOutput::new(json_output).with_text(text).print(output)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::entity::{Agent, AgentStatus};
    use crate::remote::MemoryBackend;

    const AGENTS: &str = r#"{"agents": [
        {"id": 1, "name": "Global Pathways", "email": "a@gp.com", "status": "active"},
        {"id": 2, "name": "Study Bridge", "email": "b@sb.com", "status": "pending"}
    ]}"#;

    const JSON: OutputOptions = OutputOptions { json: true };

    fn context() -> (Arc<MemoryBackend>, AppContext, tempfile::TempDir) {
        let temp = tempfile::tempdir().unwrap();
        let backend = Arc::new(MemoryBackend::from_json(AGENTS).unwrap());
        let ctx = AppContext::new(backend.clone(), 10)
            .with_event_log(crate::events::EventLog::new(temp.path().join("events.ndjson")));
        (backend, ctx, temp)
    }

    fn set(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[tokio::test]
    async fn test_create_with_invalid_email_makes_no_request() {
        let (backend, ctx, _temp) = context();
        let err = cmd_create::<Agent>(&ctx, &set(&[("name", "EduLink"), ("email", "")]), JSON)
            .await
            .unwrap_err();

        let fields = err.field_errors().unwrap();
        assert!(fields.contains_key("email"));
        assert_eq!(backend.request_count(), 0);
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_field() {
        let (backend, ctx, _temp) = context();
        let err = cmd_create::<Agent>(&ctx, &set(&[("nickname", "x")]), JSON)
            .await
            .unwrap_err();
        assert!(matches!(err, InterEdError::UnknownField { .. }));
        assert_eq!(backend.request_count(), 0);
    }

    #[tokio::test]
    async fn test_update_keeps_unassigned_fields() {
        let (_, ctx, _temp) = context();
        cmd_update::<Agent>(&ctx, EntityId::new(2), &set(&[("status", "active")]), JSON)
            .await
            .unwrap();

        let agent = ctx.source::<Agent>().refetch().await.unwrap().remove(1);
        assert_eq!(agent.status, AgentStatus::Active);
        assert_eq!(agent.email, "b@sb.com");
    }

    #[tokio::test]
    async fn test_delete_reports_single_not_found() {
        let (_, ctx, _temp) = context();
        let err = cmd_delete::<Agent>(&ctx, &[EntityId::new(7)], JSON).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_many_continues_past_failures() {
        let (backend, ctx, _temp) = context();
        let err = cmd_delete::<Agent>(&ctx, &[EntityId::new(1), EntityId::new(7)], JSON)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("1 of 2 deletes failed"));
        assert_eq!(backend.len("agents"), 1);
    }
}
