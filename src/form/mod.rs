//! Create/edit dialog state.
//!
//! [`FormState`] is the state machine behind one entity's dialog:
//!
//! ```text
//! Closed -> Open(Blank | Loading | Prefilled) -> Validating -> Submitting
//!        -> Closed            on success (values reset to defaults)
//!        -> Open + error      on failure (values kept)
//! ```
//!
//! Validation runs before any request is made. A form that fails validation
//! never reaches the dispatcher.

use std::marker::PhantomData;

use tracing::debug;

use crate::display::Toast;
use crate::entity::Entity;
use crate::error::{FieldErrors, InterEdError, Result};
use crate::mutation::MutationDispatcher;
use crate::remote::Payload;
use crate::types::EntityId;

pub mod schema;
pub mod validation;

pub use schema::{FieldKind, FieldSpec, FormSchema, FormValues};

/// Lifecycle phase of a dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormPhase {
    #[default]
    Closed,
    /// Create dialog showing defaults
    Blank,
    /// Edit dialog waiting for its target entity
    Loading,
    /// Edit dialog populated from its target entity
    Prefilled,
    Validating,
    /// A request is in flight; submit is disabled
    Submitting,
}

/// What the open dialog will do on submit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(EntityId),
}

/// A validated request, ready to be sent
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    Create(Payload),
    Update(EntityId, Payload),
}

/// Result of a submit attempt
#[derive(Debug)]
pub enum FormOutcome<E> {
    /// The server accepted the mutation; the form is closed
    Submitted(E),
    /// Validation failed before any request was made
    Invalid(FieldErrors),
    /// The request failed; the form stays open with its values
    Failed(InterEdError),
    /// A submission is already in flight, or the form is still loading
    Busy,
}

pub struct FormState<E> {
    schema: FormSchema,
    phase: FormPhase,
    mode: Option<FormMode>,
    values: FormValues,
    /// Values the edit form was prefilled with
    prefilled: FormValues,
    errors: FieldErrors,
    toast: Option<Toast>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> Default for FormState<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> FormState<E> {
    pub fn new() -> Self {
        let schema = E::schema();
        let values = schema.defaults();
        Self {
            schema,
            phase: FormPhase::Closed,
            mode: None,
            values,
            prefilled: FormValues::new(),
            errors: FieldErrors::new(),
            toast: None,
            _entity: PhantomData,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn mode(&self) -> Option<FormMode> {
        self.mode
    }

    pub fn is_open(&self) -> bool {
        self.phase != FormPhase::Closed
    }

    /// Whether the submit control is disabled
    pub fn is_busy(&self) -> bool {
        matches!(
            self.phase,
            FormPhase::Loading | FormPhase::Validating | FormPhase::Submitting
        )
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn value(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn toast(&self) -> Option<&Toast> {
        self.toast.as_ref()
    }

    pub fn take_toast(&mut self) -> Option<Toast> {
        self.toast.take()
    }

    // ========================================================================
    // Opening and closing
    // ========================================================================

    /// Open a blank create dialog
    pub fn open_create(&mut self) {
        self.reset();
        self.mode = Some(FormMode::Create);
        self.phase = FormPhase::Blank;
    }

    /// Open an edit dialog whose target has not loaded yet
    pub fn open_edit(&mut self, id: EntityId) {
        self.reset();
        self.mode = Some(FormMode::Edit(id));
        self.phase = FormPhase::Loading;
    }

    /// Populate an edit dialog from its loaded target.
    ///
    /// Replaces all values with the entity's current fields.
    pub fn prefill(&mut self, entity: &E) -> Result<()> {
        match self.mode {
            Some(FormMode::Edit(id)) if id == entity.id() => {}
            Some(FormMode::Edit(id)) => {
                return Err(InterEdError::Other(format!(
                    "form is editing {} #{id}, not #{}",
                    E::SINGULAR,
                    entity.id()
                )));
            }
            _ => return Err(InterEdError::FormClosed),
        }
        if matches!(self.phase, FormPhase::Validating | FormPhase::Submitting) {
            return Err(InterEdError::FormBusy);
        }

        let record = serde_json::to_value(entity)?;
        self.values = self.schema.values_from(&record);
        self.prefilled = self.values.clone();
        self.errors.clear();
        self.phase = FormPhase::Prefilled;
        Ok(())
    }

    /// Open an edit dialog for an already-loaded entity
    pub fn open_edit_with(&mut self, entity: &E) -> Result<()> {
        self.open_edit(entity.id());
        self.prefill(entity)
    }

    /// Close without submitting, discarding entered values
    pub fn close(&mut self) {
        self.reset();
    }

    fn reset(&mut self) {
        self.phase = FormPhase::Closed;
        self.mode = None;
        self.values = self.schema.defaults();
        self.prefilled.clear();
        self.errors.clear();
    }

    /// Phase an open dialog returns to after a failed submit
    fn resting_phase(&self) -> FormPhase {
        match self.mode {
            Some(FormMode::Create) => FormPhase::Blank,
            Some(FormMode::Edit(_)) => FormPhase::Prefilled,
            None => FormPhase::Closed,
        }
    }

    // ========================================================================
    // Editing
    // ========================================================================

    /// Change one field. Clears that field's error until it is validated again.
    pub fn set_value(&mut self, field: &str, value: impl Into<String>) -> Result<()> {
        if !self.is_open() {
            return Err(InterEdError::FormClosed);
        }
        self.schema.ensure_field(field)?;
        self.values.insert(field.to_string(), value.into());
        self.errors.remove(field);
        Ok(())
    }

    /// Validate one field, as when focus leaves it
    pub fn blur(&mut self, field: &str) -> Result<Option<&str>> {
        let raw = self.values.get(field).cloned().unwrap_or_default();
        match self.schema.validate_field(field, &raw)? {
            Some(message) => {
                self.errors.insert(field.to_string(), message);
            }
            None => {
                self.errors.remove(field);
            }
        }
        Ok(self.error(field))
    }

    // ========================================================================
    // Submitting
    // ========================================================================

    /// Validate and enter `Submitting`.
    ///
    /// Fails with `FormBusy` while loading or while a submission is in
    /// flight, and with `Validation` (field errors also stored on the form)
    /// when any field is invalid.
    pub fn begin_submit(&mut self) -> Result<Submission> {
        let mode = match (self.phase, self.mode) {
            (FormPhase::Closed, _) | (_, None) => return Err(InterEdError::FormClosed),
            (FormPhase::Loading | FormPhase::Validating | FormPhase::Submitting, _) => {
                return Err(InterEdError::FormBusy);
            }
            (_, Some(mode)) => mode,
        };

        self.phase = FormPhase::Validating;
        match self.schema.validate_retaining(&self.values, &self.prefilled) {
            Ok(payload) => {
                self.errors.clear();
                self.phase = FormPhase::Submitting;
                Ok(match mode {
                    FormMode::Create => Submission::Create(payload),
                    FormMode::Edit(id) => Submission::Update(id, payload),
                })
            }
            Err(errors) => {
                debug!(entity = E::SINGULAR, count = errors.len(), "form invalid");
                self.errors = errors.clone();
                self.phase = self.resting_phase();
                Err(InterEdError::Validation(errors))
            }
        }
    }

    /// Apply the result of the request started by [`begin_submit`].
    ///
    /// [`begin_submit`]: FormState::begin_submit
    pub fn complete(&mut self, result: Result<E>) -> FormOutcome<E> {
        let verb = match self.mode {
            Some(FormMode::Edit(_)) => "updated",
            _ => "created",
        };

        match result {
            Ok(entity) => {
                self.toast = Some(Toast::success(format!(
                    "{} {verb}: {}",
                    capitalize(E::SINGULAR),
                    entity.display_name()
                )));
                self.reset();
                FormOutcome::Submitted(entity)
            }
            Err(err) => {
                if let Some(fields) = err.field_errors() {
                    self.errors.extend(fields.clone());
                }
                self.toast = Some(Toast::error(err.to_string()));
                self.phase = self.resting_phase();
                FormOutcome::Failed(err)
            }
        }
    }

    /// Validate, dispatch, and apply the result
    pub async fn submit(&mut self, dispatcher: &MutationDispatcher<E>) -> FormOutcome<E> {
        let submission = match self.begin_submit() {
            Ok(submission) => submission,
            Err(InterEdError::FormBusy) => return FormOutcome::Busy,
            Err(InterEdError::Validation(errors)) => return FormOutcome::Invalid(errors),
            Err(err) => return FormOutcome::Failed(err),
        };

        let result = match &submission {
            Submission::Create(payload) => dispatcher.create(payload).await,
            Submission::Update(id, payload) => dispatcher.update(*id, payload).await,
        };
        self.complete(result)
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Agent, AgentStatus};

    fn agent() -> Agent {
        serde_json::from_str(
            r#"{"id": 7, "name": "Study Bridge", "email": "hello@studybridge.io",
                "status": "active", "country": "Ghana"}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_open_create_uses_defaults() {
        let mut form = FormState::<Agent>::new();
        assert!(!form.is_open());

        form.open_create();
        assert_eq!(form.phase(), FormPhase::Blank);
        assert_eq!(form.value("status"), Some("pending"));
        assert_eq!(form.value("name"), Some(""));
    }

    #[test]
    fn test_edit_loading_then_prefilled() {
        let mut form = FormState::<Agent>::new();
        form.open_edit(EntityId::new(7));
        assert_eq!(form.phase(), FormPhase::Loading);
        assert!(form.is_busy());
        assert!(matches!(form.begin_submit(), Err(InterEdError::FormBusy)));

        form.prefill(&agent()).unwrap();
        assert_eq!(form.phase(), FormPhase::Prefilled);
        assert_eq!(form.value("country"), Some("Ghana"));
        assert_eq!(form.value("company"), Some(""));
        assert!(!form.is_busy());
    }

    #[test]
    fn test_prefill_rejects_other_entity() {
        let mut form = FormState::<Agent>::new();
        form.open_edit(EntityId::new(8));
        assert!(form.prefill(&agent()).is_err());

        let mut closed = FormState::<Agent>::new();
        assert!(matches!(closed.prefill(&agent()), Err(InterEdError::FormClosed)));
    }

    #[test]
    fn test_blur_marks_and_clears_field() {
        let mut form = FormState::<Agent>::new();
        form.open_create();
        form.set_value("email", "not-an-email").unwrap();
        assert_eq!(
            form.blur("email").unwrap(),
            Some("Email must be a valid email address")
        );

        form.set_value("email", "ok@agency.com").unwrap();
        assert!(form.error("email").is_none());
        assert_eq!(form.blur("email").unwrap(), None);
    }

    #[test]
    fn test_set_value_unknown_field() {
        let mut form = FormState::<Agent>::new();
        form.open_create();
        assert!(matches!(
            form.set_value("passport", "X"),
            Err(InterEdError::UnknownField { .. })
        ));
    }

    #[test]
    fn test_invalid_submit_keeps_form_open() {
        let mut form = FormState::<Agent>::new();
        form.open_create();
        form.set_value("name", "EduLink").unwrap();

        let err = form.begin_submit().unwrap_err();
        assert!(err.field_errors().is_some_and(|f| f.contains_key("email")));
        assert_eq!(form.phase(), FormPhase::Blank);
        assert_eq!(form.value("name"), Some("EduLink"));
        assert_eq!(form.error("email"), Some("Email is required"));
    }

    #[test]
    fn test_second_submit_while_in_flight_is_busy() {
        let mut form = FormState::<Agent>::new();
        form.open_edit_with(&agent()).unwrap();

        let submission = form.begin_submit().unwrap();
        assert!(matches!(submission, Submission::Update(id, _) if id == EntityId::new(7)));
        assert!(form.is_busy());
        assert!(matches!(form.begin_submit(), Err(InterEdError::FormBusy)));
    }

    #[test]
    fn test_complete_success_resets_and_closes() {
        let mut form = FormState::<Agent>::new();
        form.open_edit_with(&agent()).unwrap();
        form.set_value("status", "inactive").unwrap();
        form.begin_submit().unwrap();

        let mut updated = agent();
        updated.status = AgentStatus::Inactive;
        let outcome = form.complete(Ok(updated));

        assert!(matches!(outcome, FormOutcome::Submitted(a) if a.status == AgentStatus::Inactive));
        assert!(!form.is_open());
        assert_eq!(form.value("status"), Some("pending"));
        assert_eq!(
            form.take_toast().map(|t| t.message),
            Some("Agent updated: Study Bridge".to_string())
        );
    }

    #[test]
    fn test_complete_failure_keeps_values_and_merges_server_errors() {
        let mut form = FormState::<Agent>::new();
        form.open_create();
        form.set_value("name", "EduLink").unwrap();
        form.set_value("email", "taken@edulink.com").unwrap();
        form.begin_submit().unwrap();

        let mut fields = FieldErrors::new();
        fields.insert("email".to_string(), "has already been taken".to_string());
        let outcome = form.complete(Err(InterEdError::Validation(fields)));

        assert!(matches!(outcome, FormOutcome::Failed(_)));
        assert_eq!(form.phase(), FormPhase::Blank);
        assert_eq!(form.value("email"), Some("taken@edulink.com"));
        assert_eq!(form.error("email"), Some("has already been taken"));
        assert_eq!(
            form.toast().map(|t| t.level),
            Some(crate::display::ToastLevel::Error)
        );
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("staff member"), "Staff member");
        assert_eq!(capitalize(""), "");
    }
}
