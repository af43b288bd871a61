//! Registration controller: rule orchestration and submission gating

use crate::checks::{AsyncCheckEngine, AsyncEvent, CheckOutcome, UniqueField};
use crate::config::FormConfig;
use crate::remote::{AvailabilityOracle, SubmitCapability};
use crate::services::{BusyIndicator, Notifier, ToastKind};
use crate::state::{FieldId, RegistrationForm, ScalarField, TipoTelefono};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

/// Where the form sits in its submission lifecycle.
///
/// `Validating` only exists inside a single edit call; by the time a
/// mutator returns, the phase has settled on `Valid` or `Invalid`.
/// `Invalid` also covers "sync rules pass but async checks are still
/// outstanding".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionPhase {
    #[default]
    Editing,
    Validating,
    Valid,
    Invalid,
    Submitting,
    Submitted,
    Failed,
}

/// Result of a submission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The form was invalid or checks were pending; nothing left the
    /// process and latent errors were surfaced by touching every field.
    Rejected,
    /// The submit capability accepted the record.
    Submitted,
    /// The submit capability failed; the record is preserved and the
    /// failure was reported through the notifier.
    Failed,
}

impl From<UniqueField> for ScalarField {
    fn from(field: UniqueField) -> Self {
        match field {
            UniqueField::Email => Self::Email,
            UniqueField::Username => Self::Username,
            UniqueField::Nif => Self::Nif,
        }
    }
}

/// Orchestrates rule evaluation, async check scheduling, the dynamic phone
/// list, and submission gating for one registration form instance.
pub struct RegistrationController {
    form: RegistrationForm,
    engine: AsyncCheckEngine,
    events: UnboundedReceiver<AsyncEvent>,
    submitter: Arc<dyn SubmitCapability>,
    notifier: Arc<dyn Notifier>,
    busy: Arc<dyn BusyIndicator>,
    phase: SubmissionPhase,
}

impl RegistrationController {
    pub fn new(
        oracle: Arc<dyn AvailabilityOracle>,
        submitter: Arc<dyn SubmitCapability>,
        notifier: Arc<dyn Notifier>,
        busy: Arc<dyn BusyIndicator>,
    ) -> Self {
        Self::with_config(FormConfig::default(), oracle, submitter, notifier, busy)
    }

    pub fn with_config(
        config: FormConfig,
        oracle: Arc<dyn AvailabilityOracle>,
        submitter: Arc<dyn SubmitCapability>,
        notifier: Arc<dyn Notifier>,
        busy: Arc<dyn BusyIndicator>,
    ) -> Self {
        let form = RegistrationForm::new(config.max_telefonos_adicionales);
        let (engine, events) = AsyncCheckEngine::new(oracle, config);
        Self {
            form,
            engine,
            events,
            submitter,
            notifier,
            busy,
            phase: SubmissionPhase::Editing,
        }
    }

    pub fn form(&self) -> &RegistrationForm {
        &self.form
    }

    pub fn phase(&self) -> SubmissionPhase {
        self.phase
    }

    /// Apply an edit: sync rules and cross rules re-run immediately, and a
    /// uniqueness-checked field gets its async check (re)scheduled.
    pub fn set_value(&mut self, id: FieldId, value: &str) {
        self.phase = SubmissionPhase::Validating;
        self.form.set_value(id, value);

        if let FieldId::Scalar(scalar) = id {
            if let Some(unique) = unique_field(scalar) {
                // previous result and pending flag describe a stale value
                if let Some(field) = self.form.field_mut(id) {
                    field.errors.remove(unique.taken_kind());
                    field.pending_async = false;
                }
                if self.engine.schedule(unique, value).is_none() {
                    tracing::debug!(field = scalar.name(), "value does not qualify for check");
                }
            }
        }

        self.refresh_phase();
    }

    pub fn touch(&mut self, id: FieldId) {
        self.form.touch(id);
    }

    /// Append an additional phone entry; no-op at the cap.
    pub fn add_telefono(&mut self) -> bool {
        let added = self.form.telefonos_adicionales.add();
        if added {
            self.refresh_phase();
        }
        added
    }

    /// Remove the additional phone entry at `index`; no-op out of range.
    pub fn remove_telefono(&mut self, index: usize) -> bool {
        let removed = self.form.telefonos_adicionales.remove_at(index);
        if removed {
            self.refresh_phase();
        }
        removed
    }

    pub fn set_tipo_telefono(&mut self, index: usize, tipo: TipoTelefono) {
        self.form.set_tipo_telefono(index, tipo);
    }

    pub fn set_acepta_terminos(&mut self, accepted: bool) {
        self.form.set_acepta_terminos(accepted);
        self.refresh_phase();
    }

    pub fn set_recibir_newsletter(&mut self, subscribe: bool) {
        self.form.set_recibir_newsletter(subscribe);
    }

    /// Apply one async check event. Events carrying a superseded token are
    /// dropped without touching field state.
    pub fn apply_event(&mut self, event: AsyncEvent) {
        match event {
            AsyncEvent::Started { field, token } => {
                if self.engine.is_current(field, token) {
                    if let Some(state) = self.form.field_mut(ScalarField::from(field).into()) {
                        state.pending_async = true;
                    }
                }
            }
            AsyncEvent::Resolved {
                field,
                token,
                outcome,
            } => {
                if !self.engine.is_current(field, token) {
                    tracing::debug!(?field, "discarding stale check result");
                    return;
                }
                self.engine.complete(field, token);
                if let Some(state) = self.form.field_mut(ScalarField::from(field).into()) {
                    state.pending_async = false;
                    match outcome {
                        CheckOutcome::Taken => state.errors.insert(field.taken_error()),
                        // fail-open: unknown availability never blocks
                        CheckOutcome::Available | CheckOutcome::Indeterminate => {
                            state.errors.remove(field.taken_kind());
                        }
                    }
                }
                self.refresh_phase();
            }
        }
    }

    /// Apply every event already delivered, without waiting.
    pub fn pump(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            self.apply_event(event);
        }
    }

    /// Wait for all outstanding async checks to resolve and apply them.
    pub async fn settle(&mut self) {
        self.pump();
        while self.engine.has_outstanding() {
            match self.events.recv().await {
                Some(event) => self.apply_event(event),
                None => break,
            }
        }
    }

    fn submittable(&self) -> bool {
        self.form.is_valid() && !self.engine.has_outstanding() && !self.form.has_pending_async()
    }

    fn refresh_phase(&mut self) {
        self.phase = if self.submittable() {
            SubmissionPhase::Valid
        } else {
            SubmissionPhase::Invalid
        };
    }

    /// Attempt submission.
    ///
    /// While invalid or with checks pending, nothing leaves the process:
    /// every field is forced to `touched` so latent errors show, and the
    /// attempt is rejected. When valid, the submit capability is invoked
    /// exactly once with the resolved record.
    pub async fn submit(&mut self) -> SubmitOutcome {
        self.pump();

        if !self.submittable() {
            self.form.mark_all_touched();
            self.phase = SubmissionPhase::Invalid;
            tracing::info!("submission blocked: form invalid or checks outstanding");
            return SubmitOutcome::Rejected;
        }

        self.phase = SubmissionPhase::Submitting;
        self.busy.set_busy(true);
        let record = self.form.resolve();
        let result = self.submitter.submit(&record).await;
        self.busy.set_busy(false);

        match result {
            Ok(()) => {
                self.phase = SubmissionPhase::Submitted;
                tracing::info!(username = %record.username, "registration submitted");
                self.notifier.notify(
                    ToastKind::Success,
                    "¡Cuenta creada con éxito! Bienvenido a TecnoMayores 🎉",
                );
                SubmitOutcome::Submitted
            }
            Err(error) => {
                self.phase = SubmissionPhase::Failed;
                tracing::warn!(%error, "submission failed");
                self.notifier.notify(
                    ToastKind::Error,
                    &format!("No se pudo completar el registro: {error}"),
                );
                // record preserved; back to editing
                self.phase = SubmissionPhase::Editing;
                SubmitOutcome::Failed
            }
        }
    }

    /// Clear the form and cancel every outstanding check.
    pub fn reset(&mut self) {
        self.engine.cancel_all();
        self.form.reset();
        self.phase = SubmissionPhase::Editing;
    }
}

const fn unique_field(field: ScalarField) -> Option<UniqueField> {
    match field {
        ScalarField::Email => Some(UniqueField::Email),
        ScalarField::Username => Some(UniqueField::Username),
        ScalarField::Nif => Some(UniqueField::Nif),
        _ => None,
    }
}
