// Workflow session - sequences the user through the steps of one workflow
//
// The session owns the draft, the step pointer, the notice composer and the
// reminder schedulers. Save and submit take `&self` so the UI can observe
// `is_busy()` while a store call is pending; a second call during that
// window is rejected instead of writing a divergent record.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, info, warn, Instrument};

use super::definitions::WorkflowDefinition;
use super::steps::{RequiredFieldSet, StepDefinition};
use crate::config::ConveneConfig;
use crate::directory::{Directory, Person, PersonKind};
use crate::draft::{fields, DraftRecord, FieldValue};
use crate::entitlements::EntitlementCheck;
use crate::error::{ExportError, SessionError, ValidationError};
use crate::notice::{
    export_filename, render_notice, ContentProvider, ExportSink, GenerationOutcome, NoticeComposer, NoticeField,
    NoticeModel, NoticeTemplate,
};
use crate::reminder::{ArmOutcome, ReminderPhase, ReminderScheduler, ReminderState};
use crate::store::{DraftStore, PersistedRecord, RecordId, RecordStatus};
use crate::surface::{NotificationLevel, NotificationSurface};
use crate::telemetry::{create_session_span, generate_correlation_id};

/// Capabilities injected into a session
#[derive(Clone)]
pub struct Collaborators {
    pub store: Arc<dyn DraftStore>,
    pub surface: Arc<dyn NotificationSurface>,
    pub entitlements: Arc<dyn EntitlementCheck>,
    pub content_provider: Option<Arc<dyn ContentProvider>>,
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub reminder_interval: Duration,
    pub notice_template: NoticeTemplate,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            reminder_interval: Duration::from_secs(60),
            notice_template: NoticeTemplate::default(),
        }
    }
}

impl SessionConfig {
    pub fn from_config(config: &ConveneConfig) -> Self {
        let notice_template = match &config.notice.body_template {
            Some(body) => NoticeTemplate::new(body.clone()),
            None => NoticeTemplate::default(),
        };
        Self {
            reminder_interval: config.reminders.interval(),
            notice_template,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Open,
    /// A save or submit is pending
    Busy,
    Closed(RecordStatus),
}

/// A selectable chairperson/secretary/scrutinizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BearerCandidate {
    Participant(Person),
    TeamMember(Person),
    /// Free-text entry for someone outside the directory
    ThirdParty,
}

impl BearerCandidate {
    pub fn label(&self) -> String {
        match self {
            BearerCandidate::Participant(person) | BearerCandidate::TeamMember(person) => {
                format!("{} ({})", person.name, person.designation)
            }
            BearerCandidate::ThirdParty => "Third party".to_string(),
        }
    }
}

#[derive(Debug, Default)]
struct PersistState {
    record_id: Option<RecordId>,
    closed: Option<RecordStatus>,
}

type Reminders = BTreeMap<&'static str, ReminderScheduler>;

pub struct WorkflowSession {
    definition: WorkflowDefinition,
    draft: DraftRecord,
    current: usize,
    store: Arc<dyn DraftStore>,
    surface: Arc<dyn NotificationSurface>,
    config: SessionConfig,
    persist: tokio::sync::Mutex<PersistState>,
    notice: NoticeComposer,
    reminders: Mutex<Reminders>,
    correlation_id: String,
    span: tracing::Span,
}

impl WorkflowSession {
    pub fn new(definition: WorkflowDefinition, collaborators: Collaborators, config: SessionConfig) -> Self {
        let correlation_id = generate_correlation_id();
        let span = create_session_span(&definition.kind.to_string(), &correlation_id);
        let notice = NoticeComposer::new(
            config.notice_template.clone(),
            collaborators.content_provider,
            collaborators.entitlements,
        );

        span.in_scope(|| info!(steps = definition.steps.len(), "Workflow session started"));

        Self {
            definition,
            draft: DraftRecord::new(),
            current: 0,
            store: collaborators.store,
            surface: collaborators.surface,
            config,
            persist: tokio::sync::Mutex::new(PersistState::default()),
            notice,
            reminders: Mutex::new(BTreeMap::new()),
            correlation_id,
            span,
        }
    }

    /// Re-open a saved draft; the next save updates `id` instead of creating
    pub fn resume(
        collaborators: Collaborators,
        config: SessionConfig,
        id: RecordId,
        record: PersistedRecord,
    ) -> Result<Self, ValidationError> {
        if record.status == RecordStatus::Submitted {
            return Err(ValidationError::NotResumable { status: record.status });
        }

        let mut session = Self::new(WorkflowDefinition::for_kind(record.workflow), collaborators, config);
        session.draft = record.fields;
        session.persist.get_mut().record_id = Some(id.clone());

        let armed: Vec<_> = session
            .definition
            .reminders
            .iter()
            .filter(|binding| session.draft.flag(binding.trigger_field))
            .map(|binding| binding.trigger_field)
            .collect();
        for field in armed {
            session.arm_reminder(field);
        }

        session
            .span
            .in_scope(|| info!(record_id = %id, fields = session.draft.len(), "Workflow session resumed"));
        Ok(session)
    }

    pub async fn resume_from_store(
        collaborators: Collaborators,
        config: SessionConfig,
        id: RecordId,
    ) -> Result<Self, SessionError> {
        let record = collaborators.store.get(&id).await?;
        Ok(Self::resume(collaborators, config, id, record)?)
    }

    pub fn definition(&self) -> &WorkflowDefinition {
        &self.definition
    }

    pub fn draft(&self) -> &DraftRecord {
        &self.draft
    }

    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_step(&self) -> &StepDefinition {
        &self.definition.steps[self.current]
    }

    pub fn is_terminal_step(&self) -> bool {
        self.current == self.definition.terminal_index()
    }

    pub fn status(&self) -> SessionStatus {
        match self.persist.try_lock() {
            Ok(persist) => match persist.closed {
                Some(status) => SessionStatus::Closed(status),
                None => SessionStatus::Open,
            },
            Err(_) => SessionStatus::Busy,
        }
    }

    /// Whether a save or submit is pending; the UI disables its controls meanwhile
    pub fn is_busy(&self) -> bool {
        self.status() == SessionStatus::Busy
    }

    pub fn record_id(&self) -> Option<RecordId> {
        self.persist.try_lock().ok().and_then(|persist| persist.record_id.clone())
    }

    /// Merge one field into the draft
    ///
    /// Returns the ids of the steps whose required sets may have changed.
    pub fn update_field(&mut self, name: &str, value: FieldValue) -> Result<Vec<&'static str>, ValidationError> {
        self.ensure_open()?;
        let _guard = self.span.enter();

        if let Some(spec) = self.definition.owner_of(name).and_then(|step| step.field_spec(name)) {
            if !value.matches_kind(spec.kind) {
                warn!(field = name, expected = ?spec.kind, "Field updated with a value of another kind");
            }
        }

        let trigger = self
            .definition
            .binding_for(name)
            .map(|binding| binding.trigger_field)
            .zip(value.as_flag());

        let previous = self.draft.set(name, value);
        debug!(field = name, replaced = previous.is_some(), "Draft field updated");

        match trigger {
            Some((field, true)) => self.arm_reminder(field),
            Some((field, false)) => self.disarm_reminder(field),
            None => {}
        }

        let affected = self
            .definition
            .steps
            .iter()
            .enumerate()
            .filter(|(index, step)| *index == self.current || step.owns(name) || step.depends_on(name))
            .map(|(_, step)| step.id)
            .collect();
        Ok(affected)
    }

    /// Advance one step; a no-op on the last step or once closed
    pub fn next(&mut self) -> usize {
        if self.ensure_open().is_ok() && self.current < self.definition.terminal_index() {
            self.current += 1;
            self.log_step_change("next");
        }
        self.current
    }

    pub fn previous(&mut self) -> usize {
        if self.ensure_open().is_ok() && self.current > 0 {
            self.current -= 1;
            self.log_step_change("previous");
        }
        self.current
    }

    pub fn go_to(&mut self, step_id: &str) -> Result<usize, ValidationError> {
        self.ensure_open()?;
        let index = self
            .definition
            .step_index(step_id)
            .ok_or_else(|| ValidationError::UnknownStep(step_id.to_string()))?;
        self.current = index;
        self.log_step_change("jump");
        Ok(index)
    }

    fn ensure_open(&mut self) -> Result<(), ValidationError> {
        match self.persist.get_mut().closed {
            Some(status) => Err(ValidationError::SessionClosed { status }),
            None => Ok(()),
        }
    }

    fn log_step_change(&self, direction: &str) {
        self.span.in_scope(|| {
            info!(
                direction,
                step = self.current_step().id,
                index = self.current,
                "Step changed"
            )
        });
    }

    /// Required fields of `step_id`, recomputed from the live draft
    pub fn required_fields_for_step(&self, step_id: &str) -> Result<RequiredFieldSet, ValidationError> {
        self.definition
            .step(step_id)
            .map(|step| step.required_fields(&self.draft))
            .ok_or_else(|| ValidationError::UnknownStep(step_id.to_string()))
    }

    pub fn current_required_fields(&self) -> RequiredFieldSet {
        self.current_step().required_fields(&self.draft)
    }

    /// Required-but-empty fields across all steps, grouped by step
    ///
    /// Advisory only; neither navigation nor submit is blocked by it.
    pub fn unsatisfied_required_fields(&self) -> Vec<RequiredFieldSet> {
        self.definition
            .steps
            .iter()
            .map(|step| {
                let mut set = step.required_fields(&self.draft);
                set.fields.retain(|field| !field.satisfied);
                set
            })
            .filter(|set| !set.fields.is_empty())
            .collect()
    }

    /// Persist the draft from any step; closes the session on success
    pub async fn save_draft(&self) -> Result<RecordId, SessionError> {
        self.persist_with_status(RecordStatus::Draft).await
    }

    /// Persist as submitted; only allowed from the terminal step
    pub async fn submit(&self) -> Result<RecordId, SessionError> {
        let terminal = self.definition.terminal_index();
        if self.current != terminal {
            return Err(ValidationError::SubmitBeforeTerminalStep {
                current: self.current,
                terminal,
            }
            .into());
        }

        let unsatisfied: Vec<String> = self
            .unsatisfied_required_fields()
            .iter()
            .flat_map(|set| set.fields.iter().map(move |field| format!("{}.{}", set.step, field.name)))
            .collect();
        if !unsatisfied.is_empty() {
            self.span.in_scope(|| {
                warn!(
                    count = unsatisfied.len(),
                    fields = ?unsatisfied,
                    "Submitting with required fields still empty"
                )
            });
        }

        self.persist_with_status(RecordStatus::Submitted).await
    }

    async fn persist_with_status(&self, status: RecordStatus) -> Result<RecordId, SessionError> {
        let mut persist = self
            .persist
            .try_lock()
            .map_err(|_| ValidationError::OperationInFlight)?;
        if let Some(closed) = persist.closed {
            return Err(ValidationError::SessionClosed { status: closed }.into());
        }

        let record = PersistedRecord::new(self.definition.kind, status, self.draft.clone());
        let result = async {
            match persist.record_id.clone() {
                Some(id) => self.store.update(&id, &record).await.map(|_| id),
                None => self.store.create(&record).await,
            }
        }
        .instrument(self.span.clone())
        .await;

        match result {
            Ok(id) => {
                persist.record_id = Some(id.clone());
                persist.closed = Some(status);
                drop(persist);

                self.span
                    .in_scope(|| info!(record_id = %id, %status, fields = record.fields.len(), "Workflow persisted"));
                let message = match status {
                    RecordStatus::Draft => "Draft saved",
                    RecordStatus::Submitted => "Submitted successfully",
                };
                self.surface.notify(NotificationLevel::Success, message);
                self.teardown_reminders();
                Ok(id)
            }
            Err(error) => {
                self.span.in_scope(|| warn!(error = %error, %status, "Persisting workflow failed"));
                self.surface
                    .notify(NotificationLevel::Error, &format!("Could not save: {error}"));
                Err(error.into())
            }
        }
    }

    /// The notice as currently displayed
    pub fn notice(&self) -> NoticeModel {
        self.notice.displayed(&self.draft)
    }

    /// Rebuild the notice, consulting the provider when the draft asks for it
    pub async fn regenerate_notice(&mut self) -> Result<GenerationOutcome, ValidationError> {
        self.ensure_open()?;
        let use_provider = self.draft.flag(fields::USE_AI_GENERATION);
        let outcome = self
            .notice
            .regenerate(&self.draft, use_provider)
            .instrument(self.span.clone())
            .await;

        match &outcome {
            GenerationOutcome::FellBack(error) => self.surface.notify(
                NotificationLevel::Warning,
                &format!("Notice generation failed, showing the template instead: {error}"),
            ),
            GenerationOutcome::NotEntitled => self.surface.notify(
                NotificationLevel::Info,
                "Notice generation is not part of your plan",
            ),
            GenerationOutcome::Template | GenerationOutcome::Generated => {}
        }
        Ok(outcome)
    }

    pub fn set_notice_override(&mut self, path: &str, value: impl Into<String>) -> Result<NoticeField, ValidationError> {
        self.ensure_open()?;
        self.notice.set_field_override(path, value)
    }

    /// Drop the manual override for `path`; false when none was set
    pub fn reset_notice_override(&mut self, path: &str) -> Result<bool, ValidationError> {
        self.ensure_open()?;
        let field: NoticeField = path.parse()?;
        Ok(self.notice.reset_override(field))
    }

    /// Render the displayed notice and hand it to `sink`
    pub async fn export_notice(&self, sink: &dyn ExportSink) -> Result<PathBuf, ExportError> {
        let notice = self.notice();
        let contents = render_notice(&notice);
        sink.save(&export_filename(&notice), &contents)
            .instrument(self.span.clone())
            .await
    }

    /// Candidates for the office-bearer fields
    ///
    /// Participants of the draft's entity first, then team members, then
    /// the free-text third-party option.
    pub fn office_bearer_candidates(&self, directory: &dyn Directory) -> Vec<BearerCandidate> {
        let entity = self.draft.non_blank_text(fields::ENTITY_NAME);
        let people = directory.list_participants();

        let participants = people
            .iter()
            .filter(|person| person.kind == PersonKind::Participant)
            .filter(|person| entity.is_some() && person.entity.as_deref() == entity)
            .cloned()
            .map(BearerCandidate::Participant);
        let team = people
            .iter()
            .filter(|person| person.kind == PersonKind::TeamMember)
            .cloned()
            .map(BearerCandidate::TeamMember);

        participants
            .chain(team)
            .chain(std::iter::once(BearerCandidate::ThirdParty))
            .collect()
    }

    pub fn reminder(&self, trigger_field: &str) -> Option<ReminderState> {
        self.lock_reminders().get(trigger_field).map(ReminderScheduler::state)
    }

    pub fn reminder_phase(&self, trigger_field: &str) -> ReminderPhase {
        self.lock_reminders()
            .get(trigger_field)
            .map(ReminderScheduler::phase)
            .unwrap_or(ReminderPhase::Idle)
    }

    /// Mark the obligation behind `trigger_field` as done
    pub fn acknowledge_reminder(&self, trigger_field: &str) -> bool {
        match self.lock_reminders().get_mut(trigger_field) {
            Some(scheduler) => {
                scheduler.acknowledge();
                self.span
                    .in_scope(|| info!(reminder = %scheduler.spec().key, "Reminder acknowledged"));
                true
            }
            None => false,
        }
    }

    /// Stop every reminder owned by this session
    pub fn dispose(&mut self) {
        self.teardown_reminders();
    }

    fn lock_reminders(&self) -> MutexGuard<'_, Reminders> {
        self.reminders.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn arm_reminder(&self, trigger_field: &'static str) {
        let Some(binding) = self.definition.binding_for(trigger_field) else {
            return;
        };

        let mut reminders = self.lock_reminders();
        let scheduler = reminders
            .entry(trigger_field)
            .or_insert_with(|| ReminderScheduler::new(binding.reminder.clone(), Arc::clone(&self.surface)));

        match scheduler.arm(self.config.reminder_interval) {
            Ok(ArmOutcome::AlreadyAcknowledged) => {
                debug!(reminder = %binding.reminder.key, "Reminder already acknowledged, not re-arming");
            }
            Ok(outcome) => {
                info!(
                    reminder = %binding.reminder.key,
                    ?outcome,
                    interval_secs = self.config.reminder_interval.as_secs(),
                    "Reminder armed"
                );
            }
            Err(error) => warn!(error = %error, "Reminder not scheduled"),
        }
    }

    fn disarm_reminder(&self, trigger_field: &str) {
        if let Some(scheduler) = self.lock_reminders().get_mut(trigger_field) {
            scheduler.disarm();
            info!(reminder = %scheduler.spec().key, "Reminder disarmed");
        }
    }

    fn teardown_reminders(&self) {
        let mut reminders = self.lock_reminders();
        if reminders.is_empty() {
            return;
        }
        for scheduler in reminders.values_mut() {
            scheduler.disarm();
        }
        self.span
            .in_scope(|| debug!(count = reminders.len(), "Session reminders torn down"));
        reminders.clear();
    }
}

impl Drop for WorkflowSession {
    fn drop(&mut self) {
        self.teardown_reminders();
    }
}

impl std::fmt::Debug for WorkflowSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowSession")
            .field("workflow", &self.definition.kind)
            .field("current", &self.current)
            .field("draft", &self.draft)
            .field("status", &self.status())
            .field("correlation_id", &self.correlation_id)
            .finish()
    }
}
