// Convene Library - Guided meeting and compliance workflows
// This exposes the workflow engine, notice composition and reminders

pub mod config;
pub mod directory;
pub mod draft;
pub mod entitlements;
pub mod error;
pub mod notice;
pub mod reminder;
pub mod store;
pub mod surface;
pub mod telemetry;
pub mod workflow;

// Re-export key types for easy access
pub use config::ConveneConfig;
pub use directory::{Directory, Entity, InMemoryDirectory, Person, PersonKind};
pub use draft::{AgendaItem, DraftRecord, FieldKind, FieldValue};
pub use entitlements::{EntitlementCheck, Feature, StaticEntitlements};
pub use error::{
    ContentProviderError, ExportError, PersistenceError, ReminderError, SessionError, ValidationError,
};
pub use notice::{
    export_filename, render_notice, CannedContentProvider, ContentProvider, ExportSink, FileExportSink,
    GenerationOutcome, NoticeComposer, NoticeField, NoticeModel, NoticeTemplate, PartialNoticeFields,
};
pub use reminder::{ArmOutcome, ReminderPhase, ReminderScheduler, ReminderSpec, ReminderState};
pub use store::{DraftStore, FileSystemDraftStore, InMemoryDraftStore, PersistedRecord, RecordId, RecordStatus};
pub use surface::{LogSurface, NotificationLevel, NotificationSurface, PromptChoice};
pub use telemetry::{create_session_span, generate_correlation_id, init_telemetry};
pub use workflow::{
    compliance_checklist_workflow, meeting_workflow, BearerCandidate, Collaborators, RequiredFieldSet,
    SessionConfig, SessionStatus, StepDefinition, WorkflowDefinition, WorkflowKind, WorkflowSession,
};
