pub mod definitions;
pub mod session;
pub mod steps;

pub use definitions::{compliance_checklist_workflow, meeting_workflow, ReminderBinding, WorkflowDefinition, WorkflowKind};
pub use session::{BearerCandidate, Collaborators, SessionConfig, SessionStatus, WorkflowSession};
pub use steps::{FieldSpec, RequiredField, RequiredFieldSet, Requirement, StepDefinition};
