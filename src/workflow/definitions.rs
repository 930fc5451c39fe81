// Built-in workflow definitions: meeting creation and compliance checklist

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::steps::{FieldSpec, Requirement, StepDefinition};
use crate::draft::fields::{self, nature, virtual_option};
use crate::draft::FieldKind;
use crate::reminder::ReminderSpec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowKind {
    Meeting,
    ComplianceChecklist,
}

impl fmt::Display for WorkflowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowKind::Meeting => write!(f, "meeting"),
            WorkflowKind::ComplianceChecklist => write!(f, "compliance"),
        }
    }
}

impl FromStr for WorkflowKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "meeting" => Ok(WorkflowKind::Meeting),
            "compliance" | "compliance-checklist" => Ok(WorkflowKind::ComplianceChecklist),
            other => Err(format!("unknown workflow '{other}' (expected meeting or compliance)")),
        }
    }
}

/// Ties a flag field to an out-of-band obligation reminder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderBinding {
    pub trigger_field: &'static str,
    pub reminder: ReminderSpec,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowDefinition {
    pub kind: WorkflowKind,
    pub steps: Vec<StepDefinition>,
    pub reminders: Vec<ReminderBinding>,
}

impl WorkflowDefinition {
    pub fn for_kind(kind: WorkflowKind) -> Self {
        match kind {
            WorkflowKind::Meeting => meeting_workflow(),
            WorkflowKind::ComplianceChecklist => compliance_checklist_workflow(),
        }
    }

    pub fn step_index(&self, step_id: &str) -> Option<usize> {
        self.steps.iter().position(|step| step.id == step_id)
    }

    pub fn step(&self, step_id: &str) -> Option<&StepDefinition> {
        self.steps.iter().find(|step| step.id == step_id)
    }

    pub fn terminal_index(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    /// The step whose form captures `field`
    pub fn owner_of(&self, field: &str) -> Option<&StepDefinition> {
        self.steps.iter().find(|step| step.owns(field))
    }

    pub fn binding_for(&self, field: &str) -> Option<&ReminderBinding> {
        self.reminders.iter().find(|binding| binding.trigger_field == field)
    }
}

pub fn meeting_workflow() -> WorkflowDefinition {
    let details = StepDefinition::new("details", "Meeting Details")
        .field(FieldSpec::required(fields::ENTITY_NAME, "Entity", FieldKind::Choice))
        .field(FieldSpec::required(fields::MEETING_TYPE, "Meeting type", FieldKind::Choice))
        .field(FieldSpec::required(fields::MEETING_NATURE, "Meeting nature", FieldKind::Choice))
        .field(FieldSpec::required(fields::MEETING_DATE, "Date", FieldKind::Date))
        .field(FieldSpec::required(fields::MEETING_TIME, "Time", FieldKind::Time))
        .field(FieldSpec::when(
            fields::VENUE,
            "Venue",
            FieldKind::Text,
            Requirement::FieldIn {
                field: fields::MEETING_NATURE,
                values: &[nature::PHYSICAL, nature::HYBRID],
            },
        ))
        .field(FieldSpec::when(
            fields::VIRTUAL_MEETING_OPTION,
            "Virtual meeting link",
            FieldKind::Choice,
            Requirement::FieldIn {
                field: fields::MEETING_NATURE,
                values: &[nature::HYBRID, nature::VIRTUAL],
            },
        ))
        .field(FieldSpec::when(
            fields::MEETING_LINK,
            "Meeting link",
            FieldKind::Text,
            Requirement::All(vec![
                Requirement::FieldIn {
                    field: fields::MEETING_NATURE,
                    values: &[nature::HYBRID, nature::VIRTUAL],
                },
                Requirement::FieldIn {
                    field: fields::VIRTUAL_MEETING_OPTION,
                    values: &[virtual_option::MANUAL],
                },
            ]),
        ));

    let agenda = StepDefinition::new("agenda", "Agenda")
        .field(FieldSpec::required(fields::AGENDA_ITEMS, "Agenda items", FieldKind::Agenda));

    let participants = StepDefinition::new("participants", "Participants")
        .field(FieldSpec::required(fields::PARTICIPANTS, "Participants", FieldKind::List))
        .field(FieldSpec::optional(fields::INVITEES, "Invitees", FieldKind::List));

    let office_bearers = StepDefinition::new("office-bearers", "Office Bearers")
        .field(FieldSpec::required(fields::CHAIRPERSON, "Chairperson", FieldKind::Text))
        .field(FieldSpec::required(fields::SECRETARY, "Secretary", FieldKind::Text))
        .field(FieldSpec::when(
            fields::SCRUTINIZER,
            "Scrutinizer",
            FieldKind::Text,
            Requirement::AgendaNeedsVote,
        ))
        .reads(fields::AGENDA_ITEMS)
        .reads(fields::PARTICIPANTS);

    let notice = StepDefinition::new("notice", "Notice")
        .field(FieldSpec::required(fields::NOTICE_NUMBER, "Notice number", FieldKind::Text))
        .field(FieldSpec::required(fields::NOTICE_DATE, "Notice date", FieldKind::Date))
        .field(FieldSpec::optional(fields::PUBLISH_IN_NEWSPAPER, "Publish in newspaper", FieldKind::Flag))
        .field(FieldSpec::when(
            fields::NEWSPAPER_NAME,
            "Newspaper",
            FieldKind::Text,
            Requirement::FlagSet { field: fields::PUBLISH_IN_NEWSPAPER },
        ))
        .field(FieldSpec::optional(fields::USE_AI_GENERATION, "Generate with AI", FieldKind::Flag))
        .reads(fields::AGENDA_ITEMS)
        .reads(fields::ENTITY_NAME);

    let review = StepDefinition::new("review", "Review & Submit")
        .reads(fields::AGENDA_ITEMS)
        .reads(fields::PUBLISH_IN_NEWSPAPER);

    WorkflowDefinition {
        kind: WorkflowKind::Meeting,
        steps: vec![details, agenda, participants, office_bearers, notice, review],
        reminders: vec![ReminderBinding {
            trigger_field: fields::PUBLISH_IN_NEWSPAPER,
            reminder: ReminderSpec::new(
                "newspaper-publication",
                "Publish the notice",
                "The meeting notice must also be published in the newspaper. Have you published it?",
            ),
        }],
    }
}

pub fn compliance_checklist_workflow() -> WorkflowDefinition {
    let details = StepDefinition::new("details", "Checklist Details")
        .field(FieldSpec::required(fields::ENTITY_NAME, "Entity", FieldKind::Choice))
        .field(FieldSpec::required(fields::FRAMEWORK, "Regulation", FieldKind::Choice))
        .field(FieldSpec::required(fields::REPORTING_PERIOD, "Reporting period", FieldKind::Text))
        .field(FieldSpec::required(fields::DUE_DATE, "Due date", FieldKind::Date));

    let obligations = StepDefinition::new("obligations", "Obligations")
        .field(FieldSpec::required(fields::CHECKLIST_ITEMS, "Checklist items", FieldKind::List));

    let assignments = StepDefinition::new("assignments", "Assignments")
        .field(FieldSpec::required(fields::OWNER, "Owner", FieldKind::Text))
        .field(FieldSpec::optional(fields::REQUIRES_REVIEW, "Requires review", FieldKind::Flag))
        .field(FieldSpec::when(
            fields::REVIEWER,
            "Reviewer",
            FieldKind::Text,
            Requirement::FlagSet { field: fields::REQUIRES_REVIEW },
        ))
        .reads(fields::CHECKLIST_ITEMS);

    let evidence = StepDefinition::new("evidence", "Evidence")
        .field(FieldSpec::required(fields::EVIDENCE_MODE, "Evidence type", FieldKind::Choice))
        .field(FieldSpec::when(
            fields::EVIDENCE_LINK,
            "Evidence link",
            FieldKind::Text,
            Requirement::FieldIn { field: fields::EVIDENCE_MODE, values: &["link"] },
        ))
        .field(FieldSpec::optional(fields::EVIDENCE_NOTES, "Notes", FieldKind::Text))
        .field(FieldSpec::optional(fields::FILE_WITH_REGULATOR, "File with regulator", FieldKind::Flag));

    let review = StepDefinition::new("review", "Review & Submit").reads(fields::CHECKLIST_ITEMS);

    WorkflowDefinition {
        kind: WorkflowKind::ComplianceChecklist,
        steps: vec![details, obligations, assignments, evidence, review],
        reminders: vec![ReminderBinding {
            trigger_field: fields::FILE_WITH_REGULATOR,
            reminder: ReminderSpec::new(
                "regulator-filing",
                "File with the regulator",
                "This checklist requires an offline filing with the regulator. Have you filed it?",
            ),
        }],
    }
}
