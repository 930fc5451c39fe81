// Step definitions and conditional requirement rules
//
// Requirement rules are plain data evaluated against the draft. Nothing is
// cached, so re-evaluating on every keystroke always reflects the live draft.

use serde::Serialize;

use crate::draft::{fields, DraftRecord, FieldKind};

/// Whether a field is mandatory, as a function of the current draft
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    Always,
    Optional,
    /// Required when `field` holds one of `values`
    FieldIn {
        field: &'static str,
        values: &'static [&'static str],
    },
    /// Required when the flag `field` is set
    FlagSet { field: &'static str },
    /// Required when any agenda item is marked for a vote
    AgendaNeedsVote,
    All(Vec<Requirement>),
}

impl Requirement {
    pub fn applies(&self, draft: &DraftRecord) -> bool {
        match self {
            Requirement::Always => true,
            Requirement::Optional => false,
            Requirement::FieldIn { field, values } => draft
                .text(field)
                .is_some_and(|current| values.iter().any(|value| *value == current)),
            Requirement::FlagSet { field } => draft.flag(field),
            Requirement::AgendaNeedsVote => draft
                .agenda(fields::AGENDA_ITEMS)
                .iter()
                .any(|item| item.requires_vote),
            Requirement::All(rules) => rules.iter().all(|rule| rule.applies(draft)),
        }
    }

    /// Fields this rule reads
    pub fn inputs(&self) -> Vec<&'static str> {
        match self {
            Requirement::Always | Requirement::Optional => Vec::new(),
            Requirement::FieldIn { field, .. } | Requirement::FlagSet { field } => vec![*field],
            Requirement::AgendaNeedsVote => vec![fields::AGENDA_ITEMS],
            Requirement::All(rules) => rules.iter().flat_map(Requirement::inputs).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub requirement: Requirement,
}

impl FieldSpec {
    pub fn required(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self { name, label, kind, requirement: Requirement::Always }
    }

    pub fn optional(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self { name, label, kind, requirement: Requirement::Optional }
    }

    pub fn when(name: &'static str, label: &'static str, kind: FieldKind, requirement: Requirement) -> Self {
        Self { name, label, kind, requirement }
    }
}

/// One ordered step of a workflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepDefinition {
    pub id: &'static str,
    pub label: &'static str,
    pub fields: Vec<FieldSpec>,
    /// Fields produced by other steps that this step depends on
    pub reads: Vec<&'static str>,
}

impl StepDefinition {
    pub fn new(id: &'static str, label: &'static str) -> Self {
        Self { id, label, fields: Vec::new(), reads: Vec::new() }
    }

    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    pub fn reads(mut self, field: &'static str) -> Self {
        self.reads.push(field);
        self
    }

    pub fn field_spec(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|spec| spec.name == name)
    }

    pub fn owns(&self, name: &str) -> bool {
        self.field_spec(name).is_some()
    }

    /// Whether this step's required set can change when `name` changes
    pub fn depends_on(&self, name: &str) -> bool {
        self.reads.iter().any(|field| *field == name)
            || self
                .fields
                .iter()
                .any(|spec| spec.requirement.inputs().iter().any(|field| *field == name))
    }

    pub fn is_field_required(&self, name: &str, draft: &DraftRecord) -> bool {
        self.field_spec(name)
            .is_some_and(|spec| spec.requirement.applies(draft))
    }

    pub fn required_fields(&self, draft: &DraftRecord) -> RequiredFieldSet {
        let fields = self
            .fields
            .iter()
            .filter(|spec| spec.requirement.applies(draft))
            .map(|spec| RequiredField {
                name: spec.name,
                label: spec.label,
                satisfied: draft.is_provided(spec.name),
            })
            .collect();

        RequiredFieldSet { step: self.id, fields }
    }
}

/// A required field and whether the draft currently satisfies it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequiredField {
    pub name: &'static str,
    pub label: &'static str,
    pub satisfied: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequiredFieldSet {
    pub step: &'static str,
    pub fields: Vec<RequiredField>,
}

impl RequiredFieldSet {
    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|field| field.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&RequiredField> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|field| field.name).collect()
    }

    pub fn unsatisfied(&self) -> impl Iterator<Item = &RequiredField> {
        self.fields.iter().filter(|field| !field.satisfied)
    }

    pub fn is_complete(&self) -> bool {
        self.unsatisfied().next().is_none()
    }
}
