use serde::{Deserialize, Serialize};

/// One agenda entry as captured by the Agenda step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgendaItem {
    pub title: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_items: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presenter: Option<String>,
    /// Explanatory note printed after the agenda
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default)]
    pub requires_vote: bool,
}

impl AgendaItem {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            sub_items: Vec::new(),
            duration_minutes: None,
            presenter: None,
            note: None,
            requires_vote: false,
        }
    }

    pub fn with_sub_items<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sub_items = items.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_presenter(mut self, presenter: impl Into<String>) -> Self {
        self.presenter = Some(presenter.into());
        self
    }

    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.duration_minutes = Some(minutes);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn voting(mut self) -> Self {
        self.requires_vote = true;
        self
    }
}

/// A value stored in the draft record
///
/// Untagged so that hand-written TOML/JSON drafts map onto it directly.
/// Variant order matters for deserialization: a string array is a `List`,
/// an array of tables is an `Agenda`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Integer(i64),
    Text(String),
    List(Vec<String>),
    Agenda(Vec<AgendaItem>),
}

/// Expected shape of a catalogued field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Choice,
    Date,
    Time,
    Flag,
    Integer,
    List,
    Agenda,
}

impl FieldValue {
    /// Whether the value counts as "provided" for a required field
    pub fn is_provided(&self) -> bool {
        match self {
            FieldValue::Text(text) => !text.trim().is_empty(),
            FieldValue::Flag(_) | FieldValue::Integer(_) => true,
            FieldValue::List(items) => items.iter().any(|item| !item.trim().is_empty()),
            FieldValue::Agenda(items) => !items.is_empty(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            FieldValue::Flag(flag) => Some(*flag),
            _ => None,
        }
    }

    /// Whether this value has the shape `kind` expects
    pub fn matches_kind(&self, kind: FieldKind) -> bool {
        match (self, kind) {
            (FieldValue::Text(_), FieldKind::Text | FieldKind::Choice | FieldKind::Date | FieldKind::Time) => true,
            (FieldValue::Flag(_), FieldKind::Flag) => true,
            (FieldValue::Integer(_), FieldKind::Integer) => true,
            (FieldValue::List(_), FieldKind::List) => true,
            // An empty array deserializes as a list
            (FieldValue::List(items), FieldKind::Agenda) => items.is_empty(),
            (FieldValue::Agenda(_), FieldKind::Agenda) => true,
            _ => false,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Flag(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        FieldValue::List(value)
    }
}

impl From<Vec<AgendaItem>> for FieldValue {
    fn from(value: Vec<AgendaItem>) -> Self {
        FieldValue::Agenda(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_text_is_not_provided() {
        assert!(!FieldValue::from("").is_provided());
        assert!(!FieldValue::from("   ").is_provided());
        assert!(FieldValue::from("Board Room").is_provided());
    }

    #[test]
    fn test_flags_and_integers_always_provided() {
        assert!(FieldValue::Flag(false).is_provided());
        assert!(FieldValue::Integer(0).is_provided());
    }

    #[test]
    fn test_untagged_json_shapes() {
        let list: FieldValue = serde_json::from_str(r#"["Alice", "Bob"]"#).unwrap();
        assert_eq!(list, FieldValue::List(vec!["Alice".into(), "Bob".into()]));

        let agenda: FieldValue =
            serde_json::from_str(r#"[{"title": "Adopt accounts", "requiresVote": true}]"#).unwrap();
        match agenda {
            FieldValue::Agenda(items) => {
                assert_eq!(items.len(), 1);
                assert!(items[0].requires_vote);
                assert!(items[0].sub_items.is_empty());
            }
            other => panic!("expected agenda, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_list_matches_agenda_kind() {
        assert!(FieldValue::List(vec![]).matches_kind(FieldKind::Agenda));
        assert!(!FieldValue::List(vec!["x".into()]).matches_kind(FieldKind::Agenda));
        assert!(!FieldValue::Flag(true).matches_kind(FieldKind::Text));
    }
}
