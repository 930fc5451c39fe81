// Draft record - the accumulated field map of one workflow instance
//
// Fields are only ever inserted or overwritten. There is no remove
// operation, so revisiting a step never loses data.

pub mod fields;
pub mod value;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use value::{AgendaItem, FieldKind, FieldValue};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DraftRecord {
    fields: BTreeMap<String, FieldValue>,
}

impl DraftRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed a record with defaults
    pub fn with_defaults<I, K>(defaults: I) -> Self
    where
        I: IntoIterator<Item = (K, FieldValue)>,
        K: Into<String>,
    {
        let mut record = Self::new();
        for (name, value) in defaults {
            record.set(name, value);
        }
        record
    }

    /// Insert or overwrite one field, returning the previous value
    pub fn set(&mut self, name: impl Into<String>, value: FieldValue) -> Option<FieldValue> {
        self.fields.insert(name.into(), value)
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Whether the field exists and holds a non-empty value
    pub fn is_provided(&self, name: &str) -> bool {
        self.get(name).is_some_and(FieldValue::is_provided)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_text)
    }

    /// Text value trimmed, `None` when blank or absent
    pub fn non_blank_text(&self, name: &str) -> Option<&str> {
        self.text(name).map(str::trim).filter(|text| !text.is_empty())
    }

    pub fn flag(&self, name: &str) -> bool {
        self.get(name).and_then(FieldValue::as_flag).unwrap_or(false)
    }

    pub fn list(&self, name: &str) -> &[String] {
        match self.get(name) {
            Some(FieldValue::List(items)) => items,
            _ => &[],
        }
    }

    pub fn agenda(&self, name: &str) -> &[AgendaItem] {
        match self.get(name) {
            Some(FieldValue::Agenda(items)) => items,
            _ => &[],
        }
    }

    /// ISO `YYYY-MM-DD` date
    pub fn date(&self, name: &str) -> Option<NaiveDate> {
        self.non_blank_text(name)
            .and_then(|text| NaiveDate::parse_from_str(text, "%Y-%m-%d").ok())
    }

    /// `HH:MM` (or `HH:MM:SS`) time
    pub fn time(&self, name: &str) -> Option<NaiveTime> {
        let text = self.non_blank_text(name)?;
        NaiveTime::parse_from_str(text, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M:%S"))
            .ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_overwrites_without_removing_others() {
        let mut draft = DraftRecord::new();
        draft.set(fields::MEETING_NATURE, "physical".into());
        draft.set(fields::VENUE, "Board Room".into());

        let previous = draft.set(fields::MEETING_NATURE, "virtual".into());

        assert_eq!(previous, Some(FieldValue::from("physical")));
        assert_eq!(draft.text(fields::MEETING_NATURE), Some("virtual"));
        assert_eq!(draft.text(fields::VENUE), Some("Board Room"));
        assert_eq!(draft.len(), 2);
    }

    #[test]
    fn test_typed_accessors() {
        let draft = DraftRecord::with_defaults([
            (fields::MEETING_DATE, FieldValue::from("2026-10-20")),
            (fields::MEETING_TIME, FieldValue::from("10:30")),
            (fields::PUBLISH_IN_NEWSPAPER, FieldValue::Flag(true)),
        ]);

        assert_eq!(draft.date(fields::MEETING_DATE), NaiveDate::from_ymd_opt(2026, 10, 20));
        assert_eq!(draft.time(fields::MEETING_TIME), NaiveTime::from_hms_opt(10, 30, 0));
        assert!(draft.flag(fields::PUBLISH_IN_NEWSPAPER));
        assert!(!draft.flag(fields::USE_AI_GENERATION));
        assert!(draft.agenda(fields::AGENDA_ITEMS).is_empty());
    }

    #[test]
    fn test_unparseable_date_reads_as_absent() {
        let draft = DraftRecord::with_defaults([(fields::MEETING_DATE, FieldValue::from("next week"))]);
        assert_eq!(draft.date(fields::MEETING_DATE), None);
        assert!(draft.is_provided(fields::MEETING_DATE));
    }
}
