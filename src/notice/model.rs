use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoticeHeader {
    pub entity_name: String,
    pub notice_number: String,
    pub meeting_type: String,
    pub date: String,
    pub time: String,
    pub venue: Option<String>,
    pub meeting_link: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoticeAgendaItem {
    pub title: String,
    #[serde(default)]
    pub sub_items: Vec<String>,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub presenter: Option<String>,
}

/// Note attached to an agenda item by its 1-based position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplanatoryNote {
    pub item: usize,
    pub text: String,
}

/// The displayable meeting notice
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoticeModel {
    pub header: NoticeHeader,
    pub body: String,
    pub agenda: Vec<NoticeAgendaItem>,
    pub notes: Vec<ExplanatoryNote>,
}

/// Fields a content provider may supply; absent fields keep the template value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialNoticeFields {
    pub entity_name: Option<String>,
    pub notice_number: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub venue: Option<String>,
    pub meeting_link: Option<String>,
    pub body: Option<String>,
    pub agenda: Option<Vec<NoticeAgendaItem>>,
    pub notes: Option<Vec<ExplanatoryNote>>,
}

impl PartialNoticeFields {
    pub fn is_empty(&self) -> bool {
        *self == PartialNoticeFields::default()
    }

    pub fn apply_to(&self, notice: &mut NoticeModel) {
        let header = &mut notice.header;
        if let Some(value) = &self.entity_name {
            header.entity_name = value.clone();
        }
        if let Some(value) = &self.notice_number {
            header.notice_number = value.clone();
        }
        if let Some(value) = &self.date {
            header.date = value.clone();
        }
        if let Some(value) = &self.time {
            header.time = value.clone();
        }
        if let Some(value) = &self.venue {
            header.venue = Some(value.clone());
        }
        if let Some(value) = &self.meeting_link {
            header.meeting_link = Some(value.clone());
        }
        if let Some(value) = &self.body {
            notice.body = value.clone();
        }
        if let Some(agenda) = &self.agenda {
            notice.agenda = agenda.clone();
        }
        if let Some(notes) = &self.notes {
            notice.notes = notes.clone();
        }
    }
}

/// Addressable notice field for manual overrides
///
/// Paths: `entityName`, `noticeNumber`, `date`, `time`, `venue`,
/// `meetingLink`, `body`, `agenda.<n>.title`, `agenda.<n>.presenter`,
/// `notes.<n>`; positions are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NoticeField {
    EntityName,
    NoticeNumber,
    Date,
    Time,
    Venue,
    MeetingLink,
    Body,
    AgendaTitle(usize),
    AgendaPresenter(usize),
    Note(usize),
}

impl NoticeField {
    pub fn apply(&self, notice: &mut NoticeModel, value: &str) {
        let value = value.to_string();
        match self {
            NoticeField::EntityName => notice.header.entity_name = value,
            NoticeField::NoticeNumber => notice.header.notice_number = value,
            NoticeField::Date => notice.header.date = value,
            NoticeField::Time => notice.header.time = value,
            NoticeField::Venue => notice.header.venue = Some(value),
            NoticeField::MeetingLink => notice.header.meeting_link = Some(value),
            NoticeField::Body => notice.body = value,
            NoticeField::AgendaTitle(position) => {
                if let Some(item) = position.checked_sub(1).and_then(|i| notice.agenda.get_mut(i)) {
                    item.title = value;
                }
            }
            NoticeField::AgendaPresenter(position) => {
                if let Some(item) = position.checked_sub(1).and_then(|i| notice.agenda.get_mut(i)) {
                    item.presenter = Some(value);
                }
            }
            NoticeField::Note(position) => {
                let existing = notice.notes.iter().position(|note| note.item == *position);
                match existing {
                    Some(index) => notice.notes[index].text = value,
                    None if (1..=notice.agenda.len()).contains(position) => {
                        notice.notes.push(ExplanatoryNote { item: *position, text: value });
                        notice.notes.sort_by_key(|note| note.item);
                    }
                    None => {}
                }
            }
        }
    }
}

impl FromStr for NoticeField {
    type Err = ValidationError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::UnknownNoticeField(path.to_string());
        let position = |raw: &str| raw.parse::<usize>().ok().filter(|n| *n >= 1);

        let field = match path.split('.').collect::<Vec<_>>().as_slice() {
            ["entityName"] => NoticeField::EntityName,
            ["noticeNumber"] => NoticeField::NoticeNumber,
            ["date"] => NoticeField::Date,
            ["time"] => NoticeField::Time,
            ["venue"] => NoticeField::Venue,
            ["meetingLink"] => NoticeField::MeetingLink,
            ["body"] => NoticeField::Body,
            ["agenda", n, "title"] => NoticeField::AgendaTitle(position(*n).ok_or_else(invalid)?),
            ["agenda", n, "presenter"] => NoticeField::AgendaPresenter(position(*n).ok_or_else(invalid)?),
            ["notes", n] => NoticeField::Note(position(*n).ok_or_else(invalid)?),
            _ => return Err(invalid()),
        };
        Ok(field)
    }
}

impl fmt::Display for NoticeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoticeField::EntityName => write!(f, "entityName"),
            NoticeField::NoticeNumber => write!(f, "noticeNumber"),
            NoticeField::Date => write!(f, "date"),
            NoticeField::Time => write!(f, "time"),
            NoticeField::Venue => write!(f, "venue"),
            NoticeField::MeetingLink => write!(f, "meetingLink"),
            NoticeField::Body => write!(f, "body"),
            NoticeField::AgendaTitle(n) => write!(f, "agenda.{n}.title"),
            NoticeField::AgendaPresenter(n) => write!(f, "agenda.{n}.presenter"),
            NoticeField::Note(n) => write!(f, "notes.{n}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_field_paths() {
        assert_eq!("venue".parse::<NoticeField>(), Ok(NoticeField::Venue));
        assert_eq!("agenda.2.title".parse::<NoticeField>(), Ok(NoticeField::AgendaTitle(2)));
        assert_eq!("notes.1".parse::<NoticeField>(), Ok(NoticeField::Note(1)));
        assert!("agenda.0.title".parse::<NoticeField>().is_err());
        assert!("agenda.x.title".parse::<NoticeField>().is_err());
        assert!("footer".parse::<NoticeField>().is_err());
    }

    #[test]
    fn test_display_matches_parse() {
        for field in [NoticeField::Body, NoticeField::AgendaPresenter(3), NoticeField::Note(2)] {
            assert_eq!(field.to_string().parse::<NoticeField>(), Ok(field));
        }
    }

    #[test]
    fn test_agenda_override_out_of_range_is_ignored() {
        let mut notice = NoticeModel {
            agenda: vec![NoticeAgendaItem { title: "Opening".into(), ..Default::default() }],
            ..Default::default()
        };
        NoticeField::AgendaTitle(3).apply(&mut notice, "Ghost item");
        NoticeField::AgendaTitle(1).apply(&mut notice, "Welcome");
        assert_eq!(notice.agenda.len(), 1);
        assert_eq!(notice.agenda[0].title, "Welcome");
    }

    #[test]
    fn test_partial_fields_only_touch_present_values() {
        let mut notice = NoticeModel::default();
        notice.header.venue = Some("Board Room".into());
        notice.body = "Template body".into();

        let partial = PartialNoticeFields {
            body: Some("Generated body".into()),
            ..Default::default()
        };
        partial.apply_to(&mut notice);

        assert_eq!(notice.body, "Generated body");
        assert_eq!(notice.header.venue.as_deref(), Some("Board Room"));
    }
}
