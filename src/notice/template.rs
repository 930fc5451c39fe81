// Template tier of the notice: everything derived from the draft alone

use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::LazyLock;

use super::model::{ExplanatoryNote, NoticeAgendaItem, NoticeHeader, NoticeModel};
use crate::draft::fields::{self, nature, virtual_option};
use crate::draft::DraftRecord;

pub const DEFAULT_BODY_TEMPLATE: &str = "NOTICE is hereby given that the {{meetingType}} of \
{{entityName}} will be held on {{date}} at {{time}} {{location}} to transact the following business:";

const E_VOTING_LINE: &str =
    "Members may cast their votes electronically on the resolutions set out in this notice.";

const GENERATED_LINK_PLACEHOLDER: &str = "A meeting link will be generated and shared with participants";

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([ \t]*)\{\{\s*([A-Za-z][A-Za-z0-9_]*)\s*\}\}").expect("placeholder pattern is valid")
});

/// Replace `{{name}}` placeholders; unknown names render as empty
///
/// An empty substitution also swallows the whitespace before it, so a
/// missing value leaves no gap. Substituted text is kept verbatim.
pub fn fill_placeholders(template: &str, values: &HashMap<&str, String>) -> String {
    let filled = PLACEHOLDER.replace_all(template, |caps: &Captures| {
        match values.get(&caps[2]).filter(|value| !value.is_empty()) {
            Some(value) => format!("{}{}", &caps[1], value),
            None => String::new(),
        }
    });
    filled.trim().to_string()
}

pub fn meeting_type_label(raw: &str) -> String {
    match raw {
        "board" => "Board Meeting".to_string(),
        "agm" => "Annual General Meeting".to_string(),
        "egm" => "Extraordinary General Meeting".to_string(),
        "committee" => "Committee Meeting".to_string(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeTemplate {
    body: String,
}

impl Default for NoticeTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_BODY_TEMPLATE)
    }
}

impl NoticeTemplate {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Derive the notice from the draft
    ///
    /// Pure: the same draft always yields an equal notice.
    pub fn render(&self, draft: &DraftRecord, e_voting: bool) -> NoticeModel {
        let header = header_from(draft);
        let values = placeholder_values(draft, &header);

        let mut body = fill_placeholders(&self.body, &values);
        let agenda_items = draft.agenda(fields::AGENDA_ITEMS);
        if e_voting && agenda_items.iter().any(|item| item.requires_vote) {
            body.push_str("\n\n");
            body.push_str(E_VOTING_LINE);
        }

        let agenda = agenda_items
            .iter()
            .map(|item| NoticeAgendaItem {
                title: item.title.clone(),
                sub_items: item.sub_items.clone(),
                duration_minutes: item.duration_minutes,
                presenter: item.presenter.clone(),
            })
            .collect();

        let notes = agenda_items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| {
                item.note
                    .as_ref()
                    .filter(|note| !note.trim().is_empty())
                    .map(|note| ExplanatoryNote {
                        item: index + 1,
                        text: note.clone(),
                    })
            })
            .collect();

        NoticeModel {
            header,
            body,
            agenda,
            notes,
        }
    }
}

fn header_from(draft: &DraftRecord) -> NoticeHeader {
    let meeting_nature = draft.non_blank_text(fields::MEETING_NATURE);
    let in_person = matches!(meeting_nature, None | Some(nature::PHYSICAL) | Some(nature::HYBRID));
    let online = matches!(meeting_nature, Some(nature::VIRTUAL) | Some(nature::HYBRID));

    // Stale venue/link values stay in the draft but are not shown
    let venue = if in_person {
        draft.non_blank_text(fields::VENUE).map(str::to_string)
    } else {
        None
    };

    let meeting_link = if online {
        match draft.non_blank_text(fields::MEETING_LINK) {
            Some(link) => Some(link.to_string()),
            None if draft.text(fields::VIRTUAL_MEETING_OPTION) == Some(virtual_option::GENERATE) => {
                Some(GENERATED_LINK_PLACEHOLDER.to_string())
            }
            None => None,
        }
    } else {
        None
    };

    let date = match draft.date(fields::MEETING_DATE) {
        Some(date) => date.format("%-d %B %Y").to_string(),
        None => draft.non_blank_text(fields::MEETING_DATE).unwrap_or_default().to_string(),
    };

    let time = match draft.time(fields::MEETING_TIME) {
        Some(time) => time.format("%H:%M").to_string(),
        None => draft.non_blank_text(fields::MEETING_TIME).unwrap_or_default().to_string(),
    };

    NoticeHeader {
        entity_name: draft.non_blank_text(fields::ENTITY_NAME).unwrap_or_default().to_string(),
        notice_number: draft.non_blank_text(fields::NOTICE_NUMBER).unwrap_or_default().to_string(),
        meeting_type: draft
            .non_blank_text(fields::MEETING_TYPE)
            .map(meeting_type_label)
            .unwrap_or_else(|| "meeting".to_string()),
        date,
        time,
        venue,
        meeting_link,
    }
}

fn placeholder_values<'a>(draft: &DraftRecord, header: &NoticeHeader) -> HashMap<&'a str, String> {
    let location = match (draft.non_blank_text(fields::MEETING_NATURE), &header.venue) {
        (Some(nature::VIRTUAL), _) => "through video conferencing".to_string(),
        (Some(nature::HYBRID), Some(venue)) => format!("at {venue} and through video conferencing"),
        (Some(nature::HYBRID), None) => "through video conferencing".to_string(),
        (_, Some(venue)) => format!("at {venue}"),
        (_, None) => String::new(),
    };

    let notice_date = match draft.date(fields::NOTICE_DATE) {
        Some(date) => date.format("%-d %B %Y").to_string(),
        None => String::new(),
    };

    HashMap::from([
        ("entityName", header.entity_name.clone()),
        ("meetingType", header.meeting_type.clone()),
        ("noticeNumber", header.notice_number.clone()),
        ("date", header.date.clone()),
        ("time", header.time.clone()),
        ("venue", header.venue.clone().unwrap_or_default()),
        ("meetingLink", header.meeting_link.clone().unwrap_or_default()),
        ("location", location),
        ("noticeDate", notice_date),
    ])
}
