use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[cfg(any(test, feature = "testing"))]
use mockall::automock;

use super::model::{ExplanatoryNote, PartialNoticeFields};
use super::template::meeting_type_label;
use crate::draft::{fields, AgendaItem, DraftRecord};
use crate::error::ContentProviderError;

/// What the provider is told about the meeting
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoticeContext {
    pub entity_name: String,
    pub meeting_type: String,
    pub meeting_date: Option<String>,
    pub meeting_time: Option<String>,
    pub agenda: Vec<AgendaItem>,
}

impl NoticeContext {
    pub fn from_draft(draft: &DraftRecord) -> Self {
        Self {
            entity_name: draft.non_blank_text(fields::ENTITY_NAME).unwrap_or_default().to_string(),
            meeting_type: draft
                .non_blank_text(fields::MEETING_TYPE)
                .map(meeting_type_label)
                .unwrap_or_else(|| "meeting".to_string()),
            meeting_date: draft.non_blank_text(fields::MEETING_DATE).map(str::to_string),
            meeting_time: draft.non_blank_text(fields::MEETING_TIME).map(str::to_string),
            agenda: draft.agenda(fields::AGENDA_ITEMS).to_vec(),
        }
    }
}

/// External notice generation; the response is overlaid as opaque data
#[cfg_attr(any(test, feature = "testing"), automock)]
#[async_trait]
pub trait ContentProvider: Send + Sync {
    async fn generate(&self, context: &NoticeContext) -> Result<PartialNoticeFields, ContentProviderError>;
}

/// Deterministic provider used when no external service is configured
#[derive(Debug, Clone, Default)]
pub struct CannedContentProvider;

#[async_trait]
impl ContentProvider for CannedContentProvider {
    async fn generate(&self, context: &NoticeContext) -> Result<PartialNoticeFields, ContentProviderError> {
        if context.entity_name.is_empty() {
            return Err(ContentProviderError::Malformed {
                reason: "entity name is required to generate a notice".to_string(),
            });
        }

        let when = match (&context.meeting_date, &context.meeting_time) {
            (Some(date), Some(time)) => format!(" on {date} at {time}"),
            (Some(date), None) => format!(" on {date}"),
            _ => String::new(),
        };
        let items = context.agenda.len();
        let body = format!(
            "The {} of {} is hereby convened{} to consider {} item{} of business set out below. \
             Members are requested to attend.",
            context.meeting_type,
            context.entity_name,
            when,
            items,
            if items == 1 { "" } else { "s" },
        );

        let notes = context
            .agenda
            .iter()
            .enumerate()
            .map(|(index, item)| ExplanatoryNote {
                item: index + 1,
                text: item
                    .note
                    .clone()
                    .unwrap_or_else(|| format!("The meeting will consider and, if thought fit, approve {}.", item.title)),
            })
            .collect();

        debug!(entity = %context.entity_name, agenda_items = items, "Generated canned notice content");

        Ok(PartialNoticeFields {
            body: Some(body),
            notes: Some(notes),
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::FieldValue;

    #[tokio::test]
    async fn test_canned_provider_uses_context() {
        let mut draft = DraftRecord::new();
        draft.set(fields::ENTITY_NAME, "Northwind Ventures Pvt Ltd".into());
        draft.set(fields::MEETING_TYPE, "agm".into());
        draft.set(fields::MEETING_DATE, "2026-11-02".into());
        draft.set(
            fields::AGENDA_ITEMS,
            FieldValue::Agenda(vec![AgendaItem::new("Appoint auditors")]),
        );

        let context = NoticeContext::from_draft(&draft);
        let generated = CannedContentProvider.generate(&context).await.unwrap();

        let body = generated.body.unwrap();
        assert!(body.starts_with("The Annual General Meeting of Northwind Ventures Pvt Ltd"));
        assert!(body.contains("1 item of business"));
        assert_eq!(generated.notes.unwrap()[0].item, 1);
        assert_eq!(generated.venue, None);
    }

    #[tokio::test]
    async fn test_canned_provider_rejects_empty_context() {
        let result = CannedContentProvider.generate(&NoticeContext::default()).await;
        assert!(matches!(result, Err(ContentProviderError::Malformed { .. })));
    }
}
