use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::model::{NoticeField, NoticeModel, PartialNoticeFields};
use super::provider::{ContentProvider, NoticeContext};
use super::template::NoticeTemplate;
use crate::draft::DraftRecord;
use crate::entitlements::{EntitlementCheck, Feature};
use crate::error::{ContentProviderError, ValidationError};

/// Result of `NoticeComposer::regenerate`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// Template content only; no provider was requested
    Template,
    /// Provider fields are overlaid on the template
    Generated,
    /// Provider was requested but failed; template content is shown
    FellBack(ContentProviderError),
    /// Provider was requested but the feature is not enabled
    NotEntitled,
}

/// Composes the displayed notice from three tiers
///
/// Manual overrides win over provider fields, which win over the template
/// rendered from the live draft. The draft itself is never written.
pub struct NoticeComposer {
    template: NoticeTemplate,
    provider: Option<Arc<dyn ContentProvider>>,
    entitlements: Arc<dyn EntitlementCheck>,
    generated: Option<PartialNoticeFields>,
    overrides: BTreeMap<NoticeField, String>,
}

impl NoticeComposer {
    pub fn new(
        template: NoticeTemplate,
        provider: Option<Arc<dyn ContentProvider>>,
        entitlements: Arc<dyn EntitlementCheck>,
    ) -> Self {
        Self {
            template,
            provider,
            entitlements,
            generated: None,
            overrides: BTreeMap::new(),
        }
    }

    /// The notice as currently displayed, after precedence
    pub fn displayed(&self, draft: &DraftRecord) -> NoticeModel {
        let e_voting = self.entitlements.is_enabled(Feature::EVoting);
        let mut notice = self.template.render(draft, e_voting);

        if let Some(generated) = &self.generated {
            generated.apply_to(&mut notice);
        }
        for (field, value) in &self.overrides {
            field.apply(&mut notice, value);
        }
        notice
    }

    /// Discard overrides and rebuild from the draft, optionally consulting the provider
    pub async fn regenerate(&mut self, draft: &DraftRecord, use_provider: bool) -> GenerationOutcome {
        if !self.overrides.is_empty() {
            debug!(discarded = self.overrides.len(), "Discarding notice overrides");
        }
        self.overrides.clear();
        self.generated = None;

        if !use_provider {
            return GenerationOutcome::Template;
        }

        if !self.entitlements.is_enabled(Feature::AiNoticeGeneration) {
            info!("Notice generation requested without entitlement, using template");
            return GenerationOutcome::NotEntitled;
        }

        let Some(provider) = &self.provider else {
            let error = ContentProviderError::Unavailable {
                reason: "no content provider configured".to_string(),
            };
            warn!(error = %error, "Falling back to template notice");
            return GenerationOutcome::FellBack(error);
        };

        let context = NoticeContext::from_draft(draft);
        match provider.generate(&context).await {
            Ok(fields) => {
                info!(
                    entity = %context.entity_name,
                    has_body = fields.body.is_some(),
                    "Notice content generated"
                );
                self.generated = Some(fields);
                GenerationOutcome::Generated
            }
            Err(error) => {
                warn!(error = %error, "Content provider failed, falling back to template notice");
                GenerationOutcome::FellBack(error)
            }
        }
    }

    /// Write a manual override; the draft is untouched
    pub fn set_field_override(&mut self, path: &str, value: impl Into<String>) -> Result<NoticeField, ValidationError> {
        let field: NoticeField = path.parse()?;
        let value = value.into();
        debug!(field = %field, "Notice field overridden");
        self.overrides.insert(field, value);
        Ok(field)
    }

    pub fn reset_override(&mut self, field: NoticeField) -> bool {
        self.overrides.remove(&field).is_some()
    }

    pub fn overrides(&self) -> &BTreeMap<NoticeField, String> {
        &self.overrides
    }

    pub fn has_generated_content(&self) -> bool {
        self.generated.is_some()
    }
}

impl std::fmt::Debug for NoticeComposer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoticeComposer")
            .field("template", &self.template)
            .field("has_provider", &self.provider.is_some())
            .field("generated", &self.generated)
            .field("overrides", &self.overrides)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::fields;
    use crate::entitlements::StaticEntitlements;
    use crate::notice::provider::MockContentProvider;

    fn draft() -> DraftRecord {
        let mut draft = DraftRecord::new();
        draft.set(fields::ENTITY_NAME, "Acme Holdings Ltd".into());
        draft.set(fields::MEETING_NATURE, "physical".into());
        draft.set(fields::VENUE, "Board Room".into());
        draft
    }

    fn composer(provider: Option<Arc<dyn ContentProvider>>, entitlements: StaticEntitlements) -> NoticeComposer {
        NoticeComposer::new(NoticeTemplate::default(), provider, Arc::new(entitlements))
    }

    #[tokio::test]
    async fn test_regenerate_discards_override() {
        let mut composer = composer(None, StaticEntitlements::none());
        let draft = draft();

        composer.set_field_override("venue", "X").unwrap();
        assert_eq!(composer.displayed(&draft).header.venue.as_deref(), Some("X"));

        let outcome = composer.regenerate(&draft, false).await;
        assert_eq!(outcome, GenerationOutcome::Template);
        assert_eq!(composer.displayed(&draft).header.venue.as_deref(), Some("Board Room"));
        assert!(composer.overrides().is_empty());
    }

    #[tokio::test]
    async fn test_override_wins_over_generated() {
        let mut provider = MockContentProvider::new();
        provider.expect_generate().times(1).returning(|_| {
            Ok(PartialNoticeFields {
                body: Some("Generated body".into()),
                venue: Some("Generated venue".into()),
                ..Default::default()
            })
        });

        let mut composer = composer(Some(Arc::new(provider)), StaticEntitlements::all());
        let draft = draft();

        assert_eq!(composer.regenerate(&draft, true).await, GenerationOutcome::Generated);
        composer.set_field_override("venue", "Override venue").unwrap();

        let notice = composer.displayed(&draft);
        assert_eq!(notice.body, "Generated body");
        assert_eq!(notice.header.venue.as_deref(), Some("Override venue"));
        assert_eq!(notice.header.entity_name, "Acme Holdings Ltd");
    }

    #[tokio::test]
    async fn test_provider_failure_falls_back_to_template() {
        let mut provider = MockContentProvider::new();
        provider.expect_generate().returning(|_| {
            Err(ContentProviderError::Unavailable { reason: "timeout".into() })
        });

        let mut composer = composer(Some(Arc::new(provider)), StaticEntitlements::all());
        let draft = draft();
        let template_only = NoticeTemplate::default().render(&draft, true);

        let outcome = composer.regenerate(&draft, true).await;
        assert!(matches!(outcome, GenerationOutcome::FellBack(ContentProviderError::Unavailable { .. })));
        assert_eq!(composer.displayed(&draft), template_only);
    }

    #[tokio::test]
    async fn test_provider_not_called_without_entitlement() {
        let mut provider = MockContentProvider::new();
        provider.expect_generate().times(0);

        let mut composer = composer(Some(Arc::new(provider)), StaticEntitlements::none());
        assert_eq!(composer.regenerate(&draft(), true).await, GenerationOutcome::NotEntitled);
        assert!(!composer.has_generated_content());
    }

    #[test]
    fn test_override_rejects_unknown_path() {
        let mut composer = composer(None, StaticEntitlements::none());
        assert_eq!(
            composer.set_field_override("signature", "x"),
            Err(ValidationError::UnknownNoticeField("signature".into()))
        );
    }

    #[test]
    fn test_displayed_tracks_live_draft() {
        let composer = composer(None, StaticEntitlements::none());
        let mut draft = draft();
        assert_eq!(composer.displayed(&draft).header.venue.as_deref(), Some("Board Room"));

        draft.set(fields::VENUE, "Annex Hall".into());
        assert_eq!(composer.displayed(&draft).header.venue.as_deref(), Some("Annex Hall"));
    }
}
