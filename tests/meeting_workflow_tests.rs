// End-to-end scenarios for the meeting workflow session

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use convene::draft::fields;
use convene::notice::{render_notice, GenerationOutcome};
use convene::workflow::{meeting_workflow, Collaborators, SessionConfig, SessionStatus, WorkflowSession};
use convene::{
    AgendaItem, CannedContentProvider, FieldValue, InMemoryDraftStore, NotificationLevel, NotificationSurface,
    PromptChoice, RecordStatus, ReminderSpec, SessionError, StaticEntitlements, ValidationError,
};

#[derive(Default)]
struct RecordingSurface {
    toasts: Mutex<Vec<(NotificationLevel, String)>>,
}

impl RecordingSurface {
    fn levels(&self) -> Vec<NotificationLevel> {
        self.toasts.lock().unwrap().iter().map(|(level, _)| *level).collect()
    }
}

#[async_trait]
impl NotificationSurface for RecordingSurface {
    fn notify(&self, level: NotificationLevel, message: &str) {
        self.toasts.lock().unwrap().push((level, message.to_string()));
    }

    async fn prompt(&self, _reminder: &ReminderSpec) -> PromptChoice {
        PromptChoice::RemindAgain
    }
}

struct Harness {
    store: Arc<InMemoryDraftStore>,
    surface: Arc<RecordingSurface>,
    session: WorkflowSession,
}

fn harness(store: InMemoryDraftStore, entitlements: StaticEntitlements) -> Harness {
    let store = Arc::new(store);
    let surface = Arc::new(RecordingSurface::default());
    let collaborators = Collaborators {
        store: store.clone(),
        surface: surface.clone(),
        entitlements: Arc::new(entitlements),
        content_provider: Some(Arc::new(CannedContentProvider)),
    };
    let session = WorkflowSession::new(meeting_workflow(), collaborators, SessionConfig::default());
    Harness { store, surface, session }
}

#[test]
fn test_venue_required_for_physical_meeting_until_virtual() {
    let mut h = harness(InMemoryDraftStore::new(), StaticEntitlements::none());
    let session = &mut h.session;

    session.update_field(fields::MEETING_NATURE, "physical".into()).unwrap();
    session.update_field(fields::VENUE, "".into()).unwrap();

    let required = session.required_fields_for_step(session.current_step().id).unwrap();
    let venue = required.get(fields::VENUE).expect("venue should be required");
    assert!(!venue.satisfied);
    assert!(!required.contains(fields::MEETING_LINK));

    session.update_field(fields::MEETING_NATURE, "virtual".into()).unwrap();
    session.update_field(fields::VIRTUAL_MEETING_OPTION, "generate".into()).unwrap();

    let required = session.required_fields_for_step("details").unwrap();
    assert!(!required.contains(fields::VENUE));
    assert!(!required.contains(fields::MEETING_LINK));

    session.update_field(fields::VIRTUAL_MEETING_OPTION, "manual".into()).unwrap();
    assert!(session.required_fields_for_step("details").unwrap().contains(fields::MEETING_LINK));

    // The stale venue value is retained
    assert_eq!(session.draft().text(fields::VENUE), Some(""));
}

#[test]
fn test_scrutinizer_follows_agenda_votes() {
    let mut h = harness(InMemoryDraftStore::new(), StaticEntitlements::none());
    let session = &mut h.session;

    session
        .update_field(fields::AGENDA_ITEMS, FieldValue::Agenda(vec![AgendaItem::new("Confirm minutes")]))
        .unwrap();
    assert!(!session.required_fields_for_step("office-bearers").unwrap().contains(fields::SCRUTINIZER));

    let affected = session
        .update_field(
            fields::AGENDA_ITEMS,
            FieldValue::Agenda(vec![AgendaItem::new("Confirm minutes"), AgendaItem::new("Adopt accounts").voting()]),
        )
        .unwrap();
    assert!(affected.contains(&"office-bearers"));
    assert!(session.required_fields_for_step("office-bearers").unwrap().contains(fields::SCRUTINIZER));
}

#[tokio::test(start_paused = true)]
async fn test_double_save_persists_one_record() {
    let h = harness(
        InMemoryDraftStore::new().with_latency(Duration::from_millis(500)),
        StaticEntitlements::none(),
    );
    let mut session = h.session;
    session.update_field(fields::ENTITY_NAME, "Acme Holdings Ltd".into()).unwrap();

    let (first, second) = tokio::join!(session.save_draft(), session.save_draft());

    assert!(first.is_ok());
    assert!(matches!(
        second,
        Err(SessionError::Validation(ValidationError::OperationInFlight))
    ));
    assert_eq!(h.store.create_calls(), 1);
    assert_eq!(h.store.len().await, 1);
    assert_eq!(session.status(), SessionStatus::Closed(RecordStatus::Draft));
}

#[tokio::test(start_paused = true)]
async fn test_session_reports_busy_while_saving() {
    let h = harness(
        InMemoryDraftStore::new().with_latency(Duration::from_secs(2)),
        StaticEntitlements::none(),
    );
    let session = h.session;

    let save = session.save_draft();
    tokio::pin!(save);

    tokio::select! {
        _ = &mut save => panic!("save should still be pending"),
        _ = tokio::time::sleep(Duration::from_millis(100)) => {}
    }
    assert!(session.is_busy());

    save.await.unwrap();
    assert!(!session.is_busy());
}

#[tokio::test]
async fn test_persistence_failure_keeps_draft_for_retry() {
    let store = InMemoryDraftStore::new();
    store.fail_next(1);
    let mut h = harness(store, StaticEntitlements::none());
    h.session.update_field(fields::ENTITY_NAME, "Acme Holdings Ltd".into()).unwrap();
    let before = h.session.draft().clone();

    let error = h.session.save_draft().await.unwrap_err();
    assert!(error.is_recoverable());
    assert_eq!(h.session.draft(), &before);
    assert_eq!(h.session.status(), SessionStatus::Open);

    h.session.save_draft().await.unwrap();
    assert_eq!(h.store.len().await, 1);
    assert_eq!(h.surface.levels(), vec![NotificationLevel::Error, NotificationLevel::Success]);
}

#[tokio::test]
async fn test_submit_only_from_review_step() {
    let mut h = harness(InMemoryDraftStore::new(), StaticEntitlements::none());
    h.session.update_field(fields::ENTITY_NAME, "Acme Holdings Ltd".into()).unwrap();
    h.session.go_to("notice").unwrap();

    let result = h.session.submit().await;
    assert!(matches!(
        result,
        Err(SessionError::Validation(ValidationError::SubmitBeforeTerminalStep { .. }))
    ));
    assert_eq!(h.session.current_step().id, "notice");
    assert!(h.store.is_empty().await);

    h.session.next();
    let id = h.session.submit().await.unwrap();

    let records = h.store.records().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].0, id);
    assert_eq!(records[0].1.status, RecordStatus::Submitted);
    assert_eq!(h.session.status(), SessionStatus::Closed(RecordStatus::Submitted));
}

#[tokio::test]
async fn test_notice_override_discarded_by_regenerate() {
    let mut h = harness(InMemoryDraftStore::new(), StaticEntitlements::all());
    let session = &mut h.session;
    session.update_field(fields::ENTITY_NAME, "Acme Holdings Ltd".into()).unwrap();
    session.update_field(fields::MEETING_NATURE, "physical".into()).unwrap();
    session.update_field(fields::VENUE, "Board Room".into()).unwrap();

    session.set_notice_override("venue", "X").unwrap();
    assert_eq!(session.notice().header.venue.as_deref(), Some("X"));
    // Overrides never touch the draft
    assert_eq!(session.draft().text(fields::VENUE), Some("Board Room"));

    assert_eq!(session.regenerate_notice().await, Ok(GenerationOutcome::Template));
    assert_eq!(session.notice().header.venue.as_deref(), Some("Board Room"));

    session.update_field(fields::USE_AI_GENERATION, true.into()).unwrap();
    assert_eq!(session.regenerate_notice().await, Ok(GenerationOutcome::Generated));
    assert!(session.notice().body.starts_with("The meeting of Acme Holdings Ltd is hereby convened"));
}

#[tokio::test]
async fn test_exported_notice_numbers_agenda() {
    let mut h = harness(InMemoryDraftStore::new(), StaticEntitlements::none());
    let session = &mut h.session;
    session.update_field(fields::ENTITY_NAME, "Acme Holdings Ltd".into()).unwrap();
    session
        .update_field(
            fields::AGENDA_ITEMS,
            FieldValue::Agenda(vec![
                AgendaItem::new("Confirm minutes"),
                AgendaItem::new("Adopt accounts").with_sub_items(["Balance sheet", "Auditor report"]),
            ]),
        )
        .unwrap();

    let text = render_notice(&session.notice());
    let first = text.find("1. Confirm minutes").unwrap();
    let second = text.find("2. Adopt accounts").unwrap();
    let sub_a = text.find("a) Balance sheet").unwrap();
    let sub_b = text.find("b) Auditor report").unwrap();
    assert!(first < second && second < sub_a && sub_a < sub_b);

    let temp_dir = tempfile::TempDir::new().unwrap();
    let sink = convene::FileExportSink::new(temp_dir.path());
    let path = session.export_notice(&sink).await.unwrap();
    assert_eq!(std::fs::read_to_string(path).unwrap(), text);
}

#[tokio::test]
async fn test_resume_from_store_updates_same_record() {
    let mut h = harness(InMemoryDraftStore::new(), StaticEntitlements::none());
    h.session.update_field(fields::ENTITY_NAME, "Acme Holdings Ltd".into()).unwrap();
    let id = h.session.save_draft().await.unwrap();

    let collaborators = Collaborators {
        store: h.store.clone(),
        surface: h.surface.clone(),
        entitlements: Arc::new(StaticEntitlements::none()),
        content_provider: None,
    };
    let mut resumed = WorkflowSession::resume_from_store(collaborators, SessionConfig::default(), id.clone())
        .await
        .unwrap();
    resumed.update_field(fields::MEETING_TYPE, "board".into()).unwrap();
    assert_eq!(resumed.save_draft().await.unwrap(), id);

    assert_eq!(h.store.create_calls(), 1);
    assert_eq!(h.store.update_calls(), 1);
    assert_eq!(h.store.len().await, 1);
}
