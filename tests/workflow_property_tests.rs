// Property-based tests for navigation and required-field evaluation

use proptest::prelude::*;
use proptest_derive::Arbitrary;
use std::sync::Arc;

use convene::draft::fields;
use convene::workflow::{meeting_workflow, Collaborators, SessionConfig, WorkflowSession};
use convene::{AgendaItem, FieldValue, InMemoryDraftStore, LogSurface, StaticEntitlements};

#[derive(Debug, Clone, Arbitrary)]
enum NavOp {
    Next,
    Previous,
    GoTo(#[proptest(strategy = "0usize..6")] usize),
}

fn session() -> WorkflowSession {
    let collaborators = Collaborators {
        store: Arc::new(InMemoryDraftStore::new()),
        surface: Arc::new(LogSurface),
        entitlements: Arc::new(StaticEntitlements::none()),
        content_provider: None,
    };
    WorkflowSession::new(meeting_workflow(), collaborators, SessionConfig::default())
}

fn meeting_nature() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("physical"), Just("virtual"), Just("hybrid")]
}

fn virtual_option() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("generate"), Just("manual")]
}

proptest! {
    #[test]
    fn navigation_never_changes_the_draft(
        ops in prop::collection::vec(any::<NavOp>(), 0..40),
        nature in meeting_nature(),
        venue in ".{0,16}",
        voting in any::<bool>(),
    ) {
        let mut session = session();
        session.update_field(fields::MEETING_NATURE, nature.into()).unwrap();
        session.update_field(fields::VENUE, venue.into()).unwrap();
        let mut item = AgendaItem::new("Adopt accounts");
        item.requires_vote = voting;
        session.update_field(fields::AGENDA_ITEMS, FieldValue::Agenda(vec![item])).unwrap();

        let before = session.draft().clone();
        let last = session.definition().terminal_index();

        for op in ops {
            match op {
                NavOp::Next => { session.next(); }
                NavOp::Previous => { session.previous(); }
                NavOp::GoTo(index) => {
                    let id = session.definition().steps[index].id;
                    session.go_to(id).unwrap();
                }
            }
            prop_assert!(session.current_index() <= last);
        }

        prop_assert_eq!(session.draft(), &before);
    }

    #[test]
    fn required_fields_are_idempotent(
        nature in meeting_nature(),
        option in virtual_option(),
        link in "(https://meet\\.example/[a-z]{1,8})?",
        publish in any::<bool>(),
    ) {
        let mut session = session();
        session.update_field(fields::MEETING_NATURE, nature.into()).unwrap();
        session.update_field(fields::VIRTUAL_MEETING_OPTION, option.into()).unwrap();
        session.update_field(fields::MEETING_LINK, link.into()).unwrap();
        session.update_field(fields::PUBLISH_IN_NEWSPAPER, publish.into()).unwrap();

        for step in session.definition().steps.clone() {
            let first = session.required_fields_for_step(step.id).unwrap();
            let second = session.required_fields_for_step(step.id).unwrap();
            prop_assert_eq!(first, second);
        }
    }

    #[test]
    fn nature_and_option_updates_commute(
        nature in meeting_nature(),
        option in virtual_option(),
        initial_nature in meeting_nature(),
        initial_option in virtual_option(),
    ) {
        let mut nature_first = session();
        let mut option_first = session();
        for session in [&mut nature_first, &mut option_first] {
            session.update_field(fields::MEETING_NATURE, initial_nature.into()).unwrap();
            session.update_field(fields::VIRTUAL_MEETING_OPTION, initial_option.into()).unwrap();
        }

        nature_first.update_field(fields::MEETING_NATURE, nature.into()).unwrap();
        nature_first.update_field(fields::VIRTUAL_MEETING_OPTION, option.into()).unwrap();

        option_first.update_field(fields::VIRTUAL_MEETING_OPTION, option.into()).unwrap();
        option_first.update_field(fields::MEETING_NATURE, nature.into()).unwrap();

        let a = nature_first.required_fields_for_step("details").unwrap();
        let b = option_first.required_fields_for_step("details").unwrap();
        prop_assert_eq!(&a, &b);

        let link_required = a.contains(fields::MEETING_LINK);
        prop_assert_eq!(link_required, nature != "physical" && option == "manual");
        prop_assert_eq!(a.contains(fields::VENUE), nature != "virtual");
    }
}
