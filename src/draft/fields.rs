// Registered field catalog shared by the workflow definitions

// Meeting details
pub const ENTITY_NAME: &str = "entityName";
pub const MEETING_TYPE: &str = "meetingType";
pub const MEETING_NATURE: &str = "meetingNature";
pub const MEETING_DATE: &str = "meetingDate";
pub const MEETING_TIME: &str = "meetingTime";
pub const VENUE: &str = "venue";
pub const VIRTUAL_MEETING_OPTION: &str = "virtualMeetingOption";
pub const MEETING_LINK: &str = "meetingLink";

// Agenda
pub const AGENDA_ITEMS: &str = "agendaItems";

// Participants
pub const PARTICIPANTS: &str = "participants";
pub const INVITEES: &str = "invitees";

// Office bearers
pub const CHAIRPERSON: &str = "chairperson";
pub const SECRETARY: &str = "secretary";
pub const SCRUTINIZER: &str = "scrutinizer";

// Notice
pub const NOTICE_NUMBER: &str = "noticeNumber";
pub const NOTICE_DATE: &str = "noticeDate";
pub const PUBLISH_IN_NEWSPAPER: &str = "publishInNewspaper";
pub const NEWSPAPER_NAME: &str = "newspaperName";
pub const USE_AI_GENERATION: &str = "useAiGeneration";

// Compliance checklist
pub const FRAMEWORK: &str = "framework";
pub const REPORTING_PERIOD: &str = "reportingPeriod";
pub const DUE_DATE: &str = "dueDate";
pub const CHECKLIST_ITEMS: &str = "checklistItems";
pub const OWNER: &str = "owner";
pub const REQUIRES_REVIEW: &str = "requiresReview";
pub const REVIEWER: &str = "reviewer";
pub const EVIDENCE_MODE: &str = "evidenceMode";
pub const EVIDENCE_LINK: &str = "evidenceLink";
pub const EVIDENCE_NOTES: &str = "evidenceNotes";
pub const FILE_WITH_REGULATOR: &str = "fileWithRegulator";

/// `meetingNature` choices
pub mod nature {
    pub const PHYSICAL: &str = "physical";
    pub const VIRTUAL: &str = "virtual";
    pub const HYBRID: &str = "hybrid";
}

/// `virtualMeetingOption` choices
pub mod virtual_option {
    pub const GENERATE: &str = "generate";
    pub const MANUAL: &str = "manual";
}
