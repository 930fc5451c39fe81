// Notice derivation: template, provider and override tiers plus export

pub mod composer;
pub mod export;
pub mod model;
pub mod provider;
pub mod template;

pub use composer::{GenerationOutcome, NoticeComposer};
pub use export::{export_filename, render_notice, ExportSink, FileExportSink};
pub use model::{ExplanatoryNote, NoticeAgendaItem, NoticeField, NoticeHeader, NoticeModel, PartialNoticeFields};
pub use provider::{CannedContentProvider, ContentProvider, NoticeContext};
pub use template::{NoticeTemplate, DEFAULT_BODY_TEMPLATE};
