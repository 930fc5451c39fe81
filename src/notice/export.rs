// Flat-text rendering of the displayed notice and the sink that saves it

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

#[cfg(any(test, feature = "testing"))]
use mockall::automock;

use super::model::NoticeModel;
use crate::error::ExportError;

/// Serialize a notice; the same notice always yields the same text
pub fn render_notice(notice: &NoticeModel) -> String {
    let header = &notice.header;
    let mut out = String::new();

    push_line(&mut out, &header.entity_name);
    if !header.notice_number.is_empty() {
        push_line(&mut out, &format!("Notice No: {}", header.notice_number));
    }
    push_line(&mut out, &format!("NOTICE OF {}", header.meeting_type.to_uppercase()));
    push_line(&mut out, &format!("Date: {}", header.date));
    push_line(&mut out, &format!("Time: {}", header.time));
    if let Some(venue) = &header.venue {
        push_line(&mut out, &format!("Venue: {venue}"));
    }
    if let Some(link) = &header.meeting_link {
        push_line(&mut out, &format!("Meeting link: {link}"));
    }

    out.push('\n');
    push_line(&mut out, &notice.body);

    if !notice.agenda.is_empty() {
        out.push('\n');
        push_line(&mut out, "AGENDA");
        for (index, item) in notice.agenda.iter().enumerate() {
            let mut line = format!("{}. {}", index + 1, item.title);
            match (&item.presenter, item.duration_minutes) {
                (Some(presenter), Some(minutes)) => line.push_str(&format!(" ({presenter}, {minutes} min)")),
                (Some(presenter), None) => line.push_str(&format!(" ({presenter})")),
                (None, Some(minutes)) => line.push_str(&format!(" ({minutes} min)")),
                (None, None) => {}
            }
            push_line(&mut out, &line);

            for (sub_index, sub_item) in item.sub_items.iter().enumerate() {
                push_line(&mut out, &format!("   {}) {}", sub_item_label(sub_index), sub_item));
            }
        }
    }

    if !notice.notes.is_empty() {
        out.push('\n');
        push_line(&mut out, "EXPLANATORY NOTES");
        for note in &notice.notes {
            push_line(&mut out, &format!("Item {}: {}", note.item, note.text));
        }
    }

    out
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

/// a, b, ..., z, aa, ab, ...
fn sub_item_label(index: usize) -> String {
    let mut n = index + 1;
    let mut reversed = String::new();
    while n > 0 {
        n -= 1;
        reversed.push(char::from(b'a' + (n % 26) as u8));
        n /= 26;
    }
    reversed.chars().rev().collect()
}

/// File name derived from entity, notice number and date
pub fn export_filename(notice: &NoticeModel) -> String {
    let header = &notice.header;
    let raw = format!("notice {} {} {}", header.entity_name, header.notice_number, header.date);

    let mut slug = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    format!("{}.txt", slug.trim_matches('-'))
}

#[cfg_attr(any(test, feature = "testing"), automock)]
#[async_trait]
pub trait ExportSink: Send + Sync {
    /// Persist `contents` under `filename` and report where it went
    async fn save(&self, filename: &str, contents: &str) -> Result<PathBuf, ExportError>;
}

#[derive(Debug, Clone)]
pub struct FileExportSink {
    directory: PathBuf,
}

impl FileExportSink {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

#[async_trait]
impl ExportSink for FileExportSink {
    async fn save(&self, filename: &str, contents: &str) -> Result<PathBuf, ExportError> {
        if filename.is_empty() || filename.contains(['/', '\\']) || filename.starts_with('.') {
            return Err(ExportError::InvalidFilename(filename.to_string()));
        }

        fs::create_dir_all(&self.directory).await?;
        let path = self.directory.join(filename);
        fs::write(&path, contents).await?;

        info!(path = %path.display(), bytes = contents.len(), "Notice exported");
        Ok(path)
    }
}
