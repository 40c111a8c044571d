//! Citation formatting and clipboard export.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::sync::Mutex;

use crate::error::{AppError, Result};
use crate::models::{CitationFormat, JournalRecord};

/// Format `record` in the given style.
///
/// Authors are joined with `", "` in their original order, with no
/// truncation or initials.
pub fn generate_citation(record: &JournalRecord, format: CitationFormat) -> String {
    let authors = record.authors.join(", ");
    let year = record.year;
    let title = &record.title;
    let source = record.source.label();

    match format {
        CitationFormat::Apa => {
            let doi = record
                .doi
                .as_deref()
                .map(|doi| format!("https://doi.org/{doi}"))
                .unwrap_or_default();
            format!("{authors} ({year}). {title}. {source}. {doi}")
                .trim()
                .to_string()
        }
        CitationFormat::Mla => format!("{authors}. \"{title}.\" {source}, {year}."),
        CitationFormat::Ieee => format!("{authors}, \"{title},\" {source}, {year}."),
        CitationFormat::Harvard => format!("{authors} {year}, '{title}', {source}."),
        CitationFormat::Chicago => format!("{authors}. \"{title}.\" {source} ({year})."),
    }
}

/// Format `record` with a style named at runtime.
///
/// Unknown names fall back to `"{authors} ({year}). {title}."`.
pub fn generate_citation_named(record: &JournalRecord, format: &str) -> String {
    match format.parse::<CitationFormat>() {
        Ok(format) => generate_citation(record, format),
        Err(_) => format!(
            "{} ({}). {}.",
            record.authors.join(", "),
            record.year,
            record.title
        ),
    }
}

/// Destination for copied citations.
#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<()>;
}

/// Write a formatted citation to the clipboard.
///
/// A denied or missing clipboard surfaces as [`AppError::Clipboard`]; the
/// write is not retried.
pub async fn copy_citation(clipboard: &dyn Clipboard, text: &str) -> Result<()> {
    clipboard.write_text(text).await
}

/// In-process clipboard, mainly for tests and headless use.
#[derive(Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
    deny: bool,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipboard that rejects every write.
    pub fn denied() -> Self {
        Self {
            contents: Mutex::new(None),
            deny: true,
        }
    }

    pub async fn contents(&self) -> Option<String> {
        self.contents.lock().await.clone()
    }
}

#[async_trait]
impl Clipboard for MemoryClipboard {
    async fn write_text(&self, text: &str) -> Result<()> {
        if self.deny {
            return Err(AppError::clipboard("clipboard access denied"));
        }
        *self.contents.lock().await = Some(text.to_string());
        Ok(())
    }
}

/// Desktop clipboard driven through the platform copy utility.
///
/// Tries `wl-copy`, `xclip` and `pbcopy` in that order.
pub struct SystemClipboard {
    candidates: Vec<(&'static str, Vec<&'static str>)>,
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self {
            candidates: vec![
                ("wl-copy", vec![]),
                ("xclip", vec!["-selection", "clipboard"]),
                ("pbcopy", vec![]),
            ],
        }
    }
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    async fn pipe_to(&self, program: &str, args: &[&str], text: &str) -> std::io::Result<bool> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes()).await?;
        }
        Ok(child.wait().await?.success())
    }
}

#[async_trait]
impl Clipboard for SystemClipboard {
    async fn write_text(&self, text: &str) -> Result<()> {
        for (program, args) in &self.candidates {
            match self.pipe_to(program, args, text).await {
                Ok(true) => {
                    log::debug!("Copied {} bytes via {}", text.len(), program);
                    return Ok(());
                }
                Ok(false) => log::debug!("{} exited with failure", program),
                Err(e) => log::debug!("{} unavailable: {}", program, e),
            }
        }
        Err(AppError::clipboard("no clipboard utility available"))
    }
}
