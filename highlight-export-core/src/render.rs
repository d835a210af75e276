//! Builds and serialises the Markdown document for one work.
//!
//! A document is a closed list of [`Block`]s: YAML front matter, a
//! `## Highlights` heading, then one nested callout per quote:
//!
//! ```text
//! > [!omnivore-blue]+ [q2] 2023-2-5 7:04:05
//! >
//! > quote content
//! > > [!abstract]+ Notes
//! > > reader comment
//! > > > [!info]+ Feedback
//! ```
//!
//! Without a comment the Notes layer is left out and Feedback nests directly
//! under the annotation.

use chrono::{Datelike, Local, TimeZone, Timelike};
use serde::Serialize;
use std::borrow::Cow;
use tracing::{debug, error};

use crate::error::{ExportError, MalformedReason, Result};
use crate::model::{Color, Quote, Work};

/// Title of the section that holds the annotations.
pub const HIGHLIGHTS_HEADING: &str = "Highlights";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Header(HeaderBlock),
    Heading(HeadingBlock),
    Annotation(AnnotationBlock),
}

impl Block {
    pub fn render(&self) -> Result<String> {
        match self {
            Block::Header(header) => header.render(),
            Block::Heading(heading) => Ok(heading.render()),
            Block::Annotation(annotation) => Ok(annotation.render()),
        }
    }
}

/// Per-work metadata, rendered as front matter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderBlock {
    pub id: String,
    pub publish: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub aliases: Vec<String>,
    pub authors: Vec<String>,
}

impl HeaderBlock {
    pub fn for_work(work: &Work) -> Self {
        HeaderBlock {
            id: work.uuid.clone(),
            publish: false,
            state: work.state.clone(),
            aliases: vec![work.title.clone()],
            authors: work.authors.clone(),
        }
    }

    fn render(&self) -> Result<String> {
        let yaml = serde_yaml::to_string(self)?;
        Ok(format!("---\n{yaml}---"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingBlock {
    pub level: usize,
    pub text: String,
}

impl HeadingBlock {
    fn render(&self) -> String {
        format!("{} {}", "#".repeat(self.level), self.text)
    }
}

/// One highlighted quote with its optional notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationBlock {
    pub color: Color,
    pub quote_id: String,
    /// Creation time, already formatted for the label.
    pub created: String,
    pub content: String,
    pub notes: Option<NotesBlock>,
}

/// Reader comment attached to an annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesBlock {
    pub comment: String,
}

impl AnnotationBlock {
    fn callout(&self) -> Callout<'_> {
        let feedback = Callout(vec![Entry::Line("[!info]+ Feedback".into())]);
        let nested = match &self.notes {
            Some(notes) => Callout(vec![
                Entry::Line("[!abstract]+ Notes".into()),
                Entry::Line(notes.comment.as_str().into()),
                Entry::Nested(feedback),
            ]),
            None => feedback,
        };
        Callout(vec![
            Entry::Line(
                format!(
                    "[!omnivore-{}]+ [{}] {}",
                    self.color, self.quote_id, self.created
                )
                .into(),
            ),
            Entry::Line("".into()),
            Entry::Line(self.content.as_str().into()),
            Entry::Nested(nested),
        ])
    }

    fn render(&self) -> String {
        self.callout().lines().join("\n")
    }
}

/// Blockquote-style container. Entries are emitted one after another with no
/// implied spacing; a blank line is an explicit empty entry.
struct Callout<'a>(Vec<Entry<'a>>);

enum Entry<'a> {
    Line(Cow<'a, str>),
    Nested(Callout<'a>),
}

impl Callout<'_> {
    fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for entry in &self.0 {
            match entry {
                Entry::Line(text) if text.is_empty() => lines.push(String::new()),
                Entry::Line(text) => lines.extend(text.lines().map(str::to_owned)),
                Entry::Nested(nested) => lines.extend(nested.lines()),
            }
        }
        lines.into_iter().map(quote_line).collect()
    }
}

fn quote_line(line: String) -> String {
    if line.is_empty() {
        ">".to_string()
    } else {
        format!("> {line}")
    }
}

/// Renders documents with timestamps in a fixed timezone.
#[derive(Debug, Clone)]
pub struct DocumentRenderer<Tz: TimeZone = Local> {
    tz: Tz,
}

impl DocumentRenderer<Local> {
    pub fn local() -> Self {
        DocumentRenderer { tz: Local }
    }
}

impl Default for DocumentRenderer<Local> {
    fn default() -> Self {
        Self::local()
    }
}

impl<Tz: TimeZone> DocumentRenderer<Tz> {
    pub fn with_timezone(tz: Tz) -> Self {
        DocumentRenderer { tz }
    }

    /// `YYYY-M-D H:MM:SS`; `None` if the instant is not representable.
    pub fn format_timestamp(&self, secs: i64) -> Option<String> {
        let dt = self.tz.timestamp_opt(secs, 0).single()?;
        Some(format!(
            "{}-{}-{} {}:{:02}:{:02}",
            dt.year(),
            dt.month(),
            dt.day(),
            dt.hour(),
            dt.minute(),
            dt.second()
        ))
    }

    pub fn annotation(&self, quote: &Quote) -> Result<AnnotationBlock> {
        let color = Color::from_code(quote.color).ok_or_else(|| {
            error!(quote_id = %quote.uuid, color = quote.color, "Color code outside palette");
            ExportError::malformed(&quote.uuid, MalformedReason::ColorOutOfRange(quote.color))
        })?;
        let created = self.format_timestamp(quote.created_at).ok_or_else(|| {
            error!(quote_id = %quote.uuid, created_at = quote.created_at, "Unrepresentable timestamp");
            ExportError::malformed(
                &quote.uuid,
                MalformedReason::TimestampOutOfRange(quote.created_at),
            )
        })?;
        Ok(AnnotationBlock {
            color,
            quote_id: quote.uuid.clone(),
            created,
            content: quote.content.clone(),
            notes: quote.note().map(|comment| NotesBlock {
                comment: comment.to_string(),
            }),
        })
    }

    /// Header, heading and one annotation per quote, in the given order.
    pub fn blocks(&self, work: &Work, quotes: &[Quote]) -> Result<Vec<Block>> {
        let mut blocks = Vec::with_capacity(quotes.len() + 2);
        blocks.push(Block::Header(HeaderBlock::for_work(work)));
        blocks.push(Block::Heading(HeadingBlock {
            level: 2,
            text: HIGHLIGHTS_HEADING.to_string(),
        }));
        for quote in quotes {
            blocks.push(Block::Annotation(self.annotation(quote)?));
        }
        Ok(blocks)
    }

    pub fn render(&self, work: &Work, quotes: &[Quote]) -> Result<String> {
        let blocks = self.blocks(work, quotes)?;
        let rendered = blocks
            .iter()
            .map(Block::render)
            .collect::<Result<Vec<_>>>()?;
        debug!(work_id = %work.uuid, quotes = quotes.len(), "Rendered document");
        Ok(rendered.join("\n\n") + "\n")
    }
}
