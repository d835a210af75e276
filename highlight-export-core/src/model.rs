//! Quote and work records as delivered by the data source.
//!
//! The wire shape nests the owning book inside every quote and spreads book
//! metadata over a few sub-objects (`authors_objects`, `library_card`). The
//! domain types flatten that into [`Work`] while serialising back to the same
//! shape, so a dump written by the CLI can be read again by the file source.

use serde::{Deserialize, Serialize};

/// A single highlighted passage plus an optional reader comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub uuid: String,
    /// The work this quote was highlighted from. Absent on malformed records.
    #[serde(default)]
    pub book: Option<Work>,
    /// Index into the highlight palette, see [`Color`].
    pub color: i64,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Seconds since the Unix epoch.
    pub created_at: i64,
}

impl Quote {
    /// The comment, if it carries any text.
    pub fn note(&self) -> Option<&str> {
        self.comment.as_deref().filter(|c| !c.is_empty())
    }
}

/// The source publication a quote was highlighted from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WireBook", into = "WireBook")]
pub struct Work {
    pub uuid: String,
    pub title: String,
    pub authors: Vec<String>,
    /// Reading state tag, e.g. `finished`.
    pub state: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireBook {
    uuid: String,
    #[serde(default)]
    title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    authors_objects: Vec<WireAuthor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    library_card: Option<WireLibraryCard>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireAuthor {
    name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireLibraryCard {
    #[serde(default)]
    state: Option<String>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl From<WireBook> for Work {
    fn from(book: WireBook) -> Self {
        Work {
            uuid: book.uuid,
            title: book.title,
            authors: book.authors_objects.into_iter().map(|a| a.name).collect(),
            state: book.library_card.and_then(|card| card.state),
        }
    }
}

impl From<Work> for WireBook {
    fn from(work: Work) -> Self {
        WireBook {
            uuid: work.uuid,
            title: work.title,
            authors_objects: work
                .authors
                .into_iter()
                .map(|name| WireAuthor { name })
                .collect(),
            library_card: work.state.map(|state| WireLibraryCard { state: Some(state) }),
        }
    }
}

/// Highlight palette. The discriminant is the color code used by the data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Yellow = 0,
    Red = 1,
    Blue = 2,
    Green = 3,
    Purple = 4,
}

impl Color {
    pub const PALETTE: [Color; 5] = [
        Color::Yellow,
        Color::Red,
        Color::Blue,
        Color::Green,
        Color::Purple,
    ];

    /// Resolves a color code, or `None` when it falls outside the palette.
    pub fn from_code(code: i64) -> Option<Color> {
        usize::try_from(code)
            .ok()
            .and_then(|idx| Self::PALETTE.get(idx).copied())
    }

    pub fn name(self) -> &'static str {
        match self {
            Color::Yellow => "yellow",
            Color::Red => "red",
            Color::Blue => "blue",
            Color::Green => "green",
            Color::Purple => "purple",
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
