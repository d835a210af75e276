//! Filesystem storage and filename derivation for rendered documents.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::contract::DocumentStore;
use crate::error::StoreError;
use crate::model::Work;

/// What to do when two works sanitise to the same filename.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleCollision {
    /// Later works get `<title> (<work id>).md`.
    #[default]
    SuffixId,
    /// Every work writes `<title>.md`; the last one wins.
    Overwrite,
}

const UNSAFE_CHARS: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Filesystem-safe stem for a title. Falls back to `fallback` when nothing is left.
pub fn sanitize_stem(title: &str, fallback: &str) -> String {
    let stem = title.replace(&UNSAFE_CHARS[..], "_");
    let stem = stem.trim().trim_start_matches('.');
    if stem.is_empty() {
        fallback.replace(&UNSAFE_CHARS[..], "_")
    } else {
        stem.to_string()
    }
}

/// One filename per work, in the same order as `works`.
pub fn plan_filenames(works: &[Work], policy: TitleCollision) -> Vec<String> {
    let mut taken = HashSet::new();
    works
        .iter()
        .map(|work| {
            let stem = sanitize_stem(&work.title, &work.uuid);
            let filename = format!("{stem}.md");
            if taken.insert(filename.clone()) {
                return filename;
            }
            match policy {
                TitleCollision::Overwrite => {
                    warn!(work_id = %work.uuid, filename = %filename, "Filename already used by another work, overwriting");
                    filename
                }
                TitleCollision::SuffixId => {
                    let id = sanitize_stem(&work.uuid, "work");
                    let mut suffixed = format!("{stem} ({id}).md");
                    let mut n = 2;
                    // Another title may already read like a suffixed name.
                    while !taken.insert(suffixed.clone()) {
                        suffixed = format!("{stem} ({id} {n}).md");
                        n += 1;
                    }
                    debug!(work_id = %work.uuid, filename = %suffixed, "Filename collision, suffixing work id");
                    suffixed
                }
            }
        })
        .collect()
}

/// Writes documents into a directory, creating it on first use.
#[derive(Debug, Clone)]
pub struct FsStore {
    dir: PathBuf,
}

impl FsStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FsStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl DocumentStore for FsStore {
    async fn write_document(
        &self,
        filename: &str,
        contents: &str,
    ) -> Result<PathBuf, StoreError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| StoreError::CreateDir {
                path: self.dir.clone(),
                source,
            })?;
        let path = self.dir.join(filename);
        tokio::fs::write(&path, contents)
            .await
            .map_err(|source| StoreError::Write {
                path: path.clone(),
                source,
            })?;
        debug!(path = %path.display(), bytes = contents.len(), "Wrote document");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn work(uuid: &str, title: &str) -> Work {
        Work {
            uuid: uuid.into(),
            title: title.into(),
            authors: vec![],
            state: None,
        }
    }

    #[test]
    fn unsafe_characters_are_replaced() {
        assert_eq!(sanitize_stem("A/B: C?", "id"), "A_B_ C_");
        assert_eq!(sanitize_stem("  ", "W1"), "W1");
        assert_eq!(sanitize_stem("..hidden", "W1"), "hidden");
    }

    #[test]
    fn duplicate_titles_get_work_id_suffix() {
        let works = vec![work("W1", "Foo"), work("W2", "Foo"), work("W3", "Bar")];
        assert_eq!(
            plan_filenames(&works, TitleCollision::SuffixId),
            vec!["Foo.md", "Foo (W2).md", "Bar.md"]
        );
    }

    #[test]
    fn suffixed_name_never_reuses_a_title_already_planned() {
        let works = vec![
            work("W1", "Foo"),
            work("W2", "Foo (W3)"),
            work("W3", "Foo"),
            work("W4", "Foo (W3 2)"),
            work("W5", "Foo"),
        ];
        let planned = plan_filenames(&works, TitleCollision::SuffixId);
        assert_eq!(
            planned,
            vec![
                "Foo.md",
                "Foo (W3).md",
                "Foo (W3 2).md",
                "Foo (W3 2) (W4).md",
                "Foo (W5).md",
            ]
        );
        let unique: HashSet<_> = planned.iter().collect();
        assert_eq!(unique.len(), planned.len());
    }

    #[test]
    fn overwrite_policy_reuses_the_filename() {
        let works = vec![work("W1", "Foo"), work("W2", "Foo")];
        assert_eq!(
            plan_filenames(&works, TitleCollision::Overwrite),
            vec!["Foo.md", "Foo.md"]
        );
    }
}
