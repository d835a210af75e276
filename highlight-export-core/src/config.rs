use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::contract::MAX_PER_PAGE;
use crate::download::DEFAULT_BASE_URL;
use crate::store::TitleCollision;

/// Static export configuration. Holds no secrets; credentials are passed to
/// the source client separately.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    pub source: SourceConfig,
    pub output: OutputConfig,
}

impl ExportConfig {
    pub fn trace_loaded(&self) {
        info!(
            source = self.source.kind(),
            per_page = self.source.per_page(),
            output_dir = %self.output.dir.display(),
            on_title_collision = ?self.output.on_title_collision,
            "Loaded ExportConfig"
        );
        debug!(?self, "ExportConfig loaded (full debug)");
    }
}

/// Where quotes come from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceConfig {
    Bookmate(BookmateSource),
    File(FileSource),
}

impl SourceConfig {
    pub fn kind(&self) -> &'static str {
        match self {
            SourceConfig::Bookmate(_) => "bookmate",
            SourceConfig::File(_) => "file",
        }
    }

    pub fn per_page(&self) -> u32 {
        match self {
            SourceConfig::Bookmate(b) => b.per_page,
            SourceConfig::File(f) => f.per_page,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookmateSource {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

/// A JSON dump of quote records, as written by `--dump`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileSource {
    pub path: PathBuf,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub dir: PathBuf,
    #[serde(default)]
    pub on_title_collision: TitleCollision,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_per_page() -> u32 {
    MAX_PER_PAGE
}
