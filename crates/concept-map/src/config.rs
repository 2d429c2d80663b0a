use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use concept_graph::{WritingMode, storage_key};

use crate::ai_client::ClientConfig;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/api/ai/concept-map";

#[derive(Parser, Debug, Clone)]
#[command(
    name = "concept-map",
    version,
    about = "Concept map editor anchored to a writing document"
)]
pub struct Config {
    /// Document identifier, e.g. `novel:chapter-3` or `note-doc:42`
    #[arg(long)]
    pub document: Option<String>,
    /// Writing mode used when no document identifier is given
    #[arg(long, default_value_t = WritingMode::Novel)]
    pub mode: WritingMode,
    /// Directory holding one JSON file per concept map
    #[arg(long, env = "CONCEPT_MAP_STORAGE_DIR")]
    pub storage_dir: Option<PathBuf>,
    /// AI concept-map service endpoint
    #[arg(long, env = "CONCEPT_MAP_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
    /// Request timeout for the AI service, in seconds
    #[arg(long, default_value_t = 60)]
    pub timeout_secs: u64,
    /// Plain text file loaded into the editor pane
    #[arg(long)]
    pub text_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            document: None,
            mode: WritingMode::default(),
            storage_dir: None,
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            timeout_secs: 60,
            text_file: None,
        }
    }
}

impl Config {
    pub fn storage_key(&self) -> String {
        storage_key(self.document.as_deref(), self.mode)
    }

    pub fn storage_dir(&self) -> PathBuf {
        self.storage_dir.clone().unwrap_or_else(default_storage_dir)
    }

    pub fn client(&self) -> ClientConfig {
        ClientConfig {
            endpoint: self.endpoint.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

/// `<data dir>/concept-map`, e.g. `~/.local/share/concept-map`.
pub fn default_storage_dir() -> PathBuf {
    let data_dir = dirs::data_dir().unwrap_or_else(|| {
        dirs::home_dir().unwrap_or_default().join(".local/share")
    });
    data_dir.join("concept-map")
}
