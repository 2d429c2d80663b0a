use std::fmt;
use std::str::FromStr;

pub const STORAGE_PREFIX: &str = "concept-map";

/// Editor mode the host document belongs to. Documents without an
/// identifier share one map per mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WritingMode {
    #[default]
    Novel,
    Notes,
    Journal,
}

impl WritingMode {
    pub const ALL: [WritingMode; 3] =
        [WritingMode::Novel, WritingMode::Notes, WritingMode::Journal];

    pub fn as_str(self) -> &'static str {
        match self {
            WritingMode::Novel => "novel",
            WritingMode::Notes => "notes",
            WritingMode::Journal => "journal",
        }
    }
}

impl fmt::Display for WritingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
#[error("unknown writing mode `{0}` (expected novel, notes or journal)")]
pub struct UnknownMode(pub String);

impl FromStr for WritingMode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownMode(s.to_owned()))
    }
}

/// Storage key for a document's map.
pub fn storage_key(document_id: Option<&str>, mode: WritingMode) -> String {
    match document_id.map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) => format!("{STORAGE_PREFIX}:{id}"),
        None => format!("{STORAGE_PREFIX}:{mode}-default"),
    }
}
