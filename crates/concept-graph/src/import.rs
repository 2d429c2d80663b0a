//! Mapping of an AI-generated concept graph onto a fresh
//! [`ConceptMapState`].
//!
//! The service speaks in list indices; here those become ids, anchors
//! are resolved by searching the document text for each title and the
//! nodes are laid out on a grid.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::layout::grid_positions;
use crate::model::{
    ConceptLink, ConceptMapState, ConceptNode, LinkId, LinkType, NodeId,
    NodeType, truncate_chars,
};

pub const MAX_LABEL_CHARS: usize = 40;

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct AiNode {
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type", default)]
    pub node_type: NodeType,
}

impl AiNode {
    pub fn new(title: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            title: title.into(),
            node_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiLink {
    pub source_index: i64,
    pub target_index: i64,
    #[serde(rename = "type", default)]
    pub link_type: LinkType,
    #[serde(default)]
    pub label: Option<String>,
}

impl AiLink {
    pub fn new(
        source_index: i64,
        target_index: i64,
        link_type: LinkType,
    ) -> Self {
        Self {
            source_index,
            target_index,
            link_type,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Both indices address distinct nodes of a list of `count`.
    fn endpoints(&self, count: usize) -> Option<(usize, usize)> {
        let source = usize::try_from(self.source_index).ok()?;
        let target = usize::try_from(self.target_index).ok()?;
        (source < count && target < count && source != target)
            .then_some((source, target))
    }
}

/// Success body of the AI concept-map service.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AiGraph {
    pub nodes: Vec<AiNode>,
    pub links: Vec<AiLink>,
}

impl AiGraph {
    /// Lenient decoding of a response body.
    ///
    /// Missing `nodes`/`links` are empty. A malformed node entry is kept
    /// as an untitled default node so later link indices still line up;
    /// a malformed link entry is dropped. Labels are trimmed and capped.
    pub fn from_json(body: &Value) -> Self {
        let entries = |field: &str| {
            body.get(field)
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default()
        };

        let nodes = entries("nodes")
            .into_iter()
            .map(|v| serde_json::from_value(v).unwrap_or_default())
            .collect();

        let links = entries("links")
            .into_iter()
            .filter_map(|v| serde_json::from_value::<AiLink>(v).ok())
            .map(|mut link| {
                link.label = normalize_label(link.label.as_deref());
                link
            })
            .collect();

        Self { nodes, links }
    }
}

/// Trimmed, capped label; blank becomes `None`.
pub fn normalize_label(label: Option<&str>) -> Option<String> {
    let label = truncate_chars(label?.trim(), MAX_LABEL_CHARS).trim_end();
    (!label.is_empty()).then(|| label.to_owned())
}

/// Char-offset span of the first case-insensitive occurrence of
/// `needle` in `haystack`.
pub fn find_anchor(haystack: &str, needle: &str) -> Option<(usize, usize)> {
    let fold = |s: &str| -> Vec<char> {
        s.chars()
            .map(|c| c.to_lowercase().next().unwrap_or(c))
            .collect()
    };
    let needle = fold(needle);
    if needle.is_empty() {
        return None;
    }
    let haystack = fold(haystack);
    haystack
        .windows(needle.len())
        .position(|w| w == needle.as_slice())
        .map(|start| (start, start + needle.len()))
}

/// Build the replacement state for an import. Selection and focus are
/// cleared and the detail view is opened.
pub fn build_state(
    full_text: &str,
    nodes: &[AiNode],
    links: &[AiLink],
) -> ConceptMapState {
    let positions = grid_positions(nodes.len());

    let nodes: Vec<ConceptNode> = nodes
        .iter()
        .zip(positions)
        .map(|(ai, position)| {
            let title = ConceptNode::title_from(&ai.title);
            let (start, end) =
                find_anchor(full_text, &title).unwrap_or((0, 0));
            ConceptNode {
                id: NodeId::generate(),
                title,
                linked_text_start: start,
                linked_text_end: end,
                node_type: ai.node_type,
                position,
            }
        })
        .collect();

    let mut dropped = 0usize;
    let links: Vec<ConceptLink> = links
        .iter()
        .filter_map(|ai| {
            let Some((s, t)) = ai.endpoints(nodes.len()) else {
                dropped += 1;
                return None;
            };
            Some(ConceptLink {
                id: LinkId::generate(),
                source_node_id: nodes[s].id.clone(),
                target_node_id: nodes[t].id.clone(),
                link_type: ai.link_type,
                label: ai.label.clone(),
            })
        })
        .collect();

    if dropped > 0 {
        debug!(dropped, "skipped AI links with invalid endpoints");
    }

    ConceptMapState {
        nodes,
        links,
        selected_node_id: None,
        focused_link_id: None,
        is_modal_open: true,
    }
}
