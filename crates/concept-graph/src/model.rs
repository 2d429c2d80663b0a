use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// -------------------------------------------------------------------
// Identifiers
// -------------------------------------------------------------------

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Fresh random identifier.
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Identifier shared by a concept node and its highlight mark.
    NodeId
);
string_id!(LinkId);

// -------------------------------------------------------------------
// Node and link kinds
// -------------------------------------------------------------------

/// Coarse category of a concept, used for colouring and badges.
///
/// Unknown names deserialize to [`NodeType::Default`] so that blobs
/// written by newer versions, or sloppy AI output, still load.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum NodeType {
    Character,
    Theme,
    Idea,
    Place,
    #[default]
    Default,
}

impl NodeType {
    pub const ALL: [NodeType; 5] = [
        NodeType::Character,
        NodeType::Theme,
        NodeType::Idea,
        NodeType::Place,
        NodeType::Default,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            NodeType::Character => "character",
            NodeType::Theme => "theme",
            NodeType::Idea => "idea",
            NodeType::Place => "place",
            NodeType::Default => "default",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(name))
    }
}

impl From<String> for NodeType {
    fn from(name: String) -> Self {
        Self::from_name(&name).unwrap_or_default()
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relationship between two concepts.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case", from = "String")]
pub enum LinkType {
    Causes,
    Supports,
    Conflicts,
    #[default]
    RelatesTo,
    Contrasts,
    Extends,
}

impl LinkType {
    pub const ALL: [LinkType; 6] = [
        LinkType::Causes,
        LinkType::Supports,
        LinkType::Conflicts,
        LinkType::RelatesTo,
        LinkType::Contrasts,
        LinkType::Extends,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LinkType::Causes => "causes",
            LinkType::Supports => "supports",
            LinkType::Conflicts => "conflicts",
            LinkType::RelatesTo => "relates-to",
            LinkType::Contrasts => "contrasts",
            LinkType::Extends => "extends",
        }
    }

    /// Human readable name shown in pickers.
    pub fn display_name(self) -> &'static str {
        match self {
            LinkType::Causes => "Causes",
            LinkType::Supports => "Supports",
            LinkType::Conflicts => "Conflicts",
            LinkType::RelatesTo => "Relates to",
            LinkType::Contrasts => "Contrasts",
            LinkType::Extends => "Extends",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            LinkType::Causes => {
                "This concept leads to or triggers the other"
            }
            LinkType::Supports => {
                "This concept reinforces or backs up the other"
            }
            LinkType::Conflicts => {
                "These concepts are in tension or opposition"
            }
            LinkType::RelatesTo => "General connection between concepts",
            LinkType::Contrasts => "These concepts highlight differences",
            LinkType::Extends => {
                "This concept builds upon or elaborates the other"
            }
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(name))
    }
}

impl From<String> for LinkType {
    fn from(name: String) -> Self {
        Self::from_name(&name).unwrap_or_default()
    }
}

impl fmt::Display for LinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// -------------------------------------------------------------------
// Entities
// -------------------------------------------------------------------

/// Logical (unzoomed) canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptNode {
    pub id: NodeId,
    pub title: String,
    /// Character offset of the anchored span in the host document.
    #[serde(default)]
    pub linked_text_start: usize,
    #[serde(default)]
    pub linked_text_end: usize,
    #[serde(rename = "type", default)]
    pub node_type: NodeType,
    #[serde(default)]
    pub position: Position,
}

pub const MAX_TITLE_CHARS: usize = 80;
pub const FALLBACK_TITLE: &str = "Concept";

/// First `max` characters of `s`.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((byte, _)) => &s[..byte],
        None => s,
    }
}

impl ConceptNode {
    /// Trimmed, length-capped title; never empty.
    pub fn title_from(raw: &str) -> String {
        let title = truncate_chars(raw.trim(), MAX_TITLE_CHARS);
        if title.is_empty() {
            FALLBACK_TITLE.to_owned()
        } else {
            title.to_owned()
        }
    }

    /// `(0, 0)` marks a node whose title was not found in the text.
    pub fn has_anchor(&self) -> bool {
        self.linked_text_end > self.linked_text_start
    }

    pub fn anchor(&self) -> (usize, usize) {
        (self.linked_text_start, self.linked_text_end)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptLink {
    pub id: LinkId,
    pub source_node_id: NodeId,
    pub target_node_id: NodeId,
    #[serde(rename = "type", default)]
    pub link_type: LinkType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl ConceptLink {
    pub fn touches(&self, node_id: &NodeId) -> bool {
        &self.source_node_id == node_id || &self.target_node_id == node_id
    }

    /// Text drawn at the link midpoint.
    pub fn caption(&self) -> &str {
        self.label.as_deref().unwrap_or(self.link_type.as_str())
    }
}

/// Root aggregate persisted per document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptMapState {
    pub nodes: Vec<ConceptNode>,
    pub links: Vec<ConceptLink>,
    #[serde(default)]
    pub selected_node_id: Option<NodeId>,
    #[serde(default)]
    pub focused_link_id: Option<LinkId>,
    #[serde(default)]
    pub is_modal_open: bool,
}

impl ConceptMapState {
    pub fn node(&self, id: &NodeId) -> Option<&ConceptNode> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    pub fn node_mut(&mut self, id: &NodeId) -> Option<&mut ConceptNode> {
        self.nodes.iter_mut().find(|n| &n.id == id)
    }

    pub fn link(&self, id: &LinkId) -> Option<&ConceptLink> {
        self.links.iter().find(|l| &l.id == id)
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Links with `id` as either endpoint, in insertion order.
    pub fn links_touching<'a>(
        &'a self,
        id: &'a NodeId,
    ) -> impl Iterator<Item = &'a ConceptLink> + 'a {
        self.links.iter().filter(move |l| l.touches(id))
    }

    pub fn selected_node(&self) -> Option<&ConceptNode> {
        self.selected_node_id.as_ref().and_then(|id| self.node(id))
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.links.is_empty()
    }
}

/// A span of the host document as reported by the text surface.
/// Offsets count characters, `from <= to`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextSelection {
    pub text: String,
    pub from: usize,
    pub to: usize,
}

impl TextSelection {
    pub fn new(text: impl Into<String>, from: usize, to: usize) -> Self {
        Self {
            text: text.into(),
            from,
            to,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.from >= self.to
    }
}
