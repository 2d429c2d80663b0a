use std::collections::HashMap;

use concept_graph::{LinkId, NodeId};

use crate::map_view::Bounds;
use crate::memoized::Memoized;
use crate::store::Store;

/// One chip in an outline card.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkChip {
    pub link_id: LinkId,
    /// The node at the other end.
    pub other_title: String,
    pub caption: String,
    pub outgoing: bool,
}

pub struct Cache {
    pub bounds: Memoized<Store, u64, Option<Bounds>>,
    pub link_chips: Memoized<Store, u64, HashMap<NodeId, Vec<LinkChip>>>,
}

impl Cache {
    pub fn new() -> Self {
        let bounds = Memoized::new(
            |s: &Store| s.concepts.revision(),
            |s: &Store| Bounds::of(&s.concepts.state().nodes),
        );

        let link_chips = Memoized::new(
            |s: &Store| s.concepts.revision(),
            |s: &Store| link_chips_by_node(s),
        );

        Self { bounds, link_chips }
    }
}

impl Default for Cache {
    fn default() -> Self {
        Self::new()
    }
}

fn link_chips_by_node(store: &Store) -> HashMap<NodeId, Vec<LinkChip>> {
    let state = store.concepts.state();
    let mut chips: HashMap<NodeId, Vec<LinkChip>> = HashMap::new();
    for link in &state.links {
        let ends = [
            (&link.source_node_id, &link.target_node_id, true),
            (&link.target_node_id, &link.source_node_id, false),
        ];
        for (this, other, outgoing) in ends {
            let other_title = state
                .node(other)
                .map(|n| n.title.clone())
                .unwrap_or_default();
            chips.entry(this.clone()).or_default().push(LinkChip {
                link_id: link.id.clone(),
                other_title,
                caption: link.caption().to_owned(),
                outgoing,
            });
        }
    }
    chips
}
