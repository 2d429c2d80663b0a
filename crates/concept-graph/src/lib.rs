pub mod classify;
pub mod document;
pub mod import;
pub mod layout;
pub mod model;
pub mod serialization;
pub mod storage;
pub mod store;

pub use classify::infer_node_type;
pub use document::{WritingMode, storage_key};
pub use import::{AiGraph, AiLink, AiNode};
pub use model::{
    ConceptLink, ConceptMapState, ConceptNode, LinkId, LinkType, NodeId,
    NodeType, Position, TextSelection,
};
pub use storage::{FileStorage, MemoryStorage, StorageAdapter, StorageError};
pub use store::ConceptStore;
