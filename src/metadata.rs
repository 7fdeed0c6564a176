//! Metadata domain: front-matter values, tree rows, and the tree provider.

pub mod cache;
pub mod decorate;
pub mod flatten;
pub mod node;
pub mod provider;
pub mod value;

pub use cache::{
    ActiveDocument, ActiveDocumentSlot, DocumentMetadata, DocumentUri, FileInfo,
    InMemoryMetadataCache, MetadataCache,
};
pub use flatten::{parse_object_tree, FlattenOptions};
pub use node::{Collapsible, MetadataNode, NodeIcon};
pub use provider::{MetadataTreeProvider, Navigator, Position, Selection, TreeChanged, TreeViewHost};
pub use value::{MetaValue, Scalar};
