//! Blitz core: page trees and the edits made to them
//!
//! - [`tree`]: the recursive UI-definition tree and path identifiers
//! - [`reducer`]: pure tree-to-tree transformations for every [`Action`]
//! - [`store`]: single-writer container committing reducer results
//! - [`registry`]: reusable component templates for reference placeholders
//! - [`render`]: flattened rows and edit controls for editors
//! - [`storage`]: the persistence seam and an in-memory backend

pub mod error;
pub mod reducer;
pub mod registry;
pub mod render;
pub mod storage;
pub mod store;
pub mod tree;

pub use error::{TreeError, TreeResult};
pub use reducer::{apply, try_apply, Action, NEW_CHILD_VALUE};
pub use registry::{
    Registry, RegistryBuilder, RegistryError, RegistryResult, TemplateRegistry,
    TemplateRegistryBuilder,
};
pub use render::{render_outline, render_rows, Control, RenderedRow};
pub use storage::{InMemoryPageStore, PageRecord, PageStore, StoreError, StoreResult};
pub use store::{DispatchOutcome, ResolveReport, TreeStore, UnresolvedReference};
pub use tree::{
    Children, DisplayType, IndexEntry, Input, Layout, Node, NodeKind, NodePath, Page, PathIndex,
    Reference, Selector, Title, validate_id, PATH_SEPARATOR,
};
