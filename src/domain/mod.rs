//! Domain layer: form-tree model, generation, removal and rendering
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod catalog;
pub mod entities;
pub mod error;
pub mod generator;
pub mod hyperparams;
pub mod identifier;
pub mod prose;
pub mod removal;
pub mod sampler;
pub mod serialize;
pub mod traversal;

pub use arena::{FormTree, NodeKind, TreeNode};
pub use catalog::{CatalogKind, Component, ComponentCatalog, PropertyKey};
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use generator::FormGenerator;
pub use hyperparams::{HyperParameters, LengthRange};
pub use identifier::{is_valid_identifier, IdentifierAllocator};
pub use prose::{context_bullets, describe_removal_context, to_prose};
pub use removal::{Removal, MAX_REMOVAL_ATTEMPTS};
pub use sampler::ValueSampler;
pub use serialize::to_text;
pub use traversal::traverse_dfs;
