// crates/sprig-core/src/lib.rs
pub mod components;
pub mod input;
pub mod node;
pub mod spec;
pub mod tree;

pub use components::*;
pub use input::*;
pub use node::*;
pub use spec::*;
pub use tree::*;

#[derive(Debug, thiserror::Error)]
pub enum SprigError {
    #[error("Unknown node: {0}")]
    UnknownNode(NodeId),

    #[error("The root only accepts nooks, modals and rooms, got a {0}")]
    InvalidRootChild(String),

    #[error("Attaching {child} under {parent} would create a cycle")]
    Cycle { parent: NodeId, child: NodeId },

    #[error("Tree integrity violated: {0}")]
    Integrity(String),
}

pub type Result<T> = std::result::Result<T, SprigError>;
