use crate::tree::NodeKind;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("node ids must not be empty")]
    EmptyId,

    #[error("duplicate node id: {id}")]
    DuplicateId { id: String },

    #[error("tree entry point `{id}` must have type `root` (found `{kind}`)")]
    RootKind { id: String, kind: NodeKind },

    #[error("node `{id}` has type `root` but is not the tree entry point")]
    NestedRoot { id: String },

    #[error("tree document JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
