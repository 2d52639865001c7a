use thiserror::Error;

use crate::options::ListId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("node '{node}' references unknown shared item '{name}'")]
    UnknownSharedItem { node: String, name: String },

    #[error("shared item '{0}' is declared more than once")]
    DuplicateSharedItem(String),

    #[error("no node at path '{0}'")]
    NodeNotFound(String),

    #[error("node '{node}' declares {kind} options over list '{list}'")]
    MismatchedList {
        node: String,
        kind: &'static str,
        list: ListId,
    },
}

pub type Result<T> = std::result::Result<T, ModelError>;
