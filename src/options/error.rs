//! Error types for the options engine

use thiserror::Error;

use super::model::Direction;

/// Errors raised while loading or editing a node's list options.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionsError {
    /// The requested catalog/list type is not recognised
    #[error("invalid list id: {0}")]
    InvalidListId(String),

    /// A reorder request that would move a row out of its allowed range
    #[error("cannot move '{id}' {direction}: {reason}")]
    OutOfRange {
        id: String,
        direction: Direction,
        reason: &'static str,
    },

    /// The target row is not part of the loaded list
    #[error("no option with id '{0}' in this list")]
    UnknownOption(String),

    /// The node being edited has no list-type options
    #[error("node '{0}' has no list options")]
    NoListOptions(String),
}

pub type Result<T> = std::result::Result<T, OptionsError>;
