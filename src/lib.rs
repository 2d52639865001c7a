pub mod config;
pub mod details;
pub mod model;
pub mod options;
pub mod reversal;
pub mod writing_system;

pub use details::DetailsController;
pub use model::{ConfigModel, NodeId, NodeSpec};
pub use options::{Catalog, Direction, DisplayRow, ItemKind, ListId, ListOption, OptionRows, OptionsList};
