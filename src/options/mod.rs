pub mod catalog;
pub mod engine;
pub mod error;
pub mod model;

pub use catalog::{Catalog, CatalogEntry, CatalogSource};
pub use engine::OptionRows;
pub use error::OptionsError;
pub use model::{
    Direction, DisplayRow, GroupingOptions, ItemKind, ListId, ListOption, ListOptions, NodeOptions,
    OptionsList, ParagraphOptions, SenseOptions, WritingSystemOptions,
};
