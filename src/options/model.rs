//! Option, list and row types shared by the engine, the catalog and the
//! configuration model

use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use super::error::OptionsError;

/// A persisted, user-toggleable entry in a node's options list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListOption {
    pub id: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl ListOption {
    pub fn new(id: impl Into<String>, enabled: bool) -> Self {
        Self {
            id: id.into(),
            enabled,
        }
    }

    pub fn enabled(id: impl Into<String>) -> Self {
        Self::new(id, true)
    }

    pub fn disabled(id: impl Into<String>) -> Self {
        Self::new(id, false)
    }
}

/// Ordered sequence of options, unique by id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<ListOption>", into = "Vec<ListOption>")]
pub struct OptionsList {
    options: Vec<ListOption>,
}

impl OptionsList {
    /// Build a list, keeping the first occurrence of any duplicated id
    pub fn new(options: Vec<ListOption>) -> Self {
        let mut seen = HashSet::new();
        let mut unique = Vec::with_capacity(options.len());
        for option in options {
            if seen.insert(option.id.clone()) {
                unique.push(option);
            } else {
                warn!("Dropping duplicate option '{}'", option.id);
            }
        }
        Self { options: unique }
    }

    pub fn options(&self) -> &[ListOption] {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ListOption> {
        self.options.iter().find(|o| o.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.options.iter().position(|o| o.id == id)
    }

    pub fn enabled_ids(&self) -> impl Iterator<Item = &str> {
        self.options
            .iter()
            .filter(|o| o.enabled)
            .map(|o| o.id.as_str())
    }
}

impl From<Vec<ListOption>> for OptionsList {
    fn from(options: Vec<ListOption>) -> Self {
        Self::new(options)
    }
}

impl From<OptionsList> for Vec<ListOption> {
    fn from(list: OptionsList) -> Self {
        list.options
    }
}

/// Whether a row is a fixed system entry or a reorderable named entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Default,
    Named,
}

/// One row of the checkable list shown to the user. Rebuilt on every load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayRow {
    pub id: String,
    pub label: String,
    pub kind: ItemKind,
    pub checked: bool,
}

impl DisplayRow {
    pub fn is_default(&self) -> bool {
        self.kind == ItemKind::Default
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// Identifies which catalog a list draws its items from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListId {
    NotApplicable,
    Sense,
    Entry,
    Minor,
    Complex,
    Variant,
    Note,
    Vernacular,
    Analysis,
    VernacularAndAnalysis,
    Pronunciation,
    Reversal,
}

impl ListId {
    pub const ALL: [ListId; 12] = [
        ListId::NotApplicable,
        ListId::Sense,
        ListId::Entry,
        ListId::Minor,
        ListId::Complex,
        ListId::Variant,
        ListId::Note,
        ListId::Vernacular,
        ListId::Analysis,
        ListId::VernacularAndAnalysis,
        ListId::Pronunciation,
        ListId::Reversal,
    ];

    /// Writing-system lists make default and named rows mutually exclusive
    pub fn is_writing_system(self) -> bool {
        matches!(
            self,
            ListId::Vernacular
                | ListId::Analysis
                | ListId::VernacularAndAnalysis
                | ListId::Pronunciation
                | ListId::Reversal
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ListId::NotApplicable => "not_applicable",
            ListId::Sense => "sense",
            ListId::Entry => "entry",
            ListId::Minor => "minor",
            ListId::Complex => "complex",
            ListId::Variant => "variant",
            ListId::Note => "note",
            ListId::Vernacular => "vernacular",
            ListId::Analysis => "analysis",
            ListId::VernacularAndAnalysis => "vernacular_and_analysis",
            ListId::Pronunciation => "pronunciation",
            ListId::Reversal => "reversal",
        }
    }
}

impl fmt::Display for ListId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListId {
    type Err = OptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        ListId::ALL
            .into_iter()
            .find(|id| id.as_str() == normalized)
            .ok_or_else(|| OptionsError::InvalidListId(s.to_string()))
    }
}

/// Options for a node whose content is a selection from a general list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListOptions {
    pub list: ListId,
    #[serde(default)]
    pub options: OptionsList,
    #[serde(default)]
    pub display_each_in_paragraph: bool,
}

/// Options for a node filtered by writing system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WritingSystemOptions {
    pub list: ListId,
    #[serde(default)]
    pub options: OptionsList,
    #[serde(default)]
    pub display_abbreviations: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenseOptions {
    #[serde(default = "default_numbering_style")]
    pub numbering_style: String,
    #[serde(default)]
    pub number_before: String,
    #[serde(default = "default_number_after")]
    pub number_after: String,
    #[serde(default)]
    pub number_even_a_single_sense: bool,
    #[serde(default)]
    pub show_shared_grammatical_info: bool,
    #[serde(default)]
    pub display_each_sense_in_paragraph: bool,
}

fn default_numbering_style() -> String {
    "%d".to_string()
}

fn default_number_after() -> String {
    ") ".to_string()
}

impl Default for SenseOptions {
    fn default() -> Self {
        Self {
            numbering_style: default_numbering_style(),
            number_before: String::new(),
            number_after: default_number_after(),
            number_even_a_single_sense: false,
            show_shared_grammatical_info: false,
            display_each_sense_in_paragraph: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupingOptions {
    #[serde(default)]
    pub display_each_in_paragraph: bool,
    #[serde(default)]
    pub display_group_in_paragraph: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParagraphOptions {
    #[serde(default)]
    pub paragraph_style: Option<String>,
    #[serde(default)]
    pub continuation_style: Option<String>,
}

/// The options object a configuration node may declare
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeOptions {
    List(ListOptions),
    WritingSystem(WritingSystemOptions),
    Sense(SenseOptions),
    Grouping(GroupingOptions),
    Paragraph(ParagraphOptions),
}

impl NodeOptions {
    pub fn kind_name(&self) -> &'static str {
        match self {
            NodeOptions::List(_) => "list",
            NodeOptions::WritingSystem(_) => "writing_system",
            NodeOptions::Sense(_) => "sense",
            NodeOptions::Grouping(_) => "grouping",
            NodeOptions::Paragraph(_) => "paragraph",
        }
    }

    /// The list id and persisted list, for the variants that carry one
    pub fn list(&self) -> Option<(ListId, &OptionsList)> {
        match self {
            NodeOptions::List(o) => Some((o.list, &o.options)),
            NodeOptions::WritingSystem(o) => Some((o.list, &o.options)),
            _ => None,
        }
    }

    /// Replace the persisted list wholesale. Returns false for variants
    /// without a list.
    pub fn replace_list(&mut self, options: OptionsList) -> bool {
        match self {
            NodeOptions::List(o) => {
                o.options = options;
                true
            }
            NodeOptions::WritingSystem(o) => {
                o.options = options;
                true
            }
            _ => false,
        }
    }
}
