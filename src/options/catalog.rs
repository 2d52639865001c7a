//! Catalogs of selectable items for each list type
//!
//! A catalog is the full set of items a node's options list may refer to,
//! in display order, each classified as a fixed default entry or a named
//! entry. Writing-system catalogs start with the "any vernacular"/"any
//! analysis" style defaults; complex-form and variant type catalogs start
//! with an "unspecified" sentinel entry.

use anyhow::{Context, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::Path;
use uuid::Uuid;

use super::error::OptionsError;
use super::model::{ItemKind, ListId};
use crate::writing_system::WritingSystem;

/// Stable id of the "unspecified complex form type" sentinel
pub const UNSPECIFIED_COMPLEX_FORM_TYPE: Uuid = Uuid::from_u128(0x2e6f_1d62_7f4e_4c1a_9b0d_5a3e_c8f1_0001);
/// Stable id of the "unspecified variant type" sentinel
pub const UNSPECIFIED_VARIANT_TYPE: Uuid = Uuid::from_u128(0x2e6f_1d62_7f4e_4c1a_9b0d_5a3e_c8f1_0002);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub label: String,
    pub kind: ItemKind,
}

impl CatalogEntry {
    pub fn default_item(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind: ItemKind::Default,
        }
    }

    pub fn named(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind: ItemKind::Named,
        }
    }
}

/// Anything that can supply the catalog for a list type
pub trait CatalogSource {
    fn entries(&self, list: ListId) -> Option<&[CatalogEntry]>;
}

/// Resolve the catalog for `list`, failing for the not-applicable sentinel
/// and for list types the source does not know.
pub fn lookup<S: CatalogSource + ?Sized>(source: &S, list: ListId) -> Result<&[CatalogEntry], OptionsError> {
    if list == ListId::NotApplicable {
        return Err(OptionsError::InvalidListId(list.to_string()));
    }
    source
        .entries(list)
        .ok_or_else(|| OptionsError::InvalidListId(list.to_string()))
}

/// The fixed entries every writing-system list of the given type starts with
pub fn writing_system_defaults(list: ListId) -> Vec<CatalogEntry> {
    match list {
        ListId::Vernacular => vec![CatalogEntry::default_item("vernacular", "Default Vernacular")],
        ListId::Analysis => vec![CatalogEntry::default_item("analysis", "Default Analysis")],
        ListId::VernacularAndAnalysis => vec![
            CatalogEntry::default_item("vernacular", "Default Vernacular"),
            CatalogEntry::default_item("analysis", "Default Analysis"),
        ],
        ListId::Pronunciation => vec![CatalogEntry::default_item("pronunciation", "Default Pronunciation")],
        ListId::Reversal => vec![CatalogEntry::default_item("reversal", "Default Reversal")],
        _ => Vec::new(),
    }
}

fn unspecified_sentinel(list: ListId) -> Option<CatalogEntry> {
    match list {
        ListId::Complex => Some(CatalogEntry::named(
            UNSPECIFIED_COMPLEX_FORM_TYPE.to_string(),
            "<Unspecified Complex Form Type>",
        )),
        ListId::Variant => Some(CatalogEntry::named(
            UNSPECIFIED_VARIANT_TYPE.to_string(),
            "<Unspecified Variant Type>",
        )),
        _ => None,
    }
}

/// Keep the first entry for each id
fn unique_entries(list: ListId, entries: Vec<CatalogEntry>) -> Vec<CatalogEntry> {
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter(|entry| {
            let first = seen.insert(entry.id.clone());
            if !first {
                warn!("Dropping duplicate catalog entry '{}' in list '{}'", entry.id, list);
            }
            first
        })
        .collect()
}

/// In-memory catalog keyed by list type
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    lists: HashMap<ListId, Vec<CatalogEntry>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register raw entries for a list type, replacing any previous ones.
    /// Entries repeating an earlier id are dropped.
    pub fn insert(&mut self, list: ListId, entries: Vec<CatalogEntry>) -> &mut Self {
        self.lists.insert(list, unique_entries(list, entries));
        self
    }

    /// Register a general list from possibility-list items. Complex-form and
    /// variant lists get their "unspecified" sentinel in front.
    pub fn with_list<I, S>(mut self, list: ListId, items: I) -> Self
    where
        I: IntoIterator<Item = (Uuid, S)>,
        S: Into<String>,
    {
        let mut entries: Vec<CatalogEntry> = unspecified_sentinel(list).into_iter().collect();
        entries.extend(
            items
                .into_iter()
                .map(|(id, label)| CatalogEntry::named(id.to_string(), label)),
        );
        self.insert(list, entries);
        self
    }

    /// Register a writing-system list: the type's defaults, then one named
    /// entry per writing system in the order given.
    pub fn with_writing_systems(mut self, list: ListId, writing_systems: &[WritingSystem]) -> Self {
        let mut entries = writing_system_defaults(list);
        entries.extend(
            writing_systems
                .iter()
                .map(|ws| CatalogEntry::named(ws.tag(), ws.name())),
        );
        self.insert(list, entries);
        self
    }

    pub fn list_ids(&self) -> impl Iterator<Item = ListId> + '_ {
        self.lists.keys().copied()
    }

    /// Load a catalog description from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading catalog from: {:?}", path);
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file: {:?}", path))?;
        Self::from_toml(&content).with_context(|| format!("Failed to parse catalog file: {:?}", path))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(content).context("Invalid catalog TOML")?;
        file.into_catalog()
    }
}

impl CatalogSource for Catalog {
    fn entries(&self, list: ListId) -> Option<&[CatalogEntry]> {
        self.lists.get(&list).map(Vec::as_slice)
    }
}

/// On-disk catalog description
#[derive(Debug, Default, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    vernacular: Vec<WritingSystem>,
    #[serde(default)]
    analysis: Vec<WritingSystem>,
    #[serde(default)]
    pronunciation: Vec<WritingSystem>,
    #[serde(default)]
    lists: BTreeMap<String, Vec<ListItem>>,
}

#[derive(Debug, Deserialize)]
struct ListItem {
    id: Uuid,
    label: String,
}

impl CatalogFile {
    fn into_catalog(self) -> Result<Catalog> {
        let mut both = self.vernacular.clone();
        both.extend(
            self.analysis
                .iter()
                .filter(|ws| !self.vernacular.iter().any(|v| v.tag() == ws.tag()))
                .cloned(),
        );

        let mut catalog = Catalog::new()
            .with_writing_systems(ListId::Vernacular, &self.vernacular)
            .with_writing_systems(ListId::Analysis, &self.analysis)
            .with_writing_systems(ListId::VernacularAndAnalysis, &both)
            .with_writing_systems(ListId::Pronunciation, &self.pronunciation)
            .with_writing_systems(ListId::Reversal, &self.analysis);

        for (name, items) in self.lists {
            let list: ListId = name.parse()?;
            if list.is_writing_system() || list == ListId::NotApplicable {
                anyhow::bail!("'{}' cannot be declared as a general list", name);
            }
            catalog = catalog.with_list(list, items.into_iter().map(|item| (item.id, item.label)));
        }

        debug!("Catalog has {} list types", catalog.lists.len());
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ws(tag: &str) -> WritingSystem {
        WritingSystem::new(tag, tag).unwrap()
    }

    #[test]
    fn test_writing_system_catalog_puts_defaults_first() {
        let catalog = Catalog::new().with_writing_systems(ListId::VernacularAndAnalysis, &[ws("fr"), ws("en")]);
        let entries = lookup(&catalog, ListId::VernacularAndAnalysis).unwrap();

        let ids: Vec<_> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["vernacular", "analysis", "fr", "en"]);
        assert_eq!(entries[1].kind, ItemKind::Default);
        assert_eq!(entries[2].kind, ItemKind::Named);
    }

    #[test]
    fn test_complex_list_gets_unspecified_sentinel() {
        let compound = Uuid::new_v4();
        let catalog = Catalog::new().with_list(ListId::Complex, [(compound, "Compound")]);
        let entries = lookup(&catalog, ListId::Complex).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, UNSPECIFIED_COMPLEX_FORM_TYPE.to_string());
        assert_eq!(entries[0].kind, ItemKind::Named);
        assert_eq!(entries[1].id, compound.to_string());
    }

    #[test]
    fn test_lookup_rejects_unknown_and_not_applicable() {
        let catalog = Catalog::new().with_list(ListId::Note, Vec::<(Uuid, String)>::new());

        assert_eq!(
            lookup(&catalog, ListId::NotApplicable),
            Err(OptionsError::InvalidListId("not_applicable".to_string()))
        );
        assert_eq!(
            lookup(&catalog, ListId::Minor),
            Err(OptionsError::InvalidListId("minor".to_string()))
        );
        assert!(lookup(&catalog, ListId::Note).unwrap().is_empty());
    }

    #[test]
    fn test_catalog_from_toml() {
        let catalog = Catalog::from_toml(
            r#"
            vernacular = [{ tag = "seh", name = "Sena" }]
            analysis = [{ tag = "en", name = "English" }, { tag = "pt" }]

            [lists]
            variant = [{ id = "4343b1ef-b54f-4fa4-9998-271319a6d74c", label = "Dialectal Variant" }]
            "#,
        )
        .unwrap();

        let reversal = lookup(&catalog, ListId::Reversal).unwrap();
        assert_eq!(reversal.len(), 3);
        assert_eq!(reversal[2].label, "pt");

        let both = lookup(&catalog, ListId::VernacularAndAnalysis).unwrap();
        assert_eq!(both.len(), 5);

        let variant = lookup(&catalog, ListId::Variant).unwrap();
        assert_eq!(variant[1].label, "Dialectal Variant");
    }

    #[test]
    fn test_duplicate_ids_keep_first_entry() {
        let catalog = Catalog::from_toml(
            r#"
            vernacular = [{ tag = "fr", name = "French" }, { tag = "fr", name = "French again" }]
            analysis = [{ tag = "fr", name = "Francais" }, { tag = "en" }]
            "#,
        )
        .unwrap();

        let vernacular = lookup(&catalog, ListId::Vernacular).unwrap();
        assert_eq!(vernacular.len(), 2);
        assert_eq!(vernacular[1].label, "French");

        let both: Vec<_> = lookup(&catalog, ListId::VernacularAndAnalysis)
            .unwrap()
            .iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(both, vec!["vernacular", "analysis", "fr", "en"]);
    }

    #[test]
    fn test_duplicate_list_item_ids_are_dropped() {
        let id = Uuid::new_v4();
        let catalog = Catalog::new().with_list(ListId::Note, [(id, "Note"), (id, "Other note")]);
        let entries = lookup(&catalog, ListId::Note).unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].label, "Note");
    }

    #[test]
    fn test_catalog_rejects_writing_system_as_general_list() {
        let result = Catalog::from_toml(
            r#"
            [lists]
            analysis = []
            "#,
        );
        assert!(result.is_err());
    }
}
