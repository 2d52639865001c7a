//! The options list engine
//!
//! Merges a node's persisted options list with the catalog for its list type
//! into an ordered list of checkable rows, and applies the check and reorder
//! rules to it:
//!
//! - at least one row stays checked after any edit;
//! - in writing-system lists, default rows and named rows exclude each other;
//! - default rows keep their catalog order at the top of the list and named
//!   rows can never be moved above them.

use log::{debug, warn};
use serde::Serialize;
use std::collections::HashMap;

use super::catalog::{self, CatalogEntry, CatalogSource};
use super::error::{OptionsError, Result};
use super::model::{Direction, DisplayRow, ItemKind, ListId, ListOption, OptionsList};

/// The rows of one list being edited
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionRows {
    list: ListId,
    rows: Vec<DisplayRow>,
}

impl OptionRows {
    /// Build the display rows for `options` against the catalog of `list`.
    pub fn load<S: CatalogSource + ?Sized>(options: &OptionsList, list: ListId, source: &S) -> Result<Self> {
        let entries = catalog::lookup(source, list)?;
        let rows = merge(options, entries, list.is_writing_system());
        debug!(
            "Loaded {} rows for list '{}' ({} persisted options)",
            rows.len(),
            list,
            options.len()
        );
        Ok(Self { list, rows })
    }

    /// Wrap rows that were produced elsewhere. Default rows are moved in
    /// front of named rows, keeping relative order inside each group.
    pub fn from_rows(list: ListId, rows: Vec<DisplayRow>) -> Self {
        let (mut ordered, named): (Vec<_>, Vec<_>) = rows.into_iter().partition(DisplayRow::is_default);
        ordered.extend(named);
        Self { list, rows: ordered }
    }

    pub fn list(&self) -> ListId {
        self.list
    }

    pub fn rows(&self) -> &[DisplayRow] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<DisplayRow> {
        self.rows
    }

    pub fn is_exclusive(&self) -> bool {
        self.list.is_writing_system()
    }

    pub fn get(&self, id: &str) -> Option<&DisplayRow> {
        self.rows.iter().find(|r| r.id == id)
    }

    pub fn checked_ids(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().filter(|r| r.checked).map(|r| r.id.as_str())
    }

    fn index_of(&self, id: &str) -> Result<usize> {
        self.rows
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| OptionsError::UnknownOption(id.to_string()))
    }

    /// Check or uncheck a row.
    ///
    /// Returns `Ok(false)` when nothing changed: the row already had the
    /// requested state, or unchecking it would leave no row checked.
    pub fn set_checked(&mut self, id: &str, checked: bool) -> Result<bool> {
        let index = self.index_of(id)?;
        if self.rows[index].checked == checked {
            return Ok(false);
        }

        if !checked {
            let checked_count = self.rows.iter().filter(|r| r.checked).count();
            if checked_count <= 1 {
                debug!("Ignoring uncheck of '{}': it is the only checked option", id);
                return Ok(false);
            }
            self.rows[index].checked = false;
            return Ok(true);
        }

        if self.is_exclusive() {
            let kind = self.rows[index].kind;
            for row in self.rows.iter_mut().filter(|r| r.kind != kind && r.checked) {
                debug!("Unchecking '{}' in favour of '{}'", row.id, id);
                row.checked = false;
            }
        }
        self.rows[index].checked = true;
        Ok(true)
    }

    /// Swap a named row with its neighbour. Fails without changing anything
    /// if the row is a default row, is already at that end of the list, or
    /// would land above a default row.
    pub fn reorder(&mut self, id: &str, direction: Direction) -> Result<()> {
        let index = self.index_of(id)?;
        let out_of_range = |reason| OptionsError::OutOfRange {
            id: id.to_string(),
            direction,
            reason,
        };

        if self.rows[index].kind == ItemKind::Default {
            return Err(out_of_range("default items have a fixed position"));
        }

        let neighbour = match direction {
            Direction::Up => index.checked_sub(1).ok_or_else(|| out_of_range("already at the top"))?,
            Direction::Down => {
                if index + 1 >= self.rows.len() {
                    return Err(out_of_range("already at the bottom"));
                }
                index + 1
            }
        };

        if self.rows[neighbour].kind == ItemKind::Default {
            return Err(out_of_range("named items cannot move above default items"));
        }

        self.rows.swap(index, neighbour);
        Ok(())
    }

    /// Derive the list to persist. Writing-system lists keep only checked
    /// rows; other lists keep every row so unchecked items stay excluded
    /// after a reload.
    pub fn to_options_list(&self) -> OptionsList {
        let options = if self.is_exclusive() {
            self.rows
                .iter()
                .filter(|r| r.checked)
                .map(|r| ListOption::enabled(r.id.clone()))
                .collect()
        } else {
            self.rows
                .iter()
                .map(|r| ListOption::new(r.id.clone(), r.checked))
                .collect()
        };
        OptionsList::new(options)
    }
}

fn merge(options: &OptionsList, entries: &[CatalogEntry], exclusive: bool) -> Vec<DisplayRow> {
    let by_id: HashMap<&str, &CatalogEntry> = entries.iter().map(|e| (e.id.as_str(), e)).collect();

    for option in options.options() {
        if !by_id.contains_key(option.id.as_str()) {
            warn!("Dropping option '{}': not in the catalog", option.id);
        }
    }

    let persisted_enabled = |kind: ItemKind| {
        options
            .options()
            .iter()
            .filter(|o| o.enabled)
            .any(|o| by_id.get(o.id.as_str()).is_some_and(|e| e.kind == kind))
    };
    let has_enabled_default = persisted_enabled(ItemKind::Default);
    let has_enabled_named = persisted_enabled(ItemKind::Named);

    // Unseen catalog entries default to checked, except where that would
    // put a default and a named row of a writing-system list on together.
    let unseen_checked = |kind: ItemKind| {
        if !exclusive {
            return true;
        }
        match kind {
            ItemKind::Default => !has_enabled_named,
            ItemKind::Named => !has_enabled_default,
        }
    };

    let row = |entry: &CatalogEntry, checked: bool| DisplayRow {
        id: entry.id.clone(),
        label: entry.label.clone(),
        kind: entry.kind,
        checked,
    };

    let mut rows: Vec<DisplayRow> = entries
        .iter()
        .filter(|e| e.kind == ItemKind::Default)
        .map(|e| match options.get(&e.id) {
            Some(option) => row(e, option.enabled),
            None => row(e, unseen_checked(ItemKind::Default)),
        })
        .collect();

    rows.extend(options.options().iter().filter_map(|option| {
        by_id
            .get(option.id.as_str())
            .filter(|e| e.kind == ItemKind::Named)
            .map(|e| row(*e, option.enabled))
    }));

    rows.extend(
        entries
            .iter()
            .filter(|e| e.kind == ItemKind::Named && options.get(&e.id).is_none())
            .map(|e| row(e, unseen_checked(ItemKind::Named))),
    );

    // Defaults win whenever both kinds end up checked.
    let any_checked = |default: bool| rows.iter().any(|r| r.is_default() == default && r.checked);
    if exclusive && any_checked(true) && any_checked(false) {
        if has_enabled_default && has_enabled_named {
            warn!("Persisted list enables both default and named writing systems; keeping the defaults");
        }
        for r in rows.iter_mut().filter(|r| !r.is_default()) {
            r.checked = false;
        }
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::catalog::Catalog;
    use crate::writing_system::WritingSystem;
    use uuid::Uuid;

    fn ws_catalog(tags: &[&str]) -> Catalog {
        let systems: Vec<_> = tags.iter().map(|t| WritingSystem::new(*t, *t).unwrap()).collect();
        Catalog::new().with_writing_systems(ListId::Vernacular, &systems)
    }

    fn ids(rows: &OptionRows) -> Vec<&str> {
        rows.rows().iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_merge_drops_unknown_ids() {
        let catalog = ws_catalog(&["fr"]);
        let list = OptionsList::new(vec![ListOption::enabled("xx"), ListOption::enabled("fr")]);
        let rows = OptionRows::load(&list, ListId::Vernacular, &catalog).unwrap();

        assert_eq!(ids(&rows), vec!["vernacular", "fr"]);
        assert!(!rows.get("vernacular").unwrap().checked);
        assert!(rows.get("fr").unwrap().checked);
    }

    #[test]
    fn test_empty_writing_system_list_prefers_defaults() {
        let catalog = ws_catalog(&["fr", "en"]);
        let rows = OptionRows::load(&OptionsList::default(), ListId::Vernacular, &catalog).unwrap();

        assert_eq!(rows.checked_ids().collect::<Vec<_>>(), vec!["vernacular"]);
    }

    #[test]
    fn test_enabled_default_leaves_unseen_named_unchecked() {
        let catalog = ws_catalog(&["fr", "en"]);
        let list = OptionsList::new(vec![ListOption::enabled("vernacular")]);
        let rows = OptionRows::load(&list, ListId::Vernacular, &catalog).unwrap();

        assert_eq!(rows.checked_ids().collect::<Vec<_>>(), vec!["vernacular"]);
    }

    #[test]
    fn test_persisted_default_and_named_both_enabled_keeps_defaults() {
        let catalog = ws_catalog(&["fr", "en"]);
        let list = OptionsList::new(vec![ListOption::enabled("fr"), ListOption::enabled("vernacular")]);
        let mut rows = OptionRows::load(&list, ListId::Vernacular, &catalog).unwrap();

        assert_eq!(rows.checked_ids().collect::<Vec<_>>(), vec!["vernacular"]);
        assert_eq!(rows.set_checked("fr", true), Ok(true));
        assert_eq!(rows.checked_ids().collect::<Vec<_>>(), vec!["fr"]);
    }

    #[test]
    fn test_persisted_default_position_is_ignored() {
        let catalog = Catalog::new().with_writing_systems(
            ListId::VernacularAndAnalysis,
            &[WritingSystem::new("fr", "French").unwrap()],
        );
        let list = OptionsList::new(vec![
            ListOption::enabled("fr"),
            ListOption::disabled("analysis"),
            ListOption::disabled("vernacular"),
        ]);
        let rows = OptionRows::load(&list, ListId::VernacularAndAnalysis, &catalog).unwrap();

        assert_eq!(ids(&rows), vec!["vernacular", "analysis", "fr"]);
    }

    #[test]
    fn test_general_list_round_trips_exclusions() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let catalog = Catalog::new().with_list(ListId::Minor, [(a, "A"), (b, "B")]);
        let list = OptionsList::new(vec![ListOption::disabled(b.to_string()), ListOption::enabled(a.to_string())]);

        let rows = OptionRows::load(&list, ListId::Minor, &catalog).unwrap();
        let persisted = rows.to_options_list();

        assert_eq!(persisted, list);
    }

    #[test]
    fn test_from_rows_moves_defaults_first() {
        let row = |id: &str, kind| DisplayRow {
            id: id.to_string(),
            label: id.to_string(),
            kind,
            checked: true,
        };
        let rows = OptionRows::from_rows(
            ListId::Analysis,
            vec![row("en", ItemKind::Named), row("analysis", ItemKind::Default)],
        );
        assert_eq!(ids(&rows), vec!["analysis", "en"]);
    }

    #[test]
    fn test_unknown_target() {
        let catalog = ws_catalog(&["fr"]);
        let mut rows = OptionRows::load(&OptionsList::default(), ListId::Vernacular, &catalog).unwrap();

        assert_eq!(
            rows.set_checked("zz", true),
            Err(OptionsError::UnknownOption("zz".to_string()))
        );
        assert!(matches!(
            rows.reorder("zz", Direction::Up),
            Err(OptionsError::UnknownOption(_))
        ));
    }
}
