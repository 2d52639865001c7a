//! Editing session for one configuration node's options

use log::{debug, info};

use crate::model::{ConfigModel, NodeId, shared_tooltip};
use crate::options::error::{OptionsError, Result};
use crate::options::{CatalogSource, Direction, DisplayRow, NodeOptions, OptionRows};

/// Binds a node, runs edits through the options engine and writes the
/// result back on commit. Dropping the controller discards the edits.
#[derive(Debug, Clone)]
pub struct DetailsController {
    node: NodeId,
    label: String,
    rows: Option<OptionRows>,
    tooltip: Option<String>,
    dirty: bool,
}

impl DetailsController {
    pub fn open<S: CatalogSource + ?Sized>(
        model: &ConfigModel,
        node: NodeId,
        catalogs: &S,
        separator: &str,
    ) -> Result<Self> {
        let config_node = model.node(node);
        let rows = match config_node.options.as_ref().and_then(NodeOptions::list) {
            Some((list_id, list)) => Some(OptionRows::load(list, list_id, catalogs)?),
            None => None,
        };

        debug!(
            "Opened details for '{}' ({})",
            config_node.label,
            config_node
                .options
                .as_ref()
                .map_or("no options", NodeOptions::kind_name)
        );

        Ok(Self {
            node,
            label: config_node.label.clone(),
            rows,
            tooltip: shared_tooltip(model, node, separator),
            dirty: false,
        })
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn rows(&self) -> &[DisplayRow] {
        self.rows.as_ref().map(OptionRows::rows).unwrap_or_default()
    }

    pub fn has_list(&self) -> bool {
        self.rows.is_some()
    }

    pub fn tooltip(&self) -> Option<&str> {
        self.tooltip.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn rows_mut(&mut self) -> Result<&mut OptionRows> {
        let label = &self.label;
        self.rows
            .as_mut()
            .ok_or_else(|| OptionsError::NoListOptions(label.clone()))
    }

    pub fn set_checked(&mut self, id: &str, checked: bool) -> Result<bool> {
        let changed = self.rows_mut()?.set_checked(id, checked)?;
        self.dirty |= changed;
        Ok(changed)
    }

    pub fn reorder(&mut self, id: &str, direction: Direction) -> Result<()> {
        self.rows_mut()?.reorder(id, direction)?;
        self.dirty = true;
        Ok(())
    }

    /// Replace the node's persisted list with the edited one
    pub fn commit(self, model: &mut ConfigModel) -> bool {
        let Some(rows) = self.rows else {
            return false;
        };
        if !self.dirty {
            return false;
        }

        let list = rows.to_options_list();
        let committed = model
            .node_mut(self.node)
            .options
            .as_mut()
            .is_some_and(|options| options.replace_list(list));
        if committed {
            info!("Committed options for '{}'", self.label);
        }
        committed
    }
}
