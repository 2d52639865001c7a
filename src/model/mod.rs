//! Dictionary configuration node tree
//!
//! Nodes live in an arena and are addressed by [`NodeId`]. Every node has a
//! single owner; the roots are either the *parts* of the dictionary view or
//! the *shared items*, named subtrees that other nodes pull in by reference.
//! References are stored as names only and resolved forward through the
//! shared-item table.

pub mod error;
pub mod shared;

use anyhow::Context;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub use error::ModelError;
use error::Result;
pub use shared::{resolve_shared_ancestry, shared_tooltip};

use crate::options::NodeOptions;

pub const DEFAULT_PATH_SEPARATOR: &str = " > ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfigNode {
    pub label: String,
    pub field: Option<String>,
    pub reference: Option<String>,
    pub options: Option<NodeOptions>,
    pub enabled: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl ConfigNode {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Serialized form of a node and its owned subtree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<NodeOptions>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSpec>,
}

fn default_enabled() -> bool {
    true
}

impl NodeSpec {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            enabled: true,
            ..Default::default()
        }
    }

    pub fn with_reference(mut self, name: impl Into<String>) -> Self {
        self.reference = Some(name.into());
        self
    }

    pub fn with_options(mut self, options: NodeOptions) -> Self {
        self.options = Some(options);
        self
    }

    pub fn with_child(mut self, child: NodeSpec) -> Self {
        self.children.push(child);
        self
    }
}

/// On-disk model description
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelFile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub parts: Vec<NodeSpec>,
    #[serde(default)]
    pub shared: Vec<NodeSpec>,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigModel {
    name: String,
    nodes: Vec<ConfigNode>,
    parts: Vec<NodeId>,
    shared: Vec<NodeId>,
    shared_by_name: HashMap<String, NodeId>,
}

impl ConfigModel {
    /// Build the arena from part and shared-item specs, checking that every
    /// reference resolves and that list options match their variant.
    pub fn from_specs(name: impl Into<String>, parts: Vec<NodeSpec>, shared: Vec<NodeSpec>) -> Result<Self> {
        let mut model = ConfigModel {
            name: name.into(),
            ..Default::default()
        };

        for spec in shared {
            if model.shared_by_name.contains_key(&spec.label) {
                return Err(ModelError::DuplicateSharedItem(spec.label));
            }
            let label = spec.label.clone();
            let id = model.add_subtree(spec, None)?;
            model.shared.push(id);
            model.shared_by_name.insert(label, id);
        }

        for spec in parts {
            let id = model.add_subtree(spec, None)?;
            model.parts.push(id);
        }

        for node in &model.nodes {
            if let Some(name) = &node.reference {
                if !model.shared_by_name.contains_key(name) {
                    return Err(ModelError::UnknownSharedItem {
                        node: node.label.clone(),
                        name: name.clone(),
                    });
                }
            }
        }

        debug!(
            "Built model '{}' with {} nodes, {} parts and {} shared items",
            model.name,
            model.nodes.len(),
            model.parts.len(),
            model.shared.len()
        );
        Ok(model)
    }

    fn add_subtree(&mut self, spec: NodeSpec, parent: Option<NodeId>) -> Result<NodeId> {
        if let Some(options) = &spec.options {
            check_options(&spec.label, options)?;
        }

        let id = NodeId(self.nodes.len());
        self.nodes.push(ConfigNode {
            label: spec.label,
            field: spec.field,
            reference: spec.reference,
            options: spec.options,
            enabled: spec.enabled,
            parent,
            children: Vec::new(),
        });

        for child in spec.children {
            let child_id = self.add_subtree(child, Some(id))?;
            self.nodes[id.0].children.push(child_id);
        }
        Ok(id)
    }

    pub fn from_file(file: ModelFile) -> Result<Self> {
        Self::from_specs(file.name, file.parts, file.shared)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        debug!("Loading configuration model from: {:?}", path);
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read model file: {:?}", path))?;
        let file: ModelFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse model file: {:?}", path))?;
        Self::from_file(file).with_context(|| format!("Invalid model file: {:?}", path))
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(&self.to_file()).context("Failed to serialize model to TOML")?;
        fs::write(path, content).with_context(|| format!("Failed to write model file: {:?}", path))?;
        info!("Model '{}' saved to {:?}", self.name, path);
        Ok(())
    }

    pub fn to_file(&self) -> ModelFile {
        ModelFile {
            name: self.name.clone(),
            parts: self.parts.iter().map(|&id| self.to_spec(id)).collect(),
            shared: self.shared.iter().map(|&id| self.to_spec(id)).collect(),
        }
    }

    fn to_spec(&self, id: NodeId) -> NodeSpec {
        let node = self.node(id);
        NodeSpec {
            label: node.label.clone(),
            field: node.field.clone(),
            reference: node.reference.clone(),
            enabled: node.enabled,
            options: node.options.clone(),
            children: node.children.iter().map(|&c| self.to_spec(c)).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &ConfigNode {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut ConfigNode {
        &mut self.nodes[id.0]
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn parts(&self) -> &[NodeId] {
        &self.parts
    }

    pub fn shared_items(&self) -> &[NodeId] {
        &self.shared
    }

    pub fn shared_item(&self, name: &str) -> Option<NodeId> {
        self.shared_by_name.get(name).copied()
    }

    /// The shared item a node's reference points at
    pub fn referenced_item(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)
            .reference
            .as_deref()
            .and_then(|name| self.shared_item(name))
    }

    pub fn is_shared_root(&self, id: NodeId) -> bool {
        self.node(id).parent.is_none() && self.shared.contains(&id)
    }

    /// Walk owners up to the root of the tree the node lives in
    pub fn owning_root(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(parent) = self.node(current).parent {
            current = parent;
        }
        current
    }

    /// Owner chain from the root down to `id`, inclusive
    pub fn owner_chain(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = vec![id];
        let mut current = id;
        while let Some(parent) = self.node(current).parent {
            chain.push(parent);
            current = parent;
        }
        chain.reverse();
        chain
    }

    /// Children as seen in the view: a node with a reference and no
    /// children of its own shows the shared item's children.
    pub fn effective_children(&self, id: NodeId) -> &[NodeId] {
        let node = self.node(id);
        if node.children.is_empty() {
            if let Some(target) = self.referenced_item(id) {
                return &self.node(target).children;
            }
        }
        &node.children
    }

    /// Find a node by its label path, e.g. `Main Entry > Senses > Gloss`.
    /// The first label names a part or a shared item; later labels follow
    /// shared references.
    pub fn find_by_path(&self, path: &str, separator: &str) -> Result<NodeId> {
        let not_found = || ModelError::NodeNotFound(path.to_string());
        let separator = match separator.trim() {
            "" => separator,
            trimmed => trimmed,
        };
        let mut labels = path.split(separator).map(str::trim).filter(|l| !l.is_empty());

        let first = labels.next().ok_or_else(not_found)?;
        let mut current = self
            .parts
            .iter()
            .copied()
            .find(|&id| self.node(id).label == first)
            .or_else(|| self.shared_item(first))
            .ok_or_else(not_found)?;

        for label in labels {
            current = self
                .effective_children(current)
                .iter()
                .copied()
                .find(|&child| self.node(child).label == label)
                .ok_or_else(not_found)?;
        }
        Ok(current)
    }
}

fn check_options(label: &str, options: &NodeOptions) -> Result<()> {
    let mismatch = match options {
        NodeOptions::List(o) => o.list.is_writing_system().then_some(o.list),
        NodeOptions::WritingSystem(o) => (!o.list.is_writing_system()).then_some(o.list),
        _ => None,
    };
    match mismatch {
        Some(list) => Err(ModelError::MismatchedList {
            node: label.to_string(),
            kind: options.kind_name(),
            list,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{ListId, ListOptions, OptionsList, WritingSystemOptions};

    fn sample() -> ConfigModel {
        let parts = vec![
            NodeSpec::new("Main Entry")
                .with_child(NodeSpec::new("Headword"))
                .with_child(NodeSpec::new("Subentries").with_reference("MainEntrySubentries")),
        ];
        let shared = vec![NodeSpec::new("MainEntrySubentries").with_child(NodeSpec::new("Headword"))];
        ConfigModel::from_specs("Lexeme", parts, shared).unwrap()
    }

    #[test]
    fn test_find_by_path_follows_references() {
        let model = sample();
        let id = model.find_by_path("Main Entry > Subentries > Headword", " > ").unwrap();

        assert_eq!(model.owning_root(id), model.shared_item("MainEntrySubentries").unwrap());
        assert!(matches!(
            model.find_by_path("Main Entry > Nope", " > "),
            Err(ModelError::NodeNotFound(_))
        ));
    }

    #[test]
    fn test_unknown_reference_is_rejected() {
        let parts = vec![NodeSpec::new("Main Entry").with_child(NodeSpec::new("Senses").with_reference("Missing"))];
        let err = ConfigModel::from_specs("Lexeme", parts, vec![]).unwrap_err();

        assert_eq!(
            err,
            ModelError::UnknownSharedItem {
                node: "Senses".to_string(),
                name: "Missing".to_string()
            }
        );
    }

    #[test]
    fn test_duplicate_shared_item_is_rejected() {
        let shared = vec![NodeSpec::new("Senses"), NodeSpec::new("Senses")];
        assert_eq!(
            ConfigModel::from_specs("Lexeme", vec![], shared).unwrap_err(),
            ModelError::DuplicateSharedItem("Senses".to_string())
        );
    }

    #[test]
    fn test_mismatched_list_kind_is_rejected() {
        let options = NodeOptions::WritingSystem(WritingSystemOptions {
            list: ListId::Complex,
            options: OptionsList::default(),
            display_abbreviations: false,
        });
        let parts = vec![NodeSpec::new("Main Entry").with_options(options)];
        assert!(matches!(
            ConfigModel::from_specs("Lexeme", parts, vec![]),
            Err(ModelError::MismatchedList { .. })
        ));
    }

    #[test]
    fn test_model_file_round_trip_through_toml() {
        let options = NodeOptions::List(ListOptions {
            list: ListId::Minor,
            options: OptionsList::default(),
            display_each_in_paragraph: true,
        });
        let parts = vec![NodeSpec::new("Minor Entry").with_options(options)];
        let model = ConfigModel::from_specs("Lexeme", parts, vec![]).unwrap();

        let text = toml::to_string_pretty(&model.to_file()).unwrap();
        let file: ModelFile = toml::from_str(&text).unwrap();
        assert_eq!(file, model.to_file());
    }
}
