//! Shared-ancestry resolution
//!
//! When a node's content comes from a shared item, editing its options
//! changes every place that shared item is shown. These functions list
//! those places as label paths so the user can be told about them.

use log::debug;
use std::collections::{HashMap, HashSet};

use super::{ConfigModel, NodeId};

/// Shared item → nodes referencing it, in arena order. Built once per query.
type ReferenceIndex = HashMap<NodeId, Vec<NodeId>>;

fn build_reference_index(model: &ConfigModel) -> ReferenceIndex {
    let mut index: ReferenceIndex = HashMap::new();
    for id in model.node_ids() {
        if let Some(target) = model.referenced_item(id) {
            index.entry(target).or_default().push(id);
        }
    }
    index
}

/// Expands a node into every label path it is displayed at
struct PathResolver<'a> {
    model: &'a ConfigModel,
    index: ReferenceIndex,
    expanded: HashMap<NodeId, Vec<Vec<String>>>,
    in_progress: HashSet<NodeId>,
}

impl<'a> PathResolver<'a> {
    fn new(model: &'a ConfigModel) -> Self {
        Self {
            model,
            index: build_reference_index(model),
            expanded: HashMap::new(),
            in_progress: HashSet::new(),
        }
    }

    fn referrers(&self, shared: NodeId) -> Vec<NodeId> {
        self.index.get(&shared).cloned().unwrap_or_default()
    }

    fn paths_to(&mut self, id: NodeId, depth: usize) -> Vec<Vec<String>> {
        let chain = self.model.owner_chain(id);
        let root = chain[0];

        if !self.model.is_shared_root(root) {
            return vec![chain.iter().map(|&n| self.model.node(n).label.clone()).collect()];
        }

        let below_root: Vec<String> = chain[1..]
            .iter()
            .map(|&n| self.model.node(n).label.clone())
            .collect();

        self.shared_prefixes(root, depth)
            .into_iter()
            .map(|mut prefix| {
                prefix.extend(below_root.iter().cloned());
                prefix
            })
            .collect()
    }

    /// Every path at which the shared item `root` is displayed. Each shared
    /// item is expanded once; a reference back into an item that is still
    /// being expanded contributes nothing.
    fn shared_prefixes(&mut self, root: NodeId, depth: usize) -> Vec<Vec<String>> {
        if let Some(done) = self.expanded.get(&root) {
            return done.clone();
        }
        if depth > self.model.len() || !self.in_progress.insert(root) {
            return Vec::new();
        }

        let mut prefixes = Vec::new();
        for referrer in self.referrers(root) {
            prefixes.extend(self.paths_to(referrer, depth + 1));
        }

        self.in_progress.remove(&root);
        self.expanded.insert(root, prefixes.clone());
        prefixes
    }
}

/// Label paths of every *other* node that displays the same shared item as
/// `node`. A node qualifies if it references a shared item or lies inside
/// one. Returns an empty list for nodes that are not shared.
pub fn resolve_shared_ancestry(model: &ConfigModel, node: NodeId, separator: &str) -> Vec<String> {
    let (shared, own_reference) = match model.referenced_item(node) {
        Some(target) => (target, Some(node)),
        None => {
            let root = model.owning_root(node);
            if !model.is_shared_root(root) {
                return Vec::new();
            }
            (root, None)
        }
    };

    let mut resolver = PathResolver::new(model);
    let others: Vec<NodeId> = resolver
        .referrers(shared)
        .into_iter()
        .filter(|&r| Some(r) != own_reference)
        .collect();

    let mut seen = HashSet::new();
    let mut paths = Vec::new();
    for referrer in others {
        for labels in resolver.paths_to(referrer, 0) {
            let path = labels.join(separator);
            if seen.insert(path.clone()) {
                paths.push(path);
            }
        }
    }

    debug!(
        "Node '{}' shares '{}' with {} other location(s)",
        model.node(node).label,
        model.node(shared).label,
        paths.len()
    );
    paths
}

/// Explanation shown next to options that affect several locations
pub fn shared_tooltip(model: &ConfigModel, node: NodeId, separator: &str) -> Option<String> {
    let paths = resolve_shared_ancestry(model, node, separator);
    if paths.is_empty() {
        return None;
    }

    let mut text = String::from("These options are shared. Changes here also apply to:");
    for path in paths {
        text.push_str("\n  ");
        text.push_str(&path);
    }
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DEFAULT_PATH_SEPARATOR, NodeSpec};

    #[test]
    fn test_unshared_node_has_no_ancestry() {
        let model = ConfigModel::from_specs(
            "Lexeme",
            vec![NodeSpec::new("Main Entry").with_child(NodeSpec::new("Headword"))],
            vec![],
        )
        .unwrap();
        let headword = model.find_by_path("Main Entry > Headword", DEFAULT_PATH_SEPARATOR).unwrap();

        assert!(resolve_shared_ancestry(&model, headword, DEFAULT_PATH_SEPARATOR).is_empty());
        assert_eq!(shared_tooltip(&model, headword, DEFAULT_PATH_SEPARATOR), None);
    }

    #[test]
    fn test_self_referencing_shared_item_terminates() {
        let model = ConfigModel::from_specs(
            "Lexeme",
            vec![NodeSpec::new("Main Entry").with_child(NodeSpec::new("Subentries").with_reference("Subs"))],
            vec![
                NodeSpec::new("Subs")
                    .with_child(NodeSpec::new("Headword"))
                    .with_child(NodeSpec::new("Subentries").with_reference("Subs")),
            ],
        )
        .unwrap();
        let top = model.find_by_path("Main Entry > Subentries", DEFAULT_PATH_SEPARATOR).unwrap();

        assert_eq!(
            resolve_shared_ancestry(&model, top, DEFAULT_PATH_SEPARATOR),
            vec!["Main Entry > Subentries > Subentries".to_string()]
        );
    }
}
