//! Single-writer state container for an editable page tree
//!
//! [`TreeStore`] holds the current tree and commits the result of the reducer
//! for every dispatched action. A failed action leaves the committed tree
//! untouched; there is never a partially applied state to observe.

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{TreeError, TreeResult};
use crate::reducer::{try_apply, Action};
use crate::registry::{RegistryError, TemplateRegistry};
use crate::tree::{Node, NodeKind, NodePath, PathIndex};

/// Upper bound on substitution rounds; templates may contain references of their own.
const MAX_RESOLVE_ROUNDS: usize = 16;

/// What a dispatch did to the committed tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A new tree was committed at this revision
    Committed { revision: u64 },
    /// The action was a no-op
    Unchanged,
}

/// A reference whose template is not in the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedReference {
    pub path: NodePath,
    pub ref_id: String,
}

/// Result of [`TreeStore::resolve_references`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveReport {
    pub resolved: Vec<NodePath>,
    pub unresolved: Vec<UnresolvedReference>,
}

impl ResolveReport {
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Holds the current tree, its path index and a revision counter
#[derive(Debug, Clone)]
pub struct TreeStore {
    tree: Node,
    index: PathIndex,
    revision: u64,
}

impl TreeStore {
    /// Wrap a page tree after checking its id rules
    pub fn new(tree: Node) -> TreeResult<Self> {
        if tree.kind() != NodeKind::Page {
            return Err(TreeError::InvalidRoot { kind: tree.kind() });
        }
        tree.validate()?;

        let index = PathIndex::build(&tree);
        debug!(root = tree.id(), nodes = index.len(), "tree store created");
        Ok(Self {
            tree,
            index,
            revision: 0,
        })
    }

    pub fn tree(&self) -> &Node {
        &self.tree
    }

    pub fn into_tree(self) -> Node {
        self.tree
    }

    pub fn index(&self) -> &PathIndex {
        &self.index
    }

    /// Number of committed mutations
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn root_path(&self) -> NodePath {
        NodePath::root(self.tree.id())
    }

    pub fn lookup(&self, path: &NodePath) -> Option<&Node> {
        if !self.index.contains(path) {
            return None;
        }
        self.tree.find(path)
    }

    /// Run an action through the reducer and commit the result.
    ///
    /// Silent reducer errors (delete-children or add-child on a leaf, resolve on
    /// a non-reference) yield [`DispatchOutcome::Unchanged`]; the others are
    /// returned and nothing is committed.
    pub fn dispatch(&mut self, action: &Action) -> TreeResult<DispatchOutcome> {
        match try_apply(&self.tree, action) {
            Ok(next) if next == self.tree => {
                debug!(action = action.name(), "no-op action");
                Ok(DispatchOutcome::Unchanged)
            }
            Ok(next) => Ok(self.commit(next, action)),
            Err(err) if err.is_silent() => {
                debug!(action = action.name(), error = %err, "action ignored");
                Ok(DispatchOutcome::Unchanged)
            }
            Err(err) => Err(err),
        }
    }

    /// Dispatch an action in its JSON wire form.
    ///
    /// Malformed actions and rejected moves are logged and leave the tree as is.
    pub fn dispatch_json(&mut self, value: Value) -> DispatchOutcome {
        let action: Action = match serde_json::from_value(value) {
            Ok(action) => action,
            Err(err) => {
                warn!(error = %err, "malformed action ignored");
                return DispatchOutcome::Unchanged;
            }
        };

        match self.dispatch(&action) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(action = action.name(), error = %err, "action rejected");
                DispatchOutcome::Unchanged
            }
        }
    }

    /// Replace every reference placeholder whose template is registered.
    ///
    /// Substituted templates may themselves hold references, so this runs in
    /// rounds until nothing more resolves. Unknown ref ids are reported and
    /// their placeholders stay in the tree.
    pub fn resolve_references(&mut self, registry: &TemplateRegistry) -> ResolveReport {
        let mut report = ResolveReport::default();

        for round in 0..MAX_RESOLVE_ROUNDS {
            let mut progressed = false;
            report.unresolved.clear();

            for path in self.index.paths_of_kind(NodeKind::Reference) {
                let ref_id = match self.tree.find(&path) {
                    Some(Node::Reference(reference)) => reference.ref_id.clone(),
                    _ => continue,
                };

                let template = match registry.lookup(&ref_id) {
                    Ok(template) => template,
                    Err(RegistryError::NotFound { .. }) => {
                        debug!(path = %path, ref_id = %ref_id, "no template for reference");
                        report.unresolved.push(UnresolvedReference { path, ref_id });
                        continue;
                    }
                    Err(err) => {
                        warn!(path = %path, error = %err, "template lookup failed");
                        continue;
                    }
                };

                let action = Action::ResolveReference {
                    path: path.clone(),
                    template,
                };
                match self.dispatch(&action) {
                    Ok(DispatchOutcome::Committed { .. }) => {
                        report.resolved.push(path);
                        progressed = true;
                    }
                    Ok(DispatchOutcome::Unchanged) => {}
                    Err(err) => warn!(path = %path, error = %err, "reference not resolved"),
                }
            }

            if !progressed {
                break;
            }
            if round + 1 == MAX_RESOLVE_ROUNDS {
                warn!(
                    rounds = MAX_RESOLVE_ROUNDS,
                    "stopped resolving references; templates may reference each other"
                );
            }
        }

        if !report.resolved.is_empty() {
            info!(
                resolved = report.resolved.len(),
                unresolved = report.unresolved.len(),
                "references resolved"
            );
        }
        report
    }

    fn commit(&mut self, next: Node, action: &Action) -> DispatchOutcome {
        self.tree = next;
        self.index = PathIndex::build(&self.tree);
        self.revision += 1;
        debug!(
            action = action.name(),
            revision = self.revision,
            nodes = self.index.len(),
            "tree committed"
        );
        DispatchOutcome::Committed {
            revision: self.revision,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RegistryBuilder;
    use crate::tree::DisplayType;
    use serde_json::json;
    use tracing_test::traced_test;

    fn path(raw: &str) -> NodePath {
        NodePath::parse(raw).unwrap()
    }

    fn store() -> TreeStore {
        TreeStore::new(Node::page(
            "p",
            "Page",
            [
                Node::title("a", "A"),
                Node::reference("r", "comp-fName"),
                Node::layout(
                    "l",
                    "",
                    DisplayType::Block,
                    [Node::reference("r", "comp-address")],
                ),
                Node::reference("u", "comp-unknown"),
            ],
        ))
        .unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_trees() {
        assert!(matches!(
            TreeStore::new(Node::title("t", "")),
            Err(TreeError::InvalidRoot { .. })
        ));
        assert!(matches!(
            TreeStore::new(Node::page("p", "", [Node::title("a", ""), Node::title("a", "")])),
            Err(TreeError::DuplicateSiblingId { .. })
        ));
    }

    #[test]
    fn test_dispatch_commits_and_reindexes() {
        let mut store = store();
        let outcome = store.dispatch(&Action::MoveDown { path: path("p_a") }).unwrap();
        assert_eq!(outcome, DispatchOutcome::Committed { revision: 1 });
        assert_eq!(store.index().get_str("p_a").unwrap().position, 1);
        assert_eq!(store.revision(), 1);
    }

    #[test]
    fn test_dispatch_noop_does_not_bump_revision() {
        let mut store = store();
        let outcome = store.dispatch(&Action::MoveUp { path: path("p_a") }).unwrap();
        assert_eq!(outcome, DispatchOutcome::Unchanged);

        let outcome = store.dispatch(&Action::AddChild { path: path("p_a") }).unwrap();
        assert_eq!(outcome, DispatchOutcome::Unchanged);
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn test_dispatch_error_keeps_tree() {
        let mut store = store();
        let before = store.tree().clone();
        assert!(store.dispatch(&Action::MoveLeft { path: path("p_a") }).is_err());
        assert!(store.dispatch(&Action::Delete { path: path("p_zzz") }).is_err());
        assert_eq!(store.tree(), &before);
    }

    #[test]
    fn test_dispatch_json() {
        let mut store = store();
        assert_eq!(
            store.dispatch_json(json!({ "type": "DELETE", "id": "p_a" })),
            DispatchOutcome::Committed { revision: 1 }
        );
        assert_eq!(
            store.dispatch_json(json!({ "type": "DELETE" })),
            DispatchOutcome::Unchanged
        );
        assert_eq!(
            store.dispatch_json(json!({ "type": "SHUFFLE", "id": "p_r" })),
            DispatchOutcome::Unchanged
        );
        assert_eq!(
            store.dispatch_json(json!({ "type": "MOVE_LEFT", "id": "p_r" })),
            DispatchOutcome::Unchanged
        );
        assert_eq!(store.revision(), 1);
    }

    #[test]
    #[traced_test]
    fn test_dispatch_json_logs_rejections() {
        let mut store = store();
        store.dispatch_json(json!({ "id": "p_a" }));
        assert!(logs_contain("malformed action ignored"));

        store.dispatch_json(json!({ "type": "MOVE_RIGHT", "id": "p_a" }));
        assert!(logs_contain("action rejected"));
    }

    #[test]
    fn test_resolve_references() {
        let mut store = store();
        let report = store.resolve_references(&TemplateRegistry::builtin());

        assert_eq!(report.resolved, vec![path("p_r"), path("p_l_r")]);
        assert_eq!(
            report.unresolved,
            vec![UnresolvedReference {
                path: path("p_u"),
                ref_id: "comp-unknown".to_string(),
            }]
        );
        assert!(!report.is_complete());

        assert_eq!(store.lookup(&path("p_r")).unwrap().kind(), NodeKind::Input);
        let address = store.lookup(&path("p_l_r")).unwrap();
        assert_eq!(address.kind(), NodeKind::Layout);
        assert!(store.lookup(&path("p_l_r_child3")).is_some());
        assert_eq!(store.lookup(&path("p_u")).unwrap().kind(), NodeKind::Reference);
    }

    #[test]
    fn test_resolve_nested_references() {
        let registry = TemplateRegistry::builder()
            .register(
                "comp-outer".to_string(),
                Node::layout(
                    "comp-outer",
                    "Outer",
                    DisplayType::Block,
                    [Node::reference("inner", "comp-fName")],
                ),
            )
            .with_builtin()
            .build();

        let mut store =
            TreeStore::new(Node::page("p", "", [Node::reference("o", "comp-outer")])).unwrap();
        let report = store.resolve_references(&registry);

        assert!(report.is_complete());
        assert_eq!(report.resolved, vec![path("p_o"), path("p_o_inner")]);
        assert_eq!(
            store.lookup(&path("p_o_inner")).unwrap().kind(),
            NodeKind::Input
        );
    }

    #[test]
    fn test_resolve_self_referencing_template_terminates() {
        let registry = TemplateRegistry::builder()
            .register(
                "comp-loop".to_string(),
                Node::layout(
                    "comp-loop",
                    "",
                    DisplayType::Block,
                    [Node::reference("again", "comp-loop")],
                ),
            )
            .build();

        let mut store =
            TreeStore::new(Node::page("p", "", [Node::reference("l", "comp-loop")])).unwrap();
        let report = store.resolve_references(&registry);
        assert_eq!(report.resolved.len(), MAX_RESOLVE_ROUNDS);
    }

    #[test]
    fn test_resolved_copies_are_independent() {
        let mut store = TreeStore::new(Node::page(
            "p",
            "",
            [
                Node::reference("a", "comp-address"),
                Node::reference("b", "comp-address"),
            ],
        ))
        .unwrap();
        let registry = TemplateRegistry::builtin();
        store.resolve_references(&registry);

        store
            .dispatch(&Action::DeleteChildren { path: path("p_a") })
            .unwrap();

        assert!(store.lookup(&path("p_a")).unwrap().children().unwrap().is_empty());
        assert_eq!(store.lookup(&path("p_b")).unwrap().children().unwrap().len(), 4);
        assert_eq!(
            registry.lookup("comp-address").unwrap().children().unwrap().len(),
            4
        );
    }
}
