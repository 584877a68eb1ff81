//! Scope reconciliation.
//!
//! Stamps a resolved [`Scope`] onto every node of the tree so that any
//! subtree can answer "does this matter for scope X?" without walking it.
//! Each command's declared scope starts at its terminal node and is merged
//! into every ancestor up to and including the root.

use slash_schema_core::Scope;
use tracing::debug;

use crate::tree::{CommandTree, NodeId};

/// Propagates declared command scopes up the command tree.
///
/// # Examples
///
/// ```
/// use slash_schema_compiler::{CommandBuilder, CommandTree, ScopeReconciler};
/// use slash_schema_core::Scope;
///
/// let mut tree = CommandTree::new();
/// tree.register(CommandBuilder::new("command").literal("a").scope(Scope::guilds([1]))).unwrap();
/// tree.register(CommandBuilder::new("command").literal("b").scope(Scope::guilds([2]))).unwrap();
///
/// ScopeReconciler::new().reconcile(&mut tree);
/// let root = tree.find_root("command").unwrap();
/// assert_eq!(tree.resolved_scope(root), Some(&Scope::guilds([1, 2])));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ScopeReconciler;

impl ScopeReconciler {
    pub fn new() -> Self {
        Self
    }

    /// Reconciles every root independently.
    pub fn reconcile(&self, tree: &mut CommandTree) {
        let roots = tree.roots().to_vec();
        for root in roots {
            self.reconcile_root(tree, root);
        }
    }

    /// Reconciles the subtree under `root` and returns the root's scope.
    ///
    /// Previously resolved scopes in the subtree are cleared first, so
    /// running this twice on an unchanged tree gives the same result.
    pub fn reconcile_root(&self, tree: &mut CommandTree, root: NodeId) -> Scope {
        let nodes = tree.subtree(root);
        for &id in &nodes {
            tree.set_resolved_scope(id, None);
        }

        for &id in &nodes {
            let node = tree.node(id);
            // Leaves always contribute; inner nodes only when they end a command.
            if !node.is_leaf() && node.command.is_none() {
                continue;
            }
            let declared = tree.declared_scope(id).cloned().unwrap_or_default();
            propagate(tree, id, root, &declared);
        }

        let resolved = tree.resolved_scope(root).cloned().unwrap_or_default();
        debug!(
            root = %tree.component(root).name(),
            scope = %resolved,
            "Reconciled command scope"
        );
        resolved
    }
}

/// Merges `incoming` into `from` and each of its ancestors up to `root`.
fn propagate(tree: &mut CommandTree, from: NodeId, root: NodeId, incoming: &Scope) {
    let mut cursor = Some(from);
    while let Some(id) = cursor {
        let merged = match tree.resolved_scope(id) {
            None => incoming.clone(),
            Some(existing) => existing.merge(incoming),
        };
        tree.set_resolved_scope(id, Some(merged));

        if id == root {
            break;
        }
        cursor = tree.parent(id);
    }
}
