//! Per-scope registration batches.
//!
//! A registration cycle targets one scope (global, or one guild). The
//! [`SchemaRegistrar`] reconciles the tree, keeps the roots whose resolved
//! scope overlaps the target and compiles each of them on its own, so a
//! malformed command is reported without blocking the rest of the batch.

use std::fmt;

use slash_schema_core::{SchemaPackage, Scope};
use tracing::{debug, warn};

use crate::compile::SchemaCompiler;
use crate::error::SchemaStructureError;
use crate::reconcile::ScopeReconciler;
use crate::tree::{CommandTree, NodeId};

/// Extra filter deciding whether a root takes part in a registration.
pub type ScopePredicate = Box<dyn Fn(&CommandTree, NodeId, &Scope) -> bool + Send + Sync>;

/// A root that failed to compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileFailure {
    pub root: NodeId,
    pub error: SchemaStructureError,
}

/// Result of compiling every eligible root for one scope.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationOutcome {
    pub package: SchemaPackage,
    pub failures: Vec<CompileFailure>,
}

impl RegistrationOutcome {
    /// Returns true if every eligible root compiled.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Compiles registration batches.
///
/// # Examples
///
/// ```
/// use slash_schema_compiler::*;
/// use slash_schema_core::Scope;
///
/// let mut tree = CommandTree::new();
/// tree.register(CommandBuilder::new("everywhere")).unwrap();
/// tree.register(CommandBuilder::new("local").scope(Scope::guilds([7]))).unwrap();
///
/// let registrar = SchemaRegistrar::default();
/// let global = registrar.compile_for_scope(&mut tree, &Scope::Global);
/// assert_eq!(global.package.command_count(), 1);
///
/// let guild = registrar.compile_for_scope(&mut tree, &Scope::guilds([7]));
/// assert!(guild.package.find_command("local").is_some());
/// ```
#[derive(Default)]
pub struct SchemaRegistrar {
    compiler: SchemaCompiler,
    reconciler: ScopeReconciler,
    predicate: Option<ScopePredicate>,
}

impl fmt::Debug for SchemaRegistrar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaRegistrar")
            .field("compiler", &self.compiler)
            .field("predicate", &self.predicate.is_some())
            .finish()
    }
}

impl SchemaRegistrar {
    pub fn new(compiler: SchemaCompiler) -> Self {
        Self {
            compiler,
            reconciler: ScopeReconciler::new(),
            predicate: None,
        }
    }

    /// Only roots accepted by `predicate` are compiled.
    pub fn with_predicate(
        mut self,
        predicate: impl Fn(&CommandTree, NodeId, &Scope) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.predicate = Some(Box::new(predicate));
        self
    }

    pub fn compiler(&self) -> &SchemaCompiler {
        &self.compiler
    }

    /// Roots of a reconciled tree that belong in a registration for `scope`.
    pub fn eligible_roots(&self, tree: &CommandTree, scope: &Scope) -> Vec<NodeId> {
        tree.roots()
            .iter()
            .copied()
            .filter(|&root| {
                let resolved = tree.resolved_scope(root).cloned().unwrap_or_default();
                if !resolved.overlaps(scope) {
                    debug!(
                        root = %tree.component(root).name(),
                        resolved = %resolved,
                        target = %scope,
                        "Skipping root outside target scope"
                    );
                    return false;
                }
                self.predicate
                    .as_ref()
                    .is_none_or(|predicate| predicate(tree, root, scope))
            })
            .collect()
    }

    /// Reconciles `tree`, then compiles every eligible root for `scope`.
    pub fn compile_for_scope(&self, tree: &mut CommandTree, scope: &Scope) -> RegistrationOutcome {
        self.reconciler.reconcile(tree);

        let mut package = SchemaPackage::new(scope.clone());
        let mut failures = Vec::new();

        for root in self.eligible_roots(tree, scope) {
            match self.compiler.compile(tree, root) {
                Ok(schema) => package.commands.push(schema),
                Err(error) => {
                    warn!(root = %error.command, error = %error, "Skipping command that failed to compile");
                    failures.push(CompileFailure { root, error });
                }
            }
        }

        debug!(
            scope = %scope,
            commands = package.command_count(),
            failures = failures.len(),
            "Compiled registration batch"
        );
        RegistrationOutcome { package, failures }
    }
}

#[cfg(test)]
mod tests {
    use crate::tree::{ArgumentSlot, CommandBuilder, ParserKind, ParserSpec};

    use super::*;

    fn sample_tree() -> CommandTree {
        let mut tree = CommandTree::new();
        tree.register(CommandBuilder::new("global")).unwrap();
        tree.register(CommandBuilder::new("guild").scope(Scope::guilds([1])))
            .unwrap();
        tree.register(CommandBuilder::new("anywhere").scope(Scope::all_guilds()))
            .unwrap();
        tree
    }

    fn names(outcome: &RegistrationOutcome) -> Vec<&str> {
        outcome
            .package
            .commands
            .iter()
            .map(|command| command.name.as_str())
            .collect()
    }

    #[test]
    fn test_roots_are_filtered_by_overlap() {
        let mut tree = sample_tree();
        let registrar = SchemaRegistrar::default();

        let global = registrar.compile_for_scope(&mut tree, &Scope::Global);
        assert_eq!(names(&global), vec!["global"]);

        let one = registrar.compile_for_scope(&mut tree, &Scope::guilds([1]));
        assert_eq!(names(&one), vec!["guild", "anywhere"]);
        assert_eq!(one.package.scope, Scope::guilds([1]));

        let two = registrar.compile_for_scope(&mut tree, &Scope::guilds([2]));
        assert_eq!(names(&two), vec!["anywhere"]);
    }

    #[test]
    fn test_predicate_limits_roots() {
        let mut tree = sample_tree();
        let registrar = SchemaRegistrar::default().with_predicate(|tree, root, _scope| {
            tree.component(root).name() != "anywhere"
        });
        let outcome = registrar.compile_for_scope(&mut tree, &Scope::guilds([1]));
        assert_eq!(names(&outcome), vec!["guild"]);
    }

    #[test]
    fn test_failures_do_not_block_other_roots() {
        let mut tree = sample_tree();
        tree.register(CommandBuilder::new("broken").literal("sub"))
            .unwrap();
        tree.register(CommandBuilder::new("broken").argument(ArgumentSlot::required(
            "value",
            ParserSpec::new(ParserKind::String),
        )))
        .unwrap();

        let outcome = SchemaRegistrar::default().compile_for_scope(&mut tree, &Scope::Global);
        assert_eq!(names(&outcome), vec!["global"]);
        assert!(!outcome.is_complete());
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].root, tree.find_root("broken").unwrap());
    }
}
