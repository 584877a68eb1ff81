//! Compile command trees into declarative slash-command schemas.
//!
//! The pipeline for one registration cycle:
//!
//! 1. Build a [`CommandTree`] by registering command paths (directly with a
//!    [`CommandBuilder`], or from a [`TreeDefinition`] file).
//! 2. Run the [`ScopeReconciler`] to stamp every node with the union of the
//!    scopes declared below it.
//! 3. Compile each root with the [`SchemaCompiler`], or let the
//!    [`SchemaRegistrar`] select and compile every root that overlaps the
//!    target scope into a [`SchemaPackage`](slash_schema_core::SchemaPackage).
//!
//! # Example
//!
//! ```
//! use slash_schema_compiler::*;
//! use slash_schema_core::{OptionType, Scope};
//!
//! let mut tree = CommandTree::new();
//! tree.register(CommandBuilder::new("command").literal("group").literal("foo")).unwrap();
//! tree.register(CommandBuilder::new("command").literal("group").literal("bar")).unwrap();
//!
//! let outcome = SchemaRegistrar::default().compile_for_scope(&mut tree, &Scope::Global);
//! let command = outcome.package.find_command("command").unwrap();
//! let group = command.find_option("group").unwrap();
//! assert_eq!(group.option_type(), OptionType::SUB_COMMAND_GROUP);
//! ```

mod compile;
mod definition;
mod error;
mod extract;
mod output;
mod reconcile;
mod register;
mod tree;

pub use compile::SchemaCompiler;
pub use definition::{
    ArgumentDefinition, ChoiceDefinition, CommandDefinition, CompileSettings,
    CustomTypeDefinition, PathSegment, ScopeDefinition, TreeDefinition,
};
pub use error::{DefinitionError, SchemaStructureError, TreeError};
pub use extract::{RangeExtractor, RangeMapper, extract_choices, floating, integral};
pub use output::{OutputFormat, format_command, format_package};
pub use reconcile::ScopeReconciler;
pub use register::{CompileFailure, RegistrationOutcome, SchemaRegistrar, ScopePredicate};
pub use tree::{
    ArgumentSlot, CommandBuilder, CommandMeta, CommandNode, CommandTree, Component, NodeId,
    ParserKind, ParserSpec, SuggestionSource,
};
