//! Error types for tree construction, compilation and definition loading.

use slash_schema_core::{ParseScopeError, ValidationError};
use thiserror::Error;

/// Errors raised while registering a command path into a [`CommandTree`].
///
/// [`CommandTree`]: crate::CommandTree
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The command path has no components.
    #[error("command path is empty")]
    EmptyPath,

    /// The first component of a path is an argument.
    #[error("command root '{0}' must be a literal")]
    RootNotLiteral(String),

    /// A component shares its name with a differently defined sibling.
    #[error("conflicting definition for '{name}' under '{path}'")]
    ConflictingArgument { path: String, name: String },

    /// The path already terminates a registered command.
    #[error("command already registered: {0}")]
    DuplicateCommand(String),
}

/// A command root produced a schema that violates the remote structure
/// rules. Compilation of that root is aborted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid schema for command '{command}': {}", summarize(.errors))]
pub struct SchemaStructureError {
    /// Name of the offending command root.
    pub command: String,
    /// Every violation found in the compiled schema.
    pub errors: Vec<ValidationError>,
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors that can occur while loading a tree definition file.
#[derive(Debug, Error)]
pub enum DefinitionError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML (or JSON) parsing failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// An argument entry is neither a parser slot nor an aggregate, or
    /// declares both.
    #[error("invalid argument '{name}' in command '{command}': {reason}")]
    InvalidArgument {
        command: String,
        name: String,
        reason: String,
    },

    /// A scope entry could not be parsed.
    #[error("invalid scope in command '{command}': {source}")]
    InvalidScope {
        command: String,
        source: ParseScopeError,
    },

    /// The definition describes a tree that cannot be built.
    #[error(transparent)]
    Tree(#[from] TreeError),
}

/// Convenience alias for results with [`DefinitionError`].
pub type Result<T> = std::result::Result<T, DefinitionError>;
