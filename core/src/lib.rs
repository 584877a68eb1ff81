//! Core schema types for declarative slash commands.
//!
//! This crate defines the platform-neutral model that command trees are
//! compiled into:
//!
//! - [`CommandSchema`]: one command root with its ordered options.
//! - [`OptionSchema`]: either a [`SubCommandSchema`] (plain subcommand or
//!   group, derived from its first child) or a [`VariableSchema`].
//! - [`OptionType`]: numerically coded option types, resolved from host
//!   value kinds through an [`OptionTypeRegistry`].
//! - [`Scope`]: global or per-guild visibility, with a commutative merge.
//! - [`SchemaPackage`]: all commands compiled for one scope.
//!
//! Validation ([`validate_command`], [`validate_package`]) checks the
//! structural and field constraints the remote registration endpoint
//! enforces.
//!
//! # Example
//!
//! ```
//! use slash_schema_core::*;
//!
//! let registry = OptionTypeRegistry::new();
//! let command = CommandSchema::new("command", "Command Description").with_option(
//!     SubCommandSchema::new("foo", "foo").with_option(
//!         VariableSchema::new("integer", "integer", registry.resolve(&ValueKind::Integer))
//!             .required()
//!             .with_autocomplete(true)
//!             .with_range(Range::new(1, 10)),
//!     ),
//! );
//!
//! let foo = command.find_option("foo").unwrap();
//! assert_eq!(foo.option_type(), OptionType::SUB_COMMAND);
//! assert!(validate_command(&command, &registry).is_empty());
//! ```

mod package;
mod registry;
mod scope;
mod types;
mod validate;

pub use package::SchemaPackage;
pub use registry::{OptionTypeRegistry, ValueKind};
pub use scope::{ParseScopeError, Scope};
pub use types::*;
pub use validate::{ValidationError, validate_command, validate_package};
