//! Schema and package validation.
//!
//! Checks the constraints the remote registration endpoint enforces: name
//! and description lengths, at most one level of subcommand groups, no mixing
//! of subcommands and variables among siblings, known option type codes and
//! choice values matching the option type.
//!
//! # Examples
//!
//! ```
//! use slash_schema_core::*;
//!
//! let registry = OptionTypeRegistry::new();
//! let command = CommandSchema::new("ping", "Ping the bot");
//! assert!(validate_command(&command, &registry).is_empty());
//!
//! // Subcommands and variables may not be siblings.
//! let mixed = CommandSchema::new("ping", "Ping the bot")
//!     .with_option(SubCommandSchema::new("now", "now"))
//!     .with_option(VariableSchema::new("delay", "delay", OptionType::INTEGER));
//! assert!(!validate_command(&mixed, &registry).is_empty());
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::{
    CommandSchema, MAX_DESCRIPTION_LENGTH, MAX_NAME_LENGTH, OptionSchema, OptionTypeRegistry,
    SchemaPackage, VariableSchema,
};

/// Schema/package validation errors.
///
/// Paths are the space-separated names from the command root down to the
/// offending entity (e.g. `"command group foo"`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Two commands in the same package share a name.
    #[error("duplicate command in package: {0}")]
    DuplicateCommand(String),
    /// A name is empty or whitespace-only.
    #[error("empty name at: {0}")]
    EmptyName(String),
    /// A name exceeds [`MAX_NAME_LENGTH`] characters.
    #[error("name too long ({length} > 32) at: {path}")]
    NameTooLong { path: String, length: usize },
    /// A description is empty.
    #[error("empty description at: {0}")]
    EmptyDescription(String),
    /// A description exceeds [`MAX_DESCRIPTION_LENGTH`] characters.
    #[error("description too long ({length} > 100) at: {path}")]
    DescriptionTooLong { path: String, length: usize },
    /// Two sibling options share a name.
    #[error("duplicate option at: {0}")]
    DuplicateOption(String),
    /// Siblings mix subcommands and variables.
    #[error("subcommands and variables mixed under: {0}")]
    MixedOptionKinds(String),
    /// A subcommand is nested below a subcommand that is already inside a
    /// group.
    #[error("subcommand nested too deeply at: {0}")]
    NestingTooDeep(String),
    /// A variable declares a subcommand type.
    #[error("variable uses subcommand type {option_type} at: {path}")]
    SubCommandTypeOnVariable { path: String, option_type: String },
    /// A variable's type code is not registered.
    #[error("unknown option type code {code} at: {path}")]
    UnknownOptionType { path: String, code: u8 },
    /// A variable enables autocomplete and lists choices.
    #[error("autocomplete combined with choices at: {0}")]
    AutocompleteWithChoices(String),
    /// A variable enables autocomplete for a type that does not support it.
    #[error("autocomplete not supported for {option_type} at: {path}")]
    AutocompleteNotSupported { path: String, option_type: String },
    /// A choice value does not match the option type.
    #[error("choice '{choice}' does not match type {option_type} at: {path}")]
    ChoiceTypeMismatch {
        path: String,
        choice: String,
        option_type: String,
    },
    /// A range is attached to a non-numeric option.
    #[error("range on non-numeric type {option_type} at: {path}")]
    RangeOnNonNumeric { path: String, option_type: String },
}

/// Validates every command of a package.
///
/// Commands are checked in order; duplicate names are reported once per
/// repeated name.
pub fn validate_package(
    package: &SchemaPackage,
    registry: &OptionTypeRegistry,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for command in &package.commands {
        if !seen.insert(command.name.as_str()) {
            errors.push(ValidationError::DuplicateCommand(command.name.clone()));
            continue;
        }
        errors.extend(validate_command(command, registry));
    }

    errors
}

/// Validates one command schema and returns every violation found.
pub fn validate_command(
    command: &CommandSchema,
    registry: &OptionTypeRegistry,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let path = command.name.clone();

    check_name(&command.name, &path, &mut errors);
    check_description(&command.description, &path, &mut errors);
    check_options(&command.options, &path, 0, registry, &mut errors);

    errors
}

fn check_options(
    options: &[OptionSchema],
    path: &str,
    depth: usize,
    registry: &OptionTypeRegistry,
    errors: &mut Vec<ValidationError>,
) {
    let sub_commands = options.iter().filter(|o| o.is_sub_command()).count();
    if sub_commands > 0 && sub_commands < options.len() {
        errors.push(ValidationError::MixedOptionKinds(path.to_string()));
    }

    let mut seen: HashSet<&str> = HashSet::new();
    for option in options {
        let option_path = format!("{path} {}", option.name());
        if !seen.insert(option.name()) {
            errors.push(ValidationError::DuplicateOption(option_path.clone()));
        }

        check_name(option.name(), &option_path, errors);
        check_description(option.description(), &option_path, errors);

        match option {
            OptionSchema::SubCommand(sub) => {
                // depth 0: directly under the command, depth 1: inside a group
                if depth >= 2 {
                    errors.push(ValidationError::NestingTooDeep(option_path));
                    continue;
                }
                check_options(&sub.options, &option_path, depth + 1, registry, errors);
            }
            OptionSchema::Variable(variable) => {
                check_variable(variable, &option_path, registry, errors);
            }
        }
    }
}

fn check_variable(
    variable: &VariableSchema,
    path: &str,
    registry: &OptionTypeRegistry,
    errors: &mut Vec<ValidationError>,
) {
    let option_type = &variable.option_type;

    if option_type.is_sub_command() {
        errors.push(ValidationError::SubCommandTypeOnVariable {
            path: path.to_string(),
            option_type: option_type.to_string(),
        });
    } else if registry.by_code(option_type.code).is_none() {
        errors.push(ValidationError::UnknownOptionType {
            path: path.to_string(),
            code: option_type.code,
        });
    }

    if variable.autocomplete {
        if !variable.choices.is_empty() {
            errors.push(ValidationError::AutocompleteWithChoices(path.to_string()));
        }
        if !option_type.is_autocomplete_eligible() {
            errors.push(ValidationError::AutocompleteNotSupported {
                path: path.to_string(),
                option_type: option_type.to_string(),
            });
        }
    }

    for choice in &variable.choices {
        if !choice.value.matches(option_type) {
            errors.push(ValidationError::ChoiceTypeMismatch {
                path: path.to_string(),
                choice: choice.name.clone(),
                option_type: option_type.to_string(),
            });
        }
    }

    if variable.range.is_some() && !option_type.is_numeric() {
        errors.push(ValidationError::RangeOnNonNumeric {
            path: path.to_string(),
            option_type: option_type.to_string(),
        });
    }
}

fn check_name(name: &str, path: &str, errors: &mut Vec<ValidationError>) {
    let length = name.chars().count();
    if name.trim().is_empty() {
        errors.push(ValidationError::EmptyName(path.to_string()));
    } else if length > MAX_NAME_LENGTH {
        errors.push(ValidationError::NameTooLong {
            path: path.to_string(),
            length,
        });
    }
}

fn check_description(description: &str, path: &str, errors: &mut Vec<ValidationError>) {
    let length = description.chars().count();
    if description.trim().is_empty() {
        errors.push(ValidationError::EmptyDescription(path.to_string()));
    } else if length > MAX_DESCRIPTION_LENGTH {
        errors.push(ValidationError::DescriptionTooLong {
            path: path.to_string(),
            length,
        });
    }
}

#[cfg(test)]
mod tests {
    use crate::{Choice, OptionType, Range, Scope, SubCommandSchema};

    use super::*;

    fn registry() -> OptionTypeRegistry {
        OptionTypeRegistry::new()
    }

    #[test]
    fn test_accepts_group_with_leaf_subcommands() {
        let command = CommandSchema::new("command", "command").with_option(
            SubCommandSchema::new("group", "group")
                .with_option(SubCommandSchema::new("foo", "foo"))
                .with_option(SubCommandSchema::new("bar", "bar").with_option(
                    VariableSchema::new("n", "n", OptionType::INTEGER).with_autocomplete(true),
                )),
        );
        assert!(validate_command(&command, &registry()).is_empty());
    }

    #[test]
    fn test_rejects_nesting_below_group() {
        let command = CommandSchema::new("command", "command").with_option(
            SubCommandSchema::new("a", "a").with_option(
                SubCommandSchema::new("b", "b").with_option(SubCommandSchema::new("c", "c")),
            ),
        );
        assert_eq!(
            validate_command(&command, &registry()),
            vec![ValidationError::NestingTooDeep("command a b c".to_string())]
        );
    }

    #[test]
    fn test_rejects_mixed_siblings() {
        let command = CommandSchema::new("command", "command").with_option(
            SubCommandSchema::new("group", "group")
                .with_option(SubCommandSchema::new("foo", "foo"))
                .with_option(VariableSchema::new("x", "x", OptionType::STRING)),
        );
        assert_eq!(
            validate_command(&command, &registry()),
            vec![ValidationError::MixedOptionKinds("command group".to_string())]
        );
    }

    #[test]
    fn test_rejects_long_names_and_descriptions() {
        let command = CommandSchema::new("x".repeat(33), "d".repeat(101));
        let errors = validate_command(&command, &registry());
        assert!(matches!(
            errors[0],
            ValidationError::NameTooLong { length: 33, .. }
        ));
        assert!(matches!(
            errors[1],
            ValidationError::DescriptionTooLong { length: 101, .. }
        ));
    }

    #[test]
    fn test_rejects_variable_constraint_violations() {
        let command = CommandSchema::new("command", "command")
            .with_option(
                VariableSchema::new("a", "a", OptionType::STRING)
                    .with_autocomplete(true)
                    .with_choices(Choice::strings(["x"])),
            )
            .with_option(
                VariableSchema::new("b", "b", OptionType::STRING)
                    .with_choices(Choice::integers([1])),
            )
            .with_option(
                VariableSchema::new("c", "c", OptionType::BOOLEAN).with_range(Range::new(0, 1)),
            )
            .with_option(VariableSchema::new("d", "d", OptionType::new("COLOR", 42)));

        let errors = validate_command(&command, &registry());
        assert_eq!(errors.len(), 4);
        assert!(matches!(errors[0], ValidationError::AutocompleteWithChoices(_)));
        assert!(matches!(errors[1], ValidationError::ChoiceTypeMismatch { .. }));
        assert!(matches!(errors[2], ValidationError::RangeOnNonNumeric { .. }));
        assert!(matches!(
            errors[3],
            ValidationError::UnknownOptionType { code: 42, .. }
        ));
    }

    #[test]
    fn test_rejects_duplicate_commands_in_package() {
        let mut package = SchemaPackage::new(Scope::Global);
        package.commands.push(CommandSchema::new("ping", "ping"));
        package.commands.push(CommandSchema::new("ping", "ping"));

        assert_eq!(
            validate_package(&package, &registry()),
            vec![ValidationError::DuplicateCommand("ping".to_string())]
        );
    }
}
