//! Tree-to-schema compilation.
//!
//! Turns the subtree under one command root into a [`CommandSchema`]:
//!
//! - literals become subcommands; a literal whose children compile to a
//!   single variable is flattened so the whole argument chain below it lands
//!   in that one subcommand,
//! - aggregates expand into one variable per slot, in declaration order,
//! - arguments become variables typed through the [`OptionTypeRegistry`].
//!
//! The result is checked with [`validate_command`] before it is returned.

use slash_schema_core::{
    ChoiceValue, CommandSchema, MAX_DESCRIPTION_LENGTH, OptionSchema, OptionType,
    OptionTypeRegistry, SubCommandSchema, VariableSchema, validate_command,
};
use tracing::{debug, warn};

use crate::error::SchemaStructureError;
use crate::extract::{RangeExtractor, RangeMapper, extract_choices};
use crate::tree::{ArgumentSlot, CommandTree, Component, NodeId, ParserKind};

/// Compiles command roots into schemas.
///
/// Compilation only reads the tree, so one compiler can serve many roots
/// and threads at once.
///
/// # Examples
///
/// ```
/// use slash_schema_compiler::*;
/// use slash_schema_core::{Choice, OptionType};
///
/// let mut tree = CommandTree::new();
/// tree.register(
///     CommandBuilder::new("command").literal("bar").argument(
///         ArgumentSlot::required("string", ParserSpec::new(ParserKind::String))
///             .with_choices(Choice::strings(["cat", "dog"])),
///     ),
/// )
/// .unwrap();
///
/// let root = tree.find_root("command").unwrap();
/// let schema = SchemaCompiler::default().compile(&tree, root).unwrap();
///
/// let string = schema.find_path(&["bar", "string"]).unwrap().as_variable().unwrap();
/// assert_eq!(string.option_type, OptionType::STRING);
/// assert_eq!(string.choices.len(), 2);
/// assert!(!string.autocomplete);
/// ```
#[derive(Debug, Default)]
pub struct SchemaCompiler {
    registry: OptionTypeRegistry,
    ranges: RangeExtractor,
}

impl SchemaCompiler {
    /// Creates a compiler resolving option types through `registry`.
    pub fn new(registry: OptionTypeRegistry) -> Self {
        Self {
            registry,
            ranges: RangeExtractor::new(),
        }
    }

    pub fn with_range_extractor(mut self, ranges: RangeExtractor) -> Self {
        self.ranges = ranges;
        self
    }

    /// Registers a range mapper for an additional parser kind.
    pub fn register_range_mapper(&mut self, kind: ParserKind, mapper: RangeMapper) -> &mut Self {
        self.ranges.register(kind, mapper);
        self
    }

    pub fn registry(&self) -> &OptionTypeRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut OptionTypeRegistry {
        &mut self.registry
    }

    /// Compiles the command rooted at `root`.
    ///
    /// Options are collected from the root's children, then from the first
    /// child's children and so on, until a level yields a subcommand or the
    /// chain ends.
    pub fn compile(
        &self,
        tree: &CommandTree,
        root: NodeId,
    ) -> Result<CommandSchema, SchemaStructureError> {
        let component = tree.component(root);
        let mut options = Vec::new();

        let mut current = Some(root);
        while let Some(id) = current {
            let mut sub_command = false;
            for &child in tree.children(id) {
                let child_options = self.create_options(tree, child);
                sub_command |= matches!(child_options.as_slice(), [OptionSchema::SubCommand(_)]);
                options.extend(child_options);
            }
            if sub_command {
                break;
            }
            current = tree.children(id).first().copied();
        }

        let schema = CommandSchema {
            name: component.name().to_string(),
            description: describe(component.description(), component.name()),
            options,
        };

        let errors = validate_command(&schema, &self.registry);
        if !errors.is_empty() {
            warn!(
                command = %schema.name,
                errors = errors.len(),
                "Compiled schema violates structure rules"
            );
            return Err(SchemaStructureError {
                command: schema.name,
                errors,
            });
        }

        debug!(
            command = %schema.name,
            options = schema.options.len(),
            "Compiled command schema"
        );
        Ok(schema)
    }

    fn create_options(&self, tree: &CommandTree, id: NodeId) -> Vec<OptionSchema> {
        match tree.component(id) {
            Component::Literal { name, description } => {
                let mut children: Vec<OptionSchema> = tree
                    .children(id)
                    .iter()
                    .flat_map(|&child| self.create_options(tree, child))
                    .collect();

                if let [OptionSchema::Variable(_)] = children.as_slice() {
                    children.clear();
                    let mut cursor = tree.children(id).first().copied();
                    while let Some(child) = cursor {
                        children.extend(self.create_options(tree, child));
                        cursor = tree.children(child).first().copied();
                    }
                    debug!(
                        literal = %name,
                        options = children.len(),
                        "Flattened single argument chain"
                    );
                } else if tree.children(id).iter().any(|&child| {
                    !tree.component(child).is_literal() && !tree.children(child).is_empty()
                }) {
                    debug!(
                        literal = %name,
                        options = children.len(),
                        "Arguments after the first level below literal are not collected"
                    );
                }

                vec![OptionSchema::SubCommand(SubCommandSchema {
                    name: name.clone(),
                    description: describe(description, name),
                    options: children,
                })]
            }
            Component::Aggregate { slots, .. } => slots
                .iter()
                .map(|slot| OptionSchema::Variable(self.create_variable(slot)))
                .collect(),
            Component::Argument(slot) => vec![OptionSchema::Variable(self.create_variable(slot))],
        }
    }

    fn create_variable(&self, slot: &ArgumentSlot) -> VariableSchema {
        let option_type = self.registry.resolve(&slot.value_kind);
        let mut choices = extract_choices(&slot.suggestions);
        if option_type.code == OptionType::NUMBER.code {
            for choice in &mut choices {
                if let ChoiceValue::Integer(value) = choice.value {
                    choice.value = ChoiceValue::Number(value as f64);
                }
            }
        }
        let autocomplete = choices.is_empty() && option_type.is_autocomplete_eligible();

        let mut range = self.ranges.extract(&slot.parser);
        if range.is_some() && !option_type.is_numeric() {
            debug!(
                argument = %slot.name,
                option_type = %option_type,
                "Dropping range for non-numeric option type"
            );
            range = None;
        }

        VariableSchema {
            name: slot.name.clone(),
            description: describe(&slot.description, &slot.name),
            option_type,
            required: slot.required,
            autocomplete,
            choices,
            range,
        }
    }
}

/// Description text, falling back to `name`, cut to the remote length limit.
fn describe(description: &str, name: &str) -> String {
    let text = if description.trim().is_empty() {
        name
    } else {
        description
    };
    text.chars().take(MAX_DESCRIPTION_LENGTH).collect()
}
