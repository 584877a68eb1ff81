//! Declarative tree definitions.
//!
//! A definition file lists command paths with their arguments and scopes,
//! plus compile settings. It is read with `serde_yaml`, so JSON files load
//! as well.
//!
//! ```yaml
//! settings:
//!   platform_types: true
//! commands:
//!   - path: [command, foo]
//!     description: Run foo
//!     scope: { guilds: [1, 2] }
//!     arguments:
//!       - name: integer
//!         parser: integer
//!         min: 1
//!         max: 10
//!       - name: animal
//!         parser: string
//!         choices: [cat, dog]
//! ```

use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use slash_schema_core::{
    Choice, ChoiceValue, NumericValue, OptionType, OptionTypeRegistry, Scope, ValueKind,
};

use crate::compile::SchemaCompiler;
use crate::error::{DefinitionError, Result};
use crate::tree::{ArgumentSlot, CommandBuilder, CommandTree, ParserKind, ParserSpec, SuggestionSource};

/// Settings that shape how definitions are compiled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompileSettings {
    /// Map user/channel/role/mentionable/attachment kinds to their platform
    /// option types instead of STRING.
    #[serde(default)]
    pub platform_types: bool,
    /// Additional option types keyed by parser name.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_types: Vec<CustomTypeDefinition>,
}

impl CompileSettings {
    /// Builds the option type registry these settings describe.
    pub fn registry(&self) -> OptionTypeRegistry {
        let mut registry = if self.platform_types {
            OptionTypeRegistry::with_platform_types()
        } else {
            OptionTypeRegistry::new()
        };
        for custom in &self.custom_types {
            registry.register(
                OptionType::new(custom.name.clone(), custom.code),
                ValueKind::Custom(custom.parser.clone()),
            );
        }
        registry
    }

    pub fn compiler(&self) -> SchemaCompiler {
        SchemaCompiler::new(self.registry())
    }
}

/// An extension option type for a host-defined parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomTypeDefinition {
    /// Option type name (e.g. `COLOR`).
    pub name: String,
    /// Numeric code used on the wire.
    pub code: u8,
    /// Parser name whose values use this type.
    pub parser: String,
}

/// Command path entry: a bare name or a name with description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Name(String),
    Described { name: String, description: String },
}

impl PathSegment {
    pub fn name(&self) -> &str {
        match self {
            PathSegment::Name(name) | PathSegment::Described { name, .. } => name,
        }
    }
}

/// Scope entry: `global`, `all_guilds`, a guild id, comma-separated ids or
/// `{ guilds: [..] }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScopeDefinition {
    Guild(i64),
    Named(String),
    Guilds { guilds: BTreeSet<i64> },
}

impl ScopeDefinition {
    fn to_scope(&self) -> std::result::Result<Scope, slash_schema_core::ParseScopeError> {
        match self {
            ScopeDefinition::Guild(id) => Ok(Scope::guilds([*id])),
            ScopeDefinition::Named(text) => text.parse(),
            ScopeDefinition::Guilds { guilds } => Ok(Scope::Guilds(guilds.clone())),
        }
    }
}

/// Choice entry: a bare value (named after itself) or `{ name, value }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChoiceDefinition {
    Named { name: String, value: ChoiceValue },
    Value(ChoiceValue),
}

impl From<&ChoiceDefinition> for Choice {
    fn from(definition: &ChoiceDefinition) -> Self {
        match definition {
            ChoiceDefinition::Named { name, value } => Choice::new(name.clone(), value.clone()),
            ChoiceDefinition::Value(value) => Choice::new(value.to_string(), value.clone()),
        }
    }
}

fn default_required() -> bool {
    true
}

/// One argument of a command: either a parser slot or an aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgumentDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Parser name (`integer`, `string`, ... or a host-defined name).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parser: Option<String>,
    #[serde(default = "default_required")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<NumericValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<NumericValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<ChoiceDefinition>,
    /// Name of a runtime suggestion provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<String>,
    /// Overrides the value kind derived from the parser.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub value_kind: Option<ValueKind>,
    /// Slots of an aggregate argument.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aggregate: Vec<ArgumentDefinition>,
}

impl ArgumentDefinition {
    fn to_slot(&self, command: &str) -> Result<ArgumentSlot> {
        let Some(parser) = &self.parser else {
            return Err(self.invalid(command, "missing parser"));
        };
        if !self.aggregate.is_empty() {
            return Err(self.invalid(command, "aggregate slots cannot be nested"));
        }

        let kind = ParserKind::from_str(parser).unwrap_or(ParserKind::String);
        let spec = ParserSpec {
            kind,
            min: self.min,
            max: self.max,
        };

        let mut slot = ArgumentSlot::new(self.name.clone(), self.required, spec)
            .with_description(self.description.clone());
        if let Some(value_kind) = &self.value_kind {
            slot = slot.with_value_kind(value_kind.clone());
        }

        match (&self.suggestions, self.choices.is_empty()) {
            (Some(_), false) => Err(self.invalid(command, "choices and suggestions are exclusive")),
            (Some(provider), true) => {
                Ok(slot.with_suggestions(SuggestionSource::Dynamic(provider.clone())))
            }
            (None, false) => Ok(slot.with_choices(self.choices.iter().map(Choice::from).collect())),
            (None, true) => Ok(slot),
        }
    }

    fn apply(&self, builder: CommandBuilder, command: &str) -> Result<CommandBuilder> {
        if self.aggregate.is_empty() {
            return Ok(builder.argument(self.to_slot(command)?));
        }
        if self.parser.is_some() {
            return Err(self.invalid(command, "declares both parser and aggregate"));
        }

        let slots = self
            .aggregate
            .iter()
            .map(|slot| slot.to_slot(command))
            .collect::<Result<Vec<_>>>()?;
        Ok(builder
            .aggregate(self.name.clone(), self.required, slots)
            .description(self.description.clone()))
    }

    fn invalid(&self, command: &str, reason: &str) -> DefinitionError {
        DefinitionError::InvalidArgument {
            command: command.to_string(),
            name: self.name.clone(),
            reason: reason.to_string(),
        }
    }
}

/// One registered command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandDefinition {
    /// Literal path from the root.
    pub path: Vec<PathSegment>,
    /// Description of the last literal in `path`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<ScopeDefinition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<ArgumentDefinition>,
}

impl CommandDefinition {
    /// Joined path names, used in error messages.
    pub fn display_path(&self) -> String {
        self.path
            .iter()
            .map(PathSegment::name)
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn to_builder(&self) -> Result<CommandBuilder> {
        let name = self.display_path();
        let Some((root, rest)) = self.path.split_first() else {
            return Err(DefinitionError::Tree(crate::TreeError::EmptyPath));
        };

        let mut builder = with_segment(CommandBuilder::new(root.name()), root);
        for segment in rest {
            builder = with_segment(builder.literal(segment.name()), segment);
        }
        if let Some(description) = &self.description {
            builder = builder.description(description.clone());
        }

        for argument in &self.arguments {
            builder = argument.apply(builder, &name)?;
        }

        if let Some(scope) = &self.scope {
            let scope = scope
                .to_scope()
                .map_err(|source| DefinitionError::InvalidScope {
                    command: name.clone(),
                    source,
                })?;
            builder = builder.scope(scope);
        }
        Ok(builder)
    }
}

fn with_segment(builder: CommandBuilder, segment: &PathSegment) -> CommandBuilder {
    match segment {
        PathSegment::Name(_) => builder,
        PathSegment::Described { description, .. } => builder.description(description.clone()),
    }
}

/// A complete definition file.
///
/// # Examples
///
/// ```
/// use slash_schema_compiler::TreeDefinition;
///
/// let yaml = r#"
/// commands:
///   - path: [ping]
///     description: Ping the bot
///   - path: [echo]
///     arguments:
///       - { name: message, parser: string }
/// "#;
///
/// let definition: TreeDefinition = yaml.parse().unwrap();
/// let tree = definition.into_tree().unwrap();
/// assert_eq!(tree.roots().len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TreeDefinition {
    #[serde(default)]
    pub settings: CompileSettings,
    #[serde(default)]
    pub commands: Vec<CommandDefinition>,
}

impl TreeDefinition {
    /// Loads a definition from a YAML or JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let reader = BufReader::new(file);
        let definition = serde_yaml::from_reader(reader)?;
        Ok(definition)
    }

    /// Builds a command tree from every command entry, in file order.
    pub fn build_tree(&self) -> Result<CommandTree> {
        let mut tree = CommandTree::new();
        for command in &self.commands {
            tree.register(command.to_builder()?)?;
        }
        Ok(tree)
    }

    /// Consumes the definition and builds its command tree.
    pub fn into_tree(self) -> Result<CommandTree> {
        self.build_tree()
    }
}

impl FromStr for TreeDefinition {
    type Err = DefinitionError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(s)?)
    }
}
