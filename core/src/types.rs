//! Schema type definitions for declarative slash commands.
//!
//! This module defines the platform-neutral output model produced by the
//! compiler: a [`CommandSchema`] per command root, holding a tree of
//! [`OptionSchema`] values. The types serialize with [`serde`] so adapters can
//! turn them into a remote service's registration payload.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Version of the schema contract (semver).
///
/// Embedded in every [`SchemaPackage`](crate::SchemaPackage) to track
/// compatibility across schema versions.
pub const SCHEMA_CONTRACT_VERSION: &str = "1.0.0";

/// Maximum length (in characters) of a command, subcommand or option name.
pub const MAX_NAME_LENGTH: usize = 32;

/// Maximum length (in characters) of a description.
pub const MAX_DESCRIPTION_LENGTH: usize = 100;

/// A named, numerically coded option type.
///
/// The base set mirrors the remote schema's fixed codes. Adapters extend it
/// with platform-native reference types by registering them in an
/// [`OptionTypeRegistry`](crate::OptionTypeRegistry).
///
/// # Examples
///
/// ```
/// use slash_schema_core::OptionType;
///
/// assert_eq!(OptionType::INTEGER.code, 4);
/// assert!(OptionType::STRING.is_autocomplete_eligible());
/// assert!(!OptionType::BOOLEAN.is_autocomplete_eligible());
///
/// let custom = OptionType::new("COLOR", 42);
/// assert_eq!(custom.to_string(), "COLOR");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OptionType {
    /// Upper-case type name (e.g. `"STRING"`).
    pub name: Cow<'static, str>,
    /// Numeric code used on the wire.
    pub code: u8,
}

impl OptionType {
    pub const SUB_COMMAND: OptionType = OptionType::from_static("SUB_COMMAND", 1);
    pub const SUB_COMMAND_GROUP: OptionType = OptionType::from_static("SUB_COMMAND_GROUP", 2);
    pub const STRING: OptionType = OptionType::from_static("STRING", 3);
    pub const INTEGER: OptionType = OptionType::from_static("INTEGER", 4);
    pub const BOOLEAN: OptionType = OptionType::from_static("BOOLEAN", 5);
    pub const USER: OptionType = OptionType::from_static("USER", 6);
    pub const CHANNEL: OptionType = OptionType::from_static("CHANNEL", 7);
    pub const ROLE: OptionType = OptionType::from_static("ROLE", 8);
    pub const MENTIONABLE: OptionType = OptionType::from_static("MENTIONABLE", 9);
    pub const NUMBER: OptionType = OptionType::from_static("NUMBER", 10);
    pub const ATTACHMENT: OptionType = OptionType::from_static("ATTACHMENT", 11);

    /// Types that may be served by runtime autocomplete.
    pub const AUTOCOMPLETE_ELIGIBLE: [OptionType; 3] = [Self::STRING, Self::INTEGER, Self::NUMBER];

    /// The closed base set every registry starts from.
    pub const BASE: [OptionType; 6] = [
        Self::SUB_COMMAND,
        Self::SUB_COMMAND_GROUP,
        Self::STRING,
        Self::INTEGER,
        Self::BOOLEAN,
        Self::NUMBER,
    ];

    /// Platform-native reference types.
    pub const PLATFORM: [OptionType; 5] = [
        Self::USER,
        Self::CHANNEL,
        Self::ROLE,
        Self::MENTIONABLE,
        Self::ATTACHMENT,
    ];

    /// Creates an option type from a static name (usable in `const` items).
    pub const fn from_static(name: &'static str, code: u8) -> Self {
        Self {
            name: Cow::Borrowed(name),
            code,
        }
    }

    /// Creates an option type with an owned name.
    pub fn new(name: impl Into<String>, code: u8) -> Self {
        Self {
            name: Cow::Owned(name.into()),
            code,
        }
    }

    /// Returns the type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true for the two subcommand discriminants.
    pub fn is_sub_command(&self) -> bool {
        self.code == Self::SUB_COMMAND.code || self.code == Self::SUB_COMMAND_GROUP.code
    }

    /// Returns true if this is one of [`OptionType::AUTOCOMPLETE_ELIGIBLE`].
    pub fn is_autocomplete_eligible(&self) -> bool {
        Self::AUTOCOMPLETE_ELIGIBLE
            .iter()
            .any(|eligible| eligible.code == self.code)
    }

    /// Returns true for types that accept a numeric [`Range`].
    pub fn is_numeric(&self) -> bool {
        self.code == Self::INTEGER.code || self.code == Self::NUMBER.code
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A numeric bound, kept integral when the source parser is integral.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericValue {
    Integer(i64),
    Float(f64),
}

impl NumericValue {
    /// Returns the value as a float.
    pub fn as_f64(&self) -> f64 {
        match self {
            NumericValue::Integer(value) => *value as f64,
            NumericValue::Float(value) => *value,
        }
    }

    /// Returns the smallest integer not below the value.
    pub fn ceil_i64(&self) -> i64 {
        match self {
            NumericValue::Integer(value) => *value,
            NumericValue::Float(value) => value.ceil() as i64,
        }
    }

    /// Returns the largest integer not above the value.
    pub fn floor_i64(&self) -> i64 {
        match self {
            NumericValue::Integer(value) => *value,
            NumericValue::Float(value) => value.floor() as i64,
        }
    }
}

impl From<i64> for NumericValue {
    fn from(value: i64) -> Self {
        NumericValue::Integer(value)
    }
}

impl From<i32> for NumericValue {
    fn from(value: i32) -> Self {
        NumericValue::Integer(i64::from(value))
    }
}

impl From<f64> for NumericValue {
    fn from(value: f64) -> Self {
        NumericValue::Float(value)
    }
}

impl fmt::Display for NumericValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericValue::Integer(value) => write!(f, "{value}"),
            NumericValue::Float(value) => write!(f, "{value}"),
        }
    }
}

/// Inclusive numeric bounds of a variable option.
///
/// # Examples
///
/// ```
/// use slash_schema_core::{NumericValue, Range};
///
/// let range = Range::new(1, 10);
/// assert_eq!(range.min, NumericValue::Integer(1));
/// assert_eq!(range.to_string(), "1..=10");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: NumericValue,
    pub max: NumericValue,
}

impl Range {
    /// Creates a range from two bounds.
    pub fn new(min: impl Into<NumericValue>, max: impl Into<NumericValue>) -> Self {
        Self {
            min: min.into(),
            max: max.into(),
        }
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.min, self.max)
    }
}

/// Value carried by a [`Choice`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChoiceValue {
    Integer(i64),
    Number(f64),
    String(String),
}

impl ChoiceValue {
    /// Returns true if this value may appear in an option of `option_type`.
    pub fn matches(&self, option_type: &OptionType) -> bool {
        match self {
            ChoiceValue::Integer(_) => option_type.code == OptionType::INTEGER.code,
            ChoiceValue::Number(_) => option_type.code == OptionType::NUMBER.code,
            ChoiceValue::String(_) => option_type.code == OptionType::STRING.code,
        }
    }
}

impl From<&str> for ChoiceValue {
    fn from(value: &str) -> Self {
        ChoiceValue::String(value.to_string())
    }
}

impl From<String> for ChoiceValue {
    fn from(value: String) -> Self {
        ChoiceValue::String(value)
    }
}

impl From<i64> for ChoiceValue {
    fn from(value: i64) -> Self {
        ChoiceValue::Integer(value)
    }
}

impl From<f64> for ChoiceValue {
    fn from(value: f64) -> Self {
        ChoiceValue::Number(value)
    }
}

impl fmt::Display for ChoiceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChoiceValue::Integer(value) => write!(f, "{value}"),
            ChoiceValue::Number(value) => write!(f, "{value}"),
            ChoiceValue::String(value) => f.write_str(value),
        }
    }
}

/// An enumerated `(name, value)` pair offered by a variable option.
///
/// # Examples
///
/// ```
/// use slash_schema_core::{Choice, ChoiceValue};
///
/// let animals = Choice::strings(["cat", "dog"]);
/// assert_eq!(animals[1].name, "dog");
/// assert_eq!(animals[1].value, ChoiceValue::String("dog".into()));
///
/// let sizes = Choice::integers([1, 2, 3]);
/// assert_eq!(sizes[2].name, "3");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub name: String,
    pub value: ChoiceValue,
}

impl Choice {
    pub fn new(name: impl Into<String>, value: impl Into<ChoiceValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// String choices named after their values.
    pub fn strings<I, S>(values: I) -> Vec<Choice>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        values
            .into_iter()
            .map(|value| {
                let value = value.into();
                Choice::new(value.clone(), value)
            })
            .collect()
    }

    /// Integer choices named after their decimal form.
    pub fn integers(values: impl IntoIterator<Item = i64>) -> Vec<Choice> {
        values
            .into_iter()
            .map(|value| Choice::new(value.to_string(), value))
            .collect()
    }

    /// Floating point choices named after their decimal form.
    pub fn numbers(values: impl IntoIterator<Item = f64>) -> Vec<Choice> {
        values
            .into_iter()
            .map(|value| Choice::new(value.to_string(), value))
            .collect()
    }
}

/// Schema for a subcommand or subcommand group.
///
/// Whether this is a plain subcommand or a group is derived from its first
/// child, see [`SubCommandSchema::option_type`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubCommandSchema {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionSchema>,
}

impl SubCommandSchema {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            options: Vec::new(),
        }
    }

    /// Adds a child option.
    pub fn with_option(mut self, option: impl Into<OptionSchema>) -> Self {
        self.options.push(option.into());
        self
    }

    /// Returns `SUB_COMMAND_GROUP` if the first child is a subcommand, else
    /// `SUB_COMMAND`.
    ///
    /// # Examples
    ///
    /// ```
    /// use slash_schema_core::{OptionType, SubCommandSchema};
    ///
    /// let leaf = SubCommandSchema::new("foo", "foo");
    /// assert_eq!(leaf.option_type(), OptionType::SUB_COMMAND);
    ///
    /// let group = SubCommandSchema::new("group", "group").with_option(leaf);
    /// assert_eq!(group.option_type(), OptionType::SUB_COMMAND_GROUP);
    /// ```
    pub fn option_type(&self) -> OptionType {
        if self.is_group() {
            OptionType::SUB_COMMAND_GROUP
        } else {
            OptionType::SUB_COMMAND
        }
    }

    /// Returns true if this subcommand groups further subcommands.
    pub fn is_group(&self) -> bool {
        matches!(self.options.first(), Some(OptionSchema::SubCommand(_)))
    }

    /// Finds a direct child option by name.
    pub fn find_option(&self, name: &str) -> Option<&OptionSchema> {
        self.options.iter().find(|option| option.name() == name)
    }
}

/// Schema for a leaf option carrying a value.
///
/// # Examples
///
/// ```
/// use slash_schema_core::{OptionType, Range, VariableSchema};
///
/// let count = VariableSchema::new("count", "How many", OptionType::INTEGER)
///     .required()
///     .with_range(Range::new(1, 10));
/// assert!(count.required);
/// assert!(count.range.is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableSchema {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub option_type: OptionType,
    pub required: bool,
    pub autocomplete: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<Choice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<Range>,
}

impl VariableSchema {
    /// Creates an optional variable without choices, range or autocomplete.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        option_type: OptionType,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            option_type,
            required: false,
            autocomplete: false,
            choices: Vec::new(),
            range: None,
        }
    }

    /// Marks the variable as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_autocomplete(mut self, autocomplete: bool) -> Self {
        self.autocomplete = autocomplete;
        self
    }

    pub fn with_choices(mut self, choices: Vec<Choice>) -> Self {
        self.choices = choices;
        self
    }

    pub fn with_range(mut self, range: Range) -> Self {
        self.range = Some(range);
        self
    }
}

/// An option of a command: a subcommand (or group) or a variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OptionSchema {
    SubCommand(SubCommandSchema),
    Variable(VariableSchema),
}

impl OptionSchema {
    pub fn name(&self) -> &str {
        match self {
            OptionSchema::SubCommand(sub) => &sub.name,
            OptionSchema::Variable(variable) => &variable.name,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            OptionSchema::SubCommand(sub) => &sub.description,
            OptionSchema::Variable(variable) => &variable.description,
        }
    }

    /// Returns the stored type of a variable or the derived type of a
    /// subcommand.
    pub fn option_type(&self) -> OptionType {
        match self {
            OptionSchema::SubCommand(sub) => sub.option_type(),
            OptionSchema::Variable(variable) => variable.option_type.clone(),
        }
    }

    pub fn is_sub_command(&self) -> bool {
        matches!(self, OptionSchema::SubCommand(_))
    }

    pub fn as_sub_command(&self) -> Option<&SubCommandSchema> {
        match self {
            OptionSchema::SubCommand(sub) => Some(sub),
            OptionSchema::Variable(_) => None,
        }
    }

    pub fn as_variable(&self) -> Option<&VariableSchema> {
        match self {
            OptionSchema::Variable(variable) => Some(variable),
            OptionSchema::SubCommand(_) => None,
        }
    }
}

impl From<SubCommandSchema> for OptionSchema {
    fn from(sub: SubCommandSchema) -> Self {
        OptionSchema::SubCommand(sub)
    }
}

impl From<VariableSchema> for OptionSchema {
    fn from(variable: VariableSchema) -> Self {
        OptionSchema::Variable(variable)
    }
}

/// Complete schema for one command root.
///
/// # Examples
///
/// ```
/// use slash_schema_core::*;
///
/// let command = CommandSchema::new("command", "Command Description").with_option(
///     SubCommandSchema::new("group", "group")
///         .with_option(SubCommandSchema::new("foo", "foo")),
/// );
///
/// let group = command.find_path(&["group"]).unwrap();
/// assert_eq!(group.option_type(), OptionType::SUB_COMMAND_GROUP);
/// assert!(command.find_path(&["group", "foo"]).is_some());
/// assert!(command.find_path(&["group", "bar"]).is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandSchema {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionSchema>,
}

impl CommandSchema {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            options: Vec::new(),
        }
    }

    /// Adds a top-level option.
    pub fn with_option(mut self, option: impl Into<OptionSchema>) -> Self {
        self.options.push(option.into());
        self
    }

    /// Finds a top-level option by name.
    pub fn find_option(&self, name: &str) -> Option<&OptionSchema> {
        self.options.iter().find(|option| option.name() == name)
    }

    /// Follows a path of option names through nested subcommands.
    pub fn find_path(&self, path: &[&str]) -> Option<&OptionSchema> {
        let (first, rest) = path.split_first()?;
        let mut current = self.find_option(first)?;
        for name in rest {
            current = current.as_sub_command()?.find_option(name)?;
        }
        Some(current)
    }

    /// Gets all top-level option names.
    pub fn option_names(&self) -> Vec<&str> {
        self.options.iter().map(OptionSchema::name).collect()
    }
}
