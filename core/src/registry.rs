//! Mapping between argument value kinds and option types.
//!
//! The host command framework tags every argument slot with a [`ValueKind`].
//! The [`OptionTypeRegistry`] resolves that tag to the [`OptionType`] used in
//! the compiled schema. Kinds without a mapping resolve to
//! [`OptionType::STRING`], since any value can be sent as text.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::OptionType;

/// Value type of an argument slot, as reported by the host framework.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    String,
    Byte,
    Short,
    Integer,
    Long,
    Float,
    Double,
    Boolean,
    Char,
    Uuid,
    Duration,
    User,
    Member,
    Channel,
    Role,
    Mentionable,
    Attachment,
    /// A host-defined type identified by name.
    Custom(String),
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::String => "string",
            ValueKind::Byte => "byte",
            ValueKind::Short => "short",
            ValueKind::Integer => "integer",
            ValueKind::Long => "long",
            ValueKind::Float => "float",
            ValueKind::Double => "double",
            ValueKind::Boolean => "boolean",
            ValueKind::Char => "char",
            ValueKind::Uuid => "uuid",
            ValueKind::Duration => "duration",
            ValueKind::User => "user",
            ValueKind::Member => "member",
            ValueKind::Channel => "channel",
            ValueKind::Role => "role",
            ValueKind::Mentionable => "mentionable",
            ValueKind::Attachment => "attachment",
            ValueKind::Custom(name) => return write!(f, "custom:{name}"),
        };
        f.write_str(name)
    }
}

/// Bidirectional lookup table of option types.
///
/// # Examples
///
/// ```
/// use slash_schema_core::{OptionType, OptionTypeRegistry, ValueKind};
///
/// let mut registry = OptionTypeRegistry::new();
/// assert_eq!(registry.resolve(&ValueKind::Integer), OptionType::INTEGER);
/// // Unmapped kinds fall back to STRING.
/// assert_eq!(registry.resolve(&ValueKind::Uuid), OptionType::STRING);
///
/// let color = OptionType::new("COLOR", 42);
/// registry.register(color.clone(), ValueKind::Custom("color".into()));
/// assert_eq!(registry.by_code(42), Some(&color));
/// assert_eq!(registry.by_name("color"), Some(&color));
/// ```
#[derive(Debug, Clone)]
pub struct OptionTypeRegistry {
    types: BTreeMap<u8, OptionType>,
    mappings: HashMap<ValueKind, OptionType>,
}

impl Default for OptionTypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl OptionTypeRegistry {
    /// Creates a registry holding the base types and the standard mappings
    /// for strings, integers, booleans and doubles.
    pub fn new() -> Self {
        let mut registry = Self {
            types: OptionType::BASE
                .into_iter()
                .map(|option_type| (option_type.code, option_type))
                .collect(),
            mappings: HashMap::new(),
        };
        registry
            .register(OptionType::STRING, ValueKind::String)
            .register(OptionType::INTEGER, ValueKind::Integer)
            .register(OptionType::BOOLEAN, ValueKind::Boolean)
            .register(OptionType::NUMBER, ValueKind::Double);
        registry
    }

    /// Creates a registry that also maps the platform reference kinds
    /// (users, channels, roles, mentionables and attachments).
    pub fn with_platform_types() -> Self {
        let mut registry = Self::new();
        registry
            .register(OptionType::USER, ValueKind::User)
            .register(OptionType::USER, ValueKind::Member)
            .register(OptionType::CHANNEL, ValueKind::Channel)
            .register(OptionType::ROLE, ValueKind::Role)
            .register(OptionType::MENTIONABLE, ValueKind::Mentionable)
            .register(OptionType::ATTACHMENT, ValueKind::Attachment);
        registry
    }

    /// Maps `kind` to `option_type`, replacing any earlier mapping for the
    /// same kind.
    pub fn register(&mut self, option_type: OptionType, kind: ValueKind) -> &mut Self {
        self.types.insert(option_type.code, option_type.clone());
        self.mappings.insert(kind, option_type);
        self
    }

    /// Resolves the option type for a value kind, falling back to STRING.
    pub fn resolve(&self, kind: &ValueKind) -> OptionType {
        self.mappings
            .get(kind)
            .cloned()
            .unwrap_or(OptionType::STRING)
    }

    /// Looks up a known type by its numeric code.
    pub fn by_code(&self, code: u8) -> Option<&OptionType> {
        self.types.get(&code)
    }

    /// Looks up a known type by name, ignoring ASCII case.
    pub fn by_name(&self, name: &str) -> Option<&OptionType> {
        self.types
            .values()
            .find(|option_type| option_type.name.eq_ignore_ascii_case(name))
    }

    /// Returns true if `option_type` is known under its code and name.
    pub fn contains(&self, option_type: &OptionType) -> bool {
        self.by_code(option_type.code) == Some(option_type)
    }

    /// All known types, ordered by code.
    pub fn all_types(&self) -> impl Iterator<Item = &OptionType> {
        self.types.values()
    }
}
