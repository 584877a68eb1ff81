use serde::{Deserialize, Serialize};

use crate::{CommandSchema, Scope};

/// Compiled command schemas for one registration scope.
///
/// A package groups every [`CommandSchema`] whose root overlaps `scope`, so
/// an adapter can push the whole batch to the remote service in one call.
///
/// # Examples
///
/// ```
/// use slash_schema_core::*;
///
/// let mut package = SchemaPackage::new(Scope::guilds([42]));
/// package.commands.push(CommandSchema::new("ping", "Ping the bot"));
/// package.commands.push(CommandSchema::new("echo", "Repeat a message"));
///
/// assert_eq!(package.command_count(), 2);
/// assert!(package.find_command("echo").is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaPackage {
    /// Schema contract version (populated from
    /// [`SCHEMA_CONTRACT_VERSION`](crate::SCHEMA_CONTRACT_VERSION)).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<String>,
    /// Scope the commands were compiled for.
    #[serde(default)]
    pub scope: Scope,
    /// Compiled commands, in root registration order.
    #[serde(default)]
    pub commands: Vec<CommandSchema>,
}

impl SchemaPackage {
    /// Creates an empty package for `scope`.
    ///
    /// The `schema_version` is automatically set from
    /// [`SCHEMA_CONTRACT_VERSION`](crate::SCHEMA_CONTRACT_VERSION).
    pub fn new(scope: Scope) -> Self {
        Self {
            schema_version: Some(crate::SCHEMA_CONTRACT_VERSION.to_string()),
            scope,
            commands: Vec::new(),
        }
    }

    /// Returns the number of commands in this package.
    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    /// Finds a command by name.
    pub fn find_command(&self, name: &str) -> Option<&CommandSchema> {
        self.commands.iter().find(|command| command.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_json_shape() {
        let mut package = SchemaPackage::new(Scope::guilds([1, 2]));
        package.commands.push(CommandSchema::new("ping", "ping"));

        let json = serde_json::to_value(&package).unwrap();
        assert_eq!(json["schema_version"], crate::SCHEMA_CONTRACT_VERSION);
        assert_eq!(json["scope"]["guilds"], serde_json::json!([1, 2]));
        assert_eq!(json["commands"][0]["name"], "ping");
    }

    #[test]
    fn test_package_defaults_when_fields_missing() {
        let package: SchemaPackage = serde_json::from_str("{}").unwrap();
        assert_eq!(package.schema_version, None);
        assert_eq!(package.scope, Scope::Global);
        assert_eq!(package.command_count(), 0);
    }
}
