//! Output formatting for compiled schemas and packages.

use slash_schema_core::{CommandSchema, OptionSchema, SchemaPackage};

/// Supported output formats.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OutputFormat {
    Json,
    Yaml,
    Markdown,
    Table,
}

/// Formats a package in the requested output format.
pub fn format_package(package: &SchemaPackage, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(package)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(package).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Markdown => Ok(package_to_markdown(package)),
        OutputFormat::Table => Ok(package_to_table(package)),
    }
}

/// Formats a single command in the requested output format.
pub fn format_command(command: &CommandSchema, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(command)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(command).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Markdown => Ok(command_to_markdown(command)),
        OutputFormat::Table => Ok(command_to_table(command)),
    }
}

fn package_to_markdown(package: &SchemaPackage) -> String {
    let mut out = String::new();

    out.push_str(&format!("# Commands for {}\n\n", package.scope));
    if let Some(ref version) = package.schema_version {
        out.push_str(&format!("**Schema version:** {version}\n\n"));
    }
    for command in &package.commands {
        out.push_str(&command_to_markdown(command));
    }

    out
}

fn command_to_markdown(command: &CommandSchema) -> String {
    let mut out = String::new();

    out.push_str(&format!("## /{}\n\n{}\n\n", command.name, command.description));

    let mut rows = Vec::new();
    collect_rows(&command.options, &command.name, &mut rows);
    if !rows.is_empty() {
        out.push_str("| Option | Type | Required | Details |\n");
        out.push_str("|--------|------|----------|---------|\n");
        for row in &rows {
            out.push_str(&format!(
                "| `{}` | {} | {} | {} |\n",
                row.path, row.option_type, row.required, row.details
            ));
        }
        out.push('\n');
    }

    out
}

fn package_to_table(package: &SchemaPackage) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Scope: {}  Commands: {}\n",
        package.scope,
        package.command_count()
    ));
    for command in &package.commands {
        out.push('\n');
        out.push_str(&command_to_table(command));
    }

    out
}

fn command_to_table(command: &CommandSchema) -> String {
    let mut out = String::new();

    out.push_str(&format!("/{}  {}\n", command.name, command.description));

    let mut rows = Vec::new();
    collect_rows(&command.options, &command.name, &mut rows);
    let max_path = rows.iter().map(|row| row.path.len()).max().unwrap_or(4);
    let max_type = rows
        .iter()
        .map(|row| row.option_type.len())
        .max()
        .unwrap_or(4);

    for row in &rows {
        out.push_str(&format!(
            "  {:<path$}  {:<kind$}  {:<3}  {}\n",
            row.path,
            row.option_type,
            row.required,
            row.details,
            path = max_path,
            kind = max_type
        ));
    }

    out
}

struct Row {
    path: String,
    option_type: String,
    required: &'static str,
    details: String,
}

fn collect_rows(options: &[OptionSchema], prefix: &str, rows: &mut Vec<Row>) {
    for option in options {
        let path = format!("{prefix} {}", option.name());
        match option {
            OptionSchema::SubCommand(sub) => {
                rows.push(Row {
                    path: path.clone(),
                    option_type: sub.option_type().to_string(),
                    required: "",
                    details: sub.description.clone(),
                });
                collect_rows(&sub.options, &path, rows);
            }
            OptionSchema::Variable(variable) => {
                let mut details = Vec::new();
                if !variable.choices.is_empty() {
                    let names: Vec<&str> =
                        variable.choices.iter().map(|c| c.name.as_str()).collect();
                    details.push(format!("choices: {}", names.join(", ")));
                }
                if let Some(range) = variable.range {
                    details.push(format!("range: {range}"));
                }
                if variable.autocomplete {
                    details.push("autocomplete".to_string());
                }
                rows.push(Row {
                    path,
                    option_type: variable.option_type.to_string(),
                    required: if variable.required { "yes" } else { "no" },
                    details: details.join("; "),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use slash_schema_core::{Choice, OptionType, Range, Scope, SubCommandSchema, VariableSchema};

    use super::*;

    fn sample_command() -> CommandSchema {
        CommandSchema::new("command", "Command Description")
            .with_option(
                SubCommandSchema::new("foo", "Foo things").with_option(
                    VariableSchema::new("integer", "integer", OptionType::INTEGER)
                        .required()
                        .with_autocomplete(true)
                        .with_range(Range::new(1, 10)),
                ),
            )
            .with_option(
                SubCommandSchema::new("bar", "bar").with_option(
                    VariableSchema::new("string", "string", OptionType::STRING)
                        .with_choices(Choice::strings(["cat", "dog"])),
                ),
            )
    }

    #[test]
    fn test_markdown_lists_nested_options() {
        let out = format_command(&sample_command(), OutputFormat::Markdown).unwrap();
        assert!(out.starts_with("## /command\n"));
        assert!(out.contains("| `command foo integer` | INTEGER | yes | range: 1..=10; autocomplete |"));
        assert!(out.contains("| `command bar string` | STRING | no | choices: cat, dog |"));
    }

    #[test]
    fn test_table_aligns_columns() {
        let mut package = SchemaPackage::new(Scope::guilds([3]));
        package.commands.push(sample_command());
        let out = format_package(&package, OutputFormat::Table).unwrap();
        assert!(out.starts_with("Scope: guilds(3)  Commands: 1\n"));
        assert!(out.contains("/command  Command Description"));
        assert!(out.contains("SUB_COMMAND"));
    }

    #[test]
    fn test_json_and_yaml_serialize_package() {
        let mut package = SchemaPackage::new(Scope::Global);
        package.commands.push(sample_command());

        let json = format_package(&package, OutputFormat::Json).unwrap();
        let parsed: SchemaPackage = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, package);

        let yaml = format_package(&package, OutputFormat::Yaml).unwrap();
        assert!(yaml.contains("name: command"));
    }
}
