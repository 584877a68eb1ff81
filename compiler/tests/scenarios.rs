use std::path::PathBuf;

use slash_schema_compiler::*;
use slash_schema_core::{
    Choice, ChoiceValue, CommandSchema, OptionSchema, OptionType, Range, Scope, VariableSchema,
};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn compile_root(tree: &CommandTree, name: &str) -> CommandSchema {
    let root = tree.find_root(name).expect("root should exist");
    SchemaCompiler::default()
        .compile(tree, root)
        .expect("root should compile")
}

fn variable<'a>(command: &'a CommandSchema, path: &[&str]) -> &'a VariableSchema {
    command
        .find_path(path)
        .and_then(OptionSchema::as_variable)
        .unwrap_or_else(|| panic!("missing variable {path:?}"))
}

#[test]
fn test_subcommands_with_ranges_and_choices() {
    let mut tree = CommandTree::new();
    tree.register(
        CommandBuilder::new("command")
            .literal("foo")
            .argument(ArgumentSlot::required(
                "integer",
                ParserSpec::new(ParserKind::Integer).with_bounds(1, 10),
            ))
            .argument(ArgumentSlot::optional(
                "boolean",
                ParserSpec::new(ParserKind::Boolean),
            )),
    )
    .unwrap();
    tree.register(
        CommandBuilder::new("command").literal("bar").argument(
            ArgumentSlot::required("string", ParserSpec::new(ParserKind::String))
                .with_choices(Choice::strings(["cat", "dog"])),
        ),
    )
    .unwrap();

    let command = compile_root(&tree, "command");
    assert_eq!(command.name, "command");
    assert_eq!(command.option_names(), vec!["foo", "bar"]);

    let bar = command.find_option("bar").unwrap().as_sub_command().unwrap();
    assert_eq!(bar.option_type(), OptionType::SUB_COMMAND);
    assert_eq!(bar.options.len(), 1);
    let string = variable(&command, &["bar", "string"]);
    assert_eq!(string.option_type, OptionType::STRING);
    assert!(string.required);
    assert!(!string.autocomplete);
    let values: Vec<&ChoiceValue> = string.choices.iter().map(|c| &c.value).collect();
    assert_eq!(
        values,
        vec![
            &ChoiceValue::String("cat".into()),
            &ChoiceValue::String("dog".into())
        ]
    );

    let foo = command.find_option("foo").unwrap().as_sub_command().unwrap();
    assert_eq!(foo.options.len(), 2);
    let integer = variable(&command, &["foo", "integer"]);
    assert_eq!(integer.option_type, OptionType::INTEGER);
    assert!(integer.required);
    assert!(integer.autocomplete);
    assert_eq!(integer.range, Some(Range::new(1, 10)));

    let boolean = variable(&command, &["foo", "boolean"]);
    assert_eq!(boolean.option_type, OptionType::BOOLEAN);
    assert!(!boolean.required);
    assert!(!boolean.autocomplete);
    assert_eq!(boolean.range, None);
}

#[test]
fn test_subcommand_group() {
    let mut tree = CommandTree::new();
    tree.register(CommandBuilder::new("command").literal("group").literal("foo"))
        .unwrap();
    tree.register(CommandBuilder::new("command").literal("group").literal("bar"))
        .unwrap();

    let command = compile_root(&tree, "command");
    assert_eq!(command.options.len(), 1);

    let group = command.find_option("group").unwrap().as_sub_command().unwrap();
    assert_eq!(group.option_type(), OptionType::SUB_COMMAND_GROUP);

    let children: Vec<(&str, OptionType, usize)> = group
        .options
        .iter()
        .map(|option| {
            let sub = option.as_sub_command().unwrap();
            (sub.name.as_str(), sub.option_type(), sub.options.len())
        })
        .collect();
    assert_eq!(
        children,
        vec![
            ("foo", OptionType::SUB_COMMAND, 0),
            ("bar", OptionType::SUB_COMMAND, 0)
        ]
    );
}

#[test]
fn test_aggregate_expands_in_declaration_order() {
    let mut tree = CommandTree::new();
    tree.register(CommandBuilder::new("teleport").aggregate(
        "destination",
        true,
        vec![
            ArgumentSlot::required("x", ParserSpec::new(ParserKind::Integer)),
            ArgumentSlot::required("world", ParserSpec::new(ParserKind::String)),
            ArgumentSlot::optional("safe", ParserSpec::new(ParserKind::Boolean)),
        ],
    ))
    .unwrap();

    let command = compile_root(&tree, "teleport");
    let expanded: Vec<(&str, OptionType, bool)> = command
        .options
        .iter()
        .map(|option| {
            let variable = option.as_variable().unwrap();
            (
                variable.name.as_str(),
                variable.option_type.clone(),
                variable.required,
            )
        })
        .collect();
    assert_eq!(
        expanded,
        vec![
            ("x", OptionType::INTEGER, true),
            ("world", OptionType::STRING, true),
            ("safe", OptionType::BOOLEAN, false),
        ]
    );
}

#[test]
fn test_scope_merge_across_leaves() {
    let mut tree = CommandTree::new();
    tree.register(
        CommandBuilder::new("command")
            .literal("one")
            .scope(Scope::guilds([1])),
    )
    .unwrap();
    tree.register(
        CommandBuilder::new("command")
            .literal("two")
            .scope(Scope::guilds([2])),
    )
    .unwrap();

    let root = tree.find_root("command").unwrap();
    let reconciler = ScopeReconciler::new();
    assert_eq!(
        reconciler.reconcile_root(&mut tree, root),
        Scope::guilds([1, 2])
    );

    tree.register(
        CommandBuilder::new("command")
            .literal("three")
            .scope(Scope::Global),
    )
    .unwrap();
    assert_eq!(reconciler.reconcile_root(&mut tree, root), Scope::Global);
    assert_eq!(tree.resolved_scope(root), Some(&Scope::Global));
}

#[test]
fn test_fixture_registration_per_guild() {
    let definition = TreeDefinition::load(fixture("commands.yaml")).unwrap();
    let registrar = SchemaRegistrar::new(definition.settings.compiler());
    let mut tree = definition.build_tree().unwrap();

    let global = registrar.compile_for_scope(&mut tree, &Scope::Global);
    assert!(global.is_complete());
    let names: Vec<&str> = global
        .package
        .commands
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(names, vec!["teleport"]);

    let guild = registrar.compile_for_scope(&mut tree, &Scope::guilds([2]));
    let names: Vec<&str> = guild
        .package
        .commands
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(names, vec!["command", "ban"]);

    let ban = guild.package.find_command("ban").unwrap();
    assert_eq!(ban.options[0].option_type(), OptionType::USER);
    let reason = ban.options[1].as_variable().unwrap();
    assert!(reason.autocomplete);
    assert!(reason.choices.is_empty());

    let command = guild.package.find_command("command").unwrap();
    assert_eq!(command.description, "Command Description");

    let other = registrar.compile_for_scope(&mut tree, &Scope::guilds([99]));
    let names: Vec<&str> = other
        .package
        .commands
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(names, vec!["ban"]);
}
