use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use slash_schema_compiler::{
    OutputFormat, SchemaRegistrar, ScopeReconciler, TreeDefinition, format_package,
};
use slash_schema_core::{OptionTypeRegistry, SchemaPackage, Scope, validate_package};
use tracing::{Level, debug};

#[derive(Debug, Parser)]
#[command(name = "slash-schema")]
#[command(about = "Compile command tree definitions into slash-command schemas", version)]
struct Cli {
    /// Enable debug logging on stderr.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compile every command visible in a scope into a schema package.
    Compile(CompileArgs),
    /// Print the resolved scope of each command root.
    Scopes(ScopesArgs),
    /// Validate one or more compiled package JSON files.
    Validate(ValidateArgs),
    /// List the option types known to the compiler.
    Types(TypesArgs),
}

#[derive(Debug, Args)]
struct CompileArgs {
    /// Tree definition file (YAML or JSON).
    #[arg(long)]
    input: PathBuf,
    /// Target scope: `global`, `all`, or comma-separated guild ids.
    #[arg(long, default_value = "global")]
    scope: Scope,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: OutputFormat,
    /// Write the package to this file instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct ScopesArgs {
    /// Tree definition file (YAML or JSON).
    #[arg(long)]
    input: PathBuf,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Package JSON files.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
    /// Tree definition whose settings provide the known option types.
    /// Defaults to the base and platform types.
    #[arg(long)]
    definitions: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct TypesArgs {
    /// Include the platform reference types.
    #[arg(long)]
    platform: bool,
    /// Tree definition whose settings provide the option types.
    #[arg(long, conflicts_with = "platform")]
    input: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Compile(args) => run_compile(args),
        Command::Scopes(args) => run_scopes(args),
        Command::Validate(args) => run_validate(args),
        Command::Types(args) => run_types(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_definition(path: &Path) -> Result<TreeDefinition, String> {
    TreeDefinition::load(path).map_err(|err| format!("Failed to load '{}': {err}", path.display()))
}

fn run_compile(args: CompileArgs) -> Result<(), String> {
    let definition = load_definition(&args.input)?;
    let registrar = SchemaRegistrar::new(definition.settings.compiler());
    let mut tree = definition.into_tree().map_err(|err| err.to_string())?;

    let outcome = registrar.compile_for_scope(&mut tree, &args.scope);
    let rendered = format_package(&outcome.package, args.format)?;

    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).map_err(|err| {
                        format!(
                            "Failed to create output directory '{}': {err}",
                            parent.display()
                        )
                    })?;
                }
            }
            fs::write(path, rendered)
                .map_err(|err| format!("Failed to write '{}': {err}", path.display()))?;
            println!(
                "Compiled {} command(s) for {} into '{}'.",
                outcome.package.command_count(),
                args.scope,
                path.display()
            );
        }
        None => println!("{rendered}"),
    }

    if !outcome.is_complete() {
        eprintln!("\nFailures:");
        for failure in &outcome.failures {
            eprintln!("  {}", failure.error);
        }
        return Err(format!(
            "{} command(s) failed to compile",
            outcome.failures.len()
        ));
    }

    Ok(())
}

fn run_scopes(args: ScopesArgs) -> Result<(), String> {
    let definition = load_definition(&args.input)?;
    let mut tree = definition.into_tree().map_err(|err| err.to_string())?;
    ScopeReconciler::new().reconcile(&mut tree);

    let width = tree
        .roots()
        .iter()
        .map(|&root| tree.component(root).name().len())
        .max()
        .unwrap_or(4);
    for &root in tree.roots() {
        let scope = tree.resolved_scope(root).cloned().unwrap_or_default();
        println!(
            "{:<width$}  {scope}",
            tree.component(root).name(),
            width = width
        );
    }
    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let registry = match &args.definitions {
        Some(path) => load_definition(path)?.settings.registry(),
        None => OptionTypeRegistry::with_platform_types(),
    };

    let mut commands = 0;
    let mut failed = 0;
    for path in &args.inputs {
        let raw = fs::read_to_string(path)
            .map_err(|err| format!("Failed to read '{}': {err}", path.display()))?;
        let package: SchemaPackage = serde_json::from_str(&raw)
            .map_err(|err| format!("Failed to parse '{}': {err}", path.display()))?;

        let errors = validate_package(&package, &registry);
        debug!(path = %path.display(), errors = errors.len(), "Validated package");
        if !errors.is_empty() {
            failed += 1;
            eprintln!("{}:", path.display());
            for error in &errors {
                eprintln!("  {error}");
            }
        }
        commands += package.command_count();
    }

    if failed > 0 {
        return Err(format!("{failed} package file(s) failed validation"));
    }

    println!(
        "Validated {} package file(s) with {commands} command(s).",
        args.inputs.len()
    );
    Ok(())
}

fn run_types(args: TypesArgs) -> Result<(), String> {
    let registry = match &args.input {
        Some(path) => load_definition(path)?.settings.registry(),
        None if args.platform => OptionTypeRegistry::with_platform_types(),
        None => OptionTypeRegistry::new(),
    };

    for option_type in registry.all_types() {
        println!("{:>3}  {option_type}", option_type.code);
    }
    Ok(())
}
