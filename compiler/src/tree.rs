//! Host command tree.
//!
//! A trie of command components stored in an arena. Every registered
//! command is a path from a literal root down to a terminal node; paths that
//! share a prefix share nodes. The tree is built with [`CommandTree::register`],
//! stamped with resolved scopes by the [`ScopeReconciler`](crate::ScopeReconciler)
//! and read by the [`SchemaCompiler`](crate::SchemaCompiler).
//!
//! # Examples
//!
//! ```
//! use slash_schema_compiler::*;
//! use slash_schema_core::Scope;
//!
//! let mut tree = CommandTree::new();
//! tree.register(
//!     CommandBuilder::new("command")
//!         .literal("foo")
//!         .argument(ArgumentSlot::required("integer", ParserSpec::new(ParserKind::Integer).with_bounds(1, 10))),
//! )
//! .unwrap();
//! tree.register(CommandBuilder::new("command").literal("bar").scope(Scope::guilds([1])))
//!     .unwrap();
//!
//! let root = tree.find_root("command").unwrap();
//! assert_eq!(tree.children(root).len(), 2);
//! assert!(tree.find_path(&["command", "foo", "integer"]).is_some());
//! ```

use std::fmt;
use std::str::FromStr;

use slash_schema_core::{Choice, NumericValue, Scope, ValueKind};

use crate::error::TreeError;

/// Index of a node inside a [`CommandTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Concrete parser behind an argument slot.
///
/// Only the bounded numeric kinds carry ranges; see
/// [`RangeExtractor`](crate::RangeExtractor).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParserKind {
    Byte,
    Short,
    Integer,
    Long,
    Float,
    Double,
    Boolean,
    String,
    /// A host-defined parser identified by name.
    Other(String),
}

impl ParserKind {
    /// Value kind produced by this parser.
    pub fn value_kind(&self) -> ValueKind {
        match self {
            ParserKind::Byte => ValueKind::Byte,
            ParserKind::Short => ValueKind::Short,
            ParserKind::Integer => ValueKind::Integer,
            ParserKind::Long => ValueKind::Long,
            ParserKind::Float => ValueKind::Float,
            ParserKind::Double => ValueKind::Double,
            ParserKind::Boolean => ValueKind::Boolean,
            ParserKind::String => ValueKind::String,
            ParserKind::Other(name) => ValueKind::Custom(name.clone()),
        }
    }
}

impl fmt::Display for ParserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParserKind::Byte => "byte",
            ParserKind::Short => "short",
            ParserKind::Integer => "integer",
            ParserKind::Long => "long",
            ParserKind::Float => "float",
            ParserKind::Double => "double",
            ParserKind::Boolean => "boolean",
            ParserKind::String => "string",
            ParserKind::Other(name) => name,
        };
        f.write_str(name)
    }
}

impl FromStr for ParserKind {
    type Err = std::convert::Infallible;

    /// Parses a parser name. Unknown names become [`ParserKind::Other`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "byte" => ParserKind::Byte,
            "short" => ParserKind::Short,
            "integer" | "int" => ParserKind::Integer,
            "long" => ParserKind::Long,
            "float" => ParserKind::Float,
            "double" | "number" => ParserKind::Double,
            "boolean" | "bool" => ParserKind::Boolean,
            "string" => ParserKind::String,
            _ => ParserKind::Other(s.trim().to_string()),
        })
    }
}

/// Parser of an argument slot together with its declared bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct ParserSpec {
    pub kind: ParserKind,
    pub min: Option<NumericValue>,
    pub max: Option<NumericValue>,
}

impl ParserSpec {
    /// Creates an unbounded parser.
    pub fn new(kind: ParserKind) -> Self {
        Self {
            kind,
            min: None,
            max: None,
        }
    }

    pub fn with_min(mut self, min: impl Into<NumericValue>) -> Self {
        self.min = Some(min.into());
        self
    }

    pub fn with_max(mut self, max: impl Into<NumericValue>) -> Self {
        self.max = Some(max.into());
        self
    }

    /// Declares both bounds.
    pub fn with_bounds(self, min: impl Into<NumericValue>, max: impl Into<NumericValue>) -> Self {
        self.with_min(min).with_max(max)
    }

    /// Returns true if either bound is declared.
    pub fn has_bounds(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }
}

/// Where an argument's suggestions come from.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SuggestionSource {
    /// No suggestions.
    #[default]
    None,
    /// Suggestions computed at runtime by the named provider. Never invoked
    /// during compilation.
    Dynamic(String),
    /// A fixed, finite list of choices.
    Choices(Vec<Choice>),
}

/// A single typed argument slot.
///
/// # Examples
///
/// ```
/// use slash_schema_compiler::{ArgumentSlot, ParserKind, ParserSpec};
/// use slash_schema_core::ValueKind;
///
/// let slot = ArgumentSlot::optional("count", ParserSpec::new(ParserKind::Integer));
/// assert_eq!(slot.value_kind, ValueKind::Integer);
/// assert!(!slot.required);
///
/// let member = ArgumentSlot::required("target", ParserSpec::new(ParserKind::Other("member".into())))
///     .with_value_kind(ValueKind::Member);
/// assert_eq!(member.value_kind, ValueKind::Member);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentSlot {
    pub name: String,
    /// Possibly empty; the compiler falls back to `name`.
    pub description: String,
    pub required: bool,
    pub value_kind: ValueKind,
    pub suggestions: SuggestionSource,
    pub parser: ParserSpec,
}

impl ArgumentSlot {
    /// Creates a slot whose value kind is derived from `parser`.
    pub fn new(name: impl Into<String>, required: bool, parser: ParserSpec) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            required,
            value_kind: parser.kind.value_kind(),
            suggestions: SuggestionSource::None,
            parser,
        }
    }

    pub fn required(name: impl Into<String>, parser: ParserSpec) -> Self {
        Self::new(name, true, parser)
    }

    pub fn optional(name: impl Into<String>, parser: ParserSpec) -> Self {
        Self::new(name, false, parser)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Overrides the value kind derived from the parser.
    pub fn with_value_kind(mut self, value_kind: ValueKind) -> Self {
        self.value_kind = value_kind;
        self
    }

    pub fn with_suggestions(mut self, suggestions: SuggestionSource) -> Self {
        self.suggestions = suggestions;
        self
    }

    /// Offers a fixed list of choices.
    pub fn with_choices(self, choices: Vec<Choice>) -> Self {
        self.with_suggestions(SuggestionSource::Choices(choices))
    }
}

/// What a tree node stands for.
#[derive(Debug, Clone, PartialEq)]
pub enum Component {
    /// A keyword matched by name.
    Literal { name: String, description: String },
    /// One typed argument.
    Argument(ArgumentSlot),
    /// One logical argument made of several adjacent slots.
    Aggregate {
        name: String,
        description: String,
        required: bool,
        slots: Vec<ArgumentSlot>,
    },
}

impl Component {
    /// Creates a literal without description.
    pub fn literal(name: impl Into<String>) -> Self {
        Component::Literal {
            name: name.into(),
            description: String::new(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Component::Literal { name, .. } | Component::Aggregate { name, .. } => name,
            Component::Argument(slot) => &slot.name,
        }
    }

    /// Returns the description, which may be empty.
    pub fn description(&self) -> &str {
        match self {
            Component::Literal { description, .. } | Component::Aggregate { description, .. } => {
                description
            }
            Component::Argument(slot) => &slot.description,
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Component::Literal { .. })
    }

    /// Returns true if `other` may share this node: literals match by name,
    /// arguments need an identical definition.
    fn merges_with(&self, other: &Component) -> bool {
        match (self, other) {
            (Component::Literal { name: a, .. }, Component::Literal { name: b, .. }) => a == b,
            _ => self == other,
        }
    }
}

/// Marks the node that terminates a registered command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandMeta {
    /// Scope declared by the command author. `None` means global.
    pub scope: Option<Scope>,
}

/// One node of the command tree.
#[derive(Debug, Clone)]
pub struct CommandNode {
    pub component: Component,
    /// Children in registration order.
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
    pub command: Option<CommandMeta>,
    /// Written by the scope reconciler.
    pub resolved_scope: Option<Scope>,
}

impl CommandNode {
    fn new(component: Component, parent: Option<NodeId>) -> Self {
        Self {
            component,
            children: Vec::new(),
            parent,
            command: None,
            resolved_scope: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Describes one command path to register.
///
/// The first component is always the root literal.
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    components: Vec<Component>,
    scope: Option<Scope>,
}

impl CommandBuilder {
    /// Starts a path at the root literal `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            components: vec![Component::literal(name)],
            scope: None,
        }
    }

    /// Starts from arbitrary components. Registration rejects empty paths and
    /// non-literal roots.
    pub fn from_components(components: Vec<Component>) -> Self {
        Self {
            components,
            scope: None,
        }
    }

    pub fn literal(mut self, name: impl Into<String>) -> Self {
        self.components.push(Component::literal(name));
        self
    }

    /// Sets the description of the most recently added literal or aggregate.
    /// Argument descriptions are set on the [`ArgumentSlot`].
    pub fn description(mut self, text: impl Into<String>) -> Self {
        if let Some(
            Component::Literal { description, .. } | Component::Aggregate { description, .. },
        ) = self.components.last_mut()
        {
            *description = text.into();
        }
        self
    }

    pub fn argument(mut self, slot: ArgumentSlot) -> Self {
        self.components.push(Component::Argument(slot));
        self
    }

    pub fn aggregate(
        mut self,
        name: impl Into<String>,
        required: bool,
        slots: Vec<ArgumentSlot>,
    ) -> Self {
        self.components.push(Component::Aggregate {
            name: name.into(),
            description: String::new(),
            required,
            slots,
        });
        self
    }

    /// Declares the command's visibility. Commands without a scope are global.
    pub fn scope(mut self, scope: Scope) -> Self {
        self.scope = Some(scope);
        self
    }
}

/// Arena-backed command trie.
#[derive(Debug, Clone, Default)]
pub struct CommandTree {
    nodes: Vec<CommandNode>,
    roots: Vec<NodeId>,
}

impl CommandTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges a command path into the tree and returns its terminal node.
    ///
    /// The tree is left unchanged when an error is returned.
    pub fn register(&mut self, builder: CommandBuilder) -> Result<NodeId, TreeError> {
        let CommandBuilder { components, scope } = builder;
        let Some(root) = components.first() else {
            return Err(TreeError::EmptyPath);
        };
        if !root.is_literal() {
            return Err(TreeError::RootNotLiteral(root.name().to_string()));
        }

        let path = join_names(&components);
        let matched = self.locate(&components)?;
        if matched.len() == components.len() {
            if let Some(terminal) = matched.last() {
                if self.nodes[terminal.0].command.is_some() {
                    return Err(TreeError::DuplicateCommand(path));
                }
            }
        }

        let mut current = None;
        for (index, component) in components.into_iter().enumerate() {
            current = match matched.get(index) {
                Some(&id) => {
                    self.fill_description(id, &component);
                    Some(id)
                }
                None => Some(self.push_node(component, current)),
            };
        }

        let Some(terminal) = current else {
            return Err(TreeError::EmptyPath);
        };
        self.nodes[terminal.0].command = Some(CommandMeta { scope });
        tracing::debug!(command = %path, node = %terminal, "Registered command");
        Ok(terminal)
    }

    /// Returns the existing nodes matching the leading components of a path.
    fn locate(&self, components: &[Component]) -> Result<Vec<NodeId>, TreeError> {
        let mut matched: Vec<NodeId> = Vec::new();
        for (index, component) in components.iter().enumerate() {
            let siblings = match matched.last() {
                Some(id) => &self.nodes[id.0].children,
                None => &self.roots,
            };
            let same_name = siblings
                .iter()
                .copied()
                .find(|id| self.nodes[id.0].component.name() == component.name());
            match same_name {
                Some(id) if self.nodes[id.0].component.merges_with(component) => {
                    matched.push(id);
                }
                Some(_) => {
                    return Err(TreeError::ConflictingArgument {
                        path: join_names(&components[..index]),
                        name: component.name().to_string(),
                    });
                }
                None => break,
            }
        }
        Ok(matched)
    }

    fn fill_description(&mut self, id: NodeId, incoming: &Component) {
        if let (
            Component::Literal { description, .. },
            Component::Literal {
                description: new_description,
                ..
            },
        ) = (&mut self.nodes[id.0].component, incoming)
        {
            if description.is_empty() && !new_description.is_empty() {
                *description = new_description.clone();
            }
        }
    }

    fn push_node(&mut self, component: Component, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(CommandNode::new(component, parent));
        match parent {
            Some(parent) => self.nodes[parent.0].children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    /// Root nodes in registration order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Returns the node for `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not produced by this tree.
    pub fn node(&self, id: NodeId) -> &CommandNode {
        &self.nodes[id.0]
    }

    pub fn get(&self, id: NodeId) -> Option<&CommandNode> {
        self.nodes.get(id.0)
    }

    pub fn component(&self, id: NodeId) -> &Component {
        &self.nodes[id.0].component
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.nodes[id.0].is_leaf()
    }

    /// Scope stamped by the last reconciliation, if any.
    pub fn resolved_scope(&self, id: NodeId) -> Option<&Scope> {
        self.nodes[id.0].resolved_scope.as_ref()
    }

    pub(crate) fn set_resolved_scope(&mut self, id: NodeId, scope: Option<Scope>) {
        self.nodes[id.0].resolved_scope = scope;
    }

    /// Declared scope of the command terminating at `id`, if one was declared.
    pub fn declared_scope(&self, id: NodeId) -> Option<&Scope> {
        self.nodes[id.0].command.as_ref()?.scope.as_ref()
    }

    pub fn find_root(&self, name: &str) -> Option<NodeId> {
        self.roots
            .iter()
            .copied()
            .find(|id| self.nodes[id.0].component.name() == name)
    }

    /// Follows component names from a root down the tree.
    pub fn find_path(&self, names: &[&str]) -> Option<NodeId> {
        let (root, rest) = names.split_first()?;
        let mut current = self.find_root(root)?;
        for name in rest {
            current = self.nodes[current.0]
                .children
                .iter()
                .copied()
                .find(|id| self.nodes[id.0].component.name() == *name)?;
        }
        Some(current)
    }

    /// Nodes of the subtree under `id` (inclusive), in pre-order.
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.nodes[current.0].children.iter().rev().copied());
        }
        out
    }

    /// Space-separated component names from the root down to `id`.
    pub fn path_of(&self, id: NodeId) -> String {
        let mut names = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            names.push(self.nodes[current.0].component.name());
            cursor = self.nodes[current.0].parent;
        }
        names.reverse();
        names.join(" ")
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

fn join_names(components: &[Component]) -> String {
    components
        .iter()
        .map(Component::name)
        .collect::<Vec<_>>()
        .join(" ")
}
