//! The context threaded through construction and rewriting.
//!
//! A [`Ctxt`] carries the three opaque scope identifiers (current line, variable table, macro
//! table) and the two external collaborators the core consults: the variable table and the macro
//! table. [`Persistence`] is declared here for callers that durably store the canonical
//! node-description format; the core itself never touches it.
//!
//! In-memory implementations of all three contracts live here for tests and the REPL.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use crate::node::{builder, Node, NodeError};

/// An opaque scope identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(u64);

impl ScopeId {
    /// Returns a scope identifier never handed out before in this process.
    pub fn fresh() -> ScopeId {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        ScopeId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// An opaque identifier for a declared macro.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacroId(u64);

impl MacroId {
    /// Returns a macro identifier never handed out before in this process. External
    /// [`MacroTable`] implementations mint their identifiers here.
    pub fn fresh() -> MacroId {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        MacroId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// The external store of named variables.
pub trait VariableTable {
    /// Declares the variable in the given scope if it is not already declared.
    fn ensure_declared(&mut self, scope: ScopeId, name: &str);

    /// Returns the content assigned to the variable, if any.
    fn get_content(&self, scope: ScopeId, name: &str) -> Option<Node>;

    /// Assigns content to the variable, or clears it with [`None`].
    fn set_content(&mut self, scope: ScopeId, name: &str, content: Option<Node>);
}

/// The external store of user-defined macros.
pub trait MacroTable {
    /// Declares the trigger in the given scope if necessary, returning its identifier.
    fn ensure_declared(&mut self, scope: ScopeId, trigger: &str) -> MacroId;

    /// Returns the output template of the macro, with `#0`, `#1`, … placeholders, if one has
    /// been defined.
    fn output_template(&self, scope: ScopeId, id: MacroId) -> Option<String>;

    /// Parses an output template into a node tree whose placeholders are
    /// [`Kind::PlaceHolder`](crate::node::Kind::PlaceHolder) leaves.
    fn try_parse(
        &mut self,
        scope: ScopeId,
        trigger: &str,
        template: &str,
    ) -> Result<Node, NodeError>;
}

/// Durable string storage for the canonical node-description format. Consumed by callers of the
/// serializer; the core neither knows nor cares about the backing medium.
pub trait Persistence {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// The capability object passed through construction and rewrite calls.
pub struct Ctxt {
    /// The scope of the line currently being edited.
    pub line_scope: ScopeId,

    /// The scope variables are resolved in.
    pub variable_scope: ScopeId,

    /// The scope macros are resolved in.
    pub macro_scope: ScopeId,

    /// The variable collaborator.
    pub variables: Box<dyn VariableTable>,

    /// The macro collaborator.
    pub macros: Box<dyn MacroTable>,
}

impl Ctxt {
    /// Creates a context with fresh scopes over the given collaborators.
    pub fn new(variables: Box<dyn VariableTable>, macros: Box<dyn MacroTable>) -> Ctxt {
        Ctxt {
            line_scope: ScopeId::fresh(),
            variable_scope: ScopeId::fresh(),
            macro_scope: ScopeId::fresh(),
            variables,
            macros,
        }
    }

    /// Creates a context backed by the in-memory collaborators.
    pub fn in_memory() -> Ctxt {
        Ctxt::new(
            Box::new(InMemoryVariables::default()),
            Box::new(InMemoryMacros::default()),
        )
    }
}

impl Default for Ctxt {
    fn default() -> Self {
        Ctxt::in_memory()
    }
}

/// An in-memory variable table.
#[derive(Default)]
pub struct InMemoryVariables {
    entries: HashMap<(ScopeId, String), Option<Node>>,
}

impl VariableTable for InMemoryVariables {
    fn ensure_declared(&mut self, scope: ScopeId, name: &str) {
        self.entries.entry((scope, name.to_string())).or_insert(None);
    }

    fn get_content(&self, scope: ScopeId, name: &str) -> Option<Node> {
        self.entries.get(&(scope, name.to_string()))
            .and_then(|content| content.as_ref())
            .map(Node::detached)
    }

    fn set_content(&mut self, scope: ScopeId, name: &str, content: Option<Node>) {
        self.entries.insert((scope, name.to_string()), content);
    }
}

/// An in-memory macro table. Templates are written in the formula language, with `#0`, `#1`, …
/// marking the positional arguments.
#[derive(Default)]
pub struct InMemoryMacros {
    ids: HashMap<(ScopeId, String), MacroId>,
    templates: HashMap<(ScopeId, MacroId), String>,
}

impl InMemoryMacros {
    /// Declares a macro and assigns its output template.
    pub fn define(&mut self, scope: ScopeId, trigger: &str, template: &str) -> MacroId {
        let id = *self.ids.entry((scope, trigger.to_string())).or_insert_with(MacroId::fresh);
        self.templates.insert((scope, id), template.to_string());
        id
    }
}

impl MacroTable for InMemoryMacros {
    fn ensure_declared(&mut self, scope: ScopeId, trigger: &str) -> MacroId {
        *self.ids.entry((scope, trigger.to_string())).or_insert_with(MacroId::fresh)
    }

    fn output_template(&self, scope: ScopeId, id: MacroId) -> Option<String> {
        self.templates.get(&(scope, id)).cloned()
    }

    fn try_parse(
        &mut self,
        scope: ScopeId,
        trigger: &str,
        template: &str,
    ) -> Result<Node, NodeError> {
        let _ = scope;
        let source = hide_placeholders(template);
        let mut scratch = Ctxt::in_memory();
        let tree = builder::parse(&source, &mut scratch).map_err(|err| NodeError::Template {
            trigger: trigger.to_string(),
            message: format!("{:?}", err.kind),
        })?;
        Ok(restore_placeholders(&tree))
    }
}

/// The identifier prefix placeholders are hidden behind while the template is parsed.
const PLACEHOLDER_PREFIX: &str = "__arg_";

/// Rewrites `#N` placeholders into identifiers the formula language accepts.
fn hide_placeholders(template: &str) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '#' && chars.peek().is_some_and(|next| next.is_ascii_digit()) {
            out.push_str(PLACEHOLDER_PREFIX);
            while let Some(digit) = chars.next_if(|next| next.is_ascii_digit()) {
                out.push(digit);
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Turns the hidden placeholder identifiers back into placeholder leaves.
fn restore_placeholders(node: &Node) -> Node {
    if node.kind() == crate::node::Kind::Variable {
        if let Some(index) = node.value().strip_prefix(PLACEHOLDER_PREFIX) {
            if let Ok(index) = index.parse::<usize>() {
                return Node::placeholder(index);
            }
        }
    }
    node.remade(node.children().iter().map(restore_placeholders).collect())
}
