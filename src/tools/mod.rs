pub mod definition;

pub use definition::{Handler, HandlerFuture, ParamKind, ToolDefinition, ToolParam};

use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;
use tracing::debug;

/// Errors raised by the dispatcher or by a handler rejecting its input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Tool already registered: {0}")]
    DuplicateTool(String),

    #[error("Missing '{param}' argument for tool {tool}")]
    MissingArgument { tool: String, param: String },

    #[error("Invalid '{param}' argument: {reason}")]
    InvalidArgument { param: String, reason: String },
}

// ---------------------------------------------------------------------------
// Arguments
// ---------------------------------------------------------------------------

/// Text arguments of one invocation, keyed by parameter name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolArgs(BTreeMap<String, String>);

impl ToolArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Convert a JSON argument object. Strings pass through, numbers and
    /// booleans are rendered as text, nulls are dropped.
    pub fn from_json(object: &Map<String, Value>) -> Self {
        Self::from_json_for(None, object)
    }

    /// Like [`ToolArgs::from_json`], but numbers given for a declared
    /// [`ParamKind::Number`] parameter are rendered as floats (`40` as `40.0`).
    pub fn from_json_for(definition: Option<&ToolDefinition>, object: &Map<String, Value>) -> Self {
        let is_number = |key: &str| {
            definition.is_some_and(|d| {
                d.params
                    .iter()
                    .any(|p| p.name == key && p.kind == ParamKind::Number)
            })
        };

        let mut args = Self::new();
        for (key, value) in object {
            let text = match value {
                Value::Null => continue,
                Value::String(s) => s.clone(),
                Value::Number(n) if is_number(key) => match n.as_f64() {
                    Some(f) => Value::from(f).to_string(),
                    None => n.to_string(),
                },
                other => other.to_string(),
            };
            args.insert(key.clone(), text);
        }
        args
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Value of `name`, or `""` when absent. The registry guarantees declared
    /// parameters are present before a handler runs.
    pub fn value(&self, name: &str) -> &str {
        self.get(name).unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

struct RegisteredTool<C> {
    definition: ToolDefinition,
    handler: Handler<C>,
}

/// Explicit name → (definition, handler) table, populated at startup.
pub struct ToolRegistry<C> {
    tools: Vec<RegisteredTool<C>>,
    index: HashMap<&'static str, usize>,
}

impl<C> Default for ToolRegistry<C> {
    fn default() -> Self {
        Self {
            tools: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<C> ToolRegistry<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. Names must be unique.
    pub fn register(&mut self, definition: ToolDefinition, handler: Handler<C>) -> Result<(), ToolError> {
        if self.index.contains_key(definition.name) {
            return Err(ToolError::DuplicateTool(definition.name.to_string()));
        }
        self.index.insert(definition.name, self.tools.len());
        self.tools.push(RegisteredTool { definition, handler });
        Ok(())
    }

    /// Definitions in registration order.
    pub fn definitions(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.tools.iter().map(|t| &t.definition)
    }

    pub fn definition(&self, name: &str) -> Option<&ToolDefinition> {
        self.index.get(name).map(|&i| &self.tools[i].definition)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Invoke a tool by name.
    pub async fn invoke(&self, ctx: &C, name: &str, args: &ToolArgs) -> Result<String, ToolError> {
        let tool = self
            .index
            .get(name)
            .map(|&i| &self.tools[i])
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;

        if let Some(missing) = tool
            .definition
            .params
            .iter()
            .find(|p| args.get(p.name).is_none())
        {
            return Err(ToolError::MissingArgument {
                tool: name.to_string(),
                param: missing.name.to_string(),
            });
        }

        debug!(tool = name, "Invoking tool");
        (tool.handler)(ctx, args).await
    }
}
