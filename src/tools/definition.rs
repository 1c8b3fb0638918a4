//! Tool definitions and the handler signature used by the registry.

use futures::future::BoxFuture;
use serde::Serialize;
use serde_json::{json, Map, Value};

use super::{ToolArgs, ToolError};

/// JSON-schema type advertised for a parameter.
///
/// Values always reach handlers as text; the kind only shapes the schema
/// shown to the calling agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    String,
    Number,
}

/// One declared parameter of a tool.
#[derive(Debug, Clone)]
pub struct ToolParam {
    pub name: &'static str,
    pub kind: ParamKind,
    pub description: &'static str,
}

/// Definition of a tool exposed to the calling agent. Immutable after startup.
#[derive(Debug, Clone)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub params: Vec<ToolParam>,
}

impl ToolDefinition {
    pub fn new(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            description,
            params: Vec::new(),
        }
    }

    /// Append a string parameter.
    pub fn param(self, name: &'static str, description: &'static str) -> Self {
        self.with_param(name, ParamKind::String, description)
    }

    /// Append a numeric parameter.
    pub fn number_param(self, name: &'static str, description: &'static str) -> Self {
        self.with_param(name, ParamKind::Number, description)
    }

    fn with_param(mut self, name: &'static str, kind: ParamKind, description: &'static str) -> Self {
        self.params.push(ToolParam {
            name,
            kind,
            description,
        });
        self
    }

    /// JSON Schema for the tool's parameters. Every parameter is required.
    pub fn input_schema(&self) -> Map<String, Value> {
        let properties: Map<String, Value> = self
            .params
            .iter()
            .map(|p| {
                (
                    p.name.to_string(),
                    json!({ "type": p.kind, "description": p.description }),
                )
            })
            .collect();
        let required: Vec<&str> = self.params.iter().map(|p| p.name).collect();

        let mut schema = Map::new();
        schema.insert("type".into(), json!("object"));
        schema.insert("properties".into(), Value::Object(properties));
        schema.insert("required".into(), json!(required));
        schema
    }
}

/// Future returned by a tool handler.
pub type HandlerFuture<'a> = BoxFuture<'a, Result<String, ToolError>>;

/// Plain function pointer invoked for a tool, given the adapter context `C`.
pub type Handler<C> = for<'a> fn(&'a C, &'a ToolArgs) -> HandlerFuture<'a>;
