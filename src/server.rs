//! MCP surface: exposes a [`ToolRegistry`] over the rmcp server handler.

use anyhow::{Context, Result};
use rmcp::{
    model::{
        CallToolRequestParams, CallToolResult, Content, JsonObject, ListToolsResult,
        PaginatedRequestParams, ServerCapabilities, ServerInfo, Tool,
    },
    service::{RequestContext, RoleServer},
    ErrorData, ServerHandler,
};
use std::sync::Arc;
use tracing::{info, warn};

use crate::tools::{ToolArgs, ToolError, ToolRegistry};

/// An adapter's registry plus the context its handlers run against.
pub struct ToolServer<C> {
    name: &'static str,
    instructions: &'static str,
    registry: Arc<ToolRegistry<C>>,
    ctx: Arc<C>,
}

impl<C> Clone for ToolServer<C> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            instructions: self.instructions,
            registry: Arc::clone(&self.registry),
            ctx: Arc::clone(&self.ctx),
        }
    }
}

impl<C: Send + Sync + 'static> ToolServer<C> {
    pub fn new(
        name: &'static str,
        instructions: &'static str,
        registry: ToolRegistry<C>,
        ctx: C,
    ) -> Self {
        Self {
            name,
            instructions,
            registry: Arc::new(registry),
            ctx: Arc::new(ctx),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Registry definitions as MCP tools.
    pub fn tools(&self) -> Vec<Tool> {
        self.registry
            .definitions()
            .map(|def| Tool::new(def.name, def.description, Arc::new(def.input_schema())))
            .collect()
    }

    /// Invoke a tool by name with text arguments.
    pub async fn invoke(&self, name: &str, args: &ToolArgs) -> Result<String, ToolError> {
        self.registry.invoke(self.ctx.as_ref(), name, args).await
    }

    /// Invoke a tool with MCP arguments and wrap the text result.
    pub async fn call(&self, name: &str, arguments: Option<&JsonObject>) -> Result<CallToolResult, ErrorData> {
        let definition = self.registry.definition(name);
        let args = arguments
            .map(|object| ToolArgs::from_json_for(definition, object))
            .unwrap_or_default();
        match self.invoke(name, &args).await {
            Ok(text) => Ok(CallToolResult::success(vec![Content::text(text)])),
            Err(e) => {
                warn!(tool = name, "Tool call rejected: {}", e);
                Err(to_error_data(e))
            }
        }
    }
}

fn to_error_data(err: ToolError) -> ErrorData {
    ErrorData::invalid_params(err.to_string(), None)
}

impl<C: Send + Sync + 'static> ServerHandler for ToolServer<C> {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: rmcp::model::Implementation {
                name: self.name.into(),
                title: None,
                version: env!("CARGO_PKG_VERSION").into(),
                icons: None,
                website_url: None,
            },
            instructions: Some(self.instructions.into()),
        }
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, ErrorData>> + Send + '_ {
        std::future::ready(Ok(ListToolsResult {
            tools: self.tools(),
            ..Default::default()
        }))
    }

    #[allow(clippy::manual_async_fn)]
    fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, ErrorData>> + Send + '_ {
        async move { self.call(&request.name, request.arguments.as_ref()).await }
    }
}

/// Serve over stdin/stdout until the client disconnects.
pub async fn serve_stdio<C: Send + Sync + 'static>(server: ToolServer<C>) -> Result<()> {
    let name = server.name();
    info!(server = name, tools = server.registry.len(), "Serving MCP over stdio");

    let transport = rmcp::transport::io::stdio();
    let service = rmcp::serve_server(server, transport)
        .await
        .context("MCP initialization failed")?;
    service.waiting().await.context("MCP service terminated abnormally")?;

    info!(server = name, "Client disconnected");
    Ok(())
}
