//! JSON-RPC Server
//!
//! Serves the console over TCP, bound to the loopback interface only.

use crate::handler::RpcHandler;
use crate::types::{DispatchRequest, ListCommandsRequest, RecentLogsRequest};
use cmdrelay_core::application::Dispatcher;
use cmdrelay_core::error::{AppError, Result};
use cmdrelay_core::port::{CommandRegistry, ExecutionLog};
use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::RpcModule;
use std::sync::Arc;
use tracing::info;

const DEFAULT_RPC_HOST: &str = "127.0.0.1";
pub const DEFAULT_RPC_PORT: u16 = 9737;

/// RPC Server Configuration
pub struct RpcServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for RpcServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RPC_HOST.to_string(),
            port: DEFAULT_RPC_PORT,
        }
    }
}

/// RPC Server
pub struct RpcServer {
    config: RpcServerConfig,
    handler: Arc<RpcHandler>,
}

impl RpcServer {
    pub fn new(
        config: RpcServerConfig,
        dispatcher: Arc<Dispatcher>,
        registry: Arc<dyn CommandRegistry>,
        execution_log: Arc<dyn ExecutionLog>,
    ) -> Self {
        Self {
            config,
            handler: Arc::new(RpcHandler::new(dispatcher, registry, execution_log)),
        }
    }

    /// Start the JSON-RPC server
    pub async fn start(self) -> Result<ServerHandle> {
        let addr = format!("{}:{}", self.config.host, self.config.port);

        info!(
            host = %self.config.host,
            port = %self.config.port,
            "Starting JSON-RPC console"
        );

        let server = Server::builder()
            .build(&addr)
            .await
            .map_err(|e| AppError::Config(format!("Failed to bind {}: {}", addr, e)))?;

        let module = self.build_module()?;
        let handle = server.start(module);

        info!("JSON-RPC console started");
        Ok(handle)
    }

    fn build_module(&self) -> Result<RpcModule<()>> {
        let mut module = RpcModule::new(());

        let handler = self.handler.clone();
        module
            .register_async_method("relay.dispatch.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: DispatchRequest = params.parse()?;
                    handler.dispatch(req).await
                }
            })
            .map_err(register_error)?;

        let handler = self.handler.clone();
        module
            .register_async_method("registry.list.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: ListCommandsRequest = params.parse()?;
                    handler.list_commands(req).await
                }
            })
            .map_err(register_error)?;

        let handler = self.handler.clone();
        module
            .register_async_method("logs.recent.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: RecentLogsRequest = params.parse()?;
                    handler.recent_logs(req).await
                }
            })
            .map_err(register_error)?;

        Ok(module)
    }
}

fn register_error(e: impl std::fmt::Display) -> AppError {
    AppError::Internal(format!("Failed to register RPC method: {}", e))
}
