//! RPC Method Handlers
//!
//! Implements the business logic for each JSON-RPC method.

use crate::error::to_rpc_error;
use crate::types::{
    DispatchRequest, DispatchResponse, ListCommandsRequest, ListCommandsResponse,
    RecentLogsRequest, RecentLogsResponse,
};
use cmdrelay_core::application::Dispatcher;
use cmdrelay_core::domain;
use cmdrelay_core::port::{CommandRegistry, ExecutionLog};
use jsonrpsee::types::ErrorObjectOwned;
use std::sync::Arc;
use tracing::info;

/// Upper bound for logs.recent.v1
pub const MAX_RECENT_LOGS: u32 = 500;

/// RPC Handler with injected dependencies
pub struct RpcHandler {
    dispatcher: Arc<Dispatcher>,
    registry: Arc<dyn CommandRegistry>,
    execution_log: Arc<dyn ExecutionLog>,
}

impl RpcHandler {
    pub fn new(
        dispatcher: Arc<Dispatcher>,
        registry: Arc<dyn CommandRegistry>,
        execution_log: Arc<dyn ExecutionLog>,
    ) -> Self {
        Self {
            dispatcher,
            registry,
            execution_log,
        }
    }

    /// relay.dispatch.v1
    pub async fn dispatch(
        &self,
        params: DispatchRequest,
    ) -> Result<DispatchResponse, ErrorObjectOwned> {
        info!("Console dispatch");
        let result = self
            .dispatcher
            .dispatch(domain::DispatchRequest::new(params.text))
            .await
            .map_err(to_rpc_error)?;

        Ok(DispatchResponse {
            reply: result.reply_text,
        })
    }

    /// registry.list.v1
    pub async fn list_commands(
        &self,
        _params: ListCommandsRequest,
    ) -> Result<ListCommandsResponse, ErrorObjectOwned> {
        let entries = self.registry.list_all().await.map_err(to_rpc_error)?;

        Ok(ListCommandsResponse {
            commands: entries.into_iter().map(Into::into).collect(),
        })
    }

    /// logs.recent.v1
    pub async fn recent_logs(
        &self,
        params: RecentLogsRequest,
    ) -> Result<RecentLogsResponse, ErrorObjectOwned> {
        let limit = params.limit.clamp(1, MAX_RECENT_LOGS);
        let records = self
            .execution_log
            .recent(limit)
            .await
            .map_err(to_rpc_error)?;

        Ok(RecentLogsResponse {
            records: records.into_iter().map(Into::into).collect(),
        })
    }
}
