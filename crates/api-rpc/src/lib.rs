//! JSON-RPC Console
//!
//! Loopback-only JSON-RPC 2.0 server giving operators the same Dispatcher the
//! chat transport uses, plus read access to the registry and execution log.

pub mod error;
pub mod handler;
pub mod server;
pub mod types;

pub use server::{RpcServer, RpcServerConfig};
