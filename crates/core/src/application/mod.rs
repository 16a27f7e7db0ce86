// Application Layer - Use Cases

pub mod bot_token;
pub mod dispatcher;
pub mod relay;

// Re-exports
pub use bot_token::{resolve_bot_token, TokenSource};
pub use dispatcher::Dispatcher;
pub use relay::{shutdown_channel, RelayLoop, ShutdownSender, ShutdownToken};
