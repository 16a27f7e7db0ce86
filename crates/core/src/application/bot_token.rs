// Bot token resolution: environment, then store, then interactive prompt

use crate::error::{AppError, Result};
use crate::port::TokenStore;
use tracing::info;

/// Where the resolved token came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Environment,
    Store,
    Prompt,
}

/// Resolve the transport token.
///
/// A prompted token is persisted so later starts find it in the store.
/// `prompt` is only invoked when neither the override nor the store has one.
pub async fn resolve_bot_token<F>(
    store: &dyn TokenStore,
    override_token: Option<String>,
    prompt: F,
) -> Result<(String, TokenSource)>
where
    F: FnOnce() -> std::io::Result<String>,
{
    if let Some(token) = override_token.filter(|t| !t.trim().is_empty()) {
        info!("Bot token taken from environment");
        return Ok((token.trim().to_string(), TokenSource::Environment));
    }

    if let Some(token) = store.load_token().await? {
        info!("Bot token loaded from database");
        return Ok((token, TokenSource::Store));
    }

    let token = prompt()?.trim().to_string();
    if token.is_empty() {
        return Err(AppError::Config(
            "Telegram token cannot be empty.".to_string(),
        ));
    }

    store.save_token(&token).await?;
    info!("New bot token saved to database");
    Ok((token, TokenSource::Prompt))
}
