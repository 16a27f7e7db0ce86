//! Durability across restarts and under concurrent dispatch.

#![cfg(unix)]

mod common;

use cmdrelay_core::application::{resolve_bot_token, TokenSource};
use cmdrelay_core::port::{CommandRegistry, ExecutionLog};
use cmdrelay_infra_sqlite::{create_pool, run_migrations, SqliteTokenStore};
use common::Relay;

#[tokio::test]
async fn test_registry_and_log_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("relay.db");
    let db_path = db_path.to_str().unwrap();

    // First run
    {
        let relay = Relay::open(db_path).await;
        relay.send("addcmd ping | echo pong").await;
        assert_eq!(relay.send("cmd ping").await, "pong");
        relay.pool.close().await;
    }

    // Second run against the same file
    let relay = Relay::open(db_path).await;

    let entries = relay.registry.list_all().await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "ping");

    let records = relay.execution_log.recent(10).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].command_name.as_deref(), Some("ping"));

    // Ids keep increasing after reopen
    relay.send("cmd echo again").await;
    let records = relay.execution_log.recent(10).await.unwrap();
    assert!(records[0].id > records[1].id);
}

#[tokio::test]
async fn test_prompted_token_is_reused_after_restart() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("relay.db");
    let db_path = db_path.to_str().unwrap();

    {
        let pool = create_pool(db_path).await.unwrap();
        run_migrations(&pool).await.unwrap();
        let store = SqliteTokenStore::new(pool.clone());

        let (token, source) = resolve_bot_token(&store, None, || Ok("123:abc\n".to_string()))
            .await
            .unwrap();
        assert_eq!(token, "123:abc");
        assert_eq!(source, TokenSource::Prompt);
        pool.close().await;
    }

    let pool = create_pool(db_path).await.unwrap();
    run_migrations(&pool).await.unwrap();
    let store = SqliteTokenStore::new(pool);

    let (token, source) = resolve_bot_token(&store, None, || {
        panic!("stored token must be used");
    })
    .await
    .unwrap();
    assert_eq!(token, "123:abc");
    assert_eq!(source, TokenSource::Store);
}

#[tokio::test]
async fn test_empty_prompt_is_rejected_and_not_stored() {
    let relay = Relay::in_memory().await;
    let store = SqliteTokenStore::new(relay.pool.clone());

    let result = resolve_bot_token(&store, None, || Ok("   \n".to_string())).await;

    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("cannot be empty"));
}

#[tokio::test]
async fn test_concurrent_dispatch_loses_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("relay.db");
    let relay = Relay::open(db_path.to_str().unwrap()).await;

    let tasks: Vec<_> = (0..20)
        .map(|i| {
            let dispatcher = relay.dispatcher.clone();
            tokio::spawn(async move {
                use cmdrelay_core::domain::DispatchRequest;
                let registered = dispatcher
                    .dispatch(DispatchRequest::new(format!("addcmd c{i} | echo {i}")))
                    .await
                    .unwrap();
                let ran = dispatcher
                    .dispatch(DispatchRequest::new(format!("cmd echo {i}")))
                    .await
                    .unwrap();
                (registered.reply_text, ran.reply_text)
            })
        })
        .collect();

    for (i, result) in futures::future::join_all(tasks).await.into_iter().enumerate() {
        let (registered, ran) = result.unwrap();
        assert_eq!(registered, format!("✅ Command 'c{i}' added successfully!"));
        assert_eq!(ran, i.to_string());
    }

    assert_eq!(relay.registry.list_all().await.unwrap().len(), 20);
    let records = relay.execution_log.recent(500).await.unwrap();
    assert_eq!(records.len(), 20);
}

#[tokio::test]
async fn test_racing_registrations_of_one_name_leave_one_entry() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("relay.db");
    let relay = Relay::open(db_path.to_str().unwrap()).await;

    let tasks: Vec<_> = (0..40)
        .map(|i| {
            let dispatcher = relay.dispatcher.clone();
            tokio::spawn(async move {
                use cmdrelay_core::domain::DispatchRequest;
                dispatcher
                    .dispatch(DispatchRequest::new(format!("addcmd same | echo {i}")))
                    .await
                    .unwrap()
                    .reply_text
            })
        })
        .collect();

    for reply in futures::future::join_all(tasks).await {
        assert_eq!(reply.unwrap(), "✅ Command 'same' added successfully!");
    }

    let entries = relay.registry.list_all().await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "same");

    // Whichever write landed last, the stored body is one of the submitted ones
    let body = entries[0].shell_command.clone();
    assert!((0..40).any(|i| body == format!("echo {i}")), "got {body}");
    assert_eq!(relay.send("cmd same").await, body.trim_start_matches("echo "));
}
