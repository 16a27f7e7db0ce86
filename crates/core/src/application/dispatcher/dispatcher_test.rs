//! Unit tests for the Dispatcher over in-memory ports

use super::Dispatcher;
use crate::domain::reply::NO_OUTPUT_SENTINEL;
use crate::domain::{CommandEntry, DispatchRequest, MAX_REPLY_CHARS};
use crate::error::AppError;
use crate::port::command_executor::mocks::MockCommandExecutor;
use crate::port::command_registry::mocks::InMemoryCommandRegistry;
use crate::port::execution_log::mocks::InMemoryExecutionLog;
use crate::port::id_provider::mocks::SequentialIdProvider;
use crate::port::ExecutionError;
use std::sync::Arc;

struct Harness {
    registry: Arc<InMemoryCommandRegistry>,
    log: Arc<InMemoryExecutionLog>,
    executor: Arc<MockCommandExecutor>,
    dispatcher: Dispatcher,
}

fn harness(executor: MockCommandExecutor) -> Harness {
    harness_with(executor, Vec::new())
}

fn harness_with(executor: MockCommandExecutor, entries: Vec<CommandEntry>) -> Harness {
    let registry = Arc::new(InMemoryCommandRegistry::with_entries(entries));
    let log = Arc::new(InMemoryExecutionLog::new());
    let executor = Arc::new(executor);
    let dispatcher = Dispatcher::new(
        registry.clone(),
        log.clone(),
        executor.clone(),
        Arc::new(SequentialIdProvider::default()),
    );
    Harness {
        registry,
        log,
        executor,
        dispatcher,
    }
}

async fn reply(h: &Harness, text: &str) -> String {
    h.dispatcher
        .dispatch(DispatchRequest::new(text))
        .await
        .unwrap()
        .reply_text
}

#[tokio::test]
async fn test_echo_intent() {
    let h = harness(MockCommandExecutor::new_echo());
    assert_eq!(reply(&h, "  hello bot ").await, "You said: hello bot");
    assert!(h.executor.calls().is_empty());
    assert!(h.log.records().is_empty());
}

#[tokio::test]
async fn test_custom_command_runs_verbatim() {
    let h = harness(MockCommandExecutor::new_output("hello"));

    assert_eq!(reply(&h, "cmd echo hello").await, "hello");
    assert_eq!(h.executor.calls(), vec!["echo hello".to_string()]);

    let records = h.log.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].command_name, None);
    assert_eq!(records[0].shell_command, "echo hello");
    assert_eq!(records[0].output, "hello");
}

#[tokio::test]
async fn test_named_command_resolves_from_registry() {
    let h = harness(MockCommandExecutor::new_echo());
    reply(&h, "addcmd ping | echo pong").await;

    assert_eq!(reply(&h, "CMD ping").await, "echo pong");
    assert_eq!(h.executor.calls(), vec!["echo pong".to_string()]);

    let records = h.log.records();
    assert_eq!(records[0].command_name.as_deref(), Some("ping"));
    assert_eq!(records[0].shell_command, "echo pong");
}

#[tokio::test]
async fn test_lookup_is_case_sensitive() {
    let h = harness(MockCommandExecutor::new_echo());
    reply(&h, "addcmd ping | echo pong").await;

    assert_eq!(reply(&h, "cmd Ping").await, "Ping");
    assert_eq!(h.log.records()[0].command_name, None);
}

#[tokio::test]
async fn test_execution_failure_is_replied_and_logged() {
    let h = harness(MockCommandExecutor::new_fail(ExecutionError::SpawnFailed(
        "no shell".to_string(),
    )));

    let text = reply(&h, "cmd uptime").await;
    assert_eq!(text, "❌ Error: Spawn failed: no shell");

    let records = h.log.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].output, text);
}

#[tokio::test]
async fn test_long_output_truncated_in_reply_only() {
    let long = "z".repeat(MAX_REPLY_CHARS + 1234);
    let h = harness(MockCommandExecutor::new_output(long.clone()));

    let text = reply(&h, "cmd yes").await;
    assert_eq!(text.chars().count(), MAX_REPLY_CHARS);
    assert_eq!(h.log.records()[0].output, long);
}

#[tokio::test]
async fn test_sentinel_passes_through() {
    let h = harness(MockCommandExecutor::new_output(NO_OUTPUT_SENTINEL));
    assert_eq!(reply(&h, "cmd true").await, NO_OUTPUT_SENTINEL);
}

#[tokio::test]
async fn test_register_success() {
    let h = harness(MockCommandExecutor::new_echo());
    assert_eq!(
        reply(&h, "addcmd backup | tar -czf /tmp/b.tgz /data").await,
        "✅ Command 'backup' added successfully!"
    );
    assert_eq!(
        h.registry.entries(),
        vec![CommandEntry::new("backup", "tar -czf /tmp/b.tgz /data").unwrap()]
    );
}

#[tokio::test]
async fn test_register_twice_overwrites() {
    let h = harness(MockCommandExecutor::new_echo());
    reply(&h, "addcmd ping | echo one").await;
    reply(&h, "addcmd ping | echo two").await;

    let entries = h.registry.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].shell_command, "echo two");
}

#[tokio::test]
async fn test_register_without_separator_never_writes() {
    let h = harness(MockCommandExecutor::new_echo());
    assert_eq!(
        reply(&h, "addcmd backup tar -czf /tmp/b.tgz").await,
        "❌ Format: addcmd command_name | shell_command"
    );
    assert!(h.registry.entries().is_empty());
}

#[tokio::test]
async fn test_register_blank_side_never_writes() {
    let h = harness(MockCommandExecutor::new_echo());
    let text = reply(&h, "addcmd | ls").await;
    assert!(text.starts_with("❌"));
    assert!(h.registry.entries().is_empty());
}

#[tokio::test]
async fn test_register_store_failure_is_answered() {
    let h = harness(MockCommandExecutor::new_echo());
    h.registry.set_unavailable(true);

    let text = reply(&h, "addcmd ping | echo pong").await;
    assert!(text.starts_with("❌ Failed to add command:"));
}

#[tokio::test]
async fn test_list_empty_and_populated() {
    let h = harness(MockCommandExecutor::new_echo());
    assert_eq!(reply(&h, "listcmd").await, "No commands saved yet.");

    reply(&h, "addcmd ping | echo pong").await;
    reply(&h, "addcmd disk | df -h").await;

    let listing = reply(&h, "ListCmd").await;
    let lines: Vec<&str> = listing.lines().collect();
    assert_eq!(lines, vec!["Saved Commands:", "ping → echo pong", "disk → df -h"]);
}

#[tokio::test]
async fn test_existing_entries_resolve_and_list() {
    let h = harness_with(
        MockCommandExecutor::new_echo(),
        vec![
            CommandEntry::new("disk", "df -h").unwrap(),
            CommandEntry::new("up", "uptime").unwrap(),
        ],
    );

    assert_eq!(
        reply(&h, "listcmd").await,
        "Saved Commands:\ndisk → df -h\nup → uptime"
    );
    assert_eq!(reply(&h, "cmd up").await, "uptime");
    assert_eq!(h.log.records()[0].command_name.as_deref(), Some("up"));
}

#[tokio::test]
async fn test_bare_cmd_is_echoed() {
    let h = harness(MockCommandExecutor::new_echo());
    assert_eq!(reply(&h, "cmd   ").await, "You said: cmd");
    assert!(h.executor.calls().is_empty());
}

#[tokio::test]
async fn test_empty_target_is_rejected_by_executor() {
    let h = harness(MockCommandExecutor::new_echo());
    let text = h.dispatcher.run_command("").await.unwrap();
    assert_eq!(text, "❌ Error: Empty command");
    assert_eq!(h.log.records()[0].shell_command, "");
}

#[tokio::test]
async fn test_log_fault_propagates() {
    let h = harness(MockCommandExecutor::new_output("ok"));
    h.log.set_unavailable(true);

    let result = h.dispatcher.dispatch(DispatchRequest::new("cmd ls")).await;
    assert!(matches!(result, Err(AppError::Database(_))));
}

#[tokio::test]
async fn test_registry_fault_propagates_on_lookup() {
    let h = harness(MockCommandExecutor::new_output("ok"));
    h.registry.set_unavailable(true);

    let result = h.dispatcher.dispatch(DispatchRequest::new("cmd ls")).await;
    assert!(result.is_err());
    assert!(h.executor.calls().is_empty());
}
