//! CmdRelay CLI - Operator console for a running relay daemon
//!
//! Talks to the daemon's loopback JSON-RPC console (`CMDRELAY_RPC_ENABLED=true`).

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tabled::{Table, Tabled};

const DEFAULT_RPC_URL: &str = "http://127.0.0.1:9737";

/// Log cells longer than this are cut in the table view
const CELL_PREVIEW_CHARS: usize = 60;

#[derive(Parser)]
#[command(name = "cmdrelay-cli")]
#[command(about = "CmdRelay operator console", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// RPC server URL
    #[arg(long, env = "CMDRELAY_RPC_URL", default_value = DEFAULT_RPC_URL)]
    rpc_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Send one message through the dispatcher, as if typed in chat
    Send {
        /// Message text, e.g. "cmd uptime" or "addcmd disk | df -h"
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// List saved commands
    List,

    /// Show recent execution log records, newest first
    Logs {
        /// Number of records
        #[arg(short = 'n', long, default_value = "20")]
        limit: u32,
    },
}

#[derive(Serialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    method: String,
    params: serde_json::Value,
    id: u64,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    result: Option<serde_json::Value>,
    error: Option<JsonRpcError>,
}

#[derive(Deserialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

#[derive(Deserialize)]
struct DispatchResult {
    reply: String,
}

#[derive(Deserialize, Tabled)]
struct CommandRow {
    name: String,
    command: String,
}

#[derive(Deserialize)]
struct CommandList {
    commands: Vec<CommandRow>,
}

#[derive(Deserialize)]
struct LogRecord {
    id: i64,
    command_name: Option<String>,
    command: String,
    output: String,
    executed_at: String,
}

#[derive(Deserialize)]
struct LogList {
    records: Vec<LogRecord>,
}

#[derive(Tabled)]
struct LogRow {
    id: i64,
    executed_at: String,
    name: String,
    command: String,
    output: String,
}

impl From<LogRecord> for LogRow {
    fn from(record: LogRecord) -> Self {
        Self {
            id: record.id,
            executed_at: record.executed_at,
            name: record.command_name.unwrap_or_else(|| "-".to_string()),
            command: preview(&record.command),
            output: preview(&record.output),
        }
    }
}

/// First line only, capped at `CELL_PREVIEW_CHARS`
fn preview(text: &str) -> String {
    let mut lines = text.lines();
    let first_line = lines.next().unwrap_or("");
    let mut cut: String = first_line.chars().take(CELL_PREVIEW_CHARS).collect();

    let clipped = first_line.chars().count() > CELL_PREVIEW_CHARS || lines.next().is_some();
    if clipped {
        cut.push('…');
    }
    cut
}

async fn call_rpc(url: &str, method: &str, params: serde_json::Value) -> Result<serde_json::Value> {
    let request = JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        method: method.to_string(),
        params,
        id: 1,
    };

    let client = reqwest::Client::new();
    let response: JsonRpcResponse = client
        .post(url)
        .json(&request)
        .send()
        .await
        .context("Failed to connect to daemon (is CMDRELAY_RPC_ENABLED=true?)")?
        .json()
        .await
        .context("Failed to parse response")?;

    if let Some(error) = response.error {
        anyhow::bail!("RPC error ({}): {}", error.code, error.message);
    }

    response
        .result
        .ok_or_else(|| anyhow::anyhow!("No result in response"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Send { text } => {
            let params = json!({ "text": text.join(" ") });

            let result = call_rpc(&cli.rpc_url, "relay.dispatch.v1", params).await?;
            let dispatched: DispatchResult = serde_json::from_value(result)?;

            println!("{}", dispatched.reply);
        }

        Commands::List => {
            let result = call_rpc(&cli.rpc_url, "registry.list.v1", json!({})).await?;
            let list: CommandList = serde_json::from_value(result)?;

            if list.commands.is_empty() {
                println!("{}", "No commands saved yet.".yellow());
            } else {
                println!("{}", "Saved Commands".cyan().bold());
                println!();
                println!("{}", Table::new(list.commands));
            }
        }

        Commands::Logs { limit } => {
            let result = call_rpc(&cli.rpc_url, "logs.recent.v1", json!({ "limit": limit })).await?;
            let list: LogList = serde_json::from_value(result)?;

            if list.records.is_empty() {
                println!("{}", "No executions recorded".yellow());
            } else {
                let rows: Vec<LogRow> = list.records.into_iter().map(LogRow::from).collect();
                println!("{}", format!("Last {} executions:", rows.len()).cyan().bold());
                println!();
                println!("{}", Table::new(rows));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_cuts_long_and_multiline_text() {
        assert_eq!(preview("uptime"), "uptime");
        assert_eq!(preview("line one\nline two"), "line one…");
        let long = "x".repeat(100);
        assert_eq!(preview(&long).chars().count(), CELL_PREVIEW_CHARS + 1);
    }

    #[test]
    fn test_preview_keeps_complete_single_lines() {
        // trailing newline is not a second line
        assert_eq!(preview("done\n"), "done");
        let exact = "é".repeat(CELL_PREVIEW_CHARS);
        assert_eq!(preview(&exact), exact);
        assert_eq!(preview(""), "");
    }

    #[test]
    fn test_send_joins_words() {
        let cli = Cli::try_parse_from(["cmdrelay-cli", "send", "cmd", "echo", "hi"]).unwrap();
        match cli.command {
            Commands::Send { text } => assert_eq!(text.join(" "), "cmd echo hi"),
            _ => panic!("expected send"),
        }
    }

    #[test]
    fn test_unnamed_log_record_row() {
        let record: LogRecord = serde_json::from_value(json!({
            "id": 7,
            "command_name": null,
            "command": "ls",
            "output": "a\nb",
            "executed_at": "2024-01-01T00:00:00+00:00",
        }))
        .unwrap();
        let row = LogRow::from(record);
        assert_eq!(row.name, "-");
        assert_eq!(row.output, "a…");
    }
}
