//! Ping-pong extension.
//!
//! Registers two handlers the UI can call through `runBun`:
//!
//! - `ping` - replies once with `pingResult`
//! - `longRun` - reports five progress steps, one second apart
//!
//! Launched by the shell, which passes `port=.. token=.. extensionId=..`
//! or writes its JSON config to stdin.
//!
//! Usage: cargo run --example ping_pong

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use neutralino_bridge::{Extension, HandlerResult, HandlerTable, Messenger};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

// ============================================================================
// Handlers
// ============================================================================

fn ping(messenger: &Messenger, parameter: &Value) -> HandlerResult {
    messenger.send_message("pingResult", format!("Rust says PONG, in reply to {parameter}"))?;
    Ok(())
}

async fn long_run(messenger: Messenger) -> HandlerResult {
    for i in 1..=5 {
        messenger.send_message("pingResult", format!("Long-running task {i}/5"))?;
        tokio::time::sleep(Duration::from_secs(1)).await;
    }
    Ok(())
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("neutralino_bridge=info"))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let extension = Extension::builder().debug(true).build();
    let messenger = extension.messenger();

    let handlers = HandlerTable::new()
        .handler("ping", {
            let messenger = messenger.clone();
            move |parameter| ping(&messenger, &parameter)
        })
        .async_handler("longRun", move |_| long_run(messenger.clone()));

    let termination = extension.start(handlers).await?;
    tracing::info!(?termination, "Bridge stopped");

    Ok(())
}
