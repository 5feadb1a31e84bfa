use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tokio::time::{Duration, sleep};
use tracing_subscriber::EnvFilter;

use tickler_core::impls::{FileStorage, LogNotificationCenter, StderrModal, TerminalBell};
use tickler_core::{TicklerBuilder, TicklerConfig};

/// Data directory for the stored snapshot.
fn data_dir() -> PathBuf {
    std::env::var_os("TICKLER_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(".tickler"))
}

fn load_config() -> anyhow::Result<TicklerConfig> {
    match std::env::args_os().nth(1) {
        Some(path) => {
            let path = PathBuf::from(path);
            TicklerConfig::from_json_file(&path)
                .with_context(|| format!("loading config from {}", path.display()))
        }
        None => Ok(TicklerConfig::default()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // (A) ports をつないで開く（前回のリマインダーはここで再スケジュール）
    let tickler = TicklerBuilder::new()
        .config(load_config()?)
        .storage(Arc::new(FileStorage::new(data_dir())))
        .notifications(Arc::new(LogNotificationCenter::granted()))
        .alarm(Arc::new(TerminalBell))
        .modal(Arc::new(StderrModal))
        .open()
        .await?;

    // (B) 2 秒後のリマインダー付きでタスクを追加
    let fire_at = chrono::Utc::now() + chrono::Duration::seconds(2);
    let id = tickler.add_task("Buy milk", Some(fire_at)).await?;
    println!("added task {id}, reminder at {fire_at}");

    // (C) 発火を待つ
    sleep(Duration::from_secs(3)).await;

    println!("{}", serde_json::to_string_pretty(&tickler.tasks().await)?);

    // (D) サンプルなので残りのタイマーを止めて終了
    tickler.shutdown().await;
    tracing::info!(task_id = %id, "demo finished");
    Ok(())
}
