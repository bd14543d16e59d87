use std::net::SocketAddr;
use std::sync::Arc;

use reminders::application::reminder::{ReminderScanner, SCAN_INTERVAL};
use reminders::domain::store::TaskStore;
use reminders::http::routing::{self, AppState};
use reminders::infrastructure::sqlite_store::SqliteTaskStore;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://reminders.db".to_string());
    // Ensure SQLite file can be created/opened when using a file-backed URL
    prepare_sqlite_file(&database_url)?;
    let store = SqliteTaskStore::connect(&database_url).await?;
    store.init().await?;

    let scanner = ReminderScanner::new(store.clone(), Arc::new(notifier()));
    tokio::spawn(async move { scanner.run(SCAN_INTERVAL).await });

    let router = routing::app(AppState { store });

    let addr: SocketAddr = std::env::var("BIND_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
        .parse()?;
    tracing::info!(%addr, "listening");
    axum::serve(tokio::net::TcpListener::bind(addr).await?, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

#[cfg(feature = "desktop")]
fn notifier() -> reminders::notify::desktop::DesktopNotifier {
    let sound_file =
        std::env::var("NOTIFY_SOUND").unwrap_or_else(|_| "notification_sound.mp3".to_string());
    reminders::notify::desktop::DesktopNotifier::new(sound_file)
}

#[cfg(not(feature = "desktop"))]
fn notifier() -> reminders::notify::LogNotifier {
    reminders::notify::LogNotifier
}

async fn shutdown_signal() {
    use tokio::signal::ctrl_c;
    let _ = ctrl_c().await;
    tracing::info!("shutdown");
}

fn prepare_sqlite_file(database_url: &str) -> anyhow::Result<()> {
    // Skip in-memory
    if database_url.contains(":memory:") {
        return Ok(());
    }
    if let Some(path) = database_url.strip_prefix("sqlite://") {
        // On Windows, absolute paths may look like /C:/path; strip the leading slash
        let path = if cfg!(windows) && path.len() >= 3 && path.as_bytes()[0] == b'/' && path.as_bytes()[2] == b':' {
            &path[1..]
        } else {
            path
        };
        use std::{fs, fs::OpenOptions, path::Path};
        let p = Path::new(path);
        if let Some(parent) = p.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        if !p.exists() {
            let _ = OpenOptions::new().create(true).append(true).open(p)?;
        }
    }
    Ok(())
}
