use mimalloc::MiMalloc;
use mobdb::config::Config;
use mobdb::replication::{AdbPuller, ReplicationLoop};
use mobdb::server::{MobdbState, mobdb_router};
use std::net::SocketAddr;
use tokio::{net::TcpListener, signal, sync::watch};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::load()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.basic.loglevel));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        listen_addr = %cfg.basic.listen_addr,
        listen_port = cfg.basic.listen_port,
        loglevel = %cfg.basic.loglevel,
        database = %cfg.database_path().display(),
        app_package = %cfg.sync.app_package,
        remote_path = %cfg.sync.remote_path(),
        adb_path = %cfg.sync.adb_path.display(),
        sync_interval_secs = cfg.sync.interval_secs,
        "mobdb starting"
    );
    info!(
        backup_enabled = cfg.backup.enabled,
        backup_interval_secs = cfg.backup.interval_secs,
        backup_max_count = cfg.backup.max_count,
        backup_dir = %cfg.backup.dir.display(),
        "Backup policy (effective)"
    );

    let (stop_tx, stop_rx) = watch::channel(false);
    let puller = AdbPuller::new(cfg.sync.adb_path.clone());
    let sync_task = ReplicationLoop::new(cfg.replication(), puller).spawn(stop_rx);

    let state = MobdbState::new(cfg.database_path());
    let app = mobdb_router(state);

    let addr = SocketAddr::from((cfg.basic.listen_addr, cfg.basic.listen_port));
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP gateway listening on {}", addr);
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;
    if let Err(e) = &served {
        error!(error = %e, "HTTP gateway error");
    }

    info!("Shutting down; waiting for the current sync cycle to finish");
    let _ = stop_tx.send(true);
    if let Err(e) = sync_task.await {
        error!(error = %e, "Sync task ended abnormally");
    }
    info!("Shutdown complete");
    served.map_err(Into::into)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
