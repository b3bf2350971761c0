use ephemera_server::api::{AppState, MgmtState};
use ephemera_server::config::Config;
use ephemera_server::services::{MessageService, ViewService};
use ephemera_server::storage::postgres::PgMessageStore;
use ephemera_server::storage::{self, MessageStore};
use ephemera_server::workers::MessageCleanupWorker;
use ephemera_server::{api, telemetry};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::Instrument;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load();
    telemetry::init_telemetry(config.log_format)?;

    let boot_span = tracing::info_span!("boot_server");
    let (api_listener, mgmt_listener, app_router, mgmt_app, shutdown_tx, shutdown_rx, cleanup_worker) =
        async {
            // Phase 1: Infrastructure
            let pool = storage::init_pool(&config.database_url).await?;
            storage::run_migrations(&pool).await?;

            let (shutdown_tx, shutdown_rx) = watch::channel(false);
            spawn_signal_handler(shutdown_tx.clone());

            // Phase 2: Component wiring
            let store: Arc<dyn MessageStore> = Arc::new(PgMessageStore::new(pool));
            let state = AppState {
                message_service: MessageService::new(Arc::clone(&store), config.ttl_days),
                view_service: ViewService::new(Arc::clone(&store)),
            };
            let cleanup_worker =
                MessageCleanupWorker::new(Arc::clone(&store), config.cleanup.clone());

            // Phase 3: Listeners and routers
            let app_router = api::app_router(state);
            let mgmt_app = api::mgmt_router(MgmtState { store });

            let api_addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
            let mgmt_addr: SocketAddr =
                format!("{}:{}", config.server.host, config.server.mgmt_port).parse()?;

            tracing::info!(address = %api_addr, "listening");
            tracing::info!(address = %mgmt_addr, "management server listening");

            let api_listener = tokio::net::TcpListener::bind(api_addr).await?;
            let mgmt_listener = tokio::net::TcpListener::bind(mgmt_addr).await?;

            Ok::<_, anyhow::Error>((
                api_listener,
                mgmt_listener,
                app_router,
                mgmt_app,
                shutdown_tx,
                shutdown_rx,
                cleanup_worker,
            ))
        }
        .instrument(boot_span)
        .await?;

    // Phase 4: Runtime
    let worker_task = tokio::spawn(cleanup_worker.run(shutdown_rx.clone()));

    let mut api_rx = shutdown_rx.clone();
    let api_server = axum::serve(api_listener, app_router).with_graceful_shutdown(async move {
        let _ = api_rx.wait_for(|&s| s).await;
    });

    let mut mgmt_rx = shutdown_rx;
    let mgmt_server = axum::serve(mgmt_listener, mgmt_app).with_graceful_shutdown(async move {
        let _ = mgmt_rx.wait_for(|&s| s).await;
    });

    if let Err(e) = tokio::try_join!(api_server, mgmt_server) {
        tracing::error!(error = %e, "Server error");
    }

    // Phase 5: Graceful shutdown
    let _ = shutdown_tx.send(true);
    tokio::select! {
        _ = worker_task => {
            tracing::info!("Background tasks finished.");
        }
        () = tokio::time::sleep(std::time::Duration::from_secs(config.server.shutdown_timeout_secs)) => {
            tracing::warn!("Timeout waiting for background tasks to finish.");
        }
    }

    Ok(())
}

fn spawn_signal_handler(shutdown_tx: watch::Sender<bool>) {
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for shutdown signal");
            return;
        }
        tracing::info!("Shutdown signal received");
        let _ = shutdown_tx.send(true);
    });
}
