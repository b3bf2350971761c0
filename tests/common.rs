use ephemera_server::api::{self, AppState};
use ephemera_server::services::{MessageService, ViewService};
use ephemera_server::storage::MessageStore;
use ephemera_server::storage::memory::MemoryStore;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::Once;

static INIT: Once = Once::new();

pub fn setup_tracing() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "warn".into())
            .add_directive("ephemera_server=debug".parse().unwrap())
            .add_directive("tower=warn".parse().unwrap())
            .add_directive("hyper=warn".parse().unwrap())
            .add_directive("reqwest=warn".parse().unwrap());

        tracing_subscriber::fmt().with_env_filter(filter).init();
    });
}

#[allow(dead_code)]
pub struct TestApp {
    pub store: Arc<MemoryStore>,
    pub message_service: MessageService,
    pub view_service: ViewService,
}

/// Wires the engines over an in-memory store, the way main.rs wires them
/// over Postgres.
pub fn build_app() -> TestApp {
    setup_tracing();
    let store = Arc::new(MemoryStore::new());
    let dyn_store: Arc<dyn MessageStore> = Arc::clone(&store) as Arc<dyn MessageStore>;
    TestApp {
        store,
        message_service: MessageService::new(Arc::clone(&dyn_store), 7),
        view_service: ViewService::new(dyn_store),
    }
}

/// Spawns the HTTP surface on an ephemeral port and returns its address.
#[allow(dead_code)]
pub async fn spawn_server() -> (SocketAddr, TestApp) {
    let app = build_app();
    let state = AppState {
        message_service: app.message_service.clone(),
        view_service: app.view_service.clone(),
    };

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind test listener");
    let addr = listener.local_addr().expect("listener address");
    tokio::spawn(async move {
        axum::serve(listener, api::app_router(state)).await.expect("test server");
    });

    (addr, app)
}
