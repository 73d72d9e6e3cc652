//! HTTP server assembly: shared state, router, and the serve loop

use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::card::CardStore;
use crate::config::Config;
use crate::error::Result;
use crate::routes;
use crate::session::{self, SessionStore};

/// State shared by every handler.
pub struct AppState {
    pub config: Config,
    pub store: CardStore,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(config: Config) -> Result<Arc<Self>> {
        let ttl = session::parse_ttl(&config.session.ttl)?;
        let store = CardStore::new(config.db.path.clone(), &config.board);
        Ok(Arc::new(Self {
            config,
            store,
            sessions: SessionStore::new(ttl),
        }))
    }
}

/// Build the application router.
///
/// Separate from [`run`] so tests can drive it without a socket.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::login_page))
        .route("/login", post(routes::login))
        .route("/logout", post(routes::logout))
        .route("/todos", get(routes::board_page).post(routes::add_card))
        .route(
            "/todos/{id}",
            put(routes::update_card).delete(routes::delete_card),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until ctrl-c or SIGTERM.
pub async fn run(state: Arc<AppState>) -> Result<()> {
    let addr = state.config.addr.clone();
    let app = router(state);

    let listener = TcpListener::bind(&addr).await?;
    info!("listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            // Without a handler we can only keep serving
            error!("failed to install ctrl-c handler: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                error!("failed to install sigterm handler: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    info!("shutdown signal received");
}
