use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::AdminSecret;
use crate::storage::QuestionStore;
use crate::summary::SummaryRequester;

pub mod routes;

/// Server state
///
/// The store handle is opened once by the caller and shared by every request.
pub struct AppState {
    pub store: QuestionStore,
    pub summarizer: SummaryRequester,
    pub admin: AdminSecret,
    /// Used when a summary request does not carry its own key
    pub default_api_key: Option<String>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/questions",
            get(routes::list_questions).post(routes::submit_question),
        )
        .route(
            "/admin/questions",
            get(routes::admin_list_questions).delete(routes::admin_clear_questions),
        )
        .route("/admin/summary", post(routes::admin_summary))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start_server(port: u16, state: AppState) -> anyhow::Result<()> {
    if !state.admin.is_configured() {
        tracing::warn!(
            "{} is not set; admin routes will refuse every request",
            crate::config::ADMIN_SECRET_ENV
        );
    }

    tracing::info!("Summaries will use model {}", state.summarizer.model());
    let app = router(Arc::new(state));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Starting server on {}", addr);
    println!("🌍 Server running at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
