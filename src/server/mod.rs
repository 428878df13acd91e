//! HTTP server for the site backend

pub mod response;
pub mod routes;
pub mod state;

pub use response::{ApiResponse, Reply};
pub use state::AppState;

use crate::{
    error::{AppError, Result},
    logging::Logger,
    models::Config,
};
use axum::{
    extract::DefaultBodyLimit,
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal::{self, ctrl_c};
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;

use routes::{
    download_handler, health_handler, mail_handler, ping_handler, plans_handler,
    submit_quote_handler, upload_test_handler,
};

/// Build the application router
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    // Only the upload test takes large bodies; submissions cap their own reads
    let upload = post(upload_test_handler)
        .layer::<_, std::convert::Infallible>(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(state.config.max_upload_bytes));

    Router::new()
        .route("/api/mail", post(mail_handler))
        .route("/api/submit-quote", post(submit_quote_handler))
        .route("/api/ping", get(ping_handler))
        .route("/api/upload-test", upload)
        .route("/api/download", get(download_handler))
        .route("/api/plans", get(plans_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .with_state(state)
}

/// Bind the configured address and serve until Ctrl+C or SIGTERM
pub async fn serve(config: Config, logger: Logger) -> Result<()> {
    logger.add_context_field("version", crate::VERSION).await;

    let config = Arc::new(config);
    let state = AppState::new(config.clone(), logger.named("SERVER"))?;

    if !state.relay_enabled() {
        logger.warn("Mail relay disabled; submissions will fail until mail settings are provided")
            .field("missing", config.mail.missing_vars())
            .log()
            .await;
    }

    let address = config.listen_address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|e| AppError::io(format!("Failed to bind {}: {}", address, e)))?;

    logger.info("Server running")
        .field("address", &address)
        .log()
        .await;

    run(listener, state, shutdown_signal(logger.clone())).await?;

    logger.info("Server shut down").log().await;
    Ok(())
}

/// Serve on an already bound listener until `shutdown` resolves
pub async fn run<S>(listener: TcpListener, state: AppState, shutdown: S) -> Result<()>
where
    S: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

async fn shutdown_signal(logger: Logger) {
    let interrupt = async {
        match ctrl_c().await {
            Ok(()) => logger.info("Received Ctrl+C, shutting down").log().await,
            Err(e) => {
                logger.error("Failed to install Ctrl+C handler")
                    .field("detail", e.to_string())
                    .log()
                    .await;
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                logger.info("Received terminate signal, shutting down").log().await;
            }
            Err(e) => {
                logger.error("Failed to install signal handler")
                    .field("detail", e.to_string())
                    .log()
                    .await;
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = interrupt => {},
        _ = terminate => {},
    }
}
