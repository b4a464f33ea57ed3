//! Application setup and server configuration.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::Extension,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    middleware,
    routing::{get, post},
    Router,
};
use postmark::{PostmarkOptions, PostmarkService};
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::domains::auth::JwtService;
use crate::domains::notifications::NotificationWorker;
use crate::kernel::{
    BaseMailer, BaseSearchIndex, MeiliSearchIndex, NoopSearchIndex, PostmarkMailer, ServerDeps,
};
use crate::server::middleware::jwt_auth_middleware;
use crate::server::routes::{
    decide_submission_handler, health_handler, list_gallery_handler,
    list_own_submissions_handler, moderation_queue_handler, query_audit_handler,
    search_gallery_handler, submit_photo_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AxumAppState {
    pub db_pool: PgPool,
    pub server_deps: Arc<ServerDeps>,
    pub jwt_service: Arc<JwtService>,
}

/// Build the Axum application router
///
/// Wires real infrastructure (Postmark, the search index) into ServerDeps and
/// spawns the notification worker as a background task. Cancelling the
/// returned token stops the worker; the router itself holds no shutdown
/// state.
pub fn build_app(config: &Config, pool: PgPool) -> Result<(Router, CancellationToken)> {
    // Email transport is required: decisions enqueue notifications
    // unconditionally and the worker must be able to deliver them.
    let postmark = PostmarkService::new(PostmarkOptions {
        server_token: config.postmark_server_token.clone(),
    })
    .context("Failed to create Postmark client")?;
    let mailer: Arc<dyn BaseMailer> = Arc::new(PostmarkMailer::new(
        Arc::new(postmark),
        config.email_sender.clone(),
    ));

    // Search index is optional; without it the gallery still lists from the
    // database and search returns nothing.
    let search_index: Arc<dyn BaseSearchIndex> = match &config.search_index_url {
        Some(url) => Arc::new(
            MeiliSearchIndex::new(url.clone(), config.search_index_api_key.clone())
                .context("Failed to create search index client")?,
        ),
        None => {
            tracing::warn!("SEARCH_INDEX_URL not set; gallery search disabled");
            Arc::new(NoopSearchIndex)
        }
    };

    // Create JWT service
    let jwt_service = Arc::new(JwtService::new(
        &config.jwt_secret,
        config.jwt_issuer.clone(),
    ));

    let server_deps = ServerDeps::new(
        pool.clone(),
        mailer,
        search_index,
        jwt_service.clone(),
        config.admin_identifiers.clone(),
        config.submission_categories.clone(),
    );

    // Spawn the notification worker as a background task
    let shutdown = CancellationToken::new();
    let worker = NotificationWorker::new(server_deps.clone());
    let worker_shutdown = shutdown.clone();
    tokio::spawn(async move {
        if let Err(e) = worker.run(worker_shutdown).await {
            tracing::error!(error = %e, "Notification worker exited with error");
        }
    });

    // Create shared app state
    let app_state = AxumAppState {
        db_pool: pool.clone(),
        server_deps: Arc::new(server_deps),
        jwt_service: jwt_service.clone(),
    };

    // CORS configuration - allow any origin for development
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    // Clone jwt_service for middleware closure
    let jwt_service_for_middleware = jwt_service.clone();

    // Rate limiting configuration
    // API: 10 requests per second per IP with bursts up to 20
    let rate_limit_config = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(10)
            .burst_size(20)
            .use_headers() // Extract IP from X-Forwarded-For header
            .finish()
            .expect("Rate limiter configuration is valid and should never fail"),
    );

    let rate_limit_layer = GovernorLayer {
        config: rate_limit_config,
    };

    // Build router
    let app = Router::new()
        // Moderation pipeline API with rate limiting
        .route("/api/submissions", post(submit_photo_handler))
        .route("/api/submissions/mine", get(list_own_submissions_handler))
        .route("/api/moderation/queue", get(moderation_queue_handler))
        .route(
            "/api/moderation/submissions/:id/decision",
            post(decide_submission_handler),
        )
        .route("/api/gallery", get(list_gallery_handler))
        .route("/api/gallery/search", get(search_gallery_handler))
        .route("/api/audit", get(query_audit_handler))
        .layer(rate_limit_layer)
        // Health check (no rate limit)
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn(move |req, next| {
            jwt_auth_middleware(jwt_service_for_middleware.clone(), req, next)
        })) // JWT authentication
        .layer(Extension(app_state)) // Add shared state (must be after middlewares that need it)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    Ok((app, shutdown))
}
