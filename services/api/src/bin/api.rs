//! services/api/src/bin/api.rs

use api_lib::{
    adapters::db::DbAdapter,
    config::Config,
    error::ApiError,
    web::{
        analytics::analytics_summary_handler,
        auth::{login_handler, logout_handler, me_handler, register_handler},
        friends::{
            list_friends_handler, pending_requests_handler, remove_friend_handler,
            respond_friend_request_handler, send_friend_request_handler,
        },
        goals::{goal_progress_handler, list_goals_handler, set_goal_handler},
        middleware::require_auth,
        pomodoro::{
            cancel_pomodoro_handler, complete_pomodoro_handler, current_pomodoro_handler,
            pomodoro_stats_handler, recent_pomodoros_handler, start_pomodoro_handler,
        },
        rest::ApiDoc,
        sessions::{
            daily_summary_handler, delete_session_handler, list_sessions_handler,
            log_session_handler, subject_summary_handler,
        },
        state::AppState,
    },
};
use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Connect to Database & Run Migrations ---
    info!("Opening database {}", config.database_url);
    let connect_options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .foreign_keys(true);
    let db_pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(connect_options)
        .await?;
    let store = Arc::new(DbAdapter::new(db_pool.clone()));
    info!("Running database migrations...");
    store.run_migrations().await?;
    info!("Database migrations complete.");

    // --- 3. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        store,
        config: config.clone(),
    });

    let cors = CorsLayer::new()
        .allow_origin(
            config
                .cors_origin
                .parse::<HeaderValue>()
                .map_err(|e| ApiError::Internal(format!("Invalid CORS_ORIGIN: {}", e)))?,
        )
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    // --- 4. Create the Web Router ---
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/auth/register", post(register_handler))
        .route("/auth/login", post(login_handler))
        .route("/auth/logout", post(logout_handler));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route("/auth/me", get(me_handler))
        .route("/sessions", post(log_session_handler).get(list_sessions_handler))
        .route("/sessions/{id}", delete(delete_session_handler))
        .route("/sessions/summary/subjects", get(subject_summary_handler))
        .route("/sessions/summary/daily", get(daily_summary_handler))
        .route("/goals", put(set_goal_handler).get(list_goals_handler))
        .route("/goals/progress", get(goal_progress_handler))
        .route("/pomodoro/start", post(start_pomodoro_handler))
        .route("/pomodoro/{id}/complete", post(complete_pomodoro_handler))
        .route("/pomodoro/{id}/cancel", post(cancel_pomodoro_handler))
        .route("/pomodoro/current", get(current_pomodoro_handler))
        .route("/pomodoro/recent", get(recent_pomodoros_handler))
        .route("/pomodoro/stats", get(pomodoro_stats_handler))
        .route(
            "/friends/requests",
            post(send_friend_request_handler).get(pending_requests_handler),
        )
        .route(
            "/friends/requests/{id}/respond",
            post(respond_friend_request_handler),
        )
        .route("/friends", get(list_friends_handler))
        .route("/friends/{id}", delete(remove_friend_handler))
        .route("/analytics/summary", get(analytics_summary_handler))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_auth,
        ));

    // Combine API routes
    let api_router = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(cors)
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 5. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
