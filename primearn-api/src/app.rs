/// Router assembly
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use primearn_api::{app::AppState, config::Config};
/// use primearn_shared::db::pool::{create_pool, DatabaseConfig};
/// use primearn_shared::store::postgres::PgAccountStore;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(DatabaseConfig {
///     url: config.database.url.clone(),
///     ..Default::default()
/// })
/// .await?;
/// let state = AppState::new(Arc::new(PgAccountStore::new(pool)), config);
/// let app = primearn_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{
    config::Config,
    error::{self, ApiError},
    middleware::{auth::require_auth, errors::expose_error_detail, security::SecurityHeadersLayer},
};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use primearn_shared::{service::AccountService, store::AccountStore};
use std::{sync::Arc, time::Instant};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Handler state; every field is behind an `Arc`
#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountService,
    pub config: Arc<Config>,

    /// Process start, reported as uptime by the health check
    pub started_at: Instant,
}

impl AppState {
    /// Wires the account service to `store` using the rules and secrets in `config`
    pub fn new(store: Arc<dyn AccountStore>, config: Config) -> Self {
        let accounts = AccountService::new(
            store,
            config.rules(),
            config.hashing_params(),
            config.token_settings(),
        );

        Self {
            accounts,
            config: Arc::new(config),
            started_at: Instant::now(),
        }
    }
}

/// Builds the HTTP surface
///
/// ```text
/// /
/// ├── /health                        # Health check (public)
/// └── /api/users/
///     ├── POST /register             # public
///     ├── POST /login                # public
///     ├── GET  /profile              # bearer token
///     ├── PUT  /profile
///     ├── POST /complete-task
///     ├── POST /upgrade
///     ├── POST /withdraw
///     ├── POST /change-password
///     ├── POST /track-whatsapp-join
///     └── GET  /dashboard
/// ```
///
/// Anything else answers 404 "Endpoint not found". Panics become the
/// generic 500 envelope; the debug-detail middleware sits just outside the
/// panic catcher so it sees those responses too. Security headers are the
/// outermost layer and land on every response.
pub fn build_router(state: AppState) -> Router {
    use crate::routes::{account, auth, health, ledger};

    let health_routes = Router::new().route("/health", get(health::health_check));

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    let account_routes = Router::new()
        .route(
            "/profile",
            get(account::get_profile).put(account::update_profile),
        )
        .route("/change-password", post(account::change_password))
        .route("/track-whatsapp-join", post(account::track_whatsapp_join))
        .route("/dashboard", get(account::dashboard))
        .route("/complete-task", post(ledger::complete_task))
        .route("/upgrade", post(ledger::upgrade))
        .route("/withdraw", post(ledger::withdraw))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    let user_routes = Router::new().merge(auth_routes).merge(account_routes);

    let cors = if state.config.api.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/api/users", user_routes)
        .fallback(endpoint_not_found)
        .layer(CatchPanicLayer::custom(error::panic_response))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            expose_error_detail,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

async fn endpoint_not_found() -> ApiError {
    ApiError::NotFound("Endpoint not found".to_string())
}
