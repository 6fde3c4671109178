use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::{Argon2PasswordHasher, PasswordHasher, TokenIssuer};
use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AuthService, ReportService, SeaOrmAuthService, SeaOrmReportService, SeaOrmUserService,
    UserService,
};

pub mod auth;
mod error;
pub mod reports;
pub mod users;

pub use error::ApiError;

pub struct AppState {
    pub config: Config,

    pub store: Store,

    pub tokens: TokenIssuer,

    pub auth_service: Arc<dyn AuthService>,

    pub report_service: Arc<dyn ReportService>,

    pub user_service: Arc<dyn UserService>,
}

pub async fn create_app_state(config: Config) -> anyhow::Result<Arc<AppState>> {
    let store = Store::with_pool_options(
        &config.database.url,
        config.database.max_connections,
        config.database.min_connections,
    )
    .await?;

    let hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2PasswordHasher::new(&config.security)?);
    let tokens = TokenIssuer::new(&config.security);

    let auth_service = Arc::new(SeaOrmAuthService::new(
        store.clone(),
        Arc::clone(&hasher),
        tokens.clone(),
    ));
    let report_service = Arc::new(SeaOrmReportService::new(store.clone()));
    let user_service = Arc::new(SeaOrmUserService::new(store.clone(), hasher));

    Ok(Arc::new(AppState {
        config,
        store,
        tokens,
        auth_service,
        report_service,
        user_service,
    }))
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config.server.cors_allowed_origins.clone();

    let protected_routes = create_protected_router(state.clone());

    let api_router = Router::new()
        .merge(protected_routes)
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .with_state(state);

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

fn create_protected_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/reports", get(reports::list_reports))
        .route("/reports", post(reports::create_report))
        .route("/reports/{id}", get(reports::get_report))
        .route("/reports/{id}", put(reports::update_report))
        .route("/reports/{id}", delete(reports::delete_report))
        .route("/users/current", get(users::get_current_account))
        .route("/users/current", put(users::update_current_account))
        .route("/users/current", delete(users::delete_current_account))
        .route("/users", get(users::list_accounts))
        .route("/users/{id}", delete(users::delete_account))
        .route_layer(middleware::from_fn_with_state(state, auth::auth_middleware))
}
