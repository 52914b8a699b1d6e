use axum::{
    middleware,
    routing::{delete, get, patch, post, put},
    Router,
};
use domain::services::EventPublisher;
use shared::invite_token::InviteTokenCodec;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware};
use crate::routes::{cities, countries, governors, health, invites};
use crate::services::{create_publisher, CascadeService, GovernanceService, InviteService};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub codec: InviteTokenCodec,
    pub publisher: Arc<dyn EventPublisher>,
}

impl AppState {
    pub fn invite_service(&self) -> InviteService {
        InviteService::new(
            self.pool.clone(),
            self.codec.clone(),
            self.publisher.clone(),
            self.config.invite.default_ttl_hours,
        )
    }

    pub fn governance_service(&self) -> GovernanceService {
        GovernanceService::new(self.pool.clone(), self.publisher.clone())
    }

    pub fn cascade_service(&self) -> CascadeService {
        CascadeService::new(self.pool.clone(), self.publisher.clone())
    }
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let config = Arc::new(config);

    // The signing secret is loaded once here; the codec is read-only
    // afterwards.
    let codec = InviteTokenCodec::new(&config.invite.secret);
    let publisher = create_publisher(&config.events);

    let state = AppState {
        pool,
        config: config.clone(),
        codec,
        publisher,
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Governance API (v1). Identity arrives from upstream auth as trusted
    // gateway headers; handlers extract it where required.
    let api_routes = Router::new()
        .route(
            "/api/v1/countries",
            post(countries::create_country).get(countries::list_countries),
        )
        .route("/api/v1/countries/:country_id", get(countries::get_country))
        .route(
            "/api/v1/countries/:country_id/status",
            put(countries::set_country_status),
        )
        .route(
            "/api/v1/cities",
            post(cities::create_city).get(cities::list_cities),
        )
        .route(
            "/api/v1/cities/:city_id",
            get(cities::get_city).patch(cities::update_city),
        )
        .route("/api/v1/cities/:city_id/status", put(cities::set_city_status))
        .route(
            "/api/v1/cities/:city_id/invites",
            post(invites::create_invite).get(invites::list_invites),
        )
        .route(
            "/api/v1/cities/:city_id/governors",
            get(governors::list_city_governors),
        )
        .route(
            "/api/v1/cities/:city_id/governors/:user_id",
            delete(governors::delete_governor),
        )
        .route("/api/v1/invites/accept", post(invites::accept_invite))
        .route("/api/v1/invites/:invite_id", get(invites::get_invite))
        .route(
            "/api/v1/invites/:invite_id/decline",
            post(invites::decline_invite),
        )
        .route(
            "/api/v1/governors/me",
            get(governors::get_own_governor).delete(governors::refuse_own),
        )
        .route(
            "/api/v1/governors/:user_id/label",
            patch(governors::update_governor_label),
        );

    // Public routes (no identity required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}
