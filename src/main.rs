use std::sync::{Arc, Mutex};

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::routing::{get, patch, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use landbook::config::AppConfig;
use landbook::db;
use landbook::handlers;
use landbook::models::RateTable;
use landbook::services::notify::twilio::TwilioWhatsAppProvider;
use landbook::services::payments::razorpay::RazorpayProvider;
use landbook::services::pincode::PostalPincodeClient;
use landbook::services::pricing::PricingConfig;
use landbook::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;

    let rates = RateTable::from_json(&config.work_categories)?;
    let pricing = PricingConfig::from_app(&config);

    if config.razorpay_key_id.is_empty() {
        tracing::warn!("payment provider credentials not set, online payments will fail");
    }
    let payments = RazorpayProvider::new(
        config.razorpay_key_id.clone(),
        config.razorpay_key_secret.clone(),
    );
    let notifier = TwilioWhatsAppProvider::new(
        config.twilio_account_sid.clone(),
        config.twilio_auth_token.clone(),
        config.twilio_whatsapp_number.clone(),
    );

    let cors = CorsLayer::new()
        .allow_origin(config.allowed_origin.trim_end_matches('/').parse::<HeaderValue>()?)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION]);

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
        rates,
        pricing,
        payments: Box::new(payments),
        notifier: Box::new(notifier),
        pincode: Box::new(PostalPincodeClient::new()),
    });

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/admin/login", post(handlers::admin::login))
        .route(
            "/appointments",
            get(handlers::appointments::list).post(handlers::appointments::create),
        )
        .route(
            "/appointments/create-order",
            post(handlers::payments::create_order),
        )
        .route(
            "/appointments/verify-payment",
            post(handlers::payments::verify_payment),
        )
        .route(
            "/appointments/mark-attended",
            post(handlers::appointments::mark_attended),
        )
        .route(
            "/appointments/mark-not-attended",
            post(handlers::appointments::mark_not_attended),
        )
        .route(
            "/appointments/:id",
            get(handlers::appointments::get_one)
                .put(handlers::appointments::update)
                .delete(handlers::appointments::delete),
        )
        .route(
            "/appointments/:id/attempted",
            patch(handlers::appointments::set_attempted),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
