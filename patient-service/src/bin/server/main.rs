use std::sync::Arc;

use auth::Authenticator;
use chrono::Duration;
use patient_service::config::Config;
use patient_service::domain::access::service::AuthService;
use patient_service::domain::patient::service::PatientService;
use patient_service::domain::user::service::UserService;
use patient_service::inbound::http::router::create_router;
use patient_service::outbound::repositories::PostgresPatientRepository;
use patient_service::outbound::repositories::PostgresUserRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "patient_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "patient-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        max_connections = config.database.max_connections,
        jwt_expiration_hours = config.jwt.expiration_hours,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let authenticator = Arc::new(
        Authenticator::new(config.jwt.secret.as_bytes())
            .with_token_ttl(Duration::hours(config.jwt.expiration_hours)),
    );
    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool.clone()));
    let patient_repository = Arc::new(PostgresPatientRepository::new(pg_pool));

    let auth_service = Arc::new(AuthService::new(
        Arc::clone(&user_repository),
        Arc::clone(&authenticator),
    ));
    let user_service = Arc::new(UserService::new(user_repository));
    let patient_service = Arc::new(PatientService::new(patient_repository));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(
        auth_service,
        user_service,
        patient_service,
        authenticator,
    );
    axum::serve(http_listener, http_application).await?;

    tracing::info!("Server exited");

    Ok(())
}
