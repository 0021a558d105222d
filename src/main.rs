//! `coaching-enrollments` server binary.

use std::sync::Arc;

use http::HeaderValue;
use sqlx::PgPool;
use thiserror::Error;
use tokio::sync::watch;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;

use coaching_enrollments::adapters::{
    notification_channel, JwtConfig, JwtSessionValidator, LogNotificationSender,
    MockPaymentProvider, NotificationWorker, NotificationWorkerConfig, PostgresCourseCatalog,
    PostgresEnrollmentRepository, PostgresUserDirectory, RazorpayConfig, RazorpayPaymentAdapter,
    ResendEmailSender,
};
use coaching_enrollments::app::{build_router, EnrollmentPorts, EnrollmentSettings};
use coaching_enrollments::application::handlers::enrollment::OrderSettings;
use coaching_enrollments::config::{AppConfig, ConfigError, ValidationError};
use coaching_enrollments::ports::{NotificationSender, PaymentError, PaymentProvider};

#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    #[error("Database connection failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Payment provider setup failed: {0}")]
    Payment(#[from] PaymentError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    tracing::info!(
        environment = ?config.server.environment,
        test_mode = config.payment.is_test_mode(),
        "Starting coaching-enrollments"
    );

    let pool = connect(&config).await?;

    // Outbound adapters
    let provider: Arc<dyn PaymentProvider> = if config.payment.use_mock_provider {
        tracing::warn!("Using mock payment provider");
        Arc::new(MockPaymentProvider::new())
    } else {
        let razorpay = RazorpayConfig::new(
            config.payment.razorpay_key_id.clone(),
            config.payment.razorpay_key_secret.clone(),
        )
        .with_base_url(config.payment.api_base_url.clone())
        .with_timeout(config.payment.order_timeout());
        Arc::new(RazorpayPaymentAdapter::new(razorpay)?)
    };

    let sender: Arc<dyn NotificationSender> = if config.email.is_enabled() {
        Arc::new(ResendEmailSender::new(
            config.email.resend_api_key.clone(),
            config.email.from_header(),
            config.email.dashboard_url.clone(),
        ))
    } else {
        tracing::warn!("Resend API key not set; purchase emails are logged only");
        Arc::new(LogNotificationSender)
    };

    let catalog = Arc::new(PostgresCourseCatalog::new(pool.clone()));
    let directory = Arc::new(PostgresUserDirectory::new(pool.clone()));

    // Notification worker
    let (queue, rx) = notification_channel(config.notifications.queue_capacity);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let worker = NotificationWorker::new(
        directory,
        catalog.clone(),
        sender,
        NotificationWorkerConfig {
            max_attempts: config.notifications.max_attempts,
            initial_backoff: config.notifications.initial_backoff(),
            max_backoff: config.notifications.max_backoff(),
        },
    );
    let worker_handle = tokio::spawn(async move { worker.run(rx, shutdown_rx).await });

    // HTTP
    let ports = EnrollmentPorts {
        catalog,
        repository: Arc::new(PostgresEnrollmentRepository::new(pool)),
        provider,
        notifications: Arc::new(queue),
    };
    let settings = EnrollmentSettings {
        order: OrderSettings {
            currency: config.payment.currency.clone(),
            key_id: config.payment.razorpay_key_id.clone(),
            timeout: config.payment.order_timeout(),
        },
        checkout_secret: config.payment.razorpay_key_secret.clone(),
        webhook_secret: config.payment.razorpay_webhook_secret.clone(),
        reactivate_revoked_on_payment: config.enrollment.reactivate_revoked_on_payment,
        access_rule: config.enrollment.access_rule(),
    };

    let mut jwt = JwtConfig::new(config.auth.jwt_secret.clone()).with_leeway(config.auth.leeway_secs);
    if let Some(issuer) = &config.auth.jwt_issuer {
        jwt = jwt.with_issuer(issuer.clone());
    }
    let auth = Arc::new(JwtSessionValidator::new(jwt));

    let app = build_router(&ports, settings, auth)
        .layer(CompressionLayer::new())
        .layer(cors_layer(&config))
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Drain queued confirmations before exit
    let _ = shutdown_tx.send(true);
    if let Err(e) = worker_handle.await {
        tracing::error!(error = %e, "Notification worker panicked");
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .compact()
            .with_env_filter(filter)
            .init();
    }
}

async fn connect(config: &AppConfig) -> Result<PgPool, StartupError> {
    let pool = config
        .database
        .pool_options()
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Migrations applied");
    }

    Ok(pool)
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    if origins.is_empty() && !config.is_production() {
        return CorsLayer::permissive();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
