use std::sync::Arc;

use secrecy::Secret;
use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use thinkalike::adapters::http::with_middleware;
use thinkalike::adapters::{
    audit_channel, AcceptingVerificationSystem, AuditWorker, HttpVerificationConfig,
    HttpVerificationSystem, InMemoryAuditVerdictLog, InMemoryEventBus,
    InMemoryValueProfileRepository, PgValueProfileRepository,
};
use thinkalike::bootstrap::AppComponents;
use thinkalike::config::{AppConfig, DatabaseConfig, VerificationConfig};
use thinkalike::domain::matching::{FairnessReview, Pseudonymizer};
use thinkalike::ports::{ValueProfileRepository, VerificationSystem};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config);

    let weights = Arc::new(config.matching.load_weight_table()?);
    tracing::info!(
        categories = weights.len(),
        measure = %config.matching.measure,
        "Ethical weight table loaded"
    );

    let repository = profile_repository(config.database.as_ref()).await?;
    let event_bus = Arc::new(InMemoryEventBus::new());

    let (audit_sink, audit_rx) = audit_channel(config.verification.queue_capacity);
    let verdict_log = Arc::new(InMemoryAuditVerdictLog::new(
        config.verification.verdict_log_capacity,
    ));
    let worker = AuditWorker::new(
        audit_rx,
        verification_system(&config.verification)?,
        verdict_log.clone(),
    )
    .spawn();

    let fairness = if config.features.enable_fairness_checks {
        FairnessReview::standard(
            config.matching.dominance_threshold,
            config.matching.min_profile_categories,
        )
    } else {
        FairnessReview::new(Vec::new())
    };

    let components = AppComponents {
        weights,
        measure: config.matching.measure,
        default_min_contribution: config.matching.default_min_contribution,
        max_candidates: config.matching.max_candidates,
        fairness: Arc::new(fairness),
        repository,
        event_publisher: event_bus,
        audit_sink: Arc::new(audit_sink),
        verdict_log,
        pseudonymizer: pseudonymizer(&config.verification)?,
        verbose_errors: config.features.verbose_errors,
    };
    let app = with_middleware(
        components.into_router(),
        &config.server,
        config.features.enable_tracing,
    );

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = ?config.server.environment, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Router dropped: the audit queue closes and the worker drains what is left.
    if let Err(e) = worker.await {
        tracing::warn!(error = %e, "Audit worker ended abnormally");
    }
    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if config.is_production() {
        builder.json().init();
    } else {
        builder.pretty().init();
    }
}

async fn profile_repository(
    database: Option<&DatabaseConfig>,
) -> Result<Arc<dyn ValueProfileRepository>, BoxError> {
    let Some(database) = database else {
        tracing::warn!("No database configured; profiles are kept in memory");
        return Ok(Arc::new(InMemoryValueProfileRepository::new()));
    };

    let pool = database.connect().await?;
    if database.run_migrations {
        sqlx::migrate!().run(&pool).await?;
        tracing::info!("Database migrations applied");
    }
    Ok(Arc::new(PgValueProfileRepository::new(pool)))
}

fn verification_system(config: &VerificationConfig) -> Result<Arc<dyn VerificationSystem>, BoxError> {
    match (&config.endpoint, config.enabled) {
        (Some(endpoint), true) => {
            let mut client =
                HttpVerificationConfig::new(endpoint.clone()).with_timeout(config.timeout());
            if let Some(api_key) = &config.api_key {
                client = client.with_api_key(api_key.clone());
            }
            tracing::info!(endpoint = %endpoint, "External verification enabled");
            Ok(Arc::new(HttpVerificationSystem::new(client)?))
        }
        _ => {
            tracing::info!("External verification disabled; audit records are accepted locally");
            Ok(Arc::new(AcceptingVerificationSystem))
        }
    }
}

/// Uses the configured secret, or a per-process one when verification is off.
fn pseudonymizer(config: &VerificationConfig) -> Result<Pseudonymizer, BoxError> {
    let secret = match &config.pseudonym_secret {
        Some(secret) => secret.clone(),
        None => Secret::new(uuid::Uuid::new_v4().to_string()),
    };
    Ok(Pseudonymizer::new(&secret)?)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install terminate handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received terminate signal, shutting down"),
    }
}
