// Framework bootstrap for the AudioFlow HTTP service.

use crate::domain::init_data::InitDataVerifier;
use crate::domain::ports::UserStore;
use crate::frameworks::config::Settings;
use crate::frameworks::db;
use crate::interface_adapters::routes::app;
use crate::interface_adapters::state::{AppState, InMemoryUserStore, PostgresUserStore};
use crate::use_cases::StreamAudioUseCase;

use std::collections::HashMap;
use std::io::{Error, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;

fn init_runtime() {
    // Load .env locally; safe to ignore when not present.
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

pub async fn run(listener: tokio::net::TcpListener, settings: Settings) -> Result<()> {
    let address = listener.local_addr()?;
    let state = build_state(&settings).await?;
    let app = app(state);

    tracing::info!(
        %address,
        audio_dir = %settings.audio_dir.display(),
        "listening"
    );

    // Serve app and report errors rather than panicking
    axum::serve(listener, app).await.inspect_err(|e| {
        tracing::error!(error = %e, "server error");
    })
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let settings = Settings::from_env().map_err(|e| {
        tracing::error!(error = %e, "invalid configuration");
        Error::other(e)
    })?;
    tracing::debug!(?settings, "configuration loaded");

    let address = SocketAddr::new(settings.host, settings.port);

    // Bind TCP listener with error handling
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .inspect_err(|e| {
            tracing::error!(%address, error = %e, "failed to bind");
        })?;

    run(listener, settings).await
}

async fn build_state(settings: &Settings) -> Result<AppState> {
    let users: Arc<dyn UserStore> = match settings.database_url.as_deref() {
        Some(database_url) => {
            let pool = db::connect_pool(database_url)
                .await
                .map_err(|e| Error::other(format!("failed to connect to database: {e}")))?;
            db::run_migrations(&pool)
                .await
                .map_err(|e| Error::other(format!("failed to run migrations: {e}")))?;
            tracing::info!("user directory backed by postgres");
            Arc::new(PostgresUserStore { db: pool })
        }
        None => {
            tracing::warn!("DATABASE_URL not set; users are kept in memory only");
            Arc::new(InMemoryUserStore::default())
        }
    };

    if !settings.audio_dir.is_dir() {
        tracing::warn!(
            audio_dir = %settings.audio_dir.display(),
            "audio directory does not exist; every audio request will 404"
        );
    }

    Ok(AppState {
        sessions: Arc::new(Mutex::new(HashMap::new())),
        users,
        verifier: InitDataVerifier::new(&settings.bot_token, settings.init_data_max_age_seconds),
        session_ttl_seconds: settings.session_ttl_seconds,
        audio_dir: Arc::new(settings.audio_dir.clone()),
        stream: StreamAudioUseCase {
            malformed_range: settings.malformed_range,
        },
    })
}
