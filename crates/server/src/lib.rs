pub mod api;
pub mod auth;
pub mod config;
pub mod error;

use std::sync::Arc;

use anyhow::Context;
use invest_tracker_core::{
    storage::{
        encryption::random_bytes, file_store::EncryptedFileStore, memory::MemoryRecordStore,
        traits::RecordStore,
    },
    InvestmentTracker,
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use auth::AuthManager;
use config::{Config, LogFormat};

pub struct AppState {
    pub tracker: InvestmentTracker,
    pub auth: AuthManager,
}

pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(false))
            .init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init(),
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let store: Arc<dyn RecordStore> = match (&config.data_path, &config.data_password) {
        (Some(path), Some(password)) => {
            let (path, password) = (path.clone(), password.clone());
            // Argon2 key derivation blocks.
            let store = tokio::task::spawn_blocking(move || EncryptedFileStore::open(&path, &password))
                .await
                .context("record store task panicked")?
                .context("failed to open the records file")?;
            tracing::info!(path = %store.path().display(), "Using encrypted records file");
            Arc::new(store)
        }
        _ => {
            tracing::warn!("IT_DATA_PATH not set; records are kept in memory only");
            Arc::new(MemoryRecordStore::new())
        }
    };

    let secret_key = match &config.secret_key {
        Some(key) => key.clone(),
        None => {
            tracing::warn!("IT_SECRET_KEY not set; tokens will not survive a restart");
            random_bytes::<32>()?.to_vec()
        }
    };
    if config.password_hash.is_none() {
        tracing::warn!("IT_PASSWORD_HASH not set; every login will be refused");
    }

    let ttl = chrono::TimeDelta::try_minutes(config.token_ttl_minutes)
        .context("IT_TOKEN_TTL_MINUTES is out of range")?;
    let auth = AuthManager::new(
        config.username.clone(),
        config.password_hash.clone(),
        &secret_key,
        ttl,
    )?;

    Ok(Arc::new(AppState {
        tracker: InvestmentTracker::new(store),
        auth,
    }))
}
