pub mod api; // Chat page + JSON API
pub mod config;
pub mod models;
pub mod pipeline; // Intent routing, questionnaire, prediction, conversation

#[cfg(test)]
mod test_support;

use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::api::ApiContext;
use crate::config::AppConfig;
use crate::pipeline::conversation::GeminiClient;
use crate::pipeline::prediction::PredictionClient;

pub fn run() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    if let Err(e) = start() {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

fn start() -> Result<(), String> {
    // Configuration errors abort before anything binds.
    let config = AppConfig::from_env().map_err(|e| e.to_string())?;
    tracing::info!(
        bind_addr = %config.bind_addr,
        "Configuration loaded"
    );

    // Blocking HTTP clients own an internal runtime; build them outside ours.
    let backend = GeminiClient::from_config(&config).map_err(|e| e.to_string())?;
    let predictor = PredictionClient::new(&config.prediction_url).map_err(|e| e.to_string())?;
    tracing::info!(
        model = backend.model(),
        prediction_endpoint = predictor.endpoint(),
        "Backends ready"
    );
    let ctx = ApiContext::new(Arc::new(backend), Arc::new(predictor), &config.model);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to start async runtime: {e}"))?;

    let served = runtime.block_on({
        let ctx = ctx.clone();
        async move {
            let listener = api::server::bind(config.bind_addr).await?;
            api::server::serve(listener, ctx, api::server::ctrl_c()).await
        }
    });

    // Last client handles drop here, outside the runtime.
    drop(runtime);
    drop(ctx);
    served
}
