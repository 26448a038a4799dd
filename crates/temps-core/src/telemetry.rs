//! Tracing setup shared by binaries and test harnesses embedding the data source crates

use crate::config::LogSettings;
use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Layer};

const WORKSPACE_TARGETS: &[&str] = &["temps_core", "temps_plugins", "temps_datasource"];

/// Build the log filter.
///
/// If RUST_LOG is set it is used as-is; otherwise every workspace crate logs
/// at the configured level and noisy dependencies stay at warn.
pub fn build_env_filter(settings: &LogSettings) -> anyhow::Result<EnvFilter> {
    build_env_filter_from(settings, std::env::var("RUST_LOG").ok())
}

pub fn build_env_filter_from(
    settings: &LogSettings,
    rust_log: Option<String>,
) -> anyhow::Result<EnvFilter> {
    if let Some(directives) = rust_log.filter(|d| !d.trim().is_empty()) {
        return EnvFilter::try_new(&directives)
            .with_context(|| format!("Invalid RUST_LOG environment variable: {}", directives));
    }

    let mut directives: Vec<String> = WORKSPACE_TARGETS
        .iter()
        .map(|target| format!("{}={}", target, settings.level))
        .collect();
    directives.push("tokio=warn".to_string());

    EnvFilter::try_new(directives.join(","))
        .with_context(|| format!("Invalid log level: {}", settings.level))
}

/// Install the global subscriber
pub fn init_tracing(settings: &LogSettings) -> anyhow::Result<()> {
    let filter = build_env_filter(settings)?;

    let fmt_layer = match settings.format.as_str() {
        "full" => tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .boxed(),
        _ => tracing_subscriber::fmt::layer()
            .compact()
            .with_target(false)
            .with_thread_ids(false)
            .with_thread_names(false)
            .boxed(),
    };

    let subscriber = tracing_subscriber::registry().with(filter).with(fmt_layer);
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set global default subscriber")
}
