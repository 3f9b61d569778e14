//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging
//! utilities for the Eventify application.

use crate::config::LoggingConfig;
use crate::utils::errors::Result;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging based on configuration.
///
/// Returns the appender guard; the caller must keep it alive for the
/// lifetime of the process or buffered log lines are lost on shutdown.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let registry = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout));

    let guard = if let Some(dir) = &config.file_path {
        let file_appender = tracing_appender::rolling::daily(dir, "eventify.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(non_blocking))
            .init();
        Some(guard)
    } else {
        registry.init();
        None
    };

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log registration-subsystem actions with structured data
pub fn log_registration_action(event_id: i64, student_id: i64, action: &str) {
    info!(
        event_id = event_id,
        student_id = student_id,
        action = action,
        "Registration action performed"
    );
}

/// Log admin actions against events
pub fn log_admin_action(admin_id: i64, event_id: Option<i64>, action: &str) {
    warn!(
        admin_id = admin_id,
        event_id = event_id,
        action = action,
        "Admin action performed"
    );
}
