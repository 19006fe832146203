use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the process-wide tracing subscriber for driver processes.
/// Library crates never install one.
pub fn init_telemetry() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "reserva=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    Ok(())
}
