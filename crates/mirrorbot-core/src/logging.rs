use crate::Result;

/// Initialize process diagnostics (tracing).
///
/// This is separate from the outbound log pipeline in [`crate::dispatch`]:
/// tracing covers the bot's own internals, the dispatcher covers what gets
/// mirrored to the chat platform's log channels.
pub fn init(service_name: &str) -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    // Default: info for our crates, warn for everything else.
    // Can be overridden with `RUST_LOG`.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("warn,mirrorbot_core=info,{service_name}=info"))
    });

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(true)
        .init();

    Ok(())
}
