//! Shared bootstrap for the vt transport tools: runtime construction,
//! tracing initialization and the timestamp log collaborator.

mod config;
pub mod tslog;

pub use config::OutputConfig;
pub use config::RuntimeConfig;

fn verbosity_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "error",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn init_tracing(output: &OutputConfig) {
    // RUST_LOG takes precedence over the -v derived level
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(verbosity_directive(output.verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Runs an async entry function on a freshly built runtime.
///
/// Initializes the tracing subscriber from `output`, builds a tokio runtime
/// honoring `runtime`, and drives `func` to completion. A fatal error is
/// reported once on stderr (unless quiet) and mapped to `None` so the
/// caller can exit non-zero.
pub fn run<F, Fut, T>(output: OutputConfig, runtime: RuntimeConfig, func: F) -> Option<T>
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = anyhow::Result<T>>,
{
    init_tracing(&output);
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if runtime.max_workers > 0 {
        builder.worker_threads(runtime.max_workers);
    }
    if runtime.max_blocking_threads > 0 {
        builder.max_blocking_threads(runtime.max_blocking_threads);
    }
    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(error) => {
            if !output.quiet {
                eprintln!("Error: failed to start the async runtime: {error}");
            }
            return None;
        }
    };
    match rt.block_on(func()) {
        Ok(value) => Some(value),
        Err(error) => {
            if !output.quiet {
                eprintln!("Error: {error:#}");
            }
            None
        }
    }
}
