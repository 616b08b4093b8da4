use tracing_chrome::{ChromeLayerBuilder, FlushGuard};
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*};

/// Install the global subscriber.
///
/// Warnings are always logged to stderr. With `chrome_trace` every span is also recorded for
/// chrome://tracing or https://ui.perfetto.dev/. Keep the returned guard alive until the program
/// exits, dropping it flushes and closes the trace file.
pub fn init(chrome_trace: bool) -> Option<FlushGuard> {
    let (chrome_layer, guard) = if chrome_trace {
        let (layer, guard) = ChromeLayerBuilder::new().include_args(true).build();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    let log_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .with_filter(LevelFilter::WARN);

    tracing_subscriber::registry()
        .with(chrome_layer)
        .with(log_layer)
        .init();

    guard
}
