use std::io;

use tracing_subscriber::{fmt, layer::Layer, registry::LookupSpan};

use super::{LogFormat, LoggingConfig};

/// Слой форматирования; тип формата стирается в trait-объект.
pub fn build_formatter<S>(config: &LoggingConfig) -> Box<dyn Layer<S> + Send + Sync>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    let layer = fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(config.with_ansi)
        .with_target(config.with_target);

    match config.format {
        LogFormat::Compact => Box::new(layer.compact()),
        LogFormat::Pretty => Box::new(layer.pretty()),
        LogFormat::Json => Box::new(layer.json().with_current_span(true)),
    }
}
