//! Format layer creation

use tracing_subscriber::fmt;
use tracing_subscriber::{Layer, Registry};

use crate::config::{Config, Format};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Formatting layer writing to stderr
pub(super) fn fmt_layer(config: &Config) -> BoxedLayer {
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(config.ansi)
        .with_target(config.with_target);

    match config.format {
        Format::Pretty => layer.pretty().boxed(),
        Format::Compact => layer.compact().boxed(),
        Format::Json => layer
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .flatten_event(true)
            .boxed(),
    }
}
