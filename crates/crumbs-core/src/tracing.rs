use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the JSON stdout subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_directives` is used, e.g.
/// `"crumbs_api=info,tower_http=info"`. Later calls are no-ops.
pub fn init_tracing(default_directives: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directives))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().with_current_span(false))
        .try_init();
}
