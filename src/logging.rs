use crate::config::LogConfig;
use std::sync::Once;

static INIT: Once = Once::new();

/// Picks the filter string: the config wins over `RUST_LOG`, which wins over
/// plain `info`.
fn filter_for(config: &LogConfig, env: Option<String>) -> String {
    config
        .filter
        .clone()
        .or(env)
        .unwrap_or_else(|| "info".to_owned())
}

/// Initializes the global logger. Later calls do nothing.
pub fn init_logging(config: &LogConfig) {
    INIT.call_once(|| {
        let filter = filter_for(config, std::env::var("RUST_LOG").ok());
        env_logger::Builder::new()
            .parse_filters(&filter)
            .format_timestamp_millis()
            .init();
        log::debug!("logging initialized with filter {:?}", filter);
    });
}
