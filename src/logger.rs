//! Process-wide `env_logger` setup.

use std::sync::Once;

use env_logger::Builder;
use log::LevelFilter;

static INIT: Once = Once::new();

pub fn initialize_logger() {
    INIT.call_once_force(|_| {
        let mut builder = Builder::new();

        builder
            .filter_level(LevelFilter::Info)
            .format_timestamp_millis()
            .parse_default_env();

        // Tests and embedders may have installed a logger already.
        let _ = builder.try_init();
    });
}
