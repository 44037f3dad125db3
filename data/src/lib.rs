pub mod bar;
pub mod chart;
pub mod config;
pub mod loader;
pub mod log;
pub mod timeframe;

pub use bar::{Bar, BarSeries, BarTime};
pub use chart::Chart;
pub use config::ChartConfig;
pub use timeframe::{Ladder, TimeUnit, Timeframe};

use std::path::PathBuf;

const APP_DIR: &str = "candleview";

/// Per-user data directory, or `CANDLEVIEW_DATA_PATH` when set.
pub fn data_path(path_name: Option<&str>) -> PathBuf {
    let base = match std::env::var("CANDLEVIEW_DATA_PATH") {
        Ok(path) => PathBuf::from(path),
        Err(_) => dirs_next::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR),
    };

    match path_name {
        Some(name) => base.join(name),
        None => base,
    }
}
