use tokio::time::Duration;

use crate::codec::DEFAULT_MAX_LINE_LENGTH;
use crate::janitor::SWEEP_INTERVAL;

pub const PORT: u16 = 8000;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Longest command line accepted before the connection is dropped, in bytes.
    pub max_line_length: usize,
    pub sweep_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: "127.0.0.1".to_string(),
            port: PORT,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            sweep_interval: SWEEP_INTERVAL,
        }
    }
}
