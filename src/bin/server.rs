use clap::Parser;
use kvline::config::{Config, PORT};
use kvline::{server, Error};
use std::time::Duration;

#[derive(Parser, Debug)]
struct Args {
    /// The address to bind to
    #[arg(long, env = "KVLINE_HOST", default_value = "127.0.0.1")]
    host: String,

    /// The port to listen on
    #[arg(short, long, env = "KVLINE_PORT", default_value_t = PORT)]
    port: u16,

    /// Longest accepted command line, in bytes
    #[arg(long, env = "KVLINE_MAX_LINE_LENGTH")]
    max_line_length: Option<usize>,

    /// Seconds between two sweeps of expired keys
    #[arg(
        long,
        env = "KVLINE_SWEEP_INTERVAL_SECS",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    sweep_interval_secs: Option<u64>,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        let defaults = Config::default();

        Config {
            host: args.host,
            port: args.port,
            max_line_length: args.max_line_length.unwrap_or(defaults.max_line_length),
            sweep_interval: args
                .sweep_interval_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.sweep_interval),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let args = Args::parse();

    server::run(args.into()).await
}
