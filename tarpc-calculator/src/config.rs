//! Command-line and environment configuration for the calculator binaries.

use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::{ClientConfig, TransportConfig, calculator::Input};

/// Serves addition and multiplication over TCP.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(version)]
pub struct ServerArgs {
    /// Address to listen on.
    #[arg(long, env = "CALCULATOR_LISTEN", default_value = "0.0.0.0:50051")]
    pub listen: String,

    /// Largest request frame accepted, in bytes.
    #[arg(long, env = "CALCULATOR_MAX_FRAME_LENGTH")]
    pub max_frame_length: Option<usize>,
}

impl ServerArgs {
    pub fn transport(&self) -> TransportConfig {
        transport_config(self.max_frame_length)
    }
}

/// Asks a calculator server for the sum and the product of two numbers.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(version)]
pub struct ClientArgs {
    /// Server address as `host:port`.
    #[arg(long, env = "CALCULATOR_SERVER", default_value = "localhost:50051")]
    pub server: String,

    /// Time allowed for connecting and for each call, in milliseconds.
    #[arg(long, env = "CALCULATOR_TIMEOUT_MS", default_value_t = 1000)]
    pub timeout_ms: u64,

    /// Largest response frame accepted, in bytes.
    #[arg(long, env = "CALCULATOR_MAX_FRAME_LENGTH")]
    pub max_frame_length: Option<usize>,

    /// First operand.
    #[arg(default_value_t = 4, allow_negative_numbers = true)]
    pub num_1: i64,

    /// Second operand.
    #[arg(default_value_t = 3, allow_negative_numbers = true)]
    pub num_2: i64,
}

impl ClientArgs {
    pub fn input(&self) -> Input {
        Input::new(self.num_1, self.num_2)
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            call_timeout: Duration::from_millis(self.timeout_ms),
            transport: transport_config(self.max_frame_length),
        }
    }
}

fn transport_config(max_frame_length: Option<usize>) -> TransportConfig {
    let mut config = TransportConfig::default();
    if let Some(max) = max_frame_length {
        config.max_frame_length = max;
    }
    config
}

/// Installs the global `tracing` subscriber.
///
/// Output goes to stderr; the filter comes from `RUST_LOG` and defaults to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
