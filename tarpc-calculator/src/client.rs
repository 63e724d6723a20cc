use std::time::{Duration, Instant};

use tarpc::context;
use tracing::debug;

use crate::{
    Result, TransportConfig, bincode_transport,
    calculator::{CalculatorClient, Input, Output},
    connect,
};

/// Settings for a [`Client`].
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Upper bound for connecting and for each individual call.
    pub call_timeout: Duration,
    pub transport: TransportConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            call_timeout: Duration::from_secs(1),
            transport: TransportConfig::default(),
        }
    }
}

/// Connection to a calculator server.
///
/// Calls are unary and never retried; each one carries its own deadline.
pub struct Client {
    inner: CalculatorClient,
    call_timeout: Duration,
}

impl Client {
    /// Connects to `addr` (a `host:port` pair) and spawns the request dispatcher.
    pub async fn connect(addr: &str, config: ClientConfig) -> Result<Self> {
        let stream = connect(addr, &config.transport, config.call_timeout).await?;
        debug!(%addr, "connected");

        let transport = bincode_transport(stream, &config.transport);
        let inner = CalculatorClient::new(tarpc::client::Config::default(), transport).spawn();
        Ok(Self {
            inner,
            call_timeout: config.call_timeout,
        })
    }

    /// Remote sum of both operands.
    pub async fn calculate(&self, input: Input) -> Result<Output> {
        Ok(self.inner.calculate(self.context(), input).await?)
    }

    /// Remote product of both operands.
    pub async fn multiply(&self, input: Input) -> Result<Output> {
        Ok(self.inner.multiply(self.context(), input).await?)
    }

    fn context(&self) -> context::Context {
        let mut ctx = context::current();
        ctx.deadline = Instant::now() + self.call_timeout;
        ctx
    }
}
