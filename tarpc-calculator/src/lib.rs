use std::time::Duration;

use tarpc::tokio_serde::formats::Bincode;
use tokio::{net::TcpStream, time};
use tokio_util::codec::{Framed, LengthDelimitedCodec};

pub mod calculator;
pub mod client;
pub mod config;
pub mod error;
pub mod server;

pub use client::{Client, ClientConfig};
pub use error::{Error, Result};
pub use server::Server;

/// Framing and socket options shared by both ends of a connection.
#[derive(Clone, Debug)]
pub struct TransportConfig {
    /// Largest frame (in bytes) accepted from the peer.
    pub max_frame_length: usize,
    /// Whether `TCP_NODELAY` is set on every socket.
    pub nodelay: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            max_frame_length: 8 * 1024 * 1024,
            nodelay: true,
        }
    }
}

/// Tarpc transport carrying length-delimited bincode frames over TCP.
pub type BincodeTransport<Item, SinkItem> =
    tarpc::serde_transport::Transport<TcpStream, Item, SinkItem, Bincode<Item, SinkItem>>;

/// Creates a tarpc transport that serializes messages with [`Bincode`].
pub fn bincode_transport<Item, SinkItem>(
    stream: TcpStream,
    config: &TransportConfig,
) -> BincodeTransport<Item, SinkItem>
where
    Item: for<'de> serde::Deserialize<'de>,
    SinkItem: serde::Serialize,
{
    let codec = LengthDelimitedCodec::builder()
        .max_frame_length(config.max_frame_length)
        .new_codec();
    tarpc::serde_transport::new(Framed::new(stream, codec), Bincode::default())
}

/// Opens a TCP connection to `addr`, giving up once `timeout` elapses.
///
/// `addr` is a `host:port` pair; the host is resolved at call time.
pub async fn connect(addr: &str, config: &TransportConfig, timeout: Duration) -> Result<TcpStream> {
    let stream = match time::timeout(timeout, TcpStream::connect(addr)).await {
        Ok(Ok(stream)) => stream,
        Ok(Err(source)) => {
            return Err(Error::Connect {
                addr: addr.to_string(),
                source,
            });
        }
        Err(_) => {
            return Err(Error::ConnectTimeout {
                addr: addr.to_string(),
                timeout,
            });
        }
    };

    stream.set_nodelay(config.nodelay).map_err(|source| Error::Connect {
        addr: addr.to_string(),
        source,
    })?;
    Ok(stream)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::{Calculator, CalculatorClient, CalculatorService, Input, Output};
    use futures::StreamExt;
    use std::{io, time::Instant};
    use tarpc::{
        context,
        server::{BaseChannel, Channel},
    };
    use tokio::net::TcpListener;

    async fn spawn_server(config: TransportConfig) -> io::Result<String> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?.to_string();
        tokio::spawn(async move {
            let Ok((stream, _)) = listener.accept().await else {
                return;
            };
            BaseChannel::with_defaults(bincode_transport(stream, &config))
                .execute(CalculatorService.serve())
                .for_each(|fut| async move {
                    tokio::spawn(fut);
                })
                .await;
        });
        Ok(addr)
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn tarpc_roundtrip() -> Result<()> {
        let config = TransportConfig::default();
        let addr = spawn_server(config.clone()).await.map_err(|source| Error::Bind {
            addr: "127.0.0.1:0".into(),
            source,
        })?;

        let stream = connect(&addr, &config, Duration::from_secs(1)).await?;
        let client = CalculatorClient::new(Default::default(), bincode_transport(stream, &config))
            .spawn();

        let sum = client.calculate(context::current(), Input::new(3, 4)).await?;
        assert_eq!(sum, Output::new(7));
        let product = client.multiply(context::current(), Input::new(3, 4)).await?;
        assert_eq!(product, Output::new(12));
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn oversized_frames_fail_the_call() -> Result<()> {
        let server_config = TransportConfig {
            max_frame_length: 8,
            ..TransportConfig::default()
        };
        let addr = spawn_server(server_config).await.map_err(|source| Error::Bind {
            addr: "127.0.0.1:0".into(),
            source,
        })?;

        let config = TransportConfig::default();
        let stream = connect(&addr, &config, Duration::from_secs(1)).await?;
        let client = CalculatorClient::new(Default::default(), bincode_transport(stream, &config))
            .spawn();

        let mut ctx = context::current();
        ctx.deadline = Instant::now() + Duration::from_secs(2);
        let result = client.calculate(ctx, Input::new(1, 2)).await;
        assert!(result.is_err(), "server accepted an oversized frame: {result:?}");
        Ok(())
    }

    #[tokio::test]
    async fn connect_reports_refused_connections() -> io::Result<()> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?.to_string();
        drop(listener);

        let err = connect(&addr, &TransportConfig::default(), Duration::from_secs(1))
            .await
            .expect_err("nothing is listening");
        assert!(matches!(err, Error::Connect { .. }), "unexpected error: {err}");
        Ok(())
    }
}
