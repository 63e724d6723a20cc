use std::{future::Future, io, net::SocketAddr};

use futures::{StreamExt, future};
use tarpc::server::{BaseChannel, Channel};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, warn};

use crate::{
    Error, Result, TransportConfig,
    bincode_transport,
    calculator::{Calculator, CalculatorService},
};

/// TCP listener serving the [`Calculator`] service.
///
/// Each accepted connection becomes its own tarpc channel, and every request
/// on that channel runs as an independent tokio task.
#[derive(Debug)]
pub struct Server {
    listener: TcpListener,
    config: TransportConfig,
}

impl Server {
    /// Binds the listening socket.
    pub async fn bind(addr: &str, config: TransportConfig) -> Result<Self> {
        let listener = TcpListener::bind(addr).await.map_err(|source| Error::Bind {
            addr: addr.to_string(),
            source,
        })?;
        Ok(Self { listener, config })
    }

    /// Address the listener is actually bound to.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serves connections until the process exits.
    pub async fn run(self) {
        self.run_until(future::pending::<()>()).await;
    }

    /// Serves connections until `shutdown` resolves, then releases the listener.
    ///
    /// Connections already accepted keep running on their own tasks.
    pub async fn run_until<F>(self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                () = &mut shutdown => {
                    info!("shutting down listener");
                    break;
                }
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        debug!(%peer, "accepted connection");
                        tokio::spawn(serve_connection(stream, peer, self.config.clone()));
                    }
                    Err(err) => warn!(%err, "failed to accept connection"),
                },
            }
        }
    }
}

async fn serve_connection(stream: TcpStream, peer: SocketAddr, config: TransportConfig) {
    if let Err(err) = stream.set_nodelay(config.nodelay) {
        warn!(%peer, %err, "failed to set TCP_NODELAY");
    }

    BaseChannel::with_defaults(bincode_transport(stream, &config))
        .execute(CalculatorService.serve())
        .for_each(|fut| async move {
            tokio::spawn(fut);
        })
        .await;

    debug!(%peer, "connection closed");
}
