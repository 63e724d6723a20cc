use std::process;

use anyhow::Context;
use clap::Parser;
use tarpc_calculator::{
    Server,
    config::{ServerArgs, init_tracing},
};
use tracing::{error, info, warn};

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    init_tracing();
    let args = ServerArgs::parse();

    if let Err(err) = run(args).await {
        error!("{err:#}");
        process::exit(1);
    }
}

async fn run(args: ServerArgs) -> anyhow::Result<()> {
    let server = Server::bind(&args.listen, args.transport()).await?;
    let addr = server.local_addr().context("reading bound address")?;
    info!("Server is running on {addr}");

    server
        .run_until(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                warn!(%err, "failed to listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
        })
        .await;

    Ok(())
}
