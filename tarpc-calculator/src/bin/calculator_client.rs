use std::process;

use anyhow::Context;
use clap::Parser;
use tarpc_calculator::{
    Client,
    config::{ClientArgs, init_tracing},
};
use tracing::error;

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    init_tracing();
    let args = ClientArgs::parse();

    if let Err(err) = run(args).await {
        error!("{err:#}");
        process::exit(1);
    }
}

async fn run(args: ClientArgs) -> anyhow::Result<()> {
    let client = Client::connect(&args.server, args.client_config())
        .await
        .context("did not connect")?;
    let input = args.input();

    let output = client
        .calculate(input)
        .await
        .context("could not calculate")?;
    println!("calculate result: {}", output.result);

    let output = client
        .multiply(input)
        .await
        .context("could not multiply")?;
    println!("multiply result: {}", output.result);

    Ok(())
}
