use anyhow::Context;
use clap::Parser;
use dotenvy::dotenv;
use tracing_subscriber::EnvFilter;

use howdy_op::config::Config;
use howdy_op::{demo, Client};

const LOG_VAR: &str = "HOWDY_OP_LOG";

#[derive(Parser, Debug)]
#[command(author, version, about)]
/// Asks how you are and reports the answer through the ops SDK.
struct Cli {}

fn main() -> anyhow::Result<()> {
    dotenv().ok();
    Cli::parse();

    let filter = EnvFilter::try_from_env(LOG_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load_or_default()?;
    let mut client = Client::from_config(&config).context(
        "There was an issue during SDK client initialization. Check SDK_SPEAK_PORT or the configured backend.",
    )?;

    demo::run(&mut client)?;
    Ok(())
}
