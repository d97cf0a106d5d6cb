use clap::Parser;
use client::network::{BoxError, Client, ClientOptions};
use log::info;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server address to connect to
    #[arg(short = 's', long, default_value = "127.0.0.1:3000")]
    server: String,

    /// Display color, e.g. "rgb(200,40,40)"; random per round if omitted
    #[arg(short = 'c', long)]
    color: Option<String>,

    /// Milliseconds between moves
    #[arg(short = 'm', long, default_value = "50")]
    move_interval_ms: u64,

    /// Seconds to wait after a round ends before joining again
    #[arg(short = 'r', long, default_value = "10")]
    rejoin_delay_secs: u64,

    /// Seed for reproducible bot behaviour
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();

    info!("Starting client...");
    info!("Connecting to: {}", args.server);

    let options = ClientOptions {
        color: args.color,
        move_interval: Duration::from_millis(args.move_interval_ms.max(1)),
        rejoin_delay: Duration::from_secs(args.rejoin_delay_secs),
        seed: args.seed,
        ..ClientOptions::default()
    };

    let mut client = Client::new(&args.server, options).await?;
    client.run().await?;

    Ok(())
}
