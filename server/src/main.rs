use clap::Parser;
use log::info;
use server::game::GameSession;
use server::network::{BoxError, Server, ServerOptions};
use shared::{GameConfig, Size};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server IP address to bind to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Server port to listen on
    #[arg(short, long, default_value = "3000")]
    port: u16,

    /// Maximum number of connected clients
    #[arg(
        long,
        default_value = "32",
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..=shared::MAX_CLIENTS as u64)
    )]
    max_clients: usize,

    /// Seconds of silence before a client is dropped
    #[arg(long, default_value = "5")]
    client_timeout_secs: u64,

    /// Side length of the square board
    #[arg(long, default_value_t = shared::BOARD_SIZE, value_parser = clap::value_parser!(i32).range(1..))]
    board_size: i32,

    /// Player hitbox width
    #[arg(long, default_value_t = shared::PLAYER_SIZE.width, value_parser = clap::value_parser!(i32).range(1..))]
    player_width: i32,

    /// Player hitbox height
    #[arg(long, default_value_t = shared::PLAYER_SIZE.height, value_parser = clap::value_parser!(i32).range(1..))]
    player_height: i32,

    /// Collectible hitbox width
    #[arg(long, default_value_t = shared::COLLECTIBLE_SIZE.width, value_parser = clap::value_parser!(i32).range(1..))]
    collectible_width: i32,

    /// Collectible hitbox height
    #[arg(long, default_value_t = shared::COLLECTIBLE_SIZE.height, value_parser = clap::value_parser!(i32).range(1..))]
    collectible_height: i32,

    /// Score that wins a round
    #[arg(long, default_value_t = shared::WIN_SCORE)]
    win_score: u32,

    /// Highest value a collectible can be worth
    #[arg(long, default_value_t = shared::COLLECTIBLE_VALUE_MAX)]
    collectible_value_max: u32,

    /// Random placements tried before a spawn gives up
    #[arg(long, default_value_t = shared::MAX_SPAWN_ATTEMPTS)]
    max_spawn_attempts: u32,

    /// Movement speed advertised to clients
    #[arg(long, default_value_t = shared::PLAYER_SPEED)]
    player_speed: i32,

    /// Seed for reproducible spawns
    #[arg(long)]
    seed: Option<u64>,
}

impl Args {
    fn game_config(&self) -> GameConfig {
        GameConfig {
            board_size: self.board_size,
            player_size: Size::new(self.player_width, self.player_height),
            collectible_size: Size::new(self.collectible_width, self.collectible_height),
            win_score: self.win_score,
            collectible_value_max: self.collectible_value_max,
            max_spawn_attempts: self.max_spawn_attempts,
            player_speed: self.player_speed,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();
    let config = args.game_config();

    let session = match args.seed {
        Some(seed) => GameSession::with_seed(config, seed),
        None => GameSession::new(config),
    };

    let options = ServerOptions {
        max_clients: args.max_clients,
        client_timeout: Duration::from_secs(args.client_timeout_secs),
        ..ServerOptions::default()
    };

    info!(
        "Board {}x{}, win score {}",
        config.board_size, config.board_size, config.win_score
    );

    let address = format!("{}:{}", args.host, args.port);
    let mut server = Server::new(&address, session, options).await?;

    tokio::select! {
        result = server.run() => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    Ok(())
}
