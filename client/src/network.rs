use crate::game::{random_color, ClientGameState};
use crate::input::Pilot;
use bincode::{deserialize, serialize};
use log::{debug, error, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use shared::{Packet, MAX_PACKET_SIZE, PROTOCOL_VERSION};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::{interval, Instant};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Bot behaviour settings.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Fixed display color; a random one is picked per round otherwise
    pub color: Option<String>,
    pub move_interval: Duration,
    pub heartbeat_interval: Duration,
    /// Wait after a round ends (or a join is refused) before joining again
    pub rejoin_delay: Duration,
    pub seed: Option<u64>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            color: None,
            move_interval: Duration::from_millis(50),
            heartbeat_interval: Duration::from_secs(1),
            rejoin_delay: Duration::from_secs(10),
            seed: None,
        }
    }
}

pub struct Client {
    socket: UdpSocket,
    server_addr: SocketAddr,
    running: bool,
    joined: bool,
    rejoin_at: Option<Instant>,

    game_state: ClientGameState,
    pilot: Pilot,
    rng: StdRng,
    color: String,
    options: ClientOptions,
}

impl Client {
    pub async fn new(server_addr: &str, options: ClientOptions) -> Result<Self, BoxError> {
        let socket = UdpSocket::bind("0.0.0.0:0").await?;
        let server_addr = server_addr.parse()?;

        let mut rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let color = options
            .color
            .clone()
            .unwrap_or_else(|| random_color(&mut rng));

        Ok(Client {
            socket,
            server_addr,
            running: true,
            joined: false,
            rejoin_at: None,
            game_state: ClientGameState::new(),
            pilot: Pilot::new(shared::PLAYER_SPEED),
            rng,
            color,
            options,
        })
    }

    pub fn game_state(&self) -> &ClientGameState {
        &self.game_state
    }

    async fn send_packet(&self, packet: &Packet) -> Result<(), BoxError> {
        let data = serialize(packet)?;
        self.socket.send_to(&data, self.server_addr).await?;
        Ok(())
    }

    async fn join(&mut self) -> Result<(), BoxError> {
        info!("Joining as {}", self.color);
        self.rejoin_at = None;
        self.joined = true;
        let packet = Packet::Join {
            color: self.color.clone(),
        };
        self.send_packet(&packet).await
    }

    fn schedule_rejoin(&mut self) {
        self.joined = false;
        self.rejoin_at = Some(Instant::now() + self.options.rejoin_delay);
    }

    async fn handle_packet(&mut self, packet: Packet) -> Result<(), BoxError> {
        match packet {
            Packet::Connected { player_id, config } => {
                info!("Connected! Player ID: {}", player_id);
                self.pilot = Pilot::new(config.player_speed);
                self.game_state.set_identity(player_id, config);
                self.join().await?;
            }

            Packet::JoinRejected { reason } => {
                warn!("Join rejected: {}", reason);
                self.schedule_rejoin();
            }

            Packet::PlayersSnapshot { players } => {
                self.game_state.apply_players(players);
                if let Some(rank) = self.game_state.rank() {
                    debug!("Score {} ({})", self.game_state.score(), rank);
                }
            }

            Packet::CollectibleSnapshot { collectible } => {
                self.game_state.apply_collectible(collectible);
            }

            Packet::Captured {
                player_id,
                collectible,
            } => {
                if self.game_state.is_current_collectible(&collectible.id) {
                    if self.game_state.is_me(&player_id) {
                        info!("Picked up a coin worth {}", collectible.value);
                    } else {
                        info!("{} picked up a coin worth {}", player_id, collectible.value);
                    }
                }
            }

            Packet::ClearBoard => {
                self.game_state.clear_board();
            }

            Packet::RoundResetting { winner_id } => {
                if self.game_state.is_me(&winner_id) {
                    info!("You win!");
                } else {
                    info!("{} wins the round", winner_id);
                }
                info!(
                    "Game will be restarting in {} seconds...",
                    self.options.rejoin_delay.as_secs()
                );

                self.game_state.clear_board();
                if self.options.color.is_none() {
                    self.color = random_color(&mut self.rng);
                }
                self.schedule_rejoin();
            }

            Packet::PeerLeft { player_id } => {
                debug!("{} left", player_id);
                self.game_state.remove_player(&player_id);
            }

            Packet::Disconnected { reason } => {
                warn!("Disconnected: {}", reason);
                self.running = false;
            }

            _ => {
                warn!("Unexpected packet type");
            }
        }

        Ok(())
    }

    async fn send_move(&mut self) -> Result<(), BoxError> {
        let Some(me) = self.game_state.me() else {
            return Ok(());
        };

        let (x, y) = self
            .pilot
            .next_move(me, self.game_state.collectible.as_ref(), &mut self.rng);

        self.send_packet(&Packet::Move { x, y }).await?;
        self.game_state.predict_move(x, y);
        Ok(())
    }

    pub async fn run(&mut self) -> Result<(), BoxError> {
        info!("Connecting to server at {}...", self.server_addr);
        self.send_packet(&Packet::Connect {
            client_version: PROTOCOL_VERSION,
        })
        .await?;

        let mut move_interval = interval(self.options.move_interval);
        let mut heartbeat_interval = interval(self.options.heartbeat_interval);
        let mut buffer = [0u8; MAX_PACKET_SIZE];

        while self.running {
            tokio::select! {
                result = self.socket.recv_from(&mut buffer) => {
                    match result {
                        Ok((len, _)) => {
                            if let Ok(packet) = deserialize::<Packet>(&buffer[0..len]) {
                                self.handle_packet(packet).await?;
                            } else {
                                warn!("Failed to deserialize packet from server");
                            }
                        },
                        Err(e) => error!("Error receiving packet: {}", e),
                    }
                },

                _ = move_interval.tick() => {
                    if self.rejoin_at.is_some_and(|at| Instant::now() >= at) {
                        self.join().await?;
                    } else if self.joined {
                        if let Err(e) = self.send_move().await {
                            error!("Error sending move: {}", e);
                        }
                    }
                },

                _ = heartbeat_interval.tick() => {
                    if let Err(e) = self.send_packet(&Packet::Heartbeat).await {
                        error!("Error sending heartbeat: {}", e);
                    }
                },

                _ = tokio::signal::ctrl_c() => {
                    info!("Leaving the game");
                    let _ = self.send_packet(&Packet::Disconnect).await;
                    self.running = false;
                },
            }
        }

        Ok(())
    }
}
