//! Server network layer: UDP transport and the single event loop owning the session

use crate::client_manager::ClientManager;
use crate::game::{GameEvent, GameSession};
use bincode::{deserialize, serialize};
use log::{debug, error, info, warn};
use shared::{GameConfig, Packet, MAX_CLIENTS, MAX_PACKET_SIZE, PROTOCOL_VERSION};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::sync::{mpsc, RwLock};
use tokio::time::interval;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Messages sent from network tasks to main server loop
#[derive(Debug)]
pub enum ServerMessage {
    PacketReceived { packet: Packet, addr: SocketAddr },
    ClientTimeout { client_id: String },
    #[allow(dead_code)]
    Shutdown,
}

/// Messages sent from the main loop to the sender task
#[derive(Debug)]
pub enum GameMessage {
    SendPacket { packet: Packet, addr: SocketAddr },
    BroadcastPacket { packet: Packet },
}

impl From<GameEvent> for Packet {
    fn from(event: GameEvent) -> Self {
        match event {
            GameEvent::PlayersSnapshot(players) => Packet::PlayersSnapshot { players },
            GameEvent::CollectibleSnapshot(collectible) => Packet::CollectibleSnapshot { collectible },
            GameEvent::Captured {
                player_id,
                collectible,
            } => Packet::Captured {
                player_id,
                collectible,
            },
            GameEvent::ClearBoard => Packet::ClearBoard,
            GameEvent::RoundResetting { winner_id } => Packet::RoundResetting { winner_id },
            GameEvent::PeerLeft { player_id } => Packet::PeerLeft { player_id },
        }
    }
}

/// Server runtime options that are not game rules.
#[derive(Debug, Clone)]
pub struct ServerOptions {
    pub max_clients: usize,
    pub client_timeout: Duration,
    pub stats_interval: Duration,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            max_clients: 32,
            client_timeout: Duration::from_secs(5),
            stats_interval: Duration::from_secs(30),
        }
    }
}

/// Game server: owns the session and serialises every mutation through one loop
pub struct Server {
    socket: Arc<UdpSocket>,
    clients: Arc<RwLock<ClientManager>>,
    session: GameSession,
    options: ServerOptions,

    // Communication channels
    server_tx: mpsc::UnboundedSender<ServerMessage>,
    server_rx: mpsc::UnboundedReceiver<ServerMessage>,
    game_tx: mpsc::UnboundedSender<GameMessage>,
    game_rx: mpsc::UnboundedReceiver<GameMessage>,
}

impl Server {
    pub async fn new(
        addr: &str,
        session: GameSession,
        mut options: ServerOptions,
    ) -> Result<Self, BoxError> {
        if options.max_clients > MAX_CLIENTS {
            warn!(
                "Limiting max clients to {} (requested {})",
                MAX_CLIENTS, options.max_clients
            );
            options.max_clients = MAX_CLIENTS;
        }

        let socket = Arc::new(UdpSocket::bind(addr).await?);
        info!("Server listening on {}", socket.local_addr()?);

        let (server_tx, server_rx) = mpsc::unbounded_channel();
        let (game_tx, game_rx) = mpsc::unbounded_channel();

        Ok(Server {
            socket,
            clients: Arc::new(RwLock::new(ClientManager::new(
                options.max_clients,
                options.client_timeout,
            ))),
            session,
            options,
            server_tx,
            server_rx,
            game_tx,
            game_rx,
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    pub fn config(&self) -> &GameConfig {
        self.session.config()
    }

    /// Spawns task that continuously listens for incoming packets
    fn spawn_network_receiver(&self) {
        let socket = Arc::clone(&self.socket);
        let server_tx = self.server_tx.clone();

        tokio::spawn(async move {
            let mut buffer = [0u8; MAX_PACKET_SIZE];

            loop {
                match socket.recv_from(&mut buffer).await {
                    Ok((len, addr)) => {
                        if let Ok(packet) = deserialize::<Packet>(&buffer[0..len]) {
                            if let Err(e) =
                                server_tx.send(ServerMessage::PacketReceived { packet, addr })
                            {
                                error!("Failed to send packet to main loop: {}", e);
                                break;
                            }
                        } else {
                            warn!("Failed to deserialize packet from {}", addr);
                        }
                    }
                    Err(e) => {
                        error!("Error receiving packet: {}", e);
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    }
                }
            }
        });
    }

    /// Spawns task that drains the outgoing queue in order
    fn spawn_network_sender(&mut self) {
        let socket = Arc::clone(&self.socket);
        let clients = Arc::clone(&self.clients);
        let mut game_rx = std::mem::replace(&mut self.game_rx, mpsc::unbounded_channel().1);

        tokio::spawn(async move {
            while let Some(message) = game_rx.recv().await {
                match message {
                    GameMessage::SendPacket { packet, addr } => {
                        if let Err(e) = Self::send_packet_impl(&socket, &packet, addr).await {
                            error!("Failed to send packet to {}: {}", addr, e);
                        }
                    }
                    GameMessage::BroadcastPacket { packet } => {
                        let client_addrs = {
                            let clients_guard = clients.read().await;
                            clients_guard.get_client_addrs()
                        };

                        let data = match serialize(&packet) {
                            Ok(data) => data,
                            Err(e) => {
                                error!("Failed to encode broadcast: {}", e);
                                continue;
                            }
                        };

                        for (client_id, addr) in client_addrs {
                            if let Err(e) = socket.send_to(&data, addr).await {
                                error!("Failed to send to client {}: {}", client_id, e);
                            }
                        }
                    }
                }
            }
        });
    }

    /// Spawns task that monitors client timeouts
    fn spawn_timeout_checker(&self) {
        let clients = Arc::clone(&self.clients);
        let server_tx = self.server_tx.clone();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));

            loop {
                interval.tick().await;

                let timed_out = {
                    let mut clients_guard = clients.write().await;
                    clients_guard.check_timeouts()
                };

                for client_id in timed_out {
                    if let Err(e) = server_tx.send(ServerMessage::ClientTimeout { client_id }) {
                        error!("Failed to send timeout message: {}", e);
                        return;
                    }
                }
            }
        });
    }

    async fn send_packet_impl(
        socket: &UdpSocket,
        packet: &Packet,
        addr: SocketAddr,
    ) -> Result<(), BoxError> {
        let data = serialize(packet)?;
        socket.send_to(&data, addr).await?;
        Ok(())
    }

    fn send_packet(&self, packet: Packet, addr: SocketAddr) {
        if let Err(e) = self.game_tx.send(GameMessage::SendPacket { packet, addr }) {
            error!("Failed to queue packet for sending: {}", e);
        }
    }

    /// Queues session events for every connected client, preserving their order
    fn broadcast_events(&self, events: Vec<GameEvent>) {
        for event in events {
            if let Err(e) = self.game_tx.send(GameMessage::BroadcastPacket {
                packet: event.into(),
            }) {
                error!("Failed to queue broadcast packet: {}", e);
            }
        }
    }

    async fn client_for(&self, addr: SocketAddr) -> Option<String> {
        let mut clients = self.clients.write().await;
        let client_id = clients.find_client_by_addr(addr)?;
        clients.touch(&client_id);
        Some(client_id)
    }

    /// Maps an incoming packet onto a session operation
    async fn handle_packet(&mut self, packet: Packet, addr: SocketAddr) {
        match packet {
            Packet::Connect { client_version } => {
                info!(
                    "Client connecting from {} (version: {})",
                    addr, client_version
                );

                if client_version != PROTOCOL_VERSION {
                    let reason = format!(
                        "Protocol version mismatch: server {}, client {}",
                        PROTOCOL_VERSION, client_version
                    );
                    self.send_packet(Packet::Disconnected { reason }, addr);
                    return;
                }

                // Remove existing connection if present
                let existing_client_id = {
                    let clients = self.clients.read().await;
                    clients.find_client_by_addr(addr)
                };

                if let Some(existing_id) = existing_client_id {
                    info!("Replacing existing client {} from {}", existing_id, addr);
                    self.clients.write().await.remove_client(&existing_id);
                    let events = self.session.leave(&existing_id);
                    self.broadcast_events(events);
                }

                let client_id = self.clients.write().await.add_client(addr);

                let response = match client_id {
                    Some(player_id) => Packet::Connected {
                        player_id,
                        config: *self.session.config(),
                    },
                    None => Packet::Disconnected {
                        reason: "Server full".to_string(),
                    },
                };
                self.send_packet(response, addr);
            }

            Packet::Join { color } => {
                let Some(client_id) = self.client_for(addr).await else {
                    warn!("Join from unconnected address {}", addr);
                    return;
                };

                match self.session.join(&client_id, &color) {
                    Ok(events) => self.broadcast_events(events),
                    Err(e) => {
                        warn!("Join of {} failed: {}", client_id, e);
                        self.send_packet(
                            Packet::JoinRejected {
                                reason: e.to_string(),
                            },
                            addr,
                        );
                    }
                }
            }

            Packet::Move { x, y } => {
                let Some(client_id) = self.client_for(addr).await else {
                    debug!("Move from unconnected address {}", addr);
                    return;
                };

                let result = self.session.apply_move(&client_id, x, y);
                self.broadcast_events(result.events);
            }

            Packet::Heartbeat => {
                if self.client_for(addr).await.is_none() {
                    debug!("Heartbeat from unconnected address {}", addr);
                }
            }

            Packet::Disconnect => {
                let client_id = {
                    let clients = self.clients.read().await;
                    clients.find_client_by_addr(addr)
                };

                if let Some(client_id) = client_id {
                    self.clients.write().await.remove_client(&client_id);
                    let events = self.session.leave(&client_id);
                    self.broadcast_events(events);
                }
            }

            _ => {
                warn!("Unexpected packet type from client at {}", addr);
            }
        }
    }

    async fn log_stats(&self) {
        let client_count = self.clients.read().await.len();
        if client_count > 0 {
            debug!(
                "{} clients, {} players, round {:?}",
                client_count,
                self.session.registry().len(),
                self.session.state()
            );
        }
    }

    /// Main server loop: every session mutation happens here, one at a time
    pub async fn run(&mut self) -> Result<(), BoxError> {
        self.spawn_network_receiver();
        self.spawn_network_sender();
        self.spawn_timeout_checker();

        let mut stats_interval = interval(self.options.stats_interval);

        info!("Server started successfully");

        loop {
            tokio::select! {
                message = self.server_rx.recv() => {
                    match message {
                        Some(ServerMessage::PacketReceived { packet, addr }) => {
                            self.handle_packet(packet, addr).await;
                        },
                        Some(ServerMessage::ClientTimeout { client_id }) => {
                            info!("Client {} timed out", client_id);
                            let events = self.session.leave(&client_id);
                            self.broadcast_events(events);
                        },
                        Some(ServerMessage::Shutdown) | None => {
                            info!("Server shutting down");
                            break;
                        }
                    }
                },

                _ = stats_interval.tick() => {
                    self.log_stats().await;
                },
            }
        }

        Ok(())
    }
}
