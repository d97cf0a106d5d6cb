//! Connection tracking for the game server
//!
//! This module handles the server-side bookkeeping of connected clients:
//! - Connection lifecycle (connect, disconnect, timeout)
//! - Connection ids, which double as player ids
//! - Address lookup for routing incoming datagrams
//! - Capacity limits
//!
//! A connection exists from the handshake onwards, whether or not the client
//! has joined the current round. Broadcasts go to every connection.

use crate::utils::{generate_token, CONNECTION_ID_LEN};
use log::info;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

/// A connected client.
#[derive(Debug)]
pub struct Client {
    /// Connection id assigned by the server, also used as the player id
    pub id: String,
    /// Network address for sending responses
    pub addr: SocketAddr,
    /// Last time we received any packet from this client
    pub last_seen: Instant,
}

impl Client {
    pub fn new(id: String, addr: SocketAddr) -> Self {
        Self {
            id,
            addr,
            last_seen: Instant::now(),
        }
    }

    /// Records activity from this client.
    pub fn touch(&mut self) {
        self.last_seen = Instant::now();
    }

    /// Returns true if nothing has been received within `timeout`.
    pub fn is_timed_out(&self, timeout: Duration) -> bool {
        self.last_seen.elapsed() > timeout
    }
}

/// Manages all connected clients.
pub struct ClientManager {
    /// Connected clients indexed by connection id
    clients: HashMap<String, Client>,
    /// Maximum number of concurrent clients allowed
    max_clients: usize,
    /// Silence after which a client is considered gone
    timeout: Duration,
}

impl ClientManager {
    pub fn new(max_clients: usize, timeout: Duration) -> Self {
        Self {
            clients: HashMap::new(),
            max_clients,
            timeout,
        }
    }

    /// Attempts to add a new client connection
    ///
    /// Returns the new connection id, or None if the server is at capacity.
    pub fn add_client(&mut self, addr: SocketAddr) -> Option<String> {
        if self.clients.len() >= self.max_clients {
            return None;
        }

        let mut rng = rand::thread_rng();
        let mut client_id = generate_token(&mut rng, CONNECTION_ID_LEN);
        while self.clients.contains_key(&client_id) {
            client_id = generate_token(&mut rng, CONNECTION_ID_LEN);
        }

        info!("Client {} connected from {}", client_id, addr);
        self.clients
            .insert(client_id.clone(), Client::new(client_id.clone(), addr));

        Some(client_id)
    }

    /// Removes a client. Returns false if it was already gone.
    pub fn remove_client(&mut self, client_id: &str) -> bool {
        if let Some(client) = self.clients.remove(client_id) {
            info!("Client {} disconnected", client.id);
            true
        } else {
            false
        }
    }

    /// Finds a connection id by network address
    pub fn find_client_by_addr(&self, addr: SocketAddr) -> Option<String> {
        self.clients
            .values()
            .find(|client| client.addr == addr)
            .map(|client| client.id.clone())
    }

    /// Refreshes the activity timestamp of a client.
    pub fn touch(&mut self, client_id: &str) -> bool {
        if let Some(client) = self.clients.get_mut(client_id) {
            client.touch();
            true
        } else {
            false
        }
    }

    /// Removes and returns every client silent for longer than the timeout.
    pub fn check_timeouts(&mut self) -> Vec<String> {
        let timeout = self.timeout;
        let timed_out: Vec<String> = self
            .clients
            .values()
            .filter(|client| client.is_timed_out(timeout))
            .map(|client| client.id.clone())
            .collect();

        for client_id in &timed_out {
            self.remove_client(client_id);
        }

        timed_out
    }

    /// Gets all connection ids and their network addresses
    pub fn get_client_addrs(&self) -> Vec<(String, SocketAddr)> {
        self.clients
            .values()
            .map(|client| (client.id.clone(), client.addr))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}
