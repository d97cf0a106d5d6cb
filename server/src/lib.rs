//! # Arena Game Server Library
//!
//! Authoritative server for a small real-time arena game. Players move an
//! avatar around a square board and race to pick up a single roaming coin;
//! the first player to reach the win score ends the round and everybody
//! starts over.
//!
//! ## Core Responsibilities
//!
//! ### Authoritative State
//! Clients only propose positions. The server checks every proposal against
//! the board border and the other players, awards points for coin pickups and
//! decides when a round is won. Clients render whatever the server broadcasts.
//!
//! ### Round Lifecycle
//! A round starts with the first join after a reset. Later joins add players
//! without disturbing anyone. When a player reaches the win score the server
//! broadcasts a final snapshot, clears the board and announces the winner; the
//! next join starts a new round.
//!
//! ## Architecture Design
//!
//! ### Single Mutator
//! One event loop owns the [`game::GameSession`]. Network receive, send and
//! timeout tasks talk to it only through channels, so no two mutations ever
//! interleave and broadcasts leave in the order their mutations happened.
//!
//! ### Outline Collisions
//! Every hitbox is represented by the cells on its outline only. Two entities
//! collide when their outlines share a cell; interiors never take part.
//!
//! ## Module Organization
//!
//! - `board`: board geometry and its border outline
//! - `entity`: players and the collectible
//! - `registry`: live entities and rejection-sampled spawning
//! - `collision`: classification of a proposed player position
//! - `game`: the session state machine
//! - `client_manager`: connection tracking and timeouts
//! - `network`: UDP transport and the main loop
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use server::game::GameSession;
//! use server::network::{Server, ServerOptions};
//! use shared::GameConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let session = GameSession::new(GameConfig::default());
//!     let mut server = Server::new("127.0.0.1:3000", session, ServerOptions::default()).await?;
//!     server.run().await?;
//!     Ok(())
//! }
//! ```

pub mod board;
pub mod client_manager;
pub mod collision;
pub mod entity;
pub mod game;
pub mod network;
pub mod registry;
pub mod utils;
