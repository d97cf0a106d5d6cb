//! # Arena Bot Client Library
//!
//! A headless client for the arena game server. It speaks the same wire
//! protocol a graphical client would, mirrors the snapshots the server
//! broadcasts, and plays by steering its avatar toward the coin.
//!
//! ## Module Organization
//!
//! ### Game Module (`game`)
//! The client's copy of the board: every player's position and score, the
//! current collectible, and this client's rank.
//!
//! ### Input Module (`input`)
//! Chooses a direction each frame and turns it into a proposed position with
//! the shared movement rules, exactly like key presses would.
//!
//! ### Network Module (`network`)
//! UDP connection handling: handshake, join, moves, heartbeats, and rejoining
//! after a round has been won.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use client::network::{Client, ClientOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let mut client = Client::new("127.0.0.1:3000", ClientOptions::default()).await?;
//!     client.run().await?;
//!     Ok(())
//! }
//! ```

pub mod game;
pub mod input;
pub mod network;
