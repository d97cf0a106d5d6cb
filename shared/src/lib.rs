pub mod geometry;
pub mod movement;

pub use geometry::{Cell, Footprint, Size};
pub use movement::{diagonal_step, next_position, step, Direction};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

pub const PROTOCOL_VERSION: u32 = 1;

pub const BOARD_SIZE: i32 = 540;
pub const PLAYER_SIZE: Size = Size::new(25, 40);
pub const COLLECTIBLE_SIZE: Size = Size::new(14, 20);
pub const WIN_SCORE: u32 = 50;
pub const COLLECTIBLE_VALUE_MAX: u32 = 100;
pub const MAX_SPAWN_ATTEMPTS: u32 = 10_000;
pub const PLAYER_SPEED: i32 = 5;

/// Length of the server-assigned connection id, which doubles as the player id.
pub const CONNECTION_ID_LEN: usize = 20;
/// Longest display color, in bytes, a player may join with.
pub const MAX_COLOR_LEN: usize = 32;
/// Upper bound on connected clients; keeps a full snapshot inside one datagram.
pub const MAX_CLIENTS: usize = 64;
/// Receive buffer size on both ends of the connection.
pub const MAX_PACKET_SIZE: usize = 8192;

/// Tunable rules of a game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub board_size: i32,
    pub player_size: Size,
    pub collectible_size: Size,
    pub win_score: u32,
    /// Collectibles are worth a uniformly random value in `1..=collectible_value_max`.
    pub collectible_value_max: u32,
    /// Rejection-sampling budget for a single spawn.
    pub max_spawn_attempts: u32,
    pub player_speed: i32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_size: BOARD_SIZE,
            player_size: PLAYER_SIZE,
            collectible_size: COLLECTIBLE_SIZE,
            win_score: WIN_SCORE,
            collectible_value_max: COLLECTIBLE_VALUE_MAX,
            max_spawn_attempts: MAX_SPAWN_ATTEMPTS,
            player_speed: PLAYER_SPEED,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub enum Packet {
    Connect {
        client_version: u32,
    },
    Join {
        color: String,
    },
    Move {
        x: i32,
        y: i32,
    },
    Heartbeat,
    Disconnect,

    Connected {
        player_id: String,
        config: GameConfig,
    },
    JoinRejected {
        reason: String,
    },
    PlayersSnapshot {
        players: HashMap<String, PlayerView>,
    },
    CollectibleSnapshot {
        collectible: Option<CollectibleView>,
    },
    Captured {
        player_id: String,
        collectible: CollectibleView,
    },
    ClearBoard,
    RoundResetting {
        winner_id: String,
    },
    PeerLeft {
        player_id: String,
    },
    Disconnected {
        reason: String,
    },
}

/// What clients are told about a player.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PlayerView {
    pub x: i32,
    pub y: i32,
    pub score: u32,
    pub color: String,
}

/// What clients are told about the collectible.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CollectibleView {
    pub id: String,
    pub x: i32,
    pub y: i32,
    pub value: u32,
}

/// A player's standing among everyone on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rank {
    pub position: usize,
    pub total: usize,
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rank: {} / {}", self.position, self.total)
    }
}

/// Ranks `player_id` by score, highest first.
///
/// A player without points is ranked last. Players tied on score keep the
/// order of their ids so the result is stable between snapshots.
pub fn rank(players: &HashMap<String, PlayerView>, player_id: &str) -> Option<Rank> {
    let me = players.get(player_id)?;
    let total = players.len();

    if me.score == 0 {
        return Some(Rank {
            position: total,
            total,
        });
    }

    let mut ordered: Vec<(&String, &PlayerView)> = players.iter().collect();
    ordered.sort_by(|(a_id, a), (b_id, b)| b.score.cmp(&a.score).then_with(|| a_id.cmp(b_id)));

    let position = ordered.iter().position(|(id, _)| id.as_str() == player_id)? + 1;
    Some(Rank { position, total })
}
