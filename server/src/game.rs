//! Authoritative game session: joins, moves, scoring and the round lifecycle
//!
//! `GameSession` is the only mutator of the board state. Every operation runs
//! to completion and returns the events that must be broadcast afterwards, in
//! order. A round starts with the first join after a reset and ends when a
//! player reaches the win score; the next join starts a fresh round.

use crate::board::Board;
use crate::collision::{classify, Collision};
use crate::entity::{Player, PlayerId};
use crate::registry::{EntityRegistry, SpawnError};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use shared::{CollectibleView, GameConfig, PlayerView, MAX_COLOR_LEN};
use std::collections::HashMap;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GameError {
    #[error(transparent)]
    Spawn(#[from] SpawnError),
    #[error("color is {len} bytes long, at most {max} allowed")]
    ColorTooLong { len: usize, max: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundState {
    Idle,
    Active,
}

/// Something every connected client must be told about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    PlayersSnapshot(HashMap<PlayerId, PlayerView>),
    CollectibleSnapshot(Option<CollectibleView>),
    Captured {
        player_id: PlayerId,
        collectible: CollectibleView,
    },
    ClearBoard,
    RoundResetting {
        winner_id: PlayerId,
    },
    PeerLeft {
        player_id: PlayerId,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Blocked by the border or another player; the position is unchanged.
    Rejected(Collision),
    Accepted {
        captured: bool,
    },
    /// Accepted, and the mover reached the win score. The round is over.
    Won {
        score: u32,
    },
    UnknownPlayer,
}

#[derive(Debug, Clone)]
pub struct MoveResult {
    pub outcome: MoveOutcome,
    pub events: Vec<GameEvent>,
}

pub struct GameSession {
    config: GameConfig,
    board: Board,
    registry: EntityRegistry,
    state: RoundState,
    rng: StdRng,
}

impl GameSession {
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Session with reproducible spawn positions and collectible values.
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, rng: StdRng) -> Self {
        Self {
            board: Board::new(config.board_size),
            registry: EntityRegistry::new(&config),
            state: RoundState::Idle,
            config,
            rng,
        }
    }

    /// Adds a player to the current round, starting a new round if none is running.
    ///
    /// Joining with an id that is already on the board keeps that player as it
    /// is. If no room can be found for the player or the collectible, the join
    /// is undone and a capacity error is returned. Colors longer than
    /// `MAX_COLOR_LEN` bytes are refused before anything changes.
    pub fn join(&mut self, id: &str, color: &str) -> Result<Vec<GameEvent>, GameError> {
        if color.len() > MAX_COLOR_LEN {
            return Err(GameError::ColorTooLong {
                len: color.len(),
                max: MAX_COLOR_LEN,
            });
        }

        if self.state == RoundState::Idle {
            self.registry.reset();
            self.state = RoundState::Active;
            info!("Starting new round");
        }

        let newly_spawned = if self.registry.contains(id) {
            debug!("Player {} rejoined, keeping current state", id);
            false
        } else {
            self.registry
                .spawn_player(&self.board, &mut self.rng, id, color)?;
            true
        };

        if self.registry.collectible().is_none() {
            if let Err(e) = self.registry.spawn_collectible(&self.board, &mut self.rng) {
                if newly_spawned {
                    self.registry.remove_player(id);
                }
                return Err(e.into());
            }
        }

        info!("Player {} joined ({} on board)", id, self.registry.len());
        Ok(vec![self.players_event(), self.collectible_event()])
    }

    /// Validates and applies a proposed top-left position for player `id`.
    pub fn apply_move(&mut self, id: &str, x: i32, y: i32) -> MoveResult {
        if !self.registry.contains(id) {
            debug!("Ignoring move from unknown player {}", id);
            return MoveResult {
                outcome: MoveOutcome::UnknownPlayer,
                events: Vec::new(),
            };
        }

        let collision = classify(&self.board, &self.registry, id, x, y);
        let mut events = Vec::new();

        if collision.is_obstructed() {
            debug!("Rejected move of {} to ({}, {}): {:?}", id, x, y, collision);
            events.extend(self.snapshot_events());
            return MoveResult {
                outcome: MoveOutcome::Rejected(collision),
                events,
            };
        }

        let captured = if collision.on_collectible {
            self.registry.take_collectible()
        } else {
            None
        };

        let score = match self.registry.player_mut(id) {
            Some(player) => {
                player.set_position(x, y);
                if let Some(collectible) = &captured {
                    player.score = player.score.saturating_add(collectible.value);
                }
                player.score
            }
            None => {
                return MoveResult {
                    outcome: MoveOutcome::UnknownPlayer,
                    events,
                }
            }
        };

        if let Some(collectible) = &captured {
            info!(
                "Player {} captured {} worth {} (score {})",
                id, collectible.id, collectible.value, score
            );
            events.push(GameEvent::Captured {
                player_id: id.to_string(),
                collectible: collectible.view(),
            });
        }

        if self.registry.collectible().is_none() {
            if let Err(e) = self.registry.spawn_collectible(&self.board, &mut self.rng) {
                warn!("Could not respawn collectible: {}", e);
            }
        }

        if score >= self.config.win_score {
            events.extend(self.finish_round(id));
            return MoveResult {
                outcome: MoveOutcome::Won { score },
                events,
            };
        }

        events.extend(self.snapshot_events());
        MoveResult {
            outcome: MoveOutcome::Accepted {
                captured: captured.is_some(),
            },
            events,
        }
    }

    /// Removes a player. Leaving twice is the same as leaving once.
    pub fn leave(&mut self, id: &str) -> Vec<GameEvent> {
        if self.registry.remove_player(id).is_none() {
            debug!("Player {} already gone", id);
            return Vec::new();
        }

        info!("Player {} left ({} on board)", id, self.registry.len());
        let mut events = vec![GameEvent::PeerLeft {
            player_id: id.to_string(),
        }];
        events.extend(self.snapshot_events());
        events
    }

    /// Ends the current round without a winner.
    pub fn reset(&mut self) -> Vec<GameEvent> {
        self.registry.reset();
        self.state = RoundState::Idle;
        info!("Session reset");
        self.snapshot_events()
    }

    fn finish_round(&mut self, winner_id: &str) -> Vec<GameEvent> {
        info!("Player {} wins the round", winner_id);

        let mut events = self.snapshot_events();
        self.registry.reset();
        self.state = RoundState::Idle;
        events.push(GameEvent::RoundResetting {
            winner_id: winner_id.to_string(),
        });
        events
    }

    fn snapshot_events(&self) -> Vec<GameEvent> {
        vec![
            GameEvent::ClearBoard,
            self.players_event(),
            self.collectible_event(),
        ]
    }

    fn players_event(&self) -> GameEvent {
        GameEvent::PlayersSnapshot(self.players_snapshot())
    }

    fn collectible_event(&self) -> GameEvent {
        GameEvent::CollectibleSnapshot(self.collectible_view())
    }

    pub fn players_snapshot(&self) -> HashMap<PlayerId, PlayerView> {
        self.registry
            .players()
            .map(|p| (p.id.clone(), p.view()))
            .collect()
    }

    pub fn collectible_view(&self) -> Option<CollectibleView> {
        self.registry.collectible().map(|c| c.view())
    }

    pub fn player(&self, id: &str) -> Option<&Player> {
        self.registry.player(id)
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == RoundState::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Collectible;

    fn session() -> GameSession {
        GameSession::with_seed(GameConfig::default(), 42)
    }

    /// Active session with hand-placed players and collectible
    fn arranged(players: &[(&str, i32, i32)], coin: Option<(i32, i32, u32)>) -> GameSession {
        let mut session = session();
        session.state = RoundState::Active;
        for (id, x, y) in players {
            session.registry.insert_player(Player::new(
                id.to_string(),
                "red".to_string(),
                *x,
                *y,
                session.config.player_size,
            ));
        }
        if let Some((x, y, value)) = coin {
            session.registry.place_collectible(Collectible::new(
                "coin-1".to_string(),
                x,
                y,
                value,
                session.config.collectible_size,
            ));
        }
        session
    }

    fn captured_events(events: &[GameEvent]) -> Vec<&GameEvent> {
        events
            .iter()
            .filter(|e| matches!(e, GameEvent::Captured { .. }))
            .collect()
    }

    #[test]
    fn test_first_join_starts_round() {
        let mut session = session();
        assert_eq!(session.state(), RoundState::Idle);

        let events = session.join("p1", "rgb(1,2,3)").unwrap();

        assert!(session.is_active());
        assert_eq!(events.len(), 2);
        match &events[0] {
            GameEvent::PlayersSnapshot(players) => {
                assert_eq!(players.len(), 1);
                assert_eq!(players["p1"].score, 0);
                assert_eq!(players["p1"].color, "rgb(1,2,3)");
            }
            other => panic!("Unexpected event {:?}", other),
        }
        match &events[1] {
            GameEvent::CollectibleSnapshot(Some(coin)) => {
                assert!((1..=100).contains(&coin.value));
            }
            other => panic!("Unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_join_while_active_keeps_others() {
        let mut session = arranged(&[("a", 100, 100)], Some((400, 400, 10)));
        session.registry.player_mut("a").unwrap().score = 30;

        session.join("b", "blue").unwrap();

        assert_eq!(session.registry().len(), 2);
        assert_eq!(session.player("a").unwrap().score, 30);
        assert_eq!(session.collectible_view().unwrap().id, "coin-1");
    }

    #[test]
    fn test_rejoin_does_not_duplicate() {
        let mut session = session();
        session.join("p1", "red").unwrap();
        let before = session.player("p1").unwrap().clone();

        session.join("p1", "green").unwrap();

        assert_eq!(session.registry().len(), 1);
        let after = session.player("p1").unwrap();
        assert_eq!((after.x, after.y), (before.x, before.y));
        assert_eq!(after.color, "red");
    }

    #[test]
    fn test_accepted_move() {
        let mut session = arranged(&[("a", 100, 100)], Some((400, 400, 10)));

        let result = session.apply_move("a", 102, 100);

        assert_eq!(result.outcome, MoveOutcome::Accepted { captured: false });
        let player = session.player("a").unwrap();
        assert_eq!((player.x, player.y), (102, 100));
        assert_eq!(player.score, 0);
        assert!(player.footprint().contains(&(102, 100)));
        assert!(captured_events(&result.events).is_empty());
        assert_eq!(result.events[0], GameEvent::ClearBoard);
    }

    #[test]
    fn test_capture_scores_and_respawns() {
        let mut session = arranged(&[("a", 100, 100)], Some((102, 100, 42)));

        let result = session.apply_move("a", 102, 100);

        assert_eq!(result.outcome, MoveOutcome::Accepted { captured: true });
        assert_eq!(session.player("a").unwrap().score, 42);

        let captured = captured_events(&result.events);
        assert_eq!(captured.len(), 1);
        match captured[0] {
            GameEvent::Captured {
                player_id,
                collectible,
            } => {
                assert_eq!(player_id, "a");
                assert_eq!(collectible.id, "coin-1");
                assert_eq!(collectible.value, 42);
            }
            _ => unreachable!(),
        }
        // Capture is announced before the regular snapshot
        assert!(matches!(result.events[0], GameEvent::Captured { .. }));

        let fresh = session.registry().collectible().unwrap();
        assert_ne!(fresh.id, "coin-1");
        let player = session.player("a").unwrap();
        assert!(!fresh.footprint().intersects(player.footprint()));
        assert!(!session.board().touches_border(fresh.footprint()));
    }

    #[test]
    fn test_border_move_rejected() {
        let mut session = arranged(&[("a", 0, 0)], Some((400, 400, 10)));

        let result = session.apply_move("a", -1, 0);

        assert!(matches!(result.outcome, MoveOutcome::Rejected(c) if c.on_board_border));
        let player = session.player("a").unwrap();
        assert_eq!((player.x, player.y), (0, 0));
    }

    #[test]
    fn test_move_onto_other_player_rejected() {
        let mut session = arranged(&[("a", 100, 100), ("b", 127, 100)], Some((400, 400, 10)));

        let result = session.apply_move("a", 102, 100);

        assert!(matches!(result.outcome, MoveOutcome::Rejected(c) if c.on_other_player));
        let a = session.player("a").unwrap();
        let b = session.player("b").unwrap();
        assert_eq!((a.x, a.y), (100, 100));
        assert_eq!((b.x, b.y), (127, 100));
    }

    #[test]
    fn test_long_color_rejected() {
        let mut session = session();
        let color = "x".repeat(MAX_COLOR_LEN + 1);

        let err = session.join("a", &color).unwrap_err();

        assert_eq!(
            err,
            GameError::ColorTooLong {
                len: MAX_COLOR_LEN + 1,
                max: MAX_COLOR_LEN
            }
        );
        assert_eq!(session.state(), RoundState::Idle);
        assert!(session.registry().is_empty());

        let events = session.join("a", &"x".repeat(MAX_COLOR_LEN)).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(session.player("a").unwrap().color.len(), MAX_COLOR_LEN);
    }

    #[test]
    fn test_overflowing_move_rejected() {
        let mut session = session();
        session.join("a", "red").unwrap();
        let before = session.player("a").map(|p| (p.x, p.y));

        for (x, y) in [(i32::MAX - 5, 100), (100, i32::MAX), (i32::MAX, i32::MAX)] {
            let result = session.apply_move("a", x, y);
            assert!(matches!(result.outcome, MoveOutcome::Rejected(c) if c.on_board_border));
            assert_eq!(session.player("a").map(|p| (p.x, p.y)), before);
        }
        assert!(!session.player("a").unwrap().footprint().is_empty());
    }

    #[test]
    fn test_obstruction_beats_pickup() {
        let mut session = arranged(&[("a", 5, 5)], Some((20, 30, 30)));

        let result = session.apply_move("a", 5, 0);

        assert!(matches!(result.outcome, MoveOutcome::Rejected(c) if c.on_collectible));
        assert_eq!(session.player("a").unwrap().score, 0);
        assert_eq!(session.collectible_view().unwrap().id, "coin-1");
    }

    #[test]
    fn test_unknown_player_move_is_noop() {
        let mut session = arranged(&[("a", 100, 100)], None);

        let result = session.apply_move("ghost", 200, 200);

        assert_eq!(result.outcome, MoveOutcome::UnknownPlayer);
        assert!(result.events.is_empty());
        assert_eq!(session.registry().len(), 1);
    }

    #[test]
    fn test_win_resets_round() {
        let mut session = arranged(&[("a", 100, 100), ("b", 300, 300)], Some((102, 100, 10)));
        session.registry.player_mut("a").unwrap().score = 45;

        let result = session.apply_move("a", 102, 100);

        assert_eq!(result.outcome, MoveOutcome::Won { score: 55 });
        assert!(!session.is_active());
        assert!(session.registry().is_empty());
        assert!(session.registry().collectible().is_none());

        let tail = &result.events[result.events.len() - 4..];
        assert_eq!(tail[0], GameEvent::ClearBoard);
        match &tail[1] {
            GameEvent::PlayersSnapshot(players) => assert_eq!(players["a"].score, 55),
            other => panic!("Unexpected event {:?}", other),
        }
        assert!(matches!(tail[2], GameEvent::CollectibleSnapshot(_)));
        assert_eq!(
            tail[3],
            GameEvent::RoundResetting {
                winner_id: "a".to_string()
            }
        );

        // Moves after the reset are ignored until players join again
        assert_eq!(
            session.apply_move("b", 301, 300).outcome,
            MoveOutcome::UnknownPlayer
        );

        session.join("b", "blue").unwrap();
        session.join("a", "red").unwrap();
        assert!(session.is_active());
        assert!(session.registry().players().all(|p| p.score == 0));
        assert!(session.registry().collectible().is_some());
    }

    #[test]
    fn test_leave_is_idempotent() {
        let mut session = arranged(&[("a", 100, 100), ("b", 300, 300)], Some((400, 400, 10)));

        let events = session.leave("a");
        assert_eq!(
            events[0],
            GameEvent::PeerLeft {
                player_id: "a".to_string()
            }
        );
        assert_eq!(session.registry().len(), 1);

        assert!(session.leave("a").is_empty());
        assert_eq!(session.registry().len(), 1);
        assert!(session.is_active());
    }

    #[test]
    fn test_join_capacity_error() {
        let config = GameConfig {
            board_size: 20,
            max_spawn_attempts: 25,
            ..GameConfig::default()
        };
        let mut session = GameSession::with_seed(config, 3);

        let err = session.join("p1", "red").unwrap_err();
        assert!(matches!(err, GameError::Spawn(SpawnError::Capacity { .. })));
        assert!(err.to_string().contains("no free space"));
        assert!(session.registry().is_empty());
    }

    #[test]
    fn test_explicit_reset() {
        let mut session = session();
        session.join("p1", "red").unwrap();

        let events = session.reset();

        assert_eq!(session.state(), RoundState::Idle);
        assert!(session.registry().is_empty());
        assert_eq!(events[0], GameEvent::ClearBoard);
        assert_eq!(events[1], GameEvent::PlayersSnapshot(HashMap::new()));
        assert_eq!(events[2], GameEvent::CollectibleSnapshot(None));
    }
}
