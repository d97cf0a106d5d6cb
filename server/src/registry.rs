//! Entity registry owning the live players and the single collectible slot
//!
//! Spawning uses rejection sampling: random top-left corners are drawn from
//! `[1, board size]` on both axes until the resulting footprint is clear of
//! the board border and every player. The number of draws is capped so a
//! crowded board yields a capacity error instead of an endless loop.

use crate::board::Board;
use crate::entity::{Collectible, Player, PlayerId};
use crate::utils::generate_collectible_id;
use log::{debug, info};
use rand::Rng;
use shared::{Footprint, GameConfig, Size};
use std::collections::HashMap;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SpawnError {
    #[error("no free space for a new {entity} after {attempts} attempts")]
    Capacity {
        entity: &'static str,
        attempts: u32,
    },
}

#[derive(Debug, Clone)]
pub struct EntityRegistry {
    players: HashMap<PlayerId, Player>,
    collectible: Option<Collectible>,
    player_size: Size,
    collectible_size: Size,
    collectible_value_max: u32,
    max_spawn_attempts: u32,
}

impl EntityRegistry {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            players: HashMap::new(),
            collectible: None,
            player_size: config.player_size,
            collectible_size: config.collectible_size,
            collectible_value_max: config.collectible_value_max.max(1),
            max_spawn_attempts: config.max_spawn_attempts,
        }
    }

    /// Footprint a player would have at `(x, y)`; `None` if the hitbox overflows the coordinate space.
    pub fn player_footprint_at(&self, x: i32, y: i32) -> Option<Footprint> {
        Footprint::checked_hitbox(x, y, self.player_size)
    }

    /// True if `footprint` touches the border or any player other than `exclude`.
    pub fn is_restricted(&self, board: &Board, footprint: &Footprint, exclude: Option<&str>) -> bool {
        board.touches_border(footprint)
            || self
                .players
                .values()
                .filter(|p| Some(p.id.as_str()) != exclude)
                .any(|p| p.footprint().intersects(footprint))
    }

    /// Places a new player at a random free position and registers it.
    pub fn spawn_player<R: Rng + ?Sized>(
        &mut self,
        board: &Board,
        rng: &mut R,
        id: &str,
        color: &str,
    ) -> Result<&Player, SpawnError> {
        let size = self.player_size;
        let (x, y) = self.sample_free_position(board, rng, size, Some(id), "player")?;

        let player = Player::new(id.to_string(), color.to_string(), x, y, size);
        info!("Spawned player {} at ({}, {})", id, x, y);
        Ok(self.insert_player(player))
    }

    /// Replaces the collectible with a new one at a random free position.
    ///
    /// The outgoing collectible is cleared before sampling, so the new one may
    /// land where the old one was. On failure the slot stays empty.
    pub fn spawn_collectible<R: Rng + ?Sized>(
        &mut self,
        board: &Board,
        rng: &mut R,
    ) -> Result<&Collectible, SpawnError> {
        self.collectible = None;

        let size = self.collectible_size;
        let (x, y) = self.sample_free_position(board, rng, size, None, "collectible")?;
        let value = rng.gen_range(1..=self.collectible_value_max);
        let id = generate_collectible_id(rng);

        debug!("Spawned collectible {} worth {} at ({}, {})", id, value, x, y);
        Ok(self.place_collectible(Collectible::new(id, x, y, value, size)))
    }

    fn sample_free_position<R: Rng + ?Sized>(
        &self,
        board: &Board,
        rng: &mut R,
        size: Size,
        exclude: Option<&str>,
        entity: &'static str,
    ) -> Result<(i32, i32), SpawnError> {
        let upper = board.size().max(1);

        for _ in 0..self.max_spawn_attempts {
            let x = rng.gen_range(1..=upper);
            let y = rng.gen_range(1..=upper);
            let footprint = Footprint::of_hitbox(x, y, size);

            if !self.is_restricted(board, &footprint, exclude) {
                return Ok((x, y));
            }
        }

        Err(SpawnError::Capacity {
            entity,
            attempts: self.max_spawn_attempts,
        })
    }

    /// Registers `player`, replacing any player with the same id.
    pub fn insert_player(&mut self, player: Player) -> &Player {
        let id = player.id.clone();
        self.players.insert(id.clone(), player);
        &self.players[&id]
    }

    pub fn place_collectible(&mut self, collectible: Collectible) -> &Collectible {
        self.collectible.insert(collectible)
    }

    /// Removes a player. Removing an absent id is a no-op.
    pub fn remove_player(&mut self, id: &str) -> Option<Player> {
        self.players.remove(id)
    }

    pub fn take_collectible(&mut self) -> Option<Collectible> {
        self.collectible.take()
    }

    /// Clears every player and the collectible.
    pub fn reset(&mut self) {
        self.players.clear();
        self.collectible = None;
    }

    pub fn player(&self, id: &str) -> Option<&Player> {
        self.players.get(id)
    }

    pub fn player_mut(&mut self, id: &str) -> Option<&mut Player> {
        self.players.get_mut(id)
    }

    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.players.contains_key(id)
    }

    pub fn collectible(&self) -> Option<&Collectible> {
        self.collectible.as_ref()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}
