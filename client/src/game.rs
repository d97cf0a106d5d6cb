//! Client-side mirror of the server's board

use rand::Rng;
use shared::{rank, CollectibleView, GameConfig, PlayerView, Rank};
use std::collections::HashMap;

/// Last known server state as seen by one client
pub struct ClientGameState {
    pub player_id: Option<String>,
    pub config: GameConfig,
    pub players: HashMap<String, PlayerView>,
    pub collectible: Option<CollectibleView>,
}

impl ClientGameState {
    pub fn new() -> Self {
        Self {
            player_id: None,
            config: GameConfig::default(),
            players: HashMap::new(),
            collectible: None,
        }
    }

    pub fn set_identity(&mut self, player_id: String, config: GameConfig) {
        self.player_id = Some(player_id);
        self.config = config;
    }

    pub fn apply_players(&mut self, players: HashMap<String, PlayerView>) {
        self.players = players;
    }

    pub fn apply_collectible(&mut self, collectible: Option<CollectibleView>) {
        self.collectible = collectible;
    }

    pub fn remove_player(&mut self, player_id: &str) {
        self.players.remove(player_id);
    }

    /// Forgets everything about the board; the next snapshots rebuild it.
    pub fn clear_board(&mut self) {
        self.players.clear();
        self.collectible = None;
    }

    /// True if `collectible_id` is the collectible currently on our board.
    pub fn is_current_collectible(&self, collectible_id: &str) -> bool {
        self.collectible
            .as_ref()
            .is_some_and(|c| c.id == collectible_id)
    }

    /// Applies our own move locally until the server confirms or corrects it.
    pub fn predict_move(&mut self, x: i32, y: i32) {
        if let Some(me) = self.me_mut() {
            me.x = x;
            me.y = y;
        }
    }

    pub fn me(&self) -> Option<&PlayerView> {
        self.player_id.as_ref().and_then(|id| self.players.get(id))
    }

    fn me_mut(&mut self) -> Option<&mut PlayerView> {
        let id = self.player_id.as_ref()?;
        self.players.get_mut(id)
    }

    pub fn score(&self) -> u32 {
        self.me().map_or(0, |me| me.score)
    }

    pub fn rank(&self) -> Option<Rank> {
        rank(&self.players, self.player_id.as_deref()?)
    }

    pub fn is_me(&self, player_id: &str) -> bool {
        self.player_id.as_deref() == Some(player_id)
    }
}

impl Default for ClientGameState {
    fn default() -> Self {
        Self::new()
    }
}

/// Random display color in the `rgb(r,g,b)` form, each component in `1..=255`.
pub fn random_color<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!(
        "rgb({},{},{})",
        rng.gen_range(1..=255),
        rng.gen_range(1..=255),
        rng.gen_range(1..=255)
    )
}
