//! Players and the collectible, with the footprints derived from their positions

use shared::{CollectibleView, Footprint, PlayerView, Size};

pub type PlayerId = String;

#[derive(Debug, Clone)]
pub struct Player {
    pub id: PlayerId,
    pub x: i32,
    pub y: i32,
    pub score: u32,
    pub color: String,
    size: Size,
    footprint: Footprint,
}

impl Player {
    pub fn new(id: PlayerId, color: String, x: i32, y: i32, size: Size) -> Self {
        Self {
            id,
            x,
            y,
            score: 0,
            color,
            size,
            footprint: Footprint::of_hitbox(x, y, size),
        }
    }

    /// Moves the player and recomputes its footprint.
    pub fn set_position(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
        self.footprint = Footprint::of_hitbox(x, y, self.size);
    }

    pub fn footprint(&self) -> &Footprint {
        &self.footprint
    }

    pub fn view(&self) -> PlayerView {
        PlayerView {
            x: self.x,
            y: self.y,
            score: self.score,
            color: self.color.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Collectible {
    pub id: String,
    pub x: i32,
    pub y: i32,
    pub value: u32,
    footprint: Footprint,
}

impl Collectible {
    pub fn new(id: String, x: i32, y: i32, value: u32, size: Size) -> Self {
        Self {
            id,
            x,
            y,
            value,
            footprint: Footprint::of_hitbox(x, y, size),
        }
    }

    pub fn footprint(&self) -> &Footprint {
        &self.footprint
    }

    pub fn view(&self) -> CollectibleView {
        CollectibleView {
            id: self.id.clone(),
            x: self.x,
            y: self.y,
            value: self.value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::PLAYER_SIZE;

    #[test]
    fn test_player_creation() {
        let player = Player::new("p1".to_string(), "red".to_string(), 100, 200, PLAYER_SIZE);
        assert_eq!(player.id, "p1");
        assert_eq!(player.x, 100);
        assert_eq!(player.y, 200);
        assert_eq!(player.score, 0);
        assert!(player.footprint().contains(&(100, 200)));
        assert!(player.footprint().contains(&(125, 240)));
    }

    #[test]
    fn test_set_position_recomputes_footprint() {
        let mut player = Player::new("p1".to_string(), "red".to_string(), 100, 100, PLAYER_SIZE);
        player.set_position(102, 100);

        assert_eq!((player.x, player.y), (102, 100));
        assert!(!player.footprint().contains(&(100, 100)));
        assert!(player.footprint().contains(&(102, 100)));
        assert!(player.footprint().contains(&(127, 140)));
    }

    #[test]
    fn test_views() {
        let player = Player::new("p1".to_string(), "blue".to_string(), 5, 6, PLAYER_SIZE);
        let view = player.view();
        assert_eq!((view.x, view.y, view.score), (5, 6, 0));
        assert_eq!(view.color, "blue");

        let coin = Collectible::new("c1".to_string(), 7, 8, 42, shared::COLLECTIBLE_SIZE);
        let view = coin.view();
        assert_eq!(view.id, "c1");
        assert_eq!((view.x, view.y, view.value), (7, 8, 42));
        assert!(coin.footprint().contains(&(21, 28)));
    }
}
