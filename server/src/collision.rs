use crate::board::Board;
use crate::registry::EntityRegistry;

/// Hazards a candidate player position would touch.
///
/// The three checks are independent; a position can hit the border and the
/// collectible at the same time. Deciding which one wins is up to the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Collision {
    pub on_board_border: bool,
    pub on_other_player: bool,
    pub on_collectible: bool,
}

impl Collision {
    /// True if the position is blocked by the border or another player.
    pub fn is_obstructed(&self) -> bool {
        self.on_board_border || self.on_other_player
    }
}

/// Classifies the footprint player `id` would have with its top-left corner at `(x, y)`.
///
/// A hitbox whose far corner leaves the `i32` range counts as a border hit.
pub fn classify(board: &Board, registry: &EntityRegistry, id: &str, x: i32, y: i32) -> Collision {
    let Some(candidate) = registry.player_footprint_at(x, y) else {
        return Collision {
            on_board_border: true,
            ..Collision::default()
        };
    };

    let on_board_border = board.touches_border(&candidate);

    let on_other_player = registry
        .players()
        .filter(|p| p.id != id)
        .any(|p| p.footprint().intersects(&candidate));

    let on_collectible = registry
        .collectible()
        .is_some_and(|c| c.footprint().intersects(&candidate));

    Collision {
        on_board_border,
        on_other_player,
        on_collectible,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Collectible, Player};
    use shared::{GameConfig, COLLECTIBLE_SIZE, PLAYER_SIZE};

    fn setup() -> (Board, EntityRegistry) {
        let config = GameConfig::default();
        (Board::new(config.board_size), EntityRegistry::new(&config))
    }

    fn add_player(registry: &mut EntityRegistry, id: &str, x: i32, y: i32) {
        registry.insert_player(Player::new(id.into(), "red".into(), x, y, PLAYER_SIZE));
    }

    #[test]
    fn test_clear_position() {
        let (board, mut registry) = setup();
        add_player(&mut registry, "a", 100, 100);

        let collision = classify(&board, &registry, "a", 102, 100);
        assert_eq!(collision, Collision::default());
        assert!(!collision.is_obstructed());
    }

    #[test]
    fn test_border_hit() {
        let (board, mut registry) = setup();
        add_player(&mut registry, "a", 0, 0);

        let collision = classify(&board, &registry, "a", -1, 0);
        assert!(collision.on_board_border);
        assert!(collision.is_obstructed());
    }

    #[test]
    fn test_overflowing_hitbox_hits_border() {
        let (board, mut registry) = setup();
        add_player(&mut registry, "a", 100, 100);

        let collision = classify(&board, &registry, "a", i32::MAX - 5, 100);
        assert!(collision.on_board_border);
        assert!(collision.is_obstructed());

        let collision = classify(&board, &registry, "a", 100, i32::MAX);
        assert!(collision.is_obstructed());
    }

    #[test]
    fn test_own_footprint_is_ignored() {
        let (board, mut registry) = setup();
        add_player(&mut registry, "a", 100, 100);

        let collision = classify(&board, &registry, "a", 100, 100);
        assert!(!collision.on_other_player);
    }

    #[test]
    fn test_other_player_hit() {
        let (board, mut registry) = setup();
        add_player(&mut registry, "a", 100, 100);
        add_player(&mut registry, "b", 130, 100);

        // a's right edge would land on b's left edge
        let collision = classify(&board, &registry, "a", 105, 100);
        assert!(collision.on_other_player);
        assert!(!collision.on_board_border);
    }

    #[test]
    fn test_hazards_are_independent() {
        let (board, mut registry) = setup();
        add_player(&mut registry, "a", 5, 5);
        registry.place_collectible(Collectible::new("c".into(), 10, 0, 7, COLLECTIBLE_SIZE));

        let collision = classify(&board, &registry, "a", 5, 0);
        assert!(collision.on_board_border);
        assert!(collision.on_collectible);
        assert!(!collision.on_other_player);
    }

    #[test]
    fn test_no_collectible() {
        let (board, mut registry) = setup();
        add_player(&mut registry, "a", 100, 100);
        assert!(!classify(&board, &registry, "a", 200, 200).on_collectible);
    }
}
