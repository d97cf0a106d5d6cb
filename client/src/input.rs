//! Bot input: picks a direction each frame the way a player holding keys would

use rand::Rng;
use shared::{next_position, CollectibleView, Direction, PlayerView};

/// Steers a player toward the collectible, with occasional random turns
/// so it does not stay pinned against another player forever.
pub struct Pilot {
    speed: i32,
    wander_chance: f64,
}

impl Pilot {
    pub fn new(speed: i32) -> Self {
        Self {
            speed,
            wander_chance: 0.2,
        }
    }

    pub fn with_wander_chance(mut self, wander_chance: f64) -> Self {
        self.wander_chance = wander_chance.clamp(0.0, 1.0);
        self
    }

    /// Direction of the key combination pointing from `me` toward `target`.
    pub fn heading(me: &PlayerView, target: &CollectibleView) -> Option<Direction> {
        Direction::from_axes(target.x - me.x, target.y - me.y)
    }

    pub fn choose_direction<R: Rng + ?Sized>(
        &self,
        me: &PlayerView,
        target: Option<&CollectibleView>,
        rng: &mut R,
    ) -> Direction {
        let wander = rng.gen_bool(self.wander_chance);
        match target.and_then(|t| Self::heading(me, t)) {
            Some(direction) if !wander => direction,
            _ => Direction::ALL[rng.gen_range(0..Direction::ALL.len())],
        }
    }

    /// The absolute position to propose to the server next.
    pub fn next_move<R: Rng + ?Sized>(
        &self,
        me: &PlayerView,
        target: Option<&CollectibleView>,
        rng: &mut R,
    ) -> (i32, i32) {
        let direction = self.choose_direction(me, target, rng);
        next_position(me.x, me.y, direction, self.speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn me() -> PlayerView {
        PlayerView {
            x: 100,
            y: 100,
            score: 0,
            color: "red".to_string(),
        }
    }

    fn coin(x: i32, y: i32) -> CollectibleView {
        CollectibleView {
            id: "c".to_string(),
            x,
            y,
            value: 10,
        }
    }

    #[test]
    fn test_heading() {
        assert_eq!(Pilot::heading(&me(), &coin(200, 100)), Some(Direction::Right));
        assert_eq!(Pilot::heading(&me(), &coin(50, 50)), Some(Direction::UpLeft));
        assert_eq!(Pilot::heading(&me(), &coin(100, 100)), None);
    }

    #[test]
    fn test_moves_toward_collectible() {
        let pilot = Pilot::new(5).with_wander_chance(0.0);
        let mut rng = StdRng::seed_from_u64(3);

        assert_eq!(pilot.next_move(&me(), Some(&coin(300, 100)), &mut rng), (105, 100));
        // diagonal keys move 3 on each axis at speed 5
        assert_eq!(pilot.next_move(&me(), Some(&coin(300, 300)), &mut rng), (103, 103));
    }

    #[test]
    fn test_wanders_without_target() {
        let pilot = Pilot::new(5);
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..20 {
            let (x, y) = pilot.next_move(&me(), None, &mut rng);
            assert!((x - 100).abs() <= 5 && (y - 100).abs() <= 5);
            assert_ne!((x, y), (100, 100));
        }
    }
}
