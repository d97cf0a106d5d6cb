//! Client-side movement rules shared by every client implementation

use serde::{Deserialize, Serialize};

/// One of the eight directions a player can be steered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
        Direction::UpLeft,
        Direction::UpRight,
        Direction::DownLeft,
        Direction::DownRight,
    ];

    /// Combines horizontal and vertical key states into a direction.
    ///
    /// `dx` and `dy` are read by sign only. Returns `None` when both are zero.
    pub fn from_axes(dx: i32, dy: i32) -> Option<Self> {
        match (dx.signum(), dy.signum()) {
            (0, 0) => None,
            (0, -1) => Some(Direction::Up),
            (0, 1) => Some(Direction::Down),
            (-1, 0) => Some(Direction::Left),
            (1, 0) => Some(Direction::Right),
            (-1, -1) => Some(Direction::UpLeft),
            (1, -1) => Some(Direction::UpRight),
            (-1, 1) => Some(Direction::DownLeft),
            _ => Some(Direction::DownRight),
        }
    }

    pub fn is_diagonal(self) -> bool {
        matches!(
            self,
            Direction::UpLeft | Direction::UpRight | Direction::DownLeft | Direction::DownRight
        )
    }
}

/// Per-axis step for a diagonal move: `ceil(speed / sqrt(speed))`.
///
/// This is not a normalisation; for speed 5 the diagonal step is 3 on each
/// axis while an orthogonal step is 5.
pub fn diagonal_step(speed: i32) -> i32 {
    if speed <= 0 {
        return 0;
    }
    let speed = f64::from(speed);
    (speed / speed.sqrt()).ceil() as i32
}

/// Displacement produced by one key event in `direction`.
pub fn step(direction: Direction, speed: i32) -> (i32, i32) {
    let d = diagonal_step(speed);
    match direction {
        Direction::Up => (0, -speed),
        Direction::Down => (0, speed),
        Direction::Left => (-speed, 0),
        Direction::Right => (speed, 0),
        Direction::UpLeft => (-d, -d),
        Direction::UpRight => (d, -d),
        Direction::DownLeft => (-d, d),
        Direction::DownRight => (d, d),
    }
}

/// Proposed top-left position after moving from `(x, y)` in `direction`.
pub fn next_position(x: i32, y: i32, direction: Direction, speed: i32) -> (i32, i32) {
    let (dx, dy) = step(direction, speed);
    (x + dx, y + dy)
}
