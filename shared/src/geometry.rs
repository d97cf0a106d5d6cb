//! Rectangle outlines used for every collision test in the game.
//!
//! Only the border cells of a hitbox take part in collision checks; the
//! interior of a rectangle is never stored.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A single integer cell on the board.
pub type Cell = (i32, i32);

/// Width and height of an axis-aligned hitbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// The set of outline cells of a rectangle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Footprint {
    cells: HashSet<Cell>,
}

impl Footprint {
    /// Builds the outline of the rectangle spanning `start` to `end`, both inclusive.
    ///
    /// Corners are shared by two edges and appear once. If `end` lies before
    /// `start` on an axis the rectangle is degenerate on that axis and the
    /// result is empty.
    pub fn outline(start: Cell, end: Cell) -> Self {
        let (x0, y0) = start;
        let (x1, y1) = end;

        if x1 < x0 || y1 < y0 {
            return Self::default();
        }

        let perimeter = 2 * ((x1 - x0) as usize + (y1 - y0) as usize + 2);
        let mut cells = HashSet::with_capacity(perimeter);

        for x in x0..=x1 {
            cells.insert((x, y0));
            cells.insert((x, y1));
        }
        for y in y0..=y1 {
            cells.insert((x0, y));
            cells.insert((x1, y));
        }

        Self { cells }
    }

    /// Outline of a hitbox whose top-left corner sits at `(x, y)`.
    ///
    /// The far corner is `(x + width, y + height)`, clamped to `i32::MAX`.
    /// Use [`Footprint::checked_hitbox`] for coordinates received from clients.
    pub fn of_hitbox(x: i32, y: i32, size: Size) -> Self {
        Self::outline(
            (x, y),
            (x.saturating_add(size.width), y.saturating_add(size.height)),
        )
    }

    /// Like [`Footprint::of_hitbox`], but `None` when the far corner does not fit in an `i32`.
    pub fn checked_hitbox(x: i32, y: i32, size: Size) -> Option<Self> {
        let x1 = x.checked_add(size.width)?;
        let y1 = y.checked_add(size.height)?;
        Some(Self::outline((x, y), (x1, y1)))
    }

    pub fn contains(&self, cell: &Cell) -> bool {
        self.cells.contains(cell)
    }

    /// True if any outline cell is shared with `other`.
    pub fn intersects(&self, other: &Footprint) -> bool {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        small.cells.iter().any(|cell| large.contains(cell))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outline_of_single_cell() {
        let footprint = Footprint::outline((3, 4), (3, 4));
        assert_eq!(footprint.len(), 1);
        assert!(footprint.contains(&(3, 4)));
    }

    #[test]
    fn test_outline_has_no_interior() {
        let footprint = Footprint::outline((0, 0), (4, 4));

        // 4 edges of 5 cells sharing 4 corners
        assert_eq!(footprint.len(), 16);
        assert!(footprint.contains(&(0, 0)));
        assert!(footprint.contains(&(4, 0)));
        assert!(footprint.contains(&(0, 4)));
        assert!(footprint.contains(&(4, 4)));
        assert!(footprint.contains(&(2, 0)));
        assert!(footprint.contains(&(4, 2)));
        assert!(!footprint.contains(&(2, 2)));
        assert!(!footprint.contains(&(1, 3)));
    }

    #[test]
    fn test_hitbox_outline_size() {
        let footprint = Footprint::of_hitbox(100, 100, Size::new(25, 40));

        // 26 x 41 cells on the outline, corners counted once
        assert_eq!(footprint.len(), 2 * 26 + 2 * 41 - 4);
        assert!(footprint.contains(&(125, 140)));
        assert!(!footprint.contains(&(126, 140)));
    }

    #[test]
    fn test_degenerate_outline_is_empty() {
        let footprint = Footprint::outline((5, 5), (4, 9));
        assert!(footprint.is_empty());
    }

    #[test]
    fn test_flat_outline() {
        let footprint = Footprint::outline((0, 7), (9, 7));
        assert_eq!(footprint.len(), 10);
        assert!(footprint.cells().all(|&(_, y)| y == 7));
    }

    #[test]
    fn test_intersects_on_shared_edge() {
        let a = Footprint::of_hitbox(0, 0, Size::new(10, 10));
        let b = Footprint::of_hitbox(10, 5, Size::new(10, 10));
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn test_nested_outlines_do_not_intersect() {
        let outer = Footprint::of_hitbox(0, 0, Size::new(100, 100));
        let inner = Footprint::of_hitbox(20, 20, Size::new(10, 10));
        assert!(!outer.intersects(&inner));
    }

    #[test]
    fn test_checked_hitbox_overflow() {
        let size = Size::new(25, 40);
        assert!(Footprint::checked_hitbox(i32::MAX - 5, 100, size).is_none());
        assert!(Footprint::checked_hitbox(100, i32::MAX - 39, size).is_none());
        assert_eq!(
            Footprint::checked_hitbox(100, 100, size),
            Some(Footprint::of_hitbox(100, 100, size))
        );

        // clamped, never wrapped
        let clamped = Footprint::of_hitbox(i32::MAX - 5, 100, size);
        assert!(!clamped.is_empty());
        assert!(clamped.contains(&(i32::MAX, 100)));
    }

    #[test]
    fn test_disjoint_outlines() {
        let a = Footprint::of_hitbox(0, 0, Size::new(10, 10));
        let b = Footprint::of_hitbox(11, 0, Size::new(10, 10));
        assert!(!a.intersects(&b));
    }
}
