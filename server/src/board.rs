use shared::Footprint;

/// The square play area. Its outline is a wall no entity may touch.
#[derive(Debug, Clone)]
pub struct Board {
    size: i32,
    border: Footprint,
}

impl Board {
    pub fn new(size: i32) -> Self {
        Self {
            size,
            border: Footprint::outline((0, 0), (size, size)),
        }
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn border(&self) -> &Footprint {
        &self.border
    }

    pub fn touches_border(&self, footprint: &Footprint) -> bool {
        footprint.intersects(&self.border)
    }
}
