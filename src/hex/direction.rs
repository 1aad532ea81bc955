use bevy::prelude::Reflect;

/// One of the six edge directions of a pointy-top hex, clockwise from north-east.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Reflect)]
pub enum HexDirection {
    /// North-east.
    NE,
    /// East.
    E,
    /// South-east.
    SE,
    /// South-west.
    SW,
    /// West.
    W,
    /// North-west.
    NW,
}

impl HexDirection {
    /// All directions in cycle order.
    pub const ALL: [HexDirection; 6] = [Self::NE, Self::E, Self::SE, Self::SW, Self::W, Self::NW];

    /// Position of this direction in [`Self::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Direction at `index` modulo 6.
    pub const fn from_index(index: usize) -> Self {
        Self::ALL[index % 6]
    }

    /// The direction pointing the other way (`+3 mod 6`).
    pub const fn opposite(self) -> Self {
        Self::from_index(self.index() + 3)
    }

    /// Counter-clockwise neighbor direction (`-1 mod 6`).
    pub const fn previous(self) -> Self {
        Self::from_index(self.index() + 5)
    }

    /// Clockwise neighbor direction (`+1 mod 6`).
    pub const fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }
}
