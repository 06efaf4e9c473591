// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quadrants, compass directions, and the adjacency tables used by neighbour search.
//!
//! North is `+y`. A quadrant is addressed by two bits: east/west and north/south.
//! Neighbour search treats the two bits independently, so the tables below are
//! derived from [`Direction::offset`] instead of being spelled out per direction.

use kurbo::{Point, Rect};

/// One of the four equal sub-rectangles produced by dividing a cell.
///
/// The discriminant order (`NW`, `NE`, `SW`, `SE`) is the order of a cell's children.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Quadrant {
    /// North-west child.
    NW,
    /// North-east child.
    NE,
    /// South-west child.
    SW,
    /// South-east child.
    SE,
}

/// Axis to reflect a quadrant across.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// The vertical (north–south) axis; reflecting across it swaps east and west.
    NorthSouth,
    /// The horizontal (east–west) axis; reflecting across it swaps north and south.
    EastWest,
}

/// The eight compass directions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// `+y`.
    North,
    /// `-y`.
    South,
    /// `+x`.
    East,
    /// `-x`.
    West,
    /// `+x`, `+y`.
    NorthEast,
    /// `-x`, `+y`.
    NorthWest,
    /// `+x`, `-y`.
    SouthEast,
    /// `-x`, `-y`.
    SouthWest,
}

bitflags::bitflags! {
    /// A set of quadrants, used for adjacency tables.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct QuadrantSet: u8 {
        /// North-west.
        const NW = 0b0001;
        /// North-east.
        const NE = 0b0010;
        /// South-west.
        const SW = 0b0100;
        /// South-east.
        const SE = 0b1000;
    }
}

impl QuadrantSet {
    /// The northern half.
    pub const NORTH: Self = Self::NW.union(Self::NE);
    /// The southern half.
    pub const SOUTH: Self = Self::SW.union(Self::SE);
    /// The eastern half.
    pub const EAST: Self = Self::NE.union(Self::SE);
    /// The western half.
    pub const WEST: Self = Self::NW.union(Self::SW);

    /// Iterate the quadrants in child order.
    pub fn quadrants(self) -> impl Iterator<Item = Quadrant> {
        Quadrant::ALL
            .into_iter()
            .filter(move |q| self.contains(q.flag()))
    }
}

impl Quadrant {
    /// All quadrants in child order.
    pub const ALL: [Self; 4] = [Self::NW, Self::NE, Self::SW, Self::SE];

    /// Build a quadrant from its two address bits.
    pub const fn from_bits(east: bool, north: bool) -> Self {
        match (east, north) {
            (false, true) => Self::NW,
            (true, true) => Self::NE,
            (false, false) => Self::SW,
            (true, false) => Self::SE,
        }
    }

    /// Quadrant of `rect` that `pt` falls into.
    ///
    /// Points on a center line resolve toward the west and the south.
    pub fn containing(rect: Rect, pt: Point) -> Self {
        let c = rect.center();
        Self::from_bits(pt.x > c.x, pt.y > c.y)
    }

    /// Position of this quadrant among a cell's children.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Whether this quadrant is on the east side.
    pub const fn is_east(self) -> bool {
        matches!(self, Self::NE | Self::SE)
    }

    /// Whether this quadrant is on the north side.
    pub const fn is_north(self) -> bool {
        matches!(self, Self::NW | Self::NE)
    }

    /// Reflect across `axis`.
    pub const fn mirror(self, axis: Axis) -> Self {
        match axis {
            Axis::NorthSouth => Self::from_bits(!self.is_east(), self.is_north()),
            Axis::EastWest => Self::from_bits(self.is_east(), !self.is_north()),
        }
    }

    /// Singleton set for this quadrant.
    pub const fn flag(self) -> QuadrantSet {
        match self {
            Self::NW => QuadrantSet::NW,
            Self::NE => QuadrantSet::NE,
            Self::SW => QuadrantSet::SW,
            Self::SE => QuadrantSet::SE,
        }
    }
}

impl Direction {
    /// All eight directions; cardinals first.
    pub const ALL: [Self; 8] = [
        Self::North,
        Self::South,
        Self::East,
        Self::West,
        Self::NorthEast,
        Self::NorthWest,
        Self::SouthEast,
        Self::SouthWest,
    ];

    /// The four edge-sharing directions.
    pub const CARDINAL: [Self; 4] = [Self::North, Self::South, Self::East, Self::West];

    /// Unit grid offset `(dx, dy)`, north being `+y`.
    pub const fn offset(self) -> (i8, i8) {
        match self {
            Self::North => (0, 1),
            Self::South => (0, -1),
            Self::East => (1, 0),
            Self::West => (-1, 0),
            Self::NorthEast => (1, 1),
            Self::NorthWest => (-1, 1),
            Self::SouthEast => (1, -1),
            Self::SouthWest => (-1, -1),
        }
    }

    /// Inverse of [`offset`](Self::offset). `(0, 0)` has no direction.
    pub const fn from_offset(dx: i8, dy: i8) -> Option<Self> {
        match (dx.signum(), dy.signum()) {
            (0, 1) => Some(Self::North),
            (0, -1) => Some(Self::South),
            (1, 0) => Some(Self::East),
            (-1, 0) => Some(Self::West),
            (1, 1) => Some(Self::NorthEast),
            (-1, 1) => Some(Self::NorthWest),
            (1, -1) => Some(Self::SouthEast),
            (-1, -1) => Some(Self::SouthWest),
            _ => None,
        }
    }

    /// The direction pointing the other way.
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::East => Self::West,
            Self::West => Self::East,
            Self::NorthEast => Self::SouthWest,
            Self::NorthWest => Self::SouthEast,
            Self::SouthEast => Self::NorthWest,
            Self::SouthWest => Self::NorthEast,
        }
    }

    /// Whether this direction crosses an edge rather than a corner.
    pub const fn is_cardinal(self) -> bool {
        let (dx, dy) = self.offset();
        dx == 0 || dy == 0
    }

    /// Quadrants lying on this side of their parent.
    pub fn border(self) -> QuadrantSet {
        let (dx, dy) = self.offset();
        let mut set = QuadrantSet::all();
        if dx > 0 {
            set &= QuadrantSet::EAST;
        } else if dx < 0 {
            set &= QuadrantSet::WEST;
        }
        if dy > 0 {
            set &= QuadrantSet::NORTH;
        } else if dy < 0 {
            set &= QuadrantSet::SOUTH;
        }
        set
    }

    /// Quadrants whose neighbour in this direction is a sibling.
    ///
    /// For [`North`](Self::North) these are `SW` and `SE`.
    pub fn interior(self) -> QuadrantSet {
        self.opposite().border()
    }

    /// Sibling quadrant reached by stepping out of `q` in this direction.
    ///
    /// Each axis the direction moves along is mirrored, whether or not the step
    /// stays inside the parent.
    pub const fn step(self, q: Quadrant) -> Quadrant {
        let (dx, dy) = self.offset();
        let mut out = q;
        if dx != 0 {
            out = out.mirror(Axis::NorthSouth);
        }
        if dy != 0 {
            out = out.mirror(Axis::EastWest);
        }
        out
    }

    /// Direction still pending after stepping out of `q`, or `None` once the
    /// step lands inside the parent.
    ///
    /// Diagonals narrow to a cardinal once one of their axes resolves.
    pub const fn carry(self, q: Quadrant) -> Option<Self> {
        let (dx, dy) = self.offset();
        let cx = if (dx > 0 && q.is_east()) || (dx < 0 && !q.is_east()) {
            dx
        } else {
            0
        };
        let cy = if (dy > 0 && q.is_north()) || (dy < 0 && !q.is_north()) {
            dy
        } else {
            0
        };
        Self::from_offset(cx, cy)
    }
}
