/// Direction class of a displacement (dx, dy) between two cells.
/// y grows downward, so "south" means dy > 0.
///
/// The four diagonal octants cover displacements with both components
/// nonzero; the four axis octants cover purely vertical or horizontal ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Octant {
    SouthEast,
    SouthWest,
    NorthWest,
    NorthEast,
    South,
    West,
    North,
    East,
}

impl Octant {
    pub const ALL: [Octant; 8] = [
        Octant::SouthEast,
        Octant::SouthWest,
        Octant::NorthWest,
        Octant::NorthEast,
        Octant::South,
        Octant::West,
        Octant::North,
        Octant::East,
    ];

    /// Classify a displacement. Returns None for a zero displacement.
    pub fn classify(dx: i32, dy: i32) -> Option<Octant> {
        let octant = match (dx.signum(), dy.signum()) {
            (1, 1) => Octant::SouthEast,
            (-1, 1) => Octant::SouthWest,
            (-1, -1) => Octant::NorthWest,
            (1, -1) => Octant::NorthEast,
            (0, 1) => Octant::South,
            (-1, 0) => Octant::West,
            (0, -1) => Octant::North,
            (1, 0) => Octant::East,
            _ => return None,
        };
        Some(octant)
    }

    /// Stable index into per-octant tables
    pub fn index(self) -> usize {
        self as usize
    }

    /// Straight up or straight down. Every target here has an infinite
    /// slope, so occlusion tests run with inverted polarity.
    pub fn is_vertical(self) -> bool {
        matches!(self, Octant::South | Octant::North)
    }

    /// Offsets from a cell centre to the corners that bound the cell's
    /// angular span, as (lower-slope corner, higher-slope corner).
    pub fn corner_offsets(self) -> ((f64, f64), (f64, f64)) {
        match self {
            Octant::SouthEast => ((0.5, -0.5), (-0.5, 0.5)),
            Octant::SouthWest => ((0.5, 0.5), (-0.5, -0.5)),
            Octant::NorthWest => ((-0.5, 0.5), (0.5, -0.5)),
            Octant::NorthEast => ((-0.5, -0.5), (0.5, 0.5)),
            Octant::South => ((-0.5, 0.0), (0.5, 0.0)),
            Octant::West => ((0.0, 0.5), (0.0, -0.5)),
            Octant::North => ((0.5, 0.0), (-0.5, 0.0)),
            Octant::East => ((0.0, -0.5), (0.0, 0.5)),
        }
    }
}

/// Slope of the line from (x1, y1) to (x2, y2).
/// A vertical line yields +inf (downward) or -inf (upward) instead of
/// dividing by zero.
pub fn calculate_slope(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    if x1 == x2 && y2 > y1 {
        return f64::INFINITY;
    }
    if x1 == x2 && y2 < y1 {
        return f64::NEG_INFINITY;
    }
    (y2 - y1) / (x2 - x1)
}
