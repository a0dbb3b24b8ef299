//! Hex coordinate system for the battle board (axial coordinates)
//!
//! Uses axial coordinates (q, r) for easy neighbor calculation.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Axial hex coordinate
///
/// Ordered by `r`, then `q`, which is the board's reading order and the
/// tie-break order used everywhere a deterministic pick between cells is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Position {
    pub q: i32,
    pub r: i32,
}

impl Position {
    pub const ORIGIN: Position = Position { q: 0, r: 0 };

    pub fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Cube coordinate S (derived from q and r)
    pub fn s(&self) -> i32 {
        -self.q - self.r
    }

    /// Grid distance in hex space
    pub fn distance(&self, other: &Self) -> u32 {
        let dq = (self.q - other.q).abs();
        let dr = (self.r - other.r).abs();
        let ds = (self.s() - other.s()).abs();
        ((dq + dr + ds) / 2) as u32
    }

    /// Get all 6 neighboring hex coordinates
    pub fn neighbors(&self) -> [Position; 6] {
        HexDirection::all().map(|direction| self.step(direction))
    }

    /// The adjacent cell in a direction
    pub fn step(&self, direction: HexDirection) -> Position {
        let offset = direction.offset();
        Position::new(self.q + offset.q, self.r + offset.r)
    }

    pub fn is_adjacent(&self, other: &Self) -> bool {
        self.distance(other) == 1
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.r.cmp(&other.r).then(self.q.cmp(&other.q))
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Direction enum for hex neighbors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum HexDirection {
    #[default]
    East,
    NorthEast,
    NorthWest,
    West,
    SouthWest,
    SouthEast,
}

impl HexDirection {
    /// Get the hex offset for this direction
    pub fn offset(&self) -> Position {
        match self {
            HexDirection::East => Position::new(1, 0),
            HexDirection::NorthEast => Position::new(1, -1),
            HexDirection::NorthWest => Position::new(0, -1),
            HexDirection::West => Position::new(-1, 0),
            HexDirection::SouthWest => Position::new(-1, 1),
            HexDirection::SouthEast => Position::new(0, 1),
        }
    }

    /// All directions
    pub fn all() -> [HexDirection; 6] {
        [
            HexDirection::East,
            HexDirection::NorthEast,
            HexDirection::NorthWest,
            HexDirection::West,
            HexDirection::SouthWest,
            HexDirection::SouthEast,
        ]
    }
}

/// Hexagonal board of a fixed radius centred on the origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HexGrid {
    pub radius: u32,
}

impl Default for HexGrid {
    fn default() -> Self {
        Self { radius: 5 }
    }
}

impl HexGrid {
    pub fn new(radius: u32) -> Self {
        Self { radius }
    }

    /// Is the cell on the board?
    pub fn contains(&self, position: Position) -> bool {
        position.distance(&Position::ORIGIN) <= self.radius
    }

    /// On-board neighbors of a cell
    pub fn neighbors(&self, position: Position) -> impl Iterator<Item = Position> + '_ {
        position
            .neighbors()
            .into_iter()
            .filter(move |n| self.contains(*n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_coord_creation() {
        let coord = Position::new(5, 10);
        assert_eq!(coord.q, 5);
        assert_eq!(coord.r, 10);
        assert_eq!(coord.s(), -15);
    }

    #[test]
    fn test_hex_distance_same() {
        let a = Position::new(0, 0);
        assert_eq!(a.distance(&a), 0);
    }

    #[test]
    fn test_hex_distance_adjacent() {
        let a = Position::new(0, 0);
        let b = Position::new(1, 0);
        assert_eq!(a.distance(&b), 1);
        assert!(a.is_adjacent(&b));
    }

    #[test]
    fn test_hex_distance_diagonal() {
        // (1,-1) to (3,0): dq=2, dr=1, ds=3
        assert_eq!(Position::new(1, -1).distance(&Position::new(3, 0)), 3);
        assert_eq!(Position::new(-2, 2).distance(&Position::new(2, -2)), 4);
    }

    #[test]
    fn test_hex_neighbors_all_adjacent() {
        let coord = Position::new(5, 5);
        let neighbors = coord.neighbors();
        assert_eq!(neighbors.len(), 6);
        assert!(neighbors.iter().all(|n| coord.distance(n) == 1));
    }

    #[test]
    fn test_position_order_is_r_then_q() {
        let mut cells = vec![
            Position::new(1, 0),
            Position::new(-1, 1),
            Position::new(0, 0),
            Position::new(2, -1),
        ];
        cells.sort();
        assert_eq!(
            cells,
            vec![
                Position::new(2, -1),
                Position::new(0, 0),
                Position::new(1, 0),
                Position::new(-1, 1),
            ]
        );
    }

    #[test]
    fn test_grid_contains() {
        let grid = HexGrid::new(2);
        assert!(grid.contains(Position::new(0, 0)));
        assert!(grid.contains(Position::new(2, -2)));
        assert!(!grid.contains(Position::new(3, 0)));
        assert!(!grid.contains(Position::new(2, 1)));
    }

    #[test]
    fn test_grid_neighbors_at_edge() {
        let grid = HexGrid::new(1);
        // Corner cell of a radius-1 board has 3 on-board neighbors
        assert_eq!(grid.neighbors(Position::new(1, 0)).count(), 3);
        assert_eq!(grid.neighbors(Position::ORIGIN).count(), 6);
    }

    #[test]
    fn test_default_grid_has_91_cells() {
        let grid = HexGrid::default();
        let on_board = (-6..=6)
            .flat_map(|q| (-6..=6).map(move |r| Position::new(q, r)))
            .filter(|p| grid.contains(*p))
            .count();
        assert_eq!(on_board, 91);
    }
}
