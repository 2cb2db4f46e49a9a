use std::fmt;
use std::ops::Add;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An integer point on the desktop or on a minefield grid.
///
/// Coordinates are plain values; equality is field equality and the canonical
/// map key is the `"x,y"` string produced by [`Coordinate::key`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
}

/// The eight neighbouring offsets, clockwise from north.
pub const DIRECTIONS: [Coordinate; 8] = [
    Coordinate { x: 0, y: 1 },
    Coordinate { x: 1, y: 1 },
    Coordinate { x: 1, y: 0 },
    Coordinate { x: 1, y: -1 },
    Coordinate { x: 0, y: -1 },
    Coordinate { x: -1, y: -1 },
    Coordinate { x: -1, y: 0 },
    Coordinate { x: -1, y: 1 },
];

impl Coordinate {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Canonical `"x,y"` key used wherever coordinates index a map.
    pub fn key(&self) -> String {
        format!("{},{}", self.x, self.y)
    }

    /// All eight neighbouring coordinates, without any bounds check.
    pub fn neighbours(self) -> impl Iterator<Item = Coordinate> {
        DIRECTIONS.iter().map(move |direction| self + *direction)
    }

    /// Chebyshev adjacency; a coordinate neighbours itself.
    pub fn is_neighbouring(a: Coordinate, b: Coordinate) -> bool {
        (a.x - b.x).abs() <= 1 && (a.y - b.y).abs() <= 1
    }
}

impl Add for Coordinate {
    type Output = Coordinate;

    fn add(self, rhs: Coordinate) -> Coordinate {
        Coordinate {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Error for a grid key that does not parse back into a coordinate.
pub enum CoordinateKeyError {
    /// The key is not two comma-separated integers.
    #[error("malformed coordinate key: {0:?}")]
    Malformed(String),
}

impl FromStr for Coordinate {
    type Err = CoordinateKeyError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        let (x, y) = key
            .split_once(',')
            .ok_or_else(|| CoordinateKeyError::Malformed(key.to_string()))?;
        let x = x
            .parse()
            .map_err(|_| CoordinateKeyError::Malformed(key.to_string()))?;
        let y = y
            .parse()
            .map_err(|_| CoordinateKeyError::Malformed(key.to_string()))?;
        Ok(Coordinate { x, y })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn key_round_trips_through_parsing() {
        let coordinate = Coordinate::new(4, -7);
        assert_eq!(coordinate.key(), "4,-7");
        assert_eq!("4,-7".parse::<Coordinate>(), Ok(coordinate));
        assert_eq!(
            "nope".parse::<Coordinate>(),
            Err(CoordinateKeyError::Malformed("nope".to_string()))
        );
    }

    #[test]
    fn neighbours_cover_all_eight_directions_once() {
        let origin = Coordinate::new(0, 0);
        let neighbours: Vec<Coordinate> = origin.neighbours().collect();
        assert_eq!(neighbours.len(), 8);
        for neighbour in &neighbours {
            assert!(Coordinate::is_neighbouring(origin, *neighbour));
            assert_ne!(*neighbour, origin);
        }
    }

    #[test]
    fn neighbouring_is_chebyshev_distance() {
        let a = Coordinate::new(3, 3);
        assert!(Coordinate::is_neighbouring(a, Coordinate::new(4, 2)));
        assert!(Coordinate::is_neighbouring(a, a));
        assert!(!Coordinate::is_neighbouring(a, Coordinate::new(5, 3)));
    }
}
