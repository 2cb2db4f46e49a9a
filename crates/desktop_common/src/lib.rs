//! Shared leaf primitives for the desktop shell: integer coordinates with
//! their canonical `"x,y"` map-key encoding, rectangles, the entity-map
//! reducer helper, and the seeded shuffle used by the minesweeper engine.

pub mod coordinate;
pub mod entity;
pub mod grid_key;
pub mod rect;
pub mod shuffle;

pub use coordinate::{Coordinate, CoordinateKeyError, DIRECTIONS};
pub use entity::{map_entities, map_entities_with};
pub use rect::Rect;
pub use shuffle::shuffle;
