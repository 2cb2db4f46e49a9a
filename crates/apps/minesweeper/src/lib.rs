//! The minesweeper game engine: pure state transitions over a keyed tile
//! map, driven by the same action/reducer contract as the rest of the
//! desktop. The host owns scheduling and randomness; everything in here is
//! deterministic given an RNG.

pub mod effects;
pub mod highscore;
pub mod model;
pub mod presets;
pub mod reducer;

pub use effects::{derive_game_effects, GameSchedule};
pub use highscore::{highscore_entries, HighscoreEntry};
pub use model::{
    generate, Game, GameInstance, GameState, SmileyState, TileMark, TileState, WinData,
};
pub use presets::{classic_presets, GamePreset, PresetError};
pub use reducer::{reduce_game, reveal_end_state, GameAction, TIME_TICKRATE_MS};
