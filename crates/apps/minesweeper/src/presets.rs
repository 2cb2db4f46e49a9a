use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Field dimensions and mine count for one game.
///
/// A preset is assumed valid by the engine (`mine_count <= tiles - 1`); use
/// [`GamePreset::new`] to validate untrusted input before building one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GamePreset {
    pub width: i32,
    pub height: i32,
    pub mine_count: usize,
}

pub const BEGINNER: GamePreset = GamePreset {
    width: 9,
    height: 9,
    mine_count: 10,
};

pub const INTERMEDIATE: GamePreset = GamePreset {
    width: 16,
    height: 16,
    mine_count: 40,
};

pub const EXPERT: GamePreset = GamePreset {
    width: 30,
    height: 16,
    mine_count: 99,
};

/// Tiny field installed into the catalog while the cheat flag is on.
pub const DEBUG_PRESET: GamePreset = GamePreset {
    width: 2,
    height: 2,
    mine_count: 2,
};

/// Catalog key for [`DEBUG_PRESET`].
pub const DEBUG_PRESET_NAME: &str = "debug";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PresetError {
    #[error("field must be at least 1x1, got {width}x{height}")]
    EmptyField { width: i32, height: i32 },
    #[error("{mine_count} mines do not leave a safe tile on a {width}x{height} field")]
    TooManyMines {
        width: i32,
        height: i32,
        mine_count: usize,
    },
}

impl GamePreset {
    /// Validates dimensions and that at least one tile stays safe.
    pub fn new(width: i32, height: i32, mine_count: usize) -> Result<Self, PresetError> {
        if width < 1 || height < 1 {
            return Err(PresetError::EmptyField { width, height });
        }
        let preset = Self {
            width,
            height,
            mine_count,
        };
        if mine_count > preset.tile_count() - 1 {
            return Err(PresetError::TooManyMines {
                width,
                height,
                mine_count,
            });
        }
        Ok(preset)
    }

    pub fn tile_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }
}

/// The classic named presets every fresh game ships with.
pub fn classic_presets() -> BTreeMap<String, GamePreset> {
    BTreeMap::from([
        ("beginner".to_string(), BEGINNER),
        ("intermediate".to_string(), INTERMEDIATE),
        ("expert".to_string(), EXPERT),
    ])
}
