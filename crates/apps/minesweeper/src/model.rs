use std::collections::BTreeMap;

use desktop_common::Coordinate;
use serde::{Deserialize, Serialize};

use crate::presets::{classic_presets, GamePreset, BEGINNER};

/// Player marking on an unrevealed tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TileMark {
    #[default]
    #[serde(rename = "_")]
    Empty,
    #[serde(rename = "!")]
    Flag,
    #[serde(rename = "?")]
    Question,
}

impl TileMark {
    /// The mark cycle: empty, flag, question, empty again.
    pub fn next(self) -> Self {
        match self {
            TileMark::Empty => TileMark::Flag,
            TileMark::Flag => TileMark::Question,
            TileMark::Question => TileMark::Empty,
        }
    }

    pub fn is_empty(self) -> bool {
        self == TileMark::Empty
    }

    pub fn is_flag(self) -> bool {
        self == TileMark::Flag
    }

    pub fn is_question(self) -> bool {
        self == TileMark::Question
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameState {
    #[default]
    #[serde(rename = "ready")]
    ReadyToStart,
    Ongoing,
    Won,
    Lost,
}

impl GameState {
    pub fn is_ready_to_start(self) -> bool {
        self == GameState::ReadyToStart
    }

    pub fn is_ongoing(self) -> bool {
        self == GameState::Ongoing
    }

    pub fn is_won(self) -> bool {
        self == GameState::Won
    }

    pub fn is_lost(self) -> bool {
        self == GameState::Lost
    }

    pub fn is_ended(self) -> bool {
        self.is_won() || self.is_lost()
    }
}

/// The titlebar smiley, derived from game state and pressed tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SmileyState {
    #[serde(rename = "ongoing")]
    Smiling,
    #[serde(rename = "click")]
    Surprised,
    #[serde(rename = "won")]
    Cool,
    #[serde(rename = "lost")]
    Dead,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileState {
    pub x: i32,
    pub y: i32,
    /// Count of neighbouring mines; meaningful only when `!is_mine`.
    pub value: u8,
    pub is_mine: bool,
    pub mark: TileMark,
    pub revealed: bool,
    pub pressed: bool,
    /// Set once the game has ended; never reverts until reset.
    pub disabled: bool,
    pub guessed_wrong: bool,
}

impl TileState {
    pub fn at(coordinate: Coordinate) -> Self {
        Self {
            x: coordinate.x,
            y: coordinate.y,
            value: 0,
            is_mine: false,
            mark: TileMark::Empty,
            revealed: false,
            pressed: false,
            disabled: false,
            guessed_wrong: false,
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.x, self.y)
    }
}

/// One round of minesweeper. Replaced wholesale on reset; mines are planted
/// lazily by the first reveal so the first click is always safe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameInstance {
    pub settings: GamePreset,
    pub elapsed_time: u64,
    pub click_count: u32,
    pub game_state: GameState,
    pub cheated: bool,
    #[serde(with = "desktop_common::grid_key")]
    pub tiles: BTreeMap<Coordinate, TileState>,
}

/// Generates a fresh, mine-free field for the given settings.
pub fn generate(settings: GamePreset) -> GameInstance {
    let mut tiles = BTreeMap::new();
    for x in 0..settings.width {
        for y in 0..settings.height {
            let coordinate = Coordinate::new(x, y);
            tiles.insert(coordinate, TileState::at(coordinate));
        }
    }
    GameInstance {
        settings,
        elapsed_time: 0,
        click_count: 0,
        game_state: GameState::ReadyToStart,
        cheated: false,
        tiles,
    }
}

/// A won game, appended to the history and never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WinData {
    pub preset: GamePreset,
    pub time: u64,
    pub cheated: bool,
}

/// The whole minesweeper slice attached to one window: current instance,
/// preset catalog, win history and the live cheat flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub presets: BTreeMap<String, GamePreset>,
    pub instance: GameInstance,
    pub history: Vec<WinData>,
    pub cheating: bool,
}

impl Default for Game {
    fn default() -> Self {
        Self {
            presets: classic_presets(),
            instance: generate(BEGINNER),
            history: Vec::new(),
            cheating: false,
        }
    }
}

impl Game {
    pub fn flagged_count(&self) -> usize {
        self.instance
            .tiles
            .values()
            .filter(|tile| tile.mark.is_flag())
            .count()
    }

    /// Mines left to flag; goes negative when the player over-flags.
    pub fn remaining_mines(&self) -> i64 {
        self.instance.settings.mine_count as i64 - self.flagged_count() as i64
    }

    pub fn is_a_tile_pressed(&self) -> bool {
        self.instance.tiles.values().any(|tile| tile.pressed)
    }

    pub fn smiley_state(&self) -> SmileyState {
        if self.is_a_tile_pressed() {
            SmileyState::Surprised
        } else {
            match self.instance.game_state {
                GameState::Won => SmileyState::Cool,
                GameState::Lost => SmileyState::Dead,
                _ => SmileyState::Smiling,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn generate_produces_a_blank_ready_field() {
        let instance = generate(BEGINNER);
        assert_eq!(instance.tiles.len(), 81);
        assert_eq!(instance.game_state, GameState::ReadyToStart);
        assert_eq!(instance.elapsed_time, 0);
        assert_eq!(instance.click_count, 0);
        assert!(!instance.cheated);
        assert!(instance.tiles.values().all(|tile| {
            !tile.is_mine
                && tile.value == 0
                && !tile.revealed
                && !tile.pressed
                && !tile.disabled
                && !tile.guessed_wrong
                && tile.mark.is_empty()
        }));
    }

    #[test]
    fn mark_cycle_returns_to_empty_after_three_steps() {
        for start in [TileMark::Empty, TileMark::Flag, TileMark::Question] {
            assert_eq!(start.next().next().next(), start);
        }
    }

    #[test]
    fn smiley_follows_pressed_tiles_and_game_state() {
        let mut game = Game::default();
        assert_eq!(game.smiley_state(), SmileyState::Smiling);

        let first = Coordinate::new(0, 0);
        game.instance.tiles.get_mut(&first).expect("tile").pressed = true;
        assert_eq!(game.smiley_state(), SmileyState::Surprised);

        game.instance.tiles.get_mut(&first).expect("tile").pressed = false;
        game.instance.game_state = GameState::Lost;
        assert_eq!(game.smiley_state(), SmileyState::Dead);
        game.instance.game_state = GameState::Won;
        assert_eq!(game.smiley_state(), SmileyState::Cool);
    }

    #[test]
    fn wire_shapes_match_the_persisted_layout() {
        let game = Game::default();
        let json = serde_json::to_value(&game).expect("serializes");
        assert_eq!(json["instance"]["gameState"], "ready");
        assert_eq!(json["instance"]["tiles"]["0,0"]["mark"], "_");
        assert_eq!(json["instance"]["tiles"]["0,0"]["isMine"], false);
        assert_eq!(json["instance"]["settings"]["mineCount"], 10);
        assert_eq!(json["presets"]["expert"]["width"], 30);

        let back: Game = serde_json::from_value(json).expect("deserializes");
        assert_eq!(back, game);
    }

    #[test]
    fn remaining_mines_can_go_negative() {
        let mut game = Game::default();
        assert_eq!(game.remaining_mines(), 10);
        for tile in game.instance.tiles.values_mut().take(12) {
            tile.mark = TileMark::Flag;
        }
        assert_eq!(game.remaining_mines(), -2);
    }
}
