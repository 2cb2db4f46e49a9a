//! Pure state transitions for one minesweeper game.
//!
//! Every entry point takes the whole [`Game`] slice and a payload and either
//! replaces parts of it or leaves it untouched; unknown coordinates and
//! post-game clicks reduce to no-ops. The only non-determinism is the
//! caller-owned RNG used for mine placement.

use std::collections::{BTreeMap, BTreeSet};

use desktop_common::{map_entities, shuffle, Coordinate};
use log::debug;
use rand::rngs::StdRng;

use crate::model::{generate, Game, GameInstance, GameState, TileState, WinData};
use crate::presets::{GamePreset, DEBUG_PRESET, DEBUG_PRESET_NAME};

/// Cadence of the game clock.
pub const TIME_TICKRATE_MS: u64 = 1000;

#[derive(Debug, Clone, PartialEq)]
pub enum GameAction {
    /// Throw away the current instance and generate a fresh field, keeping
    /// the current settings unless a preset is given.
    Reset(Option<GamePreset>),
    /// Plant mines everywhere except the safe coordinate and start the clock.
    StartGame {
        safe_coordinate: Coordinate,
        mine_count: usize,
    },
    /// Primary button pressed down on a tile.
    StartFire(Coordinate),
    /// Primary button released on a tile.
    Fire(Coordinate),
    /// Secondary button released on a tile.
    AlternativeFire(Coordinate),
    /// Pointer left the tile while pressed.
    CancelFire(Coordinate),
    /// Pointer released outside the field; unpress everything.
    GlobalCancel,
    RevealTile(Coordinate),
    DepressTile(Coordinate),
    MarkTile(Coordinate),
    IncrementTimer(u64),
    SetPreset { name: String, preset: GamePreset },
    SetCheating(bool),
    AddToHistory(WinData),
}

pub fn reduce_game(game: &mut Game, action: &GameAction, rng: &mut StdRng) {
    match action {
        GameAction::Reset(preset) => {
            game.instance = generate(preset.unwrap_or(game.instance.settings));
            // A session that has the debug preset unlocked stays tainted.
            game.instance.cheated = game.cheating;
        }
        GameAction::StartGame {
            safe_coordinate,
            mine_count,
        } => start_game(&mut game.instance, *safe_coordinate, *mine_count, rng),
        GameAction::RevealTile(coordinate) => reveal_tile(&mut game.instance, *coordinate),
        GameAction::DepressTile(coordinate) => depress_tile(&mut game.instance, *coordinate),
        GameAction::MarkTile(coordinate) => mark_tile(&mut game.instance, *coordinate),
        GameAction::CancelFire(coordinate) => cancel_fire(&mut game.instance, *coordinate),
        GameAction::GlobalCancel => {
            map_entities(&mut game.instance.tiles, |_, tile| {
                tile.pressed.then(|| TileState {
                    pressed: false,
                    ..*tile
                })
            });
        }
        GameAction::IncrementTimer(elapsed) => {
            if game.instance.game_state.is_ongoing() {
                game.instance.elapsed_time += elapsed;
            }
        }
        GameAction::SetPreset { name, preset } => {
            game.presets.insert(name.clone(), *preset);
        }
        GameAction::SetCheating(cheating) => {
            game.cheating = *cheating;
            if *cheating {
                game.instance.cheated = true;
                game.presets.insert(DEBUG_PRESET_NAME.to_string(), DEBUG_PRESET);
            } else {
                game.presets.remove(DEBUG_PRESET_NAME);
            }
        }
        GameAction::AddToHistory(win) => game.history.push(*win),
        // The raw click actions carry no state of their own; the effect
        // pipeline translates them into the tile actions above.
        GameAction::StartFire(_) | GameAction::Fire(_) | GameAction::AlternativeFire(_) => {}
    }
}

/// Neighbouring coordinates that actually exist on the field; out-of-bounds
/// offsets are simply absent from the map, there is no wraparound.
fn neighbour_keys(
    tiles: &BTreeMap<Coordinate, TileState>,
    coordinate: Coordinate,
) -> Vec<Coordinate> {
    coordinate
        .neighbours()
        .filter(|neighbour| tiles.contains_key(neighbour))
        .collect()
}

fn start_game(
    instance: &mut GameInstance,
    safe_coordinate: Coordinate,
    mine_count: usize,
    rng: &mut StdRng,
) {
    let mut candidates: Vec<Coordinate> = instance
        .tiles
        .keys()
        .copied()
        .filter(|coordinate| *coordinate != safe_coordinate)
        .collect();
    shuffle(&mut candidates, rng);
    candidates.truncate(mine_count.min(candidates.len()));

    for mine in &candidates {
        if let Some(tile) = instance.tiles.get_mut(mine) {
            tile.is_mine = true;
        }
    }
    // Second pass so a mine next to another mine never counts itself.
    for mine in &candidates {
        for neighbour in neighbour_keys(&instance.tiles, *mine) {
            if let Some(tile) = instance.tiles.get_mut(&neighbour) {
                if !tile.is_mine {
                    tile.value += 1;
                }
            }
        }
    }

    debug!(
        "planted {} mines on a {}x{} field",
        candidates.len(),
        instance.settings.width,
        instance.settings.height
    );
    instance.game_state = GameState::Ongoing;
}

/// Collects the connected zero-value region around `start` plus its non-zero
/// border, iteratively with an explicit stack and a shared visited set.
/// Returns nothing for mines; a lone non-zero safe tile yields just itself.
fn spill_on_safe_tiles(
    tiles: &BTreeMap<Coordinate, TileState>,
    start: Coordinate,
    visited: &mut BTreeSet<Coordinate>,
) -> Vec<Coordinate> {
    let mut spill = Vec::new();
    let mut stack = vec![start];
    while let Some(key) = stack.pop() {
        if !visited.insert(key) {
            continue;
        }
        let Some(tile) = tiles.get(&key) else {
            continue;
        };
        if tile.is_mine {
            continue;
        }
        spill.push(key);
        if tile.value == 0 {
            stack.extend(neighbour_keys(tiles, key));
        }
    }
    spill
}

fn is_a_win_state(tiles: &BTreeMap<Coordinate, TileState>) -> bool {
    tiles
        .values()
        .all(|tile| (tile.is_mine && !tile.revealed) || (!tile.is_mine && tile.revealed))
}

fn is_a_lose_state(tiles: &BTreeMap<Coordinate, TileState>) -> bool {
    tiles.values().any(|tile| tile.is_mine && tile.revealed)
}

/// End-of-game disclosure: wrong flags are revealed as mistakes, unflagged
/// mines are revealed (the triggering one marked as the fatal guess), and
/// every tile is disabled. Idempotent.
pub fn reveal_end_state(tiles: &mut BTreeMap<Coordinate, TileState>, triggering: Coordinate) {
    map_entities(tiles, |key, tile| {
        if tile.mark.is_flag() && !tile.is_mine {
            Some(TileState {
                disabled: true,
                revealed: true,
                guessed_wrong: true,
                ..*tile
            })
        } else if !tile.mark.is_flag() && tile.is_mine {
            Some(TileState {
                disabled: true,
                revealed: true,
                guessed_wrong: *key == triggering,
                ..*tile
            })
        } else {
            Some(TileState {
                disabled: true,
                ..*tile
            })
        }
    });
}

fn reveal_tile(instance: &mut GameInstance, coordinate: Coordinate) {
    if instance.game_state.is_ended() {
        return;
    }
    let Some(source) = instance.tiles.get(&coordinate).copied() else {
        return;
    };

    let neighbours = neighbour_keys(&instance.tiles, coordinate);
    let flagged = neighbours
        .iter()
        .filter(|key| instance.tiles[key].mark.is_flag())
        .count();
    let questioned = neighbours
        .iter()
        .filter(|key| instance.tiles[key].mark.is_question())
        .count();
    // The chord: a revealed numbered tile with exactly as many flags around
    // it as its number, and nothing still marked uncertain.
    let can_reveal_neighbours = source.revealed
        && !source.is_mine
        && source.value > 0
        && source.mark.is_empty()
        && flagged == source.value as usize
        && questioned == 0;

    let mut visited = BTreeSet::new();
    let mut spill = spill_on_safe_tiles(&instance.tiles, coordinate, &mut visited);
    if can_reveal_neighbours {
        for neighbour in &neighbours {
            if instance.tiles[neighbour].mark.is_empty() {
                spill.extend(spill_on_safe_tiles(&instance.tiles, *neighbour, &mut visited));
            }
        }
    }
    let spill: BTreeSet<Coordinate> = spill.into_iter().collect();

    map_entities(&mut instance.tiles, |key, tile| {
        if !tile.revealed && (*key == coordinate || spill.contains(key)) {
            if tile.mark.is_empty() {
                Some(TileState {
                    revealed: true,
                    pressed: false,
                    ..*tile
                })
            } else {
                // Reveal-clicking a marked tile only clears the press.
                Some(TileState {
                    pressed: false,
                    ..*tile
                })
            }
        } else if can_reveal_neighbours
            && !tile.revealed
            && neighbours.contains(key)
            && tile.mark.is_empty()
        {
            // Chording also trips unflagged mines around the number.
            Some(TileState {
                revealed: true,
                pressed: false,
                ..*tile
            })
        } else if tile.pressed {
            Some(TileState {
                pressed: false,
                ..*tile
            })
        } else {
            None
        }
    });

    let won = is_a_win_state(&instance.tiles);
    let lost = is_a_lose_state(&instance.tiles);
    if won || lost {
        instance.game_state = if won { GameState::Won } else { GameState::Lost };
        reveal_end_state(&mut instance.tiles, coordinate);
        debug!("game over after {}ms: {:?}", instance.elapsed_time, instance.game_state);
    }
}

fn depress_tile(instance: &mut GameInstance, coordinate: Coordinate) {
    if instance.game_state.is_ended() {
        return;
    }
    let Some(source) = instance.tiles.get(&coordinate).copied() else {
        return;
    };
    instance.click_count += 1;

    let neighbours = neighbour_keys(&instance.tiles, coordinate);
    map_entities(&mut instance.tiles, |key, tile| {
        if tile.revealed || !tile.mark.is_empty() {
            return None;
        }
        // The tile under the pointer, or the chord preview around a number.
        let is_same = *key == coordinate;
        let is_preview_neighbour = source.revealed && neighbours.contains(key);
        (is_same || is_preview_neighbour).then(|| TileState {
            pressed: true,
            ..*tile
        })
    });
}

fn mark_tile(instance: &mut GameInstance, coordinate: Coordinate) {
    if instance.game_state.is_ended() {
        return;
    }
    if !instance.tiles.contains_key(&coordinate) {
        return;
    }
    let neighbours = neighbour_keys(&instance.tiles, coordinate);
    map_entities(&mut instance.tiles, |key, tile| {
        if tile.revealed {
            None
        } else if *key == coordinate {
            Some(TileState {
                mark: tile.mark.next(),
                pressed: false,
                ..*tile
            })
        } else if neighbours.contains(key) && tile.pressed {
            Some(TileState {
                pressed: false,
                ..*tile
            })
        } else {
            None
        }
    });
}

fn cancel_fire(instance: &mut GameInstance, coordinate: Coordinate) {
    let neighbours = neighbour_keys(&instance.tiles, coordinate);
    map_entities(&mut instance.tiles, |key, tile| {
        if !tile.pressed {
            return None;
        }
        (*key == coordinate || neighbours.contains(key)).then(|| TileState {
            pressed: false,
            ..*tile
        })
    });
}
