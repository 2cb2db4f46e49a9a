//! Follow-up actions derived from a dispatched action and the state change
//! it produced. The session executes the returned schedule: `Now` entries in
//! order on the same drain, `After` entries once their software timer fires.

use crate::model::{Game, WinData};
use crate::reducer::{GameAction, TIME_TICKRATE_MS};

#[derive(Debug, Clone, PartialEq)]
pub enum GameSchedule {
    Now(GameAction),
    After { delay_ms: u64, action: GameAction },
}

/// Derives the follow-up schedule for one reduced game action.
///
/// `first_tick_delay_ms` is the delay of the tick that a freshly started
/// game schedules: zero for a session that has not seen a pointer-down yet
/// (the pre-seeded anti-idle tick), the full cadence otherwise.
pub fn derive_game_effects(
    action: &GameAction,
    prev: &Game,
    next: &Game,
    first_tick_delay_ms: u64,
) -> Vec<GameSchedule> {
    let mut schedule = Vec::new();
    match action {
        GameAction::StartFire(coordinate) => {
            if !prev.instance.game_state.is_ended() {
                schedule.push(GameSchedule::Now(GameAction::DepressTile(*coordinate)));
            }
        }
        GameAction::Fire(coordinate) => {
            if prev.instance.game_state.is_ready_to_start() {
                schedule.push(GameSchedule::Now(GameAction::StartGame {
                    safe_coordinate: *coordinate,
                    mine_count: prev.instance.settings.mine_count,
                }));
            }
            if !prev.instance.game_state.is_ended() {
                schedule.push(GameSchedule::Now(GameAction::RevealTile(*coordinate)));
            }
        }
        GameAction::AlternativeFire(coordinate) => {
            if !prev.instance.game_state.is_ended() {
                schedule.push(GameSchedule::Now(GameAction::MarkTile(*coordinate)));
            }
        }
        GameAction::StartGame { .. } => {
            if next.instance.game_state.is_ongoing() {
                schedule.push(GameSchedule::After {
                    delay_ms: first_tick_delay_ms,
                    action: GameAction::IncrementTimer(TIME_TICKRATE_MS),
                });
            }
        }
        GameAction::IncrementTimer(_) => {
            // The tick chain re-arms itself only while the game runs, so a
            // finished game never sees a stray tick.
            if next.instance.game_state.is_ongoing() {
                schedule.push(GameSchedule::After {
                    delay_ms: TIME_TICKRATE_MS,
                    action: GameAction::IncrementTimer(TIME_TICKRATE_MS),
                });
            }
        }
        GameAction::RevealTile(_) => {
            if !prev.instance.game_state.is_won() && next.instance.game_state.is_won() {
                schedule.push(GameSchedule::Now(GameAction::AddToHistory(WinData {
                    preset: next.instance.settings,
                    time: next.instance.elapsed_time,
                    cheated: next.instance.cheated,
                })));
            }
        }
        _ => {}
    }
    schedule
}
