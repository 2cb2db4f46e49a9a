//! Effect pipelines: pure functions over `(action, previous state, next
//! state)` that synthesize follow-up actions. Multi-phase animations and the
//! game clock are nothing but actions scheduled through here; the session
//! executes `Now` entries on the current drain and `After` entries when
//! their software timer fires.

use desktop_app_minesweeper::{derive_game_effects, Game, GameSchedule};

use crate::model::{DesktopState, ProcessId, WindowState, ANIMATION_TIME_MS};
use crate::reducer::{DesktopAction, WindowAction};

#[derive(Debug, Clone, PartialEq)]
pub enum Scheduled {
    Now(DesktopAction),
    After { delay_ms: u64, action: DesktopAction },
}

/// Derives every follow-up for one reduced action.
///
/// `first_tick_delay_ms` parameterizes the game clock the same way the
/// session primes it: zero before the first pointer-down (pre-seeded tick),
/// the full cadence afterwards.
pub fn derive_effects(
    action: &DesktopAction,
    prev: &DesktopState,
    next: &DesktopState,
    first_tick_delay_ms: u64,
) -> Vec<Scheduled> {
    let mut schedule = Vec::new();

    // A freshly spawned window immediately becomes the active one.
    if matches!(action, DesktopAction::SpawnProgram(_)) {
        if let Some(process_id) = next.last_spawned {
            schedule.push(Scheduled::Now(DesktopAction::ActivateProgram(Some(
                process_id,
            ))));
        }
    }

    // Animation stepping: every window that entered a `start-*` phase on
    // this action gets its mid-phase now and its terminal phase after the
    // fixed delay. Windows animate independently of each other.
    for (process_id, window) in &next.windows {
        let before = prev.windows.get(process_id);
        if before.map(|window| window.minimized) != Some(window.minimized) {
            if let Some((mid, terminal)) = window.minimized.animation_steps() {
                schedule.push(Scheduled::Now(DesktopAction::Window {
                    process_id: *process_id,
                    action: WindowAction::SetMinimized(mid),
                }));
                schedule.push(Scheduled::After {
                    delay_ms: ANIMATION_TIME_MS,
                    action: DesktopAction::Window {
                        process_id: *process_id,
                        action: WindowAction::SetMinimized(terminal),
                    },
                });
            }
        }
        if before.map(|window| window.maximized) != Some(window.maximized) {
            if let Some((mid, terminal)) = window.maximized.animation_steps() {
                schedule.push(Scheduled::Now(DesktopAction::Window {
                    process_id: *process_id,
                    action: WindowAction::SetMaximized(mid),
                }));
                schedule.push(Scheduled::After {
                    delay_ms: ANIMATION_TIME_MS,
                    action: DesktopAction::Window {
                        process_id: *process_id,
                        action: WindowAction::SetMaximized(terminal),
                    },
                });
            }
        }
    }

    // Game follow-ups for the addressed window.
    if let DesktopAction::Game {
        process_id,
        action: game_action,
    } = action
    {
        if let (Some(prev_game), Some(next_game)) = (
            attached_game(prev.windows.get(process_id)),
            attached_game(next.windows.get(process_id)),
        ) {
            for entry in
                derive_game_effects(game_action, prev_game, next_game, first_tick_delay_ms)
            {
                schedule.push(match entry {
                    GameSchedule::Now(follow_up) => Scheduled::Now(DesktopAction::Game {
                        process_id: *process_id,
                        action: follow_up,
                    }),
                    GameSchedule::After { delay_ms, action } => Scheduled::After {
                        delay_ms,
                        action: DesktopAction::Game {
                            process_id: *process_id,
                            action,
                        },
                    },
                });
            }
        }
    }

    schedule
}

fn attached_game(window: Option<&WindowState>) -> Option<&Game> {
    window
        .and_then(|window| window.program_data.as_ref())
        .and_then(|data| data.as_minesweeper())
}

/// Windows whose game is currently running; used at boot to resume their
/// clocks with a pre-seeded tick.
pub fn ongoing_games(state: &DesktopState) -> Vec<ProcessId> {
    state
        .windows
        .values()
        .filter(|window| {
            attached_game(Some(window))
                .map(|game| game.instance.game_state.is_ongoing())
                .unwrap_or(false)
        })
        .map(|window| window.process_id)
        .collect()
}

#[cfg(test)]
mod tests {
    use desktop_common::Coordinate;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::model::Minimization;
    use crate::programs::ProgramId;
    use crate::reducer::reduce_desktop;

    fn spawned_state() -> (DesktopState, ProcessId) {
        let mut state = DesktopState::default();
        let mut rng = StdRng::seed_from_u64(0);
        reduce_desktop(
            &mut state,
            &DesktopAction::SpawnProgram(ProgramId::Minesweeper),
            &mut rng,
        )
        .expect("spawns");
        let process_id = state.last_spawned.expect("spawned");
        (state, process_id)
    }

    #[test]
    fn spawning_schedules_the_activation_of_the_new_window() {
        let prev = DesktopState::default();
        let (next, process_id) = spawned_state();
        let schedule = derive_effects(
            &DesktopAction::SpawnProgram(ProgramId::Minesweeper),
            &prev,
            &next,
            0,
        );
        assert_eq!(
            schedule,
            vec![Scheduled::Now(DesktopAction::ActivateProgram(Some(
                process_id
            )))]
        );
    }

    #[test]
    fn entering_a_start_phase_emits_the_mid_and_terminal_steps() {
        let (prev, process_id) = spawned_state();
        let mut next = prev.clone();
        next.windows
            .get_mut(&process_id)
            .expect("window")
            .minimized = Minimization::StartMinimizing;

        let action = DesktopAction::Window {
            process_id,
            action: WindowAction::Minimize,
        };
        let schedule = derive_effects(&action, &prev, &next, 0);
        assert_eq!(
            schedule,
            vec![
                Scheduled::Now(DesktopAction::Window {
                    process_id,
                    action: WindowAction::SetMinimized(Minimization::Minimizing),
                }),
                Scheduled::After {
                    delay_ms: ANIMATION_TIME_MS,
                    action: DesktopAction::Window {
                        process_id,
                        action: WindowAction::SetMinimized(Minimization::True),
                    },
                },
            ]
        );

        // The mid phase is not a start phase: no re-emission next action.
        let mut after_mid = next.clone();
        after_mid
            .windows
            .get_mut(&process_id)
            .expect("window")
            .minimized = Minimization::Minimizing;
        assert_eq!(
            derive_effects(
                &DesktopAction::Window {
                    process_id,
                    action: WindowAction::SetMinimized(Minimization::Minimizing),
                },
                &next,
                &after_mid,
                0,
            ),
            Vec::new()
        );
    }

    #[test]
    fn unrelated_actions_do_not_retrigger_a_parked_start_phase() {
        let (mut prev, process_id) = spawned_state();
        prev.windows
            .get_mut(&process_id)
            .expect("window")
            .minimized = Minimization::StartMinimizing;
        let next = prev.clone();
        // The phase did not change on this action, so nothing is emitted.
        assert_eq!(
            derive_effects(&DesktopAction::SetStartMenuOpen(true), &prev, &next, 0),
            Vec::new()
        );
    }

    #[test]
    fn game_effects_are_routed_back_to_the_owning_window() {
        let (state, process_id) = spawned_state();
        let action = DesktopAction::Game {
            process_id,
            action: desktop_app_minesweeper::GameAction::Fire(Coordinate::new(4, 4)),
        };
        let schedule = derive_effects(&action, &state, &state, 0);
        assert_eq!(schedule.len(), 2);
        assert!(matches!(
            &schedule[0],
            Scheduled::Now(DesktopAction::Game { process_id: pid, .. }) if *pid == process_id
        ));
    }

    #[test]
    fn ongoing_games_lists_only_running_instances() {
        let (mut state, process_id) = spawned_state();
        assert_eq!(ongoing_games(&state), Vec::new());

        let game = state
            .windows
            .get_mut(&process_id)
            .and_then(|window| window.program_data.as_mut())
            .and_then(|data| data.as_minesweeper_mut())
            .expect("game");
        game.instance.game_state = desktop_app_minesweeper::GameState::Ongoing;
        assert_eq!(ongoing_games(&state), vec![process_id]);
    }
}
