//! The desktop reducer: routes every dispatched action to the window,
//! shortcut and game transition logic. Pure apart from the session-owned RNG
//! threaded through to the minesweeper engine.

use desktop_app_minesweeper::{reduce_game, GameAction};
use desktop_common::{map_entities, Coordinate, Rect};
use log::debug;
use rand::rngs::StdRng;
use thiserror::Error;

use crate::model::{
    DesktopState, Maximization, Minimization, ProcessId, ResizeData, ShortcutId, ShortcutState,
    WindowState,
};
use crate::programs::ProgramId;
use crate::shortcuts::{next_shortcut_position, occupied_cells};
use crate::window_manager;

#[derive(Debug, Clone, PartialEq)]
/// Actions addressed to one window.
pub enum WindowAction {
    Minimize,
    Maximize,
    Restore,
    /// Accumulate a drag delta onto the position.
    Move(Coordinate),
    Resize(ResizeData),
    /// Timed minimization step emitted by the animation effect.
    SetMinimized(Minimization),
    /// Timed maximization step emitted by the animation effect.
    SetMaximized(Maximization),
}

#[derive(Debug, Clone, PartialEq)]
/// Every action the desktop session accepts.
pub enum DesktopAction {
    /// Spawn a new instance of an installed program.
    SpawnProgram(ProgramId),
    /// Raise and activate a window; `None` (desktop click) deactivates all.
    ActivateProgram(Option<ProcessId>),
    CloseWindow(ProcessId),
    /// Taskbar button click: restore if minimized, minimize if active,
    /// activate otherwise.
    ToggleTaskbarButton(ProcessId),
    Window {
        process_id: ProcessId,
        action: WindowAction,
    },
    /// Minesweeper action routed to the game attached to a window.
    Game {
        process_id: ProcessId,
        action: GameAction,
    },
    /// Replace the shortcut selection with exactly these ids.
    SelectShortcuts(Vec<ShortcutId>),
    /// Drag every selected shortcut by the same delta.
    MoveSelectedShortcuts(Coordinate),
    /// Drop the dragged selection: snap and re-resolve collisions in order.
    DropSelectedShortcuts,
    BeginShortcutRename(ShortcutId),
    CommitShortcutRename {
        shortcut_id: ShortcutId,
        name: String,
    },
    SetStartMenuOpen(bool),
    ToggleSchemeKind,
    SetWorkspace(Rect),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReducerError {
    #[error("window not found: pid{0}")]
    WindowNotFound(ProcessId),
    #[error("shortcut not found: {0}")]
    ShortcutNotFound(ShortcutId),
    #[error("program not installed: {0}")]
    ProgramNotInstalled(ProgramId),
    #[error("window pid{0} has no minesweeper state attached")]
    NoGameAttached(ProcessId),
}

/// Applies one action to the desktop state.
///
/// Tile-level game actions and activation degrade to no-ops on unknown
/// targets; window- and shortcut-addressed actions report the missing entity
/// instead so the session can log the dropped action.
///
/// # Errors
///
/// Returns the corresponding [`ReducerError`] when an addressed window,
/// shortcut or program does not exist.
pub fn reduce_desktop(
    state: &mut DesktopState,
    action: &DesktopAction,
    rng: &mut StdRng,
) -> Result<(), ReducerError> {
    match action {
        DesktopAction::SpawnProgram(program) => spawn_program(state, *program)?,
        DesktopAction::ActivateProgram(process_id) => {
            window_manager::activate(&mut state.windows, *process_id);
            state.active_process_id =
                process_id.filter(|pid| state.windows.contains_key(pid));
        }
        DesktopAction::CloseWindow(process_id) => {
            if state.windows.remove(process_id).is_none() {
                return Err(ReducerError::WindowNotFound(*process_id));
            }
            if state.active_process_id == Some(*process_id) {
                // Fall back to the top-most remaining visible window.
                let top = state
                    .windows
                    .values()
                    .filter(|window| !window.minimized.is_minimized())
                    .max_by_key(|window| window.z_index)
                    .map(|window| window.process_id);
                window_manager::activate(&mut state.windows, top);
                state.active_process_id = top;
            }
        }
        DesktopAction::ToggleTaskbarButton(process_id) => {
            let window = find_window(state, *process_id)?;
            if window.minimized.is_minimized() || !window.active {
                window_manager::activate(&mut state.windows, Some(*process_id));
                state.active_process_id = Some(*process_id);
            } else {
                reduce_desktop(
                    state,
                    &DesktopAction::Window {
                        process_id: *process_id,
                        action: WindowAction::Minimize,
                    },
                    rng,
                )?;
            }
        }
        DesktopAction::Window { process_id, action } => {
            let window = find_window_mut(state, *process_id)?;
            match action {
                WindowAction::Minimize => {
                    window_manager::minimize(window);
                    let still_active = window.active;
                    if !still_active && state.active_process_id == Some(*process_id) {
                        state.active_process_id = None;
                    }
                }
                WindowAction::Maximize => window_manager::maximize(window),
                WindowAction::Restore => window_manager::restore(window),
                WindowAction::Move(delta) => window_manager::move_window(window, *delta),
                WindowAction::Resize(data) => window_manager::resize_window(window, data),
                WindowAction::SetMinimized(phase) => {
                    if !window_manager::set_minimized(window, *phase) {
                        debug!("stale minimization step dropped for pid{process_id}");
                    }
                }
                WindowAction::SetMaximized(phase) => {
                    if !window_manager::set_maximized(window, *phase) {
                        debug!("stale maximization step dropped for pid{process_id}");
                    }
                }
            }
        }
        DesktopAction::Game { process_id, action } => {
            let window = find_window_mut(state, *process_id)?;
            let game = window
                .program_data
                .as_mut()
                .and_then(|data| data.as_minesweeper_mut())
                .ok_or(ReducerError::NoGameAttached(*process_id))?;
            reduce_game(game, action, rng);
        }
        DesktopAction::SelectShortcuts(ids) => {
            map_entities(&mut state.shortcuts, |key, shortcut| {
                let selected = ids.contains(key);
                (shortcut.selected != selected).then(|| ShortcutState {
                    selected,
                    ..shortcut.clone()
                })
            });
        }
        DesktopAction::MoveSelectedShortcuts(delta) => {
            map_entities(&mut state.shortcuts, |_, shortcut| {
                shortcut.selected.then(|| ShortcutState {
                    position: shortcut.position + *delta,
                    floating: true,
                    ..shortcut.clone()
                })
            });
        }
        DesktopAction::DropSelectedShortcuts => {
            let selected: Vec<ShortcutId> = state
                .shortcuts
                .values()
                .filter(|shortcut| shortcut.selected)
                .map(|shortcut| shortcut.shortcut_id)
                .collect();
            let workspace = state.workspace;
            // Snap one shortcut at a time so shortcuts dropped together
            // never resolve onto the same cell.
            let mut occupied = occupied_cells(&state.shortcuts, &selected);
            for shortcut_id in selected {
                if let Some(shortcut) = state.shortcuts.get_mut(&shortcut_id) {
                    let snapped =
                        next_shortcut_position(&occupied, &workspace, shortcut.position);
                    occupied.insert(snapped);
                    shortcut.position = snapped;
                    shortcut.floating = false;
                }
            }
        }
        DesktopAction::BeginShortcutRename(shortcut_id) => {
            find_shortcut_mut(state, *shortcut_id)?.renaming = true;
        }
        DesktopAction::CommitShortcutRename { shortcut_id, name } => {
            let shortcut = find_shortcut_mut(state, *shortcut_id)?;
            if !name.trim().is_empty() {
                shortcut.name = name.clone();
            }
            shortcut.renaming = false;
        }
        DesktopAction::SetStartMenuOpen(open) => state.start_menu_open = *open,
        DesktopAction::ToggleSchemeKind => {
            state.active_scheme.kind = state.active_scheme.kind.toggled();
        }
        DesktopAction::SetWorkspace(workspace) => state.workspace = *workspace,
    }
    Ok(())
}

fn spawn_program(state: &mut DesktopState, program: ProgramId) -> Result<(), ReducerError> {
    let descriptor = state
        .programs
        .get(&program)
        .ok_or(ReducerError::ProgramNotInstalled(program))?
        .clone();

    let process_id = window_manager::next_process_id(&state.windows);
    let mut window = WindowState::initial(process_id);
    window.title = descriptor.title.clone();
    window.title_bar_icon = descriptor.title_bar_icon.clone();
    descriptor.initial_window_state.apply(&mut window);
    window.program = Some(program);
    window.program_data = descriptor.initial_program_data();
    window.z_index = state.windows.len() as u32 + 1;
    window.position = window_manager::spawn_position(&state.windows, window.position);

    debug!("spawned {program} as pid{process_id}");
    state.windows.insert(process_id, window);
    state.last_spawned = Some(process_id);
    state.start_menu_open = false;
    Ok(())
}

fn find_window(state: &DesktopState, process_id: ProcessId) -> Result<&WindowState, ReducerError> {
    state
        .windows
        .get(&process_id)
        .ok_or(ReducerError::WindowNotFound(process_id))
}

fn find_window_mut(
    state: &mut DesktopState,
    process_id: ProcessId,
) -> Result<&mut WindowState, ReducerError> {
    state
        .windows
        .get_mut(&process_id)
        .ok_or(ReducerError::WindowNotFound(process_id))
}

fn find_shortcut_mut(
    state: &mut DesktopState,
    shortcut_id: ShortcutId,
) -> Result<&mut ShortcutState, ReducerError> {
    state
        .shortcuts
        .get_mut(&shortcut_id)
        .ok_or(ReducerError::ShortcutNotFound(shortcut_id))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;

    use super::*;
    use crate::shortcuts::{SHORTCUT_HEIGHT, SHORTCUT_WIDTH};

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0)
    }

    fn dispatch(state: &mut DesktopState, action: DesktopAction) {
        reduce_desktop(state, &action, &mut rng()).expect("action applies");
    }

    fn spawn(state: &mut DesktopState) -> ProcessId {
        dispatch(state, DesktopAction::SpawnProgram(ProgramId::Minesweeper));
        let process_id = state.last_spawned.expect("spawned");
        dispatch(state, DesktopAction::ActivateProgram(Some(process_id)));
        process_id
    }

    #[test]
    fn spawning_allocates_sequential_pids_and_tops_the_stack() {
        let mut state = DesktopState::default();
        let first = spawn(&mut state);
        let second = spawn(&mut state);

        assert_eq!(first, ProcessId(0));
        assert_eq!(second, ProcessId(1));
        assert_eq!(state.windows[&second].z_index, 2);
        assert_eq!(state.windows[&second].title, "Minesweeper");
        assert!(state.windows[&second]
            .program_data
            .as_ref()
            .and_then(|data| data.as_minesweeper())
            .is_some());
        // The second window spawned onto the same preferred position and
        // got nudged off the first.
        assert_ne!(
            state.windows[&first].position,
            state.windows[&second].position
        );
    }

    #[test]
    fn spawning_an_unknown_program_is_reported() {
        let mut state = DesktopState::default();
        assert_eq!(
            reduce_desktop(
                &mut state,
                &DesktopAction::SpawnProgram(ProgramId::Unknown),
                &mut rng()
            ),
            Err(ReducerError::ProgramNotInstalled(ProgramId::Unknown))
        );
        assert!(state.windows.is_empty());
    }

    #[test]
    fn activation_is_exclusive_and_tracks_the_active_pid() {
        let mut state = DesktopState::default();
        let first = spawn(&mut state);
        let second = spawn(&mut state);

        dispatch(&mut state, DesktopAction::ActivateProgram(Some(first)));
        assert_eq!(state.active_process_id, Some(first));
        assert!(state.windows[&first].active);
        assert!(!state.windows[&second].active);

        // Desktop click: nobody is active, z-order untouched.
        let z_before: Vec<u32> = state.windows.values().map(|w| w.z_index).collect();
        dispatch(&mut state, DesktopAction::ActivateProgram(None));
        assert_eq!(state.active_process_id, None);
        assert!(state.windows.values().all(|window| !window.active));
        let z_after: Vec<u32> = state.windows.values().map(|w| w.z_index).collect();
        assert_eq!(z_after, z_before);
    }

    #[test]
    fn closing_the_active_window_falls_back_to_the_top_most() {
        let mut state = DesktopState::default();
        let first = spawn(&mut state);
        let second = spawn(&mut state);
        let third = spawn(&mut state);
        assert_eq!(state.active_process_id, Some(third));

        dispatch(&mut state, DesktopAction::CloseWindow(third));
        assert!(!state.windows.contains_key(&third));
        assert_eq!(state.active_process_id, Some(second));
        assert!(state.windows[&second].active);
        assert!(!state.windows[&first].active);

        assert_eq!(
            reduce_desktop(&mut state, &DesktopAction::CloseWindow(third), &mut rng()),
            Err(ReducerError::WindowNotFound(third))
        );
    }

    #[test]
    fn the_taskbar_button_cycles_activate_minimize_restore() {
        let mut state = DesktopState::default();
        let first = spawn(&mut state);
        let second = spawn(&mut state);

        // Inactive window: the button activates it.
        dispatch(&mut state, DesktopAction::ToggleTaskbarButton(first));
        assert!(state.windows[&first].active);

        // Active window: the button starts minimizing it.
        dispatch(&mut state, DesktopAction::ToggleTaskbarButton(first));
        assert_eq!(
            state.windows[&first].minimized,
            Minimization::StartMinimizing
        );
        assert_eq!(state.active_process_id, None);

        // Fully minimized window: the button activates and unminimizes.
        state.windows.get_mut(&first).expect("window").minimized = Minimization::True;
        dispatch(&mut state, DesktopAction::ToggleTaskbarButton(first));
        assert_eq!(
            state.windows[&first].minimized,
            Minimization::StartUnminimizing
        );
        assert!(state.windows[&first].active);
        assert!(!state.windows[&second].active);
    }

    #[test]
    fn window_moves_accumulate_deltas() {
        let mut state = DesktopState::default();
        let pid = spawn(&mut state);
        let origin = state.windows[&pid].position;

        dispatch(
            &mut state,
            DesktopAction::Window {
                process_id: pid,
                action: WindowAction::Move(Coordinate::new(15, -5)),
            },
        );
        dispatch(
            &mut state,
            DesktopAction::Window {
                process_id: pid,
                action: WindowAction::Move(Coordinate::new(5, 10)),
            },
        );
        assert_eq!(
            state.windows[&pid].position,
            origin + Coordinate::new(20, 5)
        );
    }

    #[test]
    fn game_actions_reach_the_attached_minesweeper() {
        let mut state = DesktopState::default();
        let pid = spawn(&mut state);

        dispatch(
            &mut state,
            DesktopAction::Game {
                process_id: pid,
                action: GameAction::SetCheating(true),
            },
        );
        let game = state.windows[&pid]
            .program_data
            .as_ref()
            .and_then(|data| data.as_minesweeper())
            .expect("game");
        assert!(game.cheating);

        assert_eq!(
            reduce_desktop(
                &mut state,
                &DesktopAction::Game {
                    process_id: ProcessId(77),
                    action: GameAction::GlobalCancel,
                },
                &mut rng()
            ),
            Err(ReducerError::WindowNotFound(ProcessId(77)))
        );
    }

    #[test]
    fn shortcut_selection_drag_and_drop_snaps_without_collisions() {
        let mut state = DesktopState::default();
        let existing = *state.shortcuts.keys().next().expect("installed shortcut");

        // Add a second shortcut next to the first, then drag both onto the
        // same neighbourhood and drop.
        let second = ShortcutId(1);
        let mut shortcut = state.shortcuts[&existing].clone();
        shortcut.shortcut_id = second;
        shortcut.position = Coordinate::new(SHORTCUT_WIDTH, 0);
        state.shortcuts.insert(second, shortcut);

        dispatch(
            &mut state,
            DesktopAction::SelectShortcuts(vec![existing, second]),
        );
        assert!(state.shortcuts.values().all(|shortcut| shortcut.selected));

        dispatch(
            &mut state,
            DesktopAction::MoveSelectedShortcuts(Coordinate::new(31, 18)),
        );
        assert!(state.shortcuts.values().all(|shortcut| shortcut.floating));

        dispatch(&mut state, DesktopAction::DropSelectedShortcuts);
        let first_position = state.shortcuts[&existing].position;
        let second_position = state.shortcuts[&second].position;
        assert_ne!(first_position, second_position);
        assert!(state.shortcuts.values().all(|shortcut| !shortcut.floating));
        for position in [first_position, second_position] {
            assert_eq!(position.x.rem_euclid(SHORTCUT_WIDTH), 0);
            assert_eq!(position.y.rem_euclid(SHORTCUT_HEIGHT), 0);
        }
    }

    #[test]
    fn renaming_a_shortcut_rejects_blank_names() {
        let mut state = DesktopState::default();
        let shortcut_id = *state.shortcuts.keys().next().expect("shortcut");

        dispatch(&mut state, DesktopAction::BeginShortcutRename(shortcut_id));
        assert!(state.shortcuts[&shortcut_id].renaming);

        dispatch(
            &mut state,
            DesktopAction::CommitShortcutRename {
                shortcut_id,
                name: "   ".to_string(),
            },
        );
        assert_eq!(state.shortcuts[&shortcut_id].name, "Minesweeper");
        assert!(!state.shortcuts[&shortcut_id].renaming);

        dispatch(&mut state, DesktopAction::BeginShortcutRename(shortcut_id));
        dispatch(
            &mut state,
            DesktopAction::CommitShortcutRename {
                shortcut_id,
                name: "Mines".to_string(),
            },
        );
        assert_eq!(state.shortcuts[&shortcut_id].name, "Mines");
    }

    #[test]
    fn scheme_and_start_menu_toggles() {
        let mut state = DesktopState::default();
        dispatch(&mut state, DesktopAction::SetStartMenuOpen(true));
        assert!(state.start_menu_open);
        // Spawning from the start menu closes it again.
        spawn(&mut state);
        assert!(!state.start_menu_open);

        use crate::model::SchemeKind;
        dispatch(&mut state, DesktopAction::ToggleSchemeKind);
        assert_eq!(state.active_scheme.kind, SchemeKind::W98);
        dispatch(&mut state, DesktopAction::ToggleSchemeKind);
        assert_eq!(state.active_scheme.kind, SchemeKind::W2k);
    }
}
