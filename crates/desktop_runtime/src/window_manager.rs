//! Window lifecycle transitions shared by the desktop reducer: process id
//! allocation, spawn placement, activation/z-order recomputation, the
//! animated minimize/maximize steps, and move/resize geometry.

use std::collections::BTreeMap;

use desktop_common::{map_entities, map_entities_with, Coordinate};

use crate::model::{
    Maximization, Minimization, ProcessId, ResizeData, WindowState, MAXIMIZATION_STEPS,
    MINIMIZATION_STEPS,
};

/// Diagonal offset applied when a new window would land exactly on an
/// existing one.
pub const SPAWN_NUDGE_OFFSET: i32 = 24;
const MAX_SPAWN_NUDGE_ATTEMPTS: usize = 16;

/// Next free process id: one past the highest live id, starting at zero.
pub fn next_process_id(windows: &BTreeMap<ProcessId, WindowState>) -> ProcessId {
    ProcessId(windows.keys().map(|id| id.0 + 1).max().unwrap_or(0))
}

/// Nudges the preferred spawn position diagonally, a bounded number of
/// times, so new windows never open perfectly stacked.
pub fn spawn_position(
    windows: &BTreeMap<ProcessId, WindowState>,
    preferred: Coordinate,
) -> Coordinate {
    let mut candidate = preferred;
    let mut attempts = 0;
    while attempts < MAX_SPAWN_NUDGE_ATTEMPTS
        && windows.values().any(|window| window.position == candidate)
    {
        candidate = candidate + Coordinate::new(SPAWN_NUDGE_OFFSET, SPAWN_NUDGE_OFFSET);
        attempts += 1;
    }
    candidate
}

/// Raises and activates `process_id`, reassigning every window a sequential
/// z-index. This is the only cross-entity reducer: the order is precomputed
/// once over the whole map, then each entity is rewritten independently.
///
/// `None` (or an id that no longer exists) deactivates every window and
/// leaves the stacking order untouched.
pub fn activate(windows: &mut BTreeMap<ProcessId, WindowState>, process_id: Option<ProcessId>) {
    let target = process_id.filter(|pid| windows.contains_key(pid));
    let Some(target) = target else {
        map_entities(windows, |_, window| {
            window.active.then(|| WindowState {
                active: false,
                ..window.clone()
            })
        });
        return;
    };

    map_entities_with(
        windows,
        |all| {
            let mut ordered: Vec<(ProcessId, u32)> = all
                .values()
                .filter(|window| window.process_id != target)
                .map(|window| (window.process_id, window.z_index))
                .collect();
            ordered.sort_by_key(|(_, z_index)| *z_index);
            let mut index_map: BTreeMap<ProcessId, u32> = ordered
                .iter()
                .enumerate()
                .map(|(index, (pid, _))| (*pid, index as u32 + 1))
                .collect();
            index_map.insert(target, all.len() as u32);
            index_map
        },
        |key, window, index_map| {
            let mut next = window.clone();
            next.z_index = index_map.get(key).copied().unwrap_or(0);
            next.active = *key == target;
            if *key == target && window.minimized.is_minimized() {
                next.minimized = Minimization::StartUnminimizing;
            }
            Some(next)
        },
    );
}

/// Kicks off the minimize animation; mid-transition and already-minimized
/// windows are left alone.
pub fn minimize(window: &mut WindowState) {
    if window.minimized == Minimization::False {
        window.minimized = Minimization::StartMinimizing;
        window.active = window.minimized.window_active();
    }
}

/// Kicks off the maximize animation from the fully restored state only.
pub fn maximize(window: &mut WindowState) {
    if window.maximized == Maximization::False {
        window.maximized = Maximization::StartMaximizing;
    }
}

/// Kicks off the restore animation from the fully maximized state only.
pub fn restore(window: &mut WindowState) {
    if window.maximized == Maximization::True {
        window.maximized = Maximization::StartRestoring;
    }
}

/// Applies a timed minimization step. Only the legal successor of the
/// current phase is accepted, so a timer that outlived its transition (the
/// user activated the window mid-animation) lands as a no-op.
pub fn set_minimized(window: &mut WindowState, phase: Minimization) -> bool {
    let legal = MINIMIZATION_STEPS.contains(&(window.minimized, phase));
    if legal {
        window.minimized = phase;
        window.active = phase.window_active();
    }
    legal
}

/// Applies a timed maximization step, same legality rule as
/// [`set_minimized`].
pub fn set_maximized(window: &mut WindowState, phase: Maximization) -> bool {
    let legal = MAXIMIZATION_STEPS.contains(&(window.maximized, phase));
    if legal {
        window.maximized = phase;
    }
    legal
}

/// Accumulates a drag delta onto the window position.
pub fn move_window(window: &mut WindowState, delta: Coordinate) {
    window.position = window.position + delta;
}

/// Applies an edge/corner resize. Each axis is accepted independently and
/// only when it stays at or above the minimum; the position moves only on
/// axes that actually resized, keeping the opposite edge stationary.
pub fn resize_window(window: &mut WindowState, data: &ResizeData) {
    if !window.resizable {
        return;
    }
    if data.width.is_none() && data.height.is_none() {
        return;
    }
    if let Some(width) = data.width {
        if width >= window.min_width {
            window.width = width;
            window.position.x += data.move_x;
        }
    }
    if let Some(height) = data.height {
        if height >= window.min_height {
            window.height = height;
            window.position.y += data.move_y;
        }
    }
}
