//! Desktop shortcut placement: grid snapping and the collision-avoiding
//! walk that finds the next free cell.

use std::collections::{BTreeMap, BTreeSet};

use desktop_common::{Coordinate, Rect};

use crate::model::{ShortcutId, ShortcutState};
use crate::programs::{ProgramDescriptor, ProgramId};

/// Shortcut grid cell size.
pub const SHORTCUT_WIDTH: i32 = 75;
pub const SHORTCUT_HEIGHT: i32 = 50;

/// Upper bound on the free-cell walk; past this the last candidate is used
/// even if occupied (a workspace this full has no free cells anyway).
const MAX_PLACEMENT_ATTEMPTS: usize = 512;

/// Rounds an arbitrary drop coordinate to the nearest grid cell origin.
pub fn snap_shortcut_position(position: Coordinate) -> Coordinate {
    Coordinate::new(
        position.x - (position.x + SHORTCUT_WIDTH / 2).rem_euclid(SHORTCUT_WIDTH)
            + SHORTCUT_WIDTH / 2,
        position.y - (position.y + SHORTCUT_HEIGHT / 2).rem_euclid(SHORTCUT_HEIGHT)
            + SHORTCUT_HEIGHT / 2,
    )
}

/// Walks down the column starting at `start` (snapped), wrapping to the next
/// column at the workspace bottom, until a cell no existing shortcut sits on
/// is found.
pub fn next_shortcut_position(
    occupied: &BTreeSet<Coordinate>,
    workspace: &Rect,
    start: Coordinate,
) -> Coordinate {
    let mut candidate = snap_shortcut_position(start);
    let mut attempts = 0;
    while occupied.contains(&candidate) && attempts < MAX_PLACEMENT_ATTEMPTS {
        candidate.y += SHORTCUT_HEIGHT;
        if candidate.y + SHORTCUT_HEIGHT > workspace.y + workspace.h {
            candidate.y = snap_shortcut_position(Coordinate::new(0, workspace.y)).y;
            candidate.x += SHORTCUT_WIDTH;
        }
        attempts += 1;
    }
    candidate
}

/// Grid cells currently taken by shortcuts, minus any the caller excludes
/// (the ones being re-dropped).
pub fn occupied_cells(
    shortcuts: &BTreeMap<ShortcutId, ShortcutState>,
    exclude: &[ShortcutId],
) -> BTreeSet<Coordinate> {
    shortcuts
        .values()
        .filter(|shortcut| !exclude.contains(&shortcut.shortcut_id))
        .map(|shortcut| shortcut.position)
        .collect()
}

pub fn next_shortcut_id(shortcuts: &BTreeMap<ShortcutId, ShortcutState>) -> ShortcutId {
    ShortcutId(
        shortcuts
            .keys()
            .map(|id| id.0 + 1)
            .max()
            .unwrap_or(0),
    )
}

/// Builds the initial desktop shortcuts for the installed programs, placing
/// each on the next free grid cell from the top-left corner.
pub fn install_shortcuts(
    programs: &BTreeMap<ProgramId, ProgramDescriptor>,
    workspace: &Rect,
) -> BTreeMap<ShortcutId, ShortcutState> {
    let mut shortcuts = BTreeMap::new();
    let mut occupied = BTreeSet::new();
    for (index, descriptor) in programs.values().enumerate() {
        let position = next_shortcut_position(
            &occupied,
            workspace,
            Coordinate::new(workspace.x, workspace.y),
        );
        occupied.insert(position);
        let shortcut_id = ShortcutId(index as u64);
        shortcuts.insert(
            shortcut_id,
            ShortcutState {
                shortcut_id,
                name: descriptor
                    .initial_window_state
                    .title
                    .clone()
                    .unwrap_or_else(|| descriptor.title.clone()),
                program: descriptor.name,
                position,
                icon: descriptor
                    .icon
                    .clone()
                    .or_else(|| descriptor.title_bar_icon.clone()),
                selected: false,
                floating: false,
                renaming: false,
            },
        );
    }
    shortcuts
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn workspace() -> Rect {
        Rect::new(0, 0, 1024, 768)
    }

    #[test]
    fn snapping_rounds_to_the_nearest_cell_origin() {
        assert_eq!(
            snap_shortcut_position(Coordinate::new(0, 0)),
            Coordinate::new(0, 0)
        );
        assert_eq!(
            snap_shortcut_position(Coordinate::new(36, 24)),
            Coordinate::new(0, 0)
        );
        assert_eq!(
            snap_shortcut_position(Coordinate::new(40, 26)),
            Coordinate::new(75, 50)
        );
        assert_eq!(
            snap_shortcut_position(Coordinate::new(149, 99)),
            Coordinate::new(150, 100)
        );
    }

    #[test]
    fn the_next_position_is_never_an_occupied_cell() {
        let mut occupied = BTreeSet::new();
        for round in 0..40 {
            let position =
                next_shortcut_position(&occupied, &workspace(), Coordinate::new(0, 0));
            assert!(
                !occupied.contains(&position),
                "round {round} produced an occupied cell"
            );
            occupied.insert(position);
        }
    }

    #[test]
    fn a_full_column_wraps_to_the_next_one() {
        // 768px of workspace fit 15 rows of 50px cells.
        let occupied: BTreeSet<Coordinate> =
            (0..15).map(|row| Coordinate::new(0, row * 50)).collect();
        let position = next_shortcut_position(&occupied, &workspace(), Coordinate::new(0, 0));
        assert_eq!(position, Coordinate::new(75, 0));
    }

    #[test]
    fn placement_starts_from_the_drop_hint() {
        let occupied = BTreeSet::from([Coordinate::new(150, 100)]);
        let position =
            next_shortcut_position(&occupied, &workspace(), Coordinate::new(140, 95));
        assert_eq!(position, Coordinate::new(150, 150));
    }
}
