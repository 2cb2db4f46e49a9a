//! The installed-program catalog: window preferences per program plus the
//! hook that seeds program-specific state into a freshly spawned window.

use std::collections::BTreeMap;
use std::fmt;

use desktop_app_minesweeper::Game;
use desktop_common::Coordinate;
use serde::{Deserialize, Serialize};

use crate::model::{ProgramData, WindowState};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum ProgramId {
    Minesweeper,
    Unknown,
}

impl fmt::Display for ProgramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgramId::Minesweeper => f.write_str("minesweeper"),
            ProgramId::Unknown => f.write_str("unknown"),
        }
    }
}

/// Window preferences a program layers over [`WindowState::initial`] when it
/// spawns. Only the set fields override the defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowPreferences {
    pub title: Option<String>,
    pub title_bar_icon: Option<String>,
    pub position: Option<Coordinate>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub resizable: Option<bool>,
    pub fit_content: Option<bool>,
    pub show_help: Option<bool>,
}

impl WindowPreferences {
    pub fn apply(&self, window: &mut WindowState) {
        if let Some(title) = &self.title {
            window.title = title.clone();
        }
        if let Some(icon) = &self.title_bar_icon {
            window.title_bar_icon = Some(icon.clone());
        }
        if let Some(position) = self.position {
            window.position = position;
        }
        if let Some(width) = self.width {
            window.width = width;
        }
        if let Some(height) = self.height {
            window.height = height;
        }
        if let Some(resizable) = self.resizable {
            window.resizable = resizable;
        }
        if let Some(fit_content) = self.fit_content {
            window.fit_content = fit_content;
        }
        if let Some(show_help) = self.show_help {
            window.show_help = show_help;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramDescriptor {
    pub name: ProgramId,
    pub title: String,
    /// 48x48 desktop icon asset id.
    pub icon: Option<String>,
    /// 24x24 titlebar icon asset id.
    pub title_bar_icon: Option<String>,
    pub initial_window_state: WindowPreferences,
}

impl ProgramDescriptor {
    /// The per-program state attached to a spawned window. This is decided
    /// here, once, so the rest of the runtime can match on the tagged union
    /// instead of probing window contents.
    pub fn initial_program_data(&self) -> Option<ProgramData> {
        match self.name {
            ProgramId::Minesweeper => Some(ProgramData::Minesweeper(Game::default())),
            ProgramId::Unknown => None,
        }
    }
}

/// Programs installed on a fresh desktop.
pub fn installed_programs() -> BTreeMap<ProgramId, ProgramDescriptor> {
    BTreeMap::from([(
        ProgramId::Minesweeper,
        ProgramDescriptor {
            name: ProgramId::Minesweeper,
            title: "Minesweeper".to_string(),
            icon: Some("minesweeper-icon-large".to_string()),
            title_bar_icon: Some("minesweeper-icon-small".to_string()),
            initial_window_state: WindowPreferences {
                title: Some("Minesweeper".to_string()),
                title_bar_icon: Some("minesweeper-icon-small".to_string()),
                resizable: Some(false),
                fit_content: Some(true),
                ..WindowPreferences::default()
            },
        },
    )])
}
