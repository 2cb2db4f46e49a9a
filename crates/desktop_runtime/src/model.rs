use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use desktop_app_minesweeper::Game;
use desktop_common::{Coordinate, Rect};
use serde::de::{Error as _, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::programs::{installed_programs, ProgramDescriptor, ProgramId};
use crate::shortcuts;

/// Delay between the phases of a minimize/maximize animation.
pub const ANIMATION_TIME_MS: u64 = 150;

/// Identifier of one spawned program instance. Numeric internally, but
/// serialized as its decimal string so it doubles as a map key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProcessId(pub u64);

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProcessId {
    type Err = std::num::ParseIntError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        raw.parse().map(ProcessId)
    }
}

impl Serialize for ProcessId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ProcessId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(D::Error::custom)
    }
}

/// The element identifier a window or its taskbar button renders under.
pub fn format_pid(process_id: ProcessId, variant: Option<&str>) -> String {
    match variant {
        Some(variant) => format!("pid{process_id}-{variant}"),
        None => format!("pid{process_id}"),
    }
}

/// Identifier of one desktop shortcut, allocated like process ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShortcutId(pub u64);

impl fmt::Display for ShortcutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for ShortcutId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ShortcutId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map(ShortcutId).map_err(D::Error::custom)
    }
}

/// Minimization runs through an animated four-step cycle; the terminal
/// states serialize as booleans, the transitional ones as kebab-case names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Minimization {
    #[default]
    False,
    StartMinimizing,
    Minimizing,
    StartUnminimizing,
    Unminimizing,
    True,
}

impl Minimization {
    pub fn is_minimized(self) -> bool {
        self == Minimization::True
    }

    /// A window counts as active only when it is neither minimizing nor
    /// fully minimized.
    pub fn window_active(self) -> bool {
        !matches!(
            self,
            Minimization::True | Minimization::StartMinimizing | Minimization::Minimizing
        )
    }

    /// `(mid_phase, terminal)` for a `start-*` phase, `None` otherwise.
    pub fn animation_steps(self) -> Option<(Minimization, Minimization)> {
        match self {
            Minimization::StartMinimizing => Some((Minimization::Minimizing, Minimization::True)),
            Minimization::StartUnminimizing => {
                Some((Minimization::Unminimizing, Minimization::False))
            }
            _ => None,
        }
    }
}

/// Legal phase advances; a timed step that no longer matches is dropped.
pub const MINIMIZATION_STEPS: [(Minimization, Minimization); 4] = [
    (Minimization::StartMinimizing, Minimization::Minimizing),
    (Minimization::Minimizing, Minimization::True),
    (Minimization::StartUnminimizing, Minimization::Unminimizing),
    (Minimization::Unminimizing, Minimization::False),
];

impl Serialize for Minimization {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Minimization::False => serializer.serialize_bool(false),
            Minimization::True => serializer.serialize_bool(true),
            Minimization::StartMinimizing => serializer.serialize_str("start-minimizing"),
            Minimization::Minimizing => serializer.serialize_str("minimizing"),
            Minimization::StartUnminimizing => serializer.serialize_str("start-unminimizing"),
            Minimization::Unminimizing => serializer.serialize_str("unminimizing"),
        }
    }
}

impl<'de> Deserialize<'de> for Minimization {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MinimizationVisitor;

        impl Visitor<'_> for MinimizationVisitor {
            type Value = Minimization;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a bool or a minimization phase name")
            }

            fn visit_bool<E: serde::de::Error>(self, value: bool) -> Result<Self::Value, E> {
                Ok(if value {
                    Minimization::True
                } else {
                    Minimization::False
                })
            }

            fn visit_str<E: serde::de::Error>(self, value: &str) -> Result<Self::Value, E> {
                match value {
                    "start-minimizing" => Ok(Minimization::StartMinimizing),
                    "minimizing" => Ok(Minimization::Minimizing),
                    "start-unminimizing" => Ok(Minimization::StartUnminimizing),
                    "unminimizing" => Ok(Minimization::Unminimizing),
                    other => Err(E::unknown_variant(
                        other,
                        &[
                            "start-minimizing",
                            "minimizing",
                            "start-unminimizing",
                            "unminimizing",
                        ],
                    )),
                }
            }
        }

        deserializer.deserialize_any(MinimizationVisitor)
    }
}

/// Maximization mirrors [`Minimization`] with a restore path back down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Maximization {
    #[default]
    False,
    StartMaximizing,
    Maximizing,
    StartRestoring,
    Restoring,
    True,
}

impl Maximization {
    pub fn is_maximized(self) -> bool {
        self == Maximization::True
    }

    /// `(mid_phase, terminal)` for a `start-*` phase, `None` otherwise.
    pub fn animation_steps(self) -> Option<(Maximization, Maximization)> {
        match self {
            Maximization::StartMaximizing => Some((Maximization::Maximizing, Maximization::True)),
            Maximization::StartRestoring => Some((Maximization::Restoring, Maximization::False)),
            _ => None,
        }
    }
}

/// Legal phase advances for the maximize/restore animation.
pub const MAXIMIZATION_STEPS: [(Maximization, Maximization); 4] = [
    (Maximization::StartMaximizing, Maximization::Maximizing),
    (Maximization::Maximizing, Maximization::True),
    (Maximization::StartRestoring, Maximization::Restoring),
    (Maximization::Restoring, Maximization::False),
];

impl Serialize for Maximization {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Maximization::False => serializer.serialize_bool(false),
            Maximization::True => serializer.serialize_bool(true),
            Maximization::StartMaximizing => serializer.serialize_str("start-maximizing"),
            Maximization::Maximizing => serializer.serialize_str("maximizing"),
            Maximization::StartRestoring => serializer.serialize_str("start-restoring"),
            Maximization::Restoring => serializer.serialize_str("restoring"),
        }
    }
}

impl<'de> Deserialize<'de> for Maximization {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MaximizationVisitor;

        impl Visitor<'_> for MaximizationVisitor {
            type Value = Maximization;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a bool or a maximization phase name")
            }

            fn visit_bool<E: serde::de::Error>(self, value: bool) -> Result<Self::Value, E> {
                Ok(if value {
                    Maximization::True
                } else {
                    Maximization::False
                })
            }

            fn visit_str<E: serde::de::Error>(self, value: &str) -> Result<Self::Value, E> {
                match value {
                    "start-maximizing" => Ok(Maximization::StartMaximizing),
                    "maximizing" => Ok(Maximization::Maximizing),
                    "start-restoring" => Ok(Maximization::StartRestoring),
                    "restoring" => Ok(Maximization::Restoring),
                    other => Err(E::unknown_variant(
                        other,
                        &[
                            "start-maximizing",
                            "maximizing",
                            "start-restoring",
                            "restoring",
                        ],
                    )),
                }
            }
        }

        deserializer.deserialize_any(MaximizationVisitor)
    }
}

/// Program-specific state attached to a window at spawn time. An explicit
/// tagged union, decided once by the program registry rather than probed
/// structurally at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProgramData {
    Minesweeper(Game),
}

impl ProgramData {
    pub fn as_minesweeper(&self) -> Option<&Game> {
        match self {
            ProgramData::Minesweeper(game) => Some(game),
        }
    }

    pub fn as_minesweeper_mut(&mut self) -> Option<&mut Game> {
        match self {
            ProgramData::Minesweeper(game) => Some(game),
        }
    }
}

/// Geometry change produced by an edge or corner drag. Width/height are the
/// candidate sizes; the move deltas keep the opposite edge stationary when
/// resizing from the top or left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResizeData {
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub move_x: i32,
    pub move_y: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowState {
    pub process_id: ProcessId,
    pub program: Option<ProgramId>,
    pub title: String,
    pub title_bar_icon: Option<String>,
    pub active: bool,
    pub position: Coordinate,
    pub width: i32,
    pub height: i32,
    pub min_width: i32,
    pub min_height: i32,
    pub z_index: u32,
    pub maximized: Maximization,
    pub minimized: Minimization,
    pub resizable: bool,
    pub show_minimize: bool,
    pub minimize_enabled: bool,
    pub show_maximize: bool,
    pub maximize_enabled: bool,
    pub show_close: bool,
    pub close_enabled: bool,
    pub show_help: bool,
    pub help_enabled: bool,
    /// Size the window to its content instead of the stored width/height.
    pub fit_content: bool,
    pub invisible: bool,
    pub program_data: Option<ProgramData>,
}

impl WindowState {
    /// The state every window starts from before program preferences and
    /// spawn bookkeeping are merged over it.
    pub fn initial(process_id: ProcessId) -> Self {
        Self {
            process_id,
            program: None,
            title: "...".to_string(),
            title_bar_icon: None,
            active: true,
            position: Coordinate::new(200, 200),
            width: 80,
            height: 100,
            min_width: 120,
            // Titlebar and menubar together.
            min_height: 45,
            z_index: 10,
            maximized: Maximization::False,
            minimized: Minimization::False,
            resizable: true,
            show_minimize: true,
            minimize_enabled: true,
            show_maximize: true,
            maximize_enabled: true,
            show_close: true,
            close_enabled: true,
            show_help: false,
            help_enabled: false,
            fit_content: false,
            invisible: false,
            program_data: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortcutState {
    pub shortcut_id: ShortcutId,
    pub name: String,
    pub program: ProgramId,
    pub position: Coordinate,
    pub icon: Option<String>,
    pub selected: bool,
    /// Mid-drag: the shortcut follows the pointer and is not grid-snapped.
    pub floating: bool,
    pub renaming: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemeKind {
    W2k,
    W98,
}

impl SchemeKind {
    pub fn toggled(self) -> Self {
        match self {
            SchemeKind::W2k => SchemeKind::W98,
            SchemeKind::W98 => SchemeKind::W2k,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesktopScheme {
    pub kind: SchemeKind,
}

/// The aggregate root: one instance per running desktop session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesktopState {
    pub windows: BTreeMap<ProcessId, WindowState>,
    pub programs: BTreeMap<ProgramId, ProgramDescriptor>,
    pub shortcuts: BTreeMap<ShortcutId, ShortcutState>,
    pub active_process_id: Option<ProcessId>,
    pub last_spawned: Option<ProcessId>,
    pub start_menu_open: bool,
    pub active_scheme: DesktopScheme,
    /// Area available for windows and shortcut placement (excludes the
    /// taskbar); hosts update it on viewport changes.
    pub workspace: Rect,
}

impl Default for DesktopState {
    fn default() -> Self {
        let programs = installed_programs();
        let workspace = Rect::new(0, 0, 1024, 768);
        let shortcuts = shortcuts::install_shortcuts(&programs, &workspace);
        Self {
            windows: BTreeMap::new(),
            programs,
            shortcuts,
            active_process_id: None,
            last_spawned: None,
            start_menu_open: false,
            active_scheme: DesktopScheme {
                kind: SchemeKind::W2k,
            },
            workspace,
        }
    }
}
