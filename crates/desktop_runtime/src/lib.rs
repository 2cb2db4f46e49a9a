//! Window, shortcut and program lifecycle for the retro desktop shell.
//!
//! Everything is driven through the action/reducer contract: a
//! [`DesktopSession`] owns the state and dispatches [`DesktopAction`]s;
//! reducers are pure per-entity transitions and multi-phase animations are
//! ordinary actions scheduled on the session's software timers.

pub mod effects;
pub mod model;
pub mod programs;
pub mod reducer;
pub mod session;
pub mod shortcuts;
pub mod window_manager;

pub use effects::{derive_effects, Scheduled};
pub use model::*;
pub use programs::{installed_programs, ProgramDescriptor, ProgramId, WindowPreferences};
pub use reducer::{reduce_desktop, DesktopAction, ReducerError, WindowAction};
pub use session::DesktopSession;
