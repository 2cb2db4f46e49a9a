//! The desktop session: owns the state, the seeded RNG and the software
//! timer queue. Dispatch applies the reducer, drains immediate follow-ups in
//! FIFO order and arms delayed ones; `advance` moves the virtual clock and
//! delivers due timers in `(time, insertion)` order. Hosts drive `advance`
//! from real time; tests drive it directly.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};

use desktop_app_minesweeper::{GameAction, TIME_TICKRATE_MS};
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::effects::{derive_effects, ongoing_games, Scheduled};
use crate::model::DesktopState;
use crate::programs::ProgramId;
use crate::reducer::{reduce_desktop, DesktopAction};

#[derive(Debug, Clone)]
struct TimerEntry {
    due: u64,
    seq: u64,
    action: DesktopAction,
}

impl PartialEq for TimerEntry {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl Eq for TimerEntry {}

impl Ord for TimerEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.due, self.seq).cmp(&(other.due, other.seq))
    }
}

impl PartialOrd for TimerEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// One running desktop. Constructed at startup and passed by handle to
/// whatever hosts it; there are no ambient globals.
pub struct DesktopSession {
    state: DesktopState,
    rng: StdRng,
    now_ms: u64,
    seq: u64,
    timers: BinaryHeap<Reverse<TimerEntry>>,
    /// Set on the first pointer-down; until then a starting game clock
    /// pre-seeds its first tick with zero delay.
    clock_primed: bool,
}

impl DesktopSession {
    pub fn new(seed: u64) -> Self {
        Self::with_state(DesktopState::default(), seed)
    }

    pub fn with_state(state: DesktopState, seed: u64) -> Self {
        Self {
            state,
            rng: StdRng::seed_from_u64(seed),
            now_ms: 0,
            seq: 0,
            timers: BinaryHeap::new(),
            clock_primed: false,
        }
    }

    pub fn state(&self) -> &DesktopState {
        &self.state
    }

    pub fn now(&self) -> u64 {
        self.now_ms
    }

    /// Brings a fresh or hydrated desktop to its running shape: spawns
    /// Minesweeper if no instance exists yet and resumes the clock of any
    /// game that was ongoing when the state was captured.
    pub fn boot(&mut self) {
        let minesweeper_spawned = self
            .state
            .windows
            .values()
            .any(|window| window.program == Some(ProgramId::Minesweeper));
        if !minesweeper_spawned {
            self.dispatch(DesktopAction::SpawnProgram(ProgramId::Minesweeper));
        }
        for process_id in ongoing_games(&self.state) {
            self.schedule_after(
                0,
                DesktopAction::Game {
                    process_id,
                    action: GameAction::IncrementTimer(TIME_TICKRATE_MS),
                },
            );
        }
        self.advance(0);
    }

    /// Applies the action and every immediate follow-up it produces, in
    /// dispatch order. Actions the reducer rejects are logged and dropped;
    /// their follow-ups never run.
    pub fn dispatch(&mut self, action: DesktopAction) {
        let mut queue = VecDeque::from([action]);
        while let Some(action) = queue.pop_front() {
            if matches!(
                &action,
                DesktopAction::Game {
                    action: GameAction::StartFire(_),
                    ..
                }
            ) {
                self.clock_primed = true;
            }

            let prev = self.state.clone();
            if let Err(error) = reduce_desktop(&mut self.state, &action, &mut self.rng) {
                warn!("dropped action: {error}");
                continue;
            }

            let first_tick_delay = if self.clock_primed { TIME_TICKRATE_MS } else { 0 };
            for entry in derive_effects(&action, &prev, &self.state, first_tick_delay) {
                match entry {
                    Scheduled::Now(follow_up) => queue.push_back(follow_up),
                    Scheduled::After { delay_ms, action } => {
                        self.schedule_after(delay_ms, action)
                    }
                }
            }
        }
    }

    /// Moves the virtual clock forward, delivering every timer that comes
    /// due on the way, in order. Timers dispatched from timers land in the
    /// same pass when they fall inside the window.
    pub fn advance(&mut self, ms: u64) {
        let target = self.now_ms + ms;
        loop {
            let due = match self.timers.peek() {
                Some(Reverse(entry)) if entry.due <= target => entry.due,
                _ => break,
            };
            let Some(Reverse(entry)) = self.timers.pop() else {
                break;
            };
            self.now_ms = due;
            debug!("timer fired at {}ms", self.now_ms);
            self.dispatch(entry.action);
        }
        self.now_ms = target;
    }

    /// Serializes the desktop state for a persistence plugin to store.
    pub fn snapshot(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.state)
    }

    /// Restores a session from a stored snapshot. Call [`Self::boot`]
    /// afterwards to resume game clocks and re-guarantee the installed
    /// programs.
    pub fn from_snapshot(raw: &str, seed: u64) -> serde_json::Result<Self> {
        Ok(Self::with_state(serde_json::from_str(raw)?, seed))
    }

    fn schedule_after(&mut self, delay_ms: u64, action: DesktopAction) {
        let entry = TimerEntry {
            due: self.now_ms + delay_ms,
            seq: self.seq,
            action,
        };
        self.seq += 1;
        self.timers.push(Reverse(entry));
    }
}
