//! Display view over the win history: fastest first, annotated with the
//! matching preset name.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::WinData;
use crate::presets::GamePreset;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighscoreEntry {
    pub title: String,
    pub description: String,
    pub time_stamp: String,
    pub time: u64,
}

/// Sorts the win history by time ascending and labels each entry with the
/// name of the matching preset, or `"Custom"` when none matches.
pub fn highscore_entries(
    history: &[WinData],
    presets: &BTreeMap<String, GamePreset>,
) -> Vec<HighscoreEntry> {
    let mut entries: Vec<HighscoreEntry> = history
        .iter()
        .map(|win| {
            let title = presets
                .iter()
                .find(|(_, preset)| **preset == win.preset)
                .map(|(name, _)| name.clone())
                .unwrap_or_else(|| "Custom".to_string());
            HighscoreEntry {
                title,
                description: format!(
                    "{}size: {}*{}, mines: {}",
                    if win.cheated { "Debug " } else { "" },
                    win.preset.height,
                    win.preset.width,
                    win.preset.mine_count
                ),
                time_stamp: format_time_stamp(win.time),
                time: win.time,
            }
        })
        .collect();
    entries.sort_by_key(|entry| entry.time);
    entries
}

fn format_time_stamp(time_ms: u64) -> String {
    let seconds = time_ms / 1000;
    let minutes = seconds / 60;
    let remaining_seconds = seconds % 60;
    if minutes > 0 {
        format!("{minutes}m {remaining_seconds}s")
    } else {
        format!("{remaining_seconds}s")
    }
}
