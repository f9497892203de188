//! Plain-text rendering of the display and the history panel.

use calc_core::{HistoryEntry, InputState};
use std::fmt::Write as _;

/// Text shown when the visible history list is empty.
pub const EMPTY_HISTORY: &str = "No recent calculations";

/// Two-line display: pending equation prefix above the buffer.
pub fn render_display(state: &InputState) -> String {
    format!("  {}\n> {}", state.prefix().trim_end(), state.buffer())
}

/// Numbered history panel; positions are what `recall N` and `delete N` take.
pub fn render_history<'a>(entries: impl IntoIterator<Item = &'a HistoryEntry>) -> String {
    let mut out = String::from("History");
    let mut empty = true;
    for (index, entry) in entries.into_iter().enumerate() {
        empty = false;
        let _ = write!(out, "\n{:>3}. {} = {}", index + 1, entry.eq, entry.res);
        if entry.is_local() {
            out.push_str("  (not saved)");
        }
    }
    if empty {
        out.push_str("\n  ");
        out.push_str(EMPTY_HISTORY);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{render_display, render_history, EMPTY_HISTORY};
    use calc_core::{EntryId, HistoryEntry, InputState, Key, Operator};

    #[test]
    fn display_shows_prefix_then_buffer() {
        let mut state = InputState::new();
        state.press(Key::Digit(7));
        state.press(Key::Operator(Operator::Multiply));
        state.press(Key::Digit(3));
        assert_eq!(render_display(&state), "  7 *\n> 3");
    }

    #[test]
    fn empty_history_shows_placeholder() {
        let rendered = render_history(Vec::<&HistoryEntry>::new());
        assert!(rendered.ends_with(EMPTY_HISTORY));
    }

    #[test]
    fn history_lists_numbered_entries_and_marks_local_ones() {
        let entries = vec![
            HistoryEntry {
                id: EntryId::Local(1),
                eq: "2 + 2".to_string(),
                res: "4".to_string(),
            },
            HistoryEntry {
                id: EntryId::Remote("abc".to_string()),
                eq: "10 / 4".to_string(),
                res: "2.5".to_string(),
            },
        ];
        assert_eq!(
            render_history(&entries),
            "History\n  1. 2 + 2 = 4  (not saved)\n  2. 10 / 4 = 2.5"
        );
    }
}
