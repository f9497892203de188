//! One interactive calculator session.
//!
//! # Responsibility
//! - Route parsed commands to the input state machine and the history
//!   synchronizer.
//! - Persist every successful evaluation.
//!
//! # Invariants
//! - Store failures are reported as text and never end the session.
//! - A failed evaluation is never saved.

use crate::command::{Command, HELP};
use crate::render::{render_display, render_history};
use calc_core::{EntryId, HistoryRemote, HistorySynchronizer, InputState, Key, SaveOutcome};
use log::info;

/// What the REPL should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Print this text and read the next line.
    Continue(String),
    Quit,
}

pub struct Session<R: HistoryRemote> {
    state: InputState,
    history: HistorySynchronizer<R>,
}

impl<R: HistoryRemote> Session<R> {
    pub fn new(remote: R) -> Self {
        Self {
            state: InputState::new(),
            history: HistorySynchronizer::new(remote),
        }
    }

    pub fn state(&self) -> &InputState {
        &self.state
    }

    pub fn history(&self) -> &HistorySynchronizer<R> {
        &self.history
    }

    /// Loads the history panel and returns the initial screen.
    pub async fn start(&mut self) -> String {
        let mut out = String::new();
        if let Err(err) = self.history.refresh().await {
            out.push_str(&format!("history unavailable: {err}\n"));
        }
        out.push_str(&render_history(self.history.entries()));
        out.push('\n');
        out.push_str(&render_display(&self.state));
        info!(
            "event=session_start module=cli status=ok entries={}",
            self.history.len()
        );
        out
    }

    pub async fn handle(&mut self, command: Command) -> Step {
        let text = match command {
            Command::Keys(keys) => self.press_keys(keys).await,
            Command::History => {
                if let Err(err) = self.history.refresh().await {
                    format!(
                        "history unavailable: {err}\n{}",
                        render_history(self.history.entries())
                    )
                } else {
                    render_history(self.history.entries())
                }
            }
            Command::Recall(position) => {
                let recalled = self
                    .entry_id(position)
                    .is_some_and(|id| self.history.recall_into(&id, &mut self.state));
                if recalled {
                    render_display(&self.state)
                } else {
                    no_entry(position)
                }
            }
            Command::Delete(position) => match self.entry_id(position) {
                Some(id) => match self.history.delete(&id).await {
                    Ok(()) => render_history(self.history.entries()),
                    Err(err) => format!("could not delete entry {position}: {err}"),
                },
                None => no_entry(position),
            },
            Command::ClearHistory => match self.history.clear().await {
                Ok(()) => render_history(self.history.entries()),
                Err(err) => format!("could not clear history: {err}"),
            },
            Command::Help => HELP.to_string(),
            Command::Quit => return Step::Quit,
        };
        Step::Continue(text)
    }

    async fn press_keys(&mut self, keys: Vec<Key>) -> String {
        let mut notes = Vec::new();
        for key in keys {
            let Some(calculation) = self.state.press(key) else {
                continue;
            };
            let equation = calculation.equation.clone();
            if let SaveOutcome::LocalFallback(_) = self.history.save(calculation).await {
                notes.push(format!("history store unavailable; `{equation}` kept locally"));
            }
            notes.push(render_history(self.history.entries()));
        }
        notes.push(render_display(&self.state));
        notes.join("\n")
    }

    fn entry_id(&self, position: usize) -> Option<EntryId> {
        self.history
            .entries()
            .nth(position.checked_sub(1)?)
            .map(|entry| entry.id.clone())
    }
}

fn no_entry(position: usize) -> String {
    format!("no history entry {position}")
}

#[cfg(test)]
mod tests {
    use super::{Session, Step};
    use crate::command::Command;
    use async_trait::async_trait;
    use calc_core::{HistoryRemote, NewCalculation, RemoteCalculation, RemoteError};
    use std::sync::Mutex;

    /// In-memory store; `offline` simulates an unreachable server.
    #[derive(Default)]
    struct MemoryRemote {
        records: Mutex<Vec<RemoteCalculation>>,
        offline: bool,
    }

    impl MemoryRemote {
        fn check(&self) -> Result<(), RemoteError> {
            if self.offline {
                Err(RemoteError::Transport("connection refused".to_string()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl HistoryRemote for MemoryRemote {
        async fn fetch_recent(&self) -> Result<Vec<RemoteCalculation>, RemoteError> {
            self.check()?;
            Ok(self.records.lock().unwrap().iter().rev().cloned().collect())
        }

        async fn create(&self, calc: &NewCalculation) -> Result<RemoteCalculation, RemoteError> {
            self.check()?;
            let mut records = self.records.lock().unwrap();
            let record = RemoteCalculation {
                id: format!("id-{}", records.len()),
                equation: calc.equation.clone(),
                result: calc.result.clone(),
            };
            records.push(record.clone());
            Ok(record)
        }

        async fn delete(&self, id: &str) -> Result<(), RemoteError> {
            self.check()?;
            let mut records = self.records.lock().unwrap();
            let before = records.len();
            records.retain(|record| record.id != id);
            if records.len() == before {
                return Err(RemoteError::Status {
                    code: 404,
                    message: "Not found".to_string(),
                });
            }
            Ok(())
        }

        async fn clear(&self) -> Result<(), RemoteError> {
            self.check()?;
            self.records.lock().unwrap().clear();
            Ok(())
        }
    }

    fn line(text: &str) -> Command {
        text.parse().unwrap()
    }

    fn output(step: Step) -> String {
        match step {
            Step::Continue(text) => text,
            Step::Quit => panic!("unexpected quit"),
        }
    }

    #[tokio::test]
    async fn equals_saves_and_shows_history() {
        let mut session = Session::new(MemoryRemote::default());
        assert!(session.start().await.contains("No recent calculations"));

        let text = output(session.handle(line("12 + 4 =")).await);
        assert!(text.contains("1. 12 + 4 = 16"));
        assert!(text.ends_with("> 16"));
        assert_eq!(session.history().len(), 1);
    }

    #[tokio::test]
    async fn failed_evaluation_is_not_saved() {
        let mut session = Session::new(MemoryRemote::default());
        let text = output(session.handle(line("1 . 2 + . =")).await);
        assert!(text.ends_with("> Error"));
        assert!(session.history().is_empty());
    }

    #[tokio::test]
    async fn offline_save_is_reported_and_kept_locally() {
        let mut session = Session::new(MemoryRemote {
            offline: true,
            ..MemoryRemote::default()
        });
        let text = output(session.handle(line("2 * 3 =")).await);
        assert!(text.contains("kept locally"));
        assert!(text.contains("2 * 3 = 6  (not saved)"));
    }

    #[tokio::test]
    async fn recall_and_delete_use_visible_positions() {
        let mut session = Session::new(MemoryRemote::default());
        session.handle(line("10 / 4 =")).await;
        session.handle(line("AC")).await;

        let text = output(session.handle(line("recall 1")).await);
        assert!(text.ends_with("> 2.5"));
        assert_eq!(session.state().buffer(), "2.5");

        let text = output(session.handle(line("recall 2")).await);
        assert_eq!(text, "no history entry 2");

        let text = output(session.handle(line("delete 1")).await);
        assert!(text.contains("No recent calculations"));
    }

    #[tokio::test]
    async fn clear_history_and_quit() {
        let mut session = Session::new(MemoryRemote::default());
        session.handle(line("1 + 1 =")).await;
        session.handle(line("clear-history")).await;
        assert!(session.history().is_empty());
        assert_eq!(session.handle(Command::Quit).await, Step::Quit);
    }
}
