//! Protokoll der ausgeführten Commands samt ausgelöstem History-Schritt.
//!
//! Der Frame-Takt (`PumpAssetLoads`) wird nicht protokolliert.

use super::history::{Direction, HistoryStep};
use super::AppCommand;

/// Ein protokollierter Command.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub command: AppCommand,
    /// Schritt in der Undo-History, falls der Command den Roboter verändert hat
    pub history_step: Option<HistoryStep>,
}

/// Ausgeführte Commands in Reihenfolge.
#[derive(Debug, Default)]
pub struct CommandLog {
    entries: Vec<LogEntry>,
}

impl CommandLog {
    const MAX_ENTRIES: usize = 1000;

    pub fn new() -> Self {
        Self::default()
    }

    /// Hängt einen erfolgreich ausgeführten Command an.
    ///
    /// Bei vollem Log fällt die ältere Hälfte heraus.
    pub fn record(&mut self, command: AppCommand, history_step: Option<HistoryStep>) {
        if matches!(command, AppCommand::PumpAssetLoads) {
            return;
        }
        if self.entries.len() >= Self::MAX_ENTRIES {
            self.entries.drain(..Self::MAX_ENTRIES / 2);
        }
        if let Some(step) = history_step {
            log::debug!("{:?} → {} ({:?})", command, step.label, step.direction);
        }
        self.entries.push(LogEntry {
            command,
            history_step,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Zuletzt protokollierter Command.
    pub fn last_command(&self) -> Option<&AppCommand> {
        self.entries.last().map(|entry| &entry.command)
    }

    /// Verlauf der Roboter-Änderungen als `(Bezeichnung, Richtung)`.
    pub fn edit_trail(&self) -> impl Iterator<Item = (&'static str, Direction)> + '_ {
        self.entries
            .iter()
            .filter_map(|entry| entry.history_step)
            .map(|step| (step.label, step.direction))
    }
}
