//! Debug tracing infrastructure for development diagnostics
//!
//! # Usage
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=board_dnd::drag=trace` - per-move collision resolution
//! - `RUST_LOG=sequence=debug` - cell sequence diffs per message
//!
//! # Log Files
//!
//! Logs are written to `~/.config/board-dnd/logs/board-dnd.log` with daily rotation.
//! File logging uses debug level by default for more verbose troubleshooting.

use std::collections::BTreeMap;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::model::{BoardModel, CellKey, GroupId, RecordId, SubGroupId};

/// Initialize tracing subscriber with console and file logging
///
/// Console output respects RUST_LOG (default `warn`) and goes to stderr so
/// it never mixes with JSON printed on stdout.
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    // File layer - always debug level for troubleshooting
    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender = tracing_appender::rolling::daily(logs_dir, "board-dnd.log");
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}

/// Lightweight snapshot of the logical order for diffing
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceSnapshot {
    pub groups: Vec<GroupId>,
    pub lanes: Option<Vec<SubGroupId>>,
    pub cells: BTreeMap<CellKey, Vec<RecordId>>,
}

impl SequenceSnapshot {
    pub fn from_model(model: &BoardModel) -> Self {
        Self {
            groups: model.board.groups.iter().map(|g| g.id.clone()).collect(),
            lanes: model.lanes(),
            cells: model
                .records
                .cell_keys()
                .map(|cell| (cell.clone(), model.records.sequence(cell).to_vec()))
                .collect(),
        }
    }

    /// Generate a diff description between two snapshots
    pub fn diff(&self, other: &SequenceSnapshot) -> Option<String> {
        let mut changes = Vec::new();

        if self.groups != other.groups {
            changes.push(format!(
                "groups: {} → {}",
                join(&self.groups),
                join(&other.groups)
            ));
        }
        if self.lanes != other.lanes {
            changes.push(format!(
                "lanes: {} → {}",
                self.lanes.as_deref().map(join).unwrap_or_default(),
                other.lanes.as_deref().map(join).unwrap_or_default()
            ));
        }

        let empty = Vec::new();
        let keys: std::collections::BTreeSet<_> =
            self.cells.keys().chain(other.cells.keys()).collect();
        for cell in keys {
            let before = self.cells.get(cell).unwrap_or(&empty);
            let after = other.cells.get(cell).unwrap_or(&empty);
            if before != after {
                changes.push(format!("{}: {} → {}", cell, join(before), join(after)));
            }
        }

        if changes.is_empty() {
            None
        } else {
            Some(changes.join("; "))
        }
    }
}

fn join<T: std::fmt::Display>(ids: &[T]) -> String {
    let parts: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
    format!("[{}]", parts.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(cells: &[(&str, &[&str])]) -> SequenceSnapshot {
        SequenceSnapshot {
            groups: vec!["g1".into(), "g2".into()],
            lanes: None,
            cells: cells
                .iter()
                .map(|(cell, ids)| {
                    (
                        CellKey::column(*cell),
                        ids.iter().map(|s| RecordId::new(*s)).collect(),
                    )
                })
                .collect(),
        }
    }

    #[test]
    fn test_diff_reports_changed_cells_only() {
        let before = snapshot(&[("g1", &["a", "b"]), ("g2", &["x"])]);
        let after = snapshot(&[("g1", &["b", "a"]), ("g2", &["x"])]);

        assert_eq!(before.diff(&after).as_deref(), Some("g1: [a,b] → [b,a]"));
        assert_eq!(before.diff(&before), None);
    }

    #[test]
    fn test_diff_treats_missing_cell_as_empty() {
        let before = snapshot(&[("g1", &["a"])]);
        let after = snapshot(&[("g1", &[]), ("g2", &["a"])]);

        assert_eq!(
            before.diff(&after).as_deref(),
            Some("g1: [a] → []; g2: [] → [a]")
        );
    }
}
