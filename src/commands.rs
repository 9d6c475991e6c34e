//! Command types for the Elm-style architecture
//!
//! Commands represent side effects that should be performed after an update.
//! Round trips report back through `Msg::Ordering`.

use crate::model::{CellKey, GroupOrderEntry, RecordId, RelationDetail, ViewId};
use crate::ordering::CommitId;

/// Commands returned by update functions
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cmd {
    /// No command - do nothing
    #[default]
    None,
    /// Request a redraw of the board
    Redraw,
    /// Schedule one animation-frame callback; the host answers with
    /// `DragMsg::AnimationFrame`
    RequestAnimationFrame,
    /// Write relation values on a record (detail service)
    /// Sends `OrderingMsg::DetailUpdated` when done
    UpdateRelationValues {
        commit: CommitId,
        record_id: RecordId,
        details: Vec<RelationDetail>,
    },
    /// Persist the full group sequence of a view
    /// Sends `OrderingMsg::OrderPersisted` when done
    PersistGroupOrder {
        commit: CommitId,
        view_id: ViewId,
        groups: Vec<GroupOrderEntry>,
    },
    /// Persist the record order of one cell
    /// Sends `OrderingMsg::OrderPersisted` when done
    PersistCellOrder {
        commit: CommitId,
        view_id: ViewId,
        cell: CellKey,
        ids: Vec<RecordId>,
    },
    /// Execute multiple commands
    Batch(Vec<Cmd>),
}

impl Cmd {
    /// Create a batch of commands, dropping no-ops
    pub fn batch(cmds: Vec<Cmd>) -> Self {
        let mut cmds: Vec<Cmd> = cmds.into_iter().filter(|c| *c != Cmd::None).collect();
        match cmds.len() {
            0 => Cmd::None,
            1 => cmds.remove(0),
            _ => Cmd::Batch(cmds),
        }
    }

    /// Check if this command requires a redraw
    pub fn needs_redraw(&self) -> bool {
        match self {
            Cmd::None => false,
            Cmd::Redraw => true,
            // The frame callback itself triggers the redraw
            Cmd::RequestAnimationFrame => false,
            // Results arrive as messages which redraw on their own
            Cmd::UpdateRelationValues { .. } => false,
            Cmd::PersistGroupOrder { .. } => false,
            Cmd::PersistCellOrder { .. } => false,
            Cmd::Batch(cmds) => cmds.iter().any(|c| c.needs_redraw()),
        }
    }

    /// Flatten nested batches into a list of leaf commands
    pub fn flatten(self) -> Vec<Cmd> {
        match self {
            Cmd::None => vec![],
            Cmd::Batch(cmds) => cmds.into_iter().flat_map(Cmd::flatten).collect(),
            other => vec![other],
        }
    }

    /// Whether this is an order-persistence call
    pub fn is_order_persist(&self) -> bool {
        matches!(
            self,
            Cmd::PersistGroupOrder { .. } | Cmd::PersistCellOrder { .. }
        )
    }
}
