//! Ordering engine - applies resolved drops to the logical model
//!
//! Column moves relocate a group in the full group sequence. Card moves
//! either reorder one cell or transfer a record between cells. Every move
//! that needs a round trip gets a [`CommitId`]; its result comes back
//! through [`OrderingEngine::detail_updated`] or
//! [`OrderingEngine::order_persisted`].
//!
//! Cross-cell transfers write the relation value first and the orders only
//! after the detail update is acknowledged. The relation value decides which
//! cell a record belongs to, so ordering it into a cell it does not yet
//! belong to would flash.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::commands::Cmd;
use crate::error::DragError;
use crate::model::{
    array_move, reindex, Board, CellKey, Group, GroupId, PriorValues, RecordId, RecordStore,
    RelationDetail, ViewConfig,
};

/// Ticket of a move awaiting a round trip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CommitId(pub u64);

/// A card drop as handed over by the drag session
#[derive(Debug, Clone, PartialEq)]
pub struct CardMove {
    pub record_id: RecordId,
    pub source: CellKey,
    pub target: CellKey,
    /// Final index in the target cell (already corrected for removal when
    /// source and target are the same cell)
    pub new_index: usize,
}

impl CardMove {
    pub fn is_cross_cell(&self) -> bool {
        self.source != self.target
    }
}

#[derive(Debug, Clone)]
enum PendingCommit {
    /// Applied optimistically; `previous` restores it on failure
    Column { previous: Vec<Group> },
    /// Applied once the persist is acknowledged, against the cell as it is
    /// then; later drops may have changed it in the meantime
    SameCell {
        cell: CellKey,
        record: RecordId,
        new_index: usize,
    },
    /// Membership and values already moved; restored if the detail update fails
    CrossCellDetail {
        record: RecordId,
        source: CellKey,
        source_index: usize,
        target: CellKey,
        previous_values: PriorValues,
    },
    /// Detail update done, waiting on the two order persists
    CrossCellOrder { awaiting: usize },
}

#[derive(Debug, Default)]
pub struct OrderingEngine {
    next_commit: u64,
    pending: HashMap<CommitId, PendingCommit>,
}

impl OrderingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_commit(&mut self) -> CommitId {
        self.next_commit += 1;
        CommitId(self.next_commit)
    }

    /// Number of moves still waiting on a round trip
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, commit: CommitId) -> bool {
        self.pending.contains_key(&commit)
    }

    /// Relocate a group within the full group sequence and persist it
    pub fn apply_column_move(
        &mut self,
        view: &ViewConfig,
        board: &mut Board,
        group_id: &GroupId,
        new_index: usize,
    ) -> Result<Cmd, DragError> {
        let current = board
            .group_position(group_id)
            .ok_or_else(|| DragError::not_found(format!("group {}", group_id)))?;
        let new_index = new_index.min(board.groups.len().saturating_sub(1));
        if current == new_index {
            return Ok(Cmd::None);
        }

        let previous = board.groups.clone();
        array_move(&mut board.groups, current, new_index);
        reindex(&mut board.groups);

        let commit = self.next_commit();
        self.pending
            .insert(commit, PendingCommit::Column { previous });
        tracing::debug!(group = %group_id, from = current, to = new_index, ?commit, "column moved");

        Ok(Cmd::batch(vec![
            Cmd::PersistGroupOrder {
                commit,
                view_id: view.id.clone(),
                groups: board.order_entries(),
            },
            Cmd::Redraw,
        ]))
    }

    /// Apply a card drop: same-cell reorder or cross-cell transfer
    pub fn apply_card_move(
        &mut self,
        view: &ViewConfig,
        board: &Board,
        store: &mut RecordStore,
        mv: CardMove,
    ) -> Result<Cmd, DragError> {
        let current = store
            .position(&mv.source, &mv.record_id)
            .ok_or_else(|| DragError::not_found(format!("{} in {}", mv.record_id, mv.source)))?;

        if mv.is_cross_cell() {
            self.transfer(view, board, store, mv, current)
        } else {
            Ok(self.reorder(view, store, mv, current))
        }
    }

    fn reorder(
        &mut self,
        view: &ViewConfig,
        store: &RecordStore,
        mv: CardMove,
        current: usize,
    ) -> Cmd {
        let len = store.sequence(&mv.source).len();
        let new_index = mv.new_index.min(len.saturating_sub(1));
        if new_index == current {
            tracing::trace!(record = %mv.record_id, "drop onto own slot, nothing to do");
            return Cmd::None;
        }

        let mut ids = store.sequence(&mv.source).to_vec();
        array_move(&mut ids, current, new_index);

        let commit = self.next_commit();
        self.pending.insert(
            commit,
            PendingCommit::SameCell {
                cell: mv.source.clone(),
                record: mv.record_id.clone(),
                new_index,
            },
        );
        tracing::debug!(
            record = %mv.record_id,
            cell = %mv.source,
            from = current,
            to = new_index,
            ?commit,
            "card reordered"
        );

        Cmd::PersistCellOrder {
            commit,
            view_id: view.id.clone(),
            cell: mv.source,
            ids,
        }
    }

    fn transfer(
        &mut self,
        view: &ViewConfig,
        board: &Board,
        store: &mut RecordStore,
        mv: CardMove,
        current: usize,
    ) -> Result<Cmd, DragError> {
        let details = transfer_details(view, board, &mv)?;

        let previous_values = store
            .set_relation_values(&mv.record_id, &details)
            .ok_or_else(|| DragError::not_found(format!("record {}", mv.record_id)))?;
        store.remove_from_cell(&mv.source, &mv.record_id);
        let inserted = store.insert_into_cell(&mv.target, mv.record_id.clone(), mv.new_index);

        let commit = self.next_commit();
        tracing::debug!(
            record = %mv.record_id,
            from = %mv.source,
            to = %mv.target,
            index = inserted,
            ?commit,
            "card transferred, awaiting detail update"
        );
        self.pending.insert(
            commit,
            PendingCommit::CrossCellDetail {
                record: mv.record_id.clone(),
                source: mv.source,
                source_index: current,
                target: mv.target,
                previous_values,
            },
        );

        Ok(Cmd::batch(vec![
            Cmd::UpdateRelationValues {
                commit,
                record_id: mv.record_id,
                details,
            },
            Cmd::Redraw,
        ]))
    }

    /// Detail update acknowledged (or failed) for a cross-cell transfer
    ///
    /// On success both cells' current sequences are persisted. On failure
    /// the record goes back to its old slot with its old values and no order
    /// call is made.
    pub fn detail_updated(
        &mut self,
        view: &ViewConfig,
        store: &mut RecordStore,
        commit: CommitId,
        result: Result<(), DragError>,
    ) -> Cmd {
        let Some(PendingCommit::CrossCellDetail {
            record,
            source,
            source_index,
            target,
            previous_values,
        }) = self.pending.remove(&commit)
        else {
            tracing::warn!(?commit, "detail update for unknown commit");
            return Cmd::None;
        };

        match result {
            Ok(()) => {
                let commit = self.next_commit();
                self.pending
                    .insert(commit, PendingCommit::CrossCellOrder { awaiting: 2 });
                Cmd::batch(vec![
                    Cmd::PersistCellOrder {
                        commit,
                        view_id: view.id.clone(),
                        ids: store.sequence(&source).to_vec(),
                        cell: source,
                    },
                    Cmd::PersistCellOrder {
                        commit,
                        view_id: view.id.clone(),
                        ids: store.sequence(&target).to_vec(),
                        cell: target,
                    },
                ])
            }
            Err(e) => {
                tracing::warn!(record = %record, ?commit, error = %e, "detail update failed, reverting transfer");
                // A later drop that moved the record on owns its cell and values
                if store.remove_from_cell(&target, &record).is_none() {
                    tracing::debug!(
                        record = %record,
                        cell = %target,
                        "record already left target cell, nothing to revert"
                    );
                    return Cmd::None;
                }
                store.insert_into_cell(&source, record.clone(), source_index);
                store.restore_relation_values(&record, &previous_values);
                Cmd::Redraw
            }
        }
    }

    /// Order persist acknowledged (or failed)
    pub fn order_persisted(
        &mut self,
        board: &mut Board,
        store: &mut RecordStore,
        commit: CommitId,
        result: Result<(), DragError>,
    ) -> Cmd {
        let Some(pending) = self.pending.remove(&commit) else {
            tracing::warn!(?commit, "order persist for unknown commit");
            return Cmd::None;
        };

        match (pending, result) {
            (PendingCommit::Column { .. }, Ok(())) => Cmd::None,
            (PendingCommit::Column { previous }, Err(e)) => {
                tracing::warn!(?commit, error = %e, "group order persist failed, reverting");
                board.groups = previous;
                Cmd::Redraw
            }
            (
                PendingCommit::SameCell {
                    cell,
                    record,
                    new_index,
                },
                Ok(()),
            ) => {
                let Some(current) = store.position(&cell, &record) else {
                    tracing::debug!(
                        record = %record,
                        %cell,
                        ?commit,
                        "record left cell before ack, skipping"
                    );
                    return Cmd::None;
                };
                let new_index = new_index.min(store.sequence(&cell).len().saturating_sub(1));
                if current == new_index {
                    return Cmd::None;
                }
                store.remove_from_cell(&cell, &record);
                store.insert_into_cell(&cell, record, new_index);
                Cmd::Redraw
            }
            (PendingCommit::SameCell { cell, .. }, Err(e)) => {
                tracing::warn!(%cell, ?commit, error = %e, "cell order persist failed, order unchanged");
                Cmd::None
            }
            (PendingCommit::CrossCellOrder { awaiting }, result) => {
                if let Err(e) = result {
                    // Membership follows the relation value, which is already written
                    tracing::warn!(?commit, error = %e, "cell order persist failed after transfer");
                }
                if awaiting > 1 {
                    self.pending.insert(
                        commit,
                        PendingCommit::CrossCellOrder {
                            awaiting: awaiting - 1,
                        },
                    );
                }
                Cmd::None
            }
            (pending @ PendingCommit::CrossCellDetail { .. }, _) => {
                tracing::warn!(?commit, "order result while awaiting detail update");
                self.pending.insert(commit, pending);
                Cmd::None
            }
        }
    }
}

/// Relation values implied by the target cell: the group value always, the
/// sub-group value only when the sub-group changes
fn transfer_details(
    view: &ViewConfig,
    board: &Board,
    mv: &CardMove,
) -> Result<Vec<RelationDetail>, DragError> {
    let group = board
        .group(&mv.target.group)
        .ok_or_else(|| DragError::not_found(format!("group {}", mv.target.group)))?;

    let mut details = vec![RelationDetail {
        key: view.group_relation_key.clone(),
        value: group.value.clone(),
    }];

    let sub_group_changed = matches!(
        (&mv.source.sub_group, &mv.target.sub_group),
        (Some(from), Some(to)) if from != to
    );
    if sub_group_changed {
        if let (Some(key), Some(to)) = (&view.sub_group_relation_key, &mv.target.sub_group) {
            let sub_group = board
                .sub_group(to)
                .ok_or_else(|| DragError::not_found(format!("sub-group {}", to)))?;
            details.push(RelationDetail {
                key: key.clone(),
                value: sub_group.value.clone(),
            });
        }
    }

    Ok(details)
}
