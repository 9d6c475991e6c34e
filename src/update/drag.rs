//! Drag message handlers: session lifecycle and drop dispatch

use crate::commands::Cmd;
use crate::drag::{CacheScope, DragEnd, DragKind, DropOutcome};
use crate::error::DragError;
use crate::messages::DragMsg;
use crate::model::{BoardModel, Point};
use crate::ordering::CardMove;

use super::some;

/// Handle drag messages
pub fn update_drag(model: &mut BoardModel, msg: DragMsg) -> Option<Cmd> {
    match msg {
        DragMsg::StartColumn { id, pointer } => start(model, DragKind::Column(id), pointer),
        DragMsg::StartCard { id, pointer } => start(model, DragKind::Card(id), pointer),
        DragMsg::StartLane { id, pointer } => start(model, DragKind::Lane(id), pointer),

        DragMsg::Move { pointer } => model
            .session
            .on_move(pointer)
            .then_some(Cmd::RequestAnimationFrame),

        DragMsg::AnimationFrame => model.session.on_frame().then_some(Cmd::Redraw),

        DragMsg::Scroll { dx, dy } => {
            model.layout.scroll_by(dx, dy);
            model.session.on_scroll(&model.layout);
            Some(Cmd::Redraw)
        }

        DragMsg::Drop => {
            if !model.session.is_active() {
                return None;
            }
            let end = model.session.finish();
            apply_drop(model, end)
        }

        DragMsg::Cancel => {
            if !model.session.is_active() {
                return None;
            }
            model.session.cancel();
            Some(Cmd::Redraw)
        }
    }
}

fn start(model: &mut BoardModel, kind: DragKind, pointer: Point) -> Option<Cmd> {
    let lanes = model.lanes();
    let cells = match kind {
        DragKind::Card(_) => model.board.cells(lanes.as_deref()),
        DragKind::Column(_) | DragKind::Lane(_) => Vec::new(),
    };

    let scope = match kind {
        DragKind::Column(_) => CacheScope::Columns {
            groups: &model.board.groups,
        },
        DragKind::Card(_) => CacheScope::Cards {
            cells: &cells,
            store: &model.records,
        },
        DragKind::Lane(_) => CacheScope::Lanes {
            lanes: lanes.as_deref().unwrap_or_default(),
        },
    };

    match model
        .session
        .start(kind, pointer, model.view.readonly, scope, &model.layout)
    {
        Ok(()) => Some(Cmd::Redraw),
        Err(e @ DragError::ReadOnly) => {
            tracing::debug!(error = %e, "drag rejected");
            None
        }
        Err(e) => {
            tracing::warn!(error = %e, "drag not started");
            None
        }
    }
}

/// Hand a finished drag to the ordering engine (cards, columns) or the
/// sub-group order store (swimlanes)
fn apply_drop(model: &mut BoardModel, end: DragEnd) -> Option<Cmd> {
    let DragEnd::Resolved(DropOutcome {
        kind,
        source,
        target,
    }) = end
    else {
        return Some(Cmd::Redraw);
    };

    let result = match kind {
        DragKind::Column(id) => model.ordering.apply_column_move(
            &model.view,
            &mut model.board,
            &id,
            target.new_index,
        ),
        DragKind::Card(id) => match (source.cell(), target.target_cell()) {
            (Some(source), Some(target_cell)) => model.ordering.apply_card_move(
                &model.view,
                &model.board,
                &mut model.records,
                CardMove {
                    record_id: id,
                    source,
                    target: target_cell,
                    new_index: target.new_index,
                },
            ),
            _ => Err(DragError::not_found(target.hover)),
        },
        DragKind::Lane(id) => model
            .sub_group_order
            .move_to(
                &model.view.id,
                &id,
                target.new_index,
                &model.board.sub_groups,
            )
            .map(|_| Cmd::None),
    };

    match result {
        Ok(cmd) => some(Cmd::batch(vec![cmd, Cmd::Redraw])),
        Err(e) => {
            tracing::debug!(error = %e, "drop discarded");
            Some(Cmd::Redraw)
        }
    }
}
