//! External record store and view configuration changes

use crate::commands::Cmd;
use crate::messages::BoardMsg;
use crate::model::{reindex, BoardModel};

/// Handle board messages
pub fn update_board(model: &mut BoardModel, msg: BoardMsg) -> Option<Cmd> {
    match msg {
        BoardMsg::SetGroups(mut groups) => {
            reindex(&mut groups);
            model.board.groups = groups;
        }
        BoardMsg::SetSubGroups(sub_groups) => {
            model.board.sub_groups = sub_groups;
            model.sync_hidden();
        }
        BoardMsg::UpsertRecord(record) => model.records.upsert_record(record),
        BoardMsg::SetSequence { cell, ids } => model.records.set_sequence(&cell, ids),
        BoardMsg::SetReadonly(readonly) => {
            if readonly && model.session.is_active() {
                tracing::debug!("view became read-only, aborting drag");
                model.session.cancel();
            }
            model.view.readonly = readonly;
        }
    }
    Some(Cmd::Redraw)
}
