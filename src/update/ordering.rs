//! Round-trip results for pending moves

use crate::commands::Cmd;
use crate::error::DragError;
use crate::messages::OrderingMsg;
use crate::model::BoardModel;

use super::some;

/// Handle persistence results
pub fn update_ordering(model: &mut BoardModel, msg: OrderingMsg) -> Option<Cmd> {
    match msg {
        OrderingMsg::DetailUpdated { commit, result } => some(model.ordering.detail_updated(
            &model.view,
            &mut model.records,
            commit,
            result.map_err(DragError::PersistenceFailure),
        )),
        OrderingMsg::OrderPersisted { commit, result } => some(model.ordering.order_persisted(
            &mut model.board,
            &mut model.records,
            commit,
            result.map_err(DragError::PersistenceFailure),
        )),
    }
}
