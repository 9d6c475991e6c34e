//! Swimlane menu handlers (order, visibility, collapse)

use crate::commands::Cmd;
use crate::messages::SubGroupMsg;
use crate::model::BoardModel;

/// Handle sub-group messages
pub fn update_sub_group(model: &mut BoardModel, msg: SubGroupMsg) -> Option<Cmd> {
    let view = model.view.id.clone();
    let live = &model.board.sub_groups;
    let store = &mut model.sub_group_order;

    let result = match msg {
        SubGroupMsg::MoveUp(id) => store.move_up(&view, &id, live),
        SubGroupMsg::MoveDown(id) => store.move_down(&view, &id, live),
        SubGroupMsg::Hide(id) => store.hide(&view, &id).map(|_| true),
        SubGroupMsg::Show(id) => store.show(&view, &id).map(|_| true),
        SubGroupMsg::SetVisible { id, visible } => {
            store.set_visible(&view, &id, visible).map(|_| true)
        }
        SubGroupMsg::ToggleCollapsed(id) => {
            if !model.collapsed.remove(&id) {
                model.collapsed.insert(id);
            }
            Ok(true)
        }
    };

    match result {
        Ok(true) => {
            model.sync_hidden();
            Some(Cmd::Redraw)
        }
        Ok(false) => None,
        Err(e) => {
            tracing::warn!(view = %view, error = %e, "sub-group update failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BoardConfig;
    use crate::model::{Board, Group, RecordStore, SubGroup, SubGroupId, ViewConfig};
    use crate::subgroup_order::SubGroupOrderStore;

    fn model() -> BoardModel {
        BoardModel::new(
            ViewConfig::new("v", "status").with_sub_groups("owner"),
            Board::new(
                vec![Group::new("g1", "X")],
                vec![
                    SubGroup::new("s1", "a"),
                    SubGroup::new("s2", "b"),
                    SubGroup::new("s3", "c"),
                ],
            ),
            RecordStore::new(),
            SubGroupOrderStore::default(),
            BoardConfig::default(),
        )
    }

    fn lanes(model: &BoardModel) -> Vec<String> {
        model
            .lanes()
            .unwrap_or_default()
            .into_iter()
            .map(|id| id.0)
            .collect()
    }

    #[test]
    fn test_hide_marks_sub_group_and_removes_lane() {
        let mut model = model();
        update_sub_group(&mut model, SubGroupMsg::Hide("s2".into()));

        assert!(model.board.sub_group(&SubGroupId::new("s2")).unwrap().is_hidden);
        assert_eq!(lanes(&model), vec!["s1", "s3"]);

        update_sub_group(
            &mut model,
            SubGroupMsg::SetVisible {
                id: "s2".into(),
                visible: true,
            },
        );
        assert_eq!(lanes(&model), vec!["s1", "s2", "s3"]);
    }

    #[test]
    fn test_move_at_top_returns_nothing() {
        let mut model = model();
        assert!(update_sub_group(&mut model, SubGroupMsg::MoveUp("s1".into())).is_none());
        assert!(update_sub_group(&mut model, SubGroupMsg::MoveUp("s2".into())).is_some());
        assert_eq!(lanes(&model), vec!["s2", "s1", "s3"]);
    }

    #[test]
    fn test_toggle_collapsed() {
        let mut model = model();
        let id = SubGroupId::new("s1");
        update_sub_group(&mut model, SubGroupMsg::ToggleCollapsed(id.clone()));
        assert!(model.collapsed.contains(&id));
        update_sub_group(&mut model, SubGroupMsg::ToggleCollapsed(id.clone()));
        assert!(!model.collapsed.contains(&id));
    }
}
