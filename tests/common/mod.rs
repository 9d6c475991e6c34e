//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use board_dnd::config::BoardConfig;
use board_dnd::messages::{DragMsg, Msg};
use board_dnd::model::{
    Board, BoardModel, CellKey, Group, ItemId, Point, Record, RecordId, RecordStore, SubGroup,
    ViewConfig,
};
use board_dnd::runtime::{RecordingServices, Runtime};
use board_dnd::subgroup_order::SubGroupOrderStore;

pub const GROUP_KEY: &str = "status";
pub const SUB_GROUP_KEY: &str = "owner";

/// Small, round metrics so coordinates in tests are easy to follow
///
/// Columns are 100 wide at a 110 pitch. Cards are 40 high at a 50 pitch,
/// the first one starting at y = 40 without swimlanes.
pub fn test_config() -> BoardConfig {
    BoardConfig {
        column_width: 100.0,
        column_gap: 10.0,
        column_header_height: 30.0,
        card_height: 40.0,
        card_gap: 10.0,
        lane_header_height: 20.0,
        lane_gap: 10.0,
        card_drop_tolerance: 8.0,
    }
}

pub fn ids(v: &[&str]) -> Vec<RecordId> {
    v.iter().map(|s| RecordId::new(*s)).collect()
}

/// Board without swimlanes: `(group id, group value, card ids)` per column
pub fn column_board(columns: &[(&str, &str, &[&str])]) -> BoardModel {
    let mut records = RecordStore::new();
    let mut groups = Vec::new();
    for (group, value, cards) in columns {
        groups.push(Group::new(*group, *value));
        for card in *cards {
            records.upsert_record(Record::new(*card).with_value(GROUP_KEY, *value));
        }
        records.set_sequence(&CellKey::column(*group), ids(cards));
    }

    BoardModel::new(
        ViewConfig::new("view", GROUP_KEY),
        Board::new(groups, vec![]),
        records,
        SubGroupOrderStore::default(),
        test_config(),
    )
}

/// Board with swimlanes: `(sub-group id, group id, card ids)` per cell
pub fn lane_board(
    groups: &[(&str, &str)],
    lanes: &[(&str, &str)],
    cells: &[(&str, &str, &[&str])],
) -> BoardModel {
    let mut records = RecordStore::new();
    for (lane, group, cards) in cells {
        let group_value = value_of(groups, group);
        let lane_value = value_of(lanes, lane);
        for card in *cards {
            records.upsert_record(
                Record::new(*card)
                    .with_value(GROUP_KEY, group_value)
                    .with_value(SUB_GROUP_KEY, lane_value),
            );
        }
        records.set_sequence(&CellKey::lane(*lane, *group), ids(cards));
    }

    BoardModel::new(
        ViewConfig::new("view", GROUP_KEY).with_sub_groups(SUB_GROUP_KEY),
        Board::new(
            groups.iter().map(|(id, v)| Group::new(*id, *v)).collect(),
            lanes.iter().map(|(id, v)| SubGroup::new(*id, *v)).collect(),
        ),
        records,
        SubGroupOrderStore::default(),
        test_config(),
    )
}

fn value_of<'a>(pairs: &[(&str, &'a str)], id: &str) -> &'a str {
    pairs
        .iter()
        .find(|(k, _)| *k == id)
        .map(|(_, v)| *v)
        .unwrap_or_else(|| panic!("unknown id {}", id))
}

pub fn runtime(model: BoardModel) -> Runtime<RecordingServices> {
    Runtime::new(model, RecordingServices::new())
}

pub fn sequence(model: &BoardModel, cell: &CellKey) -> Vec<String> {
    model
        .records
        .sequence(cell)
        .iter()
        .map(|id| id.0.clone())
        .collect()
}

// ============================================================================
// Pointer helpers (viewport coordinates)
// ============================================================================

fn rect(model: &BoardModel, item: &ItemId) -> board_dnd::model::Rect {
    use board_dnd::drag::GeometrySource;
    model
        .layout
        .rect_of(item)
        .unwrap_or_else(|| panic!("{} is not laid out", item))
}

/// Pointer just inside the top-left corner of a card
pub fn on_card(model: &BoardModel, id: &str) -> Point {
    let r = rect(model, &ItemId::Card(id.into()));
    Point::new(r.x + 1.0, r.y + 1.0)
}

/// Pointer in the upper half of a card
pub fn card_upper(model: &BoardModel, id: &str) -> Point {
    on_card(model, id)
}

/// Pointer in the lower half of a card
pub fn card_lower(model: &BoardModel, id: &str) -> Point {
    let r = rect(model, &ItemId::Card(id.into()));
    Point::new(r.x + 1.0, r.y + r.height * 0.75)
}

/// Pointer in the lower half of a cell's add slot
pub fn add_slot(model: &BoardModel, cell: &CellKey) -> Point {
    let r = rect(model, &ItemId::AddSentinel(cell.clone()));
    Point::new(r.x + 1.0, r.y + r.height * 0.75)
}

/// Pointer in the left or right half of a column header
pub fn column_side(model: &BoardModel, id: &str, right: bool) -> Point {
    let r = rect(model, &ItemId::Column(id.into()));
    let x = if right {
        r.x + r.width * 0.8
    } else {
        r.x + r.width * 0.2
    };
    Point::new(x, r.y + 5.0)
}

/// Pointer in the upper or lower half of a swimlane header
pub fn lane_side(model: &BoardModel, id: &str, lower: bool) -> Point {
    let r = rect(model, &ItemId::Lane(id.into()));
    let y = if lower {
        r.y + r.height * 0.75
    } else {
        r.y + 1.0
    };
    Point::new(r.x + 5.0, y)
}

// ============================================================================
// Gestures
// ============================================================================

/// Full card drag: start on the card, one move to `to`, drop, then let the
/// host deliver every round trip
pub fn drag_card(rt: &mut Runtime<RecordingServices>, id: &str, to: Point) {
    let start = on_card(&rt.model, id);
    rt.step(Msg::Drag(DragMsg::StartCard {
        id: id.into(),
        pointer: start,
    }));
    rt.step(Msg::Drag(DragMsg::Move { pointer: to }));
    rt.step(Msg::Drag(DragMsg::Drop));
}

/// Card drag without acting as the host: no animation frame and no round
/// trip delivered, so the results stay queued for a later drag to overlap
pub fn drop_card(rt: &mut Runtime<RecordingServices>, id: &str, to: Point) {
    let start = on_card(&rt.model, id);
    rt.dispatch(Msg::Drag(DragMsg::StartCard {
        id: id.into(),
        pointer: start,
    }));
    rt.dispatch(Msg::Drag(DragMsg::Move { pointer: to }));
    rt.dispatch(Msg::Drag(DragMsg::Drop));
}

pub fn drag_column(rt: &mut Runtime<RecordingServices>, id: &str, to: Point) {
    let start = column_side(&rt.model, id, false);
    rt.step(Msg::Drag(DragMsg::StartColumn {
        id: id.into(),
        pointer: start,
    }));
    rt.step(Msg::Drag(DragMsg::Move { pointer: to }));
    rt.step(Msg::Drag(DragMsg::Drop));
}

pub fn drag_lane(rt: &mut Runtime<RecordingServices>, id: &str, to: Point) {
    let start = lane_side(&rt.model, id, false);
    rt.step(Msg::Drag(DragMsg::StartLane {
        id: id.into(),
        pointer: start,
    }));
    rt.step(Msg::Drag(DragMsg::Move { pointer: to }));
    rt.step(Msg::Drag(DragMsg::Drop));
}
