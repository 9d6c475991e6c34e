//! Message types for the Elm-style architecture
//!
//! All state changes flow through these message types. Messages are
//! serde-enabled so replay scripts can be written as JSON.

use serde::{Deserialize, Serialize};

use crate::model::{CellKey, Group, GroupId, Point, Record, RecordId, SubGroup, SubGroupId};
use crate::ordering::CommitId;

/// Pointer-driven drag messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DragMsg {
    /// Pointer down + drag threshold on a column header
    StartColumn { id: GroupId, pointer: Point },
    /// Pointer down + drag threshold on a card
    StartCard { id: RecordId, pointer: Point },
    /// Pointer down + drag threshold on a swimlane header
    StartLane { id: SubGroupId, pointer: Point },
    /// Pointer moved while dragging
    Move { pointer: Point },
    /// Board scrolled by a delta (content pixels)
    Scroll { dx: f32, dy: f32 },
    /// Animation-frame callback requested by `Cmd::RequestAnimationFrame`
    AnimationFrame,
    /// Pointer released
    Drop,
    /// Pointer capture lost or explicit cancel (Escape)
    Cancel,
}

/// Round-trip results for moves awaiting persistence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OrderingMsg {
    /// Relation values written (or failed) for a cross-cell move
    DetailUpdated {
        commit: CommitId,
        result: Result<(), String>,
    },
    /// Group or cell order persisted (or failed)
    OrderPersisted {
        commit: CommitId,
        result: Result<(), String>,
    },
}

/// Swimlane menu actions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SubGroupMsg {
    MoveUp(SubGroupId),
    MoveDown(SubGroupId),
    Hide(SubGroupId),
    Show(SubGroupId),
    /// Visibility switch in the sub-group list
    SetVisible { id: SubGroupId, visible: bool },
    /// Collapse or expand a swimlane (local, not persisted)
    ToggleCollapsed(SubGroupId),
}

/// Changes pushed by the external record store and view configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BoardMsg {
    /// Live group list replaced (reload)
    SetGroups(Vec<Group>),
    /// Live sub-group list replaced (reload)
    SetSubGroups(Vec<SubGroup>),
    /// Record inserted or its values changed
    UpsertRecord(Record),
    /// Listing of one cell replaced
    SetSequence { cell: CellKey, ids: Vec<RecordId> },
    SetReadonly(bool),
}

/// Top-level message type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Msg {
    Drag(DragMsg),
    Ordering(OrderingMsg),
    SubGroup(SubGroupMsg),
    Board(BoardMsg),
}

impl Msg {
    /// Messages on the pointer hot path; they never change the board layout
    pub fn is_pointer_tracking(&self) -> bool {
        matches!(
            self,
            Msg::Drag(DragMsg::Move { .. } | DragMsg::AnimationFrame | DragMsg::Scroll { .. })
        )
    }
}
