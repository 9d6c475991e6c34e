//! Board structure - groups (columns), sub-groups (swimlanes) and cells
//!
//! A cell is the intersection of one group and, when swimlanes are active,
//! one sub-group. Cells are addressed by a typed [`CellKey`] rather than a
//! joined string, so ids containing separator characters stay unambiguous.

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Identifiers
// ============================================================================

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }
    };
}

string_id!(
    /// Identifier of a group (board column)
    GroupId
);
string_id!(
    /// Identifier of a sub-group (swimlane)
    SubGroupId
);
string_id!(
    /// Identifier of a record (card)
    RecordId
);
string_id!(
    /// Identifier of a board view; per-view settings are keyed by it
    ViewId
);

/// Composite key of a cell: one group, optionally one sub-group
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellKey {
    pub group: GroupId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_group: Option<SubGroupId>,
}

impl CellKey {
    pub fn new(group: GroupId, sub_group: Option<SubGroupId>) -> Self {
        Self { group, sub_group }
    }

    /// Cell of a board without swimlanes
    pub fn column(group: impl Into<GroupId>) -> Self {
        Self::new(group.into(), None)
    }

    /// Cell inside a swimlane
    pub fn lane(sub_group: impl Into<SubGroupId>, group: impl Into<GroupId>) -> Self {
        Self::new(group.into(), Some(sub_group.into()))
    }
}

impl From<&str> for CellKey {
    fn from(group: &str) -> Self {
        CellKey::column(group)
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.sub_group {
            Some(sub) => write!(f, "{}/{}", sub, self.group),
            None => write!(f, "{}", self.group),
        }
    }
}

/// Anything the position cache can hold an entry for
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ItemId {
    /// A whole column (column drags)
    Column(GroupId),
    /// A swimlane header row (sub-group drags)
    Lane(SubGroupId),
    /// A record card (card drags)
    Card(RecordId),
    /// The trailing "add" slot of a cell; a drop target only
    AddSentinel(CellKey),
}

impl ItemId {
    pub fn is_add(&self) -> bool {
        matches!(self, ItemId::AddSentinel(_))
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Column(id) => write!(f, "column:{}", id),
            ItemId::Lane(id) => write!(f, "lane:{}", id),
            ItemId::Card(id) => write!(f, "card:{}", id),
            ItemId::AddSentinel(cell) => write!(f, "add:{}", cell),
        }
    }
}

// ============================================================================
// Relation values
// ============================================================================

/// Value of a grouping relation on a record
///
/// Select-like relations hold one option; multi-select and object relations
/// hold a list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RelationValue {
    #[default]
    None,
    One(String),
    Many(Vec<String>),
}

impl From<&str> for RelationValue {
    fn from(value: &str) -> Self {
        RelationValue::One(value.to_string())
    }
}

/// One `{key, value}` pair sent to the detail service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationDetail {
    pub key: String,
    pub value: RelationValue,
}

// ============================================================================
// Groups and sub-groups
// ============================================================================

/// A board column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    /// Dense position within the full group sequence (hidden groups included)
    #[serde(default)]
    pub index: usize,
    /// Relation value that defines membership of this column
    pub value: RelationValue,
    #[serde(default)]
    pub is_hidden: bool,
}

impl Group {
    pub fn new(id: impl Into<GroupId>, value: impl Into<RelationValue>) -> Self {
        Self {
            id: id.into(),
            index: 0,
            value: value.into(),
            is_hidden: false,
        }
    }
}

/// A swimlane
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubGroup {
    pub id: SubGroupId,
    pub value: RelationValue,
    /// Mirrors the per-view hidden set
    #[serde(default)]
    pub is_hidden: bool,
}

impl SubGroup {
    pub fn new(id: impl Into<SubGroupId>, value: impl Into<RelationValue>) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
            is_hidden: false,
        }
    }
}

/// Group order entry sent to the order-persistence service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupOrderEntry {
    pub group_id: GroupId,
    pub index: usize,
    pub is_hidden: bool,
}

// ============================================================================
// View configuration
// ============================================================================

/// Read-only view configuration supplied by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    pub id: ViewId,
    /// Relation key that defines columns
    pub group_relation_key: String,
    /// Relation key that defines swimlanes, if any
    #[serde(default)]
    pub sub_group_relation_key: Option<String>,
    #[serde(default)]
    pub readonly: bool,
}

impl ViewConfig {
    pub fn new(id: impl Into<ViewId>, group_relation_key: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            group_relation_key: group_relation_key.into(),
            sub_group_relation_key: None,
            readonly: false,
        }
    }

    pub fn with_sub_groups(mut self, key: impl Into<String>) -> Self {
        self.sub_group_relation_key = Some(key.into());
        self
    }
}

/// The live group and sub-group lists of a view
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Board {
    /// Full group sequence in persisted order, hidden groups included
    pub groups: Vec<Group>,
    /// Sub-groups in natural (load) order
    #[serde(default)]
    pub sub_groups: Vec<SubGroup>,
}

impl Board {
    pub fn new(mut groups: Vec<Group>, sub_groups: Vec<SubGroup>) -> Self {
        reindex(&mut groups);
        Self { groups, sub_groups }
    }

    pub fn group(&self, id: &GroupId) -> Option<&Group> {
        self.groups.iter().find(|g| &g.id == id)
    }

    pub fn sub_group(&self, id: &SubGroupId) -> Option<&SubGroup> {
        self.sub_groups.iter().find(|s| &s.id == id)
    }

    pub fn group_position(&self, id: &GroupId) -> Option<usize> {
        self.groups.iter().position(|g| &g.id == id)
    }

    pub fn visible_groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.iter().filter(|g| !g.is_hidden)
    }

    /// Cells in layout order: lane by lane, column by column
    ///
    /// `lanes` is the effective (ordered, visible) sub-group list. When it is
    /// `None` the board has no swimlanes and there is one cell per visible group.
    pub fn cells(&self, lanes: Option<&[SubGroupId]>) -> Vec<CellKey> {
        match lanes {
            Some(lanes) => lanes
                .iter()
                .flat_map(|lane| {
                    self.visible_groups()
                        .map(move |g| CellKey::new(g.id.clone(), Some(lane.clone())))
                })
                .collect(),
            None => self
                .visible_groups()
                .map(|g| CellKey::new(g.id.clone(), None))
                .collect(),
        }
    }

    pub fn order_entries(&self) -> Vec<GroupOrderEntry> {
        self.groups
            .iter()
            .map(|g| GroupOrderEntry {
                group_id: g.id.clone(),
                index: g.index,
                is_hidden: g.is_hidden,
            })
            .collect()
    }
}

/// Re-assign dense indices following the vector order
pub fn reindex(groups: &mut [Group]) {
    for (i, group) in groups.iter_mut().enumerate() {
        group.index = i;
    }
}

/// Move-and-shift relocation of one element
///
/// Removes the element at `from` and reinserts it so that it ends up at
/// `to` in the resulting vector. Out-of-range targets clamp to the tail.
pub fn array_move<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from >= items.len() {
        return;
    }
    let item = items.remove(from);
    let to = to.min(items.len());
    items.insert(to, item);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_move_forward_and_back() {
        let mut v = vec!['a', 'b', 'c', 'd'];
        array_move(&mut v, 0, 2);
        assert_eq!(v, vec!['b', 'c', 'a', 'd']);
        array_move(&mut v, 2, 0);
        assert_eq!(v, vec!['a', 'b', 'c', 'd']);
    }

    #[test]
    fn test_array_move_clamps_target() {
        let mut v = vec![1, 2, 3];
        array_move(&mut v, 0, 10);
        assert_eq!(v, vec![2, 3, 1]);
    }

    #[test]
    fn test_cell_key_display_is_unambiguous_for_dashed_ids() {
        let key = CellKey::lane("lane-1", "todo-2");
        assert_eq!(key.to_string(), "lane-1/todo-2");
        assert_ne!(key, CellKey::lane("lane", "1-todo-2"));
    }

    #[test]
    fn test_cells_without_lanes_skip_hidden_groups() {
        let mut hidden = Group::new("b", "B");
        hidden.is_hidden = true;
        let board = Board::new(vec![Group::new("a", "A"), hidden, Group::new("c", "C")], vec![]);

        let cells = board.cells(None);
        assert_eq!(cells, vec![CellKey::column("a"), CellKey::column("c")]);
        assert_eq!(board.group(&"c".into()).map(|g| g.index), Some(2));
    }

    #[test]
    fn test_cells_with_lanes_are_lane_major() {
        let board = Board::new(vec![Group::new("a", "A"), Group::new("b", "B")], vec![]);
        let lanes = vec![SubGroupId::new("s2"), SubGroupId::new("s1")];

        let cells = board.cells(Some(&lanes));
        assert_eq!(
            cells,
            vec![
                CellKey::lane("s2", "a"),
                CellKey::lane("s2", "b"),
                CellKey::lane("s1", "a"),
                CellKey::lane("s1", "b"),
            ]
        );
    }

    #[test]
    fn test_relation_value_untagged_serde() {
        let one: RelationValue = serde_json::from_str("\"done\"").unwrap();
        assert_eq!(one, RelationValue::One("done".into()));
        let many: RelationValue = serde_json::from_str("[\"x\",\"y\"]").unwrap();
        assert_eq!(many, RelationValue::Many(vec!["x".into(), "y".into()]));
        let none: RelationValue = serde_json::from_str("null").unwrap();
        assert_eq!(none, RelationValue::None);
    }
}
