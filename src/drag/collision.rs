//! Collision resolution - pointer position → drop target, side and index
//!
//! A synthetic box the size of the dragged item is placed at the pointer and
//! tested against the cached entries in layout order; the first overlap
//! wins. There is no distance ranking, so the result only depends on the
//! cache contents and the pointer.

use crate::model::{CellKey, GroupId, ItemId, Point, Rect, SubGroupId};

use super::position_cache::{PositionCache, PositionEntry};

/// Insertion side relative to the hovered item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

impl Side {
    /// Whether the dragged item lands before the hovered one
    pub fn is_before(self) -> bool {
        matches!(self, Side::Left | Side::Top)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
            Side::Top => "top",
            Side::Bottom => "bottom",
        }
    }
}

/// Result of a successful resolution
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub hover: ItemId,
    pub side: Side,
    /// Final index of the dragged item in the target sequence, corrected for
    /// its removal from the old slot when source and target share a sequence
    pub new_index: usize,
    /// Raw insertion slot before the removal correction
    pub insert_index: usize,
    pub target_group: Option<GroupId>,
    pub target_sub_group: Option<SubGroupId>,
}

impl Resolution {
    /// Target cell of a card drop
    pub fn target_cell(&self) -> Option<CellKey> {
        match &self.hover {
            ItemId::Card(_) | ItemId::AddSentinel(_) => self
                .target_group
                .clone()
                .map(|g| CellKey::new(g, self.target_sub_group.clone())),
            ItemId::Column(_) | ItemId::Lane(_) => None,
        }
    }
}

/// Resolve the drop target for `dragged` at `pointer`
///
/// `card_tolerance` is added to the height of a dragged card's box. Returns
/// `None` when the dragged item is not cached or nothing overlaps.
pub fn resolve(
    pointer: Point,
    dragged: &ItemId,
    cache: &PositionCache,
    card_tolerance: f32,
) -> Option<Resolution> {
    let current = cache.get(dragged)?;

    let extra = match dragged {
        ItemId::Card(_) => card_tolerance,
        ItemId::Column(_) | ItemId::Lane(_) => 0.0,
        ItemId::AddSentinel(_) => return None,
    };
    let probe = Rect::at(pointer, current.rect.width, current.rect.height + extra);

    let target = cache
        .entries()
        .iter()
        .filter(|entry| &entry.item != dragged)
        .filter(|entry| same_kind(dragged, &entry.item))
        .find(|entry| probe.intersects(&entry.rect))?;

    let resolution = match dragged {
        ItemId::Column(_) => {
            let side = if pointer.x <= target.rect.mid_x() {
                Side::Left
            } else {
                Side::Right
            };
            sorted_list_resolution(current, target, side)
        }
        ItemId::Lane(_) => {
            let side = if pointer.y <= target.rect.mid_y() {
                Side::Top
            } else {
                Side::Bottom
            };
            sorted_list_resolution(current, target, side)
        }
        _ => card_resolution(pointer, current, target),
    };

    tracing::trace!(
        hover = %resolution.hover,
        side = resolution.side.as_str(),
        new_index = resolution.new_index,
        "resolved drop target"
    );
    Some(resolution)
}

fn same_kind(dragged: &ItemId, candidate: &ItemId) -> bool {
    match dragged {
        ItemId::Column(_) => matches!(candidate, ItemId::Column(_)),
        ItemId::Lane(_) => matches!(candidate, ItemId::Lane(_)),
        ItemId::Card(_) | ItemId::AddSentinel(_) => {
            matches!(candidate, ItemId::Card(_) | ItemId::AddSentinel(_))
        }
    }
}

/// Columns and lanes: one flat sequence, so the correction is always applied
fn sorted_list_resolution(current: &PositionEntry, target: &PositionEntry, side: Side) -> Resolution {
    let mut new_index = target.index;
    if side.is_before() && target.index > current.index {
        new_index -= 1;
    }
    if !side.is_before() && target.index < current.index {
        new_index += 1;
    }

    Resolution {
        hover: target.item.clone(),
        side,
        new_index,
        insert_index: if side.is_before() {
            target.index
        } else {
            target.index + 1
        },
        target_group: target.group_id.clone(),
        target_sub_group: target.sub_group_id.clone(),
    }
}

/// Cards: the add slot always inserts before itself (append at tail); the
/// removal shift only applies inside the dragged card's own cell
fn card_resolution(pointer: Point, current: &PositionEntry, target: &PositionEntry) -> Resolution {
    let side = if target.is_add() || pointer.y <= target.rect.mid_y() {
        Side::Top
    } else {
        Side::Bottom
    };

    let insert_index = if side.is_before() {
        target.index
    } else {
        target.index + 1
    };

    let same_cell = current.cell() == target.cell();
    let new_index = if same_cell && insert_index > current.index {
        insert_index - 1
    } else {
        insert_index
    };

    Resolution {
        hover: target.item.clone(),
        side,
        new_index,
        insert_index,
        target_group: target.group_id.clone(),
        target_sub_group: target.sub_group_id.clone(),
    }
}
