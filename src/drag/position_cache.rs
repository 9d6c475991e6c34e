//! Position cache - per-drag snapshot of rendered item geometry
//!
//! Built once when a drag is armed, patched (x/y only) on scroll, and
//! cleared when the drag ends. Building never touches the logical model.

use std::collections::HashMap;

use crate::model::{CellKey, Group, GroupId, ItemId, Rect, RecordStore, SubGroupId};

/// Source of on-screen rectangles for rendered board items
pub trait GeometrySource {
    /// Current rectangle of `item`, or `None` when it is not rendered
    fn rect_of(&self, item: &ItemId) -> Option<Rect>;
}

/// What a cache build enumerates
#[derive(Debug, Clone, Copy)]
pub enum CacheScope<'a> {
    /// One entry per visible group; indices are positions in the full group
    /// sequence (hidden groups included)
    Columns { groups: &'a [Group] },
    /// Every card of every visible cell plus the cell's add slot
    Cards {
        cells: &'a [CellKey],
        store: &'a RecordStore,
    },
    /// One entry per visible swimlane, in effective order
    Lanes { lanes: &'a [SubGroupId] },
}

/// One cached item
#[derive(Debug, Clone, PartialEq)]
pub struct PositionEntry {
    pub item: ItemId,
    pub rect: Rect,
    /// Logical index within the item's sequence (column order, lane order,
    /// or position inside the cell with the add slot last)
    pub index: usize,
    pub group_id: Option<GroupId>,
    pub sub_group_id: Option<SubGroupId>,
}

impl PositionEntry {
    pub fn is_add(&self) -> bool {
        self.item.is_add()
    }

    /// Cell owning a card or add-slot entry
    pub fn cell(&self) -> Option<CellKey> {
        match &self.item {
            ItemId::Card(_) | ItemId::AddSentinel(_) => self
                .group_id
                .clone()
                .map(|g| CellKey::new(g, self.sub_group_id.clone())),
            ItemId::Column(_) | ItemId::Lane(_) => None,
        }
    }
}

/// Layout-ordered snapshot of item geometry for a single drag
#[derive(Debug, Clone, Default)]
pub struct PositionCache {
    entries: Vec<PositionEntry>,
    by_item: HashMap<ItemId, usize>,
}

impl PositionCache {
    /// Build a fresh cache for `scope`. Items the geometry source does not
    /// render are skipped.
    pub fn build(scope: CacheScope<'_>, geometry: &dyn GeometrySource) -> Self {
        let mut cache = Self::default();

        match scope {
            CacheScope::Columns { groups } => {
                for (index, group) in groups.iter().enumerate() {
                    if group.is_hidden {
                        continue;
                    }
                    let item = ItemId::Column(group.id.clone());
                    if let Some(rect) = geometry.rect_of(&item) {
                        cache.push(PositionEntry {
                            item,
                            rect,
                            index,
                            group_id: Some(group.id.clone()),
                            sub_group_id: None,
                        });
                    }
                }
            }
            CacheScope::Cards { cells, store } => {
                for cell in cells {
                    let items = store
                        .sequence(cell)
                        .iter()
                        .map(|id| ItemId::Card(id.clone()))
                        .chain(std::iter::once(ItemId::AddSentinel(cell.clone())));

                    for (index, item) in items.enumerate() {
                        let Some(rect) = geometry.rect_of(&item) else {
                            continue;
                        };
                        cache.push(PositionEntry {
                            item,
                            rect,
                            index,
                            group_id: Some(cell.group.clone()),
                            sub_group_id: cell.sub_group.clone(),
                        });
                    }
                }
            }
            CacheScope::Lanes { lanes } => {
                for (index, lane) in lanes.iter().enumerate() {
                    let item = ItemId::Lane(lane.clone());
                    if let Some(rect) = geometry.rect_of(&item) {
                        cache.push(PositionEntry {
                            item,
                            rect,
                            index,
                            group_id: None,
                            sub_group_id: Some(lane.clone()),
                        });
                    }
                }
            }
        }

        tracing::debug!(entries = cache.len(), "position cache built");
        cache
    }

    fn push(&mut self, entry: PositionEntry) {
        self.by_item.insert(entry.item.clone(), self.entries.len());
        self.entries.push(entry);
    }

    /// Cheap reflow: re-read only x/y of the cached items. Sizes, indices
    /// and membership are assumed stable for the rest of the drag.
    pub fn patch(&mut self, geometry: &dyn GeometrySource) {
        for entry in &mut self.entries {
            if let Some(rect) = geometry.rect_of(&entry.item) {
                entry.rect.x = rect.x;
                entry.rect.y = rect.y;
            }
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.by_item.clear();
    }

    pub fn get(&self, item: &ItemId) -> Option<&PositionEntry> {
        self.by_item.get(item).map(|&i| &self.entries[i])
    }

    /// Entries in layout order
    pub fn entries(&self) -> &[PositionEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RecordId;

    /// Lays every item out on a vertical strip, in request order
    struct Strip(Vec<ItemId>, f32);

    impl GeometrySource for Strip {
        fn rect_of(&self, item: &ItemId) -> Option<Rect> {
            let i = self.0.iter().position(|it| it == item)?;
            Some(Rect::new(self.1, i as f32 * 10.0, 100.0, 10.0))
        }
    }

    #[test]
    fn test_build_cards_appends_add_slot() {
        let mut store = RecordStore::new();
        let cell = CellKey::column("g1");
        store.set_sequence(&cell, vec![RecordId::new("a"), RecordId::new("b")]);
        let geometry = Strip(
            vec![
                ItemId::Card("a".into()),
                ItemId::Card("b".into()),
                ItemId::AddSentinel(cell.clone()),
            ],
            0.0,
        );

        let cells = [cell.clone()];
        let cache = PositionCache::build(
            CacheScope::Cards {
                cells: &cells,
                store: &store,
            },
            &geometry,
        );

        assert_eq!(cache.len(), 3);
        let add = cache.get(&ItemId::AddSentinel(cell.clone())).unwrap();
        assert_eq!(add.index, 2);
        assert!(add.is_add());
        assert_eq!(add.cell(), Some(cell));
    }

    #[test]
    fn test_build_columns_keeps_full_sequence_index() {
        let mut hidden = Group::new("b", "B");
        hidden.is_hidden = true;
        let groups = vec![Group::new("a", "A"), hidden, Group::new("c", "C")];
        let geometry = Strip(
            vec![
                ItemId::Column("a".into()),
                ItemId::Column("b".into()),
                ItemId::Column("c".into()),
            ],
            0.0,
        );

        let cache = PositionCache::build(CacheScope::Columns { groups: &groups }, &geometry);

        assert_eq!(cache.len(), 2);
        assert!(cache.get(&ItemId::Column("b".into())).is_none());
        assert_eq!(cache.get(&ItemId::Column("c".into())).unwrap().index, 2);
    }

    #[test]
    fn test_unrendered_items_are_skipped() {
        let lanes = vec![SubGroupId::new("s1"), SubGroupId::new("s2")];
        let geometry = Strip(vec![ItemId::Lane("s2".into())], 0.0);

        let cache = PositionCache::build(CacheScope::Lanes { lanes: &lanes }, &geometry);

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.entries()[0].index, 1);
    }

    #[test]
    fn test_patch_updates_origin_only() {
        let lanes = vec![SubGroupId::new("s1")];
        let before = Strip(vec![ItemId::Lane("s1".into())], 0.0);
        let mut cache = PositionCache::build(CacheScope::Lanes { lanes: &lanes }, &before);

        let after = Strip(vec![ItemId::Lane("s1".into())], -50.0);
        cache.patch(&after);

        let entry = cache.get(&ItemId::Lane("s1".into())).unwrap();
        assert_eq!(entry.rect.x, -50.0);
        assert_eq!(entry.rect.width, 100.0);
        assert_eq!(entry.index, 0);
    }

    #[test]
    fn test_clear_empties_cache() {
        let lanes = vec![SubGroupId::new("s1")];
        let geometry = Strip(vec![ItemId::Lane("s1".into())], 0.0);
        let mut cache = PositionCache::build(CacheScope::Lanes { lanes: &lanes }, &geometry);
        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.get(&ItemId::Lane("s1".into())).is_none());
    }
}
