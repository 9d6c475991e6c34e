//! Application model - the complete state of a board view
//!
//! This module contains the board data types and the [`BoardModel`] that the
//! update functions operate on.

pub mod board;
pub mod geometry;
pub mod record_store;

pub use board::{
    array_move, reindex, Board, CellKey, Group, GroupId, GroupOrderEntry, ItemId, RecordId,
    RelationDetail, RelationValue, SubGroup, SubGroupId, ViewConfig, ViewId,
};
pub use geometry::{Point, Rect};
pub use record_store::{PriorValues, Record, RecordStore, StoreChange};

use std::collections::HashSet;

use crate::config::BoardConfig;
use crate::drag::DragSession;
use crate::layout::GridLayout;
use crate::ordering::OrderingEngine;
use crate::subgroup_order::SubGroupOrderStore;

/// The complete board view model
#[derive(Debug)]
pub struct BoardModel {
    pub view: ViewConfig,
    pub board: Board,
    pub records: RecordStore,
    pub sub_group_order: SubGroupOrderStore,
    pub session: DragSession,
    pub ordering: OrderingEngine,
    /// Geometry of the rendered board, recomputed after model changes
    pub layout: GridLayout,
    /// Collapsed swimlanes (local only)
    pub collapsed: HashSet<SubGroupId>,
    pub config: BoardConfig,
}

impl BoardModel {
    pub fn new(
        view: ViewConfig,
        board: Board,
        records: RecordStore,
        sub_group_order: SubGroupOrderStore,
        config: BoardConfig,
    ) -> Self {
        let mut model = Self {
            view,
            board,
            records,
            sub_group_order,
            session: DragSession::new(config.card_drop_tolerance),
            ordering: OrderingEngine::new(),
            layout: GridLayout::default(),
            collapsed: HashSet::new(),
            config,
        };
        model.sync_hidden();
        model.relayout();
        model
    }

    /// Whether the view groups rows into swimlanes. With every lane hidden
    /// the board falls back to plain columns.
    pub fn has_sub_groups(&self) -> bool {
        self.view.sub_group_relation_key.is_some()
            && self.board.sub_groups.iter().any(|s| !s.is_hidden)
    }

    /// Visible swimlanes in display order, `None` without sub-grouping
    pub fn lanes(&self) -> Option<Vec<SubGroupId>> {
        if !self.has_sub_groups() {
            return None;
        }
        let order = self
            .sub_group_order
            .effective_order(&self.view.id, &self.board.sub_groups);
        (!order.is_empty()).then_some(order)
    }

    /// Every visible cell in layout order (lane-major)
    pub fn cells(&self) -> Vec<CellKey> {
        self.board.cells(self.lanes().as_deref())
    }

    /// Record total of a swimlane across the visible groups; 0 when hidden
    pub fn lane_count(&self, id: &SubGroupId) -> usize {
        let hidden = self
            .board
            .sub_group(id)
            .map_or(true, |sub_group| sub_group.is_hidden);
        if hidden {
            return 0;
        }
        self.board
            .visible_groups()
            .map(|g| self.records.count(&CellKey::new(g.id.clone(), Some(id.clone()))))
            .sum()
    }

    /// Record total of a column across the visible swimlanes
    pub fn column_count(&self, id: &GroupId) -> usize {
        match self.lanes() {
            Some(lanes) => lanes
                .into_iter()
                .map(|lane| self.records.count(&CellKey::new(id.clone(), Some(lane))))
                .sum(),
            None => self.records.count(&CellKey::column(id.clone())),
        }
    }

    /// Mirror the persisted hidden set onto the live sub-groups
    pub fn sync_hidden(&mut self) {
        let hidden = self.sub_group_order.get_hidden(&self.view.id);
        for sub_group in &mut self.board.sub_groups {
            sub_group.is_hidden = hidden.contains(&sub_group.id);
        }
    }

    /// Recompute board geometry, keeping the scroll offset
    pub fn relayout(&mut self) {
        let scroll = self.layout.scroll();
        let lanes = self.lanes();
        self.layout = GridLayout::compute(
            &self.config,
            &self.board,
            lanes.as_deref(),
            &self.collapsed,
            &self.records,
        );
        self.layout.set_scroll(scroll.x, scroll.y);
    }
}
