//! Grid layout - board geometry computed from config metrics
//!
//! Stands in for the rendered board: every visible column, swimlane header,
//! card and add slot gets a rectangle in content coordinates. `rect_of`
//! reports them in viewport coordinates, i.e. shifted by the scroll offset.
//!
//! ```text
//! ┌ header ┐ ┌ header ┐
//! ├────── lane header ───────┤
//! │ card   │ │ card   │
//! │ + add  │ │ card   │
//! │        │ │ + add  │
//! ├────── lane header ───────┤   (collapsed: no cards)
//! ```

use std::collections::{HashMap, HashSet};

use crate::config::BoardConfig;
use crate::drag::GeometrySource;
use crate::model::{Board, CellKey, ItemId, Point, Rect, RecordStore, SubGroupId};

#[derive(Debug, Clone, Default)]
pub struct GridLayout {
    rects: HashMap<ItemId, Rect>,
    scroll: Point,
    content_width: f32,
    content_height: f32,
}

impl GridLayout {
    /// Lay out the board. `lanes` is the visible swimlane order, or `None`
    /// when the view has no sub-grouping.
    pub fn compute(
        config: &BoardConfig,
        board: &Board,
        lanes: Option<&[SubGroupId]>,
        collapsed: &HashSet<SubGroupId>,
        store: &RecordStore,
    ) -> Self {
        let mut layout = Self::default();
        let columns: Vec<_> = board.visible_groups().collect();
        let pitch = config.column_width + config.column_gap;
        let column_x = |i: usize| i as f32 * pitch;

        layout.content_width = (columns.len() as f32 * pitch - config.column_gap).max(0.0);
        let mut y = config.column_header_height;

        match lanes {
            None => {
                let cells: Vec<CellKey> = columns
                    .iter()
                    .map(|g| CellKey::column(g.id.clone()))
                    .collect();
                y += layout.place_cells(config, store, &cells, column_x, y);
            }
            Some(lanes) => {
                for lane in lanes {
                    y += config.lane_gap;
                    layout.rects.insert(
                        ItemId::Lane(lane.clone()),
                        Rect::new(0.0, y, layout.content_width, config.lane_header_height),
                    );
                    y += config.lane_header_height;

                    if collapsed.contains(lane) {
                        continue;
                    }
                    let cells: Vec<CellKey> = columns
                        .iter()
                        .map(|g| CellKey::new(g.id.clone(), Some(lane.clone())))
                        .collect();
                    y += layout.place_cells(config, store, &cells, column_x, y);
                }
            }
        }

        layout.content_height = y;
        for (i, group) in columns.iter().enumerate() {
            layout.rects.insert(
                ItemId::Column(group.id.clone()),
                Rect::new(column_x(i), 0.0, config.column_width, y),
            );
        }

        tracing::trace!(
            items = layout.rects.len(),
            width = layout.content_width,
            height = layout.content_height,
            "layout computed"
        );
        layout
    }

    /// Place one row of cells starting at `top`; returns the row height
    fn place_cells(
        &mut self,
        config: &BoardConfig,
        store: &RecordStore,
        cells: &[CellKey],
        column_x: impl Fn(usize) -> f32,
        top: f32,
    ) -> f32 {
        let row = config.card_height + config.card_gap;
        let mut tallest = 0usize;

        for (i, cell) in cells.iter().enumerate() {
            let x = column_x(i);
            let ids = store.sequence(cell);
            let items = ids
                .iter()
                .map(|id| ItemId::Card(id.clone()))
                .chain(std::iter::once(ItemId::AddSentinel(cell.clone())));

            for (slot, item) in items.enumerate() {
                let y = top + config.card_gap + slot as f32 * row;
                self.rects
                    .insert(item, Rect::new(x, y, config.column_width, config.card_height));
            }
            tallest = tallest.max(ids.len() + 1);
        }

        config.card_gap + tallest as f32 * row
    }

    pub fn scroll(&self) -> Point {
        self.scroll
    }

    /// Set the scroll offset, clamped to the content size
    pub fn set_scroll(&mut self, x: f32, y: f32) {
        self.scroll = Point::new(
            x.clamp(0.0, self.content_width),
            y.clamp(0.0, self.content_height),
        );
    }

    pub fn scroll_by(&mut self, dx: f32, dy: f32) {
        self.set_scroll(self.scroll.x + dx, self.scroll.y + dy);
    }

    /// Rectangle in content coordinates (scroll ignored)
    pub fn content_rect(&self, item: &ItemId) -> Option<Rect> {
        self.rects.get(item).copied()
    }

    pub fn content_size(&self) -> (f32, f32) {
        (self.content_width, self.content_height)
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }
}

impl GeometrySource for GridLayout {
    fn rect_of(&self, item: &ItemId) -> Option<Rect> {
        self.rects
            .get(item)
            .map(|r| r.translate(-self.scroll.x, -self.scroll.y))
    }
}
