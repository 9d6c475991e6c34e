//! Drag session - the drag-start → drag-move → drag-end state machine
//!
//! # States
//!
//! `Idle → Armed(kind) → Tracking(kind) → (Resolved | Cancelled) → Idle`
//!
//! Resolved and Cancelled are not stored: ending a drag returns a
//! [`DragEnd`] and the session is already back in `Idle`.
//!
//! # Invariants
//!
//! 1. The position cache is built on every start and cleared on every end,
//!    so entries never outlive one drag.
//! 2. At most one animation frame is outstanding. Move events between frames
//!    only overwrite the pending hover target.
//! 3. Teardown restores visuals no matter how the drag ended.

use crate::error::DragError;
use crate::model::{GroupId, ItemId, Point, RecordId, SubGroupId};

use super::collision::{resolve, Resolution, Side};
use super::position_cache::{CacheScope, GeometrySource, PositionCache, PositionEntry};

/// What is being dragged
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragKind {
    Column(GroupId),
    Card(RecordId),
    Lane(SubGroupId),
}

impl DragKind {
    pub fn item(&self) -> ItemId {
        match self {
            DragKind::Column(id) => ItemId::Column(id.clone()),
            DragKind::Card(id) => ItemId::Card(id.clone()),
            DragKind::Lane(id) => ItemId::Lane(id.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragPhase {
    #[default]
    Idle,
    /// Drag started, cache built, no move seen yet
    Armed(DragKind),
    /// At least one move event processed
    Tracking(DragKind),
}

/// Visual feedback owned by the session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DragVisuals {
    /// Item marked as being dragged
    pub dragging: Option<ItemId>,
    /// Item marked as the current drop target, with its insertion side
    pub hover: Option<(ItemId, Side)>,
    /// Pointer offset from the dragged item's origin (drag image anchor)
    pub drag_image_offset: Option<Point>,
    /// Text selection and unrelated drop handling are suspended
    pub interaction_locked: bool,
}

/// A completed drop, handed to the ordering engine
#[derive(Debug, Clone, PartialEq)]
pub struct DropOutcome {
    pub kind: DragKind,
    /// Cache entry of the dragged item as captured at drag start
    pub source: PositionEntry,
    pub target: Resolution,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// Dropped outside every tracked item
    NoTarget,
    /// Pointer capture lost or explicit cancel
    Aborted,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DragEnd {
    Resolved(DropOutcome),
    Cancelled(CancelReason),
}

#[derive(Debug, Default)]
pub struct DragSession {
    phase: DragPhase,
    cache: PositionCache,
    last: Option<Resolution>,
    pending_hover: Option<(ItemId, Side)>,
    frame_pending: bool,
    frames_applied: u64,
    card_tolerance: f32,
    pub visuals: DragVisuals,
}

impl DragSession {
    pub fn new(card_tolerance: f32) -> Self {
        Self {
            card_tolerance,
            ..Default::default()
        }
    }

    pub fn phase(&self) -> &DragPhase {
        &self.phase
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.phase, DragPhase::Idle)
    }

    pub fn kind(&self) -> Option<&DragKind> {
        match &self.phase {
            DragPhase::Idle => None,
            DragPhase::Armed(kind) | DragPhase::Tracking(kind) => Some(kind),
        }
    }

    pub fn cache(&self) -> &PositionCache {
        &self.cache
    }

    /// Most recent resolution, if the pointer is over a target
    pub fn current_target(&self) -> Option<&Resolution> {
        self.last.as_ref()
    }

    /// Number of visual-feedback updates applied during the current drag
    pub fn frames_applied(&self) -> u64 {
        self.frames_applied
    }

    /// Whether an animation-frame callback is outstanding
    pub fn frame_pending(&self) -> bool {
        self.frame_pending
    }

    /// Arm a drag: build the cache for `scope` and mark the dragged item
    ///
    /// Rejected without any state change when the view is read-only or a
    /// drag is already in progress. Fails with `NotFound` (and stays idle)
    /// when the dragged item is not rendered.
    pub fn start(
        &mut self,
        kind: DragKind,
        pointer: Point,
        readonly: bool,
        scope: CacheScope<'_>,
        geometry: &dyn GeometrySource,
    ) -> Result<(), DragError> {
        if readonly {
            return Err(DragError::ReadOnly);
        }
        if self.is_active() {
            return Err(DragError::SessionBusy);
        }

        let item = kind.item();
        self.cache = PositionCache::build(scope, geometry);

        let Some(anchor) = self.cache.get(&item).map(|e| e.rect.origin()) else {
            self.teardown();
            return Err(DragError::not_found(item));
        };

        self.frames_applied = 0;
        self.visuals = DragVisuals {
            dragging: Some(item.clone()),
            hover: None,
            drag_image_offset: Some(Point::new(pointer.x - anchor.x, pointer.y - anchor.y)),
            interaction_locked: true,
        };
        tracing::debug!(item = %item, entries = self.cache.len(), "drag armed");
        self.phase = DragPhase::Armed(kind);
        Ok(())
    }

    /// Process a pointer move. Returns `true` when the caller should request
    /// an animation frame to apply visual feedback.
    pub fn on_move(&mut self, pointer: Point) -> bool {
        let kind = match std::mem::take(&mut self.phase) {
            DragPhase::Idle => return false,
            DragPhase::Armed(kind) | DragPhase::Tracking(kind) => kind,
        };
        let item = kind.item();
        self.phase = DragPhase::Tracking(kind);

        self.last = resolve(pointer, &item, &self.cache, self.card_tolerance);
        self.pending_hover = self.last.as_ref().map(|r| (r.hover.clone(), r.side));

        if self.pending_hover != self.visuals.hover && !self.frame_pending {
            self.frame_pending = true;
            return true;
        }
        false
    }

    /// Apply the pending hover target. Returns `true` when visuals changed.
    pub fn on_frame(&mut self) -> bool {
        if !self.frame_pending {
            return false;
        }
        self.frame_pending = false;

        if self.pending_hover == self.visuals.hover {
            return false;
        }
        self.visuals.hover = self.pending_hover.clone();
        self.frames_applied += 1;
        true
    }

    /// Geometry-only refresh while tracking (scroll)
    pub fn on_scroll(&mut self, geometry: &dyn GeometrySource) {
        if self.is_active() {
            self.cache.patch(geometry);
        }
    }

    /// End the drag at the last resolved target
    pub fn finish(&mut self) -> DragEnd {
        let outcome = match (&self.phase, self.last.take()) {
            (DragPhase::Armed(kind) | DragPhase::Tracking(kind), Some(target)) => self
                .cache
                .get(&kind.item())
                .cloned()
                .map(|source| DropOutcome {
                    kind: kind.clone(),
                    source,
                    target,
                }),
            _ => None,
        };
        self.teardown();

        match outcome {
            Some(outcome) => {
                tracing::debug!(hover = %outcome.target.hover, "drag resolved");
                DragEnd::Resolved(outcome)
            }
            None => {
                tracing::debug!("drag ended without target");
                DragEnd::Cancelled(CancelReason::NoTarget)
            }
        }
    }

    /// Abort the drag (pointer capture lost, escape, host cancel)
    pub fn cancel(&mut self) -> DragEnd {
        self.teardown();
        tracing::debug!("drag aborted");
        DragEnd::Cancelled(CancelReason::Aborted)
    }

    fn teardown(&mut self) {
        self.phase = DragPhase::Idle;
        self.cache.clear();
        self.last = None;
        self.pending_hover = None;
        self.frame_pending = false;
        self.visuals = DragVisuals::default();
    }
}
