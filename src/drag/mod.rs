//! Drag machinery: geometry snapshot, collision resolution and the session
//! state machine

pub mod collision;
pub mod position_cache;
pub mod session;

pub use collision::{resolve, Resolution, Side};
pub use position_cache::{CacheScope, GeometrySource, PositionCache, PositionEntry};
pub use session::{
    CancelReason, DragEnd, DragKind, DragPhase, DragSession, DragVisuals, DropOutcome,
};
