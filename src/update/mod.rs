//! Update functions for the Elm-style architecture
//!
//! All state transformations flow through these functions.

mod board;
mod drag;
mod ordering;
mod subgroup;

use crate::commands::Cmd;
use crate::messages::Msg;
use crate::model::BoardModel;

#[cfg(debug_assertions)]
use crate::tracing::SequenceSnapshot;
#[cfg(debug_assertions)]
use tracing::{debug, span, Level};

pub use board::update_board;
pub use drag::update_drag;
pub use ordering::update_ordering;
pub use subgroup::update_sub_group;

/// Main update function - dispatches to sub-handlers
///
/// In debug builds, this wraps with tracing instrumentation.
/// In release builds, it's a direct dispatch with zero overhead.
#[inline]
pub fn update(model: &mut BoardModel, msg: Msg) -> Option<Cmd> {
    #[cfg(debug_assertions)]
    {
        update_traced(model, msg)
    }
    #[cfg(not(debug_assertions))]
    {
        update_inner(model, msg)
    }
}

/// Inner update logic (no tracing)
fn update_inner(model: &mut BoardModel, msg: Msg) -> Option<Cmd> {
    let relayout = !msg.is_pointer_tracking();

    let result = match msg {
        Msg::Drag(m) => drag::update_drag(model, m),
        Msg::Ordering(m) => ordering::update_ordering(model, m),
        Msg::SubGroup(m) => subgroup::update_sub_group(model, m),
        Msg::Board(m) => board::update_board(model, m),
    };

    if relayout {
        model.relayout();
    }
    result
}

/// Drop empty commands so callers only see real work
fn some(cmd: Cmd) -> Option<Cmd> {
    match cmd {
        Cmd::None => None,
        cmd => Some(cmd),
    }
}

/// Traced update wrapper (debug builds only)
///
/// Captures before/after cell sequences and logs diffs for debugging.
/// Pointer moves and frames are too frequent to snapshot.
#[cfg(debug_assertions)]
fn update_traced(model: &mut BoardModel, msg: Msg) -> Option<Cmd> {
    let is_noisy = msg.is_pointer_tracking();

    let msg_name = msg_type_name(&msg);
    let _span = if is_noisy {
        None
    } else {
        Some(span!(Level::DEBUG, "update", msg = %msg_name).entered())
    };

    if is_noisy {
        return update_inner(model, msg);
    }

    let before = SequenceSnapshot::from_model(model);
    debug!(target: "message", msg = %msg_name, "processing");

    let result = update_inner(model, msg);

    let after = SequenceSnapshot::from_model(model);
    if let Some(diff) = before.diff(&after) {
        debug!(target: "sequence", %diff, "order changed");
    }

    result
}

/// Get a display name for a message type
///
/// Example outputs:
/// - `Drag::StartCard { id: RecordId("a"), .. }`
/// - `SubGroup::Hide(SubGroupId("s1"))`
#[cfg(debug_assertions)]
fn msg_type_name(msg: &Msg) -> String {
    match msg {
        Msg::Drag(m) => format!("Drag::{:?}", m),
        Msg::Ordering(m) => format!("Ordering::{:?}", m),
        Msg::SubGroup(m) => format!("SubGroup::{:?}", m),
        Msg::Board(m) => format!("Board::{:?}", m),
    }
}
