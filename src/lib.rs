//! Board DnD - drag-and-reorder engine for board views
//!
//! Columns (groups), cards (records) and swimlanes (sub-groups) are dragged
//! across a two-dimensional grid; drops become persisted orderings and
//! re-groupings. State changes follow the Elm Architecture pattern:
//! `Msg` → `update` → `Cmd` → runtime → `Msg`.

pub mod commands;
pub mod config;
pub mod config_paths;
pub mod drag;
pub mod error;
pub mod layout;
pub mod messages;
pub mod model;
pub mod ordering;
pub mod replay;
pub mod runtime;
pub mod subgroup_order;
pub mod tracing;
pub mod update;

// Re-export commonly used types
pub use commands::Cmd;
pub use config::BoardConfig;
pub use error::DragError;
pub use messages::Msg;
pub use model::BoardModel;
