//! Runtime - executes commands and feeds results back as messages
//!
//! Service calls complete inline but their results are queued on a channel
//! and only delivered by [`Runtime::process_async_messages`], so a round
//! trip behaves like an asynchronous one: the drag session is already idle
//! when the result arrives.

mod services;

pub use services::{DetailService, OrderPersistence, RecordingServices, ServiceCall};

use std::sync::mpsc::{self, Receiver, Sender};

use crate::commands::Cmd;
use crate::messages::{DragMsg, Msg, OrderingMsg};
use crate::model::BoardModel;
use crate::update::update;

pub struct Runtime<S> {
    pub model: BoardModel,
    services: S,
    msg_tx: Sender<Msg>,
    msg_rx: Receiver<Msg>,
    frame_requested: bool,
    redraws: usize,
}

impl<S: DetailService + OrderPersistence> Runtime<S> {
    pub fn new(model: BoardModel, services: S) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel();
        Self {
            model,
            services,
            msg_tx,
            msg_rx,
            frame_requested: false,
            redraws: 0,
        }
    }

    pub fn services(&self) -> &S {
        &self.services
    }

    pub fn services_mut(&mut self) -> &mut S {
        &mut self.services
    }

    /// Number of redraws requested so far
    pub fn redraws(&self) -> usize {
        self.redraws
    }

    /// Whether an animation-frame callback is scheduled
    pub fn frame_requested(&self) -> bool {
        self.frame_requested
    }

    /// Run one message through update and execute the resulting command
    pub fn dispatch(&mut self, msg: Msg) {
        if let Some(cmd) = update(&mut self.model, msg) {
            self.process_cmd(cmd);
        }
    }

    /// Execute a command
    pub fn process_cmd(&mut self, cmd: Cmd) {
        match cmd {
            Cmd::None => {}
            Cmd::Redraw => self.redraws += 1,
            Cmd::RequestAnimationFrame => self.frame_requested = true,
            Cmd::UpdateRelationValues {
                commit,
                record_id,
                details,
            } => {
                let result = self.services.update_relation_values(&record_id, &details);
                let _ = self
                    .msg_tx
                    .send(Msg::Ordering(OrderingMsg::DetailUpdated { commit, result }));
            }
            Cmd::PersistGroupOrder {
                commit,
                view_id,
                groups,
            } => {
                let result = self.services.persist_group_order(&view_id, &groups);
                let _ = self
                    .msg_tx
                    .send(Msg::Ordering(OrderingMsg::OrderPersisted { commit, result }));
            }
            Cmd::PersistCellOrder {
                commit,
                view_id,
                cell,
                ids,
            } => {
                let result = self.services.persist_cell_order(&view_id, &cell, &ids);
                let _ = self
                    .msg_tx
                    .send(Msg::Ordering(OrderingMsg::OrderPersisted { commit, result }));
            }
            Cmd::Batch(cmds) => {
                for cmd in cmds {
                    self.process_cmd(cmd);
                }
            }
        }
    }

    /// Deliver queued round-trip results. Returns whether any were processed.
    pub fn process_async_messages(&mut self) -> bool {
        let mut processed = false;
        while let Ok(msg) = self.msg_rx.try_recv() {
            processed = true;
            self.dispatch(msg);
        }
        processed
    }

    /// Fire the scheduled animation frame, if any
    pub fn animation_frame(&mut self) {
        if std::mem::take(&mut self.frame_requested) {
            self.dispatch(Msg::Drag(DragMsg::AnimationFrame));
        }
    }

    /// Deliver results until no round trip is outstanding
    pub fn run_until_idle(&mut self) {
        while self.process_async_messages() {}
    }

    /// Dispatch, then act as the host for one tick: fire the frame and
    /// deliver every queued result
    pub fn step(&mut self, msg: Msg) {
        self.dispatch(msg);
        self.animation_frame();
        self.run_until_idle();
    }
}
